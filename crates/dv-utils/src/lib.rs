//! Shared helpers and error types for DevVault.

use thiserror::Error;

pub mod logging;

/// Result type for shared helpers.
pub type UtilsResult<T> = Result<T, UtilsError>;

/// Shared error variants for cross-crate helpers.
#[derive(Debug, Error)]
pub enum UtilsError {
    /// An IO error occurred.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// A parsing error occurred.
    #[error("parse error: {0}")]
    Parse(String),
    /// The global logger could not be installed.
    #[error("logging error: {0}")]
    Logging(String),
}

/// Return the first balanced JSON object embedded in free-form text.
///
/// Scanning starts at the first `{` and stops at its matching `}`. Braces inside
/// string literals are ignored, so prose or code fences around the object are
/// tolerated. Returns `None` when no object opens or it never closes.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split a comma separated list into trimmed, non-empty items.
pub fn split_comma_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Mask a credential for display, keeping only its length visible.
pub fn redact(secret: &str) -> String {
    if secret.is_empty() {
        return String::new();
    }
    format!("[redacted; {} chars]", secret.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_object_surrounded_by_prose() {
        let text = "Sure! Here it is:\n```json\n{\"title\": \"List files\"}\n```\nAnything else?";
        assert_eq!(extract_json_object(text), Some("{\"title\": \"List files\"}"));
    }

    #[test]
    fn nested_objects_and_braces_in_strings() {
        let text = r#"x {"a": {"b": "}{"}, "c": "say \"{\""} trailing }"#;
        assert_eq!(
            extract_json_object(text),
            Some(r#"{"a": {"b": "}{"}, "c": "say \"{\""}"#)
        );
    }

    #[test]
    fn unbalanced_or_missing_object() {
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("{\"open\": true"), None);
    }

    #[test]
    fn comma_list_drops_blanks() {
        assert_eq!(split_comma_list(" git, branch ,, "), vec!["git", "branch"]);
        assert!(split_comma_list("").is_empty());
    }

    #[test]
    fn redact_hides_value() {
        let masked = redact("abcd1234");
        assert!(!masked.contains("abcd"));
        assert_eq!(masked, "[redacted; 8 chars]");
    }
}
