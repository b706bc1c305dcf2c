//! Suggested field values returned by a text-generation service.

use serde::Deserialize;

use crate::category::{Category, Platform};

/// What kind of content is being classified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// A shell command pasted into the add-command form.
    Command,
    /// A URL pasted into the add-website form.
    Website,
}

/// Tags as returned by the model: either a comma separated string or a list.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum TagList {
    Text(String),
    List(Vec<String>),
}

/// Field suggestions parsed from a model response. Every field is optional.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct Classification {
    #[serde(default)]
    pub title: Option<String>,
    /// Website prompts ask for `name`; either key may carry the title.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Option<TagList>,
    #[serde(default)]
    pub platform: Option<String>,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|value| value.trim()).filter(|value| !value.is_empty())
}

impl Classification {
    /// Suggested title, if non-blank. Falls back to `name`.
    pub fn title(&self) -> Option<&str> {
        non_blank(self.title.as_ref()).or_else(|| non_blank(self.name.as_ref()))
    }

    /// Suggested description, if non-blank.
    pub fn description(&self) -> Option<&str> {
        non_blank(self.description.as_ref())
    }

    /// Suggested category, if it belongs to the closed set `C`.
    pub fn category<C: Category>(&self) -> Option<C> {
        non_blank(self.category.as_ref()).and_then(C::from_label)
    }

    /// Suggested platform, if recognised.
    pub fn platform(&self) -> Option<Platform> {
        non_blank(self.platform.as_ref()).and_then(Platform::parse)
    }

    /// Suggested tags, trimmed and without blanks.
    pub fn tags(&self) -> Vec<String> {
        match &self.tags {
            None => Vec::new(),
            Some(TagList::Text(text)) => dv_utils::split_comma_list(text),
            Some(TagList::List(items)) => items
                .iter()
                .map(|item| item.trim())
                .filter(|item| !item.is_empty())
                .map(ToString::to_string)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CommandCategory, WebsiteCategory};

    #[test]
    fn accepts_string_or_list_tags() {
        let text: Classification =
            serde_json::from_str(r#"{"title": "List files", "tags": "ls, files , "}"#).unwrap();
        assert_eq!(text.tags(), vec!["ls", "files"]);

        let list: Classification =
            serde_json::from_str(r#"{"tags": ["docs", " rust "], "name": "Rust Docs"}"#).unwrap();
        assert_eq!(list.tags(), vec!["docs", "rust"]);
        assert_eq!(list.title(), Some("Rust Docs"));
    }

    #[test]
    fn title_and_name_together_keep_the_rest() {
        let parsed: Classification = serde_json::from_str(
            r#"{"name":"Rust Docs","title":"Rust Docs","description":"Std docs","category":"Documentation"}"#,
        )
        .unwrap();
        assert_eq!(parsed.title(), Some("Rust Docs"));
        assert_eq!(parsed.description(), Some("Std docs"));
        assert_eq!(
            parsed.category::<WebsiteCategory>(),
            Some(WebsiteCategory::Documentation)
        );

        let blank_title: Classification =
            serde_json::from_str(r#"{"title":" ","name":"MDN"}"#).unwrap();
        assert_eq!(blank_title.title(), Some("MDN"));
    }

    #[test]
    fn unknown_category_and_platform_are_ignored() {
        let parsed: Classification = serde_json::from_str(
            r#"{"category": "Astrology", "platform": "amiga", "description": "  "}"#,
        )
        .unwrap();
        assert_eq!(parsed.category::<CommandCategory>(), None);
        assert_eq!(parsed.platform(), None);
        assert_eq!(parsed.description(), None);
    }

    #[test]
    fn known_values_are_typed() {
        let parsed: Classification =
            serde_json::from_str(r#"{"category": "documentation", "platform": "Linux"}"#).unwrap();
        assert_eq!(
            parsed.category::<WebsiteCategory>(),
            Some(WebsiteCategory::Documentation)
        );
        assert_eq!(parsed.platform(), Some(Platform::Linux));
    }
}
