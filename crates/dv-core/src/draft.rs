//! In-progress records edited in the create views.
//!
//! A draft holds raw form values. Autofill merges suggestions into it without
//! touching anything the user has filled in, and submission validates it into
//! a record.

use std::fmt;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::category::Platform;
use crate::classification::{Classification, ContentKind};
use crate::{parse_tags, validate_url, Command, CommandCategory, Website, WebsiteCategory};

/// A validation failure attached to a single form field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError<F> {
    /// Field the message belongs to.
    pub field: F,
    /// Inline message shown under the field.
    pub message: String,
}

/// All validation failures for a draft.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldErrors<F>(Vec<FieldError<F>>);

impl<F: Copy + PartialEq> FieldErrors<F> {
    fn new() -> Self {
        Self(Vec::new())
    }

    fn push(&mut self, field: F, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// First message for `field`, if any.
    pub fn for_field(&self, field: F) -> Option<&str> {
        self.0
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }

    /// Whether no errors were recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over errors in field order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError<F>> {
        self.0.iter()
    }
}

impl<F> fmt::Display for FieldErrors<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|error| error.message.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

/// Behaviour shared by the command and website drafts.
pub trait Draft: Clone + Send + 'static {
    /// Field identity, used for focus, errors and autofill keys.
    type Field: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static;
    /// Record produced on submission.
    type Record;

    /// Kind of content the trigger fields hold.
    fn kind() -> ContentKind;

    /// Fields whose edits schedule an autofill.
    fn trigger_fields() -> &'static [Self::Field];

    /// Current text of a text field, `None` for non-text fields.
    fn text(&self, field: Self::Field) -> Option<&str>;

    /// Whether the title and description are both still blank.
    fn awaiting_autofill(&self) -> bool;

    /// Merge suggestions into fields that are unset now and were unset in
    /// `issued`, the snapshot taken when the request was sent. Returns the
    /// fields that changed.
    fn apply_classification(
        &mut self,
        issued: &Self,
        classification: &Classification,
    ) -> Vec<Self::Field>;

    /// Validate required fields and build the record.
    fn to_record(
        &self,
        id: Uuid,
        created_at: DateTime<Utc>,
    ) -> Result<Self::Record, FieldErrors<Self::Field>>;
}

fn fill_text(current: &mut String, issued: &str, value: &str) -> bool {
    if current.trim().is_empty() && current.as_str() == issued {
        *current = value.to_string();
        return true;
    }
    false
}

fn fill_option<T: Copy + PartialEq>(current: &mut Option<T>, issued: Option<T>, value: T) -> bool {
    if current.is_none() && issued.is_none() {
        *current = Some(value);
        return true;
    }
    false
}

/// Fields of the add-command form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandField {
    Title,
    Command,
    Description,
    Category,
    Platform,
    Tags,
    Public,
}

impl CommandField {
    /// Form order.
    pub const ALL: [CommandField; 7] = [
        Self::Title,
        Self::Command,
        Self::Description,
        Self::Category,
        Self::Platform,
        Self::Tags,
        Self::Public,
    ];
}

/// In-progress command.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandDraft {
    pub title: String,
    pub command: String,
    pub description: String,
    pub category: Option<CommandCategory>,
    pub platform: Platform,
    /// Comma separated, as typed.
    pub tags: String,
    pub is_public: bool,
}

impl CommandDraft {
    /// Replace a text field. Non-text fields are left alone.
    pub fn set_text(&mut self, field: CommandField, value: impl Into<String>) {
        let value = value.into();
        match field {
            CommandField::Title => self.title = value,
            CommandField::Command => self.command = value,
            CommandField::Description => self.description = value,
            CommandField::Tags => self.tags = value,
            CommandField::Category | CommandField::Platform | CommandField::Public => {}
        }
    }
}

impl Draft for CommandDraft {
    type Field = CommandField;
    type Record = Command;

    fn kind() -> ContentKind {
        ContentKind::Command
    }

    fn trigger_fields() -> &'static [CommandField] {
        &[CommandField::Command]
    }

    fn text(&self, field: CommandField) -> Option<&str> {
        match field {
            CommandField::Title => Some(&self.title),
            CommandField::Command => Some(&self.command),
            CommandField::Description => Some(&self.description),
            CommandField::Tags => Some(&self.tags),
            CommandField::Category | CommandField::Platform | CommandField::Public => None,
        }
    }

    fn awaiting_autofill(&self) -> bool {
        self.title.trim().is_empty() && self.description.trim().is_empty()
    }

    fn apply_classification(
        &mut self,
        issued: &Self,
        classification: &Classification,
    ) -> Vec<CommandField> {
        let mut applied = Vec::new();

        if let Some(title) = classification.title() {
            if fill_text(&mut self.title, &issued.title, title) {
                applied.push(CommandField::Title);
            }
        }
        if let Some(description) = classification.description() {
            if fill_text(&mut self.description, &issued.description, description) {
                applied.push(CommandField::Description);
            }
        }
        if let Some(category) = classification.category::<CommandCategory>() {
            if fill_option(&mut self.category, issued.category, category) {
                applied.push(CommandField::Category);
            }
        }
        if let Some(platform) = classification.platform() {
            if platform != Platform::All
                && self.platform == Platform::All
                && issued.platform == Platform::All
            {
                self.platform = platform;
                applied.push(CommandField::Platform);
            }
        }
        let tags = classification.tags();
        if !tags.is_empty() && fill_text(&mut self.tags, &issued.tags, &tags.join(", ")) {
            applied.push(CommandField::Tags);
        }

        applied
    }

    fn to_record(
        &self,
        id: Uuid,
        created_at: DateTime<Utc>,
    ) -> Result<Command, FieldErrors<CommandField>> {
        let mut errors = FieldErrors::new();
        if self.title.trim().is_empty() {
            errors.push(CommandField::Title, "Title is required");
        }
        if self.command.trim().is_empty() {
            errors.push(CommandField::Command, "Command is required");
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        Command::new(
            id,
            self.title.trim(),
            self.command.trim(),
            self.description.trim(),
            self.category,
            self.platform,
            parse_tags(&self.tags),
            self.is_public,
            created_at,
        )
        .map_err(|err| {
            let mut errors = FieldErrors::new();
            errors.push(CommandField::Title, err.to_string());
            errors
        })
    }
}

/// Fields of the add-website form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WebsiteField {
    Name,
    Url,
    Description,
    Category,
    Tags,
    Bookmark,
    Public,
}

impl WebsiteField {
    /// Form order.
    pub const ALL: [WebsiteField; 7] = [
        Self::Url,
        Self::Name,
        Self::Description,
        Self::Category,
        Self::Tags,
        Self::Bookmark,
        Self::Public,
    ];
}

/// In-progress website.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WebsiteDraft {
    pub name: String,
    pub url: String,
    pub description: String,
    pub category: Option<WebsiteCategory>,
    /// Comma separated, as typed.
    pub tags: String,
    pub is_bookmark: bool,
    pub is_public: bool,
}

impl WebsiteDraft {
    /// Replace a text field. Non-text fields are left alone.
    pub fn set_text(&mut self, field: WebsiteField, value: impl Into<String>) {
        let value = value.into();
        match field {
            WebsiteField::Name => self.name = value,
            WebsiteField::Url => self.url = value,
            WebsiteField::Description => self.description = value,
            WebsiteField::Tags => self.tags = value,
            WebsiteField::Category | WebsiteField::Bookmark | WebsiteField::Public => {}
        }
    }
}

impl Draft for WebsiteDraft {
    type Field = WebsiteField;
    type Record = Website;

    fn kind() -> ContentKind {
        ContentKind::Website
    }

    fn trigger_fields() -> &'static [WebsiteField] {
        &[WebsiteField::Url]
    }

    fn text(&self, field: WebsiteField) -> Option<&str> {
        match field {
            WebsiteField::Name => Some(&self.name),
            WebsiteField::Url => Some(&self.url),
            WebsiteField::Description => Some(&self.description),
            WebsiteField::Tags => Some(&self.tags),
            WebsiteField::Category | WebsiteField::Bookmark | WebsiteField::Public => None,
        }
    }

    fn awaiting_autofill(&self) -> bool {
        self.name.trim().is_empty() && self.description.trim().is_empty()
    }

    fn apply_classification(
        &mut self,
        issued: &Self,
        classification: &Classification,
    ) -> Vec<WebsiteField> {
        let mut applied = Vec::new();

        if let Some(title) = classification.title() {
            if fill_text(&mut self.name, &issued.name, title) {
                applied.push(WebsiteField::Name);
            }
        }
        if let Some(description) = classification.description() {
            if fill_text(&mut self.description, &issued.description, description) {
                applied.push(WebsiteField::Description);
            }
        }
        if let Some(category) = classification.category::<WebsiteCategory>() {
            if fill_option(&mut self.category, issued.category, category) {
                applied.push(WebsiteField::Category);
            }
        }
        let tags = classification.tags();
        if !tags.is_empty() && fill_text(&mut self.tags, &issued.tags, &tags.join(", ")) {
            applied.push(WebsiteField::Tags);
        }

        applied
    }

    fn to_record(
        &self,
        id: Uuid,
        created_at: DateTime<Utc>,
    ) -> Result<Website, FieldErrors<WebsiteField>> {
        let mut errors = FieldErrors::new();
        if self.name.trim().is_empty() {
            errors.push(WebsiteField::Name, "Name is required");
        }
        if self.url.trim().is_empty() {
            errors.push(WebsiteField::Url, "URL is required");
        } else if validate_url(&self.url).is_err() {
            errors.push(WebsiteField::Url, "Enter a full URL, e.g. https://example.com");
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        Website::new(
            id,
            self.name.trim(),
            self.url.trim(),
            self.description.trim(),
            self.category,
            self.is_bookmark,
            parse_tags(&self.tags),
            self.is_public,
            created_at,
        )
        .map_err(|err| {
            let mut errors = FieldErrors::new();
            errors.push(WebsiteField::Url, err.to_string());
            errors
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion() -> Classification {
        serde_json::from_str(
            r#"{
                "title": "List listening ports",
                "description": "Shows processes bound to TCP ports",
                "category": "Network",
                "tags": "lsof, ports",
                "platform": "macos"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn fills_every_unset_field() {
        let mut draft = CommandDraft {
            command: "lsof -i -P".into(),
            ..CommandDraft::default()
        };
        let issued = draft.clone();
        let applied = draft.apply_classification(&issued, &suggestion());

        assert_eq!(
            applied,
            vec![
                CommandField::Title,
                CommandField::Description,
                CommandField::Category,
                CommandField::Platform,
                CommandField::Tags,
            ]
        );
        assert_eq!(draft.title, "List listening ports");
        assert_eq!(draft.category, Some(CommandCategory::Network));
        assert_eq!(draft.platform, Platform::Macos);
        assert_eq!(draft.tags, "lsof, ports");
        assert_eq!(draft.command, "lsof -i -P");
    }

    #[test]
    fn user_edits_during_flight_are_kept() {
        let mut draft = CommandDraft {
            command: "lsof -i -P".into(),
            ..CommandDraft::default()
        };
        let issued = draft.clone();
        draft.title = "My ports".into();
        draft.platform = Platform::Linux;

        let applied = draft.apply_classification(&issued, &suggestion());

        assert!(!applied.contains(&CommandField::Title));
        assert!(!applied.contains(&CommandField::Platform));
        assert_eq!(draft.title, "My ports");
        assert_eq!(draft.platform, Platform::Linux);
        assert_eq!(draft.description, "Shows processes bound to TCP ports");
    }

    #[test]
    fn fields_filled_before_request_are_kept() {
        let mut draft = CommandDraft {
            command: "lsof -i -P".into(),
            category: Some(CommandCategory::Terminal),
            tags: "mine".into(),
            ..CommandDraft::default()
        };
        let issued = draft.clone();
        draft.apply_classification(&issued, &suggestion());
        assert_eq!(draft.category, Some(CommandCategory::Terminal));
        assert_eq!(draft.tags, "mine");
    }

    #[test]
    fn awaiting_autofill_needs_blank_title_and_description() {
        let mut draft = CommandDraft::default();
        assert!(draft.awaiting_autofill());
        draft.description = "notes".into();
        assert!(!draft.awaiting_autofill());

        let mut website = WebsiteDraft::default();
        website.name = " ".into();
        assert!(website.awaiting_autofill());
    }

    #[test]
    fn command_with_blank_title_is_rejected() {
        let draft = CommandDraft {
            command: "git status".into(),
            ..CommandDraft::default()
        };
        let errors = draft.to_record(Uuid::new_v4(), Utc::now()).unwrap_err();
        assert_eq!(errors.for_field(CommandField::Title), Some("Title is required"));
        assert_eq!(errors.for_field(CommandField::Command), None);
    }

    #[test]
    fn command_record_parses_tags() {
        let draft = CommandDraft {
            title: " Status ".into(),
            command: "git status".into(),
            tags: "git, status, git".into(),
            ..CommandDraft::default()
        };
        let record = draft.to_record(Uuid::new_v4(), Utc::now()).unwrap();
        assert_eq!(record.title, "Status");
        assert_eq!(record.tags.len(), 2);
    }

    #[test]
    fn website_validation_messages() {
        let draft = WebsiteDraft {
            url: "example".into(),
            ..WebsiteDraft::default()
        };
        let errors = draft.to_record(Uuid::new_v4(), Utc::now()).unwrap_err();
        insta::assert_snapshot!(errors.to_string(), @"Name is required; Enter a full URL, e.g. https://example.com");
    }

    #[test]
    fn website_merge_maps_title_to_name() {
        let mut draft = WebsiteDraft {
            url: "https://crates.io".into(),
            ..WebsiteDraft::default()
        };
        let issued = draft.clone();
        let classification: Classification = serde_json::from_str(
            r#"{"title": "crates.io", "category": "Resources", "tags": ["rust", "packages"]}"#,
        )
        .unwrap();
        let applied = draft.apply_classification(&issued, &classification);
        assert_eq!(
            applied,
            vec![WebsiteField::Name, WebsiteField::Category, WebsiteField::Tags]
        );
        assert_eq!(draft.name, "crates.io");
        assert_eq!(draft.tags, "rust, packages");
    }
}
