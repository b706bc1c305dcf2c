//! Core domain entities, rules, and traits for DevVault.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;
use uuid::Uuid;

pub mod category;
pub mod classification;
pub mod draft;
pub mod filter;

pub use category::{Category, CommandCategory, Platform, WebsiteCategory};
pub use classification::{Classification, ContentKind};
pub use draft::{CommandDraft, CommandField, Draft, FieldError, FieldErrors, WebsiteDraft, WebsiteField};
pub use filter::{category_counts, filter_records, CategoryFilter, ListFilter, Searchable};

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors returned by core validation and domain rules.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Returned when a validation rule is violated.
    #[error("validation error: {0}")]
    Validation(String),
    /// Returned when repository operations fail.
    #[error("storage error: {0}")]
    Storage(String),
}

/// A label used to group or filter records.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Tag {
    value: String,
}

impl Tag {
    /// Create a new tag, rejecting empty or whitespace-only values.
    pub fn new(value: impl Into<String>) -> CoreResult<Self> {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            return Err(CoreError::Validation("tag cannot be empty".into()));
        }
        Ok(Self { value })
    }

    /// Access the tag value.
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

/// Parse a comma separated tag list, keeping first-seen order and dropping repeats.
pub fn parse_tags(input: &str) -> Vec<Tag> {
    let mut tags: Vec<Tag> = Vec::new();
    for item in dv_utils::split_comma_list(input) {
        let Ok(tag) = Tag::new(item) else {
            continue;
        };
        if !tags.iter().any(|existing| existing.as_str().eq_ignore_ascii_case(tag.as_str())) {
            tags.push(tag);
        }
    }
    tags
}

/// A saved shell snippet.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Command {
    /// Unique identifier for the command.
    pub id: Uuid,
    /// Human-readable title.
    pub title: String,
    /// Literal command text.
    pub command: String,
    /// Free-text notes.
    pub description: String,
    /// Optional category.
    pub category: Option<CommandCategory>,
    /// Platform the command targets.
    pub platform: Platform,
    /// Ordered tags for grouping and search.
    pub tags: Vec<Tag>,
    /// Whether other users may see the command.
    pub is_public: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Command {
    /// Create a new command, validating required fields.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: Uuid,
        title: impl Into<String>,
        command: impl Into<String>,
        description: impl Into<String>,
        category: Option<CommandCategory>,
        platform: Platform,
        tags: Vec<Tag>,
        is_public: bool,
        created_at: DateTime<Utc>,
    ) -> CoreResult<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CoreError::Validation("title cannot be empty".into()));
        }
        let command = command.into();
        if command.trim().is_empty() {
            return Err(CoreError::Validation("command cannot be empty".into()));
        }

        Ok(Self {
            id,
            title,
            command,
            description: description.into(),
            category,
            platform,
            tags,
            is_public,
            created_at,
        })
    }
}

/// A saved bookmark.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Website {
    /// Unique identifier for the website.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Absolute URL.
    pub url: String,
    /// Free-text description.
    pub description: String,
    /// Optional category.
    pub category: Option<WebsiteCategory>,
    /// Whether the site is pinned as a bookmark.
    pub is_bookmark: bool,
    /// Ordered tags for grouping and search.
    pub tags: Vec<Tag>,
    /// Whether other users may see the website.
    pub is_public: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Website {
    /// Create a new website, validating the name and URL.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: Uuid,
        name: impl Into<String>,
        url: impl Into<String>,
        description: impl Into<String>,
        category: Option<WebsiteCategory>,
        is_bookmark: bool,
        tags: Vec<Tag>,
        is_public: bool,
        created_at: DateTime<Utc>,
    ) -> CoreResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CoreError::Validation("name cannot be empty".into()));
        }
        let url = url.into().trim().to_string();
        validate_url(&url)?;

        Ok(Self {
            id,
            name,
            url,
            description: description.into(),
            category,
            is_bookmark,
            tags,
            is_public,
            created_at,
        })
    }
}

/// Check that `input` is an absolute URL with a host-style base.
pub fn validate_url(input: &str) -> CoreResult<()> {
    if input.trim().is_empty() {
        return Err(CoreError::Validation("url cannot be empty".into()));
    }
    let parsed = Url::parse(input.trim())
        .map_err(|err| CoreError::Validation(format!("invalid url: {err}")))?;
    if parsed.cannot_be_a_base() {
        return Err(CoreError::Validation("url must be absolute".into()));
    }
    Ok(())
}

/// A stored record with identity and creation time.
pub trait Record: Searchable + Clone + Send + Sync {
    /// Unique identifier.
    fn id(&self) -> Uuid;
    /// Title or name shown in lists.
    fn display_name(&self) -> &str;
    /// Creation timestamp.
    fn created_at(&self) -> DateTime<Utc>;
}

impl Record for Command {
    fn id(&self) -> Uuid {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.title
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Record for Website {
    fn id(&self) -> Uuid {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Repository abstraction the views use to read and write records.
pub trait VaultRepository<T: Record> {
    /// Fetch every record in insertion order.
    fn list(&self) -> CoreResult<Vec<T>>;
    /// Store a new record.
    fn create(&self, record: T) -> CoreResult<()>;
    /// Fetch the records matching a filter, preserving insertion order.
    fn search(&self, filter: &ListFilter<T::Category>) -> CoreResult<Vec<T>> {
        let records = self.list()?;
        Ok(filter_records(&records, filter).into_iter().cloned().collect())
    }
}
