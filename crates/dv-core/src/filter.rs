//! Search and category filtering over record collections.

use crate::category::Category;
use crate::{Command, CommandCategory, Website, WebsiteCategory};

/// Records that can be matched by a free-text query and a category.
pub trait Searchable {
    /// The closed category set for this record kind.
    type Category: Category;

    /// Text fields matched by the query, in priority order.
    fn haystacks(&self) -> Vec<&str>;

    /// The record's category, if set.
    fn category(&self) -> Option<Self::Category>;
}

impl Searchable for Command {
    type Category = CommandCategory;

    fn haystacks(&self) -> Vec<&str> {
        let mut fields = vec![
            self.title.as_str(),
            self.command.as_str(),
            self.description.as_str(),
        ];
        fields.extend(self.tags.iter().map(crate::Tag::as_str));
        fields
    }

    fn category(&self) -> Option<CommandCategory> {
        self.category
    }
}

impl Searchable for Website {
    type Category = WebsiteCategory;

    fn haystacks(&self) -> Vec<&str> {
        let mut fields = vec![
            self.name.as_str(),
            self.url.as_str(),
            self.description.as_str(),
        ];
        fields.extend(self.tags.iter().map(crate::Tag::as_str));
        fields
    }

    fn category(&self) -> Option<WebsiteCategory> {
        self.category
    }
}

/// Category selection for a list view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CategoryFilter<C> {
    /// No category restriction.
    All,
    /// Only records in this category.
    Only(C),
}

impl<C> Default for CategoryFilter<C> {
    fn default() -> Self {
        Self::All
    }
}

impl<C: Category> CategoryFilter<C> {
    /// `All` followed by every category, as shown in the selector.
    pub fn options() -> Vec<Self> {
        let mut options = vec![Self::All];
        options.extend(C::ALL.iter().copied().map(Self::Only));
        options
    }

    /// Selector label.
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Only(category) => category.label(),
        }
    }

    /// Parse `"All"` or a category label.
    pub fn parse(input: &str) -> Option<Self> {
        if input.trim().eq_ignore_ascii_case("all") {
            return Some(Self::All);
        }
        C::from_label(input).map(Self::Only)
    }

    fn matches(self, category: Option<C>) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => category == Some(wanted),
        }
    }
}

/// Query plus category selection for a list view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListFilter<C> {
    /// Free-text query; empty matches everything.
    pub query: String,
    /// Category selection.
    pub category: CategoryFilter<C>,
}

impl<C> Default for ListFilter<C> {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: CategoryFilter::All,
        }
    }
}

impl<C: Category> ListFilter<C> {
    /// Build a filter from a query and a category selection.
    pub fn new(query: impl Into<String>, category: CategoryFilter<C>) -> Self {
        Self {
            query: query.into(),
            category,
        }
    }

    /// Whether a single record passes the filter.
    pub fn matches<T>(&self, record: &T) -> bool
    where
        T: Searchable<Category = C>,
    {
        if !self.category.matches(record.category()) {
            return false;
        }
        let query = self.query.to_lowercase();
        if query.is_empty() {
            return true;
        }
        record
            .haystacks()
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }
}

/// Project the records matching `filter`, preserving source order.
pub fn filter_records<'a, T: Searchable>(
    records: &'a [T],
    filter: &ListFilter<T::Category>,
) -> Vec<&'a T> {
    records.iter().filter(|record| filter.matches(*record)).collect()
}

/// Count records per category, skipping empty categories.
pub fn category_counts<T: Searchable>(records: &[T]) -> Vec<(T::Category, usize)> {
    <T::Category as Category>::ALL
        .iter()
        .filter_map(|category| {
            let count = records
                .iter()
                .filter(|record| record.category() == Some(*category))
                .count();
            (count > 0).then_some((*category, count))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_tags, Platform};
    use chrono::Utc;
    use uuid::Uuid;

    fn command(title: &str, text: &str, notes: &str, category: CommandCategory, tags: &str) -> Command {
        Command::new(
            Uuid::new_v4(),
            title,
            text,
            notes,
            Some(category),
            Platform::All,
            parse_tags(tags),
            false,
            Utc::now(),
        )
        .unwrap()
    }

    fn sample() -> Vec<Command> {
        vec![
            command(
                "Create new Git branch",
                "git checkout -b feature/new-feature",
                "Creates and switches to a new branch",
                CommandCategory::Git,
                "git, branch",
            ),
            command(
                "Start Docker container",
                "docker run -d -p 3000:3000 myimage",
                "Runs container in detached mode",
                CommandCategory::Docker,
                "docker, container",
            ),
            command(
                "Check disk usage",
                "df -h",
                "Shows disk usage in human-readable format",
                CommandCategory::System,
                "disk, monitoring",
            ),
        ]
    }

    fn titles(records: &[&Command]) -> Vec<String> {
        records.iter().map(|record| record.title.clone()).collect()
    }

    #[test]
    fn empty_query_returns_category_matches() {
        let records = sample();
        let all = filter_records(&records, &ListFilter::default());
        assert_eq!(all.len(), 3);

        let docker = filter_records(
            &records,
            &ListFilter::new("", CategoryFilter::Only(CommandCategory::Docker)),
        );
        assert_eq!(titles(&docker), vec!["Start Docker container"]);
    }

    #[test]
    fn query_is_case_insensitive_across_fields() {
        let records = sample();
        let by_title = filter_records(&records, &ListFilter::new("GIT", CategoryFilter::All));
        assert_eq!(titles(&by_title), vec!["Create new Git branch"]);

        let by_command = filter_records(&records, &ListFilter::new("df -H", CategoryFilter::All));
        assert_eq!(titles(&by_command), vec!["Check disk usage"]);

        let by_notes = filter_records(&records, &ListFilter::new("detached", CategoryFilter::All));
        assert_eq!(titles(&by_notes), vec!["Start Docker container"]);

        let by_tag = filter_records(&records, &ListFilter::new("monitor", CategoryFilter::All));
        assert_eq!(titles(&by_tag), vec!["Check disk usage"]);
    }

    #[test]
    fn query_and_category_must_both_match() {
        let records = sample();
        let filter = ListFilter::new("docker", CategoryFilter::Only(CommandCategory::Git));
        assert!(filter_records(&records, &filter).is_empty());
    }

    #[test]
    fn filtering_is_idempotent_and_order_preserving() {
        let records = sample();
        let filter = ListFilter::new("e", CategoryFilter::All);
        let once = filter_records(&records, &filter);
        let owned: Vec<Command> = once.iter().map(|record| (*record).clone()).collect();
        let twice = filter_records(&owned, &filter);

        assert_eq!(titles(&once), titles(&twice));
        let positions: Vec<usize> = once
            .iter()
            .map(|record| records.iter().position(|r| r.id == record.id).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn uncategorised_records_only_match_all() {
        let mut records = sample();
        records[0].category = None;
        let git_only = filter_records(
            &records,
            &ListFilter::new("", CategoryFilter::Only(CommandCategory::Git)),
        );
        assert!(git_only.is_empty());
        assert_eq!(filter_records(&records, &ListFilter::default()).len(), 3);
    }

    #[test]
    fn category_counts_skip_empty() {
        let records = sample();
        let counts = category_counts(&records);
        assert_eq!(
            counts,
            vec![
                (CommandCategory::Git, 1),
                (CommandCategory::Docker, 1),
                (CommandCategory::System, 1),
            ]
        );
    }

    #[test]
    fn selector_options_start_with_all() {
        let options = CategoryFilter::<WebsiteCategory>::options();
        assert_eq!(options[0], CategoryFilter::All);
        assert_eq!(options.len(), WebsiteCategory::ALL.len() + 1);
        assert_eq!(
            CategoryFilter::<WebsiteCategory>::parse("design"),
            Some(CategoryFilter::Only(WebsiteCategory::Design))
        );
    }
}
