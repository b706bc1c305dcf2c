use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use dv_assist::{ClassificationRequest, Classifier};
use dv_core::{
    Category, CategoryFilter, Classification, Command, CommandCategory, ContentKind, ListFilter,
    VaultRepository, Website, WebsiteCategory,
};
use dv_store::{load_config, save_config, MemoryVault, VaultConfig};
use dv_utils::logging::{default_log_path, init_logging, LogTarget};

#[derive(Parser)]
#[command(name = "devvault", version, about = "DevVault: saved commands and websites")]
struct Cli {
    /// Use this config file instead of the default location.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Default log level; RUST_LOG takes precedence.
    #[arg(long, value_enum, default_value = "info", global = true)]
    log_level: LogLevelArg,
    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Print saved commands.
    Commands {
        /// Case-insensitive text to search for.
        #[arg(long)]
        query: Option<String>,
        /// Category label, or "All".
        #[arg(long)]
        category: Option<String>,
    },
    /// Print saved websites.
    Websites {
        /// Case-insensitive text to search for.
        #[arg(long)]
        query: Option<String>,
        /// Category label, or "All".
        #[arg(long)]
        category: Option<String>,
    },
    /// Ask the configured service to suggest fields.
    Classify {
        #[command(subcommand)]
        target: ClassifyTarget,
    },
    /// Write the default configuration file.
    InitConfig,
}

#[derive(Subcommand)]
enum ClassifyTarget {
    /// Classify a shell command.
    Command { text: String },
    /// Classify a website URL.
    Url { text: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for tracing::Level {
    fn from(value: LogLevelArg) -> Self {
        match value {
            LogLevelArg::Error => tracing::Level::ERROR,
            LogLevelArg::Warn => tracing::Level::WARN,
            LogLevelArg::Info => tracing::Level::INFO,
            LogLevelArg::Debug => tracing::Level::DEBUG,
            LogLevelArg::Trace => tracing::Level::TRACE,
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let level = cli.log_level.into();

    let Some(command) = cli.command else {
        init_logging(level, LogTarget::File(default_log_path()))
            .context("failed to initialise logging")?;
        let config = load_config(cli.config.as_deref()).context("failed to load config")?;
        return dv_tui::run(&config);
    };

    init_logging(level, LogTarget::Stderr).context("failed to initialise logging")?;

    if let CliCommand::InitConfig = command {
        return init_config(cli.config.as_deref());
    }

    let config = load_config(cli.config.as_deref()).context("failed to load config")?;
    match command {
        CliCommand::Commands { query, category } => list_commands(query, category.as_deref()),
        CliCommand::Websites { query, category } => list_websites(query, category.as_deref()),
        CliCommand::Classify { target } => classify(&config, target),
        CliCommand::InitConfig => unreachable!("handled above"),
    }
}

fn init_config(path: Option<&Path>) -> Result<()> {
    let written = save_config(&VaultConfig::default(), path).context("failed to write config")?;
    println!("Config written to {}", written.display());
    Ok(())
}

fn parse_category<C: Category>(input: Option<&str>) -> Result<CategoryFilter<C>> {
    let Some(input) = input else {
        return Ok(CategoryFilter::All);
    };
    CategoryFilter::parse(input).ok_or_else(|| {
        let options = CategoryFilter::<C>::options()
            .into_iter()
            .map(CategoryFilter::label)
            .collect::<Vec<_>>()
            .join(", ");
        anyhow!("unknown category {input:?}; expected one of: {options}")
    })
}

fn list_commands(query: Option<String>, category: Option<&str>) -> Result<()> {
    let vault = MemoryVault::seeded().context("failed to load sample data")?;
    let filter = ListFilter::new(
        query.unwrap_or_default(),
        parse_category::<CommandCategory>(category)?,
    );
    let commands: Vec<Command> = vault.search(&filter).context("failed to search commands")?;
    for command in &commands {
        println!("{}", command_row(command));
    }
    tracing::debug!(count = commands.len(), "listed commands");
    Ok(())
}

fn list_websites(query: Option<String>, category: Option<&str>) -> Result<()> {
    let vault = MemoryVault::seeded().context("failed to load sample data")?;
    let filter = ListFilter::new(
        query.unwrap_or_default(),
        parse_category::<WebsiteCategory>(category)?,
    );
    let websites: Vec<Website> = vault.search(&filter).context("failed to search websites")?;
    for website in &websites {
        println!("{}", website_row(website));
    }
    tracing::debug!(count = websites.len(), "listed websites");
    Ok(())
}

fn classify(config: &VaultConfig, target: ClassifyTarget) -> Result<()> {
    let classifier =
        dv_tui::classifier_from_config(&config.assist).context("autofill is not configured")?;
    let request = match target {
        ClassifyTarget::Command { text } => ClassificationRequest::new(ContentKind::Command, text),
        ClassifyTarget::Url { text } => ClassificationRequest::new(ContentKind::Website, text),
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to initialize runtime")?;
    let classification = runtime
        .block_on(classifier.classify(&request))
        .context("classification failed")?;

    println!("{}", classification_report(request.kind, &classification));
    Ok(())
}

fn category_label<C: Category>(category: Option<C>) -> &'static str {
    category.map_or("-", C::label)
}

fn command_row(command: &Command) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        command.title,
        category_label(command.category),
        command.platform.label(),
        command.command
    )
}

fn website_row(website: &Website) -> String {
    let marker = if website.is_bookmark { "★" } else { " " };
    format!(
        "{marker} {}\t{}\t{}",
        website.name,
        category_label(website.category),
        website.url
    )
}

fn classification_report(kind: ContentKind, classification: &Classification) -> String {
    let title_label = match kind {
        ContentKind::Command => "title",
        ContentKind::Website => "name",
    };
    let mut lines = vec![
        format!("{title_label}: {}", classification.title().unwrap_or("-")),
        format!("description: {}", classification.description().unwrap_or("-")),
    ];
    let category = match kind {
        ContentKind::Command => category_label(classification.category::<CommandCategory>()),
        ContentKind::Website => category_label(classification.category::<WebsiteCategory>()),
    };
    lines.push(format!("category: {category}"));
    if kind == ContentKind::Command {
        let platform = classification.platform().map_or("-", |platform| platform.label());
        lines.push(format!("platform: {platform}"));
    }
    let tags = classification.tags();
    if tags.is_empty() {
        lines.push("tags: -".to_string());
    } else {
        lines.push(format!("tags: {}", tags.join(", ")));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_launches_dashboard() {
        let cli = Cli::try_parse_from(["devvault"]).unwrap();
        assert!(cli.command.is_none());
        assert!(matches!(cli.log_level, LogLevelArg::Info));
    }

    #[test]
    fn classify_parses_nested_target() {
        let cli =
            Cli::try_parse_from(["devvault", "--log-level", "debug", "classify", "url", "https://x.dev"])
                .unwrap();
        match cli.command {
            Some(CliCommand::Classify {
                target: ClassifyTarget::Url { text },
            }) => assert_eq!(text, "https://x.dev"),
            _ => panic!("expected classify url"),
        }
    }

    #[test]
    fn category_parsing_reports_options() {
        assert_eq!(
            parse_category::<WebsiteCategory>(Some("apis")).unwrap(),
            CategoryFilter::Only(WebsiteCategory::Apis)
        );
        assert_eq!(
            parse_category::<CommandCategory>(None).unwrap(),
            CategoryFilter::All
        );
        let err = parse_category::<CommandCategory>(Some("Cobol")).unwrap_err();
        assert!(err.to_string().starts_with("unknown category \"Cobol\"; expected one of: All, "));
    }

    #[test]
    fn git_rows() {
        let vault = MemoryVault::seeded().unwrap();
        let filter = ListFilter::new("git", CategoryFilter::All);
        let commands: Vec<Command> = vault.search(&filter).unwrap();
        let rows = commands.iter().map(command_row).collect::<Vec<_>>();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].starts_with("Create new Git branch\t"));

        let website_filter: ListFilter<WebsiteCategory> = ListFilter::new("git", CategoryFilter::All);
        let websites: Vec<Website> = vault.search(&website_filter).unwrap();
        assert_eq!(websites.len(), 1);
        assert!(website_row(&websites[0]).contains("https://github.com"));
    }

    #[test]
    fn report_for_command() {
        let classification = dv_assist::parse_classification(
            r#"{"title":"List ports","description":"Show listening sockets","category":"Linux","platform":"linux","tags":["network","ports"]}"#,
        )
        .unwrap();
        insta::assert_snapshot!(classification_report(ContentKind::Command, &classification), @r###"
        title: List ports
        description: Show listening sockets
        category: Linux
        platform: Linux
        tags: network, ports
        "###);
    }

    #[test]
    fn report_for_website_skips_platform() {
        let classification =
            dv_assist::parse_classification(r#"{"title":"Docs","category":"Podcasts"}"#).unwrap();
        insta::assert_snapshot!(classification_report(ContentKind::Website, &classification), @r###"
        name: Docs
        description: -
        category: -
        tags: -
        "###);
    }
}
