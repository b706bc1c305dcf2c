//! Closed category sets and target platforms.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A closed set of labelled categories.
pub trait Category: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Every variant in display order.
    const ALL: &'static [Self];

    /// Human-readable label, also used on the wire.
    fn label(self) -> &'static str;

    /// Parse a label case-insensitively.
    fn from_label(input: &str) -> Option<Self> {
        let input = input.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.label().eq_ignore_ascii_case(input))
    }
}

/// Categories a saved command can belong to.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub enum CommandCategory {
    Git,
    Docker,
    #[serde(rename = "Docker Compose")]
    DockerCompose,
    Kubernetes,
    #[serde(rename = "Node.js")]
    NodeJs,
    React,
    Python,
    Database,
    Terminal,
    System,
    Linux,
    Windows,
    #[serde(rename = "macOS")]
    MacOs,
    Network,
    Security,
    DevOps,
    #[serde(rename = "Build Tools")]
    BuildTools,
    Testing,
    Other,
}

impl Category for CommandCategory {
    const ALL: &'static [Self] = &[
        Self::Git,
        Self::Docker,
        Self::DockerCompose,
        Self::Kubernetes,
        Self::NodeJs,
        Self::React,
        Self::Python,
        Self::Database,
        Self::Terminal,
        Self::System,
        Self::Linux,
        Self::Windows,
        Self::MacOs,
        Self::Network,
        Self::Security,
        Self::DevOps,
        Self::BuildTools,
        Self::Testing,
        Self::Other,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Git => "Git",
            Self::Docker => "Docker",
            Self::DockerCompose => "Docker Compose",
            Self::Kubernetes => "Kubernetes",
            Self::NodeJs => "Node.js",
            Self::React => "React",
            Self::Python => "Python",
            Self::Database => "Database",
            Self::Terminal => "Terminal",
            Self::System => "System",
            Self::Linux => "Linux",
            Self::Windows => "Windows",
            Self::MacOs => "macOS",
            Self::Network => "Network",
            Self::Security => "Security",
            Self::DevOps => "DevOps",
            Self::BuildTools => "Build Tools",
            Self::Testing => "Testing",
            Self::Other => "Other",
        }
    }
}

/// Categories a saved website can belong to.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub enum WebsiteCategory {
    Documentation,
    Tools,
    Learning,
    Design,
    #[serde(rename = "APIs")]
    Apis,
    Libraries,
    Tutorials,
    Inspiration,
    Resources,
    Cheatsheets,
    Other,
}

impl Category for WebsiteCategory {
    const ALL: &'static [Self] = &[
        Self::Documentation,
        Self::Tools,
        Self::Learning,
        Self::Design,
        Self::Apis,
        Self::Libraries,
        Self::Tutorials,
        Self::Inspiration,
        Self::Resources,
        Self::Cheatsheets,
        Self::Other,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Documentation => "Documentation",
            Self::Tools => "Tools",
            Self::Learning => "Learning",
            Self::Design => "Design",
            Self::Apis => "APIs",
            Self::Libraries => "Libraries",
            Self::Tutorials => "Tutorials",
            Self::Inspiration => "Inspiration",
            Self::Resources => "Resources",
            Self::Cheatsheets => "Cheatsheets",
            Self::Other => "Other",
        }
    }
}

/// Operating systems a command applies to.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Works everywhere.
    #[default]
    All,
    Linux,
    Macos,
    Windows,
}

impl Platform {
    /// Every platform in display order.
    pub const ALL: [Platform; 4] = [Self::All, Self::Linux, Self::Macos, Self::Windows];

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All Platforms",
            Self::Linux => "Linux",
            Self::Macos => "macOS",
            Self::Windows => "Windows",
        }
    }

    /// Parse the wire value (`all|linux|macos|windows`) case-insensitively.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "all" | "all platforms" => Some(Self::All),
            "linux" => Some(Self::Linux),
            "macos" | "mac" | "osx" => Some(Self::Macos),
            "windows" | "win" => Some(Self::Windows),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_back_case_insensitively() {
        for category in CommandCategory::ALL {
            assert_eq!(CommandCategory::from_label(category.label()), Some(*category));
        }
        assert_eq!(CommandCategory::from_label("node.JS"), Some(CommandCategory::NodeJs));
        assert_eq!(WebsiteCategory::from_label(" apis "), Some(WebsiteCategory::Apis));
        assert_eq!(WebsiteCategory::from_label("Podcasts"), None);
    }

    #[test]
    fn serde_uses_labels() {
        let json = serde_json::to_string(&CommandCategory::BuildTools).unwrap();
        assert_eq!(json, "\"Build Tools\"");
        let platform: Platform = serde_json::from_str("\"macos\"").unwrap();
        assert_eq!(platform, Platform::Macos);
    }

    #[test]
    fn platform_parse() {
        assert_eq!(Platform::parse("MacOS"), Some(Platform::Macos));
        assert_eq!(Platform::parse("all"), Some(Platform::All));
        assert_eq!(Platform::parse("beos"), None);
    }
}
