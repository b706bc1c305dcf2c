//! Sample records the vault starts with.

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use dv_core::{
    parse_tags, Command, CommandCategory, CoreError, CoreResult, Platform, Website,
    WebsiteCategory,
};

fn january(day: u32) -> CoreResult<DateTime<Utc>> {
    Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0)
        .single()
        .ok_or_else(|| CoreError::Storage(format!("invalid seed date: 2024-01-{day}")))
}

struct CommandSeed {
    title: &'static str,
    command: &'static str,
    description: &'static str,
    category: CommandCategory,
    platform: Platform,
    tags: &'static str,
    day: u32,
}

struct WebsiteSeed {
    name: &'static str,
    url: &'static str,
    description: &'static str,
    category: WebsiteCategory,
    is_bookmark: bool,
    tags: &'static str,
    day: u32,
}

const COMMANDS: &[CommandSeed] = &[
    CommandSeed {
        title: "Create new Git branch",
        command: "git checkout -b feature/new-feature",
        description: "Creates and switches to a new branch based on current branch",
        category: CommandCategory::Git,
        platform: Platform::All,
        tags: "git, branch, version-control",
        day: 15,
    },
    CommandSeed {
        title: "Start Docker container",
        command: "docker run -d -p 3000:3000 --name myapp myimage",
        description: "Runs container in detached mode with port mapping",
        category: CommandCategory::Docker,
        platform: Platform::All,
        tags: "docker, container, deployment",
        day: 14,
    },
    CommandSeed {
        title: "Install npm packages",
        command: "npm install --save-dev tailwindcss postcss autoprefixer",
        description: "Installs Tailwind CSS as development dependencies",
        category: CommandCategory::NodeJs,
        platform: Platform::All,
        tags: "npm, css, tailwind",
        day: 13,
    },
    CommandSeed {
        title: "Create React component",
        command: "npx create-react-app my-app --template typescript",
        description: "Creates new React app with TypeScript template",
        category: CommandCategory::React,
        platform: Platform::All,
        tags: "react, typescript, create-app",
        day: 12,
    },
    CommandSeed {
        title: "Database backup",
        command: "pg_dump -U username -h localhost database_name > backup.sql",
        description: "Creates PostgreSQL database backup",
        category: CommandCategory::Database,
        platform: Platform::Linux,
        tags: "postgresql, backup, database",
        day: 11,
    },
    CommandSeed {
        title: "Kill process by port",
        command: "lsof -ti:3000 | xargs kill -9",
        description: "Kills any process running on port 3000",
        category: CommandCategory::Terminal,
        platform: Platform::Macos,
        tags: "process, port, kill",
        day: 10,
    },
    CommandSeed {
        title: "Find files by name",
        command: "find . -name \"*.js\" -type f",
        description: "Finds all JavaScript files in current directory and subdirectories",
        category: CommandCategory::Terminal,
        platform: Platform::Linux,
        tags: "find, search, files",
        day: 9,
    },
    CommandSeed {
        title: "Check disk usage",
        command: "df -h",
        description: "Shows disk usage in human-readable format",
        category: CommandCategory::System,
        platform: Platform::Linux,
        tags: "disk, system, monitoring",
        day: 8,
    },
];

const WEBSITES: &[WebsiteSeed] = &[
    WebsiteSeed {
        name: "React Documentation",
        url: "https://reactjs.org/docs",
        description: "Official React documentation with guides and API reference",
        category: WebsiteCategory::Documentation,
        is_bookmark: true,
        tags: "react, documentation, frontend",
        day: 15,
    },
    WebsiteSeed {
        name: "Tailwind CSS",
        url: "https://tailwindcss.com",
        description: "Utility-first CSS framework for rapid UI development",
        category: WebsiteCategory::Design,
        is_bookmark: true,
        tags: "css, design, framework",
        day: 14,
    },
    WebsiteSeed {
        name: "GitHub",
        url: "https://github.com",
        description: "Version control and collaboration platform for developers",
        category: WebsiteCategory::Tools,
        is_bookmark: true,
        tags: "git, version-control, collaboration",
        day: 13,
    },
    WebsiteSeed {
        name: "JSONPlaceholder",
        url: "https://jsonplaceholder.typicode.com",
        description: "Free fake API for testing and prototyping",
        category: WebsiteCategory::Apis,
        is_bookmark: false,
        tags: "api, testing, prototyping",
        day: 12,
    },
    WebsiteSeed {
        name: "MDN Web Docs",
        url: "https://developer.mozilla.org",
        description: "Comprehensive web development documentation",
        category: WebsiteCategory::Documentation,
        is_bookmark: true,
        tags: "documentation, web, reference",
        day: 11,
    },
    WebsiteSeed {
        name: "JavaScript Info",
        url: "https://javascript.info",
        description: "Modern JavaScript tutorial from basics to advanced",
        category: WebsiteCategory::Learning,
        is_bookmark: false,
        tags: "javascript, learning, tutorial",
        day: 10,
    },
    WebsiteSeed {
        name: "Can I Use",
        url: "https://caniuse.com",
        description: "Browser compatibility tables for web technologies",
        category: WebsiteCategory::Tools,
        is_bookmark: true,
        tags: "browser, compatibility, tools",
        day: 9,
    },
    WebsiteSeed {
        name: "Figma",
        url: "https://figma.com",
        description: "Collaborative interface design tool",
        category: WebsiteCategory::Design,
        is_bookmark: false,
        tags: "design, ui, collaboration",
        day: 8,
    },
    WebsiteSeed {
        name: "Stack Overflow",
        url: "https://stackoverflow.com",
        description: "Q&A platform for developers",
        category: WebsiteCategory::Learning,
        is_bookmark: true,
        tags: "qa, learning, community",
        day: 7,
    },
    WebsiteSeed {
        name: "CSS Tricks",
        url: "https://css-tricks.com",
        description: "CSS tips, tricks, and techniques",
        category: WebsiteCategory::Design,
        is_bookmark: false,
        tags: "css, design, tips",
        day: 6,
    },
];

/// Build the sample commands.
pub fn sample_commands() -> CoreResult<Vec<Command>> {
    COMMANDS
        .iter()
        .map(|seed| {
            Command::new(
                Uuid::new_v4(),
                seed.title,
                seed.command,
                seed.description,
                Some(seed.category),
                seed.platform,
                parse_tags(seed.tags),
                true,
                january(seed.day)?,
            )
        })
        .collect()
}

/// Build the sample websites.
pub fn sample_websites() -> CoreResult<Vec<Website>> {
    WEBSITES
        .iter()
        .map(|seed| {
            Website::new(
                Uuid::new_v4(),
                seed.name,
                seed.url,
                seed.description,
                Some(seed.category),
                seed.is_bookmark,
                parse_tags(seed.tags),
                true,
                january(seed.day)?,
            )
        })
        .collect()
}
