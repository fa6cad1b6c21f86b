//! Configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::types::VersioningScheme;

/// Main configuration for Herald
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Version of the config schema
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Project name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Versioning configuration
    pub versioning: VersioningConfig,

    /// Git configuration
    pub git: GitConfig,

    /// Changelog configuration
    pub changelog: ChangelogConfig,
}

/// Versioning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VersioningConfig {
    /// Versioning scheme (semantic or calendar)
    pub scheme: VersioningScheme,

    /// Year notation for calendar versions
    pub calendar_format: CalendarFormat,

    /// Prefix of release tags (e.g. "v" for "v1.2.3")
    pub tag_prefix: String,
}

impl Default for VersioningConfig {
    fn default() -> Self {
        Self {
            scheme: VersioningScheme::Semantic,
            calendar_format: CalendarFormat::ShortYear,
            tag_prefix: "v".to_string(),
        }
    }
}

/// Year notation used by calendar versions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalendarFormat {
    /// YY.MM.MICRO (e.g. 22.5.0)
    #[default]
    ShortYear,
    /// YYYY.MM.MICRO (e.g. 2022.5.0)
    FullYear,
}

/// Git configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Branch to release from
    pub branch: String,

    /// Whether to require clean working directory
    pub require_clean: bool,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            branch: "main".to_string(),
            require_clean: true,
        }
    }
}

/// Changelog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
    /// Changelog file path
    pub file: PathBuf,

    /// File receiving the notes of the prepared release
    pub release_notes_file: PathBuf,

    /// Changelog format
    pub format: String,

    /// Base URL used for comparison links, e.g. `https://github.com/org/project/compare`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_url: Option<String>,

    /// Category receiving commits no rule matches; such commits are dropped when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catch_all: Option<String>,

    /// Header written when a new changelog file is created
    pub header: String,

    /// Whether breaking entries are highlighted
    pub mark_breaking: bool,

    /// Commit type to changelog category rules, first match wins
    pub categories: Vec<CategoryRule>,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("CHANGELOG.md"),
            release_notes_file: PathBuf::from(".release.md"),
            format: "markdown".to_string(),
            compare_url: None,
            catch_all: None,
            header: super::defaults::DEFAULT_CHANGELOG_HEADER.to_string(),
            mark_breaking: true,
            categories: default_categories(),
        }
    }
}

/// Maps commit type tokens onto a changelog category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Case-insensitive regular expression matched against the whole type token
    pub pattern: String,
    /// Category heading, e.g. "Added"
    pub category: String,
}

impl CategoryRule {
    /// Create a new rule
    pub fn new(pattern: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            category: category.into(),
        }
    }
}

/// Built-in commit type mapping
pub fn default_categories() -> Vec<CategoryRule> {
    vec![
        CategoryRule::new("feat|feature|add", "Added"),
        CategoryRule::new("change|refactor|perf", "Changed"),
        CategoryRule::new("deprecate", "Deprecated"),
        CategoryRule::new("remove", "Removed"),
        CategoryRule::new("fix|bugfix", "Fixed"),
        CategoryRule::new("security|sec", "Security"),
    ]
}
