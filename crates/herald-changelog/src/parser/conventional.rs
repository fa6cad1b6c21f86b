//! Conventional Commits classifier
//!
//! Parses commit messages following the Conventional Commits format:
//! https://www.conventionalcommits.org/

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use herald_core::config::ChangelogConfig;
use herald_core::error::Result;
use herald_core::types::{CommitEntry, CommitKind};

use super::CategoryConfig;

/// Regex for the header line of a conventional commit
static CONVENTIONAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<type>[a-zA-Z][a-zA-Z0-9_-]*)(?:\((?P<scope>[^)]*)\))?(?P<breaking>!)?:\s*(?P<description>\S.*)$",
    )
    .expect("Invalid regex")
});

/// Classify one raw commit message
///
/// Never fails: messages that do not follow the grammar become an entry of
/// kind `other` whose description is the whole message.
pub fn classify(raw: &str, categories: &CategoryConfig) -> CommitEntry {
    let mut lines = raw.lines();
    let header = lines.next().unwrap_or_default().trim_end();

    if header.starts_with("Merge ") {
        return CommitEntry::other(raw);
    }

    let Some(caps) = CONVENTIONAL_REGEX.captures(header) else {
        return CommitEntry::other(raw);
    };

    let commit_type = &caps["type"];
    let scope = caps.name("scope").map(|m| m.as_str().trim().to_string());
    let description = caps["description"].trim();

    let breaking = caps.name("breaking").is_some()
        || CommitKind::from_type(commit_type) == CommitKind::Breaking
        || has_breaking_footer(lines);

    CommitEntry::conventional(
        raw,
        commit_type,
        scope,
        description,
        breaking,
        categories.category_for(commit_type).map(str::to_string),
    )
}

/// Whether a body carries a `BREAKING CHANGE:` or `BREAKING-CHANGE:` footer
fn has_breaking_footer<'a>(mut body: impl Iterator<Item = &'a str>) -> bool {
    body.any(|line| line.starts_with("BREAKING CHANGE:") || line.starts_with("BREAKING-CHANGE:"))
}

/// Classifier for Conventional Commits bound to a category mapping
#[derive(Debug, Clone, Default)]
pub struct ConventionalParser {
    categories: CategoryConfig,
}

impl ConventionalParser {
    /// Create a new parser with the built-in category mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with custom categories
    pub fn with_categories(categories: CategoryConfig) -> Self {
        Self { categories }
    }

    /// Create a parser from the changelog configuration
    pub fn from_config(config: &ChangelogConfig) -> Result<Self> {
        Ok(Self::with_categories(CategoryConfig::from_config(config)?))
    }

    /// Category mapping in use
    pub fn categories(&self) -> &CategoryConfig {
        &self.categories
    }

    /// Classify a single message
    pub fn classify(&self, raw: &str) -> CommitEntry {
        classify(raw, &self.categories)
    }

    /// Classify messages, keeping their order
    #[instrument(skip_all)]
    pub fn classify_all<I, S>(&self, messages: I) -> Vec<CommitEntry>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries: Vec<_> = messages
            .into_iter()
            .map(|raw| self.classify(raw.as_ref()))
            .collect();

        debug!(
            count = entries.len(),
            breaking = entries.iter().filter(|e| e.is_breaking()).count(),
            uncategorized = entries.iter().filter(|e| e.category().is_none()).count(),
            "classified commits"
        );
        entries
    }
}
