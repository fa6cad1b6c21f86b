//! Markdown changelog formatter

use chrono::NaiveDate;
use tracing::{debug, instrument};

use herald_core::types::CommitEntry;

use crate::types::CategoryGroup;

/// Markdown changelog formatter
#[derive(Debug, Clone)]
pub struct MarkdownFormatter {
    /// Prefix breaking entries with `**BREAKING**`
    pub mark_breaking: bool,
}

impl MarkdownFormatter {
    /// Create a new markdown formatter
    pub fn new() -> Self {
        Self {
            mark_breaking: true,
        }
    }

    /// Set whether breaking entries are highlighted
    pub fn with_mark_breaking(mut self, mark_breaking: bool) -> Self {
        self.mark_breaking = mark_breaking;
        self
    }

    /// Entry line for a commit, e.g. `- **BREAKING** drop old API (cli)`
    ///
    /// Only the first line of a multi-line description is used.
    pub fn entry(&self, commit: &CommitEntry) -> String {
        let mut line = String::from("- ");
        if self.mark_breaking && commit.is_breaking() {
            line.push_str("**BREAKING** ");
        }
        line.push_str(commit.description().lines().next().unwrap_or_default().trim());
        if let Some(scope) = commit.scope() {
            line.push_str(&format!(" ({})", scope));
        }
        line
    }

    /// Release heading, dated when `date` is given
    pub fn heading(&self, label: &str, date: Option<NaiveDate>) -> String {
        match date {
            Some(date) => format!("## [{}] - {}", label, date.format("%Y-%m-%d")),
            None => format!("## [{}]", label),
        }
    }

    /// Heading of the Unreleased section
    pub fn unreleased_heading(&self) -> String {
        self.heading("Unreleased", None)
    }

    /// Link reference definition
    pub fn link(&self, label: &str, url: &str) -> String {
        format!("[{}]: {}", label, url)
    }

    /// Standalone section, used to preview a release without a changelog file
    #[instrument(skip(self, groups), fields(categories = groups.len()))]
    pub fn format_section(
        &self,
        label: &str,
        date: Option<NaiveDate>,
        groups: &[CategoryGroup],
    ) -> String {
        let mut output = self.heading(label, date);
        output.push_str("\n\n");

        for group in groups.iter().filter(|g| !g.is_empty()) {
            output.push_str(&format!("### {}\n", group.name));
            for entry in &group.entries {
                output.push_str(entry);
                output.push('\n');
            }
            output.push('\n');
        }

        debug!(output_len = output.len(), "markdown section formatted");
        output
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(description: &str, scope: Option<&str>, breaking: bool) -> CommitEntry {
        CommitEntry::conventional(
            "raw",
            "feat",
            scope.map(str::to_string),
            description,
            breaking,
            Some("Added".to_string()),
        )
    }

    #[test]
    fn test_entry() {
        let formatter = MarkdownFormatter::new();

        assert_eq!(formatter.entry(&commit("add X", None, false)), "- add X");
        assert_eq!(formatter.entry(&commit("add X", Some("cli"), false)), "- add X (cli)");
        assert_eq!(
            formatter.entry(&commit("drop old API", Some("api"), true)),
            "- **BREAKING** drop old API (api)"
        );
    }

    #[test]
    fn test_entry_of_multiline_message() {
        let formatter = MarkdownFormatter::new();
        let commit = CommitEntry::other("Update docs\n\nLonger explanation");
        assert_eq!(formatter.entry(&commit), "- Update docs");
    }

    #[test]
    fn test_entry_without_breaking_marker() {
        let formatter = MarkdownFormatter::new().with_mark_breaking(false);
        assert_eq!(formatter.entry(&commit("drop old API", None, true)), "- drop old API");
    }

    #[test]
    fn test_heading() {
        let formatter = MarkdownFormatter::new();
        let date = NaiveDate::from_ymd_opt(2022, 5, 17).unwrap();

        assert_eq!(formatter.heading("1.3.0", Some(date)), "## [1.3.0] - 2022-05-17");
        assert_eq!(formatter.unreleased_heading(), "## [Unreleased]");
    }

    #[test]
    fn test_format_section() {
        let formatter = MarkdownFormatter::new();
        let mut added = CategoryGroup::new("Added");
        added.push("- add X");
        let mut fixed = CategoryGroup::new("Fixed");
        fixed.push("- correct Y");

        let output = formatter.format_section(
            "1.3.0",
            NaiveDate::from_ymd_opt(2022, 5, 17),
            &[added, CategoryGroup::new("Changed"), fixed],
        );

        assert_eq!(
            output,
            "## [1.3.0] - 2022-05-17\n\n### Added\n- add X\n\n### Fixed\n- correct Y\n\n"
        );
    }
}
