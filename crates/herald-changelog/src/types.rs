//! Changelog types

use serde::{Deserialize, Serialize};

/// Fixed order of the Keep-a-Changelog categories inside a release section
pub const CATEGORY_ORDER: [&str; 6] = ["Added", "Changed", "Deprecated", "Removed", "Fixed", "Security"];

/// Rendered entry lines of one category, without line terminators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroup {
    /// Category heading, e.g. "Added"
    pub name: String,
    /// Entry lines, e.g. "- add X (cli)"
    pub entries: Vec<String>,
}

impl CategoryGroup {
    /// Create an empty group
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Add an entry line unless the group already holds it
    pub fn push(&mut self, entry: impl Into<String>) {
        let entry = entry.into();
        if !self.entries.contains(&entry) {
            self.entries.push(entry);
        }
    }

    /// Check if group is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Position of a category in the canonical order, `None` for other categories
pub fn category_rank(name: &str) -> Option<usize> {
    CATEGORY_ORDER
        .iter()
        .position(|c| c.eq_ignore_ascii_case(name.trim()))
}
