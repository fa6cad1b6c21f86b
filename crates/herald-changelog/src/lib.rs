//! Herald Changelog - Commit classification and changelog editing
//!
//! This crate classifies conventional commit messages and rewrites
//! Keep-a-Changelog style documents, leaving untouched lines byte-identical.

pub mod document;
pub mod editor;
pub mod formatter;
pub mod parser;
pub mod types;

pub use document::{CategoryBlock, ChangelogDocument, ReleaseSection, SectionHeading};
pub use editor::{ChangelogEditor, EditorOptions};
pub use formatter::MarkdownFormatter;
pub use parser::{classify, CategoryConfig, ConventionalParser};
pub use types::{CategoryGroup, CATEGORY_ORDER};
