//! Changelog formatters

mod markdown;

pub use markdown::MarkdownFormatter;
