//! Herald Core - Core library for release automation
//!
//! This crate provides the shared types, error handling and configuration
//! used by the Herald commit classifier, version resolver and changelog editor.

pub mod config;
pub mod error;
pub mod types;

pub use error::{ChangelogFormatError, HeraldError, Result, VersionError};
pub use types::{CommitEntry, CommitKind, VersioningScheme};
