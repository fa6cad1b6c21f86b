//! Herald Git - Git operations for release automation
//!
//! This crate provides the repository handle Herald reads commit history,
//! release tags and working tree status from.

mod commits;
mod repository;
mod status;
mod tags;
pub mod types;

pub use repository::{GitRepo, Result};
pub use types::{CommitInfo, TagInfo};
