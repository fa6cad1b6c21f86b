//! Herald Strategies - Version schemes for release automation
//!
//! This crate provides the semantic and calendar versioning strategies and the
//! resolver that derives the next release version from classified commits.

mod calver;
mod resolver;
mod semver;
mod traits;
pub mod types;

pub use calver::CalVerStrategy;
pub use resolver::VersionResolver;
pub use self::semver::SemVerStrategy;
pub use traits::VersionStrategy;
pub use types::{BumpType, Directive, PreRelease, PreReleaseKind, Version};

/// Result type for version operations
pub type Result<T> = std::result::Result<T, herald_core::VersionError>;
