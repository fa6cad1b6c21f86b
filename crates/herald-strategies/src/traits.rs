//! Version strategy traits

use std::cmp::Ordering;

use chrono::NaiveDate;
use herald_core::types::{CommitEntry, VersioningScheme};
use herald_core::VersionError;

use crate::types::{BumpType, Version};
use crate::Result;

/// Trait for version strategies
pub trait VersionStrategy: Send + Sync {
    /// Get the name of this strategy
    fn name(&self) -> &'static str;

    /// Scheme of the versions this strategy produces
    fn scheme(&self) -> VersioningScheme;

    /// Parse a version string, with or without a leading `v`
    fn parse(&self, version: &str) -> Result<Version>;

    /// Bump the version according to the bump type
    ///
    /// `today` anchors calendar based bumps.
    fn bump(&self, current: &Version, bump_type: BumpType, today: NaiveDate) -> Result<Version>;

    /// Derive the development version following `current`
    fn next_dev(&self, current: &Version) -> Result<Version>;

    /// Determine the bump type from classified commits
    fn determine_bump_type(&self, commits: &[CommitEntry]) -> BumpType {
        if commits.iter().any(CommitEntry::is_breaking) {
            BumpType::Major
        } else if commits.iter().any(CommitEntry::is_feature) {
            BumpType::Minor
        } else {
            BumpType::Patch
        }
    }

    /// Check if a version string is valid for this strategy
    fn is_valid(&self, version: &str) -> bool {
        self.parse(version).is_ok()
    }

    /// Compare two version strings
    fn compare(&self, a: &str, b: &str) -> Result<Ordering> {
        self.parse(a)?.try_cmp(&self.parse(b)?)
    }

    /// Error for a bump this strategy cannot perform
    fn unsupported(&self, bump_type: BumpType) -> VersionError {
        VersionError::UnsupportedDirective {
            directive: bump_type.to_string(),
            scheme: self.scheme().to_string(),
        }
    }
}
