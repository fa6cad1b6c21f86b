//! Error types for Herald

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using HeraldError
pub type Result<T> = std::result::Result<T, HeraldError>;

/// Main error type for Herald operations
#[derive(Debug, Error)]
pub enum HeraldError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Git-related errors
    #[error(transparent)]
    Git(#[from] GitError),

    /// Version-related errors
    #[error(transparent)]
    Version(#[from] VersionError),

    /// Malformed changelog document
    #[error(transparent)]
    Changelog(#[from] ChangelogFormatError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Git-related errors
#[derive(Debug, Error)]
pub enum GitError {
    /// Repository not found
    #[error("Git repository not found at {0}")]
    RepositoryNotFound(PathBuf),

    /// Not a git repository
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    /// Failed to open repository
    #[error("Failed to open repository: {0}")]
    OpenFailed(String),

    /// No commits found
    #[error("No commits found in repository")]
    NoCommits,

    /// Tag already exists
    #[error("Tag already exists: {0}")]
    TagExists(String),

    /// Working directory is not clean
    #[error("Working directory has uncommitted changes")]
    DirtyWorkingDirectory,

    /// Git2 library error
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),
}

/// Version-related errors
#[derive(Debug, Error)]
pub enum VersionError {
    /// Failed to parse version
    #[error("Failed to parse version '{0}': {1}")]
    ParseFailed(String, String),

    /// Invalid version format
    #[error("Invalid version format: {0}")]
    InvalidFormat(String),

    /// Explicit release version does not move forward
    #[error("Release version '{target}' is not greater than current version '{current}'")]
    NotIncreasing { current: String, target: String },

    /// Version belongs to another scheme than the active one
    #[error("Version '{version}' is not a {expected} version")]
    SchemeMismatch { version: String, expected: String },

    /// Directive cannot be applied under the active scheme
    #[error("Cannot apply a {directive} release with the {scheme} versioning scheme")]
    UnsupportedDirective { directive: String, scheme: String },

    /// Calendar version lies after the current month
    #[error("'{current}' is higher than the calendar period '{period}'")]
    CalendarRegression { current: String, period: String },

    /// Comparison between two different schemes
    #[error("Cannot compare {left} version '{a}' with {right} version '{b}'")]
    IncomparableSchemes {
        a: String,
        left: String,
        b: String,
        right: String,
    },
}

/// Structural errors found while parsing a changelog document
///
/// Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChangelogFormatError {
    /// A heading level that has no place at this position
    #[error("line {line}: unexpected level {level} heading '{text}'")]
    UnexpectedHeading {
        line: usize,
        level: usize,
        text: String,
    },

    /// A release heading that does not name a version or Unreleased
    #[error("line {line}: malformed release heading '{text}'")]
    MalformedHeading { line: usize, text: String },

    /// A release date that is not an ISO date
    #[error("line {line}: invalid release date '{date}'")]
    InvalidDate { line: usize, date: String },

    /// A link reference definition without a usable target
    #[error("line {line}: malformed link reference '{text}'")]
    MalformedLink { line: usize, text: String },

    /// A second Unreleased section
    #[error("line {line}: duplicate Unreleased section")]
    DuplicateUnreleased { line: usize },

    /// An Unreleased section after a released one
    #[error("line {line}: Unreleased section must be the first section")]
    UnreleasedNotFirst { line: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_error_wraps() {
        let err: HeraldError = VersionError::InvalidFormat("x".to_string()).into();
        assert!(matches!(err, HeraldError::Version(_)));
        assert_eq!(err.to_string(), "Invalid version format: x");
    }

    #[test]
    fn test_changelog_error_message_has_line() {
        let err = ChangelogFormatError::MalformedLink {
            line: 7,
            text: "[1.0.0]:".to_string(),
        };
        assert_eq!(err.to_string(), "line 7: malformed link reference '[1.0.0]:'");
    }
}
