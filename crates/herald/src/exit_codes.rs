//! Exit codes for the CLI

use herald_core::error::{ConfigError, GitError};
use herald_core::{ChangelogFormatError, HeraldError, VersionError};

/// General error
pub const ERROR: u8 = 1;

/// Configuration error
pub const CONFIG_ERROR: u8 = 2;

/// Git error
pub const GIT_ERROR: u8 = 3;

/// Version error
pub const VERSION_ERROR: u8 = 4;

/// Malformed changelog
pub const CHANGELOG_ERROR: u8 = 5;

/// Pick the exit code for the first recognised error in the chain
pub fn for_error(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(err) = cause.downcast_ref::<HeraldError>() {
            return match err {
                HeraldError::Config(_) => CONFIG_ERROR,
                HeraldError::Git(_) => GIT_ERROR,
                HeraldError::Version(_) => VERSION_ERROR,
                HeraldError::Changelog(_) => CHANGELOG_ERROR,
                HeraldError::Io(_) => ERROR,
            };
        }
        if cause.is::<ConfigError>() {
            return CONFIG_ERROR;
        }
        if cause.is::<GitError>() {
            return GIT_ERROR;
        }
        if cause.is::<VersionError>() {
            return VERSION_ERROR;
        }
        if cause.is::<ChangelogFormatError>() {
            return CHANGELOG_ERROR;
        }
    }
    ERROR
}
