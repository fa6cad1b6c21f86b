//! Configuration validation

use regex::Regex;
use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::Config;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_versioning(config)?;
    validate_git(config)?;
    validate_changelog(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_versioning(config: &Config) -> Result<()> {
    if config.versioning.tag_prefix.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidValue {
            field: "versioning.tag_prefix".to_string(),
            message: "must not contain whitespace".to_string(),
        }
        .into());
    }

    Ok(())
}

fn validate_git(config: &Config) -> Result<()> {
    if config.git.branch.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "git.branch".to_string(),
            message: "branch cannot be empty".to_string(),
        }
        .into());
    }

    Ok(())
}

fn validate_changelog(config: &Config) -> Result<()> {
    let valid_formats = ["markdown", "md"];
    if !valid_formats.contains(&config.changelog.format.as_str()) {
        return Err(ConfigError::InvalidValue {
            field: "changelog.format".to_string(),
            message: format!("must be one of: {}", valid_formats.join(", ")),
        }
        .into());
    }

    for (i, rule) in config.changelog.categories.iter().enumerate() {
        if rule.category.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: format!("changelog.categories[{}].category", i),
                message: "category cannot be empty".to_string(),
            }
            .into());
        }

        if let Err(e) = Regex::new(&rule.pattern) {
            return Err(ConfigError::InvalidValue {
                field: format!("changelog.categories[{}].pattern", i),
                message: e.to_string(),
            }
            .into());
        }
    }

    if let Some(catch_all) = &config.changelog.catch_all {
        if catch_all.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "changelog.catch_all".to_string(),
                message: "catch-all category cannot be empty".to_string(),
            }
            .into());
        }
    }

    if let Some(url) = &config.changelog.compare_url {
        if url.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidValue {
                field: "changelog.compare_url".to_string(),
                message: "must not contain whitespace".to_string(),
            }
            .into());
        }
    }

    Ok(())
}
