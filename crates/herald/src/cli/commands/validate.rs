//! Validate command

use clap::Args;
use console::style;
use tracing::info;

use herald_changelog::{CategoryConfig, ChangelogDocument};
use herald_core::config::{find_config, load_config, Config};
use herald_git::GitRepo;
use herald_strategies::VersionResolver;

use crate::cli::{files, Cli, OutputFormat};

/// Validate configuration, changelog and repository state
#[derive(Debug, Args)]
pub struct ValidateCommand {
    /// Only validate configuration file
    #[arg(long)]
    pub config_only: bool,

    /// Strict mode - treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

impl ValidateCommand {
    /// Execute the validate command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(
            config_only = self.config_only,
            strict = self.strict,
            "executing validate command"
        );
        let cwd = cli.working_dir()?;

        let mut errors: Vec<String> = Vec::new();
        let mut warnings: Vec<String> = Vec::new();

        // Validate configuration
        let config_path = find_config(&cwd);
        let config = match &config_path {
            Some(path) => match load_config(path) {
                Ok(config) => Some(config),
                Err(e) => {
                    errors.push(format!("Configuration: {}", e));
                    None
                }
            },
            None => {
                warnings.push("No configuration file found, defaults apply".to_string());
                Some(Config::default())
            }
        };

        if let Some(cfg) = &config {
            if let Err(e) = CategoryConfig::from_config(&cfg.changelog) {
                errors.push(format!("Categories: {}", e));
            }
        }

        if !self.config_only {
            match GitRepo::discover(&cwd) {
                Ok(repo) => {
                    match repo.is_clean() {
                        Ok(false) => {
                            warnings.push("Working directory has uncommitted changes".to_string());
                        }
                        Err(e) => {
                            errors.push(format!("Git status check: {}", e));
                        }
                        _ => {}
                    }

                    if let Some(cfg) = &config {
                        match repo.current_branch() {
                            Ok(Some(branch)) => {
                                if branch != cfg.git.branch {
                                    warnings.push(format!(
                                        "Not on release branch '{}', currently on '{}'",
                                        cfg.git.branch, branch
                                    ));
                                }
                            }
                            Ok(None) => {
                                warnings.push("HEAD is detached or has no commits".to_string());
                            }
                            Err(e) => {
                                errors.push(format!("Branch check: {}", e));
                            }
                        }

                        // Release tags must parse in the configured scheme
                        let resolver = VersionResolver::from_config(&cfg.versioning);
                        let prefix = &cfg.versioning.tag_prefix;
                        match repo.find_latest_tag(prefix, |v| resolver.parse(v).ok()) {
                            Ok(Some(_)) => {}
                            Ok(None) => {
                                warnings.push(format!(
                                    "No {} release tag with prefix '{}' found",
                                    resolver.scheme(),
                                    prefix
                                ));
                            }
                            Err(e) => {
                                errors.push(format!("Tag check: {}", e));
                            }
                        }

                        let changelog_path = repo.path().join(&cfg.changelog.file);
                        match files::read_optional(&changelog_path) {
                            Ok(Some(text)) => {
                                if let Err(e) = ChangelogDocument::parse(&text) {
                                    errors.push(format!(
                                        "Changelog {}: {}",
                                        cfg.changelog.file.display(),
                                        e
                                    ));
                                }
                            }
                            Ok(None) => {
                                warnings.push(format!(
                                    "Changelog {} does not exist yet",
                                    cfg.changelog.file.display()
                                ));
                            }
                            Err(e) => {
                                errors.push(format!("Changelog: {:#}", e));
                            }
                        }
                    }
                }
                Err(e) => {
                    errors.push(format!("Git repository: {}", e));
                }
            }
        }

        // If strict, promote warnings to errors
        if self.strict {
            errors.append(&mut warnings);
        }

        let passed = errors.is_empty();

        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "valid": passed,
                    "config_path": config_path.as_ref().map(|p| p.to_string_lossy().to_string()),
                    "errors": errors,
                    "warnings": warnings
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    println!("{}", style("Validation Results").bold());
                    println!();

                    if let Some(path) = &config_path {
                        println!("Config: {}", style(path.display()).cyan());
                        println!();
                    }

                    if !errors.is_empty() {
                        println!("{}", style("Errors:").red().bold());
                        for error in &errors {
                            println!("  {} {}", style("✗").red(), error);
                        }
                        println!();
                    }

                    if !warnings.is_empty() {
                        println!("{}", style("Warnings:").yellow().bold());
                        for warning in &warnings {
                            println!("  {} {}", style("!").yellow(), warning);
                        }
                        println!();
                    }

                    if passed {
                        if warnings.is_empty() {
                            println!("{}", style("✓ All checks passed").green().bold());
                        } else {
                            println!(
                                "{} with {} warning(s)",
                                style("✓ Validation passed").green().bold(),
                                warnings.len()
                            );
                        }
                    }
                }
            }
        }

        if !passed {
            anyhow::bail!("Validation failed with {} error(s)", errors.len());
        }

        Ok(())
    }
}
