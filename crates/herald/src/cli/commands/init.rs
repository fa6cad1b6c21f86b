//! Init command

use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use dialoguer::{Confirm, Select};
use tracing::info;

use herald_core::config::{Config, DEFAULT_CONFIG_TEMPLATE, DEFAULT_CONFIG_TOML};

use crate::cli::{files, output, Cli};

/// Initialize a new Herald configuration
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,

    /// Use defaults without prompting
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl InitCommand {
    /// Execute the init command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(force = self.force, yes = self.yes, "executing init command");
        let cwd = cli.working_dir()?;
        let config_path = cwd.join(self.output.as_deref().unwrap_or(Path::new(DEFAULT_CONFIG_TOML)));

        // Check if config already exists
        if config_path.exists() && !self.force {
            if self.yes {
                anyhow::bail!(
                    "Configuration file already exists at {}. Use --force to overwrite.",
                    config_path.display()
                );
            }

            let overwrite = Confirm::new()
                .with_prompt(format!(
                    "Configuration file already exists at {}. Overwrite?",
                    config_path.display()
                ))
                .default(false)
                .interact()?;

            if !overwrite {
                println!("{}", style("Aborted.").yellow());
                return Ok(());
            }
        }

        // Choose format if not specified
        let format = if self.yes {
            "toml"
        } else {
            let formats = ["toml", "yaml"];
            let selection = Select::new()
                .with_prompt("Configuration format")
                .items(&formats)
                .default(0)
                .interact()?;
            formats[selection]
        };

        let config_path = if format == "yaml" && config_path.extension().is_some_and(|e| e == "toml") {
            config_path.with_extension("yaml")
        } else {
            config_path
        };

        let content = render_config(format)?;
        files::write_atomic(&config_path, &content)?;

        // Start a changelog next to the configuration
        let config: Config = toml::from_str(DEFAULT_CONFIG_TEMPLATE)?;
        let changelog_path = config_path
            .parent()
            .map(|dir| dir.join(&config.changelog.file))
            .unwrap_or_else(|| config.changelog.file.clone());
        let created_changelog = if changelog_path.exists() {
            false
        } else {
            files::write_atomic(&changelog_path, &config.changelog.header)?;
            true
        };

        if !cli.quiet {
            output::success(&format!(
                "Created configuration at {}",
                output::path_style().apply_to(config_path.display())
            ));
            if created_changelog {
                output::success(&format!(
                    "Created {}",
                    output::path_style().apply_to(changelog_path.display())
                ));
            }
            println!();
            println!("Next steps:");
            println!("  1. Edit {} to customize versioning and categories", config_path.display());
            println!("  2. Run {} to verify your setup", style("herald validate").cyan());
            println!("  3. Run {} to preview the next release", style("herald changelog --preview").cyan());
        }

        Ok(())
    }
}

/// Configuration file content in the chosen format
fn render_config(format: &str) -> anyhow::Result<String> {
    if format == "yaml" {
        let config: Config = toml::from_str(DEFAULT_CONFIG_TEMPLATE)?;
        Ok(serde_yaml::to_string(&config)?)
    } else {
        Ok(DEFAULT_CONFIG_TEMPLATE.to_string())
    }
}
