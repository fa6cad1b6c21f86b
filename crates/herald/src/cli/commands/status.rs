//! Status command

use clap::Args;
use console::style;
use tracing::info;

use crate::cli::context::{ReleaseArgs, ReleaseContext};
use crate::cli::{Cli, OutputFormat};

/// Show repository status
#[derive(Debug, Default, Args)]
pub struct StatusCommand {}

impl StatusCommand {
    /// Execute the status command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!("executing status command");
        let ctx = ReleaseContext::load(cli)?;

        // Gather status information
        let is_clean = ctx.repo.is_clean()?;
        let current_branch = ctx.repo.current_branch()?;
        let changelog_exists = ctx.changelog_path().exists();

        // An unresolvable next version is reported, not fatal
        let plan = ctx.plan(&ReleaseArgs::default(), None);
        let (latest_tag, current, commits_since, next) = match &plan {
            Ok(plan) => (
                plan.latest_tag.as_ref().map(|t| t.name.clone()),
                Some(plan.current.to_string()),
                plan.commits.len(),
                Ok(plan.next.to_string()),
            ),
            Err(e) => (None, None, 0, Err(format!("{:#}", e))),
        };

        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "config_found": ctx.config_path.is_some(),
                    "config_path": ctx.config_path.as_ref().map(|p| p.to_string_lossy().to_string()),
                    "scheme": ctx.resolver.scheme(),
                    "changelog": {
                        "path": ctx.changelog_path().to_string_lossy().to_string(),
                        "exists": changelog_exists
                    },
                    "git": {
                        "clean": is_clean,
                        "branch": current_branch,
                        "latest_tag": latest_tag,
                        "current_version": current,
                        "commits_since_tag": commits_since
                    },
                    "next_version": next.as_ref().ok(),
                    "error": next.as_ref().err()
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                println!("{}", style("Herald Status").bold());
                println!();

                // Configuration
                println!("{}", style("Configuration").underlined());
                if let Some(path) = &ctx.config_path {
                    println!("  Config file: {}", style(path.display()).cyan());
                } else {
                    println!(
                        "  Config file: {} (using defaults)",
                        style("not found").yellow()
                    );
                }
                println!("  Scheme:      {}", ctx.resolver.scheme());
                let changelog_status = if changelog_exists {
                    style("present").green()
                } else {
                    style("missing").yellow()
                };
                println!(
                    "  Changelog:   {} ({})",
                    style(ctx.config.changelog.file.display()).cyan(),
                    changelog_status
                );
                println!();

                // Git status
                println!("{}", style("Git").underlined());
                if let Some(branch) = &current_branch {
                    let branch_status = if *branch == ctx.config.git.branch {
                        style(branch).green()
                    } else {
                        style(branch).yellow()
                    };
                    println!("  Branch:      {}", branch_status);
                }

                let clean_status = if is_clean {
                    style("clean").green()
                } else {
                    style("dirty").red()
                };
                println!("  Status:      {}", clean_status);

                match &latest_tag {
                    Some(tag) => println!("  Latest tag:  {}", style(tag).cyan()),
                    None => println!("  Latest tag:  {}", style("none").dim()),
                }
                if let Some(version) = &current {
                    println!("  Version:     {}", style(version).green().bold());
                }
                println!("  Commits since: {}", commits_since);
                println!();

                // Readiness
                println!("{}", style("Release Readiness").underlined());
                match &next {
                    Ok(version) => println!("  Next version: {}", style(version).green().bold()),
                    Err(e) => println!("  {} {}", style("✗").red(), e),
                }

                let mut issues = Vec::new();
                if !is_clean && ctx.config.git.require_clean {
                    issues.push("Working directory has uncommitted changes".to_string());
                }
                if let Some(branch) = &current_branch {
                    if *branch != ctx.config.git.branch {
                        issues.push(format!("Not on release branch '{}'", ctx.config.git.branch));
                    }
                }
                if commits_since == 0 && next.is_ok() {
                    issues.push("No commits since last release".to_string());
                }

                if issues.is_empty() && next.is_ok() {
                    println!("  {}", style("✓ Ready to release").green().bold());
                } else {
                    for issue in issues {
                        println!("  {} {}", style("✗").red(), issue);
                    }
                }
            }
        }

        Ok(())
    }
}
