//! Version command

use clap::Args;
use console::style;
use tracing::info;

use crate::cli::context::{ReleaseArgs, ReleaseContext, ReleasePlan};
use crate::cli::{output, Cli, OutputFormat};

/// Calculate the next version
#[derive(Debug, Args)]
pub struct VersionCommand {
    #[command(flatten)]
    pub release: ReleaseArgs,

    /// Show current version only
    #[arg(long)]
    pub current: bool,

    /// Also show the development version following the release
    #[arg(long)]
    pub next_dev: bool,
}

impl VersionCommand {
    /// Execute the version command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(
            release_type = ?self.release.release_type,
            release_version = ?self.release.release_version,
            current = self.current,
            next_dev = self.next_dev,
            "executing version command"
        );
        let ctx = ReleaseContext::load(cli)?;

        if self.current {
            let current = ctx.latest_release()?.map(|(_, v)| v.to_string());
            return self.output_current(current.as_deref(), cli);
        }

        let plan = ctx.plan(&self.release, None)?;
        let next_dev = if self.next_dev {
            Some(ctx.resolver.next_dev_version(&plan.next)?.to_string())
        } else {
            None
        };

        self.output_result(&ctx, &plan, next_dev.as_deref(), cli)
    }

    fn output_current(&self, version: Option<&str>, cli: &Cli) -> anyhow::Result<()> {
        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "current": version
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => match version {
                Some(version) => println!("{}", version),
                None if !cli.quiet => output::warning("No release tag found"),
                None => {}
            },
        }
        Ok(())
    }

    fn output_result(
        &self,
        ctx: &ReleaseContext,
        plan: &ReleasePlan,
        next_dev: Option<&str>,
        cli: &Cli,
    ) -> anyhow::Result<()> {
        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "scheme": ctx.resolver.scheme(),
                    "current": plan.current.to_string(),
                    "next": plan.next.to_string(),
                    "next_dev": next_dev,
                    "tag": ctx.tag_name(&plan.next),
                    "directive": plan.directive.to_string(),
                    "commits": plan.commits.len()
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    println!("{}", output::header("Version Calculation"));
                    println!();
                    println!("  Scheme:           {}", ctx.resolver.scheme());
                    println!("  Current version:  {}", style(&plan.current).cyan());
                    println!("  Next version:     {}", output::version_style().apply_to(&plan.next));
                    if let Some(dev) = next_dev {
                        println!("  Next dev version: {}", style(dev).dim());
                    }
                    println!("  Release:          {}", style(&plan.directive).yellow());
                    println!("  Commits analyzed: {}", plan.commits.len());
                } else {
                    println!("{}", plan.next);
                }
            }
        }
        Ok(())
    }
}
