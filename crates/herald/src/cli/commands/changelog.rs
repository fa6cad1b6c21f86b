//! Changelog command

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use console::style;
use tracing::info;

use crate::cli::context::{ReleaseArgs, ReleaseContext};
use crate::cli::{files, output, Cli, OutputFormat};

/// Update the changelog for the next release
#[derive(Debug, Args)]
pub struct ChangelogCommand {
    #[command(flatten)]
    pub release: ReleaseArgs,

    /// Release date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Only show the section the release would add
    #[arg(long, conflicts_with_all = ["write", "output"])]
    pub preview: bool,

    /// Write the configured changelog file (default: print to stdout)
    #[arg(short, long)]
    pub write: bool,

    /// Write the updated changelog to this file instead
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write the release notes of the new version to this file
    #[arg(long, value_name = "PATH")]
    pub release_notes: Option<PathBuf>,
}

impl ChangelogCommand {
    /// Execute the changelog command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(
            release_type = ?self.release.release_type,
            release_version = ?self.release.release_version,
            preview = self.preview,
            write = self.write,
            "executing changelog command"
        );
        let ctx = ReleaseContext::load(cli)?;
        let plan = ctx.plan(&self.release, self.date)?;

        if plan.commits.is_empty() && !cli.quiet && cli.format == OutputFormat::Text {
            output::warning("No commits found since last release.");
        }

        let editor = ctx.editor();

        if self.preview {
            match cli.format {
                OutputFormat::Json => {
                    let output = serde_json::json!({
                        "version": plan.next.to_string(),
                        "date": plan.date,
                        "categories": editor.group(&plan.entries)
                    });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                OutputFormat::Text => {
                    print!("{}", editor.preview(&plan.next.to_string(), plan.date, &plan.entries));
                }
            }
            return Ok(());
        }

        // Fails on a malformed changelog before anything is written
        let doc = ctx.updated_changelog(&plan)?;
        let version = plan.next.to_string();
        let notes = doc
            .section(&version)
            .map(|section| section.render())
            .unwrap_or_default();

        let destination = match (&self.output, self.write) {
            (Some(path), _) => Some(cli.resolve_path(path)?),
            (None, true) => Some(ctx.changelog_path()),
            (None, false) => None,
        };

        if let Some(path) = &destination {
            files::write_atomic(path, &doc.to_string())?;
        }
        if let Some(path) = &self.release_notes {
            files::write_atomic(&cli.resolve_path(path)?, &notes)?;
        }

        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "version": version,
                    "date": plan.date,
                    "written": destination.as_ref().map(|p| p.display().to_string()),
                    "release_notes": notes
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => match &destination {
                Some(path) => {
                    if !cli.quiet {
                        output::success(&format!(
                            "Changelog for {} written to {}",
                            output::version_style().apply_to(&version),
                            output::path_style().apply_to(path.display())
                        ));
                    }
                }
                None => print!("{}", doc),
            },
        }

        if let Some(path) = &self.release_notes {
            if !cli.quiet && cli.format == OutputFormat::Text {
                println!(
                    "{} Release notes written to {}",
                    style("✓").green(),
                    style(path.display()).cyan()
                );
            }
        }

        Ok(())
    }
}
