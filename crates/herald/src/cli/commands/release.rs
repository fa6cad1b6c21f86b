//! Release command

use std::path::Path;

use chrono::NaiveDate;
use clap::Args;
use console::style;
use dialoguer::Confirm;
use tracing::{info, warn};

use herald_core::error::GitError;

use crate::cli::context::{ReleaseArgs, ReleaseContext};
use crate::cli::{files, output, Cli, OutputFormat};

/// Release the next version
#[derive(Debug, Args)]
pub struct ReleaseCommand {
    #[command(flatten)]
    pub release: ReleaseArgs,

    /// Release date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Release even with uncommitted changes
    #[arg(long)]
    pub allow_dirty: bool,

    /// Commit the changelog but do not create a tag
    #[arg(long)]
    pub no_tag: bool,

    /// Dry run - don't make any changes
    #[arg(long)]
    pub dry_run: bool,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

impl ReleaseCommand {
    /// Execute the release command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(
            release_type = ?self.release.release_type,
            release_version = ?self.release.release_version,
            dry_run = self.dry_run,
            no_tag = self.no_tag,
            "executing release command"
        );
        let ctx = ReleaseContext::load(cli)?;
        let root = ctx.repo.path().to_path_buf();
        let changelog_path = ctx.changelog_path();
        let notes_path = ctx.release_notes_path();

        // Release notes of an earlier run do not make the tree dirty
        if ctx.config.git.require_clean && !self.allow_dirty && !self.dry_run {
            let notes_rel = notes_path.strip_prefix(&root).unwrap_or(&notes_path);
            let dirty = ctx
                .repo
                .changed_files()?
                .into_iter()
                .any(|file| Path::new(&file) != notes_rel);
            if dirty {
                return Err(GitError::DirtyWorkingDirectory.into());
            }
        }

        if let Some(branch) = ctx.repo.current_branch()? {
            if branch != ctx.config.git.branch && !cli.quiet && cli.format == OutputFormat::Text {
                warn!(branch = %branch, expected = %ctx.config.git.branch, "not on release branch");
                output::warning(&format!(
                    "Not on release branch '{}' (current: '{}')",
                    ctx.config.git.branch, branch
                ));
            }
        }

        let plan = ctx.plan(&self.release, self.date)?;
        let version = plan.next.to_string();
        let tag = ctx.tag_name(&plan.next);

        if ctx.repo.find_tag(&tag)?.is_some() {
            return Err(GitError::TagExists(tag).into());
        }

        // Everything that can fail on content is computed before writing
        let doc = ctx.updated_changelog(&plan)?;
        let notes = doc
            .section(&version)
            .map(|section| section.render())
            .unwrap_or_default();
        let next_dev = ctx.resolver.next_dev_version(&plan.next)?;

        if !cli.quiet && cli.format == OutputFormat::Text {
            println!("{}", output::header("Release Preview"));
            println!();
            println!("{}", output::key_value("Current version", &plan.current.to_string()));
            println!(
                "{}",
                output::key_value("Next version", &output::version_style().apply_to(&version).to_string())
            );
            println!(
                "{}",
                output::key_value("Tag", &output::tag_style().apply_to(&tag).to_string())
            );
            println!("{}", output::key_value("Commits", &plan.commits.len().to_string()));
            println!();

            if self.dry_run {
                println!("  {}", style("[DRY RUN - no changes will be made]").yellow().bold());
                println!();
                print!("{}", notes);
                println!();
            }
        }

        if !self.yes && !self.dry_run && cli.format == OutputFormat::Text {
            let confirmed = Confirm::new()
                .with_prompt(format!("Release {}?", version))
                .default(true)
                .interact()?;

            if !confirmed {
                println!("{}", style("Aborted.").yellow());
                return Ok(());
            }
        }

        let mut commit_hash = None;
        if !self.dry_run {
            files::write_atomic(&changelog_path, &doc.to_string())?;
            files::write_atomic(&notes_path, &notes)?;

            let changelog_rel = changelog_path.strip_prefix(&root).unwrap_or(&changelog_path);
            let commit = ctx
                .repo
                .commit_files(&[changelog_rel], &format!("chore(release): {}", version))?;
            commit_hash = Some(commit.short_hash.clone());

            if !self.no_tag {
                ctx.repo.create_tag(&tag, &format!("Release {}", version))?;
            }
            info!(version = %version, tag = %tag, "released");
        }

        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "version": version,
                    "previous": plan.latest_tag.as_ref().map(|t| &t.name),
                    "tag": (!self.no_tag).then_some(&tag),
                    "commit": commit_hash,
                    "date": plan.date,
                    "next_dev": next_dev.to_string(),
                    "release_notes": notes,
                    "dry_run": self.dry_run
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    if self.dry_run {
                        output::success(&format!(
                            "Dry run complete. Version {} would be released.",
                            output::version_style().apply_to(&version)
                        ));
                    } else {
                        output::success(&format!(
                            "Updated {}",
                            output::path_style().apply_to(changelog_path.display())
                        ));
                        output::success(&format!(
                            "Release notes written to {}",
                            output::path_style().apply_to(notes_path.display())
                        ));
                        if !self.no_tag {
                            output::success(&format!(
                                "Created tag {}",
                                output::tag_style().apply_to(&tag)
                            ));
                        }
                        output::success(&format!(
                            "Released version {}",
                            output::version_style().apply_to(&version)
                        ));
                    }
                    output::info(&format!("Next development version: {}", style(&next_dev).dim()));
                } else {
                    println!("{}", version);
                }
            }
        }

        Ok(())
    }
}
