//! CLI definition and command handling

pub mod commands;
pub mod context;
pub mod files;
pub mod output;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use commands::{
    ChangelogCommand, CompletionsCommand, InitCommand, ReleaseCommand, StatusCommand,
    ValidateCommand, VersionCommand,
};

/// Herald - Changelog and version engine
#[derive(Debug, Parser)]
#[command(name = "herald")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Initialize a new Herald configuration
    Init(InitCommand),

    /// Calculate the next version
    Version(VersionCommand),

    /// Update the changelog for the next release
    Changelog(ChangelogCommand),

    /// Release the next version: changelog, commit and tag
    Release(ReleaseCommand),

    /// Show repository status
    Status(StatusCommand),

    /// Validate configuration, changelog and repository state
    Validate(ValidateCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(&self) -> anyhow::Result<()> {
        match &self.command {
            Commands::Init(cmd) => cmd.execute(self),
            Commands::Version(cmd) => cmd.execute(self),
            Commands::Changelog(cmd) => cmd.execute(self),
            Commands::Release(cmd) => cmd.execute(self),
            Commands::Status(cmd) => cmd.execute(self),
            Commands::Validate(cmd) => cmd.execute(self),
            Commands::Completions(cmd) => cmd.execute(self),
        }
    }

    /// Directory the command runs against: `-C` or the process working directory
    pub fn working_dir(&self) -> anyhow::Result<PathBuf> {
        let cwd = std::env::current_dir()?;
        Ok(match &self.directory {
            Some(dir) => cwd.join(dir),
            None => cwd,
        })
    }

    /// Resolve a path given on the command line against [`Cli::working_dir`]
    pub fn resolve_path(&self, path: &Path) -> anyhow::Result<PathBuf> {
        Ok(self.working_dir()?.join(path))
    }
}
