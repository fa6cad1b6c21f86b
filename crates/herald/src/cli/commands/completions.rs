//! Completions command

use std::path::PathBuf;

use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use tracing::info;

use crate::cli::{files, output, Cli};

/// Print or install a completion script for `herald`
#[derive(Debug, Args)]
pub struct CompletionsCommand {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,

    /// Write the script to this file, relative to `-C`
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl CompletionsCommand {
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(shell = %self.shell, "executing completions command");
        let script = script(self.shell)?;

        match &self.output {
            Some(path) => {
                let path = cli.resolve_path(path)?;
                files::write_atomic(&path, &script)?;
                if !cli.quiet {
                    output::success(&format!(
                        "{} completions written to {}",
                        self.shell,
                        output::path_style().apply_to(path.display())
                    ));
                }
            }
            None => print!("{}", script),
        }

        Ok(())
    }
}

/// Completion script of the `herald` command for `shell`
fn script(shell: Shell) -> anyhow::Result<String> {
    let mut buf = Vec::new();
    generate(shell, &mut Cli::command(), "herald", &mut buf);
    Ok(String::from_utf8(buf)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_shell_is_parsed_from_name() {
        let cli = Cli::try_parse_from(["herald", "completions", "powershell"]).unwrap();
        let crate::cli::Commands::Completions(cmd) = cli.command else {
            panic!("expected completions command");
        };
        assert_eq!(cmd.shell, Shell::PowerShell);
    }

    #[test]
    fn test_script_covers_subcommands() {
        let script = script(Shell::Bash).unwrap();
        assert!(script.contains("herald"));
        assert!(script.contains("changelog"));
    }

    #[test]
    fn test_write_to_output_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from([
            "herald",
            "-q",
            "-C",
            dir.path().to_str().unwrap(),
            "completions",
            "zsh",
            "-o",
            "_herald",
        ])
        .unwrap();

        cli.execute().unwrap();
        let written = std::fs::read_to_string(dir.path().join("_herald")).unwrap();
        assert!(written.contains("herald"));
    }
}
