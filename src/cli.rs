//! Command-line interface module for desktidy.
//!
//! Parses arguments, wires the console and log-file reporters together,
//! runs the organizer, and prints the final statistics.

use crate::config::{OrganizerConfig, default_target_dir};
use crate::file_organizer::{FileOrganizer, OrganizeError, RunStats};
use crate::output::{ConsoleReporter, FileReporter, Reporter, TeeReporter, print_summary_table};
use clap::Parser;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Sort the files of a directory into category folders.
#[derive(Debug, Clone, Parser)]
#[command(name = "desktidy", version, about)]
pub struct Cli {
    /// Directory to organize [default: ~/Desktop]
    pub directory: Option<PathBuf>,

    /// Show what would be moved without touching any file
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run statistics as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Where to write the run log [default: current directory]
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

/// Errors surfaced by the command-line layer.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("could not determine the home directory; pass a directory explicitly")]
    NoHomeDirectory,
    #[error("could not create log file in {}: {source}", dir.display())]
    LogFile { dir: PathBuf, source: io::Error },
    #[error(transparent)]
    Organize(#[from] OrganizeError),
    #[error("could not serialize run statistics: {0}")]
    Json(#[from] serde_json::Error),
}

impl Cli {
    /// The directory to organize, falling back to the user's desktop.
    pub fn target(&self) -> Result<PathBuf, CliError> {
        match &self.directory {
            Some(dir) => Ok(dir.clone()),
            None => default_target_dir().ok_or(CliError::NoHomeDirectory),
        }
    }

    pub fn config(&self) -> OrganizerConfig {
        OrganizerConfig::default().with_dry_run(self.dry_run)
    }
}

/// Runs desktidy as the binary does: console plus a timestamped log file.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use desktidy::cli::{Cli, run_cli};
///
/// let cli = Cli::parse_from(["desktidy", "/path/to/directory", "--dry-run"]);
/// match run_cli(&cli) {
///     Ok(stats) => println!("{} files would move", stats.moved),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(cli: &Cli) -> Result<RunStats, CliError> {
    let target = cli.target()?;

    let log_dir = cli.log_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    let log = FileReporter::create_in(&log_dir).map_err(|source| CliError::LogFile {
        dir: log_dir.clone(),
        source,
    })?;
    let reporter = TeeReporter::new().with(ConsoleReporter).with(log);

    run_with_reporter(cli, &target, &reporter)
}

/// Organizes `target` with the settings from `cli`, reporting to `reporter`.
pub fn run_with_reporter(
    cli: &Cli,
    target: &Path,
    reporter: &dyn Reporter,
) -> Result<RunStats, CliError> {
    let stats = FileOrganizer::new(cli.config(), reporter).organize(target)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print_summary_table(&stats);
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::RecordingReporter;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["desktidy"]).unwrap();
        assert!(cli.directory.is_none());
        assert!(!cli.dry_run);
        assert!(!cli.json);
        assert!(cli.log_dir.is_none());
    }

    #[test]
    fn test_parse_all_arguments() {
        let cli = Cli::try_parse_from([
            "desktidy",
            "/tmp/somewhere",
            "--dry-run",
            "--json",
            "--log-dir",
            "/tmp/logs",
        ])
        .unwrap();
        assert_eq!(cli.directory, Some(PathBuf::from("/tmp/somewhere")));
        assert!(cli.dry_run);
        assert!(cli.json);
        assert_eq!(cli.log_dir, Some(PathBuf::from("/tmp/logs")));
        assert!(cli.config().dry_run);
    }

    #[test]
    fn test_parse_rejects_unknown_flag() {
        assert!(Cli::try_parse_from(["desktidy", "--undo"]).is_err());
    }

    #[test]
    fn test_explicit_target_wins() {
        let cli = Cli::try_parse_from(["desktidy", "/data/inbox"]).unwrap();
        assert_eq!(cli.target().unwrap(), PathBuf::from("/data/inbox"));
    }

    #[test]
    fn test_run_with_reporter_propagates_missing_path() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let missing = temp_dir.path().join("missing");
        let cli = Cli::try_parse_from(["desktidy", "--json"]).unwrap();
        let reporter = RecordingReporter::new();

        let result = run_with_reporter(&cli, &missing, &reporter);

        assert!(matches!(
            result,
            Err(CliError::Organize(OrganizeError::PathNotFound { .. }))
        ));
    }

    #[test]
    fn test_run_with_reporter_moves_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("clip.mov"), "x").unwrap();
        let cli = Cli::try_parse_from(["desktidy", "--json"]).unwrap();
        let reporter = RecordingReporter::new();

        let stats = run_with_reporter(&cli, temp_dir.path(), &reporter).unwrap();

        assert_eq!(stats.moved, 1);
        assert!(temp_dir.path().join("organized/videos/clip.mov").exists());
    }
}
