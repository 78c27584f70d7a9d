//! desktidy - sort the files of a single directory into category folders
//!
//! This library classifies files by extension, moves them into
//! `organized/<category>/` under the target directory while never
//! overwriting an existing file, and reports every action through an
//! injected [`Reporter`].

pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod output;

pub use config::OrganizerConfig;
pub use file_category::{Category, CategoryRule, CategoryTable, TableError, category_of};
pub use file_organizer::{
    EntryOutcome, FileOrganizer, OrganizeError, OrganizeResult, RunStats, SkipReason, organize,
};
pub use output::{ConsoleReporter, FileReporter, RecordingReporter, Reporter, TeeReporter};

pub use cli::{Cli, CliError, run_cli};
