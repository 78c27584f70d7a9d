//! Run reporting.
//!
//! The organizer only talks to the [`Reporter`] trait. Sinks decide where
//! the lines go: the console, a timestamped log file, memory, or several of
//! these at once through [`TeeReporter`].

use crate::file_organizer::RunStats;
use chrono::Local;
use colored::*;
use std::fs::{self, File};
use std::io::{self, LineWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Prefix shared by every artifact the tool writes into a directory.
pub const ARTIFACT_PREFIX: &str = "desktidy";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Severity of a reported line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

impl Level {
    fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Error => "ERROR",
        }
    }
}

/// Receives the messages of an organization run.
pub trait Reporter: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

fn timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Prints timestamped lines, info to stdout and errors to stderr in red.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn info(&self, message: &str) {
        println!("{} - {}", timestamp().dimmed(), message);
    }

    fn error(&self, message: &str) {
        eprintln!("{} - {}", timestamp().dimmed(), message.red());
    }
}

/// Appends `"<timestamp> - <LEVEL> - <message>"` lines to a log file.
pub struct FileReporter {
    path: PathBuf,
    writer: Mutex<LineWriter<File>>,
}

impl FileReporter {
    /// Opens (or creates) `path` for appending.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: Mutex::new(LineWriter::new(file)),
        })
    }

    /// Creates `desktidy_<YYYYmmdd_HHMMSS>.log` inside `dir`.
    pub fn create_in(dir: &Path) -> io::Result<Self> {
        Self::open(&dir.join(log_file_name()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_line(&self, level: Level, message: &str) {
        // A poisoned lock or a failed write must not stop the run.
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{} - {} - {}", timestamp(), level.as_str(), message);
        }
    }
}

impl Reporter for FileReporter {
    fn info(&self, message: &str) {
        self.write_line(Level::Info, message);
    }

    fn error(&self, message: &str) {
        self.write_line(Level::Error, message);
    }
}

/// Name of the log file for a run started now.
pub fn log_file_name() -> String {
    format!(
        "{}_{}.log",
        ARTIFACT_PREFIX,
        Local::now().format("%Y%m%d_%H%M%S")
    )
}

/// Forwards every line to each inner reporter.
#[derive(Default)]
pub struct TeeReporter {
    sinks: Vec<Box<dyn Reporter>>,
}

impl TeeReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl Reporter + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }
}

impl Reporter for TeeReporter {
    fn info(&self, message: &str) {
        for sink in &self.sinks {
            sink.info(message);
        }
    }

    fn error(&self, message: &str) {
        for sink in &self.sinks {
            sink.error(message);
        }
    }
}

/// Keeps every line in memory.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    lines: Mutex<Vec<(Level, String)>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded lines, oldest first.
    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    pub fn errors(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(level, _)| *level == Level::Error)
            .map(|(_, message)| message)
            .collect()
    }

    pub fn infos(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(level, _)| *level == Level::Info)
            .map(|(_, message)| message)
            .collect()
    }

    fn push(&self, level: Level, message: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((level, message.to_string()));
        }
    }
}

impl Reporter for RecordingReporter {
    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }
}

/// Prints moved files per category followed by the run totals.
pub fn print_summary_table(stats: &RunStats) {
    println!("\n{}", "SUMMARY".bold());

    let width = stats
        .by_category
        .keys()
        .map(|category| category.dir_name().len())
        .max()
        .unwrap_or(0)
        .max(8); // "Category"

    println!(
        "{:<width$} | {}",
        "Category".bold(),
        "Files".bold(),
        width = width
    );
    println!("{}", "-".repeat(width + 10));

    for (category, count) in &stats.by_category {
        println!(
            "{:<width$} | {} {}",
            category.dir_name(),
            count.to_string().green(),
            if *count == 1 { "file" } else { "files" },
            width = width
        );
    }

    println!("{}", "-".repeat(width + 10));
    println!("{:<width$} | {}", "Total", stats.total, width = width);
    println!("{:<width$} | {}", "Moved", stats.moved.to_string().green(), width = width);
    println!("{:<width$} | {}", "Skipped", stats.skipped.to_string().yellow(), width = width);
}
