//! Moves the files of a directory into category folders.
//!
//! A run takes one pass over the immediate entries of the target directory.
//! Each regular file is classified by extension, its category folder under
//! the destination root is created on demand, a free destination name is
//! picked, and the file is moved. Failures are contained per file; only an
//! unusable target directory aborts the run.
use crate::config::OrganizerConfig;
use crate::file_category::{Category, extension_of};
use crate::output::Reporter;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during file organization.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The target directory does not exist.
    #[error("Target path {} does not exist", path.display())]
    PathNotFound { path: PathBuf },
    /// The target exists but is not a directory.
    #[error("Target path {} is not a directory", path.display())]
    NotADirectory { path: PathBuf },
    /// Failed to create the destination root or a category folder.
    #[error("Failed to create directory {}: {source}", path.display())]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
    /// The target directory could not be listed.
    #[error("Error reading directory {}: {source}", path.display())]
    ReadDirFailed { path: PathBuf, source: io::Error },
    /// Failed to move a file to its destination.
    #[error("Failed to move {} to {}: {source}", from.display(), to.display())]
    FileMoveFailure {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
    /// The entry path has no final component.
    #[error("{} has no file name", path.display())]
    NoFileName { path: PathBuf },
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Why a regular file was left where it was.
#[derive(Debug)]
pub enum SkipReason {
    /// The name carries the tool's own artifact prefix.
    SelfExcluded,
    /// Creating its folder or moving it failed.
    MoveFailed(OrganizeError),
}

/// What happened to one directory entry.
#[derive(Debug)]
pub enum EntryOutcome {
    /// Not a regular file; left untouched and not counted.
    Ignored,
    /// Moved (or, in a dry run, planned to move) to `destination`.
    Moved {
        category: Category,
        destination: PathBuf,
    },
    Skipped(SkipReason),
}

/// Counters for one run.
///
/// Every regular file counts toward `total` and then toward exactly one of
/// `moved` or `skipped`, so `moved + skipped == total`. Self-excluded files
/// are part of `total` as well as `skipped`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub total: usize,
    pub moved: usize,
    pub skipped: usize,
    /// Moved files per category.
    pub by_category: BTreeMap<Category, usize>,
    pub dry_run: bool,
}

impl RunStats {
    pub fn record(&mut self, outcome: &EntryOutcome) {
        match outcome {
            EntryOutcome::Ignored => {}
            EntryOutcome::Moved { category, .. } => {
                self.total += 1;
                self.moved += 1;
                *self.by_category.entry(*category).or_insert(0) += 1;
            }
            EntryOutcome::Skipped(_) => {
                self.total += 1;
                self.skipped += 1;
            }
        }
    }
}

/// Organizes one directory per call to [`FileOrganizer::organize`].
pub struct FileOrganizer<'r> {
    config: OrganizerConfig,
    reporter: &'r dyn Reporter,
}

impl<'r> FileOrganizer<'r> {
    pub fn new(config: OrganizerConfig, reporter: &'r dyn Reporter) -> Self {
        Self { config, reporter }
    }

    pub fn config(&self) -> &OrganizerConfig {
        &self.config
    }

    /// Runs one organization pass over `target`.
    ///
    /// Returns the run counters, or an error when `target` is missing, is
    /// not a directory, cannot be listed, or the destination root cannot be
    /// created. Nothing is touched in those cases apart from the
    /// destination root itself.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use desktidy::{FileOrganizer, OrganizerConfig, ConsoleReporter};
    /// use std::path::Path;
    ///
    /// let reporter = ConsoleReporter;
    /// let organizer = FileOrganizer::new(OrganizerConfig::default(), &reporter);
    /// match organizer.organize(Path::new("/home/user/Desktop")) {
    ///     Ok(stats) => println!("moved {} of {}", stats.moved, stats.total),
    ///     Err(e) => eprintln!("Organization failed: {}", e),
    /// }
    /// ```
    pub fn organize(&self, target: &Path) -> OrganizeResult<RunStats> {
        let dry_run = self.config.dry_run;
        if dry_run {
            self.reporter.info(&format!(
                "Starting file organization of {} (dry run)...",
                target.display()
            ));
        } else {
            self.reporter.info(&format!(
                "Starting file organization of {}...",
                target.display()
            ));
        }

        if !target.exists() {
            return Err(self.fail(OrganizeError::PathNotFound {
                path: target.to_path_buf(),
            }));
        }
        if !target.is_dir() {
            return Err(self.fail(OrganizeError::NotADirectory {
                path: target.to_path_buf(),
            }));
        }

        let destination_root = target.join(&self.config.destination_root);
        if !dry_run {
            fs::create_dir_all(&destination_root).map_err(|e| {
                self.fail(OrganizeError::DirectoryCreationFailed {
                    path: destination_root.clone(),
                    source: e,
                })
            })?;
        }

        let entries = self.list_entries(target)?;

        let mut stats = RunStats {
            dry_run,
            ..RunStats::default()
        };
        let mut planned: HashSet<PathBuf> = HashSet::new();

        for path in &entries {
            let outcome = self.process_entry(path, &destination_root, &mut planned);
            stats.record(&outcome);
        }

        self.report_summary(&stats);
        Ok(stats)
    }

    /// Decides and performs the fate of a single entry.
    fn process_entry(
        &self,
        path: &Path,
        destination_root: &Path,
        planned: &mut HashSet<PathBuf>,
    ) -> EntryOutcome {
        // Follows symlinks, so a link to a regular file counts as a file.
        let is_file = fs::metadata(path).map(|m| m.is_file()).unwrap_or(false);
        if !is_file {
            return EntryOutcome::Ignored;
        }

        let Some(file_name) = path.file_name() else {
            let err = OrganizeError::NoFileName {
                path: path.to_path_buf(),
            };
            self.reporter.error(&err.to_string());
            return EntryOutcome::Skipped(SkipReason::MoveFailed(err));
        };
        let display_name = file_name.to_string_lossy();

        if self.config.is_excluded(&display_name) {
            return EntryOutcome::Skipped(SkipReason::SelfExcluded);
        }

        let category = self.config.table.category_of(&extension_of(path));
        let category_dir = destination_root.join(category.dir_name());

        if self.config.dry_run {
            // The real run would fail to create the folder.
            if is_occupied(&category_dir) && !category_dir.is_dir() {
                let err = OrganizeError::DirectoryCreationFailed {
                    path: category_dir,
                    source: io::Error::new(
                        io::ErrorKind::NotADirectory,
                        "path exists and is not a directory",
                    ),
                };
                self.reporter
                    .error(&format!("Error moving {}: {}", display_name, err));
                return EntryOutcome::Skipped(SkipReason::MoveFailed(err));
            }
            let destination = resolve_destination(&category_dir, file_name, |candidate| {
                planned.contains(candidate) || is_occupied(candidate)
            });
            planned.insert(destination.clone());
            self.reporter.info(&format!(
                "Would move {} to {}/{}",
                display_name,
                category,
                destination
                    .file_name()
                    .map(|name| name.to_string_lossy())
                    .unwrap_or_default()
            ));
            return EntryOutcome::Moved {
                category,
                destination,
            };
        }

        match relocate(path, file_name, &category_dir) {
            Ok(destination) => {
                self.reporter
                    .info(&format!("Moved {} to {}", display_name, category));
                EntryOutcome::Moved {
                    category,
                    destination,
                }
            }
            Err(e) => {
                self.reporter
                    .error(&format!("Error moving {}: {}", display_name, e));
                EntryOutcome::Skipped(SkipReason::MoveFailed(e))
            }
        }
    }

    /// Snapshots the immediate entries of `dir`, sorted by name.
    fn list_entries(&self, dir: &Path) -> OrganizeResult<Vec<PathBuf>> {
        let entries = fs::read_dir(dir).map_err(|e| {
            self.fail(OrganizeError::ReadDirFailed {
                path: dir.to_path_buf(),
                source: e,
            })
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) => paths.push(entry.path()),
                Err(e) => self
                    .reporter
                    .error(&format!("Error reading entry in {}: {}", dir.display(), e)),
            }
        }
        paths.sort();
        Ok(paths)
    }

    fn report_summary(&self, stats: &RunStats) {
        self.reporter.info("Operation complete!");
        self.reporter
            .info(&format!("Total files processed: {}", stats.total));
        if stats.dry_run {
            self.reporter
                .info(&format!("Files that would be moved: {}", stats.moved));
        } else {
            self.reporter.info(&format!("Files moved: {}", stats.moved));
        }
        self.reporter
            .info(&format!("Files skipped: {}", stats.skipped));
    }

    fn fail(&self, err: OrganizeError) -> OrganizeError {
        self.reporter.error(&err.to_string());
        err
    }
}

/// Organizes `target` with the default settings.
pub fn organize(target: &Path, reporter: &dyn Reporter) -> OrganizeResult<RunStats> {
    FileOrganizer::new(OrganizerConfig::default(), reporter).organize(target)
}

/// Whether anything, even a dangling symlink, already sits at `path`.
fn is_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Picks the destination for `file_name` inside `dir`.
///
/// Returns `dir/file_name` when free, otherwise `dir/<stem>_<n><ext>` for the
/// lowest `n >= 1` that `is_taken` rejects.
pub fn resolve_destination(
    dir: &Path,
    file_name: &OsStr,
    is_taken: impl Fn(&Path) -> bool,
) -> PathBuf {
    let candidate = dir.join(file_name);
    if !is_taken(&candidate) {
        return candidate;
    }

    let name = Path::new(file_name);
    let stem = name.file_stem().unwrap_or(file_name);
    let extension = name.extension();

    let mut counter: u64 = 1;
    loop {
        let mut suffixed = OsString::from(stem);
        suffixed.push(format!("_{}", counter));
        if let Some(ext) = extension {
            suffixed.push(".");
            suffixed.push(ext);
        }
        let candidate = dir.join(suffixed);
        if !is_taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Ensures `category_dir` exists, then moves the file to a free name in it.
fn relocate(path: &Path, file_name: &OsStr, category_dir: &Path) -> OrganizeResult<PathBuf> {
    fs::create_dir_all(category_dir).map_err(|e| OrganizeError::DirectoryCreationFailed {
        path: category_dir.to_path_buf(),
        source: e,
    })?;

    let destination = resolve_destination(category_dir, file_name, is_occupied);
    move_file(path, &destination)?;
    Ok(destination)
}

/// Renames `from` to `to`, copying and deleting across filesystems.
///
/// A symlink is moved as a link on both paths: the cross-device fallback
/// recreates it at `to` instead of copying its target. On platforms without
/// symlink creation the fallback copies the target's contents.
pub fn move_file(from: &Path, to: &Path) -> OrganizeResult<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            copy_then_remove(from, to, copy_entry)
        }
        Err(e) => Err(move_failure(from, to, e)),
    }
}

fn move_failure(from: &Path, to: &Path, source: io::Error) -> OrganizeError {
    OrganizeError::FileMoveFailure {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    }
}

/// Copies `from` to `to` with `copy`, then deletes `from`.
///
/// Whenever this fails nothing is left at `to`; the source stays the single
/// copy.
fn copy_then_remove(
    from: &Path,
    to: &Path,
    copy: impl FnOnce(&Path, &Path) -> io::Result<()>,
) -> OrganizeResult<()> {
    if let Err(e) = copy(from, to) {
        let _ = fs::remove_file(to);
        return Err(move_failure(from, to, e));
    }
    if let Err(e) = fs::remove_file(from) {
        let _ = fs::remove_file(to);
        return Err(move_failure(from, to, e));
    }
    Ok(())
}

/// Copies a regular file's bytes, or recreates a symlink as a link.
fn copy_entry(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(unix)]
    if fs::symlink_metadata(from)?.file_type().is_symlink() {
        let target = fs::read_link(from)?;
        return std::os::unix::fs::symlink(target, to);
    }
    fs::copy(from, to).map(|_| ())
}
