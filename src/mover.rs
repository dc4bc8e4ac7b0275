/// Relocation of single files into category folders.
///
/// The [`Mover`] applies the per-file policy shared by loose-file organizing
/// and legacy reconciliation: destinations blocked by the folder policy are
/// skipped before any I/O, category folders are created on demand, existing
/// files are never overwritten, and files held open by another program are
/// skipped rather than treated as errors.
use crate::policy::FolderPolicy;
use crate::scanner::extension_of;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// One successful relocation, with enough detail to reverse it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub file_name: String,
    pub source_path: PathBuf,
    pub destination_path: PathBuf,
    /// Category folder the file was moved into.
    pub category: String,
    /// Size in bytes, read after the move.
    pub file_size: Option<u64>,
    /// Extension without the leading dot.
    pub file_type: Option<String>,
    pub modified_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Why a file was deliberately left where it was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum SkipReason {
    /// The target category folder is preserved for this run.
    DestinationPreserved { category: String },
    /// A file with the same name is already in the target folder.
    AlreadyExists { category: String },
    /// The file is open or locked by another program.
    Locked,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DestinationPreserved { .. } => write!(f, "destination preserved"),
            Self::AlreadyExists { category } => write!(f, "already exists in {category} folder"),
            Self::Locked => write!(f, "in use or locked"),
        }
    }
}

impl From<SkipReason> for String {
    fn from(reason: SkipReason) -> Self {
        reason.to_string()
    }
}

/// Errors that leave a single file at its original location.
#[derive(Debug, Error)]
pub enum MoveError {
    #[error("file has no name component: {}", path.display())]
    NoFileName { path: PathBuf },

    #[error("failed to create folder {}: {source}", path.display())]
    CreateFolder {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to move {} to {}: {source}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result of attempting to move one file.
#[derive(Debug)]
pub enum MoveOutcome {
    Moved(MoveRecord),
    Skipped(SkipReason),
    Failed(MoveError),
}

/// A file that was skipped, as reported to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedFile {
    pub file_name: String,
    pub source_path: PathBuf,
    pub category: String,
    pub reason: SkipReason,
}

/// A file whose move failed unexpectedly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedFile {
    pub file_name: String,
    pub source_path: PathBuf,
    pub category: String,
    pub error: String,
}

/// Accumulates the outcomes of every move attempted during one run.
#[derive(Debug, Clone, Default)]
pub struct MoveLog {
    pub movements: Vec<MoveRecord>,
    pub skipped: Vec<SkippedFile>,
    pub failed: Vec<FailedFile>,
}

impl MoveLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files the source of an outcome under its kind.
    pub fn push(&mut self, source: &Path, category: &str, outcome: MoveOutcome) {
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match outcome {
            MoveOutcome::Moved(record) => self.movements.push(record),
            MoveOutcome::Skipped(reason) => self.skipped.push(SkippedFile {
                file_name,
                source_path: source.to_path_buf(),
                category: category.to_string(),
                reason,
            }),
            MoveOutcome::Failed(err) => self.failed.push(FailedFile {
                file_name,
                source_path: source.to_path_buf(),
                category: category.to_string(),
                error: err.to_string(),
            }),
        }
    }
}

/// Returns true for errors that mean "someone else has this file open".
pub fn is_lock_error(err: &io::Error) -> bool {
    if matches!(
        err.kind(),
        io::ErrorKind::PermissionDenied | io::ErrorKind::ResourceBusy
    ) {
        return true;
    }
    // ERROR_SHARING_VIOLATION, ERROR_LOCK_VIOLATION
    cfg!(windows) && matches!(err.raw_os_error(), Some(32) | Some(33))
}

/// Creates a folder (and parents) unless it already exists.
///
/// Losing a creation race to another process is not an error.
pub fn ensure_folder(path: &Path) -> io::Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    match fs::create_dir_all(path) {
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        other => other,
    }
}

/// Moves files from anywhere under `root` into `root/<category>`.
#[derive(Debug, Clone, Copy)]
pub struct Mover<'a> {
    root: &'a Path,
    policy: &'a FolderPolicy,
}

impl<'a> Mover<'a> {
    pub fn new(root: &'a Path, policy: &'a FolderPolicy) -> Self {
        Self { root, policy }
    }

    /// Path of the folder a category's files live in.
    pub fn category_dir(&self, category: &str) -> PathBuf {
        self.root.join(category)
    }

    /// Moves `source` into its category folder.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sortdir::mover::{MoveOutcome, Mover};
    /// use sortdir::policy::FolderPolicy;
    /// use std::path::Path;
    ///
    /// let policy = FolderPolicy::default();
    /// let mover = Mover::new(Path::new("/home/me/Downloads"), &policy);
    /// match mover.move_file(Path::new("/home/me/Downloads/report.pdf"), "Documents") {
    ///     MoveOutcome::Moved(record) => println!("moved to {}", record.destination_path.display()),
    ///     MoveOutcome::Skipped(reason) => println!("skipped: {reason}"),
    ///     MoveOutcome::Failed(err) => eprintln!("{err}"),
    /// }
    /// ```
    pub fn move_file(&self, source: &Path, category: &str) -> MoveOutcome {
        let Some(os_name) = source.file_name() else {
            return MoveOutcome::Failed(MoveError::NoFileName {
                path: source.to_path_buf(),
            });
        };
        // The lossy form is for reports only; paths keep the real name.
        let file_name = os_name.to_string_lossy().into_owned();

        if self.policy.blocks_destination(category) {
            warn!(file = %file_name, category, "skipped: destination preserved");
            return MoveOutcome::Skipped(SkipReason::DestinationPreserved {
                category: category.to_string(),
            });
        }

        let category_path = self.category_dir(category);
        if let Err(source_err) = ensure_folder(&category_path) {
            let err = MoveError::CreateFolder {
                path: category_path,
                source: source_err,
            };
            warn!(file = %file_name, error = %err, "move failed");
            return MoveOutcome::Failed(err);
        }

        let destination = category_path.join(os_name);
        if fs::symlink_metadata(&destination).is_ok() {
            warn!(file = %file_name, category, "skipped: already exists in destination");
            return MoveOutcome::Skipped(SkipReason::AlreadyExists {
                category: category.to_string(),
            });
        }

        if let Err(e) = fs::rename(source, &destination) {
            if is_lock_error(&e) {
                warn!(file = %file_name, error = %e, "skipped: file in use or locked");
                return MoveOutcome::Skipped(SkipReason::Locked);
            }
            let err = MoveError::Rename {
                from: source.to_path_buf(),
                to: destination,
                source: e,
            };
            warn!(file = %file_name, error = %err, "move failed");
            return MoveOutcome::Failed(err);
        }

        info!(file = %file_name, category, "moved");
        MoveOutcome::Moved(self.record(source, destination, file_name, category))
    }

    fn record(
        &self,
        source: &Path,
        destination: PathBuf,
        file_name: String,
        category: &str,
    ) -> MoveRecord {
        // Metadata is read from the settled location.
        let metadata = fs::metadata(&destination).ok();
        let ext = extension_of(&file_name);
        MoveRecord {
            file_type: ext.strip_prefix('.').map(str::to_string).filter(|e| !e.is_empty()),
            file_size: metadata.as_ref().map(fs::Metadata::len),
            modified_at: metadata
                .as_ref()
                .and_then(|m| m.modified().ok())
                .map(DateTime::<Utc>::from),
            created_at: metadata
                .as_ref()
                .and_then(|m| m.created().ok())
                .map(DateTime::<Utc>::from),
            file_name,
            source_path: source.to_path_buf(),
            destination_path: destination,
            category: category.to_string(),
        }
    }
}
