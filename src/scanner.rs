//! Non-recursive directory listing.
//!
//! The scanner only looks at the immediate children of a directory. Files
//! inside category folders are visited one level down by the reconciler,
//! which calls [`scan`] again on each subfolder.

use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while listing a directory.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("path not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    #[error("permission denied: {}", path.display())]
    PermissionDenied { path: PathBuf },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    /// Wraps an I/O error, mapping the kinds callers care about.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            io::ErrorKind::NotADirectory => Self::NotADirectory { path },
            _ => Self::Io { path, source },
        }
    }
}

/// A loose file discovered by a scan.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub path: PathBuf,
    pub name: String,
    /// Lower-case extension with its leading dot, or `""` when there is none.
    pub extension: String,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
    pub created: Option<DateTime<Utc>>,
}

impl FileEntry {
    fn from_metadata(path: PathBuf, name: String, metadata: &fs::Metadata) -> Self {
        let extension = extension_of(&name);
        Self {
            path,
            extension,
            name,
            size: metadata.len(),
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            created: metadata.created().ok().map(DateTime::<Utc>::from),
        }
    }
}

/// The immediate contents of one directory, sorted by name.
#[derive(Debug, Clone, Default)]
pub struct Scan {
    pub files: Vec<FileEntry>,
    pub subfolders: Vec<String>,
}

/// Extracts the extension used for classification.
///
/// Only the part after the last dot counts, and a leading dot alone (as in
/// `.bashrc`) does not start an extension.
///
/// ```
/// use sortdir::scanner::extension_of;
///
/// assert_eq!(extension_of("report.PDF"), ".pdf");
/// assert_eq!(extension_of("archive.tar.gz"), ".gz");
/// assert_eq!(extension_of("notes"), "");
/// assert_eq!(extension_of(".bashrc"), "");
/// ```
pub fn extension_of(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => file_name[idx..].to_lowercase(),
        _ => String::new(),
    }
}

/// Lists the files and subfolders directly inside `path`.
///
/// Symlinks are followed when deciding whether an entry is a file or a
/// folder; entries that are neither (sockets, broken links) are ignored, as
/// are entries whose metadata cannot be read.
pub fn scan(path: &Path) -> Result<Scan, ScanError> {
    let metadata = fs::metadata(path).map_err(|e| ScanError::io(path, e))?;
    if !metadata.is_dir() {
        return Err(ScanError::NotADirectory {
            path: path.to_path_buf(),
        });
    }

    let entries = fs::read_dir(path).map_err(|e| ScanError::io(path, e))?;
    let mut scan = Scan::default();

    for entry in entries {
        let entry = entry.map_err(|e| ScanError::io(path, e))?;
        let entry_path = entry.path();
        let Ok(metadata) = fs::metadata(&entry_path) else {
            debug!(path = %entry_path.display(), "skipping entry without readable metadata");
            continue;
        };
        let name = entry.file_name().to_string_lossy().into_owned();

        if metadata.is_file() {
            scan.files
                .push(FileEntry::from_metadata(entry_path, name, &metadata));
        } else if metadata.is_dir() {
            scan.subfolders.push(name);
        }
    }

    scan.files.sort_by(|a, b| a.name.cmp(&b.name));
    scan.subfolders.sort();
    debug!(
        path = %path.display(),
        files = scan.files.len(),
        subfolders = scan.subfolders.len(),
        "scanned directory"
    );
    Ok(scan)
}

/// Returns true if `path` is a directory with no entries at all.
pub fn is_empty_dir(path: &Path) -> io::Result<bool> {
    Ok(fs::read_dir(path)?.next().is_none())
}
