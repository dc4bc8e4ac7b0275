/// Undo support for the most recent organize run.
///
/// A [`Ledger`] retains at most one [`Operation`]: recording a new one
/// replaces whatever was there. Undoing replays the recorded moves in order,
/// moving each file from its destination back to its source, and then clears
/// the ledger whether or not every file could be restored. A partially failed
/// undo therefore cannot be retried; the failures are reported instead.
use crate::mover::MoveRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

const MISSING_AT_DESTINATION: &str = "File no longer exists at new location";
const SOURCE_OCCUPIED: &str = "A file already exists at the original location";

#[derive(Debug, Error)]
pub enum UndoError {
    #[error("no previous operation to undo")]
    NothingToUndo,

    #[error("failed to read undo history {}: {source}", path.display())]
    HistoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid undo history {}: {source}", path.display())]
    HistoryFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write undo history {}: {source}", path.display())]
    HistoryWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The moves made by one organize run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub timestamp: DateTime<Utc>,
    pub folder_path: PathBuf,
    pub moved_files: Vec<MoveRecord>,
    /// Free-form context supplied by the caller (for example which scheduled
    /// task triggered the run).
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestoredFile {
    #[serde(flatten)]
    pub record: MoveRecord,
    pub undone_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedRestore {
    pub file_name: String,
    pub destination_path: PathBuf,
    pub reason: String,
}

/// Outcome of an undo.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UndoReport {
    pub folder_path: PathBuf,
    /// When the undone operation was recorded.
    pub timestamp: DateTime<Utc>,
    pub restored_count: usize,
    pub restored_files: Vec<RestoredFile>,
    pub failed_count: usize,
    pub failed_files: Vec<FailedRestore>,
    /// Set when the history file survived the undo and could replay it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_error: Option<String>,
}

impl UndoReport {
    /// True if every file was restored and the history is gone.
    pub fn is_complete_success(&self) -> bool {
        self.failed_files.is_empty() && self.history_error.is_none()
    }
}

/// Whether an undo is available, and for what.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UndoStatus {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_count: Option<usize>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

/// Holds the last recorded operation.
///
/// An in-memory ledger lives as long as its owner. A persistent ledger also
/// mirrors the operation to a JSON file so that a later process can undo it.
#[derive(Debug, Default)]
pub struct Ledger {
    last: Option<Operation>,
    store: Option<PathBuf>,
}

impl Ledger {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens a ledger backed by `path`, loading any operation saved there.
    pub fn persistent(path: impl Into<PathBuf>) -> Result<Self, UndoError> {
        let path = path.into();
        let last = if path.exists() {
            let json = fs::read_to_string(&path).map_err(|source| UndoError::HistoryRead {
                path: path.clone(),
                source,
            })?;
            let operation: Operation =
                serde_json::from_str(&json).map_err(|source| UndoError::HistoryFormat {
                    path: path.clone(),
                    source,
                })?;
            debug!(path = %path.display(), files = operation.moved_files.len(), "loaded undo history");
            Some(operation)
        } else {
            None
        };
        Ok(Self {
            last,
            store: Some(path),
        })
    }

    /// `$HOME/.config/sortdir/last_operation.json`, if `HOME` is set.
    pub fn default_location() -> Option<PathBuf> {
        std::env::var_os("HOME").map(|home| {
            PathBuf::from(home)
                .join(".config")
                .join("sortdir")
                .join("last_operation.json")
        })
    }

    /// Records the moves of a run, replacing any previous operation.
    ///
    /// Returns `Ok(false)`, and keeps the previous operation, when
    /// `moved_files` is empty. If a persistent ledger cannot save the new
    /// operation, the previous history file is deleted and the error is
    /// returned. The operation is still kept in memory.
    pub fn record(
        &mut self,
        folder_path: &Path,
        moved_files: Vec<MoveRecord>,
        metadata: BTreeMap<String, String>,
    ) -> Result<bool, UndoError> {
        if moved_files.is_empty() {
            return Ok(false);
        }
        let operation = Operation {
            timestamp: Utc::now(),
            folder_path: folder_path.to_path_buf(),
            moved_files,
            metadata,
        };
        let saved = self.save(&operation);
        debug!(files = operation.moved_files.len(), "recorded operation");
        self.last = Some(operation);

        if let Err(e) = saved {
            warn!(error = %e, "could not persist undo history");
            // A stale file would undo the previous run instead of this one.
            if let Err(clear) = self.clear_store() {
                warn!(error = %clear, "could not delete stale undo history");
            }
            return Err(e);
        }
        Ok(true)
    }

    pub fn status(&self) -> UndoStatus {
        match &self.last {
            None => UndoStatus::default(),
            Some(op) => UndoStatus {
                available: true,
                folder_path: Some(op.folder_path.clone()),
                timestamp: Some(op.timestamp),
                file_count: Some(op.moved_files.len()),
                metadata: op.metadata.clone(),
            },
        }
    }

    /// Moves every file of the last operation back where it came from.
    ///
    /// Each file is attempted independently; failures are collected in the
    /// report. The ledger is empty afterwards.
    pub fn undo(&mut self) -> Result<UndoReport, UndoError> {
        let operation = self.last.take().ok_or(UndoError::NothingToUndo)?;
        info!(
            path = %operation.folder_path.display(),
            files = operation.moved_files.len(),
            "undoing last operation"
        );

        let mut restored_files = Vec::new();
        let mut failed_files = Vec::new();
        for record in &operation.moved_files {
            match restore_file(record) {
                Ok(()) => restored_files.push(RestoredFile {
                    record: record.clone(),
                    undone_at: Utc::now(),
                }),
                Err(reason) => {
                    warn!(file = %record.file_name, %reason, "could not restore file");
                    failed_files.push(FailedRestore {
                        file_name: record.file_name.clone(),
                        destination_path: record.destination_path.clone(),
                        reason,
                    });
                }
            }
        }

        let history_error = self.clear_store().err().map(|e| {
            warn!(error = %e, "could not delete undo history");
            e.to_string()
        });

        Ok(UndoReport {
            folder_path: operation.folder_path,
            timestamp: operation.timestamp,
            restored_count: restored_files.len(),
            restored_files,
            failed_count: failed_files.len(),
            failed_files,
            history_error,
        })
    }

    fn save(&self, operation: &Operation) -> Result<(), UndoError> {
        let Some(path) = &self.store else {
            return Ok(());
        };
        let write_err = |source| UndoError::HistoryWrite {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(operation).map_err(|source| {
            UndoError::HistoryFormat {
                path: path.clone(),
                source,
            }
        })?;
        fs::write(path, json).map_err(write_err)
    }

    fn clear_store(&self) -> Result<(), UndoError> {
        match &self.store {
            Some(path) if path.exists() => {
                fs::remove_file(path).map_err(|source| UndoError::HistoryWrite {
                    path: path.clone(),
                    source,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Moves one file back to its recorded source path.
fn restore_file(record: &MoveRecord) -> Result<(), String> {
    if fs::symlink_metadata(&record.destination_path).is_err() {
        return Err(MISSING_AT_DESTINATION.to_string());
    }
    if fs::symlink_metadata(&record.source_path).is_ok() {
        return Err(SOURCE_OCCUPIED.to_string());
    }
    if let Some(parent) = record.source_path.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }
    fs::rename(&record.destination_path, &record.source_path).map_err(|e| e.to_string())
}
