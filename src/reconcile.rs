/// Reconciliation of existing subfolders against the current rules.
///
/// Rules change between runs: categories get renamed, merged or dropped, and
/// extensions move from one category to another. Before loose files are
/// organized, every unprotected subfolder of the root is re-checked. Files
/// that now belong elsewhere are moved to their current category, and
/// folders that end up empty and no longer correspond to a category are
/// removed.
///
/// Moving happens strictly before deleting, and only empty folders are
/// deleted, so a stale folder name can never cause data loss. Running the
/// reconciler twice in a row does nothing the second time.
use crate::classifier::Classifier;
use crate::config::FileFilter;
use crate::mover::{MoveLog, Mover};
use crate::policy::FolderPolicy;
use crate::scanner::{self, ScanError};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// What the reconciler did besides moving files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Legacy folders deleted because they were left empty.
    pub removed_folders: Vec<String>,
}

/// Reconciles the subfolders of `root`.
///
/// Moves are appended to `log`. Only a failure to list `root` itself is
/// returned as an error.
pub fn reconcile(
    root: &Path,
    classifier: Classifier<'_>,
    filter: &FileFilter,
    policy: &FolderPolicy,
    log: &mut MoveLog,
) -> Result<ReconcileReport, ScanError> {
    let subfolders = scanner::scan(root)?.subfolders;
    let mover = Mover::new(root, policy);
    let mut report = ReconcileReport::default();

    for folder in &subfolders {
        if policy.protects(folder) {
            continue;
        }
        let folder_path = root.join(folder);
        let contents = match scanner::scan(&folder_path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(folder = %folder, error = %e, "cannot read folder, leaving it alone");
                continue;
            }
        };

        for entry in contents.files {
            if !filter.allows(&entry.name) {
                continue;
            }
            let category = classifier.classify(&entry);
            if category == folder.as_str() {
                continue;
            }
            info!(file = %entry.name, from = %folder, to = category, "relocating misplaced file");
            let outcome = mover.move_file(&entry.path, category);
            log.push(&entry.path, category, outcome);
        }
    }

    let table = classifier.table();
    for folder in &subfolders {
        if table.is_standard_folder(folder) || policy.protects(folder) {
            continue;
        }
        let folder_path = root.join(folder);
        match scanner::is_empty_dir(&folder_path) {
            Ok(true) => match fs::remove_dir(&folder_path) {
                Ok(()) => {
                    info!(folder = %folder, "removed empty legacy folder");
                    report.removed_folders.push(folder.clone());
                }
                Err(e) => warn!(folder = %folder, error = %e, "could not remove empty folder"),
            },
            Ok(false) => {}
            Err(e) => warn!(folder = %folder, error = %e, "could not inspect folder"),
        }
    }

    Ok(report)
}
