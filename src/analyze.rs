//! Dry-run preview of an organize run.
//!
//! The analyzer walks the same decisions as [`Organizer::organize`] without
//! touching the filesystem. Destinations claimed by earlier planned moves are
//! tracked, so a collision that the real run would only discover halfway
//! through is forecast as well. The preview stays accurate only as long as
//! nothing else changes the directory before the real run.

use crate::mover::{SkipReason, SkippedFile};
use crate::organizer::Organizer;
use crate::policy::FolderPolicy;
use crate::scanner::{self, FileEntry, ScanError};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A move the next organize run is expected to make.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedMove {
    pub file_name: String,
    pub source_path: PathBuf,
    pub destination_path: PathBuf,
    pub category: String,
    /// Subfolder the file currently lives in, for legacy relocations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_folder: Option<String>,
}

/// Forecast of an organize run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub success: bool,
    pub directory_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Loose files grouped by the category they would move into.
    pub files_by_category: BTreeMap<String, Vec<PlannedMove>>,
    /// Files that would be relocated out of existing subfolders.
    pub legacy_moves: Vec<PlannedMove>,
    /// Legacy folders that would be left empty and removed.
    pub folders_to_remove: Vec<String>,
    pub skipped_files: Vec<SkippedFile>,
    /// Loose files considered for organizing.
    pub total_files: usize,
    /// Category rules in effect.
    pub categories: IndexMap<String, Vec<String>>,
}

impl Preview {
    fn failed(directory: &Path, error: &ScanError) -> Self {
        Self {
            success: false,
            directory_path: directory.to_path_buf(),
            error: Some(error.to_string()),
            files_by_category: BTreeMap::new(),
            legacy_moves: Vec::new(),
            folders_to_remove: Vec::new(),
            skipped_files: Vec::new(),
            total_files: 0,
            categories: IndexMap::new(),
        }
    }

    /// Total number of moves in the plan.
    pub fn planned_moves(&self) -> usize {
        self.legacy_moves.len() + self.files_by_category.values().map(Vec::len).sum::<usize>()
    }
}

/// Planning state shared by the legacy and loose-file passes.
struct Plan<'a> {
    root: &'a Path,
    policy: &'a FolderPolicy,
    claimed: HashSet<PathBuf>,
    skipped: Vec<SkippedFile>,
}

impl Plan<'_> {
    /// Decides the fate of one file, mirroring the mover's checks.
    fn decide(&mut self, entry: &FileEntry, category: &str) -> Option<PlannedMove> {
        let skip = |reason: SkipReason| SkippedFile {
            file_name: entry.name.clone(),
            source_path: entry.path.clone(),
            category: category.to_string(),
            reason,
        };

        if self.policy.blocks_destination(category) {
            self.skipped.push(skip(SkipReason::DestinationPreserved {
                category: category.to_string(),
            }));
            return None;
        }

        let name = entry
            .path
            .file_name()
            .unwrap_or_else(|| OsStr::new(&entry.name));
        let destination = self.root.join(category).join(name);
        if self.claimed.contains(&destination) || fs::symlink_metadata(&destination).is_ok() {
            self.skipped.push(skip(SkipReason::AlreadyExists {
                category: category.to_string(),
            }));
            return None;
        }

        self.claimed.insert(destination.clone());
        Some(PlannedMove {
            file_name: entry.name.clone(),
            source_path: entry.path.clone(),
            destination_path: destination,
            category: category.to_string(),
            from_folder: None,
        })
    }
}

impl Organizer {
    /// Previews what [`Organizer::organize`] would do, without changing
    /// anything on disk.
    pub fn analyze(&self, directory: &Path, policy: &FolderPolicy) -> Preview {
        match self.plan(directory, policy) {
            Ok(preview) => preview,
            Err(e) => Preview::failed(directory, &e),
        }
    }

    fn plan(&self, directory: &Path, policy: &FolderPolicy) -> Result<Preview, ScanError> {
        let classifier = self.classifier();
        let root = scanner::scan(directory)?;
        let mut plan = Plan {
            root: directory,
            policy,
            claimed: HashSet::new(),
            skipped: Vec::new(),
        };

        let mut legacy_moves = Vec::new();
        let mut folders_to_remove = Vec::new();
        for folder in &root.subfolders {
            if policy.protects(folder) {
                continue;
            }
            let folder_path = directory.join(folder);
            let Ok(contents) = scanner::scan(&folder_path) else {
                debug!(folder = %folder, "cannot read folder, not planning for it");
                continue;
            };

            let mut leaving = 0;
            for entry in &contents.files {
                if !self.filter().allows(&entry.name) {
                    continue;
                }
                let category = classifier.classify(entry);
                if category == folder.as_str() {
                    continue;
                }
                if let Some(mut planned) = plan.decide(entry, category) {
                    planned.from_folder = Some(folder.clone());
                    legacy_moves.push(planned);
                    leaving += 1;
                }
            }

            if !self.table().is_standard_folder(folder)
                && will_be_empty(&folder_path, leaving)
            {
                folders_to_remove.push(folder.clone());
            }
        }

        let mut files_by_category: BTreeMap<String, Vec<PlannedMove>> = BTreeMap::new();
        let mut total_files = 0;
        for entry in &root.files {
            if !self.filter().allows(&entry.name) {
                continue;
            }
            total_files += 1;
            let category = classifier.classify(entry);
            if let Some(planned) = plan.decide(entry, category) {
                files_by_category
                    .entry(category.to_string())
                    .or_default()
                    .push(planned);
            }
        }

        Ok(Preview {
            success: true,
            directory_path: directory.to_path_buf(),
            error: None,
            files_by_category,
            legacy_moves,
            folders_to_remove,
            skipped_files: plan.skipped,
            total_files,
            categories: self.table().to_rules(),
        })
    }
}

/// True if the folder would have no entries left after `leaving` files move
/// out of it.
fn will_be_empty(folder: &Path, leaving: usize) -> bool {
    fs::read_dir(folder)
        .map(|entries| entries.count() == leaving)
        .unwrap_or(false)
}
