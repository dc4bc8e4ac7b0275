/// The organize pipeline: reconcile, then sort loose files.
///
/// [`Organizer`] owns the category rules and the file filter for a session
/// and exposes the operations callers need: [`Organizer::organize`],
/// [`Organizer::analyze`] (see [`crate::analyze`]), and the folder cleanup
/// helpers [`Organizer::non_standard_folders`] and
/// [`Organizer::remove_folders`].
use crate::categories::CategoryTable;
use crate::classifier::Classifier;
use crate::config::FileFilter;
use crate::mover::{FailedFile, MoveLog, MoveRecord, Mover, SkippedFile, ensure_folder};
use crate::policy::FolderPolicy;
use crate::reconcile::reconcile;
use crate::scanner::{self, ScanError};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{info, warn};

/// Summary of one organize run.
///
/// A run either fails as a whole (`success == false`, `error` set, nothing
/// else meaningful) or succeeds with per-file skips and failures listed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrganizeResult {
    pub success: bool,
    pub directory_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Number of files moved, including files relocated out of legacy folders.
    pub files_moved: usize,
    pub skipped_files: Vec<SkippedFile>,
    pub failed_files: Vec<FailedFile>,
    /// Files moved per destination category.
    pub stats: BTreeMap<String, usize>,
    /// Protected folders that exist in the directory.
    pub preserved_folders: Vec<String>,
    /// Empty legacy folders deleted during reconciliation.
    pub removed_folders: Vec<String>,
    pub file_movements: Vec<MoveRecord>,
}

impl OrganizeResult {
    fn failed(directory_path: &Path, error: &ScanError) -> Self {
        Self {
            success: false,
            directory_path: directory_path.to_path_buf(),
            error: Some(error.to_string()),
            files_moved: 0,
            skipped_files: Vec::new(),
            failed_files: Vec::new(),
            stats: BTreeMap::new(),
            preserved_folders: Vec::new(),
            removed_folders: Vec::new(),
            file_movements: Vec::new(),
        }
    }
}

/// Category rules and file filter for a session of organize runs.
#[derive(Debug, Clone)]
pub struct Organizer {
    table: CategoryTable,
    filter: FileFilter,
}

impl Organizer {
    /// Creates an organizer that considers every loose file.
    pub fn new(table: CategoryTable) -> Self {
        Self {
            table,
            filter: FileFilter::allow_all(),
        }
    }

    /// Restricts which files are touched, e.g. to the settings-file filters.
    pub fn with_filter(mut self, filter: FileFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn table(&self) -> &CategoryTable {
        &self.table
    }

    pub fn filter(&self) -> &FileFilter {
        &self.filter
    }

    pub fn classifier(&self) -> Classifier<'_> {
        Classifier::new(&self.table)
    }

    /// Organizes `directory` into category folders.
    ///
    /// Never panics and never returns an error: root-level problems are
    /// reported through `success` and `error` so every caller can render a
    /// status.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sortdir::{CategoryTable, FolderPolicy, Organizer};
    /// use std::path::Path;
    ///
    /// let organizer = Organizer::new(CategoryTable::defaults());
    /// let result = organizer.organize(Path::new("/home/me/Downloads"), &FolderPolicy::default());
    /// if result.success {
    ///     println!("moved {} files", result.files_moved);
    /// }
    /// ```
    pub fn organize(&self, directory: &Path, policy: &FolderPolicy) -> OrganizeResult {
        info!(path = %directory.display(), "organizing");
        match self.run(directory, policy) {
            Ok(result) => {
                info!(
                    moved = result.files_moved,
                    skipped = result.skipped_files.len(),
                    failed = result.failed_files.len(),
                    "organize finished"
                );
                result
            }
            Err(e) => {
                warn!(path = %directory.display(), error = %e, "organize failed");
                OrganizeResult::failed(directory, &e)
            }
        }
    }

    fn run(&self, directory: &Path, policy: &FolderPolicy) -> Result<OrganizeResult, ScanError> {
        let classifier = self.classifier();
        let mut log = MoveLog::new();

        let report = reconcile(directory, classifier, &self.filter, policy, &mut log)?;

        let root = scanner::scan(directory)?;
        let planned: Vec<_> = root
            .files
            .iter()
            .filter(|f| self.filter.allows(&f.name))
            .map(|f| (f, classifier.classify(f)))
            .collect();

        // Only create folders that will actually receive a file.
        let needed: BTreeSet<&str> = planned
            .iter()
            .map(|(_, category)| *category)
            .filter(|category| !policy.blocks_destination(category))
            .collect();

        // A loose file named like a needed folder has to leave first.
        let (blockers, rest): (Vec<_>, Vec<_>) = planned
            .into_iter()
            .partition(|(entry, _)| needed.contains(entry.name.as_str()));

        let mover = Mover::new(directory, policy);
        for (entry, category) in blockers {
            let outcome = mover.move_file(&entry.path, category);
            log.push(&entry.path, category, outcome);
        }
        for category in needed {
            if let Err(e) = ensure_folder(&directory.join(category)) {
                warn!(category, error = %e, "could not create category folder");
            }
        }
        for (entry, category) in rest {
            let outcome = mover.move_file(&entry.path, category);
            log.push(&entry.path, category, outcome);
        }

        let mut stats = BTreeMap::new();
        for record in &log.movements {
            *stats.entry(record.category.clone()).or_insert(0) += 1;
        }

        let preserved_folders = root
            .subfolders
            .iter()
            .filter(|name| policy.protects(name))
            .cloned()
            .collect();

        Ok(OrganizeResult {
            success: true,
            directory_path: directory.to_path_buf(),
            error: None,
            files_moved: log.movements.len(),
            skipped_files: log.skipped,
            failed_files: log.failed,
            stats,
            preserved_folders,
            removed_folders: report.removed_folders,
            file_movements: log.movements,
        })
    }

    /// Subfolders that are neither a current category nor the fallback
    /// folder.
    pub fn non_standard_folders(&self, directory: &Path) -> Result<Vec<String>, ScanError> {
        let scan = scanner::scan(directory)?;
        Ok(scan
            .subfolders
            .into_iter()
            .filter(|name| !self.table.is_standard_folder(name))
            .collect())
    }

    /// Recursively deletes the named subfolders of `directory`.
    ///
    /// Best effort: a folder that cannot be removed (or whose name would
    /// reach outside `directory`) is logged and left out of the returned
    /// list.
    pub fn remove_folders(&self, directory: &Path, names: &[String]) -> Vec<String> {
        let mut removed = Vec::new();
        for name in names {
            if !is_plain_folder_name(name) {
                warn!(folder = %name, "refusing to remove folder outside the target directory");
                continue;
            }
            let path = directory.join(name);
            let is_dir = fs::symlink_metadata(&path)
                .map(|m| m.is_dir())
                .unwrap_or(false);
            if !is_dir {
                warn!(folder = %name, "not a folder, nothing removed");
                continue;
            }
            match fs::remove_dir_all(&path) {
                Ok(()) => {
                    info!(folder = %name, "removed folder");
                    removed.push(name.clone());
                }
                Err(e) => warn!(folder = %name, error = %e, "failed to remove folder"),
            }
        }
        removed
    }
}

/// True if `name` is a single normal path component.
fn is_plain_folder_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
