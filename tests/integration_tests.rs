/// Integration tests for sortdir
///
/// These tests simulate real-world usage scenarios, testing the complete
/// end-to-end behaviour of the organizer, the undo ledger, the category
/// store and the command-line front end.
///
/// Test categories:
/// 1. Basic organization workflows
/// 2. Idempotence and collisions
/// 3. Preserve and exclude policies
/// 4. Reconciliation after rule changes
/// 5. Analysis (dry run)
/// 6. Undo
/// 7. Folder management and category rules
/// 8. Command-line workflows
use clap::Parser;
use sortdir::cli::{Cli, run};
use sortdir::{
    CategoryStore, CategoryTable, FileFilter, FolderPolicy, Ledger, Organizer, UndoError,
};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// A test fixture with a directory to organize and a separate directory for
/// settings, category rules and undo history.
struct TestFixture {
    temp_dir: TempDir,
    state_dir: TempDir,
}

impl TestFixture {
    /// Create a new test fixture with empty temporary directories.
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let state_dir = TempDir::new().expect("Failed to create state directory");
        TestFixture {
            temp_dir,
            state_dir,
        }
    }

    /// Get the path to the directory being organized.
    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    fn config_path(&self) -> PathBuf {
        self.state_dir.path().join("config.toml")
    }

    fn categories_path(&self) -> PathBuf {
        self.state_dir.path().join("categories.json")
    }

    fn history_path(&self) -> PathBuf {
        self.state_dir.path().join("last_operation.json")
    }

    /// Create a file with content, creating parent folders as needed.
    fn create_file(&self, name: &str, content: &[u8]) {
        let file_path = self.path().join(name);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        let mut file = File::create(&file_path).expect("Failed to create file");
        file.write_all(content)
            .expect("Failed to write file content");
    }

    fn create_text_file(&self, name: &str, content: &str) {
        self.create_file(name, content.as_bytes());
    }

    fn create_subdir(&self, name: &str) {
        fs::create_dir_all(self.path().join(name)).expect("Failed to create subdirectory");
    }

    /// Create several small text files, using the name as content.
    fn create_files(&self, names: &[&str]) {
        for name in names {
            self.create_text_file(name, name);
        }
    }

    fn read(&self, rel_path: &str) -> String {
        fs::read_to_string(self.path().join(rel_path)).expect("Failed to read file")
    }

    fn assert_dir_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(path.is_dir(), "Directory should exist: {}", path.display());
    }

    fn assert_file_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(path.is_file(), "File should exist: {}", path.display());
    }

    fn assert_file_not_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(!path.exists(), "File should not exist: {}", path.display());
    }

    /// Count files directly in the test directory.
    fn count_files(&self) -> usize {
        self.entries().filter(|p| p.is_file()).count()
    }

    /// Count directories directly in the test directory.
    fn count_dirs(&self) -> usize {
        self.entries().filter(|p| p.is_dir()).count()
    }

    fn entries(&self) -> impl Iterator<Item = PathBuf> {
        fs::read_dir(self.path())
            .expect("Failed to read directory")
            .flatten()
            .map(|e| e.path())
    }

    /// List all files in the directory recursively.
    fn list_files_recursive(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        Self::walk_dir(self.path(), &mut files);
        files.sort();
        files
    }

    fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) {
        if let Ok(entries) = fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_file() {
                    files.push(path);
                } else if path.is_dir() {
                    Self::walk_dir(&path, files);
                }
            }
        }
    }

    /// Runs the CLI with this fixture's settings, rules and history files.
    fn cli(&self, args: &[&str]) -> bool {
        if !self.config_path().exists() {
            fs::write(self.config_path(), "").expect("Failed to write settings");
        }
        let mut argv: Vec<OsString> = vec![
            "sortdir".into(),
            "--config".into(),
            self.config_path().into(),
            "--categories".into(),
            self.categories_path().into(),
            "--history".into(),
            self.history_path().into(),
        ];
        argv.extend(args.iter().map(OsString::from));
        run(Cli::parse_from(argv)).expect("Command failed")
    }

    /// Same as [`TestFixture::cli`] with the test directory as first argument
    /// after the subcommand.
    fn cli_on_dir(&self, command: &str, extra: &[&str]) -> bool {
        let dir = self.path().to_string_lossy().into_owned();
        let mut args = vec![command, dir.as_str()];
        args.extend_from_slice(extra);
        self.cli(&args)
    }
}

fn organizer() -> Organizer {
    Organizer::new(CategoryTable::defaults()).with_filter(FileFilter::allow_all())
}

fn table(entries: &[(&str, &[&str])]) -> CategoryTable {
    CategoryTable::from_rules(
        entries
            .iter()
            .map(|(n, e)| (n.to_string(), e.iter().map(|s| s.to_string()).collect()))
            .collect(),
    )
}

// ============================================================================
// Basic Organization Tests
// ============================================================================

#[test]
fn test_organize_empty_directory() {
    let fixture = TestFixture::new();

    let result = organizer().organize(fixture.path(), &FolderPolicy::default());

    assert!(result.success);
    assert_eq!(result.files_moved, 0);
    assert_eq!(fixture.count_dirs(), 0, "No category folders should be created");
}

#[test]
fn test_organize_report_photo_notes() {
    let fixture = TestFixture::new();
    fixture.create_files(&["report.pdf", "photo.jpg", "notes"]);

    let result = organizer().organize(fixture.path(), &FolderPolicy::default());

    assert!(result.success);
    assert_eq!(result.files_moved, 3);
    fixture.assert_file_exists("Documents/report.pdf");
    fixture.assert_file_exists("Images/photo.jpg");
    fixture.assert_file_exists("Other/notes");
    assert_eq!(fixture.count_files(), 0);

    let mut expected = BTreeMap::new();
    expected.insert("Documents".to_string(), 1);
    expected.insert("Images".to_string(), 1);
    expected.insert("Other".to_string(), 1);
    assert_eq!(result.stats, expected);
}

#[test]
fn test_organize_preserves_file_content() {
    let fixture = TestFixture::new();
    let content = "Line 1\nLine 2\nSpecial chars: äöü\n";
    fixture.create_text_file("notes.txt", content);

    organizer().organize(fixture.path(), &FolderPolicy::default());

    assert_eq!(fixture.read("Documents/notes.txt"), content);
}

#[test]
fn test_organize_mixed_case_and_multiple_dots() {
    let fixture = TestFixture::new();
    fixture.create_files(&["IMAGE.PNG", "Report.Pdf", "archive.tar.gz", "v1.2.3.mp3"]);

    organizer().organize(fixture.path(), &FolderPolicy::default());

    fixture.assert_file_exists("Images/IMAGE.PNG");
    fixture.assert_file_exists("Documents/Report.Pdf");
    fixture.assert_file_exists("Compressed/archive.tar.gz");
    fixture.assert_file_exists("Audio/v1.2.3.mp3");
}

#[test]
fn test_files_without_extension_go_to_other() {
    let fixture = TestFixture::new();
    fixture.create_files(&["README", "Makefile", "trailing."]);

    let result = organizer().organize(fixture.path(), &FolderPolicy::default());

    assert_eq!(result.files_moved, 3);
    fixture.assert_file_exists("Other/README");
    fixture.assert_file_exists("Other/Makefile");
    fixture.assert_file_exists("Other/trailing.");
}

#[test]
fn test_only_needed_category_folders_created() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.pdf", "b.docx"]);

    organizer().organize(fixture.path(), &FolderPolicy::default());

    assert_eq!(fixture.count_dirs(), 1);
    fixture.assert_dir_exists("Documents");
}

#[test]
fn test_default_filter_leaves_system_files() {
    let fixture = TestFixture::new();
    fixture.create_files(&[".DS_Store", "Thumbs.db", ".env", "photo.png"]);

    let result = Organizer::new(CategoryTable::defaults())
        .with_filter(FileFilter::default())
        .organize(fixture.path(), &FolderPolicy::default());

    assert_eq!(result.files_moved, 1);
    fixture.assert_file_exists(".DS_Store");
    fixture.assert_file_exists("Thumbs.db");
    fixture.assert_file_exists(".env");
    assert!(result.skipped_files.is_empty());
}

// ============================================================================
// Idempotence and Collision Tests
// ============================================================================

#[test]
fn test_second_run_moves_nothing() {
    let fixture = TestFixture::new();
    fixture.create_files(&["report.pdf", "photo.jpg", "notes"]);
    let organizer = organizer();

    organizer.organize(fixture.path(), &FolderPolicy::default());
    let dirs_after_first = fixture.count_dirs();
    let files_after_first = fixture.list_files_recursive();

    let second = organizer.organize(fixture.path(), &FolderPolicy::default());

    assert!(second.success);
    assert_eq!(second.files_moved, 0);
    assert!(second.skipped_files.is_empty());
    assert_eq!(fixture.count_dirs(), dirs_after_first);
    assert_eq!(fixture.list_files_recursive(), files_after_first);
}

#[test]
fn test_loose_file_named_like_category_folder() {
    let fixture = TestFixture::new();
    fixture.create_files(&["Images", "photo.png"]);
    let organizer = organizer();

    let first = organizer.organize(fixture.path(), &FolderPolicy::default());

    assert!(first.failed_files.is_empty());
    assert_eq!(first.files_moved, 2);
    assert_eq!(fixture.read("Other/Images"), "Images");
    fixture.assert_file_exists("Images/photo.png");

    let second = organizer.organize(fixture.path(), &FolderPolicy::default());
    assert_eq!(second.files_moved, 0);
    assert!(second.failed_files.is_empty());
}

#[test]
fn test_existing_destination_is_never_overwritten() {
    let fixture = TestFixture::new();
    fixture.create_text_file("Documents/report.pdf", "already sorted");
    fixture.create_text_file("report.pdf", "new download");

    let result = organizer().organize(fixture.path(), &FolderPolicy::default());

    assert_eq!(result.files_moved, 0);
    assert_eq!(result.skipped_files.len(), 1);
    assert_eq!(result.skipped_files[0].file_name, "report.pdf");
    assert_eq!(
        result.skipped_files[0].reason.to_string(),
        "already exists in Documents folder"
    );
    assert_eq!(fixture.read("report.pdf"), "new download");
    assert_eq!(fixture.read("Documents/report.pdf"), "already sorted");
}

#[test]
fn test_organize_then_add_files_then_organize_again() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.pdf"]);
    let organizer = organizer();
    organizer.organize(fixture.path(), &FolderPolicy::default());

    fixture.create_files(&["b.pdf", "c.mp4"]);
    let result = organizer.organize(fixture.path(), &FolderPolicy::default());

    assert_eq!(result.files_moved, 2);
    fixture.assert_file_exists("Documents/a.pdf");
    fixture.assert_file_exists("Documents/b.pdf");
    fixture.assert_file_exists("Videos/c.mp4");
}

// ============================================================================
// Preserve and Exclude Policy Tests
// ============================================================================

#[test]
fn test_preserved_folder_is_untouched() {
    let fixture = TestFixture::new();
    fixture.create_files(&["Projects/plan.pdf", "Projects/logo.png", "loose.pdf"]);

    let result = organizer().organize(fixture.path(), &FolderPolicy::preserve(["Projects"]));

    fixture.assert_file_exists("Projects/plan.pdf");
    fixture.assert_file_exists("Projects/logo.png");
    fixture.assert_file_exists("Documents/loose.pdf");
    assert_eq!(result.preserved_folders, vec!["Projects".to_string()]);
    assert!(result.removed_folders.is_empty());
}

#[test]
fn test_preserved_category_never_receives_files() {
    let fixture = TestFixture::new();
    fixture.create_files(&["photo.jpg", "report.pdf"]);

    let result = organizer().organize(fixture.path(), &FolderPolicy::preserve(["Images"]));

    fixture.assert_file_exists("photo.jpg");
    fixture.assert_file_not_exists("Images");
    fixture.assert_file_exists("Documents/report.pdf");
    assert_eq!(result.skipped_files[0].reason.to_string(), "destination preserved");
}

#[test]
fn test_exclude_mode_folder_still_receives_files() {
    let fixture = TestFixture::new();
    fixture.create_files(&["Images/old.pdf", "new.png"]);

    let result = organizer().organize(fixture.path(), &FolderPolicy::exclude(["Images"]));

    // Not reorganized, but still a destination
    fixture.assert_file_exists("Images/old.pdf");
    fixture.assert_file_exists("Images/new.png");
    assert_eq!(result.files_moved, 1);
}

#[test]
fn test_empty_preserved_legacy_folder_survives() {
    let fixture = TestFixture::new();
    fixture.create_subdir("Keep");
    fixture.create_subdir("Drop");

    let result = organizer().organize(fixture.path(), &FolderPolicy::preserve(["Keep"]));

    fixture.assert_dir_exists("Keep");
    fixture.assert_file_not_exists("Drop");
    assert_eq!(result.removed_folders, vec!["Drop".to_string()]);
}

// ============================================================================
// Reconciliation Tests
// ============================================================================

#[test]
fn test_renamed_category_is_reconciled() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.pdf", "b.pdf"]);

    let old_rules = Organizer::new(table(&[("PDFs", &[".pdf"])])).with_filter(FileFilter::allow_all());
    old_rules.organize(fixture.path(), &FolderPolicy::default());
    fixture.assert_file_exists("PDFs/a.pdf");

    let new_rules =
        Organizer::new(table(&[("Documents", &[".pdf"])])).with_filter(FileFilter::allow_all());
    let result = new_rules.organize(fixture.path(), &FolderPolicy::default());

    fixture.assert_file_exists("Documents/a.pdf");
    fixture.assert_file_exists("Documents/b.pdf");
    fixture.assert_file_not_exists("PDFs");
    assert_eq!(result.removed_folders, vec!["PDFs".to_string()]);
    // Relocations count as moves
    assert_eq!(result.files_moved, 2);
    assert_eq!(result.stats.get("Documents"), Some(&2));
}

#[test]
fn test_dropped_extension_moves_to_other() {
    let fixture = TestFixture::new();
    fixture.create_files(&["Documents/page.md", "Documents/report.pdf"]);

    let organizer =
        Organizer::new(table(&[("Documents", &[".pdf"])])).with_filter(FileFilter::allow_all());
    organizer.organize(fixture.path(), &FolderPolicy::default());

    fixture.assert_file_exists("Documents/report.pdf");
    fixture.assert_file_exists("Other/page.md");
}

#[test]
fn test_legacy_folder_with_leftovers_is_kept() {
    let fixture = TestFixture::new();
    fixture.create_text_file("Old/a.pdf", "legacy");
    fixture.create_text_file("Documents/a.pdf", "current");
    fixture.create_subdir("Old/nested");

    let result = organizer().organize(fixture.path(), &FolderPolicy::default());

    assert_eq!(fixture.read("Old/a.pdf"), "legacy");
    assert_eq!(fixture.read("Documents/a.pdf"), "current");
    fixture.assert_dir_exists("Old/nested");
    assert!(result.removed_folders.is_empty());
    assert_eq!(result.skipped_files.len(), 1);
}

// ============================================================================
// Analysis Tests
// ============================================================================

#[test]
fn test_analyze_doesnt_move_files() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.pdf", "b.png", "Legacy/c.mp3"]);
    let before = fixture.list_files_recursive();

    let preview = organizer().analyze(fixture.path(), &FolderPolicy::default());

    assert!(preview.success);
    assert_eq!(preview.total_files, 2);
    assert_eq!(preview.planned_moves(), 3);
    assert_eq!(preview.folders_to_remove, vec!["Legacy".to_string()]);
    assert_eq!(fixture.list_files_recursive(), before);
}

#[test]
fn test_analyze_vs_actual_organization() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.pdf", "b.png", "c", "Old/d.zip", "Old/keep.pdf"]);
    fixture.create_text_file("Documents/keep.pdf", "existing");
    let organizer = organizer();

    let preview = organizer.analyze(fixture.path(), &FolderPolicy::default());
    let result = organizer.organize(fixture.path(), &FolderPolicy::default());

    assert_eq!(preview.planned_moves(), result.files_moved);
    assert_eq!(preview.skipped_files.len(), result.skipped_files.len());
    assert_eq!(preview.folders_to_remove, result.removed_folders);
}

// ============================================================================
// Undo Tests
// ============================================================================

#[test]
fn test_undo_round_trip() {
    let fixture = TestFixture::new();
    fixture.create_files(&["report.pdf", "photo.jpg", "notes", "song.mp3"]);
    let before = fixture.list_files_recursive();

    let result = organizer().organize(fixture.path(), &FolderPolicy::default());
    let mut ledger = Ledger::in_memory();
    assert!(
        ledger
            .record(fixture.path(), result.file_movements, BTreeMap::new())
            .unwrap()
    );
    assert_eq!(ledger.status().file_count, Some(4));

    let report = ledger.undo().expect("Undo failed");

    assert_eq!(report.restored_count, 4);
    assert_eq!(report.failed_count, 0);
    assert_eq!(fixture.list_files_recursive(), before);
    assert!(!ledger.status().available);
}

#[test]
fn test_undo_restores_into_removed_legacy_folder() {
    let fixture = TestFixture::new();
    fixture.create_text_file("Old/a.pdf", "a");

    let result = organizer().organize(fixture.path(), &FolderPolicy::default());
    fixture.assert_file_not_exists("Old");

    let mut ledger = Ledger::in_memory();
    ledger
        .record(fixture.path(), result.file_movements, BTreeMap::new())
        .unwrap();
    ledger.undo().expect("Undo failed");

    assert_eq!(fixture.read("Old/a.pdf"), "a");
}

#[test]
fn test_undo_without_history() {
    let mut ledger = Ledger::in_memory();
    assert!(matches!(ledger.undo(), Err(UndoError::NothingToUndo)));
}

#[test]
fn test_undo_with_modified_files() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.pdf", "b.pdf"]);

    let result = organizer().organize(fixture.path(), &FolderPolicy::default());
    let mut ledger = Ledger::in_memory();
    ledger
        .record(fixture.path(), result.file_movements, BTreeMap::new())
        .unwrap();

    fs::remove_file(fixture.path().join("Documents/a.pdf")).unwrap();
    let report = ledger.undo().expect("Undo failed");

    assert_eq!(report.restored_count, 1);
    assert_eq!(report.failed_count, 1);
    assert_eq!(
        report.failed_files[0].reason,
        "File no longer exists at new location"
    );
    fixture.assert_file_exists("b.pdf");
    // A partially failed undo still consumes the ledger
    assert!(matches!(ledger.undo(), Err(UndoError::NothingToUndo)));
}

// ============================================================================
// Folder Management and Category Rules Tests
// ============================================================================

#[test]
fn test_list_and_remove_non_standard_folders() {
    let fixture = TestFixture::new();
    fixture.create_files(&["Projects/x.txt", "Backup 2020/y.bak"]);
    fixture.create_subdir("Documents");
    let organizer = organizer();

    let folders = organizer.non_standard_folders(fixture.path()).unwrap();
    assert_eq!(folders, vec!["Backup 2020".to_string(), "Projects".to_string()]);

    let removed = organizer.remove_folders(fixture.path(), &folders);
    assert_eq!(removed, folders);
    fixture.assert_file_not_exists("Projects");
    fixture.assert_dir_exists("Documents");
}

#[test]
fn test_custom_categories_from_store() {
    let fixture = TestFixture::new();
    let store = CategoryStore::new(fixture.categories_path());
    store
        .update_category("Ebooks", &["mobi".to_string(), "azw3".to_string()])
        .unwrap();
    fixture.create_files(&["book.mobi", "book.azw3"]);

    let organizer = Organizer::new(store.load().unwrap());
    organizer.organize(fixture.path(), &FolderPolicy::default());

    fixture.assert_file_exists("Ebooks/book.mobi");
    fixture.assert_file_exists("Ebooks/book.azw3");
}

// ============================================================================
// Command-Line Workflow Tests
// ============================================================================

#[test]
fn test_cli_organize_then_undo() {
    let fixture = TestFixture::new();
    fixture.create_files(&["report.pdf", "photo.jpg"]);
    let before = fixture.list_files_recursive();

    assert!(fixture.cli_on_dir("organize", &[]));
    fixture.assert_file_exists("Documents/report.pdf");
    assert!(fixture.history_path().is_file());
    assert!(fixture.cli(&["status"]));

    let ledger = Ledger::persistent(fixture.history_path()).unwrap();
    let status = ledger.status();
    assert_eq!(status.file_count, Some(2));
    assert_eq!(
        status.metadata.get("command").map(String::as_str),
        Some("organize")
    );

    assert!(fixture.cli(&["undo"]));
    assert_eq!(fixture.list_files_recursive(), before);
    assert!(!fixture.history_path().exists());

    // Nothing left to undo is not a failure
    assert!(fixture.cli(&["undo"]));
}

#[cfg(unix)]
#[test]
fn test_cli_unsavable_history_disables_undo() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let fixture = TestFixture::new();
    fixture.create_files(&["a.pdf"]);
    assert!(fixture.cli_on_dir("organize", &[]));
    assert!(fixture.history_path().is_file());

    let name = OsStr::from_bytes(b"b\xff.jpg");
    fs::write(fixture.path().join(name), "b").unwrap();
    assert!(!fixture.cli_on_dir("organize", &[]));
    assert!(fixture.path().join("Images").join(name).is_file());
    assert!(!fixture.history_path().exists());

    // The first run must not be replayed in place of the second
    assert!(fixture.cli(&["undo"]));
    fixture.assert_file_exists("Documents/a.pdf");
    assert!(fixture.path().join("Images").join(name).is_file());
}

#[test]
fn test_cli_analyze_json_leaves_files() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.pdf"]);

    assert!(fixture.cli_on_dir("analyze", &["--json"]));
    fixture.assert_file_exists("a.pdf");
    assert!(!fixture.history_path().exists());
}

#[test]
fn test_cli_missing_directory_reports_failure() {
    let fixture = TestFixture::new();
    let missing = fixture.path().join("missing").to_string_lossy().into_owned();
    assert!(!fixture.cli(&["organize", &missing]));
}

#[test]
fn test_cli_settings_filters_and_preserve() {
    let fixture = TestFixture::new();
    fs::write(
        fixture.config_path(),
        r#"
[organize]
preserve = ["Work"]

[filters]
globs = ["*.part"]
"#,
    )
    .unwrap();
    fixture.create_files(&["movie.mp4.part", "Work/notes.txt", "done.mp4"]);

    assert!(fixture.cli_on_dir("organize", &[]));

    fixture.assert_file_exists("movie.mp4.part");
    fixture.assert_file_exists("Work/notes.txt");
    fixture.assert_file_exists("Videos/done.mp4");
}

#[test]
fn test_cli_category_management() {
    let fixture = TestFixture::new();

    assert!(fixture.cli(&["categories", "set", "Ebooks", "epub", ".MOBI"]));
    let table = CategoryStore::new(fixture.categories_path()).load().unwrap();
    assert_eq!(table.category_for(".mobi"), Some("Ebooks"));

    assert!(fixture.cli(&["categories", "delete", "Ebooks"]));
    let table = CategoryStore::new(fixture.categories_path()).load().unwrap();
    assert!(!table.contains_category("Ebooks"));

    assert!(fixture.cli(&["categories", "reset"]));
    assert!(fixture.cli(&["categories", "list"]));
}

#[test]
fn test_cli_remove_folders_reports_partial_failure() {
    let fixture = TestFixture::new();
    fixture.create_files(&["Old/x.txt"]);
    assert!(fixture.cli_on_dir("folders", &[]));

    assert!(!fixture.cli_on_dir("remove-folders", &["Old", "Missing"]));
    fixture.assert_file_not_exists("Old");
}
