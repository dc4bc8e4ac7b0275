//! sortdir - rule-based directory organizer with undo
//!
//! This library classifies the files of a directory by extension into
//! category folders, reconciles folders left behind by earlier rule sets,
//! previews runs without touching disk, and records each run so it can be
//! undone. Category rules are stored as JSON and settings as TOML.

pub mod analyze;
pub mod categories;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod mover;
pub mod organizer;
pub mod output;
pub mod policy;
pub mod reconcile;
pub mod scanner;
pub mod undo;

pub use analyze::{PlannedMove, Preview};
pub use categories::{CategoryError, CategoryStore, CategoryTable, FALLBACK_CATEGORY};
pub use classifier::Classifier;
pub use config::{ConfigError, FileFilter, Settings};
pub use mover::{MoveRecord, SkipReason};
pub use organizer::{OrganizeResult, Organizer};
pub use policy::FolderPolicy;
pub use scanner::ScanError;
pub use undo::{Ledger, UndoError, UndoReport, UndoStatus};
