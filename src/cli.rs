//! Command-line interface for sortdir.
//!
//! Parses arguments with clap, resolves settings and storage locations, and
//! drives the organizer, the undo ledger and the category store. Rendering is
//! delegated to [`OutputFormatter`]; `--json` prints result objects instead.

use crate::categories::{CategoryError, CategoryStore};
use crate::config::{ConfigError, FileFilter, PolicyMode, Settings};
use crate::organizer::Organizer;
use crate::output::OutputFormatter;
use crate::scanner::ScanError;
use crate::undo::{Ledger, UndoError};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Categories(#[from] CategoryError),

    #[error(transparent)]
    Undo(#[from] UndoError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("failed to encode JSON output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot resolve {}: {source}", path.display())]
    Path {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Neither a flag, a setting nor `$HOME` says where to keep a file.
    #[error("no location for the {what}; set HOME or pass --{flag}")]
    NoLocation {
        what: &'static str,
        flag: &'static str,
    },
}

/// Sort a directory into category folders, with undo.
#[derive(Debug, Parser)]
#[command(name = "sortdir", version, about, long_about = None)]
pub struct Cli {
    /// Settings file (defaults to ./.sortdirrc.toml, then ~/.config/sortdir/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Category rules file
    #[arg(long, global = true)]
    pub categories: Option<PathBuf>,

    /// Where the last operation is kept for undo
    #[arg(long, global = true)]
    pub history: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Move files into category folders
    Organize {
        /// Directory to organize
        dir: PathBuf,

        /// Folder to leave alone (repeatable)
        #[arg(short, long = "preserve", value_name = "NAME")]
        preserve: Vec<String>,

        /// Named folders may still receive files; they are only left unscanned
        #[arg(long)]
        exclude_mode: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show what organize would do without moving anything
    Analyze {
        dir: PathBuf,

        #[arg(short, long = "preserve", value_name = "NAME")]
        preserve: Vec<String>,

        #[arg(long)]
        exclude_mode: bool,

        #[arg(long)]
        json: bool,
    },

    /// Move the files of the last organize run back
    Undo,

    /// Show whether an undo is available
    Status,

    /// List subfolders that are not category folders
    Folders { dir: PathBuf },

    /// Delete subfolders and everything inside them
    RemoveFolders {
        dir: PathBuf,

        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Manage category rules
    #[command(subcommand)]
    Categories(CategoryCommand),
}

#[derive(Debug, Subcommand)]
pub enum CategoryCommand {
    /// Show every category and its extensions
    List,
    /// Add a category or replace its extensions
    Set {
        name: String,
        #[arg(required = true)]
        extensions: Vec<String>,
    },
    /// Delete a category
    Delete { name: String },
    /// Restore the built-in rules
    Reset,
}

/// Storage locations and settings resolved for one invocation.
struct Context {
    settings: Settings,
    categories: CategoryStore,
    history: PathBuf,
}

impl Context {
    fn resolve(cli: &Cli) -> Result<Self, CliError> {
        let settings = Settings::load(cli.config.as_deref())?;

        let categories = cli
            .categories
            .clone()
            .or_else(|| settings.organize.categories_file.clone())
            .or_else(CategoryStore::default_location)
            .ok_or(CliError::NoLocation {
                what: "category rules",
                flag: "categories",
            })?;
        let history = cli
            .history
            .clone()
            .or_else(|| settings.organize.history_file.clone())
            .or_else(Ledger::default_location)
            .ok_or(CliError::NoLocation {
                what: "undo history",
                flag: "history",
            })?;

        Ok(Self {
            settings,
            categories: CategoryStore::new(categories),
            history,
        })
    }

    fn organizer(&self) -> Result<Organizer, CliError> {
        let table = self.categories.load()?;
        let filter = FileFilter::compile(&self.settings.filters)?;
        Ok(Organizer::new(table).with_filter(filter))
    }
}

/// Runs one command.
///
/// Returns `Ok(false)` when the command ran but reported a failure to the
/// user (a directory that could not be organized, files that could not be
/// restored), so the caller can exit non-zero without printing it again.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use sortdir::cli::{Cli, run};
///
/// let cli = Cli::parse_from(["sortdir", "analyze", "/home/me/Downloads"]);
/// match run(cli) {
///     Ok(true) => {}
///     Ok(false) => std::process::exit(1),
///     Err(e) => eprintln!("{e}"),
/// }
/// ```
pub fn run(cli: Cli) -> Result<bool, CliError> {
    let ctx = Context::resolve(&cli)?;

    match cli.command {
        Command::Organize {
            dir,
            preserve,
            exclude_mode,
            json,
        } => organize(&ctx, &dir, preserve, exclude_mode, json),
        Command::Analyze {
            dir,
            preserve,
            exclude_mode,
            json,
        } => analyze(&ctx, &dir, preserve, exclude_mode, json),
        Command::Undo => undo(&ctx),
        Command::Status => {
            let ledger = Ledger::persistent(&ctx.history)?;
            OutputFormatter::undo_status(&ledger.status());
            Ok(true)
        }
        Command::Folders { dir } => {
            let folders = ctx.organizer()?.non_standard_folders(&absolute(&dir)?)?;
            OutputFormatter::folder_list(&folders);
            Ok(true)
        }
        Command::RemoveFolders { dir, names } => {
            let removed = ctx.organizer()?.remove_folders(&absolute(&dir)?, &names);
            for name in &names {
                if removed.contains(name) {
                    OutputFormatter::success(&format!("Removed {name}/"));
                } else {
                    OutputFormatter::error(&format!("Could not remove {name}"));
                }
            }
            Ok(removed.len() == names.len())
        }
        Command::Categories(command) => categories(&ctx.categories, command),
    }
}

fn organize(
    ctx: &Context,
    dir: &Path,
    preserve: Vec<String>,
    exclude_mode: bool,
    json: bool,
) -> Result<bool, CliError> {
    let dir = absolute(dir)?;
    let organizer = ctx.organizer()?;
    let policy = ctx
        .settings
        .organize
        .policy_with(preserve, exclude_mode.then_some(PolicyMode::Exclude));
    // Open the ledger first so a corrupt history fails before anything moves.
    let mut ledger = Ledger::persistent(&ctx.history)?;

    let spinner = (!json).then(|| OutputFormatter::create_spinner("Organizing..."));
    let result = organizer.organize(&dir, &policy);
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let mut metadata = BTreeMap::new();
    metadata.insert("command".to_string(), "organize".to_string());
    let recorded = ledger.record(&dir, result.file_movements.clone(), metadata);

    if json {
        print_json(&result)?;
    } else {
        OutputFormatter::organize_result(&result);
        if matches!(recorded, Ok(true)) {
            OutputFormatter::info("Run 'sortdir undo' to revert these changes.");
        }
    }
    if let Err(e) = &recorded {
        OutputFormatter::error(&format!("Undo is not available for this run: {e}"));
    }
    Ok(result.success && recorded.is_ok())
}

fn analyze(
    ctx: &Context,
    dir: &Path,
    preserve: Vec<String>,
    exclude_mode: bool,
    json: bool,
) -> Result<bool, CliError> {
    let dir = absolute(dir)?;
    let organizer = ctx.organizer()?;
    let policy = ctx
        .settings
        .organize
        .policy_with(preserve, exclude_mode.then_some(PolicyMode::Exclude));

    let spinner = (!json).then(|| OutputFormatter::create_spinner("Analyzing..."));
    let preview = organizer.analyze(&dir, &policy);
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    if json {
        print_json(&preview)?;
    } else {
        OutputFormatter::preview(&preview);
    }
    Ok(preview.success)
}

fn undo(ctx: &Context) -> Result<bool, CliError> {
    let mut ledger = Ledger::persistent(&ctx.history)?;
    match ledger.undo() {
        Ok(report) => {
            OutputFormatter::undo_report(&report);
            Ok(report.is_complete_success())
        }
        Err(UndoError::NothingToUndo) => {
            OutputFormatter::info("Nothing to undo.");
            Ok(true)
        }
        Err(e) => Err(e.into()),
    }
}

fn categories(store: &CategoryStore, command: CategoryCommand) -> Result<bool, CliError> {
    match command {
        CategoryCommand::List => {
            OutputFormatter::category_rules(&store.load()?);
        }
        CategoryCommand::Set { name, extensions } => {
            store.update_category(&name, &extensions)?;
            OutputFormatter::success(&format!("Saved category {name}"));
        }
        CategoryCommand::Delete { name } => {
            store.delete_category(&name)?;
            OutputFormatter::success(&format!("Deleted category {name}"));
        }
        CategoryCommand::Reset => {
            store.reset_to_defaults()?;
            OutputFormatter::success("Restored the default categories");
        }
    }
    Ok(true)
}

fn absolute(dir: &Path) -> Result<PathBuf, CliError> {
    std::path::absolute(dir).map_err(|source| CliError::Path {
        path: dir.to_path_buf(),
        source,
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
