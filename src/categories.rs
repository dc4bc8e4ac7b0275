/// Category rules: which file extensions belong to which category folder.
///
/// A [`CategoryTable`] is an ordered mapping of category name to a set of
/// extensions. The reverse lookup (extension to category) is rebuilt every
/// time the table changes, and resolves duplicate extensions to the category
/// that appears first in table order.
///
/// # Examples
///
/// ```
/// use sortdir::categories::CategoryTable;
///
/// let table = CategoryTable::defaults();
/// assert_eq!(table.category_for(".pdf"), Some("Documents"));
/// assert_eq!(table.category_for("JPG"), Some("Images"));
/// assert_eq!(table.category_for(".nope"), None);
/// ```
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Folder that receives every file whose extension matches no category.
///
/// This name is reserved and can never be used as a key of a [`CategoryTable`].
pub const FALLBACK_CATEGORY: &str = "Other";

/// Built-in rules used until the user saves their own.
const DEFAULT_RULES: &[(&str, &[&str])] = &[
    (
        "Documents",
        &[".pdf", ".doc", ".docx", ".txt", ".rtf", ".odt", ".tex", ".md"],
    ),
    ("Spreadsheets", &[".xls", ".xlsx", ".csv", ".ods", ".xlsm"]),
    ("Presentations", &[".ppt", ".pptx", ".odp", ".key", ".pps"]),
    (
        "Images",
        &[
            ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff", ".svg", ".webp", ".heic",
        ],
    ),
    (
        "Videos",
        &[
            ".mp4", ".mov", ".avi", ".mkv", ".wmv", ".flv", ".webm", ".m4v", ".mpg", ".mpeg",
        ],
    ),
    (
        "Audio",
        &[".mp3", ".wav", ".ogg", ".flac", ".aac", ".wma", ".m4a"],
    ),
    (
        "Compressed",
        &[".zip", ".rar", ".7z", ".tar", ".gz", ".bz2", ".xz", ".iso"],
    ),
    (
        "Executables",
        &[".exe", ".msi", ".app", ".dmg", ".apk", ".bat", ".sh"],
    ),
    (
        "Code",
        &[
            ".js", ".py", ".java", ".c", ".cpp", ".cs", ".php", ".html", ".css", ".ts", ".jsx",
            ".tsx", ".swift", ".go", ".rb",
        ],
    ),
    ("Fonts", &[".ttf", ".otf", ".woff", ".woff2", ".eot"]),
    ("Backups", &[".bak", ".old", ".backup"]),
    (
        "Scripts",
        &[".ps1", ".vbs", ".bash", ".cmd", ".pl", ".lua", ".sql"],
    ),
    (
        "Miscellaneous",
        &[
            ".json", ".xml", ".yaml", ".yml", ".log", ".ini", ".cfg", ".config",
        ],
    ),
    ("Shortcuts", &[".lnk", ".url", ".desktop", ".shortcut"]),
    ("WebApps", &[".pwa", ".crx", ".xpi"]),
    ("WebPages", &[".htm", ".mht", ".mhtml", ".epub"]),
];

/// Errors raised by rule management and rule persistence.
#[derive(Debug, Error)]
pub enum CategoryError {
    /// The fallback folder name cannot be configured as a category.
    #[error("\"{name}\" is reserved for unmatched files and cannot be a category")]
    ReservedName { name: String },

    /// Category names must not be blank.
    #[error("category name must not be empty")]
    EmptyName,

    /// No category with this name exists.
    #[error("category \"{name}\" not found")]
    NotFound { name: String },

    #[error("failed to read category rules from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write category rules to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid category rules in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// An extension claimed by more than one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionConflict {
    pub extension: String,
    /// The category lookups resolve to (first in table order).
    pub winner: String,
    /// Later categories that also list the extension.
    pub shadowed: Vec<String>,
}

/// Normalizes a user-supplied extension to lower case with a leading dot.
///
/// Returns `None` for blank input.
///
/// ```
/// use sortdir::categories::normalize_extension;
///
/// assert_eq!(normalize_extension("PDF").as_deref(), Some(".pdf"));
/// assert_eq!(normalize_extension(".Tar").as_deref(), Some(".tar"));
/// assert_eq!(normalize_extension("  "), None);
/// ```
pub fn normalize_extension(ext: &str) -> Option<String> {
    let trimmed = ext.trim();
    if trimmed.is_empty() || trimmed == "." {
        return None;
    }
    let lower = trimmed.to_lowercase();
    if lower.starts_with('.') {
        Some(lower)
    } else {
        Some(format!(".{lower}"))
    }
}

/// Ordered category rules plus the memoized extension index.
#[derive(Debug, Clone, Default)]
pub struct CategoryTable {
    rules: IndexMap<String, IndexSet<String>>,
    index: HashMap<String, String>,
}

impl CategoryTable {
    /// Creates an empty table. Every file classifies as [`FALLBACK_CATEGORY`].
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in rule set.
    pub fn defaults() -> Self {
        let rules = DEFAULT_RULES
            .iter()
            .map(|(name, exts)| {
                (
                    name.to_string(),
                    exts.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
                )
            })
            .collect();
        Self::from_rules(rules)
    }

    /// Builds a table from raw `category -> extensions` rules.
    ///
    /// Extensions are normalized and blank ones dropped. A rule using the
    /// reserved fallback name is ignored with a warning rather than rejected,
    /// so a hand-edited rules file never prevents organizing.
    pub fn from_rules(rules: IndexMap<String, Vec<String>>) -> Self {
        let mut table = Self::new();
        for (name, exts) in rules {
            let name = name.trim().to_string();
            if name.is_empty() {
                warn!("ignoring category rule with an empty name");
                continue;
            }
            if name == FALLBACK_CATEGORY {
                warn!(category = %name, "ignoring rule for reserved fallback category");
                continue;
            }
            let set = exts.iter().filter_map(|e| normalize_extension(e)).collect();
            table.rules.insert(name, set);
        }
        table.rebuild_index();
        table
    }

    /// Raw rules in table order, suitable for serialization.
    pub fn to_rules(&self) -> IndexMap<String, Vec<String>> {
        self.rules
            .iter()
            .map(|(name, exts)| (name.clone(), exts.iter().cloned().collect()))
            .collect()
    }

    fn rebuild_index(&mut self) {
        let mut index = HashMap::new();
        for (name, exts) in &self.rules {
            for ext in exts {
                // First category in table order wins.
                index.entry(ext.clone()).or_insert_with(|| name.clone());
            }
        }
        debug!(
            categories = self.rules.len(),
            extensions = index.len(),
            "rebuilt extension index"
        );
        self.index = index;
    }

    /// Reverse lookup map, extension to category.
    pub fn extension_index(&self) -> &HashMap<String, String> {
        &self.index
    }

    /// Looks up the category for an extension, accepting any case and an
    /// optional leading dot.
    pub fn category_for(&self, ext: &str) -> Option<&str> {
        let ext = normalize_extension(ext)?;
        self.index.get(&ext).map(String::as_str)
    }

    /// Category names in table order.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Extensions configured for a category.
    pub fn extensions(&self, name: &str) -> Option<impl Iterator<Item = &str>> {
        self.rules.get(name).map(|set| set.iter().map(String::as_str))
    }

    pub fn contains_category(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// True for folder names the organizer owns: a current category or the
    /// fallback folder.
    pub fn is_standard_folder(&self, name: &str) -> bool {
        name == FALLBACK_CATEGORY || self.contains_category(name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Adds a category or replaces the extensions of an existing one.
    ///
    /// An existing category keeps its position in table order.
    pub fn set_category(&mut self, name: &str, extensions: &[String]) -> Result<(), CategoryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CategoryError::EmptyName);
        }
        if name == FALLBACK_CATEGORY {
            return Err(CategoryError::ReservedName {
                name: name.to_string(),
            });
        }
        let set = extensions
            .iter()
            .filter_map(|e| normalize_extension(e))
            .collect();
        self.rules.insert(name.to_string(), set);
        self.rebuild_index();
        Ok(())
    }

    /// Deletes a category, preserving the order of the remaining ones.
    pub fn remove_category(&mut self, name: &str) -> Result<(), CategoryError> {
        if self.rules.shift_remove(name).is_none() {
            return Err(CategoryError::NotFound {
                name: name.to_string(),
            });
        }
        self.rebuild_index();
        Ok(())
    }

    /// Finds the first category listing `ext`, optionally ignoring one
    /// category (useful when editing that category's own rules).
    pub fn find_category(&self, ext: &str, exclude: Option<&str>) -> Option<&str> {
        let ext = normalize_extension(ext)?;
        self.rules
            .iter()
            .filter(|(name, _)| Some(name.as_str()) != exclude)
            .find(|(_, exts)| exts.contains(&ext))
            .map(|(name, _)| name.as_str())
    }

    /// Extensions listed by more than one category.
    pub fn conflicts(&self) -> Vec<ExtensionConflict> {
        let mut owners: IndexMap<&str, Vec<&str>> = IndexMap::new();
        for (name, exts) in &self.rules {
            for ext in exts {
                owners.entry(ext.as_str()).or_default().push(name.as_str());
            }
        }
        owners
            .into_iter()
            .filter(|(_, names)| names.len() > 1)
            .map(|(ext, names)| ExtensionConflict {
                extension: ext.to_string(),
                winner: names[0].to_string(),
                shadowed: names[1..].iter().map(|n| n.to_string()).collect(),
            })
            .collect()
    }

    /// Logs one warning per conflicting extension.
    pub fn warn_conflicts(&self) {
        for conflict in self.conflicts() {
            warn!(
                extension = %conflict.extension,
                winner = %conflict.winner,
                shadowed = ?conflict.shadowed,
                "extension listed in several categories, first one wins"
            );
        }
    }
}

/// JSON-backed storage for user category rules.
///
/// The document is a plain object `{ "Category": [".ext", ...] }` whose key
/// order is the table order. When the file does not exist the built-in
/// defaults are used.
#[derive(Debug, Clone)]
pub struct CategoryStore {
    path: PathBuf,
}

impl CategoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$HOME/.config/sortdir/categories.json`, if `HOME` is set.
    pub fn default_location() -> Option<PathBuf> {
        std::env::var_os("HOME").map(|home| {
            PathBuf::from(home)
                .join(".config")
                .join("sortdir")
                .join("categories.json")
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the saved rules, falling back to the defaults.
    pub fn load(&self) -> Result<CategoryTable, CategoryError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no saved category rules, using defaults");
            return Ok(CategoryTable::defaults());
        }

        let content = fs::read_to_string(&self.path).map_err(|source| CategoryError::Read {
            path: self.path.clone(),
            source,
        })?;
        let rules: IndexMap<String, Vec<String>> =
            serde_json::from_str(&content).map_err(|source| CategoryError::Parse {
                path: self.path.clone(),
                source,
            })?;

        let table = CategoryTable::from_rules(rules);
        table.warn_conflicts();
        Ok(table)
    }

    /// Writes the table, creating the parent directory when needed.
    pub fn save(&self, table: &CategoryTable) -> Result<(), CategoryError> {
        let write_err = |source| CategoryError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(&table.to_rules()).map_err(|source| {
            CategoryError::Parse {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, json).map_err(write_err)
    }

    /// Adds or replaces one category and saves the result.
    pub fn update_category(
        &self,
        name: &str,
        extensions: &[String],
    ) -> Result<CategoryTable, CategoryError> {
        let mut table = self.load()?;
        table.set_category(name, extensions)?;
        table.warn_conflicts();
        self.save(&table)?;
        Ok(table)
    }

    /// Removes one category and saves the result.
    pub fn delete_category(&self, name: &str) -> Result<CategoryTable, CategoryError> {
        let mut table = self.load()?;
        table.remove_category(name)?;
        self.save(&table)?;
        Ok(table)
    }

    /// Overwrites the saved rules with the defaults.
    pub fn reset_to_defaults(&self) -> Result<CategoryTable, CategoryError> {
        let table = CategoryTable::defaults();
        self.save(&table)?;
        Ok(table)
    }

    /// Which saved category lists `ext`, ignoring `exclude`.
    pub fn extension_category(
        &self,
        ext: &str,
        exclude: Option<&str>,
    ) -> Result<Option<String>, CategoryError> {
        let table = self.load()?;
        Ok(table.find_category(ext, exclude).map(str::to_string))
    }
}
