//! Settings file and file filters.
//!
//! Settings are stored as TOML. They provide the default folder policy for
//! runs that do not name folders explicitly, optional locations for the
//! category rules and undo history, and the filters that decide which files
//! the organizer may touch at all.
//!
//! ```toml
//! [organize]
//! preserve = ["Projects"]
//! mode = "preserve"
//!
//! [filters]
//! hidden_files = false
//! names = [".DS_Store", "Thumbs.db"]
//! globs = ["*.crdownload", "*.part"]
//! regex = []
//! ```

use crate::policy::FolderPolicy;
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const LOCAL_SETTINGS: &str = ".sortdirrc.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("settings file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read settings from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings in {}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid glob pattern '{pattern}': {source}")]
    Glob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("invalid regex '{pattern}': {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// How the `preserve` list of the settings file is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyMode {
    #[default]
    Preserve,
    Exclude,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizeSettings {
    /// Folder names protected on every run.
    pub preserve: Vec<String>,
    pub mode: PolicyMode,
    /// Where category rules are stored; defaults to the user config dir.
    pub categories_file: Option<PathBuf>,
    /// Where the last operation is kept for undo.
    pub history_file: Option<PathBuf>,
}

impl OrganizeSettings {
    /// Policy built from the configured folders plus any extra names.
    pub fn policy_with<I>(&self, extra: I, mode: Option<PolicyMode>) -> FolderPolicy
    where
        I: IntoIterator<Item = String>,
    {
        let names = self.preserve.iter().cloned().chain(extra);
        match mode.unwrap_or(self.mode) {
            PolicyMode::Preserve => FolderPolicy::preserve(names),
            PolicyMode::Exclude => FolderPolicy::exclude(names),
        }
    }
}

/// Raw filter rules as written in the settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterRules {
    /// Organize dot-files too.
    pub hidden_files: bool,
    /// Exact file names to leave alone.
    pub names: Vec<String>,
    /// Glob patterns matched against the file name.
    pub globs: Vec<String>,
    /// Regular expressions matched against the file name.
    pub regex: Vec<String>,
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            hidden_files: false,
            names: vec![
                ".DS_Store".to_string(),
                "Thumbs.db".to_string(),
                "desktop.ini".to_string(),
            ],
            globs: Vec::new(),
            regex: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub organize: OrganizeSettings,
    pub filters: FilterRules,
}

impl Settings {
    /// Finds and parses the settings file.
    ///
    /// Lookup order: the explicit path, `./.sortdirrc.toml`,
    /// `$HOME/.config/sortdir/config.toml`, then built-in defaults. Only an
    /// explicit path that does not exist is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::from_file(path);
        }

        let local = PathBuf::from(LOCAL_SETTINGS);
        if local.exists() {
            return Self::from_file(&local);
        }

        if let Some(home) = std::env::var_os("HOME") {
            let user = PathBuf::from(home)
                .join(".config")
                .join("sortdir")
                .join("config.toml");
            if user.exists() {
                return Self::from_file(&user);
            }
        }

        debug!("no settings file found, using defaults");
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = toml::from_str(&content).map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }
}

/// Compiled filters deciding which files are eligible for organizing.
#[derive(Debug, Clone)]
pub struct FileFilter {
    hidden_files: bool,
    names: HashSet<String>,
    globs: Vec<Pattern>,
    regex: Vec<Regex>,
}

impl Default for FileFilter {
    fn default() -> Self {
        let rules = FilterRules::default();
        Self {
            hidden_files: rules.hidden_files,
            names: rules.names.into_iter().collect(),
            globs: Vec::new(),
            regex: Vec::new(),
        }
    }
}

impl FileFilter {
    /// A filter that lets every file through.
    pub fn allow_all() -> Self {
        Self {
            hidden_files: true,
            names: HashSet::new(),
            globs: Vec::new(),
            regex: Vec::new(),
        }
    }

    pub fn compile(rules: &FilterRules) -> Result<Self, ConfigError> {
        let globs = rules
            .globs
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|source| ConfigError::Glob {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let regex = rules
            .regex
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|source| ConfigError::Regex {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            hidden_files: rules.hidden_files,
            names: rules.names.iter().cloned().collect(),
            globs,
            regex,
        })
    }

    /// True if a file with this name may be moved.
    pub fn allows(&self, file_name: &str) -> bool {
        if !self.hidden_files && file_name.starts_with('.') {
            return false;
        }
        if self.names.contains(file_name) {
            return false;
        }
        if self.globs.iter().any(|g| g.matches(file_name)) {
            return false;
        }
        !self.regex.iter().any(|r| r.is_match(file_name))
    }
}
