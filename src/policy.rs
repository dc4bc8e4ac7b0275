//! Which subfolders of the organize root are off limits for a run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How the folder names supplied for a run are treated.
///
/// Both variants keep the named folders out of reconciliation and out of
/// empty-folder cleanup. They differ only in whether those folders may still
/// receive files as ordinary category destinations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "folders", rename_all = "lowercase")]
pub enum FolderPolicy {
    /// Named folders are untouched and never receive files.
    Preserve(BTreeSet<String>),
    /// Named folders are not reorganized but can still receive files.
    Exclude(BTreeSet<String>),
}

impl Default for FolderPolicy {
    fn default() -> Self {
        Self::Preserve(BTreeSet::new())
    }
}

impl FolderPolicy {
    /// Preserve mode over the given names.
    pub fn preserve<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Preserve(collect_names(names))
    }

    /// Exclude mode over the given names.
    pub fn exclude<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Exclude(collect_names(names))
    }

    pub fn folders(&self) -> &BTreeSet<String> {
        match self {
            Self::Preserve(names) | Self::Exclude(names) => names,
        }
    }

    /// True if the folder's contents must not be reorganized and the folder
    /// must not be deleted.
    pub fn protects(&self, folder: &str) -> bool {
        self.folders().contains(folder)
    }

    /// True if files may not be moved into the folder.
    pub fn blocks_destination(&self, folder: &str) -> bool {
        match self {
            Self::Preserve(names) => names.contains(folder),
            Self::Exclude(_) => false,
        }
    }
}

fn collect_names<I, S>(names: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names
        .into_iter()
        .map(Into::into)
        .map(|n: String| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect()
}
