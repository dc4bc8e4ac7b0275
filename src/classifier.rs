/// Resolves files to the category folder they belong in.
use crate::categories::{CategoryTable, FALLBACK_CATEGORY};
use crate::scanner::{FileEntry, extension_of};

/// Looks up categories against a borrowed [`CategoryTable`].
///
/// Classification is total: any extension missing from the table, including
/// the empty extension, resolves to [`FALLBACK_CATEGORY`].
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    table: &'a CategoryTable,
}

impl<'a> Classifier<'a> {
    pub fn new(table: &'a CategoryTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'a CategoryTable {
        self.table
    }

    /// Category for a scanned file.
    pub fn classify(&self, entry: &FileEntry) -> &'a str {
        self.classify_extension(&entry.extension)
    }

    /// Category for a bare file name.
    pub fn classify_name(&self, file_name: &str) -> &'a str {
        self.classify_extension(&extension_of(file_name))
    }

    fn classify_extension(&self, extension: &str) -> &'a str {
        self.table
            .extension_index()
            .get(extension)
            .map(String::as_str)
            .unwrap_or(FALLBACK_CATEGORY)
    }
}
