//! Series reference catalog.
//!
//! Pipe-delimited `id|title` file, one series per line, with a header row.
//! Titles are keyed by their cleaned form so lookups line up exactly with
//! what the parser extracts.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use titlemask_core::CharacterNormalizer;
use tracing::{debug, warn};

use crate::error::{CatalogError, Result};

/// Cleaned series title → series id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesCatalog {
    by_title: HashMap<String, String>,
}

impl SeriesCatalog {
    /// Load a catalog, cleaning every title with `normalizer`.
    ///
    /// Malformed lines are skipped with a log line rather than failing the
    /// load; duplicate cleaned titles keep the last entry.
    ///
    /// # Errors
    ///
    /// `CatalogError::Io` if the file cannot be opened or read.
    pub fn load(path: impl AsRef<Path>, normalizer: &CharacterNormalizer) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(CatalogError::io(path))?;
        let reader = BufReader::new(file);

        let mut by_title = HashMap::new();
        let mut skipped = 0usize;
        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(CatalogError::io(path))?;
            if line_no == 0 {
                // Header row.
                continue;
            }
            let Some((id, title)) = split_line(&line) else {
                skipped += 1;
                continue;
            };
            by_title.insert(normalizer.clean_title(title), id.to_string());
        }

        if skipped > 0 {
            warn!(path = %path.display(), skipped, "skipped malformed series lines");
        }
        debug!(path = %path.display(), series = by_title.len(), "series catalog loaded");
        Ok(Self { by_title })
    }

    /// Series id for a cleaned series name.
    pub fn lookup(&self, cleaned_name: &str) -> Option<&str> {
        self.by_title.get(cleaned_name).map(String::as_str)
    }

    /// Number of series in the catalog.
    pub fn len(&self) -> usize {
        self.by_title.len()
    }

    /// Returns `true` if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.by_title.is_empty()
    }
}

fn split_line(line: &str) -> Option<(&str, &str)> {
    let mut parts = line.splitn(2, '|');
    let id = parts.next()?.trim();
    let title = parts.next()?.trim();
    if id.is_empty() || title.is_empty() {
        return None;
    }
    Some((id, title))
}
