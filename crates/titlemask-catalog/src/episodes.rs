//! Episode reference catalog.
//!
//! Pipe-delimited `episode_id|series_id|season_no|episode_no|title` file
//! with a header row. Episodes are keyed by pseudo-id, the derived lookup
//! key combining series id, season and episode number, because that is the
//! only address a parsed torrent title can produce.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{CatalogError, Result};

/// Derived lookup key for one episode of one series.
///
/// Format: `{series_id}-{season:02}-{episode:02}`. Season and episode
/// numbers above 99 keep all their digits.
#[must_use]
pub fn pseudo_id(series_id: &str, season_no: u32, episode_no: u32) -> String {
    format!("{series_id}-{season_no:02}-{episode_no:02}")
}

/// Pseudo-id → episode id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodeCatalog {
    by_key: HashMap<String, String>,
}

impl EpisodeCatalog {
    /// Load a catalog from a pipe-delimited file.
    ///
    /// Malformed lines (wrong field count, non-numeric season or episode)
    /// are skipped with a log line rather than failing the load.
    ///
    /// # Errors
    ///
    /// `CatalogError::Io` if the file cannot be opened or read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(CatalogError::io(path))?;
        let reader = BufReader::new(file);

        let mut by_key = HashMap::new();
        let mut skipped = 0usize;
        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(CatalogError::io(path))?;
            if line_no == 0 {
                // Header row.
                continue;
            }
            let Some((episode_id, key)) = parse_line(&line) else {
                skipped += 1;
                continue;
            };
            by_key.insert(key, episode_id.to_string());
        }

        if skipped > 0 {
            warn!(path = %path.display(), skipped, "skipped malformed episode lines");
        }
        debug!(path = %path.display(), episodes = by_key.len(), "episode catalog loaded");
        Ok(Self { by_key })
    }

    /// Episode id for a series/season/episode triple.
    pub fn lookup(&self, series_id: &str, season_no: u32, episode_no: u32) -> Option<&str> {
        self.lookup_key(&pseudo_id(series_id, season_no, episode_no))
    }

    /// Episode id for an already-built pseudo-id.
    pub fn lookup_key(&self, key: &str) -> Option<&str> {
        self.by_key.get(key).map(String::as_str)
    }

    /// Number of episodes in the catalog.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Returns `true` if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

fn parse_line(line: &str) -> Option<(&str, String)> {
    let mut parts = line.split('|');
    let episode_id = parts.next()?.trim();
    let series_id = parts.next()?.trim();
    let season_no: u32 = parts.next()?.trim().parse().ok()?;
    let episode_no: u32 = parts.next()?.trim().parse().ok()?;
    if episode_id.is_empty() || series_id.is_empty() {
        return None;
    }
    Some((episode_id, pseudo_id(series_id, season_no, episode_no)))
}
