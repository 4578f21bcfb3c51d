//! Append-only store for matched records.
//!
//! One JSON object per line, appended as matches are found so an
//! interrupted run keeps everything written before the interruption.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CatalogError, Result};

/// A torrent title fully resolved against both reference catalogs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedEpisode {
    /// Identifier of the torrent the title came from.
    pub torrent_id: String,

    /// Catalog id of the series.
    pub series_id: String,

    /// Catalog id of the episode.
    pub episode_id: String,

    /// Season number.
    pub season_no: u32,

    /// Episode number.
    pub episode_no: u32,

    /// Release year, when the title carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,

    /// Episode title, when the title carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode_name: Option<String>,
}

/// Append-only JSON-lines record store.
#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl RecordStore {
    /// Open a store for appending, creating the file if needed.
    ///
    /// # Errors
    ///
    /// `CatalogError::Io` if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(CatalogError::io(&path))?;
        debug!(path = %path.display(), "record store opened");
        Ok(Self {
            writer: BufWriter::new(file),
            path,
        })
    }

    /// Append one matched record as a JSON line.
    ///
    /// # Errors
    ///
    /// Serialization or write failure; the store stays usable either way.
    pub fn append(&mut self, record: &MatchedEpisode) -> Result<()> {
        let line = serde_json::to_string(record)?;
        self.writer
            .write_all(line.as_bytes())
            .and_then(|()| self.writer.write_all(b"\n"))
            .map_err(CatalogError::io(&self.path))?;
        Ok(())
    }

    /// Flush buffered records to disk.
    ///
    /// # Errors
    ///
    /// `CatalogError::Io` on write failure.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(CatalogError::io(&self.path))
    }

    /// Where the store lives.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
