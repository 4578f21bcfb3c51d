use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Structured episode identity extracted from one torrent title.
///
/// `series_name` is required and non-empty, and the season/episode numbers
/// must both be present; a match that cannot supply them never becomes a
/// record, so a partial success is indistinguishable from no match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRecord {
    /// Cleaned series name.
    pub series_name: String,

    /// Season number.
    pub season_no: u32,

    /// Episode number.
    pub episode_no: u32,

    /// Release year, as captured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,

    /// Episode title, as captured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode_name: Option<String>,
}

impl ParsedRecord {
    /// Assemble a record from a template's captured fields.
    ///
    /// Returns `None` when `series_name` is absent or empty after trimming,
    /// or when `season_no`/`episode_no` are missing or not valid numbers.
    #[must_use]
    pub fn from_fields(fields: &BTreeMap<String, String>) -> Option<Self> {
        let series_name = fields.get("series_name")?.trim().to_string();
        if series_name.is_empty() {
            return None;
        }
        let season_no = fields.get("season_no")?.parse().ok()?;
        let episode_no = fields.get("episode_no")?.parse().ok()?;

        Some(Self {
            series_name,
            season_no,
            episode_no,
            year: fields.get("year").cloned(),
            episode_name: fields.get("episode_name").cloned(),
        })
    }
}

impl fmt::Display for ParsedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} s{:02}e{:02}",
            self.series_name, self.season_no, self.episode_no
        )?;
        if let Some(ref year) = self.year {
            write!(f, " ({year})")?;
        }
        if let Some(ref episode_name) = self.episode_name {
            write!(f, " {episode_name:?}")?;
        }
        Ok(())
    }
}
