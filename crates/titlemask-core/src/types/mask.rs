use std::fmt;

use serde::{Deserialize, Serialize};

/// Structural marker classes a cleaned-title token can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaskToken {
    /// Alphabetic run before the first year/season/episode marker.
    Series,
    /// 4-digit token in `[1900, 2099]`.
    Year,
    /// Season indicator (combined or standalone).
    Season,
    /// Episode indicator (combined or standalone).
    Episode,
    /// Alphabetic run after the first episode marker.
    EpisodeName,
    /// Anything unclassified.
    Literal,
}

impl MaskToken {
    /// Signature spelling of the marker.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Series => "SERIES",
            Self::Year => "YEAR",
            Self::Season => "SEASON",
            Self::Episode => "EPISODE",
            Self::EpisodeName => "EPISODE_NAME",
            Self::Literal => "LITERAL",
        }
    }
}

impl fmt::Display for MaskToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural shape of a cleaned title.
///
/// The signature abstracts literal content into marker classes; two titles
/// with the same shape always compare equal here regardless of their words.
/// Season and episode numbers ride alongside, outside the signature text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleMask {
    tokens: Vec<MaskToken>,
    season_no: Option<u32>,
    episode_no: Option<u32>,
}

impl TitleMask {
    /// Build a mask from classified markers and their numeric payloads.
    #[must_use]
    pub fn new(tokens: Vec<MaskToken>, season_no: Option<u32>, episode_no: Option<u32>) -> Self {
        Self {
            tokens,
            season_no,
            episode_no,
        }
    }

    /// The classified markers, in token order.
    pub fn tokens(&self) -> &[MaskToken] {
        &self.tokens
    }

    /// Season payload, if a season marker was seen.
    pub fn season_no(&self) -> Option<u32> {
        self.season_no
    }

    /// Episode payload, if an episode marker was seen.
    pub fn episode_no(&self) -> Option<u32> {
        self.episode_no
    }

    /// The signature string, markers joined by single spaces.
    ///
    /// Empty input produces the empty signature.
    #[must_use]
    pub fn signature(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for TitleMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signature())
    }
}
