//! # Title Shape Classification
//!
//! Scans whitespace-delimited tokens of a cleaned title and classifies each
//! into a structural marker, producing a shape signature independent of
//! literal content. Two titles with the same shape always yield the same
//! signature, which is what makes signature frequencies a useful map of
//! template coverage gaps.

use regex::Regex;

use crate::error::Result;
use crate::types::{MaskToken, TitleMask};

/// Per-token classification before runs are folded into markers.
#[derive(Debug, Clone, Copy)]
enum TokenShape {
    Year,
    SeasonEpisode(u32, u32),
    Season(u32),
    Episode(u32),
    Alpha,
    Literal,
}

impl TokenShape {
    fn is_marker(self) -> bool {
        !matches!(self, Self::Alpha | Self::Literal)
    }
}

/// Classifies cleaned-title tokens into structural markers.
///
/// Stateless after construction: identical input yields an identical mask
/// on every call, independent of call order.
#[derive(Debug)]
pub struct TitleMasker {
    re_year: Regex,
    re_combined: Regex,
    re_cross: Regex,
    re_season: Regex,
    re_episode: Regex,
    re_number: Regex,
}

impl TitleMasker {
    /// Constructs a masker with pre-compiled token-shape patterns.
    ///
    /// # Errors
    ///
    /// Returns `MaskError::Regex` if any pattern fails to compile (should
    /// never happen with the static patterns defined here).
    pub fn new() -> Result<Self> {
        Ok(Self {
            re_year: Regex::new(r"^(?:19|20)\d\d$")?,
            re_combined: Regex::new(r"^s(\d{1,2})e(\d{1,2})$")?,
            re_cross: Regex::new(r"^(\d{1,2})x(\d{2})$")?,
            re_season: Regex::new(r"^s(\d{1,2})$")?,
            re_episode: Regex::new(r"^ep?(\d{1,2})$")?,
            re_number: Regex::new(r"^\d{1,2}$")?,
        })
    }

    /// Derive the structural mask of an already-cleaned title.
    ///
    /// Total and deterministic; empty input yields an empty mask. Token
    /// precedence: year, combined `sNNeNN`, combined `NNxNN`, lone `sNN`,
    /// lone `eNN`/`epNN`, then the word forms `season N`/`episode N` (which
    /// consume the following number), then alphabetic, then literal.
    pub fn mask_title(&self, cleaned: &str) -> TitleMask {
        let tokens: Vec<String> = cleaned
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        let shapes = self.classify(&tokens);
        assemble(&shapes)
    }

    fn classify(&self, tokens: &[String]) -> Vec<TokenShape> {
        let mut shapes = Vec::with_capacity(tokens.len());
        let mut i = 0;
        while i < tokens.len() {
            let token = tokens[i].as_str();
            let next = tokens.get(i + 1).map(String::as_str);

            let shape = if self.re_year.is_match(token) {
                TokenShape::Year
            } else if let Some(caps) = self.re_combined.captures(token) {
                TokenShape::SeasonEpisode(digits(&caps[1]), digits(&caps[2]))
            } else if let Some(caps) = self.re_cross.captures(token) {
                TokenShape::SeasonEpisode(digits(&caps[1]), digits(&caps[2]))
            } else if let Some(caps) = self.re_season.captures(token) {
                TokenShape::Season(digits(&caps[1]))
            } else if let Some(caps) = self.re_episode.captures(token) {
                TokenShape::Episode(digits(&caps[1]))
            } else if token == "season" && next.is_some_and(|n| self.re_number.is_match(n)) {
                i += 1;
                TokenShape::Season(digits(next.unwrap_or_default()))
            } else if (token == "episode" || token == "ep")
                && next.is_some_and(|n| self.re_number.is_match(n))
            {
                i += 1;
                TokenShape::Episode(digits(next.unwrap_or_default()))
            } else if !token.is_empty() && token.chars().all(char::is_alphabetic) {
                TokenShape::Alpha
            } else {
                TokenShape::Literal
            };

            shapes.push(shape);
            i += 1;
        }
        shapes
    }
}

/// Parse a 1-2 digit capture; the shapes above guarantee it fits.
fn digits(text: &str) -> u32 {
    text.parse().unwrap_or_default()
}

fn assemble(shapes: &[TokenShape]) -> TitleMask {
    let first_marker = shapes.iter().position(|s| s.is_marker());

    let mut tokens = Vec::with_capacity(shapes.len());
    let mut season_no = None;
    let mut episode_no = None;
    let mut episode_seen = false;

    let mut i = 0;
    while i < shapes.len() {
        match shapes[i] {
            TokenShape::Year => {
                tokens.push(MaskToken::Year);
                i += 1;
            }
            TokenShape::SeasonEpisode(season, episode) => {
                season_no.get_or_insert(season);
                episode_no.get_or_insert(episode);
                tokens.push(MaskToken::Season);
                tokens.push(MaskToken::Episode);
                episode_seen = true;
                i += 1;
            }
            TokenShape::Season(season) => {
                season_no.get_or_insert(season);
                tokens.push(MaskToken::Season);
                i += 1;
            }
            TokenShape::Episode(episode) => {
                episode_no.get_or_insert(episode);
                tokens.push(MaskToken::Episode);
                episode_seen = true;
                i += 1;
            }
            TokenShape::Alpha => {
                let start = i;
                while i < shapes.len() && matches!(shapes[i], TokenShape::Alpha) {
                    i += 1;
                }
                // A contiguous alphabetic run folds into one marker.
                let marker = if first_marker.is_none_or(|m| start < m) {
                    MaskToken::Series
                } else if episode_seen {
                    MaskToken::EpisodeName
                } else {
                    MaskToken::Literal
                };
                tokens.push(marker);
            }
            TokenShape::Literal => {
                tokens.push(MaskToken::Literal);
                i += 1;
            }
        }
    }

    TitleMask::new(tokens, season_no, episode_no)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn masker() -> TitleMasker {
        TitleMasker::new().unwrap()
    }

    #[test]
    fn classic_combined_marker() {
        let mask = masker().mask_title("show name s02e05 episode title");
        assert_eq!(mask.signature(), "SERIES SEASON EPISODE EPISODE_NAME");
        assert_eq!(mask.season_no(), Some(2));
        assert_eq!(mask.episode_no(), Some(5));
    }

    #[test]
    fn year_before_marker() {
        let mask = masker().mask_title("show name 2021 s02e05 some title");
        assert_eq!(mask.signature(), "SERIES YEAR SEASON EPISODE EPISODE_NAME");
    }

    #[test]
    fn cross_notation_counts_as_season_episode() {
        let mask = masker().mask_title("show name 3x07 finale");
        assert_eq!(mask.signature(), "SERIES SEASON EPISODE EPISODE_NAME");
        assert_eq!(mask.season_no(), Some(3));
        assert_eq!(mask.episode_no(), Some(7));
    }

    #[test]
    fn standalone_indicators() {
        let mask = masker().mask_title("show s02 e05");
        assert_eq!(mask.signature(), "SERIES SEASON EPISODE");
        assert_eq!(mask.season_no(), Some(2));
        assert_eq!(mask.episode_no(), Some(5));

        let mask = masker().mask_title("show ep05");
        assert_eq!(mask.signature(), "SERIES EPISODE");
        assert_eq!(mask.episode_no(), Some(5));
    }

    #[test]
    fn word_forms_consume_the_following_number() {
        let mask = masker().mask_title("show name season 2 episode 5");
        assert_eq!(mask.signature(), "SERIES SEASON EPISODE");
        assert_eq!(mask.season_no(), Some(2));
        assert_eq!(mask.episode_no(), Some(5));
    }

    #[test]
    fn episode_word_without_number_stays_alphabetic() {
        // "episode" here is part of the episode name, not an indicator.
        let mask = masker().mask_title("show s01e01 episode title");
        assert_eq!(mask.signature(), "SERIES SEASON EPISODE EPISODE_NAME");
    }

    #[test]
    fn year_range_bounds() {
        assert_eq!(masker().mask_title("1900").signature(), "YEAR");
        assert_eq!(masker().mask_title("2099").signature(), "YEAR");
        assert_eq!(masker().mask_title("1899").signature(), "LITERAL");
        assert_eq!(masker().mask_title("2100").signature(), "LITERAL");
    }

    #[test]
    fn two_years_both_classify() {
        let mask = masker().mask_title("show 2020 2021 s01e01");
        assert_eq!(mask.signature(), "SERIES YEAR YEAR SEASON EPISODE");
    }

    #[test]
    fn unclassified_tokens_are_literals() {
        let mask = masker().mask_title("show name s01e01 title 720p x264");
        assert_eq!(
            mask.signature(),
            "SERIES SEASON EPISODE EPISODE_NAME LITERAL LITERAL"
        );
    }

    #[test]
    fn alpha_between_year_and_season_is_literal() {
        let mask = masker().mask_title("show 2021 extra s01e01");
        assert_eq!(mask.signature(), "SERIES YEAR LITERAL SEASON EPISODE");
    }

    #[test]
    fn title_without_markers_is_a_series_run() {
        assert_eq!(masker().mask_title("just some words").signature(), "SERIES");
    }

    #[test]
    fn degenerate_inputs_never_fail() {
        assert_eq!(masker().mask_title("").signature(), "");
        assert_eq!(masker().mask_title("   ").signature(), "");
    }

    #[test]
    fn first_payload_wins() {
        let mask = masker().mask_title("show s01e01 s02e02");
        assert_eq!(mask.season_no(), Some(1));
        assert_eq!(mask.episode_no(), Some(1));
        assert_eq!(mask.signature(), "SERIES SEASON EPISODE SEASON EPISODE");
    }

    #[test]
    fn mask_is_deterministic() {
        let m = masker();
        let a = m.mask_title("show name 2021 s02e05 some title");
        let b = m.mask_title("show name 2021 s02e05 some title");
        assert_eq!(a, b);
    }

    #[test]
    fn same_shape_different_words_same_signature() {
        let m = masker();
        let a = m.mask_title("alpha beta s01e02 gamma");
        let b = m.mask_title("other show s09e09 thing");
        assert_eq!(a.signature(), b.signature());
    }
}
