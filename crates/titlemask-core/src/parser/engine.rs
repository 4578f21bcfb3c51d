//! # Parser Engine
//!
//! Ties the pieces together: normalization, ordered template lookup and
//! record assembly, driven by one immutable configuration value captured at
//! construction.

use tracing::{debug, trace};

use crate::error::Result;
use crate::parser::fragments::FragmentRegistry;
use crate::parser::masker::TitleMasker;
use crate::parser::normalize::CharacterNormalizer;
use crate::parser::template::MaskLibrary;
use crate::types::{ParsedRecord, TitleMask};

/// Symbols preserved by the default cleaning whitelist.
pub const DEFAULT_WHITELIST: &str = "[]{}&@#’%";

/// Immutable parser configuration.
///
/// Captured once by [`MaskParser::new`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Symbols preserved during normalization.
    pub whitelist: String,
    /// Fragment definitions, name → pattern source. Later entries override
    /// earlier ones with the same name.
    pub fragments: Vec<(String, String)>,
    /// Template definitions, strictest first; position is precedence.
    pub templates: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            whitelist: DEFAULT_WHITELIST.to_string(),
            fragments: default_fragments(),
            templates: default_templates(),
        }
    }
}

impl ParserConfig {
    /// Create a configuration with the stock fragments and templates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the normalization whitelist.
    pub fn with_whitelist(mut self, whitelist: impl Into<String>) -> Self {
        self.whitelist = whitelist.into();
        self
    }

    /// Add or override a fragment definition.
    pub fn with_fragment(
        mut self,
        name: impl Into<String>,
        pattern: impl Into<String>,
    ) -> Self {
        self.fragments.push((name.into(), pattern.into()));
        self
    }

    /// Replace the template list.
    pub fn with_templates<I, S>(mut self, templates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.templates = templates.into_iter().map(Into::into).collect();
        self
    }

    /// Append one template at the lowest precedence.
    pub fn with_template(mut self, definition: impl Into<String>) -> Self {
        self.templates.push(definition.into());
        self
    }
}

fn default_fragments() -> Vec<(String, String)> {
    [
        ("year", r"19\d\d|20\d\d"),
        ("series_name", r"[\w\s]*?\w"),
        ("episode_name", r".*?"),
        ("season_no", r"\d{1,2}"),
        ("episode_no", r"\d{1,2}"),
    ]
    .into_iter()
    .map(|(name, pattern)| (name.to_string(), pattern.to_string()))
    .collect()
}

fn default_templates() -> Vec<String> {
    [
        "{series_name} {year} s{season_no}e{episode_no} {episode_name}",
        "{series_name} {year} s{season_no}e{episode_no}",
        "{series_name} s{season_no}e{episode_no} {episode_name}",
        "{series_name} s{season_no}e{episode_no}",
        "{series_name} {year} {season_no}x{episode_no} {episode_name}",
        "{series_name} {season_no}x{episode_no} {episode_name}",
        "{series_name} {season_no}x{episode_no}",
        "{series_name} season {season_no} episode {episode_no}",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

/// Mask-based title parser.
///
/// Built once from a [`ParserConfig`]; every method takes `&self`, and
/// processing any number of titles leaves the fragment registry and the
/// mask library untouched.
#[derive(Debug)]
pub struct MaskParser {
    normalizer: CharacterNormalizer,
    masker: TitleMasker,
    registry: FragmentRegistry,
    library: MaskLibrary,
}

impl MaskParser {
    /// Build a parser from `config`.
    ///
    /// # Errors
    ///
    /// Any configuration error is fatal here: an invalid fragment, a
    /// missing baseline fragment, or a template that fails to compile.
    pub fn new(config: ParserConfig) -> Result<Self> {
        let mut registry = FragmentRegistry::new();
        for (name, pattern) in &config.fragments {
            registry.register_pattern(name, pattern)?;
        }
        registry.ensure_baseline()?;

        let library = MaskLibrary::compile(&config.templates, &registry)?;
        debug!(
            fragments = registry.len(),
            templates = library.len(),
            "parser built"
        );

        Ok(Self {
            normalizer: CharacterNormalizer::new(&config.whitelist),
            masker: TitleMasker::new()?,
            registry,
            library,
        })
    }

    /// Parser with the stock whitelist, fragments and templates.
    ///
    /// # Errors
    ///
    /// Same as [`MaskParser::new`]; cannot fail unless the stock
    /// configuration is broken.
    pub fn with_defaults() -> Result<Self> {
        Self::new(ParserConfig::default())
    }

    /// Canonical cleaned form of a raw title.
    pub fn clean_title(&self, raw: &str) -> String {
        self.normalizer.clean_title(raw)
    }

    /// Structural mask of an already-cleaned title.
    pub fn mask_title(&self, cleaned: &str) -> TitleMask {
        self.masker.mask_title(cleaned)
    }

    /// Parse a raw title into a structured record.
    ///
    /// `None` covers both expected failure kinds: no template matched the
    /// cleaned title, or the match lacked a usable series name.
    pub fn parse_title(&self, raw: &str) -> Option<ParsedRecord> {
        self.parse_cleaned(&self.clean_title(raw))
    }

    /// Parse a title that has already been cleaned.
    pub fn parse_cleaned(&self, cleaned: &str) -> Option<ParsedRecord> {
        let matched = self.library.first_match(cleaned)?;
        trace!(rank = matched.rank, title = cleaned, "template matched");
        ParsedRecord::from_fields(&matched.fields)
    }

    /// The normalizer this parser cleans with.
    pub fn normalizer(&self) -> &CharacterNormalizer {
        &self.normalizer
    }

    /// The fragment registry the library was compiled against.
    pub fn registry(&self) -> &FragmentRegistry {
        &self.registry
    }

    /// The compiled template library.
    pub fn library(&self) -> &MaskLibrary {
        &self.library
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MaskError;

    #[test]
    fn parses_full_specificity_title() {
        let parser = MaskParser::with_defaults().unwrap();
        let record = parser.parse_title("Show.Name.2021.S02E05.Some.Title").unwrap();

        assert_eq!(record.series_name, "show name");
        assert_eq!(record.year.as_deref(), Some("2021"));
        assert_eq!(record.season_no, 2);
        assert_eq!(record.episode_no, 5);
        assert_eq!(record.episode_name.as_deref(), Some("some title"));
    }

    #[test]
    fn parses_loose_title_without_year() {
        let parser = MaskParser::with_defaults().unwrap();
        let record = parser.parse_title("Show Name S02E05").unwrap();

        assert_eq!(record.series_name, "show name");
        assert_eq!(record.season_no, 2);
        assert_eq!(record.episode_no, 5);
        assert_eq!(record.year, None);
        assert_eq!(record.episode_name, None);
    }

    #[test]
    fn parses_cross_notation_and_word_form() {
        let parser = MaskParser::with_defaults().unwrap();

        let record = parser.parse_title("Show Name 3x07").unwrap();
        assert_eq!(record.season_no, 3);
        assert_eq!(record.episode_no, 7);

        let record = parser.parse_title("Show Name Season 2 Episode 5").unwrap();
        assert_eq!(record.season_no, 2);
        assert_eq!(record.episode_no, 5);
    }

    #[test]
    fn earliest_template_wins_for_ambiguous_titles() {
        let parser = MaskParser::with_defaults().unwrap();

        // Without precedence the looser series+sXXeXX+name template would
        // also full-match, folding the year into the series name.
        let record = parser.parse_title("Show.Name.2021.S02E05.Some.Title").unwrap();
        assert_eq!(record.series_name, "show name");
        assert_eq!(record.year.as_deref(), Some("2021"));
    }

    #[test]
    fn unmatched_titles_yield_none() {
        let parser = MaskParser::with_defaults().unwrap();
        assert!(parser.parse_title("An Unstructured Documentary 1080p").is_none());
        assert!(parser.parse_title("").is_none());
        assert!(parser.parse_title("...---...").is_none());
    }

    #[test]
    fn digit_bearing_series_names_parse() {
        let parser = MaskParser::with_defaults().unwrap();
        let record = parser.parse_title("The 100 S03E01 Wanheda").unwrap();
        assert_eq!(record.series_name, "the 100");
        assert_eq!(record.season_no, 3);
    }

    #[test]
    fn missing_baseline_fragment_is_fatal() {
        let config = ParserConfig {
            whitelist: DEFAULT_WHITELIST.to_string(),
            fragments: vec![("year".to_string(), r"19\d\d|20\d\d".to_string())],
            templates: vec!["{year}".to_string()],
        };
        let err = MaskParser::new(config).unwrap_err();
        assert!(matches!(err, MaskError::MissingFragment { .. }));
    }

    #[test]
    fn broken_template_is_fatal() {
        let config = ParserConfig::new().with_templates(["{series_name} {nonexistent}"]);
        let err = MaskParser::new(config).unwrap_err();
        assert!(matches!(err, MaskError::UnknownFragment { .. }));
    }

    #[test]
    fn custom_fragment_overrides_baseline() {
        // Three-digit episode numbers for long-running shows.
        let parser = MaskParser::new(
            ParserConfig::new()
                .with_fragment("episode_no", r"\d{1,4}")
                .with_templates(["{series_name} e{episode_no} s{season_no}",
                                 "{series_name} s{season_no}e{episode_no}"]),
        )
        .unwrap();
        let record = parser.parse_title("One Piece S01E1084").unwrap();
        assert_eq!(record.episode_no, 1084);
    }

    #[test]
    fn repeated_calls_are_deterministic_and_leave_parser_unchanged() {
        let parser = MaskParser::with_defaults().unwrap();
        let registry_before = parser.registry().clone();
        let library_before = parser.library().clone();

        let first = parser.parse_title("Show Name S02E05 Some Title");
        for _ in 0..10 {
            assert_eq!(parser.parse_title("Show Name S02E05 Some Title"), first);
            let _ = parser.parse_title("no structure here at all 999x");
        }

        assert_eq!(parser.registry(), &registry_before);
        assert_eq!(parser.library(), &library_before);
    }
}
