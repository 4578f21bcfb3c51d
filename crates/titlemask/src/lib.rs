//! # Titlemask
//!
//! Extracts structured episode identity (series name, season, episode,
//! year, episode title) from noisy torrent title strings and resolves it
//! against series/episode reference catalogs.
//!
//! This facade re-exports the parsing core ([`titlemask_core`]) and the
//! catalog I/O layer ([`titlemask_catalog`]).
//!
//! ## Quick Start
//!
//! ```rust
//! use titlemask::MaskParser;
//!
//! let parser = MaskParser::with_defaults().unwrap();
//! let record = parser.parse_title("Show.Name.2021.S02E05.Some.Title").unwrap();
//!
//! assert_eq!(record.series_name, "show name");
//! assert_eq!(record.season_no, 2);
//! assert_eq!(record.episode_no, 5);
//! ```

pub use titlemask_catalog::{
    pseudo_id, CatalogError, EpisodeCatalog, MatchedEpisode, RecordStore, SeriesCatalog,
};
pub use titlemask_core::{
    conformance, CharacterNormalizer, FragmentPattern, FragmentRegistry, MaskError, MaskLibrary,
    MaskParser, MaskTemplate, MaskToken, ParsedRecord, ParserConfig, SignatureReport,
    SignatureStat, StatsCounter, TemplateMatch, TemplateSegment, TitleMask, TitleMasker,
    TrainingRecorder, BASELINE_FRAGMENTS, DEFAULT_WHITELIST,
};
