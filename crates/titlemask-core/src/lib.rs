//! # Titlemask Core
//!
//! Mask-based extraction of structured episode identity (series name,
//! season, episode, year, episode title) from noisy torrent title strings.
//! Titles are normalized into a canonical cleaned form, matched against an
//! ordered library of mask templates, and (in training mode) tallied by
//! structural signature so uncovered title shapes surface in a ranked
//! report.
//!
//! ## Quick Start
//!
//! ```rust
//! use titlemask_core::MaskParser;
//!
//! let parser = MaskParser::with_defaults().unwrap();
//! let record = parser.parse_title("Show.Name.2021.S02E05.Some.Title").unwrap();
//!
//! assert_eq!(record.series_name, "show name");
//! assert_eq!(record.season_no, 2);
//! assert_eq!(record.episode_no, 5);
//! assert_eq!(record.year.as_deref(), Some("2021"));
//! ```
pub mod conformance;
pub mod error;
pub mod parser;
pub mod training;
pub mod types;

// Re-export primary API
pub use error::{MaskError, Result};
pub use parser::{
    CharacterNormalizer, FragmentPattern, FragmentRegistry, MaskLibrary, MaskParser, MaskTemplate,
    ParserConfig, TemplateMatch, TemplateSegment, TitleMasker, BASELINE_FRAGMENTS,
    DEFAULT_WHITELIST,
};
pub use training::{SignatureReport, SignatureStat, StatsCounter, TrainingRecorder};
pub use types::{MaskToken, ParsedRecord, TitleMask};
