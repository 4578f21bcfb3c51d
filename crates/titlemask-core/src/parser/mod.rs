pub mod engine;
pub mod fragments;
pub mod masker;
pub mod normalize;
pub mod template;

pub use engine::{MaskParser, ParserConfig, DEFAULT_WHITELIST};
pub use fragments::{FragmentPattern, FragmentRegistry, BASELINE_FRAGMENTS};
pub use masker::TitleMasker;
pub use normalize::CharacterNormalizer;
pub use template::{MaskLibrary, MaskTemplate, TemplateMatch, TemplateSegment};
