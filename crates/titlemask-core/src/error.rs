use thiserror::Error;

/// Errors raised while building or validating a parser configuration.
///
/// Per-title parse failures are deliberately absent: a title no template
/// matches yields `None` from the matcher, never an error, so a bad line in
/// a dataset can never abort a run.
#[derive(Debug, Error)]
pub enum MaskError {
    /// A fragment was registered under an empty name.
    #[error("fragment name must not be empty")]
    EmptyFragmentName,

    /// A fragment pattern failed to compile on its own.
    #[error("fragment {name:?} failed to compile: {source}")]
    InvalidFragment {
        /// The fragment name being registered.
        name: String,
        #[source]
        source: regex::Error,
    },

    /// A required baseline fragment is not registered.
    #[error("required fragment {name:?} is not registered")]
    MissingFragment {
        /// The missing baseline name.
        name: &'static str,
    },

    /// A template references a fragment the registry does not know.
    #[error("template {definition:?} references unknown fragment {name:?}")]
    UnknownFragment { definition: String, name: String },

    /// The same placeholder appears twice in one template.
    #[error("template {definition:?} repeats placeholder {name:?}")]
    DuplicatePlaceholder { definition: String, name: String },

    /// A `{` or `}` in a template definition has no counterpart.
    #[error("template {definition:?} has unbalanced placeholder braces")]
    UnbalancedBraces { definition: String },

    /// A template contains `{}` with no fragment name inside.
    #[error("template {definition:?} contains an empty placeholder")]
    EmptyPlaceholder { definition: String },

    /// The assembled template pattern failed to compile.
    #[error("template {definition:?} failed to compile: {source}")]
    InvalidTemplate {
        definition: String,
        #[source]
        source: regex::Error,
    },

    /// A mask library was built from an empty template list.
    #[error("mask library needs at least one template")]
    EmptyLibrary,

    /// One of the masker's token-shape patterns failed to compile
    /// (should never happen with the static patterns defined there).
    #[error("regex compilation error: {0}")]
    Regex(#[from] regex::Error),

    /// A conformance fixture produced unexpected output.
    #[error("{check} conformance failed for {input:?}: expected {expected:?}, got {actual:?}")]
    Conformance {
        /// Which check ran, `clean_title` or `mask_title`.
        check: &'static str,
        input: String,
        expected: String,
        actual: String,
    },
}

/// Result type alias for titlemask core operations.
pub type Result<T> = std::result::Result<T, MaskError>;
