//! # Pattern Fragments
//!
//! Named, independently-valid sub-patterns reused across mask templates.
//! Every fragment is compile-checked at registration, so a broken pattern
//! fails the run before any title is processed.

use std::collections::BTreeMap;

use regex::Regex;

use crate::error::{MaskError, Result};

/// Fragment names every registry must provide before a library can be
/// compiled against it.
pub const BASELINE_FRAGMENTS: &[&str] =
    &["year", "series_name", "episode_name", "season_no", "episode_no"];

/// A named sub-pattern reusable across mask templates.
///
/// The pattern source carries no capture group of its own; a template wraps
/// it in a named group when it references the fragment, so the same
/// fragment can appear in any number of templates without clashing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentPattern {
    name: String,
    pattern: String,
}

impl FragmentPattern {
    /// Validate and build a fragment.
    ///
    /// # Errors
    ///
    /// `MaskError::EmptyFragmentName` for a blank name, or
    /// `MaskError::InvalidFragment` if the pattern does not compile on its
    /// own.
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let pattern = pattern.into();

        if name.trim().is_empty() {
            return Err(MaskError::EmptyFragmentName);
        }
        Regex::new(&pattern).map_err(|source| MaskError::InvalidFragment {
            name: name.clone(),
            source,
        })?;

        Ok(Self { name, pattern })
    }

    /// The fragment's registry name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw pattern source.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// Registry of named fragments, read-only once the parser is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentRegistry {
    fragments: BTreeMap<String, String>,
}

impl FragmentRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fragment, replacing any previous definition of the name.
    pub fn register(&mut self, fragment: FragmentPattern) {
        self.fragments.insert(fragment.name, fragment.pattern);
    }

    /// Validate and register a fragment in one step.
    ///
    /// # Errors
    ///
    /// Same as [`FragmentPattern::new`].
    pub fn register_pattern(&mut self, name: &str, pattern: &str) -> Result<()> {
        let fragment = FragmentPattern::new(name, pattern)?;
        self.register(fragment);
        Ok(())
    }

    /// Pattern source for `name`, if registered.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fragments.get(name).map(String::as_str)
    }

    /// Verify every baseline fragment is present.
    ///
    /// # Errors
    ///
    /// `MaskError::MissingFragment` naming the first absent baseline name.
    pub fn ensure_baseline(&self) -> Result<()> {
        for &name in BASELINE_FRAGMENTS {
            if !self.fragments.contains_key(name) {
                return Err(MaskError::MissingFragment { name });
            }
        }
        Ok(())
    }

    /// Registered fragment names, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fragments.keys().map(String::as_str)
    }

    /// Number of registered fragments.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}
