//! # Title Normalization
//!
//! Turns raw torrent titles into the canonical cleaned form every other
//! stage works on: lower-cased, separators collapsed to single spaces,
//! anything outside the symbol whitelist stripped.

use std::collections::BTreeSet;

/// Separator characters replaced by spaces during cleaning.
const SEPARATORS: &[char] = &['.', '_', '-'];

/// Normalizes raw titles into cleaned, matchable strings.
///
/// The whitelist is captured at construction and never changes afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterNormalizer {
    whitelist: BTreeSet<char>,
}

impl CharacterNormalizer {
    /// Create a normalizer that preserves the given symbols.
    pub fn new(whitelist: &str) -> Self {
        Self {
            whitelist: whitelist.chars().collect(),
        }
    }

    /// Returns `true` if `c` is on the preserve list.
    pub fn is_whitelisted(&self, c: char) -> bool {
        self.whitelist.contains(&c)
    }

    /// Canonical cleaned form of a raw title.
    ///
    /// Total and idempotent: never fails for any input, and cleaning an
    /// already-cleaned title returns it unchanged. An all-symbol input
    /// collapses to the empty string.
    ///
    /// Separator handling: `.`/`_`/`-` become a single space, unless the
    /// character immediately before or after is whitelisted, in which case
    /// the separator is dropped without inserting a space. A whitelisted
    /// character always survives, even if it is also a separator.
    pub fn clean_title(&self, raw: &str) -> String {
        let lowered = raw.to_lowercase();
        let chars: Vec<char> = lowered.chars().collect();

        let mut out = String::with_capacity(lowered.len());
        for (i, &c) in chars.iter().enumerate() {
            if self.whitelist.contains(&c) {
                out.push(c);
            } else if SEPARATORS.contains(&c) {
                let prev = i.checked_sub(1).map(|j| chars[j]);
                let next = chars.get(i + 1).copied();
                let touches_whitelisted = prev.is_some_and(|p| self.whitelist.contains(&p))
                    || next.is_some_and(|n| self.whitelist.contains(&n));
                if !touches_whitelisted {
                    out.push(' ');
                }
            } else if c.is_whitespace() {
                out.push(' ');
            } else if c.is_alphanumeric() {
                out.push(c);
            }
        }

        out.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}
