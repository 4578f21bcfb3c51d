//! # Conformance Gate
//!
//! Two fixture sets pin the exact behavior of normalization and signature
//! derivation: raw title → expected cleaned form, and title → expected
//! signature. A parser must reproduce every entry before the orchestration
//! layer lets it near a dataset, so a drifting heuristic is caught at
//! startup instead of silently corrupting a run.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{MaskError, Result};
use crate::parser::MaskParser;

/// Mapping of input → expected output, typically loaded from a JSON file.
pub type FixtureSet = BTreeMap<String, String>;

/// Check every normalization fixture.
///
/// # Errors
///
/// `MaskError::Conformance` for the first entry whose cleaned form does
/// not match exactly.
pub fn verify_clean(parser: &MaskParser, fixtures: &FixtureSet) -> Result<()> {
    for (input, expected) in fixtures {
        let actual = parser.clean_title(input);
        if actual != *expected {
            return Err(MaskError::Conformance {
                check: "clean_title",
                input: input.clone(),
                expected: expected.clone(),
                actual,
            });
        }
        debug!(input, expected, "clean_title fixture ok");
    }
    Ok(())
}

/// Check every signature fixture.
///
/// # Errors
///
/// `MaskError::Conformance` for the first entry whose signature does not
/// match exactly.
pub fn verify_mask(parser: &MaskParser, fixtures: &FixtureSet) -> Result<()> {
    for (input, expected) in fixtures {
        let actual = parser.mask_title(input).signature();
        if actual != *expected {
            return Err(MaskError::Conformance {
                check: "mask_title",
                input: input.clone(),
                expected: expected.clone(),
                actual,
            });
        }
        debug!(input, expected, "mask_title fixture ok");
    }
    Ok(())
}

/// Run both fixture sets, normalization first.
///
/// # Errors
///
/// The first mismatch from either set.
pub fn verify_all(parser: &MaskParser, clean: &FixtureSet, mask: &FixtureSet) -> Result<()> {
    verify_clean(parser, clean)?;
    verify_mask(parser, mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_set(pairs: &[(&str, &str)]) -> FixtureSet {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn passing_fixtures_are_accepted() {
        let parser = MaskParser::with_defaults().unwrap();

        let clean = fixture_set(&[
            ("The.Show's_Name-2021!", "the shows name 2021"),
            ("Show_Name S02E05", "show name s02e05"),
            ("", ""),
        ]);
        let mask = fixture_set(&[
            ("show name s02e05 episode title", "SERIES SEASON EPISODE EPISODE_NAME"),
            ("show name 2021 s02e05 some title", "SERIES YEAR SEASON EPISODE EPISODE_NAME"),
            ("", ""),
        ]);

        assert!(verify_all(&parser, &clean, &mask).is_ok());
    }

    #[test]
    fn clean_mismatch_is_reported_with_both_values() {
        let parser = MaskParser::with_defaults().unwrap();
        let clean = fixture_set(&[("Some.Title", "some title KEPT WRONG")]);

        let err = verify_clean(&parser, &clean).unwrap_err();
        match err {
            MaskError::Conformance {
                check,
                input,
                expected,
                actual,
            } => {
                assert_eq!(check, "clean_title");
                assert_eq!(input, "Some.Title");
                assert_eq!(expected, "some title KEPT WRONG");
                assert_eq!(actual, "some title");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn mask_mismatch_is_fatal() {
        let parser = MaskParser::with_defaults().unwrap();
        let mask = fixture_set(&[("show s01e01", "SERIES LITERAL")]);
        let err = verify_mask(&parser, &mask).unwrap_err();
        assert!(matches!(err, MaskError::Conformance { check: "mask_title", .. }));
    }

    #[test]
    fn empty_fixture_sets_pass_trivially() {
        let parser = MaskParser::with_defaults().unwrap();
        assert!(verify_all(&parser, &FixtureSet::new(), &FixtureSet::new()).is_ok());
    }
}
