//! # Training-Mode Signature Statistics
//!
//! In training mode every processed title, parsed or not, contributes its
//! shape signature to a tally. The ranked report at the end of a run shows
//! a maintainer which title shapes the template library does not cover
//! yet. The library itself is never touched; the loop is closed by a human
//! editing the configuration and rerunning.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::parser::masker::TitleMasker;
use crate::types::TitleMask;

/// Additive tally of mask signatures.
///
/// Merging is associative and commutative, so per-shard counters summed in
/// any order produce the same ranked report as one counter over the whole
/// input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsCounter {
    counts: BTreeMap<String, u64>,
}

impl StatsCounter {
    /// Create an empty counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one observation of `signature`.
    ///
    /// Never fails; the empty signature of a degenerate title counts like
    /// any other.
    pub fn record(&mut self, signature: &str) {
        *self.counts.entry(signature.to_string()).or_insert(0) += 1;
    }

    /// Fold another counter into this one.
    pub fn merge(&mut self, other: &StatsCounter) {
        for (signature, count) in &other.counts {
            *self.counts.entry(signature.clone()).or_insert(0) += count;
        }
    }

    /// Observations of one signature.
    pub fn get(&self, signature: &str) -> u64 {
        self.counts.get(signature).copied().unwrap_or(0)
    }

    /// Total observations across all signatures.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct signatures.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Signatures ranked by count descending; ties order by signature so
    /// the report is stable across runs and shard merges.
    pub fn ranked(&self) -> Vec<SignatureStat> {
        let mut entries: Vec<SignatureStat> = self
            .counts
            .iter()
            .map(|(signature, count)| SignatureStat {
                signature: signature.clone(),
                count: *count,
            })
            .collect();
        entries.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.signature.cmp(&b.signature))
        });
        entries
    }
}

/// One line of the ranked signature report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureStat {
    /// The shape signature.
    pub signature: String,
    /// How many titles shared it.
    pub count: u64,
}

/// Ranked summary of the title shapes seen in one training run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureReport {
    /// Entries, most frequent first.
    pub entries: Vec<SignatureStat>,
}

impl fmt::Display for SignatureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            let signature = if entry.signature.is_empty() {
                "(empty)"
            } else {
                entry.signature.as_str()
            };
            writeln!(f, "{:>8}  {signature}", entry.count)?;
        }
        Ok(())
    }
}

/// Tallies the shape of every processed title during a training run.
///
/// One recorder owns one [`StatsCounter`]; parallel runs over a sharded
/// input give each worker its own recorder and fold the counters together
/// afterwards with [`absorb`](Self::absorb).
#[derive(Debug)]
pub struct TrainingRecorder {
    masker: TitleMasker,
    counter: StatsCounter,
}

impl TrainingRecorder {
    /// Create a recorder with an empty counter.
    ///
    /// # Errors
    ///
    /// Only if the masker's own static patterns fail to compile.
    pub fn new() -> Result<Self> {
        Ok(Self {
            masker: TitleMasker::new()?,
            counter: StatsCounter::new(),
        })
    }

    /// Observe one cleaned title. Success or failure of the actual parse
    /// is irrelevant here; every attempt counts exactly once.
    pub fn observe(&mut self, cleaned: &str) {
        let mask = self.masker.mask_title(cleaned);
        self.observe_mask(&mask);
    }

    /// Observe a mask that was already derived elsewhere.
    pub fn observe_mask(&mut self, mask: &TitleMask) {
        self.counter.record(&mask.signature());
    }

    /// Fold a shard's counter into this recorder.
    pub fn absorb(&mut self, counter: &StatsCounter) {
        self.counter.merge(counter);
    }

    /// The tally so far.
    pub fn counter(&self) -> &StatsCounter {
        &self.counter
    }

    /// Consume the recorder, keeping its counter.
    pub fn into_counter(self) -> StatsCounter {
        self.counter
    }

    /// Ranked report of everything observed so far.
    pub fn update_stats(&self) -> SignatureReport {
        SignatureReport {
            entries: self.counter.ranked(),
        }
    }
}
