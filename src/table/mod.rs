//! Smoothed bigram / unigram probability tables.
//!
//! Counts are collected into [`Counts`] and turned into an immutable
//! [`ProbabilityTable`] with add-one smoothing:
//!
//! ```text
//! P(s | p) = (count(p, s) + 1) / (N_p + V)
//! oov(p)   = 1 / (N_p + V)
//! ```
//!
//! where `N_p` is the number of events observed after `p` and `V` is the
//! vocabulary size of the corpus the counts come from.

pub mod emission;
pub mod transition;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use self::emission::EmissionTable;
pub use self::transition::TransitionTable;

pub type Float = f64;

/// Pads every sentence when counting label bigrams.
pub const START_SYMBOL: &str = "<S>";
pub const END_SYMBOL: &str = "</S>";

/// Conditional probability lookup, `P(event | given)`.
///
/// Implementations must be total and return values in (0, 1].
pub trait Probability {
    fn probability(&self, given: &str, event: &str) -> Float;
}

impl Probability for ProbabilityTable {
    fn probability(&self, given: &str, event: &str) -> Float {
        ProbabilityTable::probability(self, given, event)
    }
}

impl Probability for TransitionTable {
    fn probability(&self, given: &str, event: &str) -> Float {
        TransitionTable::probability(self, given, event)
    }
}

impl Probability for EmissionTable {
    fn probability(&self, given: &str, event: &str) -> Float {
        EmissionTable::probability(self, given, event)
    }
}

/// Raw co-occurrence counts.
#[derive(Debug, Default)]
pub struct Counts {
    bigram: BTreeMap<String, BTreeMap<String, Float>>,
    unigram: BTreeMap<String, Float>,
}

impl Counts {
    pub fn add_bigram(&mut self, predecessor: &str, successor: &str) {
        *self
            .bigram
            .entry(predecessor.to_string())
            .or_default()
            .entry(successor.to_string())
            .or_default() += 1.0;
    }

    pub fn add_unigram(&mut self, key: &str) {
        *self.unigram.entry(key.to_string()).or_default() += 1.0;
    }

    /// Applies add-one smoothing against a vocabulary of `vocabulary_size`,
    /// taken as at least 1 so that every value stays finite.
    pub fn normalize(self, vocabulary_size: usize) -> ProbabilityTable {
        let v = vocabulary_size.max(1) as Float;

        let total: Float = self.unigram.values().sum();
        let unigram_oov = oov(total, v);
        let unigram = self
            .unigram
            .into_iter()
            .map(|(k, c)| (k, (c + 1.0) / (total + v)))
            .collect();

        let bigram = self
            .bigram
            .into_iter()
            .map(|(p, successors)| {
                let n: Float = successors.values().sum();
                let row_oov = oov(n, v);
                let cells = successors
                    .into_iter()
                    .map(|(s, c)| (s, (c + 1.0) / (n + v)))
                    .collect();
                (
                    p,
                    Row {
                        cells,
                        oov: row_oov,
                    },
                )
            })
            .collect();

        ProbabilityTable {
            bigram,
            unigram,
            unigram_oov,
            vocabulary_size,
        }
    }
}

fn oov(n: Float, v: Float) -> Float {
    1.0 / (n + v)
}

/// One predecessor's successor distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    cells: BTreeMap<String, Float>,
    oov: Float,
}

impl Row {
    pub fn get(&self, successor: &str) -> Float {
        self.cells.get(successor).copied().unwrap_or(self.oov)
    }

    /// Probability given to successors never seen after this predecessor.
    pub fn oov(&self) -> Float {
        self.oov
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Float)> {
        self.cells.iter().map(|(k, &p)| (k.as_str(), p))
    }

    pub fn max(&self) -> Option<Float> {
        self.cells.values().copied().reduce(Float::max)
    }

    pub fn min(&self) -> Option<Float> {
        self.cells.values().copied().reduce(Float::min)
    }
}

/// Normalized bigram and unigram probabilities.
///
/// Lookups are total: unseen keys resolve to the add-one estimate of an
/// unseen event, so every returned value lies in (0, 1].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityTable {
    bigram: BTreeMap<String, Row>,
    unigram: BTreeMap<String, Float>,
    unigram_oov: Float,
    vocabulary_size: usize,
}

impl ProbabilityTable {
    /// `P(successor | predecessor)`.
    pub fn probability(&self, predecessor: &str, successor: &str) -> Float {
        match self.bigram.get(predecessor) {
            Some(row) => row.get(successor),
            None => self.absent_row(),
        }
    }

    /// Unigram probability of `key`.
    pub fn unigram(&self, key: &str) -> Float {
        self.unigram.get(key).copied().unwrap_or(self.unigram_oov)
    }

    pub fn row(&self, predecessor: &str) -> Option<&Row> {
        self.bigram.get(predecessor)
    }

    /// Probability returned for a predecessor that has no row at all: the
    /// OOV estimate of an empty row, `1 / V`.
    pub fn absent_row(&self) -> Float {
        oov(0.0, self.vocabulary_size.max(1) as Float)
    }

    /// Predecessor keys in lexicographic order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.bigram.keys().map(String::as_str)
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary_size
    }

    pub fn len(&self) -> usize {
        self.bigram.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bigram.is_empty()
    }
}
