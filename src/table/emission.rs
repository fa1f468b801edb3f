use std::{collections::BTreeSet, sync::OnceLock};

use serde::{Deserialize, Serialize};

use super::{Counts, Float, ProbabilityTable};
use crate::{
    dataset::{starts_with_capital, Corpus},
    errors::{Error, Result},
};

const NNPS: &str = "NNPS";
const NNP: &str = "NNP";
const CD: &str = "CD";
const NNS: &str = "NNS";
const VBZ: &str = "VBZ";
const VBN: &str = "VBN";
const RB: &str = "RB";
const JJ: &str = "JJ";
const NN: &str = "NN";
const VBG: &str = "VBG";
const VB: &str = "VB";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extreme {
    Highest,
    Lowest,
}

/// Stand-in probability classes for words outside the vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Estimate {
    ProperPluralNoun,
    ProperNoun,
    Cardinal,
    PluralNounOrVerb,
    PastParticiple,
    Adverb,
    Adjective,
    Noun,
    Gerund,
    Fallback,
}

impl Estimate {
    const COUNT: usize = 10;

    /// First matching rule wins.
    fn classify(word: &str, state: &str) -> Self {
        let lower = word.to_lowercase();
        let capital = starts_with_capital(word);
        if capital && lower.ends_with('s') && state == NNPS {
            Self::ProperPluralNoun
        } else if capital && state == NNP {
            Self::ProperNoun
        } else if word.chars().any(|c| c.is_ascii_digit()) && state == CD {
            Self::Cardinal
        } else if lower.ends_with('s') && (state == NNS || state == VBZ) {
            Self::PluralNounOrVerb
        } else if lower.ends_with("ed") && state == VBN {
            Self::PastParticiple
        } else if lower.ends_with("ly") && state == RB {
            Self::Adverb
        } else if (lower.ends_with("able") || lower.ends_with("al") || word.contains('-'))
            && state == JJ
        {
            Self::Adjective
        } else if lower.ends_with("ion") && state == NN {
            Self::Noun
        } else if lower.ends_with("ing") && state == VBG {
            Self::Gerund
        } else {
            Self::Fallback
        }
    }

    fn extreme(self) -> Extreme {
        match self {
            Self::ProperPluralNoun | Self::ProperNoun | Self::Cardinal => Extreme::Highest,
            _ => Extreme::Lowest,
        }
    }

    fn rows(self) -> &'static [&'static str] {
        match self {
            Self::ProperPluralNoun => &[NNPS],
            Self::ProperNoun => &[NNP],
            Self::Cardinal => &[CD],
            Self::PluralNounOrVerb => &[NNS, VBZ],
            Self::PastParticiple => &[VBN],
            Self::Adverb => &[RB],
            Self::Adjective => &[JJ],
            Self::Noun => &[NN],
            Self::Gerund => &[VBG],
            Self::Fallback => &[NN, VB],
        }
    }
}

/// `P(word | tag)` with morphological guesses for unknown words.
///
/// Known words (case-insensitive vocabulary test) are looked up in the
/// smoothed table with their case intact. Unknown words get the highest or
/// lowest probability observed in the rows of the tag class their surface
/// form suggests; each of those extremes is computed once, on first use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmissionTable {
    table: ProbabilityTable,
    vocabulary: BTreeSet<String>,
    #[serde(skip)]
    estimates: [OnceLock<Float>; Estimate::COUNT],
}

impl EmissionTable {
    pub fn build(corpus: &Corpus) -> Result<Self> {
        if corpus.total_tokens() == 0 {
            return Err(Error::EmptyCorpus);
        }
        let mut counts = Counts::default();
        for (s, sentence) in corpus.sentences().iter().enumerate() {
            for (t, token) in sentence.iter().enumerate() {
                let tag = token.tag().ok_or(Error::MissingTag {
                    sentence: s,
                    token: t,
                })?;
                counts.add_bigram(tag, token.literal());
                counts.add_unigram(tag);
            }
        }
        let table = counts.normalize(corpus.vocabulary_size());
        log::debug!(
            "emission table: {} tags, V = {}",
            table.len(),
            table.vocabulary_size()
        );
        Ok(Self {
            table,
            vocabulary: corpus.vocabulary().iter().cloned().collect(),
            estimates: Default::default(),
        })
    }

    /// `P(word | state)`.
    pub fn probability(&self, state: &str, word: &str) -> Float {
        if self.contains_word(word) {
            self.table.probability(state, word)
        } else {
            self.estimate(Estimate::classify(word, state))
        }
    }

    pub fn contains_word(&self, word: &str) -> bool {
        !word.trim().is_empty() && self.vocabulary.contains(&word.to_lowercase())
    }

    pub fn table(&self) -> &ProbabilityTable {
        &self.table
    }

    fn estimate(&self, estimate: Estimate) -> Float {
        *self.estimates[estimate as usize].get_or_init(|| {
            let extreme = estimate.extreme();
            let values = estimate
                .rows()
                .iter()
                .filter_map(|&r| self.table.row(r))
                .filter_map(|row| match extreme {
                    Extreme::Highest => row.max(),
                    Extreme::Lowest => row.min(),
                });
            let value = match extreme {
                Extreme::Highest => values.reduce(Float::max),
                Extreme::Lowest => values.reduce(Float::min),
            }
            .unwrap_or_else(|| self.table.absent_row());
            log::debug!("{estimate:?} estimate over {:?}: {value}", estimate.rows());
            value
        })
    }
}
