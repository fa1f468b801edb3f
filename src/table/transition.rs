use serde::{Deserialize, Serialize};

use super::{Counts, Float, ProbabilityTable, END_SYMBOL, START_SYMBOL};
use crate::{
    dataset::Corpus,
    errors::{Error, Result},
    quark::Quark,
};

/// `P(tag | previous tag)`, with every sentence padded by
/// [`START_SYMBOL`] and [`END_SYMBOL`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionTable {
    table: ProbabilityTable,
}

impl TransitionTable {
    pub fn build(corpus: &Corpus) -> Result<Self> {
        if corpus.total_tokens() == 0 {
            return Err(Error::EmptyCorpus);
        }
        let mut counts = Counts::default();
        let mut tags = Vec::with_capacity(corpus.max_length() + 2);
        for (s, sentence) in corpus.sentences().iter().enumerate() {
            if sentence.is_empty() {
                continue;
            }
            tags.clear();
            tags.push(START_SYMBOL);
            for (t, token) in sentence.iter().enumerate() {
                let tag = token.tag().ok_or(Error::MissingTag {
                    sentence: s,
                    token: t,
                })?;
                tags.push(tag);
            }
            tags.push(END_SYMBOL);

            for pair in tags.windows(2) {
                counts.add_bigram(pair[0], pair[1]);
                counts.add_unigram(&pair[0].to_uppercase());
            }
        }
        let table = counts.normalize(corpus.vocabulary_size());
        log::debug!(
            "transition table: {} predecessors, V = {}",
            table.len(),
            table.vocabulary_size()
        );
        Ok(Self { table })
    }

    pub fn probability(&self, predecessor: &str, successor: &str) -> Float {
        self.table.probability(predecessor, successor)
    }

    pub fn unigram(&self, tag: &str) -> Float {
        self.table.unigram(&tag.to_uppercase())
    }

    /// Decodable labels: every predecessor except the start symbol, sorted.
    pub fn labels(&self) -> Quark {
        self.table.keys().filter(|&k| k != START_SYMBOL).collect()
    }

    pub fn table(&self) -> &ProbabilityTable {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: Float = 1e-12;

    fn corpus() -> Corpus {
        let text = "The\tDT\ndog\tNN\nbarks\tVBZ\n\nDogs\tNNS\nbark\tVBP\n";
        Corpus::from_reader(text.as_bytes(), "train").unwrap()
    }

    #[test]
    fn brackets_sentences() {
        let t = TransitionTable::build(&corpus()).unwrap();
        // 5 distinct words, START row has 2 events
        assert!((t.probability(START_SYMBOL, "DT") - 2.0 / 7.0).abs() < EPS);
        assert!((t.probability(START_SYMBOL, "NNS") - 2.0 / 7.0).abs() < EPS);
        assert!((t.probability("VBZ", END_SYMBOL) - 2.0 / 6.0).abs() < EPS);
        assert!((t.probability("DT", "NN") - 2.0 / 6.0).abs() < EPS);
        assert!((t.probability("DT", "VB") - 1.0 / 6.0).abs() < EPS);
    }

    #[test]
    fn labels_exclude_start() {
        let t = TransitionTable::build(&corpus()).unwrap();
        let labels = t.labels();
        assert_eq!(
            labels.iter().collect::<Vec<_>>(),
            vec!["DT", "NN", "NNS", "VBP", "VBZ"]
        );
        assert_eq!(labels.to_id(START_SYMBOL), None);
        assert_eq!(labels.to_id(END_SYMBOL), None);
    }

    #[test]
    fn unigram_keys_are_upper_case() {
        let t = TransitionTable::build(&corpus()).unwrap();
        // 7 predecessor events (2 starts + 5 tags), V = 5
        assert!((t.unigram("<s>") - 3.0 / 12.0).abs() < EPS);
        assert!((t.unigram("dt") - 2.0 / 12.0).abs() < EPS);
    }

    #[test]
    fn empty_corpus() {
        for text in ["", "\n\n"] {
            let corpus = Corpus::from_reader(text.as_bytes(), "train").unwrap();
            assert!(matches!(
                TransitionTable::build(&corpus),
                Err(Error::EmptyCorpus)
            ));
        }
    }

    #[test]
    fn missing_tag() {
        let text = "The\tDT\n\ndog\n";
        let corpus = Corpus::from_reader(text.as_bytes(), "train").unwrap();
        match TransitionTable::build(&corpus) {
            Err(Error::MissingTag { sentence, token }) => {
                assert_eq!((sentence, token), (1, 0));
            }
            r => panic!("unexpected result: {r:?}"),
        }
    }

    #[test]
    fn deterministic() {
        let a = serde_json::to_string(&TransitionTable::build(&corpus()).unwrap()).unwrap();
        let b = serde_json::to_string(&TransitionTable::build(&corpus()).unwrap()).unwrap();
        assert_eq!(a, b);
    }
}
