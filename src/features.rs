//! Training events for the noun-group classifier.
//!
//! Each event is the context of one token, conditioned on the gold chunk of
//! the token before it, followed by the token's own gold chunk:
//!
//! ```text
//! tag=NN preTag=DT nextTag=VBZ prePreTag= preType=B-NP firstWord=false isCapital=false I-NP
//! ```
//!
//! Extraction yields one event per token in corpus order. [`unique`] drops
//! repeated events when the trainer expects a set.

use std::{collections::HashSet, io::Write};

use crate::{
    dataset::{Corpus, Sentence},
    decoder::FeatureContext,
    errors::Result,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Event {
    pub context: FeatureContext,
    pub outcome: Option<String>,
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.context.to_features().join(" "))?;
        if let Some(outcome) = &self.outcome {
            write!(f, " {outcome}")?;
        }
        Ok(())
    }
}

pub fn extract(sentence: &Sentence) -> Vec<Event> {
    let tokens = sentence.tokens();
    tokens
        .iter()
        .enumerate()
        .map(|(t, token)| {
            let previous = t.checked_sub(1).and_then(|i| tokens[i].chunk());
            Event {
                context: FeatureContext::new(tokens, t, previous),
                outcome: token.chunk().map(str::to_string),
            }
        })
        .collect()
}

pub fn extract_corpus(corpus: &Corpus) -> Vec<Event> {
    let events: Vec<Event> = corpus.sentences().iter().flat_map(extract).collect();
    let unlabeled = events.iter().filter(|e| e.outcome.is_none()).count();
    if unlabeled > 0 {
        log::warn!("{unlabeled} of {} events have no outcome", events.len());
    }
    events
}

/// Keeps the first occurrence of every event, in order.
pub fn unique(events: Vec<Event>) -> Vec<Event> {
    let n = events.len();
    let mut seen = HashSet::with_capacity(n);
    let events: Vec<Event> = events
        .into_iter()
        .filter(|event| seen.insert(event.clone()))
        .collect();
    log::debug!("{} of {n} events are unique", events.len());
    events
}

/// One event per line.
pub fn write_events<W: Write>(mut w: W, events: &[Event]) -> Result<()> {
    for event in events {
        writeln!(w, "{event}")?;
    }
    w.flush()?;
    Ok(())
}
