//! Viterbi decoders and the tagging pipeline.

pub mod context;
mod lattice;
pub mod memm;
pub mod viterbi;

use std::thread;

pub use self::context::FeatureContext;
pub use self::memm::MemmDecoder;
pub use self::viterbi::ViterbiDecoder;
use crate::{dataset::Sentence, errors::Result, quark::Quark, table::Float};

/// Assigns the single best label sequence to a sentence.
pub trait Decoder {
    /// Writes each token's predicted label and returns the cost of the best
    /// path. Only called on non-empty sentences.
    fn decode(&self, sentence: &mut Sentence) -> Result<Float>;
}

/// Decodes `sentences` in order. Empty sentences are left alone.
pub fn tag<D: Decoder + ?Sized>(decoder: &D, sentences: &mut [Sentence]) -> Result<()> {
    for (i, sentence) in sentences.iter_mut().enumerate() {
        if sentence.is_empty() {
            continue;
        }
        let cost = decoder.decode(sentence)?;
        log::trace!("sentence {i}: {} tokens, cost {cost}", sentence.len());
    }
    Ok(())
}

/// Same as [`tag`], with the sentences split into contiguous chunks
/// decoded on `n_threads` scoped threads.
pub fn tag_parallel<D: Decoder + Sync + ?Sized>(
    decoder: &D,
    sentences: &mut [Sentence],
    n_threads: usize,
) -> Result<()> {
    let n_threads = n_threads.max(1).min(sentences.len());
    if n_threads <= 1 {
        return tag(decoder, sentences);
    }
    let chunk_size = sentences.len().div_ceil(n_threads);
    log::debug!(
        "tagging {} sentences on {n_threads} threads",
        sentences.len()
    );
    thread::scope(|scope| {
        let handles: Vec<_> = sentences
            .chunks_mut(chunk_size)
            .map(|chunk| scope.spawn(move || tag(decoder, chunk)))
            .collect();
        let mut result = Ok(());
        for handle in handles {
            let r = handle
                .join()
                .unwrap_or_else(|e| std::panic::resume_unwind(e));
            if result.is_ok() {
                result = r;
            }
        }
        result
    })
}

/// Writes backtracked label indices onto the sentence.
fn assign(sentence: &mut Sentence, path: &[Option<usize>], states: &Quark) {
    let mut missing = 0;
    for (token, label) in sentence.tokens_mut().iter_mut().zip(path) {
        match label.and_then(|l| states.to_str(l)) {
            Some(label) => token.set_predicted(label),
            None => missing += 1,
        }
    }
    if missing > 0 {
        log::warn!(
            "incomplete backtrack: {missing} of {} tokens left unlabeled",
            path.len()
        );
    }
}
