use super::{
    assign,
    lattice::{cost, Lattice},
    Decoder,
};
use crate::{
    dataset::{Sentence, Token},
    errors::Result,
    quark::Quark,
    table::{EmissionTable, Float, Probability, TransitionTable, START_SYMBOL},
};

/// First-order HMM decoder over a transition and an emission table.
///
/// ```text
/// cost[s][0] = |log10 P(s | <S>)| + |log10 P(w0 | s)|
/// cost[s][t] = min over s1 of cost[s1][t-1] + |log10 P(s | s1)| + |log10 P(wt | s)|
/// ```
pub struct ViterbiDecoder<'a, T = TransitionTable, E = EmissionTable>
where
    T: Probability + ?Sized,
    E: Probability + ?Sized,
{
    transition: &'a T,
    emission: &'a E,
    states: Quark,
}

impl<'a, T, E> ViterbiDecoder<'a, T, E>
where
    T: Probability + ?Sized,
    E: Probability + ?Sized,
{
    pub fn new(transition: &'a T, emission: &'a E, states: Quark) -> Self {
        log::debug!("viterbi decoder over {} states", states.len());
        Self {
            transition,
            emission,
            states,
        }
    }

    pub fn states(&self) -> &Quark {
        &self.states
    }
}

impl<'a> ViterbiDecoder<'a> {
    /// Decodes over every label the transition table has seen.
    pub fn from_tables(transition: &'a TransitionTable, emission: &'a EmissionTable) -> Self {
        Self::new(transition, emission, transition.labels())
    }
}

impl<T, E> Decoder for ViterbiDecoder<'_, T, E>
where
    T: Probability + ?Sized,
    E: Probability + ?Sized,
{
    fn decode(&self, sentence: &mut Sentence) -> Result<Float> {
        let num_items = sentence.len();
        let num_labels = self.states.len();
        if num_items == 0 || num_labels == 0 {
            return Ok(0.0);
        }
        let states: Vec<&str> = self.states.iter().collect();
        let words: Vec<&str> = sentence.iter().map(Token::literal).collect();

        let mut lattice = Lattice::new(num_labels, num_items);
        lattice.initialize(|j| {
            Ok(cost(self.transition.probability(START_SYMBOL, states[j]))
                + cost(self.emission.probability(states[j], words[0])))
        })?;
        for (t, word) in words.iter().enumerate().skip(1) {
            lattice.step(
                t,
                |j| Ok(cost(self.emission.probability(states[j], word))),
                |i, j| Ok(cost(self.transition.probability(states[i], states[j]))),
            )?;
        }
        let best = lattice.terminate();
        let path = lattice.backtrack();
        assign(sentence, &path, &self.states);
        Ok(best.unwrap_or(Float::MAX))
    }
}
