use super::{
    assign,
    context::FeatureContext,
    lattice::{cost, Lattice},
    Decoder,
};
use crate::{
    classifier::Classifier,
    dataset::Sentence,
    errors::{Error, Result},
    quark::Quark,
    table::Float,
};

/// Labels of the noun-group chunking task, in decoding order.
pub const NOUN_GROUP_LABELS: [&str; 3] = ["B-NP", "I-NP", "O"];

/// Maximum-entropy Markov model decoder.
///
/// Scores come from a classifier conditioned on the previous label, so a
/// transition cost already includes the observation:
///
/// ```text
/// cost[s][0] = |log10 P(s | context(0))|
/// cost[s][t] = min over s1 of cost[s1][t-1] + |log10 P(s | context(t, s1))|
/// ```
pub struct MemmDecoder<'a, C: Classifier + ?Sized> {
    classifier: &'a C,
    states: Quark,
    /// Classifier outcome index of each state.
    outcomes: Vec<usize>,
}

impl<'a, C: Classifier + ?Sized> MemmDecoder<'a, C> {
    /// Fails when the classifier does not know one of the labels.
    pub fn new(classifier: &'a C, states: Quark) -> Result<Self> {
        let outcomes = states
            .iter()
            .map(|label| {
                classifier.index_of(label).ok_or_else(|| {
                    Error::InvalidModel(format!("label {label:?} is unknown to the classifier"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        log::debug!("memm decoder over {} states", states.len());
        Ok(Self {
            classifier,
            states,
            outcomes,
        })
    }

    pub fn noun_group(classifier: &'a C) -> Result<Self> {
        Self::new(classifier, NOUN_GROUP_LABELS.into_iter().collect())
    }

    pub fn states(&self) -> &Quark {
        &self.states
    }

    fn score(&self, context: &FeatureContext) -> Result<Vec<Float>> {
        let features = context.to_features();
        let distribution = self.classifier.evaluate(&features)?;
        match self.outcomes.iter().find(|&&o| o >= distribution.len()) {
            Some(o) => Err(Error::Classifier(format!(
                "outcome #{o} missing from a distribution of {} values",
                distribution.len()
            ))),
            None => Ok(distribution),
        }
    }
}

impl<C: Classifier + ?Sized> Decoder for MemmDecoder<'_, C> {
    fn decode(&self, sentence: &mut Sentence) -> Result<Float> {
        let num_items = sentence.len();
        let num_labels = self.states.len();
        if num_items == 0 || num_labels == 0 {
            return Ok(0.0);
        }
        let states: Vec<&str> = self.states.iter().collect();
        let tokens = sentence.tokens();

        let mut lattice = Lattice::new(num_labels, num_items);
        let initial = self.score(&FeatureContext::new(tokens, 0, None))?;
        lattice.initialize(|j| Ok(cost(initial[self.outcomes[j]])))?;

        for t in 1..num_items {
            // One distribution per reachable predecessor, shared by every
            // successor state.
            let mut posteriors = Vec::with_capacity(num_labels);
            for (i, &previous) in states.iter().enumerate() {
                if lattice.cost(t - 1, i) == 0.0 {
                    posteriors.push(None);
                    continue;
                }
                let context = FeatureContext::new(tokens, t, Some(previous));
                posteriors.push(Some(self.score(&context)?));
            }
            lattice.step(
                t,
                |_| Ok(0.0),
                |i, j| {
                    Ok(posteriors[i]
                        .as_ref()
                        .map_or(Float::INFINITY, |p| cost(p[self.outcomes[j]])))
                },
            )?;
        }
        let best = lattice.terminate();
        let path = lattice.backtrack();
        assign(sentence, &path, &self.states);
        Ok(best.unwrap_or(Float::MAX))
    }
}
