//! Sequence tagging with smoothed probability tables and Viterbi decoding.
//!
//! Two decoders share one trellis:
//!
//! * [`ViterbiDecoder`] walks a bigram HMM built from a labeled corpus
//!   ([`TransitionTable`], [`EmissionTable`]);
//! * [`MemmDecoder`] scores each step with a [`Classifier`] conditioned on
//!   the previous label.
//!
//! ```no_run
//! use tagsuite::{decoder, Corpus, HiddenMarkovModel, Model};
//!
//! let train = Corpus::from_path("train.pos")?;
//! let model = HiddenMarkovModel::train(&train)?;
//! let mut test = Corpus::from_path("test.words")?;
//! decoder::tag(&model.decoder()?, test.sentences_mut())?;
//! # Ok::<(), tagsuite::Error>(())
//! ```

pub mod classifier;
pub mod dataset;
pub mod decoder;
mod errors;
pub mod evaluation;
pub mod features;
pub mod model;
pub mod quark;
pub mod table;

pub use crate::classifier::{Classifier, MaxEnt};
pub use crate::dataset::{Corpus, Sentence, Token};
pub use crate::decoder::{Decoder, FeatureContext, MemmDecoder, ViterbiDecoder};
pub use crate::errors::{Error, Result};
pub use crate::evaluation::Evaluation;
pub use crate::model::{HiddenMarkovModel, MaxEntMarkovModel, Model};
pub use crate::quark::Quark;
pub use crate::table::{EmissionTable, Float, Probability, TransitionTable};
