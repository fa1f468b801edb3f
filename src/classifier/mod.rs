//! Classifiers that score the next label from a feature context.

pub mod maxent;

pub use self::maxent::MaxEnt;
use crate::{errors::Result, table::Float};

/// A trained, deterministic probabilistic classifier.
pub trait Classifier {
    /// Distribution over the classifier's outcomes, indexed as
    /// [`Classifier::index_of`] reports.
    fn evaluate(&self, features: &[String]) -> Result<Vec<Float>>;

    fn index_of(&self, label: &str) -> Option<usize>;
}
