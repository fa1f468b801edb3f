use std::{collections::HashMap, fs, path::Path};

use serde::{Deserialize, Serialize};

use super::Classifier;
use crate::{
    errors::{Error, Result},
    quark::Quark,
    table::Float,
};

#[derive(Debug, Serialize, Deserialize)]
struct Parameters {
    labels: Vec<String>,
    weights: HashMap<String, Vec<Float>>,
}

/// Log-linear classifier evaluated from trained weights.
///
/// ```text
/// P(y | x) = exp(sum of w[f][y] for f in x) / Z(x)
/// ```
///
/// Features without weights contribute nothing.
#[derive(Debug, Clone)]
pub struct MaxEnt {
    labels: Quark,
    weights: HashMap<String, Vec<Float>>,
}

impl MaxEnt {
    pub fn new(labels: Vec<String>, weights: HashMap<String, Vec<Float>>) -> Result<Self> {
        if labels.is_empty() {
            return Err(Error::InvalidModel("no labels".to_string()));
        }
        let n = labels.len();
        let quark: Quark = labels.iter().collect();
        if quark.len() != n {
            return Err(Error::InvalidModel("duplicate labels".to_string()));
        }
        if let Some((feature, w)) = weights.iter().find(|(_, w)| w.len() != n) {
            return Err(Error::InvalidModel(format!(
                "feature {feature:?} has {} weights for {n} labels",
                w.len()
            )));
        }
        log::info!("maxent: {n} labels, {} features", weights.len());
        Ok(Self {
            labels: quark,
            weights,
        })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let buffer = fs::read(path)
            .map_err(|e| Error::InvalidModel(format!("{}: {e}", path.display())))?;
        Self::from_memory(&buffer)
    }

    pub fn from_memory(buffer: &[u8]) -> Result<Self> {
        let params: Parameters =
            serde_json::from_slice(buffer).map_err(|e| Error::InvalidModel(e.to_string()))?;
        Self::new(params.labels, params.weights)
    }

    pub fn labels(&self) -> &Quark {
        &self.labels
    }

    pub fn num_features(&self) -> usize {
        self.weights.len()
    }
}

impl Classifier for MaxEnt {
    fn evaluate(&self, features: &[String]) -> Result<Vec<Float>> {
        let mut scores = vec![0.0; self.labels.len()];
        for w in features.iter().filter_map(|f| self.weights.get(f)) {
            for (s, w) in scores.iter_mut().zip(w) {
                *s += w;
            }
        }
        let max = scores.iter().copied().fold(Float::NEG_INFINITY, Float::max);
        let mut z = 0.0;
        for s in scores.iter_mut() {
            *s = (*s - max).exp();
            z += *s;
        }
        if !z.is_finite() || z <= 0.0 {
            return Err(Error::Classifier(format!(
                "cannot normalize scores for {features:?}"
            )));
        }
        for s in scores.iter_mut() {
            *s /= z;
        }
        Ok(scores)
    }

    fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.to_id(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL: &str = r#"{
        "labels": ["B-NP", "I-NP", "O"],
        "weights": {
            "tag=DT": [2.0, 0.0, 0.0],
            "preType=B-NP": [0.0, 1.5, 0.0],
            "tag=VBZ": [0.0, 0.0, 3.0]
        }
    }"#;

    fn features(fs: &[&str]) -> Vec<String> {
        fs.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn load() {
        let m = MaxEnt::from_memory(MODEL.as_bytes()).unwrap();
        assert_eq!(m.labels().len(), 3);
        assert_eq!(m.num_features(), 3);
        assert_eq!(m.index_of("I-NP"), Some(1));
        assert_eq!(m.index_of("B-PP"), None);
    }

    #[test]
    fn softmax() {
        let m = MaxEnt::from_memory(MODEL.as_bytes()).unwrap();
        let p = m.evaluate(&features(&["tag=DT", "unknown=1"])).unwrap();
        let e2 = (2.0 as Float).exp();
        assert!((p[0] - e2 / (e2 + 2.0)).abs() < 1e-12);
        assert!((p[1] - 1.0 / (e2 + 2.0)).abs() < 1e-12);
        assert!((p.iter().sum::<Float>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn no_known_features_is_uniform() {
        let m = MaxEnt::from_memory(MODEL.as_bytes()).unwrap();
        let p = m.evaluate(&[]).unwrap();
        for x in p {
            assert!((x - 1.0 / 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn invalid_models() {
        for json in [
            "not json",
            r#"{"labels": [], "weights": {}}"#,
            r#"{"labels": ["A", "A"], "weights": {}}"#,
            r#"{"labels": ["A", "B"], "weights": {"f": [1.0]}}"#,
        ] {
            assert!(
                matches!(MaxEnt::from_memory(json.as_bytes()), Err(Error::InvalidModel(_))),
                "{json}"
            );
        }
        assert!(matches!(
            MaxEnt::from_path("does/not/exist.json"),
            Err(Error::InvalidModel(_))
        ));
    }
}
