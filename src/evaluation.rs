use std::{collections::BTreeMap, fmt::Display, iter::zip};

use crate::dataset::{Sentence, Token};

/// Label-wise performance values.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LabelMeasure {
    /// Number of correct predictions.
    pub num_correct: usize,
    /// Number of occurrences of the label in the gold-standard data.
    pub num_observation: usize,
    /// Number of predictions.
    pub num_prediction: usize,
    pub precision: f64,
    pub recall: f64,
    pub fmeasure: f64,
}

/// Overall performance values.
#[derive(Debug, Default)]
pub struct Evaluation {
    /// Number of labels seen in the gold-standard data.
    pub num_labels: usize,
    tbl: BTreeMap<String, LabelMeasure>,

    /// Number of correctly predicted items.
    item_total_correct: usize,
    /// Total number of items.
    item_total_num: usize,
    item_accuracy: f64,

    /// Number of sentences predicted without a single mistake.
    inst_total_correct: usize,
    /// Total number of sentences.
    inst_total_num: usize,
    inst_accuracy: f64,

    macro_precision: f64,
    macro_recall: f64,
    macro_fmeasure: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimation {
    pub precision: f64,
    pub recall: f64,
    pub fmeasure: f64,
    pub item_accuracy: f64,
    pub inst_accuracy: f64,
}

impl Evaluation {
    pub fn accumulate<R: AsRef<str>, P: AsRef<str>>(&mut self, reference: &[R], prediction: &[P]) {
        let mut matched = 0;
        for (r, p) in zip(reference, prediction) {
            let (r, p) = (r.as_ref(), p.as_ref());
            self.tbl.entry(r.to_string()).or_default().num_observation += 1;
            self.tbl.entry(p.to_string()).or_default().num_prediction += 1;
            if r == p {
                self.tbl.entry(r.to_string()).or_default().num_correct += 1;
                matched += 1;
            }
            self.item_total_num += 1;
        }

        if matched == reference.len() && reference.len() == prediction.len() {
            self.inst_total_correct += 1;
        }
        self.inst_total_num += 1;
    }

    /// Compares each token's prediction with the gold label `reference`
    /// reads from it. Missing labels count as empty ones.
    pub fn accumulate_sentence<F>(&mut self, sentence: &Sentence, reference: F)
    where
        F: Fn(&Token) -> Option<&str>,
    {
        let gold: Vec<&str> = sentence.iter().map(|t| reference(t).unwrap_or_default()).collect();
        let predicted: Vec<&str> = sentence
            .iter()
            .map(|t| t.predicted().unwrap_or_default())
            .collect();
        self.accumulate(&gold, &predicted);
    }

    pub fn evaluate(&mut self) -> Estimation {
        self.num_labels = 0;
        self.item_total_correct = 0;
        self.macro_precision = 0.0;
        self.macro_recall = 0.0;
        self.macro_fmeasure = 0.0;

        for lev in self.tbl.values_mut() {
            if lev.num_observation == 0 {
                continue;
            }
            self.num_labels += 1;
            self.item_total_correct += lev.num_correct;

            lev.precision = 0.0;
            lev.recall = 0.0;
            lev.fmeasure = 0.0;

            if lev.num_prediction > 0 {
                lev.precision = lev.num_correct as f64 / lev.num_prediction as f64;
            }
            lev.recall = lev.num_correct as f64 / lev.num_observation as f64;
            if lev.precision + lev.recall > 0.0 {
                lev.fmeasure = lev.precision * lev.recall * 2.0 / (lev.precision + lev.recall);
            }
            self.macro_precision += lev.precision;
            self.macro_recall += lev.recall;
            self.macro_fmeasure += lev.fmeasure;
        }

        if self.num_labels > 0 {
            self.macro_precision /= self.num_labels as f64;
            self.macro_recall /= self.num_labels as f64;
            self.macro_fmeasure /= self.num_labels as f64;
        }
        if self.item_total_num > 0 {
            self.item_accuracy = self.item_total_correct as f64 / self.item_total_num as f64;
        }
        if self.inst_total_num > 0 {
            self.inst_accuracy = self.inst_total_correct as f64 / self.inst_total_num as f64;
        }
        Estimation {
            precision: self.macro_precision,
            recall: self.macro_recall,
            fmeasure: self.macro_fmeasure,
            item_accuracy: self.item_accuracy,
            inst_accuracy: self.inst_accuracy,
        }
    }

    pub fn label(&self, label: &str) -> Option<&LabelMeasure> {
        self.tbl.get(label)
    }
}

impl Display for Evaluation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Performance by label (#match, #model, #ref) (precision, recall, F1):")?;
        for (label, lev) in &self.tbl {
            if lev.num_observation == 0 {
                writeln!(
                    f,
                    "\t{}: ({}, {}, {}) (******, ******, ******)",
                    label, lev.num_correct, lev.num_prediction, lev.num_observation
                )?;
            } else {
                writeln!(
                    f,
                    "\t{}: ({}, {}, {}) ({:.4}, {:.4}, {:.4})",
                    label,
                    lev.num_correct,
                    lev.num_prediction,
                    lev.num_observation,
                    lev.precision,
                    lev.recall,
                    lev.fmeasure
                )?;
            }
        }
        writeln!(
            f,
            "Macro-average precision, recall, F1: ({:.4}, {:.4}, {:.4})",
            self.macro_precision, self.macro_recall, self.macro_fmeasure
        )?;
        writeln!(
            f,
            "Item accuracy: {}/{} => {:.4}",
            self.item_total_correct, self.item_total_num, self.item_accuracy
        )?;
        writeln!(
            f,
            "Sequence accuracy: {}/{} => {:.4}",
            self.inst_total_correct, self.inst_total_num, self.inst_accuracy
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts() {
        let mut e = Evaluation::default();
        e.accumulate(&["DT", "NN", "VBZ"], &["DT", "NN", "VBZ"]);
        e.accumulate(&["DT", "NN"], &["DT", "VBZ"]);
        let est = e.evaluate();

        assert_eq!(e.num_labels, 3);
        assert_eq!(est.item_accuracy, 4.0 / 5.0);
        assert_eq!(est.inst_accuracy, 0.5);

        let nn = e.label("NN").unwrap();
        assert_eq!((nn.num_correct, nn.num_prediction, nn.num_observation), (1, 1, 2));
        assert_eq!(nn.precision, 1.0);
        assert_eq!(nn.recall, 0.5);
        assert!((nn.fmeasure - 2.0 / 3.0).abs() < 1e-12);

        let vbz = e.label("VBZ").unwrap();
        assert_eq!(vbz.precision, 0.5);
        assert_eq!(vbz.recall, 1.0);
    }

    #[test]
    fn evaluate_twice() {
        let mut e = Evaluation::default();
        e.accumulate(&["B-NP", "O"], &["B-NP", "B-NP"]);
        assert_eq!(e.evaluate(), e.evaluate());
    }

    #[test]
    fn empty() {
        let mut e = Evaluation::default();
        let est = e.evaluate();
        assert_eq!(est.item_accuracy, 0.0);
        assert_eq!(est.precision, 0.0);
    }

    #[test]
    fn sentence_predictions() {
        let mut s: Sentence = [Token::new("a").with_chunk("B-NP"), Token::new("b").with_chunk("O")]
            .into_iter()
            .collect();
        s.tokens_mut()[0].set_predicted("B-NP");
        let mut e = Evaluation::default();
        e.accumulate_sentence(&s, Token::chunk);
        let est = e.evaluate();
        assert_eq!(est.item_accuracy, 0.5);
        assert_eq!(est.inst_accuracy, 0.0);
    }

    #[test]
    fn display_lists_labels_in_order() {
        let mut e = Evaluation::default();
        e.accumulate(&["NN", "DT"], &["NN", "DT"]);
        e.evaluate();
        let text = e.to_string();
        let dt = text.find("\tDT:").unwrap();
        let nn = text.find("\tNN:").unwrap();
        assert!(dt < nn);
        assert!(text.contains("Item accuracy: 2/2 => 1.0000"));
    }
}
