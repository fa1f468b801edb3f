use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{
    classifier::{Classifier, MaxEnt},
    dataset::Corpus,
    decoder::{memm::NOUN_GROUP_LABELS, Decoder, MemmDecoder, ViterbiDecoder},
    errors::{Error, Result},
    quark::Quark,
    table::{EmissionTable, TransitionTable},
};

pub trait Model {
    /// A decoder borrowing this model.
    fn decoder(&self) -> Result<impl Decoder + Sync + '_>;
    fn labels(&self) -> Quark;
}

/// Bigram HMM tagger: label transitions plus word emissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HiddenMarkovModel {
    transition: TransitionTable,
    emission: EmissionTable,
}

impl HiddenMarkovModel {
    pub fn train(corpus: &Corpus) -> Result<Self> {
        log::info!(
            "training on {} sentences, {} tokens",
            corpus.len(),
            corpus.total_tokens()
        );
        let transition = TransitionTable::build(corpus)?;
        let emission = EmissionTable::build(corpus)?;
        Ok(Self {
            transition,
            emission,
        })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .map_err(|e| Error::InvalidModel(format!("{}: {e}", path.display())))?;
        let model = Self::from_reader(BufReader::new(f))?;
        log::info!("{}: {} labels", path.display(), model.labels().len());
        Ok(model)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).map_err(|e| Error::InvalidModel(e.to_string()))
    }

    pub fn dump<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut w = BufWriter::new(File::create(path)?);
        self.write(&mut w)?;
        w.flush()?;
        Ok(())
    }

    pub fn write<W: Write>(&self, w: W) -> Result<()> {
        serde_json::to_writer(w, self)?;
        Ok(())
    }

    pub fn transition(&self) -> &TransitionTable {
        &self.transition
    }

    pub fn emission(&self) -> &EmissionTable {
        &self.emission
    }
}

impl Model for HiddenMarkovModel {
    fn decoder(&self) -> Result<impl Decoder + Sync + '_> {
        Ok(ViterbiDecoder::from_tables(&self.transition, &self.emission))
    }

    fn labels(&self) -> Quark {
        self.transition.labels()
    }
}

/// Maximum-entropy Markov model: a classifier and the labels decoded with it.
#[derive(Debug, Clone)]
pub struct MaxEntMarkovModel<C: Classifier = MaxEnt> {
    classifier: C,
    labels: Quark,
}

impl<C: Classifier> MaxEntMarkovModel<C> {
    /// Fails when the classifier does not know one of the labels.
    pub fn new(classifier: C, labels: Quark) -> Result<Self> {
        MemmDecoder::new(&classifier, labels.clone())?;
        Ok(Self { classifier, labels })
    }

    pub fn noun_group(classifier: C) -> Result<Self> {
        Self::new(classifier, NOUN_GROUP_LABELS.into_iter().collect())
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }
}

impl MaxEntMarkovModel {
    /// Loads a maxent classifier and decodes noun groups with it.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::noun_group(MaxEnt::from_path(path)?)
    }
}

impl<C: Classifier + Sync> Model for MaxEntMarkovModel<C> {
    fn decoder(&self) -> Result<impl Decoder + Sync + '_> {
        MemmDecoder::new(&self.classifier, self.labels.clone())
    }

    fn labels(&self) -> Quark {
        self.labels.clone()
    }
}
