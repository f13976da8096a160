//! Outcome of a completed disambiguation run.

use crate::artifacts::RunArtifacts;
use crate::corpus::Corpus;
use crate::histogram::Histogram;
use crate::inventory::Sense;
use crate::labels::Classification;

/// Everything a finished run produced, for reporting and inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    word: String,
    senses: Vec<Sense>,
    corpus: Corpus,
    classification: Classification,
    histogram: Histogram,
    artifacts: RunArtifacts,
}

impl RunSummary {
    pub(crate) fn new(
        word: String,
        senses: Vec<Sense>,
        corpus: Corpus,
        classification: Classification,
        artifacts: RunArtifacts,
    ) -> Self {
        let histogram = Histogram::from_classification(senses.len(), &classification);
        Self {
            word,
            senses,
            corpus,
            classification,
            histogram,
            artifacts,
        }
    }

    /// Target word that was disambiguated.
    #[must_use]
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Senses offered to the classifier, in ordinal order.
    #[must_use]
    pub fn senses(&self) -> &[Sense] {
        &self.senses
    }

    /// Corpus the classifier labelled.
    #[must_use]
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Per-line labels.
    #[must_use]
    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    /// Sense distribution.
    #[must_use]
    pub fn histogram(&self) -> &Histogram {
        &self.histogram
    }

    /// Files written by the run.
    #[must_use]
    pub fn artifacts(&self) -> &RunArtifacts {
        &self.artifacts
    }
}
