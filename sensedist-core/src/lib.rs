//! Sensedist core library.
//!
//! Orchestrates word-sense disambiguation of a corpus: looks up a word's noun
//! senses, writes them as a seed file, drives an external classifier through
//! training and testing, and aggregates the per-line labels into a sense
//! distribution.

mod artifacts;
mod builder;
mod classifier;
mod corpus;
mod disambiguator;
mod error;
mod histogram;
mod inventory;
mod labels;
mod report;
mod seed;
mod summary;
mod wordnet;

pub use crate::{
    artifacts::RunArtifacts,
    builder::DisambiguatorBuilder,
    classifier::{
        DEFAULT_CLASSIFIER, ExternalClassifier, Phase, ProcessError, ProcessOutput,
        TrainFailurePolicy, run_process,
    },
    corpus::Corpus,
    disambiguator::Disambiguator,
    error::{Result, SenseDistError, SenseDistErrorCode},
    histogram::{BucketShare, Histogram},
    inventory::{InventoryError, InventoryErrorCode, Sense, SenseInventory, StaticInventory},
    labels::{Classification, Label, LabelError, NOT_APPLICABLE_BUCKET, parse_output},
    report::{
        ReportOptions, SEPARATOR, render_distribution, render_report, write_phase_done,
        write_phase_start, write_sense_listing,
    },
    seed::write_seed_file,
    summary::RunSummary,
    wordnet::{DEFAULT_DATABASE_DIR, WordNetInventory},
};
