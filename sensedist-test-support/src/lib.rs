//! Shared test utilities used across sensedist crates.

pub mod classifier;
pub mod tracing;
pub mod wordnet;
