//! Per-user session state
//!
//! A [`Session`] is created by whoever drives the pipeline and passed to each
//! run. It is owned, not global: two sessions never share a counter or cache.

use crate::error::{MlError, Result};
use crate::pipeline::{Pipeline, PipelineInput, PipelineOutput};
use crate::preprocessing::PreparedData;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tracing::debug;

/// Monotonic counter owned by a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counter {
    value: u64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> u64 {
        self.value
    }

    /// Add one and return the new value
    pub fn increment(&mut self) -> u64 {
        self.value += 1;
        self.value
    }
}

/// SHA-256 digest of an input file
pub type InputDigest = [u8; 32];

pub fn digest(bytes: &[u8]) -> InputDigest {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(bytes));
    out
}

/// Session scope: training-run counter plus prepared datasets memoised by input digest
#[derive(Debug, Default)]
pub struct Session {
    training_runs: Counter,
    datasets: HashMap<InputDigest, PreparedData>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of runs in this session that trained a model
    pub fn training_runs(&self) -> u64 {
        self.training_runs.get()
    }

    /// Number of distinct inputs prepared so far
    pub fn cached_datasets(&self) -> usize {
        self.datasets.len()
    }

    /// Prepared dataset for `source`, parsing it only the first time it is seen
    pub fn prepared(&mut self, pipeline: &Pipeline, source: &[u8]) -> Result<&PreparedData> {
        let key = digest(source);
        if !self.datasets.contains_key(&key) {
            let data = pipeline.prepare(source)?;
            self.datasets.insert(key, data);
        } else {
            debug!("reusing prepared dataset");
        }
        self.datasets
            .get(&key)
            .ok_or_else(|| MlError::DataError("prepared dataset missing from session".to_string()))
    }

    /// Run the pipeline, reusing prepared data for repeated inputs
    pub fn run(&mut self, pipeline: &Pipeline, input: PipelineInput<'_>) -> Result<PipelineOutput> {
        let Some(source) = input.source else {
            return pipeline.run(input);
        };
        let data = self.prepared(pipeline, source)?.clone();
        let output = pipeline.run_prepared(data, input.train)?;
        if output.training.is_some() {
            self.training_runs.increment();
        }
        Ok(output)
    }

    /// Drop every memoised dataset
    pub fn clear_cache(&mut self) {
        self.datasets.clear();
    }
}
