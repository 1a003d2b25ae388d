//! End-to-end run: load → split → (on trigger) train → evaluate → report
//!
//! A run is a plain function of its inputs. The uploaded file and the train
//! trigger are passed in explicitly; nothing is read from ambient state, so the
//! same inputs and configuration reproduce the same outputs (timings aside).

use crate::config::PipelineConfig;
use crate::error::{MlError, Result};
use crate::evaluation::{EvaluationResult, Evaluator};
use crate::preprocessing::{DatasetLoader, PreparedData};
use crate::report::{Report, ReportBuilder};
use crate::training::{train_test_split, SplitData, TrainTestSplit, TrainedModel, Trainer};
use tracing::{info, warn};

/// External inputs of one run
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineInput<'a> {
    /// Raw bytes of the uploaded CSV, if any
    pub source: Option<&'a [u8]>,
    /// Whether training was requested
    pub train: bool,
}

impl<'a> PipelineInput<'a> {
    pub fn new(source: Option<&'a [u8]>, train: bool) -> Self {
        Self { source, train }
    }
}

/// Model, metrics and report of a triggered training run
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub model: TrainedModel,
    pub evaluation: EvaluationResult,
    pub report: Report,
}

/// Everything one run produced
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub data: PreparedData,
    pub split: TrainTestSplit,
    pub split_data: SplitData,
    /// Present only when training was requested
    pub training: Option<TrainingOutcome>,
}

/// Pipeline bound to one configuration
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    loader: DatasetLoader,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            loader: DatasetLoader::new(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Parse and prepare the uploaded bytes
    pub fn prepare(&self, source: &[u8]) -> Result<PreparedData> {
        self.loader.load_bytes(source)
    }

    /// Run from raw input; a missing source halts before any processing
    pub fn run(&self, input: PipelineInput<'_>) -> Result<PipelineOutput> {
        let Some(source) = input.source else {
            warn!("no input file supplied, stopping");
            return Err(MlError::MissingInput);
        };
        let data = self.prepare(source)?;
        self.run_prepared(data, input.train)
    }

    /// Run from an already prepared dataset
    pub fn run_prepared(&self, data: PreparedData, train: bool) -> Result<PipelineOutput> {
        self.config.validate()?;

        let split = train_test_split(data.features.n_rows(), self.config.test_size, self.config.split_seed)?;
        let split_data = split.apply(data.features.values(), &data.labels)?;
        info!(
            train_rows = split.train_indices.len(),
            test_rows = split.test_indices.len(),
            "dataset split"
        );

        let training = if train {
            Some(self.train(&data, &split_data)?)
        } else {
            None
        };

        Ok(PipelineOutput {
            data,
            split,
            split_data,
            training,
        })
    }

    fn train(&self, data: &PreparedData, split: &SplitData) -> Result<TrainingOutcome> {
        let run = Trainer::new(self.config.forest.clone()).fit(&split.x_train, &split.y_train, data.features.names())?;
        let evaluation = Evaluator::new().evaluate(&run.model, split, run.elapsed)?;
        let report = ReportBuilder::new().build(&evaluation);

        Ok(TrainingOutcome {
            model: run.model,
            evaluation,
            report,
        })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}
