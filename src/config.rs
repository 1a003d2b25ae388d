//! Run configuration: where the data lives, how it is split, how the forest is fitted

use crate::error::{MlError, Result};
use crate::training::ForestParams;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default dataset location, relative to the working directory
pub const DEFAULT_DATA_PATH: &str = "./spotify-2023.csv";

/// Configuration for one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub data_path: PathBuf,
    /// Fraction of rows held out for testing
    pub test_size: f64,
    /// Shuffle seed for the train/test split
    pub split_seed: u64,
    /// Rows shown by the data preview
    pub preview_rows: usize,
    pub forest: ForestParams,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            test_size: 0.33,
            split_seed: 42,
            preview_rows: 15,
            forest: ForestParams::default(),
        }
    }
}

impl PipelineConfig {
    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = path.into();
        self
    }

    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    pub fn with_split_seed(mut self, seed: u64) -> Self {
        self.split_seed = seed;
        self
    }

    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    pub fn with_forest(mut self, forest: ForestParams) -> Self {
        self.forest = forest;
        self
    }

    /// Check every knob before any data is touched
    pub fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(MlError::invalid_parameter(
                "test_size",
                self.test_size,
                "must lie strictly between 0 and 1",
            ));
        }
        self.forest.validate()
    }

    /// Read a JSON configuration; missing keys take their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&json)
            .map_err(|e| MlError::ConfigError(format!("{}: {}", path.as_ref().display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.data_path, PathBuf::from("./spotify-2023.csv"));
        assert_eq!(config.test_size, 0.33);
        assert_eq!(config.split_seed, 42);
        assert_eq!(config.preview_rows, 15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = PipelineConfig::default()
            .with_split_seed(7)
            .with_forest(ForestParams::default().with_n_estimators(10));

        config.save(&path).unwrap();
        assert_eq!(PipelineConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"test_size": 0.25, "forest": {"n_estimators": 5}}"#).unwrap();

        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(config.test_size, 0.25);
        assert_eq!(config.forest.n_estimators, 5);
        assert_eq!(config.forest.max_depth, Some(25));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(PipelineConfig::default().with_test_size(1.0).validate().is_err());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(PipelineConfig::load(&path), Err(MlError::ConfigError(_))));
    }
}
