//! Filtered CSV export of the raw dataset
//!
//! Keeps songs whose stream count lies in a half-open range `(min, max]`, hides
//! selected columns and writes the result back out as CSV.

use crate::error::{MlError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Column the row filter applies to
pub const STREAMS_COLUMN: &str = "streams";

/// Row range and column mask for an export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportFilter {
    /// Exclusive lower bound on streams
    pub min_streams: f64,
    /// Inclusive upper bound on streams
    pub max_streams: f64,
    /// Columns left out of the output
    pub hidden_columns: Vec<String>,
}

impl Default for ExportFilter {
    fn default() -> Self {
        Self {
            min_streams: 1_000_000.0,
            max_streams: 1_000_000_000.0,
            hidden_columns: vec![STREAMS_COLUMN.to_string()],
        }
    }
}

impl ExportFilter {
    pub fn with_range(mut self, min_streams: f64, max_streams: f64) -> Self {
        self.min_streams = min_streams;
        self.max_streams = max_streams;
        self
    }

    pub fn with_hidden_columns(mut self, columns: Vec<String>) -> Self {
        self.hidden_columns = columns;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.min_streams.is_nan() || self.max_streams.is_nan() || self.min_streams > self.max_streams {
            return Err(MlError::invalid_parameter(
                "streams range",
                format!("({}, {}]", self.min_streams, self.max_streams),
                "lower bound must not exceed upper bound",
            ));
        }
        Ok(())
    }

    /// Rows in range with hidden columns removed.
    ///
    /// Stream counts that do not parse as numbers never match.
    pub fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        self.validate()?;

        let streams = df
            .column(STREAMS_COLUMN)
            .map_err(|_| MlError::MissingColumn(STREAMS_COLUMN.to_string()))?
            .cast(&DataType::Float64)?;
        let mask: Vec<bool> = streams
            .as_materialized_series()
            .f64()?
            .into_iter()
            .map(|v| matches!(v, Some(s) if s > self.min_streams && s <= self.max_streams))
            .collect();
        let filtered = df.filter(&BooleanChunked::from_slice("mask".into(), &mask))?;

        let visible: Vec<PlSmallStr> = filtered
            .get_column_names()
            .into_iter()
            .filter(|name| !self.hidden_columns.iter().any(|h| h == name.as_str()))
            .cloned()
            .collect();
        let out = filtered.select(visible)?;

        info!(kept = out.height(), of = df.height(), columns = out.width(), "export filter applied");
        Ok(out)
    }

    /// Filtered frame as CSV bytes with a header row
    pub fn to_csv(&self, df: &DataFrame) -> Result<Vec<u8>> {
        let mut out = self.apply(df)?;
        let mut buf = Vec::new();
        CsvWriter::new(&mut buf).include_header(true).finish(&mut out)?;
        Ok(buf)
    }
}
