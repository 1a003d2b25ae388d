//! Dataset loading: Latin-1 CSV in, feature matrix and labels out

use super::encoder::OneHotEncoder;
use crate::error::{MlError, Result};
use ndarray::{Array1, Array2, ArrayView1};
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

/// Column whose positive values mark a song as charting
pub const TARGET_COLUMN: &str = "in_spotify_charts";

/// Audio-feature columns renamed from their percent-suffixed source names
pub const COLUMN_RENAMES: [(&str, &str); 7] = [
    ("danceability_%", "danceability"),
    ("valence_%", "valence"),
    ("energy_%", "energy"),
    ("acousticness_%", "acousticness"),
    ("instrumentalness_%", "instrumentalness"),
    ("liveness_%", "liveness"),
    ("speechiness_%", "speechiness"),
];

/// Columns kept after renaming, in feature order
pub const SELECTED_COLUMNS: [&str; 10] = [
    "bpm",
    "key",
    "mode",
    "danceability",
    "valence",
    "energy",
    "acousticness",
    "instrumentalness",
    "liveness",
    "speechiness",
];

/// Columns expanded into one-hot indicators
pub const CATEGORICAL_COLUMNS: [&str; 2] = ["key", "mode"];

/// Numeric/indicator predictor table with named columns
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    names: Vec<String>,
    values: Array2<f64>,
}

impl FeatureMatrix {
    pub fn new(names: Vec<String>, values: Array2<f64>) -> Result<Self> {
        if names.len() != values.ncols() {
            return Err(MlError::ShapeError {
                expected: format!("{} column names", values.ncols()),
                actual: format!("{} column names", names.len()),
            });
        }
        Ok(Self { names, values })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.values.ncols()
    }

    /// Column by name
    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        let idx = self.names.iter().position(|n| n == name)?;
        Some(self.values.column(idx))
    }

    /// Convert to a polars DataFrame
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let columns: Vec<Column> = self
            .names
            .iter()
            .zip(self.values.columns())
            .map(|(name, col)| Series::new(name.as_str().into(), col.to_vec()).into())
            .collect();
        Ok(DataFrame::new(columns)?)
    }

    /// First `n` rows as a DataFrame
    pub fn preview(&self, n: usize) -> Result<DataFrame> {
        Ok(self.to_dataframe()?.head(Some(n)))
    }
}

/// Feature matrix plus the aligned label vector
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedData {
    pub features: FeatureMatrix,
    pub labels: Array1<bool>,
}

impl PreparedData {
    /// Number of positive labels
    pub fn n_positive(&self) -> usize {
        self.labels.iter().filter(|&&l| l).count()
    }
}

/// Loader for the Spotify dataset
#[derive(Debug, Clone, Default)]
pub struct DatasetLoader {
    /// Rows scanned for schema inference (None = all rows)
    infer_schema_length: Option<usize>,
}

impl DatasetLoader {
    /// Create a new loader that infers the schema from every row
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit schema inference to the first `n` rows
    pub fn with_infer_schema_length(mut self, n: usize) -> Self {
        self.infer_schema_length = Some(n);
        self
    }

    /// Decode ISO-8859-1 bytes: each byte is the code point of the same value
    pub fn decode_latin1(bytes: &[u8]) -> String {
        bytes.iter().map(|&b| char::from(b)).collect()
    }

    /// Parse Latin-1 CSV bytes with a header row into a DataFrame
    pub fn read_frame(&self, bytes: &[u8]) -> Result<DataFrame> {
        let text = Self::decode_latin1(bytes);

        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(self.infer_schema_length)
            .into_reader_with_file_handle(Cursor::new(text.into_bytes()))
            .finish()
            .map_err(|e| MlError::ParseError(e.to_string()))
    }

    /// Read a CSV file from disk into a DataFrame
    pub fn read_frame_path(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        let bytes = std::fs::read(path.as_ref())?;
        self.read_frame(&bytes)
    }

    /// Load and prepare a dataset from in-memory bytes
    pub fn load_bytes(&self, bytes: &[u8]) -> Result<PreparedData> {
        let df = self.read_frame(bytes)?;
        info!(rows = df.height(), columns = df.width(), "dataset parsed");
        self.prepare(&df)
    }

    /// Load and prepare a dataset from a file
    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<PreparedData> {
        let bytes = std::fs::read(path.as_ref())?;
        self.load_bytes(&bytes)
    }

    /// Rename, select and one-hot expand a raw frame; derive the labels
    pub fn prepare(&self, raw: &DataFrame) -> Result<PreparedData> {
        let mut df = raw.clone();
        for (source, target) in COLUMN_RENAMES {
            if has_column(&df, source) {
                df.rename(source, target.into())?;
            }
        }

        for name in SELECTED_COLUMNS.iter().chain(std::iter::once(&TARGET_COLUMN)) {
            if !has_column(&df, name) {
                return Err(MlError::MissingColumn(name.to_string()));
            }
        }

        let labels: Array1<bool> = numeric_column(&df, TARGET_COLUMN)?
            .into_iter()
            .map(|v| v > 0.0)
            .collect();

        let mut names: Vec<String> = Vec::new();
        let mut columns: Vec<Vec<f64>> = Vec::new();

        for name in SELECTED_COLUMNS.iter().filter(|c| !CATEGORICAL_COLUMNS.contains(*c)) {
            names.push(name.to_string());
            columns.push(numeric_column(&df, name)?);
        }

        for name in CATEGORICAL_COLUMNS {
            let values = text_column(&df, name)?;
            let encoder = OneHotEncoder::fit(&values);
            debug!(column = name, categories = ?encoder.categories(), "one-hot expansion");

            let indicators = encoder.transform(&values);
            for (category, col) in encoder.categories().iter().zip(indicators.columns()) {
                names.push(category.clone());
                columns.push(col.to_vec());
            }
        }

        let n_rows = df.height();
        let values = Array2::from_shape_fn((n_rows, columns.len()), |(r, c)| columns[c][r]);
        let features = FeatureMatrix::new(names, values)?;

        info!(
            rows = features.n_rows(),
            features = features.n_features(),
            positives = labels.iter().filter(|&&l| l).count(),
            "dataset prepared"
        );

        Ok(PreparedData { features, labels })
    }
}

fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|c| c.as_str() == name)
}

/// Column cast to f64; nulls and unparsable cells become NaN
fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df
        .column(name)
        .map_err(|_| MlError::MissingColumn(name.to_string()))?
        .cast(&DataType::Float64)?;
    Ok(column
        .as_materialized_series()
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}

/// Column cast to text; blank cells become None
fn text_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df
        .column(name)
        .map_err(|_| MlError::MissingColumn(name.to_string()))?
        .cast(&DataType::String)?;
    Ok(column
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|v| v.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string))
        .collect())
}
