//! Data preprocessing module
//!
//! Turns the raw Latin-1 CSV into a numeric feature matrix and a boolean
//! label vector:
//! - [`DatasetLoader`] - decoding, renaming, column selection, labels
//! - [`OneHotEncoder`] - data-driven one-hot expansion of categorical columns

mod encoder;
mod loader;

pub use encoder::OneHotEncoder;
pub use loader::{
    DatasetLoader, FeatureMatrix, PreparedData, CATEGORICAL_COLUMNS, COLUMN_RENAMES,
    SELECTED_COLUMNS, TARGET_COLUMN,
};
