//! One-hot expansion of categorical columns

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// One-hot encoder with a category set discovered from the data
///
/// The mapping from category value to indicator position is resolved once in
/// [`OneHotEncoder::fit`]; categories are ordered by their sorted value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OneHotEncoder {
    categories: Vec<String>,
    positions: HashMap<String, usize>,
}

impl OneHotEncoder {
    /// Discover the distinct non-null values of a column
    pub fn fit(values: &[Option<String>]) -> Self {
        let distinct: BTreeSet<&str> = values.iter().flatten().map(String::as_str).collect();
        let categories: Vec<String> = distinct.into_iter().map(str::to_string).collect();
        let positions = categories
            .iter()
            .enumerate()
            .map(|(idx, category)| (category.clone(), idx))
            .collect();

        Self {
            categories,
            positions,
        }
    }

    /// Categories in indicator-column order
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Indicator column position of a category
    pub fn position(&self, category: &str) -> Option<usize> {
        self.positions.get(category).copied()
    }

    /// Number of indicator columns
    pub fn n_categories(&self) -> usize {
        self.categories.len()
    }

    /// Indicator matrix with one row per value and one column per category.
    ///
    /// Null or unseen values produce an all-zero row.
    pub fn transform(&self, values: &[Option<String>]) -> Array2<f64> {
        let mut out = Array2::zeros((values.len(), self.categories.len()));
        for (row, value) in values.iter().enumerate() {
            if let Some(col) = value.as_deref().and_then(|v| self.position(v)) {
                out[[row, col]] = 1.0;
            }
        }
        out
    }
}
