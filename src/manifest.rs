//! Variable manifest.
//!
//! Declares which columns are analysed as numeric variables, which two of
//! them form the detailed Pearson and Spearman pairs, and which two columns
//! form the categorical pair for the chi-square test.
//!
//! # Examples
//!
//! ```
//! use u_describe::manifest::VariableManifest;
//!
//! let manifest = VariableManifest::from_json_str(r#"{
//!     "numeric": ["Math", "Science", "StudyHours"],
//!     "pearson_pair": { "first": "Math", "second": "Science" },
//!     "spearman_pair": { "first": "Math", "second": "StudyHours" },
//!     "categorical_pair": { "first": "Level", "second": "Passed" }
//! }"#).unwrap();
//!
//! assert_eq!(manifest.numeric.len(), 3);
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::{Result, StatsError};

/// Two named variables analysed together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariablePair {
    pub first: String,
    pub second: String,
}

impl VariablePair {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }
}

/// The set of variables a report is built over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableManifest {
    /// Numeric variables, in report order.
    pub numeric: Vec<String>,
    /// Pair reported in detail with Pearson's r.
    pub pearson_pair: VariablePair,
    /// Pair reported in detail with Spearman's ρ.
    pub spearman_pair: VariablePair,
    /// Categorical pair for the chi-square independence test.
    /// `first` indexes table rows, `second` indexes columns.
    pub categorical_pair: VariablePair,
}

impl VariableManifest {
    pub fn new<I, S>(
        numeric: I,
        pearson_pair: VariablePair,
        spearman_pair: VariablePair,
        categorical_pair: VariablePair,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            numeric: numeric.into_iter().map(Into::into).collect(),
            pearson_pair,
            spearman_pair,
            categorical_pair,
        }
    }

    /// Parses a manifest from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks internal consistency and that every named column exists.
    ///
    /// # Errors
    ///
    /// [`StatsError::InvalidManifest`] when no numeric variable is declared,
    /// a numeric variable repeats, a correlation pair names an undeclared
    /// variable, or the categorical pair names the same column twice.
    /// [`StatsError::UnknownVariable`] when a column is absent from `dataset`.
    pub fn validate(&self, dataset: &Dataset) -> Result<()> {
        if self.numeric.is_empty() {
            return Err(StatsError::InvalidManifest(
                "at least one numeric variable is required".into(),
            ));
        }

        let mut seen = HashSet::with_capacity(self.numeric.len());
        for v in &self.numeric {
            if !seen.insert(v.as_str()) {
                return Err(StatsError::InvalidManifest(format!(
                    "numeric variable '{v}' is declared more than once"
                )));
            }
        }

        for (label, pair) in [("pearson", &self.pearson_pair), ("spearman", &self.spearman_pair)] {
            for v in [&pair.first, &pair.second] {
                if !seen.contains(v.as_str()) {
                    return Err(StatsError::InvalidManifest(format!(
                        "{label} pair variable '{v}' is not a declared numeric variable"
                    )));
                }
            }
        }

        if self.categorical_pair.first == self.categorical_pair.second {
            return Err(StatsError::InvalidManifest(format!(
                "categorical pair names '{}' twice",
                self.categorical_pair.first
            )));
        }

        let categorical = [&self.categorical_pair.first, &self.categorical_pair.second];
        for v in self.numeric.iter().chain(categorical) {
            if !dataset.has_column(v) {
                return Err(StatsError::UnknownVariable {
                    variable: v.clone(),
                });
            }
        }

        Ok(())
    }
}
