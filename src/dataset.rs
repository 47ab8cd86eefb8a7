//! Tabular dataset model.
//!
//! A [`Dataset`] is an ordered sequence of rows sharing one column set. Each
//! cell is a [`Value`]: numeric, categorical, or missing. The engine only
//! reads datasets; where they come from (file, network, generator) is the
//! caller's concern.
//!
//! # Examples
//!
//! ```
//! use u_describe::dataset::{Dataset, Value};
//!
//! let ds = Dataset::new(
//!     vec!["Math".into(), "Passed".into()],
//!     vec![
//!         vec![Value::from(80.0), Value::from("Yes")],
//!         vec![Value::Null, Value::from("No")],
//!         vec![Value::from(90.0), Value::from("Yes")],
//!     ],
//! )
//! .unwrap();
//!
//! assert_eq!(ds.row_count(), 3);
//! assert_eq!(ds.numeric_column("Math").unwrap(), vec![80.0, 90.0]);
//! ```

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{Result, StatsError};

/// A single cell of a dataset.
///
/// Deserializes from plain JSON scalars: `null`, numbers, and strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing entry.
    Null,
    /// Numeric entry. `NaN` is treated as missing.
    Numeric(f64),
    /// Categorical entry.
    Categorical(String),
}

impl Value {
    /// Returns `true` for `Null` and for a numeric `NaN`.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Numeric(v) => v.is_nan(),
            Value::Categorical(_) => false,
        }
    }

    /// Returns the numeric payload, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Numeric(v) => Some(*v),
            _ => None,
        }
    }

    /// Category label for cross-tabulation. Numbers use their `Display` form.
    fn category_label(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Numeric(v) if v.is_nan() => None,
            Value::Numeric(v) => Some(v.to_string()),
            Value::Categorical(s) => Some(s.clone()),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Numeric(v)
    }
}

impl From<Option<f64>> for Value {
    fn from(v: Option<f64>) -> Self {
        v.map_or(Value::Null, Value::Numeric)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Categorical(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Categorical(s)
    }
}

/// A record keyed by column name.
pub type Record = BTreeMap<String, Value>;

/// Row-ordered table with a uniform column set.
///
/// # Invariants
///
/// - Column names are unique.
/// - Every row holds exactly one value per column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Dataset {
    /// Builds a dataset from column names and positional rows.
    ///
    /// # Errors
    ///
    /// [`StatsError::DuplicateColumn`] if a name repeats, and
    /// [`StatsError::InconsistentRecord`] if a row's width differs from the
    /// column count.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for c in &columns {
            if !seen.insert(c.as_str()) {
                return Err(StatsError::DuplicateColumn { column: c.clone() });
            }
        }

        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(StatsError::InconsistentRecord {
                    row: i,
                    reason: format!("expected {} values, got {}", columns.len(), row.len()),
                });
            }
        }

        Ok(Self { columns, rows })
    }

    /// Builds a dataset from keyed records.
    ///
    /// The first record fixes the column set (in key order); every other
    /// record must carry exactly the same keys.
    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = Record>,
    {
        let mut columns: Option<Vec<String>> = None;
        let mut rows = Vec::new();

        for (i, mut record) in records.into_iter().enumerate() {
            let cols = columns.get_or_insert_with(|| record.keys().cloned().collect());

            if record.len() != cols.len() {
                return Err(StatsError::InconsistentRecord {
                    row: i,
                    reason: format!("expected {} columns, got {}", cols.len(), record.len()),
                });
            }

            let mut row = Vec::with_capacity(cols.len());
            for c in cols.iter() {
                let value = record.remove(c).ok_or_else(|| StatsError::InconsistentRecord {
                    row: i,
                    reason: format!("missing column '{c}'"),
                })?;
                row.push(value);
            }
            rows.push(row);
        }

        Ok(Self {
            columns: columns.unwrap_or_default(),
            rows,
        })
    }

    /// Column names in declaration order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns `true` if `name` is a column of this dataset.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Position of a column.
    ///
    /// # Errors
    ///
    /// [`StatsError::UnknownVariable`] if the column does not exist.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| StatsError::UnknownVariable {
                variable: name.to_owned(),
            })
    }

    /// Cell at (`row`, `column`), if both are in range.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let j = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row).map(|r| &r[j])
    }

    /// Non-missing numeric values of one variable, in row order.
    ///
    /// # Errors
    ///
    /// [`StatsError::UnknownVariable`] for an absent column and
    /// [`StatsError::NonNumericValue`] if a categorical or infinite value is
    /// present.
    pub fn numeric_column(&self, variable: &str) -> Result<Vec<f64>> {
        let j = self.column_index(variable)?;
        let mut out = Vec::with_capacity(self.rows.len());
        for (i, row) in self.rows.iter().enumerate() {
            if let Some(v) = numeric_cell(&row[j], variable, i)? {
                out.push(v);
            }
        }
        Ok(out)
    }

    /// Pairwise-complete numeric observations of two variables.
    ///
    /// A row contributes only if both cells are non-missing.
    pub fn paired_numeric(&self, a: &str, b: &str) -> Result<(Vec<f64>, Vec<f64>)> {
        let ja = self.column_index(a)?;
        let jb = self.column_index(b)?;
        let mut xs = Vec::with_capacity(self.rows.len());
        let mut ys = Vec::with_capacity(self.rows.len());
        for (i, row) in self.rows.iter().enumerate() {
            let x = numeric_cell(&row[ja], a, i)?;
            let y = numeric_cell(&row[jb], b, i)?;
            if let (Some(x), Some(y)) = (x, y) {
                xs.push(x);
                ys.push(y);
            }
        }
        Ok((xs, ys))
    }

    /// Category labels of two variables for rows where both are non-missing.
    pub fn paired_categories(&self, a: &str, b: &str) -> Result<Vec<(String, String)>> {
        let ja = self.column_index(a)?;
        let jb = self.column_index(b)?;
        Ok(self
            .rows
            .iter()
            .filter_map(|row| Some((row[ja].category_label()?, row[jb].category_label()?)))
            .collect())
    }
}

fn numeric_cell(value: &Value, variable: &str, row: usize) -> Result<Option<f64>> {
    match value {
        v if v.is_missing() => Ok(None),
        Value::Numeric(x) if x.is_finite() => Ok(Some(*x)),
        _ => Err(StatsError::NonNumericValue {
            variable: variable.to_owned(),
            row,
        }),
    }
}
