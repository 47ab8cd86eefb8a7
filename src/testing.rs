//! Hypothesis testing for categorical data.
//!
//! Cross-tabulation of two categorical variables into a contingency table
//! and Pearson's chi-squared test of independence.
//!
//! # Examples
//!
//! ```
//! use u_describe::testing::chi_squared_independence;
//!
//! // 2×2 contingency table
//! let table = [30.0, 10.0, 20.0, 40.0];
//! let r = chi_squared_independence(&table, 2, 2).unwrap();
//! assert!(r.p_value < 0.01);
//! assert_eq!(r.df, 1);
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use u_numflow::special;

/// Cross-tabulated counts of two categorical variables.
///
/// Rows are the categories of `row_variable`, columns those of
/// `col_variable`, both in lexicographic order. Only observed categories
/// appear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContingencyTable {
    pub row_variable: String,
    pub col_variable: String,
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    /// Row-major cell counts.
    counts: Vec<u64>,
}

impl ContingencyTable {
    /// Cross-tabulates `(row category, column category)` observations.
    pub fn from_pairs(
        row_variable: impl Into<String>,
        col_variable: impl Into<String>,
        pairs: &[(String, String)],
    ) -> Self {
        let row_set: BTreeSet<&str> = pairs.iter().map(|(a, _)| a.as_str()).collect();
        let col_set: BTreeSet<&str> = pairs.iter().map(|(_, b)| b.as_str()).collect();

        let row_index: BTreeMap<&str, usize> =
            row_set.iter().enumerate().map(|(i, &k)| (k, i)).collect();
        let col_index: BTreeMap<&str, usize> =
            col_set.iter().enumerate().map(|(j, &k)| (k, j)).collect();

        let n_cols = col_set.len();
        let mut counts = vec![0u64; row_set.len() * n_cols];
        for (a, b) in pairs {
            counts[row_index[a.as_str()] * n_cols + col_index[b.as_str()]] += 1;
        }

        Self {
            row_variable: row_variable.into(),
            col_variable: col_variable.into(),
            row_labels: row_set.into_iter().map(str::to_owned).collect(),
            col_labels: col_set.into_iter().map(str::to_owned).collect(),
            counts,
        }
    }

    pub fn n_rows(&self) -> usize {
        self.row_labels.len()
    }

    pub fn n_cols(&self) -> usize {
        self.col_labels.len()
    }

    /// Count in cell (i, j).
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is out of range.
    pub fn get(&self, i: usize, j: usize) -> u64 {
        assert!(i < self.n_rows() && j < self.n_cols(), "cell ({i}, {j}) out of range");
        self.counts[i * self.n_cols() + j]
    }

    /// Count for a pair of category labels; `None` if either was not observed.
    pub fn get_by_label(&self, row: &str, col: &str) -> Option<u64> {
        let i = self.row_labels.iter().position(|l| l == row)?;
        let j = self.col_labels.iter().position(|l| l == col)?;
        Some(self.get(i, j))
    }

    /// Grand total of all cells.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn row_totals(&self) -> Vec<u64> {
        self.counts
            .chunks(self.n_cols().max(1))
            .take(self.n_rows())
            .map(|row| row.iter().sum())
            .collect()
    }

    pub fn col_totals(&self) -> Vec<u64> {
        (0..self.n_cols())
            .map(|j| (0..self.n_rows()).map(|i| self.get(i, j)).sum())
            .collect()
    }

    /// Counts as a row-major `f64` slice, the layout expected by
    /// [`chi_squared_independence`].
    pub fn to_f64(&self) -> Vec<f64> {
        self.counts.iter().map(|&c| c as f64).collect()
    }
}

/// Result of a chi-squared test of independence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChiSquaredResult {
    /// Pearson's χ² statistic.
    pub statistic: f64,
    /// Upper-tail p-value.
    pub p_value: f64,
    /// Degrees of freedom, (r-1)(c-1).
    pub df: usize,
    /// Expected frequencies under independence, row-major, same shape as
    /// the observed table.
    pub expected: Vec<f64>,
    pub n_rows: usize,
    pub n_cols: usize,
}

impl ChiSquaredResult {
    /// Expected frequency for cell (i, j).
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is out of range.
    pub fn expected_at(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.n_rows && j < self.n_cols, "cell ({i}, {j}) out of range");
        self.expected[i * self.n_cols + j]
    }
}

/// Chi-squared test of independence on an r×c contingency table.
///
/// # Algorithm
///
/// Expected: Eᵢⱼ = (row_sumᵢ × col_sumⱼ) / N.
/// χ² = Σᵢⱼ (Oᵢⱼ - Eᵢⱼ)² / Eᵢⱼ, df = (r-1)(c-1).
///
/// No continuity correction is applied, including for 2×2 tables.
///
/// # Returns
///
/// `None` if fewer than 2 rows or columns, any cell is negative, or
/// any expected frequency is zero.
///
/// # References
///
/// Pearson (1900). "On the criterion that a given system of deviations from
/// the probable...". Philosophical Magazine, 50(302), 157–175.
pub fn chi_squared_independence(
    table: &[f64],
    n_rows: usize,
    n_cols: usize,
) -> Option<ChiSquaredResult> {
    if n_rows < 2 || n_cols < 2 || table.len() != n_rows * n_cols {
        return None;
    }

    for &v in table {
        if v < 0.0 || !v.is_finite() {
            return None;
        }
    }

    let mut row_sums = vec![0.0; n_rows];
    let mut col_sums = vec![0.0; n_cols];
    let mut total = 0.0;

    for i in 0..n_rows {
        for j in 0..n_cols {
            let val = table[i * n_cols + j];
            row_sums[i] += val;
            col_sums[j] += val;
            total += val;
        }
    }

    if total <= 0.0 {
        return None;
    }

    let mut expected = Vec::with_capacity(n_rows * n_cols);
    let mut chi2 = 0.0;
    for i in 0..n_rows {
        for j in 0..n_cols {
            let e = row_sums[i] * col_sums[j] / total;
            if e <= 0.0 {
                return None;
            }
            let observed = table[i * n_cols + j];
            chi2 += (observed - e).powi(2) / e;
            expected.push(e);
        }
    }

    let df = (n_rows - 1) * (n_cols - 1);
    let p_value = (1.0 - special::chi_squared_cdf(chi2, df as f64)).clamp(0.0, 1.0);

    Some(ChiSquaredResult {
        statistic: chi2,
        p_value,
        df,
        expected,
        n_rows,
        n_cols,
    })
}
