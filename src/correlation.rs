//! Correlation analysis.
//!
//! Pearson and Spearman correlation coefficients with two-tailed p-values,
//! named correlation matrices, and strength classification.
//!
//! The functions here operate on complete, paired `f64` slices. Extracting
//! pairwise-complete observations from a dataset is done by
//! [`association`](crate::association).
//!
//! # Examples
//!
//! ```
//! use u_describe::correlation::{pearson, spearman};
//!
//! let x = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let y = [2.0, 4.0, 5.0, 4.0, 5.0];
//!
//! let p = pearson(&x, &y).unwrap();
//! assert!(p.r > 0.7);
//! assert!(p.p_value < 0.2);
//!
//! let s = spearman(&x, &y).unwrap();
//! assert!(s.r > 0.7);
//! ```

use std::fmt;

use serde::Serialize;
use u_numflow::special;
use u_numflow::stats;

/// Result of a correlation computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CorrelationResult {
    /// Correlation coefficient in [-1, 1].
    pub r: f64,
    /// Two-tailed p-value for testing H₀: ρ = 0.
    pub p_value: f64,
    /// Sample size.
    pub n: usize,
}

/// Qualitative strength of a correlation coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CorrelationStrength {
    /// |r| < 0.3
    Weak,
    /// 0.3 ≤ |r| < 0.7
    Moderate,
    /// |r| ≥ 0.7
    Strong,
}

impl CorrelationStrength {
    pub fn from_r(r: f64) -> Self {
        let a = r.abs();
        if a < 0.3 {
            Self::Weak
        } else if a < 0.7 {
            Self::Moderate
        } else {
            Self::Strong
        }
    }
}

impl fmt::Display for CorrelationStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weak => write!(f, "weak correlation"),
            Self::Moderate => write!(f, "moderate correlation"),
            Self::Strong => write!(f, "strong correlation"),
        }
    }
}

// ---------------------------------------------------------------------------
// Pearson
// ---------------------------------------------------------------------------

/// Computes Pearson product-moment correlation coefficient and p-value.
///
/// # Algorithm
///
/// r = cov(x,y) / (σ_x · σ_y)
///
/// p-value via t-test: t = r·√(n-2) / √(1-r²), df = n-2.
///
/// # Returns
///
/// `None` if either slice has fewer than 3 elements, the slices differ in
/// length, or either variable has zero variance.
///
/// # References
///
/// Pearson (1895). "Note on regression and inheritance in the case of
/// two parents". Proceedings of the Royal Society of London, 58, 240–242.
///
/// # Examples
///
/// ```
/// use u_describe::correlation::pearson;
///
/// let x = [80.0, 70.0, 90.0];
/// let y = [85.0, 75.0, 95.0];
/// let result = pearson(&x, &y).unwrap();
/// assert!((result.r - 1.0).abs() < 1e-10);
/// assert!(result.p_value < 0.05);
/// ```
pub fn pearson(x: &[f64], y: &[f64]) -> Option<CorrelationResult> {
    let n = x.len();
    if n < 3 || n != y.len() {
        return None;
    }

    if x.iter().any(|v| !v.is_finite()) || y.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let cov = stats::covariance(x, y)?;
    let sx = stats::std_dev(x)?;
    let sy = stats::std_dev(y)?;

    if is_constant(sx) || is_constant(sy) {
        return None;
    }

    let r = (cov / (sx * sy)).clamp(-1.0, 1.0);
    let p_value = correlation_p_value(r, n);

    Some(CorrelationResult { r, p_value, n })
}

// ---------------------------------------------------------------------------
// Spearman
// ---------------------------------------------------------------------------

/// Computes Spearman rank correlation coefficient and p-value.
///
/// # Algorithm
///
/// Ranks both variables using the mid-rank method for ties, then computes
/// Pearson correlation on the ranks. P-value uses the same t-test
/// approximation as Pearson.
///
/// # Returns
///
/// `None` under the same conditions as [`pearson`], with zero variance
/// checked on the ranks.
///
/// # References
///
/// Spearman (1904). "The proof and measurement of association between two
/// things". The American Journal of Psychology, 15(1), 72–101.
pub fn spearman(x: &[f64], y: &[f64]) -> Option<CorrelationResult> {
    let n = x.len();
    if n < 3 || n != y.len() {
        return None;
    }

    if x.iter().any(|v| !v.is_finite()) || y.iter().any(|v| !v.is_finite()) {
        return None;
    }

    pearson(&rank_data(x), &rank_data(y))
}

/// Returns `true` if the sample standard deviation of `data` is effectively zero.
pub fn has_zero_variance(data: &[f64]) -> bool {
    stats::std_dev(data).map_or(true, is_constant)
}

fn is_constant(sd: f64) -> bool {
    !sd.is_finite() || sd < 1e-300
}

// ---------------------------------------------------------------------------
// Correlation Matrix
// ---------------------------------------------------------------------------

/// A symmetric, named correlation matrix stored row-major.
///
/// # Invariants
///
/// - `values.len() == variables.len()²`
/// - `get(i, j) == get(j, i)` and `get(i, i) == 1.0`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    variables: Vec<String>,
    values: Vec<f64>,
    sample_sizes: Vec<usize>,
}

impl CorrelationMatrix {
    /// Starts an identity matrix over `variables`. Diagonal sample sizes are 0
    /// until set.
    pub(crate) fn identity(variables: Vec<String>) -> Self {
        let p = variables.len();
        let mut values = vec![0.0; p * p];
        for i in 0..p {
            values[i * p + i] = 1.0;
        }
        Self {
            variables,
            values,
            sample_sizes: vec![0; p * p],
        }
    }

    /// Sets the symmetric off-diagonal cell (i, j) and (j, i).
    pub(crate) fn set_pair(&mut self, i: usize, j: usize, r: f64, n: usize) {
        let p = self.variables.len();
        self.values[i * p + j] = r;
        self.values[j * p + i] = r;
        self.sample_sizes[i * p + j] = n;
        self.sample_sizes[j * p + i] = n;
    }

    pub(crate) fn set_diagonal_size(&mut self, i: usize, n: usize) {
        let p = self.variables.len();
        self.sample_sizes[i * p + i] = n;
    }

    /// Variable names labelling rows and columns.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Number of rows (= columns).
    pub fn dim(&self) -> usize {
        self.variables.len()
    }

    /// Coefficient at (i, j).
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is out of range.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        let p = self.dim();
        assert!(i < p && j < p, "index ({i}, {j}) out of range for {p}x{p}");
        self.values[i * p + j]
    }

    /// Number of pairwise-complete observations behind cell (i, j).
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is out of range.
    pub fn sample_size(&self, i: usize, j: usize) -> usize {
        let p = self.dim();
        assert!(i < p && j < p, "index ({i}, {j}) out of range for {p}x{p}");
        self.sample_sizes[i * p + j]
    }

    /// Coefficient between two named variables.
    pub fn get_by_name(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.variables.iter().position(|v| v == a)?;
        let j = self.variables.iter().position(|v| v == b)?;
        Some(self.get(i, j))
    }

    /// Rows of the matrix as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks(self.dim().max(1))
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Computes two-tailed p-value for a correlation coefficient via t-test.
///
/// t = r·√(n-2) / √(1-r²), df = n-2.
fn correlation_p_value(r: f64, n: usize) -> f64 {
    if n < 3 {
        return 1.0;
    }
    let df = (n - 2) as f64;
    let r2 = r * r;

    // Handle r ≈ ±1.0 (denominator → 0)
    if r2 >= 1.0 - 1e-15 {
        return 0.0;
    }

    let t = r * (df / (1.0 - r2)).sqrt();
    (2.0 * (1.0 - special::t_distribution_cdf(t.abs(), df))).clamp(0.0, 1.0)
}

/// Ranks data using the mid-rank method for ties.
///
/// Returns a Vec of ranks (1-based). Tied values receive the average rank.
pub fn rank_data(data: &[f64]) -> Vec<f64> {
    let n = data.len();
    let mut indexed: Vec<(usize, f64)> = data.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j < n && indexed[j].1 == indexed[i].1 {
            j += 1;
        }
        // Average rank for the tied group (1-based)
        let avg_rank = (i + j) as f64 / 2.0 + 0.5;
        for item in indexed.iter().take(j).skip(i) {
            ranks[item.0] = avg_rank;
        }
        i = j;
    }

    ranks
}
