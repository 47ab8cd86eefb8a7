//! Descriptive statistics per numeric variable.
//!
//! Measures of position (mean, median, mode, quartiles) and of variability
//! (min, max, range, sample variance, standard deviation, coefficient of
//! variation). Missing entries are excluded per variable before computing.
//!
//! # Examples
//!
//! ```
//! use u_describe::dataset::{Dataset, Value};
//! use u_describe::descriptive::{compute_position, compute_variability, VariabilityBand};
//!
//! let ds = Dataset::new(
//!     vec!["Math".into()],
//!     [80.0, 70.0, 90.0, 85.0].iter().map(|&v| vec![Value::from(v)]).collect(),
//! )
//! .unwrap();
//!
//! let pos = compute_position(&ds, "Math").unwrap();
//! assert_eq!(pos.median, 82.5);
//!
//! let var = compute_variability(&ds, "Math").unwrap();
//! assert_eq!(var.range, 20.0);
//! assert_eq!(var.band, VariabilityBand::Low);
//! ```

use std::fmt;

use serde::Serialize;
use tracing::debug;
use u_numflow::stats;

use crate::dataset::Dataset;
use crate::error::{Result, StatsError};

/// Measures of position for one variable.
///
/// # Invariants
///
/// - `quantile_50 == median`
/// - `quantile_25 <= median <= quantile_75`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionStats {
    /// Number of non-missing values used.
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Most frequent value; the smallest one when several tie.
    pub mode: f64,
    pub quantile_25: f64,
    pub quantile_50: f64,
    pub quantile_75: f64,
}

/// Measures of variability for one variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariabilityStats {
    pub min: f64,
    pub max: f64,
    /// `max - min`.
    pub range: f64,
    /// Sample variance (denominator n-1).
    pub variance: f64,
    /// Square root of `variance`.
    pub std_dev: f64,
    /// Coefficient of variation in percent: `std_dev / mean × 100`.
    pub coefficient_of_variation: f64,
    /// Classification of `coefficient_of_variation`.
    pub band: VariabilityBand,
}

/// Qualitative variability level derived from the coefficient of variation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VariabilityBand {
    /// CV < 15%: homogeneous data.
    Low,
    /// 15% ≤ CV < 30%.
    Moderate,
    /// CV ≥ 30%: heterogeneous data.
    High,
}

impl VariabilityBand {
    /// Classifies a coefficient of variation given in percent.
    pub fn from_cv(cv: f64) -> Self {
        if cv < 15.0 {
            Self::Low
        } else if cv < 30.0 {
            Self::Moderate
        } else {
            Self::High
        }
    }
}

impl fmt::Display for VariabilityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low variability"),
            Self::Moderate => write!(f, "moderate variability"),
            Self::High => write!(f, "high variability"),
        }
    }
}

/// Computes measures of position for a numeric variable.
///
/// Quartiles use linear interpolation between order statistics
/// (index = q·(n-1)). The 50% quantile is the median itself.
///
/// # Errors
///
/// [`StatsError::EmptyVariable`] if no non-missing values remain, plus the
/// column errors of [`Dataset::numeric_column`].
pub fn compute_position(dataset: &Dataset, variable: &str) -> Result<PositionStats> {
    let values = dataset.numeric_column(variable)?;
    let empty = || StatsError::EmptyVariable {
        variable: variable.to_owned(),
    };

    let mean = stats::mean(&values).ok_or_else(empty)?;
    let median = stats::quantile(&values, 0.5).ok_or_else(empty)?;
    let quantile_25 = stats::quantile(&values, 0.25).ok_or_else(empty)?;
    let quantile_75 = stats::quantile(&values, 0.75).ok_or_else(empty)?;
    let mode = smallest_mode(&values).ok_or_else(empty)?;

    debug!(variable, count = values.len(), mean, median, "position computed");

    Ok(PositionStats {
        count: values.len(),
        mean,
        median,
        mode,
        quantile_25,
        quantile_50: median,
        quantile_75,
    })
}

/// Computes measures of variability for a numeric variable.
///
/// # Errors
///
/// - [`StatsError::EmptyVariable`] if no non-missing values remain.
/// - [`StatsError::InsufficientSample`] if fewer than 2 values remain.
/// - [`StatsError::DivisionByZero`] if the mean is exactly zero, since the
///   coefficient of variation is then undefined.
pub fn compute_variability(dataset: &Dataset, variable: &str) -> Result<VariabilityStats> {
    let values = dataset.numeric_column(variable)?;
    let n = values.len();
    if n == 0 {
        return Err(StatsError::EmptyVariable {
            variable: variable.to_owned(),
        });
    }
    if n < 2 {
        return Err(StatsError::InsufficientSample {
            variable: variable.to_owned(),
            statistic: "variance",
            min_required: 2,
            actual: n,
        });
    }

    let insufficient = |statistic| StatsError::InsufficientSample {
        variable: variable.to_owned(),
        statistic,
        min_required: 2,
        actual: n,
    };

    let min = stats::min(&values).ok_or_else(|| insufficient("min"))?;
    let max = stats::max(&values).ok_or_else(|| insufficient("max"))?;
    let mean = stats::mean(&values).ok_or_else(|| insufficient("mean"))?;
    let variance = stats::variance(&values)
        .ok_or_else(|| insufficient("variance"))?
        .max(0.0);
    let std_dev = variance.sqrt();

    if mean == 0.0 {
        return Err(StatsError::DivisionByZero {
            variable: variable.to_owned(),
            statistic: "coefficient of variation",
        });
    }
    let coefficient_of_variation = std_dev / mean * 100.0;
    let band = VariabilityBand::from_cv(coefficient_of_variation);

    debug!(variable, variance, coefficient_of_variation, %band, "variability computed");

    Ok(VariabilityStats {
        min,
        max,
        range: max - min,
        variance,
        std_dev,
        coefficient_of_variation,
        band,
    })
}

/// Most frequent value, choosing the smallest among ties.
///
/// Returns `None` for empty input.
fn smallest_mode(data: &[f64]) -> Option<f64> {
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mut best: Option<(f64, usize)> = None;
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i;
        while j < sorted.len() && sorted[j] == sorted[i] {
            j += 1;
        }
        let count = j - i;
        // Strict comparison keeps the earliest (smallest) value on ties.
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((sorted[i], count));
        }
        i = j;
    }

    best.map(|(v, _)| v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Value;

    fn column(values: &[Option<f64>]) -> Dataset {
        Dataset::new(
            vec!["x".into()],
            values.iter().map(|&v| vec![Value::from(v)]).collect(),
        )
        .unwrap()
    }

    fn numbers(values: &[f64]) -> Dataset {
        column(&values.iter().map(|&v| Some(v)).collect::<Vec<_>>())
    }

    // -----------------------------------------------------------------------
    // Position
    // -----------------------------------------------------------------------

    #[test]
    fn position_odd_count() {
        let p = compute_position(&numbers(&[3.0, 1.0, 2.0, 5.0, 4.0]), "x").unwrap();
        assert_eq!(p.count, 5);
        assert!((p.mean - 3.0).abs() < 1e-12);
        assert_eq!(p.median, 3.0);
        assert_eq!(p.quantile_50, p.median);
        assert!((p.quantile_25 - 2.0).abs() < 1e-12);
        assert!((p.quantile_75 - 4.0).abs() < 1e-12);
    }

    #[test]
    fn position_interpolates_quartiles() {
        // index 0.75 → 1 + 0.75·(2 - 1) = 1.75
        let p = compute_position(&numbers(&[1.0, 2.0, 3.0, 4.0]), "x").unwrap();
        assert!((p.quantile_25 - 1.75).abs() < 1e-12);
        assert!((p.median - 2.5).abs() < 1e-12);
        assert!((p.quantile_75 - 3.25).abs() < 1e-12);
    }

    #[test]
    fn mode_most_frequent() {
        let p = compute_position(&numbers(&[4.0, 2.0, 4.0, 1.0, 2.0, 4.0]), "x").unwrap();
        assert_eq!(p.mode, 4.0);
    }

    #[test]
    fn mode_tie_takes_smallest() {
        let p = compute_position(&numbers(&[9.0, 3.0, 7.0, 3.0, 9.0]), "x").unwrap();
        assert_eq!(p.mode, 3.0);

        let p = compute_position(&numbers(&[5.0, 2.0, 8.0]), "x").unwrap();
        assert_eq!(p.mode, 2.0);
    }

    #[test]
    fn position_excludes_nulls() {
        let ds = column(&[Some(10.0), None, Some(20.0), Some(30.0), Some(40.0)]);
        let p = compute_position(&ds, "x").unwrap();
        assert_eq!(p.count, 4);
        assert!((p.mean - 25.0).abs() < 1e-12);
        assert!((p.median - 25.0).abs() < 1e-12);
    }

    #[test]
    fn position_all_null_is_empty() {
        let err = compute_position(&column(&[None, None]), "x").unwrap_err();
        assert!(matches!(err, StatsError::EmptyVariable { .. }));
    }

    #[test]
    fn position_single_value() {
        let p = compute_position(&numbers(&[7.0]), "x").unwrap();
        assert_eq!(p.mean, 7.0);
        assert_eq!(p.median, 7.0);
        assert_eq!(p.mode, 7.0);
        assert_eq!(p.quantile_25, 7.0);
        assert_eq!(p.quantile_75, 7.0);
    }

    // -----------------------------------------------------------------------
    // Variability
    // -----------------------------------------------------------------------

    #[test]
    fn variability_known_values() {
        // mean 5, sample variance 32/7
        let v = compute_variability(&numbers(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), "x")
            .unwrap();
        assert_eq!(v.min, 2.0);
        assert_eq!(v.max, 9.0);
        assert_eq!(v.range, 7.0);
        assert!((v.variance - 32.0 / 7.0).abs() < 1e-10);
        assert!((v.std_dev - (32.0_f64 / 7.0).sqrt()).abs() < 1e-10);
        let expected_cv = (32.0_f64 / 7.0).sqrt() / 5.0 * 100.0;
        assert!((v.coefficient_of_variation - expected_cv).abs() < 1e-9);
        assert_eq!(v.band, VariabilityBand::High);
    }

    #[test]
    fn variability_constant_nonzero() {
        let v = compute_variability(&numbers(&[70.0, 70.0, 70.0]), "x").unwrap();
        assert_eq!(v.variance, 0.0);
        assert_eq!(v.std_dev, 0.0);
        assert_eq!(v.coefficient_of_variation, 0.0);
        assert_eq!(v.band, VariabilityBand::Low);
    }

    #[test]
    fn variability_zero_mean_fails() {
        let err = compute_variability(&numbers(&[0.0, 0.0, 0.0]), "x").unwrap_err();
        assert!(matches!(err, StatsError::DivisionByZero { .. }));

        let err = compute_variability(&numbers(&[-1.0, 1.0]), "x").unwrap_err();
        assert!(matches!(err, StatsError::DivisionByZero { .. }));
    }

    #[test]
    fn variability_needs_two_values() {
        let err = compute_variability(&column(&[Some(3.0), None]), "x").unwrap_err();
        assert!(matches!(
            err,
            StatsError::InsufficientSample { min_required: 2, actual: 1, .. }
        ));

        let err = compute_variability(&column(&[None]), "x").unwrap_err();
        assert!(matches!(err, StatsError::EmptyVariable { .. }));
    }

    #[test]
    fn band_thresholds() {
        assert_eq!(VariabilityBand::from_cv(14.99), VariabilityBand::Low);
        assert_eq!(VariabilityBand::from_cv(15.0), VariabilityBand::Moderate);
        assert_eq!(VariabilityBand::from_cv(29.99), VariabilityBand::Moderate);
        assert_eq!(VariabilityBand::from_cv(30.0), VariabilityBand::High);
        assert_eq!(VariabilityBand::Moderate.to_string(), "moderate variability");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::dataset::Value;
    use proptest::prelude::*;

    fn dataset(values: &[f64]) -> Dataset {
        Dataset::new(
            vec!["x".into()],
            values.iter().map(|&v| vec![Value::from(v)]).collect(),
        )
        .unwrap()
    }

    proptest! {
        #[test]
        fn quartiles_ordered(raw in proptest::collection::vec(-100_000_i32..100_000, 2..60)) {
            let values: Vec<f64> = raw.iter().map(|&v| f64::from(v)).collect();
            let ds = dataset(&values);
            let p = compute_position(&ds, "x").unwrap();
            let v = compute_variability(&ds, "x");
            prop_assert_eq!(p.quantile_50, p.median);
            prop_assert!(p.quantile_25 <= p.median && p.median <= p.quantile_75);
            if let Ok(v) = v {
                prop_assert!(v.min <= p.quantile_25 && p.quantile_75 <= v.max);
            }
        }

        #[test]
        fn variance_nonnegative_and_std_consistent(
            values in proptest::collection::vec(1.0_f64..1e4, 2..60)
        ) {
            let v = compute_variability(&dataset(&values), "x").unwrap();
            prop_assert!(v.variance >= 0.0);
            let diff = (v.std_dev - v.variance.sqrt()).abs();
            prop_assert!(diff <= 1e-9 * v.std_dev.max(1.0));
        }

        #[test]
        fn mode_is_an_observed_value(values in proptest::collection::vec(0_i32..10, 1..40)) {
            let data: Vec<f64> = values.iter().map(|&v| f64::from(v)).collect();
            let p = compute_position(&dataset(&data), "x").unwrap();
            prop_assert!(data.contains(&p.mode));
        }
    }
}
