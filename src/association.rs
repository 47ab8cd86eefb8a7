//! Association measures over a dataset.
//!
//! Builds Pearson and Spearman correlation matrices from pairwise-complete
//! observations, the two named correlation pairs, and the chi-squared
//! independence test of a categorical pair. Every test uses the fixed
//! significance level [`ALPHA`].

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::correlation::{
    has_zero_variance, pearson, spearman, CorrelationMatrix, CorrelationResult,
    CorrelationStrength,
};
use crate::dataset::Dataset;
use crate::error::{Result, StatsError};
use crate::manifest::VariablePair;
use crate::testing::{chi_squared_independence, ChiSquaredResult, ContingencyTable};

/// Significance level for every test in the report.
pub const ALPHA: f64 = 0.05;

/// Outcome of comparing a p-value against [`ALPHA`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Significance {
    /// p < α: reject the null hypothesis (no correlation / independence).
    Significant,
    /// p ≥ α.
    NotSignificant,
}

impl Significance {
    pub fn from_p_value(p_value: f64) -> Self {
        if p_value < ALPHA {
            Self::Significant
        } else {
            Self::NotSignificant
        }
    }

    pub fn is_significant(self) -> bool {
        self == Self::Significant
    }
}

impl fmt::Display for Significance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Significant => write!(f, "statistically significant (p < {ALPHA})"),
            Self::NotSignificant => write!(f, "not statistically significant (p >= {ALPHA})"),
        }
    }
}

/// Correlation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CorrelationMethod {
    Pearson,
    Spearman,
}

impl CorrelationMethod {
    fn statistic(self) -> &'static str {
        match self {
            Self::Pearson => "Pearson correlation",
            Self::Spearman => "Spearman correlation",
        }
    }

    fn kernel(self, x: &[f64], y: &[f64]) -> Option<CorrelationResult> {
        match self {
            Self::Pearson => pearson(x, y),
            Self::Spearman => spearman(x, y),
        }
    }
}

/// Correlation between two named variables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairCorrelation {
    pub method: CorrelationMethod,
    pub first: String,
    pub second: String,
    /// Coefficient, p-value and pairwise-complete sample size.
    pub result: CorrelationResult,
    pub significance: Significance,
    pub strength: CorrelationStrength,
}

/// Chi-squared independence test of a categorical pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndependenceTest {
    pub table: ContingencyTable,
    pub result: ChiSquaredResult,
    /// `Significant` means independence is rejected.
    pub significance: Significance,
}

/// All association measures of a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssociationReport {
    pub pearson_matrix: CorrelationMatrix,
    pub spearman_matrix: CorrelationMatrix,
    pub pearson_pair: PairCorrelation,
    pub spearman_pair: PairCorrelation,
    pub independence: IndependenceTest,
}

/// Computes every association measure.
///
/// # Errors
///
/// Fails on the first pair or table that cannot be computed; see
/// [`correlate`], [`correlation_matrix`] and [`independence_test`].
pub fn compute_association(
    dataset: &Dataset,
    numeric: &[String],
    pearson_pair: &VariablePair,
    spearman_pair: &VariablePair,
    categorical_pair: &VariablePair,
) -> Result<AssociationReport> {
    Ok(AssociationReport {
        pearson_matrix: correlation_matrix(dataset, numeric, CorrelationMethod::Pearson)?,
        spearman_matrix: correlation_matrix(dataset, numeric, CorrelationMethod::Spearman)?,
        pearson_pair: correlate(
            dataset,
            CorrelationMethod::Pearson,
            &pearson_pair.first,
            &pearson_pair.second,
        )?,
        spearman_pair: correlate(
            dataset,
            CorrelationMethod::Spearman,
            &spearman_pair.first,
            &spearman_pair.second,
        )?,
        independence: independence_test(dataset, categorical_pair)?,
    })
}

/// Correlates two numeric variables over rows where both are present.
///
/// # Errors
///
/// - [`StatsError::InsufficientSample`] with fewer than 3 paired observations.
/// - [`StatsError::ConstantVariable`] if either side has zero variance.
/// - Column errors from [`Dataset::paired_numeric`].
pub fn correlate(
    dataset: &Dataset,
    method: CorrelationMethod,
    first: &str,
    second: &str,
) -> Result<PairCorrelation> {
    let result = correlate_values(dataset, method, first, second)?;
    debug!(
        method = method.statistic(),
        first,
        second,
        r = result.r,
        p_value = result.p_value,
        n = result.n,
        "pair correlated"
    );

    Ok(PairCorrelation {
        method,
        first: first.to_owned(),
        second: second.to_owned(),
        result,
        significance: Significance::from_p_value(result.p_value),
        strength: CorrelationStrength::from_r(result.r),
    })
}

/// Pairwise-complete correlation matrix over `variables`.
///
/// Diagonal cells are exactly 1.0. Each off-diagonal cell uses only rows
/// where both of its variables are present.
pub fn correlation_matrix(
    dataset: &Dataset,
    variables: &[String],
    method: CorrelationMethod,
) -> Result<CorrelationMatrix> {
    let mut matrix = CorrelationMatrix::identity(variables.to_vec());

    for (i, a) in variables.iter().enumerate() {
        matrix.set_diagonal_size(i, dataset.numeric_column(a)?.len());
        for (j, b) in variables.iter().enumerate().skip(i + 1) {
            let result = correlate_values(dataset, method, a, b)?;
            matrix.set_pair(i, j, result.r, result.n);
        }
    }

    debug!(method = method.statistic(), dim = variables.len(), "correlation matrix built");
    Ok(matrix)
}

/// Cross-tabulates a categorical pair and tests it for independence.
///
/// Rows with a missing value in either column are excluded.
///
/// # Errors
///
/// [`StatsError::DegenerateTable`] if the table has fewer than 2 rows or
/// columns, or an expected frequency is zero.
pub fn independence_test(dataset: &Dataset, pair: &VariablePair) -> Result<IndependenceTest> {
    let observations = dataset.paired_categories(&pair.first, &pair.second)?;
    let table = ContingencyTable::from_pairs(&pair.first, &pair.second, &observations);

    let degenerate = |reason: String| StatsError::DegenerateTable {
        row_variable: pair.first.clone(),
        col_variable: pair.second.clone(),
        reason,
    };

    if table.n_rows() < 2 || table.n_cols() < 2 {
        return Err(degenerate(format!(
            "at least 2 categories per variable are required, got {}x{}",
            table.n_rows(),
            table.n_cols()
        )));
    }

    let result = chi_squared_independence(&table.to_f64(), table.n_rows(), table.n_cols())
        .ok_or_else(|| degenerate("an expected frequency is zero".into()))?;

    debug!(
        rows = table.n_rows(),
        cols = table.n_cols(),
        statistic = result.statistic,
        p_value = result.p_value,
        df = result.df,
        "independence tested"
    );

    let significance = Significance::from_p_value(result.p_value);
    Ok(IndependenceTest {
        table,
        result,
        significance,
    })
}

fn correlate_values(
    dataset: &Dataset,
    method: CorrelationMethod,
    first: &str,
    second: &str,
) -> Result<CorrelationResult> {
    let (xs, ys) = dataset.paired_numeric(first, second)?;
    let statistic = method.statistic();

    if xs.len() < 3 {
        return Err(StatsError::InsufficientSample {
            variable: format!("{first}, {second}"),
            statistic,
            min_required: 3,
            actual: xs.len(),
        });
    }

    let constant = |variable: &str| StatsError::ConstantVariable {
        variable: variable.to_owned(),
        statistic,
    };
    if has_zero_variance(&xs) {
        return Err(constant(first));
    }
    if has_zero_variance(&ys) {
        return Err(constant(second));
    }

    method.kernel(&xs, &ys).ok_or_else(|| constant(first))
}
