//! Full statistical report.
//!
//! [`build_report`] validates the manifest, computes position and
//! variability for every numeric variable, then the association measures.
//! It is all-or-nothing: the first failure aborts the report.
//!
//! # Examples
//!
//! ```
//! use u_describe::dataset::{Dataset, Value};
//! use u_describe::manifest::{VariableManifest, VariablePair};
//! use u_describe::report::build_report;
//!
//! let rows = [
//!     (80.0, 85.0, "High", "Yes"),
//!     (70.0, 75.0, "Low", "No"),
//!     (90.0, 94.0, "High", "Yes"),
//!     (60.0, 66.0, "Low", "No"),
//!     (75.0, 70.0, "Low", "Yes"),
//! ];
//! let ds = Dataset::new(
//!     vec!["Math".into(), "Sci".into(), "Level".into(), "Passed".into()],
//!     rows.iter()
//!         .map(|&(m, s, l, p)| vec![Value::from(m), Value::from(s), Value::from(l), Value::from(p)])
//!         .collect(),
//! )
//! .unwrap();
//!
//! let manifest = VariableManifest::new(
//!     ["Math", "Sci"],
//!     VariablePair::new("Math", "Sci"),
//!     VariablePair::new("Math", "Sci"),
//!     VariablePair::new("Level", "Passed"),
//! );
//!
//! let report = build_report(&ds, &manifest).unwrap();
//! assert_eq!(report.variables.len(), 2);
//! assert!(report.association.pearson_pair.result.r > 0.8);
//! ```

use serde::Serialize;
use tracing::{info, warn};

use crate::association::{compute_association, AssociationReport};
use crate::dataset::Dataset;
use crate::descriptive::{compute_position, compute_variability, PositionStats, VariabilityStats};
use crate::error::Result;
use crate::manifest::VariableManifest;

/// Position and variability of one numeric variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableSummary {
    pub name: String,
    pub position: PositionStats,
    pub variability: VariabilityStats,
}

/// Complete result of one engine invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticalReport {
    /// Rows in the analysed dataset, before any per-statistic exclusion.
    pub row_count: usize,
    /// One summary per numeric variable, in manifest order.
    pub variables: Vec<VariableSummary>,
    pub association: AssociationReport,
}

impl StatisticalReport {
    /// Summary of a numeric variable by name.
    pub fn variable(&self, name: &str) -> Option<&VariableSummary> {
        self.variables.iter().find(|v| v.name == name)
    }
}

/// Builds the full report for `dataset` as described by `manifest`.
///
/// # Errors
///
/// Any error from [`VariableManifest::validate`], [`compute_position`],
/// [`compute_variability`] or [`compute_association`]. No partial report
/// is produced.
pub fn build_report(dataset: &Dataset, manifest: &VariableManifest) -> Result<StatisticalReport> {
    manifest
        .validate(dataset)
        .map_err(|e| abort("manifest", e))?;

    let mut variables = Vec::with_capacity(manifest.numeric.len());
    for name in &manifest.numeric {
        let position = compute_position(dataset, name).map_err(|e| abort("position", e))?;
        let variability =
            compute_variability(dataset, name).map_err(|e| abort("variability", e))?;
        variables.push(VariableSummary {
            name: name.clone(),
            position,
            variability,
        });
    }

    let association = compute_association(
        dataset,
        &manifest.numeric,
        &manifest.pearson_pair,
        &manifest.spearman_pair,
        &manifest.categorical_pair,
    )
    .map_err(|e| abort("association", e))?;

    info!(
        rows = dataset.row_count(),
        variables = variables.len(),
        "statistical report built"
    );

    Ok(StatisticalReport {
        row_count: dataset.row_count(),
        variables,
        association,
    })
}

fn abort<E: std::fmt::Display>(stage: &'static str, err: E) -> E {
    warn!(stage, error = %err, "report aborted");
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Value;
    use crate::error::StatsError;
    use crate::manifest::VariablePair;

    fn dataset(rows: &[(Option<f64>, Option<f64>, &str, &str)]) -> Dataset {
        Dataset::new(
            vec!["x".into(), "y".into(), "g".into(), "h".into()],
            rows.iter()
                .map(|&(x, y, g, h)| vec![Value::from(x), Value::from(y), g.into(), h.into()])
                .collect(),
        )
        .unwrap()
    }

    fn manifest() -> VariableManifest {
        VariableManifest::new(
            ["x", "y"],
            VariablePair::new("x", "y"),
            VariablePair::new("y", "x"),
            VariablePair::new("g", "h"),
        )
    }

    fn good_rows() -> Vec<(Option<f64>, Option<f64>, &'static str, &'static str)> {
        vec![
            (Some(1.0), Some(2.0), "a", "p"),
            (Some(2.0), Some(1.0), "a", "q"),
            (Some(3.0), Some(5.0), "b", "p"),
            (Some(4.0), Some(3.0), "b", "q"),
            (Some(5.0), Some(6.0), "b", "q"),
        ]
    }

    #[test]
    fn report_in_manifest_order() {
        let report = build_report(&dataset(&good_rows()), &manifest()).unwrap();
        assert_eq!(report.row_count, 5);
        let names: Vec<&str> = report.variables.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert_eq!(report.variable("y").unwrap().position.count, 5);
        assert!(report.variable("z").is_none());
    }

    #[test]
    fn failure_in_variability_aborts_report() {
        let mut rows = good_rows();
        for r in rows.iter_mut() {
            r.0 = Some(0.0);
        }
        rows[0].0 = Some(-1.0);
        rows[1].0 = Some(1.0);
        // mean of x is zero → coefficient of variation undefined
        let err = build_report(&dataset(&rows), &manifest()).unwrap_err();
        assert!(matches!(err, StatsError::DivisionByZero { .. }));
    }

    #[test]
    fn unknown_variable_aborts_report() {
        let mut m = manifest();
        m.categorical_pair = VariablePair::new("g", "missing");
        let err = build_report(&dataset(&good_rows()), &m).unwrap_err();
        assert!(matches!(err, StatsError::UnknownVariable { .. }));
    }

    #[test]
    fn report_serializes() {
        let report = build_report(&dataset(&good_rows()), &manifest()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["variables"][0]["name"], "x");
        assert!(json["association"]["independence"]["result"]["df"].is_number());
    }
}
