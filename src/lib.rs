//! # u-describe
//!
//! Descriptive statistics and association testing over tabular records.
//!
//! Given a [`Dataset`](dataset::Dataset) and a
//! [`VariableManifest`](manifest::VariableManifest), the engine produces a
//! [`StatisticalReport`](report::StatisticalReport): measures of position and
//! variability per numeric variable, Pearson and Spearman correlation
//! matrices, two detailed correlation pairs, and a chi-squared test of
//! independence between two categorical variables.
//!
//! The engine never loads, renders or exports anything. Callers supply the
//! data and decide how to present the report.
//!
//! ## Modules
//!
//! - [`dataset`] — Row-ordered table of numeric / categorical / missing values
//! - [`manifest`] — Declared numeric variables and analysed pairs
//! - [`descriptive`] — Mean, median, mode, quartiles, variance, CV
//! - [`correlation`] — Pearson and Spearman coefficients with p-values
//! - [`testing`] — Contingency tables and the chi-squared independence test
//! - [`association`] — Correlation matrices and tests over a dataset (α = 0.05)
//! - [`report`] — All-or-nothing report assembly
//! - [`error`] — Error types
//!
//! ## Design Philosophy
//!
//! - **Pure**: every operation reads its inputs and returns a value
//! - **Explicit failures**: undefined statistics are errors, never defaults
//! - **Numerical stability**: leverages `u-numflow` for moments and distributions

pub mod association;
pub mod correlation;
pub mod dataset;
pub mod descriptive;
pub mod error;
pub mod manifest;
pub mod report;
pub mod testing;

pub use association::compute_association;
pub use descriptive::{compute_position, compute_variability};
pub use error::{Result, StatsError};
pub use report::{build_report, StatisticalReport};
