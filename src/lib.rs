//! mann_kendall — nonparametric trend tests and robust slope estimators.
//!
//! Purpose
//! -------
//! Implement the Mann-Kendall family of nonparametric trend-detection
//! tests and the Theil-Sen family of robust slope estimators over one or
//! more time series, with support for ties, missing values, seasonal
//! cycles, serial autocorrelation, and cross-series correlation.
//!
//! Key behaviors
//! -------------
//! - Expose thirteen entry points covering the univariate tests
//!   ([`original_test`], [`hamed_rao_modification_test`],
//!   [`yue_wang_modification_test`], [`pre_whitening_modification_test`],
//!   [`trend_free_pre_whitening_modification_test`]), the pooled family
//!   ([`multivariate_test`], [`seasonal_test`], [`regional_test`]), the
//!   covariance-aware family ([`correlated_multivariate_test`],
//!   [`correlated_seasonal_test`], [`partial_test`]), and the standalone
//!   slope estimators ([`sens_slope`], [`seasonal_sens_slope`]).
//! - Return one result shape, [`MKOutcome`], from every test: verdict,
//!   significance flag, p-value, standardized statistic, tau, score,
//!   score variance, slope, and intercept.
//! - Accept any `ndarray` array or view of rank 1 or 2; missing values
//!   are `f64::NAN` and are skipped elementwise, per column, or per
//!   aligned row depending on what the variant requires.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every operation is a pure, synchronous computation: no caches, no
//!   global state, no I/O; caller data is never mutated.
//! - The pairwise kernels are O(n²) by definition of the statistics;
//!   callers size their series accordingly.
//! - Degenerate arithmetic (zero variance with a nonzero score) surfaces
//!   as ±∞/NaN in the returned statistics rather than being masked;
//!   invalid inputs fail fast with [`MKError`].
//!
//! Conventions
//! -----------
//! - Significance levels default to [`DEFAULT_ALPHA`] and seasonal cycles
//!   to [`DEFAULT_PERIOD`] by convention; Rust has no default arguments,
//!   so callers pass them explicitly.
//! - Matrix inputs are rows-by-time, columns-by-series.
//!
//! Downstream usage
//! ----------------
//! - Typical call:
//!
//!   ```rust
//!   use mann_kendall::{original_test, Trend, DEFAULT_ALPHA};
//!   use ndarray::Array1;
//!
//!   let x = Array1::from_iter((0..60).map(|i| i as f64));
//!   let outcome = original_test(&x, DEFAULT_ALPHA).unwrap();
//!
//!   assert_eq!(outcome.trend(), Trend::Increasing);
//!   assert!(outcome.h());
//!   ```
//!
//! - The `prelude` module re-exports the main surface for a one-line
//!   import.
//!
//! Testing notes
//! -------------
//! - Each module carries unit tests for its kernels and guards; the
//!   integration suite under `tests/` pins every operation's statistics
//!   on reference datasets.

pub mod correlated;
pub mod errors;
pub mod multivariate;
pub mod outcome;
pub mod slope;
pub mod univariate;
pub mod validation;

mod acf;
mod kernels;
mod preprocess;

/// Conventional two-tailed significance level.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Conventional seasonal cycle length (monthly data).
pub const DEFAULT_PERIOD: usize = 12;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::correlated::{correlated_multivariate_test, correlated_seasonal_test, partial_test};
pub use self::errors::{MKError, MKResult};
pub use self::multivariate::{multivariate_test, regional_test, seasonal_test};
pub use self::outcome::{MKOutcome, Trend};
pub use self::slope::{seasonal_sens_slope, sens_slope, SensSlope};
pub use self::univariate::{
    hamed_rao_modification_test, original_test, pre_whitening_modification_test,
    trend_free_pre_whitening_modification_test, yue_wang_modification_test,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use mann_kendall::prelude::*;
//
// to import the main trend-testing surface in a single line.

pub mod prelude {
    pub use super::correlated::{
        correlated_multivariate_test, correlated_seasonal_test, partial_test,
    };
    pub use super::errors::{MKError, MKResult};
    pub use super::multivariate::{multivariate_test, regional_test, seasonal_test};
    pub use super::outcome::{MKOutcome, Trend};
    pub use super::slope::{seasonal_sens_slope, sens_slope, SensSlope};
    pub use super::univariate::{
        hamed_rao_modification_test, original_test, pre_whitening_modification_test,
        trend_free_pre_whitening_modification_test, yue_wang_modification_test,
    };
    pub use super::{DEFAULT_ALPHA, DEFAULT_PERIOD};
}
