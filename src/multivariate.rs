//! multivariate — pooled multi-series, seasonal, and regional tests.
//!
//! Purpose
//! -------
//! Implement the multivariate Mann-Kendall test of Hirsch & Slack (1984),
//! which pools per-series scores and variances, together with its two
//! rebrandings: the seasonal test (seasons as columns of a reshaped flat
//! series) and the regional test of Helsel (2006) (stations as columns).
//!
//! Key behaviors
//! -------------
//! - Drop missing values WITHIN each column independently, so columns may
//!   end up with different effective lengths; pool `s`, `var_s`, and the
//!   tau denominator `Σ 0.5·n_i(n_i−1)` across columns.
//! - Decide with the continuity-corrected z on the pooled statistics.
//! - Estimate the slope with the seasonal Theil-Sen estimator, treating
//!   each column as one season (`period = column count`).
//! - The seasonal test reshapes a flat series into a season-per-column
//!   block (padding the tail with NaN) and delegates; input that is
//!   already 2-D passes through unchanged and `period` only drives the
//!   reshape.
//! - The regional test delegates at the fixed default 5% level; its
//!   `alpha` argument is validated but does not move the decision
//!   threshold.
//!
//! Invariants & assumptions
//! ------------------------
//! - Columns whose filtered length is below 2 contribute zero score,
//!   zero variance, and a zero denominator term (NaN-padded seasonal
//!   columns rely on this); only when EVERY column is degenerate does the
//!   test fail with [`MKError::InsufficientData`].
//!
//! Conventions
//! -----------
//! - A 1-D (or single-column) input behaves as a one-column pool and
//!   reproduces the original test's score statistics exactly.
//!
//! Downstream usage
//! ----------------
//! - `seasonal_test(x, 12, alpha)` is the conventional monthly call;
//!   `regional_test` is the station-matrix spelling of the same pooling.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the one-column equivalence with the original test,
//!   per-column independent dropping, the pooled decision, the
//!   seasonal/multivariate round trip, the fixed-level regional
//!   delegation, and the all-columns-degenerate failure.

use ndarray::{ArrayBase, Data, Dimension};

use crate::errors::{MKError, MKResult};
use crate::kernels::{score, variance_s};
use crate::outcome::{significance, z_score, MKOutcome};
use crate::preprocess::{drop_missing_series, preprocess, seasonal_block, Prepared};
use crate::slope::seasonal_sens_slope;
use crate::validation::{validate_alpha, validate_period};
use crate::DEFAULT_ALPHA;

/// Multivariate Mann-Kendall test (Hirsch & Slack 1984).
///
/// Parameters
/// ----------
/// - `x`: `&ArrayBase<S, D>`
///   A matrix whose columns are individual series (stations, seasons), or
///   a single series treated as a one-column pool. NaN marks missing
///   values, dropped per column.
/// - `alpha`: `f64`
///   Two-tailed significance level in (0, 1).
///
/// Returns
/// -------
/// `MKResult<MKOutcome>`
///   Pooled statistics: `s` and `var_s` are sums over columns, `tau`
///   divides the pooled score by the pooled pair count, and the slope is
///   the seasonal Theil-Sen estimate with the column count as period.
///
/// Errors
/// ------
/// - `MKError::InvalidShape` for rank > 2, `MKError::InvalidAlpha` for an
///   out-of-range level, and `MKError::InsufficientData` when every
///   column has fewer than 2 observations after filtering.
///
/// Notes
/// -----
/// - Columns are filtered independently, so observations need not align
///   across columns; use [`correlated_multivariate_test`] when
///   cross-column dependence matters.
///
/// [`correlated_multivariate_test`]: crate::correlated::correlated_multivariate_test
///
/// Examples
/// --------
/// ```rust
/// use mann_kendall::{multivariate_test, Trend};
/// use ndarray::Array2;
///
/// let x = Array2::from_shape_fn((40, 3), |(row, col)| (row + col) as f64);
/// let outcome = multivariate_test(&x, 0.05).unwrap();
///
/// assert_eq!(outcome.trend(), Trend::Increasing);
/// assert!((outcome.tau() - 1.0).abs() < 1e-12);
/// ```
pub fn multivariate_test<S, D>(x: &ArrayBase<S, D>, alpha: f64) -> MKResult<MKOutcome>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    validate_alpha(alpha)?;
    let prepared = preprocess(x)?;
    let columns = prepared.columns();

    let mut pooled_s = 0.0_f64;
    let mut pooled_var = 0.0_f64;
    let mut denominator = 0.0_f64;
    let mut richest_column = 0_usize;
    {
        let mut fold = |column: &[f64]| {
            let filtered = drop_missing_series(column);
            let n = filtered.len();
            richest_column = richest_column.max(n);
            pooled_s += score(&filtered);
            pooled_var += variance_s(&filtered);
            denominator += 0.5 * n as f64 * (n as f64 - 1.0);
        };
        match &prepared {
            Prepared::Series(series) => fold(series.as_slice()),
            Prepared::Table(table) => {
                for column in table.columns() {
                    fold(column.to_vec().as_slice());
                }
            }
        }
    }

    if denominator == 0.0 {
        return Err(MKError::InsufficientData(richest_column));
    }

    let tau = pooled_s / denominator;
    let z = z_score(pooled_s, pooled_var);
    let (p, h, trend) = significance(z, alpha);
    let fit = seasonal_sens_slope(x, columns)?;

    Ok(MKOutcome {
        trend,
        h,
        p,
        z,
        tau,
        s: pooled_s,
        var_s: pooled_var,
        slope: fit.slope,
        intercept: fit.intercept,
    })
}

/// Seasonal Mann-Kendall test (Hirsch & Slack 1984).
///
/// Parameters
/// ----------
/// - `x`: `&ArrayBase<S, D>`
///   A flat series in time order (reshaped internally into a
///   season-per-column block, NaN-padding the last cycle), or an
///   already-shaped matrix that is passed through unchanged.
/// - `period`: `usize`
///   Seasons per cycle: 12 for monthly data, 52 for weekly. Only drives
///   the reshape of flat input.
/// - `alpha`: `f64`
///   Two-tailed significance level in (0, 1).
///
/// Returns
/// -------
/// `MKResult<MKOutcome>`
///   The pooled statistics of [`multivariate_test`] over the seasonal
///   block; the slope is per full period cycle.
///
/// Examples
/// --------
/// ```rust
/// use mann_kendall::{seasonal_test, Trend};
/// use ndarray::Array1;
///
/// let x = Array1::from_iter((0..48).map(|i| i as f64));
/// let outcome = seasonal_test(&x, 12, 0.05).unwrap();
///
/// assert_eq!(outcome.trend(), Trend::Increasing);
/// assert!((outcome.slope() - 12.0).abs() < 1e-12);
/// ```
pub fn seasonal_test<S, D>(x: &ArrayBase<S, D>, period: usize, alpha: f64) -> MKResult<MKOutcome>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    validate_alpha(alpha)?;
    validate_period(period)?;
    match preprocess(x)? {
        Prepared::Series(series) => multivariate_test(&seasonal_block(&series, period), alpha),
        Prepared::Table(table) => multivariate_test(&table, alpha),
    }
}

/// Regional Mann-Kendall test (Helsel 2006).
///
/// Parameters
/// ----------
/// - `x`: `&ArrayBase<S, D>`
///   A matrix whose columns are stations/locations sharing a time axis.
/// - `alpha`: `f64`
///   Validated for range, but the delegated decision runs at the fixed
///   default 5% level.
///
/// Returns
/// -------
/// `MKResult<MKOutcome>`
///   The pooled statistics of [`multivariate_test`] over the stations.
///
/// Notes
/// -----
/// - The significance threshold is pinned to
///   [`DEFAULT_ALPHA`](crate::DEFAULT_ALPHA) regardless of `alpha`.
///
/// Examples
/// --------
/// ```rust
/// use mann_kendall::{regional_test, Trend};
/// use ndarray::Array2;
///
/// let x = Array2::from_shape_fn((30, 4), |(row, col)| row as f64 * 2.0 + col as f64);
/// let outcome = regional_test(&x, 0.05).unwrap();
///
/// assert_eq!(outcome.trend(), Trend::Increasing);
/// ```
pub fn regional_test<S, D>(x: &ArrayBase<S, D>, alpha: f64) -> MKResult<MKOutcome>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    validate_alpha(alpha)?;
    multivariate_test(x, DEFAULT_ALPHA)
}
