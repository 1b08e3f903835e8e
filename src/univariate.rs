//! univariate — the single-series Mann-Kendall test family.
//!
//! Purpose
//! -------
//! Implement the original Mann-Kendall trend test (Mann 1945, Kendall
//! 1975) and its four serial-correlation-aware modifications: the
//! Hamed-Rao and Yue-Wang variance corrections and the two pre-whitening
//! procedures of Yue & Wang (2002).
//!
//! Key behaviors
//! -------------
//! - Shared skeleton: preprocess → drop missing values → score →
//!   tie-corrected variance → tau → variant-specific variance adjustment →
//!   standardized decision → Theil-Sen slope of the ORIGINAL input.
//! - Hamed-Rao: detrend by the Sen slope, rank-transform, keep only
//!   autocorrelations outside the ±Φ⁻¹(1−α/2)/√n band, and inflate the
//!   variance by `1 + (2/(n(n-1)(n-2)))·|Σ (n-i)(n-i-1)(n-i-2)·ρ[i]|`.
//! - Yue-Wang: detrend without ranking and inflate by
//!   `1 + 2·Σ (1 - i/n)·ρ[i]` over every leading lag (signed, no
//!   significance filter).
//! - Pre-whitening: subtract the lag-1-autocorrelation-scaled lag of the
//!   raw series and re-test the shortened series.
//! - Trend-free pre-whitening: whiten the detrended residual by its own
//!   lag-1 autocorrelation, re-add the trend component, then re-test; the
//!   reported slope is re-estimated from the original input (the
//!   detrending estimate is deliberately not reused).
//!
//! Invariants & assumptions
//! ------------------------
//! - All five tests require single-column input; matrices with more
//!   columns are rejected, not silently flattened.
//! - The slope and intercept are always estimated from the caller's
//!   original (unfiltered, unwhitened) series.
//! - A user-supplied lag is interpreted as "the first `lag` lags"; the
//!   default considers every computable lag.
//!
//! Conventions
//! -----------
//! - `s`, `var_s`, and `tau` always describe the series the decision was
//!   made on — for the pre-whitening variants that is the whitened,
//!   one-shorter series.
//!
//! Downstream usage
//! ----------------
//! - Callers needing the conventional defaults pass
//!   [`DEFAULT_ALPHA`](crate::DEFAULT_ALPHA) and `None` for the lag.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the constant-series and strict-ramp fixed points,
//!   missing-value handling, shape and lag guards. The integration suite
//!   pins every variant's statistics on the reference datasets.

use ndarray::{ArrayBase, Data, Dimension};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::acf::acf;
use crate::errors::{MKError, MKResult};
use crate::kernels::{midranks, score, variance_s};
use crate::outcome::{significance, z_score, MKOutcome};
use crate::preprocess::{drop_missing_series, preprocess, Prepared};
use crate::slope::sens_slope;
use crate::validation::{validate_alpha, validate_lag, validate_sample_size};

/// Original Mann-Kendall trend test.
///
/// Parameters
/// ----------
/// - `x`: `&ArrayBase<S, D>`
///   A 1-D series (or single-column matrix); NaN marks missing values,
///   which are skipped for the score statistics.
/// - `alpha`: `f64`
///   Two-tailed significance level in (0, 1); 0.05 by convention.
///
/// Returns
/// -------
/// `MKResult<MKOutcome>`
///   The full statistic set. `h` is true iff `|z|` exceeds the two-tailed
///   normal quantile; `trend` follows the sign of `z` when significant.
///
/// Errors
/// ------
/// - `MKError::InvalidShape` / `MKError::ColumnCount`
///   Input is not a single series.
/// - `MKError::InvalidAlpha`
///   Significance level outside (0, 1).
/// - `MKError::InsufficientData`
///   Fewer than 2 observations survive missing-value removal.
///
/// Notes
/// -----
/// - A constant series yields `s = 0`, `var_s = 0`, `z = 0`, `p = 1`, and
///   a `NoTrend` verdict; the zero-variance case is only degenerate when
///   the score is nonzero, in which case `z` becomes ±∞.
///
/// Examples
/// --------
/// ```rust
/// use mann_kendall::{original_test, Trend};
/// use ndarray::Array1;
///
/// let x = Array1::from_iter((0..100).map(|i| i as f64));
/// let outcome = original_test(&x, 0.05).unwrap();
///
/// assert_eq!(outcome.trend(), Trend::Increasing);
/// assert!(outcome.h());
/// assert!((outcome.tau() - 1.0).abs() < 1e-12);
/// ```
pub fn original_test<S, D>(x: &ArrayBase<S, D>, alpha: f64) -> MKResult<MKOutcome>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    validate_alpha(alpha)?;
    let series = univariate_series(x)?;
    let n = series.len();

    let s = score(&series);
    let var_s = variance_s(&series);
    let tau = kendall_tau(s, n);

    let z = z_score(s, var_s);
    let (p, h, trend) = significance(z, alpha);
    let fit = sens_slope(x)?;

    Ok(MKOutcome { trend, h, p, z, tau, s, var_s, slope: fit.slope, intercept: fit.intercept })
}

/// Hamed-Rao (1998) modified Mann-Kendall test.
///
/// Parameters
/// ----------
/// - `x`: `&ArrayBase<S, D>`
///   A 1-D series (or single-column matrix); NaN marks missing values.
/// - `alpha`: `f64`
///   Two-tailed significance level in (0, 1); also sets the confidence
///   band that filters significant autocorrelations.
/// - `lag`: `Option<usize>`
///   Number of leading lags to consider. `None` considers every
///   computable lag; `Some(3)` reproduces the first-3-lags variant the
///   authors also propose.
///
/// Returns
/// -------
/// `MKResult<MKOutcome>`
///   As [`original_test`], with `var_s` inflated by the Hamed-Rao factor
///   computed from the rank autocorrelations of the Sen-detrended series.
///
/// Errors
/// ------
/// - As [`original_test`], plus `MKError::InvalidLag` when a supplied lag
///   reaches past the computable range (`lag >= n`).
///
/// Examples
/// --------
/// ```rust
/// use mann_kendall::{hamed_rao_modification_test, Trend};
/// use ndarray::Array1;
///
/// let x = Array1::from_iter((0..100).map(|i| i as f64));
/// let outcome = hamed_rao_modification_test(&x, 0.05, None).unwrap();
///
/// assert_eq!(outcome.trend(), Trend::Increasing);
/// ```
pub fn hamed_rao_modification_test<S, D>(
    x: &ArrayBase<S, D>, alpha: f64, lag: Option<usize>,
) -> MKResult<MKOutcome>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    validate_alpha(alpha)?;
    let series = univariate_series(x)?;
    let n = series.len();

    let s = score(&series);
    let mut var_s = variance_s(&series);
    let tau = kendall_tau(s, n);
    let max_lag = resolve_lag(lag, n)?;

    let fit = sens_slope(x)?;
    let detrended = detrend(&series, fit.slope);
    let ranks = midranks(&detrended);
    let rho = acf(&ranks, max_lag - 1);

    let normal = Normal::new(0.0, 1.0).expect("standard normal parameters");
    let interval = normal.inverse_cdf(1.0 - alpha / 2.0) / (n as f64).sqrt();

    let mut weighted = 0.0_f64;
    for i in 1..max_lag {
        if rho[i] < -interval || rho[i] > interval {
            let remaining = (n - i) as f64;
            weighted += remaining * (remaining - 1.0) * (remaining - 2.0) * rho[i];
        }
    }

    let nf = n as f64;
    var_s *= 1.0 + (2.0 / (nf * (nf - 1.0) * (nf - 2.0))) * weighted.abs();

    let z = z_score(s, var_s);
    let (p, h, trend) = significance(z, alpha);

    Ok(MKOutcome { trend, h, p, z, tau, s, var_s, slope: fit.slope, intercept: fit.intercept })
}

/// Yue-Wang (2004) variance-corrected Mann-Kendall test.
///
/// Parameters
/// ----------
/// - `x`: `&ArrayBase<S, D>`
///   A 1-D series (or single-column matrix); NaN marks missing values.
/// - `alpha`: `f64`
///   Two-tailed significance level in (0, 1).
/// - `lag`: `Option<usize>`
///   Number of leading lags in the correction sum; `None` considers every
///   computable lag, `Some(1)` reproduces the lag-1 variant the authors
///   also propose.
///
/// Returns
/// -------
/// `MKResult<MKOutcome>`
///   As [`original_test`], with `var_s` scaled by `1 + 2·Σ (1 − i/n)·ρ[i]`
///   over the autocorrelations of the Sen-detrended series — a signed sum
///   over every considered lag, with no significance filter.
///
/// Errors
/// ------
/// - As [`hamed_rao_modification_test`].
///
/// Examples
/// --------
/// ```rust
/// use mann_kendall::{yue_wang_modification_test, Trend};
/// use ndarray::Array1;
///
/// let x = Array1::from_iter((0..100).map(|i| i as f64));
/// let outcome = yue_wang_modification_test(&x, 0.05, Some(1)).unwrap();
///
/// assert_eq!(outcome.trend(), Trend::Increasing);
/// ```
pub fn yue_wang_modification_test<S, D>(
    x: &ArrayBase<S, D>, alpha: f64, lag: Option<usize>,
) -> MKResult<MKOutcome>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    validate_alpha(alpha)?;
    let series = univariate_series(x)?;
    let n = series.len();

    let s = score(&series);
    let mut var_s = variance_s(&series);
    let tau = kendall_tau(s, n);
    let max_lag = resolve_lag(lag, n)?;

    let fit = sens_slope(x)?;
    let detrended = detrend(&series, fit.slope);
    let rho = acf(&detrended, max_lag - 1);

    let nf = n as f64;
    let mut weighted = 0.0_f64;
    for i in 1..max_lag {
        weighted += (1.0 - i as f64 / nf) * rho[i];
    }
    var_s *= 1.0 + 2.0 * weighted;

    let z = z_score(s, var_s);
    let (p, h, trend) = significance(z, alpha);

    Ok(MKOutcome { trend, h, p, z, tau, s, var_s, slope: fit.slope, intercept: fit.intercept })
}

/// Pre-whitening Mann-Kendall test (Yue & Wang 2002).
///
/// Parameters
/// ----------
/// - `x`: `&ArrayBase<S, D>`
///   A 1-D series (or single-column matrix); NaN marks missing values.
/// - `alpha`: `f64`
///   Two-tailed significance level in (0, 1).
///
/// Returns
/// -------
/// `MKResult<MKOutcome>`
///   Score statistics of the whitened series
///   `x[1:] − ρ₁·x[:-1]` (one observation shorter than the filtered
///   input); slope and intercept of the ORIGINAL series.
///
/// Errors
/// ------
/// - As [`original_test`].
///
/// Examples
/// --------
/// ```rust
/// use mann_kendall::{pre_whitening_modification_test, Trend};
/// use ndarray::Array1;
///
/// let x = Array1::from_iter((0..100).map(|i| i as f64));
/// let outcome = pre_whitening_modification_test(&x, 0.05).unwrap();
///
/// assert_eq!(outcome.trend(), Trend::Increasing);
/// ```
pub fn pre_whitening_modification_test<S, D>(x: &ArrayBase<S, D>, alpha: f64) -> MKResult<MKOutcome>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    validate_alpha(alpha)?;
    let series = univariate_series(x)?;

    let lag_one = acf(&series, 1)[1];
    let whitened = whiten(&series, lag_one);
    let n = whitened.len();

    let s = score(&whitened);
    let var_s = variance_s(&whitened);
    let tau = kendall_tau(s, n);

    let z = z_score(s, var_s);
    let (p, h, trend) = significance(z, alpha);
    let fit = sens_slope(x)?;

    Ok(MKOutcome { trend, h, p, z, tau, s, var_s, slope: fit.slope, intercept: fit.intercept })
}

/// Trend-free pre-whitening Mann-Kendall test (Yue & Wang 2002).
///
/// Parameters
/// ----------
/// - `x`: `&ArrayBase<S, D>`
///   A 1-D series (or single-column matrix); NaN marks missing values.
/// - `alpha`: `f64`
///   Two-tailed significance level in (0, 1).
///
/// Returns
/// -------
/// `MKResult<MKOutcome>`
///   Score statistics of the whitened-then-retrended series: the Sen
///   trend is removed, the residual is whitened by its own lag-1
///   autocorrelation, and the trend component `(i+1)·slope` is added
///   back before scoring. Slope and intercept are re-estimated from the
///   original series after whitening; both estimates come from the same
///   input and agree.
///
/// Errors
/// ------
/// - As [`original_test`].
///
/// Examples
/// --------
/// ```rust
/// use mann_kendall::{trend_free_pre_whitening_modification_test, Trend};
/// use ndarray::Array1;
///
/// let x = Array1::from_iter((0..100).map(|i| i as f64));
/// let outcome = trend_free_pre_whitening_modification_test(&x, 0.05).unwrap();
///
/// assert_eq!(outcome.trend(), Trend::Increasing);
/// assert!((outcome.tau() - 1.0).abs() < 1e-12);
/// ```
pub fn trend_free_pre_whitening_modification_test<S, D>(
    x: &ArrayBase<S, D>, alpha: f64,
) -> MKResult<MKOutcome>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    validate_alpha(alpha)?;
    let series = univariate_series(x)?;

    let detrend_fit = sens_slope(x)?;
    let detrended = detrend(&series, detrend_fit.slope);

    let lag_one = acf(&detrended, 1)[1];
    let whitened = whiten(&detrended, lag_one);
    let blended: Vec<f64> = whitened
        .iter()
        .enumerate()
        .map(|(i, residual)| residual + (i + 1) as f64 * detrend_fit.slope)
        .collect();
    let n = blended.len();

    let s = score(&blended);
    let var_s = variance_s(&blended);
    let tau = kendall_tau(s, n);

    let z = z_score(s, var_s);
    let (p, h, trend) = significance(z, alpha);
    let fit = sens_slope(x)?;

    Ok(MKOutcome { trend, h, p, z, tau, s, var_s, slope: fit.slope, intercept: fit.intercept })
}

//
// ---------- Private helpers (compact docs) ----------
//

/// Preprocess a univariate input and drop missing values.
///
/// Returns
/// -------
/// `MKResult<Vec<f64>>`
///   The filtered series with at least 2 observations, or the shape /
///   sample-size error that rules it out.
#[inline]
fn univariate_series<S, D>(x: &ArrayBase<S, D>) -> MKResult<Vec<f64>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    match preprocess(x)? {
        Prepared::Series(series) => {
            let filtered = drop_missing_series(&series);
            validate_sample_size(filtered.len())?;
            Ok(filtered)
        }
        Prepared::Table(table) => {
            Err(MKError::ColumnCount { expected: 1, actual: table.ncols() })
        }
    }
}

/// Kendall's tau: the score normalized by the pair count.
#[inline]
fn kendall_tau(s: f64, n: usize) -> f64 {
    s / (0.5 * n as f64 * (n as f64 - 1.0))
}

/// Resolve the user lag into the exclusive loop bound.
///
/// Notes
/// -----
/// - `None` means every computable lag (bound = n); `Some(lag)` means the
///   first `lag` lags (bound = lag + 1), with `lag < n` enforced.
#[inline]
fn resolve_lag(lag: Option<usize>, n: usize) -> MKResult<usize> {
    match lag {
        None => Ok(n),
        Some(user_lag) => {
            validate_lag(user_lag, n)?;
            Ok(user_lag + 1)
        }
    }
}

/// Subtract the Sen trend `(i+1)·slope` from each observation.
#[inline]
fn detrend(series: &[f64], slope: f64) -> Vec<f64> {
    series.iter().enumerate().map(|(i, v)| v - (i + 1) as f64 * slope).collect()
}

/// Remove lag-1 serial correlation: `x[i+1] − ρ₁·x[i]`.
#[inline]
fn whiten(series: &[f64], lag_one: f64) -> Vec<f64> {
    series.windows(2).map(|pair| pair[1] - pair[0] * lag_one).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Trend;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use ndarray::{array, Array1, Array2};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Constant-series and strict-ramp fixed points of the original test.
    // - Missing-value handling on the original test.
    // - Shape, alpha, and lag guards shared by the family.
    // - Ramp behavior of the corrected variants (the autocorrelation
    //   machinery degenerates cleanly on an exact trend).
    //
    // They intentionally DO NOT cover:
    // - Reference-dataset statistics for the corrections; those are pinned
    //   by the integration suite.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify the constant-series fixed point: no evidence of trend and
    // fully degenerate (but well-defined) statistics.
    //
    // Given
    // -----
    // - A constant series of length 360.
    //
    // Expect
    // ------
    // - trend NoTrend, h false, p = 1, z = 0, tau = 0, s = 0, var_s = 0,
    //   slope = 0.
    fn original_test_constant_series_reports_no_trend() {
        // Arrange
        let x = Array1::from_elem(360, 9.0_f64);

        // Act
        let outcome = original_test(&x, 0.05).expect("constant series should test");

        // Assert
        assert_eq!(outcome.trend(), Trend::NoTrend);
        assert!(!outcome.h());
        assert_abs_diff_eq!(outcome.p(), 1.0, epsilon = 1e-12);
        assert_eq!(outcome.z(), 0.0);
        assert_eq!(outcome.tau(), 0.0);
        assert_eq!(outcome.s(), 0.0);
        assert_eq!(outcome.var_s(), 0.0);
        assert_eq!(outcome.slope(), 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Verify the strict-ramp fixed point: perfect concordance.
    //
    // Given
    // -----
    // - x[i] = i for i in 0..20.
    //
    // Expect
    // ------
    // - tau = 1, s = C(20,2) = 190, trend Increasing with h, slope 1 and
    //   intercept 0.
    fn original_test_strict_ramp_has_unit_tau_and_slope() {
        // Arrange
        let x = Array1::from_iter((0..20).map(|i| i as f64));

        // Act
        let outcome = original_test(&x, 0.05).expect("ramp should test");

        // Assert
        assert_eq!(outcome.trend(), Trend::Increasing);
        assert!(outcome.h());
        assert_relative_eq!(outcome.tau(), 1.0);
        assert_eq!(outcome.s(), 190.0);
        assert_relative_eq!(outcome.slope(), 1.0);
        assert_abs_diff_eq!(outcome.intercept(), 0.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Verify that missing values are skipped for the score but keep their
    // original index spacing for the slope.
    //
    // Given
    // -----
    // - x = [1, 2, 3, NaN, 5, 6]: five observations, strictly increasing.
    //
    // Expect
    // ------
    // - s = C(5,2) = 10 and slope exactly 1 (the gap spans 2 index
    //   steps and 2 value units).
    fn original_test_skips_missing_values_but_keeps_time_spacing() {
        // Arrange
        let x = array![1.0_f64, 2.0, 3.0, f64::NAN, 5.0, 6.0];

        // Act
        let outcome = original_test(&x, 0.05).expect("five observations remain");

        // Assert
        assert_eq!(outcome.s(), 10.0);
        assert_relative_eq!(outcome.slope(), 1.0);
        assert_eq!(outcome.trend(), Trend::Increasing);
    }

    #[test]
    // Purpose
    // -------
    // Verify the family's shared guards: multi-column input, bad alpha,
    // out-of-range lag, and too little data.
    //
    // Given
    // -----
    // - A 10×2 matrix, alpha = 1.2, lag = 50 on a 10-point series, and a
    //   2-point series shrunk to 1 by a missing value.
    //
    // Expect
    // ------
    // - ColumnCount, InvalidAlpha, InvalidLag, and InsufficientData
    //   respectively.
    fn univariate_family_rejects_invalid_inputs() {
        // Arrange
        let matrix = Array2::<f64>::zeros((10, 2));
        let series = Array1::from_iter((0..10).map(|i| i as f64));
        let short = array![1.0_f64, f64::NAN];

        // Act & Assert
        assert_eq!(
            original_test(&matrix, 0.05).unwrap_err(),
            MKError::ColumnCount { expected: 1, actual: 2 }
        );
        assert_eq!(original_test(&series, 1.2).unwrap_err(), MKError::InvalidAlpha(1.2));
        assert_eq!(
            hamed_rao_modification_test(&series, 0.05, Some(50)).unwrap_err(),
            MKError::InvalidLag { lag: 50, observations: 10 }
        );
        assert_eq!(original_test(&short, 0.05).unwrap_err(), MKError::InsufficientData(1));
    }

    #[test]
    // Purpose
    // -------
    // Verify that every corrected variant agrees with the original on an
    // exact ramp: detrending leaves a constant residual, so the
    // autocorrelation machinery must degenerate to no correction.
    //
    // Given
    // -----
    // - x[i] = i for i in 0..40 at alpha = 0.05.
    //
    // Expect
    // ------
    // - Hamed-Rao and Yue-Wang report the original's var_s unchanged;
    //   both pre-whitening variants still find the increasing trend.
    fn corrected_variants_degenerate_cleanly_on_exact_ramp() {
        // Arrange
        let x = Array1::from_iter((0..40).map(|i| i as f64));
        let baseline = original_test(&x, 0.05).expect("ramp should test");

        // Act
        let hamed_rao = hamed_rao_modification_test(&x, 0.05, None).expect("should test");
        let yue_wang = yue_wang_modification_test(&x, 0.05, None).expect("should test");
        let whitened = pre_whitening_modification_test(&x, 0.05).expect("should test");
        let trend_free = trend_free_pre_whitening_modification_test(&x, 0.05).expect("should test");

        // Assert
        assert_relative_eq!(hamed_rao.var_s(), baseline.var_s(), max_relative = 1e-12);
        assert_relative_eq!(yue_wang.var_s(), baseline.var_s(), max_relative = 1e-12);
        assert_eq!(hamed_rao.trend(), Trend::Increasing);
        assert_eq!(yue_wang.trend(), Trend::Increasing);
        assert_eq!(whitened.trend(), Trend::Increasing);
        assert_eq!(trend_free.trend(), Trend::Increasing);
        assert_relative_eq!(trend_free.tau(), 1.0);
    }
}
