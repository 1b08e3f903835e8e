//! validation — shared argument guards for the trend-test routines.
//!
//! Purpose
//! -------
//! Centralize the run-time checks that every public operation performs on
//! its tuning parameters and on the filtered sample, so error semantics
//! stay consistent across the thirteen near-identical entry points.
//!
//! Key behaviors
//! -------------
//! - Reject significance levels outside the open interval (0, 1).
//! - Reject a zero seasonal period.
//! - Reject user-supplied autocorrelation lags that reach past the
//!   computable range of the sample.
//! - Reject samples with fewer than 2 aligned observations after
//!   missing-value removal, before any pairwise computation runs.
//!
//! Invariants & assumptions
//! ------------------------
//! - All guards are side-effect free and allocation free; failures are
//!   reported via [`MKError`] rather than panics.
//! - Shape checks (rank, column counts) live with the preprocessing and
//!   test modules that know the expected layout; this module only guards
//!   scalar parameters and sample sizes.
//!
//! Conventions
//! -----------
//! - Each guard returns `MKResult<()>` so call sites can chain them with
//!   `?` ahead of the numeric pipeline.
//!
//! Downstream usage
//! ----------------
//! - Every public test entry point calls [`validate_alpha`] first; the
//!   seasonal variants add [`validate_period`], and the autocorrelation
//!   variants add [`validate_lag`] for user-supplied lags.
//!
//! Testing notes
//! -------------
//! - Unit tests exercise both the accepting and the rejecting branch of
//!   every guard, including the boundary values (alpha of 0 and 1, period
//!   of 0 and 1, lag of n-1 and n).

use crate::errors::{MKError, MKResult};

/// Check that a significance level is usable for a two-tailed test.
///
/// Parameters
/// ----------
/// - `alpha`: `f64`
///   Significance level of the test. Must be finite and satisfy
///   `0 < alpha < 1`.
///
/// Returns
/// -------
/// `MKResult<()>`
///   - `Ok(())` when alpha lies strictly inside (0, 1).
///   - `Err(MKError::InvalidAlpha)` otherwise (including NaN and ±∞).
///
/// Notes
/// -----
/// - The bound is strict on both sides: alpha of exactly 0 or 1 would put
///   the normal quantile at ±∞ and make every decision degenerate.
pub fn validate_alpha(alpha: f64) -> MKResult<()> {
    if !alpha.is_finite() || alpha <= 0.0 || alpha >= 1.0 {
        return Err(MKError::InvalidAlpha(alpha));
    }
    Ok(())
}

/// Check that a seasonal cycle length is usable for reshaping.
///
/// Parameters
/// ----------
/// - `period`: `usize`
///   Number of seasons per cycle (12 for monthly data, 52 for weekly).
///
/// Returns
/// -------
/// `MKResult<()>`
///   - `Ok(())` when `period >= 1`.
///   - `Err(MKError::InvalidPeriod)` when `period == 0`.
pub fn validate_period(period: usize) -> MKResult<()> {
    if period == 0 {
        return Err(MKError::InvalidPeriod(period));
    }
    Ok(())
}

/// Check that a user-supplied autocorrelation lag stays in range.
///
/// Parameters
/// ----------
/// - `lag`: `usize`
///   Number of leading lags the caller wants the variance correction to
///   consider.
/// - `observations`: `usize`
///   Length of the filtered sample the autocorrelation is computed from.
///
/// Returns
/// -------
/// `MKResult<()>`
///   - `Ok(())` when `lag < observations`, so every requested lag index
///     has a computable autocorrelation.
///   - `Err(MKError::InvalidLag)` otherwise.
pub fn validate_lag(lag: usize, observations: usize) -> MKResult<()> {
    if lag >= observations {
        return Err(MKError::InvalidLag { lag, observations });
    }
    Ok(())
}

/// Check that enough aligned observations survived missing-value removal.
///
/// Parameters
/// ----------
/// - `observations`: `usize`
///   Sample size after dropping missing values (elementwise for a series,
///   row-wise for a matrix).
///
/// Returns
/// -------
/// `MKResult<()>`
///   - `Ok(())` when at least 2 observations remain, so the pairwise
///     kernels have at least one pair to compare.
///   - `Err(MKError::InsufficientData)` otherwise.
pub fn validate_sample_size(observations: usize) -> MKResult<()> {
    if observations < 2 {
        return Err(MKError::InsufficientData(observations));
    }
    Ok(())
}
