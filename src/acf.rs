//! acf — biased sample autocorrelation for the variance corrections.
//!
//! Purpose
//! -------
//! Estimate the autocorrelation function of a missing-value-free series up
//! to a requested lag, in the biased (1/n) convention the variance
//! corrections are specified against.
//!
//! Key behaviors
//! -------------
//! - Mean-center the series, accumulate lagged products, and divide every
//!   lag by the sample size (not by `n - k`).
//! - Normalize by the lag-0 autocovariance, so index 0 is exactly 1.0.
//! - If the lag-0 autocovariance is exactly zero (a constant series),
//!   return the raw autocovariances (all zeros) instead of dividing by
//!   zero — an explicit branch, not an error path.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs contain no NaN; missing values are removed upstream.
//! - The output has `min(nlags, n-1) + 1` entries: lags past `n - 1`
//!   carry no data and are truncated rather than zero-filled.
//!
//! Conventions
//! -----------
//! - Index k of the output is the lag-k autocorrelation (or raw
//!   autocovariance in the zero-variance branch).
//!
//! Downstream usage
//! ----------------
//! - The Hamed-Rao correction feeds midranks of detrended residuals
//!   through this estimator; Yue-Wang feeds the residuals themselves; the
//!   pre-whitening variants use only the lag-1 entry.
//!
//! Testing notes
//! -------------
//! - Unit tests check the lag-0 normalization, a hand-computed small
//!   series, the truncation rule, and the constant-series branch.

/// Compute the biased sample autocorrelation up to `nlags`.
///
/// Parameters
/// ----------
/// - `x`: `&[f64]`
///   Series with no missing values and length ≥ 1.
/// - `nlags`: `usize`
///   Highest lag requested; the result is truncated at lag `n - 1` when
///   the series is shorter.
///
/// Returns
/// -------
/// `Vec<f64>`
///   Autocorrelations for lags `0..=min(nlags, n-1)`; entry 0 is 1.0, or
///   0.0 when the series has zero variance (raw autocovariance branch).
pub(crate) fn acf(x: &[f64], nlags: usize) -> Vec<f64> {
    let n = x.len();
    let mean = x.iter().sum::<f64>() / n as f64;
    let centered: Vec<f64> = x.iter().map(|v| v - mean).collect();

    let kmax = nlags.min(n - 1);
    let mut acov = Vec::with_capacity(kmax + 1);
    for k in 0..=kmax {
        let lagged: f64 = centered[k..]
            .iter()
            .zip(&centered)
            .map(|(late, early): (&f64, &f64)| late * early)
            .sum();
        acov.push(lagged / n as f64);
    }

    if acov[0] != 0.0 {
        let scale = acov[0];
        acov.iter().map(|v| v / scale).collect()
    } else {
        acov
    }
}
