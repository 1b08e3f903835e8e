//! slope — Theil-Sen slope and Kendall-Theil intercept estimators.
//!
//! Purpose
//! -------
//! Estimate the magnitude of a monotonic trend as the median of all
//! pairwise rate-of-change estimates (Theil 1950, Sen 1968), with the
//! intercept of the Kendall-Theil robust line computed by Conover's
//! method, plus the seasonal pooling variant (Hipel 1994).
//!
//! Key behaviors
//! -------------
//! - Sweep all C(n,2) pairwise slopes `(x[j] - x[i])/(j - i)`; missing
//!   values propagate as NaN entries and are ignored by the median, so
//!   the series is NOT compacted before the sweep.
//! - Anchor the intercept to true elapsed time: the time term is the
//!   median of the ORIGINAL index positions of the non-missing values,
//!   not of a compacted 0..n range.
//! - Seasonal variant: pool the pairwise slopes of every season column
//!   (padding flat input with NaN to a whole number of cycles first) and
//!   divide the intercept's time term by the period, so the slope is per
//!   full cycle.
//!
//! Invariants & assumptions
//! ------------------------
//! - Fewer than two non-missing observations (overall, or in every season
//!   column) leave no pairwise slope to aggregate and fail fast with
//!   [`MKError::InsufficientData`].
//! - For pre-shaped 2-D input the column count must equal `period`; the
//!   delegating multi-series tests always arrange this.
//!
//! Conventions
//! -----------
//! - Medians of even-length samples average the two middle order
//!   statistics.
//!
//! Downstream usage
//! ----------------
//! - Every univariate test reports `sens_slope` of its original input;
//!   the pooled and correlated tests report `seasonal_sens_slope` with
//!   the column count as the period.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the clean ramp, NaN propagation into the median,
//!   the original-index anchoring of the intercept, seasonal pooling,
//!   the 2-D period mismatch guard, and the insufficient-data paths.

use ndarray::{Array2, ArrayBase, Data, Dimension};

use crate::errors::{MKError, MKResult};
use crate::preprocess::{preprocess, seasonal_block, Prepared};
use crate::validation::validate_period;

/// SensSlope — robust slope/intercept estimate of a monotonic trend.
///
/// Purpose
/// -------
/// Represent the Theil-Sen slope together with the intercept of the
/// Kendall-Theil robust line for one series (or one pooled seasonal
/// estimate).
///
/// Fields
/// ------
/// - `slope`: `f64`
///   Median of the pairwise slopes; per time step for [`sens_slope`], per
///   full cycle for [`seasonal_sens_slope`].
/// - `intercept`: `f64`
///   Conover intercept, anchored to the original time positions of the
///   non-missing observations.
///
/// Notes
/// -----
/// - Plain `Copy` value object; does not own the input data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensSlope {
    pub(crate) slope: f64,
    pub(crate) intercept: f64,
}

impl SensSlope {
    /// Theil-Sen slope estimate.
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Intercept of the Kendall-Theil robust line.
    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

/// Theil-Sen slope and Conover intercept of a single series.
///
/// Parameters
/// ----------
/// - `x`: `&ArrayBase<S, D>`
///   A 1-D series (or single-column matrix); NaN marks missing values.
///
/// Returns
/// -------
/// `MKResult<SensSlope>`
///   - `Ok` with the median pairwise slope and the Conover intercept.
///   - `Err(MKError::InvalidShape)` for rank > 2,
///     `Err(MKError::ColumnCount)` for a multi-column matrix, and
///     `Err(MKError::InsufficientData)` when fewer than two non-missing
///     observations remain.
///
/// Notes
/// -----
/// - The input is not compacted: pairwise slopes touching a missing value
///   turn NaN and drop out of the median, while surviving indices keep
///   their original spacing `j - i`.
///
/// Examples
/// --------
/// ```rust
/// use mann_kendall::sens_slope;
/// use ndarray::array;
///
/// let x = array![0.0_f64, 1.0, 2.0, 3.0];
/// let estimate = sens_slope(&x).unwrap();
///
/// assert!((estimate.slope() - 1.0).abs() < 1e-12);
/// assert!(estimate.intercept().abs() < 1e-12);
/// ```
pub fn sens_slope<S, D>(x: &ArrayBase<S, D>) -> MKResult<SensSlope>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let series = match preprocess(x)? {
        Prepared::Series(series) => series,
        Prepared::Table(table) => {
            return Err(MKError::ColumnCount { expected: 1, actual: table.ncols() });
        }
    };

    let slopes = pairwise_slopes(&series);
    slope_with_intercept(&slopes, &series, 1)
}

/// Seasonal Theil-Sen slope pooled across season columns.
///
/// Parameters
/// ----------
/// - `x`: `&ArrayBase<S, D>`
///   A flat series (reshaped internally, padding the tail with NaN) or a
///   pre-shaped matrix whose columns are the seasons of each cycle.
/// - `period`: `usize`
///   Seasons per cycle (e.g. 12 for monthly data); must be nonzero. For
///   matrix input the column count must equal `period`.
///
/// Returns
/// -------
/// `MKResult<SensSlope>`
///   - `Ok` with the median of the pooled per-season pairwise slopes
///     (units: change per full cycle) and the Conover intercept with the
///     time term divided by `period`.
///   - `Err` on invalid shape, zero period, a period/column mismatch, or
///     too few non-missing observations in every season.
///
/// Examples
/// --------
/// ```rust
/// use mann_kendall::seasonal_sens_slope;
/// use ndarray::Array1;
///
/// let x = Array1::from_iter((0..24).map(|i| i as f64));
/// let estimate = seasonal_sens_slope(&x, 12).unwrap();
///
/// // One cycle advances every value by 12.
/// assert!((estimate.slope() - 12.0).abs() < 1e-12);
/// assert!(estimate.intercept().abs() < 1e-12);
/// ```
pub fn seasonal_sens_slope<S, D>(x: &ArrayBase<S, D>, period: usize) -> MKResult<SensSlope>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    validate_period(period)?;
    let block: Array2<f64> = match preprocess(x)? {
        Prepared::Series(series) => seasonal_block(&series, period),
        Prepared::Table(table) => {
            if table.ncols() != period {
                return Err(MKError::ColumnCount { expected: period, actual: table.ncols() });
            }
            table
        }
    };

    let mut pooled: Vec<f64> = Vec::new();
    for column in block.columns() {
        pooled.extend(pairwise_slopes(&column.to_vec()));
    }

    // The intercept anchors to the caller's values and index positions,
    // not to the padded block.
    let flat: Vec<f64> = x.view().into_dyn().iter().copied().collect();
    slope_with_intercept(&pooled, &flat, period)
}

//
// ---------- Private helpers (compact docs) ----------
//

/// All pairwise slopes `(x[j] - x[i])/(j - i)` for i < j.
///
/// Parameters
/// ----------
/// - `x`: `&[f64]`
///   Series in time order; NaN entries yield NaN slopes for every pair
///   they touch.
///
/// Returns
/// -------
/// `Vec<f64>`
///   The C(n,2) pairwise slopes in sweep order.
#[inline]
pub(crate) fn pairwise_slopes(x: &[f64]) -> Vec<f64> {
    let n = x.len();
    let mut slopes = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n.saturating_sub(1) {
        for j in i + 1..n {
            slopes.push((x[j] - x[i]) / (j - i) as f64);
        }
    }
    slopes
}

/// Median of a non-empty sample (even lengths average the middle pair).
///
/// Panics
/// ------
/// - Panics on empty input; callers guard via the NaN-filtered counts.
#[inline]
fn median(mut values: Vec<f64>) -> f64 {
    values.sort_by(|a, b| a.partial_cmp(b).expect("no NaN in median input"));
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    }
}

/// Median over the finite entries only; `None` when none remain.
#[inline]
fn nanmedian(values: &[f64]) -> Option<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if finite.is_empty() {
        None
    } else {
        Some(median(finite))
    }
}

/// Combine pooled pairwise slopes with the Conover intercept.
///
/// Parameters
/// ----------
/// - `slopes`: `&[f64]`
///   Pairwise slopes, NaN entries included.
/// - `original`: `&[f64]`
///   The caller's values in row-major order, missing values included;
///   supplies both the value median and the original index positions.
/// - `period`: `usize`
///   Divisor of the intercept's time term (1 for the plain estimator).
///
/// Returns
/// -------
/// `MKResult<SensSlope>`
///   - `Err(MKError::InsufficientData)` when no finite pairwise slope
///     exists (fewer than two usable observations).
#[inline]
fn slope_with_intercept(slopes: &[f64], original: &[f64], period: usize) -> MKResult<SensSlope> {
    let (valid_values, valid_indices): (Vec<f64>, Vec<f64>) = original
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .map(|(i, v)| (*v, i as f64))
        .unzip();

    let slope = match nanmedian(slopes) {
        Some(slope) => slope,
        None => return Err(MKError::InsufficientData(valid_values.len())),
    };

    let intercept = median(valid_values) - median(valid_indices) / period as f64 * slope;
    Ok(SensSlope { slope, intercept })
}
