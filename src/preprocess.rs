//! preprocess — input coercion, missing-value removal, seasonal reshaping.
//!
//! Purpose
//! -------
//! Normalize caller-supplied arrays into the two internal layouts the test
//! family operates on (a flat series or a rows-by-columns table), drop
//! missing values under the `skip` policy, and build the season-per-column
//! blocks used by the seasonal variants.
//!
//! Key behaviors
//! -------------
//! - Accept any `ndarray` array or view of rank 1 or 2; reject other ranks
//!   before any computation.
//! - Collapse a 2-D input with exactly one column to a flat series, so the
//!   univariate tests treat `n×1` matrices and vectors identically.
//! - Drop missing values elementwise for a series and row-wise for a
//!   table, keeping multi-series observations aligned.
//! - Pad a flat series with NaN up to a multiple of `period` and reshape
//!   it row-major so each column collects one season across cycles.
//!
//! Invariants & assumptions
//! ------------------------
//! - The missing-value marker is `f64::NAN`; infinities are data.
//! - Caller-owned data is never mutated: every coercion copies into owned
//!   storage first.
//! - Reshaping is row-major, so consecutive input values fill one cycle
//!   across all seasons before the next cycle starts.
//!
//! Conventions
//! -----------
//! - `Prepared::Series` always means "one column"; test modules that need
//!   a genuine matrix match on `Prepared::Table` and reject the rest.
//!
//! Downstream usage
//! ----------------
//! - Every public entry point starts with [`preprocess`] and then applies
//!   the missing-value helper that matches its alignment requirement
//!   (per-column for the pooled multivariate test, joint rows for the
//!   correlated and partial tests).
//!
//! Testing notes
//! -------------
//! - Unit tests cover rank acceptance/rejection, single-column collapse,
//!   both dropping policies, and the padded reshape layout.

use ndarray::{Array2, ArrayBase, Data, Dimension, Ix2};

use crate::errors::{MKError, MKResult};

/// Prepared — a caller input coerced into one of the two internal layouts.
///
/// Purpose
/// -------
/// Carry the owned, copied form of a validated input: either a flat series
/// (rank-1 input, or rank-2 input with a single column) or a table whose
/// columns are individual series sharing a time axis.
///
/// Variants
/// --------
/// - `Series(Vec<f64>)`
///   One series in time order, missing values still present.
/// - `Table(Array2<f64>)`
///   Two or more series; rows are time steps, columns are series.
///
/// Notes
/// -----
/// - The variant records how many conceptual columns the input had, which
///   the pooled tests use as the season count for the slope estimate.
#[derive(Debug, Clone)]
pub(crate) enum Prepared {
    Series(Vec<f64>),
    Table(Array2<f64>),
}

impl Prepared {
    /// Number of conceptual columns (1 for a series).
    pub(crate) fn columns(&self) -> usize {
        match self {
            Prepared::Series(_) => 1,
            Prepared::Table(table) => table.ncols(),
        }
    }
}

/// Coerce an input array into a [`Prepared`] layout.
///
/// Parameters
/// ----------
/// - `x`: `&ArrayBase<S, D>`
///   Any `ndarray` array or view of `f64` with rank 1 or 2. The data is
///   copied; the caller's array is left untouched.
///
/// Returns
/// -------
/// `MKResult<Prepared>`
///   - `Ok(Prepared::Series)` for rank-1 input and for rank-2 input with
///     exactly one column.
///   - `Ok(Prepared::Table)` for rank-2 input with two or more columns.
///   - `Err(MKError::InvalidShape)` for any other rank.
///
/// Notes
/// -----
/// - Iteration is in logical row-major order, so transposed or otherwise
///   strided views coerce to the layout their shape describes.
pub(crate) fn preprocess<S, D>(x: &ArrayBase<S, D>) -> MKResult<Prepared>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let view = x.view().into_dyn();
    match view.ndim() {
        1 => Ok(Prepared::Series(view.iter().copied().collect())),
        2 => {
            let table = view.into_dimensionality::<Ix2>().expect("rank checked above").to_owned();
            if table.ncols() == 1 {
                Ok(Prepared::Series(table.iter().copied().collect()))
            } else {
                Ok(Prepared::Table(table))
            }
        }
        ndim => Err(MKError::InvalidShape(ndim)),
    }
}

/// Drop missing values from a series (`skip` policy).
///
/// Parameters
/// ----------
/// - `x`: `&[f64]`
///   Series in time order; NaN marks a missing value.
///
/// Returns
/// -------
/// `Vec<f64>`
///   The non-missing values in their original order; its length is the
///   effective sample size `n`.
pub(crate) fn drop_missing_series(x: &[f64]) -> Vec<f64> {
    x.iter().copied().filter(|v| !v.is_nan()).collect()
}

/// Drop whole rows containing any missing value (`skip` policy, joint).
///
/// Parameters
/// ----------
/// - `x`: `&Array2<f64>`
///   Table whose rows are time steps. A row with NaN in ANY column is
///   removed entirely, keeping the remaining observations aligned across
///   columns.
///
/// Returns
/// -------
/// `Array2<f64>`
///   The surviving rows in their original order, same column count.
pub(crate) fn drop_missing_rows(x: &Array2<f64>) -> Array2<f64> {
    let cols = x.ncols();
    let mut kept: Vec<f64> = Vec::with_capacity(x.len());
    let mut rows = 0;
    for row in x.rows() {
        if row.iter().all(|v| !v.is_nan()) {
            kept.extend(row.iter().copied());
            rows += 1;
        }
    }
    Array2::from_shape_vec((rows, cols), kept).expect("buffer length matches shape")
}

/// Reshape a flat series into a season-per-column block.
///
/// Parameters
/// ----------
/// - `x`: `&[f64]`
///   Flat series in time order.
/// - `period`: `usize`
///   Seasons per cycle; must be nonzero (guarded by callers).
///
/// Returns
/// -------
/// `Array2<f64>`
///   A `(len/period) × period` table, after padding the tail with NaN so
///   the length divides evenly. Column `i` holds season `i` of every
///   cycle.
pub(crate) fn seasonal_block(x: &[f64], period: usize) -> Array2<f64> {
    let mut padded = x.to_vec();
    let remainder = padded.len() % period;
    if remainder != 0 {
        padded.resize(padded.len() + (period - remainder), f64::NAN);
    }
    let cycles = padded.len() / period;
    Array2::from_shape_vec((cycles, period), padded).expect("buffer length matches shape")
}
