//! correlated — covariance-aware multi-series and partial tests.
//!
//! Purpose
//! -------
//! Implement the Mann-Kendall variants of Libiseller & Grimvall (2002)
//! that model dependence BETWEEN series: the correlated multivariate test
//! (full score covariance matrix), its seasonal spelling (Hipel 1994),
//! and the partial test that removes the influence of a conditioning
//! covariate from a two-column matrix.
//!
//! Key behaviors
//! -------------
//! - Drop rows with any missing value JOINTLY across all columns (unlike
//!   the pooled multivariate test), so every pairwise kernel sees aligned
//!   observations.
//! - Build the symmetric score covariance matrix
//!   `Γ[i,j] = (K(x_i,x_j) + 4·ΣR(x_i)R(x_j) − n(n+1)²)/3` from the joint
//!   concordance kernel and the midrank cross products; the diagonal uses
//!   the self terms.
//! - Correlated test: pooled score over columns, `var_s = ΣΓ`, and
//!   `z = s/√var_s` WITHOUT the continuity correction — a deliberate
//!   asymmetry with the univariate family that is preserved as specified
//!   by the published procedure.
//! - Partial test: `rho = Γ-entry / (n(n-1)(2n+5)/18)`, adjusted score
//!   `s = S_x − rho·S_y`, `var_s = (1 − rho²)·n(n-1)(2n+5)/18`, tau from
//!   the lead column's raw score, slope from the lead column only.
//!
//! Invariants & assumptions
//! ------------------------
//! - The correlated tests require a genuine matrix (at least 2 columns);
//!   the partial test requires exactly 2.
//! - A fully tied matrix drives both `s` and `var_s` to 0; the resulting
//!   NaN statistic decides "no trend" without significance.
//!
//! Conventions
//! -----------
//! - Column 0 of the partial test is the series under test; column 1 is
//!   the conditioning covariate.
//!
//! Downstream usage
//! ----------------
//! - `correlated_seasonal_test(x, 12, alpha)` is the monthly spelling;
//!   like the regional test, the delegated decision runs at the fixed
//!   default 5% level.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the Γ entries on a hand-checked ramp matrix, the
//!   column-count guards, the fully tied degenerate case, and a
//!   hand-built partial scenario; the integration suite pins the
//!   reference-dataset statistics.

use ndarray::{Array2, ArrayBase, Data, Dimension};

use crate::errors::{MKError, MKResult};
use crate::kernels::{joint_score, midranks, score};
use crate::outcome::{significance, MKOutcome};
use crate::preprocess::{drop_missing_rows, preprocess, seasonal_block, Prepared};
use crate::slope::{seasonal_sens_slope, sens_slope};
use crate::validation::{validate_alpha, validate_period, validate_sample_size};
use crate::DEFAULT_ALPHA;

/// Correlated multivariate Mann-Kendall test (Libiseller & Grimvall 2002).
///
/// Parameters
/// ----------
/// - `x`: `&ArrayBase<S, D>`
///   A matrix with at least 2 columns sharing a time axis; rows with any
///   missing value are dropped jointly.
/// - `alpha`: `f64`
///   Two-tailed significance level in (0, 1).
///
/// Returns
/// -------
/// `MKResult<MKOutcome>`
///   Pooled score over columns, `var_s` as the sum of the full score
///   covariance matrix, and `z = s/√var_s` (no continuity correction).
///   Slope via the seasonal Theil-Sen estimator with the column count as
///   period.
///
/// Errors
/// ------
/// - `MKError::ColumnCount` when the input has fewer than 2 columns,
///   `MKError::InsufficientData` when fewer than 2 aligned rows survive,
///   plus the shape/alpha guards shared by the family.
///
/// Examples
/// --------
/// ```rust
/// use mann_kendall::{correlated_multivariate_test, Trend};
/// use ndarray::Array2;
///
/// let x = Array2::from_shape_fn((30, 2), |(row, col)| row as f64 + 10.0 * col as f64);
/// let outcome = correlated_multivariate_test(&x, 0.05).unwrap();
///
/// assert_eq!(outcome.trend(), Trend::Increasing);
/// assert!((outcome.tau() - 1.0).abs() < 1e-12);
/// ```
pub fn correlated_multivariate_test<S, D>(x: &ArrayBase<S, D>, alpha: f64) -> MKResult<MKOutcome>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    validate_alpha(alpha)?;
    let table = match preprocess(x)? {
        Prepared::Table(table) => table,
        Prepared::Series(_) => return Err(MKError::ColumnCount { expected: 2, actual: 1 }),
    };

    let aligned = drop_missing_rows(&table);
    let n = aligned.nrows();
    validate_sample_size(n)?;
    let column_count = aligned.ncols();

    let columns: Vec<Vec<f64>> = aligned.columns().into_iter().map(|col| col.to_vec()).collect();
    let ranks: Vec<Vec<f64>> = columns.iter().map(|col| midranks(col)).collect();

    let mut pooled_s = 0.0_f64;
    let mut denominator = 0.0_f64;
    for column in &columns {
        pooled_s += score(column);
        denominator += 0.5 * n as f64 * (n as f64 - 1.0);
    }
    let tau = pooled_s / denominator;

    let mut gamma = Array2::<f64>::zeros((column_count, column_count));
    for i in 0..column_count {
        for j in 0..=i {
            let entry = covariance_entry(&columns[i], &columns[j], &ranks[i], &ranks[j], n);
            gamma[[i, j]] = entry;
            gamma[[j, i]] = entry;
        }
    }

    let var_s = gamma.sum();
    let z = pooled_s / var_s.sqrt();
    let (p, h, trend) = significance(z, alpha);
    let fit = seasonal_sens_slope(x, column_count)?;

    Ok(MKOutcome {
        trend,
        h,
        p,
        z,
        tau,
        s: pooled_s,
        var_s,
        slope: fit.slope,
        intercept: fit.intercept,
    })
}

/// Correlated seasonal Mann-Kendall test (Hipel 1994).
///
/// Parameters
/// ----------
/// - `x`: `&ArrayBase<S, D>`
///   A flat series (reshaped into a season-per-column block, NaN-padding
///   the last cycle) or an already-shaped matrix passed through
///   unchanged.
/// - `period`: `usize`
///   Seasons per cycle; only drives the reshape of flat input.
/// - `alpha`: `f64`
///   Validated for range, but the delegated decision runs at the fixed
///   default 5% level, like [`regional_test`](crate::regional_test).
///
/// Returns
/// -------
/// `MKResult<MKOutcome>`
///   The correlated multivariate statistics over the seasonal block.
///
/// Examples
/// --------
/// ```rust
/// use mann_kendall::{correlated_seasonal_test, Trend};
/// use ndarray::Array1;
///
/// let x = Array1::from_iter((0..48).map(|i| i as f64));
/// let outcome = correlated_seasonal_test(&x, 12, 0.05).unwrap();
///
/// assert_eq!(outcome.trend(), Trend::Increasing);
/// ```
pub fn correlated_seasonal_test<S, D>(
    x: &ArrayBase<S, D>, period: usize, alpha: f64,
) -> MKResult<MKOutcome>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    validate_alpha(alpha)?;
    validate_period(period)?;
    match preprocess(x)? {
        Prepared::Series(series) => {
            correlated_multivariate_test(&seasonal_block(&series, period), DEFAULT_ALPHA)
        }
        Prepared::Table(table) => correlated_multivariate_test(&table, DEFAULT_ALPHA),
    }
}

/// Partial Mann-Kendall test (Libiseller & Grimvall 2002).
///
/// Parameters
/// ----------
/// - `x`: `&ArrayBase<S, D>`
///   A matrix with EXACTLY 2 columns: column 0 is the series under test,
///   column 1 the conditioning covariate. Rows with any missing value
///   are dropped jointly.
/// - `alpha`: `f64`
///   Two-tailed significance level in (0, 1).
///
/// Returns
/// -------
/// `MKResult<MKOutcome>`
///   The conditionally adjusted statistics: `s = S_x − ρ·S_y` with ρ the
///   normalized score covariance of the two columns, `var_s = (1 − ρ²)·
///   n(n-1)(2n+5)/18`, `tau` from the lead column's raw score, and
///   `z = s/√var_s` (no continuity correction). Slope and intercept come
///   from the lead column alone (missing values included, so the time
///   axis stays anchored).
///
/// Errors
/// ------
/// - `MKError::ColumnCount { expected: 2, actual }` whenever the column
///   count differs from 2, naming the actual count; plus the shape,
///   alpha, and sample-size guards shared by the family.
///
/// Examples
/// --------
/// ```rust
/// use mann_kendall::{partial_test, Trend};
/// use ndarray::Array2;
///
/// // A trending lead series conditioned on an alternating covariate.
/// let x = Array2::from_shape_fn((40, 2), |(row, col)| {
///     if col == 0 {
///         row as f64
///     } else if row % 2 == 0 {
///         1.0
///     } else {
///         5.0
///     }
/// });
/// let outcome = partial_test(&x, 0.05).unwrap();
///
/// assert_eq!(outcome.trend(), Trend::Increasing);
/// assert!(outcome.h());
/// ```
pub fn partial_test<S, D>(x: &ArrayBase<S, D>, alpha: f64) -> MKResult<MKOutcome>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    validate_alpha(alpha)?;
    let table = match preprocess(x)? {
        Prepared::Table(table) => {
            if table.ncols() != 2 {
                return Err(MKError::ColumnCount { expected: 2, actual: table.ncols() });
            }
            table
        }
        Prepared::Series(_) => return Err(MKError::ColumnCount { expected: 2, actual: 1 }),
    };

    let aligned = drop_missing_rows(&table);
    let n = aligned.nrows();
    validate_sample_size(n)?;

    let lead = aligned.column(0).to_vec();
    let covariate = aligned.column(1).to_vec();

    let lead_score = score(&lead);
    let covariate_score = score(&covariate);
    let lead_ranks = midranks(&lead);
    let covariate_ranks = midranks(&covariate);

    let nf = n as f64;
    let score_variance = nf * (nf - 1.0) * (2.0 * nf + 5.0) / 18.0;
    let sigma = covariance_entry(&lead, &covariate, &lead_ranks, &covariate_ranks, n);
    let rho = sigma / score_variance;

    let s = lead_score - rho * covariate_score;
    let var_s = (1.0 - rho * rho) * score_variance;
    let tau = lead_score / (0.5 * nf * (nf - 1.0));

    let z = s / var_s.sqrt();
    let (p, h, trend) = significance(z, alpha);
    let fit = sens_slope(&table.column(0).to_owned())?;

    Ok(MKOutcome { trend, h, p, z, tau, s, var_s, slope: fit.slope, intercept: fit.intercept })
}

//
// ---------- Private helpers (compact docs) ----------
//

/// One entry of the score covariance matrix Γ.
///
/// Parameters
/// ----------
/// - `x`, `z`: `&[f64]`
///   Two aligned, missing-value-free columns of length `n`.
/// - `x_ranks`, `z_ranks`: `&[f64]`
///   Their midranks, precomputed once per column.
/// - `n`: `usize`
///   Aligned sample size.
///
/// Returns
/// -------
/// `f64`
///   `(K(x,z) + 4·ΣR(x)R(z) − n(n+1)²)/3`; with `x == z` this is the
///   variance self term.
#[inline]
fn covariance_entry(x: &[f64], z: &[f64], x_ranks: &[f64], z_ranks: &[f64], n: usize) -> f64 {
    let nf = n as f64;
    let rank_product: f64 = x_ranks.iter().zip(z_ranks).map(|(a, b)| a * b).sum();
    (joint_score(x, z) + 4.0 * rank_product - nf * (nf + 1.0).powi(2)) / 3.0
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
    // - The Γ machinery on a hand-checked two-ramp matrix.
    // - Column-count guards of both correlated tests and the partial test.
    // - The fully tied degenerate case (NaN statistic decides no trend).
    // - Joint row dropping ahead of the kernels.
    //
    // They intentionally DO NOT cover:
    // - Reference-dataset statistics; those live in the integration suite.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify the correlated test on two identical ramps, where every Γ
    // entry is hand-computable.
    //
    // Given
    // -----
    // - A 10×2 matrix with both columns 0..10: K = 45, ranks 1..10 with
    //   Σr² = 385, so each Γ entry is (45 + 1540 − 1210)/3 = 125.
    //
    // Expect
    // ------
    // - var_s = 4·125 = 500, s = 90, z = 90/√500, tau = 1, trend
    //   Increasing.
    fn correlated_multivariate_matches_hand_computed_gamma() {
        // Arrange
        let x = Array2::from_shape_fn((10, 2), |(row, _)| row as f64);

        // Act
        let outcome = correlated_multivariate_test(&x, 0.05).expect("ramps should test");

        // Assert
        assert_eq!(outcome.s(), 90.0);
        assert_relative_eq!(outcome.var_s(), 500.0, max_relative = 1e-12);
        assert_relative_eq!(outcome.z(), 90.0 / 500.0_f64.sqrt(), max_relative = 1e-12);
        assert_relative_eq!(outcome.tau(), 1.0);
        assert_eq!(outcome.trend(), Trend::Increasing);
        assert_relative_eq!(outcome.slope(), 1.0);
    }

    #[test]
    // Purpose
    // -------
    // Verify the fully tied degenerate case: zero score AND zero
    // variance must decide no trend through the NaN statistic, not
    // panic or mask.
    //
    // Given
    // -----
    // - A constant 20×2 matrix.
    //
    // Expect
    // ------
    // - s = 0, var_s = 0, z NaN, h false, trend NoTrend, slope 0.
    fn correlated_multivariate_fully_tied_matrix_decides_no_trend() {
        // Arrange
        let x = Array2::from_elem((20, 2), 3.0_f64);

        // Act
        let outcome = correlated_multivariate_test(&x, 0.05).expect("constant matrix should test");

        // Assert
        assert_eq!(outcome.s(), 0.0);
        assert_eq!(outcome.var_s(), 0.0);
        assert!(outcome.z().is_nan());
        assert!(!outcome.h());
        assert_eq!(outcome.trend(), Trend::NoTrend);
        assert_eq!(outcome.slope(), 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Verify the column-count guards: the correlated tests need a
    // matrix, the partial test needs exactly two columns.
    //
    // Given
    // -----
    // - A flat series and a 10×3 matrix.
    //
    // Expect
    // ------
    // - ColumnCount errors carrying the actual counts.
    fn correlated_and_partial_tests_guard_column_counts() {
        // Arrange
        let series = Array1::from_iter((0..10).map(|i| i as f64));
        let wide = Array2::<f64>::zeros((10, 3));

        // Act & Assert
        assert_eq!(
            correlated_multivariate_test(&series, 0.05).unwrap_err(),
            MKError::ColumnCount { expected: 2, actual: 1 }
        );
        assert_eq!(
            partial_test(&wide, 0.05).unwrap_err(),
            MKError::ColumnCount { expected: 2, actual: 3 }
        );
        assert_eq!(
            partial_test(&series, 0.05).unwrap_err(),
            MKError::ColumnCount { expected: 2, actual: 1 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify joint row dropping: a missing value in EITHER column
    // removes the row from every kernel.
    //
    // Given
    // -----
    // - A 5×2 matrix with one NaN in each column (different rows), so 3
    //   aligned rows remain.
    //
    // Expect
    // ------
    // - The outcome equals the test run on the 3 clean rows directly,
    //   except for the slope, which uses the original column 0.
    fn partial_test_drops_rows_jointly_before_the_kernels() {
        // Arrange
        let with_gaps =
            array![[1.0_f64, 2.0], [f64::NAN, 1.0], [3.0, f64::NAN], [4.0, 5.0], [5.0, 9.0]];
        let clean = array![[1.0_f64, 2.0], [4.0, 5.0], [5.0, 9.0]];

        // Act
        let gapped = partial_test(&with_gaps, 0.05).expect("three aligned rows remain");
        let baseline = partial_test(&clean, 0.05).expect("clean matrix should test");

        // Assert
        assert_eq!(gapped.s(), baseline.s());
        assert_eq!(gapped.var_s(), baseline.var_s());
        assert_eq!(gapped.tau(), baseline.tau());
        assert_eq!(gapped.z(), baseline.z());
    }

    #[test]
    // Purpose
    // -------
    // Verify the partial adjustment on a case where the conditioning
    // covariate is itself trending: conditioning must shrink the
    // adjusted score below the raw one.
    //
    // Given
    // -----
    // - Column 0 = 0..20 and column 1 = a noisy but mostly increasing
    //   covariate, so ρ > 0 and S_y > 0.
    //
    // Expect
    // ------
    // - 0 < s < S_x = 190, var_s < n(n-1)(2n+5)/18, tau = 1.
    fn partial_test_conditions_the_score_on_the_covariate() {
        // Arrange
        let x = Array2::from_shape_fn((20, 2), |(row, col)| {
            if col == 0 {
                row as f64
            } else {
                row as f64 + if row % 3 == 0 { 4.0 } else { -1.5 }
            }
        });
        let full_variance = 20.0 * 19.0 * 45.0 / 18.0;

        // Act
        let outcome = partial_test(&x, 0.05).expect("matrix should test");

        // Assert
        assert!(outcome.s() > 0.0 && outcome.s() < 190.0, "adjusted s = {}", outcome.s());
        assert!(outcome.var_s() < full_variance);
        assert_relative_eq!(outcome.tau(), 1.0);
        assert_abs_diff_eq!(outcome.slope(), 1.0, epsilon = 1e-12);
    }
}
