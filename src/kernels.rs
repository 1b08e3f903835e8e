//! kernels — the O(n²) pairwise comparison primitives.
//!
//! Purpose
//! -------
//! Implement the four rank kernels every test variant is assembled from:
//! the Mann-Kendall score, its tie-corrected variance, midranks, and the
//! joint concordance score across two series.
//!
//! Key behaviors
//! -------------
//! - `score`: concordant minus discordant pairs over all C(n,2) ordered
//!   pairs; ties contribute nothing.
//! - `variance_s`: the closed-form score variance, with the tie correction
//!   applied only when duplicated values exist.
//! - `midranks`: average ranks (tied values share the mean of their rank
//!   range), via the sign-sum identity rather than a sort.
//! - `joint_score`: concordant minus discordant pairs judged jointly
//!   across two equal-length series.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs contain no NaN; missing values are removed upstream.
//! - All four kernels are deliberately O(n²): the statistics are defined
//!   over every pair, and the inner sweep per outer index is the unit the
//!   compiler can vectorize.
//! - Scores are accumulated in `f64`; the magnitudes involved (≤ C(n,2))
//!   are exactly representable far beyond practical series lengths.
//!
//! Conventions
//! -----------
//! - Comparisons use exact `f64` equality for ties, matching the
//!   definition of the statistics over measured (already-quantized) data.
//!
//! Downstream usage
//! ----------------
//! - The univariate tests combine `score` and `variance_s`; the
//!   correlated family adds `midranks` and `joint_score` to assemble
//!   covariance-matrix entries; Hamed-Rao reuses `midranks` as its rank
//!   transform.
//!
//! Testing notes
//! -------------
//! - Unit tests pin hand-computed values for each kernel, the tie
//!   monotonicity of `variance_s`, the sign-flip antisymmetry of `score`
//!   under negation, and the specialization `joint_score(x, x)` counting
//!   untied pairs.

/// Mann-Kendall score: concordant minus discordant pairs.
///
/// Parameters
/// ----------
/// - `x`: `&[f64]`
///   Series with no missing values.
///
/// Returns
/// -------
/// `f64`
///   `Σ_{i<j} sign(x[j] - x[i])`; zero for constant or empty input.
///
/// Notes
/// -----
/// - Reversing a series does NOT negate the score when ties are present;
///   negating the values does. Tests assert the latter identity only.
pub(crate) fn score(x: &[f64]) -> f64 {
    let n = x.len();
    let mut s = 0.0_f64;
    for i in 0..n.saturating_sub(1) {
        let base = x[i];
        for &later in &x[i + 1..] {
            if later > base {
                s += 1.0;
            } else if later < base {
                s -= 1.0;
            }
        }
    }
    s
}

/// Tie-corrected variance of the Mann-Kendall score.
///
/// Parameters
/// ----------
/// - `x`: `&[f64]`
///   Series with no missing values, length `n`.
///
/// Returns
/// -------
/// `f64`
///   `n(n-1)(2n+5)/18` when all values are distinct, otherwise
///   `[n(n-1)(2n+5) − Σ_g t_g(t_g-1)(2t_g+5)]/18` where `t_g` is the
///   multiplicity of each distinct-value group. Never negative.
pub(crate) fn variance_s(x: &[f64]) -> f64 {
    let n = x.len() as f64;
    let base = n * (n - 1.0) * (2.0 * n + 5.0);

    let mut sorted = x.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("no NaN in filtered data"));

    let mut tie_term = 0.0_f64;
    let mut start = 0;
    while start < sorted.len() {
        let mut end = start;
        while end < sorted.len() && sorted[end] == sorted[start] {
            end += 1;
        }
        let t = (end - start) as f64;
        if t > 1.0 {
            tie_term += t * (t - 1.0) * (2.0 * t + 5.0);
        }
        start = end;
    }

    if tie_term == 0.0 {
        base / 18.0
    } else {
        (base - tie_term) / 18.0
    }
}

/// Average ranks via the sign-sum identity.
///
/// Parameters
/// ----------
/// - `x`: `&[f64]`
///   Series with no missing values, length `n`.
///
/// Returns
/// -------
/// `Vec<f64>`
///   `R[j] = (n + 1 + Σ_i sign(x[j] - x[i])) / 2` — the rank of `x[j]`
///   among all elements, with ties sharing the average rank.
pub(crate) fn midranks(x: &[f64]) -> Vec<f64> {
    let n = x.len();
    let mut ranks = Vec::with_capacity(n);
    for j in 0..n {
        let mut sign_sum = 0.0_f64;
        for i in 0..n {
            if x[j] > x[i] {
                sign_sum += 1.0;
            } else if x[j] < x[i] {
                sign_sum -= 1.0;
            }
        }
        ranks.push((n as f64 + 1.0 + sign_sum) / 2.0);
    }
    ranks
}

/// Joint concordance score across two series.
///
/// Parameters
/// ----------
/// - `x`: `&[f64]`
/// - `z`: `&[f64]`
///   Two series of equal length with no missing values.
///
/// Returns
/// -------
/// `f64`
///   `Σ_{i<j} sign((x[j] - x[i])·(z[j] - z[i]))` — pairs moving the same
///   way in both series count +1, opposite ways −1, ties in either 0.
///
/// Notes
/// -----
/// - `joint_score(x, x)` counts the untied pairs of `x` and is the
///   self-term of the covariance-matrix entries in the correlated tests.
pub(crate) fn joint_score(x: &[f64], z: &[f64]) -> f64 {
    let n = x.len();
    let mut k = 0.0_f64;
    for i in 0..n.saturating_sub(1) {
        for j in i + 1..n {
            let product = (x[j] - x[i]) * (z[j] - z[i]);
            if product > 0.0 {
                k += 1.0;
            } else if product < 0.0 {
                k -= 1.0;
            }
        }
    }
    k
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Hand-computed kernel values on short series, with and without ties.
    // - The untied closed form of `variance_s` and the strict decrease a
    //   tie introduces.
    // - Negation antisymmetry of `score` (reversal antisymmetry does NOT
    //   hold under ties and is deliberately not asserted).
    // - `joint_score(x, x)` as the untied pair count.
    //
    // They intentionally DO NOT cover:
    // - Large-sample distributional behavior; the integration suite pins
    //   full-pipeline statistics on reference data.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify the score on a strictly increasing series and on a series
    // with one tie.
    //
    // Given
    // -----
    // - [1, 2, 3] (all pairs concordant) and [1, 2, 2, 3].
    //
    // Expect
    // ------
    // - Scores 3 and 5 (the tied pair contributes 0).
    fn score_counts_concordant_minus_discordant_pairs() {
        // Arrange & Act & Assert
        assert_eq!(score(&[1.0, 2.0, 3.0]), 3.0);
        assert_eq!(score(&[1.0, 2.0, 2.0, 3.0]), 5.0);
    }

    #[test]
    // Purpose
    // -------
    // Verify the negation identity score(-x) == -score(x) on a series
    // with ties.
    //
    // Given
    // -----
    // - x = [3, 1, 4, 1, 5].
    //
    // Expect
    // ------
    // - Negating every value flips the sign of the score exactly.
    fn score_is_antisymmetric_under_negation() {
        // Arrange
        let x = [3.0_f64, 1.0, 4.0, 1.0, 5.0];
        let negated: Vec<f64> = x.iter().map(|v| -v).collect();

        // Act
        let s = score(&x);
        let s_neg = score(&negated);

        // Assert
        assert_eq!(s_neg, -s);
    }

    #[test]
    // Purpose
    // -------
    // Check the untied closed form of `variance_s` and that introducing a
    // tie strictly lowers the variance for the same n.
    //
    // Given
    // -----
    // - [1, 2, 3, 4] (untied, n = 4) and [1, 2, 2, 3] (one pair tied).
    //
    // Expect
    // ------
    // - Untied value 4·3·13/18 = 26/3; tied value (156 − 18)/18 = 23/3,
    //   strictly smaller.
    fn variance_s_applies_tie_correction_only_when_tied() {
        // Arrange
        let untied = [1.0_f64, 2.0, 3.0, 4.0];
        let tied = [1.0_f64, 2.0, 2.0, 3.0];

        // Act
        let v_untied = variance_s(&untied);
        let v_tied = variance_s(&tied);

        // Assert
        assert_relative_eq!(v_untied, 26.0 / 3.0, max_relative = 1e-12);
        assert_relative_eq!(v_tied, 23.0 / 3.0, max_relative = 1e-12);
        assert!(v_tied < v_untied, "a tie must strictly decrease the variance");
    }

    #[test]
    // Purpose
    // -------
    // Verify that `midranks` averages the ranks of tied values.
    //
    // Given
    // -----
    // - x = [10, 20, 20, 30].
    //
    // Expect
    // ------
    // - Ranks [1, 2.5, 2.5, 4].
    fn midranks_average_tied_ranks() {
        // Arrange
        let x = [10.0_f64, 20.0, 20.0, 30.0];

        // Act
        let ranks = midranks(&x);

        // Assert
        assert_eq!(ranks, vec![1.0, 2.5, 2.5, 4.0]);
    }

    #[test]
    // Purpose
    // -------
    // Verify `joint_score` against hand-computed values and its self
    // specialization.
    //
    // Given
    // -----
    // - x = [3, 1, 2] paired with itself and with its negation.
    //
    // Expect
    // ------
    // - joint_score(x, x) = 3 (all C(3,2) pairs untied);
    //   joint_score(x, -x) = -3 (every pair discordant).
    fn joint_score_self_counts_untied_pairs() {
        // Arrange
        let x = [3.0_f64, 1.0, 2.0];
        let negated: Vec<f64> = x.iter().map(|v| -v).collect();

        // Act & Assert
        assert_eq!(joint_score(&x, &x), 3.0);
        assert_eq!(joint_score(&x, &negated), -3.0);
    }
}
