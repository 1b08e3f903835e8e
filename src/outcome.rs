//! outcome — test result types and the standardized decision step.
//!
//! Purpose
//! -------
//! Define the single result shape shared by all thirteen public
//! operations, the trend verdict enum, and the z-score / two-tailed
//! p-value machinery that turns a score/variance pair into a decision.
//!
//! Key behaviors
//! -------------
//! - [`MKOutcome`] carries the full statistic set (trend, h, p, z, tau,
//!   s, var_s, slope, intercept) with one accessor per field, so the
//!   thirteen near-identical call sites cannot mix up field order.
//! - [`z_score`] applies the continuity correction: `(s ∓ 1)/√var_s` for
//!   nonzero scores, exactly 0 for a zero score (explicit sentinel branch,
//!   not an error path).
//! - [`significance`] computes `p = 2·(1 − Φ(|z|))`, decides
//!   `h = |z| > Φ⁻¹(1 − α/2)`, and derives the verdict from the sign of z.
//!
//! Invariants & assumptions
//! ------------------------
//! - `h == true` iff `|z|` exceeds the two-tailed quantile; the verdict is
//!   `Increasing`/`Decreasing` only when `h` holds and matches `sign(z)`.
//! - A zero variance paired with a nonzero score divides to ±∞ by IEEE
//!   rules and is surfaced as such; a NaN z (possible in the variants
//!   without continuity correction) decides `h = false`, `NoTrend`.
//!
//! Conventions
//! -----------
//! - `MKOutcome` is a plain `Copy` value object; it does not own or
//!   reference the input data.
//!
//! Downstream usage
//! ----------------
//! - Test modules construct `MKOutcome` with named-field literals and
//!   return it by value; callers read fields through the accessors.
//!
//! Testing notes
//! -------------
//! - Unit tests cover all three z-score branches, the p = 1 / no-trend
//!   decision at z = 0, both significant verdicts, the strictness of the
//!   threshold comparison, and the NaN decision path.

use statrs::distribution::{ContinuousCDF, Normal};

/// Trend — direction verdict of a Mann-Kendall test.
///
/// Variants
/// --------
/// - `Increasing`: significant positive trend (`z > 0` and `h`).
/// - `Decreasing`: significant negative trend (`z < 0` and `h`).
/// - `NoTrend`: no significant monotonic trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Increasing,
    Decreasing,
    NoTrend,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Increasing => write!(f, "increasing"),
            Trend::Decreasing => write!(f, "decreasing"),
            Trend::NoTrend => write!(f, "no trend"),
        }
    }
}

/// MKOutcome — outcome of a Mann-Kendall family trend test.
///
/// Purpose
/// -------
/// Represent the complete outcome of one trend test: the verdict, the
/// decision inputs (p-value, standardized statistic, significance flag),
/// the underlying score statistics, and the robust slope estimate.
///
/// Fields
/// ------
/// - `trend`: [`Trend`]
///   Direction verdict, consistent with `sign(z)` and `h`.
/// - `h`: `bool`
///   True iff the trend is significant at the requested level.
/// - `p`: `f64`
///   Two-tailed p-value in [0, 1].
/// - `z`: `f64`
///   Standardized test statistic (±∞ or NaN for degenerate variance).
/// - `tau`: `f64`
///   Normalized score `s / (0.5·n·(n-1))` in [-1, 1].
/// - `s`: `f64`
///   Mann-Kendall score (pooled across columns for the multi-series
///   tests; the adjusted score for the partial test).
/// - `var_s`: `f64`
///   Variance of the score after the variant's correction; nonnegative.
/// - `slope`: `f64`
///   Theil-Sen slope (per season-cycle for the seasonal variants).
/// - `intercept`: `f64`
///   Intercept of the Kendall-Theil robust line (Conover's method).
///
/// Invariants
/// ----------
/// - `h == true` iff `|z| > Φ⁻¹(1 − α/2)` for the alpha the test ran at.
/// - `trend` is `Increasing` iff `z > 0 ∧ h` and `Decreasing` iff
///   `z < 0 ∧ h`.
///
/// Performance
/// -----------
/// - Nine scalars with `Copy`; cheap to pass by value everywhere.
///
/// Notes
/// -----
/// - Every test variant returns this same shape; variants that do not
///   refine a field (e.g. tau under pre-whitening on the shortened
///   series) document the interpretation on the function itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MKOutcome {
    pub(crate) trend: Trend,
    pub(crate) h: bool,
    pub(crate) p: f64,
    pub(crate) z: f64,
    pub(crate) tau: f64,
    pub(crate) s: f64,
    pub(crate) var_s: f64,
    pub(crate) slope: f64,
    pub(crate) intercept: f64,
}

impl MKOutcome {
    /// Direction verdict of the test.
    pub fn trend(&self) -> Trend {
        self.trend
    }

    /// Whether the trend is significant at the requested level.
    pub fn h(&self) -> bool {
        self.h
    }

    /// Two-tailed p-value.
    pub fn p(&self) -> f64 {
        self.p
    }

    /// Standardized test statistic.
    pub fn z(&self) -> f64 {
        self.z
    }

    /// Kendall's tau, the normalized score.
    pub fn tau(&self) -> f64 {
        self.tau
    }

    /// Mann-Kendall score.
    pub fn s(&self) -> f64 {
        self.s
    }

    /// Variance of the score after corrections.
    pub fn var_s(&self) -> f64 {
        self.var_s
    }

    /// Theil-Sen slope estimate.
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Intercept of the Kendall-Theil robust line.
    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

/// Standardize a score/variance pair with the continuity correction.
///
/// Parameters
/// ----------
/// - `s`: `f64`
///   Mann-Kendall score.
/// - `var_s`: `f64`
///   Variance of the score; nonnegative.
///
/// Returns
/// -------
/// `f64`
///   `(s - 1)/√var_s` for positive s, `(s + 1)/√var_s` for negative s,
///   exactly 0.0 for a zero score. A zero variance with nonzero score
///   divides to ±∞ and is deliberately not masked.
pub(crate) fn z_score(s: f64, var_s: f64) -> f64 {
    if s > 0.0 {
        (s - 1.0) / var_s.sqrt()
    } else if s < 0.0 {
        (s + 1.0) / var_s.sqrt()
    } else {
        0.0
    }
}

/// Two-tailed p-value, significance flag, and verdict for a z statistic.
///
/// Parameters
/// ----------
/// - `z`: `f64`
///   Standardized statistic; may be ±∞ or NaN for degenerate inputs.
/// - `alpha`: `f64`
///   Significance level in (0, 1), validated upstream.
///
/// Returns
/// -------
/// `(f64, bool, Trend)`
///   The p-value `2·(1 − Φ(|z|))`, the flag `|z| > Φ⁻¹(1 − α/2)`, and the
///   sign-consistent verdict. A NaN z fails every comparison and decides
///   `(NaN, false, NoTrend)`.
pub(crate) fn significance(z: f64, alpha: f64) -> (f64, bool, Trend) {
    let normal = Normal::new(0.0, 1.0).expect("standard normal parameters");
    let p = 2.0 * (1.0 - normal.cdf(z.abs()));
    let h = z.abs() > normal.inverse_cdf(1.0 - alpha / 2.0);

    let trend = if z < 0.0 && h {
        Trend::Decreasing
    } else if z > 0.0 && h {
        Trend::Increasing
    } else {
        Trend::NoTrend
    };

    (p, h, trend)
}
