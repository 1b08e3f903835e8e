//! errors — shared error types for the trend-test routines.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias used by every public operation
//! in the crate, so that preprocessing, validation, and the individual
//! Mann-Kendall variants report failures through one consistent surface.
//!
//! Key behaviors
//! -------------
//! - Define [`MKResult`] and [`MKError`] as the canonical result and error
//!   types for the trend tests, the slope estimators, and their shared
//!   validation helpers.
//! - Attach human-readable `Display` messages to each variant so that
//!   diagnostics are meaningful without additional context.
//!
//! Invariants & assumptions
//! ------------------------
//! - Modules using this error type validate their inputs (shape, column
//!   counts, significance level, lag bounds, post-filter sample size) and
//!   return [`MKResult<T>`] instead of panicking.
//! - `MKError` values are small, cheap to clone, and suitable for use in
//!   both unit tests and higher-level orchestration code.
//!
//! Conventions
//! -----------
//! - Error messages are phrased in terms of domain constraints (e.g.,
//!   "alpha must lie strictly between 0 and 1") rather than low-level
//!   details.
//! - Degenerate arithmetic (a zero variance paired with a nonzero score)
//!   is NOT represented here: it propagates through IEEE-754 as an
//!   infinite or NaN statistic so that callers can detect degenerate
//!   inputs from the returned numbers themselves.
//!
//! Downstream usage
//! ----------------
//! - The test modules (`univariate`, `multivariate`, `correlated`) and the
//!   slope estimators return [`MKResult<T>`] to propagate failures cleanly
//!   to callers.
//! - Callers may match on [`MKError`] variants to implement custom
//!   recovery or reporting behavior.
//!
//! Testing notes
//! -------------
//! - Unit tests in this module verify that each [`MKError`] variant's
//!   `Display` message embeds its payload (offending value, counts, or
//!   bounds), so failures remain debuggable from logs alone.

pub type MKResult<T> = Result<T, MKError>;

/// MKError — error conditions for the Mann-Kendall test family.
///
/// Purpose
/// -------
/// Represent all validation failures that can occur when preparing data
/// for, or running, a Mann-Kendall trend test or a Theil-Sen slope
/// estimate: malformed input shapes, wrong column counts, out-of-range
/// tuning parameters, and samples too small to compare pairwise.
///
/// Variants
/// --------
/// - `InvalidShape(ndim: usize)`
///   The input array has a rank other than 1 or 2 and cannot be
///   interpreted as a series or a matrix of series.
/// - `ColumnCount { expected: usize, actual: usize }`
///   The operation requires a specific number of columns (1 for the
///   univariate tests, 2 for the partial test, `period` for the seasonal
///   slope on pre-shaped input, at least 2 for the correlated tests) and
///   the input disagrees.
/// - `InsufficientData(observations: usize)`
///   After missing-value removal, fewer than 2 aligned observations
///   remain, so no pairwise comparison is possible.
/// - `InvalidAlpha(alpha: f64)`
///   The significance level is non-finite or outside the open interval
///   (0, 1).
/// - `InvalidPeriod(period: usize)`
///   The seasonal cycle length is zero.
/// - `InvalidLag { lag: usize, observations: usize }`
///   A user-supplied autocorrelation lag reaches past the computable
///   range (`lag >= n`).
///
/// Invariants
/// ----------
/// - Each variant carries just enough information (offending value or
///   counts) to allow downstream logging and debugging without leaking
///   large data structures.
///
/// Notes
/// -----
/// - This enum implements [`std::error::Error`] and [`std::fmt::Display`]
///   so it can be used with idiomatic `?`-based error propagation.
#[derive(Debug, Clone, PartialEq)]
pub enum MKError {
    //------ Input shape errors ------
    InvalidShape(usize),
    ColumnCount { expected: usize, actual: usize },
    //------ Sample-size errors ------
    InsufficientData(usize),
    //------ Tuning-parameter errors ------
    InvalidAlpha(f64),
    InvalidPeriod(usize),
    InvalidLag { lag: usize, observations: usize },
}

impl std::error::Error for MKError {}

impl std::fmt::Display for MKError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MKError::InvalidShape(ndim) => {
                write!(f, "Input must be a 1-D series or a 2-D matrix; got a {ndim}-D array.")
            }
            MKError::ColumnCount { expected, actual } => {
                write!(f, "Expected a matrix with {expected} column(s), but found {actual}.")
            }
            MKError::InsufficientData(observations) => {
                write!(
                    f,
                    "Need at least 2 observations after removing missing values; got \
                     {observations}."
                )
            }
            MKError::InvalidAlpha(alpha) => {
                write!(f, "Invalid alpha value: {alpha}. Must lie strictly between 0 and 1.")
            }
            MKError::InvalidPeriod(period) => {
                write!(f, "Invalid period value: {period}. Must be at least 1.")
            }
            MKError::InvalidLag { lag, observations } => {
                write!(
                    f,
                    "Invalid lag value: {lag}. Must be smaller than the number of observations \
                     ({observations})."
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Basic `Display` formatting for MKError variants.
    // - Embedding of payload values (ndim, counts, alpha, period, lag) into
    //   error messages.
    //
    // They intentionally DO NOT cover:
    // - The conditions under which each variant is raised; those are
    //   exercised by the validation, preprocessing, and test modules.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that `MKError::InvalidShape` includes the offending rank in
    // its `Display` representation.
    //
    // Given
    // -----
    // - An `MKError::InvalidShape` with ndim = 3.
    //
    // Expect
    // ------
    // - `format!("{err}")` contains "3".
    fn mk_error_invalid_shape_includes_payload_in_display() {
        // Arrange
        let err = MKError::InvalidShape(3);

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains('3'), "Display message should include offending rank.\nGot: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // Verify that `MKError::ColumnCount` reports both the expected and
    // the actual column counts.
    //
    // Given
    // -----
    // - An `MKError::ColumnCount` with expected = 2 and actual = 5.
    //
    // Expect
    // ------
    // - `format!("{err}")` contains both "2" and "5".
    fn mk_error_column_count_includes_both_counts_in_display() {
        // Arrange
        let err = MKError::ColumnCount { expected: 2, actual: 5 };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(
            msg.contains('2') && msg.contains('5'),
            "Display message should include expected and actual counts.\nGot: {msg}"
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify that `MKError::InvalidAlpha` includes the offending
    // significance level in its `Display` representation.
    //
    // Given
    // -----
    // - An `MKError::InvalidAlpha` with alpha = 1.5.
    //
    // Expect
    // ------
    // - `format!("{err}")` contains "1.5".
    fn mk_error_invalid_alpha_includes_payload_in_display() {
        // Arrange
        let err = MKError::InvalidAlpha(1.5);

        // Act
        let msg = err.to_string();

        // Assert
        assert!(
            msg.contains("1.5"),
            "Display message should include offending alpha value.\nGot: {msg}"
        );
    }

    #[test]
    // Purpose
    // -------
    // Ensure that `MKError::InvalidLag` reports both the lag and the
    // sample size that bounds it.
    //
    // Given
    // -----
    // - An `MKError::InvalidLag` with lag = 40 and observations = 30.
    //
    // Expect
    // ------
    // - `format!("{err}")` contains "40" and "30".
    fn mk_error_invalid_lag_includes_lag_and_bound_in_display() {
        // Arrange
        let err = MKError::InvalidLag { lag: 40, observations: 30 };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(
            msg.contains("40") && msg.contains("30"),
            "Display message should include the lag and its bound.\nGot: {msg}"
        );
    }

    #[test]
    // Purpose
    // -------
    // Ensure that `MKError::InsufficientData` formats to a non-empty,
    // human-readable message embedding the observation count.
    //
    // Given
    // -----
    // - An `MKError::InsufficientData` with observations = 1.
    //
    // Expect
    // ------
    // - `format!("{err}")` is non-empty and contains "1".
    fn mk_error_insufficient_data_has_payload_in_display() {
        // Arrange
        let err = MKError::InsufficientData(1);

        // Act
        let msg = err.to_string();

        // Assert
        assert!(
            !msg.trim().is_empty() && msg.contains('1'),
            "Display message should embed the observation count.\nGot: {msg}"
        );
    }
}
