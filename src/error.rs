//! Error types for rating updates.
//!
//! Every error is local and recoverable: an operation that returns an error
//! has not touched the player it was called on.

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, RatingError>;

/// Everything that can go wrong while configuring or updating a player.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RatingError {
    /// An integer-coded result outside of `0` (win), `1` (loss) and `2` (draw).
    #[error("invalid result code {code}: expected 0 (win), 1 (loss) or 2 (draw)")]
    InvalidResult { code: i32 },

    /// The Glicko-2 volatility solver did not reach the convergence tolerance.
    #[error(
        "volatility solver did not converge to {tolerance} within {iterations} iterations"
    )]
    DegenerateConvergence { iterations: u32, tolerance: f64 },

    /// A configuration value that would make the rating arithmetic undefined.
    #[error("misconfigured parameter `{name}`: {value}")]
    MisconfiguredParameters { name: &'static str, value: f64 },

    /// An opponent snapshot that can't be rated against.
    #[error("invalid rating value `{name}`: {value}")]
    InvalidRating { name: &'static str, value: f64 },
}

/// Checks that `value` is finite and strictly positive.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(RatingError::MisconfiguredParameters { name, value })
    }
}

/// Checks that `value` is finite.
pub(crate) fn require_finite(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(RatingError::MisconfiguredParameters { name, value })
    }
}
