//! Various constants defined or recommended by the Elo system and in Glickman's papers
//! ([Glicko](http://www.glicko.net/glicko/glicko.pdf), [Glicko-2](http://www.glicko.net/glicko/glicko2.pdf)),
//! including the defaults for every `Parameters` type in this crate.

use std::f64::consts::LN_10;

/// Rating every method starts a new player out with by default.
pub const DEFAULT_START_RATING: f64 = 1500.0;

/// Default Elo K-factor, the largest possible rating change from a single game.
pub const DEFAULT_K_FACTOR: f64 = 32.0;

/// Default Elo scale constant `D`.
/// A rating difference of `D` means the stronger player is expected to score ten times as much.
pub const DEFAULT_SCALE: f64 = 400.0;

/// Default start deviation for Glicko and Glicko-2, the deviation of a completely unrated player.
pub const DEFAULT_START_DEVIATION: f64 = 350.0;

/// Upper bound for a Glicko deviation that is widened by inactivity.
/// A player can never be more uncertain than an unrated one.
pub const MAX_DEVIATION: f64 = 350.0;

/// Default Glicko uncertainty growth constant `C`.
///
/// This is the value from the example in "Step 1." of the [Glicko paper](http://www.glicko.net/glicko/glicko.pdf):
/// a player with a deviation of 50 returns to the unrated deviation of 350 after 100 idle rating periods.
pub const DEFAULT_UNCERTAINTY_GROWTH: f64 = 34.6;

/// Glicko's `q = ln(10) / 400`, converting base-10 rating differences into natural-log odds.
pub const GLICKO_Q: f64 = LN_10 / 400.0;

/// Default start volatility as defined by "Step 1." in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf).
pub const DEFAULT_START_VOLATILITY: f64 = 0.06;

/// Default system constant.
/// This value is right in the middle of the reasonable range described by "Step 1." in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf) (`0.3` to `1.2`),
/// but it might need to be fine-tuned for your application.
pub const DEFAULT_VOLATILITY_CHANGE: f64 = 0.75;

/// Default cutoff value for the converging loop algorithm as recommended by "Step 5.1." in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf).
/// Higher values may result in slightly better performance at the cost of less accuracy.
pub const DEFAULT_CONVERGENCE_TOLERANCE: f64 = 0.000_001;

/// Constant for converting between the original Glicko scale, and the internal Glicko-2 scale.
///
/// See also "Step 2." and "Step 8." in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf).
pub const RATING_SCALING_RATIO: f64 = 173.7178;

/// The public rating that maps to `0.0` on the internal Glicko-2 scale.
pub const SCALED_RATING_ORIGIN: f64 = 1500.0;

/// The maximum number of iterations for the converging loop algorithm for "Step 5.4." in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf),
/// and for the bracket search in "Step 5.2.".
/// This is a fail-safe so we don't enter an infinite loop (even tho that shouldn't happen if the convergence tolerance is reasonable).
/// If the maximum number of iterations is exceeded, the update fails with
/// [`RatingError::DegenerateConvergence`][crate::RatingError::DegenerateConvergence].
pub const MAX_ITERATIONS: u32 = 10_000;
