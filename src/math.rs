//! Pure formulas shared by the rating methods.
//!
//! Glicko and Glicko-2 use the same g-factor and expectation curves,
//! Glicko just measures them in base-10 rating points.
//! Multiplying Glicko values by [`GLICKO_Q`][crate::constants::GLICKO_Q] moves them onto the natural-log scale these functions work on.

use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Elo's `10^(rating / scale)`.
#[must_use]
pub fn transform(rating: f64, scale: f64) -> f64 {
    f64::powf(10.0, rating / scale)
}

/// Expected Elo score of a player with `rating` against `opponent_rating`.
///
/// This equals `transform(rating) / (transform(rating) + transform(opponent_rating))`,
/// but only exponentiates the rating difference so large ratings can't overflow.
#[must_use]
pub fn elo_expectation(rating: f64, opponent_rating: f64, scale: f64) -> f64 {
    1.0 / (1.0 + f64::powf(10.0, (opponent_rating - rating) / scale))
}

/// The g-factor for an opponent with `deviation` (on the natural-log scale).
/// Uncertain opponents get a factor closer to 0 and carry less weight.
#[must_use]
pub fn g(deviation: f64) -> f64 {
    1.0 / f64::sqrt(1.0 + 3.0 * deviation * deviation / (PI * PI))
}

/// Expected score against an opponent with g-factor `g` (on the natural-log scale).
#[must_use]
pub fn expectation(g: f64, rating: f64, opponent_rating: f64) -> f64 {
    1.0 / (1.0 + f64::exp(-g * (rating - opponent_rating)))
}

/// How much information a single game carries: `g² · E · (1 - E)`.
#[must_use]
pub fn impact(g: f64, e: f64) -> f64 {
    g * g * e * (1.0 - e)
}

/// How far a single game pulls the rating: `g · (S - E)`.
#[must_use]
pub fn adjustment(g: f64, e: f64, score: f64) -> f64 {
    g * (score - e)
}

/// Running sums over every game of a rating period.
#[derive(Clone, Copy, PartialEq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PeriodTotals {
    impact: f64,
    adjustment: f64,
    games: usize,
}

impl PeriodTotals {
    /// Adds one game with frozen `g`, `e` and realised `score`.
    pub fn add(&mut self, g: f64, e: f64, score: f64) {
        self.impact += impact(g, e);
        self.adjustment += adjustment(g, e, score);
        self.games += 1;
    }

    /// `Σ g² · E · (1 - E)`
    #[must_use]
    pub fn impact(&self) -> f64 {
        self.impact
    }

    /// `Σ g · (S - E)`
    #[must_use]
    pub fn adjustment(&self) -> f64 {
        self.adjustment
    }

    /// How many games were added.
    #[must_use]
    pub fn games(&self) -> usize {
        self.games
    }

    /// Whether no game was added at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.games == 0
    }
}
