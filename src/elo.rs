//! The Elo rating system.
//!
//! Elo keeps no history: every game is rated immediately against the player's current rating,
//! and the result is forgotten afterwards.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{require_finite, require_positive};
use crate::{constants, math, MatchResult, RatingError, Result};

/// The parameters used by the Elo algorithm.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Parameters {
    k_factor: f64,
    scale: f64,
    start_rating: f64,
}

impl Parameters {
    /// Creates [`Parameters`] with the given parameters.
    ///
    /// # Arguments
    ///
    /// * `k_factor` - The largest possible rating change from a single game. See also [`constants::DEFAULT_K_FACTOR`].
    /// * `scale` - Also called "D". See also [`constants::DEFAULT_SCALE`].
    /// * `start_rating` - The rating value a new player starts out with. See also [`constants::DEFAULT_START_RATING`].
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::MisconfiguredParameters`] if `k_factor` or `scale` is not positive,
    /// or if any value is not finite.
    pub fn new(k_factor: f64, scale: f64, start_rating: f64) -> Result<Self> {
        let parameters = Parameters {
            k_factor,
            scale,
            start_rating,
        };
        parameters.validate()?;

        Ok(parameters)
    }

    /// Creates [`Parameters`] with the same parameters as `self`, only changing the K-factor to `k_factor`.
    #[must_use]
    pub fn with_k_factor(self, k_factor: f64) -> Self {
        Parameters { k_factor, ..self }
    }

    /// Creates [`Parameters`] with the same parameters as `self`, only changing the scale to `scale`.
    #[must_use]
    pub fn with_scale(self, scale: f64) -> Self {
        Parameters { scale, ..self }
    }

    /// Creates [`Parameters`] with the same parameters as `self`, only changing the start rating to `start_rating`.
    #[must_use]
    pub fn with_start_rating(self, start_rating: f64) -> Self {
        Parameters {
            start_rating,
            ..self
        }
    }

    /// The largest possible rating change from a single game.
    #[must_use]
    pub fn k_factor(&self) -> f64 {
        self.k_factor
    }

    /// The scale constant "D".
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// The rating the player started the current period with.
    #[must_use]
    pub fn start_rating(&self) -> f64 {
        self.start_rating
    }

    fn validate(&self) -> Result<()> {
        require_positive("k_factor", self.k_factor)?;
        require_positive("scale", self.scale)?;
        require_finite("start_rating", self.start_rating)?;

        Ok(())
    }
}

impl Default for Parameters {
    /// Creates a default version of this struct with the parameters defined in [`constants`].
    fn default() -> Self {
        Parameters {
            k_factor: constants::DEFAULT_K_FACTOR,
            scale: constants::DEFAULT_SCALE,
            start_rating: constants::DEFAULT_START_RATING,
        }
    }
}

/// The state of a player right after an update, with the change the update caused.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Outcome {
    rating: f64,
    rating_delta: f64,
}

impl Outcome {
    /// The new rating.
    #[must_use]
    pub fn rating(&self) -> f64 {
        self.rating
    }

    /// How much the rating changed.
    #[must_use]
    pub fn rating_delta(&self) -> f64 {
        self.rating_delta
    }
}

/// How much a player rated `rating` gains (or loses) from `result` against `opponent_rating`.
///
/// For a shared `parameters`, a win of one side is exactly the negated loss of the other:
/// `rating_change(a, b, Win, p) == -rating_change(b, a, Loss, p)`.
#[must_use]
pub fn rating_change(
    rating: f64,
    opponent_rating: f64,
    result: MatchResult,
    parameters: Parameters,
) -> f64 {
    let expected = math::elo_expectation(rating, opponent_rating, parameters.scale);

    parameters.k_factor * (result.score() - expected)
}

/// A participant rated with Elo.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Player {
    rating: f64,
    parameters: Parameters,
}

impl Player {
    /// Creates a new player with the start rating from `parameters`.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::MisconfiguredParameters`] if `parameters` holds an unusable value.
    pub fn new(parameters: Parameters) -> Result<Self> {
        parameters.validate()?;

        Ok(Player {
            rating: parameters.start_rating,
            parameters,
        })
    }

    /// The current rating.
    #[must_use]
    pub fn rating(&self) -> f64 {
        self.rating
    }

    #[must_use]
    pub fn parameters(&self) -> Parameters {
        self.parameters
    }

    /// The probability of this player beating an opponent rated `opponent_rating`.
    #[must_use]
    pub fn expected_score(&self, opponent_rating: f64) -> f64 {
        math::elo_expectation(self.rating, opponent_rating, self.parameters.scale)
    }

    /// Rates a win against an opponent rated `opponent_rating`.
    ///
    /// Only this player changes. Call [`Player::lose`] on the opponent with this player's
    /// rating from before the update to rate the other side.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::InvalidRating`] if `opponent_rating` is not finite.
    pub fn win(&mut self, opponent_rating: f64) -> Result<Outcome> {
        self.update(opponent_rating, MatchResult::Win)
    }

    /// Rates a loss against an opponent rated `opponent_rating`.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::InvalidRating`] if `opponent_rating` is not finite.
    pub fn lose(&mut self, opponent_rating: f64) -> Result<Outcome> {
        self.update(opponent_rating, MatchResult::Loss)
    }

    /// Rates a draw against an opponent rated `opponent_rating`.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::InvalidRating`] if `opponent_rating` is not finite.
    pub fn draw(&mut self, opponent_rating: f64) -> Result<Outcome> {
        self.update(opponent_rating, MatchResult::Draw)
    }

    /// Rates a single game and applies the new rating immediately.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::InvalidRating`] if `opponent_rating` is not finite.
    pub fn update(&mut self, opponent_rating: f64, result: MatchResult) -> Result<Outcome> {
        let outcome = self.outcome(opponent_rating, result)?;

        debug!(
            old_rating = self.rating,
            new_rating = outcome.rating,
            opponent_rating,
            ?result,
            "elo update"
        );

        self.rating = outcome.rating;

        Ok(outcome)
    }

    /// The outcome [`Player::update`] would produce, without applying it.
    fn outcome(&self, opponent_rating: f64, result: MatchResult) -> Result<Outcome> {
        if !opponent_rating.is_finite() {
            return Err(RatingError::InvalidRating {
                name: "opponent_rating",
                value: opponent_rating,
            });
        }

        let rating_delta = rating_change(self.rating, opponent_rating, result, self.parameters);

        Ok(Outcome {
            rating: self.rating + rating_delta,
            rating_delta,
        })
    }

    /// Like [`Player::update`], but with an integer result code:
    /// `0` for a win, `1` for a loss and `2` for a draw.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::InvalidResult`] for any other code, and
    /// [`RatingError::InvalidRating`] if `opponent_rating` is not finite.
    /// The player is left untouched in both cases.
    pub fn update_coded(&mut self, opponent_rating: f64, code: i32) -> Result<Outcome> {
        let result = MatchResult::try_from(code)?;

        self.update(opponent_rating, result)
    }

    /// Restores the rating the current period started with.
    pub fn reset(&mut self) {
        debug!(rating = self.rating, "elo reset");

        self.rating = self.parameters.start_rating;
    }

    /// Makes the current rating the start rating of a new period.
    pub fn new_period(&mut self) {
        self.parameters.start_rating = self.rating;
        self.reset();
    }
}

/// Rates one game between `player_1` and `player_2` without changing either of them.
///
/// `code` is the result from `player_1`'s point of view, encoded as in [`Player::update_coded`].
/// Both sides are rated against the other's rating from before the game, each with its own parameters.
/// Apply the outcomes with [`Player::update`] or discard them.
///
/// # Errors
///
/// Returns [`RatingError::InvalidResult`] if `code` is not `0`, `1` or `2`.
pub fn rate_game(player_1: &Player, player_2: &Player, code: i32) -> Result<(Outcome, Outcome)> {
    let result = MatchResult::try_from(code)?;

    let outcome_1 = player_1.outcome(player_2.rating, result)?;
    let outcome_2 = player_2.outcome(player_1.rating, result.invert())?;

    Ok((outcome_1, outcome_2))
}
