//! The [Glicko](http://www.glicko.net/glicko/glicko.pdf) rating system.
//!
//! A [`Player`] collects the results of the current rating period in its history.
//! Every result is frozen against the rating the player had when the period started,
//! so all games of a period count as if they were played at the same time.
//! Each update recomputes the rating and deviation from the whole history.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::constants::{self, GLICKO_Q};
use crate::error::{require_finite, require_positive};
use crate::math::{self, PeriodTotals};
use crate::util::History;
use crate::{MatchResult, RatingError, Result};

/// The parameters used by the Glicko algorithm.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Parameters {
    start_rating: f64,
    start_deviation: f64,
    uncertainty_growth: f64,
}

impl Parameters {
    /// Creates [`Parameters`] with the given parameters.
    ///
    /// # Arguments
    ///
    /// * `start_rating` - The rating value a new player starts out with. See also [`constants::DEFAULT_START_RATING`].
    /// * `start_deviation` - The rating deviation a new player starts out with. See also [`constants::DEFAULT_START_DEVIATION`].
    /// * `uncertainty_growth` - Also called "C".
    /// How much the deviation grows per rating period of inactivity. Only used by [`Player::decay`].
    /// See also [`constants::DEFAULT_UNCERTAINTY_GROWTH`].
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::MisconfiguredParameters`] if `start_deviation` is not positive,
    /// `uncertainty_growth` is negative, or any value is not finite.
    pub fn new(start_rating: f64, start_deviation: f64, uncertainty_growth: f64) -> Result<Self> {
        let parameters = Parameters {
            start_rating,
            start_deviation,
            uncertainty_growth,
        };
        parameters.validate()?;

        Ok(parameters)
    }

    #[must_use]
    pub fn with_start_rating(self, start_rating: f64) -> Self {
        Parameters {
            start_rating,
            ..self
        }
    }

    #[must_use]
    pub fn with_start_deviation(self, start_deviation: f64) -> Self {
        Parameters {
            start_deviation,
            ..self
        }
    }

    #[must_use]
    pub fn with_uncertainty_growth(self, uncertainty_growth: f64) -> Self {
        Parameters {
            uncertainty_growth,
            ..self
        }
    }

    /// The rating the player started the current period with.
    #[must_use]
    pub fn start_rating(&self) -> f64 {
        self.start_rating
    }

    /// The deviation the player started the current period with.
    #[must_use]
    pub fn start_deviation(&self) -> f64 {
        self.start_deviation
    }

    /// The uncertainty growth constant "C".
    #[must_use]
    pub fn uncertainty_growth(&self) -> f64 {
        self.uncertainty_growth
    }

    fn validate(&self) -> Result<()> {
        require_finite("start_rating", self.start_rating)?;
        require_positive("start_deviation", self.start_deviation)?;
        require_finite("uncertainty_growth", self.uncertainty_growth)?;

        if self.uncertainty_growth < 0.0 {
            return Err(RatingError::MisconfiguredParameters {
                name: "uncertainty_growth",
                value: self.uncertainty_growth,
            });
        }

        Ok(())
    }
}

impl Default for Parameters {
    /// Creates a default version of this struct with the parameters defined in [`constants`].
    fn default() -> Self {
        Parameters {
            start_rating: constants::DEFAULT_START_RATING,
            start_deviation: constants::DEFAULT_START_DEVIATION,
            uncertainty_growth: constants::DEFAULT_UNCERTAINTY_GROWTH,
        }
    }
}

/// A Glicko skill rating, used as a snapshot of an opponent.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rating {
    rating: f64,
    deviation: f64,
}

impl Rating {
    /// Creates a new [`Rating`] with the specified parameters.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::InvalidRating`] if `rating` is not finite or `deviation` is not positive and finite.
    pub fn new(rating: f64, deviation: f64) -> Result<Self> {
        if !rating.is_finite() {
            return Err(RatingError::InvalidRating {
                name: "rating",
                value: rating,
            });
        }
        if !(deviation.is_finite() && deviation > 0.0) {
            return Err(RatingError::InvalidRating {
                name: "deviation",
                value: deviation,
            });
        }

        Ok(Rating { rating, deviation })
    }

    /// The rating value.
    #[must_use]
    pub fn rating(&self) -> f64 {
        self.rating
    }

    /// The rating deviation.
    #[must_use]
    pub fn deviation(&self) -> f64 {
        self.deviation
    }
}

/// One game of the current rating period.
///
/// `g` and `e` are computed once when the game is recorded and never change afterwards.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GameResult {
    opponent: Rating,
    g: f64,
    e: f64,
    score: f64,
}

impl GameResult {
    /// The opponent as they were when the game was recorded.
    #[must_use]
    pub fn opponent(&self) -> Rating {
        self.opponent
    }

    /// The opponent's g-factor.
    #[must_use]
    pub fn g(&self) -> f64 {
        self.g
    }

    /// The expected score against the opponent, based on the period's start rating.
    #[must_use]
    pub fn e(&self) -> f64 {
        self.e
    }

    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }
}

/// The state of a player right after an update, with the change the update caused.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Outcome {
    rating: f64,
    rating_delta: f64,
    deviation: f64,
    deviation_delta: f64,
}

impl Outcome {
    #[must_use]
    pub fn rating(&self) -> f64 {
        self.rating
    }

    #[must_use]
    pub fn rating_delta(&self) -> f64 {
        self.rating_delta
    }

    #[must_use]
    pub fn deviation(&self) -> f64 {
        self.deviation
    }

    #[must_use]
    pub fn deviation_delta(&self) -> f64 {
        self.deviation_delta
    }
}

/// A participant rated with Glicko.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Player {
    rating: f64,
    deviation: f64,
    history: History<GameResult>,
    parameters: Parameters,
}

impl Player {
    /// Creates a new player with the start rating and deviation from `parameters`.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::MisconfiguredParameters`] if `parameters` holds an unusable value.
    pub fn new(parameters: Parameters) -> Result<Self> {
        parameters.validate()?;

        Ok(Player {
            rating: parameters.start_rating,
            deviation: parameters.start_deviation,
            history: History::new(),
            parameters,
        })
    }

    #[must_use]
    pub fn rating(&self) -> f64 {
        self.rating
    }

    #[must_use]
    pub fn deviation(&self) -> f64 {
        self.deviation
    }

    /// The current rating as a value that can be handed to an opponent.
    #[must_use]
    pub fn snapshot(&self) -> Rating {
        Rating {
            rating: self.rating,
            deviation: self.deviation,
        }
    }

    #[must_use]
    pub fn parameters(&self) -> Parameters {
        self.parameters
    }

    /// Every game recorded since the current period started, oldest first.
    #[must_use]
    pub fn history(&self) -> &[GameResult] {
        &self.history
    }

    /// The probability of this player beating `opponent`, based on the current rating.
    #[must_use]
    pub fn expected_score(&self, opponent: Rating) -> f64 {
        let g = math::g(GLICKO_Q * opponent.deviation);

        math::expectation(g, GLICKO_Q * self.rating, GLICKO_Q * opponent.rating)
    }

    /// Adds a game to the current period without recomputing the rating.
    /// Call [`Player::settle`] once the whole batch is in.
    pub fn record_result(&mut self, opponent: Rating, result: MatchResult) {
        let game = self.freeze(opponent, result);

        trace!(?game, "recorded glicko result");

        self.history.push(game);
    }

    /// Records a win against `opponent` and recomputes the rating.
    ///
    /// Only this player changes. Call [`Player::lose`] on the opponent with this player's
    /// snapshot from before the update to rate the other side.
    pub fn win(&mut self, opponent: Rating) -> Outcome {
        self.update(opponent, MatchResult::Win)
    }

    /// Records a loss against `opponent` and recomputes the rating.
    pub fn lose(&mut self, opponent: Rating) -> Outcome {
        self.update(opponent, MatchResult::Loss)
    }

    /// Records a draw against `opponent` and recomputes the rating.
    pub fn draw(&mut self, opponent: Rating) -> Outcome {
        self.update(opponent, MatchResult::Draw)
    }

    /// Records a game against `opponent` and recomputes the rating from the whole period.
    pub fn update(&mut self, opponent: Rating, result: MatchResult) -> Outcome {
        self.record_result(opponent, result);
        self.settle()
    }

    /// Recomputes rating and deviation from every game of the current period.
    ///
    /// With no games recorded, this restores the period's start rating and deviation.
    pub fn settle(&mut self) -> Outcome {
        let mut totals = PeriodTotals::default();
        for game in self.history.iter() {
            totals.add(game.g, game.e, game.score);
        }

        // 1 / RD'² = 1 / RD² + 1 / d², where 1 / d² = q² Σ g² E (1 - E) and is 0 without games
        let start_deviation = self.parameters.start_deviation;
        let information =
            1.0 / (start_deviation * start_deviation) + GLICKO_Q * GLICKO_Q * totals.impact();

        let new_deviation = f64::sqrt(1.0 / information);
        let new_rating =
            self.parameters.start_rating + GLICKO_Q / information * totals.adjustment();

        let outcome = Outcome {
            rating: new_rating,
            rating_delta: new_rating - self.rating,
            deviation: new_deviation,
            deviation_delta: new_deviation - self.deviation,
        };

        debug!(
            games = totals.games(),
            old_rating = self.rating,
            new_rating,
            old_deviation = self.deviation,
            new_deviation,
            "settled glicko period"
        );

        self.rating = new_rating;
        self.deviation = new_deviation;

        outcome
    }

    /// Widens the period's start deviation by `elapsed_periods` rating periods of inactivity
    /// (`RD = min(sqrt(RD² + C² · t), 350)`) and settles the current history against it.
    ///
    /// This is never applied automatically. Typically it's called right after [`Player::new_period`].
    /// A deviation that already is above the cap is left as is.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::MisconfiguredParameters`] if `elapsed_periods` is negative or not finite.
    /// The player is left untouched in that case.
    pub fn decay(&mut self, elapsed_periods: f64) -> Result<Outcome> {
        require_finite("elapsed_periods", elapsed_periods)?;
        if elapsed_periods < 0.0 {
            return Err(RatingError::MisconfiguredParameters {
                name: "elapsed_periods",
                value: elapsed_periods,
            });
        }

        let start_deviation = self.parameters.start_deviation;
        let growth = self.parameters.uncertainty_growth;
        let widened =
            f64::sqrt(start_deviation * start_deviation + growth * growth * elapsed_periods);

        self.parameters.start_deviation =
            widened.min(constants::MAX_DEVIATION.max(start_deviation));

        Ok(self.settle())
    }

    /// Forgets every game of the current period and restores the period's start rating and deviation.
    pub fn reset(&mut self) {
        debug!(games = self.history.len(), "glicko reset");

        self.history.clear();
        self.rating = self.parameters.start_rating;
        self.deviation = self.parameters.start_deviation;
    }

    /// Ends the current period: the current rating and deviation become the start values of the next one.
    pub fn new_period(&mut self) {
        self.parameters.start_rating = self.rating;
        self.parameters.start_deviation = self.deviation;
        self.reset();
    }

    fn freeze(&self, opponent: Rating, result: MatchResult) -> GameResult {
        let g = math::g(GLICKO_Q * opponent.deviation);
        let e = math::expectation(
            g,
            GLICKO_Q * self.parameters.start_rating,
            GLICKO_Q * opponent.rating,
        );

        GameResult {
            opponent,
            g,
            e,
            score: result.score(),
        }
    }
}
