//! The [Glicko-2](http://www.glicko.net/glicko/glicko2.pdf) rating system.
//!
//! Like [`glicko`][crate::glicko], a [`Player`] collects the results of the current rating period
//! and recomputes its rating from all of them on every update.
//! Additionally every player carries a volatility, which is solved for iteratively
//! (see [`algorithm::calculate_new_volatility`]).
//!
//! Every update computes the complete new state before anything is written,
//! so a failed update leaves the player exactly as it was.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::constants::{self, RATING_SCALING_RATIO, SCALED_RATING_ORIGIN};
use crate::error::{require_finite, require_positive};
use crate::math::{self, PeriodTotals};
use crate::util::History;
use crate::{algorithm, MatchResult, RatingError, Result};

/// A Glicko-2 skill rating.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rating {
    rating: f64,
    deviation: f64,
    volatility: f64,
}

impl From<ScaledRating> for Rating {
    fn from(scaled: ScaledRating) -> Self {
        Rating {
            rating: scaled.rating * RATING_SCALING_RATIO + SCALED_RATING_ORIGIN,
            deviation: scaled.deviation * RATING_SCALING_RATIO,
            volatility: scaled.volatility,
        }
    }
}

impl Rating {
    /// Creates a new [`Rating`] with the specified parameters.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::InvalidRating`] if `rating` is not finite, or if `deviation` or `volatility` is not positive and finite.
    pub fn new(rating: f64, deviation: f64, volatility: f64) -> Result<Self> {
        check_rating(rating, deviation, volatility)?;

        Ok(Rating {
            rating,
            deviation,
            volatility,
        })
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

    /// The rating volatility.
    #[must_use]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }
}

/// A Glicko-2 rating scaled to the internal rating scale.
/// See "Step 2." and "Step 8." in [Glickmans' paper](http://www.glicko.net/glicko/glicko2.pdf).
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScaledRating {
    pub(crate) rating: f64,
    pub(crate) deviation: f64,
    pub(crate) volatility: f64,
}

impl From<Rating> for ScaledRating {
    fn from(rating: Rating) -> Self {
        ScaledRating {
            rating: (rating.rating - SCALED_RATING_ORIGIN) / RATING_SCALING_RATIO,
            deviation: rating.deviation / RATING_SCALING_RATIO,
            volatility: rating.volatility,
        }
    }
}

impl ScaledRating {
    /// Creates a new [`ScaledRating`] with the specified parameters.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::InvalidRating`] if `rating` is not finite, or if `deviation` or `volatility` is not positive and finite.
    pub fn new(rating: f64, deviation: f64, volatility: f64) -> Result<Self> {
        check_rating(rating, deviation, volatility)?;

        Ok(ScaledRating {
            rating,
            deviation,
            volatility,
        })
    }

    /// The rating value, also called "μ".
    #[must_use]
    pub fn rating(&self) -> f64 {
        self.rating
    }

    /// The rating deviation, also called "φ".
    #[must_use]
    pub fn deviation(&self) -> f64 {
        self.deviation
    }

    /// The rating volatility, also called "σ".
    #[must_use]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }
}

fn check_rating(rating: f64, deviation: f64, volatility: f64) -> Result<()> {
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
    if !(volatility.is_finite() && volatility > 0.0) {
        return Err(RatingError::InvalidRating {
            name: "volatility",
            value: volatility,
        });
    }

    Ok(())
}

/// The parameters used by the Glicko-2 algorithm.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Parameters {
    start_rating: f64,
    start_deviation: f64,
    start_volatility: f64,
    volatility_change: f64,
    convergence_tolerance: f64,
}

impl Parameters {
    /// Creates [`Parameters`] with the given parameters.
    ///
    /// # Arguments
    ///
    /// * `start_rating` - The rating value a new player starts out with. See also [`constants::DEFAULT_START_RATING`].
    /// * `start_deviation` - The rating deviation a new player starts out with. See also [`constants::DEFAULT_START_DEVIATION`].
    /// * `start_volatility` - The rating volatility a new player starts out with. See also [`constants::DEFAULT_START_VOLATILITY`].
    /// * `volatility_change` - Also called "system constant" or "τ".
    /// This constant constraints change in volatility over time.
    /// Reasonable choices are between 0.3 and 1.2.
    /// Small values prevent volatility and therefore rating from changing too much after improbable results.
    /// See also "Step 1." in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf) and [`constants::DEFAULT_VOLATILITY_CHANGE`].
    /// * `convergence_tolerance` - The cutoff value for the converging loop algorithm in "Step 5.1." in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf).
    /// See also [`constants::DEFAULT_CONVERGENCE_TOLERANCE`].
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::MisconfiguredParameters`] if `start_deviation`, `start_volatility`,
    /// `volatility_change`, or `convergence_tolerance` is not positive, or if any value is not finite.
    pub fn new(
        start_rating: f64,
        start_deviation: f64,
        start_volatility: f64,
        volatility_change: f64,
        convergence_tolerance: f64,
    ) -> Result<Self> {
        let parameters = Parameters {
            start_rating,
            start_deviation,
            start_volatility,
            volatility_change,
            convergence_tolerance,
        };
        parameters.validate()?;

        Ok(parameters)
    }

    /// Creates [`Parameters`] with the same parameters as `self`, only changing the start rating to `start_rating`.
    #[must_use]
    pub fn with_start_rating(self, start_rating: f64) -> Self {
        Parameters {
            start_rating,
            ..self
        }
    }

    /// Creates [`Parameters`] with the same parameters as `self`, only changing the start deviation to `start_deviation`.
    #[must_use]
    pub fn with_start_deviation(self, start_deviation: f64) -> Self {
        Parameters {
            start_deviation,
            ..self
        }
    }

    /// Creates [`Parameters`] with the same parameters as `self`, only changing the start volatility to `start_volatility`.
    #[must_use]
    pub fn with_start_volatility(self, start_volatility: f64) -> Self {
        Parameters {
            start_volatility,
            ..self
        }
    }

    /// Creates [`Parameters`] with the same parameters as `self`, only changing the volatility change to `volatility_change`.
    #[must_use]
    pub fn with_volatility_change(self, volatility_change: f64) -> Self {
        Parameters {
            volatility_change,
            ..self
        }
    }

    /// Creates [`Parameters`] with the same parameters as `self`, only changing the convergence tolerance to `convergence_tolerance`.
    #[must_use]
    pub fn with_convergence_tolerance(self, convergence_tolerance: f64) -> Self {
        Parameters {
            convergence_tolerance,
            ..self
        }
    }

    /// The rating value the current period started with.
    #[must_use]
    pub fn start_rating(&self) -> f64 {
        self.start_rating
    }

    /// The rating deviation the current period started with.
    #[must_use]
    pub fn start_deviation(&self) -> f64 {
        self.start_deviation
    }

    /// The rating volatility the current period started with.
    #[must_use]
    pub fn start_volatility(&self) -> f64 {
        self.start_volatility
    }

    /// `volatility_change` - Also called "system constant" or "τ".
    /// This constant constraints change in volatility over time.
    /// Reasonable choices are between 0.3 and 1.2.
    /// Small values prevent volatility and therefore rating from changing too much after improbable results.
    ///
    /// See also "Step 1." in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf) and [`constants::DEFAULT_VOLATILITY_CHANGE`].
    #[must_use]
    pub fn volatility_change(&self) -> f64 {
        self.volatility_change
    }

    /// The cutoff value for the converging loop algorithm in "Step 5.1." in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf).
    ///
    /// See also [`constants::DEFAULT_CONVERGENCE_TOLERANCE`].
    #[must_use]
    pub fn convergence_tolerance(&self) -> f64 {
        self.convergence_tolerance
    }

    /// The rating the current period started with.
    #[must_use]
    pub fn start(&self) -> Rating {
        Rating {
            rating: self.start_rating,
            deviation: self.start_deviation,
            volatility: self.start_volatility,
        }
    }

    fn validate(&self) -> Result<()> {
        require_finite("start_rating", self.start_rating)?;
        require_positive("start_deviation", self.start_deviation)?;
        require_positive("start_volatility", self.start_volatility)?;
        require_positive("volatility_change", self.volatility_change)?;
        require_positive("convergence_tolerance", self.convergence_tolerance)?;

        Ok(())
    }
}

impl Default for Parameters {
    /// Creates a default version of this struct with the parameters defined in [`constants`].
    fn default() -> Self {
        Parameters {
            start_rating: constants::DEFAULT_START_RATING,
            start_deviation: constants::DEFAULT_START_DEVIATION,
            start_volatility: constants::DEFAULT_START_VOLATILITY,
            volatility_change: constants::DEFAULT_VOLATILITY_CHANGE,
            convergence_tolerance: constants::DEFAULT_CONVERGENCE_TOLERANCE,
        }
    }
}

/// One game of the current rating period.
///
/// `g` and `e` live on the internal scale. They are computed once when the game is recorded
/// and never change afterwards.
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

    #[must_use]
    pub fn g(&self) -> f64 {
        self.g
    }

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
    volatility: f64,
    volatility_delta: f64,
}

impl Outcome {
    fn between(old: Rating, new: Rating) -> Self {
        Outcome {
            rating: new.rating,
            rating_delta: new.rating - old.rating,
            deviation: new.deviation,
            deviation_delta: new.deviation - old.deviation,
            volatility: new.volatility,
            volatility_delta: new.volatility - old.volatility,
        }
    }

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

    #[must_use]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    #[must_use]
    pub fn volatility_delta(&self) -> f64 {
        self.volatility_delta
    }
}

/// A participant rated with Glicko-2.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Player {
    rating: Rating,
    history: History<GameResult>,
    parameters: Parameters,
}

impl Player {
    /// Creates a new player with the start values from `parameters`.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::MisconfiguredParameters`] if `parameters` holds an unusable value.
    pub fn new(parameters: Parameters) -> Result<Self> {
        parameters.validate()?;

        Ok(Player {
            rating: parameters.start(),
            history: History::new(),
            parameters,
        })
    }

    #[must_use]
    pub fn rating(&self) -> f64 {
        self.rating.rating
    }

    #[must_use]
    pub fn deviation(&self) -> f64 {
        self.rating.deviation
    }

    #[must_use]
    pub fn volatility(&self) -> f64 {
        self.rating.volatility
    }

    /// The current rating as a value that can be handed to an opponent.
    #[must_use]
    pub fn snapshot(&self) -> Rating {
        self.rating
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
        let player = ScaledRating::from(self.rating);
        let opponent = ScaledRating::from(opponent);

        math::expectation(math::g(opponent.deviation), player.rating, opponent.rating)
    }

    /// Adds a game to the current period without recomputing the rating.
    /// Call [`Player::settle`] once the whole batch is in.
    pub fn record_result(&mut self, opponent: Rating, result: MatchResult) {
        let game = self.freeze(opponent, result);

        trace!(?game, "recorded glicko-2 result");

        self.history.push(game);
    }

    /// Records a win against `opponent` and recomputes the rating.
    ///
    /// Only this player changes. Call [`Player::lose`] on the opponent with this player's
    /// snapshot from before the update to rate the other side.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::DegenerateConvergence`] if the volatility could not be solved for.
    /// This also happens when `opponent` is rated so far away that the expected score rounds to
    /// exactly 0 or 1, since such a game carries no information.
    /// Neither the history nor the rating change in that case.
    pub fn win(&mut self, opponent: Rating) -> Result<Outcome> {
        self.update(opponent, MatchResult::Win)
    }

    /// Records a loss against `opponent` and recomputes the rating.
    ///
    /// # Errors
    ///
    /// See [`Player::win`].
    pub fn lose(&mut self, opponent: Rating) -> Result<Outcome> {
        self.update(opponent, MatchResult::Loss)
    }

    /// Records a draw against `opponent` and recomputes the rating.
    ///
    /// # Errors
    ///
    /// See [`Player::win`].
    pub fn draw(&mut self, opponent: Rating) -> Result<Outcome> {
        self.update(opponent, MatchResult::Draw)
    }

    /// Records a game against `opponent` and recomputes the rating from the whole period.
    ///
    /// # Errors
    ///
    /// See [`Player::win`].
    pub fn update(&mut self, opponent: Rating, result: MatchResult) -> Result<Outcome> {
        let game = self.freeze(opponent, result);
        let new_rating = self.rate(self.parameters, Some(&game))?;

        self.history.push(game);

        Ok(self.apply(new_rating))
    }

    /// Recomputes rating, deviation and volatility from every game of the current period.
    ///
    /// With no games recorded, the rating and volatility stay at the period's start values
    /// and only the deviation widens by one period of volatility.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::DegenerateConvergence`] if the volatility could not be solved for.
    pub fn settle(&mut self) -> Result<Outcome> {
        let new_rating = self.rate(self.parameters, None)?;

        Ok(self.apply(new_rating))
    }

    /// Widens the period's start deviation by `elapsed_periods` rating periods of inactivity
    /// (`φ = sqrt(φ² + t · σ²)`, fractional periods allowed) and settles the current history against it.
    ///
    /// This is never applied automatically. Typically it's called right after [`Player::new_period`].
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::MisconfiguredParameters`] if `elapsed_periods` is negative or not finite,
    /// and [`RatingError::DegenerateConvergence`] if the volatility could not be solved for.
    /// The player is left untouched in both cases.
    pub fn decay(&mut self, elapsed_periods: f64) -> Result<Outcome> {
        require_finite("elapsed_periods", elapsed_periods)?;
        if elapsed_periods < 0.0 {
            return Err(RatingError::MisconfiguredParameters {
                name: "elapsed_periods",
                value: elapsed_periods,
            });
        }

        let start = ScaledRating::from(self.parameters.start());
        let widened = algorithm::calculate_pre_rating_period_value(
            start.volatility,
            start,
            elapsed_periods,
        );

        let parameters = self
            .parameters
            .with_start_deviation(widened * RATING_SCALING_RATIO);
        let new_rating = self.rate(parameters, None)?;

        self.parameters = parameters;

        Ok(self.apply(new_rating))
    }

    /// Forgets every game of the current period and restores the period's start values.
    pub fn reset(&mut self) {
        debug!(games = self.history.len(), "glicko-2 reset");

        self.history.clear();
        self.rating = self.parameters.start();
    }

    /// Ends the current period: the current rating, deviation and volatility become the start values of the next one.
    pub fn new_period(&mut self) {
        self.parameters.start_rating = self.rating.rating;
        self.parameters.start_deviation = self.rating.deviation;
        self.parameters.start_volatility = self.rating.volatility;
        self.reset();
    }

    fn freeze(&self, opponent: Rating, result: MatchResult) -> GameResult {
        let start = ScaledRating::from(self.parameters.start());
        let scaled_opponent = ScaledRating::from(opponent);

        let g = math::g(scaled_opponent.deviation);
        let e = math::expectation(g, start.rating, scaled_opponent.rating);

        GameResult {
            opponent,
            g,
            e,
            score: result.score(),
        }
    }

    fn rate(&self, parameters: Parameters, pending: Option<&GameResult>) -> Result<Rating> {
        let mut totals = PeriodTotals::default();
        for game in self.history.iter().chain(pending) {
            totals.add(game.g, game.e, game.score);
        }

        let start = ScaledRating::from(parameters.start());
        let rated = algorithm::rate_player(start, totals, parameters)?;

        Ok(Rating::from(rated))
    }

    fn apply(&mut self, new_rating: Rating) -> Outcome {
        let outcome = Outcome::between(self.rating, new_rating);

        debug!(
            games = self.history.len(),
            old_rating = self.rating.rating,
            new_rating = new_rating.rating,
            old_deviation = self.rating.deviation,
            new_deviation = new_rating.deviation,
            old_volatility = self.rating.volatility,
            new_volatility = new_rating.volatility,
            "settled glicko-2 period"
        );

        self.rating = new_rating;

        outcome
    }
}

#[cfg(test)]
mod test {
    use super::{Parameters, Player, Rating, ScaledRating};
    use crate::{MatchResult, RatingError};

    fn paper_parameters() -> Parameters {
        Parameters::default()
            .with_start_deviation(200.0)
            .with_volatility_change(0.5)
    }

    fn paper_opponents() -> [Rating; 3] {
        // Volatility on opponents is not specified in the paper and doesn't matter in the calculation.
        [
            Rating::new(1400.0, 30.0, 0.06).unwrap(),
            Rating::new(1550.0, 100.0, 0.06).unwrap(),
            Rating::new(1700.0, 300.0, 0.06).unwrap(),
        ]
    }

    /// This tests the example calculation in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf).
    #[test]
    fn test_paper_example() {
        let mut player = Player::new(paper_parameters()).unwrap();
        let [a, b, c] = paper_opponents();

        player.record_result(b, MatchResult::Loss);
        player.record_result(c, MatchResult::Loss);
        let outcome = player.win(a).unwrap();

        assert_approx_eq!(outcome.rating(), 1464.06, 0.01);
        assert_approx_eq!(outcome.deviation(), 151.52, 0.01);
        assert_approx_eq!(outcome.volatility(), 0.05999, 0.00001);
        assert_eq!(player.snapshot().rating(), outcome.rating());
        assert_eq!(player.history().len(), 3);
    }

    #[test]
    fn scaling_paper_values() {
        let [a, b, c] = paper_opponents().map(ScaledRating::from);

        assert_approx_eq!(a.rating(), -0.5756, 0.0001);
        assert_approx_eq!(b.rating(), 0.2878, 0.0001);
        assert_approx_eq!(c.rating(), 1.1513, 0.0001);

        assert_approx_eq!(a.deviation(), 0.1727, 0.0001);
        assert_approx_eq!(b.deviation(), 0.5756, 0.0001);
        assert_approx_eq!(c.deviation(), 1.7269, 0.0001);

        let back = Rating::from(c);
        assert_approx_eq!(back.rating(), 1700.0, 1e-9);
        assert_approx_eq!(back.deviation(), 300.0, 1e-9);
    }

    #[test]
    fn frozen_expectations_paper_values() {
        let mut player = Player::new(paper_parameters()).unwrap();
        let [a, b, c] = paper_opponents();

        player.record_result(a, MatchResult::Win);
        player.record_result(b, MatchResult::Loss);
        player.record_result(c, MatchResult::Loss);

        let history = player.history();
        assert_approx_eq!(history[0].g(), 0.9955, 0.0001);
        assert_approx_eq!(history[1].g(), 0.9531, 0.0001);
        assert_approx_eq!(history[2].g(), 0.7242, 0.0001);
        assert_approx_eq!(history[0].e(), 0.639, 0.001);
        assert_approx_eq!(history[1].e(), 0.432, 0.001);
        assert_approx_eq!(history[2].e(), 0.303, 0.001);
        assert_eq!(history[0].score(), 1.0);
    }

    #[test]
    fn settling_without_games_only_widens_deviation() {
        let mut player = Player::new(paper_parameters()).unwrap();
        let outcome = player.settle().unwrap();

        let expected_deviation = f64::sqrt(
            (200.0 / 173.7178) * (200.0 / 173.7178) + 0.06 * 0.06,
        ) * 173.7178;

        assert_eq!(outcome.rating_delta(), 0.0);
        assert_eq!(outcome.volatility_delta(), 0.0);
        assert!(outcome.deviation_delta() > 0.0);
        assert_approx_eq!(outcome.deviation(), expected_deviation, 1e-9);

        // Settling again starts from the period's start values, not from the widened deviation.
        let again = player.settle().unwrap();
        assert_approx_eq!(again.deviation(), expected_deviation, 1e-9);
        assert_approx_eq!(again.deviation_delta(), 0.0, 1e-12);
    }

    #[test]
    fn failed_update_leaves_player_untouched() {
        // A tolerance this small can never be reached with f64 precision.
        let parameters = paper_parameters().with_convergence_tolerance(1e-300);
        let mut player = Player::new(parameters).unwrap();
        let before = player.clone();
        let [a, _, _] = paper_opponents();

        let err = player.win(a).unwrap_err();
        assert!(matches!(err, RatingError::DegenerateConvergence { .. }));
        assert_eq!(player, before);
    }

    #[test]
    fn hopeless_mismatch_is_degenerate() {
        let mut player = Player::new(Parameters::default()).unwrap();
        let before = player.clone();
        let opponent = Rating::new(-18_500.0, 30.0, 0.06).unwrap();

        assert_approx_eq!(player.expected_score(opponent), 1.0, 0.0);

        let err = player.win(opponent).unwrap_err();
        assert!(matches!(err, RatingError::DegenerateConvergence { .. }));
        assert_eq!(player, before);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut player = Player::new(paper_parameters()).unwrap();
        let [a, b, _] = paper_opponents();
        player.win(a).unwrap();
        player.draw(b).unwrap();

        player.reset();
        let once = player.clone();
        player.reset();

        assert_eq!(player, once);
        assert!(player.history().is_empty());
        assert_eq!(player.snapshot(), paper_parameters().start());
    }

    #[test]
    fn new_period_promotes_current_values() {
        let mut player = Player::new(paper_parameters()).unwrap();
        let [a, b, c] = paper_opponents();
        player.win(a).unwrap();
        player.lose(b).unwrap();
        player.lose(c).unwrap();
        let snapshot = player.snapshot();

        player.new_period();
        assert!(player.history().is_empty());
        assert_eq!(player.parameters().start(), snapshot);
        assert_eq!(player.parameters().volatility_change(), 0.5);

        let after_new_period = player.clone();
        player.reset();
        assert_eq!(player, after_new_period);
    }

    #[test]
    fn decay_uses_volatility() {
        let mut player = Player::new(paper_parameters()).unwrap();

        let outcome = player.decay(0.5).unwrap();
        let phi = 200.0 / 173.7178;
        let widened = f64::sqrt(phi * phi + 0.5 * 0.06 * 0.06);
        let settled = f64::sqrt(widened * widened + 0.06 * 0.06) * 173.7178;

        assert_approx_eq!(player.parameters().start_deviation(), widened * 173.7178, 1e-9);
        assert_approx_eq!(outcome.deviation(), settled, 1e-9);
        assert_eq!(outcome.rating(), 1500.0);

        let before = player.clone();
        assert!(player.decay(-0.5).is_err());
        assert_eq!(player, before);
    }

    #[test]
    fn opponent_snapshots_are_copied() {
        let mut player = Player::new(Parameters::default()).unwrap();
        let mut opponent = Player::new(Parameters::default()).unwrap();

        let (player_before, opponent_before) = (player.snapshot(), opponent.snapshot());
        player.win(opponent_before).unwrap();
        opponent.lose(player_before).unwrap();

        assert_eq!(player.history()[0].opponent(), opponent_before);
        assert_eq!(opponent.history()[0].opponent(), player_before);
        assert_ne!(opponent.snapshot(), opponent_before);
        assert_approx_eq!(
            player.rating() - 1500.0,
            1500.0 - opponent.rating(),
            1e-9
        );
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert_eq!(
            Parameters::new(1500.0, 350.0, 0.06, 0.0, 0.000_001),
            Err(RatingError::MisconfiguredParameters {
                name: "volatility_change",
                value: 0.0
            })
        );
        assert!(Parameters::new(1500.0, 350.0, -0.06, 0.5, 0.000_001).is_err());
        assert!(Player::new(Parameters::default().with_convergence_tolerance(0.0)).is_err());
        assert!(Player::new(Parameters::default().with_start_deviation(f64::NAN)).is_err());

        assert!(Rating::new(1500.0, 350.0, 0.0).is_err());
        assert!(ScaledRating::new(0.0, -1.0, 0.06).is_err());
    }

    #[test]
    fn expected_score_is_symmetric() {
        let player = Player::new(Parameters::default()).unwrap();
        let opponent = Rating::new(1500.0, 350.0, 0.06).unwrap();

        assert_approx_eq!(player.expected_score(opponent), 0.5, 1e-12);
    }
}
