//! The steps of the [Glicko-2](http://www.glicko.net/glicko/glicko2.pdf) algorithm,
//! operating on the internal rating scale.
//!
//! [`glicko2::Player`][crate::glicko2::Player] feeds these with its period start rating
//! and the [`PeriodTotals`] of its frozen results.

use tracing::{trace, warn};

use crate::constants;
use crate::glicko2::{Parameters, ScaledRating};
use crate::math::PeriodTotals;
use crate::{RatingError, Result};

/// Rates a player over one rating period.
///
/// If `totals` is empty, only the rating deviation changes: it widens by one period of volatility (Step 6.).
///
/// # Arguments
///
/// * `player_rating` - The rating of the player **at the onset of the rating period**
/// * `totals` - The sums over all results of the player collected in the rating period so far
/// * `parameters`
///
/// # Errors
///
/// Returns [`RatingError::DegenerateConvergence`] if the new volatility could not be solved for.
pub fn rate_player(
    player_rating: ScaledRating,
    totals: PeriodTotals,
    parameters: Parameters,
) -> Result<ScaledRating> {
    // Step 1. (initialising) and Step 2. (scaling) are done by the caller.

    if totals.is_empty() {
        // Without results Step 3. to 5. are undefined, only Step 6. applies
        let new_deviation =
            calculate_pre_rating_period_value(player_rating.volatility(), player_rating, 1.0);

        return Ok(ScaledRating {
            deviation: new_deviation,
            ..player_rating
        });
    }

    // Step 3.
    let estimated_variance = calculate_estimated_variance(totals);

    // Step 4.
    let estimated_improvement = calculate_estimated_improvement(estimated_variance, totals);

    // Step 5.
    let new_volatility = calculate_new_volatility(
        estimated_improvement,
        estimated_variance,
        player_rating,
        parameters,
    )?;

    // Step 6.
    let pre_rating_period_value =
        calculate_pre_rating_period_value(new_volatility, player_rating, 1.0);

    // Step 7.
    let new_deviation = calculate_new_rating_deviation(pre_rating_period_value, estimated_variance);

    let new_rating = calculate_new_rating(new_deviation, player_rating, totals);

    // Step 8. (converting back) is done by the caller.
    Ok(ScaledRating {
        rating: new_rating,
        deviation: new_deviation,
        volatility: new_volatility,
    })
}

/// Step 3.
///
/// This function returns [`f64::INFINITY`] if `totals` is empty.
#[must_use]
pub fn calculate_estimated_variance(totals: PeriodTotals) -> f64 {
    1.0 / totals.impact()
}

/// Step 4.
#[must_use]
pub fn calculate_estimated_improvement(estimated_variance: f64, totals: PeriodTotals) -> f64 {
    estimated_variance * totals.adjustment()
}

/// The function from "Step 5.1." whose root is `ln(σ'²)`.
///
/// ```text
/// f(x) = eˣ(Δ² − φ² − v − eˣ) / (2(φ² + v + eˣ)²) − (x − a) / τ²
/// ```
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct VolatilityFunction {
    a: f64,
    estimated_improvement_sq: f64,
    deviation_sq: f64,
    estimated_variance: f64,
    volatility_change_sq: f64,
}

impl VolatilityFunction {
    #[must_use]
    pub fn new(
        estimated_improvement: f64,
        estimated_variance: f64,
        deviation: f64,
        volatility: f64,
        volatility_change: f64,
    ) -> Self {
        VolatilityFunction {
            a: f64::ln(volatility * volatility),
            estimated_improvement_sq: estimated_improvement * estimated_improvement,
            deviation_sq: deviation * deviation,
            estimated_variance,
            volatility_change_sq: volatility_change * volatility_change,
        }
    }

    /// `a = ln(σ²)`, the starting point of the search.
    #[must_use]
    pub fn a(&self) -> f64 {
        self.a
    }

    #[must_use]
    pub fn eval(&self, x: f64) -> f64 {
        let x_exp = f64::exp(x);

        let tmp_1 =
            x_exp * (self.estimated_improvement_sq - self.deviation_sq - self.estimated_variance - x_exp);

        let tmp_2 = 2.0 * {
            let tmp = self.deviation_sq + self.estimated_variance + x_exp;
            tmp * tmp
        };

        let tmp_3 = x - self.a;

        tmp_1 / tmp_2 - tmp_3 / self.volatility_change_sq
    }
}

/// Finds the root of `f` with the Illinois variant of regula falsi ("Step 5.2." to "Step 5.4.").
///
/// The returned value `x` is within `convergence_tolerance` of the root, and `|f(x)|` is below
/// `convergence_tolerance` as well. The new volatility is `e^(x / 2)`.
///
/// # Errors
///
/// Returns [`RatingError::DegenerateConvergence`] if either the bracket search or the main loop
/// needs more than [`constants::MAX_ITERATIONS`] iterations, or an iterate stops being finite.
pub fn solve_volatility(
    f: &VolatilityFunction,
    volatility_change: f64,
    convergence_tolerance: f64,
) -> Result<f64> {
    let degenerate = |iterations: u32| {
        warn!(
            iterations,
            convergence_tolerance, volatility_change, "volatility solver did not converge"
        );

        RatingError::DegenerateConvergence {
            iterations,
            tolerance: convergence_tolerance,
        }
    };

    // 2.
    let mut a = f.a();

    let threshold = f.deviation_sq + f.estimated_variance;
    let mut b = if f.estimated_improvement_sq > threshold {
        f64::ln(f.estimated_improvement_sq - threshold)
    } else {
        // (i)
        let mut k = 1;

        loop {
            if k > constants::MAX_ITERATIONS {
                return Err(degenerate(k));
            }

            // (ii)
            let estimated_b = a - f64::from(k) * volatility_change;

            if f.eval(estimated_b) < 0.0 {
                k += 1;
            } else {
                break estimated_b;
            }
        }
    };

    // 3.
    let mut f_a = f.eval(a);
    let mut f_b = f.eval(b);

    if !(f_a.is_finite() && f_b.is_finite()) {
        return Err(degenerate(0));
    }

    // f_a gets halved in (b), this keeps the actual f(a).
    let mut residual = f_a;

    // 4.
    let mut iteration = 0;
    while f64::abs(b - a) > convergence_tolerance || f64::abs(residual) >= convergence_tolerance {
        if iteration >= constants::MAX_ITERATIONS {
            return Err(degenerate(iteration));
        }

        // (a)
        let c = a + (a - b) * f_a / (f_b - f_a);
        let f_c = f.eval(c);

        if !(c.is_finite() && f_c.is_finite()) {
            return Err(degenerate(iteration));
        }

        // (b)
        // A zero product means c hit the root exactly, which keeps [b, c] a valid bracket.
        if f_c * f_b <= 0.0 {
            a = b;
            f_a = f_b;
            residual = f_b;
        } else {
            f_a /= 2.0;
        }

        // (c)
        b = c;
        f_b = f_c;

        iteration += 1;
        trace!(iteration, a, b, f_a, f_b, "volatility solver step");
        // (d) checked by loop, together with the residual at a
    }

    Ok(a)
}

/// Step 5.
///
/// # Errors
///
/// Returns [`RatingError::DegenerateConvergence`] if the volatility could not be solved for,
/// e.g. because `parameters.convergence_tolerance()` is unreasonably low.
pub fn calculate_new_volatility(
    estimated_improvement: f64,
    estimated_variance: f64,
    player_rating: ScaledRating,
    parameters: Parameters,
) -> Result<f64> {
    // 1.
    let f = VolatilityFunction::new(
        estimated_improvement,
        estimated_variance,
        player_rating.deviation(),
        player_rating.volatility(),
        parameters.volatility_change(),
    );

    let root = solve_volatility(
        &f,
        parameters.volatility_change(),
        parameters.convergence_tolerance(),
    )?;

    // 5.
    Ok(f64::exp(root / 2.0))
}

/// Step 6.
///
/// `elapsed_periods` may be fractional; a whole settled period is `1.0`.
#[must_use]
pub fn calculate_pre_rating_period_value(
    new_volatility: f64,
    player_rating: ScaledRating,
    elapsed_periods: f64,
) -> f64 {
    let current_deviation = player_rating.deviation();

    // See Lichess' implementation: https://github.com/lichess-org/lila/blob/d6a175d25228b0f3d9053a30301fce90850ceb2d/modules/rating/src/main/java/glicko2/RatingCalculator.java#L316
    f64::sqrt(
        current_deviation * current_deviation + elapsed_periods * new_volatility * new_volatility,
    )
}

/// Step 7.1.
#[must_use]
pub fn calculate_new_rating_deviation(pre_rating_period_value: f64, estimated_variance: f64) -> f64 {
    1.0 / f64::sqrt(
        1.0 / (pre_rating_period_value * pre_rating_period_value) + 1.0 / estimated_variance,
    )
}

/// Step 7.2
#[must_use]
pub fn calculate_new_rating(
    new_deviation: f64,
    player_rating: ScaledRating,
    totals: PeriodTotals,
) -> f64 {
    player_rating.rating() + new_deviation * new_deviation * totals.adjustment()
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::{
        calculate_estimated_improvement, calculate_estimated_variance, rate_player,
        solve_volatility, VolatilityFunction,
    };
    use crate::glicko2::{Parameters, ScaledRating};
    use crate::math::{self, PeriodTotals};
    use crate::RatingError;

    fn paper_totals() -> PeriodTotals {
        let mut totals = PeriodTotals::default();

        for (rating, deviation, score) in [
            (-0.5756, 0.1727, 1.0),
            (0.2878, 0.5756, 0.0),
            (1.1513, 1.7269, 0.0),
        ] {
            let g = math::g(deviation);
            totals.add(g, math::expectation(g, 0.0, rating), score);
        }

        totals
    }

    #[test]
    fn variance_and_improvement_paper_values() {
        let totals = paper_totals();

        let variance = calculate_estimated_variance(totals);
        assert_approx_eq!(variance, 1.7785, 0.001);

        let improvement = calculate_estimated_improvement(variance, totals);
        assert_approx_eq!(improvement, -0.4834, 0.001);
    }

    #[test]
    fn volatility_function_paper_values() {
        let f = VolatilityFunction::new(-0.4834, 1.7785, 1.1513, 0.06, 0.5);

        assert_approx_eq!(f.a(), -5.62682, 0.00001);
        assert_approx_eq!(f.eval(f.a()), -0.000_535_67, 0.000_000_01);
        assert_approx_eq!(f.eval(f.a() - 0.5), 1.999_675, 0.000_001);
    }

    #[test]
    fn paper_volatility() {
        let f = VolatilityFunction::new(-0.4834, 1.7785, 1.1513, 0.06, 0.5);
        let root = solve_volatility(&f, 0.5, 0.000_001).unwrap();

        assert_approx_eq!(f64::exp(root / 2.0), 0.05999, 0.00001);
    }

    #[test]
    fn paper_rating_period() {
        let parameters = Parameters::default().with_volatility_change(0.5);
        let player = ScaledRating::new(0.0, 200.0 / 173.7178, 0.06).unwrap();

        let rated = rate_player(player, paper_totals(), parameters).unwrap();

        assert_approx_eq!(rated.rating() * 173.7178 + 1500.0, 1464.06, 0.02);
        assert_approx_eq!(rated.deviation() * 173.7178, 151.52, 0.02);
        assert_approx_eq!(rated.volatility(), 0.05999, 0.00001);
    }

    #[test]
    fn empty_period_only_widens() {
        let parameters = Parameters::default();
        let player = ScaledRating::new(0.3, 0.5, 0.06).unwrap();

        let rated = rate_player(player, PeriodTotals::default(), parameters).unwrap();

        assert_eq!(rated.rating(), 0.3);
        assert_eq!(rated.volatility(), 0.06);
        assert_approx_eq!(rated.deviation(), f64::sqrt(0.25 + 0.0036), 1e-12);
    }

    #[test]
    fn non_finite_input_is_degenerate() {
        let f = VolatilityFunction::new(f64::NAN, 1.7785, 1.1513, 0.06, 0.5);

        assert!(matches!(
            solve_volatility(&f, 0.5, 0.000_001),
            Err(RatingError::DegenerateConvergence { .. })
        ));
    }

    #[test]
    fn unreachable_tolerance_is_degenerate() {
        let f = VolatilityFunction::new(-0.4834, 1.7785, 1.1513, 0.06, 0.5);

        assert!(matches!(
            solve_volatility(&f, 0.5, 0.0),
            Err(RatingError::DegenerateConvergence { .. })
        ));
    }

    #[test]
    fn residual_is_below_tolerance_across_grid() {
        let steps = |from: f64, to: f64, n: u32| {
            (0..n).map(move |i| from + (to - from) * f64::from(i) / f64::from(n - 1))
        };

        for estimated_variance in steps(0.05, 20.0, 19) {
            for deviation in steps(0.05, 2.1, 19) {
                for estimated_improvement in steps(-6.0, 6.0, 25) {
                    for volatility_change in [0.3, 0.5, 0.75, 1.2] {
                        let f = VolatilityFunction::new(
                            estimated_improvement,
                            estimated_variance,
                            deviation,
                            0.06,
                            volatility_change,
                        );

                        let root = solve_volatility(&f, volatility_change, 0.000_001).unwrap();

                        assert!(
                            f.eval(root).abs() < 0.000_001,
                            "f({root}) = {} for v = {estimated_variance}, φ = {deviation}, Δ = {estimated_improvement}, τ = {volatility_change}",
                            f.eval(root)
                        );
                    }
                }
            }
        }
    }

    proptest! {
        #[test]
        fn solver_converges(
            volatility in 0.01f64..0.2,
            estimated_variance in 0.05f64..20.0,
            deviation in 0.05f64..2.1,
            estimated_improvement in -6.0f64..6.0,
            volatility_change in 0.3f64..1.2,
        ) {
            let f = VolatilityFunction::new(
                estimated_improvement,
                estimated_variance,
                deviation,
                volatility,
                volatility_change,
            );

            let root = solve_volatility(&f, volatility_change, 0.000_001).unwrap();

            prop_assert!(root.is_finite());
            prop_assert!(f.eval(root).abs() < 0.000_001);
        }
    }
}
