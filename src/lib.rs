//! This crate computes skill ratings for pairwise competitions (wins, losses, draws) with three related methods:
//!
//! * [`elo`]: the classic multiplicative Elo system. Every game is rated immediately and on its own.
//! * [`glicko`]: [Glicko](http://www.glicko.net/glicko/glicko.pdf), which also tracks a rating deviation
//!   and weighs every opponent by how reliable their own rating is.
//! * [`glicko2`]: [Glicko-2](http://www.glicko.net/glicko/glicko2.pdf), which additionally tracks a volatility
//!   that describes how consistently a player performs.
//!
//! Glicko and Glicko-2 are designed around rating periods.
//! Every result is frozen against the player's rating at the start of the current period,
//! and each win/loss/draw recomputes the rating from the whole period so far.
//! The caller decides when a period ends by calling `new_period`.
//!
//! The crate is pure computation: no I/O, no shared state, no threads.
//! Each player owns its own state, and opponents are always passed as value snapshots.
//! A match between two players therefore needs two calls, one per side:
//!
//! ```
//! use pairwise_rating::glicko2::{Parameters, Player};
//!
//! let mut alice = Player::new(Parameters::default())?;
//! let mut bob = Player::new(Parameters::default())?;
//!
//! // Take both snapshots before updating either side.
//! let (alice_before, bob_before) = (alice.snapshot(), bob.snapshot());
//!
//! let outcome = alice.win(bob_before)?;
//! bob.lose(alice_before)?;
//!
//! assert!(outcome.rating_delta() > 0.0);
//! # Ok::<(), pairwise_rating::RatingError>(())
//! ```

#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![deny(
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
    rustdoc::invalid_codeblock_attributes,
    rustdoc::invalid_rust_codeblocks
)]
#![forbid(unsafe_code)]

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(test)]
macro_rules! assert_approx_eq {
    ($a:expr, $b:expr, $tolerance:expr) => {{
        let a_val = $a;
        let b_val = $b;

        assert!(
            (a_val - b_val).abs() <= $tolerance,
            "{} = {a_val} is not approximately equal to {} = {b_val}",
            stringify!($a),
            stringify!($b)
        )
    }};
}

pub mod algorithm;
pub mod constants;
pub mod elo;
mod error;
pub mod glicko;
pub mod glicko2;
pub mod math;
pub mod util;

pub use error::{RatingError, Result};

/// The outcome of a single game from one player's point of view.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MatchResult {
    Win,
    Draw,
    Loss,
}

impl MatchResult {
    /// The realised score: `1.0` for a win, `0.5` for a draw and `0.0` for a loss.
    #[must_use]
    pub fn score(self) -> f64 {
        match self {
            MatchResult::Win => 1.0,
            MatchResult::Draw => 0.5,
            MatchResult::Loss => 0.0,
        }
    }

    /// The same game from the opponent's point of view.
    #[must_use]
    pub fn invert(self) -> Self {
        match self {
            MatchResult::Win => MatchResult::Loss,
            MatchResult::Draw => MatchResult::Draw,
            MatchResult::Loss => MatchResult::Win,
        }
    }
}

/// Integer result codes: `0` is a win, `1` a loss and `2` a draw.
impl TryFrom<i32> for MatchResult {
    type Error = RatingError;

    fn try_from(code: i32) -> Result<Self> {
        match code {
            0 => Ok(MatchResult::Win),
            1 => Ok(MatchResult::Loss),
            2 => Ok(MatchResult::Draw),
            code => Err(RatingError::InvalidResult { code }),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::{MatchResult, RatingError};

    #[test]
    fn scores() {
        assert_eq!(MatchResult::Win.score(), 1.0);
        assert_eq!(MatchResult::Draw.score(), 0.5);
        assert_eq!(MatchResult::Loss.score(), 0.0);
    }

    #[test]
    fn invert_is_symmetric() {
        for result in [MatchResult::Win, MatchResult::Draw, MatchResult::Loss] {
            assert_eq!(result.invert().invert(), result);
            assert_eq!(result.score() + result.invert().score(), 1.0);
        }
    }

    #[test]
    fn result_codes() {
        assert_eq!(MatchResult::try_from(0), Ok(MatchResult::Win));
        assert_eq!(MatchResult::try_from(1), Ok(MatchResult::Loss));
        assert_eq!(MatchResult::try_from(2), Ok(MatchResult::Draw));
        assert_eq!(
            MatchResult::try_from(3),
            Err(RatingError::InvalidResult { code: 3 })
        );
        assert_eq!(
            MatchResult::try_from(-1),
            Err(RatingError::InvalidResult { code: -1 })
        );
    }
}
