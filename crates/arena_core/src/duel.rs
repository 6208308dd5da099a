//! Best-of-five duel resolution.
//!
//! Every competition mode funnels its contests through [`fight`]: a win
//! probability is computed from the two contenders and the situational
//! modifiers, then up to five independent legs are played until one side
//! has taken three.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::model::Contender;

/// Probability shift per level of difference
pub const LEVEL_PROB_BOOST: f64 = 0.02;
/// Probability shift per skill of difference
pub const SKILL_PROB_BOOST: f64 = 0.02;
/// Probability shift for the favored side
pub const FAVOR_PROB_BOOST: f64 = 0.05;
/// Probability shift for the inspired side
pub const INSPIRED_PROB_BOOST: f64 = 0.05;
/// Chance that one of the two sides is inspired in a given duel
pub const INSPIRED_CHANCE: f64 = 0.05;

pub const MIN_WIN_PROBABILITY: f64 = 0.10;
pub const MAX_WIN_PROBABILITY: f64 = 0.90;

/// Maximum number of legs in a duel
pub const DUEL_LEGS: u8 = 5;
/// Legs needed to take the duel
pub const LEGS_TO_WIN: u8 = 3;

/// Which of the two contenders of a duel (or slots of a match).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    First,
    Second,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Side::First => 0,
            Side::Second => 1,
        }
    }

    pub fn from_index(idx: usize) -> Option<Side> {
        match idx {
            0 => Some(Side::First),
            1 => Some(Side::Second),
            _ => None,
        }
    }
}

/// Situational modifiers applied on top of level and skill difference.
///
/// A single `Option<Side>` per modifier makes "both sides favored" and
/// "both sides inspired" unrepresentable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelModifiers {
    pub favored: Option<Side>,
    pub inspired: Option<Side>,
}

impl DuelModifiers {
    pub fn favoring(side: Side) -> Self {
        Self {
            favored: Some(side),
            inspired: None,
        }
    }

    /// Replace the inspired side with a fresh roll.
    pub fn roll_inspiration<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        self.inspired = roll_inspired_side(rng);
        self
    }
}

/// Roll whether a side is inspired for this duel, and which one.
pub fn roll_inspired_side<R: Rng + ?Sized>(rng: &mut R) -> Option<Side> {
    if rng.gen::<f64>() >= INSPIRED_CHANCE {
        return None;
    }
    if rng.gen::<f64>() < 0.5 {
        Some(Side::First)
    } else {
        Some(Side::Second)
    }
}

/// Probability that the first contender takes any single leg.
///
/// Always within `[MIN_WIN_PROBABILITY, MAX_WIN_PROBABILITY]`, so no duel is
/// ever decided before it is played.
pub fn win_probability(first: &Contender, second: &Contender, modifiers: &DuelModifiers) -> f64 {
    let level_diff = first.level() as f64 - second.level() as f64;
    let skill_diff = first.skills() as f64 - second.skills() as f64;
    let mut prob = 0.5 + level_diff * LEVEL_PROB_BOOST + skill_diff * SKILL_PROB_BOOST;

    match modifiers.favored {
        Some(Side::First) => prob += FAVOR_PROB_BOOST,
        Some(Side::Second) => prob -= FAVOR_PROB_BOOST,
        None => {}
    }
    match modifiers.inspired {
        Some(Side::First) => prob += INSPIRED_PROB_BOOST,
        Some(Side::Second) => prob -= INSPIRED_PROB_BOOST,
        None => {}
    }

    prob.clamp(MIN_WIN_PROBABILITY, MAX_WIN_PROBABILITY)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("{first}-{second} is not a valid best-of-five score")]
    Invalid { first: u8, second: u8 },
}

/// Legs won by each side of a duel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Score {
    pub first: u8,
    pub second: u8,
}

impl Score {
    pub fn new(first: u8, second: u8) -> Self {
        Self { first, second }
    }

    /// Check this is a finished best-of-five score and return the winning side.
    ///
    /// Valid scores are 3-0, 3-1 and 3-2 in either order.
    pub fn validate(self) -> Result<Side, ScoreError> {
        match (self.first, self.second) {
            (LEGS_TO_WIN, s) if s < LEGS_TO_WIN => Ok(Side::First),
            (s, LEGS_TO_WIN) if s < LEGS_TO_WIN => Ok(Side::Second),
            _ => Err(ScoreError::Invalid {
                first: self.first,
                second: self.second,
            }),
        }
    }

    /// Absolute score differential, the league points a win is worth.
    pub fn margin(self) -> u32 {
        (self.first as i32 - self.second as i32).unsigned_abs()
    }

    pub fn swapped(self) -> Score {
        Score {
            first: self.second,
            second: self.first,
        }
    }

    pub fn get(self, side: Side) -> u8 {
        match side {
            Side::First => self.first,
            Side::Second => self.second,
        }
    }
}

/// Result of a played duel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuelOutcome {
    pub winner: Side,
    pub score: Score,
    /// Winner of each leg in play order, for playback
    pub legs: Vec<Side>,
    /// Per-leg probability of the first side
    pub probability: f64,
    pub modifiers: DuelModifiers,
}

/// Play legs at a fixed probability until one side reaches three.
pub fn play_legs<R: Rng + ?Sized>(probability: f64, rng: &mut R) -> (Vec<Side>, Score) {
    let mut legs = Vec::with_capacity(DUEL_LEGS as usize);
    let mut score = Score::new(0, 0);

    for _ in 0..DUEL_LEGS {
        let leg_winner = if rng.gen::<f64>() < probability {
            score.first += 1;
            Side::First
        } else {
            score.second += 1;
            Side::Second
        };
        legs.push(leg_winner);
        if score.first == LEGS_TO_WIN || score.second == LEGS_TO_WIN {
            break;
        }
    }

    (legs, score)
}

/// Resolve a duel with fully specified modifiers.
pub fn resolve<R: Rng + ?Sized>(
    first: &Contender,
    second: &Contender,
    modifiers: DuelModifiers,
    rng: &mut R,
) -> DuelOutcome {
    let probability = win_probability(first, second, &modifiers);
    let (legs, score) = play_legs(probability, rng);
    let winner = if score.first > score.second {
        Side::First
    } else {
        Side::Second
    };

    debug!(
        "Duel {} vs {}: p={:.2} score {}-{}",
        first.name(),
        second.name(),
        probability,
        score.first,
        score.second
    );

    DuelOutcome {
        winner,
        score,
        legs,
        probability,
        modifiers,
    }
}

/// Fight a duel: roll inspiration, then resolve.
pub fn fight<R: Rng + ?Sized>(
    first: &Contender,
    second: &Contender,
    favored: Option<Side>,
    rng: &mut R,
) -> DuelOutcome {
    let modifiers = favored
        .map_or_else(DuelModifiers::default, DuelModifiers::favoring)
        .roll_inspiration(rng);
    resolve(first, second, modifiers, rng)
}

#[cfg(test)]
#[path = "duel_tests.rs"]
mod duel_tests;
