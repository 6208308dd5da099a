//! Matches and the arena that owns them.
//!
//! Matches refer to each other only through [`MatchId`]s (`feeds_into`,
//! `partner`), so a whole bracket is a flat, serializable list that can be
//! mutated one result at a time.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::duel::{Score, Side};
use crate::model::CompetitorId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(pub u32);

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One of the two places in a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slot {
    /// Waiting for the winner of an earlier match
    Open,
    /// No opponent; the other side advances automatically
    Bye,
    Filled(CompetitorId),
}

impl Slot {
    pub fn competitor(&self) -> Option<&CompetitorId> {
        match self {
            Slot::Filled(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Slot::Open)
    }

    pub fn is_bye(&self) -> bool {
        matches!(self, Slot::Bye)
    }
}

/// Phase of a tournament a match belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Group,
    League,
    Knockout,
}

/// Leg of a two-legged knockout tie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Leg {
    First,
    Second,
    /// Extra match played when both legs leave the aggregate level
    Decider,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub slots: [Slot; 2],
    pub winner: Option<CompetitorId>,
    /// Scores in slot order
    pub score: Option<Score>,
    pub round: u32,
    pub position: u32,
    /// Match whose open slot this match's winner fills
    pub feeds_into: Option<MatchId>,
    pub stage: Stage,
    pub group: Option<u32>,
    pub leg: Option<Leg>,
    /// The other leg of the same tie (for a decider: the tie's second leg)
    pub partner: Option<MatchId>,
}

impl Match {
    pub fn new(id: MatchId, stage: Stage, round: u32, position: u32) -> Self {
        Self {
            id,
            slots: [Slot::Open, Slot::Open],
            winner: None,
            score: None,
            round,
            position,
            feeds_into: None,
            stage,
            group: None,
            leg: None,
            partner: None,
        }
    }

    pub fn is_decided(&self) -> bool {
        self.winner.is_some()
    }

    pub fn is_bye(&self) -> bool {
        self.slots.iter().any(Slot::is_bye)
    }

    /// Both competitors known and no result yet.
    pub fn is_playable(&self) -> bool {
        !self.is_decided() && self.competitors().is_some()
    }

    pub fn competitors(&self) -> Option<(&CompetitorId, &CompetitorId)> {
        Some((self.slots[0].competitor()?, self.slots[1].competitor()?))
    }

    pub fn side_of(&self, id: &CompetitorId) -> Option<Side> {
        self.slots
            .iter()
            .position(|slot| slot.competitor() == Some(id))
            .and_then(Side::from_index)
    }

    pub fn involves(&self, id: &CompetitorId) -> bool {
        self.side_of(id).is_some()
    }

    /// Put a competitor into the first open slot. Returns the side used.
    pub fn fill_open_slot(&mut self, id: CompetitorId) -> Option<Side> {
        let idx = self.slots.iter().position(Slot::is_open)?;
        self.slots[idx] = Slot::Filled(id);
        Side::from_index(idx)
    }

    /// `(own, opponent)` legs for a competitor in a decided match.
    pub fn score_for(&self, id: &CompetitorId) -> Option<(u8, u8)> {
        let side = self.side_of(id)?;
        let score = self.score?;
        Some((score.get(side), score.get(side.other())))
    }
}

/// Flat store of matches, indexed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchArena {
    matches: Vec<Match>,
}

impl MatchArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new open match and hand it back for setup.
    pub fn create(&mut self, stage: Stage, round: u32, position: u32) -> &mut Match {
        let id = MatchId(self.matches.len() as u32);
        self.matches.push(Match::new(id, stage, round, position));
        let idx = self.matches.len() - 1;
        &mut self.matches[idx]
    }

    pub fn get(&self, id: MatchId) -> Option<&Match> {
        self.matches.get(id.0 as usize).filter(|m| m.id == id)
    }

    pub fn get_mut(&mut self, id: MatchId) -> Option<&mut Match> {
        self.matches.get_mut(id.0 as usize).filter(|m| m.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Match> {
        self.matches.iter()
    }

    pub fn in_stage(&self, stage: Stage) -> impl Iterator<Item = &Match> {
        self.matches.iter().filter(move |m| m.stage == stage)
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Id the next created match will receive.
    pub fn next_id(&self) -> MatchId {
        MatchId(self.matches.len() as u32)
    }
}

#[cfg(test)]
#[path = "matches_tests.rs"]
mod matches_tests;
