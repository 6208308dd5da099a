//! Competitors and the contenders a duel can be fought between.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// How many recent results a competitor remembers for form display.
pub const RECENT_RESULTS: usize = 5;

/// Stable identifier of a competitor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompetitorId(pub String);

impl CompetitorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompetitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CompetitorId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CompetitorId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Rarity tier of a competitor. Rarer competitors level up faster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rarity {
    #[default]
    Normal,
    Eccentric,
    Supreme,
    Legendary,
}

impl Rarity {
    /// Experience multiplier applied to every win.
    pub fn xp_multiplier(self) -> u32 {
        match self {
            Rarity::Normal => 1,
            Rarity::Eccentric => 2,
            Rarity::Supreme => 3,
            Rarity::Legendary => 4,
        }
    }

    /// Roll the rarity of a newly created competitor.
    ///
    /// 1% Legendary, 2% Supreme, 5% Eccentric, Normal otherwise.
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let roll: f64 = rng.gen();
        if roll < 0.01 {
            Rarity::Legendary
        } else if roll < 0.03 {
            Rarity::Supreme
        } else if roll < 0.08 {
            Rarity::Eccentric
        } else {
            Rarity::Normal
        }
    }
}

/// Single-duel outcome from one competitor's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Form {
    Win,
    Loss,
}

/// Running counters for a competitor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorStats {
    pub wins: u32,
    pub losses: u32,
    /// Sum of score differentials of won duels in the current season
    pub league_points: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub championships: u32,
    pub world_duel_wins: u32,
    /// Number of duels fought while under a favor boost
    pub favored_count: u32,
    /// Highest tower floor cleared
    pub tower_floor: u32,
    /// Most recent results, newest last
    pub recent: VecDeque<Form>,
}

impl CompetitorStats {
    pub fn total_duels(&self) -> u32 {
        self.wins + self.losses
    }

    /// Fraction of duels won, 0.0 when nothing has been played.
    pub fn win_rate(&self) -> f64 {
        let total = self.total_duels();
        if total == 0 {
            return 0.0;
        }
        self.wins as f64 / total as f64
    }

    pub fn record_win(&mut self, league_points: u32) {
        self.wins += 1;
        self.league_points += league_points;
        self.current_streak += 1;
        self.longest_streak = self.longest_streak.max(self.current_streak);
        self.push_form(Form::Win);
    }

    pub fn record_loss(&mut self) {
        self.losses += 1;
        self.current_streak = 0;
        self.push_form(Form::Loss);
    }

    fn push_form(&mut self, form: Form) {
        self.recent.push_back(form);
        while self.recent.len() > RECENT_RESULTS {
            self.recent.pop_front();
        }
    }
}

/// A persistent competitor on the ladder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: CompetitorId,
    pub name: String,
    pub level: u32,
    pub xp: u32,
    /// Number of skills learned; a proxy for combat strength
    pub skills: u32,
    pub rarity: Rarity,
    /// League division, 1 is the top flight
    pub division: u32,
    pub stats: CompetitorStats,
}

impl Competitor {
    pub fn new(id: impl Into<CompetitorId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            level: 1,
            xp: 0,
            skills: 0,
            rarity: Rarity::Normal,
            division: 1,
            stats: CompetitorStats::default(),
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level.max(1);
        self
    }

    pub fn with_skills(mut self, skills: u32) -> Self {
        self.skills = skills;
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn with_division(mut self, division: u32) -> Self {
        self.division = division.max(1);
        self
    }
}

/// A throwaway opponent that only exists for the duration of one duel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticOpponent {
    pub name: String,
    pub level: u32,
    pub skills: u32,
}

impl SyntheticOpponent {
    pub fn new(name: impl Into<String>, level: u32, skills: u32) -> Self {
        Self {
            name: name.into(),
            level,
            skills,
        }
    }
}

/// One side of a duel: a roster competitor or a synthetic opponent.
#[derive(Debug, Clone, Copy)]
pub enum Contender<'a> {
    Real(&'a Competitor),
    Synthetic(&'a SyntheticOpponent),
}

impl<'a> Contender<'a> {
    pub fn level(&self) -> u32 {
        match self {
            Contender::Real(c) => c.level,
            Contender::Synthetic(s) => s.level,
        }
    }

    pub fn skills(&self) -> u32 {
        match self {
            Contender::Real(c) => c.skills,
            Contender::Synthetic(s) => s.skills,
        }
    }

    /// Roster id, `None` for synthetic opponents.
    pub fn id(&self) -> Option<&'a CompetitorId> {
        match self {
            Contender::Real(c) => Some(&c.id),
            Contender::Synthetic(_) => None,
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            Contender::Real(c) => &c.name,
            Contender::Synthetic(s) => &s.name,
        }
    }
}

impl<'a> From<&'a Competitor> for Contender<'a> {
    fn from(c: &'a Competitor) -> Self {
        Contender::Real(c)
    }
}

impl<'a> From<&'a SyntheticOpponent> for Contender<'a> {
    fn from(s: &'a SyntheticOpponent) -> Self {
        Contender::Synthetic(s)
    }
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod model_tests;
