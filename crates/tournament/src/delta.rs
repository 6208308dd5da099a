//! Competitor mutations produced by processed duels and season cycles.
//!
//! Every change to a competitor's record goes through a [`CompetitorDelta`],
//! so the caller sees exactly what a duel did to the roster.

use arena_core::{Competitor, CompetitorId};
use serde::{Deserialize, Serialize};

use crate::progression::LevelUp;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Change {
    Win { league_points: u32, xp: u32 },
    Loss,
    /// Fought under a favor boost
    Favored,
    WorldDuelWin,
    /// Cleared a tower floor
    TowerFloor(u32),
    LevelUp(LevelUp),
    Championship,
    DivisionMove { from: u32, to: u32 },
    LeaguePointsReset,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorDelta {
    pub competitor: CompetitorId,
    pub change: Change,
}

impl CompetitorDelta {
    pub fn new(competitor: CompetitorId, change: Change) -> Self {
        Self { competitor, change }
    }

    pub fn apply(&self, competitor: &mut Competitor) {
        let stats = &mut competitor.stats;
        match &self.change {
            Change::Win { league_points, xp } => {
                stats.record_win(*league_points);
                competitor.xp += xp;
            }
            Change::Loss => stats.record_loss(),
            Change::Favored => stats.favored_count += 1,
            Change::WorldDuelWin => stats.world_duel_wins += 1,
            Change::TowerFloor(floor) => stats.tower_floor = stats.tower_floor.max(*floor),
            Change::LevelUp(up) => {
                competitor.level = up.to;
                competitor.xp = up.remaining_xp;
                competitor.skills += up.skills_gained;
            }
            Change::Championship => stats.championships += 1,
            Change::DivisionMove { to, .. } => competitor.division = *to,
            Change::LeaguePointsReset => stats.league_points = 0,
        }
    }
}

/// Apply deltas to the matching roster entries. Unknown ids are skipped.
pub fn apply_deltas(roster: &mut [Competitor], deltas: &[CompetitorDelta]) {
    for delta in deltas {
        if let Some(c) = roster.iter_mut().find(|c| c.id == delta.competitor) {
            delta.apply(c);
        }
    }
}
