//! Point tables derived from match results.
//!
//! A won match is worth its score differential to the winner and nothing to
//! the loser. Tables are never stored, only recomputed from the match list.

use serde::{Deserialize, Serialize};

use crate::matches::{Match, Stage};
use crate::model::CompetitorId;

/// Restrict which matches count towards a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsFilter {
    pub stage: Option<Stage>,
    pub group: Option<u32>,
}

impl StandingsFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn stage(stage: Stage) -> Self {
        Self {
            stage: Some(stage),
            group: None,
        }
    }

    pub fn group(group: u32) -> Self {
        Self {
            stage: Some(Stage::Group),
            group: Some(group),
        }
    }

    pub fn accepts(&self, m: &Match) -> bool {
        self.stage.map_or(true, |s| m.stage == s) && self.group.map_or(true, |g| m.group == Some(g))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingEntry {
    pub competitor: CompetitorId,
    pub points: u32,
    pub played: u32,
    pub wins: u32,
}

/// Rank `participants` by points, highest first.
///
/// Equal points keep the order of `participants`. Byes and undecided
/// matches do not count, nor do matches outside the filter.
pub fn standings<'a>(
    participants: &[CompetitorId],
    matches: impl IntoIterator<Item = &'a Match>,
    filter: StandingsFilter,
) -> Vec<StandingEntry> {
    let mut table: Vec<StandingEntry> = participants
        .iter()
        .map(|id| StandingEntry {
            competitor: id.clone(),
            points: 0,
            played: 0,
            wins: 0,
        })
        .collect();

    for m in matches {
        if !filter.accepts(m) || m.is_bye() {
            continue;
        }
        let (Some(winner), Some(score)) = (&m.winner, m.score) else {
            continue;
        };
        for slot in &m.slots {
            let Some(id) = slot.competitor() else {
                continue;
            };
            if let Some(entry) = table.iter_mut().find(|e| &e.competitor == id) {
                entry.played += 1;
                if id == winner {
                    entry.wins += 1;
                    entry.points += score.margin();
                }
            }
        }
    }

    table.sort_by(|a, b| b.points.cmp(&a.points));
    table
}

#[cfg(test)]
#[path = "standings_tests.rs"]
mod standings_tests;
