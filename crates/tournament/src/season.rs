//! Season cycle: league points, champions, promotion and relegation.
//!
//! Every resolved duel counts towards the season. When the count reaches the
//! threshold the season closes: each division is ranked by league points,
//! the top of the highest division is crowned, everyone's points reset and
//! competitors move between neighbouring divisions.

use std::collections::HashSet;

use arena_core::{Competitor, CompetitorId};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::delta::{apply_deltas, Change, CompetitorDelta};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonSettings {
    /// Duels per season
    pub duel_threshold: u32,
    /// Promoted from each division below the top
    pub promote: u32,
    /// Relegated from each division below the top
    pub relegate: u32,
    /// Relegated from division 1
    pub top_flight_relegate: u32,
}

impl Default for SeasonSettings {
    fn default() -> Self {
        Self {
            duel_threshold: 100,
            promote: 2,
            relegate: 2,
            top_flight_relegate: 1,
        }
    }
}

/// One division's final table, best first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionTable {
    pub division: u32,
    pub ranking: Vec<(CompetitorId, u32)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionMove {
    pub competitor: CompetitorId,
    pub from: u32,
    pub to: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonReport {
    pub season: u32,
    pub champion: Option<CompetitorId>,
    pub tables: Vec<DivisionTable>,
    pub moves: Vec<DivisionMove>,
    /// Everyone whose league points are reset
    pub reset: Vec<CompetitorId>,
}

impl SeasonReport {
    /// The roster changes this season close amounts to.
    pub fn deltas(&self) -> Vec<CompetitorDelta> {
        let mut deltas: Vec<CompetitorDelta> = self
            .reset
            .iter()
            .map(|id| CompetitorDelta::new(id.clone(), Change::LeaguePointsReset))
            .collect();
        if let Some(champion) = &self.champion {
            deltas.push(CompetitorDelta::new(champion.clone(), Change::Championship));
        }
        deltas.extend(self.moves.iter().map(|m| {
            CompetitorDelta::new(
                m.competitor.clone(),
                Change::DivisionMove {
                    from: m.from,
                    to: m.to,
                },
            )
        }));
        deltas
    }
}

/// Duel counter and division state of a running season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonCycle {
    pub settings: SeasonSettings,
    pub duel_count: u32,
    pub unlocked_divisions: u32,
    /// Number of the season in progress, starting at 1
    pub season: u32,
}

impl SeasonCycle {
    pub fn new(settings: SeasonSettings, unlocked_divisions: u32) -> Self {
        Self {
            settings,
            duel_count: 0,
            unlocked_divisions: unlocked_divisions.max(1),
            season: 1,
        }
    }

    /// Count a resolved duel. Returns true when the season is due to close.
    pub fn record_duel(&mut self) -> bool {
        self.duel_count += 1;
        self.duel_count >= self.settings.duel_threshold
    }

    /// Rank every unlocked division by league points, best first.
    ///
    /// Equal points keep roster order.
    pub fn tables(&self, roster: &[Competitor]) -> Vec<DivisionTable> {
        (1..=self.unlocked_divisions)
            .map(|division| {
                let mut ranking: Vec<(CompetitorId, u32)> = roster
                    .iter()
                    .filter(|c| c.division == division)
                    .map(|c| (c.id.clone(), c.stats.league_points))
                    .collect();
                ranking.sort_by(|a, b| b.1.cmp(&a.1));
                DivisionTable { division, ranking }
            })
            .collect()
    }

    /// Work out the close of the current season without touching anything.
    ///
    /// Boundaries are processed from the top down. Each competitor moves at
    /// most once; a competitor due both promotion and relegation is promoted.
    pub fn plan(&self, roster: &[Competitor]) -> SeasonReport {
        let tables = self.tables(roster);
        let champion = tables
            .iter()
            .find_map(|t| t.ranking.first())
            .map(|(id, _)| id.clone());

        let mut moves = Vec::new();
        let mut moved: HashSet<CompetitorId> = HashSet::new();

        for pair in tables.windows(2) {
            let (upper, lower) = (&pair[0], &pair[1]);

            let promoted: Vec<CompetitorId> = lower
                .ranking
                .iter()
                .map(|(id, _)| id)
                .filter(|id| !moved.contains(*id))
                .take(self.settings.promote as usize)
                .cloned()
                .collect();

            let relegate_count = if upper.division == 1 {
                self.settings.top_flight_relegate
            } else {
                self.settings.relegate
            };
            let relegated: Vec<CompetitorId> = upper
                .ranking
                .iter()
                .rev()
                .map(|(id, _)| id)
                .filter(|id| !moved.contains(*id))
                .take(relegate_count as usize)
                .cloned()
                .collect();

            for id in promoted {
                moved.insert(id.clone());
                moves.push(DivisionMove {
                    competitor: id,
                    from: lower.division,
                    to: upper.division,
                });
            }
            for id in relegated {
                moved.insert(id.clone());
                moves.push(DivisionMove {
                    competitor: id,
                    from: upper.division,
                    to: lower.division,
                });
            }
        }

        SeasonReport {
            season: self.season,
            champion,
            tables,
            moves,
            reset: roster.iter().map(|c| c.id.clone()).collect(),
        }
    }

    /// Close the season: apply the plan to the roster, reset the counter
    /// and start the next season.
    pub fn run(&mut self, roster: &mut [Competitor]) -> SeasonReport {
        let report = self.plan(roster);
        apply_deltas(roster, &report.deltas());

        info!(
            "Season {} closed after {} duels, champion: {}, {} division move(s)",
            report.season,
            self.duel_count,
            report
                .champion
                .as_ref()
                .map_or_else(|| "none".to_string(), ToString::to_string),
            report.moves.len()
        );

        self.duel_count = 0;
        self.season += 1;
        report
    }
}

#[cfg(test)]
#[path = "season_tests.rs"]
mod season_tests;
