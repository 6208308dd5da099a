//! Duel history and reporting

use arena_core::{Competitor, CompetitorId, Score, SyntheticOpponent};
use serde::{Deserialize, Serialize};

use crate::tournament::TournamentId;

/// Which mode a duel was fought in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DuelKind {
    Friendly,
    Tournament,
    World,
    Tower,
}

/// The second side of a recorded duel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Opponent {
    Roster(CompetitorId),
    Synthetic(SyntheticOpponent),
}

impl Opponent {
    pub fn roster_id(&self) -> Option<&CompetitorId> {
        match self {
            Opponent::Roster(id) => Some(id),
            Opponent::Synthetic(_) => None,
        }
    }
}

/// Record of a single duel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelRecord {
    /// Position in the history, starting at 1
    pub seq: u64,
    pub kind: DuelKind,
    pub first: CompetitorId,
    pub second: Opponent,
    /// Legs from `first`'s point of view
    pub score: Score,
    /// `None` when a synthetic opponent won
    pub winner: Option<CompetitorId>,
    pub favored: Option<CompetitorId>,
    pub tournament: Option<TournamentId>,
}

impl DuelRecord {
    pub fn involves(&self, id: &CompetitorId) -> bool {
        &self.first == id || self.second.roster_id() == Some(id)
    }

    pub fn won_by(&self, id: &CompetitorId) -> bool {
        self.winner.as_ref() == Some(id)
    }

    /// Roster opponent of `id` in this duel, if any.
    pub fn opponent_of(&self, id: &CompetitorId) -> Option<&CompetitorId> {
        if &self.first == id {
            self.second.roster_id()
        } else if self.second.roster_id() == Some(id) {
            Some(&self.first)
        } else {
            None
        }
    }
}

/// Every duel of a session, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    records: Vec<DuelRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, assigning its sequence number.
    pub fn push(&mut self, mut record: DuelRecord) -> &DuelRecord {
        record.seq = self.records.len() as u64 + 1;
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DuelRecord> {
        self.records.iter()
    }

    pub fn for_competitor<'a>(
        &'a self,
        id: &'a CompetitorId,
    ) -> impl Iterator<Item = &'a DuelRecord> + 'a {
        self.records.iter().filter(move |r| r.involves(id))
    }

    pub fn for_tournament(&self, tournament: TournamentId) -> impl Iterator<Item = &DuelRecord> {
        self.records
            .iter()
            .filter(move |r| r.tournament == Some(tournament))
    }

    /// Longest run of consecutive wins in the recorded history.
    pub fn longest_unbeaten_run(&self, id: &CompetitorId) -> u32 {
        let mut best = 0;
        let mut run = 0;
        for record in self.for_competitor(id) {
            if record.won_by(id) {
                run += 1;
                best = best.max(run);
            } else {
                run = 0;
            }
        }
        best
    }

    /// Roster opponent `id` has beaten most often, with the win count.
    ///
    /// Ties go to the rival beaten first.
    pub fn most_beaten_rival(&self, id: &CompetitorId) -> Option<(CompetitorId, u32)> {
        let mut counts: Vec<(CompetitorId, u32)> = Vec::new();
        for record in self.for_competitor(id).filter(|r| r.won_by(id)) {
            let Some(rival) = record.opponent_of(id) else {
                continue;
            };
            match counts.iter_mut().find(|(r, _)| r == rival) {
                Some((_, n)) => *n += 1,
                None => counts.push((rival.clone(), 1)),
            }
        }
        counts
            .into_iter()
            .fold(None, |best: Option<(CompetitorId, u32)>, (rival, n)| match best {
                Some((_, top)) if top >= n => best,
                _ => Some((rival, n)),
            })
    }

    /// Generate a text report of the most recent duels.
    pub fn generate_report(&self, roster: &[Competitor], limit: usize) -> String {
        let name = |id: &CompetitorId| {
            roster
                .iter()
                .find(|c| &c.id == id)
                .map_or_else(|| id.to_string(), |c| c.name.clone())
        };

        let mut report = String::new();
        report.push_str(&format!("=== Duel History ({} duels) ===\n\n", self.len()));
        report.push_str(&format!(
            "{:>5} {:<11} {:<20} vs {:<20} {:>5}  {:<20}\n",
            "#", "Kind", "First", "Second", "Score", "Winner"
        ));
        report.push_str(&"-".repeat(90));
        report.push('\n');

        let skip = self.records.len().saturating_sub(limit);
        for record in self.records.iter().skip(skip) {
            let second = match &record.second {
                Opponent::Roster(id) => name(id),
                Opponent::Synthetic(bot) => bot.name.clone(),
            };
            let winner = match &record.winner {
                Some(id) => name(id),
                None => second.clone(),
            };
            report.push_str(&format!(
                "{:>5} {:<11} {:<20} vs {:<20} {:>2}-{:<2}  {:<20}\n",
                record.seq,
                format!("{:?}", record.kind),
                name(&record.first),
                second,
                record.score.first,
                record.score.second,
                winner
            ));
        }

        report
    }
}
