//! Tournament state machine.
//!
//! A tournament is laid out in full when it is created and then moves
//! forward one result at a time. After every applied result the completion
//! checks for its format run again: a finished league or group stage seeds
//! the playoff, a decided final finishes the tournament. The checks look at
//! the match list only, so running them twice changes nothing.

use std::collections::BTreeMap;
use std::fmt;

use arena_core::{
    build_groups, build_knockout, build_round_robin, settle_tie, standings, tie_status,
    CompetitorId, Match, MatchArena, MatchId, Score, Side, Stage, StandingEntry, StandingsFilter,
    TieProgress, TieStatus,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::TournamentError;
use crate::format::{Format, FormatSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TournamentId(pub u32);

impl fmt::Display for TournamentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TournamentStatus {
    Active,
    Finished,
}

/// A finished duel, reported from `first`'s point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    pub first: CompetitorId,
    pub second: CompetitorId,
    pub score: Score,
}

impl MatchReport {
    pub fn new(
        first: impl Into<CompetitorId>,
        second: impl Into<CompetitorId>,
        first_score: u8,
        second_score: u8,
    ) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
            score: Score::new(first_score, second_score),
        }
    }
}

/// Why a result was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IgnoreReason {
    /// The same result was already recorded
    AlreadyApplied,
    /// The match already has a different result
    AlreadyDecided,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedResult {
    pub match_id: MatchId,
    pub stage: Stage,
    pub winner: CompetitorId,
    pub loser: CompetitorId,
    /// Score in slot order
    pub score: Score,
    pub decider_scheduled: Option<MatchId>,
    /// Stage appended because this result completed the previous one
    pub stage_generated: Option<Stage>,
    /// Tournament winner, when this result finished the tournament
    pub finished: Option<CompetitorId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplyOutcome {
    Applied(AppliedResult),
    Ignored(IgnoreReason),
}

impl ApplyOutcome {
    pub fn applied(&self) -> Option<&AppliedResult> {
        match self {
            ApplyOutcome::Applied(result) => Some(result),
            ApplyOutcome::Ignored(_) => None,
        }
    }
}

#[derive(Debug, Default)]
struct Progress {
    stage_generated: Option<Stage>,
    finished: Option<CompetitorId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub format: Format,
    pub settings: FormatSettings,
    pub participants: Vec<CompetitorId>,
    matches: MatchArena,
    /// Group rosters in group-id order (groups format only)
    groups: Vec<Vec<CompetitorId>>,
    /// Anchor of the final tie once a knockout exists
    final_tie: Option<MatchId>,
    status: TournamentStatus,
    winner: Option<CompetitorId>,
}

impl Tournament {
    /// Lay out a new tournament. Rejects bad settings and rosters without
    /// creating anything.
    pub fn create(
        id: TournamentId,
        name: impl Into<String>,
        format: Format,
        settings: FormatSettings,
        participants: Vec<CompetitorId>,
    ) -> Result<Self, TournamentError> {
        settings.validate(format)?;

        let mut tournament = Self {
            id,
            name: name.into(),
            format,
            settings,
            participants,
            matches: MatchArena::new(),
            groups: Vec::new(),
            final_tie: None,
            status: TournamentStatus::Active,
            winner: None,
        };

        match format {
            Format::Knockout => {
                let bracket = build_knockout(
                    &mut tournament.matches,
                    &tournament.participants,
                    settings.two_legged,
                )?;
                tournament.final_tie = Some(bracket.final_tie);
            }
            Format::League | Format::LeagueThenPlayoff => {
                build_round_robin(
                    &mut tournament.matches,
                    &tournament.participants,
                    settings.legs,
                    Stage::League,
                    None,
                )?;
            }
            Format::GroupsThenPlayoff => {
                tournament.groups = build_groups(
                    &mut tournament.matches,
                    &tournament.participants,
                    settings.groups,
                    settings.legs,
                )?;
            }
        }

        // Groups of one have nothing to play, so the playoff may be due already
        tournament.check_progress()?;

        info!(
            "Created tournament {} '{}' ({}) with {} participants and {} matches",
            tournament.id,
            tournament.name,
            format,
            tournament.participants.len(),
            tournament.matches.len()
        );
        Ok(tournament)
    }

    pub fn status(&self) -> TournamentStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status == TournamentStatus::Finished
    }

    pub fn winner(&self) -> Option<&CompetitorId> {
        self.winner.as_ref()
    }

    pub fn matches(&self) -> &MatchArena {
        &self.matches
    }

    pub fn get_match(&self, id: MatchId) -> Option<&Match> {
        self.matches.get(id)
    }

    pub fn groups(&self) -> &[Vec<CompetitorId>] {
        &self.groups
    }

    pub fn final_tie(&self) -> Option<MatchId> {
        self.final_tie
    }

    /// Matches that can be played right now, in creation order.
    pub fn pending_matches(&self) -> Vec<&Match> {
        self.matches.iter().filter(|m| m.is_playable()).collect()
    }

    pub fn standings(&self, filter: StandingsFilter) -> Vec<StandingEntry> {
        standings(&self.participants, self.matches.iter(), filter)
    }

    /// Matches of a stage grouped by round index.
    pub fn rounds(&self, stage: Stage) -> BTreeMap<u32, Vec<&Match>> {
        let mut rounds: BTreeMap<u32, Vec<&Match>> = BTreeMap::new();
        for m in self.matches.in_stage(stage) {
            rounds.entry(m.round).or_default().push(m);
        }
        rounds
    }

    /// Record a finished duel for a match and move the tournament forward.
    ///
    /// The reported pair must be the match's pair, in either order; anything
    /// else is rejected untouched. A second result for a decided match is
    /// ignored.
    pub fn apply_result(
        &mut self,
        match_id: MatchId,
        report: &MatchReport,
    ) -> Result<ApplyOutcome, TournamentError> {
        let m = self
            .matches
            .get(match_id)
            .ok_or(TournamentError::UnknownMatch(match_id))?;
        report.score.validate()?;

        let Some((home, away)) = m.competitors() else {
            warn!("Result for match {} before both slots are filled", match_id);
            return Err(TournamentError::MatchNotReady(match_id));
        };
        let score = if *home == report.first && *away == report.second {
            report.score
        } else if *home == report.second && *away == report.first {
            report.score.swapped()
        } else {
            warn!(
                "Rejected result {} vs {} for match {} ({} vs {})",
                report.first, report.second, match_id, home, away
            );
            return Err(TournamentError::PairMismatch {
                match_id,
                first: report.first.clone(),
                second: report.second.clone(),
            });
        };

        if let Some(existing) = m.score {
            let reason = if existing == score {
                debug!("Match {} already has this result, ignoring", match_id);
                IgnoreReason::AlreadyApplied
            } else {
                warn!(
                    "Match {} already decided {}-{}, ignoring {}-{}",
                    match_id, existing.first, existing.second, score.first, score.second
                );
                IgnoreReason::AlreadyDecided
            };
            return Ok(ApplyOutcome::Ignored(reason));
        }

        let side = score.validate()?;
        let (winner, loser) = match side {
            Side::First => (home.clone(), away.clone()),
            Side::Second => (away.clone(), home.clone()),
        };
        let stage = m.stage;

        if let Some(m) = self.matches.get_mut(match_id) {
            m.winner = Some(winner.clone());
            m.score = Some(score);
        }
        debug!(
            "Match {} in {}: {} beat {} {}-{}",
            match_id, self.id, winner, loser, score.first, score.second
        );

        let mut decider_scheduled = None;
        if stage == Stage::Knockout {
            match settle_tie(&mut self.matches, match_id) {
                TieProgress::DeciderScheduled(decider) => {
                    info!(
                        "Tie level on aggregate in {}, decider {} scheduled",
                        self.id, decider
                    );
                    decider_scheduled = Some(decider);
                }
                TieProgress::Advanced {
                    winner,
                    into: Some(next),
                    ..
                } => debug!("{} advances to match {}", winner, next),
                _ => {}
            }
        }

        let progress = self.check_progress()?;
        Ok(ApplyOutcome::Applied(AppliedResult {
            match_id,
            stage,
            winner,
            loser,
            score,
            decider_scheduled,
            stage_generated: progress.stage_generated,
            finished: progress.finished,
        }))
    }

    fn stage_complete(&self, stage: Stage) -> bool {
        self.matches.in_stage(stage).all(Match::is_decided)
    }

    fn has_knockout(&self) -> bool {
        self.matches.in_stage(Stage::Knockout).next().is_some()
    }

    fn check_progress(&mut self) -> Result<Progress, TournamentError> {
        let mut progress = Progress::default();
        if self.is_finished() {
            return Ok(progress);
        }

        match self.format {
            Format::Knockout => self.check_final(&mut progress),
            Format::League => {
                if self.stage_complete(Stage::League) {
                    let top = self
                        .standings(StandingsFilter::stage(Stage::League))
                        .into_iter()
                        .next();
                    if let Some(top) = top {
                        self.finish(top.competitor, &mut progress);
                    }
                }
            }
            Format::LeagueThenPlayoff => {
                if self.has_knockout() {
                    self.check_final(&mut progress);
                } else if self.stage_complete(Stage::League) {
                    let cutoff = self.settings.knockout_cutoff as usize;
                    let qualifiers: Vec<CompetitorId> = self
                        .standings(StandingsFilter::stage(Stage::League))
                        .into_iter()
                        .take(cutoff)
                        .map(|e| e.competitor)
                        .collect();
                    self.start_playoff(qualifiers, &mut progress)?;
                }
            }
            Format::GroupsThenPlayoff => {
                if self.has_knockout() {
                    self.check_final(&mut progress);
                } else if self.stage_complete(Stage::Group) {
                    let qualifiers = self.group_qualifiers();
                    self.start_playoff(qualifiers, &mut progress)?;
                }
            }
        }
        Ok(progress)
    }

    /// Top finishers of every group, concatenated in group order.
    fn group_qualifiers(&self) -> Vec<CompetitorId> {
        let take = self.settings.advance_per_group as usize;
        let mut qualifiers = Vec::new();
        for (group, members) in self.groups.iter().enumerate() {
            let table = standings(
                members,
                self.matches.iter(),
                StandingsFilter::group(group as u32),
            );
            qualifiers.extend(table.into_iter().take(take).map(|e| e.competitor));
        }
        qualifiers
    }

    fn start_playoff(
        &mut self,
        qualifiers: Vec<CompetitorId>,
        progress: &mut Progress,
    ) -> Result<(), TournamentError> {
        match qualifiers.as_slice() {
            [] => {
                warn!("No qualifiers for the playoff of {}", self.id);
            }
            [only] => {
                let only = only.clone();
                self.finish(only, progress);
            }
            _ => {
                let bracket =
                    build_knockout(&mut self.matches, &qualifiers, self.settings.two_legged)?;
                self.final_tie = Some(bracket.final_tie);
                progress.stage_generated = Some(Stage::Knockout);
                info!(
                    "Playoff of {} seeded with {} qualifiers over {} rounds",
                    self.id,
                    qualifiers.len(),
                    bracket.rounds
                );
            }
        }
        Ok(())
    }

    fn check_final(&mut self, progress: &mut Progress) {
        let Some(final_tie) = self.final_tie else {
            return;
        };
        if let TieStatus::Decided(winner) = tie_status(&self.matches, final_tie) {
            self.finish(winner, progress);
        }
    }

    fn finish(&mut self, winner: CompetitorId, progress: &mut Progress) {
        info!("Tournament {} '{}' won by {}", self.id, self.name, winner);
        self.status = TournamentStatus::Finished;
        self.winner = Some(winner.clone());
        progress.finished = Some(winner);
    }
}

#[cfg(test)]
#[path = "tournament_tests.rs"]
mod tournament_tests;
