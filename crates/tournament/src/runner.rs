//! Runner for playing whole tournaments and batches of duels

use arena_core::{CompetitorId, Match};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::SessionError;
use crate::season::SeasonReport;
use crate::session::Session;
use crate::tournament::TournamentId;

/// Configuration for a tournament run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Competitor given the favor boost in every match they play
    pub favored: Option<CompetitorId>,
    /// Stop after this many matches even if the tournament is unfinished
    pub max_matches: u32,
    /// Print every match as it is played
    pub verbose: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            favored: None,
            max_matches: 10_000,
            verbose: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub tournament: TournamentId,
    pub matches_played: u32,
    pub winner: Option<CompetitorId>,
    /// Seasons closed by duels of this run
    pub seasons: Vec<SeasonReport>,
}

/// Plays every pending match of a tournament until it finishes
pub struct TournamentRunner {
    config: RunnerConfig,
}

impl TournamentRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Run a tournament to completion.
    ///
    /// Matches are played in creation order; a run also stops when nothing
    /// is left to play.
    pub fn run<R: Rng + ?Sized>(
        &self,
        session: &mut Session,
        tournament: TournamentId,
        rng: &mut R,
    ) -> Result<RunSummary, SessionError> {
        let mut summary = RunSummary {
            tournament,
            matches_played: 0,
            winner: None,
            seasons: Vec::new(),
        };

        while summary.matches_played < self.config.max_matches {
            let t = session
                .tournament(tournament)
                .ok_or(SessionError::UnknownTournament(tournament))?;
            if t.is_finished() {
                break;
            }
            let next = t.pending_matches().first().map(|m| (*m).clone());
            let Some(next) = next else {
                warn!("{} has no playable match left but is not finished", tournament);
                break;
            };

            let favored = self.favored_in(&next);
            let play = session.play_tournament_match(tournament, next.id, favored, rng)?;
            summary.matches_played += 1;

            if let Some(duel) = play.duel {
                if self.config.verbose {
                    let (home, away) = next
                        .competitors()
                        .map(|(h, a)| (h.as_str(), a.as_str()))
                        .unwrap_or(("?", "?"));
                    println!(
                        "Match {} ({:?} round {}): {} {}-{} {}",
                        next.id,
                        next.stage,
                        next.round + 1,
                        home,
                        duel.record.score.first,
                        duel.record.score.second,
                        away
                    );
                }
                summary.seasons.extend(duel.season);
            }
        }

        summary.winner = session
            .tournament(tournament)
            .and_then(|t| t.winner().cloned());
        info!(
            "{} done after {} matches, winner: {}",
            tournament,
            summary.matches_played,
            summary.winner.as_ref().map_or("none", |w| w.as_str())
        );
        Ok(summary)
    }

    fn favored_in(&self, m: &Match) -> Option<&CompetitorId> {
        self.config.favored.as_ref().filter(|f| m.involves(f))
    }
}

/// Quick utility to run a tournament quietly
pub fn quick_run<R: Rng + ?Sized>(
    session: &mut Session,
    tournament: TournamentId,
    rng: &mut R,
) -> Result<RunSummary, SessionError> {
    let config = RunnerConfig {
        verbose: false,
        ..Default::default()
    };
    TournamentRunner::new(config).run(session, tournament, rng)
}

/// Play `count` random duels, returning the seasons they closed.
pub fn play_random_duels<R: Rng + ?Sized>(
    session: &mut Session,
    count: u32,
    rng: &mut R,
) -> Result<Vec<SeasonReport>, SessionError> {
    let mut seasons = Vec::new();
    for _ in 0..count {
        let report = session.random_duel(rng)?;
        seasons.extend(report.season);
    }
    Ok(seasons)
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod runner_tests;
