//! The session: one ladder with its roster, tournaments, season and history.
//!
//! All modes feed their duels through the same path, which turns a result
//! into competitor deltas, records it, and counts it towards the season.
//! Several sessions can live side by side; nothing here is global.

use arena_core::{
    fight, Competitor, CompetitorId, Contender, DuelOutcome, MatchId, Rarity, Score, Side,
    SyntheticOpponent,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ArenaConfig;
use crate::delta::{apply_deltas, Change, CompetitorDelta};
use crate::error::{ConfigError, SessionError, TournamentError};
use crate::format::{Format, FormatSettings};
use crate::history::{DuelKind, DuelRecord, History, Opponent};
use crate::progression::{check_level_up, win_xp};
use crate::season::{SeasonCycle, SeasonReport};
use crate::stats::{leaderboard, Leaderboard, LeaderboardRow};
use crate::tournament::{ApplyOutcome, IgnoreReason, MatchReport, Tournament, TournamentId};

/// Names given to world-duel opponents, suffixed with "(Bot)"
pub const WORLD_BOT_NAMES: [&str; 6] = ["Shadow", "Golem", "Druid", "Archer", "Viper", "Titan"];

/// Everything one processed duel did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuelReport {
    pub record: DuelRecord,
    /// Leg-by-leg outcome; absent for results reported from outside
    pub outcome: Option<DuelOutcome>,
    pub deltas: Vec<CompetitorDelta>,
    /// Set when this duel closed the season
    pub season: Option<SeasonReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentPlay {
    pub outcome: ApplyOutcome,
    /// `None` when the result was ignored
    pub duel: Option<DuelReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerReport {
    pub competitor: CompetitorId,
    pub floors_cleared: u32,
    pub reached_top: bool,
    pub duels: Vec<DuelReport>,
}

/// A finished duel on its way into the books.
struct DuelEntry {
    kind: DuelKind,
    first: CompetitorId,
    second: Opponent,
    /// From `first`'s point of view
    score: Score,
    favored: Option<CompetitorId>,
    tournament: Option<TournamentId>,
    outcome: Option<DuelOutcome>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub config: ArenaConfig,
    roster: Vec<Competitor>,
    tournaments: Vec<Tournament>,
    season: SeasonCycle,
    history: History,
    next_competitor: u32,
    next_tournament: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self::with_valid_config(ArenaConfig::default())
    }
}

impl Session {
    /// Start an empty session. Rejects a config that fails validation.
    pub fn new(config: ArenaConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: ArenaConfig) -> Self {
        let season = SeasonCycle::new(config.season, config.initial_divisions);
        Self {
            config,
            roster: Vec::new(),
            tournaments: Vec::new(),
            season,
            history: History::new(),
            next_competitor: 0,
            next_tournament: 0,
        }
    }

    pub fn roster(&self) -> &[Competitor] {
        &self.roster
    }

    pub fn competitor(&self, id: &CompetitorId) -> Option<&Competitor> {
        self.roster.iter().find(|c| &c.id == id)
    }

    fn require(&self, id: &CompetitorId) -> Result<&Competitor, SessionError> {
        self.competitor(id)
            .ok_or_else(|| SessionError::UnknownCompetitor(id.clone()))
    }

    pub fn tournaments(&self) -> &[Tournament] {
        &self.tournaments
    }

    pub fn tournament(&self, id: TournamentId) -> Option<&Tournament> {
        self.tournaments.iter().find(|t| t.id == id)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn season(&self) -> &SeasonCycle {
        &self.season
    }

    pub fn leaderboard(&self, kind: Leaderboard) -> Vec<LeaderboardRow> {
        leaderboard(kind, &self.roster, &self.history)
    }

    /// Add a level 1 competitor with no skills.
    pub fn add_competitor<R: Rng + ?Sized>(
        &mut self,
        name: impl Into<String>,
        rng: &mut R,
    ) -> CompetitorId {
        self.recruit(name, 1, 0, rng)
    }

    /// Add a competitor at a given level and skill count.
    ///
    /// Rarity is rolled; newcomers always start in the lowest open division.
    pub fn recruit<R: Rng + ?Sized>(
        &mut self,
        name: impl Into<String>,
        level: u32,
        skills: u32,
        rng: &mut R,
    ) -> CompetitorId {
        self.next_competitor += 1;
        let id = CompetitorId::new(format!("c{}", self.next_competitor));
        let competitor = Competitor::new(id.clone(), name)
            .with_level(level)
            .with_skills(skills)
            .with_rarity(Rarity::roll(rng))
            .with_division(self.season.unlocked_divisions);

        info!(
            "{} ({}) joins division {} as {:?}",
            competitor.name, id, competitor.division, competitor.rarity
        );
        self.roster.push(competitor);
        id
    }

    fn favored_side(
        favored: Option<&CompetitorId>,
        first: &CompetitorId,
        second: &CompetitorId,
    ) -> Result<Option<Side>, SessionError> {
        match favored {
            None => Ok(None),
            Some(f) if f == first => Ok(Some(Side::First)),
            Some(f) if f == second => Ok(Some(Side::Second)),
            Some(f) => Err(SessionError::FavorNotInDuel(f.clone())),
        }
    }

    /// Fight an ad-hoc duel between two roster members.
    pub fn duel<R: Rng + ?Sized>(
        &mut self,
        first: &CompetitorId,
        second: &CompetitorId,
        favored: Option<&CompetitorId>,
        rng: &mut R,
    ) -> Result<DuelReport, SessionError> {
        if first == second {
            return Err(SessionError::SameCompetitor(first.clone()));
        }
        let a = self.require(first)?;
        let b = self.require(second)?;
        let favored_side = Self::favored_side(favored, first, second)?;
        let outcome = fight(&Contender::from(a), &Contender::from(b), favored_side, rng);

        let entry = DuelEntry {
            kind: DuelKind::Friendly,
            first: first.clone(),
            second: Opponent::Roster(second.clone()),
            score: outcome.score,
            favored: favored.cloned(),
            tournament: None,
            outcome: Some(outcome),
        };
        Ok(self.process_duel(entry, rng))
    }

    /// Fight a duel between two different competitors picked at random.
    pub fn random_duel<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<DuelReport, SessionError> {
        let n = self.roster.len();
        if n < 2 {
            return Err(SessionError::RosterTooSmall {
                needed: 2,
                found: n,
            });
        }
        let i = rng.gen_range(0..n);
        let mut j = rng.gen_range(0..n - 1);
        if j >= i {
            j += 1;
        }
        let first = self.roster[i].id.clone();
        let second = self.roster[j].id.clone();
        self.duel(&first, &second, None, rng)
    }

    /// Fight a synthetic opponent from outside the ladder.
    pub fn world_duel<R: Rng + ?Sized>(
        &mut self,
        id: &CompetitorId,
        rng: &mut R,
    ) -> Result<DuelReport, SessionError> {
        let settings = self.config.world_duel;
        let name = WORLD_BOT_NAMES[rng.gen_range(0..WORLD_BOT_NAMES.len())];
        let bot = SyntheticOpponent::new(
            format!("{name} (Bot)"),
            rng.gen_range(settings.min_level..=settings.max_level),
            rng.gen_range(0..=settings.max_skills),
        );

        let competitor = self.require(id)?;
        let outcome = fight(&Contender::from(competitor), &Contender::from(&bot), None, rng);

        let entry = DuelEntry {
            kind: DuelKind::World,
            first: id.clone(),
            second: Opponent::Synthetic(bot),
            score: outcome.score,
            favored: None,
            tournament: None,
            outcome: Some(outcome),
        };
        Ok(self.process_duel(entry, rng))
    }

    /// Climb the tower: one bot per floor, level equal to the floor, until
    /// the first loss or the top.
    pub fn climb_tower<R: Rng + ?Sized>(
        &mut self,
        id: &CompetitorId,
        rng: &mut R,
    ) -> Result<TowerReport, SessionError> {
        let floors = self.config.tower_floors;
        let mut duels = Vec::new();
        let mut cleared = 0;

        for floor in 1..=floors {
            let bot = SyntheticOpponent::new(format!("Floor {floor} Guardian (Bot)"), floor, 0);
            let competitor = self.require(id)?;
            let outcome = fight(&Contender::from(competitor), &Contender::from(&bot), None, rng);
            let won = outcome.winner == Side::First;

            let entry = DuelEntry {
                kind: DuelKind::Tower,
                first: id.clone(),
                second: Opponent::Synthetic(bot),
                score: outcome.score,
                favored: None,
                tournament: None,
                outcome: Some(outcome),
            };
            let mut report = self.process_duel(entry, rng);
            if won {
                cleared = floor;
                let delta = CompetitorDelta::new(id.clone(), Change::TowerFloor(floor));
                apply_deltas(&mut self.roster, std::slice::from_ref(&delta));
                report.deltas.push(delta);
            }
            duels.push(report);
            if !won {
                break;
            }
        }

        info!("{} cleared {} of {} tower floors", id, cleared, floors);
        Ok(TowerReport {
            competitor: id.clone(),
            floors_cleared: cleared,
            reached_top: cleared == floors,
            duels,
        })
    }

    /// Create a tournament between roster members.
    pub fn create_tournament(
        &mut self,
        name: impl Into<String>,
        format: Format,
        settings: FormatSettings,
        participants: Vec<CompetitorId>,
    ) -> Result<TournamentId, SessionError> {
        for id in &participants {
            self.require(id)?;
        }
        let id = TournamentId(self.next_tournament + 1);
        let tournament = Tournament::create(id, name, format, settings, participants)?;
        self.next_tournament += 1;
        self.tournaments.push(tournament);
        Ok(id)
    }

    /// Resolve a pending tournament match with a duel and apply the result.
    pub fn play_tournament_match<R: Rng + ?Sized>(
        &mut self,
        tournament: TournamentId,
        match_id: MatchId,
        favored: Option<&CompetitorId>,
        rng: &mut R,
    ) -> Result<TournamentPlay, SessionError> {
        let t = self
            .tournament(tournament)
            .ok_or(SessionError::UnknownTournament(tournament))?;
        let m = t
            .get_match(match_id)
            .ok_or(TournamentError::UnknownMatch(match_id))?;
        if m.is_decided() {
            debug!("Match {} of {} already played", match_id, tournament);
            return Ok(TournamentPlay {
                outcome: ApplyOutcome::Ignored(IgnoreReason::AlreadyDecided),
                duel: None,
            });
        }
        let (home, away) = m
            .competitors()
            .map(|(h, a)| (h.clone(), a.clone()))
            .ok_or(TournamentError::MatchNotReady(match_id))?;

        let a = self.require(&home)?;
        let b = self.require(&away)?;
        let favored_side = Self::favored_side(favored, &home, &away)?;
        let outcome = fight(&Contender::from(a), &Contender::from(b), favored_side, rng);

        let report = MatchReport {
            first: home,
            second: away,
            score: outcome.score,
        };
        self.apply_to_tournament(tournament, match_id, report, favored.cloned(), Some(outcome), rng)
    }

    /// Apply a duel resolved elsewhere to a tournament match.
    ///
    /// Re-delivering a result that is already recorded changes nothing.
    pub fn apply_tournament_result<R: Rng + ?Sized>(
        &mut self,
        tournament: TournamentId,
        match_id: MatchId,
        report: MatchReport,
        rng: &mut R,
    ) -> Result<TournamentPlay, SessionError> {
        self.apply_to_tournament(tournament, match_id, report, None, None, rng)
    }

    fn apply_to_tournament<R: Rng + ?Sized>(
        &mut self,
        tournament: TournamentId,
        match_id: MatchId,
        report: MatchReport,
        favored: Option<CompetitorId>,
        outcome: Option<DuelOutcome>,
        rng: &mut R,
    ) -> Result<TournamentPlay, SessionError> {
        let t = self
            .tournaments
            .iter_mut()
            .find(|t| t.id == tournament)
            .ok_or(SessionError::UnknownTournament(tournament))?;
        let applied = t.apply_result(match_id, &report)?;

        if applied.applied().is_none() {
            return Ok(TournamentPlay {
                outcome: applied,
                duel: None,
            });
        }
        let finished = applied.applied().and_then(|r| r.finished.clone());

        let entry = DuelEntry {
            kind: DuelKind::Tournament,
            first: report.first,
            second: Opponent::Roster(report.second),
            score: report.score,
            favored,
            tournament: Some(tournament),
            outcome,
        };
        let mut duel = self.process_duel(entry, rng);

        if let Some(champion) = finished {
            let delta = CompetitorDelta::new(champion, Change::Championship);
            apply_deltas(&mut self.roster, std::slice::from_ref(&delta));
            duel.deltas.push(delta);
        }

        Ok(TournamentPlay {
            outcome: applied,
            duel: Some(duel),
        })
    }

    /// Open the next division down.
    pub fn unlock_division(&mut self) -> Result<u32, SessionError> {
        let max = self.config.max_divisions;
        if self.season.unlocked_divisions >= max {
            return Err(SessionError::DivisionLimit(max));
        }
        self.season.unlocked_divisions += 1;
        info!("Division {} unlocked", self.season.unlocked_divisions);
        Ok(self.season.unlocked_divisions)
    }

    /// Close the lowest division, moving its members up one.
    pub fn remove_division(&mut self) -> Result<Vec<CompetitorDelta>, SessionError> {
        let lowest = self.season.unlocked_divisions;
        if lowest <= 1 {
            return Err(SessionError::LastDivision);
        }
        let deltas: Vec<CompetitorDelta> = self
            .roster
            .iter()
            .filter(|c| c.division == lowest)
            .map(|c| {
                CompetitorDelta::new(
                    c.id.clone(),
                    Change::DivisionMove {
                        from: lowest,
                        to: lowest - 1,
                    },
                )
            })
            .collect();
        apply_deltas(&mut self.roster, &deltas);
        self.season.unlocked_divisions = lowest - 1;

        info!(
            "Division {} removed, {} competitor(s) moved up",
            lowest,
            deltas.len()
        );
        Ok(deltas)
    }

    /// Close the season now, whatever the duel count.
    pub fn run_season_cycle(&mut self) -> SeasonReport {
        self.season.run(&mut self.roster)
    }

    /// Turn a finished duel into deltas, record it and count it towards the
    /// season.
    fn process_duel<R: Rng + ?Sized>(&mut self, entry: DuelEntry, rng: &mut R) -> DuelReport {
        let first_won = entry.score.first > entry.score.second;
        let (winner, loser) = if first_won {
            (Some(entry.first.clone()), entry.second.roster_id().cloned())
        } else {
            (entry.second.roster_id().cloned(), Some(entry.first.clone()))
        };

        let mut deltas = Vec::new();
        if let Some(w) = &winner {
            let xp = self.competitor(w).map_or(0, |c| win_xp(c.rarity));
            deltas.push(CompetitorDelta::new(
                w.clone(),
                Change::Win {
                    league_points: entry.score.margin(),
                    xp,
                },
            ));
            if entry.kind == DuelKind::World {
                deltas.push(CompetitorDelta::new(w.clone(), Change::WorldDuelWin));
            }
        }
        if let Some(l) = &loser {
            deltas.push(CompetitorDelta::new(l.clone(), Change::Loss));
        }
        if let Some(f) = &entry.favored {
            deltas.push(CompetitorDelta::new(f.clone(), Change::Favored));
        }
        apply_deltas(&mut self.roster, &deltas);

        if let Some(w) = &winner {
            let level_up = self.competitor(w).and_then(|c| check_level_up(c, rng));
            if let Some(up) = level_up {
                info!("{} reached level {}", w, up.to);
                let delta = CompetitorDelta::new(w.clone(), Change::LevelUp(up));
                apply_deltas(&mut self.roster, std::slice::from_ref(&delta));
                deltas.push(delta);
            }
        }

        let record = self
            .history
            .push(DuelRecord {
                seq: 0,
                kind: entry.kind,
                first: entry.first,
                second: entry.second,
                score: entry.score,
                winner,
                favored: entry.favored,
                tournament: entry.tournament,
            })
            .clone();
        debug!(
            "Duel #{} ({:?}) {}-{}",
            record.seq, record.kind, record.score.first, record.score.second
        );

        let season = if self.season.record_duel() {
            Some(self.season.run(&mut self.roster))
        } else {
            None
        };

        DuelReport {
            record,
            outcome: entry.outcome,
            deltas,
            season,
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
