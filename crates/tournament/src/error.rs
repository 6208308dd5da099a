//! Error types for tournaments, sessions and configuration

use std::path::PathBuf;

use arena_core::{BracketError, CompetitorId, MatchId, ScoreError};
use thiserror::Error;

use crate::tournament::TournamentId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TournamentError {
    #[error(transparent)]
    Bracket(#[from] BracketError),

    #[error(transparent)]
    Score(#[from] ScoreError),

    #[error("invalid tournament settings: {0}")]
    InvalidSettings(String),

    #[error("match {0} does not exist")]
    UnknownMatch(MatchId),

    #[error("match {0} is still waiting for its competitors")]
    MatchNotReady(MatchId),

    #[error("match {match_id} is not between {first} and {second}")]
    PairMismatch {
        match_id: MatchId,
        first: CompetitorId,
        second: CompetitorId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("unknown competitor: {0}")]
    UnknownCompetitor(CompetitorId),

    #[error("unknown tournament: {0}")]
    UnknownTournament(TournamentId),

    #[error("{0} cannot duel themselves")]
    SameCompetitor(CompetitorId),

    #[error("need at least {needed} competitors, roster has {found}")]
    RosterTooSmall { needed: usize, found: usize },

    #[error("{0} is not part of this duel and cannot be favored")]
    FavorNotInDuel(CompetitorId),

    #[error("all {0} divisions are already unlocked")]
    DivisionLimit(u32),

    #[error("the top division cannot be removed")]
    LastDivision,

    #[error(transparent)]
    Tournament(#[from] TournamentError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
