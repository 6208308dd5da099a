//! Error types for bracket construction

use thiserror::Error;

use crate::model::CompetitorId;

/// Reasons a bracket cannot be built from the given input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BracketError {
    #[error("need at least 2 participants, got {0}")]
    TooFewParticipants(usize),

    #[error("participant {0} appears more than once")]
    DuplicateParticipant(CompetitorId),

    #[error("legs per pairing must be at least 1")]
    InvalidLegCount,

    #[error("group count must be at least 1")]
    InvalidGroupCount,
}

/// Reject rosters that are too small or name someone twice.
pub(crate) fn check_roster(participants: &[CompetitorId]) -> Result<(), BracketError> {
    if participants.len() < 2 {
        return Err(BracketError::TooFewParticipants(participants.len()));
    }
    for (i, id) in participants.iter().enumerate() {
        if participants[..i].contains(id) {
            return Err(BracketError::DuplicateParticipant(id.clone()));
        }
    }
    Ok(())
}
