//! Tournament formats and their settings

use arena_core::BracketError;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TournamentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    /// Single elimination, optionally two-legged
    Knockout,
    /// Round robin, top of the table wins
    League,
    /// Round robin, then a knockout between the top finishers
    LeagueThenPlayoff,
    /// Round-robin groups, then a knockout between the group qualifiers
    GroupsThenPlayoff,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Knockout => "knockout",
            Format::League => "league",
            Format::LeagueThenPlayoff => "league + playoff",
            Format::GroupsThenPlayoff => "groups + playoff",
        };
        f.write_str(name)
    }
}

/// Format-specific knobs. Settings a format does not use are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatSettings {
    /// Times each pair meets in a league or group
    pub legs: u32,
    /// Knockout ties are played home and away
    pub two_legged: bool,
    pub groups: u32,
    /// Qualifiers taken from each group
    pub advance_per_group: u32,
    /// Qualifiers taken from the league table into the playoff
    pub knockout_cutoff: u32,
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            legs: 1,
            two_legged: false,
            groups: 2,
            advance_per_group: 2,
            knockout_cutoff: 4,
        }
    }
}

impl FormatSettings {
    pub fn validate(&self, format: Format) -> Result<(), TournamentError> {
        let uses_round_robin = format != Format::Knockout;
        if uses_round_robin && self.legs == 0 {
            return Err(BracketError::InvalidLegCount.into());
        }
        match format {
            Format::LeagueThenPlayoff if self.knockout_cutoff == 0 => Err(
                TournamentError::InvalidSettings("knockout cutoff must be at least 1".into()),
            ),
            Format::GroupsThenPlayoff if self.groups == 0 => {
                Err(BracketError::InvalidGroupCount.into())
            }
            Format::GroupsThenPlayoff if self.advance_per_group == 0 => Err(
                TournamentError::InvalidSettings("qualifiers per group must be at least 1".into()),
            ),
            _ => Ok(()),
        }
    }
}
