//! Group stage: balanced buckets, each a round robin of its own.

use tracing::debug;

use crate::error::{check_roster, BracketError};
use crate::matches::{MatchArena, Stage};
use crate::model::CompetitorId;
use crate::round_robin::schedule;

/// Deal participants into `groups` buckets by index modulo `groups`.
///
/// Buckets left empty (more groups than players) are dropped.
pub fn partition(participants: &[CompetitorId], groups: u32) -> Vec<Vec<CompetitorId>> {
    let groups = groups.max(1) as usize;
    let mut buckets: Vec<Vec<CompetitorId>> = vec![Vec::new(); groups];
    for (i, id) in participants.iter().enumerate() {
        buckets[i % groups].push(id.clone());
    }
    buckets.retain(|b| !b.is_empty());
    buckets
}

/// Partition the roster and schedule every group. Returns the group rosters
/// in group-id order.
///
/// A group of one gets no matches; its only member tops it.
pub fn build_groups(
    arena: &mut MatchArena,
    participants: &[CompetitorId],
    groups: u32,
    legs: u32,
) -> Result<Vec<Vec<CompetitorId>>, BracketError> {
    check_roster(participants)?;
    if groups == 0 {
        return Err(BracketError::InvalidGroupCount);
    }
    if legs == 0 {
        return Err(BracketError::InvalidLegCount);
    }

    let buckets = partition(participants, groups);
    for (group, members) in buckets.iter().enumerate() {
        schedule(arena, members, legs, Stage::Group, Some(group as u32));
    }
    debug!(
        "Split {} participants into {} group(s)",
        participants.len(),
        buckets.len()
    );
    Ok(buckets)
}

#[cfg(test)]
#[path = "groups_tests.rs"]
mod groups_tests;
