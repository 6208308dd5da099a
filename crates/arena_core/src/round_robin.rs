//! Round-robin schedules using the circle method.
//!
//! One seat stays fixed while the others rotate one place per round, so each
//! of the `n - 1` rounds pairs seat `i` with seat `n - 1 - i`. An odd roster
//! gets an empty seat; whoever faces it sits the round out.

use std::collections::VecDeque;

use tracing::debug;

use crate::error::{check_roster, BracketError};
use crate::matches::{MatchArena, MatchId, Slot, Stage};
use crate::model::CompetitorId;

/// A single pairing, home side first.
pub type Pairing = (CompetitorId, CompetitorId);

/// Every round of one pass over the roster. Bye pairings are left out.
pub fn circle_rounds(participants: &[CompetitorId]) -> Vec<Vec<Pairing>> {
    let mut seats: Vec<Option<&CompetitorId>> = participants.iter().map(Some).collect();
    if seats.len() % 2 == 1 {
        seats.push(None);
    }
    let n = seats.len();
    if n < 2 {
        return Vec::new();
    }

    let fixed = seats[0];
    let mut rotating: VecDeque<Option<&CompetitorId>> = seats[1..].iter().copied().collect();
    let mut rounds = Vec::with_capacity(n - 1);

    for round in 0..n - 1 {
        let table: Vec<Option<&CompetitorId>> =
            std::iter::once(fixed).chain(rotating.iter().copied()).collect();

        let mut pairs = Vec::with_capacity(n / 2);
        for i in 0..n / 2 {
            let (Some(a), Some(b)) = (table[i], table[n - 1 - i]) else {
                continue;
            };
            // Keep the fixed seat from always being home
            if i == 0 && round % 2 == 1 {
                pairs.push((b.clone(), a.clone()));
            } else {
                pairs.push((a.clone(), b.clone()));
            }
        }
        rounds.push(pairs);
        rotating.rotate_right(1);
    }

    rounds
}

/// Schedule a full round robin into `arena` and return the new match ids.
///
/// Each extra leg replays the base schedule with the round index offset by
/// `n - 1` per leg; even-numbered legs swap home and away.
pub fn build_round_robin(
    arena: &mut MatchArena,
    participants: &[CompetitorId],
    legs: u32,
    stage: Stage,
    group: Option<u32>,
) -> Result<Vec<MatchId>, BracketError> {
    check_roster(participants)?;
    if legs == 0 {
        return Err(BracketError::InvalidLegCount);
    }
    Ok(schedule(arena, participants, legs, stage, group))
}

/// Unchecked scheduling; a roster below two players yields no matches.
pub(crate) fn schedule(
    arena: &mut MatchArena,
    participants: &[CompetitorId],
    legs: u32,
    stage: Stage,
    group: Option<u32>,
) -> Vec<MatchId> {
    let base = circle_rounds(participants);
    let rounds_per_leg = base.len() as u32;
    let mut created = Vec::new();

    for leg in 1..=legs {
        let offset = (leg - 1) * rounds_per_leg;
        let swap = leg % 2 == 0;
        for (round, pairs) in base.iter().enumerate() {
            for (position, (home, away)) in pairs.iter().enumerate() {
                let (home, away) = if swap { (away, home) } else { (home, away) };
                let m = arena.create(stage, offset + round as u32, position as u32);
                m.slots = [Slot::Filled(home.clone()), Slot::Filled(away.clone())];
                m.group = group;
                created.push(m.id);
            }
        }
    }

    debug!(
        "Scheduled {} {:?} matches for {} participants over {} leg(s)",
        created.len(),
        stage,
        participants.len(),
        legs
    );
    created
}

#[cfg(test)]
#[path = "round_robin_tests.rs"]
mod round_robin_tests;
