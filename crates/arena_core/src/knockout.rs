//! Knockout brackets, single match or two-legged ties.
//!
//! Round 0 pairs the participants in list order. Every later round pairs the
//! previous round's entries, where an entry is a tie whose winner is still to
//! come. An odd entry out is carried up a round unchanged, so the bracket has
//! `ceil(log2 N)` rounds and a single final.
//!
//! In two-legged mode each tie is two matches with the sides swapped. Only
//! the second leg carries `feeds_into`; it is the tie's anchor.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{check_roster, BracketError};
use crate::matches::{Leg, MatchArena, MatchId, Slot, Stage};
use crate::model::CompetitorId;

/// Shape of a freshly built bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnockoutBracket {
    pub rounds: u32,
    /// Anchor of the final tie
    pub final_tie: MatchId,
}

/// Where a knockout tie stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TieStatus {
    Pending,
    Decided(CompetitorId),
    /// Both legs played and the aggregate is level, no decider result yet
    Level,
}

/// What settling a tie did to the bracket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TieProgress {
    Pending,
    Advanced {
        tie: MatchId,
        winner: CompetitorId,
        /// Match that received the winner, `None` for the final
        into: Option<MatchId>,
    },
    DeciderScheduled(MatchId),
}

/// Lay out a complete knockout bracket in `arena`.
///
/// Bye winners are already pushed into their next-round slots on return.
pub fn build_knockout(
    arena: &mut MatchArena,
    participants: &[CompetitorId],
    two_legged: bool,
) -> Result<KnockoutBracket, BracketError> {
    check_roster(participants)?;
    let first_new = arena.next_id();

    let mut entries = Vec::with_capacity(participants.len().div_ceil(2));
    for (position, pair) in participants.chunks(2).enumerate() {
        let position = position as u32;
        let entry = match pair {
            [home, away] => create_tie(
                arena,
                0,
                position,
                Slot::Filled(home.clone()),
                Slot::Filled(away.clone()),
                two_legged,
            ),
            [lone] => create_bye(arena, position, lone.clone()),
            _ => continue,
        };
        entries.push(entry);
    }

    let mut round = 0;
    while entries.len() > 1 {
        round += 1;
        let mut next = Vec::with_capacity(entries.len().div_ceil(2));
        for (position, pair) in entries.chunks(2).enumerate() {
            match pair {
                [a, b] => {
                    let tie = create_tie(
                        arena,
                        round,
                        position as u32,
                        Slot::Open,
                        Slot::Open,
                        two_legged,
                    );
                    for source in [a, b] {
                        if let Some(m) = arena.get_mut(*source) {
                            m.feeds_into = Some(tie);
                        }
                    }
                    next.push(tie);
                }
                [carried] => next.push(*carried),
                _ => {}
            }
        }
        entries = next;
    }

    let Some(&final_tie) = entries.first() else {
        return Err(BracketError::TooFewParticipants(participants.len()));
    };

    let byes: Vec<(MatchId, CompetitorId)> = arena
        .iter()
        .filter(|m| m.id >= first_new && m.is_bye())
        .filter_map(|m| m.winner.clone().map(|w| (m.id, w)))
        .collect();
    for (bye, winner) in byes {
        advance_winner(arena, bye, winner);
    }

    debug!(
        "Built knockout for {} participants: {} rounds, two-legged: {}",
        participants.len(),
        round + 1,
        two_legged
    );

    Ok(KnockoutBracket {
        rounds: round + 1,
        final_tie,
    })
}

fn create_tie(
    arena: &mut MatchArena,
    round: u32,
    position: u32,
    home: Slot,
    away: Slot,
    two_legged: bool,
) -> MatchId {
    let first = arena.create(Stage::Knockout, round, position);
    first.slots = [home.clone(), away.clone()];
    if !two_legged {
        return first.id;
    }
    first.leg = Some(Leg::First);
    let first_id = first.id;

    let second = arena.create(Stage::Knockout, round, position);
    second.slots = [away, home];
    second.leg = Some(Leg::Second);
    second.partner = Some(first_id);
    let second_id = second.id;

    if let Some(first) = arena.get_mut(first_id) {
        first.partner = Some(second_id);
    }
    second_id
}

fn create_bye(arena: &mut MatchArena, position: u32, lone: CompetitorId) -> MatchId {
    let m = arena.create(Stage::Knockout, 0, position);
    m.slots = [Slot::Filled(lone.clone()), Slot::Bye];
    m.winner = Some(lone);
    m.id
}

/// The match that stands for the tie `id` belongs to.
///
/// First legs and deciders point at their second leg; anything else is its
/// own anchor.
pub fn tie_anchor(arena: &MatchArena, id: MatchId) -> MatchId {
    match arena.get(id) {
        Some(m) if matches!(m.leg, Some(Leg::First) | Some(Leg::Decider)) => {
            m.partner.unwrap_or(id)
        }
        _ => id,
    }
}

/// Decider already scheduled for a level tie, if any.
pub fn find_decider(arena: &MatchArena, anchor: MatchId) -> Option<MatchId> {
    arena
        .iter()
        .find(|m| m.leg == Some(Leg::Decider) && m.partner == Some(anchor))
        .map(|m| m.id)
}

/// Evaluate a tie from its anchor.
///
/// Two-legged ties go to the side with the larger aggregate differential.
/// A level aggregate is settled by the decider match once it has a winner.
pub fn tie_status(arena: &MatchArena, anchor: MatchId) -> TieStatus {
    let Some(m) = arena.get(anchor) else {
        return TieStatus::Pending;
    };
    if m.leg != Some(Leg::Second) {
        return m.winner.clone().map_or(TieStatus::Pending, TieStatus::Decided);
    }

    let Some(first_leg) = m.partner.and_then(|p| arena.get(p)) else {
        return TieStatus::Pending;
    };
    if !m.is_decided() || !first_leg.is_decided() {
        return TieStatus::Pending;
    }
    let Some((home, away)) = m.competitors() else {
        return TieStatus::Pending;
    };

    let mut differential = 0i32;
    for leg in [m, first_leg] {
        if let Some((own, opp)) = leg.score_for(home) {
            differential += own as i32 - opp as i32;
        }
    }

    if differential > 0 {
        return TieStatus::Decided(home.clone());
    }
    if differential < 0 {
        return TieStatus::Decided(away.clone());
    }
    match find_decider(arena, anchor)
        .and_then(|d| arena.get(d))
        .and_then(|d| d.winner.clone())
    {
        Some(winner) => TieStatus::Decided(winner),
        None => TieStatus::Level,
    }
}

/// Put a tie winner into the next match. Returns the match filled.
///
/// A two-legged target gets the winner in both legs, on opposite sides.
pub fn advance_winner(
    arena: &mut MatchArena,
    anchor: MatchId,
    winner: CompetitorId,
) -> Option<MatchId> {
    let target_id = arena.get(anchor)?.feeds_into?;
    let target = arena.get_mut(target_id)?;
    let side = target.fill_open_slot(winner.clone())?;

    if target.leg == Some(Leg::Second) {
        if let Some(first_leg) = target.partner.and_then(|p| arena.get_mut(p)) {
            first_leg.slots[side.other().index()] = Slot::Filled(winner);
        }
    }
    Some(target_id)
}

/// Append a decider for a level tie, or return the one already there.
pub fn ensure_decider(arena: &mut MatchArena, anchor: MatchId) -> Option<MatchId> {
    if let Some(existing) = find_decider(arena, anchor) {
        return Some(existing);
    }
    let second_leg = arena.get(anchor)?;
    let (round, position) = (second_leg.round, second_leg.position);
    let slots = arena.get(second_leg.partner?)?.slots.clone();

    let decider = arena.create(Stage::Knockout, round, position);
    decider.slots = slots;
    decider.leg = Some(Leg::Decider);
    decider.partner = Some(anchor);
    debug!("Scheduled decider {} for level tie {}", decider.id, anchor);
    Some(decider.id)
}

/// Re-evaluate the tie a freshly decided match belongs to and move the
/// bracket forward: advance a winner, or schedule a decider.
pub fn settle_tie(arena: &mut MatchArena, decided: MatchId) -> TieProgress {
    let anchor = tie_anchor(arena, decided);
    match tie_status(arena, anchor) {
        TieStatus::Pending => TieProgress::Pending,
        TieStatus::Level => match ensure_decider(arena, anchor) {
            Some(decider) => TieProgress::DeciderScheduled(decider),
            None => TieProgress::Pending,
        },
        TieStatus::Decided(winner) => {
            let into = advance_winner(arena, anchor, winner.clone());
            TieProgress::Advanced {
                tie: anchor,
                winner,
                into,
            }
        }
    }
}

#[cfg(test)]
#[path = "knockout_tests.rs"]
mod knockout_tests;
