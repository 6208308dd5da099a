use super::*;
use std::collections::HashSet;

fn roster(n: usize) -> Vec<CompetitorId> {
    (0..n).map(|i| CompetitorId::new(format!("p{i}"))).collect()
}

fn unordered(a: &CompetitorId, b: &CompetitorId) -> (CompetitorId, CompetitorId) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

#[test]
fn test_even_roster_shape() {
    let rounds = circle_rounds(&roster(6));
    assert_eq!(rounds.len(), 5);
    assert!(rounds.iter().all(|r| r.len() == 3));
}

#[test]
fn test_odd_roster_shape() {
    // Five players get a sixth empty seat: five rounds of two matches
    let rounds = circle_rounds(&roster(5));
    assert_eq!(rounds.len(), 5);
    assert!(rounds.iter().all(|r| r.len() == 2));
}

#[test]
fn test_every_pair_meets_once() {
    for n in 2..=12 {
        let players = roster(n);
        let rounds = circle_rounds(&players);
        let mut seen = HashSet::new();
        for pairs in &rounds {
            let mut busy = HashSet::new();
            for (a, b) in pairs {
                assert_ne!(a, b);
                assert!(seen.insert(unordered(a, b)), "pair repeated for n = {n}");
                assert!(busy.insert(a.clone()) && busy.insert(b.clone()));
            }
        }
        assert_eq!(seen.len(), n * (n - 1) / 2);
    }
}

#[test]
fn test_second_leg_swaps_sides_and_offsets_rounds() {
    let mut arena = MatchArena::new();
    let players = roster(4);
    let created = build_round_robin(&mut arena, &players, 2, Stage::League, None).unwrap();
    assert_eq!(created.len(), 12);

    let first = arena.get(created[0]).unwrap();
    let mirror = arena.get(created[6]).unwrap();
    assert_eq!(mirror.round, first.round + 3);
    assert_eq!(mirror.slots[0], first.slots[1]);
    assert_eq!(mirror.slots[1], first.slots[0]);
    assert!(arena.iter().all(|m| m.stage == Stage::League && m.group.is_none()));
}

#[test]
fn test_group_tag_is_applied() {
    let mut arena = MatchArena::new();
    build_round_robin(&mut arena, &roster(3), 1, Stage::Group, Some(2)).unwrap();
    assert_eq!(arena.len(), 3);
    assert!(arena.iter().all(|m| m.group == Some(2) && m.stage == Stage::Group));
}

#[test]
fn test_rejects_zero_legs_and_small_rosters() {
    let mut arena = MatchArena::new();
    assert_eq!(
        build_round_robin(&mut arena, &roster(4), 0, Stage::League, None),
        Err(BracketError::InvalidLegCount)
    );
    assert_eq!(
        build_round_robin(&mut arena, &roster(1), 1, Stage::League, None),
        Err(BracketError::TooFewParticipants(1))
    );
    assert!(arena.is_empty());
}
