use super::*;
use crate::duel::Score;
use crate::knockout::build_knockout;
use crate::matches::{MatchArena, Slot};
use crate::round_robin::build_round_robin;

fn ids(names: &[&str]) -> Vec<CompetitorId> {
    names.iter().map(|n| CompetitorId::from(*n)).collect()
}

fn play(arena: &mut MatchArena, index: u32, first: u8, second: u8) {
    let m = arena.get_mut(crate::matches::MatchId(index)).unwrap();
    let score = Score::new(first, second);
    let side = score.validate().unwrap();
    m.winner = m.slots[side.index()].competitor().cloned();
    m.score = Some(score);
}

#[test]
fn test_winner_gets_the_margin() {
    let players = ids(&["A", "B", "C"]);
    let mut arena = MatchArena::new();
    build_round_robin(&mut arena, &players, 1, Stage::League, None).unwrap();

    play(&mut arena, 0, 3, 0);
    play(&mut arena, 1, 3, 2);

    let table = standings(&players, arena.iter(), StandingsFilter::all());
    let total: u32 = table.iter().map(|e| e.points).sum();
    assert_eq!(total, 4);
    assert_eq!(table[0].points, 3);
    assert_eq!(table[0].wins, 1);
    assert_eq!(table.iter().map(|e| e.played).sum::<u32>(), 4);
}

#[test]
fn test_ties_keep_participant_order() {
    let players = ids(&["C", "A", "B"]);
    let table = standings(&players, std::iter::empty(), StandingsFilter::all());
    let order: Vec<&str> = table.iter().map(|e| e.competitor.as_str()).collect();
    assert_eq!(order, vec!["C", "A", "B"]);
}

#[test]
fn test_byes_never_score() {
    let players = ids(&["A", "B", "C"]);
    let mut arena = MatchArena::new();
    build_knockout(&mut arena, &players, false).unwrap();
    assert!(arena.get(crate::matches::MatchId(1)).unwrap().is_bye());

    let table = standings(&players, arena.iter(), StandingsFilter::all());
    assert!(table.iter().all(|e| e.points == 0 && e.played == 0));
}

#[test]
fn test_filter_by_group() {
    let mut arena = MatchArena::new();
    let m = arena.create(Stage::Group, 0, 0);
    m.group = Some(0);
    m.slots = [Slot::Filled("A".into()), Slot::Filled("B".into())];
    let m = arena.create(Stage::Group, 0, 0);
    m.group = Some(1);
    m.slots = [Slot::Filled("A".into()), Slot::Filled("C".into())];
    play(&mut arena, 0, 3, 1);
    play(&mut arena, 1, 3, 0);

    let players = ids(&["A", "B", "C"]);
    let group0 = standings(&players, arena.iter(), StandingsFilter::group(0));
    assert_eq!(group0[0].competitor.as_str(), "A");
    assert_eq!(group0[0].points, 2);

    let knockout = standings(&players, arena.iter(), StandingsFilter::stage(Stage::Knockout));
    assert!(knockout.iter().all(|e| e.points == 0));
}
