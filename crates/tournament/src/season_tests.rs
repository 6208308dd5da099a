use super::*;

fn member(id: &str, division: u32, points: u32) -> Competitor {
    let mut c = Competitor::new(id, id.to_uppercase()).with_division(division);
    c.stats.league_points = points;
    c
}

fn division_of(roster: &[Competitor], id: &str) -> u32 {
    roster.iter().find(|c| c.id.as_str() == id).unwrap().division
}

fn three_divisions() -> Vec<Competitor> {
    vec![
        member("a1", 1, 9),
        member("a2", 1, 5),
        member("a3", 1, 1),
        member("b1", 2, 8),
        member("b2", 2, 6),
        member("b3", 2, 3),
        member("b4", 2, 0),
        member("c1", 3, 7),
        member("c2", 3, 4),
        member("c3", 3, 2),
    ]
}

#[test]
fn test_counter_reaches_threshold() {
    let settings = SeasonSettings {
        duel_threshold: 3,
        ..Default::default()
    };
    let mut cycle = SeasonCycle::new(settings, 1);
    assert!(!cycle.record_duel());
    assert!(!cycle.record_duel());
    assert!(cycle.record_duel());
}

#[test]
fn test_season_close_resets_and_crowns() {
    let mut roster = three_divisions();
    let mut cycle = SeasonCycle::new(SeasonSettings::default(), 3);
    cycle.duel_count = 100;

    let report = cycle.run(&mut roster);

    assert_eq!(report.season, 1);
    assert_eq!(report.champion, Some(CompetitorId::from("a1")));
    assert!(roster.iter().all(|c| c.stats.league_points == 0));
    assert_eq!(roster[0].stats.championships, 1);
    assert_eq!(cycle.duel_count, 0);
    assert_eq!(cycle.season, 2);
}

#[test]
fn test_top_flight_relegates_one_lower_boundaries_two() {
    let mut roster = three_divisions();
    let mut cycle = SeasonCycle::new(SeasonSettings::default(), 3);
    cycle.run(&mut roster);

    // 1 <-> 2: b1, b2 up, a3 down
    assert_eq!(division_of(&roster, "b1"), 1);
    assert_eq!(division_of(&roster, "b2"), 1);
    assert_eq!(division_of(&roster, "a3"), 2);
    assert_eq!(division_of(&roster, "a2"), 1);

    // 2 <-> 3: c1, c2 up, b3 and b4 down
    assert_eq!(division_of(&roster, "c1"), 2);
    assert_eq!(division_of(&roster, "c2"), 2);
    assert_eq!(division_of(&roster, "b3"), 3);
    assert_eq!(division_of(&roster, "b4"), 3);
    assert_eq!(division_of(&roster, "c3"), 3);
}

#[test]
fn test_promotion_takes_precedence_in_small_divisions() {
    // Division 2 has only two members; both go up and neither drops to 3
    let mut roster = vec![
        member("a1", 1, 3),
        member("b1", 2, 5),
        member("b2", 2, 1),
        member("c1", 3, 4),
    ];
    let mut cycle = SeasonCycle::new(SeasonSettings::default(), 3);
    let report = cycle.run(&mut roster);

    assert_eq!(division_of(&roster, "b1"), 1);
    assert_eq!(division_of(&roster, "b2"), 1);
    assert_eq!(division_of(&roster, "a1"), 2);
    assert_eq!(division_of(&roster, "c1"), 2);
    let moved: Vec<&str> = report.moves.iter().map(|m| m.competitor.as_str()).collect();
    assert_eq!(moved.len(), 4);
}

#[test]
fn test_only_unlocked_divisions_swap() {
    let mut roster = three_divisions();
    let mut cycle = SeasonCycle::new(SeasonSettings::default(), 2);
    let report = cycle.run(&mut roster);

    assert_eq!(report.tables.len(), 2);
    assert!(report.moves.iter().all(|m| m.from <= 2 && m.to <= 2));
    assert_eq!(division_of(&roster, "c1"), 3);
}

#[test]
fn test_champion_from_highest_populated_division() {
    let mut roster = vec![member("b1", 2, 1), member("b2", 2, 4)];
    let cycle = SeasonCycle::new(SeasonSettings::default(), 2);
    let report = cycle.plan(&roster);
    assert_eq!(report.champion, Some(CompetitorId::from("b2")));

    // Planning alone changes nothing
    assert_eq!(roster[1].stats.league_points, 4);
    roster.clear();
    assert_eq!(cycle.plan(&roster).champion, None);
}

#[test]
fn test_ties_keep_roster_order() {
    let roster = vec![member("x", 1, 2), member("y", 1, 2), member("z", 1, 2)];
    let cycle = SeasonCycle::new(SeasonSettings::default(), 1);
    let report = cycle.plan(&roster);
    let order: Vec<&str> = report.tables[0]
        .ranking
        .iter()
        .map(|(id, _)| id.as_str())
        .collect();
    assert_eq!(order, vec!["x", "y", "z"]);
    assert_eq!(report.champion, Some(CompetitorId::from("x")));
}
