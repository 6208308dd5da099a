use super::*;

fn ids(names: &[&str]) -> Vec<CompetitorId> {
    names.iter().map(|n| CompetitorId::from(*n)).collect()
}

fn id(s: &str) -> CompetitorId {
    CompetitorId::from(s)
}

fn knockout(names: &[&str], two_legged: bool) -> Tournament {
    let settings = FormatSettings {
        two_legged,
        ..Default::default()
    };
    Tournament::create(TournamentId(1), "Cup", Format::Knockout, settings, ids(names)).unwrap()
}

/// Play every pending match with the home side winning 3-1.
fn play_out_home_wins(t: &mut Tournament) {
    loop {
        let next = t.pending_matches().first().map(|m| (*m).clone());
        let Some(m) = next else { break };
        let (home, away) = m.competitors().unwrap();
        let report = MatchReport::new(home.clone(), away.clone(), 3, 1);
        t.apply_result(m.id, &report).unwrap();
    }
}

#[test]
fn test_four_player_knockout_scenario() {
    let mut t = knockout(&["A", "B", "C", "D"], false);
    assert_eq!(t.pending_matches().len(), 2);

    let first = t.apply_result(MatchId(0), &MatchReport::new("A", "B", 3, 1)).unwrap();
    assert!(first.applied().unwrap().finished.is_none());

    // Reported from D's side; stored in slot order
    let second = t.apply_result(MatchId(1), &MatchReport::new("D", "C", 3, 2)).unwrap();
    assert_eq!(second.applied().unwrap().score, Score::new(2, 3));

    let final_id = t.final_tie().unwrap();
    let final_match = t.get_match(final_id).unwrap();
    assert_eq!(final_match.competitors(), Some((&id("A"), &id("D"))));
    assert_eq!(t.status(), TournamentStatus::Active);

    let last = t.apply_result(final_id, &MatchReport::new("A", "D", 3, 0)).unwrap();
    assert_eq!(last.applied().unwrap().finished, Some(id("A")));
    assert_eq!(t.status(), TournamentStatus::Finished);
    assert_eq!(t.winner(), Some(&id("A")));
}

#[test]
fn test_mismatched_pair_is_rejected_without_mutation() {
    let mut t = knockout(&["A", "B", "C", "D"], false);
    let before = t.clone();

    let err = t
        .apply_result(MatchId(0), &MatchReport::new("A", "C", 3, 0))
        .unwrap_err();
    assert!(matches!(err, TournamentError::PairMismatch { .. }));
    assert_eq!(t, before);
}

#[test]
fn test_invalid_score_and_unknown_match_are_rejected() {
    let mut t = knockout(&["A", "B"], false);
    let before = t.clone();
    assert!(matches!(
        t.apply_result(MatchId(0), &MatchReport::new("A", "B", 3, 3)),
        Err(TournamentError::Score(_))
    ));
    assert_eq!(
        t.apply_result(MatchId(9), &MatchReport::new("A", "B", 3, 0)),
        Err(TournamentError::UnknownMatch(MatchId(9)))
    );
    assert_eq!(t, before);
}

#[test]
fn test_open_match_is_not_ready() {
    let mut t = knockout(&["A", "B", "C", "D"], false);
    let final_id = t.final_tie().unwrap();
    assert_eq!(
        t.apply_result(final_id, &MatchReport::new("A", "C", 3, 0)),
        Err(TournamentError::MatchNotReady(final_id))
    );
}

#[test]
fn test_reapplying_is_ignored() {
    let mut t = knockout(&["A", "B", "C", "D"], false);
    let report = MatchReport::new("A", "B", 3, 1);
    t.apply_result(MatchId(0), &report).unwrap();
    let snapshot = t.clone();

    assert_eq!(
        t.apply_result(MatchId(0), &report).unwrap(),
        ApplyOutcome::Ignored(IgnoreReason::AlreadyApplied)
    );
    assert_eq!(
        t.apply_result(MatchId(0), &MatchReport::new("B", "A", 3, 0)).unwrap(),
        ApplyOutcome::Ignored(IgnoreReason::AlreadyDecided)
    );
    assert_eq!(t, snapshot);
}

#[test]
fn test_league_winner_is_top_of_table() {
    let settings = FormatSettings::default();
    let mut t = Tournament::create(
        TournamentId(2),
        "League",
        Format::League,
        settings,
        ids(&["A", "B", "C", "D"]),
    )
    .unwrap();
    assert_eq!(t.pending_matches().len(), 6);

    play_out_home_wins(&mut t);
    assert!(t.is_finished());
    let table = t.standings(StandingsFilter::stage(Stage::League));
    assert_eq!(t.winner(), Some(&table[0].competitor));
    assert_eq!(table.iter().map(|e| e.points).sum::<u32>(), 12);
}

#[test]
fn test_hybrid_seeds_playoff_from_top_of_league() {
    let settings = FormatSettings {
        knockout_cutoff: 2,
        ..Default::default()
    };
    let mut t = Tournament::create(
        TournamentId(3),
        "Hybrid",
        Format::LeagueThenPlayoff,
        settings,
        ids(&["A", "B", "C", "D", "E"]),
    )
    .unwrap();

    assert_eq!(t.rounds(Stage::League).len(), 5);
    assert!(t.rounds(Stage::League).values().all(|r| r.len() == 2));

    let league_ids: Vec<MatchId> = t.matches().in_stage(Stage::League).map(|m| m.id).collect();
    let mut generated = None;
    for (i, match_id) in league_ids.iter().enumerate() {
        let m = t.get_match(*match_id).unwrap().clone();
        let (home, away) = m.competitors().unwrap();
        let outcome = t
            .apply_result(*match_id, &MatchReport::new(home.clone(), away.clone(), 3, 1))
            .unwrap();
        let applied = outcome.applied().unwrap().clone();
        if i + 1 < league_ids.len() {
            assert!(applied.stage_generated.is_none());
        } else {
            generated = applied.stage_generated;
        }
    }
    assert_eq!(generated, Some(Stage::Knockout));

    let league_before: Vec<Match> = t.matches().in_stage(Stage::League).cloned().collect();
    let knockout: Vec<&Match> = t.matches().in_stage(Stage::Knockout).collect();
    assert_eq!(knockout.len(), 1);

    let table = t.standings(StandingsFilter::stage(Stage::League));
    let (a, b) = knockout[0].competitors().unwrap();
    assert_eq!((a, b), (&table[0].competitor, &table[1].competitor));

    play_out_home_wins(&mut t);
    assert_eq!(t.winner(), Some(&table[0].competitor));
    let league_after: Vec<Match> = t.matches().in_stage(Stage::League).cloned().collect();
    assert_eq!(league_before, league_after);
}

#[test]
fn test_hybrid_cutoff_of_one_finishes_directly() {
    let settings = FormatSettings {
        knockout_cutoff: 1,
        ..Default::default()
    };
    let mut t = Tournament::create(
        TournamentId(4),
        "Hybrid",
        Format::LeagueThenPlayoff,
        settings,
        ids(&["A", "B", "C"]),
    )
    .unwrap();
    play_out_home_wins(&mut t);

    assert!(t.is_finished());
    assert!(t.matches().in_stage(Stage::Knockout).next().is_none());
}

#[test]
fn test_groups_seed_in_group_order() {
    let settings = FormatSettings {
        groups: 2,
        advance_per_group: 1,
        ..Default::default()
    };
    let mut t = Tournament::create(
        TournamentId(5),
        "Groups",
        Format::GroupsThenPlayoff,
        settings,
        ids(&["A", "B", "C", "D", "E", "F"]),
    )
    .unwrap();
    assert_eq!(t.groups().len(), 2);
    assert_eq!(t.groups()[0], ids(&["A", "C", "E"]));

    // Group matches only: three per group
    let group_ids: Vec<MatchId> = t.matches().in_stage(Stage::Group).map(|m| m.id).collect();
    assert_eq!(group_ids.len(), 6);
    for match_id in group_ids {
        let m = t.get_match(match_id).unwrap().clone();
        let (home, away) = m.competitors().unwrap();
        t.apply_result(match_id, &MatchReport::new(home.clone(), away.clone(), 3, 0))
            .unwrap();
    }

    let top0 = t.standings(StandingsFilter::group(0))[0].competitor.clone();
    let top1 = t.standings(StandingsFilter::group(1))[0].competitor.clone();
    let knockout: Vec<&Match> = t.matches().in_stage(Stage::Knockout).collect();
    assert_eq!(knockout.len(), 1);
    assert_eq!(knockout[0].competitors(), Some((&top0, &top1)));
}

#[test]
fn test_singleton_groups_go_straight_to_playoff() {
    let settings = FormatSettings {
        groups: 3,
        advance_per_group: 1,
        ..Default::default()
    };
    let t = Tournament::create(
        TournamentId(6),
        "Tiny",
        Format::GroupsThenPlayoff,
        settings,
        ids(&["A", "B", "C"]),
    )
    .unwrap();
    assert!(t.matches().in_stage(Stage::Group).next().is_none());
    assert_eq!(t.matches().in_stage(Stage::Knockout).count(), 3);
    assert_eq!(t.pending_matches().len(), 1);
}

#[test]
fn test_two_legged_knockout_with_decider() {
    let mut t = knockout(&["A", "B"], true);
    t.apply_result(MatchId(0), &MatchReport::new("A", "B", 3, 0)).unwrap();
    let outcome = t.apply_result(MatchId(1), &MatchReport::new("B", "A", 3, 0)).unwrap();
    let decider = outcome.applied().unwrap().decider_scheduled.unwrap();
    assert!(!t.is_finished());
    assert_eq!(t.pending_matches().len(), 1);

    let outcome = t.apply_result(decider, &MatchReport::new("B", "A", 3, 2)).unwrap();
    assert_eq!(outcome.applied().unwrap().finished, Some(id("B")));
    assert_eq!(t.winner(), Some(&id("B")));
}

#[test]
fn test_invalid_settings_are_rejected() {
    let zero_cutoff = FormatSettings {
        knockout_cutoff: 0,
        ..Default::default()
    };
    assert!(matches!(
        Tournament::create(
            TournamentId(7),
            "x",
            Format::LeagueThenPlayoff,
            zero_cutoff,
            ids(&["A", "B"])
        ),
        Err(TournamentError::InvalidSettings(_))
    ));

    let zero_legs = FormatSettings {
        legs: 0,
        ..Default::default()
    };
    assert!(matches!(
        Tournament::create(TournamentId(8), "x", Format::League, zero_legs, ids(&["A", "B"])),
        Err(TournamentError::Bracket(arena_core::BracketError::InvalidLegCount))
    ));

    assert!(matches!(
        Tournament::create(
            TournamentId(9),
            "x",
            Format::Knockout,
            FormatSettings::default(),
            ids(&["A"])
        ),
        Err(TournamentError::Bracket(arena_core::BracketError::TooFewParticipants(1)))
    ));
}
