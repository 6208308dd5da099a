use super::*;
use crate::config::ArenaConfig;
use crate::format::{Format, FormatSettings};
use crate::season::SeasonSettings;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn session_with(players: usize, config: ArenaConfig) -> (Session, Vec<CompetitorId>) {
    let mut session = Session::new(config).unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    let ids = (0..players)
        .map(|i| session.add_competitor(format!("Player {}", i + 1), &mut rng))
        .collect();
    (session, ids)
}

fn run_format(format: Format, settings: FormatSettings, players: usize) {
    let (mut session, ids) = session_with(players, ArenaConfig::default());
    let tid = session
        .create_tournament("Run", format, settings, ids.clone())
        .unwrap();
    let mut rng = StdRng::seed_from_u64(42);

    let summary = quick_run(&mut session, tid, &mut rng).unwrap();

    let t = session.tournament(tid).unwrap();
    assert!(t.is_finished(), "{format} did not finish");
    assert_eq!(summary.winner.as_ref(), t.winner());
    assert!(ids.contains(summary.winner.as_ref().unwrap()));
    assert_eq!(
        summary.matches_played as usize,
        session.history().for_tournament(tid).count()
    );
    assert_eq!(
        session.competitor(summary.winner.as_ref().unwrap()).unwrap().stats.championships,
        1
    );
}

#[test]
fn test_knockout_runs_to_completion() {
    run_format(Format::Knockout, FormatSettings::default(), 6);
}

#[test]
fn test_two_legged_knockout_runs_to_completion() {
    let settings = FormatSettings {
        two_legged: true,
        ..Default::default()
    };
    run_format(Format::Knockout, settings, 5);
}

#[test]
fn test_league_runs_to_completion() {
    let settings = FormatSettings {
        legs: 2,
        ..Default::default()
    };
    run_format(Format::League, settings, 5);
}

#[test]
fn test_league_then_playoff_runs_to_completion() {
    run_format(Format::LeagueThenPlayoff, FormatSettings::default(), 6);
}

#[test]
fn test_groups_then_playoff_runs_to_completion() {
    run_format(Format::GroupsThenPlayoff, FormatSettings::default(), 7);
}

#[test]
fn test_max_matches_stops_early() {
    let (mut session, ids) = session_with(4, ArenaConfig::default());
    let tid = session
        .create_tournament("Run", Format::League, FormatSettings::default(), ids)
        .unwrap();
    let runner = TournamentRunner::new(RunnerConfig {
        max_matches: 2,
        verbose: false,
        ..Default::default()
    });

    let summary = runner
        .run(&mut session, tid, &mut StdRng::seed_from_u64(1))
        .unwrap();
    assert_eq!(summary.matches_played, 2);
    assert_eq!(summary.winner, None);
    assert!(!session.tournament(tid).unwrap().is_finished());
}

#[test]
fn test_favored_competitor_counted_only_in_own_matches() {
    let (mut session, ids) = session_with(4, ArenaConfig::default());
    let tid = session
        .create_tournament("Run", Format::League, FormatSettings::default(), ids.clone())
        .unwrap();
    let runner = TournamentRunner::new(RunnerConfig {
        favored: Some(ids[0].clone()),
        verbose: false,
        ..Default::default()
    });

    runner
        .run(&mut session, tid, &mut StdRng::seed_from_u64(3))
        .unwrap();
    assert_eq!(session.competitor(&ids[0]).unwrap().stats.favored_count, 3);
    assert_eq!(session.competitor(&ids[1]).unwrap().stats.favored_count, 0);
}

#[test]
fn test_random_duels_close_seasons() {
    let config = ArenaConfig {
        season: SeasonSettings {
            duel_threshold: 10,
            ..Default::default()
        },
        ..Default::default()
    };
    let (mut session, _) = session_with(4, config);

    let seasons = play_random_duels(&mut session, 25, &mut StdRng::seed_from_u64(9)).unwrap();
    assert_eq!(seasons.len(), 2);
    assert_eq!(session.season().duel_count, 5);
    assert_eq!(session.history().len(), 25);
}

#[test]
fn test_unknown_tournament() {
    let (mut session, _) = session_with(2, ArenaConfig::default());
    assert_eq!(
        quick_run(&mut session, TournamentId(3), &mut StdRng::seed_from_u64(0)),
        Err(SessionError::UnknownTournament(TournamentId(3)))
    );
}
