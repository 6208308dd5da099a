//! Tournament CLI
//!
//! Build a roster, then run a tournament, a season of random duels or a
//! tower climb. The session can be saved as JSON and loaded again later.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use arena_core::{CompetitorId, Stage, StandingsFilter};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tournament::{
    format_leaderboard, play_random_duels, rivalries, ArenaConfig, Format, FormatSettings,
    Leaderboard, RunnerConfig, SeasonReport, Session, TournamentRunner,
};

#[derive(Parser)]
#[command(name = "tournament")]
#[command(about = "Arena ladder tournaments, seasons and tower climbs", long_about = None)]
struct Cli {
    /// Seed for every random roll (random if omitted)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Competitors to create for a new session
    #[arg(long, short = 'n', global = true, default_value_t = 8)]
    participants: u32,

    /// Continue a session saved with --save
    #[arg(long, global = true)]
    load: Option<PathBuf>,

    /// Write the session as JSON when done
    #[arg(long, global = true)]
    save: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Knockout,
    League,
    LeaguePlayoff,
    GroupsPlayoff,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Knockout => Format::Knockout,
            FormatArg::League => Format::League,
            FormatArg::LeaguePlayoff => Format::LeagueThenPlayoff,
            FormatArg::GroupsPlayoff => Format::GroupsThenPlayoff,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run one tournament between every competitor on the roster
    Tournament {
        #[arg(value_enum, default_value_t = FormatArg::Knockout)]
        format: FormatArg,

        #[arg(long, default_value = "Arena Cup")]
        name: String,

        /// Times each pair meets in a league or group
        #[arg(long, default_value_t = 1)]
        legs: u32,

        /// Play knockout ties home and away
        #[arg(long)]
        two_legged: bool,

        #[arg(long, default_value_t = 2)]
        groups: u32,

        /// Qualifiers per group
        #[arg(long, default_value_t = 2)]
        advance: u32,

        /// Qualifiers from the league table
        #[arg(long, default_value_t = 4)]
        cutoff: u32,

        /// Competitor id to favor in each of their matches
        #[arg(long)]
        favor: Option<String>,

        /// Only print the result
        #[arg(long, short)]
        quiet: bool,
    },

    /// Play random duels across the divisions
    Season {
        #[arg(long, default_value_t = 100)]
        duels: u32,

        /// Divisions to have unlocked before playing
        #[arg(long, default_value_t = 1)]
        divisions: u32,
    },

    /// Climb the tower with one competitor
    Tower {
        /// Competitor id (first on the roster if omitted)
        #[arg(long)]
        competitor: Option<String>,
    },

    /// Play random duels, then print every leaderboard
    Leaderboard {
        #[arg(long, default_value_t = 50)]
        duels: u32,

        #[arg(long, default_value_t = 5)]
        top: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = open_session(&cli, &mut rng)?;

    match cli.command {
        Commands::Tournament {
            format,
            name,
            legs,
            two_legged,
            groups,
            advance,
            cutoff,
            favor,
            quiet,
        } => {
            let settings = FormatSettings {
                legs,
                two_legged,
                groups,
                advance_per_group: advance,
                knockout_cutoff: cutoff,
            };
            let format = Format::from(format);
            let participants: Vec<CompetitorId> =
                session.roster().iter().map(|c| c.id.clone()).collect();

            println!("=== {} ({}) ===", name, format);
            println!("Participants: {}", participants.len());
            println!();

            let tid = session.create_tournament(name, format, settings, participants)?;
            let runner = TournamentRunner::new(RunnerConfig {
                favored: favor.map(CompetitorId::new),
                verbose: !quiet,
                ..Default::default()
            });
            let summary = runner.run(&mut session, tid, &mut rng)?;

            let t = session
                .tournament(tid)
                .context("tournament vanished from the session")?;
            if !quiet && format != Format::Knockout {
                let stage = match format {
                    Format::GroupsThenPlayoff => Stage::Group,
                    _ => Stage::League,
                };
                println!();
                println!("{:<4} {:<24} {:>6} {:>6} {:>6}", "#", "Competitor", "P", "W", "Pts");
                for (rank, entry) in t.standings(StandingsFilter::stage(stage)).iter().enumerate() {
                    println!(
                        "{:<4} {:<24} {:>6} {:>6} {:>6}",
                        rank + 1,
                        display_name(&session, &entry.competitor),
                        entry.played,
                        entry.wins,
                        entry.points
                    );
                }
            }

            println!();
            println!("=== Final Result ===");
            println!("Matches played: {}", summary.matches_played);
            match &summary.winner {
                Some(winner) => println!("Champion: {}", display_name(&session, winner)),
                None => println!("No champion"),
            }
            print_seasons(&session, &summary.seasons);
        }

        Commands::Season { duels, divisions } => {
            while session.season().unlocked_divisions < divisions {
                session.unlock_division()?;
            }
            let seasons = play_random_duels(&mut session, duels, &mut rng)?;
            print_seasons(&session, &seasons);

            println!();
            println!("=== Current Tables ===");
            for table in session.season().tables(session.roster()) {
                println!("Division {}", table.division);
                for (rank, (id, points)) in table.ranking.iter().enumerate() {
                    println!("  {:<4} {:<24} {:>6}", rank + 1, display_name(&session, id), points);
                }
            }
        }

        Commands::Tower { competitor } => {
            let id = match competitor {
                Some(id) => CompetitorId::new(id),
                None => match session.roster().first() {
                    Some(c) => c.id.clone(),
                    None => bail!("the roster is empty"),
                },
            };
            let report = session.climb_tower(&id, &mut rng)?;
            for (floor, duel) in report.duels.iter().enumerate() {
                println!(
                    "Floor {}: {}-{}",
                    floor + 1,
                    duel.record.score.first,
                    duel.record.score.second
                );
            }
            println!();
            println!(
                "{} cleared {} floor(s){}",
                display_name(&session, &id),
                report.floors_cleared,
                if report.reached_top { " and reached the top" } else { "" }
            );
        }

        Commands::Leaderboard { duels, top } => {
            let seasons = play_random_duels(&mut session, duels, &mut rng)?;
            print_seasons(&session, &seasons);
            for kind in Leaderboard::ALL {
                print!("{}", format_leaderboard(kind, &session.leaderboard(kind), top));
            }
            println!("{}", session.history().generate_report(session.roster(), top));

            println!("=== Rivalries ===");
            for rivalry in rivalries(session.roster(), session.history()).iter().take(top) {
                println!(
                    "{:<24} beat {:<24} {:>4} time(s)",
                    display_name(&session, &rivalry.competitor),
                    display_name(&session, &rivalry.rival),
                    rivalry.wins
                );
            }
        }
    }

    if let Some(path) = &cli.save {
        let json = serde_json::to_string_pretty(&session)?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        info!("Session saved to {}", path.display());
    }

    Ok(())
}

fn open_session(cli: &Cli, rng: &mut StdRng) -> Result<Session> {
    if let Some(path) = &cli.load {
        return load_session(path);
    }

    let config = match &cli.config {
        Some(path) => ArenaConfig::load(path)?,
        None => ArenaConfig::default(),
    };
    let mut session = Session::new(config)?;
    for i in 1..=cli.participants {
        session.add_competitor(format!("Fighter {:02}", i), rng);
    }
    Ok(session)
}

fn load_session(path: &Path) -> Result<Session> {
    let json =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let session: Session = serde_json::from_str(&json)
        .with_context(|| format!("{} is not a saved session", path.display()))?;
    session
        .config
        .validate()
        .with_context(|| format!("{} holds an invalid config", path.display()))?;
    info!("Session loaded from {}", path.display());
    Ok(session)
}

fn display_name(session: &Session, id: &CompetitorId) -> String {
    session
        .competitor(id)
        .map_or_else(|| id.to_string(), |c| c.name.clone())
}

fn print_seasons(session: &Session, seasons: &[SeasonReport]) {
    for report in seasons {
        println!();
        println!("=== Season {} ===", report.season);
        if let Some(champion) = &report.champion {
            println!("Champion: {}", display_name(session, champion));
        }
        for m in &report.moves {
            let verb = if m.to < m.from { "promoted" } else { "relegated" };
            println!(
                "{} {} to division {}",
                display_name(session, &m.competitor),
                verb,
                m.to
            );
        }
    }
}
