//! Leaderboards over the roster and its history

use arena_core::{Competitor, CompetitorId};
use serde::{Deserialize, Serialize};

use crate::history::History;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Leaderboard {
    Championships,
    Wins,
    Losses,
    LeaguePoints,
    /// Only competitors with at least one duel
    WinRate,
    Level,
    /// Only competitors that cleared a floor
    TowerFloor,
    Favored,
    /// Longest run of wins found in the history
    UnbeatenRun,
}

impl Leaderboard {
    pub const ALL: [Leaderboard; 9] = [
        Leaderboard::Championships,
        Leaderboard::Wins,
        Leaderboard::Losses,
        Leaderboard::LeaguePoints,
        Leaderboard::WinRate,
        Leaderboard::Level,
        Leaderboard::TowerFloor,
        Leaderboard::Favored,
        Leaderboard::UnbeatenRun,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Leaderboard::Championships => "Championships",
            Leaderboard::Wins => "Wins",
            Leaderboard::Losses => "Losses",
            Leaderboard::LeaguePoints => "League Points",
            Leaderboard::WinRate => "Win Rate",
            Leaderboard::Level => "Level",
            Leaderboard::TowerFloor => "Tower Floor",
            Leaderboard::Favored => "Times Favored",
            Leaderboard::UnbeatenRun => "Unbeaten Run",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub competitor: CompetitorId,
    pub name: String,
    pub value: f64,
}

/// Get a sorted leaderboard, best first. Equal values keep roster order.
pub fn leaderboard(
    kind: Leaderboard,
    roster: &[Competitor],
    history: &History,
) -> Vec<LeaderboardRow> {
    let mut rows: Vec<(LeaderboardRow, u32)> = roster
        .iter()
        .filter(|c| match kind {
            Leaderboard::WinRate => c.stats.total_duels() > 0,
            Leaderboard::TowerFloor => c.stats.tower_floor > 0,
            _ => true,
        })
        .map(|c| {
            let stats = &c.stats;
            let value = match kind {
                Leaderboard::Championships => stats.championships as f64,
                Leaderboard::Wins => stats.wins as f64,
                Leaderboard::Losses => stats.losses as f64,
                Leaderboard::LeaguePoints => stats.league_points as f64,
                Leaderboard::WinRate => stats.win_rate() * 100.0,
                Leaderboard::Level => c.level as f64,
                Leaderboard::TowerFloor => stats.tower_floor as f64,
                Leaderboard::Favored => stats.favored_count as f64,
                Leaderboard::UnbeatenRun => history.longest_unbeaten_run(&c.id) as f64,
            };
            // Same level: more experience ranks higher
            let tiebreak = if kind == Leaderboard::Level { c.xp } else { 0 };
            let row = LeaderboardRow {
                competitor: c.id.clone(),
                name: c.name.clone(),
                value,
            };
            (row, tiebreak)
        })
        .collect();

    rows.sort_by(|a, b| {
        b.0.value
            .partial_cmp(&a.0.value)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(b.1.cmp(&a.1))
    });
    rows.into_iter().map(|(row, _)| row).collect()
}

/// Best rivalry per competitor: the opponent beaten most often.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rivalry {
    pub competitor: CompetitorId,
    pub rival: CompetitorId,
    pub wins: u32,
}

/// Rivalries of every competitor that beat someone, most wins first.
pub fn rivalries(roster: &[Competitor], history: &History) -> Vec<Rivalry> {
    let mut rows: Vec<Rivalry> = roster
        .iter()
        .filter_map(|c| {
            history
                .most_beaten_rival(&c.id)
                .map(|(rival, wins)| Rivalry {
                    competitor: c.id.clone(),
                    rival,
                    wins,
                })
        })
        .collect();
    rows.sort_by(|a, b| b.wins.cmp(&a.wins));
    rows
}

/// Render a leaderboard as a text table.
pub fn format_leaderboard(kind: Leaderboard, rows: &[LeaderboardRow], limit: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n=== {} ===\n", kind.title()));
    out.push_str(&format!("{:<4} {:<24} {:>10}\n", "#", "Competitor", kind.title()));
    out.push_str(&"-".repeat(40));
    out.push('\n');
    for (rank, row) in rows.iter().take(limit).enumerate() {
        let value = match kind {
            Leaderboard::WinRate => format!("{:.1}%", row.value),
            _ => format!("{}", row.value as u64),
        };
        out.push_str(&format!("{:<4} {:<24} {:>10}\n", rank + 1, row.name, value));
    }
    out
}

#[cfg(test)]
#[path = "stats_tests.rs"]
mod stats_tests;
