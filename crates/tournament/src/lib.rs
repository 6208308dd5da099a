//! Arena ladder: tournaments, seasons and the session that ties them together
//!
//! This crate provides infrastructure for:
//! - Running knockout, league and hybrid tournaments over `arena_core` brackets
//! - Promotion and relegation between divisions at the end of each season
//! - Experience, levels, tower climbs and world duels for a persistent roster
//! - Leaderboards and duel history reports
//!
//! # Usage
//!
//! ```bash
//! # Run an eight-player knockout
//! cargo run -p tournament -- --participants 8 tournament knockout
//!
//! # Play a full season of random duels across two divisions
//! cargo run -p tournament -- --participants 10 season --duels 100 --divisions 2
//! ```

mod config;
mod delta;
mod error;
mod format;
mod history;
mod progression;
mod runner;
mod season;
mod session;
mod stats;
mod tournament;

pub use config::*;
pub use delta::*;
pub use error::*;
pub use format::*;
pub use history::*;
pub use progression::*;
pub use runner::*;
pub use season::*;
pub use session::*;
pub use stats::*;
pub use tournament::*;
