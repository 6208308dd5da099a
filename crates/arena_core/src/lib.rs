//! Core of the arena ladder.
//!
//! This crate holds everything that does not depend on a running session:
//! - Competitors and synthetic opponents
//! - The best-of-five duel model
//! - Knockout, round-robin and group bracket builders over a match arena
//! - Standings derived from match results

pub mod duel;
pub mod error;
pub mod groups;
pub mod knockout;
pub mod matches;
pub mod model;
pub mod round_robin;
pub mod standings;

pub use duel::*;
pub use error::BracketError;
pub use groups::*;
pub use knockout::*;
pub use matches::*;
pub use model::*;
pub use round_robin::*;
pub use standings::*;
