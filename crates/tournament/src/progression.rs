//! Experience and levelling

use arena_core::{Competitor, Rarity};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Base experience for a win, before the rarity multiplier
pub const XP_PER_WIN: u32 = 1;
/// Experience needed to leave level 1
pub const BASE_XP_NEEDED: u32 = 5;
/// Extra experience needed per level above 1
pub const XP_INCREMENT_PER_LEVEL: u32 = 5;
/// Chance of learning a new skill on each level gained
pub const SKILL_CHANCE_ON_LEVEL_UP: f64 = 0.15;

/// Experience needed to go from `level` to the next one.
pub fn xp_needed(level: u32) -> u32 {
    BASE_XP_NEEDED + level.saturating_sub(1) * XP_INCREMENT_PER_LEVEL
}

/// Experience awarded for one win.
pub fn win_xp(rarity: Rarity) -> u32 {
    XP_PER_WIN * rarity.xp_multiplier()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUp {
    pub from: u32,
    pub to: u32,
    /// Experience left over after the last level gained
    pub remaining_xp: u32,
    pub skills_gained: u32,
}

/// Work out the level-ups a competitor's current experience pays for.
///
/// Leftover experience carries into the next level.
pub fn check_level_up<R: Rng + ?Sized>(competitor: &Competitor, rng: &mut R) -> Option<LevelUp> {
    let mut level = competitor.level;
    let mut xp = competitor.xp;
    let mut skills_gained = 0;

    while xp >= xp_needed(level) {
        xp -= xp_needed(level);
        level += 1;
        if rng.gen::<f64>() < SKILL_CHANCE_ON_LEVEL_UP {
            skills_gained += 1;
        }
    }

    (level > competitor.level).then_some(LevelUp {
        from: competitor.level,
        to: level,
        remaining_xp: xp,
        skills_gained,
    })
}
