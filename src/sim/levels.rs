//! Level table
//!
//! 99 levels generated once from their index. Later levels need more
//! crystals, spawn asteroids more often and throw them faster.

use std::ops::RangeInclusive;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::consts::LEVEL_COUNT;
use crate::error::{GameError, GameResult};

/// Levels shown per page of the level select grid
pub const LEVELS_PER_PAGE: u32 = 12;

/// Difficulty band shown next to a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    VeryHard,
    Extreme,
    Insane,
}

impl Difficulty {
    pub fn for_level(level: u32) -> Self {
        match level {
            0..=19 => Difficulty::Easy,
            20..=39 => Difficulty::Medium,
            40..=59 => Difficulty::Hard,
            60..=79 => Difficulty::VeryHard,
            80..=94 => Difficulty::Extreme,
            _ => Difficulty::Insane,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::VeryHard => "Very Hard",
            Difficulty::Extreme => "Extreme",
            Difficulty::Insane => "Insane",
        }
    }
}

/// Difficulty parameters of one level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Score that completes the level
    pub target_score: u64,
    /// Ticks between asteroid spawns
    pub spawn_interval: u32,
    /// Base asteroid speed (pixels per tick)
    pub asteroid_speed: f32,
    pub difficulty: Difficulty,
}

impl LevelConfig {
    fn generate(level: u32) -> Self {
        let step = level - 1;
        Self {
            target_score: 50 + 5 * step as u64,
            spawn_interval: 120u32.saturating_sub(step).max(20),
            asteroid_speed: (1.0 + 0.025 * step as f32).min(3.5),
            difficulty: Difficulty::for_level(level),
        }
    }
}

static LEVELS: LazyLock<Vec<LevelConfig>> =
    LazyLock::new(|| (1..=LEVEL_COUNT).map(LevelConfig::generate).collect());

/// Look up a level by its 1-based number
pub fn level_config(level: u32) -> GameResult<LevelConfig> {
    if !(1..=LEVEL_COUNT).contains(&level) {
        return Err(GameError::OutOfRange {
            level,
            max: LEVEL_COUNT,
        });
    }
    Ok(LEVELS[(level - 1) as usize])
}

/// All levels in order
pub fn all_levels() -> &'static [LevelConfig] {
    &LEVELS
}

/// Number of level select pages
pub fn page_count() -> u32 {
    LEVEL_COUNT.div_ceil(LEVELS_PER_PAGE)
}

/// Level numbers shown on a 1-based level select page
pub fn levels_on_page(page: u32) -> GameResult<RangeInclusive<u32>> {
    if !(1..=page_count()).contains(&page) {
        return Err(GameError::OutOfRange {
            level: page,
            max: page_count(),
        });
    }
    let first = (page - 1) * LEVELS_PER_PAGE + 1;
    let last = (first + LEVELS_PER_PAGE - 1).min(LEVEL_COUNT);
    Ok(first..=last)
}
