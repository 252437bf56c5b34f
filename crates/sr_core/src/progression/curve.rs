//! Level curve
//!
//! Piecewise step function. Tier boundaries are not smoothed: the jump at
//! level 11, 26, 51 and 76 is part of the balance table.
//!
//! | Levels  | XP to reach level            |
//! |---------|------------------------------|
//! | 2-10    | 200 + (level - 2) * 150      |
//! | 11-25   | 1500 + (level - 10) * 250    |
//! | 26-50   | 5000 + (level - 25) * 400    |
//! | 51-75   | 15000 + (level - 50) * 600   |
//! | 76+     | 30000 + (level - 75) * 800   |

use serde::{Deserialize, Serialize};

pub const MAX_LEVEL: u32 = 100;

/// `xp_to_next` reported once the cap is reached.
pub const MAX_LEVEL_XP_TO_NEXT: u64 = 20_000;

/// XP needed to advance from `level - 1` to `level`.
pub fn xp_required_for_level(level: u32) -> u64 {
    let level = level as u64;
    match level {
        0..=1 => 0,
        2..=10 => 200 + (level - 2) * 150,
        11..=25 => 1_500 + (level - 10) * 250,
        26..=50 => 5_000 + (level - 25) * 400,
        51..=75 => 15_000 + (level - 50) * 600,
        _ => 30_000 + (level - 75) * 800,
    }
}

/// Sum of `xp_required_for_level(2..=level)`.
pub fn total_xp_for_level(level: u32) -> u64 {
    (2..=level.min(MAX_LEVEL)).map(xp_required_for_level).sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
    pub level: u32,
    pub current_xp: u64,
    pub xp_to_next: u64,
}

impl LevelProgress {
    pub fn is_max_level(&self) -> bool {
        self.level >= MAX_LEVEL
    }

    pub fn progress_percentage(&self) -> f32 {
        if self.xp_to_next == 0 {
            return 100.0;
        }
        (self.current_xp as f32 / self.xp_to_next as f32 * 100.0).min(100.0)
    }
}

pub fn level_from_total_xp(total_xp: u64) -> LevelProgress {
    let mut level = 1;
    let mut remaining = total_xp;

    while level < MAX_LEVEL {
        let needed = xp_required_for_level(level + 1);
        if needed == 0 || remaining < needed {
            return LevelProgress { level, current_xp: remaining, xp_to_next: needed };
        }
        remaining -= needed;
        level += 1;
    }

    LevelProgress { level: MAX_LEVEL, current_xp: remaining, xp_to_next: MAX_LEVEL_XP_TO_NEXT }
}
