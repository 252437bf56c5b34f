//! Progression math
//!
//! Pure functions over non-negative integers: level curve, level-up gold,
//! duration XP, late and missed-day penalties.

pub mod curve;
pub mod rewards;

pub use curve::{
    level_from_total_xp, total_xp_for_level, xp_required_for_level, LevelProgress, MAX_LEVEL,
    MAX_LEVEL_XP_TO_NEXT,
};
pub use rewards::{
    apply_xp_penalty, gold_reward_for_level_up, late_penalty_percent, missed_days_penalty,
    xp_reward_for_duration,
};
