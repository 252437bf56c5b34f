//! Reward and penalty tables

/// Minutes late below which the lighter penalty applies.
pub const LATE_GRACE_MINUTES: f64 = 10.0;

pub fn gold_reward_for_level_up(level: u32) -> u64 {
    500 * level as u64
}

/// Base XP for a quest of the given estimated length.
pub fn xp_reward_for_duration(minutes: u32) -> u64 {
    match minutes {
        0..=15 => 50,
        16..=30 => 100,
        31..=60 => 200,
        61..=90 => 350,
        91..=120 => 500,
        _ => 500 + (minutes as u64 - 120) * 3,
    }
}

/// XP penalty percentage for finishing `minutes_late` past the estimate.
///
/// Step function: any lateness costs half the XP, ten minutes or more costs
/// three quarters.
pub fn late_penalty_percent(minutes_late: f64) -> u32 {
    debug_assert!(minutes_late >= 0.0, "minutes_late must be non-negative");
    if minutes_late <= 0.0 {
        0
    } else if minutes_late < LATE_GRACE_MINUTES {
        50
    } else {
        75
    }
}

/// Gold deducted for a run of missed days.
pub fn missed_days_penalty(days: u32) -> u64 {
    match days {
        0 => 0,
        1 => 2_500,
        2 => 12_500,
        3 => 42_500,
        4 => 92_500,
        _ => 100_000 + (days as u64 - 5) * 50_000,
    }
}

/// `floor(xp * (100 - penalty) / 100)`.
pub fn apply_xp_penalty(xp: u64, penalty_percent: u32) -> u64 {
    let kept = 100u64.saturating_sub(penalty_percent as u64);
    xp * kept / 100
}
