//! Reward settlement
//!
//! Pure part of quest completion: turns an [`ActiveQuest`] and the current
//! profile into a reward, the next profile state and the history row.
//! Persistence and the achievement pass happen in the session.
//!
//! Only XP is penalized for lateness. Quest gold is always paid in full.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::DayKey;
use crate::profile::UserProfile;
use crate::progression::{
    apply_xp_penalty, gold_reward_for_level_up, late_penalty_percent, level_from_total_xp,
};
use crate::quest::{ActiveQuest, CompletedQuest, StatBoosts};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardResult {
    pub quest_id: String,
    /// XP after the late penalty
    pub xp_earned: u64,
    /// Quest gold plus any level-up bonus
    pub gold_earned: u64,
    pub level_up_gold: u64,
    pub was_late: bool,
    pub minutes_late: f64,
    pub penalty_percent: u32,
    pub time_taken_seconds: i64,
    pub leveled_up: bool,
    pub new_level: Option<u32>,
    pub level: u32,
    pub current_xp: u64,
    pub xp_to_next: u64,
    pub stat_gains: StatBoosts,
    pub achievements_unlocked: Vec<String>,
    pub quests_completed_today: u32,
}

/// Computed outcome of one completion, not yet persisted
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub reward: RewardResult,
    pub profile: UserProfile,
    pub record: CompletedQuest,
}

/// Lateness of a quest from its remaining seconds. Zero is on time.
pub fn lateness(remaining_seconds: i64) -> (bool, f64) {
    if remaining_seconds < 0 {
        (true, remaining_seconds.unsigned_abs() as f64 / 60.0)
    } else {
        (false, 0.0)
    }
}

pub fn settle(
    active: &ActiveQuest,
    profile: &UserProfile,
    today: DayKey,
    now: DateTime<Utc>,
    stat_cap: u8,
) -> Settlement {
    let quest = &active.quest;

    let time_taken_seconds = quest.estimated_seconds() - active.remaining_seconds;
    let (was_late, minutes_late) = lateness(active.remaining_seconds);
    let penalty_percent = late_penalty_percent(minutes_late);
    let xp_earned = apply_xp_penalty(quest.xp_reward, penalty_percent);

    let mut next = profile.clone();
    next.total_xp = profile.total_xp + xp_earned;
    let progress = level_from_total_xp(next.total_xp);
    next.level = progress.level;
    next.current_xp = progress.current_xp;

    let leveled_up = progress.level > profile.level;
    let level_up_gold = if leveled_up { gold_reward_for_level_up(progress.level) } else { 0 };
    let gold_earned = quest.gold_reward + level_up_gold;
    next.gold += gold_earned;
    next.total_gold_earned += gold_earned;

    let stat_gains = next.stats.apply_boosts(&quest.stat_boosts, stat_cap);
    next.total_quests_completed += 1;
    next.record_activity(today.date());

    let record = CompletedQuest {
        id: Uuid::new_v4(),
        user_id: profile.user_id.clone(),
        quest_id: quest.id.clone(),
        quest_name: quest.name.clone(),
        category: quest.category,
        xp_earned,
        gold_earned,
        time_taken_seconds,
        was_late,
        completed_at: now,
    };

    let reward = RewardResult {
        quest_id: quest.id.clone(),
        xp_earned,
        gold_earned,
        level_up_gold,
        was_late,
        minutes_late,
        penalty_percent,
        time_taken_seconds,
        leveled_up,
        new_level: leveled_up.then_some(progress.level),
        level: progress.level,
        current_xp: progress.current_xp,
        xp_to_next: progress.xp_to_next,
        stat_gains,
        achievements_unlocked: Vec::new(),
        quests_completed_today: 0,
    };

    Settlement { reward, profile: next, record }
}
