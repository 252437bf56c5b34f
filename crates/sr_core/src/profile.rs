//! User profile
//!
//! The persistent per-user row plus the partial update sent back to the
//! store. Profiles are never deleted here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cosmetics::EquippedCosmetics;
use crate::progression::level_from_total_xp;
use crate::quest::{StatBoosts, StatKind};

pub const STAT_MAX: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub strength: u8,
    pub intelligence: u8,
    pub endurance: u8,
    pub willpower: u8,
    pub social: u8,
}

impl Stats {
    pub fn get(&self, stat: StatKind) -> u8 {
        match stat {
            StatKind::Strength => self.strength,
            StatKind::Intelligence => self.intelligence,
            StatKind::Endurance => self.endurance,
            StatKind::Willpower => self.willpower,
            StatKind::Social => self.social,
        }
    }

    fn get_mut(&mut self, stat: StatKind) -> &mut u8 {
        match stat {
            StatKind::Strength => &mut self.strength,
            StatKind::Intelligence => &mut self.intelligence,
            StatKind::Endurance => &mut self.endurance,
            StatKind::Willpower => &mut self.willpower,
            StatKind::Social => &mut self.social,
        }
    }

    pub fn values(&self) -> [u8; 5] {
        [self.strength, self.intelligence, self.endurance, self.willpower, self.social]
    }

    /// Add each boost, clamped to `cap`. Returns the gains actually applied.
    pub fn apply_boosts(&mut self, boosts: &StatBoosts, cap: u8) -> StatBoosts {
        let mut gained = StatBoosts::new();
        for (&stat, &amount) in boosts {
            let value = self.get_mut(stat);
            let before = *value;
            if before >= cap {
                continue;
            }
            *value = before.saturating_add(amount).min(cap);
            if *value > before {
                gained.insert(stat, *value - before);
            }
        }
        gained
    }
}

/// Leaderboard positions. 0 means unranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ranks {
    pub global: u32,
    pub country: u32,
    pub city: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub username: String,
    pub level: u32,
    /// XP inside the current level
    pub current_xp: u64,
    pub total_xp: u64,
    pub gold: u64,
    pub total_gold_earned: u64,
    #[serde(default)]
    pub stats: Stats,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    #[serde(default)]
    pub total_quests_completed: u32,
    #[serde(default)]
    pub missed_days: u32,
    #[serde(default)]
    pub last_active_day: Option<NaiveDate>,
    /// Last day already counted by the missed-day penalty
    #[serde(default)]
    pub missed_days_settled_through: Option<NaiveDate>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub ranks: Ranks,
    #[serde(default)]
    pub active_title: Option<String>,
    #[serde(default)]
    pub equipped: EquippedCosmetics,
}

impl UserProfile {
    /// Fresh profile as created at registration.
    pub fn new(user_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            level: 1,
            current_xp: 0,
            total_xp: 0,
            gold: 0,
            total_gold_earned: 0,
            stats: Stats::default(),
            current_streak: 0,
            longest_streak: 0,
            total_quests_completed: 0,
            missed_days: 0,
            last_active_day: None,
            missed_days_settled_through: None,
            country: None,
            city: None,
            ranks: Ranks::default(),
            active_title: None,
            equipped: EquippedCosmetics::default(),
        }
    }

    pub fn xp_to_next(&self) -> u64 {
        level_from_total_xp(self.total_xp).xp_to_next
    }

    /// Advance the streak for activity on `today`.
    ///
    /// Same day: unchanged. Day after the last active day: +1. Anything
    /// else starts a new streak of 1.
    pub fn record_activity(&mut self, today: NaiveDate) {
        match self.last_active_day {
            Some(last) if last == today => return,
            Some(last) if last.succ_opt() == Some(today) => self.current_streak += 1,
            _ => self.current_streak = 1,
        }
        self.longest_streak = self.longest_streak.max(self.current_streak);
        self.last_active_day = Some(today);
    }
}

/// Partial profile write. `None` fields are left untouched by the store.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_xp: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_xp: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gold: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_gold_earned: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<Stats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_quests_completed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_streak: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longest_streak: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missed_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_active_day: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missed_days_settled_through: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipped: Option<EquippedCosmetics>,
}

impl ProfileUpdate {
    /// Every field a quest settlement touches.
    pub fn settlement(profile: &UserProfile) -> Self {
        Self {
            level: Some(profile.level),
            current_xp: Some(profile.current_xp),
            total_xp: Some(profile.total_xp),
            gold: Some(profile.gold),
            total_gold_earned: Some(profile.total_gold_earned),
            stats: Some(profile.stats),
            total_quests_completed: Some(profile.total_quests_completed),
            current_streak: Some(profile.current_streak),
            longest_streak: Some(profile.longest_streak),
            last_active_day: profile.last_active_day,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(&self, profile: &mut UserProfile) {
        if let Some(v) = self.level {
            profile.level = v;
        }
        if let Some(v) = self.current_xp {
            profile.current_xp = v;
        }
        if let Some(v) = self.total_xp {
            profile.total_xp = v;
        }
        if let Some(v) = self.gold {
            profile.gold = v;
        }
        if let Some(v) = self.total_gold_earned {
            profile.total_gold_earned = v;
        }
        if let Some(v) = self.stats {
            profile.stats = v;
        }
        if let Some(v) = self.total_quests_completed {
            profile.total_quests_completed = v;
        }
        if let Some(v) = self.current_streak {
            profile.current_streak = v;
        }
        if let Some(v) = self.longest_streak {
            profile.longest_streak = v;
        }
        if let Some(v) = self.missed_days {
            profile.missed_days = v;
        }
        if let Some(v) = self.last_active_day {
            profile.last_active_day = Some(v);
        }
        if let Some(v) = self.missed_days_settled_through {
            profile.missed_days_settled_through = Some(v);
        }
        if let Some(v) = &self.active_title {
            profile.active_title = Some(v.clone());
        }
        if let Some(v) = &self.equipped {
            profile.equipped = v.clone();
        }
    }
}
