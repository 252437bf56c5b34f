//! Static achievement catalog

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::keywords::CategoryCounts;
use crate::profile::{Ranks, Stats, UserProfile};
use crate::quest::QuestCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementTier {
    Easy,
    Medium,
    Hard,
    VeryHard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankBoard {
    Global,
    Country,
    City,
}

/// Unlock predicate over cumulative metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    LevelAtLeast { level: u32 },
    QuestsCompletedAtLeast { count: u32 },
    /// Current or longest streak
    StreakAtLeast { days: u32 },
    GoldEarnedAtLeast { gold: u64 },
    AnyStatAtLeast { value: u8 },
    AllStatsAtLeast { value: u8 },
    /// Rank in `1..=best`; 0 (unranked) never matches
    RankWithin { board: RankBoard, best: u32 },
    FriendsAtLeast { count: u32 },
    CosmeticsOwnedAtLeast { count: u32 },
    CategoryCountAtLeast { category: QuestCategory, count: u32 },
}

/// Profile numbers the predicates read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProfileMetrics {
    pub level: u32,
    pub total_quests_completed: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_gold_earned: u64,
    pub stats: Stats,
    pub ranks: Ranks,
}

impl From<&UserProfile> for ProfileMetrics {
    fn from(profile: &UserProfile) -> Self {
        Self {
            level: profile.level,
            total_quests_completed: profile.total_quests_completed,
            current_streak: profile.current_streak,
            longest_streak: profile.longest_streak,
            total_gold_earned: profile.total_gold_earned,
            stats: profile.stats,
            ranks: profile.ranks,
        }
    }
}

/// Metrics plus the sub-counts fetched separately from the store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationContext {
    pub metrics: ProfileMetrics,
    pub friend_count: u32,
    pub cosmetics_owned: u32,
    pub category_counts: CategoryCounts,
}

impl Condition {
    pub fn is_met(&self, ctx: &EvaluationContext) -> bool {
        let m = &ctx.metrics;
        match *self {
            Condition::LevelAtLeast { level } => m.level >= level,
            Condition::QuestsCompletedAtLeast { count } => m.total_quests_completed >= count,
            Condition::StreakAtLeast { days } => {
                m.current_streak >= days || m.longest_streak >= days
            }
            Condition::GoldEarnedAtLeast { gold } => m.total_gold_earned >= gold,
            Condition::AnyStatAtLeast { value } => m.stats.values().iter().any(|v| *v >= value),
            Condition::AllStatsAtLeast { value } => m.stats.values().iter().all(|v| *v >= value),
            Condition::RankWithin { board, best } => {
                let rank = match board {
                    RankBoard::Global => m.ranks.global,
                    RankBoard::Country => m.ranks.country,
                    RankBoard::City => m.ranks.city,
                };
                (1..=best).contains(&rank)
            }
            Condition::FriendsAtLeast { count } => ctx.friend_count >= count,
            Condition::CosmeticsOwnedAtLeast { count } => ctx.cosmetics_owned >= count,
            Condition::CategoryCountAtLeast { category, count } => {
                ctx.category_counts.get(category) >= count
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub rarity: Rarity,
    pub tier: AchievementTier,
    pub condition: Condition,
}

const fn ach(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    rarity: Rarity,
    tier: AchievementTier,
    condition: Condition,
) -> Achievement {
    Achievement { id, name, description, rarity, tier, condition }
}

use AchievementTier::{Easy, Hard, Medium, VeryHard};
use Condition::*;
use Rarity::{Common, Epic, Legendary, Rare, Uncommon};

#[rustfmt::skip]
pub static CATALOG: Lazy<Vec<Achievement>> = Lazy::new(|| {
    vec![
        // Easy
        ach("ach-first-steps",      "First Steps",            "Complete your first quest",          Common,     Easy,      QuestsCompletedAtLeast { count: 1 }),
        ach("ach-level-5",          "Awakened",               "Reach level 5",                      Common,     Easy,      LevelAtLeast { level: 5 }),
        ach("ach-streak-3",         "Warming Up",             "Keep a 3-day streak",                Common,     Easy,      StreakAtLeast { days: 3 }),
        ach("ach-quests-10",        "Regular",                "Complete 10 quests",                 Common,     Easy,      QuestsCompletedAtLeast { count: 10 }),
        ach("ach-first-friend",     "Party Up",               "Add your first friend",              Common,     Easy,      FriendsAtLeast { count: 1 }),
        ach("ach-first-cosmetic",   "Fresh Look",             "Buy your first cosmetic",            Common,     Easy,      CosmeticsOwnedAtLeast { count: 1 }),
        ach("ach-gold-1000",        "Pocket Change",          "Earn 1,000 gold in total",           Common,     Easy,      GoldEarnedAtLeast { gold: 1_000 }),
        // Medium
        ach("ach-level-10",         "Hunter",                 "Reach level 10",                     Uncommon,   Medium,    LevelAtLeast { level: 10 }),
        ach("ach-streak-7",         "Week Warrior",           "Keep a 7-day streak",                Uncommon,   Medium,    StreakAtLeast { days: 7 }),
        ach("ach-quests-50",        "Dedicated",              "Complete 50 quests",                 Uncommon,   Medium,    QuestsCompletedAtLeast { count: 50 }),
        ach("ach-gold-10000",       "Treasure Keeper",        "Earn 10,000 gold in total",          Uncommon,   Medium,    GoldEarnedAtLeast { gold: 10_000 }),
        ach("ach-stat-50",          "Specialist",             "Raise any stat to 50",               Uncommon,   Medium,    AnyStatAtLeast { value: 50 }),
        ach("ach-friends-5",        "Guild Founder",          "Have 5 friends",                     Uncommon,   Medium,    FriendsAtLeast { count: 5 }),
        ach("ach-collector-5",      "Collector",              "Own 5 cosmetics",                    Uncommon,   Medium,    CosmeticsOwnedAtLeast { count: 5 }),
        ach("ach-scholar",          "Scholar",                "Complete 10 study quests",           Uncommon,   Medium,    CategoryCountAtLeast { category: QuestCategory::Study, count: 10 }),
        ach("ach-athlete",          "Athlete",                "Complete 10 fitness quests",         Uncommon,   Medium,    CategoryCountAtLeast { category: QuestCategory::Fitness, count: 10 }),
        ach("ach-coder",            "Coder",                  "Complete 10 coding quests",          Uncommon,   Medium,    CategoryCountAtLeast { category: QuestCategory::Coding, count: 10 }),
        ach("ach-investor",         "Investor",               "Complete 10 money quests",           Uncommon,   Medium,    CategoryCountAtLeast { category: QuestCategory::Money, count: 10 }),
        ach("ach-socialite",        "Socialite",              "Complete 10 social quests",          Uncommon,   Medium,    CategoryCountAtLeast { category: QuestCategory::Social, count: 10 }),
        // Hard
        ach("ach-level-25",         "Elite Hunter",           "Reach level 25",                     Rare,       Hard,      LevelAtLeast { level: 25 }),
        ach("ach-streak-30",        "Unbroken",               "Keep a 30-day streak",               Rare,       Hard,      StreakAtLeast { days: 30 }),
        ach("ach-quests-100",       "Centurion",              "Complete 100 quests",                Rare,       Hard,      QuestsCompletedAtLeast { count: 100 }),
        ach("ach-balanced",         "Balanced",               "Raise all five stats to 50",         Rare,       Hard,      AllStatsAtLeast { value: 50 }),
        ach("ach-city-top-10",      "Local Legend",           "Reach the top 10 in your city",      Rare,       Hard,      RankWithin { board: RankBoard::City, best: 10 }),
        ach("ach-country-top-100",  "National Contender",     "Reach the top 100 in your country",  Rare,       Hard,      RankWithin { board: RankBoard::Country, best: 100 }),
        ach("ach-study-master",     "Sage",                   "Complete 30 study quests",           Rare,       Hard,      CategoryCountAtLeast { category: QuestCategory::Study, count: 30 }),
        ach("ach-fitness-master",   "Iron Body",              "Complete 30 fitness quests",         Rare,       Hard,      CategoryCountAtLeast { category: QuestCategory::Fitness, count: 30 }),
        ach("ach-coding-master",    "Architect",              "Complete 30 coding quests",          Rare,       Hard,      CategoryCountAtLeast { category: QuestCategory::Coding, count: 30 }),
        ach("ach-money-master",     "Tycoon",                 "Complete 30 money quests",           Rare,       Hard,      CategoryCountAtLeast { category: QuestCategory::Money, count: 30 }),
        ach("ach-social-master",    "Diplomat",               "Complete 30 social quests",          Rare,       Hard,      CategoryCountAtLeast { category: QuestCategory::Social, count: 30 }),
        // Very hard
        ach("ach-level-50",         "National Level Hunter",  "Reach level 50",                     Epic,       VeryHard,  LevelAtLeast { level: 50 }),
        ach("ach-streak-100",       "Relentless",             "Keep a 100-day streak",              Epic,       VeryHard,  StreakAtLeast { days: 100 }),
        ach("ach-quests-500",       "Quest Machine",          "Complete 500 quests",                Epic,       VeryHard,  QuestsCompletedAtLeast { count: 500 }),
        ach("ach-gold-100000",      "Dragon Hoard",           "Earn 100,000 gold in total",         Epic,       VeryHard,  GoldEarnedAtLeast { gold: 100_000 }),
        ach("ach-global-top-10",    "World Ranked",           "Reach the global top 10",            Legendary,  VeryHard,  RankWithin { board: RankBoard::Global, best: 10 }),
        ach("ach-perfect-stats",    "Peak Human",             "Max out all five stats",             Legendary,  VeryHard,  AllStatsAtLeast { value: 100 }),
        ach("ach-level-100",        "Monarch",                "Reach level 100",                    Legendary,  VeryHard,  LevelAtLeast { level: 100 }),
    ]
});

pub fn find(id: &str) -> Option<&'static Achievement> {
    CATALOG.iter().find(|a| a.id == id)
}
