use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::progression::xp_reward_for_duration;

/// Quest category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestCategory {
    Study,
    Fitness,
    Coding,
    Money,
    Social,
}

impl QuestCategory {
    pub const ALL: [QuestCategory; 5] = [
        QuestCategory::Study,
        QuestCategory::Fitness,
        QuestCategory::Coding,
        QuestCategory::Money,
        QuestCategory::Social,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestCategory::Study => "study",
            QuestCategory::Fitness => "fitness",
            QuestCategory::Coding => "coding",
            QuestCategory::Money => "money",
            QuestCategory::Social => "social",
        }
    }
}

impl fmt::Display for QuestCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// The five profile stats a quest can boost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Strength,
    Intelligence,
    Endurance,
    Willpower,
    Social,
}

impl StatKind {
    pub const ALL: [StatKind; 5] = [
        StatKind::Strength,
        StatKind::Intelligence,
        StatKind::Endurance,
        StatKind::Willpower,
        StatKind::Social,
    ];
}

/// Sparse stat boosts (stat -> amount)
pub type StatBoosts = BTreeMap<StatKind, u8>;

/// Quest template. Never mutated once defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: QuestCategory,
    pub difficulty: Difficulty,
    pub estimated_minutes: u32,
    pub xp_reward: u64,
    pub gold_reward: u64,
    #[serde(default)]
    pub stat_boosts: StatBoosts,
}

impl Quest {
    /// Custom quest whose XP follows the duration table.
    pub fn from_duration(
        id: impl Into<String>,
        name: impl Into<String>,
        category: QuestCategory,
        difficulty: Difficulty,
        estimated_minutes: u32,
        gold_reward: u64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category,
            difficulty,
            estimated_minutes,
            xp_reward: xp_reward_for_duration(estimated_minutes),
            gold_reward,
            stat_boosts: StatBoosts::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_boost(mut self, stat: StatKind, amount: u8) -> Self {
        self.stat_boosts.insert(stat, amount);
        self
    }

    pub fn estimated_seconds(&self) -> i64 {
        self.estimated_minutes as i64 * 60
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(CoreError::InvalidParameter("quest id is empty".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(CoreError::InvalidParameter(format!("quest {} has no name", self.id)));
        }
        if self.estimated_minutes == 0 {
            return Err(CoreError::InvalidParameter(format!(
                "quest {} has zero estimated minutes",
                self.id
            )));
        }
        if let Some((stat, _)) = self.stat_boosts.iter().find(|(_, amount)| **amount == 0) {
            return Err(CoreError::InvalidParameter(format!(
                "quest {} has a zero boost for {:?}",
                self.id, stat
            )));
        }
        Ok(())
    }
}

/// Append-only completion history row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedQuest {
    pub id: Uuid,
    pub user_id: String,
    pub quest_id: String,
    pub quest_name: String,
    pub category: QuestCategory,
    /// XP after the late penalty
    pub xp_earned: u64,
    pub gold_earned: u64,
    pub time_taken_seconds: i64,
    pub was_late: bool,
    pub completed_at: DateTime<Utc>,
}
