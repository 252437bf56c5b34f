//! Keyword category inference
//!
//! Heuristic only: a quest counts toward a category when its lowercased
//! name contains one of that category's keywords. A name can match several
//! categories, or none. The category stored on each completion row is the
//! authoritative source; see `CategoryInference::Stored`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::quest::QuestCategory;

const STUDY_KEYWORDS: &[&str] =
    &["study", "read", "learn", "book", "homework", "exam", "course", "lecture", "revise"];
const FITNESS_KEYWORDS: &[&str] = &[
    "workout", "run", "gym", "exercise", "push-up", "pushup", "yoga", "walk", "cardio", "stretch",
];
const CODING_KEYWORDS: &[&str] =
    &["code", "coding", "program", "debug", "leetcode", "commit", "deploy", "refactor"];
const MONEY_KEYWORDS: &[&str] =
    &["budget", "saving", "invest", "money", "finance", "expense", "income", "side hustle"];
const SOCIAL_KEYWORDS: &[&str] =
    &["call", "friend", "family", "meet", "social", "network", "volunteer", "message"];

pub fn keywords_for(category: QuestCategory) -> &'static [&'static str] {
    match category {
        QuestCategory::Study => STUDY_KEYWORDS,
        QuestCategory::Fitness => FITNESS_KEYWORDS,
        QuestCategory::Coding => CODING_KEYWORDS,
        QuestCategory::Money => MONEY_KEYWORDS,
        QuestCategory::Social => SOCIAL_KEYWORDS,
    }
}

/// Every category whose keyword list matches `quest_name`.
pub fn infer_categories(quest_name: &str) -> Vec<QuestCategory> {
    let name = quest_name.to_lowercase();
    QuestCategory::ALL
        .into_iter()
        .filter(|category| keywords_for(*category).iter().any(|kw| name.contains(kw)))
        .collect()
}

/// Completed-quest counts per category
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryCounts(BTreeMap<QuestCategory, u32>);

impl CategoryCounts {
    pub fn get(&self, category: QuestCategory) -> u32 {
        self.0.get(&category).copied().unwrap_or(0)
    }

    pub fn add(&mut self, category: QuestCategory) {
        *self.0.entry(category).or_insert(0) += 1;
    }

    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let mut counts = Self::default();
        for name in names {
            for category in infer_categories(name.as_ref()) {
                counts.add(category);
            }
        }
        counts
    }

    pub fn from_categories(categories: &[QuestCategory]) -> Self {
        let mut counts = Self::default();
        for category in categories {
            counts.add(*category);
        }
        counts
    }
}
