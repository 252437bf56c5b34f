//! Achievement system
//!
//! - `catalog`: static achievement table and unlock predicates
//! - `keywords`: quest-name category heuristic
//! - `evaluator`: post-event pass that records new unlocks

pub mod catalog;
pub mod evaluator;
pub mod keywords;

pub use catalog::{
    find, Achievement, AchievementTier, Condition, EvaluationContext, ProfileMetrics, RankBoard,
    Rarity, CATALOG,
};
pub use evaluator::AchievementEvaluator;
pub use keywords::{infer_categories, CategoryCounts};
