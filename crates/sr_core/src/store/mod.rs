//! Remote profile store contract
//!
//! Every method is one round-trip to the backing service and can fail.
//! Absence of a profile row is `Ok(None)`, never an error.

pub mod error;
pub mod memory;

use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::profile::{ProfileUpdate, UserProfile};
use crate::quest::{CompletedQuest, QuestCategory};

pub use error::StoreError;
pub use memory::{MemoryProfileStore, StoreOp};

pub type StoreResult<T> = std::result::Result<T, StoreError>;

pub trait ProfileStore {
    fn get_profile(&self, user_id: &str) -> StoreResult<Option<UserProfile>>;

    fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> StoreResult<()>;

    fn insert_completed_quest(&self, record: &CompletedQuest) -> StoreResult<()>;

    fn get_unlocked_achievement_ids(&self, user_id: &str) -> StoreResult<HashSet<String>>;

    fn insert_unlocked_achievement(
        &self,
        user_id: &str,
        achievement_id: &str,
        unlocked_at: DateTime<Utc>,
    ) -> StoreResult<()>;

    fn count_friends(&self, user_id: &str) -> StoreResult<u32>;

    fn count_owned_cosmetics(&self, user_id: &str) -> StoreResult<u32>;

    fn list_completed_quest_names(&self, user_id: &str) -> StoreResult<Vec<String>>;

    fn list_completed_quest_categories(&self, user_id: &str) -> StoreResult<Vec<QuestCategory>>;

    fn list_owned_cosmetic_ids(&self, user_id: &str) -> StoreResult<Vec<String>>;

    fn insert_owned_cosmetic(&self, user_id: &str, cosmetic_id: &str) -> StoreResult<()>;
}
