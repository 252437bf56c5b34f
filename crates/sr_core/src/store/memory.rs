use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use super::{ProfileStore, StoreError, StoreResult};
use crate::profile::{ProfileUpdate, UserProfile};
use crate::quest::{CompletedQuest, QuestCategory};

/// Store operations, for failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    GetProfile,
    UpdateProfile,
    InsertCompletedQuest,
    GetUnlockedAchievements,
    InsertUnlockedAchievement,
    CountFriends,
    CountOwnedCosmetics,
    ListCompletedQuests,
    ListOwnedCosmetics,
    InsertOwnedCosmetic,
}

#[derive(Debug, Default)]
struct MemoryState {
    profiles: HashMap<String, UserProfile>,
    completed: Vec<CompletedQuest>,
    unlocked: HashMap<String, Vec<(String, DateTime<Utc>)>>,
    friends: HashMap<String, HashSet<String>>,
    owned_cosmetics: HashMap<String, Vec<String>>,
    failing: HashSet<StoreOp>,
}

/// In-process store. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryProfileStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn guard(&self, op: StoreOp) -> StoreResult<MutexGuard<'_, MemoryState>> {
        let state = self.lock();
        if state.failing.contains(&op) {
            return Err(StoreError::Transport(format!("injected failure on {:?}", op)));
        }
        Ok(state)
    }

    pub fn insert_profile(&self, profile: UserProfile) {
        self.lock().profiles.insert(profile.user_id.clone(), profile);
    }

    pub fn profile(&self, user_id: &str) -> Option<UserProfile> {
        self.lock().profiles.get(user_id).cloned()
    }

    pub fn add_friend(&self, user_id: &str, friend_id: &str) {
        let mut state = self.lock();
        state.friends.entry(user_id.to_string()).or_default().insert(friend_id.to_string());
        state.friends.entry(friend_id.to_string()).or_default().insert(user_id.to_string());
    }

    /// Make every call to `op` fail with a transport error.
    pub fn fail(&self, op: StoreOp) {
        self.lock().failing.insert(op);
    }

    pub fn recover(&self, op: StoreOp) {
        self.lock().failing.remove(&op);
    }

    pub fn completed_quests(&self, user_id: &str) -> Vec<CompletedQuest> {
        self.lock().completed.iter().filter(|r| r.user_id == user_id).cloned().collect()
    }

    /// Unlock rows in insertion order, duplicates included.
    pub fn unlock_records(&self, user_id: &str) -> Vec<String> {
        self.lock()
            .unlocked
            .get(user_id)
            .map(|rows| rows.iter().map(|(id, _)| id.clone()).collect())
            .unwrap_or_default()
    }
}

impl ProfileStore for MemoryProfileStore {
    fn get_profile(&self, user_id: &str) -> StoreResult<Option<UserProfile>> {
        Ok(self.guard(StoreOp::GetProfile)?.profiles.get(user_id).cloned())
    }

    fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> StoreResult<()> {
        let mut state = self.guard(StoreOp::UpdateProfile)?;
        let profile = state
            .profiles
            .get_mut(user_id)
            .ok_or_else(|| StoreError::NotFound { entity: format!("profile {}", user_id) })?;
        update.apply_to(profile);
        Ok(())
    }

    fn insert_completed_quest(&self, record: &CompletedQuest) -> StoreResult<()> {
        let mut state = self.guard(StoreOp::InsertCompletedQuest)?;
        if state.completed.iter().any(|r| r.id == record.id) {
            return Err(StoreError::Validation(format!("duplicate completion {}", record.id)));
        }
        state.completed.push(record.clone());
        Ok(())
    }

    fn get_unlocked_achievement_ids(&self, user_id: &str) -> StoreResult<HashSet<String>> {
        let state = self.guard(StoreOp::GetUnlockedAchievements)?;
        Ok(state
            .unlocked
            .get(user_id)
            .map(|rows| rows.iter().map(|(id, _)| id.clone()).collect())
            .unwrap_or_default())
    }

    fn insert_unlocked_achievement(
        &self,
        user_id: &str,
        achievement_id: &str,
        unlocked_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let mut state = self.guard(StoreOp::InsertUnlockedAchievement)?;
        state
            .unlocked
            .entry(user_id.to_string())
            .or_default()
            .push((achievement_id.to_string(), unlocked_at));
        Ok(())
    }

    fn count_friends(&self, user_id: &str) -> StoreResult<u32> {
        let state = self.guard(StoreOp::CountFriends)?;
        Ok(state.friends.get(user_id).map(|f| f.len() as u32).unwrap_or(0))
    }

    fn count_owned_cosmetics(&self, user_id: &str) -> StoreResult<u32> {
        let state = self.guard(StoreOp::CountOwnedCosmetics)?;
        Ok(state.owned_cosmetics.get(user_id).map(|c| c.len() as u32).unwrap_or(0))
    }

    fn list_completed_quest_names(&self, user_id: &str) -> StoreResult<Vec<String>> {
        let state = self.guard(StoreOp::ListCompletedQuests)?;
        Ok(state
            .completed
            .iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.quest_name.clone())
            .collect())
    }

    fn list_completed_quest_categories(&self, user_id: &str) -> StoreResult<Vec<QuestCategory>> {
        let state = self.guard(StoreOp::ListCompletedQuests)?;
        Ok(state.completed.iter().filter(|r| r.user_id == user_id).map(|r| r.category).collect())
    }

    fn list_owned_cosmetic_ids(&self, user_id: &str) -> StoreResult<Vec<String>> {
        let state = self.guard(StoreOp::ListOwnedCosmetics)?;
        Ok(state.owned_cosmetics.get(user_id).cloned().unwrap_or_default())
    }

    fn insert_owned_cosmetic(&self, user_id: &str, cosmetic_id: &str) -> StoreResult<()> {
        let mut state = self.guard(StoreOp::InsertOwnedCosmetic)?;
        let owned = state.owned_cosmetics.entry(user_id.to_string()).or_default();
        if owned.iter().any(|id| id == cosmetic_id) {
            return Err(StoreError::Validation(format!("{} already owned", cosmetic_id)));
        }
        owned.push(cosmetic_id.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_profile_is_none_not_error() {
        let store = MemoryProfileStore::new();
        assert_eq!(store.get_profile("ghost").unwrap(), None);

        let err = store.update_profile("ghost", &ProfileUpdate::default()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_injected_failure_and_recovery() {
        let store = MemoryProfileStore::new();
        store.insert_profile(UserProfile::new("u1", "hunter"));

        store.fail(StoreOp::GetProfile);
        let err = store.get_profile("u1").unwrap_err();
        assert!(err.is_recoverable());

        store.recover(StoreOp::GetProfile);
        assert!(store.get_profile("u1").unwrap().is_some());
    }

    #[test]
    fn test_clones_share_state() {
        let store = MemoryProfileStore::new();
        let other = store.clone();
        store.add_friend("u1", "u2");
        assert_eq!(other.count_friends("u1").unwrap(), 1);
        assert_eq!(other.count_friends("u2").unwrap(), 1);
    }

    #[test]
    fn test_owned_cosmetics_are_unique() {
        let store = MemoryProfileStore::new();
        store.insert_owned_cosmetic("u1", "frame-gold").unwrap();
        assert!(store.insert_owned_cosmetic("u1", "frame-gold").is_err());
        assert_eq!(store.count_owned_cosmetics("u1").unwrap(), 1);
        assert_eq!(store.list_owned_cosmetic_ids("u1").unwrap(), vec!["frame-gold".to_string()]);
    }
}
