//! Game session
//!
//! Owns everything one signed-in user mutates: the loaded profile, the
//! quest timer, the daily counter and any settlement still waiting on the
//! store. The presentation layer talks only to this type.
//!
//! ## Completion flow
//! 1. Compute the settlement from timer + profile (pure, see `settlement`)
//! 2. Insert the history row
//! 3. Send the profile update
//! 4. Commit locally: replace profile, clear timer, bump daily counter
//! 5. Run the achievement pass
//!
//! A failure at 2 or 3 leaves local state untouched and the computed
//! settlement pending, so a retry resends only what is missing. The pending
//! settlement carries a full profile snapshot, so other profile writes are
//! refused until it is finished or the quest is abandoned.
//!
//! Purchases write the ownership row, then the gold balance. A purchase
//! whose gold write failed stays pending and its retry skips the ownership
//! row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::achievements::{AchievementEvaluator, ProfileMetrics};
use crate::clock::{Calendar, Clock, DayKey};
use crate::config::BalanceConfig;
use crate::cosmetics::{Cosmetic, CosmeticCategory};
use crate::daily::DailyTracker;
use crate::error::{CoreError, Result, SettlementStage};
use crate::profile::{ProfileUpdate, UserProfile};
use crate::progression::missed_days_penalty;
use crate::quest::{ActiveQuest, Quest, QuestTimer, TimerState};
use crate::settlement::{settle, RewardResult, Settlement};
use crate::store::ProfileStore;

#[cfg(test)]
mod tests;

#[derive(Debug, Clone)]
struct PendingSettlement {
    settlement: Settlement,
    day: DayKey,
    history_written: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MissedDaysOutcome {
    pub days_missed: u32,
    /// Gold actually removed (never more than the balance)
    pub gold_deducted: u64,
    pub achievements_unlocked: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOutcome {
    pub gold_remaining: u64,
    pub achievements_unlocked: Vec<String>,
}

/// Snapshot for status displays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub state: TimerState,
    pub active_quest: Option<ActiveQuest>,
    pub can_complete: bool,
    pub seconds_until_completable: i64,
    pub quests_completed_today: u32,
    pub settlement_pending: bool,
    /// Cosmetic whose purchase still owes its gold write
    pub purchase_pending: Option<String>,
}

pub struct GameSession<S, C, K> {
    user_id: String,
    store: S,
    clock: C,
    calendar: K,
    config: BalanceConfig,
    profile: Option<UserProfile>,
    timer: QuestTimer,
    daily: DailyTracker,
    pending: Option<PendingSettlement>,
    pending_purchase: Option<String>,
}

impl<S: ProfileStore, C: Clock, K: Calendar> GameSession<S, C, K> {
    pub fn new(
        user_id: impl Into<String>,
        store: S,
        clock: C,
        calendar: K,
        config: BalanceConfig,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            store,
            clock,
            calendar,
            config,
            profile: None,
            timer: QuestTimer::new(),
            daily: DailyTracker::new(),
            pending: None,
            pending_purchase: None,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &BalanceConfig {
        &self.config
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn timer_state(&self) -> TimerState {
        self.timer.state()
    }

    pub fn active_quest(&self) -> Option<&ActiveQuest> {
        self.timer.active()
    }

    pub fn today(&self) -> DayKey {
        self.calendar.local_day_key(self.clock.now())
    }

    /// Fetch the profile row. A missing row is `ProfileNotFound`, which
    /// callers should route to setup rather than retry.
    pub fn load_profile(&mut self) -> Result<&UserProfile> {
        let profile = self
            .store
            .get_profile(&self.user_id)?
            .ok_or_else(|| CoreError::ProfileNotFound(self.user_id.clone()))?;
        debug!(user_id = %self.user_id, level = profile.level, "profile loaded");
        Ok(&*self.profile.insert(profile))
    }

    fn loaded_profile(&self) -> Result<&UserProfile> {
        self.profile.as_ref().ok_or(CoreError::ProfileNotLoaded)
    }

    /// Writes that touch the profile row would be overwritten when a pending
    /// settlement commits its snapshot.
    fn ensure_no_pending_settlement(&self) -> Result<()> {
        match &self.pending {
            Some(pending) => Err(CoreError::PendingWrite(format!(
                "settlement of quest {}",
                pending.settlement.reward.quest_id
            ))),
            None => Ok(()),
        }
    }

    /// Achievement pass over the current local profile.
    fn run_achievement_pass(&self, now: DateTime<Utc>) -> Vec<String> {
        let Some(profile) = self.profile.as_ref() else {
            return Vec::new();
        };
        AchievementEvaluator::standard(self.config.category_inference).evaluate(
            &self.store,
            &self.user_id,
            ProfileMetrics::from(profile),
            now,
        )
    }

    // ========================
    // Timer
    // ========================

    pub fn start_quest(&mut self, quest: Quest) -> Result<&ActiveQuest> {
        let now = self.clock.now();
        let active = self.timer.start(quest, now)?;
        info!(user_id = %self.user_id, quest_id = %active.quest.id, "quest started");
        Ok(active)
    }

    pub fn pause_quest(&mut self) -> Result<()> {
        self.timer.pause(self.clock.now())
    }

    pub fn resume_quest(&mut self) -> Result<i64> {
        self.timer.resume(self.clock.now())
    }

    /// One elapsed second. The tick source should stop once this returns
    /// `None` or [`GameSession::is_ticking`] turns false.
    pub fn tick(&mut self) -> Option<i64> {
        self.timer.tick()
    }

    pub fn is_ticking(&self) -> bool {
        self.timer.is_running()
    }

    pub fn abandon_quest(&mut self) -> Result<ActiveQuest> {
        let abandoned = self.timer.abandon()?;
        if self.pending.take().is_some() {
            warn!(user_id = %self.user_id, quest_id = %abandoned.quest.id, "pending settlement discarded");
        }
        info!(user_id = %self.user_id, quest_id = %abandoned.quest.id, "quest abandoned");
        Ok(abandoned)
    }

    pub fn can_complete_quest(&self) -> bool {
        self.timer.can_complete(self.clock.now(), self.config.completable_percent)
    }

    /// 0 when no quest is active.
    pub fn seconds_until_completable(&self) -> i64 {
        self.timer
            .seconds_until_completable(self.clock.now(), self.config.completable_percent)
            .unwrap_or(0)
    }

    pub fn quests_completed_today(&self) -> u32 {
        self.daily.completed_on(self.today())
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            state: self.timer.state(),
            active_quest: self.timer.active().cloned(),
            can_complete: self.can_complete_quest(),
            seconds_until_completable: self.seconds_until_completable(),
            quests_completed_today: self.quests_completed_today(),
            settlement_pending: self.pending.is_some(),
            purchase_pending: self.pending_purchase.clone(),
        }
    }

    // ========================
    // Completion
    // ========================

    pub fn complete_quest(&mut self) -> Result<RewardResult> {
        let now = self.clock.now();

        if self.pending.is_none() {
            let pending = self.prepare_settlement(now)?;
            self.pending = Some(pending);
        }

        self.persist_pending()?;

        let Some(pending) = self.pending.take() else {
            return Err(CoreError::NoActiveQuest);
        };
        let PendingSettlement { settlement, day, .. } = pending;
        let Settlement { mut reward, profile, .. } = settlement;

        self.timer.finish();
        reward.quests_completed_today = self.daily.record_completion(day);
        self.profile = Some(profile);

        info!(
            user_id = %self.user_id,
            quest_id = %reward.quest_id,
            xp = reward.xp_earned,
            gold = reward.gold_earned,
            late = reward.was_late,
            level = reward.level,
            "quest settled"
        );

        reward.achievements_unlocked = self.run_achievement_pass(now);

        Ok(reward)
    }

    fn prepare_settlement(&self, now: DateTime<Utc>) -> Result<PendingSettlement> {
        let active = self.timer.active().ok_or(CoreError::NoActiveQuest)?;

        if self.config.enforce_completion_gate {
            let seconds_remaining =
                active.seconds_until_completable(now, self.config.completable_percent);
            if seconds_remaining > 0 {
                return Err(CoreError::NotYetCompletable { seconds_remaining });
            }
        }

        let profile = self.loaded_profile()?;
        let day = self.calendar.local_day_key(now);
        let settlement = settle(active, profile, day, now, self.config.stat_cap);
        Ok(PendingSettlement { settlement, day, history_written: false })
    }

    /// Both writes, in order. Stops at the first failure.
    fn persist_pending(&mut self) -> Result<()> {
        let Some(pending) = self.pending.as_mut() else {
            return Err(CoreError::NoActiveQuest);
        };

        if !pending.history_written {
            self.store.insert_completed_quest(&pending.settlement.record).map_err(|source| {
                warn!(user_id = %self.user_id, error = %source, "history insert failed");
                CoreError::Settlement { stage: SettlementStage::InsertHistory, source }
            })?;
            pending.history_written = true;
        }

        let update = ProfileUpdate::settlement(&pending.settlement.profile);
        self.store.update_profile(&self.user_id, &update).map_err(|source| {
            warn!(user_id = %self.user_id, error = %source, "profile update failed");
            CoreError::Settlement { stage: SettlementStage::UpdateProfile, source }
        })
    }

    // ========================
    // Daily upkeep
    // ========================

    /// Charge the missed-day penalty for whole days with no activity since
    /// the last active (or last settled) day. Safe to call more than once a
    /// day.
    pub fn settle_missed_days(&mut self) -> Result<MissedDaysOutcome> {
        self.ensure_no_pending_settlement()?;
        if let Some(pending_id) = &self.pending_purchase {
            return Err(CoreError::PendingWrite(format!("purchase of {}", pending_id)));
        }
        let now = self.clock.now();
        let today = self.calendar.local_day_key(now).date();
        let profile = self.loaded_profile()?;

        let reference = match (profile.last_active_day, profile.missed_days_settled_through) {
            (Some(a), Some(b)) => a.max(b),
            (Some(a), None) => a,
            (None, Some(b)) => b,
            (None, None) => return Ok(MissedDaysOutcome::default()),
        };

        let days_missed = (today - reference).num_days() - 1;
        if days_missed <= 0 {
            return Ok(MissedDaysOutcome::default());
        }
        let days_missed = days_missed as u32;
        let gold_deducted = missed_days_penalty(days_missed).min(profile.gold);

        let update = ProfileUpdate {
            gold: Some(profile.gold - gold_deducted),
            missed_days: Some(profile.missed_days + days_missed),
            current_streak: Some(0),
            missed_days_settled_through: today.pred_opt(),
            ..Default::default()
        };
        self.store.update_profile(&self.user_id, &update)?;

        if let Some(profile) = self.profile.as_mut() {
            update.apply_to(profile);
        }
        warn!(user_id = %self.user_id, days_missed, gold_deducted, "missed-day penalty applied");
        let achievements_unlocked = self.run_achievement_pass(now);
        Ok(MissedDaysOutcome { days_missed, gold_deducted, achievements_unlocked })
    }

    // ========================
    // Cosmetics
    // ========================

    /// Buy `cosmetic` with gold, then run an achievement pass.
    pub fn purchase_cosmetic(&mut self, cosmetic: &Cosmetic) -> Result<PurchaseOutcome> {
        self.ensure_no_pending_settlement()?;
        if let Some(pending_id) = self.pending_purchase.as_deref() {
            if pending_id != cosmetic.id {
                return Err(CoreError::PendingWrite(format!("purchase of {}", pending_id)));
            }
        }

        let profile = self.loaded_profile()?;
        if profile.level < cosmetic.required_level {
            return Err(CoreError::InvalidParameter(format!(
                "{} requires level {}",
                cosmetic.id, cosmetic.required_level
            )));
        }
        if profile.gold < cosmetic.price {
            return Err(CoreError::InsufficientGold {
                needed: cosmetic.price,
                available: profile.gold,
            });
        }
        let gold_remaining = profile.gold - cosmetic.price;

        if self.pending_purchase.is_none() {
            let owned = self.store.list_owned_cosmetic_ids(&self.user_id)?;
            if owned.iter().any(|id| *id == cosmetic.id) {
                return Err(CoreError::CosmeticAlreadyOwned(cosmetic.id.clone()));
            }
            self.store.insert_owned_cosmetic(&self.user_id, &cosmetic.id)?;
            self.pending_purchase = Some(cosmetic.id.clone());
        }

        let update = ProfileUpdate { gold: Some(gold_remaining), ..Default::default() };
        self.store.update_profile(&self.user_id, &update).map_err(|e| {
            warn!(user_id = %self.user_id, cosmetic = %cosmetic.id, error = %e, "gold deduction failed");
            e
        })?;
        self.pending_purchase = None;

        if let Some(profile) = self.profile.as_mut() {
            update.apply_to(profile);
        }
        info!(user_id = %self.user_id, cosmetic = %cosmetic.id, price = cosmetic.price, "cosmetic purchased");

        let achievements_unlocked = self.run_achievement_pass(self.clock.now());
        Ok(PurchaseOutcome { gold_remaining, achievements_unlocked })
    }

    pub fn equip_cosmetic(&mut self, cosmetic: &Cosmetic) -> Result<()> {
        self.ensure_no_pending_settlement()?;
        let profile = self.loaded_profile()?;
        let owned = self.store.list_owned_cosmetic_ids(&self.user_id)?;
        if !owned.iter().any(|id| *id == cosmetic.id) {
            return Err(CoreError::CosmeticNotOwned(cosmetic.id.clone()));
        }

        let mut equipped = profile.equipped.clone();
        equipped.set(cosmetic.category.equip_slot(), cosmetic.id.clone());
        let active_title =
            (cosmetic.category == CosmeticCategory::Titles).then(|| cosmetic.name.clone());

        let update = ProfileUpdate { equipped: Some(equipped), active_title, ..Default::default() };
        self.store.update_profile(&self.user_id, &update)?;

        if let Some(profile) = self.profile.as_mut() {
            update.apply_to(profile);
        }
        debug!(user_id = %self.user_id, cosmetic = %cosmetic.id, "cosmetic equipped");
        Ok(())
    }
}
