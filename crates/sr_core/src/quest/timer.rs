//! Quest timer state machine
//!
//! ```text
//! Idle --start--> Running --pause--> Paused
//!                    ^                  |
//!                    +-----resume-------+
//! Running/Paused --take/abandon--> Idle
//! ```
//!
//! `remaining_seconds` only moves on `tick` and freezes while paused. The
//! completion gate uses wall-clock time since start, pauses included.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::types::Quest;
use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TimerState::Idle => write!(f, "idle"),
            TimerState::Running => write!(f, "running"),
            TimerState::Paused => write!(f, "paused"),
        }
    }
}

/// Runtime copy of a quest being worked on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveQuest {
    pub quest: Quest,
    pub started_at: DateTime<Utc>,
    /// Negative once the quest runs into overtime
    pub remaining_seconds: i64,
    pub is_paused: bool,
    pub paused_at: Option<DateTime<Utc>>,
    pub total_paused_seconds: i64,
}

impl ActiveQuest {
    pub fn new(quest: Quest, now: DateTime<Utc>) -> Self {
        let remaining_seconds = quest.estimated_seconds();
        Self {
            quest,
            started_at: now,
            remaining_seconds,
            is_paused: false,
            paused_at: None,
            total_paused_seconds: 0,
        }
    }

    pub fn is_overtime(&self) -> bool {
        self.remaining_seconds < 0
    }

    /// Wall-clock seconds since start, pauses included.
    pub fn elapsed_wall_seconds(&self, now: DateTime<Utc>) -> i64 {
        (now - self.started_at).num_seconds().max(0)
    }

    /// Seconds of wall-clock time required before completion unlocks.
    /// `ceil(estimated_seconds * percent / 100)`
    pub fn completable_after_seconds(&self, percent: u32) -> i64 {
        (self.quest.estimated_seconds() * percent as i64 + 99) / 100
    }

    pub fn seconds_until_completable(&self, now: DateTime<Utc>, percent: u32) -> i64 {
        (self.completable_after_seconds(percent) - self.elapsed_wall_seconds(now)).max(0)
    }
}

/// Holds at most one [`ActiveQuest`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestTimer {
    active: Option<ActiveQuest>,
}

impl QuestTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TimerState {
        match &self.active {
            None => TimerState::Idle,
            Some(active) if active.is_paused => TimerState::Paused,
            Some(_) => TimerState::Running,
        }
    }

    pub fn active(&self) -> Option<&ActiveQuest> {
        self.active.as_ref()
    }

    /// Whether the periodic tick source should keep firing.
    pub fn is_running(&self) -> bool {
        self.state() == TimerState::Running
    }

    pub fn start(&mut self, quest: Quest, now: DateTime<Utc>) -> Result<&ActiveQuest> {
        if let Some(active) = &self.active {
            return Err(CoreError::QuestAlreadyActive(active.quest.id.clone()));
        }
        quest.validate()?;

        debug!(quest_id = %quest.id, minutes = quest.estimated_minutes, "quest started");
        Ok(&*self.active.insert(ActiveQuest::new(quest, now)))
    }

    /// One elapsed second. Returns the new remaining count, or `None` when
    /// not running.
    pub fn tick(&mut self) -> Option<i64> {
        match self.active.as_mut() {
            Some(active) if !active.is_paused => {
                active.remaining_seconds -= 1;
                Some(active.remaining_seconds)
            }
            _ => None,
        }
    }

    pub fn pause(&mut self, now: DateTime<Utc>) -> Result<()> {
        let state = self.state();
        match self.active.as_mut() {
            Some(active) if !active.is_paused => {
                active.is_paused = true;
                active.paused_at = Some(now);
                debug!(quest_id = %active.quest.id, remaining = active.remaining_seconds, "quest paused");
                Ok(())
            }
            _ => Err(CoreError::InvalidTransition { action: "pause", state }),
        }
    }

    /// Returns the length of the pause that just ended, in seconds.
    pub fn resume(&mut self, now: DateTime<Utc>) -> Result<i64> {
        let state = self.state();
        match self.active.as_mut() {
            Some(active) if active.is_paused => {
                let paused_for = active
                    .paused_at
                    .take()
                    .map(|paused_at| (now - paused_at).num_seconds().max(0))
                    .unwrap_or(0);
                active.total_paused_seconds += paused_for;
                active.is_paused = false;
                debug!(quest_id = %active.quest.id, paused_for, "quest resumed");
                Ok(paused_for)
            }
            _ => Err(CoreError::InvalidTransition { action: "resume", state }),
        }
    }

    /// Drop the active quest with no reward.
    pub fn abandon(&mut self) -> Result<ActiveQuest> {
        let active = self.active.take().ok_or(CoreError::NoActiveQuest)?;
        debug!(quest_id = %active.quest.id, "quest abandoned");
        Ok(active)
    }

    /// Clear the active quest after a successful settlement.
    pub(crate) fn finish(&mut self) -> Option<ActiveQuest> {
        self.active.take()
    }

    pub fn can_complete(&self, now: DateTime<Utc>, percent: u32) -> bool {
        self.seconds_until_completable(now, percent) == Some(0)
    }

    pub fn seconds_until_completable(&self, now: DateTime<Utc>, percent: u32) -> Option<i64> {
        self.active.as_ref().map(|active| active.seconds_until_completable(now, percent))
    }
}
