//! Per-day counters

use serde::{Deserialize, Serialize};

use crate::clock::DayKey;

/// Quests completed on the current local day. Starts at 0 each day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTracker {
    day: Option<DayKey>,
    completed: u32,
}

impl DailyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn completed_on(&self, day: DayKey) -> u32 {
        if self.day == Some(day) {
            self.completed
        } else {
            0
        }
    }

    /// Count one completion on `day`, returning that day's total.
    pub fn record_completion(&mut self, day: DayKey) -> u32 {
        if self.day != Some(day) {
            self.day = Some(day);
            self.completed = 0;
        }
        self.completed += 1;
        self.completed
    }
}
