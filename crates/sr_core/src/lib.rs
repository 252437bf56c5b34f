//! # sr_core - SoloRank quest lifecycle and reward engine
//!
//! Turns real-world tasks into timed quests and settles them into XP, gold,
//! stat boosts, levels and achievements against a remote profile store.
//!
//! ## Features
//! - Single active quest timer with pause/resume and overtime
//! - Deterministic reward math (level curve, late and missed-day penalties)
//! - Retry-safe settlement against a fallible [`ProfileStore`]
//! - Achievement catalog evaluated after every completion
//! - JSON bridge for front ends

pub mod achievements;
pub mod api;
pub mod clock;
pub mod config;
pub mod cosmetics;
pub mod daily;
pub mod data;
pub mod error;
pub mod profile;
pub mod progression;
pub mod quest;
pub mod session;
pub mod settlement;
pub mod store;

pub use api::{handle_session_command_json, SessionCommand, SessionResponse};
pub use error::{CoreError, Result, SettlementStage};

// Re-export domain types
pub use achievements::{Achievement, AchievementEvaluator, CATALOG};
pub use clock::{Calendar, Clock, DayKey, FixedOffsetCalendar, ManualClock, SystemClock};
pub use config::{BalanceConfig, CategoryInference, CONFIG_PATH_ENV};
pub use cosmetics::{Cosmetic, CosmeticCategory, EquipSlot, EquippedCosmetics};
pub use profile::{ProfileUpdate, Stats, UserProfile};
pub use progression::{level_from_total_xp, LevelProgress, MAX_LEVEL};
pub use quest::{ActiveQuest, CompletedQuest, Difficulty, Quest, QuestCategory, StatKind, TimerState};
pub use session::{GameSession, MissedDaysOutcome, PurchaseOutcome, SessionStatus};
pub use settlement::RewardResult;
pub use store::{MemoryProfileStore, ProfileStore, StoreError};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
