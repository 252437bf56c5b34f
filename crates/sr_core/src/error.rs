use std::fmt;

use thiserror::Error;

use crate::quest::TimerState;
use crate::store::StoreError;

/// Which write of a settlement failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementStage {
    InsertHistory,
    UpdateProfile,
}

impl fmt::Display for SettlementStage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SettlementStage::InsertHistory => write!(f, "history insert"),
            SettlementStage::UpdateProfile => write!(f, "profile update"),
        }
    }
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Quest already active: {0}")]
    QuestAlreadyActive(String),

    #[error("No active quest")]
    NoActiveQuest,

    #[error("Cannot {action} while {state}")]
    InvalidTransition { action: &'static str, state: TimerState },

    #[error("Quest not completable yet: {seconds_remaining}s until unlock")]
    NotYetCompletable { seconds_remaining: i64 },

    #[error("Profile not loaded")]
    ProfileNotLoaded,

    #[error("Profile not found for user {0}")]
    ProfileNotFound(String),

    #[error("Insufficient gold: need {needed}, have {available}")]
    InsufficientGold { needed: u64, available: u64 },

    #[error("Cosmetic not owned: {0}")]
    CosmeticNotOwned(String),

    #[error("Cosmetic already owned: {0}")]
    CosmeticAlreadyOwned(String),

    /// A partially written operation must be finished or abandoned first
    #[error("Unfinished write pending: {0}")]
    PendingWrite(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Settlement failed at {stage}: {source}")]
    Settlement {
        stage: SettlementStage,
        #[source]
        source: StoreError,
    },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Config error: {0}")]
    Config(String),
}

impl CoreError {
    /// Whether retrying the same call can succeed without caller changes.
    pub fn is_recoverable(&self) -> bool {
        match self {
            CoreError::Settlement { source, .. } => source.is_recoverable(),
            CoreError::Store(source) => source.is_recoverable(),
            CoreError::NotYetCompletable { .. } => true,
            _ => false,
        }
    }

    /// Stable machine-readable tag for the JSON bridge.
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::QuestAlreadyActive(_) => "quest_already_active",
            CoreError::NoActiveQuest => "no_active_quest",
            CoreError::InvalidTransition { .. } => "invalid_transition",
            CoreError::NotYetCompletable { .. } => "not_yet_completable",
            CoreError::ProfileNotLoaded => "profile_not_loaded",
            CoreError::ProfileNotFound(_) => "profile_not_found",
            CoreError::InsufficientGold { .. } => "insufficient_gold",
            CoreError::CosmeticNotOwned(_) => "cosmetic_not_owned",
            CoreError::CosmeticAlreadyOwned(_) => "cosmetic_already_owned",
            CoreError::PendingWrite(_) => "pending_write",
            CoreError::InvalidParameter(_) => "invalid_parameter",
            CoreError::Settlement { .. } => "settlement_failed",
            CoreError::Store(_) => "store_error",
            CoreError::Config(_) => "config_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settlement_failure_is_recoverable_on_transport() {
        let err = CoreError::Settlement {
            stage: SettlementStage::UpdateProfile,
            source: StoreError::Transport("timeout".to_string()),
        };
        assert!(err.is_recoverable());
        assert_eq!(err.kind(), "settlement_failed");
        assert_eq!(err.to_string(), "Settlement failed at profile update: Transport error: timeout");
    }

    #[test]
    fn test_invariant_violations_are_not_recoverable() {
        assert!(!CoreError::QuestAlreadyActive("q1".to_string()).is_recoverable());
        assert!(!CoreError::NoActiveQuest.is_recoverable());
        let validation = CoreError::Store(StoreError::Validation("bad row".to_string()));
        assert!(!validation.is_recoverable());
        let pending = CoreError::PendingWrite("quest settlement".to_string());
        assert!(!pending.is_recoverable());
        assert_eq!(pending.kind(), "pending_write");
    }
}
