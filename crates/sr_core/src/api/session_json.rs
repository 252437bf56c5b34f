//! Session JSON bridge
//!
//! One request in, one response out. Front ends that cannot link Rust
//! types drive a [`GameSession`] through this instead.
//!
//! ```json
//! { "schema_version": 1, "command": { "type": "StartQuest", "quest": { ... } } }
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::{Calendar, Clock};
use crate::cosmetics::Cosmetic;
use crate::error::CoreError;
use crate::profile::UserProfile;
use crate::quest::{ActiveQuest, Quest};
use crate::session::{GameSession, MissedDaysOutcome, PurchaseOutcome, SessionStatus};
use crate::settlement::RewardResult;
use crate::store::ProfileStore;

pub const SESSION_SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub schema_version: u8,
    pub command: SessionCommand,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum SessionCommand {
    LoadProfile,
    StartQuest { quest: Quest },
    PauseQuest,
    ResumeQuest,
    AbandonQuest,
    /// `seconds` ticks in a row (default 1). Stops early once paused or idle.
    Tick {
        #[serde(default = "default_tick_seconds")]
        seconds: u32,
    },
    CompleteQuest,
    SettleMissedDays,
    PurchaseCosmetic { cosmetic: Cosmetic },
    EquipCosmetic { cosmetic: Cosmetic },
    Status,
}

fn default_tick_seconds() -> u32 {
    1
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub schema_version: u8,
    pub success: bool,
    pub response: Option<SessionResponseType>,
    pub error_message: Option<String>,
    /// Stable snake_case error tag
    pub error_kind: Option<String>,
    /// Whether retrying the same command may succeed
    pub recoverable: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum SessionResponseType {
    Profile { profile: UserProfile },
    QuestStarted { active_quest: ActiveQuest },
    Paused,
    Resumed { paused_seconds: i64 },
    Abandoned { quest_id: String },
    Ticked { remaining_seconds: Option<i64>, running: bool },
    QuestCompleted { reward: RewardResult },
    MissedDays { outcome: MissedDaysOutcome },
    CosmeticPurchased { outcome: PurchaseOutcome },
    CosmeticEquipped { cosmetic_id: String },
    Status { status: SessionStatus },
}

impl SessionResponse {
    fn ok(response: SessionResponseType) -> Self {
        Self {
            schema_version: SESSION_SCHEMA_VERSION,
            success: true,
            response: Some(response),
            error_message: None,
            error_kind: None,
            recoverable: false,
        }
    }

    fn from_error(err: &CoreError) -> Self {
        Self {
            schema_version: SESSION_SCHEMA_VERSION,
            success: false,
            response: None,
            error_message: Some(err.to_string()),
            error_kind: Some(err.kind().to_string()),
            recoverable: err.is_recoverable(),
        }
    }

    fn invalid_request(message: String) -> Self {
        Self {
            schema_version: SESSION_SCHEMA_VERSION,
            success: false,
            response: None,
            error_message: Some(message),
            error_kind: Some("invalid_request".to_string()),
            recoverable: false,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(
                r#"{{"schema_version":{},"success":false,"response":null,"error_message":"serialization failed: {}","error_kind":"serialization","recoverable":false}}"#,
                SESSION_SCHEMA_VERSION,
                e.to_string().replace('"', "'")
            )
        })
    }
}

/// Parse `request_json`, run it against `session` and return the response
/// JSON. Never fails: errors come back with `success: false`.
pub fn handle_session_command_json<S, C, K>(
    session: &mut GameSession<S, C, K>,
    request_json: &str,
) -> String
where
    S: ProfileStore,
    C: Clock,
    K: Calendar,
{
    let request: SessionRequest = match serde_json::from_str(request_json) {
        Ok(request) => request,
        Err(e) => {
            return SessionResponse::invalid_request(format!("Invalid JSON request: {}", e))
                .to_json()
        }
    };

    if request.schema_version != SESSION_SCHEMA_VERSION {
        return SessionResponse::invalid_request(format!(
            "Unsupported schema version: {}",
            request.schema_version
        ))
        .to_json();
    }

    debug!(user_id = %session.user_id(), command = ?request.command, "session command");
    let response = match run_command(session, request.command) {
        Ok(response) => SessionResponse::ok(response),
        Err(e) => SessionResponse::from_error(&e),
    };
    response.to_json()
}

fn run_command<S, C, K>(
    session: &mut GameSession<S, C, K>,
    command: SessionCommand,
) -> Result<SessionResponseType, CoreError>
where
    S: ProfileStore,
    C: Clock,
    K: Calendar,
{
    let response = match command {
        SessionCommand::LoadProfile => {
            SessionResponseType::Profile { profile: session.load_profile()?.clone() }
        }
        SessionCommand::StartQuest { quest } => {
            SessionResponseType::QuestStarted { active_quest: session.start_quest(quest)?.clone() }
        }
        SessionCommand::PauseQuest => {
            session.pause_quest()?;
            SessionResponseType::Paused
        }
        SessionCommand::ResumeQuest => {
            SessionResponseType::Resumed { paused_seconds: session.resume_quest()? }
        }
        SessionCommand::AbandonQuest => {
            SessionResponseType::Abandoned { quest_id: session.abandon_quest()?.quest.id }
        }
        SessionCommand::Tick { seconds } => {
            let mut remaining_seconds = None;
            for _ in 0..seconds {
                match session.tick() {
                    Some(remaining) => remaining_seconds = Some(remaining),
                    None => break,
                }
            }
            SessionResponseType::Ticked { remaining_seconds, running: session.is_ticking() }
        }
        SessionCommand::CompleteQuest => {
            SessionResponseType::QuestCompleted { reward: session.complete_quest()? }
        }
        SessionCommand::SettleMissedDays => {
            SessionResponseType::MissedDays { outcome: session.settle_missed_days()? }
        }
        SessionCommand::PurchaseCosmetic { cosmetic } => {
            let outcome = session.purchase_cosmetic(&cosmetic)?;
            SessionResponseType::CosmeticPurchased { outcome }
        }
        SessionCommand::EquipCosmetic { cosmetic } => {
            session.equip_cosmetic(&cosmetic)?;
            SessionResponseType::CosmeticEquipped { cosmetic_id: cosmetic.id }
        }
        SessionCommand::Status => SessionResponseType::Status { status: session.status() },
    };
    Ok(response)
}
