pub mod session_json;

pub use session_json::{
    handle_session_command_json, SessionCommand, SessionRequest, SessionResponse,
    SessionResponseType, SESSION_SCHEMA_VERSION,
};
