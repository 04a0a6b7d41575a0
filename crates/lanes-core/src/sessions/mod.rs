pub mod create;
pub mod destroy;
pub mod env;
pub mod errors;
pub mod list;
pub mod persistence;
pub mod service;
pub mod types;
pub mod validation;

// Re-export commonly used types and functions
pub use create::create_session;
pub use destroy::destroy_session;
pub use env::SessionEnv;
pub use errors::SessionError;
pub use list::list_sessions;
pub use service::SessionDataService;
pub use types::{
    CreateSessionRequest, DestroyOptions, PermissionMode, SessionData, SessionInfo, SessionStatus,
    SessionSummary, StatusRecord, TerminalMode,
};
pub use validation::{is_safe_identifier, validate_session_name};
