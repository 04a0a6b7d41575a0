//! Agent-specific error types.

use crate::errors::LanesError;

/// Errors that can occur during agent operations.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("Unknown agent '{name}'. Supported: claude, codex")]
    UnknownAgent { name: String },

    #[error("Agent '{name}' CLI is not installed or not in PATH")]
    AgentNotAvailable { name: String },

    #[error("Invalid agent session id '{session_id}': only letters, digits, '-' and '_' are allowed")]
    InvalidSessionId { session_id: String },
}

impl LanesError for AgentError {
    fn error_code(&self) -> &'static str {
        match self {
            AgentError::UnknownAgent { .. } => "UNKNOWN_AGENT",
            AgentError::AgentNotAvailable { .. } => "AGENT_NOT_AVAILABLE",
            AgentError::InvalidSessionId { .. } => "INVALID_AGENT_SESSION_ID",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            AgentError::UnknownAgent { .. } | AgentError::AgentNotAvailable { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_agent_error_display() {
        let error = AgentError::UnknownAgent {
            name: "unknown".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Unknown agent 'unknown'. Supported: claude, codex"
        );
        assert_eq!(error.error_code(), "UNKNOWN_AGENT");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_invalid_session_id_is_not_user_error() {
        let error = AgentError::InvalidSessionId {
            session_id: "a b".to_string(),
        };
        assert_eq!(error.error_code(), "INVALID_AGENT_SESSION_ID");
        assert!(!error.is_user_error());
    }
}
