use crate::errors::LanesError;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session '{name}' already exists")]
    AlreadyExists { name: String },

    #[error("Session '{name}' not found")]
    NotFound { name: String },

    #[error("Invalid session name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Failed to serialize session data: {message}")]
    SerializationFailed { message: String },

    #[error("Git operation failed: {source}")]
    GitError {
        #[from]
        source: crate::git::errors::GitError,
    },

    #[error("Agent error: {source}")]
    AgentError {
        #[from]
        source: crate::agents::AgentError,
    },

    #[error("Configuration error: {source}")]
    ConfigError {
        #[from]
        source: crate::errors::ConfigError,
    },

    #[error("Workflow error: {source}")]
    WorkflowError {
        #[from]
        source: crate::workflow::WorkflowError,
    },

    #[error("IO operation failed: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl LanesError for SessionError {
    fn error_code(&self) -> &'static str {
        match self {
            SessionError::AlreadyExists { .. } => "SESSION_ALREADY_EXISTS",
            SessionError::NotFound { .. } => "SESSION_NOT_FOUND",
            SessionError::InvalidName { .. } => "INVALID_SESSION_NAME",
            SessionError::SerializationFailed { .. } => "SESSION_SERIALIZATION_FAILED",
            SessionError::GitError { .. } => "GIT_ERROR",
            SessionError::AgentError { .. } => "AGENT_ERROR",
            SessionError::ConfigError { .. } => "CONFIG_ERROR",
            SessionError::WorkflowError { .. } => "WORKFLOW_ERROR",
            SessionError::IoError { .. } => "IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            SessionError::AlreadyExists { .. }
            | SessionError::NotFound { .. }
            | SessionError::InvalidName { .. } => true,
            SessionError::AgentError { source } => source.is_user_error(),
            SessionError::ConfigError { source } => source.is_user_error(),
            SessionError::WorkflowError { source } => source.is_user_error(),
            _ => false,
        }
    }
}
