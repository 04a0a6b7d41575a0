use crate::errors::LanesError;

#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("git {args} failed: {stderr}")]
    CommandFailed {
        args: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Failed to execute git: {message}")]
    SpawnFailed { message: String },

    #[error("Invalid {label}: {reason}")]
    InvalidArgument { label: String, reason: String },

    #[error("Invalid path: {path}: {message}")]
    InvalidPath { path: String, message: String },

    #[error("IO error during git operation: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl GitError {
    /// Exit code of a failed git invocation, if it ran at all.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            GitError::CommandFailed { code, .. } => *code,
            _ => None,
        }
    }
}

impl LanesError for GitError {
    fn error_code(&self) -> &'static str {
        match self {
            GitError::CommandFailed { .. } => "GIT_COMMAND_FAILED",
            GitError::SpawnFailed { .. } => "GIT_SPAWN_FAILED",
            GitError::InvalidArgument { .. } => "GIT_INVALID_ARGUMENT",
            GitError::InvalidPath { .. } => "INVALID_PATH",
            GitError::IoError { .. } => "GIT_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            GitError::InvalidArgument { .. } | GitError::InvalidPath { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failed_carries_stderr() {
        let error = GitError::CommandFailed {
            args: "worktree add /tmp/x feat".to_string(),
            code: Some(128),
            stderr: "fatal: invalid reference: feat".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "git worktree add /tmp/x feat failed: fatal: invalid reference: feat"
        );
        assert_eq!(error.error_code(), "GIT_COMMAND_FAILED");
        assert_eq!(error.exit_code(), Some(128));
        assert!(!error.is_user_error());
    }

    #[test]
    fn test_invalid_argument_is_user_error() {
        let error = GitError::InvalidArgument {
            label: "branch name".to_string(),
            reason: "'-x' must not start with '-'".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid branch name: '-x' must not start with '-'"
        );
        assert!(error.is_user_error());
        assert_eq!(error.exit_code(), None);
    }
}
