use std::path::PathBuf;

use crate::errors::LanesError;
use crate::workflow::state::WorkflowStatus;

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("Failed to read workflow file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse workflow template '{origin}': {message}")]
    Parse { origin: String, message: String },

    #[error("Workflow template '{name}' has no steps")]
    EmptyTemplate { name: String },

    #[error("Step id '{step}' is declared more than once")]
    DuplicateStep { step: String },

    #[error("Task id '{task}' is declared more than once in loop '{loop_name}'")]
    DuplicateTask { loop_name: String, task: String },

    #[error("Loop step '{step}' references undeclared loop '{step}'")]
    UnknownLoop { step: String },

    #[error("Step '{step}' references undeclared agent '{agent}'")]
    UnknownAgent { step: String, agent: String },

    #[error("Workflow has not been started")]
    NotStarted,

    #[error("Workflow has already been started")]
    AlreadyStarted,

    #[error("Cannot {action} a workflow that is {status}")]
    InvalidTransition {
        action: &'static str,
        status: WorkflowStatus,
    },

    #[error("Workflow is complete; no further transitions are possible")]
    Terminal,

    #[error("Saved workflow state does not match template '{template}': {message}")]
    StateMismatch { template: String, message: String },

    #[error("Failed to write workflow state '{}': {source}", path.display())]
    StateWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl LanesError for WorkflowError {
    fn error_code(&self) -> &'static str {
        match self {
            WorkflowError::Io { .. } => "WORKFLOW_IO_ERROR",
            WorkflowError::Parse { .. } => "WORKFLOW_PARSE_ERROR",
            WorkflowError::EmptyTemplate { .. } => "WORKFLOW_EMPTY_TEMPLATE",
            WorkflowError::DuplicateStep { .. } => "WORKFLOW_DUPLICATE_STEP",
            WorkflowError::DuplicateTask { .. } => "WORKFLOW_DUPLICATE_TASK",
            WorkflowError::UnknownLoop { .. } => "WORKFLOW_UNKNOWN_LOOP",
            WorkflowError::UnknownAgent { .. } => "WORKFLOW_UNKNOWN_AGENT",
            WorkflowError::NotStarted => "WORKFLOW_NOT_STARTED",
            WorkflowError::AlreadyStarted => "WORKFLOW_ALREADY_STARTED",
            WorkflowError::InvalidTransition { .. } => "WORKFLOW_INVALID_TRANSITION",
            WorkflowError::Terminal => "WORKFLOW_TERMINAL",
            WorkflowError::StateMismatch { .. } => "WORKFLOW_STATE_MISMATCH",
            WorkflowError::StateWrite { .. } => "WORKFLOW_STATE_WRITE_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        !matches!(
            self,
            WorkflowError::Io { .. } | WorkflowError::StateWrite { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_errors_name_the_reference() {
        let error = WorkflowError::UnknownAgent {
            step: "review".to_string(),
            agent: "critic".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Step 'review' references undeclared agent 'critic'"
        );
        assert_eq!(error.error_code(), "WORKFLOW_UNKNOWN_AGENT");
        assert!(error.is_user_error());

        let error = WorkflowError::UnknownLoop {
            step: "tasks".to_string(),
        };
        assert!(error.to_string().contains("'tasks'"));
    }

    #[test]
    fn test_invalid_transition_message() {
        let error = WorkflowError::InvalidTransition {
            action: "advance",
            status: WorkflowStatus::Waiting,
        };
        assert_eq!(error.to_string(), "Cannot advance a workflow that is waiting");
    }

    #[test]
    fn test_io_errors_are_not_user_errors() {
        let error = WorkflowError::StateWrite {
            path: PathBuf::from("/x/workflow-state.json"),
            source: std::io::Error::other("read-only"),
        };
        assert!(!error.is_user_error());
    }
}
