use std::path::PathBuf;

use crate::errors::LanesError;

/// Reasons a single repair fails. Flattened into `RepairResult::error` at
/// the repair boundary.
#[derive(Debug, thiserror::Error)]
pub enum RepairError {
    #[error("Branch '{branch}' does not exist; nothing to reattach the worktree to")]
    BranchMissing { branch: String },

    #[error("'{}' contains a .git directory (nested repository), refusing to repair", path.display())]
    NestedRepository { path: PathBuf },

    #[error("Failed to move '{}' back after git worktree add failed: {source}", path.display())]
    RestoreFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Worktree re-linked but user files remain in '{}': {source}", aside.display())]
    FilesLeftAside {
        aside: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Git {
        #[from]
        source: crate::git::GitError,
    },

    #[error("IO error during repair: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl LanesError for RepairError {
    fn error_code(&self) -> &'static str {
        match self {
            RepairError::BranchMissing { .. } => "REPAIR_BRANCH_MISSING",
            RepairError::NestedRepository { .. } => "REPAIR_NESTED_REPOSITORY",
            RepairError::RestoreFailed { .. } => "REPAIR_RESTORE_FAILED",
            RepairError::FilesLeftAside { .. } => "REPAIR_FILES_LEFT_ASIDE",
            RepairError::Git { .. } => "REPAIR_GIT_FAILED",
            RepairError::IoError { .. } => "REPAIR_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            RepairError::BranchMissing { .. } | RepairError::NestedRepository { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_missing_names_branch() {
        let error = RepairError::BranchMissing {
            branch: "feat-x".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("feat-x"));
        assert!(message.contains("exist"));
        assert_eq!(error.error_code(), "REPAIR_BRANCH_MISSING");
        assert!(error.is_user_error());
    }
}
