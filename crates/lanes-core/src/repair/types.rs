use std::path::PathBuf;

use serde::Serialize;

/// A session worktree whose git metadata link is dangling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokenWorktree {
    pub path: PathBuf,
    /// Leaf directory name of `path`.
    pub session_name: String,
    /// Branch the worktree should be reattached to. Same as the session name.
    pub expected_branch: String,
}

impl BrokenWorktree {
    /// Describe the worktree at `path`, deriving names from its leaf.
    pub fn for_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let name = crate::storage::session_name_for(&path)?;
        Some(Self {
            path,
            session_name: name.clone(),
            expected_branch: name,
        })
    }
}

/// Health of one directory under the worktrees folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorktreeHealth {
    /// `.git` file whose gitdir target exists.
    Healthy,
    /// `.git` file whose gitdir target is missing.
    Broken { gitdir: PathBuf },
    /// `.git` file without a parsable `gitdir:` line.
    Indeterminate,
    /// No `.git` entry at all. Possibly mid-creation.
    Unlinked,
    /// `.git` is a directory: a nested repository, not a linked worktree.
    NestedRepository,
}

/// Outcome of repairing one worktree. Never an `Err`: batch repairs carry on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepairResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RepairResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairFailure {
    pub worktree: BrokenWorktree,
    pub error: String,
}

/// Result of `repair_all`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepairSummary {
    pub repaired: Vec<BrokenWorktree>,
    pub failed: Vec<RepairFailure>,
}

impl RepairSummary {
    pub fn detected(&self) -> usize {
        self.repaired.len() + self.failed.len()
    }

    pub fn all_repaired(&self) -> bool {
        self.failed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broken_worktree_for_path() {
        let broken = BrokenWorktree::for_path("/repo/.worktrees/feat-1").unwrap();
        assert_eq!(broken.session_name, "feat-1");
        assert_eq!(broken.expected_branch, "feat-1");
        assert!(BrokenWorktree::for_path("/").is_none());
    }

    #[test]
    fn test_repair_result_serialization() {
        assert_eq!(
            serde_json::to_string(&RepairResult::ok()).unwrap(),
            r#"{"success":true}"#
        );
        let failed = RepairResult::failed("Branch 'x' does not exist");
        assert!(!failed.success);
        assert_eq!(failed.error.as_deref(), Some("Branch 'x' does not exist"));
    }
}
