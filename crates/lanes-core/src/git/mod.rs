//! Git access for lanes.
//!
//! Git is an external collaborator invoked as a process. [`GitRunner`] is the
//! seam; [`CliGitRunner`] is the production implementation and the helpers in
//! [`worktree`] build the handful of commands lanes needs on top of it.

pub mod errors;
pub mod runner;
pub mod worktree;

#[cfg(test)]
pub(crate) mod test_support;

pub use errors::GitError;
pub use runner::{CliGitRunner, GitRunner, path_arg, validate_git_arg};
pub use worktree::{
    WorktreeEntry, add_worktree, add_worktree_new_branch, branch_exists, delete_branch,
    list_worktrees, parse_worktree_porcelain, prune_worktrees, remove_worktree,
};
