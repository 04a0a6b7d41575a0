//! Worktree and branch operations built on a [`GitRunner`].

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::errors::GitError;
use super::runner::{GitRunner, path_arg, validate_git_arg};

/// One entry of `git worktree list --porcelain`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorktreeEntry {
    pub path: PathBuf,
    pub head: Option<String>,
    /// Short branch name (`refs/heads/` stripped).
    pub branch: Option<String>,
    pub bare: bool,
    pub detached: bool,
    pub prunable: bool,
}

/// Whether `refs/heads/<branch>` exists.
pub fn branch_exists(
    runner: &dyn GitRunner,
    repo_root: &Path,
    branch: &str,
) -> Result<bool, GitError> {
    validate_git_arg(branch, "branch name")?;
    let reference = format!("refs/heads/{branch}");
    match runner.run(&["show-ref", "--verify", "--quiet", &reference], repo_root) {
        Ok(_) => Ok(true),
        Err(GitError::CommandFailed { code: Some(1), .. }) => Ok(false),
        Err(GitError::CommandFailed { ref stderr, .. }) if stderr.contains("not a valid ref") => {
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// `git worktree add <path> <branch>` for an existing branch.
pub fn add_worktree(
    runner: &dyn GitRunner,
    repo_root: &Path,
    worktree_path: &Path,
    branch: &str,
) -> Result<(), GitError> {
    validate_git_arg(branch, "branch name")?;
    let path = path_arg(worktree_path)?;

    info!(
        event = "core.git.worktree_add_started",
        path = path,
        branch = branch
    );
    runner.run(&["worktree", "add", path, branch], repo_root)?;
    info!(
        event = "core.git.worktree_add_completed",
        path = path,
        branch = branch
    );
    Ok(())
}

/// `git worktree add -b <branch> <path> [<base>]`, creating the branch.
pub fn add_worktree_new_branch(
    runner: &dyn GitRunner,
    repo_root: &Path,
    worktree_path: &Path,
    branch: &str,
    base: Option<&str>,
) -> Result<(), GitError> {
    validate_git_arg(branch, "branch name")?;
    if let Some(base) = base {
        validate_git_arg(base, "base branch")?;
    }
    let path = path_arg(worktree_path)?;

    info!(
        event = "core.git.worktree_add_started",
        path = path,
        branch = branch,
        base = base.unwrap_or("HEAD"),
        new_branch = true
    );
    let mut args = vec!["worktree", "add", "-b", branch, path];
    if let Some(base) = base {
        args.push(base);
    }
    runner.run(&args, repo_root)?;
    info!(
        event = "core.git.worktree_add_completed",
        path = path,
        branch = branch
    );
    Ok(())
}

/// `git worktree remove [--force] <path>`.
pub fn remove_worktree(
    runner: &dyn GitRunner,
    repo_root: &Path,
    worktree_path: &Path,
    force: bool,
) -> Result<(), GitError> {
    let path = path_arg(worktree_path)?;
    let mut args = vec!["worktree", "remove"];
    if force {
        args.push("--force");
    }
    args.push(path);

    runner.run(&args, repo_root)?;
    info!(event = "core.git.worktree_remove_completed", path = path);
    Ok(())
}

/// `git worktree prune`: drop admin entries whose worktree directory is gone.
pub fn prune_worktrees(runner: &dyn GitRunner, repo_root: &Path) -> Result<(), GitError> {
    runner.run(&["worktree", "prune"], repo_root)?;
    Ok(())
}

/// Delete a local branch. `force` uses `-D`, otherwise `-d`.
pub fn delete_branch(
    runner: &dyn GitRunner,
    repo_root: &Path,
    branch: &str,
    force: bool,
) -> Result<(), GitError> {
    validate_git_arg(branch, "branch name")?;
    let flag = if force { "-D" } else { "-d" };
    match runner.run(&["branch", flag, branch], repo_root) {
        Ok(_) => {
            info!(event = "core.git.branch_delete_completed", branch = branch);
            Ok(())
        }
        Err(e) => {
            warn!(
                event = "core.git.branch_delete_failed",
                branch = branch,
                error = %e
            );
            Err(e)
        }
    }
}

/// List the repository's worktrees, main worktree first.
pub fn list_worktrees(
    runner: &dyn GitRunner,
    repo_root: &Path,
) -> Result<Vec<WorktreeEntry>, GitError> {
    let output = runner.run(&["worktree", "list", "--porcelain"], repo_root)?;
    Ok(parse_worktree_porcelain(&output))
}

/// Parse `git worktree list --porcelain` output. Records are separated by
/// blank lines; unknown attributes are ignored.
pub fn parse_worktree_porcelain(output: &str) -> Vec<WorktreeEntry> {
    let mut entries = Vec::new();
    let mut current: Option<WorktreeEntry> = None;

    for line in output.lines() {
        if line.trim().is_empty() {
            entries.extend(current.take());
            continue;
        }

        let (key, value) = line.split_once(' ').unwrap_or((line, ""));
        if key == "worktree" {
            entries.extend(current.take());
            current = Some(WorktreeEntry {
                path: PathBuf::from(value),
                ..Default::default()
            });
            continue;
        }

        let Some(entry) = current.as_mut() else {
            continue;
        };
        match key {
            "HEAD" => entry.head = Some(value.to_string()),
            "branch" => {
                entry.branch = Some(value.strip_prefix("refs/heads/").unwrap_or(value).to_string())
            }
            "bare" => entry.bare = true,
            "detached" => entry.detached = true,
            "prunable" => entry.prunable = true,
            _ => {}
        }
    }
    entries.extend(current);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::runner::CliGitRunner;
    use crate::git::test_support::init_repo;
    use tempfile::TempDir;

    #[test]
    fn test_parse_worktree_porcelain() {
        let output = "worktree /repo\nHEAD 1111\nbranch refs/heads/main\n\n\
                      worktree /repo/.worktrees/feat\nHEAD 2222\nbranch refs/heads/feat\nprunable gitdir file points to non-existent location\n\n\
                      worktree /repo/.worktrees/detached\nHEAD 3333\ndetached\n";
        let entries = parse_worktree_porcelain(output);

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].path, PathBuf::from("/repo"));
        assert_eq!(entries[0].branch.as_deref(), Some("main"));
        assert!(!entries[0].prunable);
        assert_eq!(entries[1].branch.as_deref(), Some("feat"));
        assert!(entries[1].prunable);
        assert!(entries[2].detached);
        assert!(entries[2].branch.is_none());
        assert_eq!(entries[2].head.as_deref(), Some("3333"));
    }

    #[test]
    fn test_parse_worktree_porcelain_empty() {
        assert!(parse_worktree_porcelain("").is_empty());
    }

    #[test]
    fn test_worktree_lifecycle_with_real_git() {
        let dir = TempDir::new().unwrap();
        let repo = dir.path().join("repo");
        init_repo(&repo);
        let runner = CliGitRunner;
        let wt = repo.join(".worktrees").join("feat");

        assert!(!branch_exists(&runner, &repo, "feat").unwrap());
        add_worktree_new_branch(&runner, &repo, &wt, "feat", None).unwrap();
        assert!(branch_exists(&runner, &repo, "feat").unwrap());
        assert!(wt.join(".git").is_file());

        let listed = list_worktrees(&runner, &repo).unwrap();
        assert!(
            listed
                .iter()
                .any(|e| e.branch.as_deref() == Some("feat") && e.path.ends_with("feat"))
        );

        remove_worktree(&runner, &repo, &wt, true).unwrap();
        assert!(!wt.exists());
        prune_worktrees(&runner, &repo).unwrap();

        delete_branch(&runner, &repo, "feat", true).unwrap();
        assert!(!branch_exists(&runner, &repo, "feat").unwrap());
    }

    #[test]
    fn test_add_worktree_for_existing_branch() {
        let dir = TempDir::new().unwrap();
        let repo = dir.path().join("repo");
        init_repo(&repo);
        let runner = CliGitRunner;
        runner.run(&["branch", "existing"], &repo).unwrap();

        let wt = repo.join(".worktrees").join("existing");
        add_worktree(&runner, &repo, &wt, "existing").unwrap();
        assert!(wt.join(".git").is_file());
    }

    #[test]
    fn test_branch_helpers_reject_option_injection() {
        let dir = TempDir::new().unwrap();
        let runner = CliGitRunner;
        assert!(matches!(
            branch_exists(&runner, dir.path(), "--all"),
            Err(GitError::InvalidArgument { .. })
        ));
        assert!(matches!(
            delete_branch(&runner, dir.path(), "-D", true),
            Err(GitError::InvalidArgument { .. })
        ));
    }
}
