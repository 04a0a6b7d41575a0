//! Worktree repair.
//!
//! Repair recreates the git link of a worktree without touching the user's
//! files: the directory is moved to a temporary sibling, `git worktree add`
//! checks the branch out again at the original path, then everything from
//! the sibling is moved back on top (the user's copies win over the
//! checkout) and the sibling is removed.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use super::detection::detect_broken;
use super::errors::RepairError;
use super::types::{BrokenWorktree, RepairFailure, RepairResult, RepairSummary};
use crate::git::{GitRunner, add_worktree, branch_exists, prune_worktrees};

/// Repair one worktree. Failures are reported in the result, never raised.
///
/// The only precondition is that the expected branch exists. A directory
/// without any `.git` entry is repaired on that evidence alone.
pub fn repair(
    runner: &dyn GitRunner,
    repo_root: &Path,
    broken: &BrokenWorktree,
) -> RepairResult {
    info!(
        event = "core.repair.repair_started",
        path = %broken.path.display(),
        branch = %broken.expected_branch
    );

    match try_repair(runner, repo_root, broken) {
        Ok(()) => {
            info!(
                event = "core.repair.repair_completed",
                path = %broken.path.display(),
                branch = %broken.expected_branch
            );
            RepairResult::ok()
        }
        Err(e) => {
            warn!(
                event = "core.repair.repair_failed",
                path = %broken.path.display(),
                branch = %broken.expected_branch,
                error_code = crate::errors::LanesError::error_code(&e),
                error = %e
            );
            RepairResult::failed(e.to_string())
        }
    }
}

/// Detect every broken worktree under `<repo_root>/<folder>` and repair each,
/// continuing past individual failures.
pub fn repair_all(runner: &dyn GitRunner, repo_root: &Path, folder: &str) -> RepairSummary {
    let mut summary = RepairSummary::default();

    for broken in detect_broken(repo_root, folder) {
        let result = repair(runner, repo_root, &broken);
        if result.success {
            summary.repaired.push(broken);
        } else {
            summary.failed.push(RepairFailure {
                error: result.error.unwrap_or_default(),
                worktree: broken,
            });
        }
    }

    info!(
        event = "core.repair.repair_all_completed",
        repaired = summary.repaired.len(),
        failed = summary.failed.len()
    );
    summary
}

fn try_repair(
    runner: &dyn GitRunner,
    repo_root: &Path,
    broken: &BrokenWorktree,
) -> Result<(), RepairError> {
    let branch = broken.expected_branch.as_str();
    let path = broken.path.as_path();

    if !branch_exists(runner, repo_root, branch)? {
        return Err(RepairError::BranchMissing {
            branch: branch.to_string(),
        });
    }

    refuse_nested_repository(path)?;

    // The stale `.git` travels with the directory so a failed repair leaves
    // it detectable; merging back never carries it over.
    let aside = if path.exists() {
        Some(move_aside(path)?)
    } else {
        None
    };

    // Stale admin entries for this path make `worktree add` refuse.
    if let Err(e) = prune_worktrees(runner, repo_root) {
        warn!(
            event = "core.repair.prune_failed",
            repo = %repo_root.display(),
            error = %e
        );
    }

    if let Err(e) = add_worktree(runner, repo_root, path, branch) {
        if let Some(aside) = &aside {
            restore(aside, path)?;
        }
        return Err(e.into());
    }

    if let Some(aside) = aside {
        let merged = merge_into(&aside, path).and_then(|()| fs::remove_dir_all(&aside));
        if let Err(source) = merged {
            error!(
                event = "core.repair.files_left_aside",
                path = %path.display(),
                aside = %aside.display(),
                error = %source
            );
            return Err(RepairError::FilesLeftAside { aside, source });
        }
    }
    Ok(())
}

fn refuse_nested_repository(path: &Path) -> Result<(), RepairError> {
    match fs::symlink_metadata(path.join(".git")) {
        Ok(meta) if meta.is_dir() => Err(RepairError::NestedRepository {
            path: path.to_path_buf(),
        }),
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Rename `path` to `.<name>.lanes-repair-<uuid>` in the same parent.
fn move_aside(path: &Path) -> Result<PathBuf, RepairError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let aside_name = format!(".{}.lanes-repair-{}", name, uuid::Uuid::new_v4().simple());
    let aside = path.with_file_name(aside_name);

    fs::rename(path, &aside)?;
    Ok(aside)
}

fn restore(aside: &Path, path: &Path) -> Result<(), RepairError> {
    if path.exists()
        && let Err(e) = fs::remove_dir_all(path)
    {
        error!(
            event = "core.repair.restore_cleanup_failed",
            path = %path.display(),
            error = %e
        );
    }
    fs::rename(aside, path).map_err(|source| {
        error!(
            event = "core.repair.restore_failed",
            path = %path.display(),
            aside = %aside.display(),
            error = %source
        );
        RepairError::RestoreFailed {
            path: aside.to_path_buf(),
            source,
        }
    })
}

/// Move everything in `src` into `dst`, overwriting what the checkout put
/// there. The top-level `.git` of `src` is never carried over.
fn merge_into(src: &Path, dst: &Path) -> io::Result<()> {
    merge_dir(src, dst, true)
}

fn merge_dir(src: &Path, dst: &Path, top_level: bool) -> io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let name = entry.file_name();
        if top_level && name == ".git" {
            continue;
        }

        let from = entry.path();
        let to = dst.join(&name);
        let from_is_dir = entry.file_type()?.is_dir();
        let to_meta = fs::symlink_metadata(&to).ok();

        match to_meta {
            Some(meta) if from_is_dir && meta.is_dir() => merge_dir(&from, &to, false)?,
            Some(meta) => {
                if meta.is_dir() {
                    fs::remove_dir_all(&to)?;
                } else if from_is_dir {
                    fs::remove_file(&to)?;
                }
                fs::rename(&from, &to)?;
            }
            None => fs::rename(&from, &to)?,
        }
    }
    Ok(())
}
