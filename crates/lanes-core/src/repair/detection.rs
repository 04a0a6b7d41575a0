//! Broken worktree detection.
//!
//! A linked worktree has a `.git` *file* whose first line is
//! `gitdir: <path to .git/worktrees/<name>>`. When that target disappears
//! (container rebuild, the main repository re-cloned, admin dir pruned) the
//! worktree is broken. Detection only reads the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::types::{BrokenWorktree, WorktreeHealth};

/// Extract the gitdir reference from the content of a `.git` file.
///
/// Only the first line is considered. Returns `None` if it is not a
/// non-empty `gitdir:` line.
pub fn parse_gitdir(content: &str) -> Option<&str> {
    let first = content.lines().next()?;
    let target = first.trim().strip_prefix("gitdir:")?.trim();
    (!target.is_empty()).then_some(target)
}

/// Classify one directory under the worktrees folder.
pub fn classify(worktree: &Path) -> WorktreeHealth {
    let git_entry = worktree.join(".git");
    let meta = match fs::symlink_metadata(&git_entry) {
        Ok(meta) => meta,
        Err(_) => return WorktreeHealth::Unlinked,
    };

    if meta.is_dir() {
        return WorktreeHealth::NestedRepository;
    }

    let content = match fs::read_to_string(&git_entry) {
        Ok(content) => content,
        Err(e) => {
            debug!(
                event = "core.repair.git_file_unreadable",
                path = %git_entry.display(),
                error = %e
            );
            return WorktreeHealth::Indeterminate;
        }
    };

    let Some(target) = parse_gitdir(&content) else {
        return WorktreeHealth::Indeterminate;
    };

    let gitdir = resolve_gitdir(worktree, target);
    if gitdir.exists() {
        WorktreeHealth::Healthy
    } else {
        WorktreeHealth::Broken { gitdir }
    }
}

/// Relative gitdir references are relative to the worktree directory.
fn resolve_gitdir(worktree: &Path, target: &str) -> PathBuf {
    let target = Path::new(target);
    if target.is_absolute() {
        target.to_path_buf()
    } else {
        worktree.join(target)
    }
}

/// Scan `<repo_root>/<folder>` and report every broken worktree.
///
/// Never fails: a missing folder or unreadable entries yield fewer results.
/// Output is sorted by session name.
pub fn detect_broken(repo_root: &Path, folder: &str) -> Vec<BrokenWorktree> {
    let worktrees_dir = repo_root.join(folder);
    let entries = match fs::read_dir(&worktrees_dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(
                event = "core.repair.detect_skipped",
                path = %worktrees_dir.display(),
                error = %e
            );
            return Vec::new();
        }
    };

    let mut broken = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        match classify(&path) {
            WorktreeHealth::Broken { gitdir } => {
                let Some(worktree) = BrokenWorktree::for_path(&path) else {
                    continue;
                };
                warn!(
                    event = "core.repair.broken_worktree_detected",
                    path = %path.display(),
                    gitdir = %gitdir.display(),
                    branch = %worktree.expected_branch
                );
                broken.push(worktree);
            }
            WorktreeHealth::NestedRepository => {
                debug!(
                    event = "core.repair.nested_repository_skipped",
                    path = %path.display()
                );
            }
            WorktreeHealth::Healthy | WorktreeHealth::Indeterminate | WorktreeHealth::Unlinked => {}
        }
    }

    broken.sort_by(|a, b| a.session_name.cmp(&b.session_name));
    info!(
        event = "core.repair.detect_completed",
        path = %worktrees_dir.display(),
        broken = broken.len()
    );
    broken
}
