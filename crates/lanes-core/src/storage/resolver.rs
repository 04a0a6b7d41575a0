//! Decides where each session artifact lives on disk.
//!
//! Resolution order for session files:
//! 1. a safe configured worktree-relative folder: `<worktree>/<folder>/<file>`
//! 2. shared storage: `<root>/<repo id>/<session>/<file>`
//! 3. next to the worktree contents: `<worktree>/<file>`
//!
//! An unsafe configured folder (traversal or absolute) is dropped and
//! resolution continues with rule 2. It never errors.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::config::StorageConfig;
use crate::config::defaults::DEFAULT_PROMPTS_DIR;
use crate::storage::context::StorageContext;

/// Per-call resolution inputs, usually taken from [`StorageConfig`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorageOptions<'a> {
    pub configured_relative_path: Option<&'a str>,
    pub use_shared_storage: bool,
}

impl<'a> StorageOptions<'a> {
    /// Options for session files (status, session record, workflow state).
    pub fn for_session_files(storage: &'a StorageConfig) -> Self {
        Self {
            configured_relative_path: storage.session_data_path(),
            use_shared_storage: storage.use_global_storage(),
        }
    }

    /// Options for prompt files.
    pub fn for_prompts(storage: &'a StorageConfig) -> Self {
        Self {
            configured_relative_path: storage.prompts_folder(),
            use_shared_storage: storage.use_global_storage(),
        }
    }
}

/// Normalize a configured relative path.
///
/// Unifies separators and strips empty and `.` segments. Returns `None` for
/// blank input, any `..` segment, or anything rooted (`/x`, `\x`, `C:x`,
/// `~/x`).
pub fn normalize_relative_path(raw: &str) -> Option<String> {
    let unified = raw.trim().replace('\\', "/");
    if unified.is_empty() || unified.starts_with('/') || unified.starts_with('~') {
        return None;
    }
    if has_drive_prefix(&unified) {
        return None;
    }

    let mut segments = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            s => segments.push(s),
        }
    }

    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}

fn has_drive_prefix(path: &str) -> bool {
    let mut chars = path.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(letter), Some(':')) if letter.is_ascii_alphabetic()
    )
}

/// Session name of a worktree: its leaf directory name.
pub fn session_name_for(worktree: &Path) -> Option<String> {
    worktree
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
}

/// Resolve the absolute path of `filename` for the session at `worktree`.
pub fn resolve(
    context: &StorageContext,
    worktree: &Path,
    filename: &str,
    options: &StorageOptions<'_>,
) -> PathBuf {
    if let Some(raw) = options.configured_relative_path.filter(|p| !p.trim().is_empty()) {
        match normalize_relative_path(raw) {
            Some(relative) => return worktree.join(relative).join(filename),
            None => {
                warn!(
                    event = "core.storage.unsafe_relative_path_rejected",
                    configured = raw,
                    worktree = %worktree.display(),
                );
            }
        }
    }

    if options.use_shared_storage
        && let Some(namespace) =
            session_name_for(worktree).and_then(|name| context.session_namespace(&name))
    {
        return namespace.join(filename);
    }

    worktree.join(filename)
}

/// Whether a free-form session name can be used directly as a file name.
pub fn is_safe_session_name(name: &str) -> bool {
    !name.is_empty() && !name.contains('/') && !name.contains('\\') && !name.contains("..")
}

/// Resolve the prompt file for a session keyed by name.
///
/// Returns `None` when the name could inject path components; such names
/// are refused, not sanitized.
pub fn resolve_prompt_path(
    context: &StorageContext,
    repo_root: &Path,
    session_name: &str,
    options: &StorageOptions<'_>,
) -> Option<PathBuf> {
    if !is_safe_session_name(session_name) {
        warn!(
            event = "core.storage.unsafe_session_name_rejected",
            session_name = session_name,
        );
        return None;
    }

    let filename = format!("{session_name}.txt");

    if let Some(raw) = options.configured_relative_path.filter(|p| !p.trim().is_empty()) {
        match normalize_relative_path(raw) {
            Some(relative) => return Some(repo_root.join(relative).join(filename)),
            None => {
                warn!(
                    event = "core.storage.unsafe_relative_path_rejected",
                    configured = raw,
                    repo_root = %repo_root.display(),
                );
            }
        }
    }

    if options.use_shared_storage
        && let Some(namespace) = context.repo_namespace()
    {
        return Some(namespace.join("prompts").join(filename));
    }

    Some(repo_root.join(DEFAULT_PROMPTS_DIR).join(filename))
}
