use std::path::{Path, PathBuf};

use crate::config::{Config, LanesConfig};
use crate::storage::repo_id::repo_identifier;

/// Process-level storage context.
///
/// Holds the shared-storage root and the originating repository. Built once
/// at startup and passed by reference to everything that resolves paths;
/// tests construct their own instances.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageContext {
    shared_root: Option<PathBuf>,
    origin_repo: Option<PathBuf>,
}

impl StorageContext {
    pub fn new(shared_root: impl Into<PathBuf>, origin_repo: impl Into<PathBuf>) -> Self {
        Self {
            shared_root: Some(shared_root.into()),
            origin_repo: Some(origin_repo.into()),
        }
    }

    /// A context without shared storage. Resolution falls back to the
    /// worktree for every file.
    pub fn uninitialized() -> Self {
        Self::default()
    }

    pub fn from_config(config: &LanesConfig, runtime: &Config, repo_root: &Path) -> Self {
        Self::new(config.storage.global_storage_root(runtime), repo_root)
    }

    pub fn is_initialized(&self) -> bool {
        self.shared_root.is_some() && self.origin_repo.is_some()
    }

    pub fn shared_root(&self) -> Option<&Path> {
        self.shared_root.as_deref()
    }

    pub fn origin_repo(&self) -> Option<&Path> {
        self.origin_repo.as_deref()
    }

    /// `<shared_root>/<repo identifier>`, the namespace of the originating
    /// repository.
    pub fn repo_namespace(&self) -> Option<PathBuf> {
        match (&self.shared_root, &self.origin_repo) {
            (Some(root), Some(repo)) => Some(root.join(repo_identifier(repo))),
            _ => None,
        }
    }

    /// `<shared_root>/<repo identifier>/<session name>`.
    pub fn session_namespace(&self, session_name: &str) -> Option<PathBuf> {
        self.repo_namespace().map(|ns| ns.join(session_name))
    }
}
