use std::path::{Path, PathBuf};

use crate::agents::{self, AgentBackend};
use crate::config::LanesConfig;
use crate::git::GitRunner;
use crate::sessions::service::SessionDataService;
use crate::storage::StorageContext;

/// Everything session lifecycle operations need about one repository.
#[derive(Clone, Copy)]
pub struct SessionEnv<'a> {
    pub runner: &'a dyn GitRunner,
    pub repo_root: &'a Path,
    pub config: &'a LanesConfig,
    pub context: &'a StorageContext,
}

impl<'a> SessionEnv<'a> {
    pub fn new(
        runner: &'a dyn GitRunner,
        repo_root: &'a Path,
        config: &'a LanesConfig,
        context: &'a StorageContext,
    ) -> Self {
        Self {
            runner,
            repo_root,
            config,
            context,
        }
    }

    pub fn worktrees_dir(&self) -> PathBuf {
        self.config.worktrees_dir(self.repo_root)
    }

    pub fn worktree_path(&self, session_name: &str) -> PathBuf {
        self.worktrees_dir().join(session_name)
    }

    pub fn service(&self, agent: &'static dyn AgentBackend) -> SessionDataService<'a> {
        SessionDataService::new(self.context, &self.config.storage, agent)
    }

    /// The agent whose session record exists in `worktree`, if any.
    pub fn detect_agent(&self, worktree: &Path) -> Option<&'static dyn AgentBackend> {
        agents::AgentType::all()
            .iter()
            .filter_map(|t| agents::get_agent_by_type(*t))
            .find(|agent| {
                let service = self.service(*agent);
                service.session_file_path(worktree).is_file()
                    || service.status_file_path(worktree).is_file()
            })
    }
}
