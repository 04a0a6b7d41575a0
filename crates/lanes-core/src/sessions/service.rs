//! Reads and writes the per-session files.
//!
//! Every read returns `None` for a missing file, malformed content, or a
//! value that fails validation; callers treat all three as "no data". Writes
//! replace whole files atomically.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::agents::{AgentBackend, AgentError};
use crate::config::StorageConfig;
use crate::sessions::errors::SessionError;
use crate::sessions::persistence::{
    read_json_optional, read_text_optional, remove_file_if_exists, write_atomic, write_json_atomic,
};
use crate::sessions::types::{PermissionMode, SessionData, StatusRecord};
use crate::sessions::validation::is_safe_identifier;
use crate::storage::{StorageContext, StorageOptions, resolve, resolve_prompt_path, session_name_for};
use crate::workflow::{WORKFLOW_STATE_FILE, WorkflowState, WorkflowStatus};

/// Session file access for one agent's file naming.
#[derive(Clone, Copy)]
pub struct SessionDataService<'a> {
    context: &'a StorageContext,
    storage: &'a StorageConfig,
    agent: &'static dyn AgentBackend,
}

impl<'a> SessionDataService<'a> {
    pub fn new(
        context: &'a StorageContext,
        storage: &'a StorageConfig,
        agent: &'static dyn AgentBackend,
    ) -> Self {
        Self {
            context,
            storage,
            agent,
        }
    }

    /// Same storage, different agent.
    pub fn with_agent(&self, agent: &'static dyn AgentBackend) -> Self {
        Self { agent, ..*self }
    }

    pub fn agent(&self) -> &'static dyn AgentBackend {
        self.agent
    }

    pub fn status_file_path(&self, worktree: &Path) -> PathBuf {
        self.session_file(worktree, self.agent.status_file_name())
    }

    pub fn session_file_path(&self, worktree: &Path) -> PathBuf {
        self.session_file(worktree, self.agent.session_file_name())
    }

    pub fn workflow_state_path(&self, worktree: &Path) -> PathBuf {
        self.session_file(worktree, WORKFLOW_STATE_FILE)
    }

    fn session_file(&self, worktree: &Path, filename: &str) -> PathBuf {
        resolve(
            self.context,
            worktree,
            filename,
            &StorageOptions::for_session_files(self.storage),
        )
    }

    // --- reads ---

    pub fn get_status(&self, worktree: &Path) -> Option<StatusRecord> {
        let path = self.status_file_path(worktree);
        let content = read_text_optional(&path)?;
        let status = self.agent.parse_status(&content);
        if status.is_none() {
            warn!(
                event = "core.session.status_invalid",
                path = %path.display(),
                agent = self.agent.name()
            );
        }
        status
    }

    pub fn get_session_id(&self, worktree: &Path) -> Option<String> {
        let path = self.session_file_path(worktree);
        let content = read_text_optional(&path)?;
        let id = self.agent.parse_session_id(&content);
        if id.is_none() {
            debug!(
                event = "core.session.session_id_absent",
                path = %path.display(),
                agent = self.agent.name()
            );
        }
        id
    }

    /// The session record. A `sessionId` failing the allow-list reads as unset.
    pub fn get_session_data(&self, worktree: &Path) -> Option<SessionData> {
        let mut data: SessionData = read_json_optional(&self.session_file_path(worktree))?;
        data.session_id = data.session_id.filter(|id| is_safe_identifier(id));
        Some(data)
    }

    pub fn get_workflow_state(&self, worktree: &Path) -> Option<WorkflowState> {
        read_json_optional(&self.workflow_state_path(worktree))
    }

    pub fn get_workflow_status(&self, worktree: &Path) -> Option<WorkflowStatus> {
        self.get_workflow_state(worktree).map(|s| s.status)
    }

    /// Prompt text for the session named `session_name`, if any.
    pub fn get_prompt(&self, repo_root: &Path, session_name: &str) -> Option<String> {
        let path = self.prompt_path(repo_root, session_name)?;
        read_text_optional(&path)
    }

    pub fn prompt_path(&self, repo_root: &Path, session_name: &str) -> Option<PathBuf> {
        resolve_prompt_path(
            self.context,
            repo_root,
            session_name,
            &StorageOptions::for_prompts(self.storage),
        )
    }

    // --- writes ---

    pub fn save_status(&self, worktree: &Path, record: &StatusRecord) -> Result<(), SessionError> {
        write_json_atomic(&self.status_file_path(worktree), record)?;
        debug!(
            event = "core.session.status_saved",
            worktree = %worktree.display(),
            status = %record.status
        );
        Ok(())
    }

    /// Record the agent's resumable session id. Unsafe ids are refused.
    pub fn save_session_id(&self, worktree: &Path, session_id: &str) -> Result<(), SessionError> {
        if !is_safe_identifier(session_id) {
            return Err(AgentError::InvalidSessionId {
                session_id: session_id.to_string(),
            }
            .into());
        }
        self.update(worktree, |data| data.session_id = Some(session_id.to_string()))
    }

    pub fn save_permission_mode(
        &self,
        worktree: &Path,
        mode: PermissionMode,
    ) -> Result<(), SessionError> {
        self.update(worktree, |data| data.permission_mode = Some(mode))
    }

    /// Point the session at a workflow template, or clear the pointer.
    pub fn save_workflow(
        &self,
        worktree: &Path,
        template: Option<&Path>,
    ) -> Result<(), SessionError> {
        self.update(worktree, |data| data.workflow = template.map(Path::to_path_buf))
    }

    pub fn save_summary(&self, worktree: &Path, summary: &str) -> Result<(), SessionError> {
        self.update(worktree, |data| data.summary = Some(summary.to_string()))
    }

    /// Replace the whole session record.
    pub fn save_session_data(&self, worktree: &Path, data: &SessionData) -> Result<(), SessionError> {
        write_json_atomic(&self.session_file_path(worktree), data)?;
        Ok(())
    }

    pub fn save_prompt(
        &self,
        repo_root: &Path,
        session_name: &str,
        prompt: &str,
    ) -> Result<PathBuf, SessionError> {
        let path = self
            .prompt_path(repo_root, session_name)
            .ok_or_else(|| SessionError::InvalidName {
                name: session_name.to_string(),
                reason: "cannot be used as a prompt file name".to_string(),
            })?;
        write_atomic(&path, prompt.as_bytes())?;
        Ok(path)
    }

    /// Remove the session's status, record and workflow files, and its
    /// shared-storage directory when that is where they lived.
    pub fn clear_session_data(&self, worktree: &Path) -> Result<(), SessionError> {
        for path in [
            self.status_file_path(worktree),
            self.session_file_path(worktree),
            self.workflow_state_path(worktree),
        ] {
            remove_file_if_exists(&path)?;
        }

        if let Some(namespace) =
            session_name_for(worktree).and_then(|name| self.context.session_namespace(&name))
            && self.status_file_path(worktree).parent() == Some(namespace.as_path())
            && namespace.is_dir()
        {
            fs::remove_dir_all(&namespace)?;
        }

        info!(
            event = "core.session.data_cleared",
            worktree = %worktree.display(),
            agent = self.agent.name()
        );
        Ok(())
    }

    /// Read-modify-write of the session record, stamping agent and time.
    fn update(
        &self,
        worktree: &Path,
        apply: impl FnOnce(&mut SessionData),
    ) -> Result<(), SessionError> {
        let mut data = self.get_session_data(worktree).unwrap_or_default();
        apply(&mut data);
        data.agent_name
            .get_or_insert_with(|| self.agent.name().to_string());
        data.timestamp = Some(chrono::Utc::now().to_rfc3339());
        self.save_session_data(worktree, &data)
    }
}
