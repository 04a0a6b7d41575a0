//! Agent backend trait definition.

use crate::agents::errors::AgentError;
use crate::agents::types::LaunchOptions;
use crate::escape::shell_quote;
use crate::sessions::types::{PermissionMode, SessionData, StatusRecord};
use crate::sessions::validation::is_safe_identifier;

/// Trait defining the interface for agent backends.
///
/// Each supported agent implements this trait to provide its command syntax
/// and the names of the files it reports status and session identity through.
/// The rest of the crate only talks to agents through this trait.
pub trait AgentBackend: Send + Sync {
    /// The canonical name of this agent (e.g., "claude", "codex").
    fn name(&self) -> &'static str;

    /// The display name for this agent (e.g., "Claude Code").
    fn display_name(&self) -> &'static str;

    /// Check if this agent's CLI is installed and available in PATH.
    fn is_available(&self) -> bool;

    /// The executable used to launch this agent.
    fn default_command(&self) -> &'static str;

    /// File the agent's hooks write its status record to.
    fn status_file_name(&self) -> &'static str;

    /// File holding the session record (including the resumable session id).
    fn session_file_name(&self) -> &'static str;

    /// Command line flag(s) selecting the given permission mode, if the
    /// mode needs any.
    fn permission_flag(&self, mode: PermissionMode) -> Option<String>;

    /// Flag pointing the agent at a settings file. `None` if the agent has
    /// no such option.
    fn settings_flag(&self, _settings_path: &str) -> Option<String> {
        None
    }

    /// Arguments placed between the executable and the shared flags when
    /// resuming `session_id`.
    fn resume_args(&self, session_id: &str) -> Vec<String>;

    /// Build the command that starts a fresh agent session.
    fn build_start_command(&self, options: &LaunchOptions<'_>) -> String {
        let mut parts = vec![self.default_command().to_string()];
        parts.extend(self.shared_flags(options));
        if let Some(prompt) = options.prompt.filter(|p| !p.trim().is_empty()) {
            parts.push(shell_quote(prompt));
        }
        parts.join(" ")
    }

    /// Build the command that resumes an existing agent session.
    ///
    /// The session id is validated against the safe identifier allow-list
    /// because it is interpolated into a shell command.
    fn build_resume_command(
        &self,
        session_id: &str,
        options: &LaunchOptions<'_>,
    ) -> Result<String, AgentError> {
        if !is_safe_identifier(session_id) {
            return Err(AgentError::InvalidSessionId {
                session_id: session_id.to_string(),
            });
        }
        let mut parts = vec![self.default_command().to_string()];
        parts.extend(self.resume_args(session_id));
        parts.extend(self.shared_flags(options));
        Ok(parts.join(" "))
    }

    /// Flags common to start and resume.
    fn shared_flags(&self, options: &LaunchOptions<'_>) -> Vec<String> {
        let mut flags = Vec::new();
        if let Some(flag) = self.permission_flag(options.permission_mode) {
            flags.push(flag);
        }
        if let Some(path) = options.settings_path
            && let Some(flag) = self.settings_flag(&shell_quote(&path.to_string_lossy()))
        {
            flags.push(flag);
        }
        flags
    }

    /// Extract the resumable session id from the session file content.
    ///
    /// Returns `None` for malformed JSON and for ids failing the allow-list.
    fn parse_session_id(&self, content: &str) -> Option<String> {
        let data: SessionData = serde_json::from_str(content).ok()?;
        data.session_id.filter(|id| is_safe_identifier(id))
    }

    /// Parse the status file content. Out-of-enum statuses yield `None`.
    fn parse_status(&self, content: &str) -> Option<StatusRecord> {
        serde_json::from_str(content).ok()
    }
}
