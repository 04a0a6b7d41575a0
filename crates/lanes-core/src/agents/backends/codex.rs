//! Codex CLI agent backend implementation.

use crate::agents::traits::AgentBackend;
use crate::sessions::types::PermissionMode;

/// Backend implementation for OpenAI Codex CLI.
pub struct CodexBackend;

impl AgentBackend for CodexBackend {
    fn name(&self) -> &'static str {
        "codex"
    }

    fn display_name(&self) -> &'static str {
        "Codex CLI"
    }

    fn is_available(&self) -> bool {
        which::which("codex").is_ok()
    }

    fn default_command(&self) -> &'static str {
        "codex"
    }

    fn status_file_name(&self) -> &'static str {
        ".codex-status"
    }

    fn session_file_name(&self) -> &'static str {
        ".codex-session"
    }

    fn permission_flag(&self, mode: PermissionMode) -> Option<String> {
        match mode {
            PermissionMode::Default => None,
            PermissionMode::AcceptEdits => Some("--full-auto".to_string()),
            PermissionMode::BypassPermissions => {
                Some("--dangerously-bypass-approvals-and-sandbox".to_string())
            }
        }
    }

    // Codex resumes through a subcommand rather than a flag
    fn resume_args(&self, session_id: &str) -> Vec<String> {
        vec!["resume".to_string(), session_id.to_string()]
    }
}
