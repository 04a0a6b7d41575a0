//! Claude Code agent backend implementation.

use crate::agents::traits::AgentBackend;
use crate::sessions::types::PermissionMode;

/// Backend implementation for Claude Code.
pub struct ClaudeBackend;

impl AgentBackend for ClaudeBackend {
    fn name(&self) -> &'static str {
        "claude"
    }

    fn display_name(&self) -> &'static str {
        "Claude Code"
    }

    fn is_available(&self) -> bool {
        which::which("claude").is_ok()
    }

    fn default_command(&self) -> &'static str {
        "claude"
    }

    fn status_file_name(&self) -> &'static str {
        ".claude-status"
    }

    fn session_file_name(&self) -> &'static str {
        ".claude-session"
    }

    fn permission_flag(&self, mode: PermissionMode) -> Option<String> {
        match mode {
            PermissionMode::Default => None,
            PermissionMode::AcceptEdits => Some("--permission-mode acceptEdits".to_string()),
            PermissionMode::BypassPermissions => {
                Some("--dangerously-skip-permissions".to_string())
            }
        }
    }

    fn settings_flag(&self, settings_path: &str) -> Option<String> {
        Some(format!("--settings {settings_path}"))
    }

    fn resume_args(&self, session_id: &str) -> Vec<String> {
        vec!["--resume".to_string(), session_id.to_string()]
    }
}
