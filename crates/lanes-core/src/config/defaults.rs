//! Default values and accessors for configuration types.

use std::path::PathBuf;

use crate::agents;
use crate::config::types::{
    AgentConfig, Config, LanesConfig, StorageConfig, WorkflowConfig, WorktreeConfig,
};
use crate::sessions::types::{PermissionMode, TerminalMode};

pub const DEFAULT_WORKTREES_FOLDER: &str = ".worktrees";
pub const DEFAULT_TEMPLATES_DIR: &str = ".lanes/workflows";
pub const DEFAULT_PROMPTS_DIR: &str = ".lanes/prompts";
pub const PROJECT_CONFIG_DIR: &str = ".lanes";
pub const CONFIG_FILE_NAME: &str = "config.toml";

impl Default for Config {
    fn default() -> Self {
        let lanes_dir = match std::env::var_os("LANES_HOME") {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => match dirs::home_dir() {
                Some(home) => home.join(".lanes"),
                None => {
                    tracing::warn!(
                        event = "core.config.home_dir_missing",
                        "Could not find home directory, using temp dir for lanes data"
                    );
                    std::env::temp_dir().join(".lanes")
                }
            },
        };

        Self {
            lanes_dir,
            log_level: std::env::var("LANES_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default root of the shared storage area.
    pub fn default_storage_root(&self) -> PathBuf {
        self.lanes_dir.join("storage")
    }

    /// Location of the user-level config file.
    pub fn user_config_path(&self) -> PathBuf {
        self.lanes_dir.join(CONFIG_FILE_NAME)
    }
}

impl StorageConfig {
    pub fn use_global_storage(&self) -> bool {
        self.use_global_storage.unwrap_or(true)
    }

    /// Configured worktree-relative session folder, `None` when unset or blank.
    pub fn session_data_path(&self) -> Option<&str> {
        self.session_data_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
    }

    pub fn prompts_folder(&self) -> Option<&str> {
        self.prompts_folder.as_deref().filter(|p| !p.trim().is_empty())
    }

    pub fn global_storage_root(&self, runtime: &Config) -> PathBuf {
        self.global_storage_root
            .clone()
            .unwrap_or_else(|| runtime.default_storage_root())
    }
}

impl WorktreeConfig {
    pub fn folder(&self) -> &str {
        self.folder
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .unwrap_or(DEFAULT_WORKTREES_FOLDER)
    }
}

impl AgentConfig {
    pub fn default_agent(&self) -> &str {
        self.default
            .as_deref()
            .unwrap_or(agents::default_agent_name())
    }

    pub fn permission_mode(&self) -> PermissionMode {
        self.permission_mode.unwrap_or(PermissionMode::AcceptEdits)
    }

    pub fn terminal_mode(&self) -> TerminalMode {
        self.terminal_mode.unwrap_or_default()
    }
}

impl WorkflowConfig {
    pub fn templates_dir(&self) -> &str {
        self.templates_dir
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(DEFAULT_TEMPLATES_DIR)
    }
}

impl LanesConfig {
    /// Worktrees folder for a repository: `<repo>/<worktrees.folder>`.
    pub fn worktrees_dir(&self, repo_root: &std::path::Path) -> PathBuf {
        repo_root.join(self.worktrees.folder())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_defaults() {
        let config: LanesConfig = toml::from_str("").unwrap();
        assert!(config.storage.use_global_storage());
        assert_eq!(config.storage.session_data_path(), None);
        assert_eq!(config.storage.prompts_folder(), None);
        assert_eq!(config.worktrees.folder(), ".worktrees");
        assert_eq!(config.agent.default_agent(), "claude");
        assert_eq!(config.agent.permission_mode(), PermissionMode::AcceptEdits);
        assert_eq!(config.agent.terminal_mode(), TerminalMode::Integrated);
        assert_eq!(config.workflow.templates_dir(), ".lanes/workflows");
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config: LanesConfig = toml::from_str(
            r#"
[storage]
session_data_path = "  "

[worktrees]
folder = ""
"#,
        )
        .unwrap();
        assert_eq!(config.storage.session_data_path(), None);
        assert_eq!(config.worktrees.folder(), ".worktrees");
    }

    #[test]
    fn test_global_storage_root_default() {
        let runtime = Config {
            lanes_dir: PathBuf::from("/home/dev/.lanes"),
            log_level: "info".to_string(),
        };
        let storage = StorageConfig::default();
        assert_eq!(
            storage.global_storage_root(&runtime),
            PathBuf::from("/home/dev/.lanes/storage")
        );
    }

    #[test]
    fn test_worktrees_dir() {
        let config = LanesConfig::default();
        assert_eq!(
            config.worktrees_dir(std::path::Path::new("/repo")),
            PathBuf::from("/repo/.worktrees")
        );
    }
}
