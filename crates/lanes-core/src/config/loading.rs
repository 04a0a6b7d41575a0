//! Configuration loading and merging logic.
//!
//! Configuration is loaded in the following order (later sources override
//! earlier ones):
//! 1. **Hardcoded defaults** - accessor fallbacks in [`super::defaults`]
//! 2. **User config** - `~/.lanes/config.toml`
//! 3. **Project config** - `<repo>/.lanes/config.toml`

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::config::defaults::{CONFIG_FILE_NAME, PROJECT_CONFIG_DIR};
use crate::config::types::{
    AgentConfig, Config, LanesConfig, StorageConfig, WorkflowConfig, WorktreeConfig,
};
use crate::config::validation::validate_config;
use crate::errors::ConfigError;

/// Load and validate the configuration hierarchy for a repository.
///
/// # Errors
///
/// Missing config files are not errors. Unreadable or unparsable files and
/// failed validation are.
pub fn load_hierarchy(runtime: &Config, repo_root: &Path) -> Result<LanesConfig, ConfigError> {
    let mut config = LanesConfig::default();

    let user_path = runtime.user_config_path();
    if let Some(user_config) = load_config_file(&user_path)? {
        config = merge_configs(config, user_config);
    }

    let project_path = repo_root.join(PROJECT_CONFIG_DIR).join(CONFIG_FILE_NAME);
    if let Some(project_config) = load_config_file(&project_path)? {
        config = merge_configs(config, project_config);
    }

    validate_config(&config)?;

    info!(
        event = "core.config.load_completed",
        repo_root = %repo_root.display(),
        worktrees_folder = config.worktrees.folder(),
        use_global_storage = config.storage.use_global_storage(),
    );

    Ok(config)
}

/// Load a single configuration file. Returns `Ok(None)` if it does not exist.
pub fn load_config_file(path: &Path) -> Result<Option<LanesConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(event = "core.config.file_not_found", path = %path.display());
            return Ok(None);
        }
        Err(e) => return Err(ConfigError::IoError { source: e }),
    };

    let config = toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Merge two configurations, with `override_config` taking precedence for
/// every field it sets.
pub fn merge_configs(base: LanesConfig, override_config: LanesConfig) -> LanesConfig {
    LanesConfig {
        storage: StorageConfig {
            use_global_storage: override_config
                .storage
                .use_global_storage
                .or(base.storage.use_global_storage),
            global_storage_root: override_config
                .storage
                .global_storage_root
                .or(base.storage.global_storage_root),
            session_data_path: override_config
                .storage
                .session_data_path
                .or(base.storage.session_data_path),
            prompts_folder: override_config
                .storage
                .prompts_folder
                .or(base.storage.prompts_folder),
        },
        worktrees: WorktreeConfig {
            folder: override_config.worktrees.folder.or(base.worktrees.folder),
            base_branch: override_config
                .worktrees
                .base_branch
                .or(base.worktrees.base_branch),
        },
        agent: AgentConfig {
            default: override_config.agent.default.or(base.agent.default),
            permission_mode: override_config
                .agent
                .permission_mode
                .or(base.agent.permission_mode),
            terminal_mode: override_config
                .agent
                .terminal_mode
                .or(base.agent.terminal_mode),
        },
        workflow: WorkflowConfig {
            templates_dir: override_config
                .workflow
                .templates_dir
                .or(base.workflow.templates_dir),
        },
    }
}
