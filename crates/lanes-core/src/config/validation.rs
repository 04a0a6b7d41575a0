//! Configuration validation, applied once after loading.

use tracing::warn;

use crate::agents;
use crate::config::types::LanesConfig;
use crate::errors::ConfigError;
use crate::storage::normalize_relative_path;

/// Validate a merged configuration.
///
/// Unsafe `session_data_path` / `prompts_folder` values are NOT rejected
/// here: path resolution already ignores them, and a warning is enough.
pub fn validate_config(config: &LanesConfig) -> Result<(), ConfigError> {
    if let Some(agent) = &config.agent.default
        && !agents::is_valid_agent(agent)
    {
        return Err(ConfigError::InvalidAgent {
            agent: agent.clone(),
        });
    }

    let folder = config.worktrees.folder();
    if normalize_relative_path(folder).is_none() {
        return Err(ConfigError::InvalidConfiguration {
            message: format!(
                "worktrees.folder '{folder}' must be a relative path inside the repository"
            ),
        });
    }

    if let Some(base) = &config.worktrees.base_branch
        && (base.trim().is_empty() || base.starts_with('-'))
    {
        return Err(ConfigError::InvalidConfiguration {
            message: format!("worktrees.base_branch '{base}' is not a valid ref"),
        });
    }

    for (key, value) in [
        ("storage.session_data_path", config.storage.session_data_path()),
        ("storage.prompts_folder", config.storage.prompts_folder()),
    ] {
        if let Some(raw) = value
            && normalize_relative_path(raw).is_none()
        {
            warn!(
                event = "core.config.unsafe_relative_path",
                key = key,
                value = raw,
                "Configured path escapes its base directory and will be ignored"
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&LanesConfig::default()).is_ok());
    }

    #[test]
    fn test_rejects_traversing_worktrees_folder() {
        let mut config = LanesConfig::default();
        config.worktrees.folder = Some("../outside".to_string());
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_rejects_absolute_worktrees_folder() {
        let mut config = LanesConfig::default();
        config.worktrees.folder = Some("/var/tmp/sessions".to_string());
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_rejects_option_like_base_branch() {
        let mut config = LanesConfig::default();
        config.worktrees.base_branch = Some("--orphan".to_string());
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_unsafe_session_path_only_warns() {
        let mut config = LanesConfig::default();
        config.storage.session_data_path = Some("../../etc".to_string());
        assert!(validate_config(&config).is_ok());
    }
}
