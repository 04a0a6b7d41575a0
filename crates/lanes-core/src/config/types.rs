//! Configuration type definitions.
//!
//! These types are deserialized from TOML config files. Every file-backed
//! field is optional so that merging can tell "unset" from "set to the
//! default"; accessors apply the documented defaults.
//!
//! # Example Configuration
//!
//! ```toml
//! [storage]
//! use_global_storage = false
//! session_data_path = ".lanes/session"
//! prompts_folder = ".lanes/prompts"
//!
//! [worktrees]
//! folder = ".worktrees"
//! base_branch = "main"
//!
//! [agent]
//! default = "claude"
//! permission_mode = "acceptEdits"
//! terminal_mode = "tmux"
//!
//! [workflow]
//! templates_dir = ".lanes/workflows"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::sessions::types::{PermissionMode, TerminalMode};

/// Runtime configuration derived from environment variables and system
/// defaults, not from config files.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base directory for all lanes data (default: ~/.lanes, `LANES_HOME`)
    pub lanes_dir: PathBuf,
    /// Log level for the application (`LANES_LOG_LEVEL`)
    pub log_level: String,
}

/// Main configuration loaded from TOML config files.
///
/// Loaded from the user config (`~/.lanes/config.toml`) and then the project
/// config (`<repo>/.lanes/config.toml`); project values win.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LanesConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub worktrees: WorktreeConfig,

    #[serde(default)]
    pub agent: AgentConfig,

    #[serde(default)]
    pub workflow: WorkflowConfig,
}

/// Where session bookkeeping files live.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StorageConfig {
    /// Keep session files in shared storage outside the worktree.
    /// Default: true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_global_storage: Option<bool>,

    /// Root of the shared storage area. Default: `~/.lanes/storage`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_storage_root: Option<PathBuf>,

    /// Worktree-relative folder for session files. When set (and safe) it
    /// takes precedence over shared storage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_data_path: Option<String>,

    /// Repository-relative folder for prompt files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompts_folder: Option<String>,
}

/// Layout of session worktrees inside the repository.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct WorktreeConfig {
    /// Folder (relative to the repository root) holding one directory per
    /// session. Default: `.worktrees`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,

    /// Base ref for newly created session branches. Default: HEAD.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_branch: Option<String>,
}

/// Agent defaults applied when a session request does not specify them.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AgentConfig {
    /// Default agent. Must be one of: claude, codex.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission_mode: Option<PermissionMode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal_mode: Option<TerminalMode>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct WorkflowConfig {
    /// Repository-relative folder holding workflow templates.
    /// Default: `.lanes/workflows`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<String>,
}
