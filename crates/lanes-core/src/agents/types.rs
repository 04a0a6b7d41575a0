//! Agent type definitions and launch parameters.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sessions::types::PermissionMode;

/// Supported agent types in lanes.
///
/// Each variant is a coding agent CLI that can be launched inside a
/// session's worktree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentType {
    Claude,
    Codex,
}

impl AgentType {
    /// Get the canonical string name for this agent type.
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::Claude => "claude",
            AgentType::Codex => "codex",
        }
    }

    /// Parse an agent type from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "claude" => Some(AgentType::Claude),
            "codex" => Some(AgentType::Codex),
            _ => None,
        }
    }

    /// Get all supported agent types.
    pub fn all() -> &'static [AgentType] {
        &[AgentType::Claude, AgentType::Codex]
    }
}

impl std::fmt::Display for AgentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AgentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!(
                "Unknown agent '{}'. Supported: {}",
                s,
                AgentType::all()
                    .iter()
                    .map(|a| a.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })
    }
}

/// Everything a backend needs to build a launch command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LaunchOptions<'a> {
    pub permission_mode: PermissionMode,
    /// Agent settings file (hooks etc.) produced by the host, if any.
    pub settings_path: Option<&'a Path>,
    /// Initial prompt, only used for fresh starts.
    pub prompt: Option<&'a str>,
}
