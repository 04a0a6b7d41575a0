//! lanes-core: Core library for resumable agent sessions in git worktrees
//!
//! A session is a git worktree plus a few bookkeeping files: the agent's
//! status, its resumable session id, and optionally the snapshot of a
//! workflow running inside it. This library is shared by the CLI and the
//! editor integration.
//!
//! # Main Entry Points
//!
//! - [`sessions`] - Create, list, destroy sessions; read and write their files
//! - [`repair`] - Detect and repair worktrees whose git link broke
//! - [`workflow`] - Load workflow templates and drive them step by step
//! - [`storage`] - Decide where each session file lives
//! - [`config`] - Configuration management
//! - [`agents`] - Agent backend management

pub mod agents;
pub mod config;
pub mod errors;
pub mod escape;
pub mod git;
pub mod logging;
pub mod repair;
pub mod sessions;
pub mod storage;
pub mod workflow;

// Re-export commonly used types at crate root for convenience
pub use config::{Config, LanesConfig};
pub use errors::{LanesError, LanesResult};
pub use git::{CliGitRunner, GitRunner};
pub use repair::{BrokenWorktree, RepairResult, RepairSummary};
pub use sessions::{
    CreateSessionRequest, SessionDataService, SessionEnv, SessionStatus, SessionSummary,
    StatusRecord,
};
pub use storage::{StorageContext, repo_identifier};
pub use workflow::{WorkflowRuntime, WorkflowState, WorkflowStateMachine, WorkflowTemplate};

// Re-export logging initialization
pub use logging::init_logging;
