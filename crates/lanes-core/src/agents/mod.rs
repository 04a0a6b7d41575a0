//! Agent backend module for the coding agents that run inside sessions.
//!
//! Agents differ in command syntax and in the file names their hooks use to
//! report status and session identity. Everything else in the crate depends
//! only on [`AgentBackend`].
//!
//! # Usage
//!
//! ```rust
//! use lanes_core::agents::{get_agent, is_valid_agent, LaunchOptions};
//!
//! assert!(is_valid_agent("claude"));
//! let claude = get_agent("claude").unwrap();
//! assert_eq!(claude.build_start_command(&LaunchOptions::default()), "claude");
//! ```

pub mod backends;
pub mod errors;
pub mod registry;
pub mod traits;
pub mod types;

pub use errors::AgentError;
pub use registry::{
    default_agent, default_agent_name, get_agent, get_agent_by_type, is_valid_agent,
    require_agent, valid_agent_names,
};
pub use traits::AgentBackend;
pub use types::{AgentType, LaunchOptions};
