//! # Configuration System
//!
//! Hierarchical TOML configuration for lanes.
//!
//! Configuration is loaded in the following order (later sources override
//! earlier ones):
//! 1. **Hardcoded defaults**
//! 2. **User config** - `~/.lanes/config.toml`
//! 3. **Project config** - `<repo>/.lanes/config.toml`
//!
//! Values are validated and normalized once here; the rest of the crate
//! reads them through typed accessors.
//!
//! ```rust,no_run
//! use lanes_core::config::{Config, LanesConfig};
//!
//! fn example() -> Result<(), lanes_core::errors::ConfigError> {
//!     let runtime = Config::new();
//!     let config = LanesConfig::load_hierarchy(&runtime, std::path::Path::new("."))?;
//!     println!("sessions live in {}", config.worktrees.folder());
//!     Ok(())
//! }
//! ```

pub mod defaults;
pub mod loading;
pub mod types;
pub mod validation;

pub use types::{AgentConfig, Config, LanesConfig, StorageConfig, WorkflowConfig, WorktreeConfig};
pub use validation::validate_config;

impl LanesConfig {
    /// Load configuration for a repository.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy(
        runtime: &Config,
        repo_root: &std::path::Path,
    ) -> Result<Self, crate::errors::ConfigError> {
        loading::load_hierarchy(runtime, repo_root)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        validation::validate_config(self)
    }
}
