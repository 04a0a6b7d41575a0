//! Storage namespaces and path resolution for session artifacts.

pub mod context;
pub mod repo_id;
pub mod resolver;

pub use context::StorageContext;
pub use repo_id::repo_identifier;
pub use resolver::{
    StorageOptions, is_safe_session_name, normalize_relative_path, resolve, resolve_prompt_path,
    session_name_for,
};
