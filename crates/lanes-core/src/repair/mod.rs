//! Broken worktree detection and repair.
//!
//! ```rust,no_run
//! use lanes_core::git::CliGitRunner;
//! use lanes_core::repair;
//!
//! let summary = repair::repair_all(&CliGitRunner, std::path::Path::new("."), ".worktrees");
//! for failure in &summary.failed {
//!     eprintln!("{}: {}", failure.worktree.session_name, failure.error);
//! }
//! ```

pub mod detection;
pub mod errors;
pub mod handler;
pub mod types;

pub use detection::{classify, detect_broken, parse_gitdir};
pub use errors::RepairError;
pub use handler::{repair, repair_all};
pub use types::{BrokenWorktree, RepairFailure, RepairResult, RepairSummary, WorktreeHealth};
