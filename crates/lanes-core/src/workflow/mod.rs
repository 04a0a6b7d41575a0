//! Declarative, resumable workflows run inside a session.
//!
//! - [`template`] / [`loader`]: the static template and its validation
//! - [`machine`]: the pure automaton walking a template
//! - [`runtime`]: per-session persistence of the automaton's snapshot

pub mod errors;
pub mod loader;
pub mod machine;
pub mod runtime;
pub mod state;
pub mod template;

pub use errors::WorkflowError;
pub use loader::{TemplateEntry, list_templates, load};
pub use machine::{Directive, TaskPosition, WorkflowStateMachine};
pub use runtime::{WORKFLOW_STATE_FILE, WorkflowRuntime};
pub use state::{LoopProgress, WorkflowState, WorkflowStatus};
pub use template::{AgentCapabilities, StepType, TaskSpec, WorkflowStep, WorkflowTemplate};
