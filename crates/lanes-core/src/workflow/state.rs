use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::workflow::template::StepType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    Running,
    Waiting,
    Complete,
    Error,
}

impl WorkflowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStatus::Running => "running",
            WorkflowStatus::Waiting => "waiting",
            WorkflowStatus::Complete => "complete",
            WorkflowStatus::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowStatus::Complete)
    }
}

impl std::fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress through one loop step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopProgress {
    /// Index of the task to run next.
    pub current_task: usize,
    /// Output per task id.
    #[serde(default)]
    pub outputs: BTreeMap<String, String>,
}

/// Persisted snapshot of a running workflow, written as
/// `workflow-state.json` after every transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowState {
    /// Name of the template this state belongs to.
    pub workflow: String,
    pub status: WorkflowStatus,
    /// Current step id. Stays on the last step once complete.
    pub step: String,
    pub step_type: StepType,
    /// Progress per loop step id.
    #[serde(default)]
    pub tasks: BTreeMap<String, LoopProgress>,
    /// Output per action step id.
    #[serde(default)]
    pub outputs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
