//! Workflow template types.
//!
//! A template is static: sub-agents with capability lists, named loops of
//! tasks, and an ordered list of steps.
//!
//! ```toml
//! name = "feature"
//! description = "Plan, implement task by task, then review"
//!
//! [agents.reviewer]
//! description = "Reads code and reports problems"
//! tools = ["Read", "Grep"]
//! cannot = ["Edit", "Bash"]
//!
//! [[loops.tasks]]
//! id = "api"
//! instructions = "Add the endpoint"
//!
//! [[steps]]
//! id = "plan"
//! type = "action"
//! instructions = "Write a plan to PLAN.md"
//! wait_for_user = true
//!
//! [[steps]]
//! id = "tasks"
//! type = "loop"
//!
//! [[steps]]
//! id = "review"
//! type = "action"
//! agent = "reviewer"
//! instructions = "Review the branch"
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowTemplate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub agents: BTreeMap<String, AgentCapabilities>,
    #[serde(default)]
    pub loops: BTreeMap<String, Vec<TaskSpec>>,
    #[serde(default)]
    pub steps: Vec<WorkflowStep>,
}

impl WorkflowTemplate {
    pub fn step(&self, index: usize) -> Option<&WorkflowStep> {
        self.steps.get(index)
    }

    pub fn step_index(&self, id: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.id() == id)
    }

    /// Tasks of the loop named `name`; empty when undeclared.
    pub fn loop_tasks(&self, name: &str) -> &[TaskSpec] {
        self.loops.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// What a named sub-agent may and may not do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentCapabilities {
    #[serde(default)]
    pub description: String,
    /// Allowed tool names.
    #[serde(default)]
    pub tools: Vec<String>,
    /// Explicit denials.
    #[serde(default)]
    pub cannot: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    pub id: String,
    pub instructions: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepType {
    Action,
    Loop,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkflowStep {
    Action {
        id: String,
        instructions: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        agent: Option<String>,
        /// Stop in `waiting` after this step until resumed.
        #[serde(default, alias = "waitForUser")]
        wait_for_user: bool,
    },
    /// Runs the tasks of the loop named by `id`, one per advance.
    Loop {
        id: String,
        /// Context given alongside every task.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        instructions: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        agent: Option<String>,
    },
}

impl WorkflowStep {
    pub fn id(&self) -> &str {
        match self {
            WorkflowStep::Action { id, .. } | WorkflowStep::Loop { id, .. } => id,
        }
    }

    pub fn step_type(&self) -> StepType {
        match self {
            WorkflowStep::Action { .. } => StepType::Action,
            WorkflowStep::Loop { .. } => StepType::Loop,
        }
    }

    pub fn agent(&self) -> Option<&str> {
        match self {
            WorkflowStep::Action { agent, .. } | WorkflowStep::Loop { agent, .. } => {
                agent.as_deref()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_deserialize_by_type_tag() {
        let template: WorkflowTemplate = toml::from_str(
            r#"
name = "t"

[[loops.impl]]
id = "a"
instructions = "do a"

[[steps]]
id = "plan"
type = "action"
instructions = "plan it"
wait_for_user = true

[[steps]]
id = "impl"
type = "loop"
"#,
        )
        .unwrap();

        assert_eq!(template.steps.len(), 2);
        assert!(matches!(
            &template.steps[0],
            WorkflowStep::Action { wait_for_user: true, agent: None, .. }
        ));
        assert_eq!(template.steps[1].step_type(), StepType::Loop);
        assert_eq!(template.loop_tasks("impl").len(), 1);
        assert!(template.loop_tasks("missing").is_empty());
        assert_eq!(template.step_index("impl"), Some(1));
    }

    #[test]
    fn test_unknown_step_type_is_rejected() {
        let result: Result<WorkflowTemplate, _> = toml::from_str(
            r#"
name = "t"
[[steps]]
id = "x"
type = "parallel"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_json_template_accepts_camel_case_wait_flag() {
        let template: WorkflowTemplate = serde_json::from_str(
            r#"{"name":"t","steps":[{"type":"action","id":"a","instructions":"i","waitForUser":true}]}"#,
        )
        .unwrap();
        assert!(matches!(
            template.steps[0],
            WorkflowStep::Action { wait_for_user: true, .. }
        ));
    }
}
