//! The workflow automaton.
//!
//! ```text
//! not started --start--> running --advance--> running | waiting | complete
//!                          ^  |                           |
//!                          |  +--fail--> error            |
//!                          +----resume--(waiting, error)--+
//! ```
//!
//! The machine performs no I/O. Every mutating call returns the new state
//! so the caller can persist it.

use tracing::debug;

use super::errors::WorkflowError;
use super::state::{LoopProgress, WorkflowState, WorkflowStatus};
use super::template::{AgentCapabilities, StepType, WorkflowStep, WorkflowTemplate};

/// What the agent should be doing right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub step_id: String,
    pub step_type: StepType,
    pub status: WorkflowStatus,
    /// Action instructions, or the current task's instructions in a loop.
    pub instructions: String,
    /// Loop step instructions shared by every task.
    pub context: Option<String>,
    pub task: Option<TaskPosition>,
    pub agent: Option<String>,
    pub capabilities: Option<AgentCapabilities>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPosition {
    pub id: String,
    pub index: usize,
    pub total: usize,
}

#[derive(Debug, Clone)]
pub struct WorkflowStateMachine {
    template: WorkflowTemplate,
    state: Option<WorkflowState>,
    step_index: usize,
}

impl WorkflowStateMachine {
    /// A machine that has not been started.
    pub fn new(template: WorkflowTemplate) -> Self {
        Self {
            template,
            state: None,
            step_index: 0,
        }
    }

    /// Rebuild a machine from a persisted snapshot.
    ///
    /// Fails if the snapshot does not fit the template (other workflow, step
    /// gone or changed type, loop position out of range).
    pub fn restore(template: WorkflowTemplate, state: WorkflowState) -> Result<Self, WorkflowError> {
        let mismatch = |message: String| WorkflowError::StateMismatch {
            template: template.name.clone(),
            message,
        };

        if state.workflow != template.name {
            return Err(mismatch(format!(
                "state belongs to workflow '{}'",
                state.workflow
            )));
        }

        let step_index = template
            .step_index(&state.step)
            .ok_or_else(|| mismatch(format!("unknown step '{}'", state.step)))?;
        let step = &template.steps[step_index];

        if step.step_type() != state.step_type {
            return Err(mismatch(format!(
                "step '{}' is no longer a {:?} step",
                state.step, state.step_type
            )));
        }

        if step.step_type() == StepType::Loop && !state.status.is_terminal() {
            let total = template.loop_tasks(step.id()).len();
            let current = state.tasks.get(step.id()).map_or(0, |p| p.current_task);
            if current >= total {
                return Err(mismatch(format!(
                    "loop '{}' is at task {} of {}",
                    step.id(),
                    current,
                    total
                )));
            }
        }

        Ok(Self {
            template,
            state: Some(state),
            step_index,
        })
    }

    pub fn template(&self) -> &WorkflowTemplate {
        &self.template
    }

    pub fn is_started(&self) -> bool {
        self.state.is_some()
    }

    /// Current snapshot; `None` before `start`.
    pub fn state(&self) -> Option<&WorkflowState> {
        self.state.as_ref()
    }

    /// Enter the first step with status `running`.
    pub fn start(&mut self) -> Result<&WorkflowState, WorkflowError> {
        if self.state.is_some() {
            return Err(WorkflowError::AlreadyStarted);
        }
        let first = self
            .template
            .step(0)
            .ok_or_else(|| WorkflowError::EmptyTemplate {
                name: self.template.name.clone(),
            })?;

        self.state = Some(WorkflowState {
            workflow: self.template.name.clone(),
            status: WorkflowStatus::Running,
            step: first.id().to_string(),
            step_type: first.step_type(),
            tasks: Default::default(),
            outputs: Default::default(),
            summary: None,
            error: None,
        });
        self.enter_step(0);
        self.snapshot()
    }

    /// Complete the current action step or the current loop task, recording
    /// `output` when given.
    ///
    /// On a complete workflow this is a no-op that returns the unchanged
    /// state. A waiting or failed workflow must be resumed first.
    pub fn advance(&mut self, output: Option<&str>) -> Result<&WorkflowState, WorkflowError> {
        let status = self.state.as_ref().ok_or(WorkflowError::NotStarted)?.status;
        match status {
            WorkflowStatus::Complete => {
                debug!(event = "core.workflow.advance_ignored", reason = "complete");
                return self.snapshot();
            }
            WorkflowStatus::Waiting | WorkflowStatus::Error => {
                return Err(WorkflowError::InvalidTransition {
                    action: "advance",
                    status,
                });
            }
            WorkflowStatus::Running => {}
        }

        let index = self.step_index;
        let step = self.template.steps[index].clone();
        let state = self.state.as_mut().ok_or(WorkflowError::NotStarted)?;

        match step {
            WorkflowStep::Action {
                id, wait_for_user, ..
            } => {
                if let Some(output) = output {
                    state.outputs.insert(id, output.to_string());
                }
                if wait_for_user {
                    state.status = WorkflowStatus::Waiting;
                } else {
                    self.enter_step(index + 1);
                }
            }
            WorkflowStep::Loop { id, .. } => {
                let tasks = self.template.loop_tasks(&id);
                let progress = state.tasks.entry(id.clone()).or_default();
                if let (Some(output), Some(task)) = (output, tasks.get(progress.current_task)) {
                    progress.outputs.insert(task.id.clone(), output.to_string());
                }
                progress.current_task += 1;
                if progress.current_task >= tasks.len() {
                    self.enter_step(index + 1);
                }
            }
        }

        self.snapshot()
    }

    /// Set or overwrite the summary. Allowed in any non-terminal state.
    pub fn set_summary(&mut self, summary: &str) -> Result<&WorkflowState, WorkflowError> {
        let state = self.state_mut()?;
        if state.status.is_terminal() {
            return Err(WorkflowError::Terminal);
        }
        state.summary = Some(summary.to_string());
        self.snapshot()
    }

    /// Move a non-terminal workflow to `error`.
    pub fn fail(&mut self, message: &str) -> Result<&WorkflowState, WorkflowError> {
        let state = self.state_mut()?;
        if state.status.is_terminal() {
            return Err(WorkflowError::Terminal);
        }
        state.status = WorkflowStatus::Error;
        state.error = Some(message.to_string());
        self.snapshot()
    }

    /// Clear `waiting` (moving past the confirmed step) or `error` (retrying
    /// the same step). A running workflow is left as is.
    pub fn resume(&mut self) -> Result<&WorkflowState, WorkflowError> {
        let index = self.step_index;
        let state = self.state_mut()?;
        match state.status {
            WorkflowStatus::Complete => return Err(WorkflowError::Terminal),
            WorkflowStatus::Running => {}
            WorkflowStatus::Error => {
                state.status = WorkflowStatus::Running;
                state.error = None;
            }
            WorkflowStatus::Waiting => {
                state.status = WorkflowStatus::Running;
                self.enter_step(index + 1);
            }
        }
        self.snapshot()
    }

    /// What the agent should do now. `None` before start and once complete.
    pub fn current_directive(&self) -> Option<Directive> {
        let state = self.state.as_ref()?;
        if state.status.is_terminal() {
            return None;
        }
        let step = self.template.step(self.step_index)?;
        let agent = step.agent().map(str::to_string);
        let capabilities = agent
            .as_deref()
            .and_then(|a| self.template.agents.get(a))
            .cloned();

        let (instructions, context, task) = match step {
            WorkflowStep::Action { instructions, .. } => (instructions.clone(), None, None),
            WorkflowStep::Loop {
                id, instructions, ..
            } => {
                let tasks = self.template.loop_tasks(id);
                let index = state.tasks.get(id).map_or(0, |p| p.current_task);
                let task = tasks.get(index)?;
                (
                    task.instructions.clone(),
                    instructions.clone(),
                    Some(TaskPosition {
                        id: task.id.clone(),
                        index,
                        total: tasks.len(),
                    }),
                )
            }
        };

        Some(Directive {
            step_id: step.id().to_string(),
            step_type: step.step_type(),
            status: state.status,
            instructions,
            context,
            task,
            agent,
            capabilities,
        })
    }

    /// Make `index` the current step, skipping loops without tasks. Past the
    /// last step the workflow completes and keeps the last step id.
    fn enter_step(&mut self, mut index: usize) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        loop {
            let Some(step) = self.template.steps.get(index) else {
                state.status = WorkflowStatus::Complete;
                debug!(event = "core.workflow.completed", workflow = %state.workflow);
                return;
            };

            self.step_index = index;
            state.step = step.id().to_string();
            state.step_type = step.step_type();

            if let WorkflowStep::Loop { id, .. } = step {
                let total = self.template.loop_tasks(id).len();
                let progress = state
                    .tasks
                    .entry(id.clone())
                    .or_insert_with(LoopProgress::default);
                if progress.current_task >= total {
                    index += 1;
                    continue;
                }
            }
            return;
        }
    }

    fn state_mut(&mut self) -> Result<&mut WorkflowState, WorkflowError> {
        self.state.as_mut().ok_or(WorkflowError::NotStarted)
    }

    fn snapshot(&self) -> Result<&WorkflowState, WorkflowError> {
        self.state.as_ref().ok_or(WorkflowError::NotStarted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::loader::parse_toml;

    fn template() -> WorkflowTemplate {
        parse_toml(
            r#"
name = "feature"

[agents.coder]
tools = ["Edit"]

[[loops.impl]]
id = "one"
instructions = "first task"
[[loops.impl]]
id = "two"
instructions = "second task"
[[loops.impl]]
id = "three"
instructions = "third task"

[[steps]]
id = "plan"
type = "action"
instructions = "plan it"
wait_for_user = true

[[steps]]
id = "impl"
type = "loop"
instructions = "follow PLAN.md"
agent = "coder"

[[steps]]
id = "wrap"
type = "action"
instructions = "summarize"
"#,
            "test",
        )
        .unwrap()
    }

    fn started() -> WorkflowStateMachine {
        let mut machine = WorkflowStateMachine::new(template());
        machine.start().unwrap();
        machine
    }

    #[test]
    fn test_start_enters_first_step() {
        let machine = started();
        let state = machine.state().unwrap();
        assert_eq!(state.status, WorkflowStatus::Running);
        assert_eq!(state.step, "plan");
        assert_eq!(state.step_type, StepType::Action);
    }

    #[test]
    fn test_operations_before_start() {
        let mut machine = WorkflowStateMachine::new(template());
        assert!(machine.state().is_none());
        assert!(machine.current_directive().is_none());
        assert!(matches!(machine.advance(None), Err(WorkflowError::NotStarted)));
        assert!(matches!(machine.set_summary("x"), Err(WorkflowError::NotStarted)));
        assert!(matches!(machine.resume(), Err(WorkflowError::NotStarted)));
    }

    #[test]
    fn test_start_twice_fails() {
        let mut machine = started();
        assert!(matches!(machine.start(), Err(WorkflowError::AlreadyStarted)));
    }

    #[test]
    fn test_wait_for_user_requires_resume() {
        let mut machine = started();
        let state = machine.advance(Some("plan written")).unwrap();
        assert_eq!(state.status, WorkflowStatus::Waiting);
        assert_eq!(state.step, "plan");
        assert_eq!(state.outputs["plan"], "plan written");

        assert!(matches!(
            machine.advance(None),
            Err(WorkflowError::InvalidTransition {
                status: WorkflowStatus::Waiting,
                ..
            })
        ));

        let state = machine.resume().unwrap();
        assert_eq!(state.status, WorkflowStatus::Running);
        assert_eq!(state.step, "impl");
        assert_eq!(state.step_type, StepType::Loop);
    }

    #[test]
    fn test_loop_takes_exactly_one_advance_per_task() {
        let mut machine = started();
        machine.advance(None).unwrap();
        machine.resume().unwrap();

        for (i, output) in ["did one", "did two"].iter().enumerate() {
            let state = machine.advance(Some(*output)).unwrap();
            assert_eq!(state.step, "impl", "still looping after task {i}");
            assert_eq!(state.tasks["impl"].current_task, i + 1);
        }

        let state = machine.advance(Some("did three")).unwrap();
        assert_eq!(state.step, "wrap");
        assert_eq!(state.tasks["impl"].current_task, 3);
        assert_eq!(state.tasks["impl"].outputs["two"], "did two");
        assert_eq!(state.tasks["impl"].outputs.len(), 3);
    }

    #[test]
    fn test_complete_is_terminal_and_advance_is_noop() {
        let mut machine = started();
        machine.advance(None).unwrap();
        machine.resume().unwrap();
        for _ in 0..3 {
            machine.advance(None).unwrap();
        }
        let done = machine.advance(Some("summary")).unwrap().clone();
        assert_eq!(done.status, WorkflowStatus::Complete);
        assert_eq!(done.step, "wrap");

        let again = machine.advance(Some("ignored")).unwrap();
        assert_eq!(again, &done);
        assert!(machine.current_directive().is_none());
        assert!(matches!(machine.set_summary("late"), Err(WorkflowError::Terminal)));
        assert!(matches!(machine.fail("late"), Err(WorkflowError::Terminal)));
        assert!(matches!(machine.resume(), Err(WorkflowError::Terminal)));
    }

    #[test]
    fn test_summary_independent_of_progress() {
        let mut machine = started();
        machine.set_summary("first").unwrap();
        machine.advance(None).unwrap();
        machine.resume().unwrap();
        machine.advance(None).unwrap();
        machine.set_summary("second").unwrap();
        machine.advance(None).unwrap();

        assert_eq!(machine.state().unwrap().summary.as_deref(), Some("second"));
    }

    #[test]
    fn test_fail_and_resume_retries_same_step() {
        let mut machine = started();
        machine.advance(None).unwrap();
        machine.resume().unwrap();
        machine.advance(None).unwrap();

        let state = machine.fail("tests are red").unwrap();
        assert_eq!(state.status, WorkflowStatus::Error);
        assert_eq!(state.error.as_deref(), Some("tests are red"));
        assert!(machine.advance(None).is_err());

        let state = machine.resume().unwrap();
        assert_eq!(state.status, WorkflowStatus::Running);
        assert_eq!(state.error, None);
        assert_eq!(state.step, "impl");
        assert_eq!(state.tasks["impl"].current_task, 1);
    }

    #[test]
    fn test_directive_for_loop_task() {
        let mut machine = started();
        let directive = machine.current_directive().unwrap();
        assert_eq!(directive.instructions, "plan it");
        assert!(directive.task.is_none());

        machine.advance(None).unwrap();
        machine.resume().unwrap();
        machine.advance(None).unwrap();

        let directive = machine.current_directive().unwrap();
        assert_eq!(directive.step_id, "impl");
        assert_eq!(directive.instructions, "second task");
        assert_eq!(directive.context.as_deref(), Some("follow PLAN.md"));
        assert_eq!(
            directive.task,
            Some(TaskPosition {
                id: "two".to_string(),
                index: 1,
                total: 3
            })
        );
        assert_eq!(directive.agent.as_deref(), Some("coder"));
        assert_eq!(directive.capabilities.unwrap().tools, ["Edit"]);
    }

    #[test]
    fn test_empty_loop_is_skipped() {
        let template = parse_toml(
            r#"
name = "skip"
loops = { nothing = [] }
[[steps]]
id = "nothing"
type = "loop"
[[steps]]
id = "after"
type = "action"
instructions = "go"
"#,
            "test",
        )
        .unwrap();
        let mut machine = WorkflowStateMachine::new(template);
        let state = machine.start().unwrap();
        assert_eq!(state.step, "after");
        assert_eq!(state.status, WorkflowStatus::Running);
    }

    #[test]
    fn test_snapshot_round_trip_and_restore() {
        let mut machine = started();
        machine.advance(Some("plan")).unwrap();
        machine.resume().unwrap();
        machine.advance(Some("one done")).unwrap();
        machine.set_summary("halfway").unwrap();

        let json = serde_json::to_string(machine.state().unwrap()).unwrap();
        let reloaded: WorkflowState = serde_json::from_str(&json).unwrap();
        assert_eq!(&reloaded, machine.state().unwrap());

        let mut restored = WorkflowStateMachine::restore(template(), reloaded).unwrap();
        assert_eq!(restored.state(), machine.state());

        let a = restored.advance(Some("two done")).unwrap().clone();
        let b = machine.advance(Some("two done")).unwrap().clone();
        assert_eq!(a, b);
    }

    #[test]
    fn test_restore_rejects_foreign_state() {
        let mut state = started().state().unwrap().clone();
        state.step = "deleted-step".to_string();
        assert!(matches!(
            WorkflowStateMachine::restore(template(), state.clone()),
            Err(WorkflowError::StateMismatch { .. })
        ));

        state.step = "plan".to_string();
        state.workflow = "other".to_string();
        assert!(matches!(
            WorkflowStateMachine::restore(template(), state),
            Err(WorkflowError::StateMismatch { .. })
        ));
    }
}
