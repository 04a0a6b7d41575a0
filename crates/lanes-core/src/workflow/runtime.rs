//! Persistence around [`WorkflowStateMachine`].
//!
//! Each call loads the template and the session's snapshot, applies one
//! transition and writes the snapshot back atomically, so a crash loses at
//! most the transition in flight.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::errors::WorkflowError;
use super::loader;
use super::machine::{Directive, WorkflowStateMachine};
use super::state::WorkflowState;
use crate::config::StorageConfig;
use crate::sessions::persistence::{read_json_optional, remove_file_if_exists, write_json_atomic};
use crate::storage::{StorageContext, StorageOptions, resolve};

pub const WORKFLOW_STATE_FILE: &str = "workflow-state.json";

pub struct WorkflowRuntime<'a> {
    context: &'a StorageContext,
    options: StorageOptions<'a>,
}

impl<'a> WorkflowRuntime<'a> {
    pub fn new(context: &'a StorageContext, storage: &'a StorageConfig) -> Self {
        Self {
            context,
            options: StorageOptions::for_session_files(storage),
        }
    }

    pub fn state_path(&self, worktree: &Path) -> PathBuf {
        resolve(self.context, worktree, WORKFLOW_STATE_FILE, &self.options)
    }

    /// The persisted snapshot, `None` if missing or unreadable.
    pub fn load_state(&self, worktree: &Path) -> Option<WorkflowState> {
        read_json_optional(&self.state_path(worktree))
    }

    pub fn save_state(&self, worktree: &Path, state: &WorkflowState) -> Result<(), WorkflowError> {
        let path = self.state_path(worktree);
        write_json_atomic(&path, state).map_err(|source| WorkflowError::StateWrite { path, source })
    }

    /// Start `template_path` in the session at `worktree` and persist the
    /// first snapshot. Any previous snapshot is replaced.
    pub fn start(
        &self,
        worktree: &Path,
        template_path: &Path,
    ) -> Result<WorkflowStateMachine, WorkflowError> {
        let template = loader::load(template_path)?;
        let mut machine = WorkflowStateMachine::new(template);
        let state = machine.start()?.clone();
        self.save_state(worktree, &state)?;

        info!(
            event = "core.workflow.start_completed",
            worktree = %worktree.display(),
            workflow = %state.workflow,
            step = %state.step
        );
        Ok(machine)
    }

    /// Rebuild the machine for a session from its template and snapshot.
    /// `None` when the session has no usable snapshot.
    pub fn open(
        &self,
        worktree: &Path,
        template_path: &Path,
    ) -> Result<Option<WorkflowStateMachine>, WorkflowError> {
        let template = loader::load(template_path)?;
        match self.load_state(worktree) {
            Some(state) => WorkflowStateMachine::restore(template, state).map(Some),
            None => Ok(None),
        }
    }

    /// Apply one transition to a session's workflow and persist the result.
    pub fn apply<F>(
        &self,
        worktree: &Path,
        template_path: &Path,
        transition: F,
    ) -> Result<WorkflowState, WorkflowError>
    where
        F: FnOnce(&mut WorkflowStateMachine) -> Result<(), WorkflowError>,
    {
        let mut machine = self
            .open(worktree, template_path)?
            .ok_or(WorkflowError::NotStarted)?;

        if let Err(e) = transition(&mut machine) {
            warn!(
                event = "core.workflow.transition_failed",
                worktree = %worktree.display(),
                error = %e
            );
            return Err(e);
        }

        let state = machine.state().cloned().ok_or(WorkflowError::NotStarted)?;
        self.save_state(worktree, &state)?;
        info!(
            event = "core.workflow.transition_completed",
            worktree = %worktree.display(),
            status = %state.status,
            step = %state.step
        );
        Ok(state)
    }

    pub fn advance(
        &self,
        worktree: &Path,
        template_path: &Path,
        output: Option<&str>,
    ) -> Result<WorkflowState, WorkflowError> {
        self.apply(worktree, template_path, |m| m.advance(output).map(drop))
    }

    pub fn set_summary(
        &self,
        worktree: &Path,
        template_path: &Path,
        summary: &str,
    ) -> Result<WorkflowState, WorkflowError> {
        self.apply(worktree, template_path, |m| m.set_summary(summary).map(drop))
    }

    pub fn fail(
        &self,
        worktree: &Path,
        template_path: &Path,
        message: &str,
    ) -> Result<WorkflowState, WorkflowError> {
        self.apply(worktree, template_path, |m| m.fail(message).map(drop))
    }

    pub fn resume(
        &self,
        worktree: &Path,
        template_path: &Path,
    ) -> Result<WorkflowState, WorkflowError> {
        self.apply(worktree, template_path, |m| m.resume().map(drop))
    }

    /// The current directive for a session, `None` if nothing is running.
    pub fn directive(
        &self,
        worktree: &Path,
        template_path: &Path,
    ) -> Result<Option<Directive>, WorkflowError> {
        Ok(self
            .open(worktree, template_path)?
            .and_then(|machine| machine.current_directive()))
    }

    pub fn clear(&self, worktree: &Path) -> Result<(), WorkflowError> {
        let path = self.state_path(worktree);
        remove_file_if_exists(&path).map_err(|source| WorkflowError::StateWrite { path, source })
    }
}
