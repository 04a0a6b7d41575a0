use std::io;
use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::agents::{self, LaunchOptions};
use crate::git::{add_worktree, add_worktree_new_branch, branch_exists};
use crate::sessions::env::SessionEnv;
use crate::sessions::errors::SessionError;
use crate::sessions::types::{CreateSessionRequest, SessionData, SessionInfo};
use crate::sessions::validation::validate_session_name;
use crate::workflow::{self, WorkflowRuntime};

/// Materialize a session: worktree, session record, prompt and workflow.
///
/// The workflow template is loaded and validated before anything touches
/// the repository. Steps after the worktree exists are not rolled back on
/// failure; the session can be destroyed and created again.
pub fn create_session(
    env: &SessionEnv<'_>,
    request: &CreateSessionRequest,
) -> Result<SessionInfo, SessionError> {
    let name = validate_session_name(&request.name)?;
    let agent_name = request
        .agent
        .as_deref()
        .unwrap_or(env.config.agent.default_agent());
    let agent = agents::require_agent(agent_name)?;
    let permission_mode = request
        .permission_mode
        .unwrap_or(env.config.agent.permission_mode());

    info!(
        event = "core.session.create_started",
        name = %name,
        agent = agent.name(),
        workflow = ?request.workflow
    );

    let template_path = match &request.workflow {
        Some(requested) => {
            let path = resolve_template_path(env, requested)?;
            workflow::load(&path)?;
            Some(path)
        }
        None => None,
    };

    let worktree_path = env.worktree_path(&name);
    if worktree_path.exists() {
        return Err(SessionError::AlreadyExists { name });
    }

    if branch_exists(env.runner, env.repo_root, &name)? {
        add_worktree(env.runner, env.repo_root, &worktree_path, &name)?;
    } else {
        add_worktree_new_branch(
            env.runner,
            env.repo_root,
            &worktree_path,
            &name,
            env.config.worktrees.base_branch.as_deref(),
        )?;
    }

    let service = env.service(agent);
    let record = SessionData {
        agent_name: Some(agent.name().to_string()),
        session_id: None,
        timestamp: Some(chrono::Utc::now().to_rfc3339()),
        permission_mode: Some(permission_mode),
        terminal_mode: Some(env.config.agent.terminal_mode()),
        workflow: template_path.clone(),
        summary: None,
    };
    service
        .save_session_data(&worktree_path, &record)
        .inspect_err(|e| log_partial_failure(&name, &worktree_path, e))?;

    let prompt = request.prompt.as_deref().filter(|p| !p.trim().is_empty());
    if let Some(prompt) = prompt {
        service
            .save_prompt(env.repo_root, &name, prompt)
            .inspect_err(|e| log_partial_failure(&name, &worktree_path, e))?;
    }

    let workflow_status = match &template_path {
        Some(template) => {
            let runtime = WorkflowRuntime::new(env.context, &env.config.storage);
            let machine = runtime
                .start(&worktree_path, template)
                .map_err(SessionError::from)
                .inspect_err(|e| log_partial_failure(&name, &worktree_path, e))?;
            machine.state().map(|s| s.status)
        }
        None => None,
    };

    let start_command = agent.build_start_command(&LaunchOptions {
        permission_mode,
        settings_path: None,
        prompt,
    });

    info!(
        event = "core.session.create_completed",
        name = %name,
        worktree = %worktree_path.display(),
        agent = agent.name()
    );

    Ok(SessionInfo {
        branch: name.clone(),
        name,
        worktree_path,
        agent: agent.name().to_string(),
        start_command,
        workflow_status,
    })
}

fn log_partial_failure(name: &str, worktree: &Path, e: &SessionError) {
    error!(
        event = "core.session.create_failed",
        name = name,
        worktree = %worktree.display(),
        stage = "after_worktree",
        error = %e
    );
}

/// Find a template given as an absolute path, a repository-relative path,
/// or a name inside the configured templates directory (extension optional).
/// The result is absolute even when the repository root is not.
fn resolve_template_path(env: &SessionEnv<'_>, requested: &Path) -> io::Result<PathBuf> {
    if requested.is_absolute() {
        return Ok(requested.to_path_buf());
    }

    let direct = env.repo_root.join(requested);
    if direct.is_file() {
        return std::path::absolute(direct);
    }

    let templates_dir = env.repo_root.join(env.config.workflow.templates_dir());
    let named = templates_dir.join(requested);
    let mut candidates = vec![named.clone()];
    if named.extension().is_none() {
        candidates.push(named.with_extension("toml"));
        candidates.push(named.with_extension("json"));
    }

    let found = candidates
        .into_iter()
        .find(|p| p.is_file())
        .unwrap_or(direct);
    std::path::absolute(found)
}
