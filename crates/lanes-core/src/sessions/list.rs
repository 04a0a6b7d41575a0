use std::fs;
use std::io;

use tracing::{debug, info};

use crate::agents;
use crate::sessions::env::SessionEnv;
use crate::sessions::errors::SessionError;
use crate::sessions::types::SessionSummary;

/// One summary per directory in the worktrees folder, sorted by name.
///
/// The worktree directory is what makes a session exist; the status and
/// workflow fields are read leniently and may be `None`. Hidden directories
/// are skipped.
pub fn list_sessions(env: &SessionEnv<'_>) -> Result<Vec<SessionSummary>, SessionError> {
    let worktrees_dir = env.worktrees_dir();
    let entries = match fs::read_dir(&worktrees_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(
                event = "core.session.list_no_worktrees_dir",
                path = %worktrees_dir.display()
            );
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let mut sessions = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || !path.is_dir() {
            continue;
        }

        let agent = env.detect_agent(&path);
        let service = env.service(agent.unwrap_or_else(agents::default_agent));
        let data = service.get_session_data(&path);

        sessions.push(SessionSummary {
            agent: agent.map(|a| a.name().to_string()),
            status: service.get_status(&path).map(|r| r.status),
            workflow_status: service.get_workflow_status(&path),
            summary: data.and_then(|d| d.summary),
            name,
            worktree_path: path,
        });
    }

    sessions.sort_by(|a, b| a.name.cmp(&b.name));
    info!(event = "core.session.list_completed", count = sessions.len());
    Ok(sessions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LanesConfig;
    use crate::git::CliGitRunner;
    use crate::git::test_support::init_repo;
    use crate::sessions::create::create_session;
    use crate::sessions::types::{CreateSessionRequest, SessionStatus, StatusRecord};
    use crate::storage::StorageContext;
    use tempfile::TempDir;

    #[test]
    fn test_list_sessions_reports_advisory_state() {
        let dir = TempDir::new().unwrap();
        let repo = dir.path().join("repo");
        init_repo(&repo);
        let config = LanesConfig::default();
        let context = StorageContext::new(dir.path().join("storage"), &repo);
        let env = SessionEnv::new(&CliGitRunner, &repo, &config, &context);

        assert!(list_sessions(&env).unwrap().is_empty());

        let b = create_session(&env, &CreateSessionRequest::new("b-codex").with_agent("codex"))
            .unwrap();
        create_session(&env, &CreateSessionRequest::new("a-claude")).unwrap();
        fs::create_dir_all(env.worktrees_dir().join("c-manual")).unwrap();
        fs::create_dir_all(env.worktrees_dir().join(".a-claude.lanes-repair-1")).unwrap();

        let codex = env.service(agents::get_agent("codex").unwrap());
        codex
            .save_status(&b.worktree_path, &StatusRecord::now(SessionStatus::WaitingForUser))
            .unwrap();
        codex.save_summary(&b.worktree_path, "needs review").unwrap();

        let sessions = list_sessions(&env).unwrap();
        let names: Vec<_> = sessions.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["a-claude", "b-codex", "c-manual"]);

        assert_eq!(sessions[0].agent.as_deref(), Some("claude"));
        assert_eq!(sessions[0].status, None);

        assert_eq!(sessions[1].agent.as_deref(), Some("codex"));
        assert_eq!(sessions[1].status, Some(SessionStatus::WaitingForUser));
        assert_eq!(sessions[1].summary.as_deref(), Some("needs review"));

        assert_eq!(sessions[2].agent, None);
        assert_eq!(sessions[2].workflow_status, None);
    }
}
