use std::fs;

use tracing::{info, warn};

use crate::agents::{AgentType, get_agent_by_type};
use crate::git::{delete_branch, prune_worktrees, remove_worktree};
use crate::sessions::env::SessionEnv;
use crate::sessions::errors::SessionError;
use crate::sessions::persistence::remove_file_if_exists;
use crate::sessions::types::DestroyOptions;
use crate::storage::is_safe_session_name;

/// Remove a session: its files, its worktree, its shared-storage namespace
/// and, when asked, its branch.
///
/// A worktree git no longer knows about (broken link) is removed from disk
/// directly. Any directory `list_sessions` reports can be destroyed, so the
/// name is only checked for path safety, not against the creation rules.
pub fn destroy_session(
    env: &SessionEnv<'_>,
    name: &str,
    options: DestroyOptions,
) -> Result<(), SessionError> {
    if !is_safe_session_name(name) || name.starts_with('.') {
        return Err(SessionError::InvalidName {
            name: name.to_string(),
            reason: "cannot be used as a path component".to_string(),
        });
    }
    let name = name.to_string();
    let worktree_path = env.worktree_path(&name);

    info!(
        event = "core.session.destroy_started",
        name = %name,
        worktree = %worktree_path.display(),
        delete_branch = options.delete_branch
    );

    if !worktree_path.exists() {
        return Err(SessionError::NotFound { name });
    }

    for agent_type in AgentType::all() {
        if let Some(agent) = get_agent_by_type(*agent_type) {
            env.service(agent).clear_session_data(&worktree_path)?;
        }
    }

    let service = env.service(crate::agents::default_agent());
    if let Some(prompt) = service.prompt_path(env.repo_root, &name) {
        remove_file_if_exists(&prompt)?;
    }

    if let Err(e) = remove_worktree(env.runner, env.repo_root, &worktree_path, true) {
        warn!(
            event = "core.session.worktree_remove_fallback",
            worktree = %worktree_path.display(),
            error = %e
        );
        if worktree_path.exists() {
            fs::remove_dir_all(&worktree_path)?;
        }
    }

    if let Err(e) = prune_worktrees(env.runner, env.repo_root) {
        warn!(event = "core.session.prune_failed", error = %e);
    }

    if let Some(namespace) = env.context.session_namespace(&name)
        && namespace.is_dir()
    {
        fs::remove_dir_all(&namespace)?;
    }

    if options.delete_branch {
        delete_branch(env.runner, env.repo_root, &name, true)?;
    }

    info!(event = "core.session.destroy_completed", name = %name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LanesConfig;
    use crate::git::test_support::init_repo;
    use crate::git::{CliGitRunner, branch_exists};
    use crate::sessions::create::create_session;
    use crate::sessions::types::CreateSessionRequest;
    use crate::storage::StorageContext;
    use tempfile::TempDir;

    #[test]
    fn test_destroy_session_removes_everything() {
        let dir = TempDir::new().unwrap();
        let repo = dir.path().join("repo");
        init_repo(&repo);
        let config = LanesConfig::default();
        let context = StorageContext::new(dir.path().join("storage"), &repo);
        let env = SessionEnv::new(&CliGitRunner, &repo, &config, &context);

        let info = create_session(&env, &CreateSessionRequest::new("gone").with_prompt("hi"))
            .unwrap();
        let namespace = context.session_namespace("gone").unwrap();
        assert!(namespace.is_dir());

        destroy_session(&env, "gone", DestroyOptions { delete_branch: true }).unwrap();

        assert!(!info.worktree_path.exists());
        assert!(!namespace.exists());
        assert!(!branch_exists(&CliGitRunner, &repo, "gone").unwrap());
        assert!(
            env.service(crate::agents::default_agent())
                .get_prompt(&repo, "gone")
                .is_none()
        );
    }

    #[test]
    fn test_destroy_keeps_branch_by_default() {
        let dir = TempDir::new().unwrap();
        let repo = dir.path().join("repo");
        init_repo(&repo);
        let config = LanesConfig::default();
        let context = StorageContext::new(dir.path().join("storage"), &repo);
        let env = SessionEnv::new(&CliGitRunner, &repo, &config, &context);

        create_session(&env, &CreateSessionRequest::new("keep")).unwrap();
        destroy_session(&env, "keep", DestroyOptions::default()).unwrap();

        assert!(branch_exists(&CliGitRunner, &repo, "keep").unwrap());
        assert!(matches!(
            destroy_session(&env, "keep", DestroyOptions::default()),
            Err(SessionError::NotFound { .. })
        ));
    }

    #[test]
    fn test_destroy_broken_worktree_falls_back_to_directory_removal() {
        let dir = TempDir::new().unwrap();
        let repo = dir.path().join("repo");
        init_repo(&repo);
        let config = LanesConfig::default();
        let context = StorageContext::new(dir.path().join("storage"), &repo);
        let env = SessionEnv::new(&CliGitRunner, &repo, &config, &context);

        let info = create_session(&env, &CreateSessionRequest::new("broken")).unwrap();
        fs::remove_dir_all(repo.join(".git").join("worktrees").join("broken")).unwrap();

        destroy_session(&env, "broken", DestroyOptions { delete_branch: true }).unwrap();
        assert!(!info.worktree_path.exists());
        assert!(!branch_exists(&CliGitRunner, &repo, "broken").unwrap());
    }

    #[test]
    fn test_destroy_accepts_any_listed_directory_name() {
        let dir = TempDir::new().unwrap();
        let repo = dir.path().join("repo");
        init_repo(&repo);
        let config = LanesConfig::default();
        let context = StorageContext::new(dir.path().join("storage"), &repo);
        let env = SessionEnv::new(&CliGitRunner, &repo, &config, &context);

        let hand_made = env.worktrees_dir().join("hand made");
        fs::create_dir_all(&hand_made).unwrap();
        fs::write(hand_made.join("notes.txt"), "x").unwrap();
        let listed = crate::sessions::list::list_sessions(&env).unwrap();
        assert!(listed.iter().any(|s| s.name == "hand made"));

        destroy_session(&env, "hand made", DestroyOptions::default()).unwrap();
        assert!(!hand_made.exists());
    }

    #[test]
    fn test_destroy_refuses_path_like_names() {
        let dir = TempDir::new().unwrap();
        let repo = dir.path().join("repo");
        init_repo(&repo);
        let config = LanesConfig::default();
        let context = StorageContext::new(dir.path().join("storage"), &repo);
        let env = SessionEnv::new(&CliGitRunner, &repo, &config, &context);
        fs::create_dir_all(env.worktrees_dir()).unwrap();

        for name in ["", "../repo", "a/b", ".", ".hidden"] {
            assert!(
                matches!(
                    destroy_session(&env, name, DestroyOptions::default()),
                    Err(SessionError::InvalidName { .. })
                ),
                "{name:?} should be refused"
            );
        }
        assert!(repo.join(".git").is_dir());
        assert!(env.worktrees_dir().is_dir());
    }
}
