//! Helpers shared by the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use lanes_core::{Config, LanesConfig, StorageContext};
use tempfile::TempDir;

pub struct TestRepo {
    pub dir: TempDir,
    pub repo: PathBuf,
    pub runtime: Config,
}

impl TestRepo {
    /// A repository on `main` with one commit, plus an isolated lanes home.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let repo = dir.path().join("repo");
        fs::create_dir_all(&repo).expect("Failed to create repo dir");

        git(&repo, &["init", "-q"]);
        git(&repo, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        fs::write(repo.join("README.md"), "# demo\n").expect("Failed to write README");
        git(&repo, &["add", "README.md"]);
        git(
            &repo,
            &[
                "-c",
                "user.name=Lanes Test",
                "-c",
                "user.email=test@lanes.dev",
                "-c",
                "commit.gpgsign=false",
                "commit",
                "-q",
                "-m",
                "Initial commit",
            ],
        );

        let runtime = Config {
            lanes_dir: dir.path().join("lanes-home"),
            log_level: "info".to_string(),
        };
        Self { dir, repo, runtime }
    }

    pub fn write_project_config(&self, content: &str) {
        let config_dir = self.repo.join(".lanes");
        fs::create_dir_all(&config_dir).expect("Failed to create .lanes dir");
        fs::write(config_dir.join("config.toml"), content).expect("Failed to write config");
    }

    pub fn load_config(&self) -> LanesConfig {
        LanesConfig::load_hierarchy(&self.runtime, &self.repo).expect("Failed to load config")
    }

    pub fn context(&self, config: &LanesConfig) -> StorageContext {
        StorageContext::from_config(config, &self.runtime, &self.repo)
    }
}

pub fn git(cwd: &Path, args: &[&str]) {
    let status = Command::new("git")
        .current_dir(cwd)
        .args(args)
        .status()
        .expect("Failed to run git");
    assert!(status.success(), "git {:?} failed", args);
}

/// Simulate a container rebuild: the worktree's admin entry disappears.
pub fn break_worktree(repo: &Path, name: &str) {
    fs::remove_dir_all(repo.join(".git").join("worktrees").join(name))
        .expect("Failed to remove worktree admin dir");
}
