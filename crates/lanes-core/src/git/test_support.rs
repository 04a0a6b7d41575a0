//! Shared helpers for tests that need a repository or a scripted git.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::process::Command;

use super::errors::GitError;
use super::runner::GitRunner;

/// Initialize a git repository on `main` with one empty commit.
pub fn init_repo(path: &Path) {
    fs::create_dir_all(path).expect("Failed to create repo dir");
    git(path, &["init", "-q"]);
    git(path, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    git(
        path,
        &[
            "-c",
            "user.name=Lanes Test",
            "-c",
            "user.email=test@lanes.dev",
            "-c",
            "commit.gpgsign=false",
            "commit",
            "-q",
            "--allow-empty",
            "-m",
            "Initial commit",
        ],
    );
}

fn git(cwd: &Path, args: &[&str]) {
    let status = Command::new("git")
        .current_dir(cwd)
        .args(args)
        .status()
        .expect("Failed to run git");
    assert!(status.success(), "git {args:?} failed");
}

/// A [`GitRunner`] that records every invocation and replays scripted
/// results in order. Once the script runs out every call succeeds with
/// empty output.
#[derive(Default)]
pub struct FakeGitRunner {
    pub calls: RefCell<Vec<Vec<String>>>,
    responses: RefCell<VecDeque<Result<String, GitError>>>,
}

impl FakeGitRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, stdout: &str) -> &Self {
        self.responses.borrow_mut().push_back(Ok(stdout.to_string()));
        self
    }

    pub fn push_err(&self, code: i32, stderr: &str) -> &Self {
        self.responses
            .borrow_mut()
            .push_back(Err(GitError::CommandFailed {
                args: String::new(),
                code: Some(code),
                stderr: stderr.to_string(),
            }));
        self
    }

    /// Recorded invocations, each rendered as `git`-less argv joined by spaces.
    pub fn call_lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|argv| argv.join(" ")).collect()
    }
}

impl GitRunner for FakeGitRunner {
    fn run_with_env(
        &self,
        args: &[&str],
        _cwd: &Path,
        _env: &[(&str, &str)],
    ) -> Result<String, GitError> {
        self.calls
            .borrow_mut()
            .push(args.iter().map(|a| a.to_string()).collect());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }
}
