//! The git process-exec collaborator.
//!
//! Everything in the crate that touches git goes through [`GitRunner`]: run
//! `git <args>` in a directory and get stdout back, or an error carrying
//! stderr on a non-zero exit.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use super::errors::GitError;

pub trait GitRunner {
    /// Run `git <args>` in `cwd` with extra environment variables.
    fn run_with_env(
        &self,
        args: &[&str],
        cwd: &Path,
        env: &[(&str, &str)],
    ) -> Result<String, GitError>;

    /// Run `git <args>` in `cwd`.
    fn run(&self, args: &[&str], cwd: &Path) -> Result<String, GitError> {
        self.run_with_env(args, cwd, &[])
    }
}

/// Runs the `git` binary found on PATH.
#[derive(Debug, Clone, Copy, Default)]
pub struct CliGitRunner;

impl GitRunner for CliGitRunner {
    fn run_with_env(
        &self,
        args: &[&str],
        cwd: &Path,
        env: &[(&str, &str)],
    ) -> Result<String, GitError> {
        let joined = args.join(" ");
        debug!(
            event = "core.git.command_started",
            args = %joined,
            cwd = %cwd.display()
        );

        let output = Command::new("git")
            .current_dir(cwd)
            .args(args)
            .envs(env.iter().copied())
            .output()
            .map_err(|e| GitError::SpawnFailed {
                message: format!("{} (in {})", e, cwd.display()),
            })?;

        if output.status.success() {
            debug!(event = "core.git.command_completed", args = %joined);
            return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        debug!(
            event = "core.git.command_failed",
            args = %joined,
            code = ?output.status.code(),
            stderr = %stderr
        );
        Err(GitError::CommandFailed {
            args: joined,
            code: output.status.code(),
            stderr,
        })
    }
}

/// Validate a git argument to prevent injection.
///
/// Rejects empty values, values that start with `-` (option injection),
/// values with control characters, and `::` sequences.
pub fn validate_git_arg(value: &str, label: &str) -> Result<(), GitError> {
    let invalid = |reason: String| GitError::InvalidArgument {
        label: label.to_string(),
        reason,
    };

    if value.is_empty() {
        return Err(invalid("must not be empty".to_string()));
    }
    if value.starts_with('-') {
        return Err(invalid(format!("'{value}' must not start with '-'")));
    }
    if value.chars().any(|c| c.is_control()) {
        return Err(invalid("contains control characters".to_string()));
    }
    if value.contains("::") {
        return Err(invalid("'::' sequences are not allowed".to_string()));
    }
    Ok(())
}

/// Convert a path to a git argument, refusing non-UTF-8 and option-like paths.
pub fn path_arg(path: &Path) -> Result<&str, GitError> {
    let s = path.to_str().ok_or_else(|| GitError::InvalidPath {
        path: path.display().to_string(),
        message: "path is not valid UTF-8".to_string(),
    })?;
    if s.is_empty() || s.starts_with('-') {
        return Err(GitError::InvalidPath {
            path: s.to_string(),
            message: "path must be non-empty and must not start with '-'".to_string(),
        });
    }
    Ok(s)
}
