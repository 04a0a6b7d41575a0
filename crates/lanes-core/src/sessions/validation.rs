//! Session input validation
//!
//! Validates session names and the identifiers read back from agent files.

use crate::sessions::errors::SessionError;

/// Whether `value` is a non-empty `[A-Za-z0-9_-]` identifier.
///
/// Agent session ids pass through here before they are interpolated into a
/// resume command, so anything else is treated as absent.
pub fn is_safe_identifier(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Validate a session name and return it trimmed.
///
/// The name doubles as the worktree directory and the branch name, so it is
/// limited to `[A-Za-z0-9_.-]`, may not start with `-` or `.`, and may not
/// contain `..`.
pub fn validate_session_name(name: &str) -> Result<String, SessionError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(SessionError::InvalidName {
            name: name.to_string(),
            reason: "cannot be empty".to_string(),
        });
    }

    if let Some(bad) = trimmed
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
    {
        return Err(SessionError::InvalidName {
            name: trimmed.to_string(),
            reason: format!("character '{bad}' is not allowed"),
        });
    }

    if trimmed.starts_with('-') || trimmed.starts_with('.') {
        return Err(SessionError::InvalidName {
            name: trimmed.to_string(),
            reason: "must not start with '-' or '.'".to_string(),
        });
    }

    if trimmed.contains("..") || trimmed.ends_with(".lock") || trimmed.ends_with('.') {
        return Err(SessionError::InvalidName {
            name: trimmed.to_string(),
            reason: "not a valid git branch name".to_string(),
        });
    }

    Ok(trimmed.to_string())
}
