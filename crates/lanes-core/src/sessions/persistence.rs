//! Session file persistence
//!
//! Reads are lenient: a missing, unreadable or malformed file is "absent".
//! Writes go to a temp file in the target directory and are renamed into
//! place, so a reader never sees a half-written record.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Atomically replace `path` with `contents`, creating parent directories.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(contents)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| {
        warn!(
            event = "core.session.atomic_write_failed",
            path = %path.display(),
            error = %e.error,
        );
        e.error
    })?;

    debug!(event = "core.session.file_written", path = %path.display());
    Ok(())
}

/// Serialize `value` as pretty JSON and write it atomically.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| {
        tracing::error!(
            event = "core.session.serialization_failed",
            path = %path.display(),
            error = %e,
        );
        io::Error::new(io::ErrorKind::InvalidData, e)
    })?;
    write_atomic(path, json.as_bytes())
}

/// Read a file to a string. `None` when it does not exist or cannot be read.
pub fn read_text_optional(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => {
            warn!(
                event = "core.session.read_failed",
                path = %path.display(),
                error = %e,
            );
            None
        }
    }
}

/// Read and parse a JSON file. Missing and malformed files are both `None`.
pub fn read_json_optional<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let content = read_text_optional(path)?;
    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(
                event = "core.session.invalid_json",
                path = %path.display(),
                error = %e,
            );
            None
        }
    }
}

/// Remove a file, treating "already gone" as success.
pub fn remove_file_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
