//! Stable repository identifiers for shared-storage namespaces.

use sha2::{Digest, Sha256};
use std::path::Path;

const HASH_LEN: usize = 8;

/// Derive `<sanitized-basename>-<8 hex chars>` from a repository path.
///
/// The hash covers the lower-cased path with `\` normalized to `/` and
/// trailing separators removed, so `C:\Work\Repo` and `c:/work/repo/` map to
/// the same identifier while two repositories sharing a basename do not.
/// Total and deterministic; performs no I/O.
pub fn repo_identifier(repo_path: &Path) -> String {
    let raw = repo_path.to_string_lossy();
    let normalized = normalize_for_hash(&raw);

    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    let digest = format!("{:x}", hasher.finalize());

    format!("{}-{}", sanitized_basename(&raw), &digest[..HASH_LEN])
}

fn normalize_for_hash(raw: &str) -> String {
    let unified = raw.replace('\\', "/").to_lowercase();
    let trimmed = unified.trim_end_matches('/');
    if trimmed.is_empty() {
        unified
    } else {
        trimmed.to_string()
    }
}

/// Last path segment with every char outside `[A-Za-z0-9_-]` replaced by `_`.
fn sanitized_basename(raw: &str) -> String {
    let unified = raw.replace('\\', "/");
    let basename = unified
        .split('/')
        .rfind(|segment| !segment.is_empty())
        .unwrap_or("repo");

    basename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
