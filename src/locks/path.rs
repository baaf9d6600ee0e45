//! Lock-file naming.

use std::path::{Path, PathBuf};

/// Suffix that marks a path as a lock file.
pub const LOCK_SUFFIX: &str = ".lock";

/// Derive the lock-file path for a resource.
///
/// A path that already ends in `.lock` is used verbatim, so independent callers
/// naming either the resource or its lock file end up on the same marker.
/// Anything else gets the suffix appended (`data.txt` -> `data.txt.lock`).
pub fn lock_path_for(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.as_os_str().to_string_lossy().ends_with(LOCK_SUFFIX) {
        return path.to_path_buf();
    }

    let mut raw = path.as_os_str().to_os_string();
    raw.push(LOCK_SUFFIX);
    PathBuf::from(raw)
}
