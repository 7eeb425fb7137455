// ABOUTME: Utility functions for the reveal-deck application
// ABOUTME: Provides path validation and executable lookup helpers

use crate::errors::{DeckError, Result};
use log::debug;
use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Validate that a directory exists
pub fn validate_directory_exists(path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(DeckError::PathNotFound(path.to_path_buf()));
    }
    Ok(())
}

/// Get the absolute path
pub fn get_absolute_path(path: &Path) -> Result<PathBuf> {
    std::fs::canonicalize(path).map_err(|e| {
        DeckError::ConfigError(format!("Failed to get absolute path for {:?}: {}", path, e))
    })
}

/// Resolve an executable on the current `PATH`
pub fn find_executable(name: &str) -> Option<PathBuf> {
    find_executable_in(name, env::var_os("PATH").as_deref())
}

/// Resolve an executable against an explicit search path.
///
/// A name that already contains a path separator is checked as-is, the way a
/// shell would treat `./tool` or `/usr/bin/tool`.
pub fn find_executable_in(name: &str, search_path: Option<&OsStr>) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }

    let as_path = Path::new(name);
    if as_path.components().count() > 1 {
        return is_executable(as_path).then(|| as_path.to_path_buf());
    }

    let search_path = search_path?;
    for dir in env::split_paths(search_path) {
        // An empty PATH entry means the current directory
        let dir = if dir.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            dir
        };

        for candidate in candidate_names(name) {
            let full = dir.join(&candidate);
            if is_executable(&full) {
                debug!("Resolved {} to {:?}", name, full);
                return Some(full);
            }
        }
    }

    None
}

#[cfg(windows)]
fn candidate_names(name: &str) -> Vec<String> {
    let mut names = vec![name.to_string()];
    if Path::new(name).extension().is_none() {
        for ext in ["exe", "cmd", "bat"] {
            names.push(format!("{}.{}", name, ext));
        }
    }
    names
}

#[cfg(not(windows))]
fn candidate_names(name: &str) -> Vec<String> {
    vec![name.to_string()]
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    match std::fs::metadata(path) {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
