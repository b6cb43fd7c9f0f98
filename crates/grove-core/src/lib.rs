//! Core shared helpers for grove.
//!
//! This crate is intentionally small and dependency-free.

mod fs;

pub use fs::{find_up, find_up_any};

use std::path::Path;

/// Display name used in user-facing status messages.
pub const PLUGIN_NAME: &str = "Groovy Language Server";

/// Separator between classpath entries on the host platform.
///
/// The same value is handed to the build tool when it writes the classpath
/// file and used again when that file is split, so the two must never
/// diverge.
pub const PATH_SEPARATOR: char = if cfg!(windows) { ';' } else { ':' };

/// Returns `stem` with the platform specific `windows_suffix` appended on Windows.
///
/// ```
/// let name = grove_core::platform_executable("mvn", ".cmd");
/// assert!(name == "mvn" || name == "mvn.cmd");
/// ```
pub fn platform_executable(stem: &str, windows_suffix: &str) -> String {
    if cfg!(windows) {
        format!("{stem}{windows_suffix}")
    } else {
        stem.to_string()
    }
}

/// Whether `path` names a Groovy source file.
pub fn is_groovy_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "groovy")
}

/// Split a separator-delimited classpath string into its entries.
///
/// Surrounding whitespace (including the trailing newline some tools emit) is
/// trimmed and empty segments are dropped, so `""` yields no entries rather
/// than a single empty path.
pub fn split_classpath(value: &str) -> Vec<String> {
    value
        .split(PATH_SEPARATOR)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}
