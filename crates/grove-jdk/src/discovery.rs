use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::{javac_executable, JdkDiscoveryError};

/// Where a Java home came from; used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JavaHomeSource {
    Config,
    JdkHomeEnv,
    JavaHomeEnv,
    Path,
}

impl fmt::Display for JavaHomeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JavaHomeSource::Config => "The groovy.java.home setting",
            JavaHomeSource::JdkHomeEnv => "The JDK_HOME environment variable",
            JavaHomeSource::JavaHomeEnv => "The JAVA_HOME environment variable",
            JavaHomeSource::Path => "`java` on PATH",
        })
    }
}

/// Discover a Java home.
///
/// Order: the configured home, `JDK_HOME`, `JAVA_HOME`, then `java` on
/// `PATH`. An explicit home (config or environment) must exist and contain
/// `bin/javac`; the first explicit one wins even when it is broken, so a
/// typo in the settings is reported instead of silently ignored.
pub fn discover_java_home(
    configured: Option<&Path>,
) -> Result<(PathBuf, JavaHomeSource), JdkDiscoveryError> {
    discover_with(configured, |key| std::env::var_os(key), find_java_on_path)
}

pub(crate) fn discover_with(
    configured: Option<&Path>,
    env: impl Fn(&str) -> Option<OsString>,
    on_path: impl FnOnce() -> Option<PathBuf>,
) -> Result<(PathBuf, JavaHomeSource), JdkDiscoveryError> {
    let explicit = configured
        .map(|path| (path.to_path_buf(), JavaHomeSource::Config))
        .or_else(|| {
            env("JDK_HOME")
                .filter(|value| !value.is_empty())
                .map(|value| (PathBuf::from(value), JavaHomeSource::JdkHomeEnv))
        })
        .or_else(|| {
            env("JAVA_HOME")
                .filter(|value| !value.is_empty())
                .map(|value| (PathBuf::from(value), JavaHomeSource::JavaHomeEnv))
        });

    if let Some((raw, source)) = explicit {
        let home = resolve_symlink(expand_home(&raw));
        if !home.is_dir() {
            return Err(JdkDiscoveryError::MissingHome {
                source_name: source.to_string(),
                path: home,
            });
        }
        if !javac_executable(&home).is_file() {
            return Err(JdkDiscoveryError::NotAJdk {
                source_name: source.to_string(),
                path: home,
            });
        }
        return Ok((home, source));
    }

    // `java` found on PATH may be a JRE; only `bin/java` is required.
    let java_bin = on_path().ok_or(JdkDiscoveryError::NotFound)?;
    let java_bin = dunce::canonicalize(&java_bin).unwrap_or(java_bin);
    let home = java_bin
        .parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .ok_or(JdkDiscoveryError::NotFound)?;
    Ok((home, JavaHomeSource::Path))
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

fn resolve_symlink(path: PathBuf) -> PathBuf {
    let is_symlink = std::fs::symlink_metadata(&path)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false);
    if is_symlink {
        dunce::canonicalize(&path).unwrap_or(path)
    } else {
        path
    }
}

fn find_java_on_path() -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    let exe_name = grove_core::platform_executable("java", ".exe");

    std::env::split_paths(&path_var)
        .map(|dir| dir.join(&exe_name))
        .find(|candidate| candidate.is_file())
}
