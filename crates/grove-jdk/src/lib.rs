//! Locating the Java runtime that runs the Groovy language server.

mod discovery;
mod version;

pub use discovery::{discover_java_home, expand_home, JavaHomeSource};
pub use version::{parse_major_version, probe_java_version, MIN_JAVA_VERSION};

use std::path::{Path, PathBuf};

use grove_core::platform_executable;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JdkDiscoveryError {
    #[error("{source_name} points to a missing folder ({})", path.display())]
    MissingHome { source_name: String, path: PathBuf },

    #[error("{source_name} does not point to a JDK ({} has no bin/javac)", path.display())]
    NotAJdk { source_name: String, path: PathBuf },

    #[error("Java runtime could not be located (tried java.home, JDK_HOME, JAVA_HOME and `java` on PATH)")]
    NotFound,

    #[error("failed to run `{}`: {source}", java.display())]
    VersionProbe {
        java: PathBuf,
        source: std::io::Error,
    },

    #[error("Java 8 or more recent is required to run (found {found})")]
    UnsupportedVersion { found: u32 },
}

/// A usable Java installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaRuntime {
    pub home: PathBuf,
    pub major_version: u32,
    pub source: JavaHomeSource,
}

impl JavaRuntime {
    /// Discover a Java home and check that it is recent enough.
    pub fn resolve(configured_home: Option<&Path>) -> Result<Self, JdkDiscoveryError> {
        let (home, source) = discover_java_home(configured_home)?;
        let major_version = probe_java_version(&home)?;
        if major_version < MIN_JAVA_VERSION {
            return Err(JdkDiscoveryError::UnsupportedVersion {
                found: major_version,
            });
        }

        tracing::info!(
            target: "grove.jdk",
            home = %home.display(),
            version = major_version,
            source = %source,
            "using Java runtime"
        );
        Ok(Self {
            home,
            major_version,
            source,
        })
    }

    /// `<home>/bin/java[.exe]`
    pub fn java_executable(&self) -> PathBuf {
        java_executable(&self.home)
    }
}

pub(crate) fn java_executable(home: &Path) -> PathBuf {
    home.join("bin").join(platform_executable("java", ".exe"))
}

pub(crate) fn javac_executable(home: &Path) -> PathBuf {
    home.join("bin").join(platform_executable("javac", ".exe"))
}
