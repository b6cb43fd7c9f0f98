//! Build tool integration (Maven/Gradle) for Groovy classpaths.
//!
//! The Groovy language server only knows about the jars it is told about.
//! This crate finds the build descriptor that owns a source file, asks the
//! matching build tool for the dependency classpath, keeps the answer in a
//! single file per workspace storage location, and merges it with the
//! user's configured libraries.
//!
//! Nothing here fails loudly: every problem degrades to "user libraries
//! only", with the cause reported through [`BuildClasspathOutcome`] and a
//! [`Notifier`].

mod cache;
mod classpath;
mod command;
mod descriptor;
mod fs_cleanup;
mod gradle;
mod invoke;
mod maven;
mod notify;
mod resolver;
mod storage;
mod tool;

pub use cache::{CacheError, ClasspathCache, CLASSPATH_FILE_NAME};
pub use classpath::{assemble_classpath, sort_build_entries};
pub use command::{CommandOutput, CommandRunner, DefaultCommandRunner};
pub use descriptor::{locate_build_descriptor, GRADLE_DESCRIPTOR, MAVEN_DESCRIPTOR};
pub use gradle::GradleConfig;
pub use invoke::{invoke_build_tool, SUCCESS_MARKER};
pub use maven::MavenConfig;
pub use notify::{Notifier, TracingNotifier};
pub use resolver::{ClasspathResolver, ResolvedClasspath, ResolverConfig};
pub use storage::workspace_storage_dir;
pub use tool::{build_classpath_command, select_build_tool, ClasspathRequest};

pub use grove_process::CommandSpec;

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("{tool} is not available: {reason}")]
    ToolUnavailable {
        tool: BuildSystemKind,
        reason: String,
    },

    #[error("{tool} command `{command}` failed: {reason}")]
    CommandFailed {
        tool: BuildSystemKind,
        command: CommandSpec,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, BuildError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildSystemKind {
    Maven,
    Gradle,
}

impl fmt::Display for BuildSystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BuildSystemKind::Maven => "maven",
            BuildSystemKind::Gradle => "gradle",
        })
    }
}

/// The build file that owns a source file.
///
/// Found fresh on every resolution; never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildDescriptor {
    pub path: PathBuf,
    pub kind: BuildSystemKind,
}

impl BuildDescriptor {
    /// Directory the build tool is run from.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Short project name for status messages (the descriptor's directory name).
    pub fn project_name(&self) -> String {
        self.dir()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.dir().display().to_string())
    }
}

/// What happened while computing the build-derived part of a classpath.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildClasspathOutcome {
    /// No Maven or Gradle descriptor in the ancestry of the source file.
    NoDescriptor,
    /// A descriptor was found but its tool could not be run.
    ToolNotFound { tool: BuildSystemKind },
    /// The tool ran (or tried to) without printing the success marker.
    InvocationFailed {
        tool: BuildSystemKind,
        command: String,
        reason: String,
    },
    /// The tool reported success but the classpath file was missing or empty.
    EmptyOutput { tool: BuildSystemKind },
    /// Sorted build classpath entries.
    Resolved(Vec<String>),
}

impl BuildClasspathOutcome {
    /// Build entries contributed to the final classpath (empty unless resolved).
    pub fn entries(&self) -> &[String] {
        match self {
            BuildClasspathOutcome::Resolved(entries) => entries,
            _ => &[],
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, BuildClasspathOutcome::Resolved(_))
    }
}
