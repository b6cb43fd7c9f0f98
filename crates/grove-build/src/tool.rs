use std::path::{Path, PathBuf};

use grove_core::PATH_SEPARATOR;
use grove_process::CommandSpec;

use crate::{BuildDescriptor, BuildSystemKind, CommandRunner, GradleConfig, MavenConfig, Result};

/// What the build tool is asked to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClasspathRequest {
    /// Separator between entries in the output file. Must match the one used
    /// to read the file back.
    pub separator: char,
    /// Absolute path of the classpath file.
    pub output_file: PathBuf,
    /// Ask the tool to rewrite the file even if it considers it current.
    pub regenerate: bool,
}

impl ClasspathRequest {
    pub fn new(output_file: impl Into<PathBuf>, regenerate: bool) -> Self {
        Self {
            separator: PATH_SEPARATOR,
            output_file: output_file.into(),
            regenerate,
        }
    }
}

/// Find a usable executable for the descriptor's build system.
///
/// Maven prefers a project wrapper and verifies the choice with a
/// `--version` probe; Gradle uses the bundled helper script. Failure is
/// [`crate::BuildError::ToolUnavailable`].
pub fn select_build_tool(
    descriptor: &BuildDescriptor,
    maven: &MavenConfig,
    gradle: &GradleConfig,
    runner: &dyn CommandRunner,
) -> Result<PathBuf> {
    match descriptor.kind {
        BuildSystemKind::Maven => maven.resolve_program(descriptor.dir(), runner),
        BuildSystemKind::Gradle => gradle.resolve_program(),
    }
}

/// Build the classpath invocation, run from the descriptor's directory.
pub fn build_classpath_command(
    descriptor: &BuildDescriptor,
    program: &Path,
    maven: &MavenConfig,
    gradle: &GradleConfig,
    request: &ClasspathRequest,
) -> CommandSpec {
    let args = match descriptor.kind {
        BuildSystemKind::Maven => maven.classpath_args(request),
        BuildSystemKind::Gradle => gradle.classpath_args(request),
    };
    CommandSpec::new(descriptor.dir(), program).args(args)
}
