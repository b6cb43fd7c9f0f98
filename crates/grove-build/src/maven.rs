use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use grove_core::{find_up, platform_executable};
use grove_process::CommandSpec;
use regex::Regex;

use crate::tool::ClasspathRequest;
use crate::{BuildError, BuildSystemKind, CommandRunner, Result};

#[derive(Debug, Clone)]
pub struct MavenConfig {
    /// Maven executable used when no wrapper is found (defaults to `mvn` in `PATH`).
    pub mvn_path: PathBuf,
    /// Prefer a Maven wrapper found next to (or above) the `pom.xml`.
    pub prefer_wrapper: bool,
    /// Wrapper script name (`mvnw`, or `mvnw.cmd` on Windows).
    pub wrapper_name: String,
    /// Goal that writes the dependency classpath to a file.
    pub classpath_goal: String,
}

impl Default for MavenConfig {
    fn default() -> Self {
        Self {
            mvn_path: PathBuf::from(platform_executable("mvn", ".cmd")),
            prefer_wrapper: true,
            wrapper_name: platform_executable("mvnw", ".cmd"),
            classpath_goal: "dependency:build-classpath".to_string(),
        }
    }
}

impl MavenConfig {
    /// Executables to try, most preferred first.
    fn candidates(&self, project_dir: &Path) -> Vec<PathBuf> {
        let mut out = Vec::with_capacity(2);
        if self.prefer_wrapper {
            if let Some(wrapper) = find_up(project_dir, &self.wrapper_name) {
                out.push(wrapper);
            }
        }
        out.push(self.mvn_path.clone());
        out
    }

    /// Pick the first candidate whose `--version` output looks like Maven.
    pub(crate) fn resolve_program(
        &self,
        project_dir: &Path,
        runner: &dyn CommandRunner,
    ) -> Result<PathBuf> {
        let mut last_reason = String::from("no candidate executable");
        for candidate in self.candidates(project_dir) {
            let probe = CommandSpec::new(project_dir, &candidate).arg("--version");
            match runner.run(&probe) {
                Ok(output) if is_maven_version_output(&output.combined()) => {
                    tracing::debug!(
                        target: "grove.build",
                        program = %candidate.display(),
                        "using maven executable"
                    );
                    return Ok(candidate);
                }
                Ok(output) => {
                    last_reason = format!(
                        "`{probe}` did not report a Maven version (exit status {})",
                        output.status
                    );
                }
                Err(err) => {
                    last_reason = format!("`{probe}` could not be run: {err}");
                }
            }
            tracing::debug!(target: "grove.build", reason = %last_reason, "maven candidate rejected");
        }

        Err(BuildError::ToolUnavailable {
            tool: BuildSystemKind::Maven,
            reason: last_reason,
        })
    }

    pub(crate) fn classpath_args(&self, request: &ClasspathRequest) -> Vec<String> {
        vec![
            self.classpath_goal.clone(),
            format!("-Dmdep.pathSeparator={}", request.separator),
            format!("-Dmdep.outputFile={}", request.output_file.display()),
            format!("-Dmdep.regenerateFile={}", request.regenerate),
        ]
    }
}

/// Whether `text` contains a Maven version banner such as `Apache Maven 3.9.6`.
pub(crate) fn is_maven_version_output(text: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"Apache Maven \d+\.\d+\.\d+").expect("valid regex"))
        .is_match(text)
}
