use std::path::{Path, PathBuf};

use grove_core::platform_executable;

use crate::tool::ClasspathRequest;
use crate::{BuildError, BuildSystemKind, Result};

/// Relative location of the Gradle helper inside the language server home.
const HELPER_DIR: &str = "bin";
const HELPER_STEM: &str = "gradle-classpath";

#[derive(Debug, Clone, Default)]
pub struct GradleConfig {
    /// Helper script shipped with the language server that prints the
    /// project's dependency classpath. No system Gradle is required.
    pub helper_script: Option<PathBuf>,
}

impl GradleConfig {
    /// Use the helper bundled under `server_home` (`bin/gradle-classpath[.bat]`).
    pub fn bundled(server_home: &Path) -> Self {
        Self {
            helper_script: Some(
                server_home
                    .join(HELPER_DIR)
                    .join(platform_executable(HELPER_STEM, ".bat")),
            ),
        }
    }

    pub(crate) fn resolve_program(&self) -> Result<PathBuf> {
        match &self.helper_script {
            Some(helper) if helper.is_file() => Ok(helper.clone()),
            Some(helper) => Err(BuildError::ToolUnavailable {
                tool: BuildSystemKind::Gradle,
                reason: format!("helper script {} does not exist", helper.display()),
            }),
            None => Err(BuildError::ToolUnavailable {
                tool: BuildSystemKind::Gradle,
                reason: "no gradle helper script configured".to_string(),
            }),
        }
    }

    pub(crate) fn classpath_args(&self, request: &ClasspathRequest) -> Vec<String> {
        vec![
            format!("-PpathSeparator={}", request.separator),
            format!("-PoutputFile={}", request.output_file.display()),
            format!("-Pregenerate={}", request.regenerate),
        ]
    }
}
