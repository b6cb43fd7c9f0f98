use grove_process::CommandSpec;

use crate::classpath::sort_build_entries;
use crate::notify::command_failed_message;
use crate::{
    BuildClasspathOutcome, BuildError, BuildSystemKind, ClasspathCache, CommandRunner, Notifier,
    Result,
};

/// Substring both Maven (`BUILD SUCCESS`) and Gradle (`BUILD SUCCESSFUL`)
/// print when a build completes.
pub const SUCCESS_MARKER: &str = "BUILD SUCCESS";

/// Run the classpath command and read back what it wrote.
///
/// The success marker in the captured output is the only success signal.
/// On any failure the cache file is deleted, so a stale file from an earlier
/// run can never be mistaken for this run's answer.
pub fn invoke_build_tool(
    runner: &dyn CommandRunner,
    tool: BuildSystemKind,
    command: &CommandSpec,
    cache: &ClasspathCache,
    notifier: &dyn Notifier,
) -> BuildClasspathOutcome {
    if let Err(err) = run_until_marker(runner, tool, command) {
        cache.invalidate("build tool invocation failed");
        tracing::warn!(target: "grove.build", error = %err, "classpath command failed");
        notifier.error(&command_failed_message(command));
        let reason = match err {
            BuildError::CommandFailed { reason, .. } => reason,
            other => other.to_string(),
        };
        return BuildClasspathOutcome::InvocationFailed {
            tool,
            command: command.to_string(),
            reason,
        };
    }

    match cache.read() {
        Ok(Some(entries)) => {
            tracing::debug!(
                target: "grove.build",
                %tool,
                entries = entries.len(),
                "build classpath resolved"
            );
            BuildClasspathOutcome::Resolved(sort_build_entries(entries))
        }
        Ok(None) => {
            cache.invalidate("build tool produced an empty classpath file");
            tracing::warn!(
                target: "grove.build",
                %tool,
                path = %cache.path().display(),
                "build tool reported success but wrote no classpath entries"
            );
            BuildClasspathOutcome::EmptyOutput { tool }
        }
        Err(err) => {
            cache.invalidate("classpath file could not be read");
            tracing::warn!(target: "grove.build", %tool, error = %err, "failed to read classpath file");
            BuildClasspathOutcome::EmptyOutput { tool }
        }
    }
}

fn run_until_marker(
    runner: &dyn CommandRunner,
    tool: BuildSystemKind,
    command: &CommandSpec,
) -> Result<()> {
    let output = runner.run(command).map_err(|err| BuildError::CommandFailed {
        tool,
        command: command.clone(),
        reason: err.to_string(),
    })?;

    if output.combined().contains(SUCCESS_MARKER) {
        return Ok(());
    }

    Err(BuildError::CommandFailed {
        tool,
        command: command.clone(),
        reason: format!(
            "output did not contain `{SUCCESS_MARKER}` (exit status {})",
            output.status
        ),
    })
}
