use std::{io, process::ExitStatus, time::Duration};

use grove_process::{run_command, CommandSpec, RunOptions};

/// Captured output from a command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Returns `stdout` + `stderr` concatenated with a newline separator when needed.
    pub fn combined(&self) -> String {
        let mut s = String::new();
        s.push_str(&self.stdout);
        if !self.stderr.is_empty() {
            if !s.is_empty() && !s.ends_with('\n') {
                s.push('\n');
            }
            s.push_str(&self.stderr);
        }
        s
    }
}

/// Seam between the resolver and real processes; tests substitute fakes.
pub trait CommandRunner: Send + Sync + std::fmt::Debug {
    fn run(&self, command: &CommandSpec) -> io::Result<CommandOutput>;
}

#[derive(Debug, Clone, Default)]
pub struct DefaultCommandRunner {
    /// Optional timeout for command execution.
    ///
    /// `None` (the default) lets a build tool run for as long as it needs;
    /// a hung tool then blocks the resolution that started it.
    pub timeout: Option<Duration>,
}

impl DefaultCommandRunner {
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl CommandRunner for DefaultCommandRunner {
    fn run(&self, command: &CommandSpec) -> io::Result<CommandOutput> {
        let opts = RunOptions {
            timeout: self.timeout,
            ..RunOptions::default()
        };
        let result = run_command(command, &opts).map_err(|err| {
            io::Error::new(err.kind(), format!("failed to spawn `{command}`: {err}"))
        })?;

        if result.timed_out {
            return Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("command `{command}` timed out after {:?}", self.timeout),
            ));
        }
        if result.output.truncated {
            tracing::debug!(
                target: "grove.build",
                command = %command,
                "build tool output was truncated"
            );
        }

        Ok(CommandOutput {
            status: result.status,
            stdout: result.output.stdout,
            stderr: result.output.stderr,
        })
    }
}
