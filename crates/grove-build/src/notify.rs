use grove_core::PLUGIN_NAME;
use grove_process::CommandSpec;

/// User-visible status channel (editor message area, status line, ...).
pub trait Notifier: Send + Sync + std::fmt::Debug {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards notifications to `tracing`; used when no editor UI is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn info(&self, message: &str) {
        tracing::info!(target: "grove.notify", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "grove.notify", "{message}");
    }
}

pub(crate) fn resetting_message() -> String {
    "Resetting loaded libraries.".to_string()
}

pub(crate) fn resolving_message(project: &str) -> String {
    format!("{PLUGIN_NAME} project [{project}] resolving libraries...")
}

pub(crate) fn command_failed_message(command: &CommandSpec) -> String {
    format!(
        "{PLUGIN_NAME} classpath command failed \"{}\"",
        command.display_in_dir()
    )
}
