use std::panic::Location;
use std::path::Path;

/// Remove `path`, treating "already gone" as success and logging anything else.
#[track_caller]
pub(crate) fn remove_file_best_effort(path: &Path, reason: &'static str) {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(
                target: "grove.build",
                path = %path.display(),
                reason,
                "removed file"
            );
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => {
            let loc = Location::caller();
            tracing::warn!(
                target: "grove.build",
                path = %path.display(),
                reason,
                file = loc.file(),
                line = loc.line(),
                error = %err,
                "failed to remove file"
            );
        }
    }
}
