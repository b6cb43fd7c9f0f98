use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::classpath::{assemble_classpath, sort_build_entries};
use crate::notify::{resetting_message, resolving_message};
use crate::{
    build_classpath_command, invoke_build_tool, locate_build_descriptor, select_build_tool,
    BuildClasspathOutcome, BuildDescriptor, BuildError, ClasspathCache, ClasspathRequest,
    CommandRunner, DefaultCommandRunner, GradleConfig, MavenConfig, Notifier, TracingNotifier,
};

#[derive(Debug, Clone, Default)]
pub struct ResolverConfig {
    /// User-configured libraries, already normalized to a list.
    pub referenced_libraries: Vec<String>,
    pub maven: MavenConfig,
    pub gradle: GradleConfig,
}

/// Result of [`ClasspathResolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedClasspath {
    /// User entries (configured order) followed by build entries (sorted).
    pub entries: Vec<String>,
    /// How the build-derived part was obtained, or why it is missing.
    pub build: BuildClasspathOutcome,
}

/// Last resolved build classpath for one storage location.
///
/// The slot's mutex is held for the whole build-classpath step, which makes
/// resolutions for the same storage location single-flight.
#[derive(Debug, Default)]
struct StorageSlot {
    resolved: Option<Vec<String>>,
}

/// Classpath resolution session.
///
/// Owned by the caller (one per editor session). It never returns an error:
/// whatever goes wrong, the caller still gets the user-configured entries.
#[derive(Debug)]
pub struct ClasspathResolver {
    config: ResolverConfig,
    referenced_libraries: RwLock<Vec<String>>,
    runner: Arc<dyn CommandRunner>,
    notifier: Arc<dyn Notifier>,
    slots: Mutex<HashMap<PathBuf, Arc<Mutex<StorageSlot>>>>,
}

impl ClasspathResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self::with_runner(
            config,
            Arc::new(DefaultCommandRunner::default()),
            Arc::new(TracingNotifier),
        )
    }

    pub fn with_runner(
        config: ResolverConfig,
        runner: Arc<dyn CommandRunner>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            referenced_libraries: RwLock::new(config.referenced_libraries.clone()),
            config,
            runner,
            notifier,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Replace the user-configured libraries (e.g. after a settings change).
    pub fn set_referenced_libraries(&self, libraries: Vec<String>) {
        *self.referenced_libraries.write() = libraries;
    }

    /// Compute the classpath for `source_file`.
    ///
    /// With `force_update` the cached classpath (file and in-memory) is
    /// discarded first and the build tool is always run.
    pub fn resolve(
        &self,
        storage_dir: &Path,
        source_file: &Path,
        force_update: bool,
    ) -> ResolvedClasspath {
        let slot = self.slot(storage_dir);
        let build = {
            let mut slot = slot.lock();
            let cache = ClasspathCache::for_storage(storage_dir);

            if force_update {
                slot.resolved = None;
                cache.invalidate("forced classpath update");
                self.notifier.info(&resetting_message());
            }

            // The descriptor is looked up on every call; the shortcut only
            // applies to files that belong to a build.
            match locate_build_descriptor(source_file) {
                None => BuildClasspathOutcome::NoDescriptor,
                Some(descriptor) => match &slot.resolved {
                    Some(entries) => BuildClasspathOutcome::Resolved(entries.clone()),
                    None => {
                        let outcome = self.build_classpath(&cache, &descriptor, force_update);
                        if let BuildClasspathOutcome::Resolved(entries) = &outcome {
                            slot.resolved = Some(entries.clone());
                        }
                        outcome
                    }
                },
            }
        };

        let user = self.referenced_libraries.read().clone();
        ResolvedClasspath {
            entries: assemble_classpath(&user, build.entries()),
            build,
        }
    }

    /// Drop the in-memory shortcut for `storage_dir` without touching disk.
    ///
    /// Slots are otherwise kept for the life of the resolver, one per storage
    /// location ever resolved; callers that move between workspaces should
    /// forget the ones they leave.
    pub fn forget(&self, storage_dir: &Path) {
        self.slots.lock().remove(storage_dir);
    }

    fn slot(&self, storage_dir: &Path) -> Arc<Mutex<StorageSlot>> {
        self.slots
            .lock()
            .entry(storage_dir.to_path_buf())
            .or_default()
            .clone()
    }

    fn build_classpath(
        &self,
        cache: &ClasspathCache,
        descriptor: &BuildDescriptor,
        force_update: bool,
    ) -> BuildClasspathOutcome {
        if !force_update {
            match cache.read() {
                Ok(Some(entries)) => {
                    tracing::debug!(
                        target: "grove.build",
                        path = %cache.path().display(),
                        "using cached build classpath"
                    );
                    return BuildClasspathOutcome::Resolved(sort_build_entries(entries));
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::debug!(target: "grove.build", error = %err, "ignoring unreadable classpath cache");
                }
            }
        }

        let program = match select_build_tool(
            descriptor,
            &self.config.maven,
            &self.config.gradle,
            self.runner.as_ref(),
        ) {
            Ok(program) => program,
            Err(err) => {
                tracing::info!(target: "grove.build", error = %err, "build classpath skipped");
                let tool = match err {
                    BuildError::ToolUnavailable { tool, .. } => tool,
                    _ => descriptor.kind,
                };
                return BuildClasspathOutcome::ToolNotFound { tool };
            }
        };

        if let Err(err) = cache.prepare() {
            tracing::warn!(target: "grove.build", error = %err, "cannot prepare storage directory");
        }

        self.notifier
            .info(&resolving_message(&descriptor.project_name()));

        let request = ClasspathRequest::new(cache.path(), force_update);
        let command = build_classpath_command(
            descriptor,
            &program,
            &self.config.maven,
            &self.config.gradle,
            &request,
        );
        invoke_build_tool(
            self.runner.as_ref(),
            descriptor.kind,
            &command,
            cache,
            self.notifier.as_ref(),
        )
    }
}
