use super::support::{
    failure_status, join_entries, strings, Behavior, FakeBuildTool, Fixture, RecordingNotifier,
};
use grove_build::{
    BuildClasspathOutcome, BuildSystemKind, ClasspathResolver, GradleConfig, MavenConfig,
    ResolverConfig, GRADLE_DESCRIPTOR, MAVEN_DESCRIPTOR,
};
use std::sync::Arc;

fn resolver(
    user: &[&str],
    runner: &Arc<FakeBuildTool>,
    notifier: &Arc<RecordingNotifier>,
) -> ClasspathResolver {
    resolver_with(
        ResolverConfig {
            referenced_libraries: strings(user),
            ..ResolverConfig::default()
        },
        runner,
        notifier,
    )
}

fn resolver_with(
    config: ResolverConfig,
    runner: &Arc<FakeBuildTool>,
    notifier: &Arc<RecordingNotifier>,
) -> ClasspathResolver {
    ClasspathResolver::with_runner(config, runner.clone(), notifier.clone())
}

#[test]
fn maven_project_resolves_sorted_entries_after_user_entries() {
    let fx = Fixture::new();
    fx.write(MAVEN_DESCRIPTOR, "<project/>");
    let runner = Arc::new(FakeBuildTool::new(Behavior::success(&[
        "/lib/b.jar",
        "/lib/a.jar",
    ])));
    let notifier = Arc::new(RecordingNotifier::default());

    let result = resolver(&["/user/x.jar"], &runner, &notifier).resolve(
        &fx.storage,
        &fx.source_file(),
        false,
    );

    assert_eq!(
        result.entries,
        strings(&["/user/x.jar", "/lib/a.jar", "/lib/b.jar"])
    );
    assert_eq!(
        result.build,
        BuildClasspathOutcome::Resolved(strings(&["/lib/a.jar", "/lib/b.jar"]))
    );

    let invocations = runner.classpath_invocations();
    assert_eq!(invocations.len(), 1);
    let invocation = &invocations[0];
    assert_eq!(invocation.cwd, fx.project);
    assert_eq!(invocation.program, MavenConfig::default().mvn_path);
    assert_eq!(invocation.args[0], "dependency:build-classpath");
    assert!(invocation.args.contains(&format!(
        "-Dmdep.outputFile={}",
        fx.cache_file().display()
    )));
    assert!(invocation
        .args
        .contains(&format!("-Dmdep.pathSeparator={}", grove_core::PATH_SEPARATOR)));
    assert!(invocation.args.contains(&"-Dmdep.regenerateFile=false".to_string()));

    assert!(notifier
        .infos()
        .iter()
        .any(|msg| msg.contains("[proj]") && msg.contains("resolving libraries")));
    assert!(notifier.errors().is_empty());
    // The tool's output stays on disk as the cache for the next call.
    assert!(fx.cache_file().is_file());
}

#[test]
fn maven_descriptor_wins_over_nearer_gradle_descriptor() {
    let fx = Fixture::new();
    fx.write(MAVEN_DESCRIPTOR, "<project/>");
    fx.write(&format!("module/{GRADLE_DESCRIPTOR}"), "");
    let helper = fx.write("server/bin/gradle-classpath", "");
    let source = fx.project.join("module").join("src").join("App.groovy");

    let runner = Arc::new(FakeBuildTool::new(Behavior::success(&["/lib/a.jar"])));
    let notifier = Arc::new(RecordingNotifier::default());
    let config = ResolverConfig {
        gradle: GradleConfig {
            helper_script: Some(helper.clone()),
        },
        ..ResolverConfig::default()
    };

    let result = resolver_with(config, &runner, &notifier).resolve(&fx.storage, &source, false);

    assert!(result.build.is_resolved());
    let invocations = runner.classpath_invocations();
    assert_eq!(invocations.len(), 1);
    assert_ne!(invocations[0].program, helper);
    assert_eq!(invocations[0].cwd, fx.project);
}

#[test]
fn gradle_project_uses_bundled_helper() {
    let fx = Fixture::new();
    fx.write(GRADLE_DESCRIPTOR, "plugins { id 'groovy' }");
    let helper = fx.write("server/bin/gradle-classpath", "");

    let runner = Arc::new(FakeBuildTool::new(Behavior::Write {
        contents: join_entries(&["/g/b.jar", "/g/a.jar"]),
        stdout: "BUILD SUCCESSFUL in 2s\n".to_string(),
    }));
    let notifier = Arc::new(RecordingNotifier::default());
    let config = ResolverConfig {
        gradle: GradleConfig {
            helper_script: Some(helper.clone()),
        },
        ..ResolverConfig::default()
    };

    let result =
        resolver_with(config, &runner, &notifier).resolve(&fx.storage, &fx.source_file(), true);

    assert_eq!(result.entries, strings(&["/g/a.jar", "/g/b.jar"]));
    let invocations = runner.invocations();
    assert_eq!(invocations.len(), 1, "gradle needs no version probe");
    assert_eq!(invocations[0].program, helper);
    assert!(invocations[0]
        .args
        .contains(&"-Pregenerate=true".to_string()));
}

#[test]
fn valid_cache_is_reused_without_spawning() {
    let fx = Fixture::new();
    fx.write(MAVEN_DESCRIPTOR, "<project/>");
    fx.write_cache(&join_entries(&["/b.jar", "/a.jar"]));
    let runner = Arc::new(FakeBuildTool::new(Behavior::SpawnError));
    let notifier = Arc::new(RecordingNotifier::default());

    let first = resolver(&["/u.jar"], &runner, &notifier).resolve(
        &fx.storage,
        &fx.source_file(),
        false,
    );
    // A fresh session has no in-memory state; only the file can answer.
    let second = resolver(&["/u.jar"], &runner, &notifier).resolve(
        &fx.storage,
        &fx.source_file(),
        false,
    );

    assert_eq!(first, second);
    assert_eq!(first.entries, strings(&["/u.jar", "/a.jar", "/b.jar"]));
    assert!(runner.invocations().is_empty());
    assert!(notifier.errors().is_empty());
}

#[test]
fn in_memory_shortcut_survives_cache_deletion_until_forgotten() {
    let fx = Fixture::new();
    fx.write(MAVEN_DESCRIPTOR, "<project/>");
    let runner = Arc::new(FakeBuildTool::new(Behavior::success(&["/lib/a.jar"])));
    let notifier = Arc::new(RecordingNotifier::default());
    let resolver = resolver(&[], &runner, &notifier);

    let first = resolver.resolve(&fx.storage, &fx.source_file(), false);
    std::fs::remove_file(fx.cache_file()).unwrap();
    let second = resolver.resolve(&fx.storage, &fx.source_file(), false);

    assert_eq!(first, second);
    assert_eq!(runner.classpath_invocations().len(), 1);

    resolver.forget(&fx.storage);
    resolver.resolve(&fx.storage, &fx.source_file(), false);
    assert_eq!(runner.classpath_invocations().len(), 2);
}

#[test]
fn file_outside_any_build_ignores_shortcut_of_shared_storage() {
    let fx = Fixture::new();
    fx.write(MAVEN_DESCRIPTOR, "<project/>");
    let runner = Arc::new(FakeBuildTool::new(Behavior::success(&["/lib/a.jar"])));
    let notifier = Arc::new(RecordingNotifier::default());
    let resolver = resolver(&["/u.jar"], &runner, &notifier);

    let in_project = resolver.resolve(&fx.storage, &fx.source_file(), false);
    assert!(in_project.build.is_resolved());

    let lone = fx.project.parent().unwrap().join("Lone.groovy");
    let outside = resolver.resolve(&fx.storage, &lone, false);
    assert_eq!(outside.build, BuildClasspathOutcome::NoDescriptor);
    assert_eq!(outside.entries, strings(&["/u.jar"]));

    // The shortcut is still there for files of the project.
    let again = resolver.resolve(&fx.storage, &fx.source_file(), false);
    assert_eq!(again, in_project);
    assert_eq!(runner.classpath_invocations().len(), 1);
}

#[test]
fn force_update_discards_valid_cache_and_reinvokes() {
    let fx = Fixture::new();
    fx.write(MAVEN_DESCRIPTOR, "<project/>");
    fx.write_cache(&join_entries(&["/old.jar"]));
    let runner = Arc::new(FakeBuildTool::new(Behavior::success(&["/new.jar"])));
    let notifier = Arc::new(RecordingNotifier::default());
    let resolver = resolver(&[], &runner, &notifier);

    let warm = resolver.resolve(&fx.storage, &fx.source_file(), false);
    assert_eq!(warm.entries, strings(&["/old.jar"]));
    assert!(runner.classpath_invocations().is_empty());

    let forced = resolver.resolve(&fx.storage, &fx.source_file(), true);
    assert_eq!(forced.entries, strings(&["/new.jar"]));

    let invocations = runner.classpath_invocations();
    assert_eq!(invocations.len(), 1);
    assert!(invocations[0]
        .args
        .contains(&"-Dmdep.regenerateFile=true".to_string()));
    assert!(notifier
        .infos()
        .contains(&"Resetting loaded libraries.".to_string()));
}

#[test]
fn force_update_deletes_cache_even_when_invocation_fails() {
    let fx = Fixture::new();
    fx.write(MAVEN_DESCRIPTOR, "<project/>");
    fx.write_cache(&join_entries(&["/old.jar"]));
    let runner = Arc::new(FakeBuildTool::new(Behavior::SpawnError));
    let notifier = Arc::new(RecordingNotifier::default());

    let result = resolver(&["/u.jar"], &runner, &notifier).resolve(
        &fx.storage,
        &fx.source_file(),
        true,
    );

    assert_eq!(result.entries, strings(&["/u.jar"]));
    assert!(!fx.cache_file().exists());
}

#[test]
fn no_descriptor_returns_user_entries_only() {
    let fx = Fixture::new();
    let runner = Arc::new(FakeBuildTool::new(Behavior::success(&["/lib/a.jar"])));
    let notifier = Arc::new(RecordingNotifier::default());

    let result = resolver(&["/z.jar", "/a.jar"], &runner, &notifier).resolve(
        &fx.storage,
        &fx.source_file(),
        false,
    );

    assert_eq!(result.entries, strings(&["/z.jar", "/a.jar"]));
    assert_eq!(result.build, BuildClasspathOutcome::NoDescriptor);
    assert!(runner.invocations().is_empty());
}

#[test]
fn spawn_error_deletes_stale_cache_and_reports_command() {
    let fx = Fixture::new();
    fx.write(MAVEN_DESCRIPTOR, "<project/>");
    // An empty file is never a usable cache, so the tool is invoked.
    fx.write_cache("");
    let runner = Arc::new(FakeBuildTool::new(Behavior::SpawnError));
    let notifier = Arc::new(RecordingNotifier::default());

    let result = resolver(&["/u.jar"], &runner, &notifier).resolve(
        &fx.storage,
        &fx.source_file(),
        false,
    );

    assert_eq!(result.entries, strings(&["/u.jar"]));
    match &result.build {
        BuildClasspathOutcome::InvocationFailed { tool, command, .. } => {
            assert_eq!(*tool, BuildSystemKind::Maven);
            assert!(command.contains("dependency:build-classpath"), "{command}");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(!fx.cache_file().exists());

    let errors = notifier.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("dependency:build-classpath"), "{}", errors[0]);
    assert!(errors[0].contains(&format!("cd {}", fx.project.display())), "{}", errors[0]);
}

#[test]
fn missing_success_marker_is_a_failure_even_if_file_was_written() {
    let fx = Fixture::new();
    fx.write(MAVEN_DESCRIPTOR, "<project/>");
    fx.write_cache("");
    let runner = Arc::new(FakeBuildTool::new(Behavior::Write {
        contents: join_entries(&["/lib/a.jar"]),
        stdout: "[INFO] BUILD FAILURE\n".to_string(),
    }));
    let notifier = Arc::new(RecordingNotifier::default());

    let result = resolver(&[], &runner, &notifier).resolve(&fx.storage, &fx.source_file(), false);

    assert!(result.entries.is_empty());
    assert!(matches!(
        result.build,
        BuildClasspathOutcome::InvocationFailed { .. }
    ));
    assert!(!fx.cache_file().exists());
}

#[test]
fn nonzero_exit_without_marker_is_a_failure() {
    let fx = Fixture::new();
    fx.write(MAVEN_DESCRIPTOR, "<project/>");
    let runner = Arc::new(FakeBuildTool::new(Behavior::Print {
        stdout: "[ERROR] Could not resolve dependencies".to_string(),
        status: failure_status(),
    }));
    let notifier = Arc::new(RecordingNotifier::default());

    let result = resolver(&["/u.jar"], &runner, &notifier).resolve(
        &fx.storage,
        &fx.source_file(),
        false,
    );

    assert_eq!(result.entries, strings(&["/u.jar"]));
    assert!(matches!(
        result.build,
        BuildClasspathOutcome::InvocationFailed { .. }
    ));
    assert_eq!(notifier.errors().len(), 1);
}

#[test]
fn success_with_empty_file_is_empty_output() {
    let fx = Fixture::new();
    fx.write(MAVEN_DESCRIPTOR, "<project/>");
    let runner = Arc::new(FakeBuildTool::new(Behavior::Write {
        contents: String::new(),
        stdout: "BUILD SUCCESS".to_string(),
    }));
    let notifier = Arc::new(RecordingNotifier::default());

    let result = resolver(&[], &runner, &notifier).resolve(&fx.storage, &fx.source_file(), false);

    assert_eq!(
        result.build,
        BuildClasspathOutcome::EmptyOutput {
            tool: BuildSystemKind::Maven
        }
    );
    assert!(!fx.cache_file().exists());
    assert!(notifier.errors().is_empty());
}

#[test]
fn unusable_maven_is_tool_not_found() {
    let fx = Fixture::new();
    fx.write(MAVEN_DESCRIPTOR, "<project/>");
    let runner = Arc::new(FakeBuildTool::new(Behavior::success(&["/lib/a.jar"])).without_maven());
    let notifier = Arc::new(RecordingNotifier::default());

    let result = resolver(&["/u.jar"], &runner, &notifier).resolve(
        &fx.storage,
        &fx.source_file(),
        false,
    );

    assert_eq!(result.entries, strings(&["/u.jar"]));
    assert_eq!(
        result.build,
        BuildClasspathOutcome::ToolNotFound {
            tool: BuildSystemKind::Maven
        }
    );
    assert!(runner.classpath_invocations().is_empty());
    assert!(notifier.errors().is_empty());
}

#[test]
fn missing_gradle_helper_is_tool_not_found() {
    let fx = Fixture::new();
    fx.write(GRADLE_DESCRIPTOR, "");
    let runner = Arc::new(FakeBuildTool::new(Behavior::success(&["/lib/a.jar"])));
    let notifier = Arc::new(RecordingNotifier::default());

    let result = resolver(&[], &runner, &notifier).resolve(&fx.storage, &fx.source_file(), false);

    assert_eq!(
        result.build,
        BuildClasspathOutcome::ToolNotFound {
            tool: BuildSystemKind::Gradle
        }
    );
    assert!(runner.invocations().is_empty());
}

#[test]
fn maven_wrapper_is_preferred() {
    let fx = Fixture::new();
    fx.write(MAVEN_DESCRIPTOR, "<project/>");
    let wrapper_name = MavenConfig::default().wrapper_name;
    let wrapper = fx.write(&wrapper_name, "#!/bin/sh\n");
    let runner = Arc::new(FakeBuildTool::new(Behavior::success(&["/lib/a.jar"])));
    let notifier = Arc::new(RecordingNotifier::default());

    resolver(&[], &runner, &notifier).resolve(&fx.storage, &fx.source_file(), false);

    let invocations = runner.invocations();
    assert_eq!(invocations.len(), 2);
    assert!(invocations[0].is_version_probe());
    assert_eq!(invocations[0].program, wrapper);
    assert_eq!(invocations[1].program, wrapper);
}

#[test]
fn referenced_libraries_can_be_replaced() {
    let fx = Fixture::new();
    let runner = Arc::new(FakeBuildTool::new(Behavior::SpawnError));
    let notifier = Arc::new(RecordingNotifier::default());
    let resolver = resolver(&["/old.jar"], &runner, &notifier);

    resolver.set_referenced_libraries(strings(&["/new.jar", "/other.jar"]));
    let result = resolver.resolve(&fx.storage, &fx.source_file(), false);

    assert_eq!(result.entries, strings(&["/new.jar", "/other.jar"]));
}
