use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use grove_build::{
    workspace_storage_dir, BuildClasspathOutcome, ClasspathResolver, DefaultCommandRunner,
    GradleConfig, ResolverConfig, TracingNotifier,
};
use grove_config::{init_tracing, load_for_workspace, GroovyConfig};
use grove_jdk::JavaRuntime;
use grove_server::{did_change_configuration, server_launch, LaunchParams};

#[derive(Parser)]
#[command(
    name = "grove",
    version,
    about = "Groovy language server support (classpath resolution, Java discovery, launch)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    #[command(flatten)]
    workspace: WorkspaceArgs,
}

#[derive(Args)]
struct WorkspaceArgs {
    /// Workspace root (defaults to current directory)
    #[arg(long, global = true, default_value = ".")]
    workspace_root: PathBuf,
    /// Config file to use instead of the one discovered in the workspace root
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve the classpath for a Groovy source file
    Classpath(ClasspathArgs),
    /// Print the Java runtime the language server would run on
    Java,
    /// Print the language server command line
    ServerCommand(ServerCommandArgs),
    /// Print the workspace storage location
    StorageDir(StorageArgs),
}

#[derive(Args)]
struct StorageArgs {
    /// Base directory for workspace storage (defaults to the temp directory)
    #[arg(long)]
    storage_dir: Option<PathBuf>,
}

#[derive(Args)]
struct ClasspathArgs {
    /// Groovy source file
    file: PathBuf,
    #[command(flatten)]
    storage: StorageArgs,
    /// Discard the cached classpath and rerun the build tool
    #[arg(long)]
    force: bool,
    /// Emit the entries as a JSON array
    #[arg(long, conflicts_with = "notification")]
    json: bool,
    /// Emit the `workspace/didChangeConfiguration` params
    #[arg(long)]
    notification: bool,
}

#[derive(Args)]
struct ServerCommandArgs {
    /// Source encoding passed as `-Dfile.encoding` (empty to skip)
    #[arg(long, default_value = "UTF-8")]
    encoding: String,
    /// Start the server with a JDWP agent and verbose logging
    #[arg(long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            2
        }
    };

    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<i32> {
    let workspace_root = workspace_root(&cli.workspace.workspace_root)?;
    let config = load_config(&workspace_root, cli.workspace.config.as_deref())?;
    init_tracing(&config.logging);

    match cli.command {
        Command::Classpath(args) => {
            let file = absolute(&args.file)?;
            if !grove_core::is_groovy_file(&file) {
                tracing::warn!(
                    target: "grove.build",
                    file = %file.display(),
                    "not a Groovy file; resolving anyway"
                );
            }

            let storage = workspace_storage_dir(args.storage.storage_dir.as_deref(), &workspace_root);
            let resolver = classpath_resolver(&config)?;
            let resolved = resolver.resolve(&storage, &file, args.force);

            if args.notification {
                let value = did_change_configuration(config.to_settings_json(), &resolved.entries);
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else if args.json {
                println!("{}", serde_json::to_string_pretty(&resolved.entries)?);
            } else {
                for entry in &resolved.entries {
                    println!("{entry}");
                }
            }

            // The classpath is always printed; the exit code flags a failed build.
            Ok(match resolved.build {
                BuildClasspathOutcome::InvocationFailed { .. } => 1,
                _ => 0,
            })
        }
        Command::Java => {
            let runtime = JavaRuntime::resolve(config.java.home.as_deref())?;
            println!("{}", runtime.home.display());
            println!("Java {} ({})", runtime.major_version, runtime.source);
            Ok(0)
        }
        Command::ServerCommand(args) => {
            let runtime = JavaRuntime::resolve(config.java.home.as_deref())?;
            let launch = server_launch(&LaunchParams {
                java_home: runtime.home,
                server_home: config.server_home(&install_dir()?),
                vmargs: config.ls.vmargs.clone(),
                encoding: args.encoding,
                debug: args.debug,
            })?;
            println!("{launch}");
            Ok(0)
        }
        Command::StorageDir(args) => {
            let storage = workspace_storage_dir(args.storage_dir.as_deref(), &workspace_root);
            println!("{}", storage.display());
            Ok(0)
        }
    }
}

fn load_config(workspace_root: &Path, explicit: Option<&Path>) -> Result<GroovyConfig> {
    match explicit {
        Some(path) => GroovyConfig::load_from_path(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => {
            let (config, _path) = load_for_workspace(workspace_root).with_context(|| {
                format!("failed to load config for {}", workspace_root.display())
            })?;
            Ok(config)
        }
    }
}

fn classpath_resolver(config: &GroovyConfig) -> Result<ClasspathResolver> {
    let gradle = match &config.build.gradle_helper {
        Some(helper) => GradleConfig {
            helper_script: Some(helper.clone()),
        },
        None => GradleConfig::bundled(&config.server_home(&install_dir()?)),
    };
    let resolver_config = ResolverConfig {
        referenced_libraries: config.project.referenced_libraries.clone(),
        gradle,
        ..ResolverConfig::default()
    };

    Ok(ClasspathResolver::with_runner(
        resolver_config,
        Arc::new(DefaultCommandRunner::with_timeout(config.build.timeout())),
        Arc::new(TracingNotifier),
    ))
}

/// Directory containing the `grove` executable.
fn install_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("failed to locate the grove executable")?;
    Ok(exe
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".")))
}

/// Canonical workspace root; the storage location is derived from its text.
fn workspace_root(path: &Path) -> Result<PathBuf> {
    dunce::canonicalize(path)
        .with_context(|| format!("workspace root {} is not accessible", path.display()))
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to read the current directory")?;
    Ok(cwd.join(path))
}
