use std::fmt;
use std::path::{Path, PathBuf};

use grove_core::platform_executable;
use thiserror::Error;
use walkdir::WalkDir;

use crate::tokenize_vmargs;

pub const SERVER_JAR_NAME: &str = "groovy-language-server-all.jar";

/// JDWP agent added in debug mode.
pub const DEBUG_AGENT: &str = "-agentlib:jdwp=transport=dt_socket,server=y,suspend=n,address=1044,quiet=y";

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("groovy-language-server-all.jar not found under {}", .0.display())]
    ServerJarNotFound(PathBuf),
}

#[derive(Debug, Clone, Default)]
pub struct LaunchParams {
    pub java_home: PathBuf,
    pub server_home: PathBuf,
    pub vmargs: String,
    /// Value for `-Dfile.encoding`; skipped when empty.
    pub encoding: String,
    pub debug: bool,
}

/// A fully resolved language server process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerLaunch {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl fmt::Display for ServerLaunch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            if arg.chars().any(char::is_whitespace) {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Search `server_home` recursively for the server jar.
pub fn find_server_jar(server_home: &Path) -> Option<PathBuf> {
    WalkDir::new(server_home)
        .into_iter()
        .filter_map(Result::ok)
        .find(|entry| entry.file_type().is_file() && entry.file_name() == SERVER_JAR_NAME)
        .map(|entry| entry.into_path())
}

pub fn server_launch(params: &LaunchParams) -> Result<ServerLaunch, LaunchError> {
    let jar = find_server_jar(&params.server_home)
        .ok_or_else(|| LaunchError::ServerJarNotFound(params.server_home.clone()))?;

    let mut args = Vec::new();
    if params.debug {
        args.push(DEBUG_AGENT.to_string());
        args.push("-Dlog.level=ALL".to_string());
    }

    let user_args = tokenize_vmargs(&params.vmargs, &args);
    let sets_encoding = user_args
        .iter()
        .any(|arg| arg.starts_with("-Dfile.encoding="));
    if !sets_encoding && !params.encoding.is_empty() {
        args.push(format!("-Dfile.encoding={}", params.encoding));
    }
    args.extend(user_args);

    args.push("-jar".to_string());
    args.push(jar.display().to_string());

    let launch = ServerLaunch {
        program: params
            .java_home
            .join("bin")
            .join(platform_executable("java", ".exe")),
        args,
    };
    tracing::info!(target: "grove.server", "Starting Groovy Language Server with: {launch}");
    Ok(launch)
}
