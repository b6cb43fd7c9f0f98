use std::path::Path;
use std::sync::OnceLock;

use grove_process::{run_command, CommandSpec, RunOptions};
use regex::Regex;

use crate::{java_executable, JdkDiscoveryError};

/// Oldest Java release the language server runs on.
pub const MIN_JAVA_VERSION: u32 = 8;

/// Extract the major version from `java -version` output.
///
/// Legacy `1.x` versions map to `x`. Returns 0 when nothing parses.
pub fn parse_major_version(output: &str) -> u32 {
    static VERSION: OnceLock<Regex> = OnceLock::new();
    static DIGITS: OnceLock<Regex> = OnceLock::new();

    let version = VERSION.get_or_init(|| Regex::new(r#"version "([^"]*)""#).expect("valid regex"));
    let digits = DIGITS.get_or_init(|| Regex::new(r"\d+").expect("valid regex"));

    let Some(captures) = version.captures(output) else {
        return 0;
    };
    let raw = &captures[1];
    let raw = raw.strip_prefix("1.").unwrap_or(raw);

    digits
        .find(raw)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Run `<home>/bin/java -version` and parse the major version.
pub fn probe_java_version(home: &Path) -> Result<u32, JdkDiscoveryError> {
    let java = java_executable(home);
    let command = CommandSpec::new(home, &java).arg("-version");
    let result = run_command(&command, &RunOptions::default())
        .map_err(|source| JdkDiscoveryError::VersionProbe { java, source })?;

    // The version banner goes to stderr.
    Ok(parse_major_version(&result.output.combined()))
}
