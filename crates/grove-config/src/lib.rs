//! Settings for the Groovy language server integration.
//!
//! The editor exposes these under the `groovy` section; outside an editor
//! they are read from a TOML file with the same shape.

mod logging;

pub use logging::{init_tracing, LoggingConfig};

use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid TOML config: {0}")]
    Toml(String),
    #[error("invalid settings: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // Keep only the message; the default `Display` embeds a snippet of the input.
        ConfigError::Toml(err.message().to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroovyConfig {
    /// Master switch for the integration.
    #[serde(default = "default_enable")]
    pub enable: bool,

    #[serde(default)]
    pub java: JavaConfig,

    #[serde(default)]
    pub ls: LanguageServerConfig,

    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_enable() -> bool {
    true
}

impl Default for GroovyConfig {
    fn default() -> Self {
        Self {
            enable: default_enable(),
            java: JavaConfig::default(),
            ls: LanguageServerConfig::default(),
            project: ProjectConfig::default(),
            build: BuildConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JavaConfig {
    /// Java installation used to run the language server. When unset,
    /// `JDK_HOME`, `JAVA_HOME` and `java` on `PATH` are tried.
    #[serde(default)]
    pub home: Option<PathBuf>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageServerConfig {
    /// Directory containing the language server jar. Defaults to `server/`
    /// next to the installation.
    #[serde(default)]
    pub home: Option<PathBuf>,

    /// Extra JVM arguments, as one command-line style string.
    #[serde(default)]
    pub vmargs: String,

    #[serde(default)]
    pub feature: FeatureConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureConfig {
    /// Start the server without a workspace root so standalone files work.
    #[serde(default)]
    pub no_root: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Libraries always put on the classpath, before build-derived entries.
    ///
    /// Accepts a list or a single separator-delimited string; either way it is
    /// a list once loaded.
    #[serde(default, deserialize_with = "deserialize_referenced_libraries")]
    pub referenced_libraries: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfig {
    /// Kill the build tool after this many milliseconds. Unset means wait
    /// for as long as it runs.
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Override for the bundled Gradle classpath helper.
    #[serde(default)]
    pub gradle_helper: Option<PathBuf>,
}

impl BuildConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(|ms| Duration::from_millis(ms.max(1)))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ReferencedLibrariesValue {
    List(Vec<String>),
    Delimited(String),
}

fn deserialize_referenced_libraries<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        match Option::<ReferencedLibrariesValue>::deserialize(deserializer)? {
            Some(ReferencedLibrariesValue::List(list)) => list,
            Some(ReferencedLibrariesValue::Delimited(value)) => {
                grove_core::split_classpath(&value)
            }
            None => Vec::new(),
        },
    )
}

impl GroovyConfig {
    /// Load a config file from TOML.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load_from_str(&text)
    }

    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Parse the `groovy` settings object sent by an editor.
    pub fn from_settings_json(value: serde_json::Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Settings as the JSON object the language server expects under `groovy`.
    pub fn to_settings_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|err| {
            tracing::warn!(target: "grove.config", error = %err, "failed to serialize settings");
            serde_json::Value::Object(Default::default())
        })
    }

    /// Language server home, falling back to `<install_dir>/server`.
    pub fn server_home(&self, install_dir: &Path) -> PathBuf {
        self.ls
            .home
            .clone()
            .unwrap_or_else(|| install_dir.join("server"))
    }
}

pub const GROVE_CONFIG_ENV_VAR: &str = "GROVE_CONFIG_PATH";

/// Discover the config file for a workspace root.
///
/// Search order:
/// 1) `GROVE_CONFIG_PATH` (absolute or relative to `workspace_root`)
/// 2) `grove.toml` in `workspace_root`
/// 3) `.grove.toml` in `workspace_root`
pub fn discover_config_path(workspace_root: &Path) -> Option<PathBuf> {
    if let Some(value) = std::env::var_os(GROVE_CONFIG_ENV_VAR) {
        let candidate = PathBuf::from(value);
        return Some(if candidate.is_absolute() {
            candidate
        } else {
            workspace_root.join(candidate)
        });
    }

    ["grove.toml", ".grove.toml"]
        .into_iter()
        .map(|name| workspace_root.join(name))
        .find(|path| path.is_file())
}

/// Load the config for a workspace root.
///
/// If no config is present, returns [`GroovyConfig::default`] and `None`.
pub fn load_for_workspace(
    workspace_root: &Path,
) -> Result<(GroovyConfig, Option<PathBuf>), ConfigError> {
    let Some(path) = discover_config_path(workspace_root) else {
        return Ok((GroovyConfig::default(), None));
    };

    let config = GroovyConfig::load_from_path(&path)?;
    tracing::debug!(target: "grove.config", path = %path.display(), "loaded config");
    Ok((config, Some(path)))
}
