//! Configuration types and structures.

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A named delivery target: which transport to use, the credential for it,
/// and the destination channel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Environment {
    /// Transport identifier (e.g. `slack`).
    pub adapter: String,
    /// Opaque credential passed to the transport.
    pub token: String,
    /// Destination identifier, such as a channel name or id.
    pub channel: String,
}

/// Notifier configuration file.
///
/// Unknown keys are ignored so that newer files still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Informational format version.
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub version: String,

    /// Environments keyed by name.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub environments: BTreeMap<String, Environment>,
}

impl Config {
    /// Environment names in sorted order.
    pub fn environment_names(&self) -> Vec<String> {
        self.environments.keys().cloned().collect()
    }
}

/// Where a resolved config path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSource {
    /// `--configfile` on the command line
    Flag,
    /// `SLCKN_CONFIG_PATH`
    EnvVar,
    /// `./.slcknconf`
    Project,
    /// `~/.slcknconf`
    Home,
}

impl std::fmt::Display for PathSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathSource::Flag => write!(f, "flag"),
            PathSource::EnvVar => write!(f, "environment"),
            PathSource::Project => write!(f, "project"),
            PathSource::Home => write!(f, "home"),
        }
    }
}

/// The single file chosen for loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub path: PathBuf,
    pub source: PathSource,
}

impl ResolvedPath {
    pub fn new(path: impl Into<PathBuf>, source: PathSource) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }

    pub fn as_path(&self) -> &Path {
        &self.path
    }
}

/// A parsed config together with the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub resolved: ResolvedPath,
}

// `version: 1` and `version: "1"` are both common in hand-written files.
fn scalar_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::Null => Ok(String::new()),
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        other => Err(D::Error::custom(format!(
            "version must be a scalar, got {:?}",
            other
        ))),
    }
}

// `environments:` with nothing under it parses as null.
fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeMap<String, Environment>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeMap<String, Environment>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_accepts_numbers_and_strings() {
        let config: Config = serde_yaml::from_str("version: 1\n").unwrap();
        assert_eq!(config.version, "1");

        let config: Config = serde_yaml::from_str("version: \"1.2\"\n").unwrap();
        assert_eq!(config.version, "1.2");

        let config: Config = serde_yaml::from_str("version: 1.5\n").unwrap();
        assert_eq!(config.version, "1.5");
    }

    #[test]
    fn test_version_rejects_mapping() {
        let result: Result<Config, _> = serde_yaml::from_str("version:\n  major: 1\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_null_environments_is_empty() {
        let config: Config = serde_yaml::from_str("version: 1\nenvironments:\n").unwrap();
        assert!(config.environments.is_empty());
    }

    #[test]
    fn test_environment_names_sorted() {
        let yaml = r##"
environments:
  prod: { adapter: slack, token: a, channel: "#p" }
  default: { adapter: slack, token: b, channel: "#d" }
"##;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.environment_names(), vec!["default", "prod"]);
    }

    #[test]
    fn test_environment_requires_all_fields() {
        let yaml = "environments:\n  default:\n    adapter: slack\n    token: t\n";
        let result: Result<Config, _> = serde_yaml::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_path_source_display() {
        assert_eq!(PathSource::Flag.to_string(), "flag");
        assert_eq!(PathSource::EnvVar.to_string(), "environment");
        assert_eq!(PathSource::Project.to_string(), "project");
        assert_eq!(PathSource::Home.to_string(), "home");
    }
}
