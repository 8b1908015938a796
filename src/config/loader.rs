//! Configuration resolver.
//!
//! Locates the config file, reads it and parses it, failing with a
//! stage-tagged [`ConfigError`] at the first problem.

use super::types::{Config, Environment, LoadedConfig, PathSource, ResolvedPath};
use crate::error::ConfigError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "SLCKN_CONFIG_PATH";

/// Config file name used for the project and home lookups.
pub const CONFIG_FILE_NAME: &str = ".slcknconf";

/// Candidate config locations, checked in order.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Project-level file, relative to the working directory
    pub project_file: PathBuf,
    /// User-level file in the home directory
    pub home_file: Option<PathBuf>,
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self::discover()
    }
}

impl ConfigPaths {
    /// Default locations: `./.slcknconf` then `~/.slcknconf`.
    pub fn discover() -> Self {
        Self {
            project_file: Path::new(".").join(CONFIG_FILE_NAME),
            home_file: dirs::home_dir().map(|h| h.join(CONFIG_FILE_NAME)),
        }
    }

    /// Create paths with explicit files.
    pub fn with_files(project_file: impl Into<PathBuf>, home_file: Option<PathBuf>) -> Self {
        Self {
            project_file: project_file.into(),
            home_file,
        }
    }

    /// Every default location, in lookup order.
    pub fn candidates(&self) -> Vec<(PathBuf, PathSource)> {
        let mut candidates = vec![(self.project_file.clone(), PathSource::Project)];
        if let Some(ref home) = self.home_file {
            candidates.push((home.clone(), PathSource::Home));
        }
        candidates
    }
}

/// Read the override variable from the process environment.
///
/// An empty value counts as unset. Values that are not valid Unicode are
/// kept as-is.
pub fn env_override() -> Option<PathBuf> {
    override_from(std::env::var_os(CONFIG_PATH_ENV))
}

fn override_from(value: Option<OsString>) -> Option<PathBuf> {
    value.filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// Resolves, reads and parses the notifier config.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    pub paths: ConfigPaths,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new(ConfigPaths::discover())
    }
}

impl ConfigLoader {
    pub fn new(paths: ConfigPaths) -> Self {
        Self { paths }
    }

    /// Pick the file to load.
    ///
    /// A non-empty override is returned as-is without checking that it
    /// exists; a missing override file surfaces as a read error.
    pub fn resolve_path(&self, env_override: Option<&Path>) -> Result<ResolvedPath, ConfigError> {
        if let Some(path) = env_override.filter(|p| !p.as_os_str().is_empty()) {
            return Ok(ResolvedPath::new(path, PathSource::EnvVar));
        }

        let candidates = self.paths.candidates();
        for (path, source) in &candidates {
            if path.is_file() {
                return Ok(ResolvedPath::new(path.clone(), *source));
            }
            debug!(path = %path.display(), source = %source, "config candidate not present");
        }

        Err(ConfigError::NotFound {
            searched: candidates.into_iter().map(|(path, _)| path).collect(),
        })
    }

    /// Read the whole file.
    pub fn load_bytes(path: &Path) -> Result<Vec<u8>, ConfigError> {
        std::fs::read(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Deserialize config content.
    ///
    /// An empty document yields an empty config.
    pub fn parse(data: &[u8]) -> Result<Config, ConfigError> {
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Config::default());
        }
        let config: Option<Config> =
            serde_yaml::from_slice(data).map_err(|source| ConfigError::Parse { source })?;
        Ok(config.unwrap_or_default())
    }

    /// Resolve, read and parse in order, stopping at the first failure.
    pub fn load(&self, env_override: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
        let resolved = self.resolve_path(env_override)?;
        self.load_resolved(resolved)
    }

    /// Load an explicitly chosen file, such as one given with `--configfile`.
    pub fn load_file(&self, path: impl Into<PathBuf>) -> Result<LoadedConfig, ConfigError> {
        self.load_resolved(ResolvedPath::new(path, PathSource::Flag))
    }

    fn load_resolved(&self, resolved: ResolvedPath) -> Result<LoadedConfig, ConfigError> {
        debug!(path = %resolved.path.display(), source = %resolved.source, "loading config");
        let bytes = Self::load_bytes(resolved.as_path())?;
        let config = Self::parse(&bytes)?;
        debug!(
            version = %config.version,
            environments = config.environments.len(),
            "config loaded"
        );
        Ok(LoadedConfig { config, resolved })
    }
}

/// Look up an environment by exact name.
pub fn select_environment<'a>(
    config: &'a Config,
    name: &str,
) -> Result<&'a Environment, ConfigError> {
    config
        .environments
        .get(name)
        .ok_or_else(|| ConfigError::UnknownEnvironment {
            name: name.to_string(),
            available: config.environment_names(),
        })
}
