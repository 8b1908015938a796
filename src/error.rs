//! Error types for config resolution and message delivery.
//!
//! Every variant keeps its underlying cause as the error source so the
//! binary can print the full chain with `{:#}`.

use std::fmt;
use std::path::PathBuf;

/// Pipeline stage a [`ConfigError`] was raised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStage {
    /// Choosing which file to load.
    Locate,
    /// Reading the chosen file.
    Read,
    /// Deserializing the file content.
    Parse,
    /// Looking up a named environment in a parsed config.
    Select,
}

impl LoadStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadStage::Locate => "locate",
            LoadStage::Read => "read",
            LoadStage::Parse => "parse",
            LoadStage::Select => "select",
        }
    }
}

impl fmt::Display for LoadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced while locating, reading, parsing or querying the config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No override was given and none of the default files exist.
    #[error("locate: config file not found (searched: {})", join_paths(.searched))]
    NotFound { searched: Vec<PathBuf> },

    /// The resolved file could not be read.
    #[error("read: can not read config file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file content is not valid YAML or does not match the config shape.
    #[error("parse: can not load config")]
    Parse {
        #[source]
        source: serde_yaml::Error,
    },

    /// The requested environment is not defined in the config.
    #[error("select: unknown environment '{name}' (available: {})", join_names(.available))]
    UnknownEnvironment { name: String, available: Vec<String> },
}

impl ConfigError {
    /// Stage that produced this error.
    pub fn stage(&self) -> LoadStage {
        match self {
            ConfigError::NotFound { .. } => LoadStage::Locate,
            ConfigError::Read { .. } => LoadStage::Read,
            ConfigError::Parse { .. } => LoadStage::Parse,
            ConfigError::UnknownEnvironment { .. } => LoadStage::Select,
        }
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "nothing".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_names(names: &[String]) -> String {
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

/// Failures reported by a [`crate::sender::MessageSender`].
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    /// The HTTP client could not be constructed.
    #[error("can not build http client")]
    Client(#[source] reqwest::Error),

    /// The request never produced a usable HTTP response.
    #[error("request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered but rejected the message.
    #[error("api error: {0}")]
    Api(String),

    /// The response body could not be understood.
    #[error("unexpected response body")]
    Decode(#[source] serde_json::Error),
}

/// Top-level error for one notifier invocation.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The environment names an adapter with no sender implementation.
    #[error("adapter: unsupported adapter '{0}'")]
    UnsupportedAdapter(String),

    #[error("send: message delivery failed")]
    Send(#[from] SendError),

    #[error("format: can not serialize message payload")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for notifier operations.
pub type NotifyResult<T> = std::result::Result<T, NotifyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_strings() {
        assert_eq!(LoadStage::Locate.as_str(), "locate");
        assert_eq!(LoadStage::Read.as_str(), "read");
        assert_eq!(LoadStage::Parse.as_str(), "parse");
        assert_eq!(LoadStage::Select.to_string(), "select");
    }

    #[test]
    fn test_not_found_message_lists_searched_paths() {
        let err = ConfigError::NotFound {
            searched: vec![PathBuf::from("./.slcknconf"), PathBuf::from("/home/u/.slcknconf")],
        };
        assert_eq!(err.stage(), LoadStage::Locate);
        assert_eq!(
            err.to_string(),
            "locate: config file not found (searched: ./.slcknconf, /home/u/.slcknconf)"
        );
    }

    #[test]
    fn test_unknown_environment_message() {
        let err = ConfigError::UnknownEnvironment {
            name: "staging".to_string(),
            available: vec!["default".to_string(), "prod".to_string()],
        };
        assert_eq!(err.stage(), LoadStage::Select);
        assert_eq!(
            err.to_string(),
            "select: unknown environment 'staging' (available: default, prod)"
        );

        let err = ConfigError::UnknownEnvironment {
            name: "x".to_string(),
            available: vec![],
        };
        assert!(err.to_string().ends_with("(available: none)"));
    }

    #[test]
    fn test_read_error_keeps_source() {
        use std::error::Error;

        let err = ConfigError::Read {
            path: PathBuf::from("/nope"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.stage(), LoadStage::Read);
        assert_eq!(err.source().map(|s| s.to_string()), Some("gone".to_string()));
    }
}
