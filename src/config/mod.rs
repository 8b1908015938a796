//! Notifier configuration.
//!
//! The config file is looked up in this order, first match wins:
//! 1. `--configfile <path>` on the command line
//! 2. `SLCKN_CONFIG_PATH` (ignored when empty)
//! 3. `./.slcknconf`
//! 4. `~/.slcknconf`
//!
//! ## File format
//! ```yaml
//! version: 1
//! environments:
//!   default:
//!     adapter: slack
//!     token: xoxb-...
//!     channel: "#general"
//! ```

mod loader;
mod types;

pub use loader::{
    CONFIG_FILE_NAME, CONFIG_PATH_ENV, ConfigLoader, ConfigPaths, env_override, select_environment,
};
pub use types::*;
