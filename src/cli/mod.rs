//! CLI definition for slckn.
//!
//! Parsed once in `main` and converted into a [`NotifyRequest`].

use crate::message::{VarMap, parse_var};
use crate::notify::{DEFAULT_ENVIRONMENT, NotifyRequest};
use clap::Parser;
use std::path::PathBuf;

/// Send a formatted notification to a messaging service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Name of the destination environment to send the message to
    #[arg(short, long, default_value = DEFAULT_ENVIRONMENT)]
    pub env: String,

    /// Arbitrary variables (e.g. --vars fromIP:10.0.0.1); repeatable
    #[arg(short, long = "vars", value_name = "KEY:VALUE", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,

    /// Path to the configuration file; it is an error if this file does not exist
    #[arg(short = 'f', long = "configfile", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Print the message payload instead of sending it
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(long)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2")]
    pub log: String,

    /// Message text (read from stdin when omitted)
    #[arg(value_name = "MESSAGE")]
    pub message: Option<String>,
}

impl Cli {
    /// Collected `--vars`; later duplicates win.
    pub fn var_map(&self) -> VarMap {
        self.vars.iter().cloned().collect()
    }

    /// Build the request, using `message` as the body.
    pub fn into_request(self, message: String) -> NotifyRequest {
        let vars = self.var_map();
        NotifyRequest {
            env: self.env,
            vars,
            config_file: self.config_file,
            message,
            dry_run: self.dry_run,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["slckn", "hello"]).unwrap();
        assert_eq!(cli.env, "default");
        assert!(cli.vars.is_empty());
        assert!(cli.config_file.is_none());
        assert!(!cli.dry_run);
        assert_eq!(cli.log, "2");
        assert_eq!(cli.message.as_deref(), Some("hello"));
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "slckn",
            "-e",
            "ops",
            "-v",
            "name:ci",
            "--vars",
            "fromIP:10.0.0.1:22",
            "-f",
            "/etc/slckn.yaml",
            "--dry-run",
            "done",
        ])
        .unwrap();

        let request = cli.into_request("done".to_string());
        assert_eq!(request.env, "ops");
        assert_eq!(request.vars.get("name").map(String::as_str), Some("ci"));
        assert_eq!(
            request.vars.get("fromIP").map(String::as_str),
            Some("10.0.0.1:22")
        );
        assert_eq!(request.config_file, Some(PathBuf::from("/etc/slckn.yaml")));
        assert!(request.dry_run);
        assert_eq!(request.message, "done");
    }

    #[test]
    fn test_bad_var_rejected() {
        assert!(Cli::try_parse_from(["slckn", "--vars", "novalue", "x"]).is_err());
    }

    #[test]
    fn test_message_optional() {
        let cli = Cli::try_parse_from(["slckn"]).unwrap();
        assert!(cli.message.is_none());
    }
}
