//! The notify pipeline: load config, pick an environment, render, send.

use crate::config::{ConfigLoader, select_environment};
use crate::error::NotifyResult;
use crate::message::{MessageContext, VarMap, build_message};
use crate::sender::{MessageSender, SendReceipt};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment used when `--env` is not given.
pub const DEFAULT_ENVIRONMENT: &str = "default";

/// Options for one invocation, built once by the entry point.
#[derive(Debug, Clone)]
pub struct NotifyRequest {
    /// Environment name to deliver to
    pub env: String,
    /// Extra variables for the context line
    pub vars: VarMap,
    /// Explicit config file; takes priority over `SLCKN_CONFIG_PATH`
    pub config_file: Option<PathBuf>,
    /// Message body
    pub message: String,
    /// Render the payload without sending
    pub dry_run: bool,
}

impl NotifyRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            env: DEFAULT_ENVIRONMENT.to_string(),
            vars: VarMap::new(),
            config_file: None,
            message: message.into(),
            dry_run: false,
        }
    }
}

/// Result of a successful invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum NotifyOutcome {
    /// The message was delivered.
    Sent(SendReceipt),
    /// Dry run: the pretty-printed payload that would have been sent.
    DryRun(String),
}

/// Run the pipeline once.
///
/// `sender_for` maps the environment's adapter to a transport, which lets
/// callers swap in a fake sender. The adapter is resolved before a dry run
/// returns, so an unsupported adapter fails either way.
pub fn run<F>(
    request: &NotifyRequest,
    loader: &ConfigLoader,
    env_override: Option<&Path>,
    sender_for: F,
) -> NotifyResult<NotifyOutcome>
where
    F: FnOnce(&str) -> NotifyResult<Box<dyn MessageSender>>,
{
    let loaded = match request.config_file {
        Some(ref path) => loader.load_file(path)?,
        None => loader.load(env_override)?,
    };
    info!(
        path = %loaded.resolved.path.display(),
        source = %loaded.resolved.source,
        "using config"
    );

    let environment = select_environment(&loaded.config, &request.env)?;
    debug!(
        env = %request.env,
        adapter = %environment.adapter,
        channel = %environment.channel,
        "selected environment"
    );

    let sender = sender_for(&environment.adapter)?;

    let ctx = MessageContext::new(request.message.clone(), request.vars.clone());
    let message = build_message(&ctx);

    if request.dry_run {
        let payload = json!({
            "adapter": environment.adapter,
            "channel": environment.channel,
            "text": message.fallback,
            "blocks": message.blocks,
        });
        return Ok(NotifyOutcome::DryRun(serde_json::to_string_pretty(&payload)?));
    }

    let receipt = sender.send(&environment.token, &environment.channel, &message)?;
    Ok(NotifyOutcome::Sent(receipt))
}
