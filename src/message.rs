//! Message formatting for Slack Block Kit.

use chrono::{DateTime, Local};
use serde_json::{Value, json};
use std::collections::BTreeMap;

/// Free-form `key:value` variables supplied with `--vars`.
pub type VarMap = BTreeMap<String, String>;

/// Header shown at the top of every notification.
pub const HEADER_TEXT: &str = ":eye-in-speech-bubble: Slckn Notify :eye-in-speech-bubble:";

/// Variable rendered as the message sender in the context line.
pub const NAME_VAR: &str = "name";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a `key:value` pair, splitting at the first colon.
pub fn parse_var(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected KEY:VALUE, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty variable name in '{}'", raw));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Everything needed to render one notification.
#[derive(Debug, Clone)]
pub struct MessageContext {
    pub sent_at: DateTime<Local>,
    pub text: String,
    pub vars: VarMap,
}

impl MessageContext {
    pub fn new(text: impl Into<String>, vars: VarMap) -> Self {
        Self {
            sent_at: Local::now(),
            text: text.into(),
            vars,
        }
    }

    pub fn with_sent_at(mut self, sent_at: DateTime<Local>) -> Self {
        self.sent_at = sent_at;
        self
    }
}

/// A rendered message ready for a sender.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedMessage {
    /// Block Kit blocks
    pub blocks: Vec<Value>,
    /// Plain text used by clients that cannot render blocks (push notifications)
    pub fallback: String,
}

/// Render the context line: timestamp, sender and any extra variables.
fn context_line(ctx: &MessageContext) -> String {
    let mut line = format!(":calendar: {}", ctx.sent_at.format(TIMESTAMP_FORMAT));

    if let Some(name) = ctx.vars.get(NAME_VAR) {
        line.push_str(&format!(" | *from* {}", name));
    }

    for (key, value) in ctx.vars.iter().filter(|(k, _)| k.as_str() != NAME_VAR) {
        line.push_str(&format!(" | *{}*: {}", key, value));
    }

    line
}

/// Build the header / context / divider / body block layout.
pub fn build_message(ctx: &MessageContext) -> FormattedMessage {
    let header = json!({
        "type": "header",
        "block_id": "notify-header",
        "text": {
            "type": "plain_text",
            "text": HEADER_TEXT,
        },
    });

    let context = json!({
        "type": "context",
        "block_id": "notify-context",
        "elements": [{
            "type": "mrkdwn",
            "text": context_line(ctx),
        }],
    });

    let divider = json!({ "type": "divider" });

    let body = json!({
        "type": "section",
        "text": {
            "type": "mrkdwn",
            "text": format!("```{}```", ctx.text),
        },
    });

    FormattedMessage {
        blocks: vec![header, context, divider, body],
        fallback: ctx.text.clone(),
    }
}
