//! Message transports.
//!
//! Each [`Environment`](crate::config::Environment) names an adapter; the
//! adapter picks a [`MessageSender`]. Only Slack is implemented.

use crate::error::{NotifyError, SendError};
use crate::message::FormattedMessage;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Default Slack Web API base URL.
pub const SLACK_API_BASE: &str = "https://slack.com/api";

/// Request timeout for a single send.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Identifier of the Slack adapter in config files.
pub const SLACK_ADAPTER: &str = "slack";

/// Where and when a message landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    pub channel: String,
    pub timestamp: String,
}

/// A transport that can deliver a formatted message.
pub trait MessageSender {
    /// Deliver `body` to `destination` using `credential`.
    fn send(
        &self,
        credential: &str,
        destination: &str,
        body: &FormattedMessage,
    ) -> Result<SendReceipt, SendError>;
}

/// Resolve the sender for an adapter identifier.
pub fn sender_for_adapter(adapter: &str) -> Result<Box<dyn MessageSender>, NotifyError> {
    if adapter.eq_ignore_ascii_case(SLACK_ADAPTER) {
        return Ok(Box::new(SlackSender::new()?));
    }
    Err(NotifyError::UnsupportedAdapter(adapter.to_string()))
}

/// `chat.postMessage` request body.
#[derive(Debug, Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    text: &'a str,
    blocks: &'a [serde_json::Value],
    as_user: bool,
}

/// Subset of the `chat.postMessage` response we use.
#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    ts: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Slack Web API sender using a blocking HTTP client.
#[derive(Debug, Clone)]
pub struct SlackSender {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl SlackSender {
    /// Create a sender against the public Slack API.
    pub fn new() -> Result<Self, SendError> {
        Self::with_base_url(SLACK_API_BASE, DEFAULT_TIMEOUT)
    }

    /// Create a sender against a custom API base (for testing or proxies).
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SendError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SendError::Client)?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn post_message_url(&self) -> String {
        format!("{}/chat.postMessage", self.base_url)
    }
}

impl MessageSender for SlackSender {
    fn send(
        &self,
        credential: &str,
        destination: &str,
        body: &FormattedMessage,
    ) -> Result<SendReceipt, SendError> {
        let url = self.post_message_url();
        let request = PostMessageRequest {
            channel: destination,
            text: &body.fallback,
            blocks: &body.blocks,
            as_user: true,
        };

        debug!(url = %url, channel = %destination, "posting message");
        let response = self
            .client
            .post(&url)
            .bearer_auth(credential)
            .json(&request)
            .send()
            .map_err(|source| SendError::Http {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        let text = response.text().map_err(|source| SendError::Http {
            url: url.clone(),
            source,
        })?;
        debug!(status = %status, "slack responded");

        let receipt = parse_post_message_response(&text)?;
        info!(channel = %receipt.channel, ts = %receipt.timestamp, "message delivered");
        Ok(receipt)
    }
}

/// Interpret a `chat.postMessage` response body.
fn parse_post_message_response(body: &str) -> Result<SendReceipt, SendError> {
    let response: PostMessageResponse = serde_json::from_str(body).map_err(SendError::Decode)?;
    if !response.ok {
        return Err(SendError::Api(
            response.error.unwrap_or_else(|| "unknown_error".to_string()),
        ));
    }
    Ok(SendReceipt {
        channel: response.channel.unwrap_or_default(),
        timestamp: response.ts.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ok_response() {
        let body = r#"{"ok":true,"channel":"C024BE91L","ts":"1401383885.000061","message":{}}"#;
        let receipt = parse_post_message_response(body).unwrap();
        assert_eq!(
            receipt,
            SendReceipt {
                channel: "C024BE91L".to_string(),
                timestamp: "1401383885.000061".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_api_error() {
        let body = r#"{"ok":false,"error":"channel_not_found"}"#;
        match parse_post_message_response(body) {
            Err(SendError::Api(code)) => assert_eq!(code, "channel_not_found"),
            other => panic!("expected Api error, got {other:?}"),
        }

        match parse_post_message_response(r#"{"ok":false}"#) {
            Err(SendError::Api(code)) => assert_eq!(code, "unknown_error"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            parse_post_message_response("<html>bad gateway</html>"),
            Err(SendError::Decode(_))
        ));
    }

    #[test]
    fn test_sender_for_adapter() {
        assert!(sender_for_adapter("slack").is_ok());
        assert!(sender_for_adapter("Slack").is_ok());
        match sender_for_adapter("teams") {
            Err(NotifyError::UnsupportedAdapter(name)) => assert_eq!(name, "teams"),
            Err(other) => panic!("expected UnsupportedAdapter, got {other:?}"),
            Ok(_) => panic!("expected UnsupportedAdapter, got a sender"),
        }
    }

    #[test]
    fn test_post_message_url_trims_slash() {
        let sender = SlackSender::with_base_url("http://localhost:9999/api/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(sender.post_message_url(), "http://localhost:9999/api/chat.postMessage");
    }

    #[test]
    fn test_request_payload_shape() {
        let blocks = vec![serde_json::json!({"type": "divider"})];
        let request = PostMessageRequest {
            channel: "#general",
            text: "hi",
            blocks: &blocks,
            as_user: true,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["channel"], "#general");
        assert_eq!(value["text"], "hi");
        assert_eq!(value["as_user"], true);
        assert_eq!(value["blocks"][0]["type"], "divider");
    }
}
