//! Slack chat-post client.
//!
//! Replies go out as raw `chat.postMessage` calls so the thread anchor and
//! broadcast flag can be set directly; slack-morphism stays in charge of the
//! Socket Mode event transport.

use once_cell::sync::Lazy;
use reqwest::Client;
use serde_json::{Value, json};
use std::future::Future;
use std::time::Duration;

use crate::errors::BotError;

const POST_TIMEOUT: Duration = Duration::from_secs(10);

const CHAT_POST_MESSAGE_URL: &str = "https://slack.com/api/chat.postMessage";

static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(POST_TIMEOUT)
        .build()
        .unwrap_or_else(|_| Client::new())
});

/// Posting seam the reply dispatcher depends on, so delivery behavior can be
/// exercised without a live workspace.
pub trait ChatPoster {
    /// Post one reply segment into a thread.
    ///
    /// `broadcast` also surfaces the reply in the channel itself
    /// (`reply_broadcast`), which we use for the summary segment.
    fn post_reply(
        &self,
        channel: &str,
        thread_ts: &str,
        text: &str,
        broadcast: bool,
    ) -> impl Future<Output = Result<(), BotError>> + Send;
}

/// Thin client around `chat.postMessage`.
pub struct SlackClient {
    bot_token: String,
    post_url: String,
}

impl SlackClient {
    #[must_use]
    pub fn new(bot_token: String) -> Self {
        Self {
            bot_token,
            post_url: CHAT_POST_MESSAGE_URL.to_string(),
        }
    }

    /// Point `chat.postMessage` somewhere else, e.g. a test server.
    #[must_use]
    pub fn with_post_url(mut self, post_url: impl Into<String>) -> Self {
        self.post_url = post_url.into();
        self
    }
}

impl ChatPoster for SlackClient {
    /// # Errors
    ///
    /// Returns `BotError::ApiError` when the request fails, the HTTP status
    /// is non-2xx, or Slack answers `ok: false`.
    async fn post_reply(
        &self,
        channel: &str,
        thread_ts: &str,
        text: &str,
        broadcast: bool,
    ) -> Result<(), BotError> {
        let mut payload = json!({
            "channel": channel,
            "text": text,
            "thread_ts": thread_ts,
        });
        if broadcast {
            payload["reply_broadcast"] = json!(true);
        }

        let resp = HTTP_CLIENT
            .post(&self.post_url)
            .bearer_auth(&self.bot_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| BotError::ApiError(format!("Failed to post thread message: {e}")))?;

        if !resp.status().is_success() {
            return Err(BotError::ApiError(format!(
                "chat.postMessage HTTP {}",
                resp.status()
            )));
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| BotError::ApiError(format!("chat.postMessage JSON parse error: {e}")))?;

        if !body.get("ok").and_then(Value::as_bool).unwrap_or(false) {
            return Err(BotError::ApiError(format!(
                "chat.postMessage error: {}",
                body.get("error")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
            )));
        }

        Ok(())
    }
}
