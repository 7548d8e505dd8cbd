//! Delivery of reply segments back into the originating thread.

use std::time::Duration;

use tracing::error;

use crate::ai::response::ReplyPayload;
use crate::core::retry::{self, RetryPolicy};
use crate::errors::BotError;
use crate::slack::ChatPoster;

/// Slack platform rejections are retried; fetch-side errors never reach here.
const SLACK_RETRY: RetryPolicy = RetryPolicy {
    retry_on: BotError::is_slack_api,
    max_attempts: 3,
    initial_delay: Duration::from_secs(1),
    backoff_multiplier: 2.0,
};

/// Post the payload's segments into the thread.
///
/// The summary segment is broadcast to the channel; the translation segment
/// is a plain thread reply. Each post is independent - a failure on one is
/// logged and the other is still attempted, with the first error reported
/// afterwards.
///
/// # Errors
///
/// Returns the first segment error after its retry policy is exhausted.
pub async fn deliver_reply(
    slack: &impl ChatPoster,
    channel: &str,
    thread_ts: &str,
    payload: &ReplyPayload,
) -> Result<(), BotError> {
    let mut first_err: Option<BotError> = None;

    if let Some(summary) = &payload.summary
        && let Err(e) = retry::execute(&SLACK_RETRY, || {
            slack.post_reply(channel, thread_ts, summary, true)
        })
        .await
    {
        error!("Failed to post summary to {}: {}", channel, e);
        first_err = Some(e);
    }

    if let Some(body) = &payload.body
        && let Err(e) = retry::execute(&SLACK_RETRY, || {
            slack.post_reply(channel, thread_ts, body, false)
        })
        .await
    {
        error!("Failed to post translation to {}: {}", channel, e);
        first_err = first_err.or(Some(e));
    }

    match first_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
