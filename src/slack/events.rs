//! Normalization of slack-morphism message events into the router's shape.

use serde_json::Value;
use slack_morphism::events::{SlackMessageEvent, SlackMessageEventType};

/// One inbound chat event, immutable once received.
///
/// `(channel, event_ts)` is the dedup key; `thread_ts` anchors replies.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    pub channel: String,
    pub event_ts: String,
    pub thread_ts: String,
    /// True for `message_changed` deliveries, e.g. link-preview edits
    /// Slack generates after unfurling a posted URL.
    pub is_edit: bool,
    /// Raw rich-text block tree; link extraction walks this.
    pub blocks: Vec<Value>,
}

impl InboundEvent {
    /// Build from a Socket Mode message event. Returns `None` for events
    /// without a channel (nothing to reply into).
    #[must_use]
    pub fn from_message_event(event: &SlackMessageEvent) -> Option<Self> {
        let channel = event.origin.channel.as_ref()?.to_string();
        let event_ts = event.origin.ts.to_string();

        // Anchor replies to the surrounding thread when the link was posted
        // inside one, otherwise start a thread on the message itself.
        let thread_ts = event
            .origin
            .thread_ts
            .as_ref()
            .map_or_else(|| event_ts.clone(), ToString::to_string);

        let is_edit = matches!(
            event.subtype,
            Some(SlackMessageEventType::MessageChanged)
        );

        // We don't model the full block schema; keep the raw JSON tree.
        let blocks = event
            .content
            .as_ref()
            .and_then(|content| content.blocks.as_ref())
            .and_then(|blocks| serde_json::to_value(blocks).ok())
            .and_then(|value| match value {
                Value::Array(items) => Some(items),
                _ => None,
            })
            .unwrap_or_default();

        Some(Self {
            channel,
            event_ts,
            thread_ts,
            is_edit,
            blocks,
        })
    }
}
