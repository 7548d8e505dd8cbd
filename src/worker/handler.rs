//! Top-level event routing: dedup, link extraction, per-link pipelines.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, error, info};

use crate::ai::LlmClient;
use crate::core::config::AppConfig;
use crate::core::dedup::DedupCache;
use crate::errors::BotError;
use crate::fetch::fetch_page;
use crate::slack::{InboundEvent, SlackClient};
use crate::utils::links::{extract_links_from_blocks, resolve_redirect};
use crate::worker::deliver::deliver_reply;
use crate::worker::summarize::summarize_page;

/// Slack redelivers within about a minute; entries past that are dead weight.
const DEDUP_TTL: Duration = Duration::from_secs(60);
const DEDUP_CAPACITY: usize = 100;

/// Everything the pipeline needs, constructed once at startup and shared by
/// every in-flight event.
pub struct BotState {
    pub dedup: DedupCache,
    pub llm: LlmClient,
    pub slack: SlackClient,
}

impl BotState {
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        Self {
            dedup: DedupCache::new(DEDUP_CAPACITY, DEDUP_TTL),
            llm: LlmClient::new(
                config.openai_api_key.clone(),
                config.openai_model.clone(),
                config.target_lang.clone(),
            ),
            slack: SlackClient::new(config.slack_bot_token.clone()),
        }
    }
}

/// Handle one inbound message event.
///
/// Link-preview edits and duplicate deliveries exit silently. Every link in
/// the message runs its own pipeline; one link's failure is logged without
/// aborting its siblings.
pub async fn handle_message_event(state: Arc<BotState>, event: InboundEvent) {
    if event.is_edit {
        return;
    }

    if !state.dedup.should_process(&event.channel, &event.event_ts) {
        debug!(
            "skipping duplicate event {} in {}",
            event.event_ts, event.channel
        );
        return;
    }

    let links = extract_links_from_blocks(&event.blocks);

    let pipelines = links.into_iter().map(|url| {
        let state = Arc::clone(&state);
        let event = event.clone();
        async move {
            if let Err(e) = process_link(&state, &event, &url).await {
                error!("Failed to process link {}: {}", url, e);
            }
        }
    });

    join_all(pipelines).await;
}

/// Resolve, fetch, summarize, and reply for a single link.
async fn process_link(state: &BotState, event: &InboundEvent, url: &str) -> Result<(), BotError> {
    let url = resolve_redirect(url);
    info!("Processing link: {}", url);

    let page = fetch_page(&url).await?;
    if let Some(title) = &page.title {
        info!("Title: {}", title);
    }

    let payload = summarize_page(&state.llm, &page.text).await?;

    deliver_reply(&state.slack, &event.channel, &event.thread_ts, &payload).await
}
