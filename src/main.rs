//! Socket Mode bootstrap: connect to Slack, route message events into the
//! processing pipeline.

use std::sync::Arc;

use anyhow::Result;
use slack_morphism::hyper_tokio::{SlackClientHyperConnector, SlackHyperClient};
use slack_morphism::prelude::*;
use tracing::{debug, info};

use linkbrief::core::config::AppConfig;
use linkbrief::slack::InboundEvent;
use linkbrief::worker::BotState;
use linkbrief::worker::handler::handle_message_event;

async fn handle_push_events(
    event: SlackPushEventCallback,
    _client: Arc<SlackHyperClient>,
    states: SlackClientEventsUserState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let guard = states.read().await;
    let state = guard
        .get_user_state::<Arc<BotState>>()
        .ok_or("missing bot state")?;

    match &event.event {
        SlackEventCallbackBody::Message(msg) => {
            // Skip bot-authored messages to prevent reply loops.
            if msg.sender.bot_id.is_some() {
                return Ok(());
            }

            if let Some(inbound) = InboundEvent::from_message_event(msg) {
                // Each event runs its own pipeline; the callback returns
                // immediately so slow fetches never stall the listener.
                tokio::spawn(handle_message_event(Arc::clone(state), inbound));
            }
        }
        _ => {
            debug!("ignoring event callback type");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    linkbrief::setup_logging();

    let config =
        AppConfig::from_env().map_err(|e| anyhow::anyhow!("configuration error: {}", e))?;
    let state = Arc::new(BotState::new(&config));

    let client = Arc::new(SlackHyperClient::new(SlackClientHyperConnector::new()?));

    let bot_token = SlackApiToken::new(SlackApiTokenValue::new(config.slack_bot_token.clone()));
    let session = client.open_session(&bot_token);
    let auth_test = session.auth_test().await?;
    info!(bot_user = ?auth_test.user, "slack bot authenticated");

    let app_token = SlackApiToken::new(SlackApiTokenValue::new(config.slack_app_token.clone()));

    let callbacks = SlackSocketModeListenerCallbacks::new().with_push_events(handle_push_events);
    let listener_env =
        Arc::new(SlackClientEventsListenerEnvironment::new(client.clone()).with_user_state(state));
    let socket_listener = SlackClientSocketModeListener::new(
        &SlackClientSocketModeConfig::new(),
        listener_env,
        callbacks,
    );

    socket_listener.listen_for(&app_token).await?;
    socket_listener.serve().await;

    Ok(())
}
