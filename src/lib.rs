/// linkbrief - A Slack bot that summarizes and translates pages linked in chat.
///
/// The bot listens for messages over Socket Mode, extracts every hyperlink
/// from a message's rich-text blocks, fetches and extracts the linked page,
/// asks an OpenAI chat model for a summary (and a translation when the page
/// is not in the target language), and posts the result back into the
/// originating thread.
///
/// # Architecture
///
/// The system uses:
/// - slack-morphism Socket Mode for inbound Slack events
/// - openai-api-rs for the summarization model calls
/// - reqwest + html2text for page fetching and content extraction
/// - Tokio for async runtime; every in-flight event runs its own pipeline
///
/// Pipeline per link: resolve redirector → fetch → summarize → reply.
/// Duplicate event deliveries are suppressed by a bounded TTL cache, and
/// every external API call goes through a policy-driven retry executor.
// Module declarations
pub mod ai;
pub mod core;
pub mod errors;
pub mod fetch;
pub mod slack;
pub mod utils;
pub mod worker;

/// Configure structured logging for the bot process.
///
/// Call once at startup, before any events are handled.
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);

    tracing_subscriber::registry().with(fmt_layer).init();
}
