//! Summarization orchestration: model call under retry, then normalization.

use std::time::Duration;

use crate::ai::response::{ReplyPayload, normalize};
use crate::ai::LlmClient;
use crate::core::retry::{self, RetryPolicy};
use crate::errors::BotError;

/// OpenAI hiccups are transient; anything else from the model call is final.
const OPENAI_RETRY: RetryPolicy = RetryPolicy {
    retry_on: BotError::is_openai,
    max_attempts: 3,
    initial_delay: Duration::from_secs(1),
    backoff_multiplier: 2.0,
};

/// Summarize extracted page text into reply segments.
///
/// Malformed model output never surfaces as an error here - normalization
/// folds it into a diagnostic reply. Only transport failures that survive
/// the retry policy propagate.
///
/// # Errors
///
/// Returns the model call's error after the retry policy is exhausted.
pub async fn summarize_page(llm: &LlmClient, page_text: &str) -> Result<ReplyPayload, BotError> {
    let output = retry::execute(&OPENAI_RETRY, || llm.request_processed_text(page_text)).await?;

    Ok(normalize(&output, llm.target_lang()))
}
