//! Normalization of the two shapes of model output into one reply contract.
//!
//! The model may answer through the offered function call or as free-form
//! JSON text; both carry the same structured shape. Unparsable output is
//! surfaced to the thread as a diagnostic rather than silently dropped, so
//! a misbehaving model is visible to the humans reading the channel.

use serde::Deserialize;
use tracing::warn;

pub const SUMMARY_HEADER: &str = "*Summary*";
pub const TRANSLATION_HEADER: &str = "*Translation*";

/// How the model chose to answer.
#[derive(Debug, Clone)]
pub enum ModelOutput {
    /// The model invoked `reply_processed_text` with a JSON argument payload.
    FunctionCall { arguments: String },
    /// The model answered with free-form text content.
    Inline { content: String },
}

/// The structured reply shape both answer channels carry.
#[derive(Debug, Deserialize)]
pub struct ProcessedText {
    pub summary: String,
    /// ISO 639-1 language of the page body, as detected by the model.
    pub language: Option<String>,
    pub body_translated: Option<String>,
}

/// Display-ready reply segments bound for the originating thread.
///
/// Segments are independent: a failure posting one must not block the other.
#[derive(Debug, Default)]
pub struct ReplyPayload {
    pub summary: Option<String>,
    pub body: Option<String>,
}

/// Reconcile a model answer into reply segments.
///
/// Exactly one of three paths runs: the function-argument parse, the
/// inline-JSON parse, or the parse-failure fallback that echoes the raw
/// offending content back into the thread. Never fails.
#[must_use]
pub fn normalize(output: &ModelOutput, target_lang: &str) -> ReplyPayload {
    let raw = match output {
        ModelOutput::FunctionCall { arguments } => arguments,
        ModelOutput::Inline { content } => content,
    };

    match serde_json::from_str::<ProcessedText>(raw) {
        Ok(args) => format_reply(&args, target_lang),
        Err(e) => {
            warn!("unparsable model reply ({}): {}", e, raw);
            ReplyPayload {
                summary: None,
                body: Some(format!("Parse `content` failed: ```{}```", raw)),
            }
        }
    }
}

/// Render the structured reply into display-ready segments.
///
/// The translation segment is included only when the model actually supplied
/// a translated body and the detected language differs from the target.
#[must_use]
pub fn format_reply(args: &ProcessedText, target_lang: &str) -> ReplyPayload {
    let summary = format!("{}\n{}", SUMMARY_HEADER, args.summary);

    let body = if args.language.as_deref() == Some(target_lang) {
        None
    } else {
        args.body_translated
            .as_ref()
            .map(|body| format!("{}\n{}", TRANSLATION_HEADER, body))
    };

    ReplyPayload {
        summary: Some(summary),
        body,
    }
}
