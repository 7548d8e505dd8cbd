//! OpenAI API client module
//!
//! Builds the summarize-and-translate prompt and tool schema, performs the
//! chat completion, and classifies the reply for normalization.

use std::collections::HashMap;

use openai_api_rs::v1::api::OpenAIClient;
use openai_api_rs::v1::chat_completion::{
    ChatCompletionMessage, ChatCompletionRequest, Content, MessageRole, Tool, ToolChoiceType,
    ToolType,
};
use openai_api_rs::v1::common::GPT4_O;
use openai_api_rs::v1::types::{Function, FunctionParameters, JSONSchemaDefine, JSONSchemaType};
use serde_json::json;

use crate::ai::response::ModelOutput;
use crate::errors::BotError;

/// Function the model may invoke to return the structured answer.
pub const REPLY_FUNCTION: &str = "reply_processed_text";

/// Translated bodies are cut off past this many characters.
pub const MAX_TRANSLATED_CHARS: usize = 1000;

const MODEL_TIMEOUT_SECS: u64 = 60;

/// OpenAI API client for page summarization.
pub struct LlmClient {
    api_key: String,
    model: String,
    target_lang: String,
    api_base: Option<String>,
}

impl LlmClient {
    #[must_use]
    pub fn new(api_key: String, model: Option<String>, target_lang: String) -> Self {
        Self {
            api_key,
            model: model.unwrap_or_else(|| GPT4_O.to_string()),
            target_lang,
            api_base: None,
        }
    }

    /// Point the client at an OpenAI-compatible endpoint, e.g. a test server.
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    #[must_use]
    pub fn target_lang(&self) -> &str {
        &self.target_lang
    }

    #[must_use]
    pub fn build_prompt(&self, page_text: &str) -> String {
        format!(
            r#"### Task

You are a professional at summarizing and translating web pages.

- Summarize the given page text.
  - Too short is not acceptable.
  - Do not over-condense it.
- If the body is not in "{lang}", translate it into "{lang}".
  - Omit any translated portion beyond {max_chars} characters.
- Include no text besides the summarized and translated content.

### Response format (JSON)

{{
    "summary": "summary of the page content",
    "language": "ISO 639-1 language of the page body",
    "body_translated": "page body translated into \"{lang}\" (only when the source language differs)"
}}

### Content to summarize

{page_text}
"#,
            lang = self.target_lang,
            max_chars = MAX_TRANSLATED_CHARS,
        )
    }

    fn reply_function(&self) -> Tool {
        let mut properties: HashMap<String, Box<JSONSchemaDefine>> = HashMap::new();
        properties.insert(
            "summary".to_string(),
            Box::new(JSONSchemaDefine {
                schema_type: Some(JSONSchemaType::String),
                description: Some("Summary of the page content".to_string()),
                enum_values: None,
                properties: None,
                items: None,
                required: None,
            }),
        );
        properties.insert(
            "language".to_string(),
            Box::new(JSONSchemaDefine {
                schema_type: Some(JSONSchemaType::String),
                description: Some("ISO 639-1 language of the page body".to_string()),
                enum_values: None,
                properties: None,
                items: None,
                required: None,
            }),
        );
        properties.insert(
            "body_translated".to_string(),
            Box::new(JSONSchemaDefine {
                schema_type: Some(JSONSchemaType::String),
                description: Some(format!(
                    "Page body translated into \"{}\" (only when the source language differs)",
                    self.target_lang
                )),
                enum_values: None,
                properties: None,
                items: None,
                required: None,
            }),
        );

        Tool {
            r#type: ToolType::Function,
            function: Function {
                name: REPLY_FUNCTION.to_string(),
                description: Some("Reply with the processed page content".to_string()),
                parameters: FunctionParameters {
                    schema_type: JSONSchemaType::Object,
                    properties: Some(properties),
                    required: Some(vec!["summary".to_string(), "language".to_string()]),
                },
            },
        }
    }

    /// One chat completion for `page_text`, classified as either a function
    /// invocation of [`REPLY_FUNCTION`] or the model's free-form content.
    ///
    /// # Errors
    ///
    /// Returns `BotError::OpenAIError` when the API call fails or the
    /// response carries no choices; transient failures are the caller's
    /// retry policy to handle.
    pub async fn request_processed_text(&self, page_text: &str) -> Result<ModelOutput, BotError> {
        let request = ChatCompletionRequest::new(
            self.model.clone(),
            vec![ChatCompletionMessage {
                role: MessageRole::system,
                content: Content::Text(self.build_prompt(page_text)),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            }],
        )
        .tools(vec![self.reply_function()])
        .tool_choice(ToolChoiceType::Auto)
        .response_format(json!({"type": "json_object"}));

        let mut builder = OpenAIClient::builder()
            .with_api_key(self.api_key.clone())
            .with_timeout(MODEL_TIMEOUT_SECS);
        if let Some(api_base) = &self.api_base {
            builder = builder.with_endpoint(api_base.clone());
        }
        let mut client = builder
            .build()
            .map_err(|e| BotError::OpenAIError(format!("Failed to create OpenAI client: {}", e)))?;

        let result = client.chat_completion(request).await?;

        let message = result
            .choices
            .first()
            .map(|choice| &choice.message)
            .ok_or_else(|| BotError::OpenAIError("No choices in response".to_string()))?;

        if let Some(tool_calls) = &message.tool_calls {
            for call in tool_calls {
                if call.function.name.as_deref() == Some(REPLY_FUNCTION)
                    && let Some(arguments) = &call.function.arguments
                {
                    return Ok(ModelOutput::FunctionCall {
                        arguments: arguments.clone(),
                    });
                }
            }
        }

        Ok(ModelOutput::Inline {
            content: message
                .content
                .as_deref()
                .unwrap_or("???")
                .trim()
                .to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_page_text_and_target_language() {
        let client = LlmClient::new("key".to_string(), None, "ja".to_string());
        let prompt = client.build_prompt("Hello from the page body.");
        assert!(prompt.contains("Hello from the page body."));
        assert!(prompt.contains("\"ja\""));
        assert!(prompt.contains("1000 characters"));
    }

    #[test]
    fn reply_function_schema_requires_summary_and_language() {
        let client = LlmClient::new("key".to_string(), None, "ja".to_string());
        let tool = client.reply_function();
        assert_eq!(tool.function.name, REPLY_FUNCTION);
        assert_eq!(
            tool.function.parameters.required,
            Some(vec!["summary".to_string(), "language".to_string()])
        );
    }
}
