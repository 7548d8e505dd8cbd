use openai_api_rs::v1::error::APIError;
use slack_morphism::errors::SlackClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("Failed to parse Slack event: {0}")]
    ParseError(String),

    #[error("Failed to access Slack API: {0}")]
    ApiError(String),

    #[error("Failed to access OpenAI API: {0}")]
    OpenAIError(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),
}

impl BotError {
    /// Transient OpenAI-service failures; the model-call retry policy keys on this.
    #[must_use]
    pub fn is_openai(&self) -> bool {
        matches!(self, BotError::OpenAIError(_))
    }

    /// Slack platform failures; the chat-post retry policy keys on this.
    #[must_use]
    pub fn is_slack_api(&self) -> bool {
        matches!(self, BotError::ApiError(_))
    }
}

impl From<SlackClientError> for BotError {
    fn from(error: SlackClientError) -> Self {
        BotError::ApiError(error.to_string())
    }
}

impl From<reqwest::Error> for BotError {
    fn from(error: reqwest::Error) -> Self {
        BotError::HttpError(error.to_string())
    }
}

impl From<APIError> for BotError {
    fn from(error: APIError) -> Self {
        BotError::OpenAIError(format!("OpenAI API error: {}", error))
    }
}
