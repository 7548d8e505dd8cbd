use std::env;

/// Default ISO 639-1 language the bot summarizes into.
pub const DEFAULT_TARGET_LANG: &str = "ja";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub slack_bot_token: String,
    pub slack_app_token: String,
    pub openai_api_key: String,
    pub openai_model: Option<String>,
    /// ISO 639-1 code; pages already in this language are not translated.
    pub target_lang: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            slack_bot_token: env::var("SLACK_BOT_TOKEN")
                .map_err(|e| format!("SLACK_BOT_TOKEN: {}", e))?,
            slack_app_token: env::var("SLACK_APP_TOKEN")
                .map_err(|e| format!("SLACK_APP_TOKEN: {}", e))?,
            openai_api_key: env::var("OPENAI_API_KEY")
                .map_err(|e| format!("OPENAI_API_KEY: {}", e))?,
            openai_model: env::var("OPENAI_MODEL").ok(),
            target_lang: env::var("TARGET_LANG").unwrap_or_else(|_| DEFAULT_TARGET_LANG.to_string()),
        })
    }
}
