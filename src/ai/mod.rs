pub mod client;
pub mod response;

pub use client::LlmClient;
pub use response::{ModelOutput, ProcessedText, ReplyPayload};
