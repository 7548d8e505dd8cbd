pub mod deliver;
pub mod handler;
pub mod summarize;

pub use handler::BotState;
