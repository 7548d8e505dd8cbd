pub mod client;
pub mod events;

pub use client::{ChatPoster, SlackClient};
pub use events::InboundEvent;
