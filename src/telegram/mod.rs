//! Telegram transport: inbound schema and outbound delivery

pub mod bot;
pub mod types;

pub use bot::TelegramBot;
pub use types::{ChatRef, IncomingMessage, Sender, Update};
