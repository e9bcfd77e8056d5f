//! Telegram Bot API transport.
//!
//! [`TelegramClient`] speaks the handful of Bot API methods the court bot
//! needs and implements [`court_votes::Notifier`]. [`types`] holds the subset
//! of the update schema the bot reads.

pub mod client;
pub mod error;
pub mod types;

pub use client::TelegramClient;
pub use error::TelegramError;
pub use types::{Chat, Message, Update, User};
