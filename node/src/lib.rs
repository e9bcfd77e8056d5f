//! Court bot runtime: configuration, command routing, transports and
//! process lifecycle around the vote engine.
//!
//! Updates arrive by long polling or by webhook and are funnelled through
//! one channel into the [`Dispatcher`], which owns the vote manager.

pub mod bot;
pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod polling;
pub mod records;
pub mod server;
pub mod shutdown;
pub mod text;

pub use bot::{open_record_store, CourtBot};
pub use commands::Command;
pub use config::{BotConfig, BotMode};
pub use dispatcher::Dispatcher;
pub use error::NodeError;
pub use metrics::BotMetrics;
pub use records::records_reply;
pub use shutdown::ShutdownController;
