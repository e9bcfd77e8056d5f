//! Shared utilities for the court bot.

pub mod logging;
pub mod time;

pub use logging::{init_logging, LogFormat};
pub use time::{format_hours, Clock, SystemClock};
