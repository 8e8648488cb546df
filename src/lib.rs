//! Telegram front end for the Offline Games mini-app.
//!
//! Answers `/start` and `/game` with a keyboard that launches the mini-app,
//! and everything else with a short help text.

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use application::errors::{BotError, CommandError, ConfigError};
pub use application::messaging::MessageDispatcher;
pub use application::services::{CommandService, MenuService};
pub use infrastructure::config::Config;
