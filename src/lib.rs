// tradebot-config - configuration state for the Telegram order bot
//
// This is the library crate: loading, normalizing and safely persisting the
// bot's YAML configuration and its allow/deny lists.
// The binary crate (main.rs) loads and reports the configuration at startup.

pub mod config;
pub mod error;
pub mod logging;
pub mod models;

// Re-export commonly used types for convenience
pub use config::{BackupPolicy, ConfigStore, ListStore};
pub use error::ConfigError;
pub use models::{Configuration, ListingSetting, OrderValue, RuntimeContext, Settings};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
