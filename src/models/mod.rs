//! Data models for the configuration store.
//!
//! The on-disk document and the values computed at load time are kept apart:
//! - [`Settings`]: the persisted schema read from and written to `config.yaml`
//! - [`RuntimeContext`]: filesystem locations resolved when the document is loaded
//! - [`Configuration`]: both of the above, handed to the rest of the application
//!
//! Only [`Settings`] is ever serialized. The allow/deny list entries live on
//! [`ListingSetting`] in memory but are skipped by serde and persisted through
//! [`ListStore`](crate::config::ListStore) instead.

pub mod runtime;
pub mod settings;

pub use runtime::{Configuration, RuntimeContext};
pub use settings::{ListingSetting, OrderValue, Settings, TelegramSetting};
