//! TOML configuration for the widget core.

mod error;
mod load;
mod paths;
mod save;
mod types;

pub use error::ConfigError;
pub use load::{load_config, LoadedConfig, WEBHOOK_URL_ENV};
pub use paths::ConfigPaths;
pub use save::save_config;
pub use types::{AppConfig, InputConfig, LoggingConfig, WebhookConfig};
