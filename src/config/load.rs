use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::error::ConfigError;
use super::paths::ConfigPaths;
use super::types::AppConfig;

/// Overrides `webhook.base_url` when set and non-empty.
pub const WEBHOOK_URL_ENV: &str = "WEBCHAT_WEBHOOK_URL";

#[derive(Debug)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub paths: ConfigPaths,
    /// False when defaults were used because no file was found
    pub config_exists: bool,
}

/// Resolves the config location, reads it if present and applies
/// environment overrides on top.
pub fn load_config(path_override: Option<PathBuf>) -> Result<LoadedConfig, ConfigError> {
    let paths = ConfigPaths::resolve(path_override)?;
    let stored = read_config(&paths.config_file)?;
    let config_exists = stored.is_some();
    let mut config = stored.unwrap_or_else(|| {
        log::debug!("no config at {}, using defaults", paths.config_file.display());
        AppConfig::default()
    });
    apply_env_overrides(&mut config, std::env::var(WEBHOOK_URL_ENV).ok());
    Ok(LoadedConfig {
        config,
        paths,
        config_exists,
    })
}

/// Parses the file at `path`; `None` when it does not exist.
fn read_config(path: &Path) -> Result<Option<AppConfig>, ConfigError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    toml::from_str(&contents)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn apply_env_overrides(config: &mut AppConfig, webhook_url: Option<String>) {
    if let Some(url) = webhook_url.filter(|url| !url.trim().is_empty()) {
        config.webhook.base_url = url;
    }
}
