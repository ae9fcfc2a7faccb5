use std::fs;

use super::error::ConfigError;
use super::paths::ConfigPaths;
use super::types::AppConfig;

pub fn save_config(config: &AppConfig, paths: &ConfigPaths) -> Result<(), ConfigError> {
    let contents = toml::to_string_pretty(config)?;
    fs::create_dir_all(&paths.config_dir)
        .and_then(|()| fs::write(&paths.config_file, contents))
        .map_err(|source| ConfigError::Write {
            path: paths.config_file.clone(),
            source,
        })?;
    log::debug!("saved config to {}", paths.config_file.display());
    Ok(())
}
