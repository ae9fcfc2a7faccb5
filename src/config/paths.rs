use std::path::{Path, PathBuf};

use super::error::ConfigError;

const APP_DIR: &str = "webchat";
const CONFIG_FILE: &str = "config.toml";
const PREFERENCES_FILE: &str = "preferences.json";

/// Where the config file and the per-user data live.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_file: PathBuf,
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl ConfigPaths {
    /// `~/.config/webchat/config.toml` unless a file is given explicitly, in
    /// which case its directory becomes the config directory. Data always
    /// goes to `~/.local/share/webchat`.
    pub fn resolve(config_override: Option<PathBuf>) -> Result<Self, ConfigError> {
        let (config_file, config_dir) = match config_override {
            Some(file) => {
                let dir = override_dir(&file)?;
                (file, dir)
            }
            None => {
                let dir = under_home(&[".config"])?;
                (dir.join(CONFIG_FILE), dir)
            }
        };
        Ok(Self {
            config_file,
            config_dir,
            data_dir: under_home(&[".local", "share"])?,
        })
    }

    /// Keeps everything under one directory; used by tests and portable installs.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            config_file: dir.join(CONFIG_FILE),
            config_dir: dir.to_path_buf(),
            data_dir: dir.to_path_buf(),
        }
    }

    /// File holding the persisted theme preference.
    pub fn preferences_file(&self) -> PathBuf {
        self.data_dir.join(PREFERENCES_FILE)
    }
}

/// Directory of an explicit config file; a bare file name lives in the
/// working directory.
fn override_dir(file: &Path) -> Result<PathBuf, ConfigError> {
    if file.file_name().is_none() {
        return Err(ConfigError::InvalidPath(file.to_path_buf()));
    }
    match file.parent() {
        Some(dir) if dir.as_os_str().is_empty() => Ok(PathBuf::from(".")),
        Some(dir) => Ok(dir.to_path_buf()),
        None => Err(ConfigError::InvalidPath(file.to_path_buf())),
    }
}

fn under_home(segments: &[&str]) -> Result<PathBuf, ConfigError> {
    let mut dir = dirs::home_dir().ok_or(ConfigError::MissingHome)?;
    dir.extend(segments);
    dir.push(APP_DIR);
    Ok(dir)
}
