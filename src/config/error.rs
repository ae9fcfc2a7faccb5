use std::io;
use std::path::PathBuf;

/// Failures while locating, reading or writing the webchat config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read webchat config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid webchat config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("cannot write webchat config {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot serialize webchat config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// An explicit config path that names no file inside a directory
    #[error("config path {} does not name a file", .0.display())]
    InvalidPath(PathBuf),
    #[error("no home directory to place webchat config and data under")]
    MissingHome,
}
