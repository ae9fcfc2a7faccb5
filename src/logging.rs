use crate::config::LoggingConfig;

/// Installs an `env_logger` backend. `RUST_LOG` wins over the configured level.
pub fn init_logging(config: &LoggingConfig) -> Result<(), log::SetLoggerError> {
    let env = env_logger::Env::default().default_filter_or(config.level.as_str());
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init()
}
