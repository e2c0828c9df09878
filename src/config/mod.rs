pub mod log_level;

use std::path::Path;

use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_bool_from_anything;

use crate::config::log_level::LogLevel;
use crate::dogstatsd::constants::DEFAULT_BUFFER_SIZE;

pub const CONFIG_FILE_NAME: &str = "datadog.yaml";

/// Runtime settings. The listening address is not part of it, the listener
/// always binds `DOGSTATSD_HOST:DOGSTATSD_PORT`.
#[derive(Debug, PartialEq, Eq, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct Config {
    pub log_level: LogLevel,
    /// Receive buffer size in bytes, longer datagrams are invalid. Zero is
    /// replaced by the default when the listener binds.
    pub dogstatsd_buffer_size: usize,
    /// Log every valid datagram at info level.
    #[serde(deserialize_with = "deserialize_bool_from_anything")]
    pub dogstatsd_log_received: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: LogLevel::default(),
            dogstatsd_buffer_size: DEFAULT_BUFFER_SIZE,
            dogstatsd_log_received: false,
        }
    }
}

#[derive(Debug, PartialEq, thiserror::Error)]
#[allow(clippy::module_name_repetitions)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    ParseError(String),
}

/// Load `datadog.yaml` from `config_directory`, overridden by `DATADOG_` and
/// then `DD_` prefixed environment variables. A missing file is not an error.
#[allow(clippy::module_name_repetitions)]
pub fn get_config(config_directory: &Path) -> Result<Config, ConfigError> {
    let path = config_directory.join(CONFIG_FILE_NAME);

    let figment = Figment::new()
        .merge(Yaml::file(&path))
        .merge(Env::prefixed("DATADOG_"))
        .merge(Env::prefixed("DD_"));

    figment
        .extract::<Config>()
        .map_err(|err| ConfigError::ParseError(err.to_string()))
}
