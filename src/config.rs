//! Server configuration
//!
//! Layered with figment: built-in defaults, then an optional TOML file, then
//! `ARENAD_*` environment variables, then command-line overrides.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::session::{MAX_PARTICIPANTS, MIN_PARTICIPANTS};

/// Config file read when `--config` is not given, if it exists
pub const DEFAULT_CONFIG_FILE: &str = "arenad.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "ARENAD_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Game protocol listener
    pub game_addr: SocketAddr,
    /// Operator console listener
    pub api_addr: SocketAddr,
    pub max_participants: usize,
    /// Seed for the pierce bonus generator; OS entropy when unset
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            game_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            api_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            max_participants: MAX_PARTICIPANTS,
            seed: None,
        }
    }
}

/// Values given on the command line. Unset fields leave lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_addr: Option<SocketAddr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_addr: Option<SocketAddr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Config {
    /// Load from the standard layers
    pub fn load(path: Option<&Path>, overrides: Overrides) -> Result<Self, ConfigError> {
        Self::load_with_env(path, ENV_PREFIX, overrides)
    }

    /// Load with a custom environment prefix
    pub fn load_with_env(
        path: Option<&Path>,
        env_prefix: &str,
        overrides: Overrides,
    ) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::MissingFile(path.to_path_buf()));
            }
            Some(path) => path.to_path_buf(),
            // Toml::file skips a missing file
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(env_prefix))
            .merge(Serialized::defaults(overrides))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_PARTICIPANTS..=MAX_PARTICIPANTS).contains(&self.max_participants) {
            return Err(ConfigError::MaxParticipants(self.max_participants));
        }
        Ok(())
    }
}
