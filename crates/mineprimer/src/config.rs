//! Server settings loaded from the environment.

use std::time::Duration;

use crate::connection::ServerInfo;
use crate::utils::{EnvError, env_opt_bool, env_string, env_u32};

/// Default listen address.
const DEFAULT_ADDR: &str = "0.0.0.0:25565";

/// Default per-connection deadline, in seconds.
const DEFAULT_TIMEOUT_SECS: u32 = 10;

/// Runtime settings for the server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to listen on (`ADDR`)
    pub listen_addr: String,
    /// Time a connection may stay open (`CONNECTION_TIMEOUT_SECS`)
    pub timeout: Duration,
    /// Status fields (`VERSION_NAME`, `MOTD`, `MAX_PLAYERS`, `ENFORCES_SECURE_CHAT`)
    pub info: ServerInfo,
}

impl Config {
    /// Load settings from environment variables, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error naming the variable if any value is invalid.
    pub fn from_env() -> Result<Self, EnvError> {
        let defaults = ServerInfo::default();

        let timeout_secs = env_u32("CONNECTION_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err("CONNECTION_TIMEOUT_SECS: must be greater than 0".into());
        }

        Ok(Self {
            listen_addr: env_string("ADDR", DEFAULT_ADDR)?,
            timeout: Duration::from_secs(u64::from(timeout_secs)),
            info: ServerInfo {
                version_name: env_string("VERSION_NAME", &defaults.version_name)?,
                motd: env_string("MOTD", &defaults.motd)?,
                max_players: env_u32("MAX_PLAYERS", defaults.max_players)?,
                enforces_secure_chat: env_opt_bool("ENFORCES_SECURE_CHAT")?,
            },
        })
    }
}
