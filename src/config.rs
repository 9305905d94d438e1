//! Service configuration.
//!
//! Values come from, in increasing precedence: built-in defaults, an
//! optional TOML file, then environment variables (`HOST`, `PORT`,
//! `DEFAULT_ATTEMPT_LIMIT`, `ALLOWED_ORIGINS`). `.env` files are loaded by
//! the binary before this module reads the environment.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use strictly_bulls_cows::AttemptLimit;
use tracing::{debug, info, instrument};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "strictly_bulls.toml";

/// Configuration for the game service and its clients.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind to.
    #[serde(default = "default_port")]
    port: u16,

    /// Attempt limit used when `/start` is called without one.
    #[serde(default)]
    default_attempt_limit: AttemptLimit,

    /// Seconds between liveness probes sent by clients.
    #[serde(default = "default_heartbeat_interval_secs")]
    heartbeat_interval_secs: u64,

    /// Origins allowed to call the API from a browser. Empty disables CORS.
    #[serde(default)]
    allowed_origins: Vec<String>,
}

#[instrument]
fn default_host() -> String {
    "127.0.0.1".to_string()
}

#[instrument]
fn default_port() -> u16 {
    3000
}

#[instrument]
fn default_heartbeat_interval_secs() -> u64 {
    120
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            default_attempt_limit: AttemptLimit::default(),
            heartbeat_interval_secs: default_heartbeat_interval_secs(),
            allowed_origins: Vec::new(),
        }
    }
}

impl ServiceConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Loads the file at `path` (or the default file if present), then
    /// applies environment overrides.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => {
                debug!("No config file, using defaults");
                Self::default()
            }
        };

        config.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from a key lookup (normally the process environment).
    #[instrument(skip(self, lookup))]
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(host) = lookup("HOST") {
            debug!(%host, "Overriding host");
            self.host = host;
        }

        if let Some(port) = lookup("PORT") {
            self.port = port
                .trim()
                .parse()
                .map_err(|e| ConfigError::new(format!("Invalid PORT {:?}: {}", port, e)))?;
        }

        if let Some(limit) = lookup("DEFAULT_ATTEMPT_LIMIT") {
            let raw: u32 = limit.trim().parse().map_err(|e| {
                ConfigError::new(format!("Invalid DEFAULT_ATTEMPT_LIMIT {:?}: {}", limit, e))
            })?;
            self.default_attempt_limit = AttemptLimit::try_from(raw)
                .map_err(|e| ConfigError::new(e.to_string()))?;
        }

        if let Some(origins) = lookup("ALLOWED_ORIGINS") {
            self.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
            debug!(count = self.allowed_origins.len(), "Overriding allowed origins");
        }

        Ok(self)
    }

    /// Replaces host and port, e.g. from command-line flags.
    pub fn with_bind(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Interval between liveness probes.
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs.max(1))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
