//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use pool_arena::ArenaConfig;
use std::net::SocketAddr;

/// Default bind address
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Seconds between schedule clock passes
    pub clock_interval_secs: u64,
    /// Prometheus scrape address, metrics disabled when unset
    pub metrics_bind: Option<SocketAddr>,
    /// Tournament rules
    pub arena: ArenaConfig,
}

/// Values supplied on the command line, taking precedence over the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bind: Option<SocketAddr>,
    pub clock_interval_secs: Option<u64>,
    pub metrics_bind: Option<SocketAddr>,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// Reads `SERVER_BIND`, `CLOCK_INTERVAL_SECS`, `METRICS_BIND` and the
    /// `ARENA_*` rule variables.
    ///
    /// # Errors
    ///
    /// Returns error if a set variable cannot be parsed
    pub fn from_env(overrides: Overrides) -> Result<Self, ConfigError> {
        let bind = match overrides.bind {
            Some(bind) => bind,
            None => parse_addr_env("SERVER_BIND")?.map_or_else(default_bind, Ok)?,
        };

        let clock_interval_secs = overrides
            .clock_interval_secs
            .unwrap_or_else(|| parse_env_or("CLOCK_INTERVAL_SECS", 1));

        let metrics_bind = match overrides.metrics_bind {
            Some(addr) => Some(addr),
            None => parse_addr_env("METRICS_BIND")?,
        };

        let arena = ArenaConfig::from_env()?;

        Ok(ServerConfig {
            bind,
            clock_interval_secs,
            metrics_bind,
            arena,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clock_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "CLOCK_INTERVAL_SECS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.metrics_bind == Some(self.bind) {
            return Err(ConfigError::Invalid {
                var: "METRICS_BIND".to_string(),
                reason: format!("Must differ from SERVER_BIND ({})", self.bind),
            });
        }

        self.arena.validate()?;

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },

    #[error(transparent)]
    Arena(#[from] pool_arena::ConfigError),
}

fn default_bind() -> Result<SocketAddr, ConfigError> {
    DEFAULT_BIND.parse().map_err(|e| ConfigError::Invalid {
        var: "SERVER_BIND".to_string(),
        reason: format!("{}", e),
    })
}

/// Parse an address variable, rejecting values that are set but malformed
fn parse_addr_env(key: &str) -> Result<Option<SocketAddr>, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw.parse().map(Some).map_err(|_| ConfigError::Invalid {
            var: key.to_string(),
            reason: format!("'{}' is not a socket address", raw),
        }),
        Err(_) => Ok(None),
    }
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
