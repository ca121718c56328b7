use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Configuration errors surfaced at startup, before the server binds.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} environment variable not set")]
    Missing { name: &'static str },

    #[error("{name} must not be empty")]
    Empty { name: &'static str },

    #[error("{name} has invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Environment-driven server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Shared upstream credential for the FRED API.
    pub fred_api_key: String,
    pub bind_addr: SocketAddr,
    /// Credential store location; `None` selects the in-memory store.
    pub db_path: Option<PathBuf>,
    /// Per-call upstream deadline.
    pub upstream_timeout_ms: u64,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let fred_api_key = required("FRED_API_KEY")?;

        let bind_addr = match std::env::var("FREDGATE_BIND") {
            Ok(raw) => raw.parse().map_err(|error| ConfigError::Invalid {
                name: "FREDGATE_BIND",
                value: raw,
                reason: format!("{error}"),
            })?,
            Err(_) => SocketAddr::from(([127, 0, 0, 1], 8080)),
        };

        let db_path = std::env::var("FREDGATE_DB").ok().map(PathBuf::from);

        let upstream_timeout_ms = match std::env::var("FREDGATE_UPSTREAM_TIMEOUT_MS") {
            Ok(raw) => {
                let parsed: u64 = raw.parse().map_err(|error| ConfigError::Invalid {
                    name: "FREDGATE_UPSTREAM_TIMEOUT_MS",
                    value: raw.clone(),
                    reason: format!("{error}"),
                })?;
                if parsed == 0 {
                    return Err(ConfigError::Invalid {
                        name: "FREDGATE_UPSTREAM_TIMEOUT_MS",
                        value: raw,
                        reason: String::from("deadline must be greater than zero"),
                    });
                }
                parsed
            }
            Err(_) => 10_000,
        };

        Ok(Self {
            fred_api_key,
            bind_addr,
            db_path,
            upstream_timeout_ms,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    let value = std::env::var(name).map_err(|_| ConfigError::Missing { name })?;
    if value.trim().is_empty() {
        return Err(ConfigError::Empty { name });
    }
    Ok(value)
}
