//! Server configuration read from the environment.

use crate::store::DEFAULT_EVENT_CAPACITY;
use std::path::PathBuf;
use thiserror::Error;

/// Invalid configuration value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Everything the `web` binary needs to start.
#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    /// Interface to bind (HOST, default 0.0.0.0 so the app is reachable on a VPS).
    pub host: String,
    /// Port to bind (PORT, default 8080).
    pub port: u16,
    /// Directory served as static assets at `/` (STATIC_DIR, default `static`).
    pub static_dir: PathBuf,
    /// Per-subscriber event backlog (EVENT_BUFFER, default 256).
    pub event_buffer: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            static_dir: PathBuf::from("static"),
            event_buffer: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl ServerConfig {
    /// Read HOST, PORT, STATIC_DIR and EVENT_BUFFER; unset variables keep their default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as `from_env`, with variables supplied by `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                var: "PORT",
                reason: format!("{e} ({raw:?})"),
            })?,
            None => defaults.port,
        };

        let event_buffer = match lookup("EVENT_BUFFER") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "EVENT_BUFFER",
                        reason: format!("expected a positive integer, got {raw:?}"),
                    })
                }
            },
            None => defaults.event_buffer,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            event_buffer,
        })
    }
}
