//! Capture sink configuration

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Default bind address for the capture API
const DEFAULT_HTTP_ADDR: &str = ":18080";

/// Default cap on concurrently active sessions
const DEFAULT_MAX_CONCURRENT_SESSIONS: usize = 256;

/// Default session lifetime when the request does not set one
const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(30);

/// Default envelope queue capacity
const DEFAULT_SESSION_BUFFER_SIZE: usize = 64;

/// Configuration for the capture sink.
///
/// # Example
///
/// ```toml
/// [exporters.otap]
/// http_addr = ":18080"
/// max_concurrent_sessions = 256
/// default_session_timeout = "30s"
/// session_buffer_size = 64
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// Bind address for the capture API
    /// Default: ":18080" (all interfaces)
    pub http_addr: String,

    /// Hard cap on concurrently active capture sessions
    /// Default: 256
    pub max_concurrent_sessions: usize,

    /// Session lifetime applied when the stream request does not set one
    /// Default: 30s
    #[serde(with = "humantime_serde")]
    pub default_session_timeout: Duration,

    /// Fallback envelope queue capacity for sessions that do not size one
    /// Default: 64
    pub session_buffer_size: usize,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            http_addr: DEFAULT_HTTP_ADDR.into(),
            max_concurrent_sessions: DEFAULT_MAX_CONCURRENT_SESSIONS,
            default_session_timeout: DEFAULT_SESSION_TIMEOUT,
            session_buffer_size: DEFAULT_SESSION_BUFFER_SIZE,
        }
    }
}

impl SinkConfig {
    /// Ensure the config values are safe for runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http_addr.is_empty() {
            return Err(ConfigError::MissingHttpAddr);
        }
        if self.max_concurrent_sessions == 0 {
            return Err(ConfigError::InvalidMaxSessions);
        }
        if self.default_session_timeout.is_zero() {
            return Err(ConfigError::InvalidSessionTimeout);
        }
        if self.session_buffer_size == 0 {
            return Err(ConfigError::InvalidBufferSize);
        }
        Ok(())
    }

    /// Socket address to bind; a leading-colon address binds all interfaces.
    pub fn bind_address(&self) -> String {
        match self.http_addr.strip_prefix(':') {
            Some(port) => format!("0.0.0.0:{port}"),
            None => self.http_addr.clone(),
        }
    }
}

/// Invalid sink configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("http_addr must be set")]
    MissingHttpAddr,

    #[error("max_concurrent_sessions must be > 0")]
    InvalidMaxSessions,

    #[error("default_session_timeout must be > 0")]
    InvalidSessionTimeout,

    #[error("session_buffer_size must be > 0")]
    InvalidBufferSize,
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
