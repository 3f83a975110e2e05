//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_CORS_ORIGIN, DEFAULT_DATABASE_URL, DEFAULT_REDIS_URL, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT, DEFAULT_SESSION_TTL_SECONDS, SESSION_BACKEND_MEMORY,
    SESSION_BACKEND_REDIS,
};

/// Where sessions are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionBackend {
    Redis,
    Memory,
}

impl SessionBackend {
    /// Parse a backend name; unknown values fall back to Redis.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            SESSION_BACKEND_MEMORY => SessionBackend::Memory,
            SESSION_BACKEND_REDIS => SessionBackend::Redis,
            other => {
                tracing::warn!(backend = %other, "Unknown SESSION_BACKEND, using redis");
                SessionBackend::Redis
            }
        }
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub session_ttl_seconds: u64,
    pub session_backend: SessionBackend,
    pub cookie_secure: bool,
    pub cors_origin: String,
    /// Honour `X-Forwarded-For` / `X-Real-IP` when identifying clients
    pub trust_proxy_headers: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("redis_url", &"[REDACTED]")
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("session_ttl_seconds", &self.session_ttl_seconds)
            .field("session_backend", &self.session_backend)
            .field("cookie_secure", &self.cookie_secure)
            .field("cors_origin", &self.cors_origin)
            .field("trust_proxy_headers", &self.trust_proxy_headers)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            redis_url: DEFAULT_REDIS_URL.to_string(),
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            session_backend: SessionBackend::Redis,
            cookie_secure: false,
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            trust_proxy_headers: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            server_host: env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            session_ttl_seconds: env::var("SESSION_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|ttl| *ttl > 0)
                .unwrap_or(defaults.session_ttl_seconds),
            session_backend: env::var("SESSION_BACKEND")
                .map(|v| SessionBackend::parse(&v))
                .unwrap_or(defaults.session_backend),
            cookie_secure: env::var("COOKIE_SECURE")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.cookie_secure),
            cors_origin: env::var("CORS_ORIGIN").unwrap_or(defaults.cors_origin),
            trust_proxy_headers: env::var("TRUST_PROXY_HEADERS")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.trust_proxy_headers),
        }
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_backend_parse() {
        assert_eq!(SessionBackend::parse("memory"), SessionBackend::Memory);
        assert_eq!(SessionBackend::parse(" Redis "), SessionBackend::Redis);
        assert_eq!(SessionBackend::parse("etcd"), SessionBackend::Redis);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_debug_redacts_urls() {
        let config = Config {
            database_url: "postgres://user:hunter2@db/app".to_string(),
            ..Config::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_proxy_headers_untrusted_by_default() {
        assert!(!Config::default().trust_proxy_headers);
    }

    #[test]
    fn test_server_addr() {
        let config = Config::default();
        assert_eq!(config.server_addr(), "0.0.0.0:5000");
    }
}
