// ABOUTME: Configuration loading and validation for the gatehouse server.
// ABOUTME: Reads environment variables, applies defaults, and reports every invalid value at once.

use std::fmt;
use std::net::{IpAddr, SocketAddr};

use reqwest::Url;
use thiserror::Error;

/// Minimum accepted length of `DATABASE_URL`.
pub const DATABASE_URL_MIN_LEN: usize = 5;
pub const DEFAULT_PORT: u16 = 3333;
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_AUTH_UPSTREAM: &str = "http://127.0.0.1:4000";
pub const DEFAULT_TRUSTED_ORIGIN: &str = "http://localhost:3333";

/// A single invalid environment variable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigIssue {
    #[error("DATABASE_URL is required")]
    MissingDatabaseUrl,

    #[error("DATABASE_URL must be at least 5 characters")]
    DatabaseUrlTooShort,

    #[error("PORT is not a valid port number: {0}")]
    InvalidPort(String),

    #[error("HOST is not a valid IP address: {0}")]
    InvalidHost(String),

    #[error("AUTH_UPSTREAM_URL is not an absolute http(s) URL: {0}")]
    InvalidAuthUpstream(String),

    #[error("TRUSTED_ORIGINS contains an invalid origin: {0}")]
    InvalidTrustedOrigin(String),
}

/// Configuration failed validation. Carries every problem found so an
/// operator can fix the environment in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid environment variables:{}", render_issues(.issues))]
pub struct ConfigError {
    pub issues: Vec<ConfigIssue>,
}

fn render_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("\n  - {}", issue))
        .collect()
}

/// Server configuration loaded from environment variables.
#[derive(Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub auth_upstream: Url,
    pub trusted_origins: Vec<String>,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("database_url", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("auth_upstream", &self.auth_upstream.as_str())
            .field("trusted_origins", &self.trusted_origins)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// Environment variables:
    /// - DATABASE_URL: connection string of the auth data store (required)
    /// - PORT: listen port (default: 3333)
    /// - HOST: listen address (default: 127.0.0.1)
    /// - AUTH_UPSTREAM_URL: base URL of the auth service (default: http://127.0.0.1:4000)
    /// - TRUSTED_ORIGINS: comma separated CORS origins (default: http://localhost:3333)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its
    /// value. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut issues = Vec::new();

        let database_url = match get("DATABASE_URL") {
            None => {
                issues.push(ConfigIssue::MissingDatabaseUrl);
                String::new()
            }
            Some(url) if url.chars().count() < DATABASE_URL_MIN_LEN => {
                issues.push(ConfigIssue::DatabaseUrlTooShort);
                url
            }
            Some(url) => url,
        };

        let port = match get("PORT") {
            None => DEFAULT_PORT,
            Some(raw) => raw.parse::<u16>().unwrap_or_else(|_| {
                issues.push(ConfigIssue::InvalidPort(raw));
                DEFAULT_PORT
            }),
        };

        let host_raw = get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let host = host_raw.parse::<IpAddr>().unwrap_or_else(|_| {
            issues.push(ConfigIssue::InvalidHost(host_raw.clone()));
            IpAddr::from([127, 0, 0, 1])
        });

        let upstream_raw =
            get("AUTH_UPSTREAM_URL").unwrap_or_else(|| DEFAULT_AUTH_UPSTREAM.to_string());
        let auth_upstream = parse_http_url(&upstream_raw);
        if auth_upstream.is_none() {
            issues.push(ConfigIssue::InvalidAuthUpstream(upstream_raw));
        }

        let trusted_origins: Vec<String> = get("TRUSTED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_TRUSTED_ORIGIN.to_string())
            .split(',')
            .map(|o| o.trim().trim_end_matches('/').to_string())
            .filter(|o| !o.is_empty())
            .collect();
        for origin in &trusted_origins {
            if parse_http_url(origin).is_none() {
                issues.push(ConfigIssue::InvalidTrustedOrigin(origin.clone()));
            }
        }

        match auth_upstream {
            Some(auth_upstream) if issues.is_empty() => Ok(Self {
                database_url,
                host,
                port,
                auth_upstream,
                trusted_origins,
            }),
            _ => Err(ConfigError { issues }),
        }
    }

    /// Socket address the server listens on.
    pub fn bind(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Public base URL derived from the listen address.
    pub fn public_base_url(&self) -> String {
        format!("http://{}", self.bind())
    }
}

fn parse_http_url(raw: &str) -> Option<Url> {
    Url::parse(raw)
        .ok()
        .filter(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
}
