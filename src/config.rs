use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "http://localhost:5001";
pub const DEFAULT_REDIRECT_DELAY_MS: u64 = 300;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_STORE_BUFFER: usize = 32;

/// Runtime configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: Url,
    pub token_file: Option<PathBuf>,
    pub redirect_delay: Duration,
    pub request_timeout: Duration,
    pub store_buffer: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            token_file: None,
            redirect_delay: Duration::from_millis(DEFAULT_REDIRECT_DELAY_MS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            store_buffer: DEFAULT_STORE_BUFFER,
        }
    }
}

impl AppConfig {
    /// Loads `.env` if there is one, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_base_url = match get("ADMIN_API_URL") {
            Some(raw) => Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidValue {
                key: "ADMIN_API_URL",
                message: e.to_string(),
            })?,
            None => AppConfig::default().api_base_url,
        };

        let redirect_delay_ms: u64 =
            parse_or(get("ADMIN_REDIRECT_DELAY_MS"), "ADMIN_REDIRECT_DELAY_MS", DEFAULT_REDIRECT_DELAY_MS)?;
        let timeout_secs: u64 = parse_or(
            get("ADMIN_REQUEST_TIMEOUT_SECS"),
            "ADMIN_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;
        let store_buffer: usize = parse_or(get("ADMIN_STORE_BUFFER"), "ADMIN_STORE_BUFFER", DEFAULT_STORE_BUFFER)?;
        if store_buffer == 0 {
            return Err(ConfigError::InvalidValue {
                key: "ADMIN_STORE_BUFFER",
                message: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            api_base_url,
            token_file: get("ADMIN_TOKEN_FILE").map(PathBuf::from),
            redirect_delay: Duration::from_millis(redirect_delay_ms),
            request_timeout: Duration::from_secs(timeout_secs),
            store_buffer,
        })
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}
