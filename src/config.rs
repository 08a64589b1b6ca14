use std::env;

use reqwest::Url;
use thiserror::Error;

const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Where employee and attendance data lives. Exactly one per deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Rest { base_url: Url },
    Database { database_url: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    pub api_prefix: String,
    pub log_dir: String,

    // Rate limiting
    pub rate_per_min: u32,

    pub store: StoreBackend,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let store = match var("STORE_BACKEND")
            .unwrap_or_else(|| "rest".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "rest" => StoreBackend::Rest {
                base_url: parse_api_url(var("HRM_API_URL").as_deref().unwrap_or(DEFAULT_API_URL))?,
            },
            "database" => StoreBackend::Database {
                database_url: var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            },
            other => {
                return Err(ConfigError::Invalid {
                    name: "STORE_BACKEND",
                    value: other.to_string(),
                    reason: "expected `rest` or `database`".into(),
                });
            }
        };

        let rate_per_min = match var("RATE_PER_MIN") {
            Some(raw) => parse_rate(&raw)?,
            None => 1000,
        };

        let api_prefix = var("API_PREFIX").unwrap_or_else(|| "/api".to_string());
        if !api_prefix.starts_with('/') {
            return Err(ConfigError::Invalid {
                name: "API_PREFIX",
                value: api_prefix,
                reason: "must start with `/`".into(),
            });
        }

        Ok(Self {
            server_addr: var("SERVER_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string()),
            api_prefix: api_prefix.trim_end_matches('/').to_string(),
            log_dir: var("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
            rate_per_min,
            store,
        })
    }
}

fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        name: "HRM_API_URL",
        value: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(invalid("expected an http(s) base url".into()));
    }
    Ok(url)
}

fn parse_rate(raw: &str) -> Result<u32, ConfigError> {
    let invalid = |reason: &str| ConfigError::Invalid {
        name: "RATE_PER_MIN",
        value: raw.to_string(),
        reason: reason.to_string(),
    };

    let rate: u32 = raw.trim().parse().map_err(|_| invalid("not a number"))?;
    if !(1..=60_000).contains(&rate) {
        return Err(invalid("must be between 1 and 60000"));
    }
    Ok(rate)
}
