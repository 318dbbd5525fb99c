//! Runtime configuration read from the environment, with an optional `.env` file.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:finance.db";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-flash-latest";
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_INCOME_CATEGORIES: [&str; 3] = ["Salary", "Bonus", "Investment"];
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("unknown storage backend '{0}', expected 'sqlite' or 'csv'")]
    UnknownBackend(String),

    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Sqlite,
    Csv,
}

impl FromStr for StorageKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StorageKind::Sqlite),
            "csv" => Ok(StorageKind::Csv),
            _ => Err(ConfigError::UnknownBackend(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StorageConfig {
    pub kind: StorageKind,
    pub database_url: String,
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    /// `None` blocks until the service answers
    pub request_timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub storage: StorageConfig,
    pub ai: AiConfig,
    pub income_categories: Vec<String>,
    pub bind_address: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is fine
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let kind = match get("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageKind::Sqlite,
        };

        let request_timeout = match get("AI_REQUEST_TIMEOUT_SECS") {
            Some(value) => {
                let secs: u64 = value.parse().map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                    key: "AI_REQUEST_TIMEOUT_SECS",
                    value: value.clone(),
                    reason: e.to_string(),
                })?;
                if secs == 0 {
                    return Err(ConfigError::InvalidValue {
                        key: "AI_REQUEST_TIMEOUT_SECS",
                        value,
                        reason: "must be at least 1 second".to_string(),
                    });
                }
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let bind_value = get("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
        let bind_address = bind_value.parse().map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue {
            key: "BIND_ADDRESS",
            value: bind_value.clone(),
            reason: e.to_string(),
        })?;

        let income_categories = match get("INCOME_CATEGORIES") {
            Some(value) => value
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_INCOME_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        };

        Ok(Self {
            storage: StorageConfig {
                kind,
                database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
                data_dir: PathBuf::from(get("DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())),
            },
            ai: AiConfig {
                api_key: get("GEMINI_API_KEY"),
                model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                endpoint: get("GEMINI_ENDPOINT").unwrap_or_else(|| DEFAULT_GEMINI_ENDPOINT.to_string()),
                request_timeout,
            },
            income_categories,
            bind_address,
        })
    }
}
