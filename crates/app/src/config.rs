use std::net::SocketAddr;
use std::path::Path;

use thiserror::Error;

use gazette_core::domain::moderation;
use gazette_core::domain::news::NEWS_PER_HOME_PAGE;

// Two weeks, matching the usual session cookie lifetime.
const DEFAULT_SESSION_TTL_SECS: i64 = 1_209_600;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: SocketAddr,
    pub database_url: String,
    pub session_secret: Option<String>,
    pub session_ttl_secs: i64,
    pub home_page_size: usize,
    pub forbidden_words: Vec<String>,
    pub cors_allow_origins: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid socket address: {0}")]
    InvalidSocket(String),
    #[error("invalid integer for {0}: {1}")]
    InvalidNumber(&'static str, String),
    #[error("invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_addr_raw = read_string("GAZETTE_HTTP_ADDR", "127.0.0.1:8080");
        let http_addr = http_addr_raw
            .parse()
            .map_err(|_| ConfigError::InvalidSocket(http_addr_raw.clone()))?;
        let database_url = read_string("GAZETTE_DATABASE_URL", "sqlite://gazette.db");
        let session_secret = read_optional_string("GAZETTE_SESSION_SECRET");
        let session_ttl_secs = read_i64("GAZETTE_SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?;
        if session_ttl_secs <= 0 {
            return Err(ConfigError::InvalidValue(
                "GAZETTE_SESSION_TTL_SECS",
                session_ttl_secs.to_string(),
            ));
        }
        let home_page_size = read_usize("GAZETTE_HOME_PAGE_SIZE", NEWS_PER_HOME_PAGE)?;
        let forbidden_words = match read_optional_string("GAZETTE_FORBIDDEN_WORDS") {
            Some(raw) => parse_list(&raw),
            None => moderation::default_forbidden_words(),
        };
        let cors_allow_origins = read_optional_string("GAZETTE_CORS_ALLOW_ORIGINS")
            .map(|raw| parse_list(&raw))
            .unwrap_or_default();

        Ok(Self {
            http_addr,
            database_url,
            session_secret,
            session_ttl_secs,
            home_page_size,
            forbidden_words,
            cors_allow_origins,
        })
    }
}

/// Loads `./.env` into the process environment; existing variables win.
pub fn load_dotenv() -> Result<(), std::io::Error> {
    let path = Path::new(".env");
    if !path.exists() {
        return Ok(());
    }
    let contents = std::fs::read_to_string(path)?;
    for line in contents.lines() {
        let Some((key, value)) = parse_dotenv_line(line) else {
            continue;
        };
        if std::env::var_os(&key).is_none() {
            // Safety: invoked during startup before any threads are spawned.
            unsafe {
                std::env::set_var(key, value);
            }
        }
    }
    Ok(())
}

fn read_string(key: &'static str, default: &'static str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn read_i64(key: &'static str, default: i64) -> Result<i64, ConfigError> {
    let raw = std::env::var(key).unwrap_or_else(|_| default.to_string());
    raw.parse()
        .map_err(|_| ConfigError::InvalidNumber(key, raw))
}

fn read_usize(key: &'static str, default: usize) -> Result<usize, ConfigError> {
    let raw = std::env::var(key).unwrap_or_else(|_| default.to_string());
    raw.parse()
        .map_err(|_| ConfigError::InvalidNumber(key, raw))
}

fn read_optional_string(key: &'static str) -> Option<String> {
    let value = std::env::var(key).unwrap_or_default();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_dotenv_line(line: &str) -> Option<(String, String)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let (key, value) = trimmed.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    let value = value.trim();
    let value = value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .or_else(|| {
            value
                .strip_prefix('\'')
                .and_then(|inner| inner.strip_suffix('\''))
        })
        .unwrap_or(value);
    Some((key.to_string(), value.to_string()))
}
