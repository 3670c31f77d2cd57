use anyhow::Context;
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    /// `None` runs the service on the in-memory store.
    pub database_url: Option<String>,

    pub api_prefix: String,

    // Rate limiting, 0 disables the limiter
    pub rate_per_min: u32,

    pub log_dir: String,
    pub log_level: tracing::Level,

    /// Prefix printed before amounts in the plain-text payslip
    pub currency_label: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty()),
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
            rate_per_min: parse_var("RATE_PER_MIN", "1000")?,
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            log_level: parse_var("LOG_LEVEL", "debug")?,
            currency_label: env::var("CURRENCY_LABEL").unwrap_or_else(|_| "RM".to_string()),
        })
    }
}

fn parse_var<T>(key: &str, default: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse()
        .with_context(|| format!("{key} has an invalid value: {raw:?}"))
}

#[cfg(test)]
impl Config {
    /// Routes mounted under `/api`, no limiter.
    pub fn for_tests() -> Self {
        Self {
            server_addr: "127.0.0.1:0".to_string(),
            database_url: None,
            api_prefix: "/api".to_string(),
            rate_per_min: 0,
            log_dir: "logs".to_string(),
            log_level: tracing::Level::DEBUG,
            currency_label: "RM".to_string(),
        }
    }
}
