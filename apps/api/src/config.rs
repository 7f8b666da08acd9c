use std::str::FromStr;

use anyhow::{Context, Result};

use crate::llm_client::ANTHROPIC_API_URL;

/// Placeholder shipped in sample `.env` files. Treated exactly like an unset key.
pub const PLACEHOLDER_API_KEY: &str = "your-anthropic-api-key-here";

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed numeric values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// `None` when the key is unset, blank, or still the placeholder.
    pub anthropic_api_key: Option<String>,
    pub llm_model: String,
    /// Messages endpoint; overridable for proxies and gateways.
    pub llm_api_url: String,
    pub llm_timeout_secs: u64,
    pub llm_retry_delay_ms: u64,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 3004,
            rust_log: "info".to_string(),
            anthropic_api_key: None,
            llm_model: DEFAULT_MODEL.to_string(),
            llm_api_url: ANTHROPIC_API_URL.to_string(),
            llm_timeout_secs: 120,
            llm_retry_delay_ms: 1000,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();

        Ok(Config {
            port: parse_env("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            anthropic_api_key: usable_credential(std::env::var("ANTHROPIC_API_KEY").ok()),
            llm_model: std::env::var("LLM_MODEL")
                .ok()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(defaults.llm_model),
            llm_api_url: std::env::var("LLM_API_URL")
                .ok()
                .filter(|u| !u.trim().is_empty())
                .unwrap_or(defaults.llm_api_url),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", defaults.llm_timeout_secs)?,
            llm_retry_delay_ms: parse_env("LLM_RETRY_DELAY_MS", defaults.llm_retry_delay_ms)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
        })
    }

    /// Credential rendered for logs: `*****` plus the last four characters.
    pub fn masked_api_key(&self) -> String {
        match &self.anthropic_api_key {
            Some(key) => {
                let tail: String = key
                    .chars()
                    .rev()
                    .take(4)
                    .collect::<Vec<_>>()
                    .into_iter()
                    .rev()
                    .collect();
                format!("*****{tail}")
            }
            None => "Not set".to_string(),
        }
    }
}

/// Drops blank and placeholder credentials so callers only see real keys.
fn usable_credential(raw: Option<String>) -> Option<String> {
    raw.map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty() && k != PLACEHOLDER_API_KEY)
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("Environment variable '{key}' has an invalid value: '{raw}'"))
}
