use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

pub const DEFAULT_WEBHOOK_URL: &str = "https://ruhack.app.n8n.cloud/webhook-test/getdata";

/// URLs probed by the webhook status endpoint when none are configured.
pub const DEFAULT_ALTERNATIVE_WEBHOOK_URLS: &[&str] = &[
    "https://ruhack.app.n8n.cloud/webhook-test/getdata",
    "https://ruhack.app.n8n.cloud/webhook/getdata",
    "https://ruhack.app.n8n.cloud/webhook-test",
    "https://ruhack.app.n8n.cloud/webhook",
];

/// Upper bounds on the list-valued form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct FieldLimits {
    pub max_locations: usize,
    pub max_positions: usize,
    pub max_skills: usize,
    pub max_job_types: usize,
}

impl Default for FieldLimits {
    fn default() -> Self {
        Self {
            max_locations: 6,
            max_positions: 5,
            max_skills: 10,
            max_job_types: 4,
        }
    }
}

impl FieldLimits {
    fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            max_locations: env_or("MAX_LOCATIONS", defaults.max_locations)?,
            max_positions: env_or("MAX_POSITIONS", defaults.max_positions)?,
            max_skills: env_or("MAX_SKILLS", defaults.max_skills)?,
            max_job_types: env_or("MAX_JOB_TYPES", defaults.max_job_types)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub url: String,
    /// Receives the flat fallback request when the primary call fails.
    pub fallback_url: String,
    pub alternative_urls: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_WEBHOOK_URL.to_string(),
            fallback_url: DEFAULT_WEBHOOK_URL.to_string(),
            alternative_urls: DEFAULT_ALTERNATIVE_WEBHOOK_URLS
                .iter()
                .map(|u| u.to_string())
                .collect(),
            timeout_secs: 30,
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub webhook: WebhookConfig,
    pub session_ttl_secs: u64,
    pub limits: FieldLimits,
    pub export_path: Option<PathBuf>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let url = std::env::var("WEBHOOK_URL").unwrap_or_else(|_| DEFAULT_WEBHOOK_URL.to_string());
        let fallback_url = std::env::var("WEBHOOK_FALLBACK_URL").unwrap_or_else(|_| url.clone());
        let alternative_urls = match std::env::var("WEBHOOK_ALTERNATIVE_URLS") {
            Ok(raw) => split_urls(&raw),
            Err(_) => WebhookConfig::default().alternative_urls,
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            webhook: WebhookConfig {
                url,
                fallback_url,
                alternative_urls,
                timeout_secs: env_or("WEBHOOK_TIMEOUT_SECS", 30)?,
            },
            session_ttl_secs: env_or("SESSION_TTL_SECS", 86_400)?,
            limits: FieldLimits::from_env()?,
            export_path: std::env::var("EXPORT_PATH").ok().map(PathBuf::from),
            port: env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        Err(_) => Ok(default),
    }
}

fn split_urls(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = FieldLimits::default();
        assert_eq!(limits.max_locations, 6);
        assert_eq!(limits.max_positions, 5);
        assert_eq!(limits.max_skills, 10);
        assert_eq!(limits.max_job_types, 4);
    }

    #[test]
    fn test_split_urls_skips_blanks() {
        assert_eq!(
            split_urls(" http://a/hook , ,http://b/hook"),
            vec!["http://a/hook", "http://b/hook"]
        );
    }

    #[test]
    fn test_env_or_parses_and_defaults() {
        std::env::set_var("CVLENS_TEST_ENV_OR", "42");
        assert_eq!(env_or::<u64>("CVLENS_TEST_ENV_OR", 7).unwrap(), 42);
        assert_eq!(env_or::<u64>("CVLENS_TEST_ENV_OR_MISSING", 7).unwrap(), 7);
        std::env::set_var("CVLENS_TEST_ENV_OR_BAD", "abc");
        assert!(env_or::<u64>("CVLENS_TEST_ENV_OR_BAD", 7).is_err());
    }
}
