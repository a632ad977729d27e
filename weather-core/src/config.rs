use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

use crate::model::Units;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Credential values recognized as placeholders rather than real API keys.
/// Deployments shipped with an unedited .env fall back to demo mode instead
/// of hammering the provider with a key that can never work.
const PLACEHOLDER_KEYS: &[&str] = &[
    "",
    "demo",
    "changeme",
    "your_api_key",
    "your_api_key_here",
    "your_openweathermap_api_key",
];

/// Process-wide configuration, sourced from the environment once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Provider base URL (`WEATHER_API_URL`).
    pub base_url: String,
    /// Provider credential (`WEATHER_API_KEY`).
    pub api_key: String,
    /// Unit system used when the caller does not pick one (`WEATHER_DEFAULT_UNITS`).
    pub default_units: Units,
    /// Cache entry lifetime (`CACHE_TTL`, seconds).
    pub cache_ttl: Duration,
    /// Background sweep interval (`CACHE_CHECK_PERIOD`, seconds).
    pub cache_sweep_period: Duration,
    /// Force synthetic data even when a credential is present (`DEMO_MODE`).
    pub demo_mode: bool,
    /// Upper bound on a single provider call (`REQUEST_TIMEOUT`, seconds).
    pub request_timeout: Duration,
    /// HTTP bind port (`PORT`).
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            default_units: Units::Metric,
            cache_ttl: Duration::from_secs(300),
            cache_sweep_period: Duration::from_secs(60),
            demo_mode: false,
            request_timeout: Duration::from_secs(10),
            port: 3000,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let default_units = match env::var("WEATHER_DEFAULT_UNITS") {
            Ok(value) => Units::try_from(value.as_str())
                .context("Invalid WEATHER_DEFAULT_UNITS value")?,
            Err(_) => defaults.default_units,
        };

        Ok(Self {
            base_url: env::var("WEATHER_API_URL").unwrap_or(defaults.base_url),
            api_key: env::var("WEATHER_API_KEY").unwrap_or_default(),
            default_units,
            cache_ttl: Duration::from_secs(env_u64("CACHE_TTL", 300)?),
            cache_sweep_period: Duration::from_secs(env_u64("CACHE_CHECK_PERIOD", 60)?),
            demo_mode: env_flag("DEMO_MODE"),
            request_timeout: Duration::from_secs(env_u64("REQUEST_TIMEOUT", 10)?),
            port: u16::try_from(env_u64("PORT", 3000)?).context("PORT out of range")?,
        })
    }

    /// Whether the configured credential looks like a real one. Placeholder
    /// or blank keys route requests to the synthetic generator instead.
    pub fn has_live_credentials(&self) -> bool {
        let key = self.api_key.trim().to_ascii_lowercase();
        !PLACEHOLDER_KEYS.contains(&key.as_str())
    }
}

fn env_u64(name: &str, default: u64) -> Result<u64> {
    match env::var(name) {
        Ok(value) => value
            .parse::<u64>()
            .with_context(|| format!("Invalid {name} value: '{value}'")),
        Err(_) => Ok(default),
    }
}

fn env_flag(name: &str) -> bool {
    matches!(
        env::var(name).as_deref(),
        Ok("1") | Ok("true") | Ok("yes") | Ok("on")
    )
}
