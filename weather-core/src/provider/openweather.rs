use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::error::WeatherError;
use crate::model::Units;

use super::{RawWeather, WeatherProvider};

/// Live provider speaking the OpenWeather "current weather by city name"
/// endpoint: GET {base}/weather?q={location}&units={units}&appid={key}.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    base_url: String,
    api_key: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| WeatherError::Upstream(err.without_url().to_string()))?;

        Ok(Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            http,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_current(
        &self,
        location: &str,
        units: Units,
    ) -> Result<RawWeather, WeatherError> {
        if self.api_key.is_empty() {
            return Err(WeatherError::Configuration(
                "missing API key for weather provider".to_string(),
            ));
        }

        let url = format!("{}/weather", self.base_url);
        // appid is deliberately left out of the log line.
        tracing::debug!(%url, q = location, units = units.as_str(), "requesting current weather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", location),
                ("units", units.as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await
            // without_url: reqwest error display includes the full URL,
            // appid and all.
            .map_err(|err| WeatherError::Upstream(err.without_url().to_string()))?;

        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            return Err(WeatherError::LocationNotFound(location.to_string()));
        }

        let body = res
            .text()
            .await
            .map_err(|err| WeatherError::Upstream(err.without_url().to_string()))?;

        if !status.is_success() {
            tracing::error!(%status, body = %truncate_body(&body), "provider request failed");
            return Err(WeatherError::Upstream(format!(
                "provider returned status {status}"
            )));
        }

        let parsed: RawWeather = serde_json::from_str(&body)
            .map_err(|err| WeatherError::Upstream(format!("invalid provider response: {err}")))?;

        tracing::debug!(name = %parsed.name, dt = parsed.dt, "provider response received");
        Ok(parsed)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let truncated: String = body.chars().take(MAX).collect();
        format!("{truncated}...")
    } else {
        body.to_string()
    }
}
