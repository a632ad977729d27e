//! The fetch orchestrator: cache-hit vs. fetch, live vs. synthetic, failure
//! classification and fallback.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::Cache;
use crate::config::Config;
use crate::error::WeatherError;
use crate::format;
use crate::model::{NormalizedWeather, Units};
use crate::provider::{MockProvider, OpenWeatherProvider, RawWeather, WeatherProvider};

/// What to do when a cache miss needs fresh data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Never call the live provider; serve synthetic data directly. Chosen
    /// when demo mode is on or no usable credential is configured.
    Always,
    /// Live provider only; every failure propagates. Conformance-test
    /// harnesses use this so synthetic data can never mask a real failure.
    Never,
    /// Live provider first; non-404 failures are masked by synthetic data.
    #[default]
    OnFailure,
}

/// Single entry point for current-weather lookups.
///
/// The cache and the fallback policy are injected at construction; the
/// service itself holds no hidden global state.
#[derive(Debug)]
pub struct WeatherService {
    provider: Arc<dyn WeatherProvider>,
    fallback: Arc<dyn WeatherProvider>,
    cache: Cache<NormalizedWeather>,
    default_units: Units,
    policy: FallbackPolicy,
}

impl WeatherService {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        cache: Cache<NormalizedWeather>,
        policy: FallbackPolicy,
    ) -> Self {
        Self {
            provider,
            fallback: Arc::new(MockProvider::new()),
            cache,
            default_units: Units::Metric,
            policy,
        }
    }

    /// Wire up the whole stack from configuration: live provider, cache and
    /// policy (demo flag or placeholder credential selects `Always`).
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider = OpenWeatherProvider::new(
            config.base_url.clone(),
            config.api_key.clone(),
            config.request_timeout,
        )
        .map_err(|err| anyhow::anyhow!("failed to build weather provider: {err}"))?;

        let policy = if config.demo_mode || !config.has_live_credentials() {
            FallbackPolicy::Always
        } else {
            FallbackPolicy::OnFailure
        };

        Ok(Self::new(Arc::new(provider), Cache::new(config.cache_ttl), policy)
            .with_default_units(config.default_units))
    }

    pub fn with_default_units(mut self, units: Units) -> Self {
        self.default_units = units;
        self
    }

    /// Replace the synthetic fallback source.
    pub fn with_fallback(mut self, fallback: Arc<dyn WeatherProvider>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn fallback_policy(&self) -> FallbackPolicy {
        self.policy
    }

    /// Start the background sweep over this service's cache.
    pub fn spawn_cache_sweeper(&self, period: Duration) -> tokio::task::JoinHandle<()> {
        self.cache.spawn_sweeper(period)
    }

    /// Get current weather for a location, serving from cache when possible.
    ///
    /// Returned values are snapshots; the cache owns entry lifetime and
    /// callers must not treat the result as live data.
    pub async fn get_current_weather(
        &self,
        location: &str,
        units: Option<Units>,
    ) -> Result<NormalizedWeather, WeatherError> {
        let location = location.trim();
        if location.is_empty() {
            return Err(WeatherError::InvalidRequest);
        }

        let units = units.unwrap_or(self.default_units);
        let key = cache_key(location, units);

        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!(location, units = %units, "returning cached weather data");
            return Ok(cached);
        }

        let raw = self.fetch_raw(location, units).await?;
        let weather = format::normalize(&raw);

        self.cache.set(key, weather.clone());
        tracing::debug!(location, units = %units, "weather data cached");

        Ok(weather)
    }

    async fn fetch_raw(&self, location: &str, units: Units) -> Result<RawWeather, WeatherError> {
        if self.policy == FallbackPolicy::Always {
            tracing::debug!(location, "serving synthetic weather data");
            return self.fallback.fetch_current(location, units).await;
        }

        match self.provider.fetch_current(location, units).await {
            Ok(raw) => Ok(raw),
            // 404 is a definitive answer, never masked and never cached.
            Err(err @ WeatherError::LocationNotFound(_)) => Err(err),
            Err(err) if self.policy == FallbackPolicy::OnFailure => {
                tracing::warn!(location, error = %err, "live provider failed, falling back to synthetic data");
                match self.fallback.fetch_current(location, units).await {
                    Ok(raw) => Ok(raw),
                    Err(fallback_err) => {
                        // Re-raise the original failure, not the fallback's.
                        tracing::error!(error = %fallback_err, "fallback generator failed");
                        Err(err)
                    }
                }
            }
            Err(err) => {
                tracing::error!(location, error = %err, "live provider failed");
                Err(err)
            }
        }
    }
}

/// Cache key for a `(location, units)` pair. Units are part of the key, so
/// metric and imperial requests are independent slots.
pub fn cache_key(location: &str, units: Units) -> String {
    format!("weather:{location}:{units}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{RawCondition, RawCoord, RawMain, RawSys, RawWind};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sample_raw(name: &str) -> RawWeather {
        RawWeather {
            name: name.to_string(),
            coord: RawCoord { lat: 51.51, lon: -0.13 },
            weather: vec![RawCondition {
                id: 800,
                main: "Clear".to_string(),
                description: "clear sky".to_string(),
                icon: "01d".to_string(),
            }],
            main: RawMain {
                temp: 15.5,
                feels_like: 14.8,
                temp_min: 14.0,
                temp_max: 17.2,
                pressure: 1011,
                humidity: 76,
            },
            wind: RawWind { speed: 3.6, deg: 230 },
            visibility: 10000,
            dt: 1617540000,
            sys: RawSys {
                country: "GB".to_string(),
                sunrise: 1617508800,
                sunset: 1617556800,
            },
            timezone: 3600,
        }
    }

    /// Scripted provider: pops one canned result per call and counts calls.
    #[derive(Debug)]
    struct StubProvider {
        responses: Mutex<Vec<Result<RawWeather, WeatherError>>>,
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn new(responses: Vec<Result<RawWeather, WeatherError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WeatherProvider for StubProvider {
        async fn fetch_current(
            &self,
            _location: &str,
            _units: Units,
        ) -> Result<RawWeather, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut responses = self.responses.lock();
            if responses.is_empty() {
                return Err(WeatherError::Upstream("stub exhausted".to_string()));
            }
            responses.remove(0)
        }
    }

    fn service(provider: Arc<StubProvider>, policy: FallbackPolicy) -> WeatherService {
        WeatherService::new(provider, Cache::new(Duration::from_secs(60)), policy)
    }

    #[tokio::test]
    async fn cache_hit_skips_the_provider() {
        let provider = StubProvider::new(vec![Ok(sample_raw("London"))]);
        let svc = service(Arc::clone(&provider), FallbackPolicy::Never);

        let first = svc.get_current_weather("London", Some(Units::Metric)).await.unwrap();
        let second = svc.get_current_weather("London", Some(Units::Metric)).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn unit_systems_occupy_distinct_cache_slots() {
        let provider =
            StubProvider::new(vec![Ok(sample_raw("London")), Ok(sample_raw("London"))]);
        let svc = service(Arc::clone(&provider), FallbackPolicy::Never);

        svc.get_current_weather("London", Some(Units::Metric)).await.unwrap();
        svc.get_current_weather("London", Some(Units::Imperial)).await.unwrap();

        // Populating one slot must not satisfy the other.
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn blank_location_is_rejected_before_any_fetch() {
        let provider = StubProvider::new(vec![]);
        let svc = service(Arc::clone(&provider), FallbackPolicy::OnFailure);

        for location in ["", "   "] {
            let err = svc.get_current_weather(location, None).await.unwrap_err();
            assert!(matches!(err, WeatherError::InvalidRequest));
        }
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn not_found_propagates_even_with_fallback_enabled() {
        let provider = StubProvider::new(vec![Err(WeatherError::LocationNotFound(
            "NonExistentCity".to_string(),
        ))]);
        let svc = service(Arc::clone(&provider), FallbackPolicy::OnFailure);

        let err = svc
            .get_current_weather("NonExistentCity", Some(Units::Metric))
            .await
            .unwrap_err();

        let msg = err.to_string();
        assert!(err.is_not_found());
        assert!(msg.contains("NonExistentCity"));
        assert!(msg.contains("not found"));
    }

    #[tokio::test]
    async fn not_found_is_not_cached_as_a_negative_result() {
        let provider = StubProvider::new(vec![
            Err(WeatherError::LocationNotFound("Nowhere".to_string())),
            Err(WeatherError::LocationNotFound("Nowhere".to_string())),
        ]);
        let svc = service(Arc::clone(&provider), FallbackPolicy::Never);

        svc.get_current_weather("Nowhere", None).await.unwrap_err();
        svc.get_current_weather("Nowhere", None).await.unwrap_err();

        // Every request for an unknown location re-queries.
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn upstream_failure_is_masked_by_synthetic_data() {
        let provider =
            StubProvider::new(vec![Err(WeatherError::Upstream("connection reset".to_string()))]);
        let svc = service(Arc::clone(&provider), FallbackPolicy::OnFailure);

        let weather = svc
            .get_current_weather("London", Some(Units::Metric))
            .await
            .expect("fallback must mask the failure");

        assert_eq!(weather.location.name, "London");
        assert!(weather.details.humidity <= 100);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn masked_fallback_result_is_cached() {
        let provider =
            StubProvider::new(vec![Err(WeatherError::Upstream("boom".to_string()))]);
        let svc = service(Arc::clone(&provider), FallbackPolicy::OnFailure);

        svc.get_current_weather("London", Some(Units::Metric)).await.unwrap();
        svc.get_current_weather("London", Some(Units::Metric)).await.unwrap();

        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn never_policy_propagates_upstream_failures() {
        let provider =
            StubProvider::new(vec![Err(WeatherError::Upstream("boom".to_string()))]);
        let svc = service(Arc::clone(&provider), FallbackPolicy::Never);

        let err = svc
            .get_current_weather("London", Some(Units::Metric))
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::Upstream(_)));
    }

    #[tokio::test]
    async fn always_policy_never_touches_the_live_provider() {
        let provider = StubProvider::new(vec![]);
        let svc = service(Arc::clone(&provider), FallbackPolicy::Always);

        let weather = svc
            .get_current_weather("Tokyo", Some(Units::Metric))
            .await
            .expect("synthetic path must succeed");

        assert_eq!(weather.location.name, "Tokyo");
        assert_eq!(weather.location.country, "JP");
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn broken_fallback_reraises_the_original_failure() {
        let provider =
            StubProvider::new(vec![Err(WeatherError::Upstream("original failure".to_string()))]);
        let fallback = StubProvider::new(vec![Err(WeatherError::Upstream(
            "fallback also broke".to_string(),
        ))]);

        let svc = service(Arc::clone(&provider), FallbackPolicy::OnFailure)
            .with_fallback(Arc::clone(&fallback) as Arc<dyn WeatherProvider>);

        let err = svc
            .get_current_weather("London", Some(Units::Metric))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to fetch weather data: original failure");
        assert_eq!(fallback.calls(), 1);
    }

    #[tokio::test]
    async fn default_units_apply_when_caller_picks_none() {
        let provider = StubProvider::new(vec![Ok(sample_raw("London")), Ok(sample_raw("London"))]);
        let svc = service(Arc::clone(&provider), FallbackPolicy::Never)
            .with_default_units(Units::Imperial);

        svc.get_current_weather("London", None).await.unwrap();
        // Explicit imperial should now hit the cache entry the default wrote.
        svc.get_current_weather("London", Some(Units::Imperial)).await.unwrap();

        assert_eq!(provider.calls(), 1);
    }

    #[test]
    fn cache_key_embeds_location_and_units() {
        assert_eq!(cache_key("London", Units::Metric), "weather:London:metric");
        assert_eq!(cache_key("London", Units::Imperial), "weather:London:imperial");
    }

    #[tokio::test]
    async fn from_config_without_credentials_selects_always() {
        let config = Config::default();
        let svc = WeatherService::from_config(&config).expect("service should build");
        assert_eq!(svc.fallback_policy(), FallbackPolicy::Always);

        // And the synthetic path actually serves requests.
        let weather = svc.get_current_weather("Paris", None).await.unwrap();
        assert_eq!(weather.location.country, "FR");
    }

    #[tokio::test]
    async fn from_config_with_credentials_selects_on_failure() {
        let config = Config {
            api_key: "b1946ac92492d2347c6235b4d2611184".to_string(),
            ..Config::default()
        };
        let svc = WeatherService::from_config(&config).expect("service should build");
        assert_eq!(svc.fallback_policy(), FallbackPolicy::OnFailure);
    }

    #[tokio::test]
    async fn demo_mode_wins_over_credentials() {
        let config = Config {
            api_key: "b1946ac92492d2347c6235b4d2611184".to_string(),
            demo_mode: true,
            ..Config::default()
        };
        let svc = WeatherService::from_config(&config).expect("service should build");
        assert_eq!(svc.fallback_policy(), FallbackPolicy::Always);
    }
}
