//! Core library for the cosmic weather service.
//!
//! This crate defines:
//! - Environment-sourced configuration
//! - The shared in-memory TTL cache
//! - Abstraction over the weather provider, plus the synthetic fallback generator
//! - The normalized weather schema and the fetch orchestrator
//!
//! It is used by `weather-server`, but can also be reused by other binaries or services.

pub mod cache;
pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod provider;
pub mod service;

pub use cache::Cache;
pub use config::Config;
pub use error::WeatherError;
pub use model::{NormalizedWeather, Units};
pub use provider::{MockProvider, OpenWeatherProvider, RawWeather, WeatherProvider};
pub use service::{FallbackPolicy, WeatherService};
