use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::error::WeatherError;
use crate::model::Units;

pub mod mock;
pub mod openweather;

pub use mock::MockProvider;
pub use openweather::OpenWeatherProvider;

/// A source of current weather observations in the provider's raw schema.
///
/// Both the live HTTP provider and the synthetic generator implement this,
/// which is what lets the orchestrator swap one for the other.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_current(
        &self,
        location: &str,
        units: Units,
    ) -> Result<RawWeather, WeatherError>;
}

/// Current-weather response in the provider's wire schema.
///
/// Field names follow the provider contract; the formatter maps this onto
/// [`crate::model::NormalizedWeather`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawWeather {
    pub name: String,
    pub coord: RawCoord,
    pub weather: Vec<RawCondition>,
    pub main: RawMain,
    pub wind: RawWind,
    pub visibility: i64,
    pub dt: i64,
    pub sys: RawSys,
    pub timezone: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCoord {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCondition {
    pub id: i64,
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMain {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: u32,
    pub humidity: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawWind {
    pub speed: f64,
    pub deg: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSys {
    pub country: String,
    pub sunrise: i64,
    pub sunset: i64,
}
