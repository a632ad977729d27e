use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::error::WeatherError;
use crate::model::Units;

use super::{RawCondition, RawCoord, RawMain, RawSys, RawWeather, RawWind, WeatherProvider};

/// Seconds between synthesized sunrise/sunset and "now".
const SUN_OFFSET_SECS: i64 = 7 * 3600;

/// Synthetic weather generator, used when no real credential is configured,
/// when demo mode is on, or as a fallback after a live-provider failure.
///
/// Identity fields (name, country, coordinates, condition family) are stable
/// per location; humidity, wind and timestamps are re-rolled on every call so
/// repeated requests still look alive.
#[derive(Debug)]
pub struct MockProvider {
    rng: Mutex<StdRng>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Fixed-seed constructor for reproducible output under test.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Build a provider-shaped response for the given location.
    pub fn generate(&self, location: &str, units: Units) -> RawWeather {
        let mut rng = self.rng.lock();
        let normalized = location.to_lowercase();

        let city = match city_preset(&normalized) {
            Some(city) => city,
            None => CityPreset {
                name: location,
                country: "US",
                lat: 40.0,
                lon: -100.0,
                temp: rng.random_range(15.0..30.0),
                condition: ["clear", "clouds", "rain"]
                    .choose(&mut *rng)
                    .copied()
                    .unwrap_or("clear"),
            },
        };

        let condition = condition_preset(city.condition);

        let base = city.temp;
        let mut temp = base;
        let mut feels_like = base - rng.random_range(0.0..2.0);
        let mut temp_min = base - rng.random_range(0.0..4.0);
        let mut temp_max = base + rng.random_range(0.0..4.0);
        let mut wind_speed = rng.random_range(2.0..7.0);

        if units == Units::Imperial {
            for t in [&mut temp, &mut feels_like, &mut temp_min, &mut temp_max] {
                *t = *t * 9.0 / 5.0 + 32.0;
            }
            wind_speed *= 2.237;
        }

        let now = Utc::now().timestamp();

        RawWeather {
            name: city.name.to_string(),
            coord: RawCoord {
                lat: city.lat,
                lon: city.lon,
            },
            weather: vec![RawCondition {
                id: condition.id,
                main: condition.main.to_string(),
                description: condition.description.to_string(),
                icon: condition.icon.to_string(),
            }],
            main: RawMain {
                temp,
                feels_like,
                temp_min,
                temp_max,
                pressure: 1015,
                humidity: rng.random_range(40..90),
            },
            wind: RawWind {
                speed: wind_speed,
                deg: rng.random_range(0..360),
            },
            visibility: 10000,
            dt: now,
            sys: RawSys {
                country: city.country.to_string(),
                sunrise: now - SUN_OFFSET_SECS,
                sunset: now + SUN_OFFSET_SECS,
            },
            timezone: -25200,
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WeatherProvider for MockProvider {
    async fn fetch_current(
        &self,
        location: &str,
        units: Units,
    ) -> Result<RawWeather, WeatherError> {
        Ok(self.generate(location, units))
    }
}

struct CityPreset<'a> {
    name: &'a str,
    country: &'static str,
    lat: f64,
    lon: f64,
    /// Base temperature in Celsius.
    temp: f64,
    condition: &'static str,
}

fn city_preset(normalized: &str) -> Option<CityPreset<'static>> {
    let preset = match normalized {
        "london" => ("London", "GB", 51.5085, -0.1257, 14.2, "clouds"),
        "new york" => ("New York", "US", 40.7143, -74.006, 18.5, "clear"),
        "tokyo" => ("Tokyo", "JP", 35.6895, 139.6917, 25.8, "scattered clouds"),
        "paris" => ("Paris", "FR", 48.8534, 2.3488, 17.3, "broken clouds"),
        "san francisco" => ("San Francisco", "US", 37.7749, -122.4194, 22.5, "clear"),
        "sydney" => ("Sydney", "AU", -33.8679, 151.2073, 28.7, "clear"),
        "moscow" => ("Moscow", "RU", 55.7522, 37.6156, 1.2, "snow"),
        "cairo" => ("Cairo", "EG", 30.0626, 31.2497, 33.5, "clear"),
        "rio de janeiro" => ("Rio de Janeiro", "BR", -22.9028, -43.2075, 30.2, "rain"),
        "cape town" => ("Cape Town", "ZA", -33.9258, 18.4232, 24.8, "clear"),
        _ => return None,
    };

    let (name, country, lat, lon, temp, condition) = preset;
    Some(CityPreset {
        name,
        country,
        lat,
        lon,
        temp,
        condition,
    })
}

struct ConditionPreset {
    id: i64,
    main: &'static str,
    description: &'static str,
    icon: &'static str,
}

fn condition_preset(key: &str) -> ConditionPreset {
    let (id, main, description, icon) = match key {
        "clouds" => (801, "Clouds", "few clouds", "02d"),
        "scattered clouds" => (802, "Clouds", "scattered clouds", "03d"),
        "broken clouds" => (803, "Clouds", "broken clouds", "04d"),
        "rain" => (500, "Rain", "light rain", "10d"),
        "heavy rain" => (502, "Rain", "heavy rain", "09d"),
        "thunderstorm" => (200, "Thunderstorm", "thunderstorm with light rain", "11d"),
        "snow" => (600, "Snow", "light snow", "13d"),
        "mist" => (701, "Mist", "mist", "50d"),
        // Unknown keys fall back to clear.
        _ => (800, "Clear", "clear sky", "01d"),
    };

    ConditionPreset {
        id,
        main,
        description,
        icon,
    }
}
