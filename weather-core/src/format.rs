//! Mapping from the provider's raw schema to the normalized schema.

use crate::model::{Condition, Coordinates, Details, Location, NormalizedWeather, Temperature};
use crate::provider::RawWeather;

/// Reshape a raw provider response into [`NormalizedWeather`].
///
/// Pure pass-through apart from temperature rounding. min/max are not
/// reconciled against current; the provider can legitimately report
/// non-monotonic values during rapid fronts and we keep whatever it said.
pub fn normalize(raw: &RawWeather) -> NormalizedWeather {
    let condition = raw.weather.first();

    NormalizedWeather {
        location: Location {
            name: raw.name.clone(),
            country: raw.sys.country.clone(),
            coordinates: Coordinates {
                lat: raw.coord.lat,
                lon: raw.coord.lon,
            },
        },
        weather: Condition {
            condition: condition.map_or_else(|| "Unknown".to_string(), |w| w.main.clone()),
            description: condition.map_or_else(|| "Unknown".to_string(), |w| w.description.clone()),
            icon: condition.map_or_else(String::new, |w| w.icon.clone()),
            id: condition.map_or(0, |w| w.id),
        },
        temperature: Temperature {
            current: round(raw.main.temp),
            feels_like: round(raw.main.feels_like),
            min: round(raw.main.temp_min),
            max: round(raw.main.temp_max),
        },
        details: Details {
            humidity: raw.main.humidity,
            pressure: raw.main.pressure,
            wind_speed: raw.wind.speed,
            wind_direction: raw.wind.deg,
            visibility: raw.visibility,
            sunrise: raw.sys.sunrise,
            sunset: raw.sys.sunset,
        },
        timestamp: raw.dt,
        timezone: raw.timezone,
    }
}

/// Nearest-integer rounding, applied independently per field.
fn round(value: f64) -> i64 {
    value.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{RawCondition, RawCoord, RawMain, RawSys, RawWind};

    fn london_raw() -> RawWeather {
        RawWeather {
            name: "London".to_string(),
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

    #[test]
    fn temperatures_round_to_nearest_integer() {
        let weather = normalize(&london_raw());
        assert_eq!(weather.temperature.current, 16);
        assert_eq!(weather.temperature.feels_like, 15);
        assert_eq!(weather.temperature.min, 14);
        assert_eq!(weather.temperature.max, 17);
    }

    #[test]
    fn all_other_fields_pass_through() {
        let weather = normalize(&london_raw());
        assert_eq!(weather.location.name, "London");
        assert_eq!(weather.location.country, "GB");
        assert_eq!(weather.location.coordinates.lat, 51.51);
        assert_eq!(weather.weather.condition, "Clear");
        assert_eq!(weather.weather.description, "clear sky");
        assert_eq!(weather.weather.icon, "01d");
        assert_eq!(weather.weather.id, 800);
        assert_eq!(weather.details.humidity, 76);
        assert_eq!(weather.details.pressure, 1011);
        assert_eq!(weather.details.wind_speed, 3.6);
        assert_eq!(weather.details.wind_direction, 230);
        assert_eq!(weather.details.visibility, 10000);
        assert_eq!(weather.details.sunrise, 1617508800);
        assert_eq!(weather.details.sunset, 1617556800);
        assert_eq!(weather.timestamp, 1617540000);
        assert_eq!(weather.timezone, 3600);
    }

    #[test]
    fn normalize_is_pure() {
        let raw = london_raw();
        assert_eq!(normalize(&raw), normalize(&raw));
    }

    #[test]
    fn non_monotonic_min_max_is_preserved() {
        let mut raw = london_raw();
        raw.main.temp_min = 20.9;
        raw.main.temp_max = 12.1;

        let weather = normalize(&raw);
        assert_eq!(weather.temperature.min, 21);
        assert_eq!(weather.temperature.max, 12);
    }

    #[test]
    fn negative_temperatures_round_away_from_zero_boundary_free() {
        let mut raw = london_raw();
        raw.main.temp = -3.4;
        raw.main.feels_like = -7.8;

        let weather = normalize(&raw);
        assert_eq!(weather.temperature.current, -3);
        assert_eq!(weather.temperature.feels_like, -8);
    }

    #[test]
    fn empty_condition_list_degrades_to_unknown() {
        let mut raw = london_raw();
        raw.weather.clear();

        let weather = normalize(&raw);
        assert_eq!(weather.weather.condition, "Unknown");
        assert_eq!(weather.weather.id, 0);
        assert_eq!(weather.weather.icon, "");
    }
}
