use serde::{Deserialize, Serialize};

/// Unit system requested by the caller.
///
/// Selects both the provider query parameter and the units of the returned
/// temperature and wind speed fields. Part of the cache key, so metric and
/// imperial requests for the same city occupy independent slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Metric, Units::Imperial]
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    // Case-sensitive on purpose: these strings are forwarded verbatim to the
    // provider and embedded in cache keys.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: metric, imperial."
            )),
        }
    }
}

/// The internal, provider-agnostic weather representation returned to all
/// callers. Serialized field names match the public API contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedWeather {
    pub location: Location,
    pub weather: Condition,
    pub temperature: Temperature,
    pub details: Details,
    /// Observation time, epoch seconds UTC. Adding `timezone` yields the
    /// location-local epoch used for day/night theming downstream.
    pub timestamp: i64,
    pub timezone: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub country: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Canonical category, e.g. "Clear".
    pub condition: String,
    /// Free-text description, e.g. "clear sky".
    pub description: String,
    pub icon: String,
    /// Provider's numeric classification, used downstream for theme mapping.
    pub id: i64,
}

/// All temperature fields are integers, rounded independently from the
/// provider's floats, in the unit system requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Temperature {
    pub current: i64,
    pub feels_like: i64,
    pub min: i64,
    pub max: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Details {
    pub humidity: u8,
    pub pressure: u32,
    pub wind_speed: f64,
    pub wind_direction: u16,
    pub visibility: i64,
    pub sunrise: i64,
    pub sunset: i64,
}
