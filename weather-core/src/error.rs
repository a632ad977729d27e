use thiserror::Error;

/// Failure classes the orchestrator can resolve to.
///
/// The HTTP boundary maps `LocationNotFound` to 404, `InvalidRequest` to 400
/// and everything else to a generic 500. `Display` output is what clients may
/// see, so provider payloads and credentials must never end up in these
/// messages.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Missing or blank location parameter.
    #[error("Location is required")]
    InvalidRequest,

    /// The provider confirmed there is no such place.
    #[error("Location '{0}' not found")]
    LocationNotFound(String),

    /// Any other provider or transport failure.
    #[error("Failed to fetch weather data: {0}")]
    Upstream(String),

    /// No usable credential in live mode. Treated as an upstream failure
    /// by the boundary layer.
    #[error("Weather provider is not configured: {0}")]
    Configuration(String),
}

impl WeatherError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::LocationNotFound(_))
    }
}
