use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use weather_core::{NormalizedWeather, Units, WeatherError, WeatherService};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<WeatherService>,
}

/// Build the API router around an already-constructed service.
pub fn app(service: Arc<WeatherService>) -> Router {
    Router::new()
        // A bare /api/weather has no location segment to match, so answer
        // the 400 here instead of letting it fall through to a 404.
        .route("/api/weather", get(missing_location))
        .route("/api/weather/", get(missing_location))
        .route("/api/weather/{location}", get(get_weather))
        .with_state(AppState { service })
}

#[derive(Debug, Deserialize)]
struct WeatherQuery {
    units: Option<Units>,
}

async fn get_weather(
    State(state): State<AppState>,
    Path(location): Path<String>,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<NormalizedWeather>, (StatusCode, Json<Value>)> {
    tracing::debug!(location, units = ?query.units, "weather request received");

    state
        .service
        .get_current_weather(&location, query.units)
        .await
        .map(Json)
        .map_err(error_response)
}

async fn missing_location() -> (StatusCode, Json<Value>) {
    error_response(WeatherError::InvalidRequest)
}

/// Map the orchestrator's error classes onto HTTP statuses. Only the
/// not-found message is safe to echo back; everything else gets a generic
/// body so internal detail never reaches the client.
fn error_response(err: WeatherError) -> (StatusCode, Json<Value>) {
    match &err {
        WeatherError::InvalidRequest => {
            (StatusCode::BAD_REQUEST, Json(json!({ "error": err.to_string() })))
        }
        WeatherError::LocationNotFound(_) => {
            tracing::debug!(error = %err, "location not found");
            (StatusCode::NOT_FOUND, Json(json!({ "error": err.to_string() })))
        }
        WeatherError::Upstream(_) | WeatherError::Configuration(_) => {
            tracing::error!(error = %err, "failed to retrieve weather data");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to retrieve weather data" })),
            )
        }
    }
}
