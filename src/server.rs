//! Local HTTP API over the geo dataset and the reading pipeline.

use crate::client::ReadingSource;
use crate::form::SubmitBlocked;
use crate::geo::{City, GeoDataset, SelectOption};
use crate::models::BirthInput;
use crate::session::{Reading, ReadingSession, SessionError};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<GeoDataset>,
    pub source: Arc<dyn ReadingSource>,
}

#[derive(Debug, Deserialize)]
pub struct CountyQuery {
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Deserialize)]
pub struct CityQuery {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub county: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/countries", get(countries))
        .route("/api/counties", get(counties))
        .route("/api/cities", get(cities))
        .route("/api/reading", post(reading))
        .with_state(state)
}

/// Bind `addr` and serve until the process exits
pub async fn serve(state: AppState, addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API server running at http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// GET /api/countries
async fn countries(State(state): State<AppState>) -> Json<Vec<SelectOption>> {
    Json(state.dataset.countries())
}

/// GET /api/counties?country=RO
async fn counties(
    State(state): State<AppState>,
    Query(query): Query<CountyQuery>,
) -> Json<Vec<SelectOption>> {
    Json(state.dataset.subdivisions(&query.country))
}

/// GET /api/cities?country=RO&county=CJ
async fn cities(State(state): State<AppState>, Query(query): Query<CityQuery>) -> Json<Vec<City>> {
    Json(state.dataset.cities(&query.country, &query.county))
}

/// POST /api/reading
async fn reading(
    State(state): State<AppState>,
    Json(input): Json<BirthInput>,
) -> Result<Json<Reading>, ApiError> {
    let coordinates = state
        .dataset
        .resolve(&input.country, &input.county, &input.city);
    let mut session = ReadingSession::new(state.source.clone());
    let reading = session.submit(&input, coordinates).await?;
    Ok(Json(reading.clone()))
}

pub struct ApiError(SessionError);

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            SessionError::Blocked(SubmitBlocked::Invalid(errors)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "errors": errors })),
            )
                .into_response(),
            SessionError::Blocked(blocked) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": blocked.to_string() })),
            )
                .into_response(),
            SessionError::Fetch(e) => {
                warn!("Reading request failed: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({ "error": "Failed to fetch reading" })),
                )
                    .into_response()
            }
        }
    }
}
