//! HTTP routes.
//!
//! Every data endpoint asks the [`DataService`] for the current snapshot and
//! projects it with `power_plus::query`. No handler keeps state of its own.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use common::DataError;
use power_plus::query;
use refresh::{DataService, Origin};
use serde_json::json;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

type AppState = Arc<DataService>;

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("No data available")]
    NoData,
}

impl From<DataError> for ApiError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::NoDataAvailable => ApiError::NoData,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::NoData => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Build the router with all endpoints.
pub fn router(service: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/players", get(all_players))
        .route("/api/players/qualified", get(qualified_players))
        .route("/api/players/elite", get(elite_players))
        .route("/api/player/:name", get(player))
        .route("/api/stats/summary", get(summary))
        .route("/api/refresh", get(refresh))
        .route("/api/teams/:code", get(team_players))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(service)
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

async fn all_players(State(service): State<AppState>) -> Result<Response, ApiError> {
    let snapshot = service.get_data().await?;
    Ok(Json(snapshot.data()).into_response())
}

async fn qualified_players(State(service): State<AppState>) -> Result<Response, ApiError> {
    let snapshot = service.get_data().await?;
    Ok(Json(query::qualified(snapshot.data())).into_response())
}

async fn elite_players(State(service): State<AppState>) -> Result<Response, ApiError> {
    let snapshot = service.get_data().await?;
    Ok(Json(query::elite(snapshot.data())).into_response())
}

async fn player(
    State(service): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let snapshot = service.get_data().await?;
    match query::find_player(snapshot.data(), &name) {
        Some(record) => Ok(Json(record).into_response()),
        None => Err(ApiError::NotFound("Player")),
    }
}

async fn team_players(
    State(service): State<AppState>,
    Path(code): Path<String>,
) -> Result<Response, ApiError> {
    let snapshot = service.get_data().await?;
    Ok(Json(query::by_team(snapshot.data(), &code)).into_response())
}

async fn summary(State(service): State<AppState>) -> Result<Response, ApiError> {
    let snapshot = service.get_data().await?;
    let summary =
        query::summarize(snapshot.data(), snapshot.timestamp()).ok_or(ApiError::NoData)?;
    Ok(Json(summary).into_response())
}

async fn refresh(State(service): State<AppState>) -> Result<Response, ApiError> {
    let snapshot = service.force_refresh().await?;
    let status = match snapshot.origin {
        Origin::Refreshed | Origin::Cached => "success",
        Origin::Fallback => "fallback",
    };
    Ok(Json(json!({
        "status": status,
        "players_count": snapshot.data().len(),
        "timestamp": Utc::now().to_rfc3339(),
        "data_timestamp": snapshot.timestamp().to_rfc3339(),
    }))
    .into_response())
}
