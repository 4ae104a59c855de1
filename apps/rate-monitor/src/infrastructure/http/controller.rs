//! HTTP Controller (Driver Adapter)
//!
//! Axum-based REST API over the stored rates.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};

use crate::application::dto::{ChangePerHourDto, RateDto};
use crate::application::use_cases::QueryRatesUseCase;
use crate::domain::rate_aggregation::SnapshotRepository;
use crate::domain::shared::Symbol;

use super::response::{HealthResponse, StoreErrorResponse};

/// Application state shared across handlers.
pub struct AppState<R>
where
    R: SnapshotRepository,
{
    /// Read-side use case.
    pub query: QueryRatesUseCase<R>,
    /// Application version.
    pub version: String,
}

impl<R> Clone for AppState<R>
where
    R: SnapshotRepository,
{
    fn clone(&self) -> Self {
        Self {
            query: self.query.clone(),
            version: self.version.clone(),
        }
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router<R>(state: AppState<R>) -> Router
where
    R: SnapshotRepository + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .route("/rates", get(list_rates))
        .route("/rates/{name}", get(get_rate))
        .route("/rates/{name}/change", get(get_change_per_hour))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check<R>(State(state): State<AppState<R>>) -> impl IntoResponse
where
    R: SnapshotRepository,
{
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
    })
}

/// All stored rates.
async fn list_rates<R>(
    State(state): State<AppState<R>>,
) -> Result<Json<Vec<RateDto>>, StoreErrorResponse>
where
    R: SnapshotRepository,
{
    let snapshots = state.query.all().await?;
    Ok(Json(snapshots.iter().map(RateDto::from).collect()))
}

/// One stored rate.
async fn get_rate<R>(
    State(state): State<AppState<R>>,
    Path(name): Path<String>,
) -> Result<Json<RateDto>, StoreErrorResponse>
where
    R: SnapshotRepository,
{
    let snapshot = state.query.one(&Symbol::new(name)).await?;
    Ok(Json(RateDto::from(&snapshot)))
}

async fn get_change_per_hour<R>(
    State(state): State<AppState<R>>,
    Path(name): Path<String>,
) -> Result<Json<ChangePerHourDto>, StoreErrorResponse>
where
    R: SnapshotRepository,
{
    let symbol = Symbol::new(name);
    let change = state.query.change_per_hour(&symbol).await?;
    Ok(Json(ChangePerHourDto::new(&symbol, change)))
}
