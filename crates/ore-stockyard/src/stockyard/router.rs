use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::StorageAreaId;
use super::repository::{StockyardRepository, StorageAreaView, UnloadingEventLog};
use super::service::{CoordinateInput, UnloadingService, UnloadingServiceError};

/// Body of an unloading submission.
#[derive(Debug, Clone, Deserialize)]
pub struct UnloadingSubmission {
    pub inputs: Vec<CoordinateInput>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EventQuery {
    pub limit: Option<usize>,
}

/// Router builder exposing the stockyard endpoints.
pub fn stockyard_router<R, L>(service: Arc<UnloadingService<R, L>>) -> Router
where
    R: StockyardRepository + 'static,
    L: UnloadingEventLog + 'static,
{
    Router::new()
        .route("/api/v1/stockyard/trucks", get(trucks_handler::<R, L>))
        .route("/api/v1/stockyard/events", get(events_handler::<R, L>))
        .route(
            "/api/v1/stockyard/areas/:storage_area_id",
            get(storage_area_handler::<R, L>),
        )
        .route(
            "/api/v1/stockyard/areas/:storage_area_id/unloadings",
            post(submit_handler::<R, L>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<R, L>(
    State(service): State<Arc<UnloadingService<R, L>>>,
    Path(storage_area_id): Path<String>,
    axum::Json(submission): axum::Json<UnloadingSubmission>,
) -> Response
where
    R: StockyardRepository + 'static,
    L: UnloadingEventLog + 'static,
{
    let id = StorageAreaId(storage_area_id);
    match service.submit(&id, submission.inputs) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn storage_area_handler<R, L>(
    State(service): State<Arc<UnloadingService<R, L>>>,
    Path(storage_area_id): Path<String>,
) -> Response
where
    R: StockyardRepository + 'static,
    L: UnloadingEventLog + 'static,
{
    match service.storage_area(&StorageAreaId(storage_area_id)) {
        Ok(area) => (StatusCode::OK, axum::Json(StorageAreaView::from(&area))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn trucks_handler<R, L>(
    State(service): State<Arc<UnloadingService<R, L>>>,
) -> Response
where
    R: StockyardRepository + 'static,
    L: UnloadingEventLog + 'static,
{
    match service.trucks() {
        Ok(trucks) => (StatusCode::OK, axum::Json(trucks)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn events_handler<R, L>(
    State(service): State<Arc<UnloadingService<R, L>>>,
    Query(query): Query<EventQuery>,
) -> Response
where
    R: StockyardRepository + 'static,
    L: UnloadingEventLog + 'static,
{
    match service.recent_events(query.limit) {
        Ok(events) => (StatusCode::OK, axum::Json(events)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: UnloadingServiceError) -> Response {
    let status = match err {
        UnloadingServiceError::StorageAreaNotFound(_) => StatusCode::NOT_FOUND,
        UnloadingServiceError::UnknownVehicle(_) | UnloadingServiceError::DuplicateVehicle(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        UnloadingServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
