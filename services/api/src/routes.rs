use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use ore_stockyard::error::AppError;
use ore_stockyard::stockyard::{
    parse_coordinates, parse_fence_wkt, process_batch_with_fence, stockyard_router, InventoryState,
    MaterialComposition, StockyardRepository, UnloadingEventLog, UnloadingReport,
    UnloadingService, VehicleDelivery, VehicleId,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

/// Stateless batch evaluation: nothing is read from or written to storage.
#[derive(Debug, Deserialize)]
pub(crate) struct BatchRequest {
    pub(crate) volume_tons: f64,
    pub(crate) percent_sio2: f64,
    pub(crate) percent_fe: f64,
    #[serde(default)]
    pub(crate) polygon_wkt: Option<String>,
    pub(crate) deliveries: Vec<BatchDeliveryRequest>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BatchDeliveryRequest {
    pub(crate) vehicle_id: String,
    pub(crate) quantity_tons: f64,
    pub(crate) percent_sio2: f64,
    pub(crate) percent_fe: f64,
    pub(crate) coordinates: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct BatchResponse {
    pub(crate) fence_configured: bool,
    pub(crate) new_state: InventoryState,
    pub(crate) report: UnloadingReport,
}

pub(crate) fn with_stockyard_routes<R, L>(service: Arc<UnloadingService<R, L>>) -> axum::Router
where
    R: StockyardRepository + 'static,
    L: UnloadingEventLog + 'static,
{
    stockyard_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/stockyard/batch",
            axum::routing::post(batch_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn batch_endpoint(
    Json(payload): Json<BatchRequest>,
) -> Result<Json<BatchResponse>, AppError> {
    let BatchRequest {
        volume_tons,
        percent_sio2,
        percent_fe,
        polygon_wkt,
        deliveries,
    } = payload;

    let current = InventoryState::new(
        volume_tons,
        MaterialComposition::new(percent_sio2, percent_fe)?,
    )?;

    let deliveries = deliveries
        .into_iter()
        .map(|delivery| -> Result<VehicleDelivery, AppError> {
            Ok(VehicleDelivery::new(
                VehicleId(delivery.vehicle_id),
                delivery.quantity_tons,
                MaterialComposition::new(delivery.percent_sio2, delivery.percent_fe)?,
                parse_coordinates(&delivery.coordinates),
            )?)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let fence = polygon_wkt.and_then(|wkt| match parse_fence_wkt(&wkt) {
        Ok(polygon) => Some(polygon),
        Err(err) => {
            warn!(error = %err, "batch fence unusable; rejecting all deliveries");
            None
        }
    });

    let result = process_batch_with_fence(&current, fence.as_ref(), &deliveries);
    let report = UnloadingReport::new(&current, &result);

    Ok(Json(BatchResponse {
        fence_configured: fence.is_some(),
        new_state: result.new_state,
        report,
    }))
}
