use serde::Serialize;
use tracing::{debug, info, warn};

use super::blending::blend;
use super::classifier::classify;
use super::domain::{ClassificationOutcome, InventoryState, VehicleDelivery};
use super::geometry::{Point, Polygon};

/// Result of one batch: per-delivery outcomes in input order plus the new inventory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchResult {
    pub outcomes: Vec<ClassificationOutcome>,
    pub new_state: InventoryState,
    pub accepted_volume_tons: f64,
}

impl BatchResult {
    pub fn accepted_count(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.accepted).count()
    }

    pub fn rejected_count(&self) -> usize {
        self.outcomes.len() - self.accepted_count()
    }
}

/// Classifies every delivery against the fence and blends the accepted ones
/// into `current`.
///
/// A fence that fails validation is handled exactly like a missing one, so a
/// malformed fence definition rejects the batch's deliveries instead of
/// failing the call.
pub fn process_batch(
    current: &InventoryState,
    fence_vertices: Option<&[Point]>,
    deliveries: &[VehicleDelivery],
) -> BatchResult {
    let fence = fence_vertices.and_then(|vertices| match Polygon::new(vertices.iter().copied()) {
        Ok(polygon) => Some(polygon),
        Err(err) => {
            warn!(error = %err, "fence unusable; rejecting all deliveries");
            None
        }
    });

    process_batch_with_fence(current, fence.as_ref(), deliveries)
}

/// Same as [`process_batch`] for callers holding an already validated fence.
pub fn process_batch_with_fence(
    current: &InventoryState,
    fence: Option<&Polygon>,
    deliveries: &[VehicleDelivery],
) -> BatchResult {
    let mut outcomes = Vec::with_capacity(deliveries.len());
    let mut accepted = Vec::new();

    for delivery in deliveries {
        let outcome = classify(delivery, fence);
        debug!(
            vehicle = %outcome.vehicle_id,
            reason = ?outcome.reason,
            quantity_tons = delivery.quantity_tons,
            "delivery classified"
        );
        if outcome.accepted {
            accepted.push(delivery.clone());
        }
        outcomes.push(outcome);
    }

    let new_state = blend(current, &accepted);
    let accepted_volume_tons: f64 = accepted
        .iter()
        .map(|delivery| delivery.quantity_tons)
        .sum();

    info!(
        deliveries = deliveries.len(),
        accepted = accepted.len(),
        volume_tons = new_state.volume_tons,
        "batch processed"
    );

    BatchResult {
        outcomes,
        new_state,
        accepted_volume_tons,
    }
}
