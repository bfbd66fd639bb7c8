use super::domain::{ClassificationOutcome, ClassificationReason, VehicleDelivery};
use super::geometry::Polygon;

/// Decides whether a single delivery lands inside the fence.
///
/// A missing fence rejects every delivery with [`ClassificationReason::NoPolygon`]
/// before the coordinate is considered.
pub fn classify(delivery: &VehicleDelivery, fence: Option<&Polygon>) -> ClassificationOutcome {
    let reason = match (fence, delivery.delivery_point) {
        (None, _) => ClassificationReason::NoPolygon,
        (Some(_), None) => ClassificationReason::UnparsableCoordinate,
        (Some(polygon), Some(point)) if polygon.contains(point) => ClassificationReason::Accepted,
        (Some(_), Some(_)) => ClassificationReason::OutsideFence,
    };

    ClassificationOutcome::new(delivery.vehicle_id.clone(), reason)
}
