//! Geofenced ore intake: fence containment, delivery classification,
//! mass-weighted blending, and the service/HTTP layer that records unloadings.

pub mod batch;
pub mod blending;
pub mod classifier;
pub mod domain;
pub mod fleet;
pub mod geometry;
pub mod parse;
pub mod report;
pub mod repository;
pub mod roster;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use batch::{process_batch, process_batch_with_fence, BatchResult};
pub use blending::blend;
pub use classifier::classify;
pub use domain::{
    ClassificationOutcome, ClassificationReason, CompositionError, ConstituentMass,
    InventoryState, MaterialComposition, StorageAreaId, VehicleDelivery, VehicleId,
};
pub use fleet::{Truck, TruckModel};
pub use geometry::{contains, Point, Polygon, PolygonError};
pub use parse::{parse_coordinates, parse_fence_wkt, parse_polygon_wkt, WktError};
pub use report::{round_percent, UnloadingReport};
pub use repository::{
    RepositoryError, StockyardRepository, StorageArea, StorageAreaView, UnloadingEvent,
    UnloadingEventLog,
};
pub use roster::{parse_roster, parse_roster_path, RosterEntry, RosterImportError};
pub use router::{stockyard_router, UnloadingSubmission};
pub use service::{CoordinateInput, UnloadingService, UnloadingServiceError};
