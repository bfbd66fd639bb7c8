use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{ClassificationReason, InventoryState, StorageAreaId, VehicleId};
use super::fleet::Truck;
use super::geometry::Point;
use super::parse::{parse_fence_wkt, parse_polygon_wkt};

pub const DEFAULT_STORAGE_AREA_NAME: &str = "Main stockyard";

/// Persisted storage area: its inventory and fence definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageArea {
    pub id: StorageAreaId,
    pub name: String,
    pub inventory: InventoryState,
    /// Fence as WKT, e.g. `POLYGON((30 10, 40 40, 20 40, 10 20, 30 10))`.
    pub polygon_wkt: String,
}

impl StorageArea {
    pub fn new(id: StorageAreaId, inventory: InventoryState, polygon_wkt: impl Into<String>) -> Self {
        Self {
            id,
            name: DEFAULT_STORAGE_AREA_NAME.to_string(),
            inventory,
            polygon_wkt: polygon_wkt.into(),
        }
    }

    /// Decoded fence vertices, or `None` when the stored text is unusable.
    pub fn fence(&self) -> Option<Vec<Point>> {
        match parse_polygon_wkt(&self.polygon_wkt) {
            Ok(vertices) => Some(vertices),
            Err(err) => {
                warn!(storage_area = %self.id, error = %err, "stored fence could not be parsed");
                None
            }
        }
    }
}

/// One recorded unloading attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnloadingEvent {
    pub id: u64,
    pub storage_area_id: StorageAreaId,
    pub vehicle_id: VehicleId,
    pub coordinate_input: String,
    pub is_inside: bool,
    pub reason: ClassificationReason,
    pub recorded_at: DateTime<Utc>,
}

/// Storage abstraction for storage areas and the fleet.
pub trait StockyardRepository: Send + Sync {
    fn storage_area(&self, id: &StorageAreaId) -> Result<Option<StorageArea>, RepositoryError>;
    fn save_inventory(
        &self,
        id: &StorageAreaId,
        inventory: InventoryState,
    ) -> Result<(), RepositoryError>;
    fn truck(&self, board_number: &VehicleId) -> Result<Option<Truck>, RepositoryError>;
    fn trucks(&self) -> Result<Vec<Truck>, RepositoryError>;
}

/// Append-only log of unloading events.
pub trait UnloadingEventLog: Send + Sync {
    fn append(&self, events: Vec<UnloadingEvent>) -> Result<(), RepositoryError>;
    /// Most recent events first.
    fn recent(&self, limit: usize) -> Result<Vec<UnloadingEvent>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Public view of a storage area for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct StorageAreaView {
    pub id: StorageAreaId,
    pub name: String,
    pub volume_tons: f64,
    pub percent_sio2: f64,
    pub percent_fe: f64,
    pub polygon_wkt: String,
    pub fence_valid: bool,
}

impl From<&StorageArea> for StorageAreaView {
    fn from(area: &StorageArea) -> Self {
        Self {
            id: area.id.clone(),
            name: area.name.clone(),
            volume_tons: area.inventory.volume_tons,
            percent_sio2: area.inventory.composition.percent_sio2,
            percent_fe: area.inventory.composition.percent_fe,
            polygon_wkt: area.polygon_wkt.clone(),
            fence_valid: parse_fence_wkt(&area.polygon_wkt).is_ok(),
        }
    }
}
