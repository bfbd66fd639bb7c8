use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::config::StockyardConfig;
use crate::stockyard::domain::{InventoryState, MaterialComposition, StorageAreaId, VehicleId};
use crate::stockyard::fleet::{Truck, TruckModel};
use crate::stockyard::repository::{
    RepositoryError, StockyardRepository, StorageArea, UnloadingEvent, UnloadingEventLog,
};
use crate::stockyard::{stockyard_router, UnloadingService};

pub(super) const FENCE_WKT: &str = "POLYGON((30 10, 40 40, 20 40, 10 20, 30 10))";

pub(super) fn area_id() -> StorageAreaId {
    StorageAreaId("north".to_string())
}

pub(super) fn initial_inventory() -> InventoryState {
    InventoryState {
        volume_tons: 100.0,
        composition: MaterialComposition {
            percent_sio2: 60.0,
            percent_fe: 30.0,
        },
    }
}

pub(super) fn storage_area() -> StorageArea {
    StorageArea::new(area_id(), initial_inventory(), FENCE_WKT)
}

pub(super) fn truck(board_number: &str, load: u32, sio2: f64, fe: f64) -> Truck {
    Truck {
        board_number: board_number.into(),
        model: TruckModel {
            name: "BelAZ-7555".to_string(),
            max_capacity_tons: 55,
        },
        current_load_tons: load,
        composition: MaterialComposition {
            percent_sio2: sio2,
            percent_fe: fe,
        },
    }
}

pub(super) fn fleet() -> Vec<Truck> {
    vec![
        truck("B-101", 50, 80.0, 10.0),
        truck("B-102", 40, 20.0, 60.0),
        truck("B-103", 30, 50.0, 25.0),
    ]
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    areas: Arc<Mutex<HashMap<StorageAreaId, StorageArea>>>,
    trucks: Arc<Mutex<Vec<Truck>>>,
    saves_fail: Arc<AtomicBool>,
}

impl MemoryRepository {
    pub(super) fn seeded() -> Self {
        Self::with_area(storage_area())
    }

    pub(super) fn with_area(area: StorageArea) -> Self {
        let repository = Self::default();
        repository.insert_area(area);
        *repository.trucks.lock().expect("truck mutex poisoned") = fleet();
        repository
    }

    pub(super) fn insert_area(&self, area: StorageArea) {
        self.areas
            .lock()
            .expect("area mutex poisoned")
            .insert(area.id.clone(), area);
    }

    pub(super) fn fail_saves(&self) {
        self.saves_fail.store(true, Ordering::SeqCst);
    }

    pub(super) fn inventory(&self, id: &StorageAreaId) -> Option<InventoryState> {
        self.areas
            .lock()
            .expect("area mutex poisoned")
            .get(id)
            .map(|area| area.inventory)
    }
}

impl StockyardRepository for MemoryRepository {
    fn storage_area(&self, id: &StorageAreaId) -> Result<Option<StorageArea>, RepositoryError> {
        Ok(self
            .areas
            .lock()
            .expect("area mutex poisoned")
            .get(id)
            .cloned())
    }

    fn save_inventory(
        &self,
        id: &StorageAreaId,
        inventory: InventoryState,
    ) -> Result<(), RepositoryError> {
        if self.saves_fail.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("write failed".to_string()));
        }
        let mut guard = self.areas.lock().expect("area mutex poisoned");
        let area = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        area.inventory = inventory;
        Ok(())
    }

    fn truck(&self, board_number: &VehicleId) -> Result<Option<Truck>, RepositoryError> {
        Ok(self
            .trucks
            .lock()
            .expect("truck mutex poisoned")
            .iter()
            .find(|truck| &truck.board_number == board_number)
            .cloned())
    }

    fn trucks(&self) -> Result<Vec<Truck>, RepositoryError> {
        Ok(self.trucks.lock().expect("truck mutex poisoned").clone())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryEventLog {
    events: Arc<Mutex<Vec<UnloadingEvent>>>,
}

impl MemoryEventLog {
    pub(super) fn events(&self) -> Vec<UnloadingEvent> {
        self.events.lock().expect("event mutex poisoned").clone()
    }
}

impl UnloadingEventLog for MemoryEventLog {
    fn append(&self, events: Vec<UnloadingEvent>) -> Result<(), RepositoryError> {
        self.events
            .lock()
            .expect("event mutex poisoned")
            .extend(events);
        Ok(())
    }

    fn recent(&self, limit: usize) -> Result<Vec<UnloadingEvent>, RepositoryError> {
        Ok(self
            .events
            .lock()
            .expect("event mutex poisoned")
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }
}

pub(super) struct RejectingEventLog;

impl UnloadingEventLog for RejectingEventLog {
    fn append(&self, _events: Vec<UnloadingEvent>) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("event log offline".to_string()))
    }

    fn recent(&self, _limit: usize) -> Result<Vec<UnloadingEvent>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl StockyardRepository for UnavailableRepository {
    fn storage_area(&self, _id: &StorageAreaId) -> Result<Option<StorageArea>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn save_inventory(
        &self,
        _id: &StorageAreaId,
        _inventory: InventoryState,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn truck(&self, _board_number: &VehicleId) -> Result<Option<Truck>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn trucks(&self) -> Result<Vec<Truck>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) type MemoryService = UnloadingService<MemoryRepository, MemoryEventLog>;

pub(super) fn service(repository: MemoryRepository, events: MemoryEventLog) -> MemoryService {
    UnloadingService::new(
        Arc::new(repository),
        Arc::new(events),
        StockyardConfig {
            recent_event_limit: 2,
        },
    )
}

pub(super) fn router_with_seeded_service() -> (axum::Router, MemoryRepository, MemoryEventLog) {
    let repository = MemoryRepository::seeded();
    let events = MemoryEventLog::default();
    let router = stockyard_router(Arc::new(service(repository.clone(), events.clone())));
    (router, repository, events)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
