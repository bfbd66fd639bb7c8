use metrics_exporter_prometheus::PrometheusHandle;
use ore_stockyard::stockyard::{
    InventoryState, MaterialComposition, RepositoryError, StockyardRepository, StorageArea,
    StorageAreaId, Truck, TruckModel, UnloadingEvent, UnloadingEventLog, VehicleId,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

pub(crate) const DEFAULT_STORAGE_AREA: &str = "main";
pub(crate) const DEFAULT_FENCE_WKT: &str = "POLYGON((30 10, 40 40, 20 40, 10 20, 30 10))";

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryStockyardRepository {
    areas: Arc<Mutex<HashMap<StorageAreaId, StorageArea>>>,
    trucks: Arc<Mutex<Vec<Truck>>>,
}

impl InMemoryStockyardRepository {
    pub(crate) fn seeded() -> Self {
        let repository = Self::default();
        repository.insert_area(default_storage_area());
        *repository.trucks.lock().expect("truck mutex poisoned") = default_fleet();
        repository
    }

    pub(crate) fn insert_area(&self, area: StorageArea) {
        self.areas
            .lock()
            .expect("storage area mutex poisoned")
            .insert(area.id.clone(), area);
    }
}

impl StockyardRepository for InMemoryStockyardRepository {
    fn storage_area(&self, id: &StorageAreaId) -> Result<Option<StorageArea>, RepositoryError> {
        let guard = self.areas.lock().expect("storage area mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn save_inventory(
        &self,
        id: &StorageAreaId,
        inventory: InventoryState,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.areas.lock().expect("storage area mutex poisoned");
        match guard.get_mut(id) {
            Some(area) => {
                area.inventory = inventory;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn truck(&self, board_number: &VehicleId) -> Result<Option<Truck>, RepositoryError> {
        let guard = self.trucks.lock().expect("truck mutex poisoned");
        Ok(guard
            .iter()
            .find(|truck| &truck.board_number == board_number)
            .cloned())
    }

    fn trucks(&self) -> Result<Vec<Truck>, RepositoryError> {
        let guard = self.trucks.lock().expect("truck mutex poisoned");
        Ok(guard.clone())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryEventLog {
    events: Arc<Mutex<Vec<UnloadingEvent>>>,
}

impl UnloadingEventLog for InMemoryEventLog {
    fn append(&self, events: Vec<UnloadingEvent>) -> Result<(), RepositoryError> {
        let mut guard = self.events.lock().expect("event mutex poisoned");
        guard.extend(events);
        Ok(())
    }

    fn recent(&self, limit: usize) -> Result<Vec<UnloadingEvent>, RepositoryError> {
        let guard = self.events.lock().expect("event mutex poisoned");
        Ok(guard.iter().rev().take(limit).cloned().collect())
    }
}

pub(crate) fn default_storage_area() -> StorageArea {
    StorageArea::new(
        StorageAreaId(DEFAULT_STORAGE_AREA.to_string()),
        InventoryState {
            volume_tons: 100.0,
            composition: MaterialComposition {
                percent_sio2: 60.0,
                percent_fe: 30.0,
            },
        },
        DEFAULT_FENCE_WKT,
    )
}

pub(crate) fn default_fleet() -> Vec<Truck> {
    let belaz = TruckModel {
        name: "BelAZ-7555".to_string(),
        max_capacity_tons: 55,
    };
    let cat = TruckModel {
        name: "CAT 777".to_string(),
        max_capacity_tons: 90,
    };

    vec![
        truck("B-101", &belaz, 50, 80.0, 10.0),
        truck("B-102", &belaz, 40, 20.0, 60.0),
        truck("C-201", &cat, 85, 45.5, 32.25),
        truck("C-202", &cat, 70, 38.0, 41.0),
    ]
}

fn truck(board_number: &str, model: &TruckModel, load: u32, sio2: f64, fe: f64) -> Truck {
    Truck {
        board_number: board_number.into(),
        model: model.clone(),
        current_load_tons: load,
        composition: MaterialComposition {
            percent_sio2: sio2,
            percent_fe: fe,
        },
    }
}
