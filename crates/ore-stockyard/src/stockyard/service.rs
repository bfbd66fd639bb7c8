use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::batch::process_batch;
use super::domain::{StorageAreaId, VehicleDelivery, VehicleId};
use super::fleet::Truck;
use super::report::UnloadingReport;
use super::repository::{
    RepositoryError, StockyardRepository, StorageArea, UnloadingEvent, UnloadingEventLog,
};
use crate::config::StockyardConfig;

/// Coordinate text entered for one truck at unloading time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinateInput {
    pub board_number: VehicleId,
    pub coordinates: String,
}

impl CoordinateInput {
    pub fn new(board_number: &str, coordinates: &str) -> Self {
        Self {
            board_number: board_number.into(),
            coordinates: coordinates.to_string(),
        }
    }
}

/// Service composing the repositories with batch processing.
///
/// Submissions against the stockyard are serialised so the inventory
/// read-modify-write of one batch never interleaves with another.
pub struct UnloadingService<R, L> {
    repository: Arc<R>,
    events: Arc<L>,
    config: StockyardConfig,
    write_lock: Mutex<()>,
    event_sequence: AtomicU64,
}

impl<R, L> UnloadingService<R, L>
where
    R: StockyardRepository + 'static,
    L: UnloadingEventLog + 'static,
{
    pub fn new(repository: Arc<R>, events: Arc<L>, config: StockyardConfig) -> Self {
        Self {
            repository,
            events,
            config,
            write_lock: Mutex::new(()),
            event_sequence: AtomicU64::new(1),
        }
    }

    /// Classify the entered coordinates, record one event per truck and
    /// store the blended inventory.
    ///
    /// Inputs with blank coordinates are skipped. Unknown or repeated board
    /// numbers fail the whole submission before anything is written.
    pub fn submit(
        &self,
        storage_area_id: &StorageAreaId,
        inputs: Vec<CoordinateInput>,
    ) -> Result<UnloadingReport, UnloadingServiceError> {
        let _write = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let area = self.storage_area(storage_area_id)?;

        let mut seen = HashSet::new();
        let mut coordinate_texts = Vec::new();
        let mut deliveries: Vec<VehicleDelivery> = Vec::new();
        for input in inputs {
            let coordinates = input.coordinates.trim();
            if coordinates.is_empty() {
                continue;
            }
            if !seen.insert(input.board_number.clone()) {
                return Err(UnloadingServiceError::DuplicateVehicle(input.board_number));
            }
            let truck = self
                .repository
                .truck(&input.board_number)?
                .ok_or_else(|| UnloadingServiceError::UnknownVehicle(input.board_number.clone()))?;

            deliveries.push(truck.delivery(coordinates));
            coordinate_texts.push(coordinates.to_string());
        }

        let fence = area.fence();
        let result = process_batch(&area.inventory, fence.as_deref(), &deliveries);

        let recorded_at = Utc::now();
        let events = result
            .outcomes
            .iter()
            .zip(coordinate_texts)
            .map(|(outcome, coordinate_input)| UnloadingEvent {
                id: self.event_sequence.fetch_add(1, Ordering::Relaxed),
                storage_area_id: storage_area_id.clone(),
                vehicle_id: outcome.vehicle_id.clone(),
                coordinate_input,
                is_inside: outcome.accepted,
                reason: outcome.reason,
                recorded_at,
            })
            .collect();

        // Inventory first: a failed save leaves no events behind, and a
        // failed append puts the previous inventory back.
        let inventory_changed = result.new_state != area.inventory;
        if inventory_changed {
            self.repository
                .save_inventory(storage_area_id, result.new_state)?;
        }
        if let Err(err) = self.events.append(events) {
            if inventory_changed {
                if let Err(restore_err) = self
                    .repository
                    .save_inventory(storage_area_id, area.inventory)
                {
                    error!(
                        storage_area = %storage_area_id,
                        error = %restore_err,
                        "failed to restore inventory after event log failure"
                    );
                }
            }
            return Err(err.into());
        }

        let report = UnloadingReport::new(&area.inventory, &result);
        info!(
            storage_area = %storage_area_id,
            accepted = report.accepted,
            rejected = report.rejected,
            final_volume = report.final_volume,
            "unloading recorded"
        );
        Ok(report)
    }

    pub fn storage_area(
        &self,
        storage_area_id: &StorageAreaId,
    ) -> Result<StorageArea, UnloadingServiceError> {
        self.repository
            .storage_area(storage_area_id)?
            .ok_or_else(|| UnloadingServiceError::StorageAreaNotFound(storage_area_id.clone()))
    }

    pub fn trucks(&self) -> Result<Vec<Truck>, UnloadingServiceError> {
        Ok(self.repository.trucks()?)
    }

    /// Most recent events first, capped at `limit` or the configured default.
    pub fn recent_events(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<UnloadingEvent>, UnloadingServiceError> {
        let limit = limit.unwrap_or(self.config.recent_event_limit);
        Ok(self.events.recent(limit)?)
    }
}

/// Error raised by the unloading service.
#[derive(Debug, thiserror::Error)]
pub enum UnloadingServiceError {
    #[error("storage area '{0}' not found")]
    StorageAreaNotFound(StorageAreaId),
    #[error("unknown vehicle '{0}'")]
    UnknownVehicle(VehicleId),
    #[error("vehicle '{0}' appears more than once in the submission")]
    DuplicateVehicle(VehicleId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
