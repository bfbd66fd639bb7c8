use serde::Serialize;

use super::batch::BatchResult;
use super::domain::{ClassificationOutcome, InventoryState};

/// Rounds a percentage to two decimal places for display.
pub fn round_percent(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Before/after summary of an unloading batch, rounded for presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnloadingReport {
    pub initial_volume: f64,
    pub initial_sio2: f64,
    pub initial_fe: f64,
    pub added_volume: f64,
    pub final_volume: f64,
    pub final_sio2: f64,
    pub final_fe: f64,
    pub accepted: usize,
    pub rejected: usize,
    pub outcomes: Vec<ClassificationOutcome>,
}

impl UnloadingReport {
    pub fn new(initial: &InventoryState, result: &BatchResult) -> Self {
        Self {
            initial_volume: initial.volume_tons,
            initial_sio2: initial.composition.percent_sio2,
            initial_fe: initial.composition.percent_fe,
            added_volume: result.accepted_volume_tons,
            final_volume: result.new_state.volume_tons,
            final_sio2: round_percent(result.new_state.composition.percent_sio2),
            final_fe: round_percent(result.new_state.composition.percent_fe),
            accepted: result.accepted_count(),
            rejected: result.rejected_count(),
            outcomes: result.outcomes.clone(),
        }
    }
}
