use serde::{Deserialize, Serialize};
use std::fmt;

use super::domain::{MaterialComposition, VehicleDelivery, VehicleId};
use super::parse::parse_coordinates;

/// Dump truck model reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruckModel {
    pub name: String,
    pub max_capacity_tons: u32,
}

impl fmt::Display for TruckModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} t)", self.name, self.max_capacity_tons)
    }
}

/// A haul truck and the load it currently carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Truck {
    pub board_number: VehicleId,
    pub model: TruckModel,
    pub current_load_tons: u32,
    pub composition: MaterialComposition,
}

impl Truck {
    /// Builds the delivery presented when this truck unloads at `coordinates`.
    pub fn delivery(&self, coordinates: &str) -> VehicleDelivery {
        VehicleDelivery {
            vehicle_id: self.board_number.clone(),
            quantity_tons: f64::from(self.current_load_tons),
            composition: self.composition,
            delivery_point: parse_coordinates(coordinates),
        }
    }
}

impl fmt::Display for Truck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.board_number, self.model.name)
    }
}
