use serde::{Deserialize, Serialize};
use std::fmt;

use super::geometry::Point;

/// Identifier wrapper for delivering vehicles (board numbers).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(pub String);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VehicleId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Identifier wrapper for storage areas so every call names its target inventory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageAreaId(pub String);

impl fmt::Display for StorageAreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StorageAreaId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Mass percentages of the tracked constituents. Other constituents may make
/// up the remainder, so the two values are independent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MaterialComposition {
    pub percent_sio2: f64,
    pub percent_fe: f64,
}

impl MaterialComposition {
    /// Validated constructor for values entering from records or requests.
    pub fn new(percent_sio2: f64, percent_fe: f64) -> Result<Self, CompositionError> {
        check_percent("SiO2", percent_sio2)?;
        check_percent("Fe", percent_fe)?;
        Ok(Self {
            percent_sio2,
            percent_fe,
        })
    }

    pub fn constituent_masses(&self, quantity_tons: f64) -> ConstituentMass {
        ConstituentMass {
            sio2_tons: quantity_tons * self.percent_sio2 / 100.0,
            fe_tons: quantity_tons * self.percent_fe / 100.0,
        }
    }
}

fn check_percent(constituent: &'static str, value: f64) -> Result<(), CompositionError> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(CompositionError::OutOfRange { constituent, value })
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompositionError {
    #[error("% {constituent} must be between 0 and 100, got {value}")]
    OutOfRange {
        constituent: &'static str,
        value: f64,
    },
    #[error("{field} must be a finite, non-negative tonnage, got {value}")]
    InvalidTonnage { field: &'static str, value: f64 },
}

fn check_tonnage(field: &'static str, value: f64) -> Result<(), CompositionError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CompositionError::InvalidTonnage { field, value })
    }
}

/// Tonnage of each tracked constituent within a quantity of material.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ConstituentMass {
    pub sio2_tons: f64,
    pub fe_tons: f64,
}

/// One vehicle's load presented for unloading. `delivery_point` is `None`
/// when the coordinate text could not be parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleDelivery {
    pub vehicle_id: VehicleId,
    pub quantity_tons: f64,
    pub composition: MaterialComposition,
    pub delivery_point: Option<Point>,
}

impl VehicleDelivery {
    /// Validated constructor for deliveries described by external callers.
    pub fn new(
        vehicle_id: VehicleId,
        quantity_tons: f64,
        composition: MaterialComposition,
        delivery_point: Option<Point>,
    ) -> Result<Self, CompositionError> {
        check_tonnage("quantity_tons", quantity_tons)?;
        Ok(Self {
            vehicle_id,
            quantity_tons,
            composition,
            delivery_point,
        })
    }
}

/// Contents of a storage area at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InventoryState {
    pub volume_tons: f64,
    pub composition: MaterialComposition,
}

impl InventoryState {
    pub fn new(
        volume_tons: f64,
        composition: MaterialComposition,
    ) -> Result<Self, CompositionError> {
        check_tonnage("volume_tons", volume_tons)?;
        Ok(Self {
            volume_tons,
            composition,
        })
    }

    pub fn constituent_masses(&self) -> ConstituentMass {
        self.composition.constituent_masses(self.volume_tons)
    }
}

/// Why a delivery was accepted or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationReason {
    Accepted,
    OutsideFence,
    UnparsableCoordinate,
    NoPolygon,
}

impl ClassificationReason {
    pub fn label(&self) -> &'static str {
        match self {
            ClassificationReason::Accepted => "Inside fence",
            ClassificationReason::OutsideFence => "Outside fence",
            ClassificationReason::UnparsableCoordinate => "Unparsable coordinates",
            ClassificationReason::NoPolygon => "No fence configured",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationOutcome {
    pub vehicle_id: VehicleId,
    pub accepted: bool,
    pub reason: ClassificationReason,
}

impl ClassificationOutcome {
    pub fn new(vehicle_id: VehicleId, reason: ClassificationReason) -> Self {
        Self {
            vehicle_id,
            accepted: reason == ClassificationReason::Accepted,
            reason,
        }
    }
}
