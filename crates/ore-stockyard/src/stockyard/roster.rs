//! CSV roster import: trucks with their loads and optional unloading coordinates.

use serde::{Deserialize, Deserializer};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::domain::{CompositionError, MaterialComposition, VehicleDelivery, VehicleId};
use super::fleet::{Truck, TruckModel};

/// One roster line: the truck and the coordinate text entered for it, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    pub truck: Truck,
    pub coordinates: Option<String>,
}

impl RosterEntry {
    /// The delivery for this entry, skipped when no coordinates were entered.
    pub fn delivery(&self) -> Option<VehicleDelivery> {
        self.coordinates
            .as_deref()
            .map(|coordinates| self.truck.delivery(coordinates))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RosterImportError {
    #[error("failed to open roster: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to read roster CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("truck {board_number}: {source}")]
    Composition {
        board_number: String,
        #[source]
        source: CompositionError,
    },
}

pub fn parse_roster_path(path: impl AsRef<Path>) -> Result<Vec<RosterEntry>, RosterImportError> {
    let file = File::open(path)?;
    parse_roster(file)
}

pub fn parse_roster<R: Read>(reader: R) -> Result<Vec<RosterEntry>, RosterImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut entries = Vec::new();

    for record in csv_reader.deserialize::<RosterRow>() {
        let row = record?;
        let composition = MaterialComposition::new(row.percent_sio2, row.percent_fe).map_err(
            |source| RosterImportError::Composition {
                board_number: row.board_number.clone(),
                source,
            },
        )?;

        entries.push(RosterEntry {
            truck: Truck {
                board_number: VehicleId(row.board_number),
                model: TruckModel {
                    name: row.model,
                    max_capacity_tons: row.max_capacity,
                },
                current_load_tons: row.current_load,
                composition,
            },
            coordinates: row.coordinates,
        });
    }

    Ok(entries)
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(rename = "Board Number")]
    board_number: String,
    #[serde(rename = "Model")]
    model: String,
    #[serde(rename = "Max Capacity")]
    max_capacity: u32,
    #[serde(rename = "Current Load")]
    current_load: u32,
    #[serde(rename = "% SiO2")]
    percent_sio2: f64,
    #[serde(rename = "% Fe")]
    percent_fe: f64,
    #[serde(
        rename = "Coordinates",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    coordinates: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
