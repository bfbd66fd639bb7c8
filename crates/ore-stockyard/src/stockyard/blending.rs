//! Mass-weighted blending of accepted deliveries into a storage inventory.

use super::domain::{ConstituentMass, InventoryState, MaterialComposition, VehicleDelivery};

/// Combines `accepted` deliveries with `current` and returns the new inventory.
///
/// Percentages are neither clamped nor rounded. A resulting volume of zero
/// yields zero percentages for both constituents.
pub fn blend(current: &InventoryState, accepted: &[VehicleDelivery]) -> InventoryState {
    if accepted.is_empty() {
        return *current;
    }

    let added = sum_contributions(accepted);
    let base = current.constituent_masses();

    let volume_tons = current.volume_tons + added.quantity_tons;
    let sio2_tons = base.sio2_tons + added.mass.sio2_tons;
    let fe_tons = base.fe_tons + added.mass.fe_tons;

    let composition = if volume_tons == 0.0 {
        MaterialComposition::default()
    } else {
        MaterialComposition {
            percent_sio2: sio2_tons / volume_tons * 100.0,
            percent_fe: fe_tons / volume_tons * 100.0,
        }
    };

    InventoryState {
        volume_tons,
        composition,
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Contribution {
    quantity_tons: f64,
    mass: ConstituentMass,
}

// Floating-point addition is not associative, so contributions are summed in
// a canonical order. Any permutation of the input yields identical bits.
fn sum_contributions(deliveries: &[VehicleDelivery]) -> Contribution {
    let mut contributions: Vec<Contribution> = deliveries
        .iter()
        .map(|delivery| Contribution {
            quantity_tons: delivery.quantity_tons,
            mass: delivery
                .composition
                .constituent_masses(delivery.quantity_tons),
        })
        .collect();

    contributions.sort_by(|a, b| {
        a.quantity_tons
            .total_cmp(&b.quantity_tons)
            .then(a.mass.sio2_tons.total_cmp(&b.mass.sio2_tons))
            .then(a.mass.fe_tons.total_cmp(&b.mass.fe_tons))
    });

    contributions
        .into_iter()
        .fold(Contribution::default(), |acc, next| Contribution {
            quantity_tons: acc.quantity_tons + next.quantity_tons,
            mass: ConstituentMass {
                sio2_tons: acc.mass.sio2_tons + next.mass.sio2_tons,
                fe_tons: acc.mass.fe_tons + next.mass.fe_tons,
            },
        })
}
