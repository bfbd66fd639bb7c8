use super::common::*;
use crate::config::StockyardConfig;
use crate::stockyard::domain::{ClassificationReason, StorageAreaId};
use crate::stockyard::repository::{RepositoryError, StockyardRepository, StorageArea};
use crate::stockyard::{CoordinateInput, UnloadingService, UnloadingServiceError};
use std::sync::Arc;

#[test]
fn submit_blends_accepted_trucks_and_records_every_event() {
    let repository = MemoryRepository::seeded();
    let events = MemoryEventLog::default();
    let service = service(repository.clone(), events.clone());

    let report = service
        .submit(
            &area_id(),
            vec![
                CoordinateInput::new("B-101", "25 25"),
                CoordinateInput::new("B-102", "0 0"),
                CoordinateInput::new("B-103", "abc def"),
            ],
        )
        .expect("submission succeeds");

    assert_eq!(report.initial_volume, 100.0);
    assert_eq!(report.added_volume, 50.0);
    assert_eq!(report.final_volume, 150.0);
    assert_eq!(report.final_sio2, 66.67);
    assert_eq!(report.final_fe, 23.33);
    assert_eq!(report.accepted, 1);
    assert_eq!(report.rejected, 2);

    let recorded = events.events();
    assert_eq!(recorded.len(), 3);
    assert_eq!(recorded[0].coordinate_input, "25 25");
    assert!(recorded[0].is_inside);
    assert_eq!(recorded[1].reason, ClassificationReason::OutsideFence);
    assert_eq!(
        recorded[2].reason,
        ClassificationReason::UnparsableCoordinate
    );
    assert!(recorded.windows(2).all(|pair| pair[0].id < pair[1].id));

    let stored = repository
        .storage_area(&area_id())
        .expect("fetch succeeds")
        .expect("area present");
    assert_eq!(stored.inventory.volume_tons, 150.0);
    assert_close(
        stored.inventory.composition.percent_sio2,
        100.0 / 150.0 * 100.0,
    );
}

#[test]
fn vertex_delivery_counts_as_inside() {
    let service = service(MemoryRepository::seeded(), MemoryEventLog::default());
    let report = service
        .submit(&area_id(), vec![CoordinateInput::new("B-101", "30 10")])
        .expect("submission succeeds");
    assert_eq!(report.outcomes[0].reason, ClassificationReason::Accepted);
    assert_eq!(report.final_volume, 150.0);
}

#[test]
fn blank_coordinates_are_skipped() {
    let events = MemoryEventLog::default();
    let service = service(MemoryRepository::seeded(), events.clone());

    let report = service
        .submit(
            &area_id(),
            vec![
                CoordinateInput::new("B-101", "   "),
                CoordinateInput::new("B-102", ""),
            ],
        )
        .expect("submission succeeds");

    assert!(report.outcomes.is_empty());
    assert_eq!(report.final_volume, report.initial_volume);
    assert!(events.events().is_empty());
}

#[test]
fn unusable_fence_rejects_everything_with_no_polygon() {
    let mut area = storage_area();
    area.polygon_wkt = "POLYGON((0 0, 1 1, 0 0))".to_string();
    let repository = MemoryRepository::with_area(area);
    let service = service(repository.clone(), MemoryEventLog::default());

    let report = service
        .submit(&area_id(), vec![CoordinateInput::new("B-101", "0.5 0.5")])
        .expect("submission succeeds");

    assert_eq!(report.outcomes[0].reason, ClassificationReason::NoPolygon);
    let stored = repository
        .storage_area(&area_id())
        .expect("fetch succeeds")
        .expect("area present");
    assert_eq!(stored.inventory, initial_inventory());
}

#[test]
fn unknown_vehicle_fails_before_any_write() {
    let repository = MemoryRepository::seeded();
    let events = MemoryEventLog::default();
    let service = service(repository.clone(), events.clone());

    match service.submit(
        &area_id(),
        vec![
            CoordinateInput::new("B-101", "25 25"),
            CoordinateInput::new("X-999", "25 25"),
        ],
    ) {
        Err(UnloadingServiceError::UnknownVehicle(id)) => assert_eq!(id.0, "X-999"),
        other => panic!("expected unknown vehicle, got {other:?}"),
    }

    assert!(events.events().is_empty());
    let stored = repository
        .storage_area(&area_id())
        .expect("fetch succeeds")
        .expect("area present");
    assert_eq!(stored.inventory, initial_inventory());
}

#[test]
fn duplicate_vehicle_is_rejected() {
    let service = service(MemoryRepository::seeded(), MemoryEventLog::default());
    match service.submit(
        &area_id(),
        vec![
            CoordinateInput::new("B-101", "25 25"),
            CoordinateInput::new("B-101", "26 26"),
        ],
    ) {
        Err(UnloadingServiceError::DuplicateVehicle(id)) => assert_eq!(id.0, "B-101"),
        other => panic!("expected duplicate vehicle, got {other:?}"),
    }
}

#[test]
fn missing_storage_area_is_reported() {
    let service = service(MemoryRepository::seeded(), MemoryEventLog::default());
    match service.submit(&StorageAreaId("south".to_string()), Vec::new()) {
        Err(UnloadingServiceError::StorageAreaNotFound(id)) => assert_eq!(id.0, "south"),
        other => panic!("expected missing storage area, got {other:?}"),
    }
}

#[test]
fn repository_failures_propagate() {
    let service = UnloadingService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryEventLog::default()),
        StockyardConfig::default(),
    );
    match service.submit(&area_id(), Vec::new()) {
        Err(UnloadingServiceError::Repository(RepositoryError::Unavailable(_))) => {}
        other => panic!("expected repository failure, got {other:?}"),
    }
}

#[test]
fn failed_inventory_save_records_no_events() {
    let repository = MemoryRepository::seeded();
    repository.fail_saves();
    let events = MemoryEventLog::default();
    let service = service(repository.clone(), events.clone());

    match service.submit(&area_id(), vec![CoordinateInput::new("B-101", "25 25")]) {
        Err(UnloadingServiceError::Repository(RepositoryError::Unavailable(_))) => {}
        other => panic!("expected save failure, got {other:?}"),
    }

    assert!(events.events().is_empty());
    assert_eq!(repository.inventory(&area_id()), Some(initial_inventory()));
}

#[test]
fn failed_event_append_restores_previous_inventory() {
    let repository = MemoryRepository::seeded();
    let service = UnloadingService::new(
        Arc::new(repository.clone()),
        Arc::new(RejectingEventLog),
        StockyardConfig::default(),
    );

    match service.submit(&area_id(), vec![CoordinateInput::new("B-101", "25 25")]) {
        Err(UnloadingServiceError::Repository(RepositoryError::Unavailable(_))) => {}
        other => panic!("expected event log failure, got {other:?}"),
    }

    assert_eq!(repository.inventory(&area_id()), Some(initial_inventory()));
}

#[test]
fn storage_areas_are_independent() {
    let repository = MemoryRepository::seeded();
    let south = StorageArea::new(
        StorageAreaId("south".to_string()),
        initial_inventory(),
        "POLYGON((100 100, 200 100, 200 200, 100 200))",
    );
    repository.insert_area(south.clone());
    let service = service(repository.clone(), MemoryEventLog::default());

    service
        .submit(&area_id(), vec![CoordinateInput::new("B-101", "25 25")])
        .expect("north submission succeeds");
    let report = service
        .submit(&south.id, vec![CoordinateInput::new("B-102", "150 150")])
        .expect("south submission succeeds");
    assert_eq!(report.initial_volume, 100.0);
    assert_eq!(report.final_volume, 140.0);

    let north = repository
        .storage_area(&area_id())
        .expect("fetch succeeds")
        .expect("area present");
    assert_eq!(north.inventory.volume_tons, 150.0);
}

#[test]
fn chained_submissions_build_on_stored_inventory() {
    let repository = MemoryRepository::seeded();
    let service = service(repository.clone(), MemoryEventLog::default());

    service
        .submit(&area_id(), vec![CoordinateInput::new("B-101", "25 25")])
        .expect("first submission succeeds");
    let second = service
        .submit(&area_id(), vec![CoordinateInput::new("B-102", "30 30")])
        .expect("second submission succeeds");

    assert_eq!(second.initial_volume, 150.0);
    assert_eq!(second.final_volume, 190.0);
    // SiO2: 100 + 8 t over 190 t, Fe: 35 + 24 t over 190 t
    assert_eq!(second.final_sio2, 56.84);
    assert_eq!(second.final_fe, 31.05);
}

#[test]
fn recent_events_uses_configured_default_limit() {
    let service = service(MemoryRepository::seeded(), MemoryEventLog::default());
    service
        .submit(
            &area_id(),
            vec![
                CoordinateInput::new("B-101", "25 25"),
                CoordinateInput::new("B-102", "0 0"),
                CoordinateInput::new("B-103", "12 12"),
            ],
        )
        .expect("submission succeeds");

    let latest = service.recent_events(None).expect("events load");
    assert_eq!(latest.len(), 2);
    assert_eq!(latest[0].vehicle_id.0, "B-103");

    let all = service.recent_events(Some(10)).expect("events load");
    assert_eq!(all.len(), 3);
}
