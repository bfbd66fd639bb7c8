use crate::infra::{InMemoryEventLog, InMemoryStockyardRepository, DEFAULT_STORAGE_AREA};
use clap::Args;
use ore_stockyard::config::StockyardConfig;
use ore_stockyard::error::AppError;
use ore_stockyard::stockyard::{
    parse_fence_wkt, parse_roster_path, process_batch_with_fence, CoordinateInput,
    InventoryState, MaterialComposition, StorageArea, StorageAreaId, Truck, UnloadingEvent,
    UnloadingReport, UnloadingService, VehicleDelivery,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// Truck roster CSV (Board Number, Model, Max Capacity, Current Load, % SiO2, % Fe, Coordinates)
    #[arg(long)]
    pub(crate) roster: PathBuf,
    /// Stockyard fence as a WKT polygon; omit to reject every delivery.
    /// A polygon that does not parse or has fewer than three distinct vertices is an error
    #[arg(long)]
    pub(crate) polygon: Option<String>,
    /// Current inventory volume in tons
    #[arg(long, default_value_t = 0.0)]
    pub(crate) volume: f64,
    /// Current inventory SiO2 percentage
    #[arg(long, default_value_t = 0.0)]
    pub(crate) sio2: f64,
    /// Current inventory Fe percentage
    #[arg(long, default_value_t = 0.0)]
    pub(crate) fe: f64,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Number of history entries shown after the unloading
    #[arg(long, default_value_t = 10)]
    pub(crate) history: usize,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let json = args.json;
    let outcome = evaluate_roster(&args)?;

    if json {
        print_json(&outcome.report);
    } else {
        println!(
            "Roster: {} ({} trucks, {} without coordinates)",
            args.roster.display(),
            outcome.trucks,
            outcome.skipped
        );
        render_report(&outcome.report);
    }
    Ok(())
}

struct RosterBatch {
    trucks: usize,
    skipped: usize,
    report: UnloadingReport,
}

fn evaluate_roster(args: &BatchArgs) -> Result<RosterBatch, AppError> {
    let current = InventoryState::new(args.volume, MaterialComposition::new(args.sio2, args.fe)?)?;
    let fence = args.polygon.as_deref().map(parse_fence_wkt).transpose()?;

    let entries = parse_roster_path(&args.roster)?;
    let skipped = entries
        .iter()
        .filter(|entry| entry.coordinates.is_none())
        .count();
    let deliveries: Vec<VehicleDelivery> =
        entries.iter().filter_map(|entry| entry.delivery()).collect();

    let result = process_batch_with_fence(&current, fence.as_ref(), &deliveries);
    Ok(RosterBatch {
        trucks: entries.len(),
        skipped,
        report: UnloadingReport::new(&current, &result),
    })
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { history, json } = args;
    let demo = seeded_unloading(history)?;

    if json {
        print_json(&demo.report);
        return Ok(());
    }

    println!("Ore stockyard demo");
    println!("Storage area: {} ({})", demo.area.name, demo.area.id);
    println!("Fence: {}", demo.area.polygon_wkt);
    println!("Fleet:");
    for truck in &demo.fleet {
        println!(
            "  - {} | load {} t | SiO2 {:.2}% | Fe {:.2}%",
            truck,
            truck.current_load_tons,
            truck.composition.percent_sio2,
            truck.composition.percent_fe
        );
    }
    println!();
    render_report(&demo.report);

    println!("\nUnloading history (newest first)");
    for event in &demo.history {
        println!(
            "  #{} {} {} at '{}' -> {}",
            event.id,
            event.recorded_at.format("%Y-%m-%d %H:%M:%S"),
            event.vehicle_id,
            event.coordinate_input,
            event.reason.label()
        );
    }

    Ok(())
}

struct DemoRun {
    area: StorageArea,
    fleet: Vec<Truck>,
    report: UnloadingReport,
    history: Vec<UnloadingEvent>,
}

fn seeded_unloading(history: usize) -> Result<DemoRun, AppError> {
    let repository = Arc::new(InMemoryStockyardRepository::seeded());
    let events = Arc::new(InMemoryEventLog::default());
    let service = UnloadingService::new(repository, events, StockyardConfig::default());
    let area_id = StorageAreaId(DEFAULT_STORAGE_AREA.to_string());

    let area = service.storage_area(&area_id)?;
    let fleet = service.trucks()?;

    let report = service.submit(
        &area_id,
        vec![
            CoordinateInput::new("B-101", "25 25"),
            CoordinateInput::new("B-102", "30 10"),
            CoordinateInput::new("C-201", "0 0"),
            CoordinateInput::new("C-202", "abc def"),
        ],
    )?;
    let history = service.recent_events(Some(history))?;

    Ok(DemoRun {
        area,
        fleet,
        report,
        history,
    })
}

fn render_report(report: &UnloadingReport) {
    println!(
        "Initial inventory: {:.2} t | SiO2 {:.2}% | Fe {:.2}%",
        report.initial_volume, report.initial_sio2, report.initial_fe
    );
    println!("Classification:");
    for outcome in &report.outcomes {
        let verdict = if outcome.accepted { "accepted" } else { "rejected" };
        println!(
            "  - {}: {} ({})",
            outcome.vehicle_id,
            verdict,
            outcome.reason.label()
        );
    }
    println!(
        "Accepted {} | rejected {} | added {:.2} t",
        report.accepted, report.rejected, report.added_volume
    );
    println!(
        "Final inventory: {:.2} t | SiO2 {:.2}% | Fe {:.2}%",
        report.final_volume, report.final_sio2, report.final_fe
    );
}

fn print_json(report: &UnloadingReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(err) => println!("Report unavailable: {}", err),
    }
}
