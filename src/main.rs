// ==========================================
// Recycling transport planning - command line entry
// ==========================================
// Thin shell over AppState; --json prints serde output
// ==========================================

mod cli;

use anyhow::{anyhow, Context};
use clap::Parser;
use serde::Serialize;

use cli::{
    Cli, Commands, ConfigAction, DriverAction, PlanningAction, TransportAction, TransportKind,
    TruckAction, WasteStreamAction,
};
use recycling_planning::api::{ApiError, TransportRequest};
use recycling_planning::app::{get_default_db_path, AppState};
use recycling_planning::domain::types::{DATETIME_FORMAT, DATE_FORMAT};
use recycling_planning::domain::{PlanningView, Transport, TransportType};
use recycling_planning::importer::{parse_datetime_text, TransportImporter};

#[tokio::main]
async fn main() {
    recycling_planning::logging::init();

    let cli = Cli::parse();
    let json = cli.json;

    if let Err(err) = run(cli).await {
        report_error(&err, json);
        std::process::exit(1);
    }
}

fn report_error(err: &anyhow::Error, json: bool) {
    let api_err = err.downcast_ref::<ApiError>();
    if json {
        let body = match api_err {
            Some(e) => serde_json::json!({
                "code": e.code(),
                "status": e.status_code(),
                "message": e.to_string(),
            }),
            None => serde_json::json!({
                "code": "ERROR",
                "message": format!("{:#}", err),
            }),
        };
        eprintln!("{}", body);
    } else {
        eprintln!("error: {:#}", err);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let db_path = match &cli.db {
        Some(path) => path.to_string_lossy().to_string(),
        None => get_default_db_path(),
    };
    tracing::debug!("using database {}", db_path);

    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;
    let json = cli.json;
    let actor = cli.actor.as_str();

    match cli.command {
        // ==========================================
        // Planning
        // ==========================================
        Commands::Planning { action } => match action {
            PlanningAction::Show {
                date,
                truck,
                driver,
                status,
            } => {
                let view = state.planning_api.get_planning_by_date(
                    &date,
                    truck.as_deref(),
                    driver.as_deref(),
                    status.as_deref(),
                )?;
                output(json, &view, print_planning)?;
            }
            PlanningAction::Reorder { date, plate, ids } => {
                let view = state
                    .planning_api
                    .reorder_transports(&date, &plate, &ids, actor)?;
                output(json, &view, print_planning)?;
            }
        },

        // ==========================================
        // Fleet
        // ==========================================
        Commands::Truck { action } => match action {
            TruckAction::Add {
                plate,
                brand,
                description,
            } => {
                let truck = state.fleet_api.create_truck(
                    &plate,
                    brand.as_deref(),
                    description.as_deref(),
                )?;
                output(json, &truck, |t| println!("registered {}", t.display_name()))?;
            }
            TruckAction::List => {
                let trucks = state.fleet_api.list_trucks()?;
                output(json, &trucks, |trucks| {
                    for truck in trucks {
                        println!(
                            "{:<12} {:<12} {}",
                            truck.license_plate,
                            truck.brand.as_deref().unwrap_or("-"),
                            truck.description.as_deref().unwrap_or("")
                        );
                    }
                })?;
            }
            TruckAction::Remove { plate } => {
                state.fleet_api.delete_truck(&plate)?;
                output(json, &serde_json::json!({ "deleted": plate }), |_| {
                    println!("deleted {}", plate)
                })?;
            }
        },

        Commands::Driver { action } => match action {
            DriverAction::Add {
                first_name,
                last_name,
                email,
            } => {
                let driver =
                    state
                        .fleet_api
                        .create_driver(&first_name, &last_name, email.as_deref())?;
                output(json, &driver, |d| {
                    println!("registered {} ({})", d.full_name(), d.driver_id)
                })?;
            }
            DriverAction::List => {
                let drivers = state.fleet_api.list_drivers()?;
                output(json, &drivers, |drivers| {
                    for d in drivers {
                        println!(
                            "{}  {:<24} {}",
                            d.driver_id,
                            d.full_name(),
                            if d.active { "active" } else { "inactive" }
                        );
                    }
                })?;
            }
            DriverAction::Deactivate { driver_id } => {
                let driver = state.fleet_api.deactivate_driver(&driver_id)?;
                output(json, &driver, |d| println!("deactivated {}", d.full_name()))?;
            }
        },

        // ==========================================
        // Transports
        // ==========================================
        Commands::Transport { action } => match action {
            TransportAction::Add {
                kind,
                pickup_at,
                delivery_at,
                pickup_location,
                delivery_location,
                truck,
                driver,
                waste_stream,
                container,
                note,
            } => {
                let request = TransportRequest {
                    pickup_location,
                    delivery_location,
                    pickup_at: parse_cli_datetime(&pickup_at)?,
                    delivery_at: delivery_at.as_deref().map(parse_cli_datetime).transpose()?,
                    truck_plate: truck,
                    driver_id: driver,
                    waste_stream_number: waste_stream,
                    container_id: container,
                    note,
                };
                let transport_type = match kind {
                    TransportKind::Container => TransportType::Container,
                    TransportKind::Waste => TransportType::Waste,
                };
                let transport =
                    state
                        .transport_api
                        .create_transport(request, transport_type, actor)?;
                output(json, &transport, print_transport)?;
            }
            TransportAction::Assign { id, truck, driver } => {
                let transport = state.transport_api.assign_transport(
                    &id,
                    truck.as_deref(),
                    driver.as_deref(),
                    actor,
                )?;
                output(json, &transport, print_transport)?;
            }
            TransportAction::Finish { id, at } => {
                let finished_at = at.as_deref().map(parse_cli_datetime).transpose()?;
                let transport = state
                    .transport_api
                    .finish_transport(&id, finished_at, actor)?;
                output(json, &transport, print_transport)?;
            }
            TransportAction::List { from, to } => {
                let from = chrono::NaiveDate::parse_from_str(&from, DATE_FORMAT)
                    .with_context(|| format!("invalid date '{}'", from))?;
                let to = chrono::NaiveDate::parse_from_str(&to, DATE_FORMAT)
                    .with_context(|| format!("invalid date '{}'", to))?;
                let transports = state.transport_api.list_transports_between(from, to)?;
                output(json, &transports, |list| list.iter().for_each(print_transport))?;
            }
            TransportAction::Delete { id } => {
                state.transport_api.delete_transport(&id, actor)?;
                output(json, &serde_json::json!({ "deleted": id }), |_| {
                    println!("deleted {}", id)
                })?;
            }
        },

        Commands::WasteStream { action } => match action {
            WasteStreamAction::Add { name } => {
                let stream = state.waste_stream_api.create_waste_stream(&name)?;
                output(json, &stream, |s| println!("{}  {}", s.number, s.name))?;
            }
            WasteStreamAction::List => {
                let streams = state.waste_stream_api.list_waste_streams()?;
                output(json, &streams, |streams| {
                    for s in streams {
                        println!("{}  {}", s.number, s.name);
                    }
                })?;
            }
        },

        // ==========================================
        // Import / history / config
        // ==========================================
        Commands::Import { files } => {
            let results = state.importer.batch_import(files).await;
            let mut failed = 0;
            for result in &results {
                match result {
                    Ok(summary) if json => println!("{}", serde_json::to_string(summary)?),
                    Ok(summary) => {
                        println!(
                            "{}: {} imported, {} rejected (of {})",
                            summary.file, summary.imported, summary.rejected, summary.total
                        );
                        for rejection in &summary.rejections {
                            println!("  row {}: {}", rejection.row, rejection.reason);
                        }
                    }
                    Err(message) => {
                        failed += 1;
                        eprintln!("{}", message);
                    }
                }
            }
            if failed > 0 {
                return Err(anyhow!("{} file(s) failed to import", failed));
            }
        }

        Commands::History { limit } => {
            let entries = state
                .action_log_repo
                .find_recent(limit)
                .map_err(ApiError::from)?;
            output(json, &entries, |entries| {
                for e in entries {
                    println!(
                        "{}  {:<20} {:<10} {}",
                        e.action_ts.format(DATETIME_FORMAT),
                        e.action_type,
                        e.actor,
                        e.detail.as_deref().unwrap_or("")
                    );
                }
            })?;
        }

        Commands::Config { action } => match action {
            ConfigAction::Get { key: Some(key) } => {
                let value = state.config_manager.get(&key)?;
                output(json, &serde_json::json!({ key.as_str(): value }), |_| {
                    println!("{}", value.as_deref().unwrap_or("(not set)"))
                })?;
            }
            ConfigAction::Get { key: None } => {
                let all = state.config_manager.list()?;
                output(json, &all, |all| {
                    for (k, v) in all {
                        println!("{} = {}", k, v);
                    }
                })?;
            }
            ConfigAction::Set { key, value } => {
                state.config_manager.set(&key, &value)?;
                output(json, &serde_json::json!({ key.as_str(): value }), |_| {
                    println!("{} = {}", key, value)
                })?;
            }
        },
    }

    Ok(())
}

// ==========================================
// Output helpers
// ==========================================

fn output<T: Serialize>(json: bool, value: &T, human: impl FnOnce(&T)) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        human(value);
    }
    Ok(())
}

fn parse_cli_datetime(value: &str) -> anyhow::Result<chrono::NaiveDateTime> {
    parse_datetime_text(value).ok_or_else(|| anyhow!("invalid date-time '{}'", value))
}

fn print_transport(t: &Transport) {
    println!(
        "{}  {}  {:<9} {:<10} {} -> {}  truck={} driver={}  [{}]",
        t.display_number,
        t.pickup_at.format("%Y-%m-%d %H:%M"),
        t.transport_type.to_string(),
        t.status().to_string(),
        t.pickup_location,
        t.delivery_location,
        t.truck_plate.as_deref().unwrap_or("-"),
        t.driver_id.as_deref().unwrap_or("-"),
        t.transport_id
    );
}

fn print_planning(view: &PlanningView) {
    println!("week {} .. {}", view.dates[0], view.dates[view.dates.len() - 1]);
    for truck in &view.transports {
        println!();
        println!("{} ({} transport(s))", truck.truck, truck.transport_count());
        for date in &view.dates {
            let Some(day) = truck.transports.get(date) else {
                continue;
            };
            println!("  {}", date);
            for t in day {
                println!(
                    "    {:>2}. {}  {}  {:<10} {} -> {}{}",
                    t.sequence_no,
                    t.display_number,
                    t.pickup_at.format("%H:%M"),
                    t.status.to_string(),
                    t.pickup_location,
                    t.delivery_location,
                    t.driver_name
                        .as_deref()
                        .map(|n| format!("  ({})", n))
                        .unwrap_or_default()
                );
            }
        }
    }
}
