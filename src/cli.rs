//! CLI definition using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TransportKind {
    Container,
    Waste,
}

#[derive(Parser)]
#[command(name = "recycling-planning")]
#[command(version)]
#[command(about = "Weekly truck planning for waste and container transports")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database file. Defaults to RECYCLING_PLANNING_DB_PATH or the user data dir.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Operator name recorded in the action log
    #[arg(long, global = true, default_value = "cli")]
    pub actor: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Weekly planning view and reordering
    Planning {
        #[command(subcommand)]
        action: PlanningAction,
    },

    /// Manage trucks
    Truck {
        #[command(subcommand)]
        action: TruckAction,
    },

    /// Manage drivers
    Driver {
        #[command(subcommand)]
        action: DriverAction,
    },

    /// Manage transports
    Transport {
        #[command(subcommand)]
        action: TransportAction,
    },

    /// Manage waste streams
    WasteStream {
        #[command(subcommand)]
        action: WasteStreamAction,
    },

    /// Import transports from CSV / Excel files
    Import {
        /// Files to import (.csv, .xlsx, .xls)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Show recent action log entries
    History {
        #[arg(long, short = 'n', default_value_t = 20)]
        limit: i32,
    },

    /// Read or change configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum PlanningAction {
    /// Show the week containing DATE
    Show {
        /// Any day of the week (YYYY-MM-DD)
        date: String,

        /// License plate, or NOT_ASSIGNED
        #[arg(long)]
        truck: Option<String>,

        #[arg(long)]
        driver: Option<String>,

        /// Comma separated, e.g. PLANNED,FINISHED
        #[arg(long)]
        status: Option<String>,
    },

    /// Put transports in order on one truck and day
    Reorder {
        /// Target day (YYYY-MM-DD)
        date: String,

        /// Target truck, or NOT_ASSIGNED
        plate: String,

        /// Transport ids in the new order
        ids: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum TruckAction {
    Add {
        plate: String,
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    List,
    Remove {
        plate: String,
    },
}

#[derive(Subcommand)]
pub enum DriverAction {
    Add {
        first_name: String,
        last_name: String,
        #[arg(long)]
        email: Option<String>,
    },
    List,
    Deactivate {
        driver_id: String,
    },
}

#[derive(Subcommand)]
pub enum TransportAction {
    /// Create a transport
    Add {
        #[arg(long = "type", value_enum, default_value_t = TransportKind::Container)]
        kind: TransportKind,

        /// Pickup time (YYYY-MM-DD HH:MM)
        #[arg(long)]
        pickup_at: String,

        /// Delivery time (YYYY-MM-DD HH:MM)
        #[arg(long)]
        delivery_at: Option<String>,

        #[arg(long = "from")]
        pickup_location: String,

        #[arg(long = "to")]
        delivery_location: String,

        #[arg(long)]
        truck: Option<String>,

        #[arg(long)]
        driver: Option<String>,

        #[arg(long)]
        waste_stream: Option<String>,

        #[arg(long)]
        container: Option<String>,

        #[arg(long)]
        note: Option<String>,
    },

    /// Assign or clear truck and driver
    Assign {
        id: String,
        #[arg(long)]
        truck: Option<String>,
        #[arg(long)]
        driver: Option<String>,
    },

    /// Mark a transport finished
    Finish {
        id: String,
        /// Completion time (YYYY-MM-DD HH:MM), default now
        #[arg(long)]
        at: Option<String>,
    },

    /// List transports with pickup between two days (inclusive)
    List {
        from: String,
        to: String,
    },

    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum WasteStreamAction {
    Add { name: String },
    List,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show one key, or all keys
    Get { key: Option<String> },
    Set { key: String, value: String },
}
