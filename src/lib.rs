// ==========================================
// Recycling transport planning - core library
// ==========================================
// Stack: Rust + SQLite
// Weekly truck x date planning of waste and container transports
// ==========================================

// Internationalization
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// Modules
// ==========================================

// Domain - entities and value types
pub mod domain;

// Repository - data access
pub mod repository;

// Engine - business rules
pub mod engine;

// Importer - CSV / Excel
pub mod importer;

// Configuration
pub mod config;

// Database setup (PRAGMA, schema)
pub mod db;

// Logging
pub mod logging;

// Internationalization
pub mod i18n;

// API - use cases
pub mod api;

// Application wiring
pub mod app;

// ==========================================
// Re-exports
// ==========================================

pub use domain::{
    ActionLog, ActionType, Driver, PlanningTransport, PlanningView, Transport, TransportStatus,
    TransportType, Truck, TruckPlanning, WasteStream, UNASSIGNED_TRUCK,
};

pub use engine::{PlanningAssembler, PlanningFilter, WeekWindow};

pub use api::{ApiError, ApiResult, FleetApi, PlanningApi, TransportApi, WasteStreamApi};

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "Recycling Transport Planning";
