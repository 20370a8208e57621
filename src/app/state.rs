// ==========================================
// Recycling transport planning - application state
// ==========================================
// One SQLite connection shared by every repository
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::api::{
    AuditRecorder, FleetApi, PlanningApi, TransportApi, TransportValidator, WasteStreamApi,
};
use crate::config::config_manager::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::importer::TransportImporterImpl;
use crate::repository::{
    ActionLogRepository, DriverRepository, SequenceRepository, TransportRepository,
    TruckRepository, WasteStreamRepository,
};

/// Environment variable that overrides the database location
pub const DB_PATH_ENV: &str = "RECYCLING_PLANNING_DB_PATH";

/// Actor recorded for imported transports
pub const IMPORT_ACTOR: &str = "import";

/// Application state
///
/// Holds every API instance over one shared connection.
pub struct AppState {
    pub db_path: String,

    pub planning_api: Arc<PlanningApi>,
    pub transport_api: Arc<TransportApi>,
    pub fleet_api: Arc<FleetApi>,
    pub waste_stream_api: Arc<WasteStreamApi>,
    pub importer: Arc<TransportImporterImpl>,

    pub config_manager: Arc<ConfigManager>,

    /// Audit trail reads
    pub action_log_repo: Arc<ActionLogRepository>,
}

impl AppState {
    /// Open (or create) the database and wire all layers
    ///
    /// # Returns
    /// - Err(String): database could not be opened or initialized
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("initializing AppState, database: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("cannot open database {}: {}", db_path, e))?;
        Self::from_connection(db_path, conn)
    }

    /// Wire all layers over an already opened connection
    pub fn from_connection(db_path: String, conn: Connection) -> Result<Self, String> {
        init_schema(&conn).map_err(|e| format!("schema initialization failed: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // Repositories
        // ==========================================
        let transport_repo = Arc::new(TransportRepository::new(conn.clone()));
        let truck_repo = Arc::new(TruckRepository::new(conn.clone()));
        let driver_repo = Arc::new(DriverRepository::new(conn.clone()));
        let waste_stream_repo = Arc::new(WasteStreamRepository::new(conn.clone()));
        let sequence_repo = Arc::new(SequenceRepository::new(conn.clone()));
        let action_log_repo = Arc::new(ActionLogRepository::new(conn.clone()));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| format!("config manager initialization failed: {}", e))?,
        );

        match config_manager.locale() {
            Ok(locale) => crate::i18n::set_locale(&locale),
            Err(e) => tracing::warn!("locale unreadable, keeping default: {}", e),
        }

        // ==========================================
        // APIs
        // ==========================================
        let audit = Arc::new(AuditRecorder::new(
            action_log_repo.clone(),
            config_manager.clone(),
        ));
        let validator = Arc::new(TransportValidator::new(
            truck_repo.clone(),
            driver_repo.clone(),
            waste_stream_repo.clone(),
        ));

        let planning_api = Arc::new(PlanningApi::new(
            transport_repo.clone(),
            truck_repo.clone(),
            driver_repo.clone(),
            audit.clone(),
        ));
        let transport_api = Arc::new(TransportApi::new(
            transport_repo.clone(),
            sequence_repo.clone(),
            validator,
            audit.clone(),
        ));
        let fleet_api = Arc::new(FleetApi::new(truck_repo, driver_repo, transport_repo));
        let waste_stream_api = Arc::new(WasteStreamApi::new(
            waste_stream_repo,
            sequence_repo,
            config_manager.clone(),
        ));
        let importer = Arc::new(TransportImporterImpl::new(
            transport_api.clone(),
            audit,
            IMPORT_ACTOR,
        ));

        tracing::info!("AppState ready");

        Ok(Self {
            db_path,
            planning_api,
            transport_api,
            fleet_api,
            waste_stream_api,
            importer,
            config_manager,
            action_log_repo,
        })
    }
}

/// Default database path
///
/// `RECYCLING_PLANNING_DB_PATH` wins; otherwise the user data directory,
/// falling back to the working directory.
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./recycling_planning.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("recycling-planning");
        // best-effort; opening the database reports the real error
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("recycling_planning.db");
        }
    }

    path.to_string_lossy().to_string()
}
