// ==========================================
// Recycling transport planning - SQLite connection setup
// ==========================================
// Goals:
// - every Connection::open goes through the same PRAGMA setup
// - one busy_timeout for all connections
// - one idempotent schema bootstrap shared by app, CLI and tests
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// Default busy_timeout (milliseconds)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// schema_version expected by this build
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// Apply the shared PRAGMA setup to a connection
///
/// foreign_keys and busy_timeout are per-connection settings.
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Open a SQLite connection with the shared setup applied
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Read schema_version (None when the table does not exist yet)
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// Create all tables (idempotent) and record the schema version
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;

    let version = read_schema_version(conn)?;
    if version != Some(CURRENT_SCHEMA_VERSION) {
        tracing::warn!(
            "schema_version mismatch: expected={}, found={:?}",
            CURRENT_SCHEMA_VERSION,
            version
        );
    }

    Ok(())
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS config_kv (
    scope_id TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (scope_id, key)
);

CREATE TABLE IF NOT EXISTS id_sequence (
    name TEXT PRIMARY KEY,
    current_value INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS truck (
    license_plate TEXT PRIMARY KEY,
    brand TEXT,
    description TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS driver (
    driver_id TEXT PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT,
    active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS waste_stream (
    number TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    processor_id TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS transport (
    transport_id TEXT PRIMARY KEY,
    display_number TEXT NOT NULL UNIQUE,
    transport_type TEXT NOT NULL,
    pickup_location TEXT NOT NULL,
    delivery_location TEXT NOT NULL,
    pickup_at TEXT NOT NULL,
    delivery_at TEXT,
    truck_plate TEXT REFERENCES truck(license_plate),
    driver_id TEXT REFERENCES driver(driver_id),
    waste_stream_number TEXT REFERENCES waste_stream(number),
    container_id TEXT,
    note TEXT,
    sequence_no INTEGER NOT NULL DEFAULT 0,
    finished_at TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_transport_pickup_at ON transport(pickup_at);
CREATE INDEX IF NOT EXISTS idx_transport_truck_pickup ON transport(truck_plate, pickup_at);

CREATE TABLE IF NOT EXISTS action_log (
    action_id TEXT PRIMARY KEY,
    action_type TEXT NOT NULL,
    action_ts TEXT NOT NULL,
    actor TEXT NOT NULL,
    payload_json TEXT,
    truck_plate TEXT,
    date_range_start TEXT,
    date_range_end TEXT,
    detail TEXT
);

CREATE INDEX IF NOT EXISTS idx_action_log_ts ON action_log(action_ts);
"#;
