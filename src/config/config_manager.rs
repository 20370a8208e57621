// ==========================================
// Recycling transport planning - configuration manager
// ==========================================
// Storage: config_kv table (key-value + scope)
// Only the 'global' scope is used for now
// ==========================================

use crate::db::open_sqlite_connection;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// Configuration keys
// ==========================================
pub mod config_keys {
    /// Five-digit processor id prefixed to waste stream numbers
    pub const PROCESSOR_ID: &str = "waste_stream.processor_id";
    /// UI / message locale ("en" or "nl")
    pub const LOCALE: &str = "i18n.locale";
    /// Write audit entries for planning operations
    pub const AUDIT_ENABLED: &str = "planning.audit_enabled";
}

pub mod config_defaults {
    pub const PROCESSOR_ID: &str = "00000";
    pub const LOCALE: &str = "en";
    pub const AUDIT_ENABLED: bool = true;
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config lock failed: {0}")]
    Lock(String),

    #[error("Config storage failed: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Config snapshot invalid: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("Config value invalid (key={key}, value={value})")]
    InvalidValue { key: String, value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// ==========================================
// ConfigManager
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// Open a dedicated connection
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Share an existing connection (PRAGMA setup is re-applied, idempotent)
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let guard = conn.lock().map_err(|e| ConfigError::Lock(e.to_string()))?;
            crate::db::configure_sqlite_connection(&guard)?;
        }
        Ok(Self { conn })
    }

    fn get_conn(&self) -> ConfigResult<std::sync::MutexGuard<Connection>> {
        self.conn.lock().map_err(|e| ConfigError::Lock(e.to_string()))
    }

    /// Raw value of a global key
    pub fn get(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn get_or_default(&self, key: &str, default: &str) -> ConfigResult<String> {
        Ok(self.get(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// Upsert a global key
    pub fn set(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"INSERT INTO config_kv (scope_id, key, value, updated_at)
               VALUES (?1, ?2, ?3, datetime('now'))
               ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')"#,
            params![GLOBAL_SCOPE, key, value],
        )?;
        tracing::info!("config updated: {}={}", key, value);
        Ok(())
    }

    /// All global keys, sorted
    pub fn list(&self) -> ConfigResult<BTreeMap<String, String>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;
        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut map = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            map.insert(key, value);
        }
        Ok(map)
    }

    /// JSON snapshot of all global keys
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let map = self.list()?;
        Ok(serde_json::to_string(&json!(map))?)
    }

    /// Restore global keys from a snapshot (overwrites existing values)
    ///
    /// # Returns
    /// - number of keys written
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> ConfigResult<usize> {
        let map: BTreeMap<String, String> = serde_json::from_str(snapshot_json)?;

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let mut count = 0;
        for (key, value) in &map {
            count += tx.execute(
                r#"INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
                   ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3"#,
                params![GLOBAL_SCOPE, key, value],
            )?;
        }
        tx.commit()?;
        Ok(count)
    }

    // ===== Typed accessors =====

    /// Processor id for waste stream numbers, validated as five ASCII digits
    pub fn processor_id(&self) -> ConfigResult<String> {
        let value = self.get_or_default(config_keys::PROCESSOR_ID, config_defaults::PROCESSOR_ID)?;
        let value = value.trim().to_string();
        if value.len() != 5 || !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::InvalidValue {
                key: config_keys::PROCESSOR_ID.to_string(),
                value,
            });
        }
        Ok(value)
    }

    pub fn locale(&self) -> ConfigResult<String> {
        self.get_or_default(config_keys::LOCALE, config_defaults::LOCALE)
    }

    /// Audit switch; anything but "false"/"0" counts as enabled
    pub fn audit_enabled(&self) -> ConfigResult<bool> {
        Ok(match self.get(config_keys::AUDIT_ENABLED)? {
            Some(v) => !matches!(v.trim().to_ascii_lowercase().as_str(), "false" | "0"),
            None => config_defaults::AUDIT_ENABLED,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = manager();
        assert_eq!(config.processor_id().unwrap(), "00000");
        assert_eq!(config.locale().unwrap(), "en");
        assert!(config.audit_enabled().unwrap());
    }

    #[test]
    fn test_set_and_get() {
        let config = manager();
        config.set(config_keys::PROCESSOR_ID, "12345").unwrap();
        config.set(config_keys::PROCESSOR_ID, "54321").unwrap();
        assert_eq!(config.processor_id().unwrap(), "54321");

        config.set(config_keys::AUDIT_ENABLED, "false").unwrap();
        assert!(!config.audit_enabled().unwrap());
    }

    #[test]
    fn test_invalid_processor_id() {
        let config = manager();
        config.set(config_keys::PROCESSOR_ID, "12A45").unwrap();
        assert!(matches!(
            config.processor_id(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_snapshot_restore() {
        let config = manager();
        config.set(config_keys::LOCALE, "nl").unwrap();
        let snapshot = config.get_config_snapshot().unwrap();

        config.set(config_keys::LOCALE, "en").unwrap();
        assert_eq!(config.restore_config_from_snapshot(&snapshot).unwrap(), 1);
        assert_eq!(config.locale().unwrap(), "nl");
    }
}
