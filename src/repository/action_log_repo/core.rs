use crate::domain::action_log::ActionLog;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_mapping::{format_date, format_datetime};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// ActionLogRepository
// ==========================================
pub struct ActionLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ActionLogRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    pub(super) fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Insert one entry
    ///
    /// # Returns
    /// - `Ok(action_id)`
    pub fn insert(&self, log: &ActionLog) -> RepositoryResult<String> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO action_log (
                action_id, action_type, action_ts, actor, payload_json,
                truck_plate, date_range_start, date_range_end, detail
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                log.action_id,
                log.action_type,
                format_datetime(&log.action_ts),
                log.actor,
                log.payload_json.as_ref().map(|v| v.to_string()),
                log.truck_plate,
                log.date_range_start.as_ref().map(format_date),
                log.date_range_end.as_ref().map(format_date),
                log.detail,
            ],
        )?;

        Ok(log.action_id.clone())
    }
}
