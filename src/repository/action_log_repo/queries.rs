use super::core::ActionLogRepository;
use crate::domain::action_log::ActionLog;
use crate::repository::error::RepositoryResult;
use crate::repository::row_mapping::{parse_datetime_column, parse_opt_date_column};
use rusqlite::{params, Result as SqliteResult, Row};

impl ActionLogRepository {
    // ==========================================
    // Queries
    // ==========================================

    pub fn find_by_id(&self, action_id: &str) -> RepositoryResult<Option<ActionLog>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT action_id, action_type, action_ts, actor, payload_json,
                   truck_plate, date_range_start, date_range_end, detail
            FROM action_log
            WHERE action_id = ?
            "#,
        )?;

        match stmt.query_row(params![action_id], |row| self.map_row(row)) {
            Ok(log) => Ok(Some(log)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Most recent entries first
    pub fn find_recent(&self, limit: i32) -> RepositoryResult<Vec<ActionLog>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT action_id, action_type, action_ts, actor, payload_json,
                   truck_plate, date_range_start, date_range_end, detail
            FROM action_log
            ORDER BY action_ts DESC, rowid DESC
            LIMIT ?
            "#,
        )?;

        let logs = stmt
            .query_map(params![limit], |row| self.map_row(row))?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(logs)
    }

    /// Entries of one action type, most recent first
    pub fn find_by_action_type(&self, action_type: &str) -> RepositoryResult<Vec<ActionLog>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT action_id, action_type, action_ts, actor, payload_json,
                   truck_plate, date_range_start, date_range_end, detail
            FROM action_log
            WHERE action_type = ?
            ORDER BY action_ts DESC, rowid DESC
            "#,
        )?;

        let logs = stmt
            .query_map(params![action_type], |row| self.map_row(row))?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(logs)
    }

    fn map_row(&self, row: &Row) -> SqliteResult<ActionLog> {
        let payload: Option<String> = row.get(4)?;
        Ok(ActionLog {
            action_id: row.get(0)?,
            action_type: row.get(1)?,
            action_ts: parse_datetime_column(2, &row.get::<_, String>(2)?)?,
            actor: row.get(3)?,
            payload_json: payload.and_then(|s| serde_json::from_str(&s).ok()),
            truck_plate: row.get(5)?,
            date_range_start: parse_opt_date_column(6, row.get(6)?)?,
            date_range_end: parse_opt_date_column(7, row.get(7)?)?,
            detail: row.get(8)?,
        })
    }
}
