// ==========================================
// Recycling transport planning - transport repository
// ==========================================
// Data access only, no business rules
// ==========================================

use crate::domain::transport::Transport;
use crate::domain::types::TransportType;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_mapping::{
    format_datetime, parse_datetime_column, parse_opt_datetime_column,
};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = r#"
    transport_id, display_number, transport_type,
    pickup_location, delivery_location, pickup_at, delivery_at,
    truck_plate, driver_id, waste_stream_number, container_id, note,
    sequence_no, finished_at, created_at, updated_at
"#;

// ==========================================
// TransportRepository
// ==========================================
pub struct TransportRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TransportRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Insert a transport
    pub fn insert(&self, transport: &Transport) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"INSERT INTO transport (
                    transport_id, display_number, transport_type,
                    pickup_location, delivery_location, pickup_at, delivery_at,
                    truck_plate, driver_id, waste_stream_number, container_id, note,
                    sequence_no, finished_at, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)"#,
            params![
                transport.transport_id,
                transport.display_number,
                transport.transport_type.to_db_str(),
                transport.pickup_location,
                transport.delivery_location,
                format_datetime(&transport.pickup_at),
                transport.delivery_at.as_ref().map(format_datetime),
                transport.truck_plate,
                transport.driver_id,
                transport.waste_stream_number,
                transport.container_id,
                transport.note,
                transport.sequence_no,
                transport.finished_at.as_ref().map(format_datetime),
                format_datetime(&transport.created_at),
                format_datetime(&transport.updated_at),
            ],
        )?;
        Ok(())
    }

    /// Update all mutable columns of one transport
    ///
    /// # Returns
    /// - Err(NotFound) when the id does not exist
    pub fn update(&self, transport: &Transport) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = Self::execute_update(&conn, transport)?;
        if rows == 0 {
            return Err(RepositoryError::not_found("Transport", &transport.transport_id));
        }
        Ok(())
    }

    /// Write a reorder in one transaction
    ///
    /// # Arguments
    /// - `moved`: transports with their new truck, date and sequence number
    /// - `resequenced`: (transport_id, sequence_no) for other members of the touched buckets
    ///
    /// # Returns
    /// - Ok(number of moved transports written)
    /// - Err(NotFound): a moved transport no longer exists
    /// - Err(ConcurrentModification): a moved transport was finished meanwhile
    ///
    /// Any error rolls the whole batch back.
    pub fn write_reorder(
        &self,
        moved: &[Transport],
        resequenced: &[(String, i32)],
    ) -> RepositoryResult<usize> {
        if moved.is_empty() && resequenced.is_empty() {
            return Ok(0);
        }

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        for transport in moved {
            let rows = Self::execute_update_open(&tx, transport)?;
            if rows == 0 {
                // tx dropped here -> rollback
                let exists: bool = tx.query_row(
                    "SELECT EXISTS(SELECT 1 FROM transport WHERE transport_id = ?1)",
                    params![transport.transport_id],
                    |row| row.get(0),
                )?;
                return Err(if exists {
                    RepositoryError::concurrent_modification("Transport", &transport.transport_id)
                } else {
                    RepositoryError::not_found("Transport", &transport.transport_id)
                });
            }
        }

        let now = chrono::Local::now().naive_local();
        for (transport_id, sequence_no) in resequenced {
            tx.execute(
                "UPDATE transport SET sequence_no = ?2, updated_at = ?3 WHERE transport_id = ?1",
                params![transport_id, sequence_no, format_datetime(&now)],
            )?;
        }

        tx.commit()?;
        Ok(moved.len())
    }

    /// Same columns as `execute_update`, but never touches a finished row
    fn execute_update_open(conn: &Connection, transport: &Transport) -> rusqlite::Result<usize> {
        conn.execute(
            r#"UPDATE transport SET
                    pickup_at = ?2,
                    delivery_at = ?3,
                    truck_plate = ?4,
                    sequence_no = ?5,
                    updated_at = ?6
                WHERE transport_id = ?1 AND finished_at IS NULL"#,
            params![
                transport.transport_id,
                format_datetime(&transport.pickup_at),
                transport.delivery_at.as_ref().map(format_datetime),
                transport.truck_plate,
                transport.sequence_no,
                format_datetime(&transport.updated_at),
            ],
        )
    }

    fn execute_update(conn: &Connection, transport: &Transport) -> rusqlite::Result<usize> {
        conn.execute(
            r#"UPDATE transport SET
                    transport_type = ?2,
                    pickup_location = ?3,
                    delivery_location = ?4,
                    pickup_at = ?5,
                    delivery_at = ?6,
                    truck_plate = ?7,
                    driver_id = ?8,
                    waste_stream_number = ?9,
                    container_id = ?10,
                    note = ?11,
                    sequence_no = ?12,
                    finished_at = ?13,
                    updated_at = ?14
                WHERE transport_id = ?1"#,
            params![
                transport.transport_id,
                transport.transport_type.to_db_str(),
                transport.pickup_location,
                transport.delivery_location,
                format_datetime(&transport.pickup_at),
                transport.delivery_at.as_ref().map(format_datetime),
                transport.truck_plate,
                transport.driver_id,
                transport.waste_stream_number,
                transport.container_id,
                transport.note,
                transport.sequence_no,
                transport.finished_at.as_ref().map(format_datetime),
                format_datetime(&transport.updated_at),
            ],
        )
    }

    pub fn find_by_id(&self, transport_id: &str) -> RepositoryResult<Option<Transport>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM transport WHERE transport_id = ?1", SELECT_COLUMNS);
        let transport = conn
            .query_row(&sql, params![transport_id], map_row)
            .optional()?;
        Ok(transport)
    }

    /// Fetch transports by id, in no particular order
    pub fn find_by_ids(&self, transport_ids: &[String]) -> RepositoryResult<Vec<Transport>> {
        if transport_ids.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.get_conn()?;
        let placeholders = vec!["?"; transport_ids.len()].join(", ");
        let sql = format!(
            "SELECT {} FROM transport WHERE transport_id IN ({})",
            SELECT_COLUMNS, placeholders
        );

        let mut stmt = conn.prepare(&sql)?;
        let transports = stmt
            .query_map(params_from_iter(transport_ids.iter()), map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(transports)
    }

    /// Transports with pickup in the half-open window [from, to)
    pub fn find_by_pickup_range(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> RepositoryResult<Vec<Transport>> {
        let conn = self.get_conn()?;
        let sql = format!(
            r#"SELECT {} FROM transport
               WHERE pickup_at >= ?1 AND pickup_at < ?2
               ORDER BY truck_plate, pickup_at, sequence_no"#,
            SELECT_COLUMNS
        );

        let mut stmt = conn.prepare(&sql)?;
        let transports = stmt
            .query_map(params![format_datetime(&from), format_datetime(&to)], map_row)?
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            "find_by_pickup_range [{} .. {}) -> {} rows",
            from,
            to,
            transports.len()
        );
        Ok(transports)
    }

    /// All transports in one (truck, date) bucket, finished ones included
    ///
    /// `truck_plate = None` addresses the unassigned bucket.
    pub fn find_bucket(
        &self,
        truck_plate: Option<&str>,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<Transport>> {
        let conn = self.get_conn()?;
        let from = date.and_hms_opt(0, 0, 0).unwrap_or_default();
        let to = from + chrono::Duration::days(1);
        let sql = format!(
            r#"SELECT {} FROM transport
               WHERE truck_plate IS ?1 AND pickup_at >= ?2 AND pickup_at < ?3
               ORDER BY sequence_no, pickup_at, display_number"#,
            SELECT_COLUMNS
        );

        let mut stmt = conn.prepare(&sql)?;
        let transports = stmt
            .query_map(
                params![truck_plate, format_datetime(&from), format_datetime(&to)],
                map_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(transports)
    }

    /// Next free sequence number in a (truck, date) bucket
    ///
    /// `truck_plate = None` addresses the unassigned bucket.
    pub fn next_sequence_no(
        &self,
        truck_plate: Option<&str>,
        date: NaiveDate,
    ) -> RepositoryResult<i32> {
        let conn = self.get_conn()?;
        let from = date.and_hms_opt(0, 0, 0).unwrap_or_default();
        let to = from + chrono::Duration::days(1);

        let max: Option<i32> = conn.query_row(
            r#"SELECT MAX(sequence_no) FROM transport
               WHERE truck_plate IS ?1 AND pickup_at >= ?2 AND pickup_at < ?3"#,
            params![truck_plate, format_datetime(&from), format_datetime(&to)],
            |row| row.get(0),
        )?;

        Ok(max.map(|m| m + 1).unwrap_or(0))
    }

    /// Number of unfinished transports assigned to a truck
    pub fn count_open_by_truck(&self, license_plate: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM transport WHERE truck_plate = ?1 AND finished_at IS NULL",
            params![license_plate],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    pub fn delete(&self, transport_id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "DELETE FROM transport WHERE transport_id = ?1",
            params![transport_id],
        )?;
        Ok(rows)
    }
}

fn map_row(row: &rusqlite::Row) -> rusqlite::Result<Transport> {
    Ok(Transport {
        transport_id: row.get(0)?,
        display_number: row.get(1)?,
        transport_type: TransportType::from_db_str(&row.get::<_, String>(2)?),
        pickup_location: row.get(3)?,
        delivery_location: row.get(4)?,
        pickup_at: parse_datetime_column(5, &row.get::<_, String>(5)?)?,
        delivery_at: parse_opt_datetime_column(6, row.get(6)?)?,
        truck_plate: row.get(7)?,
        driver_id: row.get(8)?,
        waste_stream_number: row.get(9)?,
        container_id: row.get(10)?,
        note: row.get(11)?,
        sequence_no: row.get(12)?,
        finished_at: parse_opt_datetime_column(13, row.get(13)?)?,
        created_at: parse_datetime_column(14, &row.get::<_, String>(14)?)?,
        updated_at: parse_datetime_column(15, &row.get::<_, String>(15)?)?,
    })
}
