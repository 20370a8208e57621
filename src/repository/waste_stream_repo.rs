// ==========================================
// Recycling transport planning - waste stream repository
// ==========================================

use crate::domain::waste_stream::WasteStream;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_mapping::{format_datetime, parse_datetime_column};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

pub struct WasteStreamRepository {
    conn: Arc<Mutex<Connection>>,
}

impl WasteStreamRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, stream: &WasteStream) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"INSERT INTO waste_stream (number, name, processor_id, created_at)
               VALUES (?1, ?2, ?3, ?4)"#,
            params![
                stream.number,
                stream.name,
                stream.processor_id,
                format_datetime(&stream.created_at),
            ],
        )?;
        Ok(())
    }

    pub fn find_by_number(&self, number: &str) -> RepositoryResult<Option<WasteStream>> {
        let conn = self.get_conn()?;
        let stream = conn
            .query_row(
                "SELECT number, name, processor_id, created_at FROM waste_stream WHERE number = ?1",
                params![number],
                map_row,
            )
            .optional()?;
        Ok(stream)
    }

    pub fn list_all(&self) -> RepositoryResult<Vec<WasteStream>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT number, name, processor_id, created_at FROM waste_stream ORDER BY number",
        )?;
        let streams = stmt
            .query_map([], map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(streams)
    }
}

fn map_row(row: &rusqlite::Row) -> rusqlite::Result<WasteStream> {
    Ok(WasteStream {
        number: row.get(0)?,
        name: row.get(1)?,
        processor_id: row.get(2)?,
        created_at: parse_datetime_column(3, &row.get::<_, String>(3)?)?,
    })
}
