// ==========================================
// Recycling transport planning - named counters
// ==========================================
// id_sequence table; increments run in their own transaction
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

pub mod sequence_names {
    pub const TRANSPORT_NUMBER: &str = "transport_number";
    pub const WASTE_STREAM_NUMBER: &str = "waste_stream_number";
}

pub struct SequenceRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SequenceRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Increment and return the counter (first value is 1)
    pub fn next_value(&self, name: &str) -> RepositoryResult<i64> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"INSERT INTO id_sequence (name, current_value) VALUES (?1, 1)
               ON CONFLICT(name) DO UPDATE SET current_value = current_value + 1"#,
            params![name],
        )?;
        let value: i64 = tx.query_row(
            "SELECT current_value FROM id_sequence WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )?;

        tx.commit()?;
        Ok(value)
    }

    /// Current value without incrementing (0 when never used)
    pub fn current_value(&self, name: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let value: Option<i64> = conn
            .query_row(
                "SELECT current_value FROM id_sequence WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;

    #[test]
    fn test_next_value_increments() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        let repo = SequenceRepository::new(Arc::new(Mutex::new(conn)));

        assert_eq!(repo.current_value(sequence_names::TRANSPORT_NUMBER).unwrap(), 0);
        assert_eq!(repo.next_value(sequence_names::TRANSPORT_NUMBER).unwrap(), 1);
        assert_eq!(repo.next_value(sequence_names::TRANSPORT_NUMBER).unwrap(), 2);
        // counters are independent
        assert_eq!(repo.next_value(sequence_names::WASTE_STREAM_NUMBER).unwrap(), 1);
        assert_eq!(repo.current_value(sequence_names::TRANSPORT_NUMBER).unwrap(), 2);
    }
}
