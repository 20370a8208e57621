// ==========================================
// Recycling transport planning - repository errors
// ==========================================
// thiserror derive; rusqlite failures are classified here
// ==========================================

use thiserror::Error;

/// Repository layer error
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== Database =====
    #[error("Record not found: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    #[error("Database connection failed: {0}")]
    DatabaseConnectionError(String),

    #[error("Database lock failed: {0}")]
    LockError(String),

    #[error("Database transaction failed: {0}")]
    DatabaseTransactionError(String),

    #[error("Database query failed: {0}")]
    DatabaseQueryError(String),

    #[error("Unique constraint violated: {0}")]
    UniqueConstraintViolation(String),

    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    #[error("Concurrent modification: {entity} with id={id}")]
    ConcurrentModification { entity: String, id: String },

    // ===== Stored data =====
    #[error("Invalid stored value (field={field}): {message}")]
    FieldValueError { field: String, message: String },

    // ===== Generic =====
    #[error("Internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RepositoryError {
    pub fn not_found(entity: &str, id: impl Into<String>) -> Self {
        RepositoryError::NotFound {
            entity: entity.to_string(),
            id: id.into(),
        }
    }

    pub fn concurrent_modification(entity: &str, id: impl Into<String>) -> Self {
        RepositoryError::ConcurrentModification {
            entity: entity.to_string(),
            id: id.into(),
        }
    }
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if msg.contains("UNIQUE") {
                    RepositoryError::UniqueConstraintViolation(msg)
                } else if msg.contains("FOREIGN KEY") {
                    RepositoryError::ForeignKeyViolation(msg)
                } else {
                    RepositoryError::DatabaseQueryError(msg)
                }
            }
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "Unknown".to_string(),
                id: "Unknown".to_string(),
            },
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result alias
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_unique_violation_is_classified() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id TEXT PRIMARY KEY);").unwrap();
        conn.execute("INSERT INTO t (id) VALUES ('a')", []).unwrap();

        let err: RepositoryError = conn
            .execute("INSERT INTO t (id) VALUES ('a')", [])
            .unwrap_err()
            .into();

        assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));
    }

    #[test]
    fn test_no_rows_maps_to_not_found() {
        let err: RepositoryError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }
}
