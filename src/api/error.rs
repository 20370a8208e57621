// ==========================================
// Recycling transport planning - API errors
// ==========================================
// Converts repository / engine / config failures into
// caller-facing errors with an explicit reason
// ==========================================

use crate::config::ConfigError;
use crate::engine::numbering::NumberingError;
use crate::engine::planning::PlanningError;
use crate::i18n::t_with_args;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API layer error
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // Business rule errors
    // ==========================================
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Business rule violated: {0}")]
    BusinessRuleViolation(String),

    #[error("Validation failed: {reason}")]
    ValidationError {
        reason: String,
        violations: Vec<ValidationViolation>,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    // ==========================================
    // Data access errors
    // ==========================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Database connection failed: {0}")]
    DatabaseConnectionError(String),

    #[error("Database transaction failed: {0}")]
    DatabaseTransactionError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ==========================================
    // Generic
    // ==========================================
    #[error("Internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// HTTP-style status code for transport layers
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidInput(_) | ApiError::ValidationError { .. } => 400,
            ApiError::NotFound(_) => 404,
            ApiError::BusinessRuleViolation(_) | ApiError::Conflict(_) => 409,
            _ => 500,
        }
    }

    /// Stable error code for JSON output
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::BusinessRuleViolation(_) => "BUSINESS_RULE_VIOLATION",
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::DatabaseError(_)
            | ApiError::DatabaseConnectionError(_)
            | ApiError::DatabaseTransactionError(_) => "DATABASE_ERROR",
            ApiError::ConfigurationError(_) => "CONFIGURATION_ERROR",
            ApiError::InternalError(_) | ApiError::Other(_) => "INTERNAL_ERROR",
        }
    }
}

// ==========================================
// From RepositoryError
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("lock acquisition failed: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::Conflict(format!("unique constraint: {}", msg))
            }
            RepositoryError::ConcurrentModification { entity, id } => ApiError::Conflict(
                format!("{}(id={}) was modified concurrently", entity, id),
            ),
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("foreign key constraint: {}", msg))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::DatabaseError(format!("field {}: {}", field, message))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

impl From<PlanningError> for ApiError {
    fn from(err: PlanningError) -> Self {
        match err {
            PlanningError::InvalidStatus(value) => ApiError::InvalidInput(t_with_args(
                "planning.invalid_status",
                &[("value", &value)],
            )),
            PlanningError::DuplicateTransport(id) => ApiError::InvalidInput(t_with_args(
                "planning.duplicate_transport",
                &[("id", &id)],
            )),
            PlanningError::MissingTransport(id) => {
                ApiError::NotFound(format!("Transport(id={})", id))
            }
            PlanningError::FinishedTransport(id) => ApiError::BusinessRuleViolation(t_with_args(
                "planning.finished_transport",
                &[("id", &id)],
            )),
        }
    }
}

impl From<NumberingError> for ApiError {
    fn from(err: NumberingError) -> Self {
        match err {
            NumberingError::InvalidProcessorId(value) => ApiError::ConfigurationError(
                t_with_args("waste_stream.invalid_processor_id", &[("value", &value)]),
            ),
            NumberingError::SequenceExhausted(processor) => ApiError::BusinessRuleViolation(
                t_with_args("waste_stream.sequence_exhausted", &[("processor", &processor)]),
            ),
            NumberingError::InvalidCounter(value) => {
                ApiError::InternalError(format!("invalid counter value {}", value))
            }
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::InvalidValue { key, value } => {
                ApiError::ConfigurationError(format!("{}={}", key, value))
            }
            ConfigError::Lock(msg) => {
                ApiError::DatabaseConnectionError(format!("lock acquisition failed: {}", msg))
            }
            ConfigError::Storage(e) => ApiError::DatabaseError(e.to_string()),
            ConfigError::Snapshot(e) => ApiError::InvalidInput(e.to_string()),
        }
    }
}

/// Result alias
pub type ApiResult<T> = Result<T, ApiError>;

// ==========================================
// Validation violation detail
// ==========================================

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ValidationViolation {
    /// Offending field, e.g. "pickup_location"
    pub field: String,
    pub reason: String,
}

impl ValidationViolation {
    pub fn new(field: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
