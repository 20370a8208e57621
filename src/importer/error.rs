// ==========================================
// Recycling transport planning - import errors
// ==========================================
// thiserror derive
// ==========================================

use crate::i18n::t_with_args;
use thiserror::Error;

/// Import error
///
/// File level errors abort one file; row level errors become rejections.
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== File =====
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported file format: {0} (supported: .xlsx/.xls/.csv)")]
    UnsupportedFormat(String),

    #[error("File read failed: {0}")]
    FileReadError(String),

    #[error("Excel parse failed: {0}")]
    ExcelParseError(String),

    #[error("CSV parse failed: {0}")]
    CsvParseError(String),

    // ===== Row mapping =====
    #[error("Row {row}: {message}")]
    FieldMappingError { row: usize, message: String },

    #[error("Row {row}, field {field}: cannot parse date/time '{value}'")]
    DateFormatError {
        row: usize,
        field: String,
        value: String,
    },

    // ===== Generic =====
    #[error("Internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// Message in the current locale, for end users
    pub fn localized_message(&self) -> String {
        match self {
            ImportError::FileNotFound(path) => {
                t_with_args("import.file_not_found", &[("path", path)])
            }
            ImportError::UnsupportedFormat(ext) => {
                t_with_args("import.unsupported_format", &[("ext", ext)])
            }
            other => other.to_string(),
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

impl From<calamine::XlsxError> for ImportError {
    fn from(err: calamine::XlsxError) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result alias
pub type ImportResult<T> = Result<T, ImportError>;
