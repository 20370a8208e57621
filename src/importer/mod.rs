// ==========================================
// Recycling transport planning - import layer
// ==========================================
// Bulk transport import from Excel / CSV
// ==========================================

pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod transport_importer;

pub use error::{ImportError, ImportResult};
pub use field_mapper::{parse_datetime_text, FieldMapper, MappedTransport};
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRow, UniversalFileParser};
pub use transport_importer::{
    ImportRejection, ImportSummary, TransportImporter, TransportImporterImpl,
};
