// ==========================================
// Recycling transport planning - transport importer
// ==========================================
// Flow: parse -> map -> validate + create (TransportApi) -> summary
// Bad rows are reported, good rows are kept.
// ==========================================

use crate::api::audit::AuditRecorder;
use crate::api::error::ApiError;
use crate::api::transport_api::TransportApi;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::{
    CsvParser, ExcelParser, FileParser, RawRow, UniversalFileParser,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

// ==========================================
// Result types
// ==========================================

/// One rejected row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRejection {
    /// 1-based data row number, header excluded
    pub row: usize,
    pub reason: String,
}

/// Outcome of one file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportSummary {
    pub batch_id: String,
    pub file: String,
    pub total: usize,
    pub imported: usize,
    pub rejected: usize,
    pub rejections: Vec<ImportRejection>,
    pub transport_ids: Vec<String>,
}

// ==========================================
// TransportImporter trait
// ==========================================
#[async_trait]
pub trait TransportImporter: Send + Sync {
    /// Import transports from a CSV file
    async fn import_from_csv<P: AsRef<Path> + Send>(&self, file_path: P) -> ImportResult<ImportSummary>;

    /// Import transports from the first worksheet of an Excel file
    async fn import_from_excel<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<ImportSummary>;

    /// Import several files concurrently
    ///
    /// The format follows each file's extension (csv, xlsx, xls). A failing file does not
    /// affect the others; its slot holds the error message.
    async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
    ) -> Vec<Result<ImportSummary, String>>;
}

// ==========================================
// TransportImporterImpl
// ==========================================
pub struct TransportImporterImpl {
    transport_api: Arc<TransportApi>,
    audit: Arc<AuditRecorder>,
    field_mapper: FieldMapper,
    actor: String,
}

impl TransportImporterImpl {
    /// # Arguments
    /// - `actor`: recorded on every created transport, e.g. "import"
    pub fn new(transport_api: Arc<TransportApi>, audit: Arc<AuditRecorder>, actor: &str) -> Self {
        Self {
            transport_api,
            audit,
            field_mapper: FieldMapper,
            actor: actor.to_string(),
        }
    }

    /// Parse off the async runtime threads
    async fn parse_file<F>(&self, parser: F, path: PathBuf) -> ImportResult<Vec<RawRow>>
    where
        F: FileParser + 'static,
    {
        tokio::task::spawn_blocking(move || parser.parse_to_raw_records(&path))
            .await
            .map_err(|e| ImportError::InternalError(format!("parser task failed: {}", e)))?
    }

    /// Map and create every row
    fn import_rows(&self, file: &str, rows: Vec<RawRow>) -> ImportSummary {
        let mut summary = ImportSummary {
            batch_id: uuid::Uuid::new_v4().to_string(),
            file: file.to_string(),
            total: rows.len(),
            ..Default::default()
        };

        for (idx, row) in rows.iter().enumerate() {
            let row_number = idx + 1;

            let mapped = match self.field_mapper.map_row(row, row_number) {
                Ok(mapped) => mapped,
                Err(e) => {
                    warn!(row_number, error = %e, "row mapping failed");
                    summary.rejections.push(ImportRejection {
                        row: row_number,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            match self.transport_api.create_transport(
                mapped.request,
                mapped.transport_type,
                &self.actor,
            ) {
                Ok(transport) => summary.transport_ids.push(transport.transport_id),
                Err(e) => {
                    warn!(row_number, error = %e, "row rejected");
                    summary.rejections.push(ImportRejection {
                        row: row_number,
                        reason: rejection_reason(&e),
                    });
                }
            }
        }

        summary.imported = summary.transport_ids.len();
        summary.rejected = summary.rejections.len();
        summary
    }

    async fn import_file<F>(&self, parser: F, file_path: &Path) -> ImportResult<ImportSummary>
    where
        F: FileParser + 'static,
    {
        let file = file_path.display().to_string();
        info!(file = %file, "import started");

        let rows = self.parse_file(parser, file_path.to_path_buf()).await?;
        let summary = self.import_rows(&file, rows);

        info!(
            file = %file,
            total = summary.total,
            imported = summary.imported,
            rejected = summary.rejected,
            "import finished"
        );

        let mut log = ActionLog::new(ActionType::ImportTransports, &self.actor);
        log.payload_json = Some(json!({
            "batch_id": summary.batch_id,
            "file": summary.file,
            "total": summary.total,
            "imported": summary.imported,
            "rejected": summary.rejected,
        }));
        log.detail = Some(format!(
            "imported {}/{} row(s) from {}",
            summary.imported, summary.total, summary.file
        ));
        self.audit.record(log);

        Ok(summary)
    }
}

/// Single-line reason; validation errors list their fields
fn rejection_reason(err: &ApiError) -> String {
    match err {
        ApiError::ValidationError { violations, .. } if !violations.is_empty() => violations
            .iter()
            .map(|v| format!("{}: {}", v.field, v.reason))
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}

#[async_trait]
impl TransportImporter for TransportImporterImpl {
    #[instrument(skip(self, file_path))]
    async fn import_from_csv<P: AsRef<Path> + Send>(&self, file_path: P) -> ImportResult<ImportSummary> {
        let path = file_path.as_ref().to_path_buf();
        self.import_file(CsvParser, &path).await
    }

    #[instrument(skip(self, file_path))]
    async fn import_from_excel<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<ImportSummary> {
        let path = file_path.as_ref().to_path_buf();
        self.import_file(ExcelParser, &path).await
    }

    async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
    ) -> Vec<Result<ImportSummary, String>> {
        use futures::future::join_all;

        info!(count = file_paths.len(), "batch import started");

        let tasks = file_paths.into_iter().map(|path| async move {
            let path = path.as_ref();
            let file = path.display().to_string();

            self.import_file(UniversalFileParser, path)
                .await
                .map_err(|e| {
                    error!(file = %file, error = %e, "file import failed");
                    format!("{}: {}", file, e.localized_message())
                })
        });

        let results = join_all(tasks).await;

        info!(
            total = results.len(),
            success = results.iter().filter(|r| r.is_ok()).count(),
            failed = results.iter().filter(|r| r.is_err()).count(),
            "batch import finished"
        );

        results
    }
}
