// ==========================================
// Recycling transport planning - file parsers
// ==========================================
// Excel (.xlsx/.xls) / CSV (.csv) into header -> value rows.
// Headers are trimmed and lower-cased; blank rows are skipped.
// ==========================================

use crate::domain::types::DATETIME_FORMAT;
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Data, DataType, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// One parsed row: lower-cased header -> trimmed cell text
pub type RawRow = HashMap<String, String>;

// ==========================================
// FileParser trait
// ==========================================
pub trait FileParser: Send + Sync {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>>;
}

fn check_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase()
}

// ==========================================
// CSV
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        check_exists(file_path)?;

        let ext = extension_of(file_path);
        if !ext.is_empty() && ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // ragged rows allowed
            .from_reader(file);

        let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut row = RawRow::new();
            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row.insert(header.clone(), value.trim().to_string());
                }
            }

            if row.values().all(|v| v.is_empty()) {
                continue;
            }
            records.push(row);
        }

        Ok(records)
    }
}

// ==========================================
// Excel (first worksheet)
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        check_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("workbook has no worksheet".to_string()))?;
        let range = workbook.worksheet_range(&sheet_name)?;

        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row
                .iter()
                .map(|cell| normalize_header(&cell.to_string()))
                .collect(),
            None => return Ok(Vec::new()),
        };

        let mut records = Vec::new();
        for data_row in rows {
            let mut row = RawRow::new();
            for (col_idx, cell) in data_row.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row.insert(header.clone(), cell_to_string(cell));
                }
            }

            if row.values().all(|v| v.is_empty()) {
                continue;
            }
            records.push(row);
        }

        Ok(records)
    }
}

/// Cell text; date cells use the canonical date-time format, whole floats lose ".0"
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_datetime()
            .map(|dt| dt.format(DATETIME_FORMAT).to_string())
            .unwrap_or_else(|| cell.to_string()),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        _ => cell.to_string().trim().to_string(),
    }
}

// ==========================================
// Dispatch on extension
// ==========================================
pub struct UniversalFileParser;

impl FileParser for UniversalFileParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        match extension_of(file_path).as_str() {
            "csv" => CsvParser.parse_to_raw_records(file_path),
            "xlsx" | "xls" => ExcelParser.parse_to_raw_records(file_path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}
