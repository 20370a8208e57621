// ==========================================
// Recycling transport planning - field mapper
// ==========================================
// Raw row -> (TransportType, TransportRequest)
// Column names accept a few aliases
// ==========================================

use crate::api::transport_api::TransportRequest;
use crate::domain::types::TransportType;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRow;
use chrono::{NaiveDate, NaiveDateTime};

/// Accepted date-time layouts, tried in order
const DATETIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%d-%m-%Y %H:%M",
];

/// A mapped row, ready for TransportApi
#[derive(Debug, Clone, PartialEq)]
pub struct MappedTransport {
    pub row_number: usize,
    pub transport_type: TransportType,
    pub request: TransportRequest,
}

pub struct FieldMapper;

impl FieldMapper {
    /// Map one row
    ///
    /// # Arguments
    /// - `row`: parsed row (lower-case headers)
    /// - `row_number`: 1-based data row number, header excluded
    ///
    /// # Type inference
    /// A blank `transport_type` means WASTE when a waste stream number is
    /// present, CONTAINER otherwise.
    pub fn map_row(&self, row: &RawRow, row_number: usize) -> ImportResult<MappedTransport> {
        let pickup_raw = self
            .get_string(row, "pickup_at")
            .ok_or_else(|| ImportError::FieldMappingError {
                row: row_number,
                message: "pickup_at is required".to_string(),
            })?;
        let pickup_at = parse_datetime(&pickup_raw, "pickup_at", row_number)?;

        let delivery_at = match self.get_string(row, "delivery_at") {
            Some(raw) => Some(parse_datetime(&raw, "delivery_at", row_number)?),
            None => None,
        };

        let waste_stream_number = self.get_string(row, "waste_stream_number");
        let transport_type = match self.get_string(row, "transport_type") {
            Some(raw) => raw
                .parse::<TransportType>()
                .map_err(|value| ImportError::FieldMappingError {
                    row: row_number,
                    message: format!("unknown transport_type '{}'", value),
                })?,
            None if waste_stream_number.is_some() => TransportType::Waste,
            None => TransportType::Container,
        };

        Ok(MappedTransport {
            row_number,
            transport_type,
            request: TransportRequest {
                pickup_location: self.get_string(row, "pickup_location").unwrap_or_default(),
                delivery_location: self.get_string(row, "delivery_location").unwrap_or_default(),
                pickup_at,
                delivery_at,
                truck_plate: self.get_string(row, "truck"),
                driver_id: self.get_string(row, "driver_id"),
                waste_stream_number,
                container_id: self.get_string(row, "container_id"),
                note: self.get_string(row, "note"),
            },
        })
    }

    /// First non-empty value among the column aliases
    fn get_string(&self, row: &RawRow, key: &str) -> Option<String> {
        let aliases: &[&str] = match key {
            "truck" => &["truck", "truck_plate", "license_plate", "kenteken"],
            "driver_id" => &["driver_id", "driver"],
            "waste_stream_number" => &["waste_stream_number", "waste_stream", "afvalstroomnummer"],
            "transport_type" => &["transport_type", "type"],
            "container_id" => &["container_id", "container"],
            _ => &[],
        };

        std::iter::once(key)
            .chain(aliases.iter().copied())
            .filter_map(|alias| row.get(alias))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
            .map(str::to_string)
    }
}

/// Parse date-time text in any accepted layout; a bare date means 00:00
pub fn parse_datetime_text(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    DATETIME_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(value, layout).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn parse_datetime(value: &str, field: &str, row_number: usize) -> ImportResult<NaiveDateTime> {
    parse_datetime_text(value).ok_or_else(|| ImportError::DateFormatError {
        row: row_number,
        field: field.to_string(),
        value: value.trim().to_string(),
    })
}
