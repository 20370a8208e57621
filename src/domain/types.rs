// ==========================================
// Recycling transport planning - domain types
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bucket key for transports without a truck.
///
/// Also accepted as the target plate of a reorder to un-assign transports.
pub const UNASSIGNED_TRUCK: &str = "NOT_ASSIGNED";

/// Storage format for dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Storage format for timestamps
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ==========================================
// Transport status (derived, never stored)
// ==========================================
// Serialized as SCREAMING_SNAKE_CASE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransportStatus {
    Unplanned, // truck or driver missing
    Planned,   // truck and driver assigned
    Finished,  // completed
}

impl TransportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportStatus::Unplanned => "UNPLANNED",
            TransportStatus::Planned => "PLANNED",
            TransportStatus::Finished => "FINISHED",
        }
    }
}

impl fmt::Display for TransportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UNPLANNED" => Ok(TransportStatus::Unplanned),
            "PLANNED" => Ok(TransportStatus::Planned),
            "FINISHED" => Ok(TransportStatus::Finished),
            other => Err(other.to_string()),
        }
    }
}

// ==========================================
// Transport type
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransportType {
    Container, // container placement / pickup
    Waste,     // waste movement under a waste stream
}

impl TransportType {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            TransportType::Container => "CONTAINER",
            TransportType::Waste => "WASTE",
        }
    }

    /// Parse from storage; unknown values fall back to CONTAINER
    pub fn from_db_str(s: &str) -> Self {
        match s {
            "WASTE" => TransportType::Waste,
            _ => TransportType::Container,
        }
    }
}

impl fmt::Display for TransportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

impl FromStr for TransportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CONTAINER" => Ok(TransportType::Container),
            "WASTE" => Ok(TransportType::Waste),
            other => Err(other.to_string()),
        }
    }
}

/// Normalize a license plate: trimmed, upper case
pub fn normalize_plate(plate: &str) -> String {
    plate.trim().to_ascii_uppercase()
}
