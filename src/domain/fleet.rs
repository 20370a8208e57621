// ==========================================
// Recycling transport planning - trucks and drivers
// ==========================================
// Both are referenced by Transport, never owned by it
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Truck, identified by its license plate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Truck {
    pub license_plate: String, // primary key, normalized upper case
    pub brand: Option<String>,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Truck {
    /// Label for calendar headers: "AB-12-CD (DAF)"
    pub fn display_name(&self) -> String {
        match &self.brand {
            Some(brand) if !brand.trim().is_empty() => {
                format!("{} ({})", self.license_plate, brand.trim())
            }
            _ => self.license_plate.clone(),
        }
    }
}

/// Driver (user profile with the chauffeur role)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub driver_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub active: bool,
    pub created_at: NaiveDateTime,
}

impl Driver {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}
