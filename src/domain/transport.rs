// ==========================================
// Recycling transport planning - transport model
// ==========================================

use crate::domain::types::{TransportStatus, TransportType};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// Transport - one pickup-to-delivery movement
// ==========================================
// Aligned with the `transport` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transport {
    // ===== Identity =====
    pub transport_id: String,   // UUID
    pub display_number: String, // e.g. 26-000042
    pub transport_type: TransportType,

    // ===== Route =====
    pub pickup_location: String,
    pub delivery_location: String,
    pub pickup_at: NaiveDateTime,
    pub delivery_at: Option<NaiveDateTime>,

    // ===== Assignment (references, not owned) =====
    pub truck_plate: Option<String>,
    pub driver_id: Option<String>,

    // ===== Cargo =====
    pub waste_stream_number: Option<String>,
    pub container_id: Option<String>,
    pub note: Option<String>,

    // ===== Planning =====
    pub sequence_no: i32, // order inside the (truck, date) bucket
    pub finished_at: Option<NaiveDateTime>,

    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Transport {
    /// Derived status
    ///
    /// - FINISHED: finished_at is set
    /// - PLANNED: truck and driver both assigned
    /// - UNPLANNED: anything else
    pub fn status(&self) -> TransportStatus {
        if self.finished_at.is_some() {
            TransportStatus::Finished
        } else if self.truck_plate.is_some() && self.driver_id.is_some() {
            TransportStatus::Planned
        } else {
            TransportStatus::Unplanned
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    /// Pickup calendar date
    pub fn pickup_date(&self) -> NaiveDate {
        self.pickup_at.date()
    }

    /// Move the transport to another day.
    ///
    /// Pickup keeps its time of day; delivery shifts by the same number of days.
    pub fn move_to_date(&mut self, date: NaiveDate) {
        let shift = date - self.pickup_at.date();
        self.pickup_at = date.and_time(self.pickup_at.time());
        self.delivery_at = self.delivery_at.map(|d| d + shift);
    }
}
