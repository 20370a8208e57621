// ==========================================
// Test data builders
// ==========================================
#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use recycling_planning::api::TransportRequest;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, 0).unwrap()
}

// ==========================================
// TransportRequest builder
// ==========================================

pub struct TransportRequestBuilder {
    request: TransportRequest,
}

impl TransportRequestBuilder {
    /// Pickup at 08:00 on `day`, LOC-A -> LOC-B, unassigned
    pub fn new(day: NaiveDate) -> Self {
        Self {
            request: TransportRequest {
                pickup_location: "LOC-A".to_string(),
                delivery_location: "LOC-B".to_string(),
                pickup_at: day.and_hms_opt(8, 0, 0).unwrap(),
                ..Default::default()
            },
        }
    }

    pub fn at(mut self, hour: u32, minute: u32) -> Self {
        self.request.pickup_at = self.request.pickup_at.date().and_hms_opt(hour, minute, 0).unwrap();
        self
    }

    pub fn delivery_after_hours(mut self, hours: i64) -> Self {
        self.request.delivery_at = Some(self.request.pickup_at + Duration::hours(hours));
        self
    }

    pub fn locations(mut self, pickup: &str, delivery: &str) -> Self {
        self.request.pickup_location = pickup.to_string();
        self.request.delivery_location = delivery.to_string();
        self
    }

    pub fn truck(mut self, plate: &str) -> Self {
        self.request.truck_plate = Some(plate.to_string());
        self
    }

    pub fn driver(mut self, driver_id: &str) -> Self {
        self.request.driver_id = Some(driver_id.to_string());
        self
    }

    pub fn waste_stream(mut self, number: &str) -> Self {
        self.request.waste_stream_number = Some(number.to_string());
        self
    }

    pub fn note(mut self, note: &str) -> Self {
        self.request.note = Some(note.to_string());
        self
    }

    pub fn build(self) -> TransportRequest {
        self.request
    }
}
