// ==========================================
// Recycling transport planning - planning view
// ==========================================
// Truck x date grid for the operational calendar
// ==========================================

use crate::domain::transport::Transport;
use crate::domain::types::{TransportStatus, TransportType, UNASSIGNED_TRUCK};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weekly planning view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningView {
    /// Monday..Sunday, "YYYY-MM-DD"
    pub dates: Vec<String>,
    /// One entry per truck, plus the unassigned bucket
    pub transports: Vec<TruckPlanning>,
}

impl PlanningView {
    /// Look up a truck group by plate (or the unassigned key)
    pub fn truck(&self, plate: &str) -> Option<&TruckPlanning> {
        self.transports.iter().find(|t| t.truck == plate)
    }

    pub fn unassigned(&self) -> Option<&TruckPlanning> {
        self.transports.iter().find(|t| t.is_unassigned())
    }

    /// Total number of transports in the view
    pub fn transport_count(&self) -> usize {
        self.transports.iter().map(|t| t.transport_count()).sum()
    }
}

/// Transports of one truck, keyed by pickup date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruckPlanning {
    pub truck: String,
    pub transports: BTreeMap<String, Vec<PlanningTransport>>,
}

impl TruckPlanning {
    pub fn empty(truck: &str) -> Self {
        Self {
            truck: truck.to_string(),
            transports: BTreeMap::new(),
        }
    }

    pub fn is_unassigned(&self) -> bool {
        self.truck == UNASSIGNED_TRUCK
    }

    pub fn transport_count(&self) -> usize {
        self.transports.values().map(Vec::len).sum()
    }
}

/// One calendar cell entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningTransport {
    pub transport_id: String,
    pub display_number: String,
    pub transport_type: TransportType,
    pub pickup_location: String,
    pub delivery_location: String,
    pub pickup_at: NaiveDateTime,
    pub delivery_at: Option<NaiveDateTime>,
    pub truck_plate: Option<String>,
    pub driver_id: Option<String>,
    pub driver_name: Option<String>,
    pub waste_stream_number: Option<String>,
    pub container_id: Option<String>,
    pub note: Option<String>,
    pub sequence_no: i32,
    pub status: TransportStatus,
}

impl PlanningTransport {
    pub fn from_transport(transport: &Transport, driver_name: Option<String>) -> Self {
        Self {
            transport_id: transport.transport_id.clone(),
            display_number: transport.display_number.clone(),
            transport_type: transport.transport_type,
            pickup_location: transport.pickup_location.clone(),
            delivery_location: transport.delivery_location.clone(),
            pickup_at: transport.pickup_at,
            delivery_at: transport.delivery_at,
            truck_plate: transport.truck_plate.clone(),
            driver_id: transport.driver_id.clone(),
            driver_name,
            waste_stream_number: transport.waste_stream_number.clone(),
            container_id: transport.container_id.clone(),
            note: transport.note.clone(),
            sequence_no: transport.sequence_no,
            status: transport.status(),
        }
    }
}
