// ==========================================
// Recycling transport planning - audit log model
// ==========================================
// Every mutating planning operation writes one entry
// Aligned with the `action_log` table
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLog {
    pub action_id: String,
    pub action_type: String, // ActionType, stored as text
    pub action_ts: NaiveDateTime,
    pub actor: String,

    pub payload_json: Option<JsonValue>,

    pub truck_plate: Option<String>,
    pub date_range_start: Option<NaiveDate>,
    pub date_range_end: Option<NaiveDate>,
    pub detail: Option<String>,
}

impl ActionLog {
    /// New entry stamped with the local clock and a fresh id
    pub fn new(action_type: ActionType, actor: &str) -> Self {
        let actor = if actor.trim().is_empty() { "system" } else { actor.trim() };
        Self {
            action_id: uuid::Uuid::new_v4().to_string(),
            action_type: action_type.to_string(),
            action_ts: chrono::Local::now().naive_local(),
            actor: actor.to_string(),
            payload_json: None,
            truck_plate: None,
            date_range_start: None,
            date_range_end: None,
            detail: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    CreateTransport,
    UpdateTransport,
    AssignTransport,
    FinishTransport,
    DeleteTransport,
    ReorderTransports,
    ImportTransports,
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionType::CreateTransport => "CREATE_TRANSPORT",
            ActionType::UpdateTransport => "UPDATE_TRANSPORT",
            ActionType::AssignTransport => "ASSIGN_TRANSPORT",
            ActionType::FinishTransport => "FINISH_TRANSPORT",
            ActionType::DeleteTransport => "DELETE_TRANSPORT",
            ActionType::ReorderTransports => "REORDER_TRANSPORTS",
            ActionType::ImportTransports => "IMPORT_TRANSPORTS",
        };
        f.write_str(s)
    }
}
