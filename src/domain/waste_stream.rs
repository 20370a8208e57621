// ==========================================
// Recycling transport planning - waste streams
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Registered waste stream.
///
/// `number` is the 12-digit waste stream number: processor id (5 digits)
/// followed by a 7-digit counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteStream {
    pub number: String,
    pub name: String,
    pub processor_id: String,
    pub created_at: NaiveDateTime,
}
