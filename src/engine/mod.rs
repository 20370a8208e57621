// ==========================================
// Recycling transport planning - engine layer
// ==========================================
// Business rules only, no SQL.
// Repositories feed data in, APIs persist the results.
// ==========================================

pub mod numbering;
pub mod planning;

pub use numbering::{format_transport_number, format_waste_stream_number, NumberingError};
pub use planning::{PlanningAssembler, PlanningError, PlanningFilter, TruckSelector, WeekWindow};
