// ==========================================
// Recycling transport planning - domain layer
// ==========================================
// Entities, value types and view models.
// No data access, no engine logic.
// ==========================================

pub mod action_log;
pub mod fleet;
pub mod planning;
pub mod transport;
pub mod types;
pub mod waste_stream;

pub use action_log::{ActionLog, ActionType};
pub use fleet::{Driver, Truck};
pub use planning::{PlanningTransport, PlanningView, TruckPlanning};
pub use transport::Transport;
pub use types::{TransportStatus, TransportType, UNASSIGNED_TRUCK};
pub use waste_stream::WasteStream;
