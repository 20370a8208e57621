// ==========================================
// Recycling transport planning - API layer
// ==========================================
// Use-case facades called by the CLI (or any other front end)
// ==========================================

pub mod audit;
pub mod error;
pub mod fleet_api;
pub mod planning_api;
pub mod transport_api;
pub mod validator;
pub mod waste_stream_api;

pub use audit::AuditRecorder;
pub use error::{ApiError, ApiResult, ValidationViolation};
pub use fleet_api::FleetApi;
pub use planning_api::PlanningApi;
pub use transport_api::{TransportApi, TransportRequest};
pub use validator::TransportValidator;
pub use waste_stream_api::WasteStreamApi;
