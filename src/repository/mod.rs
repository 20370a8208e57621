// ==========================================
// Recycling transport planning - repository layer
// ==========================================
// Data access over SQLite, no business rules.
// All queries are parameterized.
// ==========================================

pub mod action_log_repo;
pub mod error;
pub mod fleet_repo;
pub(crate) mod row_mapping;
pub mod sequence_repo;
pub mod transport_repo;
pub mod waste_stream_repo;

pub use action_log_repo::ActionLogRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use fleet_repo::{DriverRepository, TruckRepository};
pub use sequence_repo::{sequence_names, SequenceRepository};
pub use transport_repo::TransportRepository;
pub use waste_stream_repo::WasteStreamRepository;
