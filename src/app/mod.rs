// ==========================================
// Recycling transport planning - application layer
// ==========================================
// Wires repositories, engines and APIs for front ends
// ==========================================

pub mod state;

pub use state::{get_default_db_path, AppState, DB_PATH_ENV};
