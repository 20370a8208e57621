// ==========================================
// Recycling transport planning - audit log repository
// ==========================================
// action_log table; every planning write is recorded
// ==========================================

mod core;
mod queries;


pub use core::ActionLogRepository;
