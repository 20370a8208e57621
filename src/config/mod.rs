// ==========================================
// Recycling transport planning - configuration layer
// ==========================================
// Storage: config_kv table
// ==========================================

pub mod config_manager;

pub use config_manager::{config_defaults, config_keys, ConfigError, ConfigManager, ConfigResult};
