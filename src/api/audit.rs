// ==========================================
// Recycling transport planning - audit recorder
// ==========================================
// Writes ActionLog entries for mutating operations.
// Audit failures never fail the operation itself.
// ==========================================

use std::sync::Arc;

use crate::config::ConfigManager;
use crate::domain::action_log::ActionLog;
use crate::repository::action_log_repo::ActionLogRepository;

pub struct AuditRecorder {
    action_log_repo: Arc<ActionLogRepository>,
    config_manager: Arc<ConfigManager>,
}

impl AuditRecorder {
    pub fn new(action_log_repo: Arc<ActionLogRepository>, config_manager: Arc<ConfigManager>) -> Self {
        Self {
            action_log_repo,
            config_manager,
        }
    }

    /// Record an entry when `planning.audit_enabled` is on
    ///
    /// # Returns
    /// - Some(action_id) when written, None when disabled or failed
    pub fn record(&self, log: ActionLog) -> Option<String> {
        let enabled = match self.config_manager.audit_enabled() {
            Ok(enabled) => enabled,
            Err(e) => {
                tracing::warn!("audit switch unreadable, recording anyway: {}", e);
                true
            }
        };
        if !enabled {
            tracing::debug!("audit disabled, skipping {}", log.action_type);
            return None;
        }

        match self.action_log_repo.insert(&log) {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!("failed to write action log {}: {}", log.action_type, e);
                None
            }
        }
    }
}
