// ==========================================
// Recycling transport planning - waste stream API
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::waste_stream::WasteStream;
use crate::engine::numbering::format_waste_stream_number;
use crate::i18n::t;
use crate::repository::sequence_repo::{sequence_names, SequenceRepository};
use crate::repository::waste_stream_repo::WasteStreamRepository;

pub struct WasteStreamApi {
    waste_stream_repo: Arc<WasteStreamRepository>,
    sequence_repo: Arc<SequenceRepository>,
    config_manager: Arc<ConfigManager>,
}

impl WasteStreamApi {
    pub fn new(
        waste_stream_repo: Arc<WasteStreamRepository>,
        sequence_repo: Arc<SequenceRepository>,
        config_manager: Arc<ConfigManager>,
    ) -> Self {
        Self {
            waste_stream_repo,
            sequence_repo,
            config_manager,
        }
    }

    /// Register a waste stream under the configured processor id
    ///
    /// # Returns
    /// - Ok(WasteStream) with a fresh 12 digit number
    /// - Err(ConfigurationError): processor id is not 5 digits
    /// - Err(BusinessRuleViolation): counter exhausted
    pub fn create_waste_stream(&self, name: &str) -> ApiResult<WasteStream> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::InvalidInput(t("waste_stream.name_required")));
        }

        // validated before the counter moves
        let processor_id = self.config_manager.processor_id()?;
        let counter = self
            .sequence_repo
            .next_value(sequence_names::WASTE_STREAM_NUMBER)?;
        let number = format_waste_stream_number(&processor_id, counter)?;

        let stream = WasteStream {
            number,
            name: name.to_string(),
            processor_id,
            created_at: chrono::Local::now().naive_local(),
        };
        self.waste_stream_repo.insert(&stream)?;
        tracing::info!("registered waste stream {} ({})", stream.number, stream.name);
        Ok(stream)
    }

    pub fn list_waste_streams(&self) -> ApiResult<Vec<WasteStream>> {
        Ok(self.waste_stream_repo.list_all()?)
    }

    pub fn get_waste_stream(&self, number: &str) -> ApiResult<WasteStream> {
        self.waste_stream_repo
            .find_by_number(number.trim())?
            .ok_or_else(|| ApiError::NotFound(format!("WasteStream(id={})", number)))
    }
}
