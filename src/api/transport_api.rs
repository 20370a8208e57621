// ==========================================
// Recycling transport planning - transport API
// ==========================================
// Create / update / assign / finish / delete transports
// ==========================================

use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use crate::api::audit::AuditRecorder;
use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::TransportValidator;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::transport::Transport;
use crate::domain::types::{normalize_plate, TransportType, UNASSIGNED_TRUCK};
use crate::engine::numbering::format_transport_number;
use crate::i18n::t_with_args;
use crate::repository::sequence_repo::{sequence_names, SequenceRepository};
use crate::repository::transport_repo::TransportRepository;

// ==========================================
// Request DTO
// ==========================================

/// Create / update payload (identity, status and sequence are system managed)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransportRequest {
    pub pickup_location: String,
    pub delivery_location: String,
    pub pickup_at: NaiveDateTime,
    pub delivery_at: Option<NaiveDateTime>,
    pub truck_plate: Option<String>,
    pub driver_id: Option<String>,
    pub waste_stream_number: Option<String>,
    pub container_id: Option<String>,
    pub note: Option<String>,
}

impl TransportRequest {
    /// Trim text, drop blanks, normalize the plate (sentinel means no truck)
    pub fn normalized(mut self) -> Self {
        self.pickup_location = self.pickup_location.trim().to_string();
        self.delivery_location = self.delivery_location.trim().to_string();
        self.truck_plate = self
            .truck_plate
            .map(|p| normalize_plate(&p))
            .filter(|p| !p.is_empty() && p != UNASSIGNED_TRUCK);
        self.driver_id = non_blank(self.driver_id);
        self.waste_stream_number = non_blank(self.waste_stream_number);
        self.container_id = non_blank(self.container_id);
        self.note = non_blank(self.note);
        self
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ==========================================
// TransportApi
// ==========================================
pub struct TransportApi {
    transport_repo: Arc<TransportRepository>,
    sequence_repo: Arc<SequenceRepository>,
    validator: Arc<TransportValidator>,
    audit: Arc<AuditRecorder>,
}

impl TransportApi {
    pub fn new(
        transport_repo: Arc<TransportRepository>,
        sequence_repo: Arc<SequenceRepository>,
        validator: Arc<TransportValidator>,
        audit: Arc<AuditRecorder>,
    ) -> Self {
        Self {
            transport_repo,
            sequence_repo,
            validator,
            audit,
        }
    }

    pub fn create_container_transport(
        &self,
        request: TransportRequest,
        actor: &str,
    ) -> ApiResult<Transport> {
        self.create_transport(request, TransportType::Container, actor)
    }

    pub fn create_waste_transport(
        &self,
        request: TransportRequest,
        actor: &str,
    ) -> ApiResult<Transport> {
        self.create_transport(request, TransportType::Waste, actor)
    }

    /// Shared create path
    ///
    /// The transport goes to the end of its (truck, pickup day) bucket.
    #[instrument(skip(self, request))]
    pub fn create_transport(
        &self,
        request: TransportRequest,
        transport_type: TransportType,
        actor: &str,
    ) -> ApiResult<Transport> {
        let request = request.normalized();
        self.validator
            .validate_request(&request, transport_type, None)?;

        let counter = self
            .sequence_repo
            .next_value(sequence_names::TRANSPORT_NUMBER)?;
        let display_number = format_transport_number(request.pickup_at.year(), counter)?;
        let sequence_no = self
            .transport_repo
            .next_sequence_no(request.truck_plate.as_deref(), request.pickup_at.date())?;

        let now = chrono::Local::now().naive_local();
        let transport = Transport {
            transport_id: uuid::Uuid::new_v4().to_string(),
            display_number,
            transport_type,
            pickup_location: request.pickup_location,
            delivery_location: request.delivery_location,
            pickup_at: request.pickup_at,
            delivery_at: request.delivery_at,
            truck_plate: request.truck_plate,
            driver_id: request.driver_id,
            waste_stream_number: request.waste_stream_number,
            container_id: request.container_id,
            note: request.note,
            sequence_no,
            finished_at: None,
            created_at: now,
            updated_at: now,
        };

        self.transport_repo.insert(&transport)?;
        tracing::info!(
            "created {} transport {} ({})",
            transport.transport_type,
            transport.display_number,
            transport.transport_id
        );

        self.audit_transport(ActionType::CreateTransport, &transport, actor);
        Ok(transport)
    }

    /// Replace the editable fields of an unfinished transport
    ///
    /// The type is fixed at creation. A change of truck or day moves the
    /// transport to the end of the new bucket.
    #[instrument(skip(self, request))]
    pub fn update_transport(
        &self,
        transport_id: &str,
        request: TransportRequest,
        actor: &str,
    ) -> ApiResult<Transport> {
        let mut transport = self.load_open(transport_id)?;
        let request = request.normalized();
        self.validator
            .validate_request(
                &request,
                transport.transport_type,
                transport.driver_id.as_deref(),
            )?;

        let bucket_changed = transport.truck_plate != request.truck_plate
            || transport.pickup_date() != request.pickup_at.date();
        if bucket_changed {
            transport.sequence_no = self
                .transport_repo
                .next_sequence_no(request.truck_plate.as_deref(), request.pickup_at.date())?;
        }

        transport.pickup_location = request.pickup_location;
        transport.delivery_location = request.delivery_location;
        transport.pickup_at = request.pickup_at;
        transport.delivery_at = request.delivery_at;
        transport.truck_plate = request.truck_plate;
        transport.driver_id = request.driver_id;
        transport.waste_stream_number = request.waste_stream_number;
        transport.container_id = request.container_id;
        transport.note = request.note;
        transport.updated_at = chrono::Local::now().naive_local();

        self.transport_repo.update(&transport)?;
        tracing::info!("updated transport {}", transport.display_number);

        self.audit_transport(ActionType::UpdateTransport, &transport, actor);
        Ok(transport)
    }

    /// Set or clear truck and driver
    pub fn assign_transport(
        &self,
        transport_id: &str,
        truck_plate: Option<&str>,
        driver_id: Option<&str>,
        actor: &str,
    ) -> ApiResult<Transport> {
        let mut transport = self.load_open(transport_id)?;

        let truck_plate = truck_plate
            .map(normalize_plate)
            .filter(|p| !p.is_empty() && p != UNASSIGNED_TRUCK);
        let driver_id = non_blank(driver_id.map(str::to_string));

        if let Some(plate) = &truck_plate {
            self.validator.validate_truck_reference(plate)?;
        }
        if let Some(id) = &driver_id {
            if transport.driver_id.as_ref() != Some(id) {
                self.validator.validate_driver_reference(id)?;
            }
        }

        if transport.truck_plate != truck_plate {
            transport.sequence_no = self
                .transport_repo
                .next_sequence_no(truck_plate.as_deref(), transport.pickup_date())?;
        }
        transport.truck_plate = truck_plate;
        transport.driver_id = driver_id;
        transport.updated_at = chrono::Local::now().naive_local();

        self.transport_repo.update(&transport)?;
        tracing::info!(
            "assigned transport {} to truck={:?} driver={:?}",
            transport.display_number,
            transport.truck_plate,
            transport.driver_id
        );

        self.audit_transport(ActionType::AssignTransport, &transport, actor);
        Ok(transport)
    }

    /// Mark a transport finished (default: now)
    pub fn finish_transport(
        &self,
        transport_id: &str,
        finished_at: Option<NaiveDateTime>,
        actor: &str,
    ) -> ApiResult<Transport> {
        let mut transport = self.get_transport(transport_id)?;
        if transport.is_finished() {
            return Err(ApiError::BusinessRuleViolation(t_with_args(
                "transport.already_finished",
                &[("id", transport_id)],
            )));
        }

        let now = chrono::Local::now().naive_local();
        transport.finished_at = Some(finished_at.unwrap_or(now));
        transport.updated_at = now;

        self.transport_repo.update(&transport)?;
        tracing::info!("finished transport {}", transport.display_number);

        self.audit_transport(ActionType::FinishTransport, &transport, actor);
        Ok(transport)
    }

    pub fn get_transport(&self, transport_id: &str) -> ApiResult<Transport> {
        self.transport_repo
            .find_by_id(transport_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Transport(id={})", transport_id)))
    }

    /// Transports with pickup on any day in `from..=to`
    pub fn list_transports_between(&self, from: NaiveDate, to: NaiveDate) -> ApiResult<Vec<Transport>> {
        if to < from {
            return Err(ApiError::InvalidInput(format!(
                "date range end {} is before start {}",
                to, from
            )));
        }
        let start = from.and_hms_opt(0, 0, 0).unwrap_or_default();
        let end = to.and_hms_opt(0, 0, 0).unwrap_or_default() + Duration::days(1);
        Ok(self.transport_repo.find_by_pickup_range(start, end)?)
    }

    /// Delete an unfinished transport
    pub fn delete_transport(&self, transport_id: &str, actor: &str) -> ApiResult<()> {
        let transport = self.load_open(transport_id)?;
        self.transport_repo.delete(transport_id)?;
        tracing::info!("deleted transport {}", transport.display_number);

        self.audit_transport(ActionType::DeleteTransport, &transport, actor);
        Ok(())
    }

    // ===== helpers =====

    fn load_open(&self, transport_id: &str) -> ApiResult<Transport> {
        let transport = self.get_transport(transport_id)?;
        if transport.is_finished() {
            return Err(ApiError::BusinessRuleViolation(t_with_args(
                "transport.finished_immutable",
                &[("id", transport_id)],
            )));
        }
        Ok(transport)
    }

    fn audit_transport(&self, action_type: ActionType, transport: &Transport, actor: &str) {
        let mut log = ActionLog::new(action_type, actor);
        log.truck_plate = transport.truck_plate.clone();
        log.date_range_start = Some(transport.pickup_date());
        log.date_range_end = Some(transport.pickup_date());
        log.payload_json = Some(json!({
            "transport_id": transport.transport_id,
            "display_number": transport.display_number,
            "driver_id": transport.driver_id,
            "status": transport.status(),
        }));
        self.audit.record(log);
    }
}
