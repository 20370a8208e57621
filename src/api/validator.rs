// ==========================================
// Recycling transport planning - transport validator
// ==========================================
// Field rules are collected into one ValidationError;
// missing references fail fast with NotFound
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult, ValidationViolation};
use crate::api::transport_api::TransportRequest;
use crate::domain::types::{normalize_plate, TransportType, UNASSIGNED_TRUCK};
use crate::i18n::{t, t_with_args};
use crate::repository::fleet_repo::{DriverRepository, TruckRepository};
use crate::repository::waste_stream_repo::WasteStreamRepository;

// ==========================================
// TransportValidator
// ==========================================

/// Checks transport requests before anything is written
///
/// 1. required locations
/// 2. delivery not before pickup
/// 3. waste transports carry a waste stream
/// 4. referenced truck / driver / waste stream exist (a newly set driver must be active)
pub struct TransportValidator {
    truck_repo: Arc<TruckRepository>,
    driver_repo: Arc<DriverRepository>,
    waste_stream_repo: Arc<WasteStreamRepository>,
}

impl TransportValidator {
    pub fn new(
        truck_repo: Arc<TruckRepository>,
        driver_repo: Arc<DriverRepository>,
        waste_stream_repo: Arc<WasteStreamRepository>,
    ) -> Self {
        Self {
            truck_repo,
            driver_repo,
            waste_stream_repo,
        }
    }

    /// Validate a create / update request
    ///
    /// `current_driver` is the driver already on the transport; keeping it
    /// skips the active check so a deactivated driver does not block edits.
    ///
    /// # Returns
    /// - Ok(()): request is valid
    /// - Err(ApiError::ValidationError): one or more field rules failed
    /// - Err(ApiError::NotFound): a referenced record does not exist
    pub fn validate_request(
        &self,
        request: &TransportRequest,
        transport_type: TransportType,
        current_driver: Option<&str>,
    ) -> ApiResult<()> {
        let mut violations = Vec::new();

        if request.pickup_location.trim().is_empty() {
            violations.push(ValidationViolation::new(
                "pickup_location",
                t_with_args("transport.location_required", &[("field", "pickup_location")]),
            ));
        }
        if request.delivery_location.trim().is_empty() {
            violations.push(ValidationViolation::new(
                "delivery_location",
                t_with_args(
                    "transport.location_required",
                    &[("field", "delivery_location")],
                ),
            ));
        }
        if let Some(delivery_at) = request.delivery_at {
            if delivery_at < request.pickup_at {
                violations.push(ValidationViolation::new(
                    "delivery_at",
                    t("transport.delivery_before_pickup"),
                ));
            }
        }
        if transport_type == TransportType::Waste
            && request
                .waste_stream_number
                .as_deref()
                .map_or(true, |n| n.trim().is_empty())
        {
            violations.push(ValidationViolation::new(
                "waste_stream_number",
                t("transport.waste_stream_required"),
            ));
        }

        if !violations.is_empty() {
            return Err(ApiError::ValidationError {
                reason: format!("{} field(s) invalid", violations.len()),
                violations,
            });
        }

        if let Some(plate) = &request.truck_plate {
            self.validate_truck_reference(plate)?;
        }
        if let Some(driver_id) = request.driver_id.as_deref() {
            if Some(driver_id) != current_driver {
                self.validate_driver_reference(driver_id)?;
            }
        }
        if let Some(number) = &request.waste_stream_number {
            if self.waste_stream_repo.find_by_number(number.trim())?.is_none() {
                return Err(ApiError::NotFound(format!("WasteStream(id={})", number)));
            }
        }

        Ok(())
    }

    /// Truck must exist; the sentinel plate is not a truck
    pub fn validate_truck_reference(&self, plate: &str) -> ApiResult<()> {
        let plate = normalize_plate(plate);
        if plate == UNASSIGNED_TRUCK || !self.truck_repo.exists(&plate)? {
            return Err(ApiError::NotFound(format!("Truck(id={})", plate)));
        }
        Ok(())
    }

    /// Driver must exist and be active
    pub fn validate_driver_reference(&self, driver_id: &str) -> ApiResult<()> {
        match self.driver_repo.find_by_id(driver_id)? {
            None => Err(ApiError::NotFound(format!("Driver(id={})", driver_id))),
            Some(driver) if !driver.active => Err(ApiError::BusinessRuleViolation(t_with_args(
                "fleet.driver_inactive",
                &[("id", driver_id)],
            ))),
            Some(_) => Ok(()),
        }
    }

    /// Normalize a new license plate
    ///
    /// # Returns
    /// - the trimmed, upper-cased plate
    /// - Err(InvalidInput) when empty or equal to the unassigned sentinel
    pub fn validate_new_plate(plate: &str) -> ApiResult<String> {
        let plate = normalize_plate(plate);
        if plate.is_empty() {
            return Err(ApiError::InvalidInput(t("fleet.plate_required")));
        }
        if plate == UNASSIGNED_TRUCK {
            return Err(ApiError::InvalidInput(t_with_args(
                "fleet.plate_reserved",
                &[("plate", &plate)],
            )));
        }
        Ok(plate)
    }
}
