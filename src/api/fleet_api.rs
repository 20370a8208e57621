// ==========================================
// Recycling transport planning - fleet API
// ==========================================
// Trucks and drivers
// ==========================================

use std::sync::Arc;

use tracing::instrument;

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::TransportValidator;
use crate::domain::fleet::{Driver, Truck};
use crate::domain::types::normalize_plate;
use crate::i18n::{t, t_with_args};
use crate::repository::fleet_repo::{DriverRepository, TruckRepository};
use crate::repository::transport_repo::TransportRepository;

pub struct FleetApi {
    truck_repo: Arc<TruckRepository>,
    driver_repo: Arc<DriverRepository>,
    transport_repo: Arc<TransportRepository>,
}

impl FleetApi {
    pub fn new(
        truck_repo: Arc<TruckRepository>,
        driver_repo: Arc<DriverRepository>,
        transport_repo: Arc<TransportRepository>,
    ) -> Self {
        Self {
            truck_repo,
            driver_repo,
            transport_repo,
        }
    }

    // ==========================================
    // Trucks
    // ==========================================

    /// Register a truck
    ///
    /// # Returns
    /// - Err(InvalidInput): empty or reserved plate
    /// - Err(Conflict): plate already registered
    #[instrument(skip(self))]
    pub fn create_truck(
        &self,
        license_plate: &str,
        brand: Option<&str>,
        description: Option<&str>,
    ) -> ApiResult<Truck> {
        let license_plate = TransportValidator::validate_new_plate(license_plate)?;
        let truck = Truck {
            license_plate,
            brand: trimmed(brand),
            description: trimmed(description),
            created_at: chrono::Local::now().naive_local(),
        };

        self.truck_repo.insert(&truck)?;
        tracing::info!("registered truck {}", truck.license_plate);
        Ok(truck)
    }

    pub fn list_trucks(&self) -> ApiResult<Vec<Truck>> {
        Ok(self.truck_repo.list_all()?)
    }

    pub fn get_truck(&self, license_plate: &str) -> ApiResult<Truck> {
        let plate = normalize_plate(license_plate);
        self.truck_repo
            .find_by_plate(&plate)?
            .ok_or_else(|| ApiError::NotFound(format!("Truck(id={})", plate)))
    }

    pub fn update_truck(
        &self,
        license_plate: &str,
        brand: Option<&str>,
        description: Option<&str>,
    ) -> ApiResult<Truck> {
        let mut truck = self.get_truck(license_plate)?;
        truck.brand = trimmed(brand);
        truck.description = trimmed(description);
        self.truck_repo.update(&truck)?;
        Ok(truck)
    }

    /// Remove a truck
    ///
    /// Refused while unfinished transports reference it. Finished transports
    /// keep their reference, so the foreign key refuses those as well.
    pub fn delete_truck(&self, license_plate: &str) -> ApiResult<()> {
        let truck = self.get_truck(license_plate)?;

        let open = self
            .transport_repo
            .count_open_by_truck(&truck.license_plate)?;
        if open > 0 {
            return Err(ApiError::BusinessRuleViolation(t_with_args(
                "fleet.truck_in_use",
                &[("plate", &truck.license_plate), ("count", &open.to_string())],
            )));
        }

        self.truck_repo.delete(&truck.license_plate)?;
        tracing::info!("deleted truck {}", truck.license_plate);
        Ok(())
    }

    // ==========================================
    // Drivers
    // ==========================================

    pub fn create_driver(
        &self,
        first_name: &str,
        last_name: &str,
        email: Option<&str>,
    ) -> ApiResult<Driver> {
        if first_name.trim().is_empty() || last_name.trim().is_empty() {
            return Err(ApiError::InvalidInput(t("fleet.driver_name_required")));
        }

        let driver = Driver {
            driver_id: uuid::Uuid::new_v4().to_string(),
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            email: trimmed(email),
            active: true,
            created_at: chrono::Local::now().naive_local(),
        };

        self.driver_repo.insert(&driver)?;
        tracing::info!("registered driver {} ({})", driver.full_name(), driver.driver_id);
        Ok(driver)
    }

    pub fn list_drivers(&self) -> ApiResult<Vec<Driver>> {
        Ok(self.driver_repo.list_all()?)
    }

    pub fn get_driver(&self, driver_id: &str) -> ApiResult<Driver> {
        self.driver_repo
            .find_by_id(driver_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Driver(id={})", driver_id)))
    }

    /// Inactive drivers stay on existing transports but cannot be assigned again
    pub fn deactivate_driver(&self, driver_id: &str) -> ApiResult<Driver> {
        self.driver_repo.set_active(driver_id, false)?;
        tracing::info!("deactivated driver {}", driver_id);
        self.get_driver(driver_id)
    }
}

fn trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
