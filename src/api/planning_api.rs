// ==========================================
// Recycling transport planning - planning API
// ==========================================
// Weekly truck x date view and manual reordering
// ==========================================

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;
use tracing::instrument;

use crate::api::audit::AuditRecorder;
use crate::api::error::{ApiError, ApiResult};
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::planning::PlanningView;
use crate::domain::types::DATE_FORMAT;
use crate::engine::planning::{PlanningAssembler, PlanningFilter, TruckSelector, WeekWindow};
use crate::i18n::{t, t_with_args};
use crate::repository::fleet_repo::{DriverRepository, TruckRepository};
use crate::repository::transport_repo::TransportRepository;

// ==========================================
// PlanningApi
// ==========================================

/// Planning API
///
/// 1. assemble the weekly planning view (filters by truck, driver, status)
/// 2. reorder transports inside / across trucks and days
pub struct PlanningApi {
    transport_repo: Arc<TransportRepository>,
    truck_repo: Arc<TruckRepository>,
    driver_repo: Arc<DriverRepository>,
    audit: Arc<AuditRecorder>,
    assembler: PlanningAssembler,
}

impl PlanningApi {
    pub fn new(
        transport_repo: Arc<TransportRepository>,
        truck_repo: Arc<TruckRepository>,
        driver_repo: Arc<DriverRepository>,
        audit: Arc<AuditRecorder>,
    ) -> Self {
        Self {
            transport_repo,
            truck_repo,
            driver_repo,
            audit,
            assembler: PlanningAssembler::new(),
        }
    }

    /// Planning view for the week containing `date`
    ///
    /// # Arguments
    /// - `date`: any day of the week, `YYYY-MM-DD`
    /// - `truck`: license plate, or `NOT_ASSIGNED` for the unassigned bucket
    /// - `driver_id`: only transports of this driver
    /// - `status`: comma separated statuses, e.g. `"PLANNED,FINISHED"`
    ///
    /// # Returns
    /// - Ok(PlanningView) with 7 dates, Monday first
    /// - Err(InvalidInput) for a malformed date or unknown status
    pub fn get_planning_by_date(
        &self,
        date: &str,
        truck: Option<&str>,
        driver_id: Option<&str>,
        status: Option<&str>,
    ) -> ApiResult<PlanningView> {
        let date = parse_date(date)?;
        let filter = PlanningFilter::parse(truck, driver_id, status)?;
        self.get_planning_for_week(date, &filter)
    }

    /// Same as `get_planning_by_date` with parsed inputs
    #[instrument(skip(self, filter))]
    pub fn get_planning_for_week(
        &self,
        date: NaiveDate,
        filter: &PlanningFilter,
    ) -> ApiResult<PlanningView> {
        let week = WeekWindow::containing(date);

        let transports = self
            .transport_repo
            .find_by_pickup_range(week.start_at(), week.end_at())?;
        let trucks = self.truck_repo.list_all()?;
        let driver_names: HashMap<String, String> = self
            .driver_repo
            .list_all()?
            .into_iter()
            .map(|d| (d.driver_id.clone(), d.full_name()))
            .collect();

        Ok(self
            .assembler
            .assemble(&week, transports, &trucks, &driver_names, filter))
    }

    /// Reorder transports on one truck and day
    ///
    /// # Arguments
    /// - `date`: target day, `YYYY-MM-DD`
    /// - `license_plate`: target truck, `NOT_ASSIGNED` clears the truck
    /// - `transport_ids`: the new order; index becomes the sequence number
    /// - `actor`: operator name for the action log
    ///
    /// # Returns
    /// - Ok(PlanningView) of the target week after the write
    /// - Err(InvalidInput): malformed date, duplicate id
    /// - Err(NotFound): unknown transport id or truck
    /// - Err(BusinessRuleViolation): a listed transport is finished
    /// - Err(Conflict): a listed transport was finished while the reorder ran
    ///
    /// Unlisted transports in the target bucket move behind the listed ones;
    /// the buckets the listed transports left are compacted.
    #[instrument(skip(self, transport_ids), fields(count = transport_ids.len()))]
    pub fn reorder_transports(
        &self,
        date: &str,
        license_plate: &str,
        transport_ids: &[String],
        actor: &str,
    ) -> ApiResult<PlanningView> {
        let date = parse_date(date)?;

        if license_plate.trim().is_empty() {
            return Err(ApiError::InvalidInput(t("fleet.plate_required")));
        }
        let target = TruckSelector::parse(license_plate);
        if let TruckSelector::Plate(plate) = &target {
            if !self.truck_repo.exists(plate)? {
                return Err(ApiError::NotFound(format!("Truck(id={})", plate)));
            }
        }

        if transport_ids.is_empty() {
            tracing::debug!("reorder with empty list, nothing to write");
            return self.get_planning_for_week(date, &PlanningFilter::default());
        }

        let loaded = self.transport_repo.find_by_ids(transport_ids)?;

        // target bucket first, then every bucket a listed transport leaves
        let mut buckets: Vec<(Option<String>, NaiveDate)> = vec![(target.as_truck_plate(), date)];
        for transport in &loaded {
            let key = (transport.truck_plate.clone(), transport.pickup_date());
            if !buckets.contains(&key) {
                buckets.push(key);
            }
        }

        let now = chrono::Local::now().naive_local();
        let reordered = self
            .assembler
            .apply_reorder(transport_ids, loaded, date, &target, now)?;

        let mut bucket_members = Vec::new();
        for (truck_plate, day) in &buckets {
            bucket_members.extend(self.transport_repo.find_bucket(truck_plate.as_deref(), *day)?);
        }
        let resequenced =
            self.assembler
                .resequence_buckets(&reordered, bucket_members, date, &target);

        let written = self
            .transport_repo
            .write_reorder(&reordered, &resequenced)?;
        tracing::info!(
            "reordered {} transport(s) on {} / {}, {} neighbour(s) renumbered",
            written,
            target.bucket_key(),
            date,
            resequenced.len()
        );

        let mut log = ActionLog::new(ActionType::ReorderTransports, actor);
        log.truck_plate = target.as_truck_plate();
        log.date_range_start = Some(date);
        log.date_range_end = Some(date);
        log.payload_json = Some(json!({
            "truck": target.bucket_key(),
            "date": date.format(DATE_FORMAT).to_string(),
            "transport_ids": transport_ids,
        }));
        log.detail = Some(format!("reordered {} transport(s)", written));
        self.audit.record(log);

        self.get_planning_for_week(date, &PlanningFilter::default())
    }
}

/// Parse a `YYYY-MM-DD` request date
pub(crate) fn parse_date(value: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        ApiError::InvalidInput(t_with_args("planning.invalid_date", &[("value", value)]))
    })
}
