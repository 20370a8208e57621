// ==========================================
// Recycling transport planning - planning engine
// ==========================================
// Pure logic, no SQL:
// - Monday..Sunday week window
// - truck / driver / status filters
// - truck x date grouping for the calendar
// - reorder application (dense 0-based sequence numbers)
// ==========================================

use crate::domain::fleet::Truck;
use crate::domain::planning::{PlanningTransport, PlanningView, TruckPlanning};
use crate::domain::transport::Transport;
use crate::domain::types::{normalize_plate, TransportStatus, DATE_FORMAT, UNASSIGNED_TRUCK};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use std::collections::{BTreeMap, HashMap, HashSet};
use thiserror::Error;
use tracing::instrument;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanningError {
    #[error("Unknown transport status: {0}")]
    InvalidStatus(String),

    #[error("Transport listed more than once: {0}")]
    DuplicateTransport(String),

    #[error("Transport not found: {0}")]
    MissingTransport(String),

    #[error("Transport is finished: {0}")]
    FinishedTransport(String),
}

// ==========================================
// WeekWindow
// ==========================================

/// The Monday..Sunday week containing a date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    pub monday: NaiveDate,
}

impl WeekWindow {
    pub fn containing(date: NaiveDate) -> Self {
        let offset = date.weekday().num_days_from_monday() as i64;
        Self {
            monday: date - Duration::days(offset),
        }
    }

    /// The seven days, Monday first
    pub fn days(&self) -> Vec<NaiveDate> {
        (0..7).map(|i| self.monday + Duration::days(i)).collect()
    }

    pub fn day_strings(&self) -> Vec<String> {
        self.days()
            .iter()
            .map(|d| d.format(DATE_FORMAT).to_string())
            .collect()
    }

    pub fn sunday(&self) -> NaiveDate {
        self.monday + Duration::days(6)
    }

    /// Inclusive start: Monday 00:00
    pub fn start_at(&self) -> NaiveDateTime {
        self.monday.and_hms_opt(0, 0, 0).unwrap_or_default()
    }

    /// Exclusive end: next Monday 00:00
    pub fn end_at(&self) -> NaiveDateTime {
        self.start_at() + Duration::days(7)
    }
}

// ==========================================
// Filters
// ==========================================

/// Truck selector; the sentinel plate addresses the unassigned bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TruckSelector {
    Plate(String),
    Unassigned,
}

impl TruckSelector {
    pub fn parse(raw: &str) -> Self {
        let plate = normalize_plate(raw);
        if plate == UNASSIGNED_TRUCK {
            TruckSelector::Unassigned
        } else {
            TruckSelector::Plate(plate)
        }
    }

    /// Value for Transport::truck_plate
    pub fn as_truck_plate(&self) -> Option<String> {
        match self {
            TruckSelector::Plate(p) => Some(p.clone()),
            TruckSelector::Unassigned => None,
        }
    }

    pub fn bucket_key(&self) -> &str {
        match self {
            TruckSelector::Plate(p) => p,
            TruckSelector::Unassigned => UNASSIGNED_TRUCK,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanningFilter {
    pub truck: Option<TruckSelector>,
    pub driver_id: Option<String>,
    pub statuses: Option<HashSet<TransportStatus>>,
}

impl PlanningFilter {
    /// Build from raw query values; blank values mean "no filter"
    ///
    /// `status` is a comma separated list, e.g. "PLANNED,FINISHED".
    pub fn parse(
        truck: Option<&str>,
        driver_id: Option<&str>,
        status: Option<&str>,
    ) -> Result<Self, PlanningError> {
        let truck = truck
            .filter(|t| !t.trim().is_empty())
            .map(TruckSelector::parse);
        let driver_id = driver_id
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        let statuses = match status {
            Some(raw) => {
                let mut set = HashSet::new();
                for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                    let parsed = part
                        .parse::<TransportStatus>()
                        .map_err(|_| PlanningError::InvalidStatus(part.to_string()))?;
                    set.insert(parsed);
                }
                if set.is_empty() {
                    None
                } else {
                    Some(set)
                }
            }
            None => None,
        };

        Ok(Self {
            truck,
            driver_id,
            statuses,
        })
    }

    pub fn matches(&self, transport: &Transport) -> bool {
        if let Some(truck) = &self.truck {
            let matches_truck = match truck {
                TruckSelector::Plate(p) => transport.truck_plate.as_deref() == Some(p.as_str()),
                TruckSelector::Unassigned => transport.truck_plate.is_none(),
            };
            if !matches_truck {
                return false;
            }
        }

        if let Some(driver_id) = &self.driver_id {
            if transport.driver_id.as_deref() != Some(driver_id.as_str()) {
                return false;
            }
        }

        if let Some(statuses) = &self.statuses {
            if !statuses.contains(&transport.status()) {
                return false;
            }
        }

        true
    }
}

// ==========================================
// PlanningAssembler
// ==========================================
pub struct PlanningAssembler {}

impl PlanningAssembler {
    pub fn new() -> Self {
        Self {}
    }

    /// Group a week of transports into the truck x date view
    ///
    /// # Arguments
    /// - `week`: the requested week
    /// - `transports`: transports with pickup inside the week (unfiltered)
    /// - `known_trucks`: the whole fleet
    /// - `driver_names`: driver_id -> display name
    /// - `filter`: truck / driver / status filter
    ///
    /// # Ordering
    /// Known trucks by plate, then plates unknown to the fleet, then the unassigned
    /// bucket. With a truck filter only the selected bucket is returned.
    #[instrument(skip_all, fields(week = %week.monday, count = transports.len()))]
    pub fn assemble(
        &self,
        week: &WeekWindow,
        transports: Vec<Transport>,
        known_trucks: &[Truck],
        driver_names: &HashMap<String, String>,
        filter: &PlanningFilter,
    ) -> PlanningView {
        let mut assigned: BTreeMap<String, TruckPlanning> = BTreeMap::new();
        let mut unassigned = TruckPlanning::empty(UNASSIGNED_TRUCK);

        for transport in transports.iter().filter(|t| filter.matches(t)) {
            let date_key = transport.pickup_date().format(DATE_FORMAT).to_string();
            let entry = PlanningTransport::from_transport(
                transport,
                transport
                    .driver_id
                    .as_ref()
                    .and_then(|id| driver_names.get(id).cloned()),
            );

            let bucket = match &transport.truck_plate {
                Some(plate) => assigned
                    .entry(plate.clone())
                    .or_insert_with(|| TruckPlanning::empty(plate)),
                None => &mut unassigned,
            };
            bucket.transports.entry(date_key).or_default().push(entry);
        }

        let mut groups = match &filter.truck {
            Some(TruckSelector::Plate(plate)) => {
                vec![assigned
                    .remove(plate)
                    .unwrap_or_else(|| TruckPlanning::empty(plate))]
            }
            Some(TruckSelector::Unassigned) => vec![unassigned],
            None => {
                let mut known: Vec<&Truck> = known_trucks.iter().collect();
                known.sort_by(|a, b| a.license_plate.cmp(&b.license_plate));

                let mut groups = Vec::with_capacity(known.len() + assigned.len() + 1);
                for truck in known {
                    if groups
                        .iter()
                        .any(|g: &TruckPlanning| g.truck == truck.license_plate)
                    {
                        continue;
                    }
                    groups.push(
                        assigned
                            .remove(&truck.license_plate)
                            .unwrap_or_else(|| TruckPlanning::empty(&truck.license_plate)),
                    );
                }
                // plates referenced by transports but missing from the fleet
                groups.extend(assigned.into_values());
                groups.push(unassigned);
                groups
            }
        };

        for group in &mut groups {
            for day in group.transports.values_mut() {
                day.sort_by(|a, b| {
                    a.sequence_no
                        .cmp(&b.sequence_no)
                        .then_with(|| a.pickup_at.cmp(&b.pickup_at))
                        .then_with(|| a.display_number.cmp(&b.display_number))
                });
            }
        }

        PlanningView {
            dates: week.day_strings(),
            transports: groups,
        }
    }

    /// Apply a manual reorder
    ///
    /// `ordered_ids` is the desired order. Each transport moves to `date` and to
    /// `target`, and gets sequence number = its index. The result keeps input order.
    pub fn apply_reorder(
        &self,
        ordered_ids: &[String],
        loaded: Vec<Transport>,
        date: NaiveDate,
        target: &TruckSelector,
        now: NaiveDateTime,
    ) -> Result<Vec<Transport>, PlanningError> {
        let mut seen = HashSet::with_capacity(ordered_ids.len());
        for id in ordered_ids {
            if !seen.insert(id.as_str()) {
                return Err(PlanningError::DuplicateTransport(id.clone()));
            }
        }

        let mut by_id: HashMap<String, Transport> = loaded
            .into_iter()
            .map(|t| (t.transport_id.clone(), t))
            .collect();

        let mut reordered = Vec::with_capacity(ordered_ids.len());
        for (idx, id) in ordered_ids.iter().enumerate() {
            let mut transport = by_id
                .remove(id)
                .ok_or_else(|| PlanningError::MissingTransport(id.clone()))?;

            if transport.is_finished() {
                return Err(PlanningError::FinishedTransport(id.clone()));
            }

            transport.move_to_date(date);
            transport.truck_plate = target.as_truck_plate();
            transport.sequence_no = idx as i32;
            transport.updated_at = now;
            reordered.push(transport);
        }

        Ok(reordered)
    }

    /// Renumber the transports a reorder did not list but whose bucket it touched
    ///
    /// # Arguments
    /// - `moved`: result of `apply_reorder`, already numbered 0..N-1 in the target
    /// - `bucket_members`: current content of the target bucket and of every
    ///   bucket the moved transports came from (may include the moved ones)
    /// - `date` / `target`: the target bucket
    ///
    /// # Returns
    /// (transport_id, new sequence_no) for every member whose number changes.
    /// Target bucket members follow the moved transports; source buckets are
    /// compacted from 0. Relative order is kept.
    pub fn resequence_buckets(
        &self,
        moved: &[Transport],
        bucket_members: Vec<Transport>,
        date: NaiveDate,
        target: &TruckSelector,
    ) -> Vec<(String, i32)> {
        let moved_ids: HashSet<&str> = moved.iter().map(|t| t.transport_id.as_str()).collect();
        let target_key = (target.as_truck_plate(), date);

        let mut buckets: BTreeMap<(Option<String>, NaiveDate), Vec<Transport>> = BTreeMap::new();
        let mut seen = HashSet::new();
        for transport in bucket_members {
            if moved_ids.contains(transport.transport_id.as_str())
                || !seen.insert(transport.transport_id.clone())
            {
                continue;
            }
            buckets
                .entry((transport.truck_plate.clone(), transport.pickup_date()))
                .or_default()
                .push(transport);
        }

        let mut changes = Vec::new();
        for (key, mut members) in buckets {
            members.sort_by(|a, b| {
                a.sequence_no
                    .cmp(&b.sequence_no)
                    .then_with(|| a.pickup_at.cmp(&b.pickup_at))
                    .then_with(|| a.display_number.cmp(&b.display_number))
            });

            let start = if key == target_key { moved.len() } else { 0 };
            for (idx, transport) in members.iter().enumerate() {
                let seq = (start + idx) as i32;
                if transport.sequence_no != seq {
                    changes.push((transport.transport_id.clone(), seq));
                }
            }
        }

        changes
    }
}

impl Default for PlanningAssembler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::TransportType;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn transport(id: &str, day: NaiveDate, truck: Option<&str>, seq: i32) -> Transport {
        let at = day.and_hms_opt(8, 0, 0).unwrap();
        Transport {
            transport_id: id.to_string(),
            display_number: format!("26-{:0>6}", id),
            transport_type: TransportType::Container,
            pickup_location: "A".to_string(),
            delivery_location: "B".to_string(),
            pickup_at: at,
            delivery_at: None,
            truck_plate: truck.map(str::to_string),
            driver_id: None,
            waste_stream_number: None,
            container_id: None,
            note: None,
            sequence_no: seq,
            finished_at: None,
            created_at: at,
            updated_at: at,
        }
    }

    fn truck(plate: &str) -> Truck {
        Truck {
            license_plate: plate.to_string(),
            brand: None,
            description: None,
            created_at: date(2026, 1, 1).and_hms_opt(0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_week_window_is_monday_to_sunday_for_every_weekday() {
        // 2026-01-12 is a Monday
        for offset in 0..7 {
            let d = date(2026, 1, 12) + Duration::days(offset);
            let week = WeekWindow::containing(d);
            let days = week.day_strings();
            assert_eq!(days.len(), 7);
            assert_eq!(days[0], "2026-01-12");
            assert_eq!(days[6], "2026-01-18");
        }
    }

    #[test]
    fn test_week_window_across_year_boundary() {
        // Thursday 2026-01-01 -> week of Monday 2025-12-29
        let week = WeekWindow::containing(date(2026, 1, 1));
        assert_eq!(week.monday, date(2025, 12, 29));
        assert_eq!(week.sunday(), date(2026, 1, 4));
        assert_eq!(week.end_at(), date(2026, 1, 5).and_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn test_filter_parse_status_list() {
        let filter = PlanningFilter::parse(None, None, Some("planned, FINISHED,")).unwrap();
        let statuses = filter.statuses.unwrap();
        assert_eq!(statuses.len(), 2);
        assert!(statuses.contains(&TransportStatus::Planned));
        assert!(statuses.contains(&TransportStatus::Finished));

        assert_eq!(
            PlanningFilter::parse(None, None, Some("PLANNED,LATE")),
            Err(PlanningError::InvalidStatus("LATE".to_string()))
        );

        let blank = PlanningFilter::parse(Some("  "), Some(""), Some(" , ")).unwrap();
        assert_eq!(blank, PlanningFilter::default());
    }

    #[test]
    fn test_assemble_every_known_truck_once_and_unassigned_last() {
        let week = WeekWindow::containing(date(2026, 1, 14));
        let transports = vec![
            transport("1", date(2026, 1, 12), Some("BB-02"), 0),
            transport("2", date(2026, 1, 13), None, 0),
            transport("3", date(2026, 1, 13), Some("ZZ-99"), 0),
        ];
        let trucks = vec![truck("BB-02"), truck("AA-01")];

        let view = PlanningAssembler::new().assemble(
            &week,
            transports,
            &trucks,
            &HashMap::new(),
            &PlanningFilter::default(),
        );

        let order: Vec<&str> = view.transports.iter().map(|g| g.truck.as_str()).collect();
        assert_eq!(order, vec!["AA-01", "BB-02", "ZZ-99", UNASSIGNED_TRUCK]);
        assert_eq!(view.truck("AA-01").unwrap().transport_count(), 0);
        assert_eq!(view.unassigned().unwrap().transport_count(), 1);
        assert_eq!(view.transport_count(), 3);
    }

    #[test]
    fn test_assemble_injects_requested_truck() {
        let week = WeekWindow::containing(date(2026, 1, 14));
        let filter = PlanningFilter::parse(Some("cc-03"), None, None).unwrap();

        let view = PlanningAssembler::new().assemble(
            &week,
            vec![transport("1", date(2026, 1, 12), Some("AA-01"), 0)],
            &[truck("AA-01")],
            &HashMap::new(),
            &filter,
        );

        assert_eq!(view.transports.len(), 1);
        assert_eq!(view.transports[0].truck, "CC-03");
        assert!(view.transports[0].transports.is_empty());
    }

    #[test]
    fn test_assemble_sorts_day_by_sequence() {
        let week = WeekWindow::containing(date(2026, 1, 14));
        let day = date(2026, 1, 14);
        let view = PlanningAssembler::new().assemble(
            &week,
            vec![
                transport("a", day, Some("AA-01"), 2),
                transport("b", day, Some("AA-01"), 0),
                transport("c", day, Some("AA-01"), 1),
            ],
            &[truck("AA-01")],
            &HashMap::new(),
            &PlanningFilter::default(),
        );

        let ids: Vec<&str> = view.truck("AA-01").unwrap().transports["2026-01-14"]
            .iter()
            .map(|t| t.transport_id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_apply_reorder_dense_sequence() {
        let day = date(2026, 1, 14);
        let loaded = vec![
            transport("1", date(2026, 1, 12), None, 5),
            transport("2", date(2026, 1, 13), Some("BB-02"), 3),
            transport("3", day, Some("AA-01"), 9),
        ];
        let order = vec!["3".to_string(), "1".to_string(), "2".to_string()];
        let now = day.and_hms_opt(12, 0, 0).unwrap();

        let result = PlanningAssembler::new()
            .apply_reorder(&order, loaded, day, &TruckSelector::parse("aa-01"), now)
            .unwrap();

        let seq: Vec<(&str, i32)> = result
            .iter()
            .map(|t| (t.transport_id.as_str(), t.sequence_no))
            .collect();
        assert_eq!(seq, vec![("3", 0), ("1", 1), ("2", 2)]);
        assert!(result.iter().all(|t| t.pickup_date() == day));
        assert!(result.iter().all(|t| t.truck_plate.as_deref() == Some("AA-01")));
        assert!(result.iter().all(|t| t.updated_at == now));
    }

    #[test]
    fn test_apply_reorder_to_unassigned_clears_truck() {
        let day = date(2026, 1, 14);
        let result = PlanningAssembler::new()
            .apply_reorder(
                &["1".to_string()],
                vec![transport("1", day, Some("AA-01"), 0)],
                day,
                &TruckSelector::parse(UNASSIGNED_TRUCK),
                day.and_hms_opt(9, 0, 0).unwrap(),
            )
            .unwrap();
        assert_eq!(result[0].truck_plate, None);
    }

    #[test]
    fn test_apply_reorder_errors() {
        let day = date(2026, 1, 14);
        let now = day.and_hms_opt(9, 0, 0).unwrap();
        let assembler = PlanningAssembler::new();
        let target = TruckSelector::parse("AA-01");

        let dup = assembler.apply_reorder(
            &["1".to_string(), "1".to_string()],
            vec![transport("1", day, None, 0)],
            day,
            &target,
            now,
        );
        assert_eq!(dup, Err(PlanningError::DuplicateTransport("1".to_string())));

        let missing = assembler.apply_reorder(&["x".to_string()], vec![], day, &target, now);
        assert_eq!(missing, Err(PlanningError::MissingTransport("x".to_string())));

        let mut finished = transport("1", day, None, 0);
        finished.finished_at = Some(now);
        let result = assembler.apply_reorder(&["1".to_string()], vec![finished], day, &target, now);
        assert_eq!(result, Err(PlanningError::FinishedTransport("1".to_string())));

        let empty = assembler.apply_reorder(&[], vec![], day, &target, now).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_resequence_buckets_shifts_target_and_compacts_source() {
        let day = date(2026, 1, 14);
        let prev = date(2026, 1, 13);
        let now = day.and_hms_opt(9, 0, 0).unwrap();
        let assembler = PlanningAssembler::new();
        let target = TruckSelector::parse("AA-01");

        // target bucket: a(0), b(1); source bucket on BB-02: x(0), c(1), y(2)
        let a = transport("a", day, Some("AA-01"), 0);
        let b = transport("b", day, Some("AA-01"), 1);
        let x = transport("x", prev, Some("BB-02"), 0);
        let c = transport("c", prev, Some("BB-02"), 1);
        let y = transport("y", prev, Some("BB-02"), 2);

        let moved = assembler
            .apply_reorder(&["c".to_string()], vec![c.clone()], day, &target, now)
            .unwrap();
        let changes = assembler.resequence_buckets(
            &moved,
            vec![a, b, x, c, y],
            day,
            &target,
        );

        let mut changes: Vec<(&str, i32)> =
            changes.iter().map(|(id, seq)| (id.as_str(), *seq)).collect();
        changes.sort();
        assert_eq!(changes, vec![("a", 1), ("b", 2), ("y", 1)]);
    }

    #[test]
    fn test_resequence_buckets_within_target_only() {
        let day = date(2026, 1, 14);
        let now = day.and_hms_opt(9, 0, 0).unwrap();
        let assembler = PlanningAssembler::new();
        let target = TruckSelector::parse("AA-01");

        let members = vec![
            transport("a", day, Some("AA-01"), 0),
            transport("b", day, Some("AA-01"), 1),
            transport("c", day, Some("AA-01"), 2),
        ];
        let moved = assembler
            .apply_reorder(
                &["c".to_string(), "a".to_string()],
                members.clone(),
                day,
                &target,
                now,
            )
            .unwrap();
        let changes = assembler.resequence_buckets(&moved, members, day, &target);

        assert_eq!(changes, vec![("b".to_string(), 2)]);
    }
}
