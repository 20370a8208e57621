// ==========================================
// Recycling transport planning - truck and driver repositories
// ==========================================

use crate::domain::fleet::{Driver, Truck};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_mapping::{format_datetime, parse_datetime_column};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// TruckRepository
// ==========================================
pub struct TruckRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TruckRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, truck: &Truck) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"INSERT INTO truck (license_plate, brand, description, created_at)
               VALUES (?1, ?2, ?3, ?4)"#,
            params![
                truck.license_plate,
                truck.brand,
                truck.description,
                format_datetime(&truck.created_at),
            ],
        )?;
        Ok(())
    }

    pub fn update(&self, truck: &Truck) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "UPDATE truck SET brand = ?2, description = ?3 WHERE license_plate = ?1",
            params![truck.license_plate, truck.brand, truck.description],
        )?;
        if rows == 0 {
            return Err(RepositoryError::not_found("Truck", &truck.license_plate));
        }
        Ok(())
    }

    pub fn find_by_plate(&self, license_plate: &str) -> RepositoryResult<Option<Truck>> {
        let conn = self.get_conn()?;
        let truck = conn
            .query_row(
                r#"SELECT license_plate, brand, description, created_at
                   FROM truck WHERE license_plate = ?1"#,
                params![license_plate],
                map_truck,
            )
            .optional()?;
        Ok(truck)
    }

    pub fn exists(&self, license_plate: &str) -> RepositoryResult<bool> {
        Ok(self.find_by_plate(license_plate)?.is_some())
    }

    /// All trucks, ordered by license plate
    pub fn list_all(&self) -> RepositoryResult<Vec<Truck>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT license_plate, brand, description, created_at
               FROM truck ORDER BY license_plate"#,
        )?;
        let trucks = stmt
            .query_map([], map_truck)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(trucks)
    }

    pub fn delete(&self, license_plate: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "DELETE FROM truck WHERE license_plate = ?1",
            params![license_plate],
        )?;
        Ok(rows)
    }
}

fn map_truck(row: &rusqlite::Row) -> rusqlite::Result<Truck> {
    Ok(Truck {
        license_plate: row.get(0)?,
        brand: row.get(1)?,
        description: row.get(2)?,
        created_at: parse_datetime_column(3, &row.get::<_, String>(3)?)?,
    })
}

// ==========================================
// DriverRepository
// ==========================================
pub struct DriverRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DriverRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, driver: &Driver) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"INSERT INTO driver (driver_id, first_name, last_name, email, active, created_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
            params![
                driver.driver_id,
                driver.first_name,
                driver.last_name,
                driver.email,
                if driver.active { 1 } else { 0 },
                format_datetime(&driver.created_at),
            ],
        )?;
        Ok(())
    }

    pub fn find_by_id(&self, driver_id: &str) -> RepositoryResult<Option<Driver>> {
        let conn = self.get_conn()?;
        let driver = conn
            .query_row(
                r#"SELECT driver_id, first_name, last_name, email, active, created_at
                   FROM driver WHERE driver_id = ?1"#,
                params![driver_id],
                map_driver,
            )
            .optional()?;
        Ok(driver)
    }

    /// All drivers, ordered by name
    pub fn list_all(&self) -> RepositoryResult<Vec<Driver>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT driver_id, first_name, last_name, email, active, created_at
               FROM driver ORDER BY last_name, first_name"#,
        )?;
        let drivers = stmt
            .query_map([], map_driver)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(drivers)
    }

    pub fn set_active(&self, driver_id: &str, active: bool) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "UPDATE driver SET active = ?2 WHERE driver_id = ?1",
            params![driver_id, if active { 1 } else { 0 }],
        )?;
        if rows == 0 {
            return Err(RepositoryError::not_found("Driver", driver_id));
        }
        Ok(())
    }
}

fn map_driver(row: &rusqlite::Row) -> rusqlite::Result<Driver> {
    Ok(Driver {
        driver_id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        active: row.get::<_, i32>(4)? == 1,
        created_at: parse_datetime_column(5, &row.get::<_, String>(5)?)?,
    })
}
