// ==========================================
// API integration test environment
// ==========================================
#![allow(dead_code)]

#[path = "../test_helpers.rs"]
mod test_helpers;

use std::error::Error;
use tempfile::NamedTempFile;

use recycling_planning::api::TransportRequest;
use recycling_planning::app::AppState;
use recycling_planning::domain::{Driver, Transport, Truck, WasteStream};

pub const TEST_ACTOR: &str = "tester";

/// Full application state over a temporary database
pub struct ApiTestEnv {
    pub db_path: String,
    pub state: AppState,

    // keeps the database file alive
    _temp_file: NamedTempFile,
}

impl ApiTestEnv {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        recycling_planning::logging::init_test();
        let (temp_file, db_path) = test_helpers::create_test_db()?;
        let state = AppState::new(db_path.clone())?;
        Ok(Self {
            db_path,
            state,
            _temp_file: temp_file,
        })
    }

    pub fn add_truck(&self, plate: &str) -> Truck {
        self.state
            .fleet_api
            .create_truck(plate, Some("DAF"), None)
            .expect("create truck")
    }

    pub fn add_driver(&self, first_name: &str, last_name: &str) -> Driver {
        self.state
            .fleet_api
            .create_driver(first_name, last_name, None)
            .expect("create driver")
    }

    pub fn add_waste_stream(&self, name: &str) -> WasteStream {
        self.state
            .waste_stream_api
            .create_waste_stream(name)
            .expect("create waste stream")
    }

    pub fn add_container_transport(&self, request: TransportRequest) -> Transport {
        self.state
            .transport_api
            .create_container_transport(request, TEST_ACTOR)
            .expect("create transport")
    }

    pub fn reload(&self, transport_id: &str) -> Transport {
        self.state
            .transport_api
            .get_transport(transport_id)
            .expect("reload transport")
    }
}
