// ==========================================
// TransportApi / FleetApi / WasteStreamApi integration tests
// ==========================================

mod helpers;

use helpers::api_test_helper::{ApiTestEnv, TEST_ACTOR};
use helpers::test_data_builder::{date, datetime, TransportRequestBuilder};
use recycling_planning::api::ApiError;
use recycling_planning::config::config_keys;
use recycling_planning::domain::{TransportStatus, TransportType, UNASSIGNED_TRUCK};

// ==========================================
// Create
// ==========================================

#[test]
fn test_create_assigns_display_number_and_sequence() {
    let env = ApiTestEnv::new().expect("test env");
    env.add_truck("AA-11-AA");
    let day = date(2026, 3, 3);

    let first = env.add_container_transport(TransportRequestBuilder::new(day).truck("aa-11-aa").build());
    let second = env.add_container_transport(
        TransportRequestBuilder::new(day).at(6, 0).truck("AA-11-AA").build(),
    );
    let other_bucket = env.add_container_transport(TransportRequestBuilder::new(day).build());

    assert_eq!(first.display_number, "26-000001");
    assert_eq!(second.display_number, "26-000002");
    assert_eq!(other_bucket.display_number, "26-000003");

    assert_eq!(first.truck_plate.as_deref(), Some("AA-11-AA"));
    assert_eq!(first.transport_type, TransportType::Container);
    assert_eq!(first.status(), TransportStatus::Unplanned);

    // appended, even with an earlier pickup time
    assert_eq!(first.sequence_no, 0);
    assert_eq!(second.sequence_no, 1);
    assert_eq!(other_bucket.sequence_no, 0);
}

#[test]
fn test_display_number_uses_pickup_year() {
    let env = ApiTestEnv::new().expect("test env");
    let t = env.add_container_transport(TransportRequestBuilder::new(date(2027, 1, 4)).build());
    assert_eq!(t.display_number, "27-000001");
}

#[test]
fn test_sentinel_plate_means_unassigned() {
    let env = ApiTestEnv::new().expect("test env");
    let t = env.add_container_transport(
        TransportRequestBuilder::new(date(2026, 3, 3))
            .truck(UNASSIGNED_TRUCK)
            .build(),
    );
    assert_eq!(t.truck_plate, None);
}

#[test]
fn test_create_rejects_invalid_requests() {
    let env = ApiTestEnv::new().expect("test env");
    let api = &env.state.transport_api;
    let day = date(2026, 3, 3);

    let blank = TransportRequestBuilder::new(day).locations(" ", "LOC-B").build();
    assert!(matches!(
        api.create_container_transport(blank, TEST_ACTOR),
        Err(ApiError::ValidationError { .. })
    ));

    let unknown_truck = TransportRequestBuilder::new(day).truck("ZZ-99-ZZ").build();
    assert!(matches!(
        api.create_container_transport(unknown_truck, TEST_ACTOR),
        Err(ApiError::NotFound(_))
    ));

    // failed creates do not consume numbers
    let ok = env.add_container_transport(TransportRequestBuilder::new(day).build());
    assert_eq!(ok.display_number, "26-000001");
}

#[test]
fn test_waste_transport_requires_known_stream() {
    let env = ApiTestEnv::new().expect("test env");
    let api = &env.state.transport_api;
    let day = date(2026, 3, 3);

    let missing = api.create_waste_transport(TransportRequestBuilder::new(day).build(), TEST_ACTOR);
    match missing {
        Err(ApiError::ValidationError { violations, .. }) => {
            assert_eq!(violations.len(), 1);
            assert_eq!(violations[0].field, "waste_stream_number");
        }
        other => panic!("Expected ValidationError, got {:?}", other),
    }

    let unknown = api.create_waste_transport(
        TransportRequestBuilder::new(day).waste_stream("000000000001").build(),
        TEST_ACTOR,
    );
    assert!(matches!(unknown, Err(ApiError::NotFound(_))));

    let stream = env.add_waste_stream("Mixed construction waste");
    let t = api
        .create_waste_transport(
            TransportRequestBuilder::new(day).waste_stream(&stream.number).build(),
            TEST_ACTOR,
        )
        .unwrap();
    assert_eq!(t.transport_type, TransportType::Waste);
    assert_eq!(t.waste_stream_number.as_deref(), Some(stream.number.as_str()));
}

// ==========================================
// Assign / finish / update / delete
// ==========================================

#[test]
fn test_assign_makes_transport_planned() {
    let env = ApiTestEnv::new().expect("test env");
    env.add_truck("AA-11-AA");
    let driver = env.add_driver("Piet", "Bakker");
    let t = env.add_container_transport(TransportRequestBuilder::new(date(2026, 3, 3)).build());

    let assigned = env
        .state
        .transport_api
        .assign_transport(&t.transport_id, Some("AA-11-AA"), Some(&driver.driver_id), TEST_ACTOR)
        .unwrap();
    assert_eq!(assigned.status(), TransportStatus::Planned);

    let cleared = env
        .state
        .transport_api
        .assign_transport(&t.transport_id, Some(UNASSIGNED_TRUCK), None, TEST_ACTOR)
        .unwrap();
    assert_eq!(cleared.truck_plate, None);
    assert_eq!(cleared.driver_id, None);
    assert_eq!(cleared.status(), TransportStatus::Unplanned);
}

#[test]
fn test_inactive_driver_cannot_be_assigned() {
    let env = ApiTestEnv::new().expect("test env");
    let driver = env.add_driver("Piet", "Bakker");
    env.state
        .fleet_api
        .deactivate_driver(&driver.driver_id)
        .unwrap();
    let t = env.add_container_transport(TransportRequestBuilder::new(date(2026, 3, 3)).build());

    let result = env.state.transport_api.assign_transport(
        &t.transport_id,
        None,
        Some(&driver.driver_id),
        TEST_ACTOR,
    );
    assert!(matches!(result, Err(ApiError::BusinessRuleViolation(_))));
}

#[test]
fn test_update_keeps_deactivated_driver() {
    let env = ApiTestEnv::new().expect("test env");
    let piet = env.add_driver("Piet", "Bakker");
    let kees = env.add_driver("Kees", "Visser");
    let t = env.add_container_transport(
        TransportRequestBuilder::new(date(2026, 3, 3))
            .driver(&piet.driver_id)
            .build(),
    );
    for driver in [&piet, &kees] {
        env.state
            .fleet_api
            .deactivate_driver(&driver.driver_id)
            .unwrap();
    }
    let api = &env.state.transport_api;

    let updated = api
        .update_transport(
            &t.transport_id,
            TransportRequestBuilder::new(date(2026, 3, 3))
                .driver(&piet.driver_id)
                .note("call ahead")
                .build(),
            TEST_ACTOR,
        )
        .unwrap();
    assert_eq!(updated.driver_id.as_deref(), Some(piet.driver_id.as_str()));
    assert_eq!(updated.note.as_deref(), Some("call ahead"));

    let switched = api.update_transport(
        &t.transport_id,
        TransportRequestBuilder::new(date(2026, 3, 3))
            .driver(&kees.driver_id)
            .build(),
        TEST_ACTOR,
    );
    assert!(matches!(switched, Err(ApiError::BusinessRuleViolation(_))));

    let reassigned = api
        .assign_transport(&t.transport_id, None, Some(&piet.driver_id), TEST_ACTOR)
        .unwrap();
    assert_eq!(reassigned.driver_id.as_deref(), Some(piet.driver_id.as_str()));
}

#[test]
fn test_finished_transport_is_immutable() {
    let env = ApiTestEnv::new().expect("test env");
    let t = env.add_container_transport(TransportRequestBuilder::new(date(2026, 3, 3)).build());
    let api = &env.state.transport_api;

    let finished_at = datetime(2026, 3, 3, 11, 15);
    let finished = api
        .finish_transport(&t.transport_id, Some(finished_at), TEST_ACTOR)
        .unwrap();
    assert_eq!(finished.finished_at, Some(finished_at));
    assert_eq!(finished.status(), TransportStatus::Finished);

    assert!(matches!(
        api.finish_transport(&t.transport_id, None, TEST_ACTOR),
        Err(ApiError::BusinessRuleViolation(_))
    ));
    assert!(matches!(
        api.update_transport(
            &t.transport_id,
            TransportRequestBuilder::new(date(2026, 3, 4)).build(),
            TEST_ACTOR
        ),
        Err(ApiError::BusinessRuleViolation(_))
    ));
    assert!(matches!(
        api.delete_transport(&t.transport_id, TEST_ACTOR),
        Err(ApiError::BusinessRuleViolation(_))
    ));
    assert_eq!(env.reload(&t.transport_id).finished_at, Some(finished_at));
}

#[test]
fn test_update_moves_to_end_of_new_bucket() {
    let env = ApiTestEnv::new().expect("test env");
    env.add_truck("AA-11-AA");
    env.add_container_transport(
        TransportRequestBuilder::new(date(2026, 3, 4))
            .truck("AA-11-AA")
            .build(),
    );
    let t = env.add_container_transport(TransportRequestBuilder::new(date(2026, 3, 3)).build());

    let updated = env
        .state
        .transport_api
        .update_transport(
            &t.transport_id,
            TransportRequestBuilder::new(date(2026, 3, 4))
                .at(14, 0)
                .truck("AA-11-AA")
                .note("gate 4")
                .build(),
            TEST_ACTOR,
        )
        .unwrap();

    assert_eq!(updated.sequence_no, 1);
    assert_eq!(updated.display_number, t.display_number);
    assert_eq!(env.reload(&t.transport_id).note.as_deref(), Some("gate 4"));
}

#[test]
fn test_delete_and_list_between() {
    let env = ApiTestEnv::new().expect("test env");
    let api = &env.state.transport_api;
    let a = env.add_container_transport(TransportRequestBuilder::new(date(2026, 3, 2)).build());
    let b = env.add_container_transport(TransportRequestBuilder::new(date(2026, 3, 8)).at(23, 30).build());
    env.add_container_transport(TransportRequestBuilder::new(date(2026, 3, 9)).build());

    let listed = api
        .list_transports_between(date(2026, 3, 2), date(2026, 3, 8))
        .unwrap();
    assert_eq!(listed.len(), 2);

    api.delete_transport(&a.transport_id, TEST_ACTOR).unwrap();
    assert!(matches!(
        api.get_transport(&a.transport_id),
        Err(ApiError::NotFound(_))
    ));

    let listed = api
        .list_transports_between(date(2026, 3, 2), date(2026, 3, 8))
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].transport_id, b.transport_id);

    assert!(matches!(
        api.list_transports_between(date(2026, 3, 8), date(2026, 3, 2)),
        Err(ApiError::InvalidInput(_))
    ));
}

// ==========================================
// Fleet
// ==========================================

#[test]
fn test_truck_registration_rules() {
    let env = ApiTestEnv::new().expect("test env");
    let fleet = &env.state.fleet_api;

    let truck = env.add_truck(" aa-11-aa ");
    assert_eq!(truck.license_plate, "AA-11-AA");

    assert!(matches!(
        fleet.create_truck("AA-11-AA", None, None),
        Err(ApiError::Conflict(_))
    ));
    assert!(matches!(
        fleet.create_truck(UNASSIGNED_TRUCK, None, None),
        Err(ApiError::InvalidInput(_))
    ));
}

#[test]
fn test_delete_truck_refused_while_in_use() {
    let env = ApiTestEnv::new().expect("test env");
    env.add_truck("AA-11-AA");
    env.add_truck("BB-22-BB");
    let t = env.add_container_transport(
        TransportRequestBuilder::new(date(2026, 3, 3))
            .truck("AA-11-AA")
            .build(),
    );
    let fleet = &env.state.fleet_api;

    assert!(matches!(
        fleet.delete_truck("AA-11-AA"),
        Err(ApiError::BusinessRuleViolation(_))
    ));

    env.state
        .transport_api
        .delete_transport(&t.transport_id, TEST_ACTOR)
        .unwrap();
    fleet.delete_truck("aa-11-aa").unwrap();
    fleet.delete_truck("BB-22-BB").unwrap();

    assert!(fleet.list_trucks().unwrap().is_empty());
    assert!(matches!(
        fleet.delete_truck("AA-11-AA"),
        Err(ApiError::NotFound(_))
    ));
}

// ==========================================
// Waste streams
// ==========================================

#[test]
fn test_waste_stream_numbers() {
    let env = ApiTestEnv::new().expect("test env");
    env.state
        .config_manager
        .set(config_keys::PROCESSOR_ID, "08797")
        .unwrap();

    let first = env.add_waste_stream("Wood");
    let second = env.add_waste_stream("Glass");

    assert_eq!(first.number, "087970000001");
    assert_eq!(second.number, "087970000002");
    assert!(first.number < second.number);
    assert!(second
        .number
        .chars()
        .all(|c| c.is_ascii_digit()));

    let listed = env.state.waste_stream_api.list_waste_streams().unwrap();
    assert_eq!(listed.len(), 2);
}

#[test]
fn test_invalid_processor_id_is_configuration_error() {
    let env = ApiTestEnv::new().expect("test env");
    env.state
        .config_manager
        .set(config_keys::PROCESSOR_ID, "87A")
        .unwrap();

    let result = env.state.waste_stream_api.create_waste_stream("Wood");
    assert!(matches!(result, Err(ApiError::ConfigurationError(_))));

    assert!(matches!(
        env.state.waste_stream_api.create_waste_stream("  "),
        Err(ApiError::InvalidInput(_))
    ));
}
