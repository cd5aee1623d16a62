use building::{Building, BuildingReport, Phase, SystemStatus};
use shared_resources::direction::Direction;
use shared_resources::error::BuildingError;
use shared_resources::request::Request;

/// Routes `RUST_LOG` filtered logs to the test output for the current thread.
fn init_tracing() -> impl Sized {
    use tracing::Dispatch;
    use tracing_subscriber::{fmt, EnvFilter};

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("building=debug")))
        .with_test_writer()
        .finish();
    tracing::dispatcher::set_default(&Dispatch::new(subscriber))
}

fn running(num_floors: usize, num_elevators: usize, capacity: usize) -> Building {
    let mut building = Building::new(num_floors, num_elevators, capacity).unwrap();
    assert!(building.start_system().unwrap());
    building
}

fn steps(building: &mut Building, n: usize) {
    for _ in 0..n {
        building.step();
    }
}

fn lines(report: &BuildingReport) -> Vec<String> {
    report.elevator_reports.iter().map(|r| r.to_string()).collect()
}

fn stops(report: &BuildingReport, elevator: usize) -> Vec<usize> {
    report.elevator_reports[elevator].stops().collect()
}

#[test]
fn construction_rejects_degenerate_buildings() {
    for (floors, elevators, capacity) in [(1, 5, 5), (0, 5, 5), (10, 0, 5), (10, 5, 0)] {
        let result = Building::new(floors, elevators, capacity);
        assert!(
            matches!(result, Err(BuildingError::InvalidConstruction { .. })),
            "{floors} floors, {elevators} elevators, capacity {capacity}"
        );
    }
    assert!(matches!(Building::with_timing(10, 1, 1, 0, 3), Err(BuildingError::InvalidConstruction { .. })));
}

#[test]
fn fresh_building_is_off_and_parked() {
    let building = Building::new(10, 5, 5).unwrap();
    assert_eq!(building.status(), SystemStatus::Off);
    assert_eq!(building.num_elevators(), 5);
    assert_eq!(building.capacity(), 5);
    for elevator in building.elevators() {
        assert_eq!(elevator.current_floor(), 0);
        assert!(elevator.is_door_closed());
        assert!(!elevator.is_accepting_requests());
        assert_eq!(elevator.direction(), Direction::Idle);
    }
    assert_eq!(lines(&building.snapshot()), vec!["Out of Service[Floor 0]"; 5]);
}

#[test]
fn stepping_while_off_changes_nothing() {
    let mut building = Building::new(10, 3, 3).unwrap();
    let before = building.snapshot();
    steps(&mut building, 3);
    assert_eq!(building.snapshot(), before);
}

#[test]
fn start_puts_every_elevator_in_waiting() {
    let mut building = Building::new(10, 5, 5).unwrap();
    assert!(building.start_system().unwrap());
    assert_eq!(building.status(), SystemStatus::Running);
    let report = building.snapshot();
    assert_eq!(lines(&report), vec!["Waiting[Floor 0, Time 5]"; 5]);
    assert!(report.elevator_reports.iter().all(|r| r.accepting_requests && r.in_service));

    assert!(!building.start_system().unwrap());
    assert_eq!(building.status(), SystemStatus::Running);
}

#[test]
fn start_while_stopping_fails() {
    let mut building = running(10, 5, 5);
    building.stop_system();
    assert_eq!(building.start_system(), Err(BuildingError::AlreadyDraining));
    assert_eq!(building.status(), SystemStatus::Draining);
}

#[test]
fn requests_are_validated() {
    let mut building = Building::new(10, 5, 5).unwrap();
    assert_eq!(building.submit_request(5, 2), Err(BuildingError::NotRunning));
    assert_eq!(building.submit_request(5, 5), Ok(false));

    building.start_system().unwrap();
    assert_eq!(building.submit_request(-1, 5), Err(BuildingError::InvalidFloor { floor: -1, top_floor: 9 }));
    assert_eq!(building.submit_request(5, -1), Err(BuildingError::InvalidFloor { floor: -1, top_floor: 9 }));
    assert_eq!(building.submit_request(5, 20), Err(BuildingError::InvalidFloor { floor: 20, top_floor: 9 }));
    assert_eq!(building.submit_request(100, 2), Err(BuildingError::InvalidFloor { floor: 100, top_floor: 9 }));

    assert_eq!(building.submit_request(5, 5), Ok(false));
    let report = building.snapshot();
    assert!(report.up_requests.is_empty());
    assert!(report.down_requests.is_empty());

    building.stop_system();
    assert_eq!(building.add_request(Request::new(5, 2)), Err(BuildingError::NotRunning));
}

#[test]
fn requests_are_queued_by_direction() {
    let mut building = running(10, 5, 5);
    assert_eq!(building.submit_request(5, 2), Ok(true));
    assert_eq!(building.submit_request(0, 8), Ok(true));
    assert_eq!(building.submit_request(3, 4), Ok(true));
    let report = building.snapshot();
    assert_eq!(report.up_requests, vec![Request::new(0, 8), Request::new(3, 4)]);
    assert_eq!(report.down_requests, vec![Request::new(5, 2)]);
}

#[test]
fn idle_elevators_patrol_between_terminals() {
    let mut building = running(10, 3, 3);

    building.step();
    assert_eq!(lines(&building.snapshot()), vec!["Waiting[Floor 0, Time 4]"; 3]);

    steps(&mut building, 4);
    let report = building.snapshot();
    assert_eq!(lines(&report), vec!["[0|^|C  ]< -- -- -- -- -- -- -- -- -- -->"; 3]);
    assert!(report.elevator_reports.iter().all(|r| r.wait_timer == 0 && r.phase == Phase::EnRoute));

    steps(&mut building, 5);
    assert_eq!(lines(&building.snapshot()), vec!["[5|^|C  ]< -- -- -- -- -- -- -- -- -- -->"; 3]);

    steps(&mut building, 4);
    assert_eq!(lines(&building.snapshot()), vec!["Waiting[Floor 9, Time 5]"; 3]);

    steps(&mut building, 5);
    assert_eq!(lines(&building.snapshot()), vec!["[9|v|C  ]< -- -- -- -- -- -- -- -- -- -->"; 3]);
}

#[test]
fn single_batch_leaves_with_its_stops() {
    let _guard = init_tracing();
    let mut building = running(10, 3, 3);
    building.submit_request(0, 5).unwrap();
    building.submit_request(2, 6).unwrap();
    building.submit_request(1, 8).unwrap();
    building.step();

    let report = building.snapshot();
    let first = &report.elevator_reports[0];
    assert_eq!(first.current_floor, 1);
    assert_eq!(first.direction, Direction::Up);
    assert_eq!(stops(&report, 0), vec![2, 5, 6, 8]);
    assert!(!first.door_closed);
    assert_eq!(
        lines(&report),
        vec![
            "[1|^|O 3]< -- --  2 -- --  5  6 --  8 -->",
            "Waiting[Floor 0, Time 4]",
            "Waiting[Floor 0, Time 4]",
        ]
    );
    assert!(report.up_requests.is_empty());
}

#[test]
fn batches_are_capped_and_spread_over_the_bank() {
    let mut building = running(10, 3, 3);
    for (start, end) in [(0, 5), (2, 6), (1, 8), (0, 9), (3, 7), (4, 8), (5, 9), (6, 7), (2, 9)] {
        building.submit_request(start, end).unwrap();
    }
    building.step();

    let report = building.snapshot();
    assert_eq!(
        lines(&report),
        vec![
            "[1|^|O 3]< -- --  2 -- --  5  6 --  8 -->",
            "[1|^|C  ]< -- -- --  3  4 -- --  7  8  9>",
            "[1|^|C  ]< -- --  2 -- --  5  6  7 --  9>",
        ]
    );
    assert!(report.up_requests.is_empty());
}

#[test]
fn excess_requests_wait_for_the_next_batch() {
    let mut building = running(10, 1, 2);
    for end in [3, 4, 5] {
        building.submit_request(0, end).unwrap();
    }
    building.step();
    let report = building.snapshot();
    assert_eq!(stops(&report, 0), vec![3, 4]);
    assert_eq!(report.up_requests, vec![Request::new(0, 5)]);
}

#[test]
fn down_requests_go_to_elevators_at_the_top() {
    let mut building = running(5, 2, 3);
    building.submit_request(3, 1).unwrap();
    // Five ticks of waiting, four floors up.
    steps(&mut building, 9);
    let report = building.snapshot();
    assert!(report.elevator_reports.iter().all(|r| r.current_floor == 4 && r.accepting_requests));
    assert_eq!(report.down_requests, vec![Request::new(3, 1)]);

    building.step();
    let report = building.snapshot();
    assert_eq!(report.elevator_reports[0].current_floor, 3);
    assert_eq!(report.elevator_reports[0].direction, Direction::Down);
    assert_eq!(stops(&report, 0), vec![1]);
    assert_eq!(report.elevator_reports[1].phase, Phase::IdleWaiting);
    assert!(report.down_requests.is_empty());
}

#[test]
fn door_cycle_then_back_to_waiting() {
    let mut building = running(4, 1, 1);
    building.submit_request(0, 3).unwrap();
    steps(&mut building, 3);
    let elevator = &building.snapshot().elevator_reports[0];
    assert_eq!(elevator.current_floor, 3);
    assert!(!elevator.door_closed);
    assert_eq!(elevator.door_timer, 3);

    for expected in [2, 1] {
        building.step();
        let elevator = &building.snapshot().elevator_reports[0];
        assert!(!elevator.door_closed);
        assert_eq!(elevator.door_timer, expected);
    }
    building.step();
    let elevator = &building.snapshot().elevator_reports[0];
    assert!(elevator.door_closed);
    assert_eq!(elevator.to_string(), "Waiting[Floor 3, Time 5]");
}

#[test]
fn stop_drops_queues_and_drains() {
    let mut building = running(10, 5, 5);
    building.submit_request(5, 2).unwrap();
    building.submit_request(0, 8).unwrap();
    steps(&mut building, 2);

    building.stop_system();
    assert_eq!(building.status(), SystemStatus::Draining);
    let report = building.snapshot();
    assert!(report.up_requests.is_empty());
    assert!(report.down_requests.is_empty());

    building.stop_system();
    assert_eq!(building.status(), SystemStatus::Draining);

    building.step();
    assert_eq!(building.status(), SystemStatus::Draining);
    building.step();
    assert_eq!(building.status(), SystemStatus::Off);
    for elevator in building.elevators() {
        assert_eq!(elevator.current_floor(), 0);
        assert_eq!(elevator.direction(), Direction::Idle);
        assert!(elevator.is_door_closed());
        assert!(!elevator.is_accepting_requests());
    }
}

#[test]
fn stop_mid_patrol_turns_elevators_around() {
    let mut building = running(10, 3, 3);
    steps(&mut building, 10);
    assert_eq!(lines(&building.snapshot()), vec!["[5|^|C  ]< -- -- -- -- -- -- -- -- -- -->"; 3]);

    building.stop_system();
    building.step();
    assert_eq!(lines(&building.snapshot()), vec!["[4|v|C  ]< -- -- -- -- -- -- -- -- -- -->"; 3]);

    steps(&mut building, 3);
    assert_eq!(building.status(), SystemStatus::Draining);
    building.step();
    assert_eq!(building.status(), SystemStatus::Off);
    assert_eq!(lines(&building.snapshot()), vec!["Out of Service[Floor 0]"; 3]);
}

#[test]
fn stop_with_open_doors_waits_for_the_dwell() {
    let mut building = running(10, 1, 1);
    building.submit_request(0, 1).unwrap();
    building.step();
    assert!(!building.snapshot().elevator_reports[0].door_closed);

    building.stop_system();
    let elevator = &building.snapshot().elevator_reports[0];
    assert_eq!(elevator.direction, Direction::Down);
    assert_eq!(elevator.phase, Phase::DrainingToBase);
    assert!(elevator.stops().next().is_none());

    steps(&mut building, 2);
    let elevator = &building.snapshot().elevator_reports[0];
    assert_eq!(elevator.current_floor, 1);
    assert!(!elevator.door_closed);

    building.step();
    let elevator = &building.snapshot().elevator_reports[0];
    assert_eq!(elevator.current_floor, 1);
    assert!(elevator.door_closed);
    assert_eq!(building.status(), SystemStatus::Draining);

    building.step();
    assert_eq!(building.status(), SystemStatus::Off);
    assert_eq!(building.snapshot().elevator_reports[0].phase, Phase::OutOfService);
}

#[test]
fn stopping_an_off_building_is_a_no_op() {
    let mut building = Building::new(10, 5, 5).unwrap();
    building.stop_system();
    assert_eq!(building.status(), SystemStatus::Off);
}

#[test]
fn restart_after_drain() {
    let mut building = running(6, 2, 2);
    building.stop_system();
    building.step();
    assert_eq!(building.status(), SystemStatus::Off);
    assert!(building.start_system().unwrap());
    assert_eq!(building.submit_request(0, 3), Ok(true));
}

#[test]
fn snapshot_is_detached_from_the_building() {
    let mut building = running(10, 2, 2);
    building.submit_request(0, 4).unwrap();
    let before = building.snapshot();
    building.step();
    assert_eq!(before.up_requests, vec![Request::new(0, 4)]);
    assert_eq!(before.elevator_reports[0].phase, Phase::IdleWaiting);
    assert_ne!(building.snapshot(), before);
}

#[test]
fn report_text_and_json() {
    let mut building = running(3, 1, 1);
    building.submit_request(2, 0).unwrap();
    let report = building.snapshot();
    assert_eq!(
        report.to_string(),
        "Building Report:\n\
         Number of Floors: 3\n\
         Number of Elevators: 1\n\
         Elevator Capacity: 1\n\
         Elevator Reports:\n\
         Waiting[Floor 0, Time 5]\n\
         Up Requests:\n\
         Down Requests:\n\
         2->0\n\
         System Status: Running\n"
    );

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["system_status"], "Running");
    assert_eq!(json["down_requests"][0]["start_floor"], 2);
    assert_eq!(json["elevator_reports"][0]["stop_floors"], serde_json::json!([false, false, false]));
}
