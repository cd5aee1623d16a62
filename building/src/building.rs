/// ----- BUILDING MODULE -----
/// The dispatcher. It owns the elevators and the two request queues, hands
/// batches to elevators waiting at a terminal floor and runs the system
/// lifecycle: off, running, draining, and off again.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use shared_resources::config::{BuildingConfig, DEFAULT_DWELL_TICKS, DEFAULT_IDLE_TICKS};
use shared_resources::direction::Direction;
use shared_resources::error::BuildingError;
use shared_resources::request::Request;

use crate::elevator::ElevatorUnit;
use crate::report::{BuildingReport, ElevatorReport};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemStatus {
    Off,
    Running,
    Draining,
}

impl fmt::Display for SystemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemStatus::Off => write!(f, "Out Of Service"),
            SystemStatus::Running => write!(f, "Running"),
            SystemStatus::Draining => write!(f, "Stopping"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Building {
    num_floors: usize,
    capacity: usize,
    elevators: Vec<ElevatorUnit>,
    up_requests: VecDeque<Request>,
    down_requests: VecDeque<Request>,
    status: SystemStatus,
}

impl Building {
    pub fn new(num_floors: usize, num_elevators: usize, capacity: usize) -> Result<Self, BuildingError> {
        Self::with_timing(num_floors, num_elevators, capacity, DEFAULT_IDLE_TICKS, DEFAULT_DWELL_TICKS)
    }

    pub fn from_config(config: &BuildingConfig) -> Result<Self, BuildingError> {
        Self::with_timing(
            config.num_floors,
            config.num_elevators,
            config.capacity,
            config.idle_ticks,
            config.dwell_ticks,
        )
    }

    pub fn with_timing(
        num_floors: usize,
        num_elevators: usize,
        capacity: usize,
        idle_ticks: u32,
        dwell_ticks: u32,
    ) -> Result<Self, BuildingError> {
        if num_floors < 2 {
            return Err(BuildingError::InvalidConstruction { reason: "the number of floors must be greater than 1" });
        }
        if num_elevators < 1 || capacity < 1 {
            return Err(BuildingError::InvalidConstruction {
                reason: "the number of elevators and elevator capacity must be greater than 0",
            });
        }
        if idle_ticks < 1 || dwell_ticks < 1 {
            return Err(BuildingError::InvalidConstruction { reason: "idle and door timings must be at least one tick" });
        }
        let top_floor = i32::try_from(num_floors - 1)
            .map_err(|_| BuildingError::InvalidConstruction { reason: "too many floors" })?;

        let elevators = (0..num_elevators)
            .map(|id| ElevatorUnit::new(id, top_floor, idle_ticks, dwell_ticks))
            .collect();

        Ok(Building {
            num_floors: num_floors,
            capacity: capacity,
            elevators: elevators,
            up_requests: VecDeque::new(),
            down_requests: VecDeque::new(),
            status: SystemStatus::Off,
        })
    }

    pub fn status(&self) -> SystemStatus {
        self.status
    }

    pub fn num_floors(&self) -> usize {
        self.num_floors
    }

    pub fn num_elevators(&self) -> usize {
        self.elevators.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn elevators(&self) -> &[ElevatorUnit] {
        &self.elevators
    }

    fn top_floor(&self) -> i32 {
        // Fits: checked on construction.
        (self.num_floors - 1) as i32
    }

    pub fn submit_request(&mut self, start_floor: i32, end_floor: i32) -> Result<bool, BuildingError> {
        self.add_request(Request::new(start_floor, end_floor))
    }

    /// Queues a request by direction. Equal start and end floors are not an
    /// error, the request is just not queued.
    pub fn add_request(&mut self, request: Request) -> Result<bool, BuildingError> {
        let top_floor = self.top_floor();
        for floor in request.floors() {
            if !(0..=top_floor).contains(&floor) {
                return Err(BuildingError::InvalidFloor { floor, top_floor });
            }
        }
        if request.start_floor == request.end_floor {
            return Ok(false);
        }
        if self.status != SystemStatus::Running {
            return Err(BuildingError::NotRunning);
        }
        match request.direction() {
            Direction::Up => self.up_requests.push_back(request),
            _ => self.down_requests.push_back(request),
        }
        debug!(%request, "queued request");
        Ok(true)
    }

    pub fn step(&mut self) {
        if self.status == SystemStatus::Off {
            return;
        }
        if self.status != SystemStatus::Draining {
            self.distribute_requests();
        }
        for elevator in &mut self.elevators {
            elevator.tick();
        }
        if self.status == SystemStatus::Draining && self.elevators.iter().all(ElevatorUnit::is_parked) {
            info!("all elevators parked, system is off");
            self.status = SystemStatus::Off;
        }
    }

    /// Earlier elevators in the bank get first claim on the queues.
    fn distribute_requests(&mut self) {
        if self.up_requests.is_empty() && self.down_requests.is_empty() {
            return;
        }
        let top_floor = self.top_floor();
        let capacity = self.capacity;
        for elevator in &mut self.elevators {
            if !elevator.is_accepting_requests() {
                continue;
            }
            let queue = match elevator.current_floor() {
                0 => &mut self.up_requests,
                floor if floor == top_floor => &mut self.down_requests,
                _ => continue,
            };
            let take = capacity.min(queue.len());
            let batch: Vec<Request> = queue.drain(..take).collect();
            if batch.is_empty() {
                continue;
            }
            debug!(elevator = elevator.id(), size = batch.len(), "assigning batch");
            elevator.accept_batch(batch);
        }
    }

    pub fn start_system(&mut self) -> Result<bool, BuildingError> {
        match self.status {
            SystemStatus::Running => Ok(false),
            SystemStatus::Draining => Err(BuildingError::AlreadyDraining),
            SystemStatus::Off => {
                for elevator in &mut self.elevators {
                    elevator.start();
                }
                self.status = SystemStatus::Running;
                info!(elevators = self.elevators.len(), "elevator system started");
                Ok(true)
            },
        }
    }

    /// Drops every queued request and sends all elevators to the ground
    /// floor. The system turns off once they have all parked.
    pub fn stop_system(&mut self) {
        if self.status != SystemStatus::Running {
            return;
        }
        for elevator in &mut self.elevators {
            elevator.take_out_of_service();
        }
        let dropped = self.up_requests.len() + self.down_requests.len();
        self.up_requests.clear();
        self.down_requests.clear();
        self.status = SystemStatus::Draining;
        info!(dropped, "elevator system stopping");
    }

    pub fn snapshot(&self) -> BuildingReport {
        BuildingReport {
            num_floors: self.num_floors,
            num_elevators: self.elevators.len(),
            capacity: self.capacity,
            elevator_reports: self
                .elevators
                .iter()
                .map(|elevator| ElevatorReport::new(elevator, self.num_floors))
                .collect(),
            up_requests: self.up_requests.iter().copied().collect(),
            down_requests: self.down_requests.iter().copied().collect(),
            system_status: self.status,
        }
    }
}
