/// ----- REPORT MODULE -----
/// Point-in-time copies of the building state. Displays, the console and
/// anything serializing the state read these; none of them hold on to the
/// building itself.

use std::fmt;

use serde::{Deserialize, Serialize};

use shared_resources::direction::Direction;
use shared_resources::request::Request;

use crate::building::SystemStatus;
use crate::elevator::{ElevatorUnit, Phase};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ElevatorReport {
    pub id: usize,
    pub current_floor: i32,
    pub direction: Direction,
    pub door_closed: bool,
    /// One entry per floor, `true` where the elevator still has to stop.
    pub stop_floors: Vec<bool>,
    pub door_timer: u32,
    pub wait_timer: u32,
    pub in_service: bool,
    pub accepting_requests: bool,
    pub phase: Phase,
}

impl ElevatorReport {
    pub fn new(elevator: &ElevatorUnit, num_floors: usize) -> Self {
        let mut stop_floors = vec![false; num_floors];
        for &floor in elevator.stop_floors().into_iter().flatten() {
            if let Some(stop) = usize::try_from(floor).ok().and_then(|f| stop_floors.get_mut(f)) {
                *stop = true;
            }
        }
        ElevatorReport {
            id: elevator.id(),
            current_floor: elevator.current_floor(),
            direction: elevator.direction(),
            door_closed: elevator.is_door_closed(),
            stop_floors: stop_floors,
            door_timer: elevator.door_timer(),
            wait_timer: elevator.wait_timer(),
            in_service: elevator.is_in_service(),
            accepting_requests: elevator.is_accepting_requests(),
            phase: elevator.phase(),
        }
    }

    pub fn stops(&self) -> impl Iterator<Item = usize> + '_ {
        self.stop_floors.iter().enumerate().filter(|(_, stop)| **stop).map(|(floor, _)| floor)
    }
}

/// `Out of Service[Floor 0]`, `Waiting[Floor 0, Time 5]`, or
/// `[1|^|O 3]< --  2 ... -->` with one column per floor.
impl fmt::Display for ElevatorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.phase {
            Phase::OutOfService => write!(f, "Out of Service[Floor {}]", self.current_floor),
            Phase::IdleWaiting => write!(f, "Waiting[Floor {}, Time {}]", self.current_floor, self.wait_timer),
            _ => {
                write!(f, "[{}|{}|", self.current_floor, self.direction.as_symbol())?;
                if self.door_closed {
                    write!(f, "C  ]<")?;
                } else {
                    write!(f, "O {}]<", self.door_timer)?;
                }
                for (floor, stop) in self.stop_floors.iter().enumerate() {
                    if *stop {
                        write!(f, " {:>2}", floor)?;
                    } else {
                        write!(f, " --")?;
                    }
                }
                write!(f, ">")
            },
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BuildingReport {
    pub num_floors: usize,
    pub num_elevators: usize,
    pub capacity: usize,
    pub elevator_reports: Vec<ElevatorReport>,
    pub up_requests: Vec<Request>,
    pub down_requests: Vec<Request>,
    pub system_status: SystemStatus,
}

impl fmt::Display for BuildingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Building Report:")?;
        writeln!(f, "Number of Floors: {}", self.num_floors)?;
        writeln!(f, "Number of Elevators: {}", self.num_elevators)?;
        writeln!(f, "Elevator Capacity: {}", self.capacity)?;
        writeln!(f, "Elevator Reports:")?;
        for report in &self.elevator_reports {
            writeln!(f, "{}", report)?;
        }
        writeln!(f, "Up Requests:")?;
        for request in &self.up_requests {
            writeln!(f, "{}", request)?;
        }
        writeln!(f, "Down Requests:")?;
        for request in &self.down_requests {
            writeln!(f, "{}", request)?;
        }
        writeln!(f, "System Status: {}", self.system_status)
    }
}
