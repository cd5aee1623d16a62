/// ----- ELEVATOR MODULE -----
/// The finite state machine of a single elevator. The building hands it
/// batches of requests while it waits at a terminal floor and advances it
/// one tick per step; everything else happens in `transition`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use shared_resources::direction::Direction;
use shared_resources::request::Request;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    OutOfService,
    IdleWaiting,
    EnRoute,
    DoorOpen,
    DrainingToBase,
}

impl Phase {
    pub fn as_string(&self) -> String {
        match self {
            Phase::OutOfService => String::from("outOfService"),
            Phase::IdleWaiting => String::from("waiting"),
            Phase::EnRoute => String::from("moving"),
            Phase::DoorOpen => String::from("doorOpen"),
            Phase::DrainingToBase => String::from("draining"),
        }
    }
}

/// Each state carries only what is meaningful in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitState {
    OutOfService,
    IdleWaiting {
        wait_timer: u32,
    },
    EnRoute {
        direction: Direction,
        stops: BTreeSet<i32>,
    },
    DoorOpen {
        direction: Direction,
        door_timer: u32,
        stops: BTreeSet<i32>,
    },
    /// `door_timer` is zero once the doors are closed.
    DrainingToBase {
        door_timer: u32,
    },
}

impl UnitState {
    pub fn phase(&self) -> Phase {
        match self {
            UnitState::OutOfService => Phase::OutOfService,
            UnitState::IdleWaiting { .. } => Phase::IdleWaiting,
            UnitState::EnRoute { .. } => Phase::EnRoute,
            UnitState::DoorOpen { .. } => Phase::DoorOpen,
            UnitState::DrainingToBase { .. } => Phase::DrainingToBase,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ElevatorUnit {
    id: usize,
    top_floor: i32,
    idle_ticks: u32,
    dwell_ticks: u32,
    floor: i32,
    state: UnitState,
}

impl ElevatorUnit {
    /// A new elevator is parked at floor 0, out of service.
    pub fn new(id: usize, top_floor: i32, idle_ticks: u32, dwell_ticks: u32) -> Self {
        ElevatorUnit {
            id: id,
            top_floor: top_floor,
            idle_ticks: idle_ticks,
            dwell_ticks: dwell_ticks,
            floor: 0,
            state: UnitState::OutOfService,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn current_floor(&self) -> i32 {
        self.floor
    }

    pub fn state(&self) -> &UnitState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn direction(&self) -> Direction {
        match &self.state {
            UnitState::OutOfService | UnitState::IdleWaiting { .. } => Direction::Idle,
            UnitState::EnRoute { direction, .. } | UnitState::DoorOpen { direction, .. } => *direction,
            UnitState::DrainingToBase { .. } => Direction::Down,
        }
    }

    pub fn is_door_closed(&self) -> bool {
        self.door_timer() == 0
    }

    pub fn door_timer(&self) -> u32 {
        match &self.state {
            UnitState::DoorOpen { door_timer, .. } | UnitState::DrainingToBase { door_timer } => *door_timer,
            _ => 0,
        }
    }

    pub fn wait_timer(&self) -> u32 {
        match &self.state {
            UnitState::IdleWaiting { wait_timer } => *wait_timer,
            _ => 0,
        }
    }

    /// Floors still to visit for the current batch. Empty while draining.
    pub fn stop_floors(&self) -> Option<&BTreeSet<i32>> {
        match &self.state {
            UnitState::EnRoute { stops, .. } | UnitState::DoorOpen { stops, .. } => Some(stops),
            _ => None,
        }
    }

    pub fn is_accepting_requests(&self) -> bool {
        matches!(self.state, UnitState::IdleWaiting { .. })
    }

    pub fn is_in_service(&self) -> bool {
        self.state != UnitState::OutOfService
    }

    pub fn is_out_of_service_requested(&self) -> bool {
        matches!(self.state, UnitState::DrainingToBase { .. })
    }

    /// At the ground floor with the doors closed.
    pub fn is_parked(&self) -> bool {
        self.floor == 0 && self.is_door_closed()
    }

    pub fn is_terminal_floor(&self, floor: i32) -> bool {
        floor == 0 || floor == self.top_floor
    }

    pub fn start(&mut self) {
        if self.state == UnitState::OutOfService {
            self.state = UnitState::IdleWaiting { wait_timer: self.idle_ticks };
            debug!(elevator = self.id, "started, waiting at floor {}", self.floor);
        }
    }

    /// Takes ownership of a batch and sets off towards it. Returns `false` if
    /// the elevator is not waiting for requests or the batch gives it nowhere
    /// to go. Pickups at the current floor are served on the spot.
    pub fn accept_batch(&mut self, batch: Vec<Request>) -> bool {
        if !self.is_accepting_requests() {
            return false;
        }
        let mut stops: BTreeSet<i32> = batch.iter().flat_map(Request::floors).collect();
        stops.remove(&self.floor);
        let Some(direction) = self.direction_towards(&stops) else {
            return false;
        };
        debug!(elevator = self.id, requests = batch.len(), ?stops, ?direction, "accepted batch");
        self.state = UnitState::EnRoute { direction, stops };
        true
    }

    /// Heads for the ground floor no matter what, keeping an open door open
    /// until its dwell is over.
    pub fn take_out_of_service(&mut self) {
        let door_timer = match &self.state {
            UnitState::OutOfService | UnitState::DrainingToBase { .. } => return,
            UnitState::DoorOpen { door_timer, .. } => *door_timer,
            UnitState::IdleWaiting { .. } | UnitState::EnRoute { .. } => 0,
        };
        debug!(elevator = self.id, floor = self.floor, "draining to base");
        self.state = UnitState::DrainingToBase { door_timer };
    }

    pub fn tick(&mut self) {
        let (floor, state) = self.transition();
        if state.phase() != self.state.phase() {
            debug!(elevator = self.id, floor, from = ?self.state.phase(), to = ?state.phase(), "transition");
        }
        self.floor = floor;
        self.state = state;
    }

    /// The floor and state one tick from now.
    fn transition(&self) -> (i32, UnitState) {
        let floor = self.floor;
        match &self.state {
            UnitState::OutOfService => (floor, UnitState::OutOfService),
            UnitState::IdleWaiting { wait_timer } => {
                let wait_timer = wait_timer.saturating_sub(1);
                if wait_timer > 0 {
                    return (floor, UnitState::IdleWaiting { wait_timer });
                }
                let direction = if floor == 0 { Direction::Up } else { Direction::Down };
                (floor, UnitState::EnRoute { direction, stops: BTreeSet::new() })
            },
            UnitState::EnRoute { direction, stops } => {
                let direction = self.within_shaft(*direction);
                let floor = floor + direction.delta();
                let mut stops = stops.clone();
                if stops.remove(&floor) {
                    let door_timer = self.dwell_ticks;
                    (floor, UnitState::DoorOpen { direction, door_timer, stops })
                } else if stops.is_empty() && self.is_terminal_floor(floor) {
                    (floor, UnitState::IdleWaiting { wait_timer: self.idle_ticks })
                } else {
                    let direction = next_direction(floor, direction, &stops).unwrap_or(direction);
                    (floor, UnitState::EnRoute { direction, stops })
                }
            },
            UnitState::DoorOpen { direction, door_timer, stops } => {
                let door_timer = door_timer.saturating_sub(1);
                if door_timer > 0 {
                    let (direction, stops) = (*direction, stops.clone());
                    return (floor, UnitState::DoorOpen { direction, door_timer, stops });
                }
                if let Some(next) = next_direction(floor, *direction, stops) {
                    (floor, UnitState::EnRoute { direction: next, stops: stops.clone() })
                } else if self.is_terminal_floor(floor) {
                    (floor, UnitState::IdleWaiting { wait_timer: self.idle_ticks })
                } else {
                    let direction = self.nearer_terminal(*direction);
                    (floor, UnitState::EnRoute { direction, stops: BTreeSet::new() })
                }
            },
            UnitState::DrainingToBase { door_timer } if *door_timer > 0 => {
                let door_timer = door_timer - 1;
                if door_timer == 0 && floor == 0 {
                    (floor, UnitState::OutOfService)
                } else {
                    (floor, UnitState::DrainingToBase { door_timer })
                }
            },
            UnitState::DrainingToBase { .. } => {
                let floor = (floor - 1).max(0);
                if floor == 0 {
                    (floor, UnitState::OutOfService)
                } else {
                    (floor, UnitState::DrainingToBase { door_timer: 0 })
                }
            },
        }
    }

    /// Direction of the nearest stop. Ties go up from the ground floor and
    /// down from the top floor.
    fn direction_towards(&self, stops: &BTreeSet<i32>) -> Option<Direction> {
        let above = stops.range(self.floor + 1..).next().map(|stop| stop - self.floor);
        let below = stops.range(..self.floor).next_back().map(|stop| self.floor - stop);
        match (above, below) {
            (Some(_), None) => Some(Direction::Up),
            (None, Some(_)) => Some(Direction::Down),
            (Some(up), Some(down)) if up < down => Some(Direction::Up),
            (Some(up), Some(down)) if down < up => Some(Direction::Down),
            (Some(_), Some(_)) if self.floor == self.top_floor => Some(Direction::Down),
            (Some(_), Some(_)) => Some(Direction::Up),
            (None, None) => None,
        }
    }

    fn nearer_terminal(&self, direction: Direction) -> Direction {
        let to_ground = self.floor;
        let to_top = self.top_floor - self.floor;
        if to_ground < to_top {
            Direction::Down
        } else if to_top < to_ground {
            Direction::Up
        } else if direction == Direction::Up {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    /// Turns around instead of leaving the shaft.
    fn within_shaft(&self, direction: Direction) -> Direction {
        match direction {
            Direction::Up if self.floor >= self.top_floor => Direction::Down,
            Direction::Down if self.floor <= 0 => Direction::Up,
            Direction::Idle if self.floor == 0 => Direction::Up,
            Direction::Idle => Direction::Down,
            _ => direction,
        }
    }
}

/// Keeps going while there are stops ahead, otherwise turns towards the rest.
fn next_direction(floor: i32, last_direction: Direction, stops: &BTreeSet<i32>) -> Option<Direction> {
    let further_requests_in_direction = |direction: Direction| match direction {
        Direction::Up => stops.range(floor + 1..).next().is_some(),
        Direction::Down => stops.range(..floor).next().is_some(),
        Direction::Idle => false,
    };
    let other_direction = last_direction.reversed();
    if further_requests_in_direction(last_direction) {
        Some(last_direction)
    } else if further_requests_in_direction(other_direction) {
        Some(other_direction)
    } else if further_requests_in_direction(Direction::Up) {
        Some(Direction::Up)
    } else if further_requests_in_direction(Direction::Down) {
        Some(Direction::Down)
    } else {
        None
    }
}
