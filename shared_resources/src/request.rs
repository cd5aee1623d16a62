use std::fmt;

use super::direction::Direction;

/// A trip from one floor to another. Floors are validated by the building
/// that queues the request, not here.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    pub start_floor: i32,
    pub end_floor: i32,
}

impl Request {
    pub fn new(start_floor: i32, end_floor: i32) -> Self {
        Request {
            start_floor: start_floor,
            end_floor: end_floor,
        }
    }

    /// Up if the trip ends above where it starts, down otherwise.
    pub fn direction(&self) -> Direction {
        if self.start_floor < self.end_floor {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    pub fn floors(&self) -> [i32; 2] {
        [self.start_floor, self.end_floor]
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.start_floor, self.end_floor)
    }
}
