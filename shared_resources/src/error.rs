use thiserror::Error;

/// Failures reported by the building at the point of the offending call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildingError {
    #[error("invalid building: {reason}")]
    InvalidConstruction { reason: &'static str },
    #[error("floor {floor} must be between 0 and {top_floor}")]
    InvalidFloor { floor: i32, top_floor: i32 },
    #[error("request rejected, the elevator system is not running")]
    NotRunning,
    #[error("the elevator system cannot be started while it is stopping")]
    AlreadyDraining,
}
