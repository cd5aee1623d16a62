pub mod building;
pub mod elevator;
pub mod report;

pub use building::{Building, SystemStatus};
pub use elevator::{ElevatorUnit, Phase, UnitState};
pub use report::{BuildingReport, ElevatorReport};
