/// ----- CONTROLLER MODULE -----
/// Applies console commands to the building and turns the outcome into a
/// message for the user. All mutation of the building goes through here.

use building::{Building, SystemStatus};
use tracing::{debug, error};

use crate::utilities::command::Command;

pub fn apply(building: &mut Building, command: Command) -> Option<String> {
    debug!(?command, "applying command");
    match command {
        Command::Start => match building.start_system() {
            Ok(true) => None,
            Ok(false) => Some(String::from("The building is already running.")),
            Err(err) => Some(err.to_string()),
        },
        Command::Step(steps) => {
            let notice = match building.status() {
                SystemStatus::Off => Some(String::from("The building has not been started.")),
                _ => None,
            };
            for _ in 0..steps {
                building.step();
            }
            notice
        },
        Command::Request { start_floor, end_floor } => match building.submit_request(start_floor, end_floor) {
            Ok(true) => None,
            Ok(false) => Some(String::from("The start and end floors cannot be the same.")),
            Err(err) => Some(err.to_string()),
        },
        Command::Stop => {
            let notice = match building.status() {
                SystemStatus::Off => Some(String::from("The building is already stopped.")),
                SystemStatus::Draining => Some(String::from("The building is stopping.")),
                SystemStatus::Running => None,
            };
            building.stop_system();
            notice
        },
        Command::Report => match serde_json::to_string_pretty(&building.snapshot()) {
            Ok(json) => Some(json),
            Err(err) => {
                error!(%err, "could not serialize building report");
                Some(String::from("Could not produce a report."))
            },
        },
        Command::Quit => None,
    }
}
