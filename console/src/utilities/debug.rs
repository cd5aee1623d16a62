use std::io::{stdout, Stdout, Write};

use crossterm::{cursor, terminal, Result, ExecutableCommand};

use building::{BuildingReport, ElevatorReport, Phase};
use shared_resources::request::Request;

use super::command::HELP;

pub struct Debug {
    stdout: Stdout,
}

impl Debug {
    pub fn new() -> Self {
        Debug {
            stdout: stdout(),
        }
    }

    pub fn printstatus(&mut self, report: &BuildingReport, notice: Option<&str>) -> Result<()> {
        self.stdout.execute(terminal::Clear(terminal::ClearType::All))?;
        self.stdout.execute(cursor::MoveTo(0, 0))?;

        writeln!(self.stdout, "+-------------------------------------------------------------------------------+")?;
        writeln!(self.stdout, "| BUILDING                                                                      |")?;
        writeln!(self.stdout, "+------------+------------+------------+------------+----------------------------+")?;
        writeln!(self.stdout, "| {0:<10} | {1:<10} | {2:<10} | {3:<10} | {4:<26} |", "FLOORS", "ELEVATORS", "CAPACITY", "", "STATUS")?;
        writeln!(self.stdout, "+------------+------------+------------+------------+----------------------------+")?;
        writeln!(self.stdout, "| {0:<10} | {1:<10} | {2:<10} | {3:<10} | {4:<26} |",
            report.num_floors,
            report.num_elevators,
            report.capacity,
            "",
            report.system_status.to_string())?;
        writeln!(self.stdout, "+------------+------------+------------+------------+----------------------------+\n")?;

        writeln!(self.stdout, "+-------------------------------------------------------------------------------+")?;
        writeln!(self.stdout, "| ELEVATORS                                                                     |")?;
        writeln!(self.stdout, "+------------+------------+------------+------------+------------+--------------+")?;
        writeln!(self.stdout, "| {0:<10} | {1:<10} | {2:<10} | {3:<10} | {4:<10} | {5:<12} |", "ID", "STATE", "FLOOR", "DIRECTION", "DOOR", "TIMER")?;
        for elevator in &report.elevator_reports {
            writeln!(self.stdout, "+------------+------------+------------+------------+------------+--------------+")?;
            writeln!(self.stdout, "| {0:<10} | {1:<10} | {2:<10} | {3:<10} | {4:<10} | {5:<12} |",
                elevator.id,
                elevator.phase.as_string(),
                elevator.current_floor,
                elevator.direction.as_string().unwrap_or_else(|| String::from("-")),
                if elevator.door_closed { "closed" } else { "open" },
                timer(elevator))?;
        }
        writeln!(self.stdout, "+------------+------------+------------+------------+------------+--------------+\n")?;

        for elevator in &report.elevator_reports {
            writeln!(self.stdout, "{0:>3}: {1}", elevator.id, elevator)?;
        }
        writeln!(self.stdout)?;
        writeln!(self.stdout, "UP REQUESTS:   {}", queue(&report.up_requests))?;
        writeln!(self.stdout, "DOWN REQUESTS: {}\n", queue(&report.down_requests))?;

        if let Some(notice) = notice {
            writeln!(self.stdout, "{}\n", notice)?;
        }
        writeln!(self.stdout, "{}", HELP)?;
        write!(self.stdout, "\nEnter your command: ")?;
        self.stdout.flush()?;

        Ok(())
    }
}

fn timer(elevator: &ElevatorReport) -> String {
    match elevator.phase {
        Phase::IdleWaiting => format!("wait {}", elevator.wait_timer),
        _ if !elevator.door_closed => format!("door {}", elevator.door_timer),
        _ => String::from("-"),
    }
}

fn queue(requests: &[Request]) -> String {
    if requests.is_empty() {
        return String::from("-");
    }
    requests.iter().map(Request::to_string).collect::<Vec<_>>().join(", ")
}
