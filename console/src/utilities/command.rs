use std::str::FromStr;

use thiserror::Error;

pub const HELP: &str = "[start] Start the building\n\
[s steps] Run steps times [CR] one step\n\
[r start end] make a request\n\
[h] halt building [c] continue building [p] print report [q] quit >";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Step(u32),
    Request { start_floor: i32, end_floor: i32 },
    Stop,
    Report,
    Quit,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Invalid command '{0}'. Please try again.")]
    Unknown(String),
    #[error("Invalid command. {0}")]
    MissingArgument(&'static str),
    #[error("'{0}' is not a valid number.")]
    InvalidNumber(String),
}

impl FromStr for Command {
    type Err = CommandError;

    /// An empty line is a single step.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.as_slice() {
            [] => Ok(Command::Step(1)),
            ["start"] | ["c"] => Ok(Command::Start),
            ["s", steps] => Ok(Command::Step(parse_number(steps)?)),
            ["s", ..] => Err(CommandError::MissingArgument("Please specify the number of steps.")),
            ["r", start, end] => Ok(Command::Request {
                start_floor: parse_number(start)?,
                end_floor: parse_number(end)?,
            }),
            ["r", ..] => Err(CommandError::MissingArgument("Please provide start and destination floors.")),
            ["h"] | ["stop"] => Ok(Command::Stop),
            ["p"] => Ok(Command::Report),
            ["q"] | ["quit"] => Ok(Command::Quit),
            [other, ..] => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn parse_number<T: FromStr>(value: &str) -> Result<T, CommandError> {
    value.parse::<T>().map_err(|_| CommandError::InvalidNumber(value.to_string()))
}
