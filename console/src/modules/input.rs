/// ----- INPUT MODULE -----
/// Reads console lines and forwards them as parsed commands. The end of
/// the input counts as quitting.

use std::io::{self, BufRead};

use crossbeam_channel::Sender;
use tracing::warn;

use crate::utilities::command::{Command, CommandError};

pub fn main(command_tx: Sender<Result<Command, CommandError>>) {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                warn!(%err, "could not read from stdin");
                break;
            },
        };
        if command_tx.send(line.parse()).is_err() {
            // main loop is gone
            return;
        }
    }
    let _ = command_tx.send(Ok(Command::Quit));
}
