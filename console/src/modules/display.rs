/// ----- DISPLAY MODULE -----
/// Redraws the status tables whenever the main loop publishes a new
/// building report or a message for the user.

use crossbeam_channel::{select, Receiver};
use crossterm::Result;

use building::BuildingReport;

use crate::utilities::debug::Debug;

pub fn main(
    report_rx: Receiver<BuildingReport>,
    notice_rx: Receiver<Option<String>>,
) -> Result<()> {
    let mut debug = Debug::new();

    let mut report: Option<BuildingReport> = None;
    let mut notice: Option<String> = None;

    loop {
        select! {
            recv(report_rx) -> msg => {
                match msg {
                    Ok(msg) => report = Some(msg),
                    Err(_) => return Ok(()),
                }
            },
            recv(notice_rx) -> msg => {
                match msg {
                    Ok(msg) => notice = msg,
                    Err(_) => return Ok(()),
                }
            },
        }
        if let Some(report) = &report {
            debug.printstatus(report, notice.as_deref())?;
        }
    }
}
