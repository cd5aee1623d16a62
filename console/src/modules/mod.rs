use std::thread;

use crossbeam_channel::unbounded;
use tracing::info;

use building::Building;
use shared_resources::config::BuildingConfig;

use crate::utilities::command::Command;

mod controller;
mod display;
mod input;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    // READ CONFIGURATION
    let config = BuildingConfig::get()?;
    let mut building = Building::from_config(&config)?;
    info!(?config, "building created");

    // INITIALIZE CHANNELS
    let (command_tx, command_rx) = unbounded();
    let (report_tx, report_rx) = unbounded();
    let (notice_tx, notice_rx) = unbounded();

    // INITIALIZE THREAD FOR CONSOLE INPUT
    thread::Builder::new().name("input".to_string()).spawn(move || input::main(command_tx))?;

    // INITIALIZE THREAD FOR STATUS DISPLAY
    let display = thread::Builder::new().name("display".to_string()).spawn(move || display::main(
        report_rx,
        notice_rx,
    ))?;

    report_tx.send(building.snapshot())?;

    loop {
        let notice = match command_rx.recv()? {
            Ok(Command::Quit) => break,
            Ok(command) => controller::apply(&mut building, command),
            Err(err) => Some(err.to_string()),
        };
        notice_tx.send(notice)?;
        report_tx.send(building.snapshot())?;
    }

    println!("\nSTOPPING PROGRAM...");
    drop(report_tx);
    drop(notice_tx);
    match display.join() {
        Ok(result) => result?,
        Err(_) => return Err("display thread panicked".into()),
    }
    Ok(())
}
