//! Menu control loop
//!
//! Opens the display and the buttons this build was configured for, then
//! redraws the menu until the exit item is selected or an interrupt
//! arrives. Exits 0 in both cases and 1 if the hardware can't be set up.

use anyhow::{Context, Result};
use log::error;
use std::process::ExitCode;

use epaper_menu::config::{self, Timing};
use epaper_menu::controller::Controller;
use epaper_menu::{display, input, signal};

fn main() -> ExitCode {
    epaper_menu::init_logging();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<()> {
    signal::install_interrupt_handler()?;

    let timing = Timing::default();
    let sink = display::open_sink().context("opening display")?;
    let controller = Controller::new(config::menu_items(), sink, timing)?;

    let mut input = input::open_source(timing);
    controller.run(&mut input)?;
    Ok(())
}
