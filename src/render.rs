//! Render loop
//!
//! The only place the menu is drawn from. Polls the dirty flag, redraws
//! when the menu is stale and stops when a stop has been requested or an
//! interrupt signal arrived. Display errors are logged and the loop keeps
//! going.

use log::{debug, info, warn};
use std::thread;

use crate::controller::{Controller, StopReason};
use crate::display::DisplaySink;
use crate::signal;

/// Run until a stop is requested, returning why
pub fn run<S: DisplaySink + 'static>(controller: &Controller<S>) -> StopReason {
    loop {
        if let Some(reason) = tick(controller) {
            return reason;
        }
        thread::sleep(controller.timing().poll);
    }
}

/// One poll cycle: check for a stop, else redraw if needed
pub fn tick<S: DisplaySink + 'static>(controller: &Controller<S>) -> Option<StopReason> {
    if signal::interrupted() && controller.stop_reason().is_none() {
        info!("Keyboard interrupt received, exiting...");
        controller.request_stop(StopReason::Interrupted);
    }
    if let Some(reason) = controller.stop_reason() {
        return Some(reason);
    }

    match controller.render_pending() {
        Ok(true) => debug!("Menu redrawn"),
        Ok(false) => {}
        Err(e) => warn!("Display error while drawing menu: {:#}", e),
    }
    None
}
