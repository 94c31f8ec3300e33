//! Selection action handler
//!
//! Runs on a detached thread per accepted Select press. It shows the
//! selection screen, performs the (simulated) action and hands the screen
//! back to the menu. For the exit item it shows the farewell screen and
//! asks the render loop to stop instead.

use log::{info, warn};
use std::io;
use std::sync::Arc;
use std::thread;

use crate::controller::{Controller, StopReason};
use crate::display::{DisplaySink, Frame};
use crate::menu::Selection;

/// Start the action for `selection` on its own thread
pub fn spawn<S: DisplaySink + 'static>(
    controller: Arc<Controller<S>>,
    selection: Selection,
) -> io::Result<()> {
    thread::Builder::new()
        .name("menu-action".to_string())
        .spawn(move || run(&controller, &selection))
        .map(|_| ())
}

/// Returns the screen to the menu even if the action panics
struct FinishOnDrop<'a, S: DisplaySink + 'static>(&'a Controller<S>);

impl<S: DisplaySink + 'static> Drop for FinishOnDrop<'_, S> {
    fn drop(&mut self) {
        self.0.finish_selection();
    }
}

/// Perform the action bound to `selection`, blocking the calling thread
pub fn run<S: DisplaySink + 'static>(controller: &Controller<S>, selection: &Selection) {
    if selection.exit {
        run_exit(controller, selection);
        return;
    }

    let _finish = FinishOnDrop(controller);

    if let Err(e) = controller.draw(&Frame::Selected(selection.clone())) {
        warn!("Failed to draw selection screen: {:#}", e);
    }

    info!("Performing action for: {}", selection.label);
    thread::sleep(controller.timing().action);
}

fn run_exit<S: DisplaySink + 'static>(controller: &Controller<S>, selection: &Selection) {
    if let Err(e) = controller.draw(&Frame::Selected(selection.clone())) {
        warn!("Failed to draw selection screen: {:#}", e);
    }
    if let Err(e) = controller.draw(&Frame::Exiting) {
        warn!("Failed to draw exit screen: {:#}", e);
    }
    thread::sleep(controller.timing().exit_hold);

    info!("Exiting program via menu...");
    controller.request_stop(StopReason::MenuExit);
}
