//! Shared context for the input callbacks, the render loop and the actions
//!
//! The controller owns the two pieces of shared mutable state:
//!
//! - the [`MenuModel`], behind the state lock
//! - the [`DisplaySink`] and its frame buffer, behind the sink lock
//!
//! Locks are always taken sink first, then state. The state lock is only
//! held for mutations and snapshots, never across display I/O, so input
//! callbacks never wait for a panel refresh. The sink lock makes whoever
//! holds it the sole writer to the screen.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::action;
use crate::config::Timing;
use crate::display::{DisplaySink, Frame};
use crate::input::{Button, InputEvent, InputSource};
use crate::menu::{MenuModel, Screen, Transition};
use crate::render;

/// Why the render loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The exit item was selected
    MenuExit,
    /// SIGINT / SIGTERM or Ctrl+C from the keyboard
    Interrupted,
}

pub struct Controller<S> {
    model: Mutex<MenuModel>,
    sink: Mutex<S>,
    timing: Timing,
    stop: Mutex<Option<StopReason>>,
    shut_down: AtomicBool,
}

impl<S: DisplaySink + 'static> Controller<S> {
    pub fn new(items: Vec<String>, sink: S, timing: Timing) -> Result<Arc<Self>> {
        Ok(Arc::new(Self {
            model: Mutex::new(MenuModel::new(items)?),
            sink: Mutex::new(sink),
            timing,
            stop: Mutex::new(None),
            shut_down: AtomicBool::new(false),
        }))
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    fn lock_model(&self) -> MutexGuard<'_, MenuModel> {
        self.model.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_sink(&self) -> MutexGuard<'_, S> {
        self.sink.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn selected(&self) -> usize {
        self.lock_model().selected()
    }

    pub fn screen(&self) -> Screen {
        self.lock_model().screen()
    }

    pub fn is_dirty(&self) -> bool {
        self.lock_model().is_dirty()
    }

    /// Wake the sink up and blank it
    pub fn initialize_display(&self) -> Result<()> {
        self.lock_sink().initialize()
    }

    /// Bring the display up, feed `input` into the model and render until a
    /// stop is requested, then shut down. Returns why the loop stopped.
    pub fn run(self: &Arc<Self>, input: &mut dyn InputSource) -> Result<StopReason> {
        self.initialize_display().context("initializing display")?;

        let target = Arc::clone(self);
        if let Err(e) = input.start(Arc::new(move |event| target.handle_event(event))) {
            self.shutdown(input);
            return Err(e.context("setting up buttons"));
        }

        let reason = render::run(self);
        match reason {
            StopReason::MenuExit => info!("Exit selected from menu"),
            StopReason::Interrupted => info!("Interrupted"),
        }

        self.shutdown(input);
        Ok(reason)
    }

    /// Entry point for input callbacks
    pub fn handle_event(self: &Arc<Self>, event: InputEvent) {
        match event {
            InputEvent::Pressed(button) => {
                self.handle_button(button);
            }
            InputEvent::Interrupt => {
                info!("Keyboard interrupt received, exiting...");
                self.request_stop(StopReason::Interrupted);
            }
        }
    }

    /// Apply a press under the state lock and start the action for Select.
    ///
    /// Never touches the display; the action runs on its own thread.
    pub fn handle_button(self: &Arc<Self>, button: Button) -> Transition {
        let transition = self.lock_model().apply(button);

        match &transition {
            Transition::Moved(index) => debug!("{} -> item {}", button, index),
            Transition::Ignored => debug!("{} ignored", button),
            Transition::Select(selection) => {
                if let Err(e) = action::spawn(Arc::clone(self), selection.clone()) {
                    warn!("Failed to start action for {}: {}", selection.label, e);
                    if selection.exit {
                        self.request_stop(StopReason::MenuExit);
                    } else {
                        self.finish_selection();
                    }
                }
            }
        }
        transition
    }

    /// Draw the menu if it is stale. Returns true if a frame was drawn.
    pub fn render_pending(&self) -> Result<bool> {
        let mut sink = self.lock_sink();
        if self.is_shut_down() {
            return Ok(false);
        }
        // The view is a copy, the state lock is gone before the refresh starts
        let view = self.lock_model().take_menu_view();
        match view {
            Some(view) => {
                sink.draw(&Frame::Menu(view))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Draw an arbitrary frame as the sole writer.
    ///
    /// Returns false without touching the sink once shutdown has begun; the
    /// panel may already be asleep.
    pub fn draw(&self, frame: &Frame) -> Result<bool> {
        let mut sink = self.lock_sink();
        if self.is_shut_down() {
            debug!("Display shut down, dropping frame");
            return Ok(false);
        }
        sink.draw(frame)?;
        Ok(true)
    }

    /// Hand the screen back to the menu after an action
    pub fn finish_selection(&self) {
        self.lock_model().finish_selection();
    }

    /// Ask the render loop to stop; the first reason wins
    pub fn request_stop(&self, reason: StopReason) {
        let mut stop = self.stop.lock().unwrap_or_else(PoisonError::into_inner);
        if stop.is_none() {
            *stop = Some(reason);
        }
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        *self.stop.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clear the display, release the inputs and put the display to sleep.
    ///
    /// Display failures are logged and never keep the inputs from being
    /// released. Only the first call does anything; returns whether this
    /// call ran the sequence.
    pub fn shutdown(&self, input: &mut dyn InputSource) -> bool {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return false;
        }

        let mut sink = self.lock_sink();
        if let Err(e) = sink.clear() {
            warn!("Error clearing display during shutdown: {:#}", e);
        }
        input.release();
        if let Err(e) = sink.sleep() {
            warn!("Error during display shutdown: {:#}", e);
        }
        info!("GPIO cleaned up. Bye!");
        true
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }
}
