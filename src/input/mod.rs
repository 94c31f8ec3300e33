//! Input handling module for the five menu buttons
//!
//! An [`InputSource`] turns platform events (GPIO edges or key presses) into
//! [`InputEvent`]s and hands them to a callback on its own thread. The
//! callback runs independently of the render loop, so it must stay short.
//!
//! Edge interrupts are noisy: every accepted press has to pass the
//! per-button debounce window and then a confirming level read after a
//! short settle delay. [`ButtonHandler`] implements that filter so both the
//! GPIO source and the tests share it.

use anyhow::Result;
use log::{debug, warn};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::config::Timing;

// Re-export the public types
pub mod types;
pub use types::*;

#[cfg(feature = "gpio")]
pub mod gpio;
#[cfg(not(feature = "gpio"))]
pub mod keyboard;

/// Callback invoked for every accepted input event
pub type EventCallback = Arc<dyn Fn(InputEvent) + Send + Sync>;

/// A producer of button presses running on its own execution context
pub trait InputSource {
    /// Configure the inputs and start delivering events to `callback`
    fn start(&mut self, callback: EventCallback) -> Result<()>;

    /// Stop delivering events and release every underlying resource.
    /// Calling it more than once is harmless.
    fn release(&mut self);
}

/// Accepts at most one event per window
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    last_accepted: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_accepted: None,
        }
    }

    /// Returns true and restarts the window if `now` lies outside it
    pub fn accept(&mut self, now: Instant) -> bool {
        match self.last_accepted {
            Some(last) if now.saturating_duration_since(last) < self.window => false,
            _ => {
                self.last_accepted = Some(now);
                true
            }
        }
    }
}

/// Filter for the falling edges of a single button
pub struct ButtonHandler {
    button: Button,
    debouncer: Debouncer,
    settle: Duration,
}

impl ButtonHandler {
    pub fn new(button: Button, timing: &Timing) -> Self {
        Self {
            button,
            debouncer: Debouncer::new(timing.debounce),
            settle: timing.settle,
        }
    }

    pub fn button(&self) -> Button {
        self.button
    }

    /// Handle one falling edge seen at `now`.
    ///
    /// `is_pressed` reads the line after the settle delay; a press only
    /// counts if the line is still low (active low).
    pub fn on_falling_edge<F>(&mut self, now: Instant, is_pressed: F) -> Option<Button>
    where
        F: FnOnce() -> Result<bool>,
    {
        if !self.debouncer.accept(now) {
            debug!("{} edge inside debounce window", self.button);
            return None;
        }

        if !self.settle.is_zero() {
            thread::sleep(self.settle);
        }

        match is_pressed() {
            Ok(true) => Some(self.button),
            Ok(false) => {
                debug!("{} edge rejected by confirmation read", self.button);
                None
            }
            Err(e) => {
                warn!("Failed to read {} button level: {:#}", self.button, e);
                None
            }
        }
    }
}

/// Open the input source this build was configured for
#[cfg(feature = "gpio")]
pub fn open_source(timing: Timing) -> gpio::GpioInput {
    gpio::GpioInput::new(crate::pins::Pins::GPIO_CHIP, timing)
}

/// Open the input source this build was configured for
#[cfg(not(feature = "gpio"))]
pub fn open_source(_timing: Timing) -> keyboard::KeyboardInput {
    keyboard::KeyboardInput::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timing(debounce_ms: u64) -> Timing {
        Timing {
            debounce: Duration::from_millis(debounce_ms),
            settle: Duration::ZERO,
            ..Timing::instant()
        }
    }

    #[test]
    fn debouncer_accepts_first_event() {
        let mut debouncer = Debouncer::new(Duration::from_millis(150));
        assert!(debouncer.accept(Instant::now()));
    }

    #[test]
    fn debouncer_rejects_inside_window_and_accepts_after() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(150));
        assert!(debouncer.accept(start));
        assert!(!debouncer.accept(start + Duration::from_millis(10)));
        assert!(!debouncer.accept(start + Duration::from_millis(149)));
        assert!(debouncer.accept(start + Duration::from_millis(150)));
        // The window restarts from the last accepted event
        assert!(!debouncer.accept(start + Duration::from_millis(200)));
    }

    #[test]
    fn debouncer_with_zero_window_accepts_everything() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::ZERO);
        assert!(debouncer.accept(start));
        assert!(debouncer.accept(start));
    }

    #[test]
    fn handler_reports_confirmed_press() {
        let mut handler = ButtonHandler::new(Button::Down, &timing(150));
        assert_eq!(
            handler.on_falling_edge(Instant::now(), || Ok(true)),
            Some(Button::Down)
        );
    }

    #[test]
    fn handler_rejects_edge_when_line_is_high_again() {
        let mut handler = ButtonHandler::new(Button::Up, &timing(150));
        assert_eq!(handler.on_falling_edge(Instant::now(), || Ok(false)), None);
    }

    #[test]
    fn handler_swallows_read_errors() {
        let mut handler = ButtonHandler::new(Button::Select, &timing(0));
        let result = handler.on_falling_edge(Instant::now(), || Err(anyhow::anyhow!("line gone")));
        assert_eq!(result, None);
    }

    #[test]
    fn handler_skips_level_read_for_bounces() {
        let start = Instant::now();
        let mut handler = ButtonHandler::new(Button::Up, &timing(150));
        assert!(handler.on_falling_edge(start, || Ok(true)).is_some());

        let mut read = false;
        let bounce = handler.on_falling_edge(start + Duration::from_millis(5), || {
            read = true;
            Ok(true)
        });
        assert_eq!(bounce, None);
        assert!(!read);
    }

    #[test]
    fn handler_waits_for_settle_delay() {
        let timing = Timing {
            settle: Duration::from_millis(20),
            ..timing(0)
        };
        let mut handler = ButtonHandler::new(Button::Up, &timing);
        let before = Instant::now();
        handler.on_falling_edge(before, || Ok(true));
        assert!(before.elapsed() >= Duration::from_millis(20));
    }
}
