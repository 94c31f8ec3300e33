//! Buttons on the Linux GPIO character device
//!
//! Each button line is requested as an input with the pull-up enabled and
//! falling-edge detection, and is watched by its own thread. The thread
//! waits for edges with a timeout so that [`GpioInput::release`] can stop
//! it and give the line back to the kernel.

use anyhow::{Context, Result};
use gpiocdev::line::{Bias, EdgeDetection, EdgeKind, Offset, Value};
use gpiocdev::request::Config;
use gpiocdev::Request;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::{Button, ButtonHandler, EventCallback, InputEvent, InputSource};
use crate::config::Timing;
use crate::pins::Pins;

const CONSUMER: &str = "epaper-menu";
const WAIT_TIMEOUT: Duration = Duration::from_millis(100);

/// Line offset of every button
pub const BUTTON_LINES: [(Button, Offset); 5] = [
    (Button::Up, Pins::BTN_UP),
    (Button::Down, Pins::BTN_DOWN),
    (Button::Left, Pins::BTN_LEFT),
    (Button::Right, Pins::BTN_RIGHT),
    (Button::Select, Pins::BTN_SELECT),
];

/// Request settings for one button: input, pulled up, falling edges
pub fn button_config(offset: Offset) -> Config {
    let mut config = Config::default();
    config
        .with_line(offset)
        .as_input()
        .with_bias(Bias::PullUp)
        .with_edge_detection(EdgeDetection::FallingEdge);
    config
}

/// Edge-triggered buttons on a GPIO chip
pub struct GpioInput {
    chip_path: String,
    timing: Timing,
    stop: Arc<AtomicBool>,
    workers: Vec<JoinHandle<()>>,
}

impl GpioInput {
    pub fn new(chip_path: &str, timing: Timing) -> Self {
        Self {
            chip_path: chip_path.to_string(),
            timing,
            stop: Arc::new(AtomicBool::new(false)),
            workers: Vec::new(),
        }
    }
}

impl InputSource for GpioInput {
    fn start(&mut self, callback: EventCallback) -> Result<()> {
        self.stop.store(false, Ordering::Release);

        for (button, offset) in BUTTON_LINES {
            let request = Request::builder()
                .on_chip(self.chip_path.as_str())
                .with_consumer(CONSUMER)
                .with_config(button_config(offset))
                .request()
                .with_context(|| {
                    format!(
                        "requesting {} button line {} on {}",
                        button, offset, self.chip_path
                    )
                })?;

            let handler = ButtonHandler::new(button, &self.timing);
            let stop = Arc::clone(&self.stop);
            let callback = Arc::clone(&callback);
            let worker = thread::Builder::new()
                .name(format!("button-{}", offset))
                .spawn(move || watch_line(request, offset, handler, stop, callback))
                .context("spawning button thread")?;
            self.workers.push(worker);
        }

        info!(
            "Listening for button presses on {} (debounce {:?})",
            self.chip_path, self.timing.debounce
        );
        Ok(())
    }

    fn release(&mut self) {
        self.stop.store(true, Ordering::Release);
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                warn!("Button thread panicked");
            }
        }
        debug!("GPIO lines released");
    }
}

impl Drop for GpioInput {
    fn drop(&mut self) {
        self.release();
    }
}

fn watch_line(
    request: Request,
    offset: Offset,
    mut handler: ButtonHandler,
    stop: Arc<AtomicBool>,
    callback: EventCallback,
) {
    while !stop.load(Ordering::Acquire) {
        match request.wait_edge_event(WAIT_TIMEOUT) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                warn!("Waiting on {} button line failed: {}", handler.button(), e);
                break;
            }
        }

        match request.read_edge_event() {
            Ok(event) if event.kind == EdgeKind::Falling => {}
            Ok(_) => continue,
            Err(e) => {
                warn!("Reading {} button event failed: {}", handler.button(), e);
                continue;
            }
        }

        let pressed = handler.on_falling_edge(Instant::now(), || {
            // Pulled up, so a held button reads low
            Ok(request.value(offset)? == Value::Inactive)
        });
        if let Some(button) = pressed {
            callback(InputEvent::Pressed(button));
        }
    }
    // Dropping the request releases the line
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpiocdev::line::Direction;
    use std::collections::HashSet;

    #[test]
    fn every_button_has_a_distinct_line() {
        let lines: HashSet<Offset> = BUTTON_LINES.iter().map(|(_, line)| *line).collect();
        assert_eq!(lines.len(), Button::ALL.len());
        for button in Button::ALL {
            assert!(BUTTON_LINES.iter().any(|(b, _)| *b == button));
        }
    }

    #[test]
    fn buttons_are_pulled_up_inputs_on_falling_edge() {
        for (button, offset) in BUTTON_LINES {
            let config = button_config(offset);
            let line = config
                .line_config(offset)
                .unwrap_or_else(|| panic!("{} line {} not configured", button, offset));
            assert_eq!(line.direction, Some(Direction::Input));
            assert_eq!(line.bias, Some(Bias::PullUp));
            assert_eq!(line.edge_detection, Some(EdgeDetection::FallingEdge));
        }
    }

    #[test]
    fn config_only_holds_its_own_line() {
        let config = button_config(Pins::BTN_SELECT);
        assert!(config.line_config(Pins::BTN_SELECT).is_some());
        assert!(config.line_config(Pins::BTN_UP).is_none());
    }
}
