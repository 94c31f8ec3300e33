//! Keyboard stand-in for the button board
//!
//! Used when the crate is built without the `gpio` feature, e.g. on a
//! development machine. The terminal is put into raw mode so single key
//! presses arrive immediately; Ctrl+C then shows up as a key event rather
//! than SIGINT and is forwarded as [`InputEvent::Interrupt`].

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use log::{debug, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::{Button, EventCallback, InputEvent, InputSource};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Arrow keys and vi keys mapped onto the five buttons
pub struct KeyboardInput {
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    raw_mode: bool,
}

impl KeyboardInput {
    pub fn new() -> Self {
        Self {
            stop: Arc::new(AtomicBool::new(false)),
            worker: None,
            raw_mode: false,
        }
    }
}

impl Default for KeyboardInput {
    fn default() -> Self {
        Self::new()
    }
}

/// Translate a key press into an input event
pub fn map_key(key: KeyEvent) -> Option<InputEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('d') => Some(InputEvent::Interrupt),
            _ => None,
        };
    }

    let button = match key.code {
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('w') => Button::Up,
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('s') => Button::Down,
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('a') => Button::Left,
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('d') => Button::Right,
        KeyCode::Enter | KeyCode::Char(' ') => Button::Select,
        KeyCode::Char('q') | KeyCode::Esc => return Some(InputEvent::Interrupt),
        _ => return None,
    };
    Some(InputEvent::Pressed(button))
}

impl InputSource for KeyboardInput {
    fn start(&mut self, callback: EventCallback) -> Result<()> {
        terminal::enable_raw_mode().context("enabling terminal raw mode")?;
        self.raw_mode = true;
        self.stop.store(false, Ordering::Release);

        let stop = Arc::clone(&self.stop);
        let worker = thread::Builder::new()
            .name("keyboard".to_string())
            .spawn(move || read_keys(stop, callback))
            .context("spawning keyboard thread")?;
        self.worker = Some(worker);
        Ok(())
    }

    fn release(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Keyboard thread panicked");
            }
        }
        if self.raw_mode {
            if let Err(e) = terminal::disable_raw_mode() {
                warn!("Failed to restore terminal mode: {}", e);
            }
            self.raw_mode = false;
        }
    }
}

impl Drop for KeyboardInput {
    fn drop(&mut self) {
        self.release();
    }
}

fn read_keys(stop: Arc<AtomicBool>, callback: EventCallback) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(POLL_INTERVAL) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                warn!("Keyboard poll failed: {}", e);
                break;
            }
        }

        match event::read() {
            Ok(Event::Key(key)) => {
                if let Some(input) = map_key(key) {
                    debug!("Key {:?} -> {}", key.code, input);
                    callback(input);
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Keyboard read failed: {}", e);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_map_to_buttons() {
        assert_eq!(map_key(press(KeyCode::Up)), Some(InputEvent::Pressed(Button::Up)));
        assert_eq!(
            map_key(press(KeyCode::Down)),
            Some(InputEvent::Pressed(Button::Down))
        );
        assert_eq!(
            map_key(press(KeyCode::Left)),
            Some(InputEvent::Pressed(Button::Left))
        );
        assert_eq!(
            map_key(press(KeyCode::Right)),
            Some(InputEvent::Pressed(Button::Right))
        );
    }

    #[test]
    fn enter_and_space_select() {
        assert_eq!(
            map_key(press(KeyCode::Enter)),
            Some(InputEvent::Pressed(Button::Select))
        );
        assert_eq!(
            map_key(press(KeyCode::Char(' '))),
            Some(InputEvent::Pressed(Button::Select))
        );
    }

    #[test]
    fn ctrl_c_and_q_interrupt() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctrl_c), Some(InputEvent::Interrupt));
        assert_eq!(map_key(press(KeyCode::Char('q'))), Some(InputEvent::Interrupt));
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        assert_eq!(map_key(press(KeyCode::Char('x'))), None);
        assert_eq!(map_key(press(KeyCode::Tab)), None);
        let ctrl_k = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctrl_k), None);
    }

    #[test]
    fn key_release_is_ignored() {
        let mut key = press(KeyCode::Enter);
        key.kind = KeyEventKind::Release;
        assert_eq!(map_key(key), None);
    }
}
