//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use anyhow::{bail, Result};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use epaper_menu::config::Timing;
use epaper_menu::display::{DisplaySink, Frame};
use epaper_menu::input::{EventCallback, InputEvent, InputSource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    Initialize,
    Clear,
    Draw(Frame),
    Sleep,
}

/// Sink that remembers every call; clones share the same log
#[derive(Clone, Default)]
pub struct RecordingSink {
    calls: Arc<Mutex<Vec<SinkCall>>>,
    fail_draws: Arc<AtomicBool>,
    fail_clear: Arc<AtomicBool>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn menu_draws(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, SinkCall::Draw(Frame::Menu(_))))
            .count()
    }

    pub fn set_fail_draws(&self, fail: bool) {
        self.fail_draws.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_clear(&self, fail: bool) {
        self.fail_clear.store(fail, Ordering::SeqCst);
    }

    fn record(&self, call: SinkCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl DisplaySink for RecordingSink {
    fn initialize(&mut self) -> Result<()> {
        self.record(SinkCall::Initialize);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        if self.fail_clear.load(Ordering::SeqCst) {
            bail!("panel unplugged");
        }
        self.record(SinkCall::Clear);
        Ok(())
    }

    fn draw(&mut self, frame: &Frame) -> Result<()> {
        if self.fail_draws.load(Ordering::SeqCst) {
            bail!("SPI write failed");
        }
        self.record(SinkCall::Draw(frame.clone()));
        Ok(())
    }

    fn sleep(&mut self) -> Result<()> {
        self.record(SinkCall::Sleep);
        Ok(())
    }
}

/// Input source that counts releases and can replay a script of events
#[derive(Default)]
pub struct FakeInput {
    pub releases: Arc<AtomicUsize>,
    pub callback: Option<EventCallback>,
    script: Vec<InputEvent>,
    fail_start: bool,
}

impl FakeInput {
    /// Deliver `events` from a separate thread once started
    pub fn scripted(events: Vec<InputEvent>) -> Self {
        Self {
            script: events,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_start: true,
            ..Self::default()
        }
    }
}

impl InputSource for FakeInput {
    fn start(&mut self, callback: EventCallback) -> Result<()> {
        if self.fail_start {
            bail!("line busy");
        }
        if !self.script.is_empty() {
            let events = std::mem::take(&mut self.script);
            let deliver = Arc::clone(&callback);
            thread::spawn(move || {
                for event in events {
                    thread::sleep(Duration::from_millis(5));
                    deliver(event);
                }
            });
        }
        self.callback = Some(callback);
        Ok(())
    }

    fn release(&mut self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
        self.callback = None;
    }
}

/// Fast timings with a short but observable action
pub fn test_timing() -> Timing {
    Timing {
        action: Duration::from_millis(50),
        ..Timing::instant()
    }
}

/// Poll `cond` until it holds or two seconds pass
pub fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    cond()
}
