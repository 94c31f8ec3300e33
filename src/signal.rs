//! SIGINT / SIGTERM handling
//!
//! The handler only flips an atomic flag; the render loop polls it and runs
//! the normal shutdown sequence from the main thread.

use anyhow::{anyhow, Result};
use std::sync::atomic::{AtomicBool, Ordering};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Only uses atomic operations (async-signal-safe).
extern "C" fn handle_interrupt(_: libc::c_int) {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

/// Route SIGINT and SIGTERM to the interrupt flag
pub fn install_interrupt_handler() -> Result<()> {
    for signal in [libc::SIGINT, libc::SIGTERM] {
        unsafe {
            // SAFETY: handle_interrupt is an extern "C" signal handler with no side
            // effects beyond flipping an atomic flag, which is async-signal-safe.
            let handler = handle_interrupt as *const () as libc::sighandler_t;
            if libc::signal(signal, handler) == libc::SIG_ERR {
                return Err(anyhow!("failed to install handler for signal {}", signal));
            }
        }
    }
    Ok(())
}

/// True once an interrupt signal has arrived
pub fn interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}
