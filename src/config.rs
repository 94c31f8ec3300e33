//! Application-wide constants and timing parameters.
//!
//! Everything that might be tuned for a different board or panel lives here.

use std::time::Duration;

/// Labels shown in the menu, top to bottom. The last one exits the program.
pub const MENU_ITEMS: [&str; 5] = [
    "Option 1 - Do something",
    "Option 2 - Do something else",
    "Option 3 - Another action",
    "Option 4 - Yet another action",
    "Option 5 - Exit program",
];

/// Heading drawn at the top of the menu.
pub const MENU_TITLE: &str = "Button Menu";

/// Help line drawn under the heading.
pub const MENU_INSTRUCTIONS: &str = "Up/Down = move, Select = choose";

/// Prefix for the highlighted item.
pub const SELECTED_MARKER: &str = "> ";

/// Prefix for every other item, keeps the labels aligned.
pub const UNSELECTED_MARKER: &str = "  ";

/// Brightness below which an image pixel becomes black (0-255).
pub const MONO_THRESHOLD: u8 = 128;

/// Minimum time between two accepted presses of the same button (ms).
pub const BUTTON_DEBOUNCE_MS: u64 = 150;

/// Delay before the confirming level read inside a button callback (ms).
pub const BUTTON_SETTLE_MS: u64 = 20;

/// Render loop idle interval (ms).
pub const RENDER_POLL_MS: u64 = 50;

/// Stand-in duration for a menu action (ms).
pub const ACTION_DURATION_MS: u64 = 1500;

/// How long the "Exiting..." screen stays up before shutdown (ms).
pub const EXIT_HOLD_MS: u64 = 1000;

/// Timing knobs shared by the input, render and action paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub debounce: Duration,
    pub settle: Duration,
    pub poll: Duration,
    pub action: Duration,
    pub exit_hold: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(BUTTON_DEBOUNCE_MS),
            settle: Duration::from_millis(BUTTON_SETTLE_MS),
            poll: Duration::from_millis(RENDER_POLL_MS),
            action: Duration::from_millis(ACTION_DURATION_MS),
            exit_hold: Duration::from_millis(EXIT_HOLD_MS),
        }
    }
}

impl Timing {
    /// Near-zero timings for tests and simulations.
    pub fn instant() -> Self {
        Self {
            debounce: Duration::ZERO,
            settle: Duration::ZERO,
            poll: Duration::from_millis(1),
            action: Duration::from_millis(5),
            exit_hold: Duration::ZERO,
        }
    }
}

/// The menu labels as owned strings.
pub fn menu_items() -> Vec<String> {
    MENU_ITEMS.iter().map(|s| s.to_string()).collect()
}
