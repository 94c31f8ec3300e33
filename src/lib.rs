//! Button-driven menu for a Raspberry Pi with an e-Paper display.
//!
//! Five buttons (Up, Down, Left, Right, Select) move a highlight through a
//! fixed list of items; Select runs the item's action and the last item
//! exits. Button edges arrive on their own threads, the menu is drawn by a
//! single render loop, and both meet in a [`controller::Controller`].
//!
//! Build variants:
//!
//! - default: keyboard input, terminal output (runs anywhere)
//! - `gpio`: buttons on `/dev/gpiochip0`, terminal output
//! - `epaper`: buttons on `/dev/gpiochip0`, Waveshare 4.2" panel on spidev

pub mod action;
pub mod config;
pub mod controller;
pub mod display;
pub mod input;
pub mod menu;
pub mod pins;
pub mod render;
pub mod signal;

/// Bind the log crate to stderr at info level.
///
/// The level is fixed in code; no environment variables are read.
pub fn init_logging() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .target(env_logger::Target::Stderr)
        .init();
}
