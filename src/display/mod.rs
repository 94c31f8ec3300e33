//! Display sinks
//!
//! A [`DisplaySink`] accepts fully composed [`Frame`]s and renders them with
//! blocking I/O. Two implementations exist:
//!
//! - [`terminal::TerminalSink`] prints ANSI text to a writer (stdout)
//! - `epaper::EPaperSink` rasterizes into a 400x300 monochrome buffer and
//!   pushes it to a Waveshare 4.2" panel (feature `epaper`)
//!
//! Frames are plain data, so they can be built while holding the state lock
//! and drawn after it has been released.

use anyhow::Result;

use crate::menu::{MenuView, Selection};

pub mod bitmap;
pub mod compose;
pub mod raster;
pub mod terminal;

#[cfg(feature = "epaper")]
pub mod epaper;

pub use self::bitmap::MonoImage;

/// Panel width in pixels
pub const PANEL_WIDTH: u32 = epd_waveshare::epd4in2::WIDTH;
/// Panel height in pixels
pub const PANEL_HEIGHT: u32 = epd_waveshare::epd4in2::HEIGHT;

/// One complete screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// The item list with the highlighted entry marked
    Menu(MenuView),
    /// "You selected: ..." while the action runs
    Selected(Selection),
    /// Farewell screen shown before shutdown
    Exiting,
    /// A full-screen monochrome image
    Image(MonoImage),
}

/// Something that can show frames
pub trait DisplaySink: Send {
    /// Wake the device and prepare it for drawing
    fn initialize(&mut self) -> Result<()>;

    /// Blank the whole screen
    fn clear(&mut self) -> Result<()>;

    /// Replace the screen content with `frame`
    fn draw(&mut self, frame: &Frame) -> Result<()>;

    /// Enter the low-power state; `initialize` must be called before reuse
    fn sleep(&mut self) -> Result<()>;
}

impl<S: DisplaySink + ?Sized> DisplaySink for Box<S> {
    fn initialize(&mut self) -> Result<()> {
        (**self).initialize()
    }

    fn clear(&mut self) -> Result<()> {
        (**self).clear()
    }

    fn draw(&mut self, frame: &Frame) -> Result<()> {
        (**self).draw(frame)
    }

    fn sleep(&mut self) -> Result<()> {
        (**self).sleep()
    }
}

/// The sink this build was configured for
#[cfg(feature = "epaper")]
pub type DefaultSink = epaper::PanelSink;

/// The sink this build was configured for
#[cfg(not(feature = "epaper"))]
pub type DefaultSink = terminal::TerminalSink<std::io::Stdout>;

/// Open the sink this build was configured for
#[cfg(feature = "epaper")]
pub fn open_sink() -> Result<DefaultSink> {
    epaper::open_panel()
}

/// Open the sink this build was configured for
#[cfg(not(feature = "epaper"))]
pub fn open_sink() -> Result<DefaultSink> {
    Ok(terminal::TerminalSink::stdout())
}
