//! ANSI terminal sink
//!
//! Every frame clears the screen and homes the cursor before printing.
//! Lines end with `MoveToNextLine` so output stays aligned in raw mode.

use anyhow::{Context, Result};
use crossterm::cursor::{MoveTo, MoveToNextLine, Show};
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use crossterm::{queue, QueueableCommand};
use std::io::{self, Stdout, Write};

use super::compose::{self, ACTION_PENDING, SELECTED_TITLE};
use super::{DisplaySink, Frame, MonoImage};
use crate::config::{MENU_INSTRUCTIONS, MENU_TITLE};

/// Columns used when printing an image
const IMAGE_COLUMNS: u32 = 80;

pub struct TerminalSink<W: Write + Send> {
    out: W,
}

impl TerminalSink<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn home(&mut self) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))
    }

    fn line(&mut self, text: &str) -> io::Result<()> {
        queue!(self.out, Print(text), MoveToNextLine(1))
    }
}

/// The text lines a frame prints as
pub fn frame_lines(frame: &Frame) -> Vec<String> {
    match frame {
        Frame::Menu(view) => {
            let mut lines = vec![
                format!("=== {} ===", MENU_TITLE),
                format!("({})", MENU_INSTRUCTIONS),
                String::new(),
            ];
            lines.extend(compose::menu_lines(view));
            lines.push(String::new());
            lines.push("Press Ctrl+C to quit (from keyboard).".to_string());
            lines
        }
        Frame::Selected(selection) => {
            let mut lines = vec![format!("{} {}", SELECTED_TITLE, selection.label), String::new()];
            if selection.exit {
                lines.push("Exiting program...".to_string());
            } else {
                lines.push(ACTION_PENDING.to_string());
            }
            lines
        }
        Frame::Exiting => vec!["Exiting program...".to_string()],
        Frame::Image(image) => image_lines(image, IMAGE_COLUMNS),
    }
}

/// Downscale an image to `columns` characters, two pixel rows per line
pub fn image_lines(image: &MonoImage, columns: u32) -> Vec<String> {
    if image.width() == 0 || image.height() == 0 || columns == 0 {
        return Vec::new();
    }
    let step = image.width().div_ceil(columns).max(1);
    let cols = image.width().div_ceil(step);
    let rows = image.height().div_ceil(step * 2);

    (0..rows)
        .map(|row| {
            (0..cols)
                .map(|col| {
                    let x = col * step;
                    let top = image.is_black(x, row * 2 * step);
                    let bottom = image.is_black(x, (row * 2 + 1) * step);
                    match (top, bottom) {
                        (true, true) => '█',
                        (true, false) => '▀',
                        (false, true) => '▄',
                        (false, false) => ' ',
                    }
                })
                .collect()
        })
        .collect()
}

impl<W: Write + Send> DisplaySink for TerminalSink<W> {
    fn initialize(&mut self) -> Result<()> {
        self.clear()
    }

    fn clear(&mut self) -> Result<()> {
        self.home().context("clearing terminal")?;
        self.out.flush().context("flushing terminal")
    }

    fn draw(&mut self, frame: &Frame) -> Result<()> {
        self.home().context("clearing terminal")?;
        for line in frame_lines(frame) {
            self.line(&line).context("writing to terminal")?;
        }
        self.out.flush().context("flushing terminal")
    }

    fn sleep(&mut self) -> Result<()> {
        self.out.queue(Show).context("restoring cursor")?;
        self.out.flush().context("flushing terminal")
    }
}
