//! Show one image on the display and put it to sleep
//!
//! Usage: `show-image <image.bmp>`

use anyhow::Result;
use log::{error, info};
use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use epaper_menu::display::{self, DisplaySink, Frame, MonoImage, PANEL_HEIGHT, PANEL_WIDTH};

const USAGE: &str = "Usage: show-image <image.bmp>";

fn main() -> ExitCode {
    epaper_menu::init_logging();

    let path = match image_path(env::args().skip(1)) {
        Ok(path) => path,
        Err(message) => {
            println!("{}", message);
            return ExitCode::from(1);
        }
    };

    match show(&path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(1)
        }
    }
}

/// The single positional argument, which must name an existing file
fn image_path(mut args: impl Iterator<Item = String>) -> Result<PathBuf, String> {
    let path = PathBuf::from(args.next().ok_or_else(|| USAGE.to_string())?);
    if args.next().is_some() {
        return Err(USAGE.to_string());
    }
    if !path.is_file() {
        return Err(format!("BMP file not found: {}", path.display()));
    }
    Ok(path)
}

fn show(path: &Path) -> Result<()> {
    info!("Loading image {}...", path.display());
    let image = MonoImage::load(path, PANEL_WIDTH, PANEL_HEIGHT)?;

    info!("Initializing display...");
    let mut sink = display::open_sink()?;
    sink.initialize()?;

    info!("Displaying image...");
    let drawn = sink.draw(&Frame::Image(image));

    info!("Putting display to sleep...");
    sink.sleep()?;
    drawn
}
