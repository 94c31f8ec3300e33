//! Waveshare 4.2" e-Paper sink
//!
//! Frames are rasterized into a 400x300 monochrome buffer and pushed with a
//! full refresh. A refresh takes a couple of seconds and blocks the caller;
//! the controller serializes all callers behind the sink lock.
//!
//! ## Lifecycle
//!
//! 1. `initialize()` resets and configures the controller (or wakes it up
//!    after `sleep()`), then clears the panel to white
//! 1. `draw()` rasterizes and does a full refresh per frame
//! 1. `sleep()` puts the controller into deep sleep; the image stays visible

use anyhow::{anyhow, Context, Result};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;
use epd_waveshare::color::Color;
use epd_waveshare::epd4in2::{Display4in2, Epd4in2};
use epd_waveshare::prelude::*;
use linux_embedded_hal::gpio_cdev::{Chip, LineRequestFlags};
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::{CdevPin, Delay, SpidevDevice};
use log::{debug, info};

use super::{raster, DisplaySink, Frame};
use crate::pins::Pins;

const NOT_INITIALIZED: &str = "e-paper display used before initialize()";
const SPI_SPEED_HZ: u32 = 4_000_000;

/// The panel wired to the Raspberry Pi header
pub type PanelSink = EPaperSink<SpidevDevice, CdevPin, CdevPin, CdevPin, Delay>;

/// E-paper panel plus its frame buffer
///
/// ## Type Parameters
///
/// - `SPI` - SPI device for communication
/// - `BUSY` - BUSY input pin
/// - `DC` - Data/Command output pin
/// - `RST` - Reset output pin
/// - `DELAY` - Delay provider for timing
pub struct EPaperSink<SPI, BUSY, DC, RST, DELAY> {
    spi: SPI,
    delay: DELAY,
    /// Handed to the driver on first initialization
    pins: Option<(BUSY, DC, RST)>,
    epd: Option<Epd4in2<SPI, BUSY, DC, RST, DELAY>>,
    asleep: bool,
    buffer: Display4in2,
}

impl<SPI, BUSY, DC, RST, DELAY> EPaperSink<SPI, BUSY, DC, RST, DELAY> {
    pub fn new(spi: SPI, busy: BUSY, dc: DC, rst: RST, delay: DELAY) -> Self {
        Self {
            spi,
            delay,
            pins: Some((busy, dc, rst)),
            epd: None,
            asleep: false,
            buffer: Display4in2::default(),
        }
    }
}

impl<SPI, BUSY, DC, RST, DELAY> DisplaySink for EPaperSink<SPI, BUSY, DC, RST, DELAY>
where
    SPI: SpiDevice + Send,
    BUSY: InputPin + Send,
    DC: OutputPin + Send,
    RST: OutputPin + Send,
    DELAY: DelayNs + Send,
{
    fn initialize(&mut self) -> Result<()> {
        if self.epd.is_none() {
            info!("Initializing 4.2\" e-Paper Display...");
            let (busy, dc, rst) = self.pins.take().context("e-paper pins already consumed")?;
            let epd = Epd4in2::new(&mut self.spi, busy, dc, rst, &mut self.delay, None)
                .map_err(|e| anyhow!("e-paper init failed: {:?}", e))?;
            self.epd = Some(epd);
        } else if self.asleep {
            debug!("Waking e-paper display");
            let epd = self.epd.as_mut().context(NOT_INITIALIZED)?;
            epd.wake_up(&mut self.spi, &mut self.delay)
                .map_err(|e| anyhow!("e-paper wake up failed: {:?}", e))?;
        }
        self.asleep = false;

        self.clear()?;
        info!("Display init complete.");
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.buffer
            .clear(Color::White)
            .map_err(|e| anyhow!("clearing frame buffer: {:?}", e))?;

        let epd = self.epd.as_mut().context(NOT_INITIALIZED)?;
        epd.clear_frame(&mut self.spi, &mut self.delay)
            .map_err(|e| anyhow!("e-paper clear failed: {:?}", e))?;
        epd.display_frame(&mut self.spi, &mut self.delay)
            .map_err(|e| anyhow!("e-paper refresh failed: {:?}", e))
    }

    fn draw(&mut self, frame: &Frame) -> Result<()> {
        raster::draw_frame(&mut self.buffer.color_converted::<BinaryColor>(), frame)
            .map_err(|e| anyhow!("rasterizing frame: {:?}", e))?;

        let epd = self.epd.as_mut().context(NOT_INITIALIZED)?;
        epd.update_and_display_frame(&mut self.spi, self.buffer.buffer(), &mut self.delay)
            .map_err(|e| anyhow!("e-paper update failed: {:?}", e))
    }

    fn sleep(&mut self) -> Result<()> {
        if self.asleep {
            return Ok(());
        }
        let epd = self.epd.as_mut().context(NOT_INITIALIZED)?;
        epd.sleep(&mut self.spi, &mut self.delay)
            .map_err(|e| anyhow!("e-paper sleep failed: {:?}", e))?;
        self.asleep = true;
        Ok(())
    }
}

/// Open SPI and the control lines of the panel on the Pi header
pub fn open_panel() -> Result<PanelSink> {
    let mut spi = SpidevDevice::open(Pins::SPI_DEVICE)
        .with_context(|| format!("opening SPI device {}", Pins::SPI_DEVICE))?;
    let options = SpidevOptions::new()
        .bits_per_word(8)
        .max_speed_hz(SPI_SPEED_HZ)
        .mode(SpiModeFlags::SPI_MODE_0)
        .build();
    spi.configure(&options).context("configuring SPI")?;

    let mut chip = Chip::new(Pins::GPIO_CHIP)
        .with_context(|| format!("opening GPIO chip {}", Pins::GPIO_CHIP))?;

    let busy_handle = chip
        .get_line(Pins::EPD_BUSY)
        .context("getting BUSY line")?
        .request(LineRequestFlags::INPUT, 0, "epaper-busy")
        .context("requesting BUSY line")?;
    let busy = CdevPin::new(busy_handle).context("creating BUSY pin")?;

    let dc_handle = chip
        .get_line(Pins::EPD_DC)
        .context("getting DC line")?
        .request(LineRequestFlags::OUTPUT, 0, "epaper-dc")
        .context("requesting DC line")?;
    let dc = CdevPin::new(dc_handle).context("creating DC pin")?;

    let rst_handle = chip
        .get_line(Pins::EPD_RST)
        .context("getting RST line")?
        .request(LineRequestFlags::OUTPUT, 1, "epaper-rst")
        .context("requesting RST line")?;
    let rst = CdevPin::new(rst_handle).context("creating RST pin")?;

    Ok(EPaperSink::new(spi, busy, dc, rst, Delay {}))
}
