//! Frame rasterization with embedded-graphics
//!
//! Draws onto any [`BinaryColor`] target; `On` is black ink on white paper.
//! The e-paper sink wraps its panel buffer with `color_converted()`.

use embedded_graphics::image::{Image, ImageRaw};
use embedded_graphics::mono_font::iso_8859_15::{FONT_10X20, FONT_9X15};
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

use super::compose::{self, EXITING, SELECTED_TITLE};
use super::{Frame, MonoImage};
use crate::config::{MENU_INSTRUCTIONS, MENU_TITLE};
use crate::menu::MenuView;

const MARGIN_X: i32 = 10;
const LINE_SPACING: i32 = 22;

fn title_style() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_10X20)
        .text_color(BinaryColor::On) // On = black pixels
        .build()
}

fn body_style() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyle::new(&FONT_9X15, BinaryColor::On)
}

fn text<D>(target: &mut D, s: &str, y: i32, style: MonoTextStyle<'_, BinaryColor>) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    Text::with_baseline(s, Point::new(MARGIN_X, y), style, Baseline::Top)
        .draw(target)
        .map(|_| ())
}

/// Clear `target` to white and draw `frame` on it
pub fn draw_frame<D>(target: &mut D, frame: &Frame) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    target.clear(BinaryColor::Off)?;

    match frame {
        Frame::Menu(view) => draw_menu(target, view),
        Frame::Selected(selection) => {
            text(target, SELECTED_TITLE, 30, title_style())?;
            text(target, &selection.label, 60, body_style())
        }
        Frame::Exiting => text(target, EXITING, 10, title_style()),
        Frame::Image(image) => draw_image(target, image),
    }
}

fn draw_menu<D>(target: &mut D, view: &MenuView) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let mut y = 4;
    text(target, MENU_TITLE, y, title_style())?;
    y += 28;
    text(target, MENU_INSTRUCTIONS, y, body_style())?;
    y += 24;

    for line in compose::menu_lines(view) {
        text(target, &line, y, body_style())?;
        y += LINE_SPACING;
    }
    Ok(())
}

fn draw_image<D>(target: &mut D, image: &MonoImage) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let raw = ImageRaw::<BinaryColor>::new(image.bits(), image.width());
    Image::new(&raw, Point::zero()).draw(target)
}
