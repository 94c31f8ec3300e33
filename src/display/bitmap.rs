//! Monochrome images for the panel
//!
//! Images are fitted to the target size preserving the aspect ratio,
//! centered on a white background and thresholded to two colors. Pixels
//! are packed eight to a byte, MSB first, rows padded to a whole byte.
//! A set bit is a black pixel.

use anyhow::{Context, Result};
use image::{imageops::FilterType, DynamicImage};
use log::debug;
use std::path::Path;

use crate::config::MONO_THRESHOLD;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonoImage {
    width: u32,
    height: u32,
    bits: Vec<u8>,
}

impl MonoImage {
    /// All-white image
    pub fn blank(width: u32, height: u32) -> Self {
        let bytes_per_row = width.div_ceil(8);
        Self {
            width,
            height,
            bits: vec![0u8; (bytes_per_row * height) as usize],
        }
    }

    /// Load an image file and convert it for a `width` x `height` panel
    pub fn load(path: &Path, width: u32, height: u32) -> Result<Self> {
        let img = image::open(path)
            .with_context(|| format!("loading image {}", path.display()))?;
        debug!(
            "Loaded {} ({}x{})",
            path.display(),
            img.width(),
            img.height()
        );
        Ok(Self::from_image(&img, width, height, MONO_THRESHOLD))
    }

    /// Fit, center and threshold an already decoded image
    pub fn from_image(img: &DynamicImage, width: u32, height: u32, threshold: u8) -> Self {
        let mut out = Self::blank(width, height);
        if width == 0 || height == 0 {
            return out;
        }

        let orig_ratio = img.width() as f32 / img.height() as f32;
        let target_ratio = width as f32 / height as f32;

        let (new_width, new_height) = if orig_ratio > target_ratio {
            // Wider than the panel - fit to width
            (width, ((width as f32 / orig_ratio) as u32).clamp(1, height))
        } else {
            // Taller than the panel - fit to height
            (((height as f32 * orig_ratio) as u32).clamp(1, width), height)
        };

        let gray = img
            .resize_exact(new_width, new_height, FilterType::Lanczos3)
            .to_luma8();

        let offset_x = (width - new_width) / 2;
        let offset_y = (height - new_height) / 2;

        for (x, y, pixel) in gray.enumerate_pixels() {
            if pixel[0] < threshold {
                out.set_black(x + offset_x, y + offset_y);
            }
        }
        out
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Packed pixel rows
    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    pub fn bytes_per_row(&self) -> u32 {
        self.width.div_ceil(8)
    }

    /// True for black pixels; out-of-range coordinates read as white
    pub fn is_black(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let (index, mask) = self.locate(x, y);
        self.bits[index] & mask != 0
    }

    pub fn set_black(&mut self, x: u32, y: u32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let (index, mask) = self.locate(x, y);
        self.bits[index] |= mask;
    }

    /// Number of black pixels
    pub fn black_pixels(&self) -> u32 {
        self.bits.iter().map(|b| b.count_ones()).sum()
    }

    fn locate(&self, x: u32, y: u32) -> (usize, u8) {
        let index = (y * self.bytes_per_row() + x / 8) as usize;
        (index, 1 << (7 - (x % 8)))
    }
}
