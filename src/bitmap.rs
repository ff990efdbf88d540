//! Owned RGBA raster produced by the decoders.

use crate::color_table::Rgb;
use crate::error::PictError;

pub const BYTES_PER_PIXEL: usize = 4;

/// Pixel limit applied when the caller sets none.
pub const DEFAULT_MAX_PIXELS: u64 = 64 << 20;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Bitmap {
    /// Allocates a bitmap filled with `fill`, refusing more than
    /// `max_pixels` pixels.
    pub fn filled(width: u32, height: u32, fill: [u8; 4], max_pixels: u64) -> Result<Self, PictError> {
        let count = u64::from(width) * u64::from(height);
        let too_large = PictError::CanvasTooLarge { width, height };
        if count > max_pixels {
            return Err(too_large);
        }
        let count = usize::try_from(count)
            .ok()
            .filter(|count| count.checked_mul(BYTES_PER_PIXEL).is_some())
            .ok_or(too_large)?;
        Ok(Self {
            width,
            height,
            pixels: fill.repeat(count),
        })
    }

    /// Wraps an existing RGBA buffer of `width * height * 4` bytes.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, PictError> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|count| count.checked_mul(BYTES_PER_PIXEL));
        if expected != Some(pixels.len()) {
            return Err(PictError::InvalidLength);
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        let x = u32::try_from(x).ok().filter(|&x| x < self.width)?;
        let y = u32::try_from(y).ok().filter(|&y| y < self.height)?;
        Some((y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        let offset = self.offset(x, y)?;
        let mut rgba = [0u8; 4];
        rgba.copy_from_slice(&self.pixels[offset..offset + BYTES_PER_PIXEL]);
        Some(rgba)
    }

    /// Plots an opaque pixel; points outside the bitmap are clipped.
    pub fn put_pixel(&mut self, x: i32, y: i32, rgb: Rgb) {
        if let Some(offset) = self.offset(x, y) {
            self.pixels[offset..offset + 3].copy_from_slice(&rgb);
            self.pixels[offset + 3] = 0xFF;
        }
    }

    /// Returns the top-left `width` x `height` region, clamped to this bitmap.
    pub fn cropped(&self, width: u32, height: u32) -> Bitmap {
        let width = width.min(self.width);
        let height = height.min(self.height);
        if width == self.width && height == self.height {
            return self.clone();
        }
        let row_len = width as usize * BYTES_PER_PIXEL;
        let stride = self.width as usize * BYTES_PER_PIXEL;
        let mut pixels = Vec::with_capacity(row_len * height as usize);
        for row in self.pixels.chunks_exact(stride.max(1)).take(height as usize) {
            pixels.extend_from_slice(&row[..row_len]);
        }
        Bitmap {
            width,
            height,
            pixels,
        }
    }

    /// Drops the alpha channel.
    pub fn to_rgb(&self) -> Vec<u8> {
        self.pixels
            .chunks_exact(BYTES_PER_PIXEL)
            .flat_map(|p| [p[0], p[1], p[2]])
            .collect()
    }
}
