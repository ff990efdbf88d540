//! Raw `pict` resources: a bounds rectangle, a depth tag and unpacked
//! pixels, with 8-bit pixels resolved through a companion `clut` resource.

use crate::bitmap::{Bitmap, DEFAULT_MAX_PIXELS};
use crate::color_table::{ColorTable, rgb555_to_rgb};
use crate::error::PictError;
use crate::pict_stream_reader::PictStreamReader;
use crate::records::Rect;
use log::debug;

pub struct RawRasterLoader<'a> {
    reader: PictStreamReader<'a>,
    clut: &'a [u8],
    max_pixels: u64,
}

impl<'a> RawRasterLoader<'a> {
    pub fn new(data: &'a [u8], clut: &'a [u8]) -> Self {
        Self {
            reader: PictStreamReader::new(data),
            clut,
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }

    pub fn with_pixel_limit(mut self, max_pixels: u64) -> Self {
        self.max_pixels = max_pixels;
        self
    }

    pub fn load(mut self) -> Result<Bitmap, PictError> {
        let rect = Rect::read(&mut self.reader)?;
        let depth = self.reader.read_i16()?;
        if depth != 8 && depth != 16 {
            return Err(PictError::UnsupportedRawDepth(depth));
        }
        let width = rect.width().max(0) as u32;
        let height = rect.height().max(0) as u32;
        debug!("raw raster {width}x{height} at depth {depth}");

        let pixel_count = u64::from(width) * u64::from(height);
        if pixel_count > self.max_pixels {
            return Err(PictError::CanvasTooLarge { width, height });
        }
        let pixel_bytes = pixel_count * (depth as u64 / 8);
        if pixel_bytes > self.reader.remaining_data().len() as u64 {
            return Err(PictError::UnexpectedEndOfData);
        }

        let mut bitmap = Bitmap::filled(width, height, [0, 0, 0, 0xFF], self.max_pixels)?;
        let (width, height) = (width as i32, height as i32);
        if depth == 8 {
            let table = ColorTable::read_raw_clut(self.clut)?;
            for y in 0..height {
                for x in 0..width {
                    let index = self.reader.read_u8()?;
                    bitmap.put_pixel(x, y, table.lookup(usize::from(index))?);
                }
            }
        } else {
            for y in 0..height {
                for x in 0..width {
                    bitmap.put_pixel(x, y, rgb555_to_rgb(self.reader.read_u16()?));
                }
            }
        }
        Ok(bitmap)
    }
}

/// Decodes a raw raster with an external 256-entry color table.
pub fn load_raw(data: &[u8], clut: &[u8]) -> Result<Bitmap, PictError> {
    RawRasterLoader::new(data, clut).load()
}
