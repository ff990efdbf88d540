//! CopyBits raster opcodes (0x0098-0x009B).
//!
//! Decodes one pixmap block: descriptor, optional color table, source and
//! destination rectangles, optional clip region, then one scan line per
//! source row at 1, 2, 4, 8, 16 or 32 bits per pixel. Pixels are plotted
//! into the caller's surface at the destination offset.

use crate::bitmap::Bitmap;
use crate::color_table::{ColorTable, Rgb, rgb555_to_rgb};
use crate::error::PictError;
use crate::packbits::unpack_row;
use crate::pict_opcode::CopyBitsVariant;
use crate::pict_stream_reader::PictStreamReader;
use crate::pixel_expansion::expand_pixels;
use crate::records::{PixMap, Rect};
use log::debug;
use std::ops::Range;

/// Which scan line columns the 1, 2, 4 and 16 bit paths read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnIndexing {
    /// Columns `0..src.width()`, reading the expanded pixel or word at `x`.
    #[default]
    Relative,
    /// Columns `src.left..src.right`, reading the stored byte or word at
    /// `x` and plotting at `dst.left + x`. Reproduces the output of older
    /// decoders bit for bit.
    SourceRect,
}

impl ColumnIndexing {
    fn columns(self, src: &Rect) -> Range<i32> {
        match self {
            ColumnIndexing::Relative => 0..src.width(),
            ColumnIndexing::SourceRect => i32::from(src.left)..i32::from(src.right),
        }
    }
}

/// Logical picture size, grown by blocks that reach past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub width: i32,
    pub height: i32,
}

impl Extent {
    /// Grows to cover a block copied from `src` to `dst`. Never shrinks.
    pub fn widened(self, src: &Rect, dst: &Rect) -> Extent {
        let mut extent = self;
        if src.width() > extent.width {
            extent.width = extent.width.max(i32::from(dst.left) + src.width());
        }
        if src.height() > extent.height {
            extent.height = extent.height.max(i32::from(dst.top) + src.height());
        }
        extent
    }
}

struct CopyBitsBlock {
    pixmap: PixMap,
    src: Rect,
    dst: Rect,
}

pub struct CopyBitsDecoder<'r, 'a> {
    reader: &'r mut PictStreamReader<'a>,
    variant: CopyBitsVariant,
    indexing: ColumnIndexing,
}

impl<'r, 'a> CopyBitsDecoder<'r, 'a> {
    pub fn new(
        reader: &'r mut PictStreamReader<'a>,
        variant: CopyBitsVariant,
        indexing: ColumnIndexing,
    ) -> Self {
        Self {
            reader,
            variant,
            indexing,
        }
    }

    /// Decodes the block into `surface` and returns the extent widened to
    /// cover it.
    pub fn decode(
        &mut self,
        surface: &mut Bitmap,
        extent: Extent,
    ) -> Result<Extent, PictError> {
        if !self.variant.packed {
            self.reader.skip(4)?; // pmBaseAddr
        }

        let row_bytes = self.reader.read_u16()?;
        let bounds = Rect::read(self.reader)?;
        let pixmap = if row_bytes & PixMap::PIXMAP_FLAG != 0 {
            PixMap::read_fields(self.reader, row_bytes, bounds)?
        } else {
            PixMap {
                row_bytes,
                bounds,
                pixel_size: 1,
                ..PixMap::default()
            }
        };

        let color_table = if pixmap.is_pixmap() && self.variant.packed {
            ColorTable::read(self.reader)?
        } else if !pixmap.is_pixmap() {
            ColorTable::monochrome()
        } else {
            ColorTable::default()
        };

        let src = Rect::read(self.reader)?;
        let dst = Rect::read(self.reader)?;
        self.reader.skip(2)?; // transfer mode
        let extent = extent.widened(&src, &dst);

        if self.variant.clipped {
            let size = usize::from(self.reader.read_u16()?);
            self.reader
                .skip(size.checked_sub(2).ok_or(PictError::InvalidLength)?)?;
        }

        let block = CopyBitsBlock { pixmap, src, dst };
        debug!(
            "copybits {}-bit pack type {} row bytes {} src {:?} dst {:?}",
            pixmap.pixel_size,
            pixmap.pack_type,
            pixmap.row_byte_count(),
            src,
            dst
        );

        match pixmap.pixel_size {
            1 | 2 | 4 | 8 => self.decode_indexed(&block, &color_table, surface)?,
            16 => self.decode_direct16(&block, surface)?,
            32 => self.decode_direct32(&block, surface)?,
            other => return Err(PictError::UnsupportedPixelSize(other as u16)),
        }

        self.reader.align_to_word()?;
        Ok(extent)
    }

    fn decode_indexed(
        &mut self,
        block: &CopyBitsBlock,
        color_table: &ColorTable,
        surface: &mut Bitmap,
    ) -> Result<(), PictError> {
        let row_bytes = block.pixmap.row_byte_count();
        let depth = block.pixmap.pixel_size as u16;
        let (src, dst) = (block.src, block.dst);

        for y in 0..src.height() {
            let scan_line: Vec<u8> = if row_bytes < 8 {
                self.reader.read_bytes(row_bytes)?.to_vec()
            } else {
                unpack_row(self.reader, row_bytes)?
            };

            if depth == 8 {
                for x in 0..src.width() {
                    let index = element(&scan_line, x)?;
                    plot(surface, &dst, x, y, color_table.lookup(usize::from(index))?);
                }
                continue;
            }

            match self.indexing {
                ColumnIndexing::Relative => {
                    let pixels = expand_pixels(&scan_line, depth);
                    for x in self.indexing.columns(&src) {
                        let index = element(&pixels, x)?;
                        plot(surface, &dst, x, y, color_table.lookup(usize::from(index))?);
                    }
                }
                ColumnIndexing::SourceRect => {
                    for x in self.indexing.columns(&src) {
                        let index = element(&scan_line, x)?;
                        plot(surface, &dst, x, y, color_table.lookup(usize::from(index))?);
                    }
                }
            }
        }
        Ok(())
    }

    fn decode_direct16(&mut self, block: &CopyBitsBlock, surface: &mut Bitmap) -> Result<(), PictError> {
        let row_bytes = block.pixmap.row_byte_count();
        let pack_type = block.pixmap.pack_type as u16;
        let packed = match pack_type {
            _ if row_bytes < 8 || pack_type == 1 => false,
            0 | 3 => true,
            _ => {
                return Err(PictError::UnsupportedPackType {
                    pack_type,
                    pixel_size: 16,
                });
            }
        };
        let (src, dst) = (block.src, block.dst);

        for y in 0..src.height() {
            let scan_line: Vec<u16> = if packed {
                unpack_row(self.reader, row_bytes)?
            } else {
                (0..src.width())
                    .map(|_| self.reader.read_u16())
                    .collect::<Result<_, _>>()?
            };
            for x in self.indexing.columns(&src) {
                plot(surface, &dst, x, y, rgb555_to_rgb(element(&scan_line, x)?));
            }
        }
        Ok(())
    }

    /// Rows are planar: red at 0, green at `width`, blue at `2 * width`,
    /// where `width` is the pixmap bounds width.
    fn decode_direct32(&mut self, block: &CopyBitsBlock, surface: &mut Bitmap) -> Result<(), PictError> {
        let row_bytes = block.pixmap.row_byte_count();
        let pack_type = block.pixmap.pack_type as u16;
        let packed = match pack_type {
            _ if row_bytes < 8 || pack_type == 1 => false,
            0 | 4 => true,
            _ => {
                return Err(PictError::UnsupportedPackType {
                    pack_type,
                    pixel_size: 32,
                });
            }
        };
        let plane = block.pixmap.bounds.width().max(0);
        let (src, dst) = (block.src, block.dst);

        for y in 0..src.height() {
            let scan_line: Vec<u8> = if packed {
                unpack_row(self.reader, row_bytes)?
            } else {
                let mut planes = vec![0u8; plane as usize * 3];
                for x in 0..src.width() {
                    let pixel = self.reader.read_u32()?;
                    for (k, shift) in [(0, 16), (1, 8), (2, 0)] {
                        let slot = usize::try_from(x + k * plane)
                            .ok()
                            .and_then(|i| planes.get_mut(i))
                            .ok_or(PictError::PixelOutOfRange(x))?;
                        *slot = (pixel >> shift) as u8;
                    }
                }
                planes
            };
            for x in 0..src.width() {
                let rgb = [
                    element(&scan_line, x)?,
                    element(&scan_line, x + plane)?,
                    element(&scan_line, x + 2 * plane)?,
                ];
                plot(surface, &dst, x, y, rgb);
            }
        }
        Ok(())
    }
}

fn element<T: Copy>(scan_line: &[T], x: i32) -> Result<T, PictError> {
    usize::try_from(x)
        .ok()
        .and_then(|i| scan_line.get(i))
        .copied()
        .ok_or(PictError::PixelOutOfRange(x))
}

fn plot(surface: &mut Bitmap, dst: &Rect, x: i32, y: i32, rgb: Rgb) {
    surface.put_pixel(i32::from(dst.left) + x, i32::from(dst.top) + y, rgb);
}
