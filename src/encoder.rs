//! Writes an RGBA bitmap as a version 2 PICT with a single DirectBitsRect.

use crate::bitmap::{BYTES_PER_PIXEL, Bitmap};
use crate::color_table::rgb_to_rgb555;
use crate::error::PictError;
use crate::packbits::{packed_size_bound, write_packed_row};
use crate::pict_opcode::Opcode;
use crate::pict_stream_writer::PictStreamWriter;
use crate::records::{HeaderOp, PixMap, Rect};
use log::debug;

/// Direct pixel depth of the emitted DirectBitsRect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectDepth {
    /// 5-5-5 words, pack type 3.
    Sixteen,
    /// Planar 8-bit red, green and blue runs, pack type 4.
    #[default]
    ThirtyTwo,
}

impl DirectDepth {
    fn pixel_size(self) -> i16 {
        match self {
            DirectDepth::Sixteen => 16,
            DirectDepth::ThirtyTwo => 32,
        }
    }

    fn pack_type(self) -> i16 {
        match self {
            DirectDepth::Sixteen => 3,
            DirectDepth::ThirtyTwo => 4,
        }
    }
}

const RAW_PACK_TYPE: i16 = 1;
const BASE_ADDRESS: u32 = 0x0000_00FF;
const FIXED_OVERHEAD: usize = 128;

#[derive(Debug, Clone, Copy, Default)]
pub struct PictEncoder {
    depth: DirectDepth,
}

impl PictEncoder {
    pub fn new(depth: DirectDepth) -> Self {
        Self { depth }
    }

    pub fn encode(&self, bitmap: &Bitmap) -> Result<Vec<u8>, PictError> {
        let width = i16::try_from(bitmap.width()).map_err(|_| PictError::InvalidLength)?;
        let height = i16::try_from(bitmap.height()).map_err(|_| PictError::InvalidLength)?;
        let frame = Rect::new(0, 0, height, width);

        let columns = bitmap.width() as usize;
        let row_bytes = columns * self.depth.pixel_size() as usize / 8;
        if row_bytes > usize::from(PixMap::ROW_BYTES_MASK) {
            return Err(PictError::RowTooLong);
        }
        let packed = row_bytes >= 8;

        let mut pixmap = PixMap::for_depth(self.depth.pixel_size(), row_bytes as u16);
        pixmap.bounds = frame;
        pixmap.pack_type = if packed { self.depth.pack_type() } else { RAW_PACK_TYPE };

        let row_bound = match self.depth {
            DirectDepth::Sixteen => packed_size_bound::<u16>(columns),
            DirectDepth::ThirtyTwo => packed_size_bound::<u8>(columns * 3),
        };
        let mut destination = vec![0u8; FIXED_OVERHEAD + bitmap.height() as usize * (row_bound.max(row_bytes) + 2)];
        let mut writer = PictStreamWriter::new(&mut destination);

        writer.write_u16(0)?; // size, patched below
        frame.write(&mut writer)?;
        writer.write_opcode(Opcode::VersionOp)?;
        writer.write_opcode(Opcode::Version)?;
        HeaderOp::extended(frame).write(&mut writer)?;

        writer.write_opcode(Opcode::DirectBitsRect)?;
        writer.write_u32(BASE_ADDRESS)?;
        pixmap.write(&mut writer)?;
        frame.write(&mut writer)?;
        frame.write(&mut writer)?;
        writer.write_u16(0)?; // srcCopy

        let stride = columns * BYTES_PER_PIXEL;
        for row in bitmap.pixels().chunks_exact(stride.max(1)).take(bitmap.height() as usize) {
            match self.depth {
                DirectDepth::Sixteen => {
                    let words: Vec<u16> = row
                        .chunks_exact(BYTES_PER_PIXEL)
                        .map(|p| rgb_to_rgb555([p[0], p[1], p[2]]))
                        .collect();
                    if packed {
                        write_packed_row(&mut writer, &words, row_bytes)?;
                    } else {
                        for word in words {
                            writer.write_u16(word)?;
                        }
                    }
                }
                DirectDepth::ThirtyTwo if packed => {
                    let mut planes = vec![0u8; columns * 3];
                    for (x, p) in row.chunks_exact(BYTES_PER_PIXEL).enumerate() {
                        planes[x] = p[0];
                        planes[columns + x] = p[1];
                        planes[2 * columns + x] = p[2];
                    }
                    write_packed_row(&mut writer, &planes, row_bytes)?;
                }
                DirectDepth::ThirtyTwo => {
                    for p in row.chunks_exact(BYTES_PER_PIXEL) {
                        writer.write_u32(u32::from_be_bytes([0, p[0], p[1], p[2]]))?;
                    }
                }
            }
        }

        writer.pad_to_word()?;
        writer.write_opcode(Opcode::OpEndPic)?;

        let len = writer.len();
        writer.patch_u16(0, (len & 0xFFFF) as u16)?;
        debug!(
            "encoded {}x{} at {} bits, {len} bytes",
            bitmap.width(),
            bitmap.height(),
            self.depth.pixel_size()
        );
        destination.truncate(len);
        Ok(destination)
    }
}
