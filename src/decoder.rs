//! PICT opcode stream decoder.
//!
//! Reads the picture size word and frame, then dispatches opcodes until
//! OpEndPic. Drawing primitives are skipped; CopyBits blocks are decoded
//! into a working canvas of at least 640x480, which is cropped to the
//! (possibly widened) picture extent at the end. Decoding is all or
//! nothing: any error discards the canvas.

use crate::bitmap::{Bitmap, DEFAULT_MAX_PIXELS};
use crate::copy_bits::{ColumnIndexing, CopyBitsDecoder, Extent};
use crate::error::PictError;
use crate::pict_opcode::{OpcodeAction, action_for};
use crate::pict_stream_reader::PictStreamReader;
use crate::quicktime::{CompressedImage, read_compressed_image};
use crate::records::{HeaderOp, Rect};
use log::{debug, trace, warn};

pub const MIN_CANVAS_WIDTH: u32 = 640;
pub const MIN_CANVAS_HEIGHT: u32 = 480;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    pub column_indexing: ColumnIndexing,
    /// RGBA fill of the working canvas.
    pub background: [u8; 4],
    /// Upper bound on opcodes dispatched per picture.
    pub max_opcodes: usize,
    /// Upper bound on working canvas pixels.
    pub max_canvas_pixels: u64,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            column_indexing: ColumnIndexing::default(),
            background: [0, 0, 0, 0xFF],
            max_opcodes: 1 << 20,
            max_canvas_pixels: DEFAULT_MAX_PIXELS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PictImage {
    pub bitmap: Bitmap,
    /// Set when raster blocks reached past the declared frame width.
    pub widened: bool,
    pub frame: Rect,
    pub header: Option<HeaderOp>,
    pub compressed_images: Vec<CompressedImage>,
}

pub struct PictDecoder<'a> {
    reader: PictStreamReader<'a>,
    options: DecodeOptions,
}

impl<'a> PictDecoder<'a> {
    pub fn new(source: &'a [u8]) -> Self {
        Self::with_options(source, DecodeOptions::default())
    }

    pub fn with_options(source: &'a [u8], options: DecodeOptions) -> Self {
        Self {
            reader: PictStreamReader::new(source),
            options,
        }
    }

    pub fn decode(mut self) -> Result<PictImage, PictError> {
        let size = self.reader.read_u16()?;
        let frame = Rect::read_frame(&mut self.reader)?;
        debug!("pict size word {size:#06x}, frame {frame:?}");

        let frame_extent = Extent {
            width: frame.width(),
            height: frame.height(),
        };
        let canvas_width = frame_extent.width.max(MIN_CANVAS_WIDTH as i32) as u32;
        let canvas_height = frame_extent.height.max(MIN_CANVAS_HEIGHT as i32) as u32;
        let mut canvas = Bitmap::filled(
            canvas_width,
            canvas_height,
            self.options.background,
            self.options.max_canvas_pixels,
        )?;

        let mut extent = frame_extent;
        let mut header = None;
        let mut compressed_images = Vec::new();
        let mut dispatched = 0usize;

        loop {
            dispatched += 1;
            if dispatched > self.options.max_opcodes {
                return Err(PictError::TooManyOpcodes(self.options.max_opcodes));
            }

            let offset = self.reader.position();
            let opcode = self.reader.read_u16()?;
            let action = action_for(opcode);
            trace!("opcode {opcode:#06x} at {offset}: {action:?}");

            match action {
                OpcodeAction::Nop => {}
                OpcodeAction::EndOfPicture => break,
                OpcodeAction::Skip(count) => self.reader.skip(count)?,
                OpcodeAction::FontName => {
                    self.reader.skip(4)?;
                    let length = usize::from(self.reader.read_u8()?);
                    self.reader.skip(length)?;
                }
                OpcodeAction::ClipRegion => {
                    let mut size = usize::from(self.reader.read_u16()?);
                    if size & 1 == 1 {
                        size += 1;
                    }
                    self.reader
                        .skip(size.checked_sub(2).ok_or(PictError::InvalidLength)?)?;
                }
                OpcodeAction::Header => {
                    let header_op = HeaderOp::read(&mut self.reader)?;
                    debug!("header version {} src {:?}", header_op.version, header_op.src_rect);
                    header = Some(header_op);
                }
                OpcodeAction::LongComment => {
                    self.reader.skip(2)?; // kind
                    let mut size = usize::from(self.reader.read_u16()?);
                    if size & 1 == 1 {
                        size += 1;
                    }
                    self.reader.skip(size)?;
                }
                OpcodeAction::CopyBits(variant) => {
                    extent = CopyBitsDecoder::new(
                        &mut self.reader,
                        variant,
                        self.options.column_indexing,
                    )
                    .decode(&mut canvas, extent)?;
                }
                OpcodeAction::CompressedQuickTime => {
                    compressed_images.push(read_compressed_image(&mut self.reader)?);
                }
                OpcodeAction::Unimplemented => {
                    return Err(PictError::UnimplementedOpcode(opcode));
                }
            }
        }

        let widened = extent.width != frame_extent.width;
        if widened {
            warn!(
                "picture widened from {}x{} to {}x{}",
                frame_extent.width, frame_extent.height, extent.width, extent.height
            );
        }
        let bitmap = canvas.cropped(extent.width.max(0) as u32, extent.height.max(0) as u32);

        Ok(PictImage {
            bitmap,
            widened,
            frame,
            header,
            compressed_images,
        })
    }
}

/// Decodes a PICT resource with default options.
pub fn decode_pict(data: &[u8]) -> Result<PictImage, PictError> {
    PictDecoder::new(data).decode()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picture(frame: [i16; 4], body: &[u8]) -> Vec<u8> {
        let mut data = vec![0, 0];
        for v in frame {
            data.extend_from_slice(&v.to_be_bytes());
        }
        data.extend_from_slice(body);
        data
    }

    #[test]
    fn test_empty_picture() {
        let data = picture([0, 0, 100, 200], &[0x00, 0xFF]);
        let image = decode_pict(&data).unwrap();
        assert_eq!((image.bitmap.width(), image.bitmap.height()), (200, 100));
        assert!(!image.widened);
        assert!(image.header.is_none());
    }

    #[test]
    fn test_large_frame_keeps_size() {
        let data = picture([0, 0, 600, 800], &[0x00, 0xFF]);
        let image = decode_pict(&data).unwrap();
        assert_eq!((image.bitmap.width(), image.bitmap.height()), (800, 600));
    }

    #[test]
    fn test_skips_attribute_opcodes() {
        let body = [
            0x00, 0x11, 0x02, 0xFF, // version
            0x00, 0x03, 0x00, 0x01, // TxFont
            0x00, 0x1A, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, // RGBFgCol
            0x00, 0x2C, 0x00, 0x00, 0x00, 0x00, 0x03, b'a', b'b', b'c', // FontName
            0x00, 0x01, 0x00, 0x0B, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // odd clip region
            0x00, 0xA1, 0x00, 0x64, 0x00, 0x03, 1, 2, 3, 0, // LongComment
            0x80, 0x12, // reserved, no payload
            0x00, 0xFF,
        ];
        let image = decode_pict(&picture([0, 0, 10, 10], &body)).unwrap();
        assert_eq!(image.bitmap.width(), 10);
    }

    #[test]
    fn test_unimplemented_opcode() {
        let data = picture([0, 0, 10, 10], &[0x00, 0x90, 0x00, 0xFF]);
        assert_eq!(decode_pict(&data).unwrap_err(), PictError::UnimplementedOpcode(0x0090));
    }

    #[test]
    fn test_missing_end_of_picture() {
        let data = picture([0, 0, 10, 10], &[0x00, 0x00]);
        assert_eq!(decode_pict(&data).unwrap_err(), PictError::UnexpectedEndOfData);
    }

    #[test]
    fn test_opcode_limit() {
        let data = picture([0, 0, 10, 10], &[0, 0, 0, 0, 0, 0, 0x00, 0xFF]);
        let options = DecodeOptions {
            max_opcodes: 3,
            ..DecodeOptions::default()
        };
        assert_eq!(
            PictDecoder::with_options(&data, options).decode().unwrap_err(),
            PictError::TooManyOpcodes(3)
        );
    }

    #[test]
    fn test_canvas_limit() {
        let data = picture([0, 0, 30000, 30000], &[0x00, 0xFF]);
        assert!(matches!(
            decode_pict(&data).unwrap_err(),
            PictError::CanvasTooLarge { .. }
        ));
    }

    #[test]
    fn test_inverted_frame_crops_to_empty() {
        let data = picture([10, 10, 0, 0], &[0x00, 0xFF]);
        let image = decode_pict(&data).unwrap();
        assert_eq!((image.bitmap.width(), image.bitmap.height()), (0, 0));
    }
}
