//! Fixed-layout QuickDraw records with symmetric read/write.

use crate::error::PictError;
use crate::pict_opcode::Opcode;
use crate::pict_stream_reader::PictStreamReader;
use crate::pict_stream_writer::PictStreamWriter;
use log::warn;

/// QuickDraw rectangle, serialized as top, left, bottom, right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub top: i16,
    pub left: i16,
    pub bottom: i16,
    pub right: i16,
}

impl Rect {
    pub const SIZE: usize = 8;

    pub fn new(top: i16, left: i16, bottom: i16, right: i16) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    pub fn read(reader: &mut PictStreamReader) -> Result<Self, PictError> {
        Ok(Self {
            top: reader.read_i16()?,
            left: reader.read_i16()?,
            bottom: reader.read_i16()?,
            right: reader.read_i16()?,
        })
    }

    /// Reads a picture frame, treating -1 in `top` or `left` as 0.
    pub fn read_frame(reader: &mut PictStreamReader) -> Result<Self, PictError> {
        let mut rect = Self::read(reader)?;
        if rect.top == -1 {
            warn!("frame top is -1, using 0");
            rect.top = 0;
        }
        if rect.left == -1 {
            warn!("frame left is -1, using 0");
            rect.left = 0;
        }
        Ok(rect)
    }

    pub fn write(&self, writer: &mut PictStreamWriter) -> Result<(), PictError> {
        writer.write_i16(self.top)?;
        writer.write_i16(self.left)?;
        writer.write_i16(self.bottom)?;
        writer.write_i16(self.right)
    }

    pub fn width(&self) -> i32 {
        i32::from(self.right) - i32::from(self.left)
    }

    pub fn height(&self) -> i32 {
        i32::from(self.bottom) - i32::from(self.top)
    }
}

/// Extended version 2 header (opcode 0x0C00).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderOp {
    pub version: i16,
    pub reserved1: i16,
    /// Fixed-point 16.16 horizontal resolution.
    pub h_res: u32,
    /// Fixed-point 16.16 vertical resolution.
    pub v_res: u32,
    pub src_rect: Rect,
    pub reserved2: u32,
}

impl HeaderOp {
    pub const EXTENDED_VERSION: i16 = -2;
    pub const DEFAULT_RESOLUTION: u32 = 72 << 16;

    pub fn extended(src_rect: Rect) -> Self {
        Self {
            version: Self::EXTENDED_VERSION,
            reserved1: 0,
            h_res: Self::DEFAULT_RESOLUTION,
            v_res: Self::DEFAULT_RESOLUTION,
            src_rect,
            reserved2: 0,
        }
    }

    /// Reads the record body; the opcode has already been consumed.
    pub fn read(reader: &mut PictStreamReader) -> Result<Self, PictError> {
        Ok(Self {
            version: reader.read_i16()?,
            reserved1: reader.read_i16()?,
            h_res: reader.read_u32()?,
            v_res: reader.read_u32()?,
            src_rect: Rect::read(reader)?,
            reserved2: reader.read_u32()?,
        })
    }

    /// Writes the opcode followed by the record body.
    pub fn write(&self, writer: &mut PictStreamWriter) -> Result<(), PictError> {
        writer.write_opcode(Opcode::HeaderOp)?;
        writer.write_i16(self.version)?;
        writer.write_i16(self.reserved1)?;
        writer.write_u32(self.h_res)?;
        writer.write_u32(self.v_res)?;
        self.src_rect.write(writer)?;
        writer.write_u32(self.reserved2)
    }
}

/// Pixel map descriptor as stored in CopyBits opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixMap {
    /// Row byte count in the low 14 bits; bit 15 marks a true pixmap.
    pub row_bytes: u16,
    pub bounds: Rect,
    pub pm_version: i16,
    pub pack_type: i16,
    pub pack_size: i32,
    pub h_res: u32,
    pub v_res: u32,
    pub pixel_type: i16,
    pub pixel_size: i16,
    pub cmp_count: i16,
    pub cmp_size: i16,
    pub plane_bytes: i32,
    pub pm_table: u32,
    pub pm_reserved: u32,
}

impl PixMap {
    pub const SIZE: usize = 46;
    pub const PIXMAP_FLAG: u16 = 0x8000;
    pub const ROW_BYTES_MASK: u16 = 0x3FFF;
    pub const RGB_DIRECT: i16 = 16;

    pub fn for_depth(depth: i16, row_bytes: u16) -> Self {
        let (pixel_type, cmp_size, cmp_count) = match depth {
            8 => (0, 8, 1),
            16 => (Self::RGB_DIRECT, 5, 3),
            _ => (Self::RGB_DIRECT, 8, 3),
        };
        Self {
            row_bytes: row_bytes | Self::PIXMAP_FLAG,
            h_res: HeaderOp::DEFAULT_RESOLUTION,
            v_res: HeaderOp::DEFAULT_RESOLUTION,
            pixel_type,
            pixel_size: depth,
            cmp_count,
            cmp_size,
            ..Self::default()
        }
    }

    pub fn is_pixmap(&self) -> bool {
        self.row_bytes & Self::PIXMAP_FLAG != 0
    }

    pub fn row_byte_count(&self) -> usize {
        usize::from(self.row_bytes & Self::ROW_BYTES_MASK)
    }

    pub fn read(reader: &mut PictStreamReader) -> Result<Self, PictError> {
        let row_bytes = reader.read_u16()?;
        let bounds = Rect::read(reader)?;
        Self::read_fields(reader, row_bytes, bounds)
    }

    /// Reads the descriptor fields that follow rowBytes and bounds.
    pub fn read_fields(
        reader: &mut PictStreamReader,
        row_bytes: u16,
        bounds: Rect,
    ) -> Result<Self, PictError> {
        Ok(Self {
            row_bytes,
            bounds,
            pm_version: reader.read_i16()?,
            pack_type: reader.read_i16()?,
            pack_size: reader.read_i32()?,
            h_res: reader.read_u32()?,
            v_res: reader.read_u32()?,
            pixel_type: reader.read_i16()?,
            pixel_size: reader.read_i16()?,
            cmp_count: reader.read_i16()?,
            cmp_size: reader.read_i16()?,
            plane_bytes: reader.read_i32()?,
            pm_table: reader.read_u32()?,
            pm_reserved: reader.read_u32()?,
        })
    }

    pub fn write(&self, writer: &mut PictStreamWriter) -> Result<(), PictError> {
        writer.write_u16(self.row_bytes)?;
        self.bounds.write(writer)?;
        writer.write_i16(self.pm_version)?;
        writer.write_i16(self.pack_type)?;
        writer.write_i32(self.pack_size)?;
        writer.write_u32(self.h_res)?;
        writer.write_u32(self.v_res)?;
        writer.write_i16(self.pixel_type)?;
        writer.write_i16(self.pixel_size)?;
        writer.write_i16(self.cmp_count)?;
        writer.write_i16(self.cmp_size)?;
        writer.write_i32(self.plane_bytes)?;
        writer.write_u32(self.pm_table)?;
        writer.write_u32(self.pm_reserved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_field_order() {
        let data = [0x00, 0x01, 0x00, 0x02, 0x00, 0x03, 0x00, 0x04];
        let rect = Rect::read(&mut PictStreamReader::new(&data)).unwrap();
        assert_eq!(rect, Rect::new(1, 2, 3, 4));
        assert_eq!(rect.width(), 2);
        assert_eq!(rect.height(), 2);
    }

    #[test]
    fn test_frame_sentinel_normalization() {
        let data = [0xFF, 0xFF, 0xFF, 0xFF, 0x01, 0xE0, 0x02, 0x80];
        let frame = Rect::read_frame(&mut PictStreamReader::new(&data)).unwrap();
        assert_eq!(frame, Rect::new(0, 0, 480, 640));
        assert_eq!((frame.width(), frame.height()), (640, 480));
    }

    #[test]
    fn test_extreme_rect_does_not_overflow() {
        let rect = Rect::new(i16::MIN, i16::MIN, i16::MAX, i16::MAX);
        assert_eq!(rect.width(), 65535);
    }

    #[test]
    fn test_header_op_layout() {
        let header = HeaderOp::extended(Rect::new(0, 0, 480, 640));
        let mut buffer = [0u8; 32];
        let mut writer = PictStreamWriter::new(&mut buffer);
        header.write(&mut writer).unwrap();
        assert_eq!(writer.len(), 26);
        assert_eq!(&buffer[..4], &[0x0C, 0x00, 0xFF, 0xFE]);

        let mut reader = PictStreamReader::new(&buffer[2..26]);
        assert_eq!(HeaderOp::read(&mut reader).unwrap(), header);
        assert!(reader.is_at_end());
    }

    #[test]
    fn test_pixmap_for_depth() {
        let pixmap = PixMap::for_depth(16, 20);
        assert!(pixmap.is_pixmap());
        assert_eq!(pixmap.row_byte_count(), 20);
        assert_eq!((pixmap.pixel_type, pixmap.cmp_size, pixmap.cmp_count), (16, 5, 3));
        assert_eq!(PixMap::for_depth(8, 4).pixel_type, 0);
        assert_eq!(PixMap::for_depth(32, 4).cmp_size, 8);
    }

    #[test]
    fn test_pixmap_write_read() {
        let mut pixmap = PixMap::for_depth(32, 40);
        pixmap.bounds = Rect::new(0, 0, 3, 10);
        pixmap.pack_type = 4;
        let mut buffer = [0u8; PixMap::SIZE];
        let mut writer = PictStreamWriter::new(&mut buffer);
        pixmap.write(&mut writer).unwrap();
        assert_eq!(writer.len(), PixMap::SIZE);
        let decoded = PixMap::read(&mut PictStreamReader::new(&buffer)).unwrap();
        assert_eq!(decoded, pixmap);
    }
}
