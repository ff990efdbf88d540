//! Indexed color tables and 16-bit direct color conversion.

use crate::error::PictError;
use crate::pict_stream_reader::PictStreamReader;

pub type Rgb = [u8; 3];

/// Set in a color table's flags when entries are numbered by position.
pub const DEVICE_FLAG: u16 = 0x8000;

/// Size of an external `clut` resource: 6-byte header plus 256 RGB triples.
pub const RAW_CLUT_SIZE: usize = 6 + 256 * 6;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColorTable {
    entries: Vec<Option<Rgb>>,
}

impl ColorTable {
    /// QuickDraw's implicit palette for plain 1-bit bitmaps.
    pub fn monochrome() -> Self {
        Self {
            entries: vec![Some([0xFF, 0xFF, 0xFF]), Some([0x00, 0x00, 0x00])],
        }
    }

    /// Reads an in-stream color table: seed, flags, count-1 and entries of
    /// (index, red, green, blue) 16-bit values.
    pub fn read(reader: &mut PictStreamReader) -> Result<Self, PictError> {
        reader.skip(4)?; // ctSeed
        let flags = reader.read_u16()?;
        let count = usize::from(reader.read_u16()?) + 1;

        let mut table = Self::default();
        for i in 0..count {
            let stored = reader.read_u16()?;
            let red = reader.read_u16()?;
            let green = reader.read_u16()?;
            let blue = reader.read_u16()?;
            let index = if flags & DEVICE_FLAG != 0 {
                i
            } else {
                usize::from(stored & 0xFF)
            };
            table.set(index, [channel(red), channel(green), channel(blue)]);
        }
        Ok(table)
    }

    /// Reads an external `clut` resource of exactly 256 entries.
    pub fn read_raw_clut(clut: &[u8]) -> Result<Self, PictError> {
        if clut.len() != RAW_CLUT_SIZE {
            return Err(PictError::InvalidColorTableSize(clut.len()));
        }
        let mut reader = PictStreamReader::new(clut);
        reader.skip(6)?;
        let mut table = Self::default();
        for i in 0..256 {
            let red = reader.read_u16()?;
            let green = reader.read_u16()?;
            let blue = reader.read_u16()?;
            table.set(i, [channel(red), channel(green), channel(blue)]);
        }
        Ok(table)
    }

    pub fn set(&mut self, index: usize, color: Rgb) {
        if index >= self.entries.len() {
            self.entries.resize(index + 1, None);
        }
        self.entries[index] = Some(color);
    }

    pub fn lookup(&self, index: usize) -> Result<Rgb, PictError> {
        self.entries
            .get(index)
            .copied()
            .flatten()
            .ok_or(PictError::ColorIndexOutOfRange(index))
    }

    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|e| e.is_none())
    }
}

/// Keeps the high byte of a 16-bit color channel.
pub fn channel(value: u16) -> u8 {
    (value >> 8) as u8
}

/// Scales a 5-bit channel to 8 bits with rounding.
pub fn scale_5bit(value: u16) -> u8 {
    ((u32::from(value & 0x1F) * 255 + 16) / 31) as u8
}

/// Converts an xRRRRRGGGGGBBBBB pixel to 8-bit RGB.
pub fn rgb555_to_rgb(pixel: u16) -> Rgb {
    [
        scale_5bit(pixel >> 10),
        scale_5bit(pixel >> 5),
        scale_5bit(pixel),
    ]
}

/// Converts 8-bit RGB to an xRRRRRGGGGGBBBBB pixel.
pub fn rgb_to_rgb555(rgb: Rgb) -> u16 {
    let [r, g, b] = rgb.map(|c| u16::from(c) >> 3);
    (r << 10) | (g << 5) | b
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_bytes(flags: u16, entries: &[(u16, u16, u16, u16)]) -> Vec<u8> {
        let mut data = vec![0, 0, 0, 0];
        data.extend_from_slice(&flags.to_be_bytes());
        data.extend_from_slice(&((entries.len() - 1) as u16).to_be_bytes());
        for &(index, r, g, b) in entries {
            for v in [index, r, g, b] {
                data.extend_from_slice(&v.to_be_bytes());
            }
        }
        data
    }

    #[test]
    fn test_scale_5bit() {
        assert_eq!(scale_5bit(31), 255);
        assert_eq!(scale_5bit(0), 0);
        assert_eq!(scale_5bit(16), 132);
    }

    #[test]
    fn test_rgb555_conversion() {
        assert_eq!(rgb555_to_rgb(0x7C00), [255, 0, 0]);
        assert_eq!(rgb555_to_rgb(0x03E0), [0, 255, 0]);
        assert_eq!(rgb555_to_rgb(0x801F), [0, 0, 255]);
        assert_eq!(rgb_to_rgb555([255, 255, 255]), 0x7FFF);
        assert_eq!(rgb555_to_rgb(rgb_to_rgb555([255, 0, 255])), [255, 0, 255]);
    }

    #[test]
    fn test_stored_index_is_masked() {
        let data = table_bytes(0, &[(0x0105, 0xFF00, 0, 0), (0x0000, 0, 0x1234, 0)]);
        let table = ColorTable::read(&mut PictStreamReader::new(&data)).unwrap();
        assert_eq!(table.lookup(5).unwrap(), [0xFF, 0, 0]);
        assert_eq!(table.lookup(0).unwrap(), [0, 0x12, 0]);
        assert_eq!(table.lookup(1), Err(PictError::ColorIndexOutOfRange(1)));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_device_flag_renumbers() {
        let data = table_bytes(DEVICE_FLAG, &[(7, 0x8000, 0, 0), (7, 0, 0x8000, 0)]);
        let table = ColorTable::read(&mut PictStreamReader::new(&data)).unwrap();
        assert_eq!(table.lookup(0).unwrap(), [0x80, 0, 0]);
        assert_eq!(table.lookup(1).unwrap(), [0, 0x80, 0]);
        assert!(table.lookup(7).is_err());
    }

    #[test]
    fn test_raw_clut_size_is_checked() {
        assert_eq!(
            ColorTable::read_raw_clut(&[0u8; 10]),
            Err(PictError::InvalidColorTableSize(10))
        );
        let mut clut = vec![0u8; RAW_CLUT_SIZE];
        clut[6..12].copy_from_slice(&[0xAB, 0xCD, 0x12, 0x00, 0x00, 0xFF]);
        let table = ColorTable::read_raw_clut(&clut).unwrap();
        assert_eq!(table.lookup(0).unwrap(), [0xAB, 0x12, 0x00]);
        assert_eq!(table.len(), 256);
    }
}
