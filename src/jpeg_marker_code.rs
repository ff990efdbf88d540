use num_enum::{IntoPrimitive, TryFromPrimitive};

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum JpegMarkerCode {
    /// SOI: Marks the start of an image.
    StartOfImage = 0xD8,

    /// EOI: Marks the end of an image.
    EndOfImage = 0xD9,

    /// SOS: Marks the start of scan.
    StartOfScan = 0xDA,

    /// DHT: Defines Huffman tables; shares the SOF range without being a frame header.
    DefineHuffmanTable = 0xC4,

    /// JPG: Reserved for JPEG extensions.
    JpegExtension = 0xC8,

    /// DAC: Defines arithmetic coding conditioning.
    DefineArithmeticCoding = 0xCC,
}

pub const JPEG_MARKER_START_BYTE: u8 = 0xFF;

/// SOF0 through SOF15, excluding the DHT, JPG and DAC codes in that range.
pub fn is_start_of_frame(code: u8) -> bool {
    (0xC0..=0xCF).contains(&code)
        && !matches!(
            JpegMarkerCode::try_from(code),
            Ok(JpegMarkerCode::DefineHuffmanTable
                | JpegMarkerCode::JpegExtension
                | JpegMarkerCode::DefineArithmeticCoding)
        )
}
