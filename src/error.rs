use crate::four_cc::FourCC;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PictError {
    #[error("Unexpected end of PICT data")]
    UnexpectedEndOfData,
    #[error("Unimplemented opcode {0:#06x}")]
    UnimplementedOpcode(u16),
    #[error("PICT contains banded JPEG")]
    BandedJpeg,
    #[error("Unsupported QuickTime compression codec {0}")]
    UnsupportedCodec(FourCC),
    #[error("Color table has {0} bytes, expected 1542")]
    InvalidColorTableSize(usize),
    #[error("Unsupported raw raster depth {0}")]
    UnsupportedRawDepth(i16),
    #[error("Unsupported pixel size {0}")]
    UnsupportedPixelSize(u16),
    #[error("Unsupported pack type {pack_type} for {pixel_size}-bit pixels")]
    UnsupportedPackType { pack_type: u16, pixel_size: u16 },
    #[error("Color index {0} is not in the color table")]
    ColorIndexOutOfRange(usize),
    #[error("Pixel {0} lies outside the decoded scan line")]
    PixelOutOfRange(i32),
    #[error("Invalid length field")]
    InvalidLength,
    #[error("Unsupported resource type {0}")]
    UnsupportedResourceType(FourCC),
    #[error("Opcode limit of {0} exceeded")]
    TooManyOpcodes(usize),
    #[error("Canvas of {width}x{height} exceeds the pixel limit")]
    CanvasTooLarge { width: u32, height: u32 },
    #[error("Destination too small")]
    DestinationTooSmall,
    #[error("Packed row does not fit its length prefix")]
    RowTooLong,
}

impl PictError {
    /// True when the input ran out before a read could complete.
    pub fn is_truncation(&self) -> bool {
        matches!(self, Self::UnexpectedEndOfData)
    }
}
