//! Compressed QuickTime image opcode (0x8200).
//!
//! Only the wrapper is parsed: the transform must be unbanded and the
//! codec must be `jpeg`. The compressed payload is located but not decoded;
//! callers that want pixels hand [`CompressedImage::data`] to a JPEG
//! decoder of their choice.

use crate::error::PictError;
use crate::four_cc::FourCC;
use crate::pict_stream_reader::PictStreamReader;
use log::debug;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedImage {
    pub codec: FourCC,
    pub width: u16,
    pub height: u16,
    pub data_size: u32,
    /// Byte range of the compressed payload within the PICT resource, when
    /// it lies inside the opcode.
    pub data: Option<Range<usize>>,
}

/// Parses one compressed-image opcode body and leaves the reader at its end.
pub fn read_compressed_image(reader: &mut PictStreamReader) -> Result<CompressedImage, PictError> {
    let mut opcode_size = reader.read_u32()? as usize;
    if opcode_size & 1 == 1 {
        opcode_size += 1;
    }
    let opcode_start = reader.position();
    let opcode_end = opcode_start
        .checked_add(opcode_size)
        .ok_or(PictError::InvalidLength)?;

    reader.skip(26)?; // version and homogeneous part of the matrix
    let offset_x = reader.read_i16()?;
    reader.skip(2)?;
    let offset_y = reader.read_i16()?;
    reader.skip(2)?;
    reader.skip(4)?; // rest of matrix
    if offset_x != 0 || offset_y != 0 {
        return Err(PictError::BandedJpeg);
    }

    let matte_size = reader.read_u32()? as usize;
    reader.skip(22)?; // matte rect, mode, source rect, accuracy
    let mask_size = reader.read_u32()? as usize;

    if matte_size != 0 {
        let matte_id_size = reader.read_u32()? as usize;
        reader.skip(matte_id_size.checked_sub(4).ok_or(PictError::InvalidLength)?)?;
    }
    reader.skip(matte_size)?;
    reader.skip(mask_size)?;

    let description_start = reader.position();
    let id_size = reader.read_u32()? as usize;
    let codec = FourCC::from_u32(reader.read_u32()?);
    if codec != FourCC::JPEG {
        return Err(PictError::UnsupportedCodec(codec));
    }

    reader.skip(24)?; // reserved, data ref, version, revision, vendor, quality
    let width = reader.read_u16()?;
    let height = reader.read_u16()?;
    reader.skip(8)?; // resolution
    let data_size = reader.read_u32()?;
    reader.skip(38)?; // frame count, name, depth, clut id

    let data = description_start
        .checked_add(id_size)
        .and_then(|start| Some(start..start.checked_add(data_size as usize)?))
        .filter(|range| range.start >= reader.position() && range.end <= opcode_end);

    debug!("quicktime {codec} {width}x{height}, {data_size} bytes of image data");

    let remaining = opcode_end
        .checked_sub(reader.position())
        .ok_or(PictError::InvalidLength)?;
    reader.skip(remaining)?;

    Ok(CompressedImage {
        codec,
        width,
        height,
        data_size,
        data,
    })
}
