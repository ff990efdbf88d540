//! Width and height of a JPEG stream without decoding it.

use crate::error::PictError;
use crate::jpeg_marker_code::{JPEG_MARKER_START_BYTE, JpegMarkerCode, is_start_of_frame};
use crate::pict_stream_reader::PictStreamReader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegDimensions {
    pub width: u16,
    pub height: u16,
}

/// Walks marker segments up to the first frame header.
///
/// Returns `None` when the data is not a JPEG, is truncated, or reaches the
/// end of image or start of scan before any frame header.
pub fn jpeg_dimensions(data: &[u8]) -> Option<JpegDimensions> {
    scan_for_frame(&mut PictStreamReader::new(data)).ok().flatten()
}

fn scan_for_frame(reader: &mut PictStreamReader) -> Result<Option<JpegDimensions>, PictError> {
    let start_of_image = u16::from_be_bytes([JPEG_MARKER_START_BYTE, JpegMarkerCode::StartOfImage.into()]);
    if reader.read_u16()? != start_of_image {
        return Ok(None);
    }

    while !reader.is_at_end() {
        // anything up to the marker prefix, then any fill bytes
        let mut c = reader.read_u8()?;
        while c != JPEG_MARKER_START_BYTE {
            c = reader.read_u8()?;
        }
        while c == JPEG_MARKER_START_BYTE {
            c = reader.read_u8()?;
        }

        match JpegMarkerCode::try_from(c) {
            Ok(JpegMarkerCode::EndOfImage | JpegMarkerCode::StartOfScan) => return Ok(None),
            _ if is_start_of_frame(c) => {
                let _length = reader.read_u16()?;
                let _precision = reader.read_u8()?;
                let height = reader.read_u16()?;
                let width = reader.read_u16()?;
                return Ok(Some(JpegDimensions { width, height }));
            }
            _ => {
                let length = usize::from(reader.read_u16()?);
                if length < 2 {
                    return Ok(None);
                }
                reader.skip(length - 2)?;
            }
        }
    }
    Ok(None)
}
