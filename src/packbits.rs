//! PackBits run-length coding of a single scan line.
//!
//! A packed row is a byte count (8-bit when the row is at most 250 bytes,
//! 16-bit otherwise) followed by groups of a signed control byte and data:
//! `c < 0` repeats the next element `1 - c` times, `c >= 0` copies the next
//! `c + 1` elements and `-128` is ignored. Elements are bytes or big-endian
//! words depending on the pixel depth.

use crate::error::PictError;
use crate::pict_stream_reader::PictStreamReader;
use crate::pict_stream_writer::PictStreamWriter;

/// Rows wider than this carry a 16-bit byte count.
pub const SHORT_ROW_LIMIT: usize = 250;

const MAX_GROUP: usize = 128;

pub trait ScanlineElement: Copy + PartialEq {
    const SIZE: usize;
    fn read(reader: &mut PictStreamReader) -> Result<Self, PictError>;
    fn write(self, writer: &mut PictStreamWriter) -> Result<(), PictError>;
}

impl ScanlineElement for u8 {
    const SIZE: usize = 1;

    fn read(reader: &mut PictStreamReader) -> Result<Self, PictError> {
        reader.read_u8()
    }

    fn write(self, writer: &mut PictStreamWriter) -> Result<(), PictError> {
        writer.write_byte(self)
    }
}

impl ScanlineElement for u16 {
    const SIZE: usize = 2;

    fn read(reader: &mut PictStreamReader) -> Result<Self, PictError> {
        reader.read_u16()
    }

    fn write(self, writer: &mut PictStreamWriter) -> Result<(), PictError> {
        writer.write_u16(self)
    }
}

/// Reads one length-prefixed packed row and expands it.
///
/// Decoding never reads past the byte count given by the prefix; a group
/// that would cross it fails with `UnexpectedEndOfData`.
pub fn unpack_row<T: ScanlineElement>(
    reader: &mut PictStreamReader,
    row_bytes: usize,
) -> Result<Vec<T>, PictError> {
    let length = if row_bytes > SHORT_ROW_LIMIT {
        usize::from(reader.read_u16()?)
    } else {
        usize::from(reader.read_u8()?)
    };

    let mut packed = reader.sub_reader(length)?;
    let mut result = Vec::with_capacity(row_bytes / T::SIZE);
    while !packed.is_at_end() {
        let c = packed.read_i8()?;
        if c == i8::MIN {
            continue;
        }
        if c < 0 {
            let count = (1 - i32::from(c)) as usize;
            let data = T::read(&mut packed)?;
            result.extend(std::iter::repeat_n(data, count));
        } else {
            for _ in 0..=c {
                result.push(T::read(&mut packed)?);
            }
        }
    }
    Ok(result)
}

/// Packs a scan line into run-length groups without the byte count prefix.
///
/// Three equal elements in a row start a repeat run; repeat and literal
/// runs are each capped at 128 elements.
pub fn pack_row<T: ScanlineElement>(scan_line: &[T]) -> Result<Vec<u8>, PictError> {
    if scan_line.is_empty() {
        return Ok(Vec::new());
    }
    let mut dest = vec![0u8; packed_size_bound::<T>(scan_line.len())];
    let mut writer = PictStreamWriter::new(&mut dest);

    let n = scan_line.len();
    let mut run = 0;
    let mut start = 0;
    let mut end = 1;

    while end != n {
        if scan_line[end] != scan_line[end - 1] {
            run = end;
        }
        end += 1;
        if end - run == 3 {
            if run > start {
                write_literal(&mut writer, &scan_line[start..run])?;
            }
            while end != n && scan_line[end] == scan_line[end - 1] && end - run < MAX_GROUP {
                end += 1;
            }
            let control = 1 - (end - run) as i32;
            writer.write_byte(control as i8 as u8)?;
            scan_line[run].write(&mut writer)?;
            run = end;
            start = end;
        } else if end - start == MAX_GROUP {
            write_literal(&mut writer, &scan_line[start..end])?;
            run = end;
            start = end;
        }
    }
    if end > start {
        write_literal(&mut writer, &scan_line[start..end])?;
    }

    let len = writer.len();
    dest.truncate(len);
    Ok(dest)
}

/// Writes a packed row with the byte count prefix `unpack_row` expects.
pub fn write_packed_row<T: ScanlineElement>(
    writer: &mut PictStreamWriter,
    scan_line: &[T],
    row_bytes: usize,
) -> Result<(), PictError> {
    let packed = pack_row(scan_line)?;
    if row_bytes > SHORT_ROW_LIMIT {
        let length = u16::try_from(packed.len()).map_err(|_| PictError::RowTooLong)?;
        writer.write_u16(length)?;
    } else {
        let length = u8::try_from(packed.len()).map_err(|_| PictError::RowTooLong)?;
        writer.write_byte(length)?;
    }
    writer.write_bytes(&packed)
}

/// Upper bound on the packed size of `count` elements.
pub fn packed_size_bound<T: ScanlineElement>(count: usize) -> usize {
    count * T::SIZE + count.div_ceil(MAX_GROUP) + count / 3 + 1
}

fn write_literal<T: ScanlineElement>(
    writer: &mut PictStreamWriter,
    elements: &[T],
) -> Result<(), PictError> {
    writer.write_byte((elements.len() - 1) as u8)?;
    for &element in elements {
        element.write(writer)?;
    }
    Ok(())
}
