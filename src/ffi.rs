//! C Foreign Function Interface for pictexp-rs.
//!
//! This module provides C-compatible functions with opaque handles
//! for use from C/C++ projects.

use crate::{Bitmap, DecodeOptions, FourCC, PictError, decode_resource};
use std::os::raw::{c_int, c_uchar};
use std::ptr;

/// Opaque decoder handle.
#[repr(C)]
pub struct PictExpDecoder {
    _private: [u8; 0],
}

/// Image information structure.
#[repr(C)]
pub struct PictExpImageInfo {
    pub width: u32,
    pub height: u32,
}

/// Error codes.
#[repr(C)]
pub enum PictExpError {
    Ok = 0,
    InvalidData = 1,
    BufferTooSmall = 2,
    UnsupportedFormat = 3,
    Truncated = 4,
}

impl From<&PictError> for PictExpError {
    fn from(error: &PictError) -> Self {
        match error {
            PictError::UnexpectedEndOfData => PictExpError::Truncated,
            PictError::UnimplementedOpcode(_)
            | PictError::BandedJpeg
            | PictError::UnsupportedCodec(_)
            | PictError::UnsupportedRawDepth(_)
            | PictError::UnsupportedPixelSize(_)
            | PictError::UnsupportedPackType { .. }
            | PictError::UnsupportedResourceType(_) => PictExpError::UnsupportedFormat,
            _ => PictExpError::InvalidData,
        }
    }
}

/// Internal decoder state.
struct DecoderState {
    kind: FourCC,
    data: Vec<u8>,
    clut: Option<Vec<u8>>,
    bitmap: Option<Bitmap>,
}

/// Create a new decoder for a resource of type `kind` (a big-endian
/// four-character code such as 'PICT' or 'pict').
///
/// # Safety
/// `data` must be a valid pointer to `len` bytes. `clut` may be null;
/// otherwise it must point to `clut_len` bytes.
#[unsafe(no_mangle)]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub unsafe extern "C" fn pictexp_decoder_new(
    kind: u32,
    data: *const c_uchar,
    len: usize,
    clut: *const c_uchar,
    clut_len: usize,
) -> *mut PictExpDecoder {
    if data.is_null() || len == 0 {
        return ptr::null_mut();
    }

    let slice = unsafe { std::slice::from_raw_parts(data, len) };
    let clut = (!clut.is_null()).then(|| unsafe { std::slice::from_raw_parts(clut, clut_len) }.to_vec());
    let state = Box::new(DecoderState {
        kind: FourCC::from_u32(kind),
        data: slice.to_vec(),
        clut,
        bitmap: None,
    });

    Box::into_raw(state) as *mut PictExpDecoder
}

/// Free a decoder handle.
///
/// # Safety
/// `decoder` must be a valid handle from `pictexp_decoder_new`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pictexp_decoder_free(decoder: *mut PictExpDecoder) {
    if !decoder.is_null() {
        let _ = unsafe { Box::from_raw(decoder as *mut DecoderState) };
    }
}

/// Decode the resource and report its dimensions.
///
/// # Safety
/// `decoder` must be valid. `info` must point to a valid PictExpImageInfo.
#[unsafe(no_mangle)]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub unsafe extern "C" fn pictexp_decoder_read_header(
    decoder: *mut PictExpDecoder,
    info: *mut PictExpImageInfo,
) -> c_int {
    if decoder.is_null() || info.is_null() {
        return PictExpError::InvalidData as c_int;
    }

    let state = unsafe { &mut *(decoder as *mut DecoderState) };
    if state.bitmap.is_none() {
        match decode_resource(
            state.kind,
            &state.data,
            state.clut.as_deref(),
            &DecodeOptions::default(),
        ) {
            Ok(bitmap) => state.bitmap = Some(bitmap),
            Err(e) => {
                log::debug!("ffi decode failed: {e}");
                return PictExpError::from(&e) as c_int;
            }
        }
    }

    let Some(bitmap) = &state.bitmap else {
        return PictExpError::InvalidData as c_int;
    };
    unsafe {
        (*info).width = bitmap.width();
        (*info).height = bitmap.height();
    }
    PictExpError::Ok as c_int
}

/// Copy the decoded RGBA pixels into `output`.
///
/// # Safety
/// `decoder` must be valid and `pictexp_decoder_read_header` must have
/// succeeded. `output` must point to `output_len` writable bytes.
#[unsafe(no_mangle)]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub unsafe extern "C" fn pictexp_decoder_decode(
    decoder: *mut PictExpDecoder,
    output: *mut c_uchar,
    output_len: usize,
) -> c_int {
    if decoder.is_null() || output.is_null() {
        return PictExpError::InvalidData as c_int;
    }

    let state = unsafe { &*(decoder as *mut DecoderState) };
    let Some(bitmap) = &state.bitmap else {
        return PictExpError::InvalidData as c_int;
    };

    let pixels = bitmap.pixels();
    if output_len < pixels.len() {
        return PictExpError::BufferTooSmall as c_int;
    }
    let output_slice = unsafe { std::slice::from_raw_parts_mut(output, pixels.len()) };
    output_slice.copy_from_slice(pixels);

    PictExpError::Ok as c_int
}
