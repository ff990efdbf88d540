//! QuickDraw PICT decoding for legacy resource archives.
//!
//! `PICT` resources go through the opcode loop in [`decoder`]; raw `pict`
//! rasters with a companion `clut` go through [`raw_raster`]. Both produce
//! an RGBA [`Bitmap`].

pub mod bitmap;
pub mod color_table;
pub mod copy_bits;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod four_cc;
pub mod jpeg_dimensions;
pub mod jpeg_marker_code;
pub mod packbits;
pub mod pict_opcode;
pub mod pict_stream_reader;
pub mod pict_stream_writer;
pub mod pixel_expansion;
pub mod quicktime;
pub mod raw_raster;
pub mod records;

#[cfg(feature = "ffi")]
pub mod ffi;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use bitmap::Bitmap;
pub use copy_bits::ColumnIndexing;
pub use decoder::{DecodeOptions, PictDecoder, PictImage, decode_pict};
pub use encoder::{DirectDepth, PictEncoder};
pub use error::PictError;
pub use four_cc::FourCC;
pub use jpeg_dimensions::{JpegDimensions, jpeg_dimensions};
pub use quicktime::CompressedImage;
pub use raw_raster::{RawRasterLoader, load_raw};
pub use records::{HeaderOp, PixMap, Rect};

/// Decodes an archive resource by its type code.
///
/// `clut` is the companion color table resource used by 8-bit raw rasters.
pub fn decode_resource(
    kind: FourCC,
    data: &[u8],
    clut: Option<&[u8]>,
    options: &DecodeOptions,
) -> Result<Bitmap, PictError> {
    match kind {
        FourCC::PICT => Ok(PictDecoder::with_options(data, *options).decode()?.bitmap),
        FourCC::RAW_PICT => RawRasterLoader::new(data, clut.unwrap_or_default())
            .with_pixel_limit(options.max_canvas_pixels)
            .load(),
        other => Err(PictError::UnsupportedResourceType(other)),
    }
}
