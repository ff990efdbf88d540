use pictexp_rs::{
    Bitmap, ColumnIndexing, DecodeOptions, DirectDepth, FourCC, PictDecoder, PictEncoder,
    PictError, decode_pict, decode_resource,
};

const BLACK: [u8; 4] = [0, 0, 0, 0xFF];

fn init_logging() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::max())
        .try_init();
}

/// Big-endian PICT stream builder.
struct Pict {
    data: Vec<u8>,
}

impl Pict {
    fn new(top: i16, left: i16, bottom: i16, right: i16) -> Self {
        Self { data: vec![0, 0] }.rect(top, left, bottom, right)
    }

    fn u16(mut self, value: u16) -> Self {
        self.data.extend_from_slice(&value.to_be_bytes());
        self
    }

    fn u32(mut self, value: u32) -> Self {
        self.data.extend_from_slice(&value.to_be_bytes());
        self
    }

    fn bytes(mut self, values: &[u8]) -> Self {
        self.data.extend_from_slice(values);
        self
    }

    fn rect(self, top: i16, left: i16, bottom: i16, right: i16) -> Self {
        self.u16(top as u16)
            .u16(left as u16)
            .u16(bottom as u16)
            .u16(right as u16)
    }

    fn version2(self) -> Self {
        self.u16(0x0011).u16(0x02FF)
    }

    fn header_op(self, width: i16, height: i16) -> Self {
        self.u16(0x0C00)
            .u16(0xFFFE)
            .u16(0)
            .u32(72 << 16)
            .u32(72 << 16)
            .rect(0, 0, height, width)
            .u32(0)
    }

    /// rowBytes through pmReserved, with the pixmap flag set.
    fn pixmap(self, row_bytes: u16, width: i16, pack_type: u16, pixel_size: u16) -> Self {
        let (pixel_type, cmp_count, cmp_size) = if pixel_size <= 8 {
            (0, 1, pixel_size)
        } else {
            (16, 3, if pixel_size == 16 { 5 } else { 8 })
        };
        self.u16(row_bytes | 0x8000)
            .rect(0, 0, 1, width)
            .u16(0)
            .u16(pack_type)
            .u32(0)
            .u32(72 << 16)
            .u32(72 << 16)
            .u16(pixel_type)
            .u16(pixel_size)
            .u16(cmp_count)
            .u16(cmp_size)
            .u32(0)
            .u32(0)
            .u32(0)
    }

    fn color_table(mut self, colors: &[[u16; 3]]) -> Self {
        self = self.u32(0).u16(0).u16(colors.len() as u16 - 1);
        for (i, [r, g, b]) in colors.iter().enumerate() {
            self = self.u16(i as u16).u16(*r).u16(*g).u16(*b);
        }
        self
    }

    fn align(mut self) -> Self {
        if self.data.len() % 2 == 1 {
            self.data.push(0);
        }
        self
    }

    fn end(self) -> Vec<u8> {
        self.u16(0x00FF).data
    }
}

fn eight_bit_picture() -> Vec<u8> {
    Pict::new(0, 0, 10, 10)
        .version2()
        .u16(0x0098)
        .pixmap(2, 2, 0, 8)
        .color_table(&[[0xFFFF, 0, 0], [0, 0xFFFF, 0]])
        .rect(0, 0, 1, 2)
        .rect(2, 3, 3, 5)
        .u16(0)
        .bytes(&[1, 0])
        .align()
        .end()
}

fn compressed_quicktime(codec: &[u8; 4]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&[0u8; 26]);
    body.extend_from_slice(&[0u8; 8]); // zero offsets
    body.extend_from_slice(&[0x40, 0, 0, 0]);
    body.extend_from_slice(&0u32.to_be_bytes());
    body.extend_from_slice(&[0u8; 22]);
    body.extend_from_slice(&0u32.to_be_bytes());
    body.extend_from_slice(&86u32.to_be_bytes());
    body.extend_from_slice(codec);
    body.extend_from_slice(&[0u8; 24]);
    body.extend_from_slice(&16u16.to_be_bytes());
    body.extend_from_slice(&8u16.to_be_bytes());
    body.extend_from_slice(&[0u8; 8]);
    body.extend_from_slice(&4u32.to_be_bytes());
    body.extend_from_slice(&[0u8; 38]);
    body.extend_from_slice(&[0xFF, 0xD8, 0xFF, 0xD9]);

    Pict::new(0, 0, 8, 16)
        .version2()
        .u16(0x8200)
        .u32(body.len() as u32)
        .bytes(&body)
        .align()
        .end()
}

#[test]
fn header_only_picture_is_all_background() {
    init_logging();
    let data = Pict::new(0, 0, 100, 200).version2().header_op(200, 100).end();
    let image = decode_pict(&data).unwrap();

    assert_eq!((image.bitmap.width(), image.bitmap.height()), (200, 100));
    assert!(image.bitmap.pixels().chunks_exact(4).all(|p| p == BLACK));
    assert_eq!(image.header.map(|h| h.version), Some(-2));
    assert!(!image.widened);
}

#[test]
fn unpacked_8bit_copy_bits_lands_at_destination() {
    init_logging();
    let image = decode_pict(&eight_bit_picture()).unwrap();
    let bitmap = &image.bitmap;

    assert_eq!((bitmap.width(), bitmap.height()), (10, 10));
    assert_eq!(bitmap.pixel(3, 2), Some([0, 0xFF, 0, 0xFF]));
    assert_eq!(bitmap.pixel(4, 2), Some([0xFF, 0, 0, 0xFF]));
    assert_eq!(bitmap.pixel(5, 2), Some(BLACK));
    assert_eq!(bitmap.pixel(3, 3), Some(BLACK));
}

#[test]
fn truncated_stream_fails_with_reason() {
    let data = eight_bit_picture();
    for cut in [1, 9, 13, 40, 70, data.len() - 2] {
        let error = decode_pict(&data[..cut]).unwrap_err();
        assert!(error.is_truncation(), "cut at {cut}: {error:?}");
        assert!(!error.to_string().is_empty());
    }
}

#[test]
fn quicktime_codec_must_be_jpeg() {
    let error = decode_pict(&compressed_quicktime(b"mjpg")).unwrap_err();
    assert_eq!(error, PictError::UnsupportedCodec(FourCC(*b"mjpg")));
    assert!(error.to_string().contains("mjpg"));

    let image = decode_pict(&compressed_quicktime(b"jpeg")).unwrap();
    assert_eq!(image.compressed_images.len(), 1);
    assert_eq!(
        (image.compressed_images[0].width, image.compressed_images[0].height),
        (16, 8)
    );
}

#[test]
fn raw_raster_requires_full_color_table() {
    let mut raw = Vec::new();
    for v in [0i16, 0, 1, 2, 8] {
        raw.extend_from_slice(&v.to_be_bytes());
    }
    raw.extend_from_slice(&[0, 1]);
    let options = DecodeOptions::default();

    assert_eq!(
        decode_resource(FourCC::RAW_PICT, &raw, Some(&[0u8; 10]), &options),
        Err(PictError::InvalidColorTableSize(10))
    );

    let mut clut = vec![0u8; 6 + 256 * 6];
    clut[6..12].copy_from_slice(&[0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC]);
    let bitmap = decode_resource(FourCC::RAW_PICT, &raw, Some(&clut), &options).unwrap();
    assert_eq!(bitmap.pixel(0, 0), Some([0x12, 0x56, 0x9A, 0xFF]));
    assert_eq!(bitmap.pixel(1, 0), Some([0, 0, 0, 0xFF]));
}

#[test]
fn reserved_opcode_skips_encoded_length() {
    let body = [0x00, 0x90, 0x00, 0x90, 0x00, 0x90];
    let data = Pict::new(0, 0, 4, 4).u16(0x0305).bytes(&body).end();
    assert!(decode_pict(&data).is_ok());

    let short = Pict::new(0, 0, 4, 4).u16(0x0305).bytes(&body[..4]).end();
    assert_eq!(decode_pict(&short).unwrap_err(), PictError::UnexpectedEndOfData);
}

#[test]
fn wide_source_widens_picture() {
    let pixels = [0x7C00u16, 0x03E0, 0x001F, 0x7FFF, 0x0000, 0x7C00];
    let mut pict = Pict::new(0, 0, 1, 4)
        .u16(0x009A)
        .u32(0xFF)
        .pixmap(12, 6, 1, 16)
        .rect(0, 0, 1, 6)
        .rect(0, 0, 1, 6)
        .u16(0);
    for p in pixels {
        pict = pict.u16(p);
    }
    let image = decode_pict(&pict.align().end()).unwrap();

    assert!(image.widened);
    assert_eq!((image.bitmap.width(), image.bitmap.height()), (6, 1));
    assert_eq!(image.bitmap.pixel(5, 0), Some([0xFF, 0, 0, 0xFF]));
}

#[test]
fn source_rect_indexing_reads_stored_bytes() {
    // 4-bit pixels 0 and 1 stored in one byte
    let data = Pict::new(0, 0, 1, 2)
        .u16(0x0098)
        .pixmap(2, 2, 0, 4)
        .color_table(&[[0, 0, 0xFFFF], [0xFFFF, 0xFFFF, 0xFFFF]])
        .rect(0, 0, 1, 2)
        .rect(0, 0, 1, 2)
        .u16(0)
        .bytes(&[0x01, 0x00])
        .align()
        .end();

    let expanded = decode_pict(&data).unwrap();
    assert_eq!(expanded.bitmap.pixel(0, 0), Some([0, 0, 0xFF, 0xFF]));
    assert_eq!(expanded.bitmap.pixel(1, 0), Some([0xFF, 0xFF, 0xFF, 0xFF]));

    let options = DecodeOptions {
        column_indexing: ColumnIndexing::SourceRect,
        ..DecodeOptions::default()
    };
    let source = PictDecoder::with_options(&data, options).decode().unwrap();
    assert_eq!(source.bitmap.pixel(0, 0), Some([0xFF, 0xFF, 0xFF, 0xFF]));
    assert_eq!(source.bitmap.pixel(1, 0), Some([0, 0, 0xFF, 0xFF]));
}

#[test]
fn encoder_output_decodes_to_same_pixels() {
    init_logging();
    let (width, height) = (33u32, 7u32);
    let mut pixels = Vec::new();
    for y in 0..height {
        for x in 0..width {
            let r = if x < 20 { 0xC8 } else { (x * 7) as u8 };
            pixels.extend_from_slice(&[r, (y * 30) as u8, 0x10, 0xFF]);
        }
    }
    let bitmap = Bitmap::from_rgba(width, height, pixels).unwrap();

    let encoded = PictEncoder::new(DirectDepth::ThirtyTwo).encode(&bitmap).unwrap();
    let image = decode_pict(&encoded).unwrap();
    assert_eq!(image.bitmap, bitmap);

    let encoded = PictEncoder::new(DirectDepth::Sixteen).encode(&bitmap).unwrap();
    let image = decode_pict(&encoded).unwrap();
    assert_eq!((image.bitmap.width(), image.bitmap.height()), (width, height));
}
