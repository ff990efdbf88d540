//! pictexp CLI - QuickDraw PICT resource utility.
//!
//! Decodes PICT and raw `pict` resources extracted from legacy archives,
//! and writes direct-color PICT files from raw RGBA pixels.

use clap::{Parser, Subcommand, ValueEnum};
use pictexp_rs::{
    Bitmap, ColumnIndexing, DecodeOptions, DirectDepth, FourCC, PictDecoder, PictEncoder,
    decode_resource, jpeg_dimensions,
};
use std::fs;
use std::path::PathBuf;

/// QuickDraw PICT decoder and encoder
#[derive(Parser)]
#[command(name = "pictexp")]
#[command(author = "pictexp-rs contributors")]
#[command(version)]
#[command(about = "Decode and encode QuickDraw PICT resources", long_about = None)]
#[command(after_help = "EXAMPLES:
    pictexp decode -i 128.PICT -o 128.ppm -f ppm
    pictexp decode -i 200.pict --clut 200.clut -k raw -o 200.rgba
    pictexp encode -i pixels.rgba -o out.pict -w 640 -H 480 -d 32
    pictexp info -i 128.PICT
    pictexp jpeg-size -i frame.jpg

Set RUST_LOG=debug to trace the opcode stream.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a PICT or raw pict resource to RGBA or PPM
    #[command(visible_alias = "d")]
    Decode {
        /// Input resource data
        #[arg(short, long, help = "Path to the resource file")]
        input: PathBuf,

        /// Output file path for decoded pixels
        #[arg(short, long, help = "Path for the output file")]
        output: PathBuf,

        /// Resource type of the input
        #[arg(short, long, default_value = "pict", value_enum)]
        kind: ResourceKind,

        /// Companion color table for 8-bit raw rasters
        #[arg(long)]
        clut: Option<PathBuf>,

        /// Output format: raw (RGBA) or ppm (Portable PixMap)
        #[arg(short, long, default_value = "raw", value_enum)]
        format: OutputFormat,

        /// Read 1, 2, 4 and 16 bit columns from src.left to src.right, as older decoders did
        #[arg(long)]
        source_rect_columns: bool,
    },

    /// Encode raw RGBA pixels as a PICT with one direct-color block
    #[command(visible_alias = "e")]
    Encode {
        /// Input raw RGBA pixel file
        #[arg(short, long, help = "Path to raw RGBA pixel data")]
        input: PathBuf,

        /// Output PICT file
        #[arg(short, long, help = "Path for the encoded output file")]
        output: PathBuf,

        /// Image width in pixels
        #[arg(short, long)]
        width: u32,

        /// Image height in pixels
        #[arg(short = 'H', long)]
        height: u32,

        /// Pixel depth of the emitted block
        #[arg(short, long, default_value = "32", value_enum)]
        depth: Depth,
    },

    /// Display frame, header and raster information of a PICT
    #[command(visible_alias = "i")]
    Info {
        /// Input file path
        #[arg(short, long, help = "Path to the PICT resource to inspect")]
        input: PathBuf,
    },

    /// Print the dimensions of a JPEG stream
    JpegSize {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Raw RGBA pixel data
    Raw,
    /// Portable PixMap (P6) format
    Ppm,
}

#[derive(Clone, ValueEnum)]
enum ResourceKind {
    /// Opcode stream ('PICT')
    Pict,
    /// Raw raster ('pict')
    Raw,
}

#[derive(Clone, ValueEnum)]
enum Depth {
    #[value(name = "16")]
    Sixteen,
    #[value(name = "32")]
    ThirtyTwo,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Decode {
            input,
            output,
            kind,
            clut,
            format,
            source_rect_columns,
        } => decode_image(&input, &output, &kind, clut.as_ref(), &format, source_rect_columns),
        Commands::Encode {
            input,
            output,
            width,
            height,
            depth,
        } => encode_image(&input, &output, width, height, &depth),
        Commands::Info { input } => show_info(&input),
        Commands::JpegSize { input } => show_jpeg_size(&input),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn decode_image(
    input: &PathBuf,
    output: &PathBuf,
    kind: &ResourceKind,
    clut: Option<&PathBuf>,
    format: &OutputFormat,
    source_rect_columns: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    let clut = clut.map(fs::read).transpose()?;

    let options = DecodeOptions {
        column_indexing: if source_rect_columns {
            ColumnIndexing::SourceRect
        } else {
            ColumnIndexing::Relative
        },
        ..DecodeOptions::default()
    };
    let kind = match kind {
        ResourceKind::Pict => FourCC::PICT,
        ResourceKind::Raw => FourCC::RAW_PICT,
    };
    let bitmap = decode_resource(kind, &data, clut.as_deref(), &options)?;

    match format {
        OutputFormat::Raw => fs::write(output, bitmap.pixels())?,
        OutputFormat::Ppm => write_ppm(output, &bitmap)?,
    }

    println!(
        "Decoded {} {}x{} image to {:?}",
        kind,
        bitmap.width(),
        bitmap.height(),
        output
    );
    Ok(())
}

fn encode_image(
    input: &PathBuf,
    output: &PathBuf,
    width: u32,
    height: u32,
    depth: &Depth,
) -> Result<(), Box<dyn std::error::Error>> {
    let pixels = fs::read(input)?;
    let bitmap = Bitmap::from_rgba(width, height, pixels)?;

    let depth = match depth {
        Depth::Sixteen => DirectDepth::Sixteen,
        Depth::ThirtyTwo => DirectDepth::ThirtyTwo,
    };
    let encoded = PictEncoder::new(depth).encode(&bitmap)?;
    fs::write(output, &encoded)?;

    println!("Encoded {}x{} image ({} bytes) to {:?}", width, height, encoded.len(), output);
    Ok(())
}

fn show_info(input: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;

    println!("File: {:?}", input);
    println!("Size: {} bytes", data.len());
    println!();

    match PictDecoder::new(&data).decode() {
        Ok(image) => {
            let frame = image.frame;
            println!(
                "  Frame:      ({}, {}) - ({}, {})",
                frame.left, frame.top, frame.right, frame.bottom
            );
            if let Some(header) = &image.header {
                println!("  Header:     version {}", header.version);
                println!(
                    "  Resolution: {}x{} dpi",
                    header.h_res >> 16,
                    header.v_res >> 16
                );
            }
            println!("  Dimensions: {}x{}", image.bitmap.width(), image.bitmap.height());
            if image.widened {
                println!("  Widened:    yes");
            }
            for compressed in &image.compressed_images {
                println!(
                    "  QuickTime:  {} {}x{}, {} bytes",
                    compressed.codec, compressed.width, compressed.height, compressed.data_size
                );
            }
            println!("  Status:     ok");
        }
        Err(e) => {
            println!("  Status:     failed ({})", e);
        }
    }

    Ok(())
}

fn show_jpeg_size(input: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    match jpeg_dimensions(&data) {
        Some(dimensions) => println!("{}x{}", dimensions.width, dimensions.height),
        None => return Err("no JPEG frame header found".into()),
    }
    Ok(())
}

fn write_ppm(path: &PathBuf, bitmap: &Bitmap) -> Result<(), Box<dyn std::error::Error>> {
    use std::io::Write;
    let mut file = fs::File::create(path)?;

    writeln!(file, "P6")?;
    writeln!(file, "{} {}", bitmap.width(), bitmap.height())?;
    writeln!(file, "255")?;
    file.write_all(&bitmap.to_rgb())?;

    Ok(())
}
