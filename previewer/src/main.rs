use std::{fs, path::PathBuf, time::Instant};

use argh::FromArgs;
use dxt_decode::{
    dds::split_header, decode::decompress_image_par, CompressionVariant, DecodeSettings,
};
use image::RgbaImage;
use tracing::{info, Level};

/// Decodes a BC1 or BC3 texture and writes a PNG preview.
#[derive(FromArgs)]
struct Args {
    /// compression variant (bc1, bc3). Taken from the DDS header if omitted.
    #[argh(option)]
    format: Option<CompressionVariant>,

    /// image width in pixels. Taken from the DDS header if omitted.
    #[argh(option)]
    width: Option<u32>,

    /// image height in pixels. Taken from the DDS header if omitted.
    #[argh(option)]
    height: Option<u32>,

    /// the input holds only block data, without a DDS header
    #[argh(switch)]
    raw: bool,

    /// decode the fourth color of BC1 three-color blocks as transparent black
    #[argh(switch)]
    punch_through: bool,

    /// enable debug logging
    #[argh(switch, short = 'v')]
    verbose: bool,

    /// the input file
    #[argh(positional)]
    input: PathBuf,

    /// the output PNG. Defaults to the input path with a png extension.
    #[argh(positional)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = argh::from_env();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .init();

    let start = Instant::now();

    let data = fs::read(&args.input)?;

    info!(
        "Reading {} took: {:.3} ms",
        args.input.display(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    let (header, payload) = if args.raw {
        (None, data.as_slice())
    } else {
        let (header, payload) = split_header(&data)?;
        (Some(header), payload)
    };

    let variant = args
        .format
        .or_else(|| header.and_then(|header| header.variant()))
        .ok_or("unknown compression variant, pass --format")?;
    let width = args
        .width
        .or(header.map(|header| header.width))
        .ok_or("unknown image width, pass --width")?;
    let height = args
        .height
        .or(header.map(|header| header.height))
        .ok_or("unknown image height, pass --height")?;

    let settings = if args.punch_through {
        DecodeSettings::punch_through()
    } else {
        DecodeSettings::opaque()
    };

    let start = Instant::now();

    let image = decompress_image_par(variant, width, height, payload, &settings)?;

    info!(
        "Decoding {width}x{height} {variant} took: {:.3} ms",
        start.elapsed().as_secs_f64() * 1000.0
    );

    let output = args
        .output
        .unwrap_or_else(|| args.input.with_extension("png"));

    let start = Instant::now();

    RgbaImage::try_from(image)?.save(&output)?;

    info!(
        "PNG output to {} took: {:.3} ms",
        output.display(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(())
}
