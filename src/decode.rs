//! Tile assembly: walks the block grid of an image and writes every decoded
//! 4x4 tile into a [`PixelImage`].
//!
//! Blocks are stored row-major, `ceil(width / 4)` blocks per row. Tiles on the
//! right and bottom edges are clipped to the image; nothing outside
//! `[0, width) x [0, height)` is ever written.
//!
//! All entry points validate dimensions, input length and destination size before
//! the first block is decoded, and abort on the first failing block.

mod block;

pub use self::block::{decode_block_bc1, decode_block_bc3, Tile, TILE_PIXELS};

use crate::buffer::{PixelImage, RgbaBuffer, RgbaView};
use crate::dds::{split_header, DdsHeader};
use crate::error::DecodeError;
use crate::settings::DecodeSettings;
use crate::CompressionVariant;

trait BlockDecoder {
    fn decode_block(compressed: &[u8], settings: &DecodeSettings) -> Result<Tile, DecodeError>;
    fn block_byte_size() -> usize;
}

struct BC1Decoder;
struct BC3Decoder;

impl BlockDecoder for BC1Decoder {
    #[inline(always)]
    fn decode_block(compressed: &[u8], settings: &DecodeSettings) -> Result<Tile, DecodeError> {
        decode_block_bc1(compressed, settings)
    }

    fn block_byte_size() -> usize {
        CompressionVariant::BC1.block_byte_size() as usize
    }
}

impl BlockDecoder for BC3Decoder {
    #[inline(always)]
    fn decode_block(compressed: &[u8], _settings: &DecodeSettings) -> Result<Tile, DecodeError> {
        decode_block_bc3(compressed)
    }

    fn block_byte_size() -> usize {
        CompressionVariant::BC3.block_byte_size() as usize
    }
}

/// Checks the dimensions and returns the input slice covering exactly the block grid.
fn block_data(
    variant: CompressionVariant,
    width: u32,
    height: u32,
    input_bitstream: &[u8],
) -> Result<&[u8], DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }

    let expected = variant
        .blocks_byte_size(width, height)
        .ok_or(DecodeError::InvalidDimensions { width, height })?;
    input_bitstream
        .get(..expected)
        .ok_or(DecodeError::TruncatedInput {
            expected,
            actual: input_bitstream.len(),
        })
}

/// Decodes one row of blocks.
///
/// Tile pixels are written at `(block_x * 4 + column, origin_y + row)` and
/// skipped if they fall outside `clip_width` x `clip_height`.
#[inline(always)]
fn decompress_block_row<D: BlockDecoder, I: PixelImage + ?Sized>(
    block_row: &[u8],
    origin_y: u32,
    clip_width: u32,
    clip_height: u32,
    settings: &DecodeSettings,
    target: &mut I,
) -> Result<(), DecodeError> {
    for (block_x, compressed) in block_row.chunks(D::block_byte_size()).enumerate() {
        let tile = D::decode_block(compressed, settings)?;
        let origin_x = block_x as u32 * 4;

        for (index, &color) in tile.iter().enumerate() {
            let x = origin_x + (index % 4) as u32;
            let y = origin_y + (index / 4) as u32;

            if x < clip_width && y < clip_height {
                target.set_pixel(x, y, color);
            }
        }
    }

    Ok(())
}

fn decompress<D: BlockDecoder, I: PixelImage + ?Sized>(
    width: u32,
    height: u32,
    blocks: &[u8],
    settings: &DecodeSettings,
    target: &mut I,
) -> Result<(), DecodeError> {
    let blocks_x = width.div_ceil(4) as usize;
    let row_pitch = blocks_x * D::block_byte_size();

    for (block_y, block_row) in blocks.chunks(row_pitch).enumerate() {
        decompress_block_row::<D, I>(
            block_row,
            block_y as u32 * 4,
            width,
            height,
            settings,
            target,
        )?;
    }

    Ok(())
}

/// Decodes `input_bitstream` into `target`, using the target's width and height
/// as the image dimensions.
///
/// Bytes after the last block are ignored.
pub fn decompress_into<I: PixelImage + ?Sized>(
    variant: CompressionVariant,
    input_bitstream: &[u8],
    target: &mut I,
    settings: &DecodeSettings,
) -> Result<(), DecodeError> {
    let (width, height) = (target.width(), target.height());
    let blocks = block_data(variant, width, height, input_bitstream)?;

    tracing::debug!(
        variant = variant.name(),
        width,
        height,
        input_len = input_bitstream.len(),
        "decompressing blocks"
    );

    match variant {
        CompressionVariant::BC1 => {
            decompress::<BC1Decoder, I>(width, height, blocks, settings, target)
        }
        CompressionVariant::BC3 => {
            decompress::<BC3Decoder, I>(width, height, blocks, settings, target)
        }
    }
}

/// Decodes `input_bitstream` into a tightly packed RGBA8 slice of `width * height * 4` bytes.
pub fn decompress_blocks(
    variant: CompressionVariant,
    width: u32,
    height: u32,
    input_bitstream: &[u8],
    output_bitstream: &mut [u8],
) -> Result<(), DecodeError> {
    decompress_blocks_with_settings(
        variant,
        width,
        height,
        input_bitstream,
        output_bitstream,
        &DecodeSettings::default(),
    )
}

/// Same as [`decompress_blocks`], with explicit settings.
pub fn decompress_blocks_with_settings(
    variant: CompressionVariant,
    width: u32,
    height: u32,
    input_bitstream: &[u8],
    output_bitstream: &mut [u8],
    settings: &DecodeSettings,
) -> Result<(), DecodeError> {
    let mut view = RgbaView::packed(output_bitstream, width, height)?;
    decompress_into(variant, input_bitstream, &mut view, settings)
}

/// Decodes `input_bitstream` into a newly allocated image.
///
/// The input is validated against `width` and `height` before the image is allocated.
pub fn decompress_image(
    variant: CompressionVariant,
    width: u32,
    height: u32,
    input_bitstream: &[u8],
) -> Result<RgbaBuffer, DecodeError> {
    block_data(variant, width, height, input_bitstream)?;

    let mut image = RgbaBuffer::new(width, height)?;
    image.decompress(variant, input_bitstream)?;
    Ok(image)
}

/// Validates the 128 byte DDS header at the start of `data` and decodes the payload after it.
///
/// The header's declared dimensions are returned as metadata but not used;
/// `width` and `height` determine the block grid.
pub fn decompress_with_header(
    variant: CompressionVariant,
    width: u32,
    height: u32,
    data: &[u8],
) -> Result<(DdsHeader, RgbaBuffer), DecodeError> {
    let (header, payload) = split_header(data)?;

    if header.width != width || header.height != height {
        tracing::warn!(
            header_width = header.width,
            header_height = header.height,
            width,
            height,
            "dds header dimensions differ from the requested dimensions"
        );
    }

    let image = decompress_image(variant, width, height, payload)?;
    Ok((header, image))
}

impl RgbaBuffer {
    /// Decodes `input_bitstream` into this image, using its dimensions.
    pub fn decompress(
        &mut self,
        variant: CompressionVariant,
        input_bitstream: &[u8],
    ) -> Result<(), DecodeError> {
        decompress_into(variant, input_bitstream, self, &DecodeSettings::default())
    }
}

/// Decodes `input_bitstream` into `target`, one band of block rows per rayon task.
///
/// Produces the same result as [`decompress_into`]. If several blocks are
/// malformed, which of their errors is reported is unspecified.
#[cfg(feature = "rayon")]
#[cfg_attr(docsrs, doc(cfg(feature = "rayon")))]
pub fn decompress_par(
    variant: CompressionVariant,
    input_bitstream: &[u8],
    target: RgbaView<'_>,
    settings: &DecodeSettings,
) -> Result<(), DecodeError> {
    let (width, height) = (target.width(), target.height());
    let blocks = block_data(variant, width, height, input_bitstream)?;

    tracing::debug!(
        variant = variant.name(),
        width,
        height,
        input_len = input_bitstream.len(),
        "decompressing blocks in parallel"
    );

    match variant {
        CompressionVariant::BC1 => {
            decompress_bands::<BC1Decoder>(width, blocks, settings, target)
        }
        CompressionVariant::BC3 => {
            decompress_bands::<BC3Decoder>(width, blocks, settings, target)
        }
    }
}

/// Parallel counterpart of [`decompress_image`].
#[cfg(feature = "rayon")]
#[cfg_attr(docsrs, doc(cfg(feature = "rayon")))]
pub fn decompress_image_par(
    variant: CompressionVariant,
    width: u32,
    height: u32,
    input_bitstream: &[u8],
    settings: &DecodeSettings,
) -> Result<RgbaBuffer, DecodeError> {
    block_data(variant, width, height, input_bitstream)?;

    let mut image = RgbaBuffer::new(width, height)?;
    decompress_par(variant, input_bitstream, image.as_view_mut(), settings)?;
    Ok(image)
}

#[cfg(feature = "rayon")]
fn decompress_bands<D: BlockDecoder>(
    width: u32,
    blocks: &[u8],
    settings: &DecodeSettings,
    target: RgbaView<'_>,
) -> Result<(), DecodeError> {
    use rayon::prelude::*;

    let blocks_x = width.div_ceil(4) as usize;
    let row_pitch = blocks_x * D::block_byte_size();

    target
        .into_bands(4)
        .into_par_iter()
        .zip(blocks.par_chunks(row_pitch))
        .try_for_each(|(mut band, block_row)| {
            let band_height = band.height();
            decompress_block_row::<D, _>(block_row, 0, width, band_height, settings, &mut band)
        })
}
