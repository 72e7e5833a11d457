//! Single block decoders.
//!
//! Each decoder turns one compressed block into the 16 pixels of a 4x4 tile,
//! stored row-major (`pixel index = row * 4 + column`).

use crate::color::{expand_565, Rgba8};
use crate::error::DecodeError;
use crate::settings::{Bc1AlphaMode, DecodeSettings};

/// Number of pixels in a decoded tile.
pub const TILE_PIXELS: usize = 16;

/// Decoded pixels of one 4x4 tile, row-major.
pub type Tile = [Rgba8; TILE_PIXELS];

/// Decodes a BC1 block by reading 8 bytes from `compressed_block`.
///
/// If the first endpoint is numerically greater than the second, the block uses
/// the four-color ramp. Otherwise it uses the three-color ramp, whose last entry
/// is black. With [`Bc1AlphaMode::Opaque`] that black is opaque, so every pixel
/// has alpha 255.
#[inline]
pub fn decode_block_bc1(
    compressed_block: &[u8],
    settings: &DecodeSettings,
) -> Result<Tile, DecodeError> {
    let block = block_bytes::<8>(compressed_block)?;

    let color3 = match settings.bc1_alpha {
        Bc1AlphaMode::Opaque => Rgba8::BLACK,
        Bc1AlphaMode::PunchThrough => Rgba8::TRANSPARENT,
    };

    Ok(decode_color_block::<false>(block, color3))
}

/// Decodes a BC3 block by reading 16 bytes from `compressed_block`.
///
/// The first 8 bytes hold the interpolated alpha block, the last 8 bytes a color
/// block that always uses the four-color ramp.
#[inline]
pub fn decode_block_bc3(compressed_block: &[u8]) -> Result<Tile, DecodeError> {
    let block = block_bytes::<16>(compressed_block)?;

    let [alpha_block @ .., _, _, _, _, _, _, _, _] = block;
    let [_, _, _, _, _, _, _, _, color_block @ ..] = block;

    let mut pixels = decode_color_block::<true>(color_block, Rgba8::BLACK);
    let alpha = decode_alpha_block(alpha_block);

    for (pixel, alpha) in pixels.iter_mut().zip(alpha) {
        pixel.a = alpha;
    }

    Ok(pixels)
}

fn block_bytes<const N: usize>(compressed_block: &[u8]) -> Result<&[u8; N], DecodeError> {
    compressed_block
        .get(..N)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or(DecodeError::TruncatedInput {
            expected: N,
            actual: compressed_block.len(),
        })
}

/// Builds the four entry color ramp of a color block.
///
/// `FOUR_COLOR_ONLY` forces the four-color ramp regardless of endpoint order (BC3).
/// Otherwise the raw 16-bit endpoints pick the mode and `color3` is used as the
/// last entry of the three-color ramp.
#[inline(always)]
pub(crate) fn color_ramp<const FOUR_COLOR_ONLY: bool>(
    c0: u16,
    c1: u16,
    color3: Rgba8,
) -> [Rgba8; 4] {
    let color0 = expand_565(c0);
    let color1 = expand_565(c1);

    if c0 > c1 || FOUR_COLOR_ONLY {
        // color_2 = 2/3*color_0 + 1/3*color_1
        // color_3 = 1/3*color_0 + 2/3*color_1
        [
            color0,
            color1,
            interpolate(color0, 2, color1, 1, 3),
            interpolate(color0, 1, color1, 2, 3),
        ]
    } else {
        // color_2 = 1/2*color_0 + 1/2*color_1
        [
            color0,
            color1,
            interpolate(color0, 1, color1, 1, 2),
            color3,
        ]
    }
}

#[inline(always)]
fn interpolate(color0: Rgba8, weight0: u16, color1: Rgba8, weight1: u16, divisor: u16) -> Rgba8 {
    let channel = |a: u8, b: u8| ((weight0 * a as u16 + weight1 * b as u16) / divisor) as u8;

    Rgba8::new(
        channel(color0.r, color1.r),
        channel(color0.g, color1.g),
        channel(color0.b, color1.b),
        0xFF,
    )
}

/// Decompresses an 8 byte BC1/DXT1 style color block.
#[inline(always)]
fn decode_color_block<const FOUR_COLOR_ONLY: bool>(
    compressed_block: &[u8; 8],
    color3: Rgba8,
) -> Tile {
    let [c0_lo, c0_hi, c1_lo, c1_hi, i0, i1, i2, i3] = *compressed_block;
    let c0 = u16::from_le_bytes([c0_lo, c0_hi]);
    let c1 = u16::from_le_bytes([c1_lo, c1_hi]);

    let ref_colors = color_ramp::<FOUR_COLOR_ONLY>(c0, c1, color3);

    let mut color_indices = u32::from_le_bytes([i0, i1, i2, i3]);
    let mut pixels = [Rgba8::TRANSPARENT; TILE_PIXELS];

    for pixel in pixels.iter_mut() {
        *pixel = ref_colors[(color_indices & 0x03) as usize];
        color_indices >>= 2;
    }

    pixels
}

/// Builds the eight entry alpha ramp from the two alpha endpoints.
#[rustfmt::skip]
pub(crate) fn alpha_ramp(alpha0: u8, alpha1: u8) -> [u8; 8] {
    let a0 = alpha0 as u16;
    let a1 = alpha1 as u16;

    let mut alpha = [0u8; 8];
    alpha[0] = alpha0;
    alpha[1] = alpha1;

    if alpha0 > alpha1 {
        // 6 interpolated alpha values
        for code in 2..8u16 {
            alpha[code as usize] = (((8 - code) * a0 + (code - 1) * a1) / 7) as u8;
        }
    } else {
        // 4 interpolated alpha values, then the two sentinels
        for code in 2..6u16 {
            alpha[code as usize] = (((6 - code) * a0 + (code - 1) * a1) / 5) as u8;
        }
        alpha[6] = 0x00;
        alpha[7] = 0xFF;
    }

    alpha
}

/// Extracts the 3-bit alpha code of pixel `index` from the 48-bit selector stream.
///
/// The stream is split into the `low` 16 bits (bytes 2..4 of the block) and the
/// `high` 32 bits (bytes 4..8). The code of pixel 5 starts at bit 15 and straddles
/// both words.
#[inline(always)]
pub(crate) fn alpha_selector(low: u16, high: u32, index: usize) -> u8 {
    debug_assert!(index < TILE_PIXELS);

    let position = 3 * index as u32;

    let code = if position <= 12 {
        (low as u32 >> position) & 0x07
    } else if position == 15 {
        (low as u32 >> 15) | ((high << 1) & 0x06)
    } else {
        (high >> (position - 16)) & 0x07
    };

    code as u8
}

/// Decodes the alpha values of a BC3/DXT5 alpha block (smooth transitions).
#[inline(always)]
fn decode_alpha_block(compressed_block: &[u8; 8]) -> [u8; TILE_PIXELS] {
    let [alpha0, alpha1, l0, l1, h0, h1, h2, h3] = *compressed_block;

    let ramp = alpha_ramp(alpha0, alpha1);
    let low = u16::from_le_bytes([l0, l1]);
    let high = u32::from_le_bytes([h0, h1, h2, h3]);

    let mut alpha = [0u8; TILE_PIXELS];
    for (index, value) in alpha.iter_mut().enumerate() {
        *value = ramp[alpha_selector(low, high, index) as usize];
    }

    alpha
}
