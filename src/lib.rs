//! # dxt_decode
//!
//! Software decoder for block compressed textures.
//! Decodes BC1 (DXT1) and BC3 (DXT5) data into RGBA8 images without any GPU support.
//!
//! ```
//! use dxt_decode::{decode::decompress_image, CompressionVariant, PixelImage, Rgba8};
//!
//! // A single red BC1 block.
//! let block = [0x00, 0xF8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
//! let image = decompress_image(CompressionVariant::BC1, 4, 4, &block)?;
//! assert_eq!(image.pixel(3, 3), Some(Rgba8::new(255, 0, 0, 255)));
//! # Ok::<(), dxt_decode::DecodeError>(())
//! ```
//!
//! ## Supported block compressions
//!
//!  * BC1 (color, opaque or 1-bit alpha)
//!  * BC3 (color with interpolated alpha)
//!
//! ## Features
//!
//!  * `rayon` - decode block rows in parallel with [`decode::decompress_par`].
//!  * `image` - use `image::RgbaImage` as a decode target and convert [`RgbaBuffer`] into it.
//!
//! Tests for the optional features only run with `cargo test --all-features`.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod buffer;
mod color;
pub mod dds;
pub mod decode;
mod error;
mod settings;

use std::fmt;
use std::str::FromStr;

pub use buffer::{pix_offset, ColorModel, PixelImage, RgbaBuffer, RgbaView};
pub use color::{expand_565, Rgba8};
pub use error::DecodeError;
pub use settings::{Bc1AlphaMode, DecodeSettings};

/// Compression variants supported by this crate.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub enum CompressionVariant {
    /// BC1 compression (RGB, optional 1-bit alpha), also known as DXT1
    BC1,
    /// BC3 compression with smooth alpha (RGBA), also known as DXT5
    BC3,
}

impl CompressionVariant {
    /// Returns the bytes per row of blocks for the given width.
    ///
    /// The width is used to calculate how many blocks are needed per row,
    /// which is then multiplied by the block size.
    /// Width is rounded up to the nearest multiple of 4.
    /// Returns `None` if the result does not fit in a `u32`.
    pub const fn bytes_per_row(self, width: u32) -> Option<u32> {
        let blocks_per_row = width.div_ceil(4);
        blocks_per_row.checked_mul(self.block_byte_size())
    }

    /// Returns the byte size required for storing compressed blocks for the given dimensions.
    ///
    /// Width and height are rounded up to the nearest multiple of 4.
    /// Returns `None` if the size overflows `usize`.
    pub const fn blocks_byte_size(self, width: u32, height: u32) -> Option<usize> {
        let block_width = (width as usize).div_ceil(4);
        let block_height = (height as usize).div_ceil(4);
        let block_size = self.block_byte_size() as usize;
        match block_width.checked_mul(block_height) {
            Some(block_count) => block_count.checked_mul(block_size),
            None => None,
        }
    }

    /// Size of a single compressed block in bytes.
    pub const fn block_byte_size(self) -> u32 {
        match self {
            CompressionVariant::BC1 => 8,
            CompressionVariant::BC3 => 16,
        }
    }

    /// Lowercase name of the variant, as accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            CompressionVariant::BC1 => "bc1",
            CompressionVariant::BC3 => "bc3",
        }
    }
}

impl fmt::Display for CompressionVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CompressionVariant {
    type Err = String;

    /// Accepts `bc1`/`dxt1` and `bc3`/`dxt5`, case insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bc1" | "dxt1" => Ok(CompressionVariant::BC1),
            "bc3" | "dxt5" => Ok(CompressionVariant::BC3),
            _ => Err(format!("unknown compression variant `{s}`, expected bc1 or bc3")),
        }
    }
}
