//! DDS container header.
//!
//! Only the magic identifier is validated. The remaining fields are exposed as
//! metadata; the decoder never reads them, so callers still supply the image
//! dimensions explicitly.

use bytemuck::{Pod, Zeroable};

use crate::error::DecodeError;
use crate::CompressionVariant;

/// `"DDS "` read as a little endian `u32`.
pub const DDS_MAGIC: u32 = 0x2053_4444;

/// Size of the header including the magic identifier.
pub const DDS_HEADER_SIZE: usize = 128;

/// The pixel format flag signalling a valid `four_cc`.
pub const DDPF_FOURCC: u32 = 0x4;

/// Pixel format sub-structure of [`DdsHeader`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct DdsPixelFormat {
    pub size: u32,
    pub flags: u32,
    pub four_cc: u32,
    pub rgb_bit_count: u32,
    pub r_bit_mask: u32,
    pub g_bit_mask: u32,
    pub b_bit_mask: u32,
    pub a_bit_mask: u32,
}

/// The 128 byte prefix of a DDS file.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct DdsHeader {
    pub magic: u32,
    pub size: u32,
    pub flags: u32,
    pub height: u32,
    pub width: u32,
    pub pitch_or_linear_size: u32,
    pub depth: u32,
    pub mip_map_count: u32,
    pub reserved1: [u32; 11],
    pub pixel_format: DdsPixelFormat,
    pub caps: u32,
    pub caps2: u32,
    pub caps3: u32,
    pub caps4: u32,
    pub reserved2: u32,
}

impl DdsHeader {
    /// Reads the header from the first 128 bytes of `data` and validates the magic identifier.
    pub fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        let bytes = data
            .get(..DDS_HEADER_SIZE)
            .ok_or(DecodeError::TruncatedInput {
                expected: DDS_HEADER_SIZE,
                actual: data.len(),
            })?;

        let mut words = [0u32; DDS_HEADER_SIZE / 4];
        for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
            *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }

        let header: DdsHeader = bytemuck::cast(words);
        if header.magic != DDS_MAGIC {
            return Err(DecodeError::HeaderMagicMismatch {
                found: header.magic,
            });
        }

        tracing::trace!(
            width = header.width,
            height = header.height,
            mip_map_count = header.mip_map_count,
            four_cc = ?header.four_cc(),
            "parsed dds header"
        );

        Ok(header)
    }

    /// The FourCC code of the pixel format, e.g. `*b"DXT5"`.
    pub fn four_cc(&self) -> [u8; 4] {
        self.pixel_format.four_cc.to_le_bytes()
    }

    /// The block compression format announced by the pixel format, if it is one this crate decodes.
    pub fn variant(&self) -> Option<CompressionVariant> {
        if self.pixel_format.flags & DDPF_FOURCC == 0 {
            return None;
        }

        match &self.four_cc() {
            b"DXT1" => Some(CompressionVariant::BC1),
            b"DXT4" | b"DXT5" => Some(CompressionVariant::BC3),
            _ => None,
        }
    }

    /// The serialized form of the header.
    pub fn to_bytes(&self) -> [u8; DDS_HEADER_SIZE] {
        let words: [u32; DDS_HEADER_SIZE / 4] = bytemuck::cast(*self);
        let mut bytes = [0u8; DDS_HEADER_SIZE];
        for (chunk, word) in bytes.chunks_exact_mut(4).zip(words) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        bytes
    }
}

/// Validates the header of `data` and returns it together with the payload following it.
pub fn split_header(data: &[u8]) -> Result<(DdsHeader, &[u8]), DecodeError> {
    let header = DdsHeader::parse(data)?;
    Ok((header, &data[DDS_HEADER_SIZE..]))
}
