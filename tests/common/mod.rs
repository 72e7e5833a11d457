#![allow(dead_code)]

use dxt_decode::dds::{DdsHeader, DdsPixelFormat, DDPF_FOURCC, DDS_MAGIC};

pub const RED_565: u16 = 0xF800;
pub const BLACK_565: u16 = 0x0000;

/// Builds an 8 byte BC1 block.
pub fn bc1_block(c0: u16, c1: u16, selectors: u32) -> [u8; 8] {
    let mut block = [0u8; 8];
    block[0..2].copy_from_slice(&c0.to_le_bytes());
    block[2..4].copy_from_slice(&c1.to_le_bytes());
    block[4..8].copy_from_slice(&selectors.to_le_bytes());
    block
}

/// Builds a 16 byte BC3 block from alpha endpoints, a 48-bit alpha selector stream and a color block.
pub fn bc3_block(alpha0: u8, alpha1: u8, alpha_selectors: u64, color: [u8; 8]) -> [u8; 16] {
    let mut block = [0u8; 16];
    block[0] = alpha0;
    block[1] = alpha1;
    block[2..8].copy_from_slice(&alpha_selectors.to_le_bytes()[..6]);
    block[8..16].copy_from_slice(&color);
    block
}

/// Selector word with the same 2-bit code for every pixel.
pub fn uniform_color_selectors(code: u32) -> u32 {
    (0..16).fold(0, |acc, index| acc | ((code & 0x03) << (2 * index)))
}

/// Alpha selector stream with the same 3-bit code for every pixel.
pub fn uniform_alpha_selectors(code: u64) -> u64 {
    (0..16).fold(0, |acc, index| acc | ((code & 0x07) << (3 * index)))
}

/// A DDS header for the given FourCC and dimensions.
pub fn dds_header(four_cc: &[u8; 4], width: u32, height: u32) -> DdsHeader {
    DdsHeader {
        magic: DDS_MAGIC,
        size: 124,
        flags: 0x0008_1007,
        width,
        height,
        mip_map_count: 1,
        pixel_format: DdsPixelFormat {
            size: 32,
            flags: DDPF_FOURCC,
            four_cc: u32::from_le_bytes(*four_cc),
            ..Default::default()
        },
        caps: 0x1000,
        ..Default::default()
    }
}

/// A complete DDS file: header followed by `payload`.
pub fn dds_file(four_cc: &[u8; 4], width: u32, height: u32, payload: &[u8]) -> Vec<u8> {
    let mut file = dds_header(four_cc, width, height).to_bytes().to_vec();
    file.extend_from_slice(payload);
    file
}
