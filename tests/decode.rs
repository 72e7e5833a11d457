use dxt_decode::{
    decode::{decompress_blocks, decompress_blocks_with_settings, decompress_image, decompress_into},
    CompressionVariant, DecodeError, DecodeSettings, PixelImage, Rgba8, RgbaBuffer, RgbaView,
};

use crate::common::{
    bc1_block, bc3_block, uniform_alpha_selectors, uniform_color_selectors, BLACK_565, RED_565,
};

mod common;

#[test]
fn bc1_single_red_block() {
    let block = bc1_block(RED_565, BLACK_565, 0x0000_0000);
    let mut output = vec![0u8; 4 * 4 * 4];

    decompress_blocks(CompressionVariant::BC1, 4, 4, &block, &mut output).unwrap();

    for pixel in output.chunks_exact(4) {
        assert_eq!(pixel, [255, 0, 0, 255]);
    }
}

#[test]
fn bc3_alpha_endpoint_selection() {
    let color = bc1_block(RED_565, BLACK_565, 0);

    let block = bc3_block(255, 0, uniform_alpha_selectors(0), color);
    let image = decompress_image(CompressionVariant::BC3, 4, 4, &block).unwrap();
    for y in 0..4 {
        for x in 0..4 {
            assert_eq!(image.pixel(x, y).map(|p| p.a), Some(255));
        }
    }

    let block = bc3_block(255, 0, uniform_alpha_selectors(1), color);
    let image = decompress_image(CompressionVariant::BC3, 4, 4, &block).unwrap();
    for y in 0..4 {
        for x in 0..4 {
            assert_eq!(image.pixel(x, y).map(|p| p.a), Some(0));
        }
    }
}

#[test]
fn bc3_five_step_sentinels() {
    let color = bc1_block(RED_565, BLACK_565, 0);

    for (alpha0, alpha1) in [(0, 0), (3, 250), (128, 128)] {
        let block = bc3_block(alpha0, alpha1, uniform_alpha_selectors(7), color);
        let image = decompress_image(CompressionVariant::BC3, 4, 4, &block).unwrap();
        assert!(image.as_bytes().chunks_exact(4).all(|p| p[3] == 255));

        let block = bc3_block(alpha0, alpha1, uniform_alpha_selectors(6), color);
        let image = decompress_image(CompressionVariant::BC3, 4, 4, &block).unwrap();
        assert!(image.as_bytes().chunks_exact(4).all(|p| p[3] == 0));
    }
}

#[test]
fn bc1_equal_endpoints_collapse() {
    let expected = dxt_decode::expand_565(0x5555);

    for code in 0..3 {
        let block = bc1_block(0x5555, 0x5555, uniform_color_selectors(code));
        let image = decompress_image(CompressionVariant::BC1, 4, 4, &block).unwrap();
        assert_eq!(image.pixel(1, 2), Some(expected), "selector {code}");
    }

    // Documented limitation: the "transparent" entry decodes to opaque black by default.
    let block = bc1_block(0x5555, 0x5555, uniform_color_selectors(3));
    let image = decompress_image(CompressionVariant::BC1, 4, 4, &block).unwrap();
    assert_eq!(image.pixel(1, 2), Some(Rgba8::BLACK));
}

#[test]
fn bc1_punch_through_setting() {
    let block = bc1_block(0x5555, 0x5555, uniform_color_selectors(3));
    let mut output = vec![0xFFu8; 4 * 4 * 4];

    decompress_blocks_with_settings(
        CompressionVariant::BC1,
        4,
        4,
        &block,
        &mut output,
        &DecodeSettings::punch_through(),
    )
    .unwrap();

    assert!(output.iter().all(|&b| b == 0));
}

#[test]
fn partial_blocks_stay_inside_the_image() {
    // 6x6 image, 2x2 block grid. Every block is solid red.
    let blocks: Vec<u8> = (0..4)
        .flat_map(|_| bc1_block(RED_565, BLACK_565, 0))
        .collect();

    // A padded destination: 8 pixels per row, 8 rows, sentinel filled.
    let stride = 8 * 4;
    let mut data = vec![0x11u8; stride * 8];
    let mut view = RgbaView::new(&mut data, 6, 6, stride).unwrap();
    decompress_into(
        CompressionVariant::BC1,
        &blocks,
        &mut view,
        &DecodeSettings::default(),
    )
    .unwrap();

    for y in 0..8 {
        for x in 0..8 {
            let offset = y * stride + x * 4;
            let pixel = &data[offset..offset + 4];
            if x < 6 && y < 6 {
                assert_eq!(pixel, [255, 0, 0, 255], "pixel ({x}, {y})");
            } else {
                assert_eq!(pixel, [0x11; 4], "pixel ({x}, {y}) was written");
            }
        }
    }
}

#[test]
fn packed_output_of_partial_image() {
    let blocks: Vec<u8> = (0..4)
        .flat_map(|_| bc1_block(RED_565, BLACK_565, 0))
        .collect();
    let mut output = vec![0u8; 6 * 6 * 4];

    decompress_blocks(CompressionVariant::BC1, 6, 6, &blocks, &mut output).unwrap();

    assert!(output.chunks_exact(4).all(|p| p == [255, 0, 0, 255]));
}

#[test]
fn trailing_bytes_are_ignored() {
    let mut data = bc1_block(RED_565, BLACK_565, 0).to_vec();
    data.extend_from_slice(&[0xEE; 8]);

    let image = decompress_image(CompressionVariant::BC1, 4, 4, &data).unwrap();
    assert_eq!(image.pixel(0, 0), Some(Rgba8::new(255, 0, 0, 255)));
}

#[test]
fn truncated_input() {
    let blocks = [0u8; 40];
    let mut output = vec![0u8; 8 * 8 * 4];

    assert_eq!(
        decompress_blocks(CompressionVariant::BC3, 8, 8, &blocks, &mut output),
        Err(DecodeError::TruncatedInput {
            expected: 64,
            actual: 40
        })
    );
    assert!(output.iter().all(|&b| b == 0));
}

#[test]
fn zero_dimensions_are_rejected() {
    let block = bc1_block(RED_565, BLACK_565, 0);

    assert_eq!(
        decompress_image(CompressionVariant::BC1, 0, 4, &block),
        Err(DecodeError::InvalidDimensions {
            width: 0,
            height: 4
        })
    );

    let mut output = [0u8; 0];
    assert_eq!(
        decompress_blocks(CompressionVariant::BC1, 4, 0, &block, &mut output),
        Err(DecodeError::InvalidDimensions {
            width: 4,
            height: 0
        })
    );
}

#[test]
fn undersized_output_is_rejected() {
    let block = bc1_block(RED_565, BLACK_565, 0);
    let mut output = vec![0u8; 60];

    assert_eq!(
        decompress_blocks(CompressionVariant::BC1, 4, 4, &block, &mut output),
        Err(DecodeError::BufferTooSmall {
            needed: 64,
            actual: 60
        })
    );
}

#[test]
fn decode_is_deterministic() {
    let size = CompressionVariant::BC3.blocks_byte_size(9, 7).unwrap();
    let input: Vec<u8> = (0..size)
        .map(|i| (i * 131 + 7) as u8)
        .collect();

    let first = decompress_image(CompressionVariant::BC3, 9, 7, &input).unwrap();
    let second = decompress_image(CompressionVariant::BC3, 9, 7, &input).unwrap();
    assert_eq!(first, second);

    let mut reused = RgbaBuffer::new(9, 7).unwrap();
    reused.decompress(CompressionVariant::BC3, &input).unwrap();
    reused.decompress(CompressionVariant::BC3, &input).unwrap();
    assert_eq!(first, reused);
}

#[cfg(feature = "image")]
#[test]
fn decode_into_image_crate_buffer() {
    let block = bc3_block(255, 0, uniform_alpha_selectors(1), bc1_block(RED_565, 0, 0));

    let mut target = image::RgbaImage::new(4, 4);
    decompress_into(
        CompressionVariant::BC3,
        &block,
        &mut target,
        &DecodeSettings::default(),
    )
    .unwrap();
    assert_eq!(target.get_pixel(2, 2).0, [255, 0, 0, 0]);

    let converted: image::RgbaImage = decompress_image(CompressionVariant::BC3, 4, 4, &block)
        .unwrap()
        .try_into()
        .unwrap();
    assert_eq!(converted, target);
}

#[cfg(feature = "rayon")]
#[test]
fn parallel_decode_into_padded_stride() {
    use dxt_decode::decode::decompress_par;

    // 6x6 pixels, 32 byte stride, the last row ends at the buffer end.
    let (width, height, stride) = (6u32, 6u32, 32usize);
    let size = CompressionVariant::BC3.blocks_byte_size(width, height).unwrap();
    let input: Vec<u8> = (0..size).map(|i| (i * 59 + 3) as u8).collect();

    let serial = decompress_image(CompressionVariant::BC3, width, height, &input).unwrap();

    let mut data = vec![0xAAu8; stride * 5 + 24];
    let view = RgbaView::new(&mut data, width, height, stride).unwrap();
    decompress_par(
        CompressionVariant::BC3,
        &input,
        view,
        &DecodeSettings::default(),
    )
    .unwrap();

    for (row, expected) in serial.as_bytes().chunks_exact(24).enumerate() {
        let start = row * stride;
        assert_eq!(&data[start..start + 24], expected, "row {row}");
        if row < 5 {
            assert!(data[start + 24..start + stride].iter().all(|&b| b == 0xAA));
        }
    }
}

#[test]
fn crafted_dimensions_return_an_error() {
    let block = bc1_block(RED_565, BLACK_565, 0);

    assert!(matches!(
        decompress_image(CompressionVariant::BC1, 1 << 17, 1 << 17, &block),
        Err(DecodeError::TruncatedInput { actual: 8, .. })
    ));
    assert!(decompress_image(CompressionVariant::BC3, u32::MAX, u32::MAX, &block).is_err());
}
