use bytemuck::{Pod, Zeroable};

/// A single RGBA pixel with 8 bits per channel.
///
/// The layout matches the byte order of the decoded output buffers, so slices of
/// [`Rgba8`] can be reinterpreted as bytes with [`bytemuck::cast_slice`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 0xFF);

    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Creates a pixel from its four channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Returns the channels in `[r, g, b, a]` order.
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Rgba8> for [u8; 4] {
    fn from(color: Rgba8) -> Self {
        color.to_array()
    }
}

/// Expands a packed 5:6:5 color into RGBA8 with an opaque alpha channel.
///
/// Channels are widened by bit replication, so `0` stays `0` and the maximum
/// 5 or 6 bit value becomes `255`.
#[inline(always)]
pub const fn expand_565(packed: u16) -> Rgba8 {
    let r = ((packed >> 11) & 0x1F) as u8;
    let g = ((packed >> 5) & 0x3F) as u8;
    let b = (packed & 0x1F) as u8;

    Rgba8 {
        r: (r << 3) | (r >> 2),
        g: (g << 2) | (g >> 4),
        b: (b << 3) | (b >> 2),
        a: 0xFF,
    }
}
