//! Destination pixel buffers.
//!
//! The decoders write through the [`PixelImage`] capability trait, so any RGBA8
//! surface can be used as a target. Two implementations are provided: the owned
//! [`RgbaBuffer`] and [`RgbaView`], which borrows caller memory with an explicit
//! row stride.

use crate::color::Rgba8;
use crate::error::DecodeError;

/// Color model of a pixel image.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ColorModel {
    /// 8 bits per channel, non-premultiplied RGBA.
    Rgba8,
}

/// A 2D image addressable by pixel coordinates.
pub trait PixelImage {
    /// The color model of the stored pixels.
    fn color_model(&self) -> ColorModel {
        ColorModel::Rgba8
    }

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Returns `true` if `(x, y)` lies inside `[0, width) x [0, height)`.
    fn in_bounds(&self, x: u32, y: u32) -> bool {
        x < self.width() && y < self.height()
    }

    /// Returns the pixel at `(x, y)`, or `None` if it is out of bounds.
    fn pixel(&self, x: u32, y: u32) -> Option<Rgba8>;

    /// Writes the pixel at `(x, y)`. Writes outside the bounds are ignored.
    fn set_pixel(&mut self, x: u32, y: u32, color: Rgba8);
}

/// Returns the byte offset of pixel `(x, y)` in a buffer with `stride` bytes per row.
#[inline(always)]
pub const fn pix_offset(x: u32, y: u32, stride: usize) -> usize {
    y as usize * stride + x as usize * 4
}

/// An owned RGBA8 image.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RgbaBuffer {
    width: u32,
    height: u32,
    stride: usize,
    data: Vec<u8>,
}

impl RgbaBuffer {
    /// Creates a zeroed image with tightly packed rows.
    ///
    /// Zero dimensions and byte sizes that overflow `usize` are rejected with
    /// [`DecodeError::InvalidDimensions`]. A failed allocation is reported instead
    /// of aborting.
    pub fn new(width: u32, height: u32) -> Result<Self, DecodeError> {
        let (stride, len) = packed_layout(width, height)?;

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| DecodeError::AllocationFailed { bytes: len })?;
        data.resize(len, 0);

        Ok(Self {
            width,
            height,
            stride,
            data,
        })
    }

    /// Wraps existing pixel data.
    ///
    /// `data` must hold at least `stride * (height - 1) + width * 4` bytes.
    pub fn from_raw(
        width: u32,
        height: u32,
        stride: usize,
        data: Vec<u8>,
    ) -> Result<Self, DecodeError> {
        validate_layout(width, height, stride, data.len())?;
        Ok(Self {
            width,
            height,
            stride,
            data,
        })
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Borrows the pixel data as a mutable view.
    pub fn as_view_mut(&mut self) -> RgbaView<'_> {
        RgbaView {
            width: self.width,
            height: self.height,
            stride: self.stride,
            data: &mut self.data,
        }
    }

    /// Returns the pixel data without row padding.
    pub fn to_packed(&self) -> Vec<u8> {
        let row_bytes = self.width as usize * 4;
        if self.stride == row_bytes {
            return self.data[..row_bytes * self.height as usize].to_vec();
        }

        let mut packed = Vec::with_capacity(row_bytes * self.height as usize);
        for y in 0..self.height {
            let start = pix_offset(0, y, self.stride);
            packed.extend_from_slice(&self.data[start..start + row_bytes]);
        }
        packed
    }
}

impl PixelImage for RgbaBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        read_pixel(&self.data, self.stride, self.width, self.height, x, y)
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Rgba8) {
        write_pixel(&mut self.data, self.stride, self.width, self.height, x, y, color)
    }
}

/// A mutable RGBA8 view into caller owned memory.
#[derive(Debug)]
pub struct RgbaView<'a> {
    width: u32,
    height: u32,
    stride: usize,
    data: &'a mut [u8],
}

impl<'a> RgbaView<'a> {
    /// Creates a view over `data`, validating that every pixel of the image fits.
    pub fn new(
        data: &'a mut [u8],
        width: u32,
        height: u32,
        stride: usize,
    ) -> Result<Self, DecodeError> {
        validate_layout(width, height, stride, data.len())?;
        Ok(Self {
            width,
            height,
            stride,
            data,
        })
    }

    /// Creates a view with tightly packed rows.
    pub fn packed(data: &'a mut [u8], width: u32, height: u32) -> Result<Self, DecodeError> {
        Self::new(data, width, height, width as usize * 4)
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Splits the view into horizontal bands of `rows` pixel rows each.
    ///
    /// The last band holds the remaining rows.
    #[cfg(feature = "rayon")]
    pub(crate) fn into_bands(self, rows: u32) -> Vec<RgbaView<'a>> {
        let RgbaView {
            width,
            height,
            stride,
            data,
        } = self;

        let mut bands = Vec::with_capacity(height.div_ceil(rows) as usize);
        let mut remaining_rows = height;

        for chunk in data.chunks_mut(stride.saturating_mul(rows as usize)) {
            if remaining_rows == 0 {
                break;
            }
            let band_height = remaining_rows.min(rows);
            remaining_rows -= band_height;
            bands.push(RgbaView {
                width,
                height: band_height,
                stride,
                data: chunk,
            });
        }

        bands
    }
}

impl PixelImage for RgbaView<'_> {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        read_pixel(&self.data[..], self.stride, self.width, self.height, x, y)
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Rgba8) {
        write_pixel(self.data, self.stride, self.width, self.height, x, y, color)
    }
}

#[cfg(feature = "image")]
#[cfg_attr(docsrs, doc(cfg(feature = "image")))]
impl PixelImage for image::RgbaImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        self.get_pixel_checked(x, y).map(|pixel| Rgba8::from(pixel.0))
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Rgba8) {
        if let Some(pixel) = self.get_pixel_mut_checked(x, y) {
            pixel.0 = color.to_array();
        }
    }
}

#[cfg(feature = "image")]
#[cfg_attr(docsrs, doc(cfg(feature = "image")))]
impl TryFrom<RgbaBuffer> for image::RgbaImage {
    type Error = DecodeError;

    /// Converts the buffer, dropping any row padding.
    fn try_from(buffer: RgbaBuffer) -> Result<Self, Self::Error> {
        let (width, height) = (buffer.width, buffer.height);
        let mut data = if buffer.stride == width as usize * 4 {
            buffer.data
        } else {
            buffer.to_packed()
        };

        let (_, needed) = packed_layout(width, height)?;
        let actual = data.len();
        data.truncate(needed);

        image::RgbaImage::from_raw(width, height, data)
            .ok_or(DecodeError::BufferTooSmall { needed, actual })
    }
}

/// Returns the stride and byte length of a tightly packed image.
fn packed_layout(width: u32, height: u32) -> Result<(usize, usize), DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }

    (width as usize)
        .checked_mul(4)
        .and_then(|stride| Some((stride, stride.checked_mul(height as usize)?)))
        .ok_or(DecodeError::InvalidDimensions { width, height })
}

fn validate_layout(width: u32, height: u32, stride: usize, len: usize) -> Result<(), DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }

    let row_bytes = (width as usize)
        .checked_mul(4)
        .ok_or(DecodeError::InvalidDimensions { width, height })?;
    if stride < row_bytes {
        return Err(DecodeError::InvalidStride {
            stride,
            min: row_bytes,
        });
    }

    let needed = stride
        .checked_mul(height as usize - 1)
        .and_then(|padded_rows| padded_rows.checked_add(row_bytes))
        .ok_or(DecodeError::InvalidDimensions { width, height })?;
    if len < needed {
        return Err(DecodeError::BufferTooSmall {
            needed,
            actual: len,
        });
    }

    Ok(())
}

#[inline(always)]
fn read_pixel(data: &[u8], stride: usize, width: u32, height: u32, x: u32, y: u32) -> Option<Rgba8> {
    if x >= width || y >= height {
        return None;
    }
    let offset = pix_offset(x, y, stride);
    let bytes: [u8; 4] = data.get(offset..offset + 4)?.try_into().ok()?;
    Some(Rgba8::from(bytes))
}

#[inline(always)]
fn write_pixel(
    data: &mut [u8],
    stride: usize,
    width: u32,
    height: u32,
    x: u32,
    y: u32,
    color: Rgba8,
) {
    if x >= width || y >= height {
        return;
    }
    let offset = pix_offset(x, y, stride);
    if let Some(pixel) = data.get_mut(offset..offset + 4) {
        pixel.copy_from_slice(&color.to_array());
    }
}
