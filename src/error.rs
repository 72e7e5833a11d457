use thiserror::Error;

/// Errors returned by the block decoders, the tile assembler and the header validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Fewer bytes are available than the format requires for the requested dimensions.
    #[error("truncated input: needed {expected} bytes, got {actual}")]
    TruncatedInput {
        /// The number of bytes required.
        expected: usize,
        /// The number of bytes supplied.
        actual: usize,
    },

    /// The first four bytes of the container header are not `"DDS "`.
    #[error("dds format identifier mismatch: found {found:#010x}, expected 0x20534444")]
    HeaderMagicMismatch {
        /// The identifier that was read instead.
        found: u32,
    },

    /// Width or height is zero, or the image byte size overflows `usize`.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The destination buffer cannot hold the decoded image.
    #[error("destination buffer too small: needed {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    /// The destination row stride is shorter than one row of pixels.
    #[error("invalid row stride {stride}: must be at least {min} bytes")]
    InvalidStride { stride: usize, min: usize },

    /// The output image could not be allocated.
    #[error("failed to allocate {bytes} bytes for the decoded image")]
    AllocationFailed { bytes: usize },
}
