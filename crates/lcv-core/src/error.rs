//! Error types for lcv-core operations.
//!
//! The [`Error`] enum covers the two failure classes of the storage core:
//!
//! - **Creation-boundary violations** — malformed type specs, bad
//!   dimensions, out-of-range regions or coordinates. These are caller
//!   defects surfaced as results where the check is amortized (creation,
//!   region selection, checked accessors). The per-pixel fast paths stay
//!   unchecked; see [`crate::matrix::Matrix`].
//! - **Resource exhaustion** — [`AllocationFailed`](Error::AllocationFailed)
//!   is the one error that legitimately occurs in correct programs and is
//!   always reported, never swallowed.
//!
//! # Usage
//!
//! ```rust
//! use lcv_core::{Error, Result};
//!
//! fn checked_column(x: u32, width: u32) -> Result<u32> {
//!     if x >= width {
//!         return Err(Error::OutOfBounds { x, y: 0, width, height: 1 });
//!     }
//!     Ok(x)
//! }
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the matrix storage core.
#[derive(Debug, Error)]
pub enum Error {
    /// A type specification could not be parsed or encoded.
    ///
    /// Produced for channel strings that do not match
    /// `<bits>[f|i|u]c<channels>`, for component widths that are not one
    /// of 8/16/32/64, for channel counts outside `1..=15`, and for raw
    /// packed values with no valid decoding.
    #[error("invalid type spec: {spec:?}")]
    InvalidTypeSpec {
        /// The offending spec, rendered for display.
        spec: String,
    },

    /// Matrix dimensions are unusable.
    ///
    /// Returned when a dimension is zero or the byte extent would
    /// overflow `usize`.
    #[error("invalid dimensions {width}x{height}: {reason}")]
    InvalidDimensions {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
        /// Why the dimensions were rejected.
        reason: String,
    },

    /// The allocator could not provide the requested block.
    #[error("failed to allocate {requested} bytes")]
    AllocationFailed {
        /// Bytes requested.
        requested: usize,
    },

    /// Pixel coordinates are outside the matrix bounds.
    ///
    /// Only produced by the checked accessors ([`crate::Matrix::get`],
    /// [`crate::Matrix::set`]); the raw pointer paths do not validate.
    #[error("pixel ({x}, {y}) out of bounds for matrix {width}x{height}")]
    OutOfBounds {
        /// Column that was accessed.
        x: u32,
        /// Row that was accessed.
        y: u32,
        /// Matrix width.
        width: u32,
        /// Matrix height.
        height: u32,
    },

    /// A region of interest extends beyond its parent matrix.
    #[error("region ({rx}, {ry}, {rw}x{rh}) exceeds matrix bounds {width}x{height}")]
    InvalidRegion {
        /// Region X origin.
        rx: u32,
        /// Region Y origin.
        ry: u32,
        /// Region width.
        rw: u32,
        /// Region height.
        rh: u32,
        /// Parent matrix width.
        width: u32,
        /// Parent matrix height.
        height: u32,
    },

    /// A typed access used an element type whose size does not fit the
    /// matrix element size.
    #[error("element size mismatch: matrix element is {expected} bytes, value is {got} bytes")]
    ElemSizeMismatch {
        /// Matrix element size in bytes.
        expected: usize,
        /// Size of the supplied element type in bytes.
        got: usize,
    },
}

impl Error {
    /// Returns `true` if this is a bounds-related error.
    #[inline]
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. } | Self::InvalidRegion { .. })
    }

    /// Returns `true` if this is an allocation error.
    #[inline]
    pub fn is_allocation_error(&self) -> bool {
        matches!(self, Self::AllocationFailed { .. })
    }
}
