//! # lcv-core
//!
//! Matrix storage for the lcv image-processing toolkit.
//!
//! This crate is the foundation everything else builds on: it owns pixel
//! memory and defines the access contract that color conversion,
//! filtering, codec and display adapters all go through.
//!
//! - [`MatType`] - runtime element type descriptor (bit depth, channel
//!   count, numeric class), parseable from channel strings like `"8uc3"`
//! - [`Matrix`] - 2-D interleaved pixel buffer with shared-ownership
//!   aliasing, sub-region (ROI) views and explicit deep copies
//! - [`Rect`], [`Size`], [`Point`] - geometric parameter types
//! - [`element`] - typed multi-channel element aliases (`Vec3b`, ...)
//!
//! ## Design Philosophy
//!
//! A `Matrix` is a cheap handle: copying one aliases the same atomically
//! refcounted byte block, and a [`roi`](Matrix::roi) view aliases a
//! rectangular slice of it without touching a pixel. Isolation is always
//! explicit ([`deep_clone`](Matrix::deep_clone)), never implicit — the
//! same contract `cv::Mat`-style libraries provide:
//!
//! ```rust
//! use lcv_core::{Matrix, Rect};
//!
//! let frame = Matrix::zeros(1920, 1080, "8uc3")?;
//!
//! let alias = frame.clone();          // same bytes
//! let tile = frame.roi(Rect::new(0, 0, 64, 64))?; // same bytes, windowed
//! let isolated = frame.deep_clone()?; // fresh bytes
//! # drop((alias, tile, isolated));
//! # Ok::<(), lcv_core::Error>(())
//! ```
//!
//! Failures that legitimately happen at runtime (allocation) are
//! [`Result`]s; per-pixel access stays unchecked for speed, with checked
//! variants ([`Matrix::get`] / [`Matrix::set`]) where cost does not
//! matter. See [`matrix`] for the full contract.
//!
//! ## Crate Structure
//!
//! This crate has no internal dependencies; the rest of the toolkit
//! (pixel algorithms, codecs, display glue) consumes it:
//!
//! ```text
//! lcv-core (this crate)
//!    ^
//!    |
//!    +-- pixel algorithms (cvt_color, filters, resize)
//!    +-- codec adapters (PNG/JPEG/BMP <-> Matrix)
//!    +-- display adapters (blit Matrix rows to a surface)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod element;
pub mod error;
pub mod format;
pub mod matrix;
pub mod rect;

// Re-exports for convenience
pub use error::{Error, Result};
pub use format::{IntoMatType, MatType, NumericClass, NOT_A_TYPE};
pub use matrix::{Mat, Matrix};
pub use rect::{Point, Rect, Size};

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```
/// use lcv_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::element::{
        Vec2b, Vec2d, Vec2f, Vec2h, Vec2i, Vec2s, Vec2w, Vec3b, Vec3d, Vec3f, Vec3h, Vec3i,
        Vec3s, Vec3w, Vec4b, Vec4d, Vec4f, Vec4h, Vec4i, Vec4s, Vec4w,
    };
    pub use crate::error::{Error, Result};
    pub use crate::format::{IntoMatType, MatType, NumericClass};
    pub use crate::matrix::{Mat, Matrix};
    pub use crate::rect::{Point, Rect, Size};
}
