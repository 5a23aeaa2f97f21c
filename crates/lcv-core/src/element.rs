//! Multi-channel element value aliases.
//!
//! Fixed-size arrays used as typed element values with
//! [`Matrix::at`](crate::Matrix::at), [`Matrix::set_to`](crate::Matrix::set_to)
//! and friends. Arrays have no padding, so `size_of` matches the matrix
//! element size they target exactly (e.g. `Vec3b` for an `"8uc3"` matrix).

use half::f16;

/// Two 8-bit unsigned channels.
pub type Vec2b = [u8; 2];
/// Three 8-bit unsigned channels (the classic interleaved BGR/RGB element).
pub type Vec3b = [u8; 3];
/// Four 8-bit unsigned channels.
pub type Vec4b = [u8; 4];

/// Two 16-bit signed channels.
pub type Vec2s = [i16; 2];
/// Three 16-bit signed channels.
pub type Vec3s = [i16; 3];
/// Four 16-bit signed channels.
pub type Vec4s = [i16; 4];

/// Two 16-bit unsigned channels.
pub type Vec2w = [u16; 2];
/// Three 16-bit unsigned channels.
pub type Vec3w = [u16; 3];
/// Four 16-bit unsigned channels.
pub type Vec4w = [u16; 4];

/// Two 32-bit signed channels.
pub type Vec2i = [i32; 2];
/// Three 32-bit signed channels.
pub type Vec3i = [i32; 3];
/// Four 32-bit signed channels.
pub type Vec4i = [i32; 4];

/// Two half-precision channels.
pub type Vec2h = [f16; 2];
/// Three half-precision channels.
pub type Vec3h = [f16; 3];
/// Four half-precision channels.
pub type Vec4h = [f16; 4];

/// Two single-precision channels.
pub type Vec2f = [f32; 2];
/// Three single-precision channels.
pub type Vec3f = [f32; 3];
/// Four single-precision channels.
pub type Vec4f = [f32; 4];

/// Two double-precision channels.
pub type Vec2d = [f64; 2];
/// Three double-precision channels.
pub type Vec3d = [f64; 3];
/// Four double-precision channels.
pub type Vec4d = [f64; 4];

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn test_sizes_match_descriptors() {
        assert_eq!(size_of::<Vec3b>(), "8uc3".parse::<crate::MatType>().unwrap().byte_size());
        assert_eq!(size_of::<Vec4s>(), "16ic4".parse::<crate::MatType>().unwrap().byte_size());
        assert_eq!(size_of::<Vec3h>(), "16fc3".parse::<crate::MatType>().unwrap().byte_size());
        assert_eq!(size_of::<Vec2d>(), "64fc2".parse::<crate::MatType>().unwrap().byte_size());
    }
}
