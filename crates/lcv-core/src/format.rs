//! Runtime element type descriptors for matrix storage.
//!
//! This module provides the canonical description of what one matrix
//! element looks like in memory:
//!
//! - [`NumericClass`] - signed integer, unsigned integer, or real
//! - [`MatType`] - component bit width + channel count + numeric class
//!
//! A [`MatType`] is a small copyable value. It can be built from an
//! explicit triple, parsed from a channel string such as `"8uc3"`
//! (8-bit unsigned, 3 channels), looked up by canonical component name
//! (`"float32"`), or decoded from its packed `u16` form.
//!
//! # Usage
//!
//! ```rust
//! use lcv_core::{MatType, NumericClass};
//!
//! let ty: MatType = "8uc3".parse()?;
//! assert_eq!(ty.byte_size(), 3);
//! assert_eq!(ty.name(), "uint8");
//! assert_eq!(ty, MatType::new(8, 3, NumericClass::Unsigned)?);
//! # Ok::<(), lcv_core::Error>(())
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::{Error, Result};

/// Channel-string grammar: `<bits>[f|i|u]c<channels>`.
fn spec_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)([fiu])c(\d+)$").unwrap())
}

/// Numeric class of a matrix element component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericClass {
    /// Signed two's-complement integer (`i` in channel strings).
    Signed,
    /// Unsigned integer (`u` in channel strings).
    Unsigned,
    /// IEEE 754 floating point (`f` in channel strings).
    Real,
}

impl NumericClass {
    /// The channel-string letter for this class.
    #[inline]
    pub const fn letter(self) -> char {
        match self {
            Self::Signed => 'i',
            Self::Unsigned => 'u',
            Self::Real => 'f',
        }
    }

    /// Class from a channel-string letter.
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'i' => Some(Self::Signed),
            'u' => Some(Self::Unsigned),
            'f' => Some(Self::Real),
            _ => None,
        }
    }

    // Packed codes start at 1 so a zeroed word never decodes.
    const fn code(self) -> u16 {
        match self {
            Self::Signed => 1,
            Self::Unsigned => 2,
            Self::Real => 3,
        }
    }

    fn from_code(code: u16) -> Option<Self> {
        match code {
            1 => Some(Self::Signed),
            2 => Some(Self::Unsigned),
            3 => Some(Self::Real),
            _ => None,
        }
    }
}

/// Element type descriptor: component width, channel count, numeric class.
///
/// Two descriptors are equal iff all three fields are equal, which
/// coincides with equality of their [packed form](MatType::to_raw).
///
/// The channel count is `0` only for the depth-only projection returned
/// by [`depth()`](MatType::depth), which discriminates the component
/// type independently of channel count:
///
/// ```rust
/// use lcv_core::MatType;
///
/// let gray: MatType = "8uc1".parse()?;
/// let bgr: MatType = "8uc3".parse()?;
/// assert_ne!(gray, bgr);
/// assert_eq!(gray.depth(), bgr.depth());
/// # Ok::<(), lcv_core::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatType {
    bits: u8,
    channels: u8,
    class: NumericClass,
}

/// Canonical component names, indexed by (bits, class).
const NAME_TABLE: &[(u8, NumericClass, &str)] = &[
    (8, NumericClass::Unsigned, "uint8"),
    (8, NumericClass::Signed, "int8"),
    (16, NumericClass::Unsigned, "uint16"),
    (16, NumericClass::Signed, "int16"),
    (16, NumericClass::Real, "float16"),
    (32, NumericClass::Unsigned, "uint32"),
    (32, NumericClass::Signed, "int32"),
    (32, NumericClass::Real, "float32"),
    (64, NumericClass::Unsigned, "uint64"),
    (64, NumericClass::Signed, "int64"),
    (64, NumericClass::Real, "float64"),
];

/// Name returned for combinations outside the canonical table.
pub const NOT_A_TYPE: &str = "na";

impl MatType {
    /// Creates a descriptor from an explicit triple.
    ///
    /// `bits` must be one of 8/16/32/64 and `channels` in `1..=15`.
    pub fn new(bits: u8, channels: u8, class: NumericClass) -> Result<Self> {
        Self::validate(bits as u32, channels as u32)?;
        Ok(Self {
            bits,
            channels,
            class,
        })
    }

    /// Creates a descriptor from a canonical component name and a
    /// channel count, e.g. `("float32", 3)`.
    pub fn from_name(name: &str, channels: u8) -> Result<Self> {
        let entry = NAME_TABLE.iter().find(|(_, _, n)| *n == name);
        match entry {
            Some(&(bits, class, _)) => Self::new(bits, channels, class),
            None => Err(Error::InvalidTypeSpec {
                spec: format!("{name}c{channels}"),
            }),
        }
    }

    /// Decodes a descriptor from its packed `u16` form.
    pub fn from_raw(raw: u16) -> Result<Self> {
        let bits = (raw & 0xff) as u8;
        let class = NumericClass::from_code((raw >> 8) & 0b11);
        let channels = ((raw >> 10) & 0b1111) as u8;
        match class {
            Some(class) if Self::validate(bits as u32, channels as u32).is_ok() => Ok(Self {
                bits,
                channels,
                class,
            }),
            _ => Err(Error::InvalidTypeSpec {
                spec: format!("raw:{raw:#06x}"),
            }),
        }
    }

    /// Packs the descriptor into a single `u16`.
    ///
    /// Layout: bits in the low byte, class code in bits 8..10, channel
    /// count in bits 10..14.
    #[inline]
    pub const fn to_raw(self) -> u16 {
        self.bits as u16 | (self.class.code() << 8) | ((self.channels as u16) << 10)
    }

    fn validate(bits: u32, channels: u32) -> Result<()> {
        if !matches!(bits, 8 | 16 | 32 | 64) {
            return Err(Error::InvalidTypeSpec {
                spec: format!("{bits} bits per component"),
            });
        }
        if channels == 0 || channels > 15 {
            return Err(Error::InvalidTypeSpec {
                spec: format!("{channels} channels"),
            });
        }
        Ok(())
    }

    /// Component width in bits.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.bits
    }

    /// Number of interleaved channels.
    #[inline]
    pub const fn channels(self) -> u8 {
        self.channels
    }

    /// Numeric class of the components.
    #[inline]
    pub const fn class(self) -> NumericClass {
        self.class
    }

    /// Byte size of one full element (all channels).
    #[inline]
    pub const fn byte_size(self) -> usize {
        (self.bits as usize / 8) * self.channels as usize
    }

    /// Byte size of a single component.
    #[inline]
    pub const fn component_byte_size(self) -> usize {
        self.bits as usize / 8
    }

    /// Depth-only projection: same bits and class, zero channels.
    ///
    /// Compares equal across channel variants of the same component
    /// type, so it serves as a type-class discriminator.
    #[inline]
    pub const fn depth(self) -> Self {
        Self {
            bits: self.bits,
            channels: 0,
            class: self.class,
        }
    }

    /// `true` for signed integers and reals.
    #[inline]
    pub const fn is_signed(self) -> bool {
        matches!(self.class, NumericClass::Signed | NumericClass::Real)
    }

    /// `true` for integer classes.
    #[inline]
    pub const fn is_integer(self) -> bool {
        matches!(self.class, NumericClass::Signed | NumericClass::Unsigned)
    }

    /// `true` for the real class.
    #[inline]
    pub const fn is_real(self) -> bool {
        matches!(self.class, NumericClass::Real)
    }

    /// Canonical component name (`"uint8"`, `"float32"`, ...).
    ///
    /// Combinations outside the table yield [`NOT_A_TYPE`].
    pub fn name(self) -> &'static str {
        NAME_TABLE
            .iter()
            .find(|&&(bits, class, _)| bits == self.bits && class == self.class)
            .map_or(NOT_A_TYPE, |&(_, _, name)| name)
    }
}

/// Conversion into a [`MatType`], accepted wherever the matrix API
/// takes a "type or channel string" parameter.
///
/// ```rust
/// use lcv_core::Matrix;
///
/// // channel string and explicit descriptor are interchangeable
/// let a = Matrix::zeros(4, 4, "8uc3")?;
/// let b = Matrix::zeros(4, 4, a.mat_type().unwrap())?;
/// assert_eq!(a.elem_size(), b.elem_size());
/// # Ok::<(), lcv_core::Error>(())
/// ```
pub trait IntoMatType {
    /// Resolves to a concrete descriptor.
    fn into_mat_type(self) -> Result<MatType>;
}

impl IntoMatType for MatType {
    #[inline]
    fn into_mat_type(self) -> Result<MatType> {
        Ok(self)
    }
}

impl IntoMatType for &str {
    fn into_mat_type(self) -> Result<MatType> {
        self.parse()
    }
}

impl IntoMatType for &String {
    fn into_mat_type(self) -> Result<MatType> {
        self.parse()
    }
}

impl fmt::Display for MatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}c{}", self.bits, self.class.letter(), self.channels)
    }
}

impl FromStr for MatType {
    type Err = Error;

    /// Parses a channel string of the form `<bits>[f|i|u]c<channels>`.
    fn from_str(s: &str) -> Result<Self> {
        let bad = || Error::InvalidTypeSpec {
            spec: s.to_string(),
        };
        let caps = spec_regex().captures(s).ok_or_else(bad)?;
        let bits: u32 = caps[1].parse().map_err(|_| bad())?;
        let channels: u32 = caps[3].parse().map_err(|_| bad())?;
        Self::validate(bits, channels).map_err(|_| bad())?;
        let class = NumericClass::from_letter(caps[2].chars().next().unwrap_or('?')).ok_or_else(bad)?;
        Ok(Self {
            bits: bits as u8,
            channels: channels as u8,
            class,
        })
    }
}
