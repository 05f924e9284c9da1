//! The closed set of PLY scalar types and how to decode them.
//!
//! Both body decoders (ASCII and binary) share this table: each
//! [`ScalarType`] knows its byte width, how to parse itself from an ASCII
//! token and how to read itself from a byte buffer.

use std::{fmt, str::FromStr};

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use derive_more::From;
use num_traits::ToPrimitive;

use crate::io::Error;


// ===========================================================================
// ===== `ScalarType`
// ===========================================================================

/// A primitive PLY type. There are 8 in total, 2 floating point types, 3
/// signed and 3 unsigned integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Char,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Float,
    Double,
}

impl ScalarType {
    /// All scalar types, in the order of the variant declaration.
    pub const ALL: [ScalarType; 8] = [
        ScalarType::Char,
        ScalarType::UChar,
        ScalarType::Short,
        ScalarType::UShort,
        ScalarType::Int,
        ScalarType::UInt,
        ScalarType::Float,
        ScalarType::Double,
    ];

    /// Returns `true` if and only if the type is either `float` or `double`.
    pub fn is_floating_point(&self) -> bool {
        *self == ScalarType::Float || *self == ScalarType::Double
    }

    /// Returns `true` if and only if the type is one of the six integer types.
    pub fn is_integer(&self) -> bool {
        !self.is_floating_point()
    }

    /// Returns the number of bytes this type occupies in binary encodings.
    pub fn len(&self) -> usize {
        match self {
            ScalarType::Char => 1,
            ScalarType::UChar => 1,
            ScalarType::Short => 2,
            ScalarType::UShort => 2,
            ScalarType::Int => 4,
            ScalarType::UInt => 4,
            ScalarType::Float => 4,
            ScalarType::Double => 8,
        }
    }

    /// Returns the type name used in headers written by this crate (e.g.
    /// `short` for `i16`).
    pub fn ply_type_name(&self) -> &'static str {
        match self {
            ScalarType::Char => "char",
            ScalarType::UChar => "uchar",
            ScalarType::Short => "short",
            ScalarType::UShort => "ushort",
            ScalarType::Int => "int",
            ScalarType::UInt => "uint",
            ScalarType::Float => "float",
            ScalarType::Double => "double",
        }
    }

    /// Parses a single ASCII token as a value of this type. Returns `None` if
    /// the token is not a valid literal of this type (this includes integers
    /// out of range).
    pub fn parse_ascii(self, token: &str) -> Option<Scalar> {
        macro_rules! parse {
            ($variant:ident, $ty:ident) => {
                token.parse::<$ty>().ok().map(Scalar::$variant)
            };
        }

        match self {
            ScalarType::Char => parse!(Char, i8),
            ScalarType::UChar => parse!(UChar, u8),
            ScalarType::Short => parse!(Short, i16),
            ScalarType::UShort => parse!(UShort, u16),
            ScalarType::Int => parse!(Int, i32),
            ScalarType::UInt => parse!(UInt, u32),
            ScalarType::Float => parse!(Float, f32),
            ScalarType::Double => parse!(Double, f64),
        }
    }

    /// Reads one value of this type at `offset` from `buf` with the byte order
    /// `B`. Returns the value and the offset directly after it.
    ///
    /// If `buf` does not contain `self.len()` bytes starting at `offset`,
    /// `Error::BufferUnderrun` is returned.
    pub fn read_binary<B: ByteOrder>(
        self,
        buf: &[u8],
        offset: usize,
    ) -> Result<(Scalar, usize), Error> {
        let end = offset + self.len();
        let bytes = buf.get(offset..end).ok_or_else(|| Error::BufferUnderrun {
            offset,
            needed: self.len(),
            available: buf.len().saturating_sub(offset),
        })?;

        let value = match self {
            ScalarType::Char => Scalar::Char(bytes[0] as i8),
            ScalarType::UChar => Scalar::UChar(bytes[0]),
            ScalarType::Short => Scalar::Short(B::read_i16(bytes)),
            ScalarType::UShort => Scalar::UShort(B::read_u16(bytes)),
            ScalarType::Int => Scalar::Int(B::read_i32(bytes)),
            ScalarType::UInt => Scalar::UInt(B::read_u32(bytes)),
            ScalarType::Float => Scalar::Float(B::read_f32(bytes)),
            ScalarType::Double => Scalar::Double(B::read_f64(bytes)),
        };

        Ok((value, end))
    }

    /// Like [`read_binary`][ScalarType::read_binary], but with the byte order
    /// chosen at runtime.
    pub fn read_binary_with(
        self,
        buf: &[u8],
        offset: usize,
        endianness: Endianness,
    ) -> Result<(Scalar, usize), Error> {
        match endianness {
            Endianness::Little => self.read_binary::<LittleEndian>(buf, offset),
            Endianness::Big => self.read_binary::<BigEndian>(buf, offset),
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.ply_type_name().fmt(f)
    }
}

/// The error emitted when the `FromStr` implementation for `ScalarType` cannot
/// parse the given string.
pub struct ScalarTypeParseError(String);

impl fmt::Display for ScalarTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\"{}\" is not a valid PLY scalar type", self.0)
    }
}

impl fmt::Debug for ScalarTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for ScalarType {
    type Err = ScalarTypeParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "char" | "int8" => Ok(ScalarType::Char),
            "uchar" | "uint8" => Ok(ScalarType::UChar),
            "short" | "int16" => Ok(ScalarType::Short),
            "ushort" | "uint16" => Ok(ScalarType::UShort),
            "int" | "int32" => Ok(ScalarType::Int),
            "uint" | "uint32" => Ok(ScalarType::UInt),
            "float" | "float32" => Ok(ScalarType::Float),
            "double" | "float64" => Ok(ScalarType::Double),
            other => Err(ScalarTypeParseError(other.to_string())),
        }
    }
}

/// Byte order of binary PLY bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}


// ===========================================================================
// ===== `Scalar`
// ===========================================================================

/// One decoded scalar value, tagged with its PLY type.
#[derive(Debug, Clone, Copy, PartialEq, From)]
pub enum Scalar {
    Char(i8),
    UChar(u8),
    Short(i16),
    UShort(u16),
    Int(i32),
    UInt(u32),
    Float(f32),
    Double(f64),
}

impl Scalar {
    /// Returns the type of this value.
    pub fn ty(&self) -> ScalarType {
        match self {
            Scalar::Char(_) => ScalarType::Char,
            Scalar::UChar(_) => ScalarType::UChar,
            Scalar::Short(_) => ScalarType::Short,
            Scalar::UShort(_) => ScalarType::UShort,
            Scalar::Int(_) => ScalarType::Int,
            Scalar::UInt(_) => ScalarType::UInt,
            Scalar::Float(_) => ScalarType::Float,
            Scalar::Double(_) => ScalarType::Double,
        }
    }

    /// Converts the value to `f32`. Large integers and doubles lose
    /// precision.
    pub fn as_f32(&self) -> f32 {
        match *self {
            Scalar::Char(v) => v.into(),
            Scalar::UChar(v) => v.into(),
            Scalar::Short(v) => v.into(),
            Scalar::UShort(v) => v.into(),
            Scalar::Int(v) => v as f32,
            Scalar::UInt(v) => v as f32,
            Scalar::Float(v) => v,
            Scalar::Double(v) => v as f32,
        }
    }

    /// Returns the value as vertex index, or `None` if it's negative or not
    /// an integer.
    pub fn as_index(&self) -> Option<u32> {
        match *self {
            Scalar::Char(v) => v.to_u32(),
            Scalar::UChar(v) => Some(v.into()),
            Scalar::Short(v) => v.to_u32(),
            Scalar::UShort(v) => Some(v.into()),
            Scalar::Int(v) => v.to_u32(),
            Scalar::UInt(v) => Some(v),
            Scalar::Float(_) | Scalar::Double(_) => None,
        }
    }

    /// Returns the value as list length, or `None` if it's negative or not an
    /// integer.
    pub fn as_len(&self) -> Option<usize> {
        self.as_index().and_then(|v| v.to_usize())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Scalar::Char(v) => v.fmt(f),
            Scalar::UChar(v) => v.fmt(f),
            Scalar::Short(v) => v.fmt(f),
            Scalar::UShort(v) => v.fmt(f),
            Scalar::Int(v) => v.fmt(f),
            Scalar::UInt(v) => v.fmt(f),
            Scalar::Float(v) => v.fmt(f),
            Scalar::Double(v) => v.fmt(f),
        }
    }
}


#[cfg(test)]
mod tests {
    use byteorder::{BigEndian, LittleEndian};

    use crate::io::Error;
    use super::*;

    #[test]
    fn type_names_and_aliases() {
        let pairs = [
            ("char", "int8", ScalarType::Char),
            ("uchar", "uint8", ScalarType::UChar),
            ("short", "int16", ScalarType::Short),
            ("ushort", "uint16", ScalarType::UShort),
            ("int", "int32", ScalarType::Int),
            ("uint", "uint32", ScalarType::UInt),
            ("float", "float32", ScalarType::Float),
            ("double", "float64", ScalarType::Double),
        ];

        for &(name, alias, ty) in &pairs {
            assert_eq!(name.parse::<ScalarType>().unwrap(), ty);
            assert_eq!(alias.parse::<ScalarType>().unwrap(), ty);
            assert_eq!(ty.ply_type_name(), name);
        }

        assert!("int64".parse::<ScalarType>().is_err());
        assert!("Float".parse::<ScalarType>().is_err());
    }

    #[test]
    fn widths() {
        let widths: Vec<_> = ScalarType::ALL.iter().map(|t| t.len()).collect();
        assert_eq!(widths, [1, 1, 2, 2, 4, 4, 4, 8]);
    }

    #[test]
    fn parse_ascii_tokens() {
        assert_eq!(ScalarType::UChar.parse_ascii("255"), Some(Scalar::UChar(255)));
        assert_eq!(ScalarType::UChar.parse_ascii("256"), None);
        assert_eq!(ScalarType::Char.parse_ascii("-128"), Some(Scalar::Char(-128)));
        assert_eq!(ScalarType::Int.parse_ascii("-7"), Some(Scalar::Int(-7)));
        assert_eq!(ScalarType::UInt.parse_ascii("-7"), None);
        assert_eq!(ScalarType::Int.parse_ascii("1.5"), None);
        assert_eq!(ScalarType::Float.parse_ascii("1.5"), Some(Scalar::Float(1.5)));
        assert_eq!(ScalarType::Float.parse_ascii("3"), Some(Scalar::Float(3.0)));
        assert_eq!(ScalarType::Double.parse_ascii("1e-3"), Some(Scalar::Double(1e-3)));
        assert_eq!(ScalarType::Double.parse_ascii("abc"), None);
    }

    #[test]
    fn read_binary_both_orders() -> Result<(), Error> {
        let buf = [0x12, 0x34, 0x00, 0x00, 0x80, 0x3f];

        let (v, offset) = ScalarType::UShort.read_binary::<LittleEndian>(&buf, 0)?;
        assert_eq!((v, offset), (Scalar::UShort(0x3412), 2));

        let (v, offset) = ScalarType::UShort.read_binary::<BigEndian>(&buf, 0)?;
        assert_eq!((v, offset), (Scalar::UShort(0x1234), 2));

        let (v, offset) = ScalarType::Float.read_binary::<LittleEndian>(&buf, 2)?;
        assert_eq!((v, offset), (Scalar::Float(1.0), 6));

        let (v, offset) = ScalarType::Char.read_binary_with(&buf, 4, Endianness::Big)?;
        assert_eq!((v, offset), (Scalar::Char(-128), 5));

        Ok(())
    }

    #[test]
    fn read_binary_underrun() {
        let buf = [0u8; 6];
        match ScalarType::Double.read_binary::<LittleEndian>(&buf, 0) {
            Err(Error::BufferUnderrun { offset: 0, needed: 8, available: 6 }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        match ScalarType::UChar.read_binary::<LittleEndian>(&buf, 6) {
            Err(Error::BufferUnderrun { offset: 6, needed: 1, available: 0 }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn index_conversion() {
        assert_eq!(Scalar::Int(5).as_index(), Some(5));
        assert_eq!(Scalar::Int(-1).as_index(), None);
        assert_eq!(Scalar::Char(-1).as_len(), None);
        assert_eq!(Scalar::UChar(4).as_len(), Some(4));
        assert_eq!(Scalar::Float(1.0).as_index(), None);
        assert_eq!(Scalar::from(3u8), Scalar::UChar(3));
        assert_eq!(Scalar::from(0.5f64), Scalar::Double(0.5));
    }
}
