//! Decoding and encoding PLY files.
//!
//! # Random notes on the format
//!
//! Unfortunately, the PLY format is terribly underspecified (as are most mesh
//! formats). Therefore, here are a few notes on missing information or this
//! particular implementation.
//!
//! - The specs say "The header is a series of carriage-return terminated
//!   lines", but the example files used by the specs and all files in the wild
//!   use `'\n'` as terminator. We split on `'\n'` and trim, so `"\r\n"` works
//!   as well.
//! - Besides the classic type names (`char`, `uchar`, ..., `double`), many
//!   exporters use the sized names (`int8`, `uint8`, ..., `float64`). Both
//!   are accepted.
//! - Header lines with unknown keywords (like `obj_info`) are skipped.
//! - In ASCII bodies, each element instance is stored in exactly one line.

use std::collections::HashMap;

use tracing::instrument;

use crate::{io::Error, mesh::Mesh};

mod ascii;
mod binary;
mod header;
pub mod raw;
mod read;
mod scalar;
mod write;



pub use self::{
    header::Header,
    raw::{ElementDef, Property, PropertyDef, PropertyType, RawResult, RawSink, Record},
    read::Reader,
    scalar::{Endianness, Scalar, ScalarType, ScalarTypeParseError},
    write::Serializer,
};


/// The encoding of the body of a PLY file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    Ascii,
    BinaryBigEndian,
    BinaryLittleEndian,
}

impl Encoding {
    /// Returns the binary encoding with the native byte order of the target.
    pub fn binary_native() -> Self {
        #[cfg(target_endian = "big")]
        { Encoding::BinaryBigEndian }

        #[cfg(target_endian = "little")]
        { Encoding::BinaryLittleEndian }
    }

    /// The name used in the `format` header line.
    pub fn ply_name(&self) -> &'static str {
        match self {
            Encoding::Ascii => "ascii",
            Encoding::BinaryBigEndian => "binary_big_endian",
            Encoding::BinaryLittleEndian => "binary_little_endian",
        }
    }

    /// Returns the byte order for binary encodings, `None` for ASCII.
    pub fn endianness(&self) -> Option<Endianness> {
        match self {
            Encoding::Ascii => None,
            Encoding::BinaryBigEndian => Some(Endianness::Big),
            Encoding::BinaryLittleEndian => Some(Endianness::Little),
        }
    }
}


// ===========================================================================
// ===== Config
// ===========================================================================

/// Configuration of the decoder.
///
/// Created with [`Config::new`] (or `Default`) and adjusted with the builder
/// methods. The default configuration doesn't rename any properties, uses the
/// normals stored in the file and fails on polygons with more than four
/// vertices.
///
/// ```
/// use plymesh::io::ply::Config;
///
/// let config = Config::new()
///     .map_property("diffuse_red", "red")
///     .map_property("diffuse_green", "green")
///     .map_property("diffuse_blue", "blue")
///     .compute_normals(true);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Config {
    property_name_mapping: HashMap<String, String>,
    compute_normals: bool,
    skip_unsupported_polygons: bool,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renames the property `from` to `to` in every element. Renaming happens
    /// while parsing the header, so everything after that (including
    /// [`RawSink`]s) only sees the new name.
    pub fn map_property(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.property_name_mapping.insert(from.into(), to.into());
        self
    }

    /// Replaces the whole property name mapping.
    pub fn property_name_mapping<I, K, V>(mut self, mapping: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.property_name_mapping = mapping.into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// If set, normals stored in the file are ignored and vertex normals are
    /// computed from the faces instead.
    pub fn compute_normals(mut self, compute: bool) -> Self {
        self.compute_normals = compute;
        self
    }

    /// If set, faces that are neither triangles nor quads are skipped (with a
    /// warning) instead of failing with [`Error::UnsupportedPolygon`].
    pub fn skip_unsupported_polygons(mut self, skip: bool) -> Self {
        self.skip_unsupported_polygons = skip;
        self
    }

    pub fn computes_normals(&self) -> bool {
        self.compute_normals
    }

    pub fn skips_unsupported_polygons(&self) -> bool {
        self.skip_unsupported_polygons
    }

    /// Applies the property name mapping to `name`.
    pub fn map_name(&self, name: &str) -> String {
        self.property_name_mapping
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }
}


// ===========================================================================
// ===== Entry points
// ===========================================================================

/// Decodes a whole PLY file (in any encoding) into a [`Mesh`].
#[instrument(skip_all, fields(len = data.len()))]
pub fn decode(data: &[u8], config: &Config) -> Result<Mesh, Error> {
    Reader::new(data, config)?.read_mesh()
}

/// Decodes an ASCII PLY file. Returns [`Error::EncodingMismatch`] if the
/// header declares a binary encoding.
#[instrument(skip_all, fields(len = text.len()))]
pub fn decode_ascii(text: &str, config: &Config) -> Result<Mesh, Error> {
    let reader = Reader::new(text.as_bytes(), config)?;
    match reader.header().encoding {
        Encoding::Ascii => reader.read_mesh(),
        other => Err(Error::EncodingMismatch { declared: other.ply_name() }),
    }
}

/// Parses only the header and returns the declared body encoding.
pub fn sniff_encoding(data: &[u8]) -> Result<Encoding, Error> {
    Header::parse(data, &Config::new()).map(|h| h.encoding)
}

/// Returns `true` if the header declares an ASCII body.
pub fn is_ascii(data: &[u8]) -> Result<bool, Error> {
    sniff_encoding(data).map(|e| e == Encoding::Ascii)
}
