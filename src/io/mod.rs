//! Reading and writing meshes from and to byte buffers.
//!
//! Currently, only PLY is supported (see [`ply`]). Everything in here works on
//! in-memory data: fetching bytes from somewhere is the caller's job.

use std::io;

use failure::Fail;

use self::ply::ScalarType;


pub mod ply;


/// Everything that can go wrong while decoding or encoding a mesh.
///
/// Every error is fatal: as soon as one is returned, decoding stops and no
/// partial mesh is produced.
#[derive(Debug, Fail)]
pub enum Error {
    // ----- Header -----------------------------------------------------------
    #[fail(display = "not a valid PLY file (does not start with \"ply\")")]
    MissingMagic,

    #[fail(display = "PLY header is missing the 'format' line")]
    MissingFormat,

    #[fail(display = "PLY header is not terminated by an 'end_header' line")]
    MissingEndHeader,

    #[fail(display = "invalid header line {} ({}): {}", line, content, msg)]
    InvalidHeaderLine {
        /// Line number (1-based) within the header.
        line: usize,
        content: String,
        msg: String,
    },

    #[fail(
        display = "file declares '{}' encoding, but was passed to the ASCII decoder",
        declared
    )]
    EncodingMismatch {
        declared: &'static str,
    },

    // ----- Values -----------------------------------------------------------
    #[fail(
        display = "invalid '{}' value {} for property '{}' of element '{}' (body line {})",
        ty, token, property, element, line
    )]
    InvalidValue {
        element: String,
        property: String,
        token: String,
        ty: ScalarType,
        line: usize,
    },

    #[fail(
        display = "invalid list length {} for property '{}' of element '{}'",
        value, property, element
    )]
    InvalidListLength {
        element: String,
        property: String,
        value: String,
    },

    #[fail(display = "body contains non UTF-8 data (at byte {})", _0)]
    NotAscii(usize),

    #[fail(display = "invalid vertex index {} in face {}", value, face)]
    InvalidIndex {
        face: usize,
        value: String,
    },

    // ----- Body length ------------------------------------------------------
    #[fail(
        display = "unexpected end of binary data: {} bytes needed at offset {}, but \
            only {} bytes available",
        needed, offset, available
    )]
    BufferUnderrun {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[fail(
        display = "unexpected end of input: element '{}' declares {} instances, but \
            only {} were found",
        element, expected, found
    )]
    TruncatedInput {
        element: String,
        expected: u64,
        found: u64,
    },

    #[fail(
        display = "malformed record of element '{}' in body line {}: not enough values",
        element, line
    )]
    MalformedRecord {
        element: String,
        line: usize,
    },

    #[fail(display = "unexpected additional data after all elements (at {})", _0)]
    TrailingData(String),

    // ----- Mesh assembly ----------------------------------------------------
    #[fail(display = "element '{}' is missing the property '{}'", element, property)]
    MissingProperty {
        element: String,
        property: &'static str,
    },

    #[fail(
        display = "face {} has {} vertices, but only triangles and quads are supported",
        face, len
    )]
    UnsupportedPolygon {
        face: usize,
        len: usize,
    },

    #[fail(
        display = "face references vertex {}, but there are only {} vertices",
        index, num_vertices
    )]
    IndexOutOfBounds {
        index: u32,
        num_vertices: usize,
    },

    #[fail(display = "found {} {}, but the mesh has {} vertices", found, attribute, expected)]
    AttributeCountMismatch {
        attribute: &'static str,
        found: usize,
        expected: usize,
    },

    // ----- Writing ----------------------------------------------------------
    #[fail(display = "IO error: {}", _0)]
    Io(io::Error),
}

impl From<io::Error> for Error {
    fn from(src: io::Error) -> Self {
        Error::Io(src)
    }
}

/// Formats a chunk of input for an error message: as (debug-escaped) string
/// if it's valid UTF-8, as byte list otherwise.
pub(crate) fn debug_fmt_bytes(data: &[u8]) -> String {
    if let Ok(s) = std::str::from_utf8(data) {
        format!("{:?}", s)
    } else {
        format!("{:?}", data)
    }
}
