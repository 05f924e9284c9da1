//! Everything related to writing a PLY file.
//!
//! - For ASCII encoding we simply use the `fmt::Display` impl of all types.
//!   Rust prints floats with the shortest representation that parses back to
//!   the same value, so ASCII files round-trip exactly.
//! - Colors are written as `uchar` channels, because that's what everyone
//!   expects, even though PLY could store float colors.

use std::{
    io::{self, Write},
    marker::PhantomData,
};

use byteorder::{BigEndian, ByteOrder, LittleEndian, WriteBytesExt};

use crate::{
    io::Error,
    mesh::{Color, Mesh},
};
use super::{
    Encoding,
    raw::{ElementDef, PropertyDef, PropertyType},
    scalar::{Scalar, ScalarType},
};


/// Used to configure how a [`Mesh`] is serialized and to write it.
///
/// ```
/// use plymesh::{Mesh, io::ply::{Config, Serializer}};
///
/// # fn main() -> Result<(), plymesh::Error> {
/// let mesh = Mesh::default();
/// let bytes = Serializer::binary().add_comment("empty").write_to_memory(&mesh)?;
/// let decoded = plymesh::decode(&bytes, &Config::new())?;
/// assert_eq!(decoded.num_vertices(), 0);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Serializer {
    encoding: Encoding,
    comments: Vec<String>,
}

impl Serializer {
    /// Creates a new serializer with binary encoding (native endianness).
    pub fn binary() -> Self {
        Self::new(Encoding::binary_native())
    }

    /// Creates a new serializer with ASCII encoding.
    ///
    /// ASCII encoding is usually a lot less space efficient and a lot slower
    /// to read and write than binary encoding.
    pub fn ascii() -> Self {
        Self::new(Encoding::Ascii)
    }

    pub fn new(encoding: Encoding) -> Self {
        Self {
            encoding,
            comments: vec![],
        }
    }

    /// Adds a `comment` line to the file header, after the comments stored
    /// in the mesh itself.
    ///
    /// The given string must not contain `'\n'` or else this method panics.
    pub fn add_comment(mut self, comment: impl Into<String>) -> Self {
        let comment = comment.into();

        assert!(!comment.contains('\n'), "PLY comments must not contain '\\n'!");

        self.comments.push(comment);
        self
    }

    /// Writes `mesh` into a `Vec<u8>` which is returned on success.
    pub fn write_to_memory(&self, mesh: &Mesh) -> Result<Vec<u8>, Error> {
        let mut out = Vec::new();
        self.write_to(mesh, &mut out)?;
        Ok(out)
    }

    /// Writes `mesh` as PLY file into the given `io::Write` instance.
    ///
    /// Positions (and normals, if present) are stored as `float`, colors as
    /// `uchar` and faces as `list uchar uint vertex_indices`. Only the raw
    /// arrays are written; derived data is recomputed when decoding.
    ///
    /// Returns [`Error::AttributeCountMismatch`] (and writes nothing) if
    /// `normals` or `colors` don't have one entry per position.
    pub fn write_to(&self, mesh: &Mesh, mut w: impl Write) -> Result<(), Error> {
        let num_vertices = mesh.positions.len();
        let attributes = [
            ("normals", mesh.normals.as_ref().map(Vec::len)),
            ("colors", mesh.colors.as_ref().map(Vec::len)),
        ];
        for &(attribute, len) in &attributes {
            match len {
                Some(found) if found != num_vertices => {
                    return Err(Error::AttributeCountMismatch {
                        attribute,
                        found,
                        expected: num_vertices,
                    });
                }
                _ => {}
            }
        }

        let vertex_def = vertex_def(mesh);
        let face_def = ElementDef {
            name: "face".into(),
            count: mesh.faces.len() as u64,
            property_defs: vec![PropertyDef {
                ty: PropertyType::List {
                    len_type: ScalarType::UChar,
                    scalar_type: ScalarType::UInt,
                },
                name: "vertex_indices".into(),
            }],
        };

        // ===================================================================
        // ===== Write header (this part is always ASCII)
        // ===================================================================
        w.write_all(b"ply\n")?;
        writeln!(w, "format {} 1.0", self.encoding.ply_name())?;

        for comment in mesh.comments.iter().chain(&self.comments) {
            writeln!(w, "comment {}", comment)?;
        }

        for def in &[&vertex_def, &face_def] {
            writeln!(w, "element {} {}", def.name, def.count)?;
            for prop in &def.property_defs {
                match prop.ty {
                    PropertyType::Scalar(ty) => {
                        writeln!(w, "property {} {}", ty, prop.name)?;
                    }
                    PropertyType::List { len_type, scalar_type } => {
                        writeln!(w, "property list {} {} {}", len_type, scalar_type, prop.name)?;
                    }
                }
            }
        }

        w.write_all(b"end_header\n")?;


        // ===================================================================
        // ===== Write body
        // ===================================================================
        match self.encoding {
            Encoding::Ascii => write_body(&mut w, mesh, AsciiEncoding),
            Encoding::BinaryBigEndian => {
                write_body(&mut w, mesh, BinaryEncoding::<BigEndian>(PhantomData))
            }
            Encoding::BinaryLittleEndian => {
                write_body(&mut w, mesh, BinaryEncoding::<LittleEndian>(PhantomData))
            }
        }
    }
}

fn vertex_def(mesh: &Mesh) -> ElementDef {
    let float = PropertyType::Scalar(ScalarType::Float);
    let uchar = PropertyType::Scalar(ScalarType::UChar);
    let mut names = vec![("x", float), ("y", float), ("z", float)];

    if mesh.normals.is_some() {
        names.extend_from_slice(&[("nx", float), ("ny", float), ("nz", float)]);
    }
    if mesh.colors.is_some() {
        names.extend_from_slice(&[("red", uchar), ("green", uchar), ("blue", uchar)]);
    }

    ElementDef {
        name: "vertex".into(),
        count: mesh.positions.len() as u64,
        property_defs: names.into_iter()
            .map(|(name, ty)| PropertyDef { ty, name: name.into() })
            .collect(),
    }
}

fn write_body<W: Write, E: EncodingWriter>(w: &mut W, mesh: &Mesh, enc: E) -> Result<(), Error> {
    let mut row = Vec::with_capacity(9);

    for (i, p) in mesh.positions.iter().enumerate() {
        row.clear();
        row.extend_from_slice(&[Scalar::Float(p.x), Scalar::Float(p.y), Scalar::Float(p.z)]);

        if let Some(normals) = &mesh.normals {
            let n = normals[i];
            row.extend_from_slice(&[Scalar::Float(n.x), Scalar::Float(n.y), Scalar::Float(n.z)]);
        }
        if let Some(colors) = &mesh.colors {
            let Color { r, g, b } = colors[i];
            row.extend([r, g, b].iter().map(|&c| Scalar::UChar(color_to_u8(c))));
        }

        enc.write_row(w, &row)?;
    }

    for &[a, b, c] in &mesh.faces {
        row.clear();
        row.extend_from_slice(&[Scalar::UChar(3), a.into(), b.into(), c.into()]);
        enc.write_row(w, &row)?;
    }

    Ok(())
}

fn color_to_u8(c: f32) -> u8 {
    // `as` saturates, so values outside `0..=1` are clamped.
    (c * 255.0).round() as u8
}


// ===========================================================================
// ===== Encodings
// ===========================================================================

/// Abstracts over the three encodings when writing the body.
trait EncodingWriter {
    fn write_scalar(&self, w: &mut impl Write, v: Scalar) -> io::Result<()>;

    /// Writes one element. Elements in ASCII files are separated by spaces
    /// and terminated by a linebreak.
    fn write_row(&self, w: &mut impl Write, row: &[Scalar]) -> io::Result<()>;
}

struct AsciiEncoding;

impl EncodingWriter for AsciiEncoding {
    fn write_scalar(&self, w: &mut impl Write, v: Scalar) -> io::Result<()> {
        write!(w, "{}", v)
    }

    fn write_row(&self, w: &mut impl Write, row: &[Scalar]) -> io::Result<()> {
        for (i, &v) in row.iter().enumerate() {
            if i != 0 {
                w.write_all(b" ")?;
            }
            self.write_scalar(w, v)?;
        }
        w.write_all(b"\n")
    }
}

struct BinaryEncoding<B: ByteOrder>(PhantomData<B>);

impl<B: ByteOrder> EncodingWriter for BinaryEncoding<B> {
    fn write_scalar(&self, w: &mut impl Write, v: Scalar) -> io::Result<()> {
        match v {
            Scalar::Char(v) => w.write_i8(v),
            Scalar::UChar(v) => w.write_u8(v),
            Scalar::Short(v) => w.write_i16::<B>(v),
            Scalar::UShort(v) => w.write_u16::<B>(v),
            Scalar::Int(v) => w.write_i32::<B>(v),
            Scalar::UInt(v) => w.write_u32::<B>(v),
            Scalar::Float(v) => w.write_f32::<B>(v),
            Scalar::Double(v) => w.write_f64::<B>(v),
        }
    }

    fn write_row(&self, w: &mut impl Write, row: &[Scalar]) -> io::Result<()> {
        row.iter().try_for_each(|&v| self.write_scalar(w, v))
    }
}
