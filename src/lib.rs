//! Decoding of PLY meshes into a simple triangle mesh representation.
//!
//! The PLY format consists of a textual header describing a schema (elements
//! with typed properties) followed by the element data, either as ASCII text
//! or as packed binary records. This crate parses the header, decodes the
//! body according to it and assembles a [`Mesh`] with positions, optional
//! normals and colors and triangulated faces.
//!
//! ```
//! use plymesh::io::ply::Config;
//!
//! let src = "\
//!     ply\n\
//!     format ascii 1.0\n\
//!     element vertex 3\n\
//!     property float x\n\
//!     property float y\n\
//!     property float z\n\
//!     element face 1\n\
//!     property list uchar int vertex_indices\n\
//!     end_header\n\
//!     0 0 0\n\
//!     1 0 0\n\
//!     0 1 0\n\
//!     3 0 1 2\n\
//! ";
//!
//! let mesh = plymesh::decode(src.as_bytes(), &Config::new()).unwrap();
//! assert_eq!(mesh.positions.len(), 3);
//! assert_eq!(mesh.faces, vec![[0, 1, 2]]);
//! ```
//!
//! The crate never touches the file system or the network: it receives a
//! buffer and returns a mesh.

pub mod algo;
pub mod io;
mod mesh;

pub use self::{
    io::{
        Error,
        ply::{decode, decode_ascii},
    },
    mesh::{Color, Mesh, MeshBuilder},
};
