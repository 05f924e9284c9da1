//! Geometric algorithms used to post-process decoded meshes.

pub mod bounding;
pub mod normals;
