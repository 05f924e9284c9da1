use cgmath::{Point3, Vector3};
use tracing::{debug, warn};

use crate::{
    algo::{
        bounding::{fast_sphere, BoundingSphere},
        normals,
    },
    io::{
        Error,
        ply::{Config, ElementDef, Property, PropertyType, RawSink, Record, Scalar},
    },
};


/// An RGB color with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// A triangle mesh as decoded from a PLY file.
///
/// All per-vertex arrays (`positions`, `normals`, `colors`) are indexed by
/// the vertex indices stored in `faces`. The `face_*` arrays are indexed like
/// `faces`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub positions: Vec<Point3<f32>>,

    /// Vertex normals, either decoded (`nx`, `ny`, `nz`) or computed.
    pub normals: Option<Vec<Vector3<f32>>>,

    /// Vertex colors (`red`, `green`, `blue`).
    pub colors: Option<Vec<Color>>,

    /// Triangles. Quads from the file are split into two triangles.
    pub faces: Vec<[u32; 3]>,

    /// One normal per triangle. Only present if normals were computed.
    pub face_normals: Option<Vec<Vector3<f32>>>,

    /// The normals of the three vertices of each triangle.
    pub face_vertex_normals: Option<Vec<[Vector3<f32>; 3]>>,

    /// The colors of the three vertices of each triangle.
    pub face_vertex_colors: Option<Vec<[Color; 3]>>,

    /// A bounding sphere around all positions. `None` if there are no
    /// vertices.
    pub bounding_sphere: Option<BoundingSphere>,

    /// The comments from the file header.
    pub comments: Vec<String>,
}

impl Mesh {
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    pub fn is_colored(&self) -> bool {
        self.colors.is_some()
    }
}


// ===========================================================================
// ===== MeshBuilder
// ===========================================================================

/// Where to find the interesting properties of the current element group.
/// Resolved once per group in `element_group_start`.
#[derive(Debug, Clone, Copy)]
enum Layout {
    Vertex {
        position: [usize; 3],
        normal: Option<[usize; 3]>,
        color: Option<[usize; 3]>,
    },
    Face {
        indices: usize,
    },
    Ignored,
}

/// A [`RawSink`] that assembles a [`Mesh`] from `vertex` and `face`
/// elements. All other elements are ignored.
///
/// After the body has been read, [`MeshBuilder::finish`] validates the faces
/// and computes the derived data.
#[derive(Debug)]
pub struct MeshBuilder {
    compute_normals: bool,
    skip_unsupported_polygons: bool,

    layout: Layout,
    positions: Vec<Point3<f32>>,
    normals: Vec<Vector3<f32>>,
    colors: Vec<Color>,
    has_normals: bool,
    colored: bool,
    faces: Vec<[u32; 3]>,
    face_records: usize,
}

impl MeshBuilder {
    pub fn new(config: &Config) -> Self {
        Self {
            compute_normals: config.computes_normals(),
            skip_unsupported_polygons: config.skips_unsupported_polygons(),
            layout: Layout::Ignored,
            positions: Vec::new(),
            normals: Vec::new(),
            colors: Vec::new(),
            has_normals: false,
            colored: false,
            faces: Vec::new(),
            face_records: 0,
        }
    }

    /// Validates the collected data and computes normals (if configured),
    /// the per-face views and the bounding sphere.
    pub fn finish(self) -> Result<Mesh, Error> {
        let num_vertices = self.positions.len();
        if let Some(&index) = self.faces.iter().flatten().find(|&&i| i as usize >= num_vertices) {
            return Err(Error::IndexOutOfBounds { index, num_vertices });
        }

        let mut face_normals = None;
        let normals = if self.compute_normals {
            let per_face = normals::face_normals(&self.positions, &self.faces);
            let per_vertex = normals::vertex_normals(num_vertices, &self.faces, &per_face);
            face_normals = Some(per_face);
            Some(per_vertex)
        } else if self.has_normals {
            check_count("normals", self.normals.len(), num_vertices)?;
            Some(self.normals)
        } else {
            None
        };

        let colors = if self.colored {
            check_count("colors", self.colors.len(), num_vertices)?;
            Some(self.colors)
        } else {
            None
        };

        let faces = &self.faces;
        let face_vertex_normals = normals.as_ref().map(|n| per_face_view(faces, n));
        let face_vertex_colors = colors.as_ref().map(|c| per_face_view(faces, c));
        let bounding_sphere = fast_sphere(&self.positions);

        Ok(Mesh {
            positions: self.positions,
            normals,
            colors,
            faces: self.faces,
            face_normals,
            face_vertex_normals,
            face_vertex_colors,
            bounding_sphere,
            comments: vec![],
        })
    }

    fn add_face(&mut self, indices: &[Scalar]) -> Result<(), Error> {
        let face = self.face_records;
        self.face_records += 1;

        let to_index = |v: &Scalar| v.as_index().ok_or_else(|| Error::InvalidIndex {
            face,
            value: v.to_string(),
        });

        match indices {
            [a, b, c] => {
                self.faces.push([to_index(a)?, to_index(b)?, to_index(c)?]);
            }
            [a, b, c, d] => {
                let [a, b, c, d] = [to_index(a)?, to_index(b)?, to_index(c)?, to_index(d)?];
                self.faces.push([a, b, d]);
                self.faces.push([b, c, d]);
            }
            _ if self.skip_unsupported_polygons => {
                warn!(face, len = indices.len(), "skipping face that is neither triangle nor quad");
            }
            _ => return Err(Error::UnsupportedPolygon { face, len: indices.len() }),
        }

        Ok(())
    }
}

impl RawSink for MeshBuilder {
    fn element_group_start(&mut self, def: &ElementDef) -> Result<(), Error> {
        self.layout = match def.name.as_str() {
            "vertex" => {
                let position = [
                    scalar_pos(def, "x").ok_or_else(|| missing(def, "x"))?,
                    scalar_pos(def, "y").ok_or_else(|| missing(def, "y"))?,
                    scalar_pos(def, "z").ok_or_else(|| missing(def, "z"))?,
                ];
                let normal = scalar_triple(def, ["nx", "ny", "nz"]);
                let color = scalar_triple(def, ["red", "green", "blue"]);

                self.has_normals |= normal.is_some();
                self.colored |= color.is_some();
                self.positions.reserve(clamped_count(def));

                Layout::Vertex { position, normal, color }
            }
            "face" => {
                let is_list = |name: &str| {
                    def.prop_pos(name).filter(|&i| def.property_defs[i].ty.is_list())
                };
                let indices = is_list("vertex_indices")
                    .or_else(|| is_list("vertex_index"))
                    .or_else(|| def.property_defs.iter().position(|p| p.ty.is_list()))
                    .ok_or_else(|| missing(def, "vertex_indices"))?;

                Layout::Face { indices }
            }
            other => {
                debug!(element = other, count = def.count, "ignoring PLY element group");
                Layout::Ignored
            }
        };

        Ok(())
    }

    fn element(&mut self, record: Record<'_>) -> Result<(), Error> {
        let get = |idx: usize| match record.at(idx) {
            Property::Scalar(v) => v.as_f32(),
            // Positions are checked to be scalar properties in
            // `element_group_start`.
            Property::List(_) => f32::NAN,
        };

        match self.layout {
            Layout::Vertex { position: [x, y, z], normal, color } => {
                self.positions.push(Point3::new(get(x), get(y), get(z)));

                if let (Some([x, y, z]), false) = (normal, self.compute_normals) {
                    self.normals.push(Vector3::new(get(x), get(y), get(z)));
                }

                if let Some(channels) = color {
                    let [r, g, b] = channels.map(|idx| color_channel(record.at(idx)));
                    self.colors.push(Color::new(r, g, b));
                }
            }
            Layout::Face { indices } => {
                let list = record.at(indices).as_list().unwrap_or(&[]);
                self.add_face(list)?;
            }
            Layout::Ignored => {}
        }

        Ok(())
    }
}

/// Integer channels are interpreted as `0..=255`, floating point channels
/// are taken as they are.
fn color_channel(prop: &Property) -> f32 {
    match prop.as_scalar() {
        Some(v) if v.ty().is_floating_point() => v.as_f32(),
        Some(v) => v.as_f32() / 255.0,
        None => f32::NAN,
    }
}

fn scalar_pos(def: &ElementDef, name: &str) -> Option<usize> {
    def.prop_pos(name)
        .filter(|&i| matches!(def.property_defs[i].ty, PropertyType::Scalar(_)))
}

fn scalar_triple(def: &ElementDef, names: [&str; 3]) -> Option<[usize; 3]> {
    Some([
        scalar_pos(def, names[0])?,
        scalar_pos(def, names[1])?,
        scalar_pos(def, names[2])?,
    ])
}

fn missing(def: &ElementDef, property: &'static str) -> Error {
    Error::MissingProperty {
        element: def.name.clone(),
        property,
    }
}

/// The element count is only used as a capacity hint, so a bogus count in
/// the header doesn't make us allocate gigabytes.
fn clamped_count(def: &ElementDef) -> usize {
    const MAX_HINT: u64 = 1 << 20;
    std::cmp::min(def.count, MAX_HINT) as usize
}

fn check_count(attribute: &'static str, found: usize, expected: usize) -> Result<(), Error> {
    if found != expected {
        return Err(Error::AttributeCountMismatch { attribute, found, expected });
    }
    Ok(())
}

fn per_face_view<T: Copy>(faces: &[[u32; 3]], values: &[T]) -> Vec<[T; 3]> {
    faces.iter()
        .map(|&[a, b, c]| [values[a as usize], values[b as usize], values[c as usize]])
        .collect()
}
