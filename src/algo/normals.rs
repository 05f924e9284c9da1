//! Computing face and vertex normals of triangle meshes.

use cgmath::{
    prelude::*,
    Point3, Vector3,
};


/// Calculates the normal of each triangle.
///
/// The normal is `(c - b) × (a - b)`, i.e. it points towards the side from
/// which the vertices appear counter-clockwise. Degenerate triangles get a
/// zero normal.
///
/// All indices in `faces` have to be valid for `positions`.
pub fn face_normals(positions: &[Point3<f32>], faces: &[[u32; 3]]) -> Vec<Vector3<f32>> {
    faces.iter()
        .map(|face| {
            let [a, b, c] = face.map(|i| positions[i as usize]);
            normalize_or_zero((c - b).cross(a - b))
        })
        .collect()
}

/// Calculates vertex normals by averaging the normals of all adjacent faces.
///
/// Each face contributes its (normalized) normal once, regardless of its
/// area. Vertices without adjacent faces get a zero normal.
pub fn vertex_normals(
    num_vertices: usize,
    faces: &[[u32; 3]],
    face_normals: &[Vector3<f32>],
) -> Vec<Vector3<f32>> {
    let mut out = vec![Vector3::new(0.0, 0.0, 0.0); num_vertices];
    for (face, normal) in faces.iter().zip(face_normals) {
        for &v in face {
            out[v as usize] += *normal;
        }
    }

    for n in &mut out {
        *n = normalize_or_zero(*n);
    }
    out
}

fn normalize_or_zero(v: Vector3<f32>) -> Vector3<f32> {
    let len = v.magnitude();
    if len > 0.0 {
        v / len
    } else {
        v
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_quad() {
        let positions = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let faces = [[0, 1, 3], [1, 2, 3]];

        let per_face = face_normals(&positions, &faces);
        assert_eq!(per_face, vec![Vector3::unit_z(); 2]);

        let per_vertex = vertex_normals(4, &faces, &per_face);
        assert_eq!(per_vertex, vec![Vector3::unit_z(); 4]);
    }

    #[test]
    fn degenerate_and_isolated() {
        let positions = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(5.0, 5.0, 5.0),
        ];
        let faces = [[0, 1, 2]];

        let per_face = face_normals(&positions, &faces);
        assert_eq!(per_face, vec![Vector3::new(0.0, 0.0, 0.0)]);

        let per_vertex = vertex_normals(4, &faces, &per_face);
        assert_eq!(per_vertex[3], Vector3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn corner_averages_faces() {
        // Two triangles meeting at a right angle along the x axis.
        let positions = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        let faces = [[0, 1, 2], [0, 3, 1]];

        let per_face = face_normals(&positions, &faces);
        assert_eq!(per_face[0], Vector3::unit_z());
        assert_eq!(per_face[1], Vector3::unit_y());

        let per_vertex = vertex_normals(4, &faces, &per_face);
        let expected = Vector3::new(0.0, 1.0, 1.0).normalize();
        assert!((per_vertex[0] - expected).magnitude() < 1e-6);
        assert_eq!(per_vertex[2], Vector3::unit_z());
    }
}
