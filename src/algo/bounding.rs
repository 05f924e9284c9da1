use std::fmt;

use cgmath::{
    prelude::*,
    Point3,
};


/// A bounding sphere defined by a center and a radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Point3<f32>,
    pub radius: f32,
}

impl BoundingSphere {
    /// Returns `true` if `p` lies inside or on the sphere.
    pub fn contains(&self, p: Point3<f32>) -> bool {
        p.distance(self.center) <= self.radius
    }
}

/// A fast algorithm to obtain a bounding sphere of a set of points.
///
/// The returned bounding sphere is usually not minimal. This algorithm is very
/// simple: first, the axis aligned bounding box is calculated. The center of
/// that bounding box is the center of the resulting bounding sphere. The
/// radius of the sphere is simply the maximum distance from the center to a
/// point. As such, this function iterates over all points twice.
///
/// Returns `None` if `positions` is empty.
pub fn fast_sphere(positions: &[Point3<f32>]) -> Option<BoundingSphere> {
    if positions.is_empty() {
        return None;
    }

    let center = BoundingBox::around(positions.iter().copied()).center();
    let radius = positions.iter()
        .map(|p| p.distance(center))
        .fold(0.0, f32::max);

    Some(BoundingSphere { center, radius })
}


/// An axis aligned bounding box.
#[derive(Clone, Copy, PartialEq)]
pub struct BoundingBox {
    x_range: [f32; 2],
    y_range: [f32; 2],
    z_range: [f32; 2],
}

impl BoundingBox {
    /// Creates an invalid bounding box: all lower bounds are ∞, all upper
    /// bounds are -∞. Once you added a single point, the bounding box will be
    /// valid.
    pub fn new() -> Self {
        Self {
            x_range: [f32::INFINITY, f32::NEG_INFINITY],
            y_range: [f32::INFINITY, f32::NEG_INFINITY],
            z_range: [f32::INFINITY, f32::NEG_INFINITY],
        }
    }

    /// Creates a bounding box around all points of the given iterator. If the
    /// iterator is empty, an invalid bounding box is returned (see
    /// [`BoundingBox::new`]).
    pub fn around(iter: impl IntoIterator<Item = Point3<f32>>) -> Self {
        let mut out = Self::new();
        for pos in iter {
            out.add_point(pos);
        }
        out
    }

    /// Returns the `[lower, upper]` limits for the x coordinate.
    pub fn x(&self) -> [f32; 2] {
        self.x_range
    }

    /// Returns the `[lower, upper]` limits for the y coordinate.
    pub fn y(&self) -> [f32; 2] {
        self.y_range
    }

    /// Returns the `[lower, upper]` limits for the z coordinate.
    pub fn z(&self) -> [f32; 2] {
        self.z_range
    }

    /// Returns the center of this bounding box.
    pub fn center(&self) -> Point3<f32> {
        Point3::new(
            (self.x_range[1] + self.x_range[0]) / 2.0,
            (self.y_range[1] + self.y_range[0]) / 2.0,
            (self.z_range[1] + self.z_range[0]) / 2.0,
        )
    }

    /// Adds a point to the bounding box, enlarging it if the point lies
    /// outside of the box.
    pub fn add_point(&mut self, p: Point3<f32>) {
        fn min(state: &mut f32, new: f32) {
            if new < *state {
                *state = new;
            }
        }
        fn max(state: &mut f32, new: f32) {
            if new > *state {
                *state = new;
            }
        }

        min(&mut self.x_range[0], p.x);
        max(&mut self.x_range[1], p.x);
        min(&mut self.y_range[0], p.y);
        max(&mut self.y_range[1], p.y);
        min(&mut self.z_range[0], p.z);
        max(&mut self.z_range[1], p.z);
    }

    /// Returns `true` if all bounds are finite.
    pub fn is_valid(&self) -> bool {
        self.x_range[0].is_finite()
            && self.x_range[1].is_finite()
            && self.y_range[0].is_finite()
            && self.y_range[1].is_finite()
            && self.z_range[0].is_finite()
            && self.z_range[1].is_finite()
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("BoundingBox")
            .field("x", &(self.x_range[0]..self.x_range[1]))
            .field("y", &(self.y_range[0]..self.y_range[1]))
            .field("z", &(self.z_range[0]..self.z_range[1]))
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty() {
        assert_eq!(fast_sphere(&[]), None);
        assert!(!BoundingBox::new().is_valid());
    }

    #[test]
    fn unit_cube() {
        let mut points = vec![];
        for &x in &[0.0, 1.0] {
            for &y in &[0.0, 1.0] {
                for &z in &[0.0, 1.0] {
                    points.push(Point3::new(x, y, z));
                }
            }
        }

        let bb = BoundingBox::around(points.iter().copied());
        assert!(bb.is_valid());
        assert_eq!(bb.x(), [0.0, 1.0]);
        assert_eq!(bb.center(), Point3::new(0.5, 0.5, 0.5));

        let sphere = fast_sphere(&points).unwrap();
        assert_eq!(sphere.center, Point3::new(0.5, 0.5, 0.5));
        assert!((sphere.radius - 0.75f32.sqrt()).abs() < 1e-6);
        assert!(points.iter().all(|&p| sphere.contains(p)));
    }

    #[test]
    fn single_point() {
        let sphere = fast_sphere(&[Point3::new(3.0, -1.0, 2.0)]).unwrap();
        assert_eq!(sphere.center, Point3::new(3.0, -1.0, 2.0));
        assert_eq!(sphere.radius, 0.0);
    }
}
