//! Triangle soups turned into compounds
//!
//! Each triangle becomes a flat two-sided hull, so the finished compound has
//! no volume and falls back to box-approximated mass properties.

use crate::foundation::math::Vec3;

use super::convex::hull::MAX_TRIANGLE_MATERIAL;
use super::convex::{ConvexShape, HullShape};

/// One triangle with its material
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolysoupTriangle {
    /// Corner positions, physics units
    pub vertices: [Vec3; 3],
    /// 7-bit material
    pub material: u8,
}

/// Accumulates triangles until converted to a collide
#[derive(Debug, Clone, Default)]
pub struct Polysoup {
    triangles: Vec<PolysoupTriangle>,
}

impl Polysoup {
    /// An empty soup
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a triangle
    pub fn add_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3, material: u8) {
        self.triangles.push(PolysoupTriangle {
            vertices: [a, b, c],
            material: material & MAX_TRIANGLE_MATERIAL,
        });
    }

    /// Triangles added so far
    pub fn triangles(&self) -> &[PolysoupTriangle] {
        &self.triangles
    }

    /// Whether no triangle was added
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// One two-sided hull per triangle
    pub fn to_convexes(&self) -> Vec<ConvexShape> {
        self.triangles
            .iter()
            .filter_map(|triangle| {
                let mut hull = HullShape::new(triangle.vertices.to_vec(), vec![[0, 1, 2], [0, 2, 1]])?;
                hull.set_triangle_material(0, triangle.material);
                hull.set_triangle_material(1, triangle.material);
                Some(ConvexShape::hull(hull))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangles_become_flat_hulls() {
        let mut soup = Polysoup::new();
        soup.add_triangle(Vec3::zeros(), Vec3::x(), Vec3::y(), 0x85);
        let convexes = soup.to_convexes();
        assert_eq!(convexes.len(), 1);
        let hull = convexes[0].as_hull().unwrap();
        assert_eq!(hull.triangle_count(), 2);
        assert_eq!(hull.triangle_material(0), 5);
        assert_eq!(hull.triangle_material(1), 5);
        assert_eq!(hull.volume(), 0.0);
    }
}
