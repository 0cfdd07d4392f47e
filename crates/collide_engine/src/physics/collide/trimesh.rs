//! Static triangle meshes

use crate::foundation::math::{Aabb, Vec3};
use crate::physics::error::CollisionError;

/// Pre-tessellated world geometry with 16-bit indices
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleMeshShape {
    vertices: Vec<Vec3>,
    indices: Vec<u16>,
    surface_props: i32,
}

impl TriangleMeshShape {
    /// Create a mesh; `indices` holds three entries per triangle
    pub fn new(vertices: Vec<Vec3>, indices: Vec<u16>, surface_props: i32) -> Result<Self, CollisionError> {
        if indices.is_empty() || indices.len() % 3 != 0 {
            return Err(CollisionError::InvalidTriangleMesh);
        }
        if indices.iter().any(|&index| usize::from(index) >= vertices.len()) {
            return Err(CollisionError::InvalidTriangleMesh);
        }
        Ok(Self { vertices, indices, surface_props })
    }

    /// Mesh vertices
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Flat index list
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Surface material shared by the whole mesh
    pub fn surface_props(&self) -> i32 {
        self.surface_props
    }

    /// Sum of triangle areas
    pub fn surface_area(&self) -> f32 {
        self.indices
            .chunks_exact(3)
            .map(|triangle| {
                let [a, b, c] = [triangle[0], triangle[1], triangle[2]]
                    .map(|index| self.vertices[usize::from(index)]);
                0.5 * (b - a).cross(&(c - a)).norm()
            })
            .sum()
    }

    /// Bounding box of the vertices
    pub fn local_aabb(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter()).unwrap_or_else(|| Aabb::from_corners(Vec3::zeros(), Vec3::zeros()))
    }

    /// Vertex farthest along `direction`
    pub fn support_point(&self, direction: &Vec3) -> Vec3 {
        self.vertices
            .iter()
            .copied()
            .max_by(|a, b| a.dot(direction).total_cmp(&b.dot(direction)))
            .unwrap_or_else(Vec3::zeros)
    }
}
