//! Hull construction from unordered point clouds
//!
//! Wraps the quickhull implementation from `parry3d`. Input that spans less
//! than three dimensions is rejected up front so that a flat or collinear
//! cloud never turns into a zero-volume hull.

use parry3d::transformation::convex_hull;

use crate::foundation::math::{Point3, Vec3};
use crate::physics::error::CollisionError;

use super::hull::HullShape;

/// Builds [`HullShape`]s from arbitrary point sets
#[derive(Debug, Clone)]
pub struct HullBuilder {
    /// Relative tolerance used to detect collinear and coplanar input
    relative_epsilon: f32,
}

impl HullBuilder {
    /// Create a builder with the default degeneracy tolerance
    pub fn new() -> Self {
        Self { relative_epsilon: 1.0e-5 }
    }

    /// Create a builder with a custom degeneracy tolerance
    pub fn with_relative_epsilon(relative_epsilon: f32) -> Self {
        Self { relative_epsilon }
    }

    /// Compute the convex hull of `points`.
    ///
    /// Fails with fewer than three points, and when the points do not span a
    /// volume (the hull algorithm would only produce a flat result).
    pub fn build_from_points(&self, points: &[Vec3]) -> Result<HullShape, CollisionError> {
        if points.len() < 3 {
            return Err(CollisionError::TooFewPoints(points.len()));
        }
        if !self.spans_volume(points) {
            log::warn!("Convex hull creation failed: {} points do not span a volume", points.len());
            return Err(CollisionError::DegenerateHull);
        }

        let cloud: Vec<Point3> = points.iter().map(|p| Point3::from(*p)).collect();
        let (vertices, triangles) = convex_hull(&cloud);
        if triangles.is_empty() {
            log::warn!("Convex hull creation failed: no faces for {} points", points.len());
            return Err(CollisionError::DegenerateHull);
        }

        let vertices = vertices.into_iter().map(|p| p.coords).collect();
        HullShape::new(vertices, triangles).ok_or(CollisionError::DegenerateHull)
    }

    fn spans_volume(&self, points: &[Vec3]) -> bool {
        let origin = points[0];
        let Some(far) = farthest_by(points, |p| (p - origin).norm_squared()) else {
            return false;
        };
        let edge = far - origin;
        let scale = edge.norm();
        if scale <= f32::EPSILON {
            return false;
        }
        let tolerance = self.relative_epsilon * scale;

        let Some(wide) = farthest_by(points, |p| edge.cross(&(p - origin)).norm_squared()) else {
            return false;
        };
        let normal = edge.cross(&(wide - origin));
        if normal.norm() <= tolerance * scale {
            return false;
        }

        let normal = normal.normalize();
        points
            .iter()
            .any(|p| normal.dot(&(p - origin)).abs() > tolerance)
    }
}

impl Default for HullBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn farthest_by(points: &[Vec3], metric: impl Fn(&Vec3) -> f32) -> Option<Vec3> {
    points
        .iter()
        .copied()
        .max_by(|a, b| metric(a).total_cmp(&metric(b)))
}
