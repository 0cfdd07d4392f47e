//! Hulls described by bounding planes
//!
//! Every triple of planes is intersected; intersection points that lie
//! behind all planes become the hull's point cloud.

use crate::foundation::math::{Mat3, Plane, Vec3};
use crate::physics::error::CollisionError;

use super::builder::HullBuilder;
use super::hull::HullShape;

/// Build the hull enclosed by `planes`.
///
/// Each plane keeps the half-space `normal · p <= distance`. Points within
/// `merge_distance` of each other are merged before the hull is built.
pub fn hull_from_planes(
    builder: &HullBuilder,
    planes: &[Plane],
    merge_distance: f32,
) -> Result<HullShape, CollisionError> {
    let mut points: Vec<Vec3> = Vec::new();
    let merge_squared = merge_distance * merge_distance;

    for i in 0..planes.len() {
        for j in (i + 1)..planes.len() {
            for k in (j + 1)..planes.len() {
                let Some(point) = intersect_three(&planes[i], &planes[j], &planes[k]) else {
                    continue;
                };
                let inside = planes
                    .iter()
                    .all(|plane| plane.signed_distance(&point) <= merge_distance);
                if !inside {
                    continue;
                }
                if points.iter().any(|existing| (existing - point).norm_squared() <= merge_squared) {
                    continue;
                }
                points.push(point);
            }
        }
    }

    log::trace!("{} planes produced {} hull points", planes.len(), points.len());
    builder.build_from_points(&points)
}

fn intersect_three(a: &Plane, b: &Plane, c: &Plane) -> Option<Vec3> {
    let normals = Mat3::from_rows(&[
        a.normal.transpose(),
        b.normal.transpose(),
        c.normal.transpose(),
    ]);
    if normals.determinant().abs() < 1.0e-6 {
        return None;
    }
    normals
        .try_inverse()
        .map(|inverse| inverse * Vec3::new(a.distance, b.distance, c.distance))
}
