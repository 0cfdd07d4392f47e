//! Mass property helpers shared by convex and collide shapes
//!
//! All inertia values here are the diagonal of the inertia tensor per unit
//! mass, in the shape's principal frame.

use crate::foundation::math::{abs, Aabb, Vec3};

/// Volume, center of mass and principal inertia of a solid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassProperties {
    /// Enclosed volume
    pub volume: f32,
    /// Center of mass in the shape's local frame
    pub mass_center: Vec3,
    /// Principal inertia per unit mass
    pub inertia: Vec3,
}

/// Inertia of a solid box with the given full extents
pub fn box_inertia(extents: &Vec3) -> Vec3 {
    let l2 = extents.component_mul(extents);
    (1.0 / 12.0) * Vec3::new(l2.y + l2.z, l2.x + l2.z, l2.x + l2.y)
}

/// Parallel-axis shift of an inertia by `origin`, without taking the absolute value
pub fn offset_inertia_signed(inertia: &Vec3, origin: &Vec3) -> Vec3 {
    let o2 = origin.norm_squared();
    inertia + Vec3::repeat(o2) - origin.component_mul(origin)
}

/// Parallel-axis shift of an inertia by `origin`
pub fn offset_inertia(inertia: &Vec3, origin: &Vec3) -> Vec3 {
    abs(&offset_inertia_signed(inertia, origin))
}

/// Fallback for degenerate geometry: mass center at the box midpoint and
/// solid-box inertia offset to that midpoint.
pub fn box_approximation(aabb: &Aabb) -> (Vec3, Vec3) {
    let center = aabb.center();
    (center, offset_inertia(&box_inertia(&aabb.extents()), &center))
}
