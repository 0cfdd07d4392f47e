//! Axis-aligned box convexes

use crate::foundation::math::{Aabb, Vec3};
use crate::physics::mass::box_inertia;

/// A solid box given by half-extents and an offset inside its compound
#[derive(Debug, Clone, PartialEq)]
pub struct BoxShape {
    half_extents: Vec3,
    origin: Vec3,
}

impl BoxShape {
    /// Create a box centered at `origin`
    pub fn new(half_extents: Vec3, origin: Vec3) -> Self {
        Self {
            half_extents: half_extents.map(f32::abs),
            origin,
        }
    }

    /// Half-extents without margin
    pub fn half_extents(&self) -> Vec3 {
        self.half_extents
    }

    /// Placement of the box center inside its compound
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// `8·hx·hy·hz`
    pub fn volume(&self) -> f32 {
        let h = &self.half_extents;
        8.0 * h.x * h.y * h.z
    }

    /// `8·hx·hy + 4·hz·(hx + hy)`
    pub fn surface_area(&self) -> f32 {
        let h = &self.half_extents;
        8.0 * h.x * h.y + 4.0 * h.z * (h.x + h.y)
    }

    /// Solid-box inertia about the box center
    pub fn inertia(&self) -> Vec3 {
        box_inertia(&(2.0 * self.half_extents))
    }

    /// Bounding box in the box's own frame (centered on zero)
    pub fn local_aabb(&self) -> Aabb {
        Aabb::from_corners(-self.half_extents, self.half_extents)
    }

    /// Corner farthest along `direction`, in the box's own frame
    pub fn support_point(&self, direction: &Vec3) -> Vec3 {
        let h = &self.half_extents;
        Vec3::new(
            if direction.x < 0.0 { -h.x } else { h.x },
            if direction.y < 0.0 { -h.y } else { h.y },
            if direction.z < 0.0 { -h.z } else { h.z },
        )
    }
}
