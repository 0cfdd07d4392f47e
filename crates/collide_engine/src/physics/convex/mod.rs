//! Convex collision primitives
//!
//! A [`ConvexShape`] is one indivisible piece of collision geometry, either a
//! hull or a box, together with the tag that says who is responsible for
//! freeing it.

pub mod box_shape;
pub mod builder;
pub mod hull;
pub mod planes;

use crate::foundation::math::{Aabb, Vec3};
use crate::physics::mass::MassProperties;

pub use box_shape::BoxShape;
pub use builder::HullBuilder;
pub use hull::HullShape;

/// Who frees a convex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConvexOwner {
    /// The caller holds the handle and destroys it explicitly
    Caller,
    /// Absorbed into a compound; freed after the compound is torn down
    Compound,
    /// Lives inside an internal cache entry and is never freed by callers
    Internal,
}

/// Geometry of a convex
#[derive(Debug, Clone)]
pub enum ConvexGeometry {
    /// Point cloud with surface triangles
    Hull(HullShape),
    /// Solid box
    Box(BoxShape),
}

/// A convex piece with its ownership tag and user data
#[derive(Debug, Clone)]
pub struct ConvexShape {
    geometry: ConvexGeometry,
    owner: ConvexOwner,
    game_data: u32,
}

impl ConvexShape {
    /// Wrap a hull, owned by the caller
    pub fn hull(hull: HullShape) -> Self {
        Self::new(ConvexGeometry::Hull(hull))
    }

    /// Wrap a box, owned by the caller
    pub fn cuboid(shape: BoxShape) -> Self {
        Self::new(ConvexGeometry::Box(shape))
    }

    fn new(geometry: ConvexGeometry) -> Self {
        Self {
            geometry,
            owner: ConvexOwner::Caller,
            game_data: 0,
        }
    }

    /// Same convex with user data attached
    pub fn with_game_data(mut self, game_data: u32) -> Self {
        self.game_data = game_data;
        self
    }

    /// Underlying geometry
    pub fn geometry(&self) -> &ConvexGeometry {
        &self.geometry
    }

    /// Underlying geometry, mutable
    pub fn geometry_mut(&mut self) -> &mut ConvexGeometry {
        &mut self.geometry
    }

    /// The hull, if this convex is one
    pub fn as_hull(&self) -> Option<&HullShape> {
        match &self.geometry {
            ConvexGeometry::Hull(hull) => Some(hull),
            ConvexGeometry::Box(_) => None,
        }
    }

    /// The box, if this convex is one
    pub fn as_box(&self) -> Option<&BoxShape> {
        match &self.geometry {
            ConvexGeometry::Box(shape) => Some(shape),
            ConvexGeometry::Hull(_) => None,
        }
    }

    /// Current ownership tag
    pub fn owner(&self) -> ConvexOwner {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: ConvexOwner) {
        self.owner = owner;
    }

    /// Opaque user value
    pub fn game_data(&self) -> u32 {
        self.game_data
    }

    /// Replace the user value
    pub fn set_game_data(&mut self, game_data: u32) {
        self.game_data = game_data;
    }

    /// Where the convex's own frame sits inside a compound.
    ///
    /// Hull points are already in compound space; boxes carry an explicit
    /// center.
    pub fn origin_in_compound(&self) -> Vec3 {
        match &self.geometry {
            ConvexGeometry::Hull(_) => Vec3::zeros(),
            ConvexGeometry::Box(shape) => shape.origin(),
        }
    }

    /// Enclosed volume
    pub fn volume(&self) -> f32 {
        match &self.geometry {
            ConvexGeometry::Hull(hull) => hull.volume(),
            ConvexGeometry::Box(shape) => shape.volume(),
        }
    }

    /// Surface area
    pub fn surface_area(&self) -> f32 {
        match &self.geometry {
            ConvexGeometry::Hull(hull) => hull.surface_area(),
            ConvexGeometry::Box(shape) => shape.surface_area(),
        }
    }

    /// Center of mass in the convex's own frame
    pub fn mass_center(&self) -> Vec3 {
        match &self.geometry {
            ConvexGeometry::Hull(hull) => hull.mass_center(),
            ConvexGeometry::Box(_) => Vec3::zeros(),
        }
    }

    /// Principal inertia per unit mass about the mass center
    pub fn inertia(&self) -> Vec3 {
        match &self.geometry {
            ConvexGeometry::Hull(hull) => hull.inertia(),
            ConvexGeometry::Box(shape) => shape.inertia(),
        }
    }

    /// Volume, mass center and inertia together
    pub fn mass_properties(&self) -> MassProperties {
        match &self.geometry {
            ConvexGeometry::Hull(hull) => hull.mass_properties(),
            ConvexGeometry::Box(shape) => MassProperties {
                volume: shape.volume(),
                mass_center: Vec3::zeros(),
                inertia: shape.inertia(),
            },
        }
    }

    /// Bounding box in the convex's own frame
    pub fn local_aabb(&self) -> Aabb {
        match &self.geometry {
            ConvexGeometry::Hull(hull) => hull.local_aabb(),
            ConvexGeometry::Box(shape) => shape.local_aabb(),
        }
    }

    /// Bounding box in compound space
    pub fn compound_aabb(&self) -> Aabb {
        self.local_aabb().translated(&self.origin_in_compound())
    }

    /// Farthest point along `direction`, in compound space
    pub fn support_point(&self, direction: &Vec3) -> Vec3 {
        match &self.geometry {
            ConvexGeometry::Hull(hull) => hull.support_point(direction),
            ConvexGeometry::Box(shape) => shape.origin() + shape.support_point(direction),
        }
    }

    /// Material of the surface triangle nearest to `point`, 0 for boxes
    pub fn triangle_material_at(&self, point: &Vec3) -> u8 {
        self.as_hull().map_or(0, |hull| hull.triangle_material_at(point))
    }
}
