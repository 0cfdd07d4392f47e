//! Math utilities and types
//!
//! Provides the vector types used by the collision code, axis-aligned boxes,
//! planes, and the conversion between host-engine and physics conventions.

pub use nalgebra::{Matrix3, Quaternion, Unit, UnitQuaternion, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = UnitQuaternion<f32>;

/// Component-wise absolute value
pub fn abs(v: &Vec3) -> Vec3 {
    v.map(f32::abs)
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub mins: Vec3,
    /// Maximum corner
    pub maxs: Vec3,
}

impl Aabb {
    /// An inverted box that any `grow` call will replace
    pub fn empty() -> Self {
        Self {
            mins: Vec3::repeat(f32::MAX),
            maxs: Vec3::repeat(-f32::MAX),
        }
    }

    /// Box spanning two corners given in any order
    pub fn from_corners(a: Vec3, b: Vec3) -> Self {
        Self {
            mins: a.inf(&b),
            maxs: a.sup(&b),
        }
    }

    /// Smallest box containing every point, `None` for an empty slice
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Option<Self> {
        let mut aabb = Self::empty();
        let mut any = false;
        for point in points {
            aabb.grow(point);
            any = true;
        }
        any.then_some(aabb)
    }

    /// Extend to include a point
    pub fn grow(&mut self, point: &Vec3) {
        self.mins = self.mins.inf(point);
        self.maxs = self.maxs.sup(point);
    }

    /// Extend to include another box
    pub fn merge(&mut self, other: &Aabb) {
        self.mins = self.mins.inf(&other.mins);
        self.maxs = self.maxs.sup(&other.maxs);
    }

    /// Box moved by an offset
    pub fn translated(&self, offset: &Vec3) -> Self {
        Self {
            mins: self.mins + offset,
            maxs: self.maxs + offset,
        }
    }

    /// Midpoint of the box
    pub fn center(&self) -> Vec3 {
        (self.mins + self.maxs) * 0.5
    }

    /// Full extents (maxs - mins)
    pub fn extents(&self) -> Vec3 {
        self.maxs - self.mins
    }
}

/// A plane `normal · p = distance`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Plane normal
    pub normal: Vec3,
    /// Offset along the normal
    pub distance: f32,
}

impl Plane {
    /// Create a plane from a normal and offset
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self { normal, distance }
    }

    /// Signed distance of a point to the plane (positive in front)
    pub fn signed_distance(&self, point: &Vec3) -> f32 {
        self.normal.dot(point) - self.distance
    }
}

/// Conversion between the host engine's position convention and the physics
/// convention.
///
/// The host uses Z-up coordinates in its own length unit; physics uses Y-up
/// coordinates in meters. A host point `(x, y, z)` maps to
/// `(x, z, -y) * meters_per_unit`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitConvention {
    meters_per_unit: f32,
}

impl UnitConvention {
    /// Create a converter with the given host-unit scale
    pub fn new(meters_per_unit: f32) -> Self {
        Self { meters_per_unit }
    }

    /// Host length unit expressed in meters
    pub fn meters_per_unit(&self) -> f32 {
        self.meters_per_unit
    }

    /// Scalar length host → physics
    pub fn length_to_physics(&self, length: f32) -> f32 {
        length * self.meters_per_unit
    }

    /// Scalar length physics → host
    pub fn length_to_host(&self, length: f32) -> f32 {
        length / self.meters_per_unit
    }

    /// Position host → physics
    pub fn position_to_physics(&self, v: &Vec3) -> Vec3 {
        Vec3::new(v.x, v.z, -v.y) * self.meters_per_unit
    }

    /// Position physics → host
    pub fn position_to_host(&self, v: &Vec3) -> Vec3 {
        Vec3::new(v.x, -v.z, v.y) / self.meters_per_unit
    }

    /// Direction host → physics, without scaling
    pub fn direction_to_physics(&self, v: &Vec3) -> Vec3 {
        Vec3::new(v.x, v.z, -v.y)
    }

    /// Rotation host → physics
    pub fn rotation_to_physics(&self, rotation: &Quat) -> Quat {
        let axes = self.axis_change();
        Quat::from_matrix(&(axes * rotation.to_rotation_matrix().matrix() * axes.transpose()))
    }

    /// Volume physics → host
    pub fn volume_to_host(&self, volume: f32) -> f32 {
        let factor = 1.0 / self.meters_per_unit;
        volume * factor * factor * factor
    }

    /// Area physics → host
    pub fn area_to_host(&self, area: f32) -> f32 {
        let factor = 1.0 / self.meters_per_unit;
        area * factor * factor
    }

    /// Per-axis areas physics → host (axis permutation only, areas are unsigned)
    pub fn axis_areas_to_host(&self, areas: &Vec3) -> Vec3 {
        Vec3::new(areas.x, areas.z, areas.y)
    }

    /// Per-axis areas host → physics
    pub fn axis_areas_to_physics(&self, areas: &Vec3) -> Vec3 {
        Vec3::new(areas.x, areas.z, areas.y)
    }

    /// Principal inertia physics → host, per unit mass
    pub fn inertia_to_host(&self, inertia: &Vec3) -> Vec3 {
        self.area_to_host(1.0) * Vec3::new(inertia.x, inertia.z, inertia.y)
    }

    fn axis_change(&self) -> Mat3 {
        Mat3::new(
            1.0, 0.0, 0.0,
            0.0, 0.0, 1.0,
            0.0, -1.0, 0.0,
        )
    }
}

impl Default for UnitConvention {
    fn default() -> Self {
        Self::new(0.0254)
    }
}
