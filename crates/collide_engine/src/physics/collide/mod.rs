//! Complete collision representations
//!
//! A [`CollideShape`] is what a simulation object actually collides with:
//! a compound of convexes, a sphere, or a static triangle mesh. Besides the
//! geometry it carries a user index, the drag silhouette areas, and the set
//! of objects currently using it.

pub mod compound;
pub mod references;
pub mod sphere;
pub mod trimesh;

use crate::foundation::collections::{ConvexHandle, ObjectId};
use crate::foundation::math::{Aabb, Vec3};
use crate::physics::arena::ConvexArena;

pub use compound::{CompoundChild, CompoundShape};
pub use references::{MassCenterObserver, ObjectReferences};
pub use sphere::SphereShape;
pub use trimesh::TriangleMeshShape;

/// Who may destroy a collide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollideOwner {
    /// Created for and destroyed by the caller
    Game,
    /// Shared cache entry, lives as long as the facade
    Internal,
}

/// Geometry of a collide
#[derive(Debug, Clone)]
pub enum CollideGeometry {
    /// Convex children
    Compound(CompoundShape),
    /// Solid sphere
    Sphere(SphereShape),
    /// Static triangle soup
    TriangleMesh(TriangleMeshShape),
}

impl CollideGeometry {
    /// Short name for messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Compound(_) => "compound",
            Self::Sphere(_) => "sphere",
            Self::TriangleMesh(_) => "triangle mesh",
        }
    }
}

/// A collide with its bookkeeping
#[derive(Debug, Clone)]
pub struct CollideShape {
    geometry: CollideGeometry,
    owner: CollideOwner,
    index: i32,
    orthographic_areas: Vec3,
    references: ObjectReferences,
}

impl CollideShape {
    /// Wrap geometry as a caller-owned collide
    pub fn new(geometry: CollideGeometry) -> Self {
        Self {
            geometry,
            owner: CollideOwner::Game,
            index: 0,
            orthographic_areas: Vec3::repeat(1.0),
            references: ObjectReferences::new(),
        }
    }

    /// Same collide with a different owner
    pub fn with_owner(mut self, owner: CollideOwner) -> Self {
        self.owner = owner;
        self
    }

    /// Underlying geometry
    pub fn geometry(&self) -> &CollideGeometry {
        &self.geometry
    }

    /// Underlying geometry, mutable
    pub fn geometry_mut(&mut self) -> &mut CollideGeometry {
        &mut self.geometry
    }

    /// The compound, if this collide is one
    pub fn as_compound(&self) -> Option<&CompoundShape> {
        match &self.geometry {
            CollideGeometry::Compound(compound) => Some(compound),
            _ => None,
        }
    }

    /// The sphere, if this collide is one
    pub fn as_sphere(&self) -> Option<&SphereShape> {
        match &self.geometry {
            CollideGeometry::Sphere(sphere) => Some(sphere),
            _ => None,
        }
    }

    /// Ownership
    pub fn owner(&self) -> CollideOwner {
        self.owner
    }

    /// User index, 0 unless set
    pub fn index(&self) -> i32 {
        self.index
    }

    /// Replace the user index
    pub fn set_index(&mut self, index: i32) {
        self.index = index;
    }

    /// Silhouette areas along each physics axis
    pub fn orthographic_areas(&self) -> Vec3 {
        self.orthographic_areas
    }

    /// Replace the silhouette areas
    pub fn set_orthographic_areas(&mut self, areas: Vec3) {
        self.orthographic_areas = areas;
    }

    /// Objects using this collide
    pub fn references(&self) -> &ObjectReferences {
        &self.references
    }

    /// Register an object using this collide
    pub fn add_object_reference(&mut self, object: ObjectId) {
        self.references.add(object);
    }

    /// Unregister an object, returning whether it was registered
    pub fn remove_object_reference(&mut self, object: ObjectId) -> bool {
        self.references.remove(object)
    }

    /// Whether any object uses this collide
    pub fn is_used(&self) -> bool {
        !self.references.is_empty()
    }

    /// Enclosed volume, 0 for triangle meshes
    pub fn volume(&self, arena: &ConvexArena) -> f32 {
        match &self.geometry {
            CollideGeometry::Compound(compound) => compound.volume(arena),
            CollideGeometry::Sphere(sphere) => sphere.volume(),
            CollideGeometry::TriangleMesh(_) => 0.0,
        }
    }

    /// Surface area
    pub fn surface_area(&self, arena: &ConvexArena) -> f32 {
        match &self.geometry {
            CollideGeometry::Compound(compound) => compound.surface_area(arena),
            CollideGeometry::Sphere(sphere) => sphere.surface_area(),
            CollideGeometry::TriangleMesh(mesh) => mesh.surface_area(),
        }
    }

    /// Center of mass in the model frame
    pub fn mass_center(&self) -> Vec3 {
        match &self.geometry {
            CollideGeometry::Compound(compound) => compound.mass_center(),
            CollideGeometry::Sphere(_) | CollideGeometry::TriangleMesh(_) => Vec3::zeros(),
        }
    }

    /// Principal inertia per unit mass, unit inertia for triangle meshes
    pub fn inertia(&self) -> Vec3 {
        match &self.geometry {
            CollideGeometry::Compound(compound) => compound.inertia(),
            CollideGeometry::Sphere(sphere) => sphere.inertia(),
            CollideGeometry::TriangleMesh(_) => Vec3::repeat(1.0),
        }
    }

    /// Bounding box in the model frame
    pub fn model_aabb(&self) -> Aabb {
        match &self.geometry {
            CollideGeometry::Compound(compound) => compound.local_aabb().translated(&compound.mass_center()),
            CollideGeometry::Sphere(sphere) => sphere.local_aabb(),
            CollideGeometry::TriangleMesh(mesh) => mesh.local_aabb(),
        }
    }

    /// Farthest point of the geometry along `direction`, in the model frame
    pub fn support_point(&self, arena: &ConvexArena, direction: &Vec3) -> Vec3 {
        match &self.geometry {
            CollideGeometry::Compound(compound) => compound.support_point(arena, direction),
            CollideGeometry::Sphere(sphere) => sphere.support_point(direction),
            CollideGeometry::TriangleMesh(mesh) => mesh.support_point(direction),
        }
    }

    /// Convexes making up this collide, empty for non-compounds
    pub fn convexes(&self) -> Vec<ConvexHandle> {
        self.as_compound()
            .map(|compound| compound.convexes().collect())
            .unwrap_or_default()
    }

    /// Move a compound's mass center and tell every referencing object.
    ///
    /// Returns the previous mass center, or `None` if the geometry has no
    /// movable mass center.
    pub fn set_mass_center(
        &mut self,
        arena: &ConvexArena,
        mass_center: Vec3,
        observer: &mut dyn MassCenterObserver,
    ) -> Option<Vec3> {
        let CollideGeometry::Compound(compound) = &mut self.geometry else {
            return None;
        };
        let old_mass_center = compound.set_mass_center(arena, mass_center);
        self.references.notify_mass_center_changed(&old_mass_center, observer);
        Some(old_mass_center)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::convex::{BoxShape, ConvexShape};
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let collide = CollideShape::new(CollideGeometry::Sphere(SphereShape::new(1.0, 0.0)));
        assert_eq!(collide.owner(), CollideOwner::Game);
        assert_eq!(collide.index(), 0);
        assert_eq!(collide.orthographic_areas(), Vec3::repeat(1.0));
        assert!(!collide.is_used());
        assert!(collide.convexes().is_empty());
    }

    #[test]
    fn test_mass_center_change_notifies_each_reference_once() {
        let mut arena = ConvexArena::new();
        let handle = arena.insert(ConvexShape::cuboid(BoxShape::new(Vec3::repeat(1.0), Vec3::new(1.0, 0.0, 0.0))));
        let compound = CompoundShape::from_convexes(&mut arena, &[handle]).unwrap();
        let mut collide = CollideShape::new(CollideGeometry::Compound(compound));
        collide.add_object_reference(ObjectId(7));
        collide.add_object_reference(ObjectId(9));
        assert!(collide.is_used());

        let mut calls = Vec::new();
        let old = collide.set_mass_center(&arena, Vec3::zeros(), &mut |object: ObjectId, center: &Vec3| {
            calls.push((object, *center));
        });
        assert_eq!(old, Some(Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(calls, vec![(ObjectId(7), Vec3::new(1.0, 0.0, 0.0)), (ObjectId(9), Vec3::new(1.0, 0.0, 0.0))]);
        assert_relative_eq!(collide.model_aabb().center(), Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_sphere_has_no_movable_mass_center() {
        let arena = ConvexArena::new();
        let mut collide = CollideShape::new(CollideGeometry::Sphere(SphereShape::new(1.0, 0.0)));
        collide.add_object_reference(ObjectId(1));
        let mut called = false;
        let result = collide.set_mass_center(&arena, Vec3::x(), &mut |_: ObjectId, _: &Vec3| called = true);
        assert!(result.is_none());
        assert!(!called);
    }
}
