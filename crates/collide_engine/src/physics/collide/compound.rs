//! Compounds of convex pieces
//!
//! A compound's local frame is centered on its mass center. Each child is
//! placed at its convex's origin-in-compound minus that mass center, so
//! moving the mass center only shifts the children's offsets and never their
//! position in the model.

use std::cell::OnceCell;

use crate::foundation::collections::ConvexHandle;
use crate::foundation::math::{abs, Aabb, Vec3};
use crate::physics::arena::ConvexArena;
use crate::physics::convex::{ConvexOwner, ConvexShape};
use crate::physics::error::CollisionError;
use crate::physics::legacy::LegacySurface;
use crate::physics::mass::{box_approximation, offset_inertia_signed};

/// One convex placed inside a compound
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompoundChild {
    /// The convex
    pub convex: ConvexHandle,
    /// Translation from the compound's mass center to the convex's frame
    pub offset: Vec3,
}

/// A collide made of convex children
#[derive(Debug, Clone)]
pub struct CompoundShape {
    children: Vec<CompoundChild>,
    mass_center: Vec3,
    inertia: Vec3,
    volume: OnceCell<f32>,
    local_aabb: Aabb,
}

impl CompoundShape {
    /// Build a compound from convexes already stored in `arena`.
    ///
    /// Caller-owned convexes become compound-owned. Convexes that already
    /// belong to another compound are rejected.
    pub fn from_convexes(arena: &mut ConvexArena, handles: &[ConvexHandle]) -> Result<Self, CollisionError> {
        if handles.is_empty() {
            return Err(CollisionError::EmptyConvexList);
        }
        let mut volume = 0.0f32;
        let mut weighted_center = Vec3::zeros();
        let mut bounds = Aabb::empty();
        for (index, &handle) in handles.iter().enumerate() {
            if handles[..index].contains(&handle) {
                return Err(CollisionError::DuplicateConvex);
            }
            let convex = arena.try_get(handle)?;
            if convex.owner() == ConvexOwner::Compound {
                return Err(CollisionError::ConvexNotAvailable);
            }
            let convex_volume = convex.volume();
            volume += convex_volume;
            weighted_center += (convex.origin_in_compound() + convex.mass_center()) * convex_volume;
            bounds.merge(&convex.compound_aabb());
        }

        let mass_center = if volume > 0.0 {
            weighted_center / volume
        } else {
            log::debug!("Compound of {} convexes has no volume, centering on its bounds", handles.len());
            bounds.center()
        };

        for &handle in handles {
            if let Some(convex) = arena.get_mut(handle) {
                if convex.owner() == ConvexOwner::Caller {
                    convex.set_owner(ConvexOwner::Compound);
                }
            }
        }

        let mut compound = Self::placed(arena, handles, mass_center);
        let _ = compound.volume.set(volume);
        compound.inertia = compound.compute_inertia(arena);
        Ok(compound)
    }

    /// Build a compound from an imported legacy surface.
    ///
    /// The surface's authored mass center and inertia are used as is; volume
    /// is summed from the children on first request.
    pub fn from_legacy(arena: &mut ConvexArena, surface: LegacySurface) -> Result<Self, CollisionError> {
        if surface.convexes.is_empty() {
            return Err(CollisionError::EmptyConvexList);
        }
        let handles: Vec<ConvexHandle> = surface
            .convexes
            .into_iter()
            .map(|mut convex| {
                convex.set_owner(ConvexOwner::Compound);
                arena.insert(convex)
            })
            .collect();

        let mut compound = Self::placed(arena, &handles, surface.mass_center);
        compound.inertia = surface.inertia;
        Ok(compound)
    }

    fn placed(arena: &ConvexArena, handles: &[ConvexHandle], mass_center: Vec3) -> Self {
        let children = handles
            .iter()
            .map(|&convex| CompoundChild {
                convex,
                offset: arena
                    .get(convex)
                    .map_or(Vec3::zeros(), ConvexShape::origin_in_compound)
                    - mass_center,
            })
            .collect();
        let mut compound = Self {
            children,
            mass_center,
            inertia: Vec3::repeat(1.0),
            volume: OnceCell::new(),
            local_aabb: Aabb::from_corners(Vec3::zeros(), Vec3::zeros()),
        };
        compound.local_aabb = compound.compute_local_aabb(arena);
        compound
    }

    /// Children in insertion order
    pub fn children(&self) -> &[CompoundChild] {
        &self.children
    }

    /// Handles of every child convex
    pub fn convexes(&self) -> impl Iterator<Item = ConvexHandle> + '_ {
        self.children.iter().map(|child| child.convex)
    }

    fn child_convexes<'a>(
        &'a self,
        arena: &'a ConvexArena,
    ) -> impl Iterator<Item = (&'a CompoundChild, &'a ConvexShape)> + 'a {
        self.children
            .iter()
            .filter_map(move |child| arena.get(child.convex).map(|convex| (child, convex)))
    }

    /// Center of mass in the model frame
    pub fn mass_center(&self) -> Vec3 {
        self.mass_center
    }

    /// Principal inertia per unit mass about the mass center
    pub fn inertia(&self) -> Vec3 {
        self.inertia
    }

    /// Bounding box around the mass center
    pub fn local_aabb(&self) -> Aabb {
        self.local_aabb
    }

    /// Sum of the children's volumes
    pub fn volume(&self, arena: &ConvexArena) -> f32 {
        *self
            .volume
            .get_or_init(|| self.child_convexes(arena).map(|(_, convex)| convex.volume()).sum())
    }

    /// Sum of the children's surface areas
    pub fn surface_area(&self, arena: &ConvexArena) -> f32 {
        self.child_convexes(arena).map(|(_, convex)| convex.surface_area()).sum()
    }

    /// Farthest child point along `direction`, in the model frame
    pub fn support_point(&self, arena: &ConvexArena, direction: &Vec3) -> Vec3 {
        self.child_convexes(arena)
            .map(|(_, convex)| convex.support_point(direction))
            .max_by(|a, b| a.dot(direction).total_cmp(&b.dot(direction)))
            .unwrap_or(self.mass_center)
    }

    /// Move the mass center, re-placing children and recomputing inertia.
    ///
    /// Returns the previous mass center.
    pub fn set_mass_center(&mut self, arena: &ConvexArena, mass_center: Vec3) -> Vec3 {
        let old_mass_center = self.mass_center;
        self.mass_center = mass_center;
        for child in &mut self.children {
            let origin = arena
                .get(child.convex)
                .map_or(Vec3::zeros(), ConvexShape::origin_in_compound);
            child.offset = origin - mass_center;
        }
        self.local_aabb = self.compute_local_aabb(arena);
        self.inertia = self.compute_inertia(arena);
        old_mass_center
    }

    fn compute_local_aabb(&self, arena: &ConvexArena) -> Aabb {
        let mut bounds = Aabb::empty();
        for (_, convex) in self.child_convexes(arena) {
            bounds.merge(&convex.compound_aabb().translated(&-self.mass_center));
        }
        if bounds.mins.x > bounds.maxs.x {
            return Aabb::from_corners(Vec3::zeros(), Vec3::zeros());
        }
        bounds
    }

    fn compute_inertia(&self, arena: &ConvexArena) -> Vec3 {
        let volume = self.volume(arena);
        if volume <= 0.0 {
            return box_approximation(&self.local_aabb).1;
        }
        let mut inertia = Vec3::zeros();
        for (child, convex) in self.child_convexes(arena) {
            let displacement = child.offset + convex.mass_center();
            inertia += convex.volume() * offset_inertia_signed(&convex.inertia(), &displacement);
        }
        abs(&(inertia / volume))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::convex::hull::tests::cube_hull;
    use crate::physics::convex::BoxShape;
    use crate::physics::mass::box_inertia;
    use approx::assert_relative_eq;

    fn box_convex(half: Vec3, origin: Vec3) -> ConvexShape {
        ConvexShape::cuboid(BoxShape::new(half, origin))
    }

    #[test]
    fn test_volume_is_sum_of_children() {
        let mut arena = ConvexArena::new();
        let a = arena.insert(box_convex(Vec3::repeat(1.0), Vec3::new(-2.0, 0.0, 0.0)));
        let b = arena.insert(ConvexShape::hull(cube_hull(0.5, Vec3::new(3.0, 0.0, 0.0))));
        let compound = CompoundShape::from_convexes(&mut arena, &[a, b]).unwrap();

        assert_relative_eq!(compound.volume(&arena), 9.0, epsilon = 1e-4);
        // (8·(-2) + 1·3) / 9
        assert_relative_eq!(compound.mass_center(), Vec3::new(-13.0 / 9.0, 0.0, 0.0), epsilon = 1e-5);
        assert_eq!(arena.get(a).unwrap().owner(), ConvexOwner::Compound);
        assert_eq!(arena.get(b).unwrap().owner(), ConvexOwner::Compound);
    }

    #[test]
    fn test_single_box_matches_box_inertia() {
        let mut arena = ConvexArena::new();
        let half = Vec3::new(1.0, 2.0, 3.0);
        let handle = arena.insert(box_convex(half, Vec3::new(5.0, 5.0, 5.0)));
        let compound = CompoundShape::from_convexes(&mut arena, &[handle]).unwrap();
        assert_relative_eq!(compound.mass_center(), Vec3::repeat(5.0));
        assert_relative_eq!(compound.inertia(), box_inertia(&(2.0 * half)), epsilon = 1e-5);
        assert_relative_eq!(compound.local_aabb().center(), Vec3::zeros());
    }

    #[test]
    fn test_parallel_axis_for_two_boxes() {
        let mut arena = ConvexArena::new();
        let half = Vec3::repeat(0.5);
        let a = arena.insert(box_convex(half, Vec3::new(-1.0, 0.0, 0.0)));
        let b = arena.insert(box_convex(half, Vec3::new(1.0, 0.0, 0.0)));
        let compound = CompoundShape::from_convexes(&mut arena, &[a, b]).unwrap();

        let own = box_inertia(&Vec3::repeat(1.0));
        assert_relative_eq!(compound.inertia(), own + Vec3::new(0.0, 1.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_hull_child_displacement_uses_its_mass_center() {
        let mut arena = ConvexArena::new();
        let a = arena.insert(ConvexShape::hull(cube_hull(0.5, Vec3::new(-1.0, 0.0, 0.0))));
        let b = arena.insert(ConvexShape::hull(cube_hull(0.5, Vec3::new(1.0, 0.0, 0.0))));
        let compound = CompoundShape::from_convexes(&mut arena, &[a, b]).unwrap();

        assert_relative_eq!(compound.mass_center(), Vec3::zeros(), epsilon = 1e-5);
        let own = box_inertia(&Vec3::repeat(1.0));
        assert_relative_eq!(compound.inertia(), own + Vec3::new(0.0, 1.0, 1.0), epsilon = 1e-4);
    }

    #[test]
    fn test_degenerate_compound_uses_bounds() {
        let mut arena = ConvexArena::new();
        let flat = box_convex(Vec3::new(1.0, 0.0, 1.0), Vec3::new(0.0, 4.0, 0.0));
        let handle = arena.insert(flat);
        let compound = CompoundShape::from_convexes(&mut arena, &[handle]).unwrap();
        assert_eq!(compound.volume(&arena), 0.0);
        assert_relative_eq!(compound.mass_center(), Vec3::new(0.0, 4.0, 0.0));
        assert!(compound.inertia().iter().all(|value| value.is_finite()));
    }

    #[test]
    fn test_rejects_empty_and_taken_convexes() {
        let mut arena = ConvexArena::new();
        assert_eq!(
            CompoundShape::from_convexes(&mut arena, &[]).unwrap_err(),
            CollisionError::EmptyConvexList
        );
        let handle = arena.insert(box_convex(Vec3::repeat(1.0), Vec3::zeros()));
        CompoundShape::from_convexes(&mut arena, &[handle]).unwrap();
        assert_eq!(
            CompoundShape::from_convexes(&mut arena, &[handle]).unwrap_err(),
            CollisionError::ConvexNotAvailable
        );
    }

    #[test]
    fn test_rejects_repeated_convex() {
        let mut arena = ConvexArena::new();
        let a = arena.insert(box_convex(Vec3::repeat(1.0), Vec3::zeros()));
        let b = arena.insert(box_convex(Vec3::repeat(1.0), Vec3::new(3.0, 0.0, 0.0)));
        assert_eq!(
            CompoundShape::from_convexes(&mut arena, &[a, b, a]).unwrap_err(),
            CollisionError::DuplicateConvex
        );
        // Nothing was claimed by the failed build.
        assert_eq!(arena.get(a).unwrap().owner(), ConvexOwner::Caller);
        let compound = CompoundShape::from_convexes(&mut arena, &[a, b]).unwrap();
        assert_eq!(compound.children().len(), 2);
    }

    #[test]
    fn test_set_mass_center_keeps_child_placement() {
        let mut arena = ConvexArena::new();
        let a = arena.insert(box_convex(Vec3::repeat(1.0), Vec3::new(2.0, 0.0, 0.0)));
        let b = arena.insert(box_convex(Vec3::repeat(0.5), Vec3::new(0.0, -3.0, 1.0)));
        let mut compound = CompoundShape::from_convexes(&mut arena, &[a, b]).unwrap();
        let before: Vec<Vec3> = compound.children().iter().map(|c| c.offset + compound.mass_center()).collect();

        let previous = compound.mass_center();
        let moved = Vec3::new(0.5, 0.5, 0.5);
        assert_eq!(compound.set_mass_center(&arena, moved), previous);

        for (child, placed) in compound.children().iter().zip(before) {
            assert_relative_eq!(child.offset + moved, placed, epsilon = 1e-5);
            let origin = arena.get(child.convex).unwrap().origin_in_compound();
            assert_relative_eq!(child.offset + moved, origin, epsilon = 1e-5);
        }
        assert_relative_eq!(compound.local_aabb().mins, Vec3::new(-0.5, -3.5, -1.0) - moved, epsilon = 1e-5);
    }

    #[test]
    fn test_legacy_volume_is_lazy() {
        let mut arena = ConvexArena::new();
        let surface = LegacySurface {
            mass_center: Vec3::new(0.0, 1.0, 0.0),
            inertia: Vec3::new(1.0, 2.0, 3.0),
            convexes: vec![ConvexShape::hull(cube_hull(1.0, Vec3::zeros()))],
        };
        let compound = CompoundShape::from_legacy(&mut arena, surface).unwrap();
        assert_eq!(compound.inertia(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(compound.mass_center(), Vec3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(compound.volume(&arena), 8.0, epsilon = 1e-4);
        let child = compound.children()[0];
        assert_eq!(child.offset, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(arena.get(child.convex).unwrap().owner(), ConvexOwner::Compound);
    }
}
