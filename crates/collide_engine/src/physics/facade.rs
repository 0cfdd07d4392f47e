//! # Collision Facade
//!
//! The single entry point the rest of the engine uses to create, query and
//! destroy collision geometry. Every position, length and direction passed
//! in or returned is in the host convention (Z up, host units); shapes are
//! stored in the physics convention and converted at this boundary.
//!
//! ## Ownership
//!
//! - Convexes created here belong to the caller until they are put into a
//!   compound. From then on the compound owns them, and destroying the
//!   compound queues them for [`CollisionFacade::cleanup_released_convexes`].
//! - Box collides and cached spheres are shared cache entries. Callers cannot
//!   destroy them; they live as long as the facade.

use crate::config::ConfigError;
use crate::core::CollisionConfig;
use crate::foundation::collections::{CollideHandle, ConvexHandle, HandleMap, ObjectId, PolysoupHandle};
use crate::foundation::math::{Aabb, Plane, Quat, UnitConvention, Vec3};

use super::arena::ConvexArena;
use super::bbox_cache::{BBoxCache, BBoxCacheEntry};
use super::collide::{
    CollideGeometry, CollideOwner, CollideShape, CompoundShape, MassCenterObserver, SphereShape,
    TriangleMeshShape,
};
use super::convex::planes::hull_from_planes;
use super::convex::{BoxShape, ConvexGeometry, ConvexOwner, ConvexShape, HullBuilder, HullShape};
use super::error::CollisionError;
use super::legacy::vcollide::LegacySolid;
use super::legacy::{parse_solid, parse_vcollide, Endianness, LedgeTreeImporter, LegacyReader};
use super::polysoup::Polysoup;

/// Solids loaded from one multi-solid container
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VCollide {
    /// One collide per solid, in file order
    pub solids: Vec<CollideHandle>,
    /// Text block following the solids
    pub key_values: String,
}

/// Creates, queries and destroys collision shapes
#[derive(Debug)]
pub struct CollisionFacade {
    config: CollisionConfig,
    convention: UnitConvention,
    builder: HullBuilder,
    importer: LedgeTreeImporter,
    convexes: ConvexArena,
    collides: HandleMap<CollideHandle, CollideShape>,
    bbox_cache: BBoxCache,
    sphere_cache: Vec<(f32, CollideHandle)>,
    polysoups: HandleMap<PolysoupHandle, Polysoup>,
}

impl CollisionFacade {
    /// Create a facade from a validated configuration
    pub fn new(config: CollisionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        log::debug!(
            "Collision facade: {} m/unit, margin {} units, bbox tolerance {} units",
            config.meters_per_unit,
            config.convex_margin,
            config.bbox_cache_tolerance
        );
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: CollisionConfig) -> Self {
        Self {
            convention: config.convention(),
            builder: HullBuilder::new(),
            importer: LedgeTreeImporter::from_config(&config),
            convexes: ConvexArena::new(),
            collides: HandleMap::with_key(),
            bbox_cache: BBoxCache::new(config.physics_bbox_tolerance()),
            sphere_cache: Vec::new(),
            polysoups: HandleMap::with_key(),
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// Host/physics converter
    pub fn convention(&self) -> &UnitConvention {
        &self.convention
    }

    /// Stored convex, physics convention
    pub fn convex(&self, handle: ConvexHandle) -> Option<&ConvexShape> {
        self.convexes.get(handle)
    }

    /// Stored collide, physics convention
    pub fn collide(&self, handle: CollideHandle) -> Option<&CollideShape> {
        self.collides.get(handle)
    }

    /// Every stored convex
    pub fn convex_arena(&self) -> &ConvexArena {
        &self.convexes
    }

    fn try_collide(&self, handle: CollideHandle) -> Result<&CollideShape, CollisionError> {
        self.collides.get(handle).ok_or(CollisionError::UnknownCollide)
    }

    fn try_collide_mut(&mut self, handle: CollideHandle) -> Result<&mut CollideShape, CollisionError> {
        self.collides.get_mut(handle).ok_or(CollisionError::UnknownCollide)
    }

    fn try_convex_mut(&mut self, handle: ConvexHandle) -> Result<&mut ConvexShape, CollisionError> {
        self.convexes.get_mut(handle).ok_or(CollisionError::UnknownConvex)
    }

    fn to_physics(&self, points: &[Vec3]) -> Vec<Vec3> {
        points.iter().map(|p| self.convention.position_to_physics(p)).collect()
    }

    // ---------------------------------------------------------------
    // Convexes
    // ---------------------------------------------------------------

    /// Convex hull of an unordered point cloud
    pub fn convex_from_points(&mut self, points: &[Vec3]) -> Result<ConvexHandle, CollisionError> {
        let hull = self.builder.build_from_points(&self.to_physics(points))?;
        Ok(self.convexes.insert(ConvexShape::hull(hull)))
    }

    /// Convex from vertices and surface triangles known to be convex.
    ///
    /// No hull is computed; the triangles are used as given.
    pub fn convex_from_polyhedron(
        &mut self,
        vertices: &[Vec3],
        triangles: &[[u32; 3]],
    ) -> Result<ConvexHandle, CollisionError> {
        if vertices.len() < 3 {
            return Err(CollisionError::TooFewPoints(vertices.len()));
        }
        let hull = HullShape::new(self.to_physics(vertices), triangles.to_vec())
            .ok_or(CollisionError::DegenerateHull)?;
        Ok(self.convexes.insert(ConvexShape::hull(hull)))
    }

    /// Convex enclosed by planes `normal · p <= distance`.
    ///
    /// `merge_distance` defaults to the configured plane merge distance.
    pub fn convex_from_planes(
        &mut self,
        planes: &[Plane],
        merge_distance: Option<f32>,
    ) -> Result<ConvexHandle, CollisionError> {
        let planes: Vec<Plane> = planes
            .iter()
            .map(|plane| {
                Plane::new(
                    self.convention.direction_to_physics(&plane.normal),
                    self.convention.length_to_physics(plane.distance),
                )
            })
            .collect();
        let merge_distance = self
            .convention
            .length_to_physics(merge_distance.unwrap_or(self.config.plane_merge_distance));
        let hull = hull_from_planes(&self.builder, &planes, merge_distance)?;
        Ok(self.convexes.insert(ConvexShape::hull(hull)))
    }

    /// Free a caller-owned convex.
    ///
    /// Returns `false` when the convex belongs to a compound or a cache and
    /// was left alone.
    pub fn destroy_convex(&mut self, handle: ConvexHandle) -> Result<bool, CollisionError> {
        self.convexes.destroy(handle)
    }

    /// Volume of a convex, host units
    pub fn convex_volume(&self, handle: ConvexHandle) -> Result<f32, CollisionError> {
        let convex = self.convexes.try_get(handle)?;
        Ok(self.convention.volume_to_host(convex.volume()))
    }

    /// Surface area of a convex, host units
    pub fn convex_surface_area(&self, handle: ConvexHandle) -> Result<f32, CollisionError> {
        let convex = self.convexes.try_get(handle)?;
        Ok(self.convention.area_to_host(convex.surface_area()))
    }

    /// Mass center of a convex in its compound frame, host convention
    pub fn convex_mass_center(&self, handle: ConvexHandle) -> Result<Vec3, CollisionError> {
        let convex = self.convexes.try_get(handle)?;
        let center = convex.origin_in_compound() + convex.mass_center();
        Ok(self.convention.position_to_host(&center))
    }

    /// Principal inertia per unit mass of a convex, host convention
    pub fn convex_inertia(&self, handle: ConvexHandle) -> Result<Vec3, CollisionError> {
        let convex = self.convexes.try_get(handle)?;
        Ok(self.convention.inertia_to_host(&convex.inertia()))
    }

    /// User data attached to a convex
    pub fn convex_game_data(&self, handle: ConvexHandle) -> Result<u32, CollisionError> {
        Ok(self.convexes.try_get(handle)?.game_data())
    }

    /// Attach user data to a convex
    pub fn set_convex_game_data(&mut self, handle: ConvexHandle, game_data: u32) -> Result<(), CollisionError> {
        self.try_convex_mut(handle)?.set_game_data(game_data);
        Ok(())
    }

    /// Material of the hull triangle nearest to a host-space point
    pub fn convex_triangle_material(&self, handle: ConvexHandle, point: &Vec3) -> Result<u8, CollisionError> {
        let convex = self.convexes.try_get(handle)?;
        let local = self.convention.position_to_physics(point) - convex.origin_in_compound();
        Ok(convex.triangle_material_at(&local))
    }

    /// Assign a 7-bit material to one hull triangle
    pub fn set_convex_triangle_material(
        &mut self,
        handle: ConvexHandle,
        triangle: usize,
        material: u8,
    ) -> Result<(), CollisionError> {
        match self.try_convex_mut(handle)?.geometry_mut() {
            ConvexGeometry::Hull(hull) => {
                hull.set_triangle_material(triangle, material);
                Ok(())
            }
            ConvexGeometry::Box(_) => Err(CollisionError::UnsupportedShape("box")),
        }
    }

    // ---------------------------------------------------------------
    // Collides
    // ---------------------------------------------------------------

    /// Compound from caller-owned convexes; the compound takes them over
    pub fn convert_convex_list_to_collide(&mut self, convexes: &[ConvexHandle]) -> Result<CollideHandle, CollisionError> {
        let compound = CompoundShape::from_convexes(&mut self.convexes, convexes)?;
        Ok(self.collides.insert(CollideShape::new(CollideGeometry::Compound(compound))))
    }

    fn cached_box(&mut self, mins: &Vec3, maxs: &Vec3) -> Result<BBoxCacheEntry, CollisionError> {
        if mins == maxs {
            return Err(CollisionError::EmptyBoundingBox);
        }
        let mins = self.convention.position_to_physics(mins);
        let maxs = self.convention.position_to_physics(maxs);
        let half_extents = (maxs - mins).map(f32::abs) * 0.5;
        let origin = (mins + maxs) * 0.5;

        if let Some(entry) = self.bbox_cache.find(&half_extents, &origin) {
            return Ok(*entry);
        }

        let mut convex = ConvexShape::cuboid(BoxShape::new(half_extents, origin));
        convex.set_owner(ConvexOwner::Internal);
        let convex = self.convexes.insert(convex);
        let compound = CompoundShape::from_convexes(&mut self.convexes, &[convex])?;
        let collide = self.collides.insert(
            CollideShape::new(CollideGeometry::Compound(compound)).with_owner(CollideOwner::Internal),
        );
        let entry = BBoxCacheEntry { half_extents, origin, collide, convex };
        self.bbox_cache.insert(entry);
        Ok(entry)
    }

    /// Shared compound for an axis-aligned box given in host coordinates
    pub fn box_collide(&mut self, mins: &Vec3, maxs: &Vec3) -> Result<CollideHandle, CollisionError> {
        Ok(self.cached_box(mins, maxs)?.collide)
    }

    /// The box convex inside the shared compound for a box.
    ///
    /// The convex is owned internally; destroying it is a no-op.
    pub fn bbox_to_convex(&mut self, mins: &Vec3, maxs: &Vec3) -> Result<ConvexHandle, CollisionError> {
        Ok(self.cached_box(mins, maxs)?.convex)
    }

    /// A new sphere collide, radius in host units
    pub fn sphere_collide(&mut self, radius: f32) -> CollideHandle {
        let sphere = SphereShape::new(self.convention.length_to_physics(radius), self.config.physics_margin());
        self.collides.insert(CollideShape::new(CollideGeometry::Sphere(sphere)))
    }

    /// A shared sphere collide for this exact radius, host units
    pub fn cached_sphere_collide(&mut self, radius: f32) -> CollideHandle {
        let radius = self.convention.length_to_physics(radius);
        if let Some(&(_, handle)) = self.sphere_cache.iter().find(|(cached, _)| *cached == radius) {
            return handle;
        }
        let sphere = SphereShape::new(radius, self.config.physics_margin());
        let handle = self
            .collides
            .insert(CollideShape::new(CollideGeometry::Sphere(sphere)).with_owner(CollideOwner::Internal));
        self.sphere_cache.push((radius, handle));
        handle
    }

    /// Authored radius of a sphere collide, host units
    pub fn sphere_radius(&self, handle: CollideHandle) -> Result<f32, CollisionError> {
        let collide = self.try_collide(handle)?;
        let sphere = collide
            .as_sphere()
            .ok_or(CollisionError::UnsupportedShape(collide.geometry().kind()))?;
        Ok(self.convention.length_to_host(sphere.radius()))
    }

    /// Change the radius of a caller-owned sphere collide, host units
    pub fn set_sphere_radius(&mut self, handle: CollideHandle, radius: f32) -> Result<(), CollisionError> {
        let radius = self.convention.length_to_physics(radius);
        let collide = self.try_collide_mut(handle)?;
        if collide.owner() == CollideOwner::Internal {
            return Err(CollisionError::InternalCollide);
        }
        match collide.geometry_mut() {
            CollideGeometry::Sphere(sphere) => {
                sphere.set_radius(radius);
                Ok(())
            }
            other => Err(CollisionError::UnsupportedShape(other.kind())),
        }
    }

    /// Static triangle mesh from host-space vertices and 16-bit indices
    pub fn create_triangle_mesh(
        &mut self,
        vertices: &[Vec3],
        indices: &[u16],
        surface_props: i32,
    ) -> Result<CollideHandle, CollisionError> {
        let mesh = TriangleMeshShape::new(self.to_physics(vertices), indices.to_vec(), surface_props)?;
        Ok(self.collides.insert(CollideShape::new(CollideGeometry::TriangleMesh(mesh))))
    }

    fn insert_legacy_solid(&mut self, solid: LegacySolid, index: i32) -> Result<CollideHandle, CollisionError> {
        let compound = CompoundShape::from_legacy(&mut self.convexes, solid.surface)?;
        let mut collide = CollideShape::new(CollideGeometry::Compound(compound));
        collide.set_index(index);
        if let Some(areas) = solid.drag_axis_areas {
            collide.set_orthographic_areas(self.convention.axis_areas_to_physics(&areas));
        }
        Ok(self.collides.insert(collide))
    }

    /// Import one legacy solid.
    ///
    /// `buffer` holds exactly one solid, either with a modern header or as a
    /// bare compact surface. `swap` is set when the buffer was written on a
    /// machine of the other byte order. The collide's index is set to `index`.
    pub fn import_legacy_geometry(&mut self, buffer: &[u8], index: i32, swap: bool) -> Result<CollideHandle, CollisionError> {
        let reader = LegacyReader::new(buffer, Endianness::from_swap_flag(swap));
        let solid = parse_solid(&reader, &self.importer)?;
        self.insert_legacy_solid(solid, index)
    }

    /// Load every solid of a multi-solid container
    pub fn vcollide_load(&mut self, buffer: &[u8], solid_count: usize, swap: bool) -> Result<VCollide, CollisionError> {
        let data = parse_vcollide(buffer, solid_count, Endianness::from_swap_flag(swap), &self.importer)?;
        let mut solids = Vec::with_capacity(data.solids.len());
        for (index, solid) in data.solids.into_iter().enumerate() {
            let index = i32::try_from(index).unwrap_or(i32::MAX);
            solids.push(self.insert_legacy_solid(solid, index)?);
        }
        log::debug!("Loaded {} solids", solids.len());
        Ok(VCollide {
            solids,
            key_values: data.key_values,
        })
    }

    /// Destroy every solid of a loaded container
    pub fn vcollide_unload(&mut self, vcollide: VCollide) -> Result<(), CollisionError> {
        for solid in vcollide.solids {
            self.destroy_collide(solid)?;
        }
        Ok(())
    }

    /// Destroy a caller-owned collide.
    ///
    /// Compound children owned by the compound are queued and freed by the
    /// next [`Self::cleanup_released_convexes`].
    pub fn destroy_collide(&mut self, handle: CollideHandle) -> Result<(), CollisionError> {
        if self.try_collide(handle)?.owner() == CollideOwner::Internal {
            return Err(CollisionError::InternalCollide);
        }
        let Some(collide) = self.collides.remove(handle) else {
            return Err(CollisionError::UnknownCollide);
        };
        for convex in collide.convexes() {
            let owned = self
                .convexes
                .get(convex)
                .is_some_and(|shape| shape.owner() == ConvexOwner::Compound);
            if owned {
                self.convexes.schedule_release(convex);
            }
        }
        Ok(())
    }

    /// Free convexes queued by destroyed compounds, returning how many
    pub fn cleanup_released_convexes(&mut self) -> usize {
        self.convexes.cleanup()
    }

    /// Volume of a collide, host units
    pub fn collide_volume(&self, handle: CollideHandle) -> Result<f32, CollisionError> {
        let collide = self.try_collide(handle)?;
        Ok(self.convention.volume_to_host(collide.volume(&self.convexes)))
    }

    /// Surface area of a collide, host units
    pub fn collide_surface_area(&self, handle: CollideHandle) -> Result<f32, CollisionError> {
        let collide = self.try_collide(handle)?;
        Ok(self.convention.area_to_host(collide.surface_area(&self.convexes)))
    }

    /// Mass center of a collide, host convention
    pub fn collide_mass_center(&self, handle: CollideHandle) -> Result<Vec3, CollisionError> {
        Ok(self.convention.position_to_host(&self.try_collide(handle)?.mass_center()))
    }

    /// Principal inertia per unit mass of a collide, host convention
    pub fn collide_inertia(&self, handle: CollideHandle) -> Result<Vec3, CollisionError> {
        Ok(self.convention.inertia_to_host(&self.try_collide(handle)?.inertia()))
    }

    /// Move a compound's mass center (host convention).
    ///
    /// Every object referencing the collide is told once, with the previous
    /// mass center in host convention.
    pub fn set_collide_mass_center(
        &mut self,
        handle: CollideHandle,
        mass_center: &Vec3,
        observer: &mut dyn MassCenterObserver,
    ) -> Result<(), CollisionError> {
        let convention = self.convention;
        let mass_center = convention.position_to_physics(mass_center);
        let collide = self.collides.get_mut(handle).ok_or(CollisionError::UnknownCollide)?;
        let kind = collide.geometry().kind();
        let mut to_host = |object: ObjectId, old: &Vec3| {
            observer.mass_center_changed(object, &convention.position_to_host(old));
        };
        collide
            .set_mass_center(&self.convexes, mass_center, &mut to_host)
            .map(|_| ())
            .ok_or(CollisionError::UnsupportedShape(kind))
    }

    /// User index of a collide
    pub fn collide_index(&self, handle: CollideHandle) -> Result<i32, CollisionError> {
        Ok(self.try_collide(handle)?.index())
    }

    /// Set the user index of a collide
    pub fn set_collide_index(&mut self, handle: CollideHandle, index: i32) -> Result<(), CollisionError> {
        self.try_collide_mut(handle)?.set_index(index);
        Ok(())
    }

    /// Silhouette areas per host axis
    pub fn collide_orthographic_areas(&self, handle: CollideHandle) -> Result<Vec3, CollisionError> {
        let areas = self.try_collide(handle)?.orthographic_areas();
        Ok(self.convention.axis_areas_to_host(&areas))
    }

    /// Replace the silhouette areas, host axes
    pub fn set_collide_orthographic_areas(&mut self, handle: CollideHandle, areas: &Vec3) -> Result<(), CollisionError> {
        let areas = self.convention.axis_areas_to_physics(areas);
        self.try_collide_mut(handle)?.set_orthographic_areas(areas);
        Ok(())
    }

    /// Convexes making up a collide; empty for spheres and meshes
    pub fn convexes_in_collide(&self, handle: CollideHandle) -> Result<Vec<ConvexHandle>, CollisionError> {
        Ok(self.try_collide(handle)?.convexes())
    }

    fn world_support(&self, collide: &CollideShape, origin: &Vec3, rotation: &Quat, direction: &Vec3) -> Vec3 {
        let origin = self.convention.position_to_physics(origin);
        let rotation = self.convention.rotation_to_physics(rotation);
        let direction = self.convention.direction_to_physics(direction);
        let local = collide.support_point(&self.convexes, &rotation.inverse_transform_vector(&direction));
        self.convention.position_to_host(&(origin + rotation * local))
    }

    /// Point of a placed collide farthest along a host direction
    pub fn collide_extent(
        &self,
        handle: CollideHandle,
        origin: &Vec3,
        rotation: &Quat,
        direction: &Vec3,
    ) -> Result<Vec3, CollisionError> {
        let collide = self.try_collide(handle)?;
        Ok(self.world_support(collide, origin, rotation, direction))
    }

    /// Host-space bounding box of a placed collide
    pub fn collide_aabb(&self, handle: CollideHandle, origin: &Vec3, rotation: &Quat) -> Result<Aabb, CollisionError> {
        let collide = self.try_collide(handle)?;
        let mut mins = Vec3::zeros();
        let mut maxs = Vec3::zeros();
        for axis in 0..3 {
            let mut direction = Vec3::zeros();
            direction[axis] = 1.0;
            maxs[axis] = self.world_support(collide, origin, rotation, &direction)[axis];
            mins[axis] = self.world_support(collide, origin, rotation, &-direction)[axis];
        }
        Ok(Aabb { mins, maxs })
    }

    /// Register a simulation object as using a collide
    pub fn add_object_reference(&mut self, handle: CollideHandle, object: ObjectId) -> Result<(), CollisionError> {
        self.try_collide_mut(handle)?.add_object_reference(object);
        Ok(())
    }

    /// Unregister a simulation object, returning whether it was registered
    pub fn remove_object_reference(&mut self, handle: CollideHandle, object: ObjectId) -> Result<bool, CollisionError> {
        Ok(self.try_collide_mut(handle)?.remove_object_reference(object))
    }

    /// Whether any simulation object uses a collide
    pub fn is_collide_used(&self, handle: CollideHandle) -> Result<bool, CollisionError> {
        Ok(self.try_collide(handle)?.is_used())
    }

    // ---------------------------------------------------------------
    // Polysoups
    // ---------------------------------------------------------------

    /// Start an empty triangle soup
    pub fn polysoup_create(&mut self) -> PolysoupHandle {
        self.polysoups.insert(Polysoup::new())
    }

    /// Discard a triangle soup
    pub fn polysoup_destroy(&mut self, handle: PolysoupHandle) -> Result<(), CollisionError> {
        self.polysoups.remove(handle).map(|_| ()).ok_or(CollisionError::UnknownPolysoup)
    }

    /// Append a host-space triangle with a 7-bit material
    pub fn polysoup_add_triangle(
        &mut self,
        handle: PolysoupHandle,
        a: &Vec3,
        b: &Vec3,
        c: &Vec3,
        material: u8,
    ) -> Result<(), CollisionError> {
        let [a, b, c] = [a, b, c].map(|p| self.convention.position_to_physics(p));
        let soup = self.polysoups.get_mut(handle).ok_or(CollisionError::UnknownPolysoup)?;
        soup.add_triangle(a, b, c, material);
        Ok(())
    }

    /// Compound with one flat hull per soup triangle; the soup is kept
    pub fn convert_polysoup_to_collide(&mut self, handle: PolysoupHandle) -> Result<CollideHandle, CollisionError> {
        let convexes = self
            .polysoups
            .get(handle)
            .ok_or(CollisionError::UnknownPolysoup)?
            .to_convexes();
        let handles: Vec<ConvexHandle> = convexes.into_iter().map(|convex| self.convexes.insert(convex)).collect();
        self.convert_convex_list_to_collide(&handles)
    }
}

impl Default for CollisionFacade {
    fn default() -> Self {
        Self::with_valid_config(CollisionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::logging;
    use approx::assert_relative_eq;
    use std::f32::consts::PI;

    fn unit_facade() -> CollisionFacade {
        CollisionFacade::new(CollisionConfig::new().with_meters_per_unit(1.0).with_convex_margin(0.0)).unwrap()
    }

    fn cube_points(half: f32, center: Vec3) -> Vec<Vec3> {
        let mut points = Vec::new();
        for &x in &[-half, half] {
            for &y in &[-half, half] {
                for &z in &[-half, half] {
                    points.push(center + Vec3::new(x, y, z));
                }
            }
        }
        points
    }

    #[test]
    fn test_rejects_invalid_config() {
        assert!(CollisionFacade::new(CollisionConfig::new().with_meters_per_unit(0.0)).is_err());
    }

    #[test]
    fn test_convex_queries_in_host_units() {
        logging::init_for_tests();
        let mut facade = CollisionFacade::default();
        let handle = facade.convex_from_points(&cube_points(10.0, Vec3::new(0.0, 0.0, 5.0))).unwrap();
        assert_relative_eq!(facade.convex_volume(handle).unwrap(), 8000.0, max_relative = 1e-3);
        assert_relative_eq!(facade.convex_surface_area(handle).unwrap(), 2400.0, max_relative = 1e-3);
        assert_relative_eq!(facade.convex_mass_center(handle).unwrap(), Vec3::new(0.0, 0.0, 5.0), epsilon = 1e-2);
    }

    #[test]
    fn test_too_few_points() {
        let mut facade = unit_facade();
        assert_eq!(
            facade.convex_from_points(&[Vec3::zeros(), Vec3::x()]).unwrap_err(),
            CollisionError::TooFewPoints(2)
        );
    }

    #[test]
    fn test_convex_list_to_collide_and_deferred_release() {
        let mut facade = unit_facade();
        let a = facade.convex_from_points(&cube_points(1.0, Vec3::new(-2.0, 0.0, 0.0))).unwrap();
        let b = facade.convex_from_points(&cube_points(1.0, Vec3::new(2.0, 0.0, 0.0))).unwrap();
        let unrelated = facade.convex_from_points(&cube_points(1.0, Vec3::zeros())).unwrap();
        let collide = facade.convert_convex_list_to_collide(&[a, b]).unwrap();

        assert_relative_eq!(facade.collide_volume(collide).unwrap(), 16.0, epsilon = 1e-3);
        assert_eq!(facade.convexes_in_collide(collide).unwrap(), vec![a, b]);
        assert_eq!(facade.destroy_convex(a), Ok(false));

        facade.destroy_collide(collide).unwrap();
        assert!(facade.convex(a).is_some());
        assert!(facade.convex(b).is_some());
        assert_eq!(facade.cleanup_released_convexes(), 2);
        assert!(facade.convex(a).is_none());
        assert!(facade.convex(b).is_none());
        assert!(facade.convex(unrelated).is_some());
        assert_eq!(facade.collide_volume(collide), Err(CollisionError::UnknownCollide));
    }

    #[test]
    fn test_box_collide_is_cached() {
        let mut facade = CollisionFacade::default();
        let first = facade.box_collide(&Vec3::repeat(-8.0), &Vec3::repeat(8.0)).unwrap();
        let near = facade.box_collide(&Vec3::repeat(-8.05), &Vec3::repeat(8.05)).unwrap();
        let far = facade.box_collide(&Vec3::repeat(-9.0), &Vec3::repeat(9.0)).unwrap();
        assert_eq!(first, near);
        assert_ne!(first, far);
        assert_eq!(
            facade.box_collide(&Vec3::repeat(1.0), &Vec3::repeat(1.0)).unwrap_err(),
            CollisionError::EmptyBoundingBox
        );
        assert_eq!(facade.destroy_collide(first), Err(CollisionError::InternalCollide));
        assert_relative_eq!(facade.collide_volume(first).unwrap(), 4096.0, max_relative = 1e-3);

        let convex = facade.bbox_to_convex(&Vec3::repeat(-8.0), &Vec3::repeat(8.0)).unwrap();
        assert_eq!(facade.convexes_in_collide(first).unwrap(), vec![convex]);
        assert_eq!(facade.destroy_convex(convex), Ok(false));
    }

    #[test]
    fn test_sphere_radius_hides_margin() {
        let mut facade = CollisionFacade::default();
        let sphere = facade.sphere_collide(4.0);
        assert_relative_eq!(facade.sphere_radius(sphere).unwrap(), 4.0, epsilon = 1e-4);
        // Mass properties use the inflated radius.
        assert_relative_eq!(facade.collide_volume(sphere).unwrap(), 4.0 / 3.0 * PI * 4.25f32.powi(3), max_relative = 1e-4);
        facade.set_sphere_radius(sphere, 2.0).unwrap();
        assert_relative_eq!(facade.sphere_radius(sphere).unwrap(), 2.0, epsilon = 1e-4);

        let cached = facade.cached_sphere_collide(3.0);
        assert_eq!(facade.cached_sphere_collide(3.0), cached);
        assert_ne!(facade.cached_sphere_collide(3.5), cached);
        assert_eq!(facade.set_sphere_radius(cached, 1.0), Err(CollisionError::InternalCollide));
    }

    #[test]
    fn test_set_mass_center_reports_old_center_in_host_units() {
        let mut facade = CollisionFacade::default();
        let convex = facade.convex_from_points(&cube_points(1.0, Vec3::new(0.0, 3.0, 0.0))).unwrap();
        let collide = facade.convert_convex_list_to_collide(&[convex]).unwrap();
        facade.add_object_reference(collide, ObjectId(1)).unwrap();
        facade.add_object_reference(collide, ObjectId(2)).unwrap();

        let mut calls = Vec::new();
        facade
            .set_collide_mass_center(collide, &Vec3::new(1.0, 0.0, 0.0), &mut |object: ObjectId, old: &Vec3| {
                calls.push((object, *old));
            })
            .unwrap();
        assert_eq!(calls.len(), 2);
        for (_, old) in &calls {
            assert_relative_eq!(*old, Vec3::new(0.0, 3.0, 0.0), epsilon = 1e-3);
        }
        assert_relative_eq!(facade.collide_mass_center(collide).unwrap(), Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-3);
    }

    #[test]
    fn test_aabb_and_extent_follow_placement() {
        let mut facade = unit_facade();
        let convex = facade.convex_from_points(&cube_points(1.0, Vec3::zeros())).unwrap();
        let collide = facade.convert_convex_list_to_collide(&[convex]).unwrap();

        let origin = Vec3::new(10.0, 0.0, 0.0);
        let rotation = Quat::from_axis_angle(&Vec3::z_axis(), PI / 4.0);
        let aabb = facade.collide_aabb(collide, &origin, &rotation).unwrap();
        let reach = 2.0f32.sqrt();
        assert_relative_eq!(aabb.mins, Vec3::new(10.0 - reach, -reach, -1.0), epsilon = 1e-4);
        assert_relative_eq!(aabb.maxs, Vec3::new(10.0 + reach, reach, 1.0), epsilon = 1e-4);

        let extent = facade.collide_extent(collide, &origin, &Quat::identity(), &Vec3::z()).unwrap();
        assert_relative_eq!(extent.z, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_planes_and_polyhedron() {
        let mut facade = unit_facade();
        let planes: Vec<Plane> = [Vec3::x(), Vec3::y(), Vec3::z()]
            .iter()
            .flat_map(|axis| [Plane::new(*axis, 2.0), Plane::new(-axis, 2.0)])
            .collect();
        let from_planes = facade.convex_from_planes(&planes, None).unwrap();
        assert_relative_eq!(facade.convex_volume(from_planes).unwrap(), 64.0, epsilon = 1e-2);

        let vertices = [Vec3::zeros(), Vec3::x(), Vec3::y(), Vec3::z()];
        let triangles = [[0, 2, 1], [0, 1, 3], [1, 2, 3], [0, 3, 2]];
        let tetra = facade.convex_from_polyhedron(&vertices, &triangles).unwrap();
        assert_relative_eq!(facade.convex_volume(tetra).unwrap(), 1.0 / 6.0, epsilon = 1e-5);
        facade.set_convex_triangle_material(tetra, 1, 12).unwrap();
        facade.set_convex_game_data(tetra, 99).unwrap();
        assert_eq!(facade.convex_game_data(tetra).unwrap(), 99);
    }

    #[test]
    fn test_polysoup_collide_has_no_volume() {
        let mut facade = unit_facade();
        let soup = facade.polysoup_create();
        facade
            .polysoup_add_triangle(soup, &Vec3::zeros(), &Vec3::x(), &Vec3::y(), 3)
            .unwrap();
        facade
            .polysoup_add_triangle(soup, &Vec3::x(), &Vec3::new(1.0, 1.0, 0.0), &Vec3::y(), 3)
            .unwrap();
        let collide = facade.convert_polysoup_to_collide(soup).unwrap();
        assert_eq!(facade.collide_volume(collide).unwrap(), 0.0);
        assert_relative_eq!(facade.collide_mass_center(collide).unwrap(), Vec3::new(0.5, 0.5, 0.0), epsilon = 1e-5);
        assert_relative_eq!(facade.collide_surface_area(collide).unwrap(), 2.0, epsilon = 1e-5);
        facade.polysoup_destroy(soup).unwrap();
        assert_eq!(facade.polysoup_destroy(soup), Err(CollisionError::UnknownPolysoup));
    }

    #[test]
    fn test_collide_bookkeeping() {
        let mut facade = unit_facade();
        let mesh = facade
            .create_triangle_mesh(&[Vec3::zeros(), Vec3::x(), Vec3::y()], &[0, 1, 2], 6)
            .unwrap();
        assert_relative_eq!(facade.collide_surface_area(mesh).unwrap(), 0.5, epsilon = 1e-6);
        assert_eq!(facade.collide_volume(mesh).unwrap(), 0.0);

        facade.set_collide_index(mesh, 12).unwrap();
        assert_eq!(facade.collide_index(mesh).unwrap(), 12);
        facade.set_collide_orthographic_areas(mesh, &Vec3::new(0.1, 0.2, 0.3)).unwrap();
        assert_eq!(facade.collide_orthographic_areas(mesh).unwrap(), Vec3::new(0.1, 0.2, 0.3));

        assert!(!facade.is_collide_used(mesh).unwrap());
        facade.add_object_reference(mesh, ObjectId(4)).unwrap();
        assert!(facade.is_collide_used(mesh).unwrap());
        assert!(facade.remove_object_reference(mesh, ObjectId(4)).unwrap());
        assert!(!facade.is_collide_used(mesh).unwrap());
        assert!(facade.set_collide_mass_center(mesh, &Vec3::zeros(), &mut |_: ObjectId, _: &Vec3| {}).is_err());
    }
}
