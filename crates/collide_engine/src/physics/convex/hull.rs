//! Convex hull shapes
//!
//! A hull is a point cloud plus the triangle list of its surface. Mass
//! properties are derived from the triangles on first use and kept for the
//! lifetime of the hull.

use std::cell::OnceCell;

use crate::foundation::math::{Aabb, Plane, Vec3};
use crate::physics::mass::{box_approximation, MassProperties};

/// Largest material index a triangle can carry (7 bits)
pub const MAX_TRIANGLE_MATERIAL: u8 = 0x7f;

/// A convex hull given by its vertices and surface triangles
#[derive(Debug, Clone)]
pub struct HullShape {
    points: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
    /// Unremapped 7-bit material per triangle; allocated on first nonzero material
    triangle_materials: Option<Vec<u8>>,
    /// `None` for triangles whose normal cross product vanishes
    triangle_planes: OnceCell<Vec<Option<Plane>>>,
    mass: OnceCell<MassProperties>,
}

impl HullShape {
    /// Create a hull from points and triangles the caller knows to be convex.
    ///
    /// Returns `None` if there are no triangles or a triangle references a
    /// point that does not exist.
    pub fn new(points: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Option<Self> {
        if triangles.is_empty() {
            return None;
        }
        let count = points.len();
        if triangles.iter().flatten().any(|&index| index as usize >= count) {
            return None;
        }
        Some(Self {
            points,
            triangles,
            triangle_materials: None,
            triangle_planes: OnceCell::new(),
            mass: OnceCell::new(),
        })
    }

    /// Hull vertices
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Surface triangles as vertex index triples
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Number of surface triangles
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Vertex positions of one triangle, `None` when out of range
    pub fn triangle_vertices(&self, triangle: usize) -> Option<[Vec3; 3]> {
        self.triangles.get(triangle).map(|indices| self.corners_of(indices))
    }

    // Indices were range-checked in `new`.
    fn corners_of(&self, &[a, b, c]: &[u32; 3]) -> [Vec3; 3] {
        [
            self.points[a as usize],
            self.points[b as usize],
            self.points[c as usize],
        ]
    }

    /// Whether any triangle carries a nonzero material
    pub fn has_per_triangle_materials(&self) -> bool {
        self.triangle_materials.is_some()
    }

    /// Material of one triangle, 0 when none was assigned
    pub fn triangle_material(&self, triangle: usize) -> u8 {
        self.triangle_materials
            .as_ref()
            .and_then(|materials| materials.get(triangle).copied())
            .unwrap_or(0)
    }

    /// Assign a 7-bit material to a triangle.
    ///
    /// The material array is only allocated once a nonzero material shows up;
    /// earlier triangles read back as 0.
    pub fn set_triangle_material(&mut self, triangle: usize, material: u8) {
        let material = material & MAX_TRIANGLE_MATERIAL;
        if triangle >= self.triangles.len() {
            log::warn!(
                "Triangle {} out of range for hull with {} triangles",
                triangle,
                self.triangles.len()
            );
            return;
        }
        match &mut self.triangle_materials {
            Some(materials) => materials[triangle] = material,
            None if material == 0 => {}
            None => {
                let mut materials = vec![0; self.triangles.len()];
                materials[triangle] = material;
                self.triangle_materials = Some(materials);
            }
        }
    }

    /// Material of the triangle whose plane is nearest to `point`.
    ///
    /// Returns 0 for hulls without per-triangle materials. This picks the
    /// closest support plane, not the containing triangle, so it is only
    /// meaningful for points on or very near the surface. Triangles without
    /// a usable plane never match; if no triangle has one, triangle 0 is used.
    pub fn triangle_material_at(&self, point: &Vec3) -> u8 {
        let Some(materials) = &self.triangle_materials else {
            return 0;
        };
        let planes = self.triangle_planes.get_or_init(|| self.compute_triangle_planes());

        let mut closest = 0;
        let mut closest_distance = f32::MAX;
        for (triangle, plane) in planes.iter().enumerate() {
            let Some(plane) = plane else {
                continue;
            };
            let distance = plane.signed_distance(point).abs();
            if distance < closest_distance {
                closest_distance = distance;
                closest = triangle;
            }
        }
        materials[closest]
    }

    // The normal is the cross product of the second and third vertex
    // positions, and only the offset uses the first vertex. Legacy content
    // was tuned against exactly these planes.
    fn compute_triangle_planes(&self) -> Vec<Option<Plane>> {
        self.triangles
            .iter()
            .map(|indices| {
                let [v0, v1, v2] = self.corners_of(indices);
                let normal = v1.cross(&v2).try_normalize(f32::EPSILON)?;
                Some(Plane::new(normal, v0.dot(&normal)))
            })
            .collect()
    }

    /// Bounding box of the hull vertices
    pub fn local_aabb(&self) -> Aabb {
        Aabb::from_points(self.points.iter()).unwrap_or_else(|| Aabb::from_corners(Vec3::zeros(), Vec3::zeros()))
    }

    /// Vertex farthest along `direction`
    pub fn support_point(&self, direction: &Vec3) -> Vec3 {
        self.points
            .iter()
            .copied()
            .max_by(|a, b| a.dot(direction).total_cmp(&b.dot(direction)))
            .unwrap_or_else(Vec3::zeros)
    }

    /// Enclosed volume
    pub fn volume(&self) -> f32 {
        self.mass_properties().volume
    }

    /// Center of mass
    pub fn mass_center(&self) -> Vec3 {
        self.mass_properties().mass_center
    }

    /// Principal inertia per unit mass about the center of mass
    pub fn inertia(&self) -> Vec3 {
        self.mass_properties().inertia
    }

    /// Total area of the surface triangles
    pub fn surface_area(&self) -> f32 {
        let doubled: f32 = self
            .triangles
            .iter()
            .map(|indices| {
                let [p0, p1, p2] = self.corners_of(indices);
                (p1 - p0).cross(&(p2 - p0)).norm()
            })
            .sum();
        0.5 * doubled
    }

    /// Volume, mass center and inertia, computed on first call
    pub fn mass_properties(&self) -> MassProperties {
        *self.mass.get_or_init(|| self.compute_mass_properties())
    }

    fn compute_mass_properties(&self) -> MassProperties {
        // Fan every triangle against one reference vertex. Winding is not
        // trusted after format conversion, so tetrahedra count unsigned.
        let reference = self.points[self.triangles[0][0] as usize];
        let mut six_volume = 0.0f32;
        let mut center_sum = Vec3::zeros();
        for indices in &self.triangles {
            let [p0, p1, p2] = self.corners_of(indices);
            let tetra_six_volume = (p0 - reference).dot(&(p1 - reference).cross(&(p2 - reference))).abs();
            six_volume += tetra_six_volume;
            center_sum += (0.25 * tetra_six_volume) * (p0 + p1 + p2 + reference);
        }

        let volume = six_volume / 6.0;
        if volume <= 0.0 {
            log::debug!(
                "Hull with {} triangles has no volume, using box approximation",
                self.triangles.len()
            );
            let (mass_center, inertia) = box_approximation(&self.local_aabb());
            return MassProperties { volume: 0.0, mass_center, inertia };
        }

        let mass_center = center_sum / six_volume;
        let mut inertia = Vec3::zeros();
        for indices in &self.triangles {
            let [a, b, c] = self.corners_of(indices).map(|p| p - mass_center);
            let weight = a.dot(&b.cross(&c)).abs() * (0.1 / 6.0);
            let terms = weight
                * (a.component_mul(&a)
                    + b.component_mul(&b)
                    + c.component_mul(&c)
                    + a.component_mul(&b)
                    + a.component_mul(&c)
                    + b.component_mul(&c));
            inertia.x += terms.y + terms.z;
            inertia.y += terms.z + terms.x;
            inertia.z += terms.x + terms.y;
        }

        MassProperties {
            volume,
            mass_center,
            inertia: (inertia / volume).map(f32::abs),
        }
    }
}
