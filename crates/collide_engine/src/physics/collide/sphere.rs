//! Sphere collides

use std::f32::consts::PI;

use crate::foundation::math::{Aabb, Vec3};

/// A solid sphere stored with the collision margin already added
#[derive(Debug, Clone, PartialEq)]
pub struct SphereShape {
    inflated_radius: f32,
    margin: f32,
}

impl SphereShape {
    /// Sphere with the given authored radius
    pub fn new(radius: f32, margin: f32) -> Self {
        Self {
            inflated_radius: radius + margin,
            margin,
        }
    }

    /// Authored radius, without margin
    pub fn radius(&self) -> f32 {
        self.inflated_radius - self.margin
    }

    /// Change the authored radius
    pub fn set_radius(&mut self, radius: f32) {
        self.inflated_radius = radius + self.margin;
    }

    /// Radius used for contact generation
    pub fn inflated_radius(&self) -> f32 {
        self.inflated_radius
    }

    /// `4/3·π·r³` of the stored radius
    pub fn volume(&self) -> f32 {
        let r = self.inflated_radius;
        (4.0 / 3.0) * PI * r * r * r
    }

    /// `4·π·r²` of the stored radius
    pub fn surface_area(&self) -> f32 {
        let r = self.inflated_radius;
        4.0 * PI * r * r
    }

    /// `2/5·r²` on every axis
    pub fn inertia(&self) -> Vec3 {
        let r = self.inflated_radius;
        Vec3::repeat(0.4 * r * r)
    }

    /// Box around the authored radius
    pub fn local_aabb(&self) -> Aabb {
        let r = Vec3::repeat(self.radius());
        Aabb::from_corners(-r, r)
    }

    /// Surface point along `direction`, the center for a zero direction
    pub fn support_point(&self, direction: &Vec3) -> Vec3 {
        direction
            .try_normalize(f32::EPSILON)
            .map_or_else(Vec3::zeros, |unit| unit * self.radius())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_margin_hidden_from_callers() {
        let mut sphere = SphereShape::new(2.0, 0.25);
        assert_relative_eq!(sphere.radius(), 2.0);
        assert_relative_eq!(sphere.inflated_radius(), 2.25);
        sphere.set_radius(1.0);
        assert_relative_eq!(sphere.radius(), 1.0);
    }

    #[test]
    fn test_mass_properties_use_stored_radius() {
        let sphere = SphereShape::new(0.75, 0.25);
        assert_relative_eq!(sphere.volume(), 4.0 / 3.0 * PI, epsilon = 1e-6);
        assert_relative_eq!(sphere.surface_area(), 4.0 * PI, epsilon = 1e-6);
        assert_relative_eq!(sphere.inertia(), Vec3::repeat(0.4), epsilon = 1e-6);
    }

    #[test]
    fn test_support_point() {
        let sphere = SphereShape::new(2.0, 0.1);
        assert_relative_eq!(sphere.support_point(&Vec3::new(0.0, 3.0, 0.0)), Vec3::new(0.0, 2.0, 0.0), epsilon = 1e-6);
        assert_eq!(sphere.support_point(&Vec3::zeros()), Vec3::zeros());
    }
}
