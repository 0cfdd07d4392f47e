//! # Collision Configuration
//!
//! Tunable constants for the collision subsystem. Lengths are given in host
//! units and converted to physics units when the facade is built.
//!
//! ## Design Goals
//!
//! - **Serializable**: loadable from TOML or RON through [`Config`]
//! - **Validated**: nonsensical values are rejected before use
//! - **Defaulted**: defaults reproduce the behaviour legacy content was tuned for

use serde::{Serialize, Deserialize};

use crate::config::{Config, ConfigError};
use crate::foundation::math::UnitConvention;

/// # Collision Configuration
///
/// Constants shared by every shape the facade creates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Size of one host length unit in meters
    pub meters_per_unit: f32,
    /// Distance margin convex shapes are inflated by, host units
    pub convex_margin: f32,
    /// Absolute per-component tolerance for bounding box cache hits, host units
    pub bbox_cache_tolerance: f32,
    /// Deepest ledge tree accepted by the legacy importer
    pub max_ledge_tree_depth: usize,
    /// Largest number of ledge tree nodes visited for one solid
    pub max_ledge_tree_nodes: usize,
    /// Default merge distance for hulls built from planes, host units
    pub plane_merge_distance: f32,
}

impl CollisionConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self {
            meters_per_unit: 0.0254,
            convex_margin: 0.25,
            bbox_cache_tolerance: 0.1,
            max_ledge_tree_depth: 128,
            max_ledge_tree_nodes: 65536,
            plane_merge_distance: 0.01,
        }
    }

    /// Set the host unit scale
    pub fn with_meters_per_unit(mut self, meters_per_unit: f32) -> Self {
        self.meters_per_unit = meters_per_unit;
        self
    }

    /// Set the convex distance margin
    pub fn with_convex_margin(mut self, margin: f32) -> Self {
        self.convex_margin = margin;
        self
    }

    /// Set the bounding box cache tolerance
    pub fn with_bbox_cache_tolerance(mut self, tolerance: f32) -> Self {
        self.bbox_cache_tolerance = tolerance;
        self
    }

    /// Set the legacy ledge tree bounds
    pub fn with_ledge_tree_limits(mut self, max_depth: usize, max_nodes: usize) -> Self {
        self.max_ledge_tree_depth = max_depth;
        self.max_ledge_tree_nodes = max_nodes;
        self
    }

    /// Unit converter for this configuration
    pub fn convention(&self) -> UnitConvention {
        UnitConvention::new(self.meters_per_unit)
    }

    /// Convex margin in physics units
    pub fn physics_margin(&self) -> f32 {
        self.convention().length_to_physics(self.convex_margin)
    }

    /// Cache tolerance in physics units
    pub fn physics_bbox_tolerance(&self) -> f32 {
        self.convention().length_to_physics(self.bbox_cache_tolerance)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.meters_per_unit.is_finite() && self.meters_per_unit > 0.0) {
            return Err(ConfigError::Invalid {
                field: "meters_per_unit",
                reason: format!("must be a positive number, got {}", self.meters_per_unit),
            });
        }
        if !(self.convex_margin.is_finite() && self.convex_margin >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "convex_margin",
                reason: format!("must be a finite non-negative number, got {}", self.convex_margin),
            });
        }
        if !(self.bbox_cache_tolerance.is_finite() && self.bbox_cache_tolerance >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "bbox_cache_tolerance",
                reason: format!("must be a finite non-negative number, got {}", self.bbox_cache_tolerance),
            });
        }
        if !(self.plane_merge_distance.is_finite() && self.plane_merge_distance >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "plane_merge_distance",
                reason: format!("must be a finite non-negative number, got {}", self.plane_merge_distance),
            });
        }
        if self.max_ledge_tree_depth == 0 || self.max_ledge_tree_nodes == 0 {
            return Err(ConfigError::Invalid {
                field: "max_ledge_tree_depth",
                reason: "ledge tree bounds must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for CollisionConfig {}
