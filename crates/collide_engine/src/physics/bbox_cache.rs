//! Shared collides for axis-aligned boxes
//!
//! Entities often ask for the same bounding box many times. Boxes whose
//! half-extents and centers agree within a fixed tolerance share one
//! single-box compound. Entries are never evicted.

use crate::foundation::collections::{CollideHandle, ConvexHandle};
use crate::foundation::math::Vec3;

/// One cached box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBoxCacheEntry {
    /// Half-extents of the box, physics units
    pub half_extents: Vec3,
    /// Box center, physics units
    pub origin: Vec3,
    /// The single-box compound
    pub collide: CollideHandle,
    /// The box convex inside it
    pub convex: ConvexHandle,
}

impl BBoxCacheEntry {
    fn matches(&self, half_extents: &Vec3, origin: &Vec3, tolerance: f32) -> bool {
        (0..3).all(|axis| {
            (self.half_extents[axis] - half_extents[axis]).abs() <= tolerance
                && (self.origin[axis] - origin[axis]).abs() <= tolerance
        })
    }
}

/// Append-only list of cached boxes
#[derive(Debug, Clone)]
pub struct BBoxCache {
    entries: Vec<BBoxCacheEntry>,
    tolerance: f32,
}

impl BBoxCache {
    /// Create a cache matching within `tolerance` physics units per component
    pub fn new(tolerance: f32) -> Self {
        Self {
            entries: Vec::new(),
            tolerance,
        }
    }

    /// Matching tolerance
    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Most recently added entry matching the box, if any
    pub fn find(&self, half_extents: &Vec3, origin: &Vec3) -> Option<&BBoxCacheEntry> {
        let found = self
            .entries
            .iter()
            .rev()
            .find(|entry| entry.matches(half_extents, origin, self.tolerance));
        log::trace!(
            "BBox cache {} for half-extents {:?} at {:?}",
            if found.is_some() { "hit" } else { "miss" },
            half_extents,
            origin
        );
        found
    }

    /// Record a newly built box
    pub fn insert(&mut self, entry: BBoxCacheEntry) {
        self.entries.push(entry);
    }

    /// Whether `collide` is one of the cached compounds
    pub fn contains_collide(&self, collide: CollideHandle) -> bool {
        self.entries.iter().any(|entry| entry.collide == collide)
    }

    /// Number of cached boxes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
