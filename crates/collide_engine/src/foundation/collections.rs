//! Specialized collection types

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable handle to a convex shape stored in a [`crate::physics::ConvexArena`]
    pub struct ConvexHandle;

    /// Stable handle to a collide shape owned by a [`crate::physics::CollisionFacade`]
    pub struct CollideHandle;

    /// Handle to a polysoup under construction
    pub struct PolysoupHandle;
}

/// Handle-based map using slot map for stable references
pub type HandleMap<K, T> = SlotMap<K, T>;

/// Identifier of a simulation object referencing a collide shape.
///
/// Simulation objects live outside this crate; the id is whatever the host
/// uses to find them again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);
