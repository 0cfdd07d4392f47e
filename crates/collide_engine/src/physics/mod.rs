//! Collision geometry for rigid bodies
//!
//! Convex pieces ([`convex`]) are grouped into complete collision
//! representations ([`collide`]). Shapes live in the physics convention
//! (Y up, meters) and are reached through handles; [`CollisionFacade`] is
//! the host-facing entry point that converts units at the boundary.
//!
//! Collision models authored for the legacy physics engine are read by the
//! [`legacy`] module.

pub mod arena;
pub mod bbox_cache;
pub mod collide;
pub mod convex;
pub mod error;
pub mod facade;
pub mod legacy;
pub mod mass;
pub mod polysoup;

#[cfg(test)]
mod tests;

pub use arena::ConvexArena;
pub use bbox_cache::{BBoxCache, BBoxCacheEntry};
pub use collide::{
    CollideGeometry, CollideOwner, CollideShape, CompoundShape, MassCenterObserver, SphereShape,
    TriangleMeshShape,
};
pub use convex::{BoxShape, ConvexGeometry, ConvexOwner, ConvexShape, HullBuilder, HullShape};
pub use error::CollisionError;
pub use facade::{CollisionFacade, VCollide};
pub use legacy::{LedgeTreeImporter, LegacyFormatError};
pub use mass::MassProperties;
pub use polysoup::Polysoup;
