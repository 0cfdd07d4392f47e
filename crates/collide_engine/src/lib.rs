//! # Collide Engine
//!
//! Collision geometry for rigid body simulation.
//!
//! ## Features
//!
//! - **Convex Shapes**: Hulls from point clouds, planes or polyhedra, and boxes
//! - **Collides**: Compounds of convexes, spheres and static triangle meshes
//! - **Mass Properties**: Volume, mass center and principal inertia per unit mass
//! - **Legacy Import**: Compact surfaces and multi-solid containers in either byte order
//! - **Shared Shapes**: Cached box and sphere collides reused across entities
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use collide_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut collision = CollisionFacade::new(CollisionConfig::default())?;
//!
//!     let crate_box = collision.box_collide(&Vec3::new(-16.0, -16.0, 0.0), &Vec3::new(16.0, 16.0, 32.0))?;
//!     println!("volume: {}", collision.collide_volume(crate_box)?);
//!
//!     let data = std::fs::read("props/barrel.phy.bin")?;
//!     let model = collision.vcollide_load(&data, 1, false)?;
//!     for solid in &model.solids {
//!         println!("mass center: {:?}", collision.collide_mass_center(*solid)?);
//!     }
//!     collision.vcollide_unload(model)?;
//!     collision.cleanup_released_convexes();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod core;
pub mod foundation;
pub mod physics;

/// Common imports for collision users
pub mod prelude {
    pub use crate::{
        core::{CollisionConfig, Config, ConfigError},
        foundation::{
            collections::{CollideHandle, ConvexHandle, ObjectId, PolysoupHandle},
            math::{Aabb, Plane, Quat, UnitConvention, Vec3},
        },
        physics::{CollisionError, CollisionFacade, MassCenterObserver, VCollide},
    };
}
