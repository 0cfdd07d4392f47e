//! # Core Module
//!
//! Shared configuration for the collision subsystem.
//!
//! ## Organization
//!
//! - **Config**: tunable constants (unit scale, margins, cache tolerance,
//!   legacy import bounds)

pub mod config;

pub use config::CollisionConfig;
pub use crate::config::{Config, ConfigError};
