//! Convex storage with deferred release
//!
//! Convexes live in a generational slot map. Caller-owned convexes are freed
//! on request. Convexes absorbed into a compound are only queued when the
//! compound goes away and freed by a later [`ConvexArena::cleanup`] sweep,
//! after every compound teardown of the frame has finished.

use crate::foundation::collections::{ConvexHandle, HandleMap};

use super::convex::{ConvexOwner, ConvexShape};
use super::error::CollisionError;

/// Generational storage for every convex known to the facade
#[derive(Debug, Default)]
pub struct ConvexArena {
    convexes: HandleMap<ConvexHandle, ConvexShape>,
    pending_release: Vec<ConvexHandle>,
}

impl ConvexArena {
    /// Create an empty arena
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a convex
    pub fn insert(&mut self, convex: ConvexShape) -> ConvexHandle {
        self.convexes.insert(convex)
    }

    /// Look up a convex
    pub fn get(&self, handle: ConvexHandle) -> Option<&ConvexShape> {
        self.convexes.get(handle)
    }

    /// Look up a convex for modification
    pub fn get_mut(&mut self, handle: ConvexHandle) -> Option<&mut ConvexShape> {
        self.convexes.get_mut(handle)
    }

    /// Look up a convex or report a stale handle
    pub fn try_get(&self, handle: ConvexHandle) -> Result<&ConvexShape, CollisionError> {
        self.get(handle).ok_or(CollisionError::UnknownConvex)
    }

    /// Whether the handle still refers to a live convex
    pub fn contains(&self, handle: ConvexHandle) -> bool {
        self.convexes.contains_key(handle)
    }

    /// Number of live convexes, pending ones included
    pub fn len(&self) -> usize {
        self.convexes.len()
    }

    /// Whether no convex is stored
    pub fn is_empty(&self) -> bool {
        self.convexes.is_empty()
    }

    /// Free a convex on behalf of its caller.
    ///
    /// Only caller-owned convexes are freed; returns whether anything was
    /// removed. Convexes owned by a compound or a cache are left alone.
    pub fn destroy(&mut self, handle: ConvexHandle) -> Result<bool, CollisionError> {
        let convex = self.try_get(handle)?;
        if convex.owner() != ConvexOwner::Caller {
            log::trace!("Ignoring free of convex owned by {:?}", convex.owner());
            return Ok(false);
        }
        self.convexes.remove(handle);
        Ok(true)
    }

    /// Queue a compound-owned convex for the next cleanup sweep
    pub fn schedule_release(&mut self, handle: ConvexHandle) {
        if !self.pending_release.contains(&handle) {
            self.pending_release.push(handle);
        }
    }

    /// Convexes waiting for the next sweep
    pub fn pending_release(&self) -> &[ConvexHandle] {
        &self.pending_release
    }

    /// Free every queued convex, returning how many were freed
    pub fn cleanup(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending_release);
        let freed = pending
            .into_iter()
            .filter(|&handle| self.convexes.remove(handle).is_some())
            .count();
        if freed > 0 {
            log::debug!("Released {} compound convexes", freed);
        }
        freed
    }
}
