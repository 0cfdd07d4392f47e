//! Simulation objects bound to a collide
//!
//! Objects register themselves when they start using a collide and
//! unregister when they stop. The ring is only walked by this crate, to tell
//! each object once that the collide's mass center moved.

use crate::foundation::collections::ObjectId;
use crate::foundation::math::Vec3;

/// Receives mass center changes for objects referencing a collide
pub trait MassCenterObserver {
    /// `object` uses a collide whose mass center was `old_mass_center`
    fn mass_center_changed(&mut self, object: ObjectId, old_mass_center: &Vec3);
}

impl<F> MassCenterObserver for F
where
    F: FnMut(ObjectId, &Vec3),
{
    fn mass_center_changed(&mut self, object: ObjectId, old_mass_center: &Vec3) {
        self(object, old_mass_center);
    }
}

/// Ordered set of objects referencing one collide
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectReferences {
    objects: Vec<ObjectId>,
}

impl ObjectReferences {
    /// An empty ring
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an object; registering twice has no effect
    pub fn add(&mut self, object: ObjectId) {
        if !self.objects.contains(&object) {
            self.objects.push(object);
        }
    }

    /// Unregister an object, returning whether it was present
    pub fn remove(&mut self, object: ObjectId) -> bool {
        let Some(position) = self.objects.iter().position(|&id| id == object) else {
            return false;
        };
        self.objects.remove(position);
        true
    }

    /// Whether no object references the collide
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of referencing objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Referencing objects in registration order
    pub fn iter(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects.iter().copied()
    }

    /// Tell every referencing object once about a mass center change
    pub fn notify_mass_center_changed(&self, old_mass_center: &Vec3, observer: &mut dyn MassCenterObserver) {
        for object in self.iter() {
            observer.mass_center_changed(object, old_mass_center);
        }
    }
}
