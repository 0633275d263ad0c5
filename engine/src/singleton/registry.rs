//! Type-keyed storage for cached singleton instances.
//!
//! This module provides [`Singletons`], the registry a stage uses to hold the
//! one live instance of each [`Singleton`] type together with the anchor
//! object it is bound to. The registry is pure bookkeeping: it never creates
//! instances and never talks to the roster. The stage drives it and is
//! responsible for liveness checks on the anchor side.
//!
//! # Type Erasure
//!
//! Entries are stored as `Box<dyn ErasedInstance>` keyed by `TypeId`, the
//! same pattern the catalog uses for prefab payloads. [`ErasedInstance`]
//! keeps just enough surface to run the deinitialize hook without knowing
//! the concrete type and to downcast back when a typed accessor asks.
//!
//! # Hook Discipline
//!
//! [`notify_destroying`](Singletons::notify_destroying) runs
//! `on_deinitialize` on the matching entry and then clears it, in that
//! order, so the hook always completes before the cache forgets the
//! instance. [`discard`](Singletons::discard) clears without any hook; the
//! stage uses it when an anchor object turns out to be dead and the instance
//! is already unreachable as far as callers are concerned.

use std::{
    any::{Any, TypeId},
    collections::HashMap,
};

use crate::singleton::Singleton;
use crate::stage::ObjectId;

/// Type-erased surface over one cached singleton instance.
///
/// Lets [`Singletons`] store heterogeneous instances in a single map while
/// still being able to run the teardown hook and hand back typed references
/// through downcasting.
pub(crate) trait ErasedInstance: Send + Sync {
    /// Run the instance's deinitialize hook.
    fn deinitialize(&mut self);

    /// Returns a reference to self as `&dyn Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns a mutable reference to self as `&mut dyn Any` for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<S: Singleton> ErasedInstance for S {
    fn deinitialize(&mut self) {
        Singleton::on_deinitialize(self);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// One cached instance and the object it is anchored to.
struct Entry {
    /// The anchor object carrying the instance's name, visibility and
    /// persistence on the stage.
    object: ObjectId,

    /// The instance itself, behind the erased hook/downcast surface.
    instance: Box<dyn ErasedInstance>,
}

/// Registry of live singleton instances, at most one per type.
///
/// Owned by the stage; all access is single-threaded through `&mut Stage`.
/// The stage inserts only after the creation path has confirmed the type is
/// absent, so entries are never silently replaced in practice.
#[derive(Default)]
pub(crate) struct Singletons {
    entries: HashMap<TypeId, Entry>,
}

impl Singletons {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache an instance under its type, bound to its anchor object.
    pub fn insert<S: Singleton>(&mut self, object: ObjectId, instance: S) {
        self.entries.insert(
            TypeId::of::<S>(),
            Entry {
                object,
                instance: Box::new(instance),
            },
        );
    }

    /// Returns a reference to the cached instance of `S`, if any.
    pub fn get<S: Singleton>(&self) -> Option<&S> {
        self.entries
            .get(&TypeId::of::<S>())
            .and_then(|entry| entry.instance.as_any().downcast_ref::<S>())
    }

    /// Returns a mutable reference to the cached instance of `S`, if any.
    pub fn get_mut<S: Singleton>(&mut self) -> Option<&mut S> {
        self.entries
            .get_mut(&TypeId::of::<S>())
            .and_then(|entry| entry.instance.as_any_mut().downcast_mut::<S>())
    }

    /// The anchor object of the cached instance of `S`, if any.
    pub fn object_of<S: Singleton>(&self) -> Option<ObjectId> {
        self.entries
            .get(&TypeId::of::<S>())
            .map(|entry| entry.object)
    }

    /// `true` if an instance of `S` is cached.
    pub fn contains<S: Singleton>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<S>())
    }

    /// Number of cached instances.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if no instances are cached.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear the entry for `S` without running its deinitialize hook.
    ///
    /// Returns `true` if an entry existed. Used for out-of-band loss, where
    /// the anchor object is already gone and the instance was never formally
    /// torn down.
    pub fn discard<S: Singleton>(&mut self) -> bool {
        self.entries.remove(&TypeId::of::<S>()).is_some()
    }

    /// Teardown notification for the instance anchored to `object`.
    ///
    /// Runs the matching entry's `on_deinitialize` exactly once, then clears
    /// the entry so the next create-or-fetch starts a fresh cycle. An object
    /// that anchors no cached instance is a no-op returning `false`; this is
    /// what keeps stale or duplicate notifications harmless.
    pub fn notify_destroying(&mut self, object: ObjectId) -> bool {
        let key = self
            .entries
            .iter()
            .find(|(_, entry)| entry.object == object)
            .map(|(key, _)| *key);
        let Some(key) = key else {
            return false;
        };
        // Hook first, then forget: the hook must complete while the entry
        // still exists.
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.instance.deinitialize();
        }
        self.entries.remove(&key);
        true
    }
}
