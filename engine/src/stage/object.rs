//! Object identity and the roster of live objects.
//!
//! This module provides the handle type and the slot arena a stage uses to
//! track every object it owns. Objects here are deliberately lightweight:
//! a named record carrying visibility flags, a persistence bit, and an
//! optional attached [`Behavior`].
//!
//! # Generation Tracking
//!
//! An [`ObjectId`] combines a slot index with a [`Generation`]. When a slot is
//! freed its generation is incremented, so any handle minted for the previous
//! occupant no longer matches and is detected as stale. This is what lets the
//! stage treat destroy-twice and use-after-destroy as cheap no-ops instead of
//! bugs:
//!
//! ```rust,ignore
//! let id = roster.alloc(Record::new("camera".into())); // index 0, generation 0
//! roster.free(id);
//! let reused = roster.alloc(Record::new("probe".into())); // index 0, generation 1
//! assert!(!roster.is_alive(id)); // stale handle, generation mismatch
//! assert!(roster.is_alive(reused));
//! ```
//!
//! Freed slot indices are recycled from a free list, keeping the id space
//! compact for long-running stages.

use bitflags::bitflags;

use crate::stage::behavior::Behavior;

/// The generation of a roster slot, used to tell whether a handle still refers
/// to the slot's current occupant. Starts at `FIRST` and is incremented each
/// time the slot's occupant is destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u32);

impl Generation {
    /// The first generation of a slot.
    pub(crate) const FIRST: Self = Self(0);

    /// Get the next generation from the current.
    #[inline]
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

/// A handle to an object living on a stage.
///
/// The handle stays valid until the object is destroyed; after that it is
/// stale and every roster operation taking it degrades to a no-op or `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId {
    /// The slot index in the roster.
    index: u32,

    /// The slot generation at the time the handle was minted.
    generation: Generation,
}

impl ObjectId {
    #[inline]
    pub(crate) const fn new(index: u32, generation: Generation) -> Self {
        Self { index, generation }
    }

    /// Get the index of this object if it were to live in indexable storage.
    #[inline]
    pub fn index(&self) -> usize {
        self.index as usize
    }

    /// Get the generation baked into this handle.
    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }
}

bitflags! {
    /// Advisory visibility flags carried by an object.
    ///
    /// The stage stores these on the object record and never interprets them;
    /// they exist as a pass-through for tooling layered on top (inspectors,
    /// serializers, debug dumps) to honor as it sees fit.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Visibility: u8 {
        /// Omit the object from listings and debug dumps.
        const HIDDEN = 1 << 0;
        /// Advise tooling not to mutate the object.
        const LOCKED = 1 << 1;
        /// Advise serializers to skip the object.
        const SKIP_SAVE = 1 << 2;
    }
}

/// The per-object bookkeeping a stage keeps while the object is alive.
pub(crate) struct Record {
    /// Display name, purely diagnostic.
    pub(crate) name: String,

    /// Opaque visibility flags, stored but never interpreted.
    pub(crate) visibility: Visibility,

    /// Whether the object survives scene transitions.
    pub(crate) persistent: bool,

    /// Logic attached to the object, if any.
    pub(crate) behavior: Option<Box<dyn Behavior>>,
}

impl Record {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            visibility: Visibility::empty(),
            persistent: false,
            behavior: None,
        }
    }
}

/// One slot in the roster.
struct Slot {
    /// Generation stamped into handles minted for this slot.
    generation: Generation,

    /// The live record, or `None` while the slot is free.
    record: Option<Record>,
}

/// Slot arena for object records.
///
/// Allocation reuses freed slots before growing, and freeing a slot bumps its
/// generation so stale handles are rejected. All operations take `&mut self`
/// or `&self`; the roster is owned by the stage and never shared.
#[derive(Default)]
pub(crate) struct Roster {
    /// All slots ever allocated, free ones included.
    slots: Vec<Slot>,

    /// Indices of free slots available for reuse.
    free: Vec<u32>,

    /// Number of currently live records.
    live: usize,
}

impl Roster {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a record in a slot, reusing a freed slot when one is available,
    /// and return the handle for it.
    pub fn alloc(&mut self, record: Record) -> ObjectId {
        self.live += 1;

        // Reuse from the free list first.
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.record = Some(record);
            return ObjectId::new(index, slot.generation);
        }

        // Grow with a fresh slot.
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: Generation::FIRST,
            record: Some(record),
        });
        ObjectId::new(index, Generation::FIRST)
    }

    /// Free the slot behind the handle, returning the evicted record.
    ///
    /// The slot generation is bumped immediately, so the handle (and any copy
    /// of it) is stale by the time the caller sees the record. Dead or stale
    /// handles return `None` and change nothing.
    pub fn free(&mut self, id: ObjectId) -> Option<Record> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation || slot.record.is_none() {
            return None;
        }
        slot.generation = slot.generation.next();
        self.free.push(id.index);
        self.live -= 1;
        slot.record.take()
    }

    /// Get the record behind the handle, if the object is still alive.
    pub fn get(&self, id: ObjectId) -> Option<&Record> {
        let slot = self.slots.get(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        slot.record.as_ref()
    }

    /// Get the record behind the handle mutably, if the object is still alive.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Record> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        slot.record.as_mut()
    }

    /// Determine whether the handle still refers to a live object.
    #[inline]
    pub fn is_alive(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    /// Iterate over every live object with its current handle.
    pub fn live(&self) -> impl Iterator<Item = (ObjectId, &Record)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.record
                .as_ref()
                .map(|record| (ObjectId::new(index as u32, slot.generation), record))
        })
    }

    /// Number of currently live objects.
    #[inline]
    pub fn live_count(&self) -> usize {
        self.live
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> Record {
        Record::new(name.into())
    }

    // ==================== Allocation ====================

    #[test]
    fn alloc_returns_unique_handles() {
        // Given
        let mut roster = Roster::new();

        // When
        let mut ids = Vec::new();
        for n in 0..50 {
            ids.push(roster.alloc(record(&format!("object-{n}"))));
        }

        // Then - no dupes
        let pre_len = ids.len();
        ids.sort_by_key(|id| (id.index(), id.generation()));
        ids.dedup();
        assert_eq!(pre_len, ids.len());
        assert_eq!(roster.live_count(), 50);
    }

    #[test]
    fn alloc_reuses_freed_slot_with_next_generation() {
        // Given
        let mut roster = Roster::new();
        let first = roster.alloc(record("first"));

        // When
        roster.free(first);
        let second = roster.alloc(record("second"));

        // Then - same slot, bumped generation
        assert_eq!(first.index(), second.index());
        assert_eq!(second.generation(), first.generation().next());
    }

    // ==================== Liveness ====================

    #[test]
    fn free_makes_handle_stale() {
        let mut roster = Roster::new();
        let id = roster.alloc(record("fleeting"));
        assert!(roster.is_alive(id));

        let evicted = roster.free(id);

        assert!(evicted.is_some());
        assert!(!roster.is_alive(id));
        assert!(roster.get(id).is_none());
        assert_eq!(roster.live_count(), 0);
    }

    #[test]
    fn stale_handle_does_not_reach_new_occupant() {
        // Given - a slot that has changed hands
        let mut roster = Roster::new();
        let old = roster.alloc(record("old"));
        roster.free(old);
        let new = roster.alloc(record("new"));

        // Then - the stale handle sees nothing, the fresh one does
        assert!(roster.get(old).is_none());
        assert_eq!(roster.get(new).map(|r| r.name.as_str()), Some("new"));
    }

    #[test]
    fn double_free_is_noop() {
        let mut roster = Roster::new();
        let id = roster.alloc(record("once"));

        assert!(roster.free(id).is_some());
        assert!(roster.free(id).is_none());
        assert_eq!(roster.live_count(), 0);
    }

    #[test]
    fn free_unknown_index_is_noop() {
        let mut roster = Roster::new();
        let id = roster.alloc(record("only"));
        let beyond = ObjectId::new(7, Generation::FIRST);

        assert!(roster.free(beyond).is_none());
        assert!(roster.is_alive(id));
    }

    // ==================== Records ====================

    #[test]
    fn get_mut_edits_record_in_place() {
        let mut roster = Roster::new();
        let id = roster.alloc(record("plain"));

        if let Some(record) = roster.get_mut(id) {
            record.visibility = Visibility::HIDDEN | Visibility::LOCKED;
            record.persistent = true;
        }

        let record = roster.get(id).unwrap();
        assert!(record.visibility.contains(Visibility::HIDDEN));
        assert!(record.persistent);
    }

    #[test]
    fn live_iterates_only_live_slots() {
        // Given
        let mut roster = Roster::new();
        let a = roster.alloc(record("a"));
        let b = roster.alloc(record("b"));
        let c = roster.alloc(record("c"));
        roster.free(b);

        // When
        let names: Vec<_> = roster.live().map(|(_, r)| r.name.clone()).collect();
        let ids: Vec<_> = roster.live().map(|(id, _)| id).collect();

        // Then
        assert_eq!(names, vec!["a", "c"]);
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn live_reports_current_generation_after_reuse() {
        let mut roster = Roster::new();
        let old = roster.alloc(record("old"));
        roster.free(old);
        let new = roster.alloc(record("new"));

        let (listed, _) = roster.live().next().unwrap();
        assert_eq!(listed, new);
        assert_ne!(listed, old);
    }

    // ==================== Generations ====================

    #[test]
    fn generation_advances_once_per_occupancy() {
        let mut roster = Roster::new();
        let gen0 = roster.alloc(record("gen0"));
        roster.free(gen0);
        let gen1 = roster.alloc(record("gen1"));
        roster.free(gen1);
        let gen2 = roster.alloc(record("gen2"));

        assert_eq!(gen0.generation(), Generation::FIRST);
        assert_eq!(gen1.generation(), Generation::FIRST.next());
        assert_eq!(gen2.generation(), Generation::FIRST.next().next());
    }
}
