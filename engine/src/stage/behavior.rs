//! Logic attached to stage objects.
//!
//! A [`Behavior`] is the per-object hook surface: the stage calls
//! [`on_start`](Behavior::on_start) synchronously when the carrying object is
//! spawned and [`on_destroy`](Behavior::on_destroy) while it is being torn
//! down. Both hooks receive the stage itself, so a behavior can spawn, destroy
//! and resolve singletons from inside its own lifecycle.
//!
//! # Example
//!
//! ```rust,ignore
//! struct Announcer;
//!
//! impl Behavior for Announcer {
//!     fn on_start(&mut self, stage: &mut Stage, object: ObjectId) {
//!         log::info!("{} entered the stage", stage.name_of(object).unwrap_or("?"));
//!     }
//! }
//!
//! stage.spawn_behavior("announcer", Announcer);
//! ```

use crate::stage::{ObjectId, Stage};

/// Lifecycle hooks for logic carried by a stage object.
///
/// Both hooks default to no-ops; implement the ones the behavior needs. The
/// stage guarantees each hook fires at most once per object: `on_start` when
/// the object is spawned through [`Stage::spawn_behavior`](Stage::spawn_behavior)
/// and `on_destroy` while the object is being destroyed, whichever path
/// (explicit destroy, scene sweep, shutdown) triggers it.
///
/// During `on_destroy` the object is still alive from the stage's point of
/// view, so the hook can read its own record. A hook destroying its own object
/// is tolerated and still produces exactly one `on_destroy`; the one case
/// where that hook sees a stale handle is a behavior destroying its own
/// object from inside `on_start`.
pub trait Behavior: 'static {
    /// Called synchronously after the carrying object is spawned.
    fn on_start(&mut self, _stage: &mut Stage, _object: ObjectId) {}

    /// Called while the carrying object is being destroyed.
    fn on_destroy(&mut self, _stage: &mut Stage, _object: ObjectId) {}
}
