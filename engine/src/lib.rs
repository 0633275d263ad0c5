//! Lifecycle-bound singleton components over a compact object stage.
//!
//! The crate has two cooperating halves:
//!
//! - [`stage`]: the host runtime. A [`Stage`] owns every live object in a
//!   generational roster, runs [`Behavior`] hooks, sweeps non-persistent
//!   objects on scene transitions, applies deferred [`Commands`] and tears
//!   everything down exactly once on shutdown.
//! - [`singleton`]: the one-instance guarantee. A type implementing
//!   [`Singleton`] declares how its instance is produced through a
//!   [`CreationConfig`]; the stage creates it lazily on first access, binds
//!   it to an anchor object, runs each lifecycle hook exactly once and hands
//!   out references until the anchor dies.
//!
//! Absence is part of the contract: when no allowed creation strategy
//! succeeds, or when the stage is already shutting down, accessors return
//! `None` rather than panic. Callers written against this API treat "no
//! instance right now" as an ordinary outcome.
//!
//! # Example
//!
//! ```rust,ignore
//! use solo_engine::{Singleton, Stage};
//!
//! #[derive(Default, Singleton)]
//! #[singleton(name = "audio", persist)]
//! struct Audio {
//!     volume: f32,
//! }
//!
//! let mut stage = Stage::new();
//!
//! // Created lazily on first access.
//! if let Some(audio) = stage.singleton_mut::<Audio>() {
//!     audio.volume = 0.8;
//! }
//!
//! // Persistent, so it survives the scene change.
//! stage.load_scene("boss-fight");
//! assert!(stage.has_singleton::<Audio>());
//!
//! stage.shutdown();
//! ```

// Let the derive macro's `::solo_engine::...` paths resolve inside this
// crate as well as in dependents.
extern crate self as solo_engine;

pub mod singleton;
pub mod stage;

pub use singleton::{CreationConfig, CreationMode, Singleton, StrategyOrder};
pub use stage::{Behavior, Catalog, Command, Commands, ObjectId, Stage, State, Visibility};

/// Derive [`Singleton`](singleton::Singleton) from a `#[singleton(...)]`
/// declaration attribute, with both hooks left as no-ops.
pub use solo_macros::Singleton;
