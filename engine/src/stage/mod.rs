//! The stage: host runtime for objects, behaviors and singletons.
//!
//! A [`Stage`] owns the complete object lifecycle. Objects are allocated in a
//! generational roster, optionally carry [`Behavior`] logic, and are swept by
//! scene transitions unless marked persistent. Deferred work is submitted
//! through cloneable [`Commands`] handles and applied in
//! [`update`](Stage::update). [`shutdown`](Stage::shutdown) tears everything
//! down exactly once, and dropping a live stage does the same.
//!
//! The singleton accessor surface also lives here: the stage lazily creates
//! at most one instance per [`Singleton`] type, binds it to a dedicated
//! anchor object, and retires it when that anchor is destroyed.
//!
//! # Architecture
//!
//! The stage coordinates five pieces:
//!
//! - **Roster**: slot arena tracking every live object and its record
//! - **Singletons**: the type-keyed registry of cached instances
//! - **[`Catalog`]**: shared prefab factories backing resource creation
//! - **[`Commands`]**: lock-free queue of deferred lifecycle operations
//! - **[`State`]**: `Running` from construction until shutdown walks it
//!   through `Stopping` to `Stopped`
//!
//! # Example
//!
//! ```rust,ignore
//! use solo_engine::{CreationConfig, Singleton, Stage};
//!
//! #[derive(Default)]
//! struct Audio {
//!     volume: f32,
//! }
//!
//! impl Singleton for Audio {
//!     fn creation() -> CreationConfig {
//!         CreationConfig::new("audio").persist()
//!     }
//! }
//!
//! let mut stage = Stage::new();
//!
//! // First access creates the instance; later accesses reuse it.
//! if let Some(audio) = stage.singleton_mut::<Audio>() {
//!     audio.volume = 0.8;
//! }
//!
//! // Persistent singletons ride out scene changes.
//! stage.load_scene("boss-fight");
//! assert!(stage.has_singleton::<Audio>());
//!
//! stage.shutdown();
//! ```

mod behavior;
mod catalog;
mod command;
mod object;
mod state;

use std::marker::PhantomData;
use std::sync::Arc;

use crate::singleton::registry::Singletons;
use crate::singleton::{CreationConfig, CreationMode, Singleton};

use object::{Record, Roster};

pub use behavior::Behavior;
pub use catalog::Catalog;
pub use command::{Command, Commands};
pub use object::{Generation, ObjectId, Visibility};
pub use state::State;

/// The host runtime every object and singleton lives on.
///
/// A stage is single-threaded by construction; see the note at the bottom of
/// this module. Other threads interact with it through a [`Commands`] handle
/// or by populating the shared [`Catalog`].
pub struct Stage {
    /// Slot arena of live objects.
    roster: Roster,

    /// Cached singleton instances, keyed by type.
    singletons: Singletons,

    /// Prefab factories consulted by the resource creation strategy.
    catalog: Arc<Catalog>,

    /// Deferred operations, drained by [`update`](Stage::update).
    commands: Commands,

    /// Name of the current scene.
    scene: String,

    /// Lifecycle state.
    state: State,

    /// See the `!Send` note at the bottom of this module.
    _not_send: PhantomData<*mut ()>,
}

impl Stage {
    /// Create a stage with an empty catalog.
    pub fn new() -> Self {
        Self::with_catalog(Arc::new(Catalog::new()))
    }

    /// Create a stage sharing an existing prefab catalog.
    pub fn with_catalog(catalog: Arc<Catalog>) -> Self {
        Self {
            roster: Roster::new(),
            singletons: Singletons::new(),
            catalog,
            commands: Commands::new(),
            scene: String::from("main"),
            state: State::Running,
            _not_send: PhantomData,
        }
    }

    /// Current lifecycle state.
    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    /// Name of the current scene.
    #[inline]
    pub fn scene(&self) -> &str {
        &self.scene
    }

    /// The shared prefab catalog.
    #[inline]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// A cloneable handle for submitting deferred commands.
    #[inline]
    pub fn commands(&self) -> Commands {
        self.commands.clone()
    }

    /// Number of currently live objects.
    #[inline]
    pub fn live_count(&self) -> usize {
        self.roster.live_count()
    }

    /// Whether the handle still refers to a live object.
    #[inline]
    pub fn is_alive(&self, id: ObjectId) -> bool {
        self.roster.is_alive(id)
    }

    // ==================== Objects ====================

    /// Spawn a blank named object and return its handle.
    ///
    /// # Panics
    ///
    /// Panics if shutdown has begun. Spawning on a closing stage is a
    /// programmer error, unlike the destroy/access paths which degrade to
    /// no-ops.
    pub fn spawn(&mut self, name: impl Into<String>) -> ObjectId {
        assert!(
            self.state.is_live(),
            "cannot spawn on a {:?} stage",
            self.state
        );
        let name = name.into();
        log::debug!("object `{name}` spawned");
        self.roster.alloc(Record::new(name))
    }

    /// Spawn an object carrying [`Behavior`] logic.
    ///
    /// The behavior's `on_start` runs synchronously before this returns, with
    /// full access to the stage. A behavior that destroys its own object from
    /// `on_start` never joins the roster; its `on_destroy` still runs, with
    /// the handle already stale.
    ///
    /// # Panics
    ///
    /// Panics if shutdown has begun, as for [`spawn`](Stage::spawn).
    pub fn spawn_behavior<B: Behavior>(&mut self, name: impl Into<String>, behavior: B) -> ObjectId {
        let id = self.spawn(name);
        let mut behavior: Box<dyn Behavior> = Box::new(behavior);
        behavior.on_start(self, id);
        match self.roster.get_mut(id) {
            Some(record) => record.behavior = Some(behavior),
            None => behavior.on_destroy(self, id),
        }
        id
    }

    /// Destroy the object behind the handle, running the full teardown path.
    ///
    /// The attached behavior's `on_destroy` runs first, while the object is
    /// still alive and readable. If the object anchors a singleton, the
    /// instance is deinitialized and uncached. The slot is freed last. Dead
    /// or stale handles are a no-op.
    pub fn destroy(&mut self, id: ObjectId) {
        let Some(record) = self.roster.get_mut(id) else {
            return;
        };
        // Take the behavior out before the hook runs so a re-entrant destroy
        // from inside it cannot fire the hook twice.
        if let Some(mut behavior) = record.behavior.take() {
            behavior.on_destroy(self, id);
        }
        // The hook may have destroyed its own object already.
        if !self.roster.is_alive(id) {
            return;
        }
        let deinitialized = self.singletons.notify_destroying(id);
        if let Some(record) = self.roster.free(id) {
            if deinitialized {
                log::info!("singleton `{}` deinitialized", record.name);
            } else {
                log::debug!("object `{}` destroyed", record.name);
            }
        }
    }

    /// The diagnostic name of a live object.
    pub fn name_of(&self, id: ObjectId) -> Option<&str> {
        self.roster.get(id).map(|record| record.name.as_str())
    }

    /// Store visibility flags on a live object.
    ///
    /// Returns `false` for dead or stale handles. The stage never interprets
    /// the flags; see [`Visibility`].
    pub fn set_visibility(&mut self, id: ObjectId, visibility: Visibility) -> bool {
        match self.roster.get_mut(id) {
            Some(record) => {
                record.visibility = visibility;
                true
            }
            None => false,
        }
    }

    /// The visibility flags of a live object.
    pub fn visibility_of(&self, id: ObjectId) -> Option<Visibility> {
        self.roster.get(id).map(|record| record.visibility)
    }

    /// Mark whether a live object survives scene transitions.
    ///
    /// Returns `false` for dead or stale handles. Persistence does not save
    /// an object from [`shutdown`](Stage::shutdown).
    pub fn set_persistent(&mut self, id: ObjectId, persistent: bool) -> bool {
        match self.roster.get_mut(id) {
            Some(record) => {
                record.persistent = persistent;
                true
            }
            None => false,
        }
    }

    /// Whether a live object survives scene transitions.
    pub fn is_persistent(&self, id: ObjectId) -> Option<bool> {
        self.roster.get(id).map(|record| record.persistent)
    }

    // ==================== Scenes ====================

    /// Replace the current scene.
    ///
    /// Every non-persistent live object is destroyed through the full
    /// teardown path, behavior hooks and singleton deinitialization
    /// included; persistent objects carry over. Objects spawned from inside
    /// a destroy hook during the sweep join the incoming scene. Ignored once
    /// shutdown has begun.
    pub fn load_scene(&mut self, name: impl Into<String>) {
        if self.state.is_closing() {
            log::debug!("scene change ignored on a {:?} stage", self.state);
            return;
        }
        let name = name.into();
        log::info!("loading scene `{name}` (leaving `{}`)", self.scene);
        let victims: Vec<ObjectId> = self
            .roster
            .live()
            .filter(|(_, record)| !record.persistent)
            .map(|(id, _)| id)
            .collect();
        for id in victims {
            self.destroy(id);
        }
        self.scene = name;
    }

    // ==================== Deferred Commands ====================

    /// Apply every queued deferred command in submission order.
    ///
    /// Commands pushed while the batch is being applied, including from
    /// behavior hooks, wait for the next call.
    pub fn update(&mut self) {
        for command in self.commands.drain() {
            match command {
                Command::Destroy(id) => self.destroy(id),
                Command::LoadScene(name) => self.load_scene(name),
                Command::Shutdown => self.shutdown(),
            }
        }
    }

    // ==================== Shutdown ====================

    /// Tear the stage down, destroying every remaining object.
    ///
    /// Persistence is a scene-transition property and does not apply here;
    /// everything dies, with the usual hooks. While the sweep runs the state
    /// is `Stopping`, which refuses new singleton creation, and afterwards
    /// it is `Stopped` for good. Calling this again is a no-op.
    pub fn shutdown(&mut self) {
        if self.state.is_closing() {
            return;
        }
        self.state = State::Stopping;
        log::info!(
            "stage shutting down with {} live object(s)",
            self.roster.live_count()
        );
        if !self.singletons.is_empty() {
            log::debug!(
                "{} cached singleton(s) deinitialize with their anchors",
                self.singletons.len()
            );
        }
        let victims: Vec<ObjectId> = self.roster.live().map(|(id, _)| id).collect();
        for id in victims {
            self.destroy(id);
        }
        self.state = State::Stopped;
        log::info!("stage stopped");
    }

    // ==================== Singletons ====================

    /// Resolve the one live instance of `S`, creating it on first access.
    ///
    /// When nothing is cached, the creation strategies allowed by
    /// [`S::creation()`](Singleton::creation) run in declared order: the
    /// resource strategy instantiates the declared catalog path, fresh
    /// creation falls back to `S::default()`. Failed strategies are skipped,
    /// not errors.
    ///
    /// Returns `None` when no allowed strategy produced an instance, or when
    /// the stage is shutting down; absence is a valid outcome the caller is
    /// expected to tolerate.
    pub fn singleton<S: Singleton>(&mut self) -> Option<&S> {
        self.ensure_singleton::<S>()?;
        self.singletons.get::<S>()
    }

    /// Resolve the one live instance of `S` mutably, creating it on first
    /// access. Same semantics as [`singleton`](Stage::singleton).
    pub fn singleton_mut<S: Singleton>(&mut self) -> Option<&mut S> {
        self.ensure_singleton::<S>()?;
        self.singletons.get_mut::<S>()
    }

    /// The cached instance of `S`, never creating one.
    pub fn peek_singleton<S: Singleton>(&self) -> Option<&S> {
        let anchor = self.singletons.object_of::<S>()?;
        if !self.roster.is_alive(anchor) {
            return None;
        }
        self.singletons.get::<S>()
    }

    /// `true` if a live instance of `S` is currently cached.
    pub fn has_singleton<S: Singleton>(&self) -> bool {
        self.peek_singleton::<S>().is_some()
    }

    /// The anchor object of the cached instance of `S`, if one is live.
    ///
    /// Destroying this object retires the instance; the next access starts
    /// a fresh cycle.
    pub fn singleton_object<S: Singleton>(&self) -> Option<ObjectId> {
        let anchor = self.singletons.object_of::<S>()?;
        self.roster.is_alive(anchor).then_some(anchor)
    }

    /// Create-or-fetch driver shared by the typed accessors. Returns
    /// `Some(())` when a live instance is cached on return.
    fn ensure_singleton<S: Singleton>(&mut self) -> Option<()> {
        let ty = std::any::type_name::<S>();

        // Cached and still anchored to a live object.
        if let Some(anchor) = self.singletons.object_of::<S>() {
            if self.roster.is_alive(anchor) {
                return Some(());
            }
            // The anchor died without a destroy notification, so the
            // instance is already unreachable as far as callers are
            // concerned. Drop the stale entry without hooks and recreate.
            log::warn!("singleton `{ty}` lost anchor {anchor:?}, discarding stale instance");
            self.singletons.discard::<S>();
        }

        // Creation is refused once shutdown has begun.
        if self.state.is_closing() {
            log::debug!("singleton `{ty}` not created on a {:?} stage", self.state);
            return None;
        }

        let config = S::creation();
        let mut instance = self.create_instance::<S>(&config, ty)?;

        // The anchor object carries the declared name, visibility and
        // persistence; the instance itself lives in the registry.
        let anchor = self.spawn(config.name());
        self.set_visibility(anchor, config.visibility());
        self.set_persistent(anchor, config.is_persistent());

        instance.on_initialize();
        debug_assert!(
            !self.singletons.contains::<S>(),
            "singleton `{ty}` cached twice"
        );
        self.singletons.insert(anchor, instance);
        log::info!("singleton `{ty}` live as `{}` {anchor:?}", config.name());
        Some(())
    }

    /// Run the allowed creation strategies in their declared order.
    fn create_instance<S: Singleton>(&self, config: &CreationConfig, ty: &str) -> Option<S> {
        for mode in config.order().sequence() {
            if !config.modes().contains(mode) {
                continue;
            }
            if mode == CreationMode::LOAD_RESOURCE {
                if let Some(instance) = self.instance_from_catalog::<S>(config, ty) {
                    return Some(instance);
                }
            } else {
                // Fresh creation cannot fail.
                return Some(S::default());
            }
        }
        log::debug!("no allowed strategy produced an instance of `{ty}`");
        None
    }

    /// Resource strategy: instantiate the declared catalog path and downcast
    /// the payload.
    fn instance_from_catalog<S: Singleton>(&self, config: &CreationConfig, ty: &str) -> Option<S> {
        let Some(path) = config.resource() else {
            log::debug!("singleton `{ty}` allows resource creation but declares no path");
            return None;
        };
        let Some(payload) = self.catalog.instantiate(path) else {
            log::debug!("resource `{path}` for singleton `{ty}` is not in the catalog");
            return None;
        };
        match payload.downcast::<S>() {
            Ok(instance) => Some(*instance),
            Err(_) => {
                log::warn!("resource `{path}` is not a `{ty}`, trying the next strategy");
                None
            }
        }
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Stage {
    fn drop(&mut self) {
        // Teardown hooks must fire even when the owner never called shutdown.
        if self.state.is_live() {
            self.shutdown();
        }
    }
}

// Stage is intentionally !Send and !Sync: behavior hooks and singleton
// lifecycle hooks run synchronously on the owning thread, which is what
// keeps the create-or-fetch sequence atomic without locks. The _not_send
// marker enforces this at compile time; cross-thread code holds a Commands
// handle or the shared Catalog instead.
