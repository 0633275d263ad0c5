//! Singleton components: one live instance per type per stage.
//!
//! This module provides the [`Singleton`] trait and the declaration types a
//! singleton carries. A singleton is an ordinary value type that opts into
//! the one-instance guarantee: the stage creates it lazily on first access,
//! anchors it to a dedicated object, runs its lifecycle hooks exactly once
//! each, and hands out references for as long as the anchor lives.
//!
//! # Declaring a singleton
//!
//! Every singleton supplies a [`CreationConfig`] describing how the stage
//! should produce the instance. Types with custom hooks implement the trait
//! by hand:
//!
//! ```rust,ignore
//! #[derive(Default)]
//! struct Audio { volume: f32 }
//!
//! impl Singleton for Audio {
//!     fn creation() -> CreationConfig {
//!         CreationConfig::new("audio")
//!             .with_modes(CreationMode::CREATE_NEW | CreationMode::LOAD_RESOURCE)
//!             .from_resource("singletons/audio")
//!             .persist()
//!     }
//!
//!     fn on_initialize(&mut self) {
//!         log::info!("audio up");
//!     }
//! }
//! ```
//!
//! Types that only need the declaration can derive it; the hooks stay
//! default no-ops:
//!
//! ```rust,ignore
//! #[derive(Default, solo_macros::Singleton)]
//! #[singleton(name = "score", persist)]
//! struct Score(u32);
//! ```
//!
//! # Creation strategies
//!
//! The declaration names a set of allowed strategies and the order to try
//! them in. Loading from the [`Catalog`](crate::stage::Catalog) yields a
//! pre-configured value; fresh creation falls back to `Default`. A strategy
//! that fails (catalog miss, wrong payload type) simply passes the attempt to
//! the next allowed one, and if none succeeds the accessor reports absence
//! rather than an error.

pub(crate) mod registry;

use bitflags::bitflags;

use crate::stage::Visibility;

bitflags! {
    /// The set of creation strategies a singleton permits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CreationMode: u8 {
        /// Create a fresh instance via `Default`.
        const CREATE_NEW = 1 << 0;
        /// Instantiate a pre-configured value from the catalog.
        const LOAD_RESOURCE = 1 << 1;
    }
}

/// The order in which allowed creation strategies are attempted.
///
/// The preference is part of the declaration rather than baked into the
/// accessor, so a type allowing both modes can choose whether the authored
/// resource or a blank default wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyOrder {
    /// Try the catalog first, fall back to fresh creation.
    #[default]
    ResourceFirst,
    /// Create fresh first, only consult the catalog if `Default` is not an
    /// allowed mode.
    CreateFirst,
}

impl StrategyOrder {
    /// The strategies in preference order. Modes missing from the declared
    /// set are skipped at creation time.
    pub const fn sequence(self) -> [CreationMode; 2] {
        match self {
            StrategyOrder::ResourceFirst => {
                [CreationMode::LOAD_RESOURCE, CreationMode::CREATE_NEW]
            }
            StrategyOrder::CreateFirst => [CreationMode::CREATE_NEW, CreationMode::LOAD_RESOURCE],
        }
    }
}

/// The per-type creation declaration.
///
/// Read once, when the stage first creates an instance of the declaring type;
/// it is a pure function of the type and never consulted again while the
/// instance lives. All builder methods are `const fn`, so a declaration can
/// also live in a `const`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreationConfig {
    /// Diagnostic name assigned to the anchor object.
    name: &'static str,

    /// Allowed creation strategies.
    modes: CreationMode,

    /// Preference order over the allowed strategies.
    order: StrategyOrder,

    /// Whether the anchor object survives scene transitions.
    persistent: bool,

    /// Visibility flags stored on the anchor object.
    visibility: Visibility,

    /// Catalog path consulted by the resource strategy.
    resource: Option<&'static str>,
}

impl CreationConfig {
    /// Start a declaration: fresh creation only, resource-first order, not
    /// persistent, no visibility flags, no resource path.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            modes: CreationMode::CREATE_NEW,
            order: StrategyOrder::ResourceFirst,
            persistent: false,
            visibility: Visibility::empty(),
            resource: None,
        }
    }

    /// Replace the set of allowed creation strategies.
    pub const fn with_modes(mut self, modes: CreationMode) -> Self {
        self.modes = modes;
        self
    }

    /// Set the strategy preference order.
    pub const fn with_order(mut self, order: StrategyOrder) -> Self {
        self.order = order;
        self
    }

    /// Request that the anchor object survive scene transitions.
    pub const fn persist(mut self) -> Self {
        self.persistent = true;
        self
    }

    /// Set the visibility flags stored on the anchor object.
    pub const fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Declare the catalog path for the resource strategy.
    ///
    /// Declaring a path without allowing the resource mode is always a
    /// mistake, so this also adds `LOAD_RESOURCE` to the allowed set.
    pub const fn from_resource(mut self, path: &'static str) -> Self {
        self.resource = Some(path);
        self.modes = self.modes.union(CreationMode::LOAD_RESOURCE);
        self
    }

    /// The diagnostic name for the anchor object.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The allowed creation strategies.
    #[inline]
    pub const fn modes(&self) -> CreationMode {
        self.modes
    }

    /// The strategy preference order.
    #[inline]
    pub const fn order(&self) -> StrategyOrder {
        self.order
    }

    /// Whether the anchor object survives scene transitions.
    #[inline]
    pub const fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// The visibility flags stored on the anchor object.
    #[inline]
    pub const fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// The catalog path for the resource strategy, if declared.
    #[inline]
    pub const fn resource(&self) -> Option<&'static str> {
        self.resource
    }
}

/// A type holding the one-instance-per-stage guarantee.
///
/// The stage owns the cached instance together with the anchor object it is
/// bound to; consumers only ever resolve "the current instance" through the
/// stage and never construct one directly.
///
/// # Lifecycle hooks
///
/// [`on_initialize`](Self::on_initialize) runs exactly once per instance,
/// after the anchor object is configured and before the instance becomes
/// reachable through the stage. [`on_deinitialize`](Self::on_deinitialize)
/// runs exactly once, while the anchor is being destroyed and before the
/// cache entry is cleared. A destroy-then-access cycle produces a fresh
/// instance with a fresh pair of hook calls.
///
/// # Trait Bounds
///
/// - `Default`: backs the fresh-creation strategy. A resource-only type still
///   carries a `Default`; it is simply never called.
/// - `Send + Sync + 'static`: instances may originate from the shared
///   catalog.
pub trait Singleton: Default + Send + Sync + 'static {
    /// The creation declaration for this type.
    fn creation() -> CreationConfig;

    /// Called exactly once, right after the instance is created and anchored.
    fn on_initialize(&mut self) {}

    /// Called exactly once, while the instance is being torn down.
    fn on_deinitialize(&mut self) {}
}
