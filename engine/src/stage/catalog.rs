//! Prefab catalog for resource-driven object creation.
//!
//! This module provides [`Catalog`], a registry mapping resource paths to
//! prefab factories. A factory is a closure producing a pre-configured value;
//! the stage consults the catalog when a singleton declares the
//! resource-loading strategy, and anything else that wants named templates
//! can use it the same way.
//!
//! # Sharing
//!
//! A catalog is typically built once at startup, wrapped in an `Arc` and
//! handed to every stage that should see the same prefabs. Reads are
//! lock-free via `DashMap`; registration takes no `&mut self`, so prefabs can
//! be added after stages are already running.
//!
//! # Example
//!
//! ```rust,ignore
//! let catalog = Arc::new(Catalog::new());
//! catalog.register("singletons/greeter", || Greeter::new("Hello"));
//!
//! let stage = Stage::with_catalog(Arc::clone(&catalog));
//! ```

use std::any::Any;

use dashmap::DashMap;

/// A type-erased prefab factory stored in the catalog.
type Factory = Box<dyn Fn() -> Box<dyn Any + Send + Sync> + Send + Sync>;

/// Registry of prefab factories keyed by resource path.
///
/// Each entry maps a path string to a factory closure. Instantiating a path
/// runs the factory and returns a fresh boxed value; the caller downcasts to
/// the concrete type it expects. Registering a path that already exists
/// replaces the previous factory.
#[derive(Default)]
pub struct Catalog {
    prefabs: DashMap<String, Factory>,
}

impl Catalog {
    /// Create a new, empty catalog.
    #[inline]
    pub fn new() -> Self {
        Self {
            prefabs: DashMap::new(),
        }
    }

    /// Register a prefab factory under a resource path.
    ///
    /// The factory runs once per [`instantiate`](Self::instantiate) call and
    /// must produce a fresh value each time. Re-registering a path replaces
    /// the previous factory.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// catalog.register("enemies/boss", || Boss::with_health(500));
    /// ```
    pub fn register<T, F>(&self, path: impl Into<String>, factory: F)
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.prefabs.insert(
            path.into(),
            Box::new(move || Box::new(factory()) as Box<dyn Any + Send + Sync>),
        );
    }

    /// Instantiate the prefab registered under a path.
    ///
    /// Returns `None` on a catalog miss. The boxed value is type-erased; the
    /// caller downcasts to the type it expects.
    pub fn instantiate(&self, path: &str) -> Option<Box<dyn Any + Send + Sync>> {
        self.prefabs.get(path).map(|factory| factory.value()())
    }

    /// `true` if a factory is registered under the path.
    #[inline]
    pub fn contains(&self, path: &str) -> bool {
        self.prefabs.contains_key(path)
    }

    /// Number of registered prefabs.
    #[inline]
    pub fn len(&self) -> usize {
        self.prefabs.len()
    }

    /// `true` if no prefabs are registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.prefabs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[derive(Debug, PartialEq)]
    struct Prop {
        label: String,
    }

    // ==================== Registration ====================

    #[test]
    fn new_catalog_is_empty() {
        let catalog = Catalog::new();

        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);
        assert!(!catalog.contains("props/crate"));
    }

    #[test]
    fn register_makes_path_available() {
        // Given
        let catalog = Catalog::new();

        // When
        catalog.register("props/crate", || Prop {
            label: "crate".into(),
        });

        // Then
        assert!(catalog.contains("props/crate"));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn reregister_replaces_factory() {
        // Given
        let catalog = Catalog::new();
        catalog.register("props/crate", || Prop {
            label: "old".into(),
        });

        // When
        catalog.register("props/crate", || Prop {
            label: "new".into(),
        });

        // Then - still one entry, new payload wins
        assert_eq!(catalog.len(), 1);
        let boxed = catalog.instantiate("props/crate").unwrap();
        let prop = boxed.downcast::<Prop>().unwrap();
        assert_eq!(prop.label, "new");
    }

    // ==================== Instantiation ====================

    #[test]
    fn instantiate_miss_returns_none() {
        let catalog = Catalog::new();

        assert!(catalog.instantiate("props/missing").is_none());
    }

    #[test]
    fn instantiate_produces_fresh_values() {
        // Given
        let catalog = Catalog::new();
        catalog.register("props/crate", || Prop {
            label: "crate".into(),
        });

        // When - two instantiations
        let first = catalog
            .instantiate("props/crate")
            .unwrap()
            .downcast::<Prop>()
            .unwrap();
        let second = catalog
            .instantiate("props/crate")
            .unwrap()
            .downcast::<Prop>()
            .unwrap();

        // Then - equal payloads, distinct allocations
        assert_eq!(*first, *second);
        assert!(!std::ptr::eq(&*first, &*second));
    }

    #[test]
    fn downcast_to_wrong_type_fails() {
        let catalog = Catalog::new();
        catalog.register("props/crate", || Prop {
            label: "crate".into(),
        });

        let boxed = catalog.instantiate("props/crate").unwrap();

        assert!(boxed.downcast::<String>().is_err());
    }

    // ==================== Sharing ====================

    #[test]
    fn shared_catalog_serves_concurrent_readers() {
        // Given
        let catalog = Arc::new(Catalog::new());
        catalog.register("props/crate", || Prop {
            label: "crate".into(),
        });

        // When - several threads instantiate at once
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let catalog = Arc::clone(&catalog);
                thread::spawn(move || {
                    let boxed = catalog.instantiate("props/crate").unwrap();
                    boxed.downcast::<Prop>().unwrap().label
                })
            })
            .collect();

        // Then
        for handle in handles {
            assert_eq!(handle.join().unwrap(), "crate");
        }
    }

    #[test]
    fn registration_after_sharing_is_visible() {
        // Given
        let catalog = Arc::new(Catalog::new());
        let shared = Arc::clone(&catalog);

        // When - register through one handle after the clone
        catalog.register("props/late", || Prop {
            label: "late".into(),
        });

        // Then
        assert!(shared.contains("props/late"));
    }
}
