// SPDX-FileCopyrightText: 2026 Plexus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability index: a disposable view over a singleton registry's instances.
//!
//! Services that look instances up by what they can do (rather than by class)
//! query the index. It caches the instance list together with the registry
//! generation it was built from and rebuilds from the live registry whenever
//! the generation has moved on, so removed plugins stop matching immediately
//! and no incremental bookkeeping is needed.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use plexus_core::Kind;
use tracing::trace;

use crate::descriptor::PluginDescriptor;
use crate::singleton::SingletonRegistry;

/// One instance as seen by the index.
pub struct IndexedInstance<C: ?Sized> {
    pub descriptor: PluginDescriptor,
    pub instance: Arc<C>,
}

impl<C: ?Sized> Clone for IndexedInstance<C> {
    fn clone(&self) -> Self {
        Self {
            descriptor: self.descriptor.clone(),
            instance: self.instance.clone(),
        }
    }
}

struct IndexSnapshot<C: ?Sized> {
    generation: u64,
    members: Vec<IndexedInstance<C>>,
}

/// Derived lookup over the current instances of a [`SingletonRegistry`].
pub struct CapabilityIndex<C: ?Sized + Kind + Send + Sync> {
    registry: Arc<SingletonRegistry<C>>,
    cache: ArcSwapOption<IndexSnapshot<C>>,
}

impl<C: ?Sized + Kind + Send + Sync> CapabilityIndex<C> {
    pub fn new(registry: Arc<SingletonRegistry<C>>) -> Self {
        Self {
            registry,
            cache: ArcSwapOption::empty(),
        }
    }

    pub fn registry(&self) -> &Arc<SingletonRegistry<C>> {
        &self.registry
    }

    /// Current instances in registration order.
    pub fn current_instances(&self) -> Vec<Arc<C>> {
        self.snapshot()
            .members
            .iter()
            .map(|m| m.instance.clone())
            .collect()
    }

    /// Current members including their descriptors.
    pub fn members(&self) -> Vec<IndexedInstance<C>> {
        self.snapshot().members.clone()
    }

    /// Instances accepted by `predicate`, in registration order.
    pub fn matching<F>(&self, predicate: F) -> Vec<Arc<C>>
    where
        F: Fn(&C) -> bool,
    {
        self.snapshot()
            .members
            .iter()
            .filter(|m| predicate(m.instance.as_ref()))
            .map(|m| m.instance.clone())
            .collect()
    }

    /// The first instance accepted by `predicate`.
    pub fn first_matching<F>(&self, predicate: F) -> Option<Arc<C>>
    where
        F: Fn(&C) -> bool,
    {
        self.snapshot()
            .members
            .iter()
            .find(|m| predicate(m.instance.as_ref()))
            .map(|m| m.instance.clone())
    }

    /// Drop the cached view; the next query rebuilds it.
    pub fn invalidate(&self) {
        self.cache.store(None);
    }

    fn snapshot(&self) -> Arc<IndexSnapshot<C>> {
        let live = self.registry.generation();
        if let Some(cached) = self.cache.load_full()
            && cached.generation == live
        {
            return cached;
        }

        let (generation, instances) = self.registry.collect();
        let members = instances
            .into_iter()
            .map(|(descriptor, instance)| IndexedInstance {
                descriptor,
                instance,
            })
            .collect::<Vec<_>>();
        trace!(
            capability = %self.registry.capability(),
            generation,
            members = members.len(),
            "capability index rebuilt"
        );
        let snapshot = Arc::new(IndexSnapshot {
            generation,
            members,
        });
        self.cache.store(Some(snapshot.clone()));
        snapshot
    }
}

impl<C: ?Sized + Kind + Send + Sync> std::fmt::Debug for CapabilityIndex<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityIndex")
            .field("capability", &self.registry.capability())
            .field(
                "cached_generation",
                &self.cache.load_full().map(|s| s.generation),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin_descriptor;
    use plexus_core::{PlexusError, TypeKey};
    use std::sync::atomic::{AtomicUsize, Ordering};

    trait Unit: Send + Sync {
        fn symbol(&self) -> &'static str;
    }
    impl Kind for dyn Unit {}

    #[derive(Default)]
    struct Metre;
    impl Kind for Metre {}
    impl Unit for Metre {
        fn symbol(&self) -> &'static str {
            "m"
        }
    }

    #[derive(Default)]
    struct Second;
    impl Kind for Second {}
    impl Unit for Second {
        fn symbol(&self) -> &'static str {
            "s"
        }
    }

    fn index() -> CapabilityIndex<dyn Unit> {
        let registry = Arc::new(SingletonRegistry::<dyn Unit>::detached());
        registry.add(plugin_descriptor!(Metre => dyn Unit));
        registry.add(plugin_descriptor!(Second => dyn Unit));
        CapabilityIndex::new(registry)
    }

    #[test]
    fn matching_filters_current_instances() {
        let index = index();
        let seconds = index.matching(|u| u.symbol() == "s");
        assert_eq!(seconds.len(), 1);
        assert_eq!(index.current_instances().len(), 2);
    }

    #[test]
    fn removal_is_visible_on_next_query() {
        let index = index();
        assert!(index.first_matching(|u| u.symbol() == "m").is_some());

        index.registry().remove(&plugin_descriptor!(Metre => dyn Unit));
        assert!(index.first_matching(|u| u.symbol() == "m").is_none());
    }

    #[test]
    fn replacement_is_visible_on_next_query() {
        let index = index();
        let before = index.first_matching(|u| u.symbol() == "m").unwrap();

        index.registry().add(plugin_descriptor!(Metre => dyn Unit));
        let after = index.first_matching(|u| u.symbol() == "m").unwrap();

        assert!(!Arc::ptr_eq(&before, &after));
        let members = index.members();
        assert_eq!(members.last().unwrap().descriptor.plugin_class(), TypeKey::of::<Metre>());
    }

    #[test]
    fn cache_is_reused_while_generation_is_unchanged() {
        let index = index();
        let first = index.current_instances();
        let second = index.current_instances();
        assert!(first.iter().zip(&second).all(|(a, b)| Arc::ptr_eq(a, b)));

        index.invalidate();
        let third = index.current_instances();
        assert!(first.iter().zip(&third).all(|(a, b)| Arc::ptr_eq(a, b)));
    }

    #[derive(Default)]
    struct Kelvin;
    impl Kind for Kelvin {}
    impl Unit for Kelvin {
        fn symbol(&self) -> &'static str {
            "K"
        }
    }

    #[test]
    fn matching_returns_every_accepted_instance_in_registration_order() {
        let index = index();
        index.registry().add(plugin_descriptor!(Kelvin => dyn Unit));

        let symbols: Vec<&str> = index
            .matching(|u| u.symbol() != "s")
            .iter()
            .map(|u| u.symbol())
            .collect();
        assert_eq!(symbols, vec!["m", "K"]);
        assert!(index.matching(|_| false).is_empty());
    }

    #[test]
    fn invalidate_rebuilds_without_a_generation_change() {
        static ATTEMPTS: AtomicUsize = AtomicUsize::new(0);
        let registry = Arc::new(SingletonRegistry::<dyn Unit>::detached());
        registry.add(PluginDescriptor::new::<Kelvin, dyn Unit, _>(|| {
            if ATTEMPTS.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(PlexusError::instantiation("Kelvin", "sensor warming up"))
            } else {
                Ok(Arc::new(Kelvin) as Arc<dyn Unit>)
            }
        }));
        let index = CapabilityIndex::new(registry);
        let generation = index.registry().generation();

        assert!(index.current_instances().is_empty());
        assert!(index.current_instances().is_empty());
        assert_eq!(ATTEMPTS.load(Ordering::SeqCst), 1);

        index.invalidate();
        assert_eq!(index.current_instances().len(), 1);
        assert_eq!(index.members()[0].descriptor.plugin_class(), TypeKey::of::<Kelvin>());
        assert_eq!(index.registry().generation(), generation);
    }
}
