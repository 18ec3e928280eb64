// SPDX-FileCopyrightText: 2026 Plexus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The plugin service: authoritative index of every known plugin descriptor.
//!
//! The service is populated once from its descriptor sources, accepts manual
//! additions and removals afterwards, and publishes every change on its
//! [`PluginFeed`]. Each update and its publication happen under one ordering
//! lock, so subscribers observe events in the order the index changed. The
//! index itself is unlocked while listeners run, so they may read the service.

use std::sync::{Mutex, MutexGuard, PoisonError, Weak};

use indexmap::IndexMap;
use plexus_core::{Kind, TypeKey};
use tracing::{debug, info};

use crate::descriptor::PluginDescriptor;
use crate::discovery::{DescriptorSource, collect_from};
use crate::feed::{PluginEvent, PluginFeed, PluginListener, Subscription};

/// Index key: plugin class plus capability.
type PluginKey = (TypeKey, TypeKey);

fn key_of(descriptor: &PluginDescriptor) -> PluginKey {
    (descriptor.plugin_class(), descriptor.capability())
}

/// Registry of plugin descriptors across all capabilities.
#[derive(Default)]
pub struct PluginService {
    index: Mutex<IndexMap<PluginKey, PluginDescriptor>>,
    /// Serializes change-and-publish sequences and listener attachment.
    ordering: Mutex<()>,
    feed: PluginFeed,
}

impl PluginService {
    /// Create an empty service with no discovered plugins.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a service populated from `sources`, skipping plugins whose
    /// name or class name is listed in `disabled`.
    pub fn from_sources<'a, I>(sources: I, disabled: &[String]) -> Self
    where
        I: IntoIterator<Item = &'a dyn DescriptorSource>,
    {
        let service = Self::new();
        {
            let mut index = service.lock();
            for source in sources {
                let mut accepted = 0usize;
                for descriptor in collect_from(source) {
                    if is_disabled(&descriptor, disabled) {
                        debug!(plugin = descriptor.name(), source = source.name(), "plugin disabled by configuration");
                        continue;
                    }
                    insert(&mut index, descriptor);
                    accepted += 1;
                }
                debug!(source = source.name(), count = accepted, "descriptor source merged");
            }
            info!(count = index.len(), "plugin service initialized");
        }
        service
    }

    pub fn feed(&self) -> &PluginFeed {
        &self.feed
    }

    /// Register one plugin, replacing any previous registration of its class.
    pub fn add_plugin(&self, descriptor: PluginDescriptor) {
        self.add_plugins(vec![descriptor]);
    }

    /// Register a batch and publish it as a single `PluginsAdded` event.
    pub fn add_plugins(&self, descriptors: Vec<PluginDescriptor>) {
        if descriptors.is_empty() {
            return;
        }
        let _ordering = self.lock_ordering();
        {
            let mut index = self.lock();
            for descriptor in &descriptors {
                debug!(plugin = descriptor.name(), capability = %descriptor.capability(), "adding plugin");
                insert(&mut index, descriptor.clone());
            }
        }
        self.feed.publish(&PluginEvent::Added(descriptors));
    }

    /// Deregister one plugin. Unknown plugins are ignored.
    pub fn remove_plugin(&self, descriptor: &PluginDescriptor) {
        self.remove_plugins(std::slice::from_ref(descriptor));
    }

    /// Deregister a batch and publish the descriptors that were actually known.
    pub fn remove_plugins(&self, descriptors: &[PluginDescriptor]) {
        let _ordering = self.lock_ordering();
        let removed: Vec<PluginDescriptor> = {
            let mut index = self.lock();
            descriptors
                .iter()
                .filter_map(|d| index.shift_remove(&key_of(d)))
                .collect()
        };
        if removed.is_empty() {
            debug!(requested = descriptors.len(), "remove request matched no plugins");
            return;
        }
        for descriptor in &removed {
            debug!(plugin = descriptor.name(), capability = %descriptor.capability(), "removed plugin");
        }
        self.feed.publish(&PluginEvent::Removed(removed));
    }

    /// Look up the descriptor registered for `plugin_class`.
    pub fn get_plugin(&self, plugin_class: &TypeKey) -> Option<PluginDescriptor> {
        self.lock()
            .values()
            .find(|d| d.plugin_class() == *plugin_class)
            .cloned()
    }

    pub fn get_plugin_of<P: Kind>(&self) -> Option<PluginDescriptor> {
        self.get_plugin(&TypeKey::of::<P>())
    }

    /// Every descriptor in registration order.
    pub fn plugins(&self) -> Vec<PluginDescriptor> {
        self.lock().values().cloned().collect()
    }

    /// Descriptors providing `capability`, in registration order.
    pub fn plugins_of(&self, capability: &TypeKey) -> Vec<PluginDescriptor> {
        self.lock()
            .values()
            .filter(|d| d.capability() == *capability)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Subscribe `listener` and hand it the current descriptors atomically.
    ///
    /// `seed` runs before any event published after the snapshot, so the
    /// listener never misses or reorders a change.
    pub fn attach<F>(&self, listener: Weak<dyn PluginListener>, seed: F) -> Subscription
    where
        F: FnOnce(&[PluginDescriptor]),
    {
        let _ordering = self.lock_ordering();
        let current = self.plugins();
        seed(&current);
        self.feed.subscribe(listener)
    }

    fn lock(&self) -> MutexGuard<'_, IndexMap<PluginKey, PluginDescriptor>> {
        self.index.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_ordering(&self) -> MutexGuard<'_, ()> {
        self.ordering.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Latest registration wins and moves to the end of the order.
fn insert(index: &mut IndexMap<PluginKey, PluginDescriptor>, descriptor: PluginDescriptor) {
    let key = key_of(&descriptor);
    index.shift_remove(&key);
    index.insert(key, descriptor);
}

fn is_disabled(descriptor: &PluginDescriptor, disabled: &[String]) -> bool {
    disabled
        .iter()
        .any(|name| name == descriptor.name() || name == descriptor.plugin_class().name())
}

impl std::fmt::Debug for PluginService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginService")
            .field("plugins", &self.len())
            .field("subscribers", &self.feed.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::PluginOrigin;
    use crate::discovery::StaticSource;
    use crate::plugin_descriptor;
    use std::sync::Arc;

    trait Codec: Send + Sync {}
    impl Kind for dyn Codec {}

    trait Filter: Send + Sync {}
    impl Kind for dyn Filter {}

    #[derive(Default)]
    struct Gzip;
    impl Kind for Gzip {}
    impl Codec for Gzip {}

    #[derive(Default)]
    struct Zstd;
    impl Kind for Zstd {}
    impl Codec for Zstd {}

    #[derive(Default)]
    struct Blur;
    impl Kind for Blur {}
    impl Filter for Blur {}

    #[derive(Default)]
    struct Counter {
        added: Mutex<usize>,
        removed: Mutex<usize>,
    }

    impl PluginListener for Counter {
        fn on_plugins_added(&self, d: &[PluginDescriptor]) {
            *self.added.lock().unwrap() += d.len();
        }

        fn on_plugins_removed(&self, d: &[PluginDescriptor]) {
            *self.removed.lock().unwrap() += d.len();
        }
    }

    /// Records the service size it observes from inside each notification.
    struct SizeWatcher {
        service: Weak<PluginService>,
        sizes: Mutex<Vec<usize>>,
    }

    impl SizeWatcher {
        fn record(&self) {
            if let Some(service) = self.service.upgrade() {
                let len = service.len();
                assert_eq!(service.plugins().len(), len);
                self.sizes.lock().unwrap().push(len);
            }
        }
    }

    impl PluginListener for SizeWatcher {
        fn on_plugins_added(&self, _: &[PluginDescriptor]) {
            self.record();
        }

        fn on_plugins_removed(&self, _: &[PluginDescriptor]) {
            self.record();
        }
    }

    #[test]
    fn sources_are_merged_with_origin() {
        let source = StaticSource::new(
            "builtin",
            vec![plugin_descriptor!(Gzip => dyn Codec), plugin_descriptor!(Blur => dyn Filter)],
        );
        let service = PluginService::from_sources([&source as &dyn DescriptorSource], &[]);

        assert_eq!(service.len(), 2);
        let gzip = service.get_plugin_of::<Gzip>().unwrap();
        assert_eq!(gzip.origin(), &PluginOrigin::Discovered("builtin".into()));
        assert_eq!(service.plugins_of(&TypeKey::of::<dyn Codec>()).len(), 1);
    }

    #[test]
    fn disabled_plugins_are_skipped() {
        let source = StaticSource::new(
            "builtin",
            vec![plugin_descriptor!(Gzip => dyn Codec), plugin_descriptor!(Zstd => dyn Codec)],
        );
        let service =
            PluginService::from_sources([&source as &dyn DescriptorSource], &["Zstd".to_string()]);

        assert!(service.get_plugin_of::<Gzip>().is_some());
        assert!(service.get_plugin_of::<Zstd>().is_none());
    }

    #[test]
    fn re_adding_moves_plugin_to_end() {
        let service = PluginService::new();
        service.add_plugin(plugin_descriptor!(Gzip => dyn Codec));
        service.add_plugin(plugin_descriptor!(Zstd => dyn Codec));
        service.add_plugin(plugin_descriptor!(Gzip => dyn Codec));

        let names: Vec<String> = service.plugins().iter().map(|d| d.name().to_string()).collect();
        assert_eq!(names, vec!["Zstd", "Gzip"]);
    }

    #[test]
    fn removing_unknown_plugin_publishes_nothing() {
        let service = PluginService::new();
        let counter = Arc::new(Counter::default());
        let weak: Weak<Counter> = Arc::downgrade(&counter);
        let _sub = service.attach(weak, |_| {});

        let gzip = plugin_descriptor!(Gzip => dyn Codec);
        service.remove_plugin(&gzip);
        service.add_plugin(gzip.clone());
        service.remove_plugin(&gzip);
        service.remove_plugin(&gzip);

        assert_eq!(*counter.added.lock().unwrap(), 1);
        assert_eq!(*counter.removed.lock().unwrap(), 1);
        assert!(service.is_empty());
    }

    #[test]
    fn attach_seeds_with_current_plugins() {
        let service = PluginService::new();
        service.add_plugin(plugin_descriptor!(Blur => dyn Filter));

        let counter = Arc::new(Counter::default());
        let weak: Weak<Counter> = Arc::downgrade(&counter);
        let mut seeded = Vec::new();
        let _sub = service.attach(weak, |current| seeded.extend_from_slice(current));

        assert_eq!(seeded, vec![plugin_descriptor!(Blur => dyn Filter)]);
        assert_eq!(*counter.added.lock().unwrap(), 0);
        assert_eq!(service.feed().subscriber_count(), 1);
    }

    #[test]
    fn listeners_may_read_the_service_during_notification() {
        let service = Arc::new(PluginService::new());
        let watcher = Arc::new(SizeWatcher {
            service: Arc::downgrade(&service),
            sizes: Mutex::new(Vec::new()),
        });
        let weak: Weak<SizeWatcher> = Arc::downgrade(&watcher);
        let _sub = service.attach(weak, |_| {});

        let gzip = plugin_descriptor!(Gzip => dyn Codec);
        service.add_plugin(gzip.clone());
        service.add_plugin(plugin_descriptor!(Zstd => dyn Codec));
        service.remove_plugin(&gzip);

        assert_eq!(*watcher.sizes.lock().unwrap(), vec![1, 2, 1]);
    }
}
