// SPDX-FileCopyrightText: 2026 Plexus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Singleton registry: at most one live instance per plugin class.
//!
//! A `SingletonRegistry<C>` tracks every plugin providing capability `C`.
//! Instances are built lazily on first access and kept until the class is
//! registered again (which discards the old instance) or removed.
//!
//! State is published as immutable snapshots through [`ArcSwap`]. Writers
//! (add, remove, feed batches) are serialized by one mutex and swap in a
//! fresh snapshot; readers load the current snapshot without locking and
//! never see a half-applied batch. Lazy construction is serialized per entry,
//! so a factory may itself resolve other singletons of the same registry.

use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, Weak};

use arc_swap::ArcSwap;
use indexmap::IndexMap;
use plexus_core::{Kind, PlexusError, TypeKey};
use tracing::{debug, warn};

use crate::descriptor::PluginDescriptor;
use crate::feed::{PluginListener, Subscription};
use crate::service::PluginService;

/// One registered plugin class and its lazily built instance.
struct InstanceEntry<C: ?Sized> {
    descriptor: PluginDescriptor,
    instance: OnceLock<Arc<C>>,
    /// Held while the factory runs.
    init: Mutex<()>,
}

impl<C: ?Sized> InstanceEntry<C> {
    fn new(descriptor: PluginDescriptor) -> Arc<Self> {
        Arc::new(Self {
            descriptor,
            instance: OnceLock::new(),
            init: Mutex::new(()),
        })
    }
}

struct RegistryState<C: ?Sized> {
    /// Bumped on every committed change to `entries`.
    generation: u64,
    entries: IndexMap<TypeKey, Arc<InstanceEntry<C>>>,
}

impl<C: ?Sized> Clone for RegistryState<C> {
    fn clone(&self) -> Self {
        Self {
            generation: self.generation,
            entries: self.entries.clone(),
        }
    }
}

impl<C: ?Sized> Default for RegistryState<C> {
    fn default() -> Self {
        Self {
            generation: 0,
            entries: IndexMap::new(),
        }
    }
}

/// A planned change to the registry.
enum Change {
    Add(PluginDescriptor),
    Remove(PluginDescriptor),
}

/// Holds exactly one instance per registered plugin class of capability `C`.
pub struct SingletonRegistry<C: ?Sized + Kind + Send + Sync> {
    capability: TypeKey,
    state: ArcSwap<RegistryState<C>>,
    writer: Mutex<()>,
    subscription: OnceLock<Subscription>,
}

impl<C: ?Sized + Kind + Send + Sync> SingletonRegistry<C> {
    /// Create a registry that is not connected to any discovery feed.
    pub fn detached() -> Self {
        Self {
            capability: TypeKey::of::<C>(),
            state: ArcSwap::from_pointee(RegistryState::default()),
            writer: Mutex::new(()),
            subscription: OnceLock::new(),
        }
    }

    /// Create a registry seeded from `service` and subscribed to its feed.
    ///
    /// The subscription lives as long as the registry; dropping the last
    /// `Arc` deregisters it.
    pub fn attach(service: &PluginService) -> Arc<Self> {
        let registry = Arc::new(Self::detached());
        let weak: Weak<Self> = Arc::downgrade(&registry);
        let subscription = service.attach(weak, |current| {
            registry.on_plugins_added(current);
        });
        let _ = registry.subscription.set(subscription);
        debug!(
            capability = %registry.capability,
            count = registry.len(),
            "singleton registry attached"
        );
        registry
    }

    pub fn capability(&self) -> TypeKey {
        self.capability
    }

    /// Whether this registry is subscribed to a discovery feed.
    pub fn is_attached(&self) -> bool {
        self.subscription.get().is_some()
    }

    /// Register `descriptor`, discarding any existing entry for its class.
    pub fn add(&self, descriptor: PluginDescriptor) {
        self.apply(vec![Change::Add(descriptor)]);
    }

    /// Remove the entry for `descriptor`'s class, if any.
    pub fn remove(&self, descriptor: &PluginDescriptor) {
        self.apply(vec![Change::Remove(descriptor.clone())]);
    }

    /// Exact lookup without instantiation.
    pub fn get(&self, plugin_class: &TypeKey) -> Option<PluginDescriptor> {
        self.state
            .load()
            .entries
            .get(plugin_class)
            .map(|e| e.descriptor.clone())
    }

    pub fn contains(&self, plugin_class: &TypeKey) -> bool {
        self.state.load().entries.contains_key(plugin_class)
    }

    /// The singleton for `plugin_class`, built on first access.
    ///
    /// The same `Arc` is returned until the class is registered again.
    pub fn instance(&self, plugin_class: &TypeKey) -> Result<Arc<C>, PlexusError> {
        loop {
            let entry = self
                .state
                .load()
                .entries
                .get(plugin_class)
                .cloned()
                .ok_or_else(|| not_found(plugin_class))?;
            if let Some(instance) = entry.instance.get() {
                return Ok(instance.clone());
            }
            // `None` means the entry was replaced while building; retry on the new one.
            if let Some(instance) = self.materialize(&entry)? {
                return Ok(instance);
            }
        }
    }

    pub fn instance_of<P: Kind>(&self) -> Result<Arc<C>, PlexusError> {
        self.instance(&TypeKey::of::<P>())
    }

    /// Every current instance in registration order.
    ///
    /// Plugins whose factory fails are logged and left out.
    pub fn instances(&self) -> Vec<Arc<C>> {
        self.collect().1.into_iter().map(|(_, i)| i).collect()
    }

    /// Descriptors of every registered class in registration order.
    pub fn descriptors(&self) -> Vec<PluginDescriptor> {
        self.state
            .load()
            .entries
            .values()
            .map(|e| e.descriptor.clone())
            .collect()
    }

    /// Change counter of the registry state.
    pub fn generation(&self) -> u64 {
        self.state.load().generation
    }

    pub fn len(&self) -> usize {
        self.state.load().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.load().entries.is_empty()
    }

    /// Generation and instances of one snapshot.
    pub(crate) fn collect(&self) -> (u64, Vec<(PluginDescriptor, Arc<C>)>) {
        let snapshot = self.state.load_full();
        let mut out = Vec::with_capacity(snapshot.entries.len());
        for entry in snapshot.entries.values() {
            let instance = match entry.instance.get() {
                Some(instance) => Some(instance.clone()),
                None => match self.materialize(entry) {
                    Ok(instance) => instance,
                    Err(e) => {
                        warn!(plugin = entry.descriptor.name(), error = %e, "skipping plugin that failed to instantiate");
                        None
                    }
                },
            };
            if let Some(instance) = instance {
                out.push((entry.descriptor.clone(), instance));
            }
        }
        (snapshot.generation, out)
    }

    /// Build the instance for `entry`, once.
    ///
    /// The factory runs under the entry's own lock only. The result is
    /// published under the writer lock if `entry` is still live, otherwise
    /// `Ok(None)` is returned.
    fn materialize(&self, entry: &Arc<InstanceEntry<C>>) -> Result<Option<Arc<C>>, PlexusError> {
        let _init = entry.init.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(instance) = entry.instance.get() {
            return Ok(Some(instance.clone()));
        }
        if !self.is_live(entry) {
            return Ok(None);
        }

        let instance = entry.descriptor.instantiate::<C>()?;

        let _writer = self.lock_writer();
        if !self.is_live(entry) {
            debug!(plugin = entry.descriptor.name(), "discarding instance of a replaced entry");
            return Ok(None);
        }
        let _ = entry.instance.set(instance.clone());
        debug!(plugin = entry.descriptor.name(), capability = %self.capability, "instantiated singleton");
        Ok(Some(instance))
    }

    /// Whether `entry` is the one the current snapshot holds for its class.
    fn is_live(&self, entry: &Arc<InstanceEntry<C>>) -> bool {
        self.state
            .load()
            .entries
            .get(&entry.descriptor.plugin_class())
            .is_some_and(|current| Arc::ptr_eq(current, entry))
    }

    /// Apply `changes` in order and publish them as one snapshot.
    fn apply(&self, changes: Vec<Change>) {
        let _writer = self.lock_writer();
        let current = self.state.load_full();
        let mut next = (*current).clone();
        let mut changed = false;

        for change in changes {
            match change {
                Change::Add(descriptor) => {
                    if descriptor.capability() != self.capability {
                        debug!(
                            plugin = descriptor.name(),
                            capability = %descriptor.capability(),
                            expected = %self.capability,
                            "ignoring plugin of another capability"
                        );
                        continue;
                    }
                    let class = descriptor.plugin_class();
                    if next.entries.shift_remove(&class).is_some() {
                        debug!(plugin = descriptor.name(), "replacing singleton entry");
                    } else {
                        debug!(plugin = descriptor.name(), "registering singleton entry");
                    }
                    next.entries.insert(class, InstanceEntry::new(descriptor));
                    changed = true;
                }
                Change::Remove(descriptor) => {
                    if descriptor.capability() != self.capability {
                        continue;
                    }
                    if next.entries.shift_remove(&descriptor.plugin_class()).is_some() {
                        debug!(plugin = descriptor.name(), "removed singleton entry");
                        changed = true;
                    }
                }
            }
        }

        if changed {
            next.generation += 1;
            self.state.store(Arc::new(next));
        }
    }

    fn lock_writer(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: ?Sized + Kind + Send + Sync> PluginListener for SingletonRegistry<C> {
    fn on_plugins_added(&self, descriptors: &[PluginDescriptor]) {
        self.apply(descriptors.iter().cloned().map(Change::Add).collect());
    }

    fn on_plugins_removed(&self, descriptors: &[PluginDescriptor]) {
        self.apply(descriptors.iter().cloned().map(Change::Remove).collect());
    }
}

impl<C: ?Sized + Kind + Send + Sync> Default for SingletonRegistry<C> {
    fn default() -> Self {
        Self::detached()
    }
}

impl<C: ?Sized + Kind + Send + Sync> std::fmt::Debug for SingletonRegistry<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.load();
        f.debug_struct("SingletonRegistry")
            .field("capability", &self.capability)
            .field("generation", &state.generation)
            .field("entries", &state.entries.len())
            .field("attached", &self.is_attached())
            .finish()
    }
}

fn not_found(plugin_class: &TypeKey) -> PlexusError {
    PlexusError::PluginNotFound {
        class: plugin_class.name().to_string(),
    }
}
