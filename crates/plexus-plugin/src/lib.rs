// SPDX-FileCopyrightText: 2026 Plexus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin descriptors, discovery, and the singleton registry.
//!
//! The [`PluginService`] knows every plugin descriptor, whether discovered at
//! startup or registered by hand, and publishes changes on its
//! [`PluginFeed`]. A [`SingletonRegistry`] keeps exactly one instance per
//! plugin class of one capability in sync with that feed, and a
//! [`CapabilityIndex`] answers capability queries against the registry's
//! current state.

pub mod descriptor;
pub mod discovery;
pub mod feed;
pub mod index;
pub mod service;
pub mod singleton;

#[doc(hidden)]
pub use inventory;

pub use descriptor::{PluginDescriptor, PluginOrigin, PluginSummary};
pub use discovery::{DescriptorSource, DiscoveredPlugin, InventorySource, StaticSource};
pub use feed::{PluginEvent, PluginFeed, PluginListener, Subscription};
pub use index::{CapabilityIndex, IndexedInstance};
pub use service::PluginService;
pub use singleton::SingletonRegistry;
