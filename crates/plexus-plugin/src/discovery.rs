// SPDX-FileCopyrightText: 2026 Plexus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Descriptor sources used to populate the plugin service at startup.
//!
//! Plugins compiled into the binary announce themselves with
//! [`discover_plugin!`](crate::discover_plugin); [`InventorySource`] collects
//! them at runtime. No network or filesystem access is involved.

use tracing::debug;

use crate::descriptor::{PluginDescriptor, PluginOrigin};

/// Anything that can list plugin descriptors.
///
/// Sources are consulted once, when the plugin service is built.
pub trait DescriptorSource: Send + Sync {
    /// Short identifier recorded as the descriptors' origin.
    fn name(&self) -> &str;

    fn list_descriptors(&self) -> Vec<PluginDescriptor>;
}

/// Link-time registration record produced by [`discover_plugin!`](crate::discover_plugin).
pub struct DiscoveredPlugin {
    describe: fn() -> PluginDescriptor,
}

impl DiscoveredPlugin {
    pub const fn new(describe: fn() -> PluginDescriptor) -> Self {
        Self { describe }
    }

    pub fn descriptor(&self) -> PluginDescriptor {
        (self.describe)()
    }
}

inventory::collect!(DiscoveredPlugin);

/// Source over every plugin submitted with [`discover_plugin!`](crate::discover_plugin).
///
/// Link order is unspecified, so descriptors are sorted by plugin class name.
#[derive(Debug, Default, Clone, Copy)]
pub struct InventorySource;

impl DescriptorSource for InventorySource {
    fn name(&self) -> &str {
        "inventory"
    }

    fn list_descriptors(&self) -> Vec<PluginDescriptor> {
        let mut descriptors: Vec<PluginDescriptor> = inventory::iter::<DiscoveredPlugin>
            .into_iter()
            .map(DiscoveredPlugin::descriptor)
            .collect();
        descriptors.sort_by(|a, b| a.plugin_class().name().cmp(b.plugin_class().name()));
        debug!(count = descriptors.len(), "collected link-time plugins");
        descriptors
    }
}

/// Fixed list of descriptors handed over by embedding code.
#[derive(Debug, Clone)]
pub struct StaticSource {
    name: String,
    descriptors: Vec<PluginDescriptor>,
}

impl StaticSource {
    pub fn new(name: impl Into<String>, descriptors: Vec<PluginDescriptor>) -> Self {
        Self {
            name: name.into(),
            descriptors,
        }
    }
}

impl DescriptorSource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn list_descriptors(&self) -> Vec<PluginDescriptor> {
        self.descriptors.clone()
    }
}

/// List `source` and stamp each descriptor with its origin.
pub(crate) fn collect_from(source: &dyn DescriptorSource) -> Vec<PluginDescriptor> {
    let origin = PluginOrigin::Discovered(source.name().to_string());
    source
        .list_descriptors()
        .into_iter()
        .map(|d| d.with_origin(origin.clone()))
        .collect()
}

/// Register a `Default`-constructible plugin for link-time discovery.
///
/// ```ignore
/// discover_plugin!(DiscoveredFoodConverter => dyn Converter);
/// ```
#[macro_export]
macro_rules! discover_plugin {
    ($plugin:ty => $capability:ty) => {
        $crate::inventory::submit! {
            $crate::discovery::DiscoveredPlugin::new(|| {
                $crate::plugin_descriptor!($plugin => $capability)
            })
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin_descriptor;
    use plexus_core::{Kind, TypeKey};

    trait Sensor: Send + Sync {}
    impl Kind for dyn Sensor {}

    #[derive(Default)]
    struct Thermometer;
    impl Kind for Thermometer {}
    impl Sensor for Thermometer {}

    #[derive(Default)]
    struct Barometer;
    impl Kind for Barometer {}
    impl Sensor for Barometer {}

    discover_plugin!(Thermometer => dyn Sensor);
    discover_plugin!(Barometer => dyn Sensor);

    #[test]
    fn inventory_source_lists_submitted_plugins_sorted() {
        let descriptors = InventorySource.list_descriptors();
        let classes: Vec<TypeKey> = descriptors
            .iter()
            .filter(|d| d.provides::<dyn Sensor>())
            .map(|d| d.plugin_class())
            .collect();
        assert_eq!(
            classes,
            vec![TypeKey::of::<Barometer>(), TypeKey::of::<Thermometer>()]
        );
    }

    #[test]
    fn collect_from_stamps_origin() {
        let source = StaticSource::new("fixture", vec![plugin_descriptor!(Barometer => dyn Sensor)]);
        let descriptors = collect_from(&source);
        assert_eq!(descriptors.len(), 1);
        assert_eq!(
            descriptors[0].origin(),
            &PluginOrigin::Discovered("fixture".to_string())
        );
    }
}
