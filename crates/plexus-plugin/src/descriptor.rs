// SPDX-FileCopyrightText: 2026 Plexus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin descriptors: what a plugin is, what it provides, and how to build it.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use plexus_core::{Kind, PlexusError, TypeKey};
use serde::Serialize;

/// Type-erased factory stored in a descriptor.
///
/// Produces a boxed `Arc<C>` where `C` is the descriptor's capability type.
type ErasedFactory = dyn Fn() -> Result<Box<dyn Any + Send + Sync>, PlexusError> + Send + Sync;

/// Where a descriptor came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "source")]
pub enum PluginOrigin {
    /// Registered by embedding code.
    Manual,
    /// Produced by a descriptor source during discovery.
    Discovered(String),
}

impl fmt::Display for PluginOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginOrigin::Manual => write!(f, "manual"),
            PluginOrigin::Discovered(source) => write!(f, "discovered:{source}"),
        }
    }
}

/// Metadata pairing a plugin class with the capability it implements.
///
/// Descriptors are immutable and cheap to clone. Two descriptors are equal
/// when they name the same plugin class and capability; the factory and
/// origin do not take part in equality.
#[derive(Clone)]
pub struct PluginDescriptor {
    plugin_class: TypeKey,
    capability: TypeKey,
    name: String,
    origin: PluginOrigin,
    factory: Arc<ErasedFactory>,
}

impl PluginDescriptor {
    /// Describe plugin class `P` providing capability `C`.
    ///
    /// `factory` is called every time the registry needs a fresh singleton,
    /// so it must build a new instance on each call.
    pub fn new<P, C, F>(factory: F) -> Self
    where
        P: Kind,
        C: ?Sized + Kind + Send + Sync,
        F: Fn() -> Result<Arc<C>, PlexusError> + Send + Sync + 'static,
    {
        let plugin_class = TypeKey::of::<P>();
        Self {
            plugin_class,
            capability: TypeKey::of::<C>(),
            name: plugin_class.short_name().to_string(),
            origin: PluginOrigin::Manual,
            factory: Arc::new(move || {
                factory().map(|instance| Box::new(instance) as Box<dyn Any + Send + Sync>)
            }),
        }
    }

    /// Override the display name (defaults to the plugin type's short name).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_origin(mut self, origin: PluginOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn plugin_class(&self) -> TypeKey {
        self.plugin_class
    }

    pub fn capability(&self) -> TypeKey {
        self.capability
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn origin(&self) -> &PluginOrigin {
        &self.origin
    }

    /// Whether this descriptor provides capability `C`.
    pub fn provides<C: ?Sized + Kind>(&self) -> bool {
        self.capability == TypeKey::of::<C>()
    }

    /// Build a fresh instance typed as capability `C`.
    pub fn instantiate<C: ?Sized + Kind + Send + Sync>(&self) -> Result<Arc<C>, PlexusError> {
        let mismatch = || PlexusError::CapabilityMismatch {
            class: self.plugin_class.name().to_string(),
            expected: TypeKey::of::<C>().name().to_string(),
        };
        if !self.provides::<C>() {
            return Err(mismatch());
        }
        let boxed = (self.factory)()?;
        boxed
            .downcast::<Arc<C>>()
            .map(|instance| *instance)
            .map_err(|_| mismatch())
    }

    /// Serializable summary used for listings.
    pub fn summary(&self) -> PluginSummary {
        PluginSummary {
            name: self.name.clone(),
            class: self.plugin_class.name().to_string(),
            capability: self.capability.name().to_string(),
            origin: self.origin.clone(),
        }
    }
}

impl PartialEq for PluginDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.plugin_class == other.plugin_class && self.capability == other.capability
    }
}

impl Eq for PluginDescriptor {}

impl fmt::Debug for PluginDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginDescriptor")
            .field("name", &self.name)
            .field("plugin_class", &self.plugin_class)
            .field("capability", &self.capability)
            .field("origin", &self.origin)
            .finish()
    }
}

/// Flat, serializable view of a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginSummary {
    pub name: String,
    pub class: String,
    pub capability: String,
    pub origin: PluginOrigin,
}

/// Build a [`PluginDescriptor`] for a `Default`-constructible plugin.
///
/// ```ignore
/// let descriptor = plugin_descriptor!(FoodConverter => dyn Converter);
/// ```
#[macro_export]
macro_rules! plugin_descriptor {
    ($plugin:ty => $capability:ty) => {
        $crate::PluginDescriptor::new::<$plugin, $capability, _>(|| {
            ::std::result::Result::Ok(::std::sync::Arc::new(
                <$plugin as ::std::default::Default>::default(),
            ) as ::std::sync::Arc<$capability>)
        })
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }
    impl Kind for dyn Greeter {}

    trait Counter: Send + Sync {}
    impl Kind for dyn Counter {}

    #[derive(Default)]
    struct Hello;
    impl Kind for Hello {}
    impl Greeter for Hello {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }

    struct Broken;
    impl Kind for Broken {}

    #[test]
    fn macro_builds_descriptor_with_defaults() {
        let descriptor = plugin_descriptor!(Hello => dyn Greeter);
        assert_eq!(descriptor.plugin_class(), TypeKey::of::<Hello>());
        assert_eq!(descriptor.capability(), TypeKey::of::<dyn Greeter>());
        assert_eq!(descriptor.name(), "Hello");
        assert_eq!(descriptor.origin(), &PluginOrigin::Manual);
        assert!(descriptor.provides::<dyn Greeter>());
    }

    #[test]
    fn instantiate_builds_fresh_instances() {
        let descriptor = plugin_descriptor!(Hello => dyn Greeter);
        let first = descriptor.instantiate::<dyn Greeter>().unwrap();
        let second = descriptor.instantiate::<dyn Greeter>().unwrap();
        assert_eq!(first.greet(), "hello");
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn instantiate_with_wrong_capability_fails() {
        let descriptor = plugin_descriptor!(Hello => dyn Greeter);
        let err = descriptor.instantiate::<dyn Counter>().err().unwrap();
        assert!(matches!(err, PlexusError::CapabilityMismatch { .. }));
    }

    #[test]
    fn factory_errors_propagate() {
        let descriptor = PluginDescriptor::new::<Broken, dyn Greeter, _>(|| {
            Err(PlexusError::instantiation("Broken", "no default state"))
        });
        let err = descriptor.instantiate::<dyn Greeter>().err().unwrap();
        assert!(err.to_string().contains("no default state"));
    }

    #[test]
    fn equality_ignores_origin_and_name() {
        let manual = plugin_descriptor!(Hello => dyn Greeter);
        let discovered = plugin_descriptor!(Hello => dyn Greeter)
            .with_name("hi")
            .with_origin(PluginOrigin::Discovered("inventory".into()));
        assert_eq!(manual, discovered);
        assert_eq!(discovered.summary().origin.to_string(), "discovered:inventory");
    }

    #[test]
    fn summary_serializes_to_json() {
        let summary = plugin_descriptor!(Hello => dyn Greeter)
            .with_origin(PluginOrigin::Discovered("inventory".into()))
            .summary();
        let json = serde_json::to_value(&summary).expect("should serialize");
        assert_eq!(json["name"], "Hello");
        assert_eq!(json["origin"]["kind"], "discovered");
        assert_eq!(json["origin"]["source"], "inventory");
        assert!(json["capability"].as_str().unwrap().contains("Greeter"));
    }
}
