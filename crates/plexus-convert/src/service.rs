// SPDX-FileCopyrightText: 2026 Plexus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The convert service: converter singletons matched by input and output type.

use std::sync::Arc;

use plexus_core::{Kind, PlexusError, TypeKey, Typed};
use plexus_plugin::{CapabilityIndex, PluginService, SingletonRegistry};
use tracing::{debug, trace};

use crate::converter::Converter;

/// Looks up converters among the current converter singletons.
///
/// The service follows its plugin service: converters added there become
/// candidates on the next query, removed ones stop matching immediately.
pub struct ConvertService {
    index: CapabilityIndex<dyn Converter>,
}

impl ConvertService {
    /// Attach a converter registry to `plugins`.
    pub fn new(plugins: &PluginService) -> Self {
        let registry = SingletonRegistry::<dyn Converter>::attach(plugins);
        debug!(converters = registry.len(), "convert service ready");
        Self::with_registry(registry)
    }

    /// Serve conversions from an existing registry.
    pub fn with_registry(registry: Arc<SingletonRegistry<dyn Converter>>) -> Self {
        Self {
            index: CapabilityIndex::new(registry),
        }
    }

    pub fn registry(&self) -> &Arc<SingletonRegistry<dyn Converter>> {
        self.index.registry()
    }

    /// Whether some converter can turn `source` into a `target`.
    pub fn supports(&self, source: &dyn Typed, target: &TypeKey) -> bool {
        self.handler(source, target).is_some()
    }

    /// Whether some converter handles `source` values as declared types.
    pub fn supports_types(&self, source: &TypeKey, target: &TypeKey) -> bool {
        self.index
            .first_matching(|c| c.can_convert_types(source, target))
            .is_some()
    }

    /// The first converter, in registration order, accepting the pair.
    pub fn handler(&self, source: &dyn Typed, target: &TypeKey) -> Option<Arc<dyn Converter>> {
        let handler = self.index.first_matching(|c| c.can_convert(source, target));
        trace!(
            from = %source.type_key(),
            to = %target,
            found = handler.is_some(),
            "converter lookup"
        );
        handler
    }

    /// Convert `source` into a value of type `target`.
    pub fn convert(&self, source: &dyn Typed, target: &TypeKey) -> Result<Box<dyn Typed>, PlexusError> {
        let handler = self
            .handler(source, target)
            .ok_or_else(|| PlexusError::ConversionUnsupported {
                from: source.type_key().name().to_string(),
                to: target.name().to_string(),
            })?;
        handler.convert(source, target)
    }

    /// Typed convenience over [`ConvertService::convert`].
    pub fn convert_to<T: Kind + Send + Sync>(&self, source: &dyn Typed) -> Result<Box<T>, PlexusError> {
        let target = TypeKey::of::<T>();
        let converted = self.convert(source, &target)?;
        let produced = converted.type_key();
        let any: Box<dyn std::any::Any> = converted;
        any.downcast::<T>().map_err(|_| {
            PlexusError::Internal(format!(
                "converter produced {} when {} was requested",
                produced.name(),
                target.name()
            ))
        })
    }

    /// The converter singleton of `plugin_class`.
    pub fn instance(&self, plugin_class: &TypeKey) -> Result<Arc<dyn Converter>, PlexusError> {
        self.registry().instance(plugin_class)
    }

    pub fn instance_of<P: Kind>(&self) -> Result<Arc<dyn Converter>, PlexusError> {
        self.instance(&TypeKey::of::<P>())
    }

    /// Every current converter in registration order.
    pub fn converters(&self) -> Vec<Arc<dyn Converter>> {
        self.index.current_instances()
    }
}

impl std::fmt::Debug for ConvertService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConvertService")
            .field("registry", self.registry())
            .finish()
    }
}
