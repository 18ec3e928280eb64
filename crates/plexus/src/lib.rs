// SPDX-FileCopyrightText: 2026 Plexus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plexus - singleton plugin registry.
//!
//! A [`Context`] owns the plugin service and the services built on it. It is
//! created from configuration, runs discovery once, and tears everything
//! down on [`Context::dispose`] or drop.

use std::path::PathBuf;

use plexus_config::PlexusConfig;
use plexus_convert::ConvertService;
use plexus_io::FileHandle;
use plexus_plugin::{DescriptorSource, InventorySource, PluginService};
use tracing::info;

/// The services of one running application.
pub struct Context {
    // Dependents go first so they deregister before the feed goes away.
    convert: ConvertService,
    plugins: PluginService,
    config: PlexusConfig,
}

impl Context {
    /// Build a context, discovering the built-in converters and every
    /// link-time plugin unless discovery is switched off.
    pub fn new(config: PlexusConfig) -> Self {
        let builtin = plexus_convert::builtin::source();
        let sources: Vec<&dyn DescriptorSource> = if config.plugins.discovery {
            vec![&builtin as &dyn DescriptorSource, &InventorySource]
        } else {
            Vec::new()
        };
        Self::with_sources(config, sources)
    }

    /// Build a context from explicit descriptor sources.
    ///
    /// `config.plugins.disabled` still applies; `config.plugins.discovery` is
    /// not consulted.
    pub fn with_sources<'a, I>(config: PlexusConfig, sources: I) -> Self
    where
        I: IntoIterator<Item = &'a dyn DescriptorSource>,
    {
        let plugins = PluginService::from_sources(sources, &config.plugins.disabled);
        let convert = ConvertService::new(&plugins);
        info!(
            context = %config.context.name,
            plugins = plugins.len(),
            converters = convert.registry().len(),
            "context initialized"
        );
        Self {
            convert,
            plugins,
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.context.name
    }

    pub fn config(&self) -> &PlexusConfig {
        &self.config
    }

    pub fn plugins(&self) -> &PluginService {
        &self.plugins
    }

    pub fn convert(&self) -> &ConvertService {
        &self.convert
    }

    /// A handle on `path` using the configured default access mode.
    pub fn file_handle(&self, path: impl Into<PathBuf>) -> FileHandle {
        FileHandle::new(path).with_mode(self.config.io.default_mode)
    }

    /// Tear the context down.
    pub fn dispose(self) {
        drop(self);
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        info!(context = %self.config.context.name, "context disposed");
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("name", &self.name())
            .field("plugins", &self.plugins)
            .field("convert", &self.convert)
            .finish()
    }
}
