// SPDX-FileCopyrightText: 2026 Plexus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builder for a fully wired [`Context`] in tests.

use std::path::PathBuf;

use plexus::Context;
use plexus_config::PlexusConfig;
use plexus_core::{AccessMode, PlexusError};
use plexus_plugin::{DescriptorSource, InventorySource, PluginDescriptor, StaticSource};

/// Builder for [`TestContext`].
pub struct TestContextBuilder {
    config: PlexusConfig,
    plugins: Vec<PluginDescriptor>,
}

impl TestContextBuilder {
    fn new() -> Self {
        let mut config = PlexusConfig::default();
        config.context.name = "test".to_string();
        // Link-time plugins are opted into per test.
        config.plugins.discovery = false;
        Self {
            config,
            plugins: Vec::new(),
        }
    }

    /// Include the built-in converters and everything submitted with
    /// `discover_plugin!`.
    pub fn with_discovery(mut self) -> Self {
        self.config.plugins.discovery = true;
        self
    }

    /// Seed the context with `descriptor` as if it had been discovered.
    pub fn with_plugin(mut self, descriptor: PluginDescriptor) -> Self {
        self.plugins.push(descriptor);
        self
    }

    pub fn with_disabled(mut self, name: impl Into<String>) -> Self {
        self.config.plugins.disabled.push(name.into());
        self
    }

    pub fn with_default_mode(mut self, mode: AccessMode) -> Self {
        self.config.io.default_mode = mode;
        self
    }

    pub fn build(self) -> Result<TestContext, PlexusError> {
        let scratch = tempfile::tempdir()?;
        let builtin = plexus_convert::builtin::source();
        let fixtures = StaticSource::new("fixtures", self.plugins);
        let mut sources: Vec<&dyn DescriptorSource> = Vec::new();
        if self.config.plugins.discovery {
            sources.push(&builtin);
            sources.push(&InventorySource);
        }
        sources.push(&fixtures);
        let context = Context::with_sources(self.config, sources);
        Ok(TestContext { context, scratch })
    }
}

/// A context plus a scratch directory removed on drop.
pub struct TestContext {
    pub context: Context,
    scratch: tempfile::TempDir,
}

impl TestContext {
    pub fn builder() -> TestContextBuilder {
        TestContextBuilder::new()
    }

    /// Path of `name` inside the scratch directory.
    pub fn scratch_path(&self, name: &str) -> PathBuf {
        self.scratch.path().join(name)
    }
}

impl std::ops::Deref for TestContext {
    type Target = Context;

    fn deref(&self) -> &Context {
        &self.context
    }
}
