// SPDX-FileCopyrightText: 2026 Plexus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of silently ignored.

use plexus_core::AccessMode;
use serde::{Deserialize, Serialize};

/// Top-level Plexus configuration.
///
/// Every section is optional and falls back to its defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PlexusConfig {
    /// Context identity and logging.
    #[serde(default)]
    pub context: ContextConfig,

    /// Plugin discovery settings.
    #[serde(default)]
    pub plugins: PluginsConfig,

    /// File handle defaults.
    #[serde(default)]
    pub io: IoConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ContextConfig {
    /// Name reported in logs and listings.
    #[serde(default = "default_context_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            name: default_context_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_context_name() -> String {
    "plexus".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PluginsConfig {
    /// Run link-time discovery when the context starts.
    #[serde(default = "default_discovery")]
    pub discovery: bool,

    /// Plugin names (or fully qualified class names) skipped during discovery.
    #[serde(default)]
    pub disabled: Vec<String>,
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self {
            discovery: default_discovery(),
            disabled: Vec::new(),
        }
    }
}

fn default_discovery() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IoConfig {
    /// Access mode of file handles opened through the context.
    #[serde(default)]
    pub default_mode: AccessMode,
}
