// SPDX-FileCopyrightText: 2026 Plexus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `plexus config` command implementation.

use plexus_config::PlexusConfig;
use plexus_core::PlexusError;

/// Print the resolved configuration as TOML, or JSON with `--json`.
pub fn run_config(config: &PlexusConfig, json: bool) -> Result<(), PlexusError> {
    println!("{}", render(config, json)?);
    Ok(())
}

pub fn render(config: &PlexusConfig, json: bool) -> Result<String, PlexusError> {
    if json {
        serde_json::to_string_pretty(config)
            .map_err(|e| PlexusError::Config(format!("failed to encode configuration: {e}")))
    } else {
        toml::to_string_pretty(config)
            .map_err(|e| PlexusError::Config(format!("failed to encode configuration: {e}")))
    }
}
