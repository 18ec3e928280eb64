// SPDX-FileCopyrightText: 2026 Plexus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for the Plexus plugin framework.
//!
//! TOML files are merged in XDG order with `PLEXUS_*` environment overrides,
//! checked strictly (`deny_unknown_fields`), then validated. Failures come
//! back as miette diagnostics with typo suggestions.
//!
//! ```no_run
//! use plexus_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("discovery enabled: {}", config.plugins.discovery);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, SourceFile, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{ContextConfig, IoConfig, PlexusConfig, PluginsConfig};

/// Load from the standard hierarchy and validate.
pub fn load_and_validate() -> Result<PlexusConfig, Vec<ConfigError>> {
    finish(loader::load_config(), || {
        loader::config_paths()
            .iter()
            .filter_map(|p| read_source(p))
            .collect()
    })
}

/// Load one explicit file (plus environment) and validate.
pub fn load_and_validate_path(path: &Path) -> Result<PlexusConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || {
        read_source(path).into_iter().collect()
    })
}

/// Load TOML text and validate.
pub fn load_and_validate_str(toml_content: &str) -> Result<PlexusConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![SourceFile::new("<inline>", toml_content)]
    })
}

fn finish<F>(
    loaded: Result<PlexusConfig, figment::Error>,
    sources: F,
) -> Result<PlexusConfig, Vec<ConfigError>>
where
    F: FnOnce() -> Vec<SourceFile>,
{
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            tracing::debug!(name = %config.context.name, "configuration loaded");
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

/// Figment records absolute paths, so relative ones are resolved first.
fn read_source(path: &Path) -> Option<SourceFile> {
    let content = std::fs::read_to_string(path).ok()?;
    let display = std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string();
    Some(SourceFile::new(display, content))
}
