// SPDX-FileCopyrightText: 2026 Plexus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Merge order, later wins: compiled defaults, `/etc/plexus/plexus.toml`,
//! `$XDG_CONFIG_HOME/plexus/plexus.toml`, `./plexus.toml`, then `PLEXUS_*`
//! environment variables.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::PlexusConfig;

pub const SYSTEM_CONFIG_PATH: &str = "/etc/plexus/plexus.toml";
pub const LOCAL_CONFIG_PATH: &str = "plexus.toml";

/// `$XDG_CONFIG_HOME/plexus/plexus.toml`, when a config dir is known.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("plexus").join("plexus.toml"))
}

/// Every file consulted by [`load_config`], lowest priority first.
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(SYSTEM_CONFIG_PATH)];
    paths.extend(user_config_path());
    paths.push(PathBuf::from(LOCAL_CONFIG_PATH));
    paths
}

/// The full figment before extraction.
pub fn build_figment() -> Figment {
    config_paths()
        .into_iter()
        .fold(defaults(), |figment, path| figment.merge(Toml::file(path)))
        .merge(env_provider())
}

/// Load from the standard hierarchy with environment overrides.
pub fn load_config() -> Result<PlexusConfig, figment::Error> {
    build_figment().extract()
}

/// Load from one explicit file plus environment overrides.
pub fn load_config_from_path(path: &Path) -> Result<PlexusConfig, figment::Error> {
    defaults()
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Load from TOML text only; the environment is not consulted.
pub fn load_config_from_str(toml_content: &str) -> Result<PlexusConfig, figment::Error> {
    defaults().merge(Toml::string(toml_content)).extract()
}

fn defaults() -> Figment {
    Figment::new().merge(Serialized::defaults(PlexusConfig::default()))
}

/// `PLEXUS_*` variables mapped onto sections with `map()`, not `split("_")`.
///
/// `PLEXUS_IO_DEFAULT_MODE` must land on `io.default_mode`, not `io.default.mode`.
/// Lists use TOML syntax: `PLEXUS_PLUGINS_DISABLED='["WideningConverter"]'`.
fn env_provider() -> Env {
    Env::prefixed("PLEXUS_").map(|key| map_env_key(key.as_str()).into())
}

/// `CONTEXT_LOG_LEVEL` -> `context.log_level`. Figment passes keys in their
/// original case.
fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    ["context", "plugins", "io"]
        .iter()
        .find_map(|section| {
            key.strip_prefix(section)
                .and_then(|rest| rest.strip_prefix('_'))
                .map(|field| format!("{section}.{field}"))
        })
        .unwrap_or(key)
}
