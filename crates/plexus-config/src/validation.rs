// SPDX-FileCopyrightText: 2026 Plexus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::PlexusConfig;

pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Check semantic constraints serde cannot express.
///
/// Collects every failure instead of stopping at the first.
pub fn validate_config(config: &PlexusConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.context.name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "context.name must not be empty".to_string(),
        });
    }

    let level = config.context.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "context.log_level `{}` is not one of {}",
                config.context.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    let mut seen = HashSet::new();
    for (i, name) in config.plugins.disabled.iter().enumerate() {
        if name.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("plugins.disabled[{i}] must not be empty"),
            });
        } else if !seen.insert(name.as_str()) {
            errors.push(ConfigError::Validation {
                message: format!("plugin `{name}` is listed twice in plugins.disabled"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&PlexusConfig::default()).is_ok());
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let mut config = PlexusConfig::default();
        config.context.log_level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn all_failures_are_collected() {
        let mut config = PlexusConfig::default();
        config.context.name = " ".to_string();
        config.context.log_level = "loud".to_string();
        config.plugins.disabled = vec!["A".into(), "".into(), "A".into()];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors[1].to_string().contains("loud"));
        assert!(errors[3].to_string().contains("listed twice"));
    }
}
