// SPDX-FileCopyrightText: 2026 Plexus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Plexus plugin framework.

use thiserror::Error;

/// The primary error type used across the registry, services, and collaborators.
#[derive(Debug, Error)]
pub enum PlexusError {
    /// Requested plugin class is not registered.
    #[error("plugin not found: {class}")]
    PluginNotFound { class: String },

    /// A plugin factory failed while building the singleton instance.
    #[error("failed to instantiate plugin {class}: {source}")]
    Instantiation {
        class: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A plugin factory produced an instance of a different capability type.
    #[error("plugin {class} does not provide capability {expected}")]
    CapabilityMismatch { class: String, expected: String },

    /// No registered converter handles the requested conversion.
    #[error("no converter from {from} to {to}")]
    ConversionUnsupported { from: String, to: String },

    /// Attempt to reconfigure a resource that is already initialized.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Configuration errors (invalid values, unusable settings).
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O errors from file-backed collaborators.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PlexusError {
    /// Wrap any error raised by a plugin factory.
    pub fn instantiation(
        class: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        PlexusError::Instantiation {
            class: class.into(),
            source: source.into(),
        }
    }
}
