// SPDX-FileCopyrightText: 2026 Plexus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Plexus plugin framework.
//!
//! This crate provides the error type, runtime type keys, and common types
//! used throughout the Plexus workspace. Plugin classes, capability traits,
//! and convertible values all identify themselves through [`Kind`].

pub mod error;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::PlexusError;
pub use types::{AccessMode, Kind, TypeKey, Typed};
