// SPDX-FileCopyrightText: 2026 Plexus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Plexus integration tests.
//!
//! - [`fixtures`] - fruit value types and the food converters
//! - [`TestContext`] - a wired context with a scratch directory

pub mod fixtures;
pub mod harness;

pub use fixtures::{
    Apple, DiscoveredFoodConverter, FoodConverter, GrannySmith, Orange, Peach, RottenConverter,
};
pub use harness::{TestContext, TestContextBuilder};
