// SPDX-FileCopyrightText: 2026 Plexus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fruit-themed value types and converters.
//!
//! `FoodConverter` handles `Apple -> Peach` and is registered by hand in
//! tests. `DiscoveredFoodConverter` handles `Orange -> Peach` and is meant to
//! be submitted for link-time discovery by the test binary that uses it.

use std::sync::Arc;

use plexus_convert::{Converter, expect_input};
use plexus_core::{Kind, PlexusError, TypeKey, Typed};
use plexus_plugin::{PluginDescriptor, plugin_descriptor};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Apple;
impl Kind for Apple {}

/// An `Apple` subtype.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GrannySmith;
impl Kind for GrannySmith {
    fn supertypes() -> Vec<TypeKey> {
        vec![TypeKey::of::<Apple>()]
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Orange;
impl Kind for Orange {}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Peach;
impl Kind for Peach {}

#[derive(Debug, Default)]
pub struct FoodConverter;
impl Kind for FoodConverter {}

impl Converter for FoodConverter {
    fn input_type(&self) -> TypeKey {
        TypeKey::of::<Apple>()
    }

    fn output_type(&self) -> TypeKey {
        TypeKey::of::<Peach>()
    }

    fn convert(&self, _source: &dyn Typed, _target: &TypeKey) -> Result<Box<dyn Typed>, PlexusError> {
        Ok(Box::new(Peach))
    }
}

#[derive(Debug, Default)]
pub struct DiscoveredFoodConverter;
impl Kind for DiscoveredFoodConverter {}

impl Converter for DiscoveredFoodConverter {
    fn input_type(&self) -> TypeKey {
        TypeKey::of::<Orange>()
    }

    fn output_type(&self) -> TypeKey {
        TypeKey::of::<Peach>()
    }

    fn convert(&self, source: &dyn Typed, target: &TypeKey) -> Result<Box<dyn Typed>, PlexusError> {
        expect_input::<Orange>(source, target)?;
        Ok(Box::new(Peach))
    }
}

/// A converter class whose factory always fails.
#[derive(Debug)]
pub struct RottenConverter;
impl Kind for RottenConverter {}

pub fn food_converter() -> PluginDescriptor {
    plugin_descriptor!(FoodConverter => dyn Converter)
}

pub fn discovered_food_converter() -> PluginDescriptor {
    plugin_descriptor!(DiscoveredFoodConverter => dyn Converter)
}

pub fn rotten_converter() -> PluginDescriptor {
    PluginDescriptor::new::<RottenConverter, dyn Converter, _>(|| {
        Err::<Arc<dyn Converter>, _>(PlexusError::instantiation(
            TypeKey::of::<RottenConverter>().short_name(),
            "spoiled before construction",
        ))
    })
}
