// SPDX-FileCopyrightText: 2026 Plexus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Converters shipped with the framework.
//!
//! They are listed by [`source`] rather than submitted for link-time
//! discovery, so they are present whether or not the linker keeps
//! registration records of this crate.

use plexus_core::{PlexusError, TypeKey, Typed};
use plexus_plugin::{StaticSource, plugin_descriptor};

use crate::converter::{Converter, expect_input};

/// Widens `i32` to `i64`.
#[derive(Debug, Default)]
pub struct WideningConverter;

impl plexus_core::Kind for WideningConverter {}

impl Converter for WideningConverter {
    fn input_type(&self) -> TypeKey {
        TypeKey::of::<i32>()
    }

    fn output_type(&self) -> TypeKey {
        TypeKey::of::<i64>()
    }

    fn convert(&self, source: &dyn Typed, target: &TypeKey) -> Result<Box<dyn Typed>, PlexusError> {
        let value = expect_input::<i32>(source, target)?;
        Ok(Box::new(i64::from(*value)))
    }
}

/// Formats `i64` as decimal text.
#[derive(Debug, Default)]
pub struct NumberToTextConverter;

impl plexus_core::Kind for NumberToTextConverter {}

impl Converter for NumberToTextConverter {
    fn input_type(&self) -> TypeKey {
        TypeKey::of::<i64>()
    }

    fn output_type(&self) -> TypeKey {
        TypeKey::of::<String>()
    }

    fn convert(&self, source: &dyn Typed, target: &TypeKey) -> Result<Box<dyn Typed>, PlexusError> {
        let value = expect_input::<i64>(source, target)?;
        Ok(Box::new(value.to_string()))
    }
}

/// Descriptor source named `builtin` listing every shipped converter.
pub fn source() -> StaticSource {
    StaticSource::new(
        "builtin",
        vec![
            plugin_descriptor!(WideningConverter => dyn Converter),
            plugin_descriptor!(NumberToTextConverter => dyn Converter),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConvertService;
    use plexus_plugin::{DescriptorSource, PluginOrigin, PluginService};

    fn service() -> (PluginService, ConvertService) {
        let builtin = source();
        let plugins = PluginService::from_sources([&builtin as &dyn DescriptorSource], &[]);
        let convert = ConvertService::new(&plugins);
        (plugins, convert)
    }

    #[test]
    fn builtins_are_listed_by_source() {
        let (plugins, convert) = service();
        let widening = plugins.get_plugin_of::<WideningConverter>().unwrap();
        assert_eq!(widening.origin(), &PluginOrigin::Discovered("builtin".into()));
        assert!(plugins.get_plugin_of::<NumberToTextConverter>().is_some());
        assert_eq!(convert.converters().len(), 2);
    }

    #[test]
    fn builtins_convert_values() {
        let (_plugins, convert) = service();
        let wide = convert.convert_to::<i64>(&7i32).unwrap();
        assert_eq!(*wide, 7);

        let text = convert.convert_to::<String>(&-42i64).unwrap();
        assert_eq!(*text, "-42");
    }

    #[test]
    fn conversions_do_not_chain() {
        let (_plugins, convert) = service();
        assert!(convert.supports_types(&TypeKey::of::<i32>(), &TypeKey::of::<i64>()));
        assert!(!convert.supports(&7i32, &TypeKey::of::<String>()));
    }

    #[test]
    fn disabled_builtin_is_absent() {
        let builtin = source();
        let plugins = PluginService::from_sources(
            [&builtin as &dyn DescriptorSource],
            &["WideningConverter".to_string()],
        );
        let convert = ConvertService::new(&plugins);
        assert!(!convert.supports(&7i32, &TypeKey::of::<i64>()));
        assert!(convert.supports(&7i64, &TypeKey::of::<String>()));
    }
}
