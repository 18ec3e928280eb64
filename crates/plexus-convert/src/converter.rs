// SPDX-FileCopyrightText: 2026 Plexus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The converter capability.

use plexus_core::{Kind, PlexusError, TypeKey, Typed};

/// A plugin that turns values of one type into another.
///
/// A converter declares the input type it accepts and the output type it
/// produces. By default it handles any value assignable to its input type
/// when its output type is assignable to the requested target; implementors
/// may narrow that by overriding [`Converter::can_convert_types`] or
/// [`Converter::can_convert`].
pub trait Converter: Typed {
    fn input_type(&self) -> TypeKey;

    fn output_type(&self) -> TypeKey;

    /// Type-level check, without a value at hand.
    fn can_convert_types(&self, source: &TypeKey, target: &TypeKey) -> bool {
        source.is_assignable_to(&self.input_type()) && self.output_type().is_assignable_to(target)
    }

    /// Whether this converter can turn `source` into a `target`.
    fn can_convert(&self, source: &dyn Typed, target: &TypeKey) -> bool {
        self.can_convert_types(&source.type_key(), target)
    }

    /// Convert `source` into a value of type `target`.
    ///
    /// Only called after [`Converter::can_convert`] accepted the pair.
    fn convert(&self, source: &dyn Typed, target: &TypeKey) -> Result<Box<dyn Typed>, PlexusError>;
}

impl Kind for dyn Converter {}

/// Downcast `source` to the converter's input type or report the mismatch.
pub fn expect_input<'a, T: Kind + Send + Sync>(
    source: &'a dyn Typed,
    target: &TypeKey,
) -> Result<&'a T, PlexusError> {
    source
        .downcast_ref::<T>()
        .ok_or_else(|| PlexusError::ConversionUnsupported {
            from: source.type_key().name().to_string(),
            to: target.name().to_string(),
        })
}
