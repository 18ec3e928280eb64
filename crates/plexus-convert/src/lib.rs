// SPDX-FileCopyrightText: 2026 Plexus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion between runtime-typed values through converter plugins.
//!
//! Converters are ordinary plugins of capability `dyn Converter`. The
//! [`ConvertService`] keeps one singleton per converter class in sync with
//! the plugin service and picks the first converter whose declared input
//! and output types fit the requested conversion.

pub mod builtin;
pub mod converter;
pub mod service;

pub use builtin::{NumberToTextConverter, WideningConverter};
pub use converter::{Converter, expect_input};
pub use service::ConvertService;
