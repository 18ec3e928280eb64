// SPDX-FileCopyrightText: 2026 Plexus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! File-backed data handles.
//!
//! [`FileHandle`] opens its file on first access and offers offset, length
//! and seek on top of `Read`/`Write`/`Seek`. [`DataInput`] and
//! [`DataOutput`] add typed big-endian reads and writes to any stream.

pub mod data;
pub mod handle;

pub use data::{DataInput, DataOutput, MAX_UTF_LEN};
pub use handle::FileHandle;
