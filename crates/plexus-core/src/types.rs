// SPDX-FileCopyrightText: 2026 Plexus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runtime type identity and shared value types.
//!
//! Rust has no class hierarchy to reflect on, so types that take part in
//! plugin registration or capability matching declare their lineage through
//! [`Kind`]. A [`TypeKey`] captures the identity of such a type together with
//! its declared supertypes, which is enough to answer assignability questions
//! like "can a `GrannySmith` be used where an `Apple` is expected?".

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A type that can be identified and matched at runtime.
///
/// Implement it for plugin classes, capability trait objects (`dyn Converter`),
/// and value types. Override [`Kind::supertypes`] to declare what the type is
/// assignable to.
pub trait Kind: 'static {
    /// Direct supertypes of this type.
    fn supertypes() -> Vec<TypeKey> {
        Vec::new()
    }
}

macro_rules! impl_kind {
    ($($ty:ty),* $(,)?) => {
        $(impl Kind for $ty {})*
    };
}

impl_kind!(bool, i32, i64, u64, f64, String);

/// Runtime identity of a [`Kind`].
///
/// Equality and hashing use the underlying [`TypeId`] only.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
    supertypes: fn() -> Vec<TypeKey>,
}

impl TypeKey {
    /// The key for `T`.
    pub fn of<T: ?Sized + Kind>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            supertypes: T::supertypes,
        }
    }

    /// Fully qualified type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without its module path (generic arguments kept).
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        match base.rfind("::") {
            Some(pos) => &self.name[pos + 2..],
            None => self.name,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Direct supertypes as declared by the type's [`Kind`] impl.
    pub fn supertypes(&self) -> Vec<TypeKey> {
        (self.supertypes)()
    }

    /// Whether a value of this type may be used where `target` is expected.
    ///
    /// A type is assignable to itself and, transitively, to every declared
    /// supertype.
    pub fn is_assignable_to(&self, target: &TypeKey) -> bool {
        if self == target {
            return true;
        }
        let mut pending = self.supertypes();
        let mut seen = vec![self.id];
        while let Some(next) = pending.pop() {
            if next == *target {
                return true;
            }
            if !seen.contains(&next.id) {
                seen.push(next.id);
                pending.extend(next.supertypes());
            }
        }
        false
    }

    /// Whether a value of type `source` may be used where this type is expected.
    pub fn is_assignable_from(&self, source: &TypeKey) -> bool {
        source.is_assignable_to(self)
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeKey").field(&self.name).finish()
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A value whose runtime type can be inspected for capability matching.
///
/// Implemented for every sized [`Kind`]; there is no need to implement it by hand.
pub trait Typed: Any + Send + Sync {
    /// Runtime type of this value.
    fn type_key(&self) -> TypeKey;

    fn as_any(&self) -> &dyn Any;
}

impl<T: Kind + Send + Sync> Typed for T {
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl dyn Typed {
    /// Downcast to a concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

impl fmt::Debug for dyn Typed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Typed({})", self.type_key())
    }
}

/// Access mode of a file-backed data handle.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AccessMode {
    /// Read-only; the file must exist.
    #[strum(serialize = "r")]
    #[serde(rename = "r")]
    Read,
    /// Read-write; the file is created when missing.
    #[default]
    #[strum(serialize = "rw")]
    #[serde(rename = "rw")]
    ReadWrite,
}

impl AccessMode {
    pub fn is_writable(self) -> bool {
        matches!(self, AccessMode::ReadWrite)
    }
}
