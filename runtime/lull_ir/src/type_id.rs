//! Type identity for values stored in a `Var`.
//!
//! A `TypeId` is the `HashValue` of the Rust type name, so it is stable for a
//! given build and can be compared against pre-hashed script literals
//! (`(is? 1 :i32)`).

use std::fmt;

use crate::hash::{hash, HashValue};

/// Hashed identity of a native type. `TypeId::NONE` marks an empty value.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
#[repr(transparent)]
pub struct TypeId(HashValue);

impl TypeId {
    /// Identity of "no type", carried by empty containers.
    pub const NONE: TypeId = TypeId(HashValue::EMPTY);

    /// Identity of `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        TypeId(hash(std::any::type_name::<T>()))
    }

    /// Wrap an arbitrary hash as a type identity (dynamic message types).
    #[inline]
    pub const fn from_hash(value: HashValue) -> Self {
        TypeId(value)
    }

    /// The underlying hash.
    #[inline]
    pub const fn hash(self) -> HashValue {
        self.0
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({:#010x})", self.0.raw())
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<HashValue> for TypeId {
    fn from(value: HashValue) -> Self {
        TypeId(value)
    }
}
