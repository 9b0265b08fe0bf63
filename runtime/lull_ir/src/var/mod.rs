//! Type-erased value container.
//!
//! A `Var` owns at most one value of a type fixed at construction, together
//! with that type's `TypeId`. Copy, move and destroy are dispatched through a
//! small closed interface (`Payload`) implemented once for every `Clone`
//! type, so the container itself never needs to know what it holds.
//!
//! # Semantics
//!
//! - `Var::default()` is empty: no payload, `TypeId::NONE`.
//! - `get::<T>()` succeeds only for the exact stored type. No conversion is
//!   attempted here; see `FromVar` for the conversion table.
//! - `clone()` deep-copies the payload.
//! - `take()` transfers the payload out and leaves the source empty.

use std::any::Any;
use std::fmt;

use rustc_hash::FxHashMap;

use crate::hash::HashValue;
use crate::type_id::TypeId;

mod display;

/// Operations a stored value must support.
///
/// Blanket-implemented for every `Any + Clone` type; there is no reason to
/// implement it by hand.
pub trait Payload: Any {
    /// Deep-copy into a new box.
    fn clone_payload(&self) -> Box<dyn Payload>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any + Clone> Payload for T {
    fn clone_payload(&self) -> Box<dyn Payload> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// A value of statically unknown type.
#[derive(Default)]
pub struct Var {
    type_id: TypeId,
    type_name: &'static str,
    payload: Option<Box<dyn Payload>>,
}

/// Ordered list of values.
pub type VarArray = Vec<Var>;

impl Var {
    /// Store `value`.
    pub fn new<T: Any + Clone>(value: T) -> Self {
        Var {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            payload: Some(Box::new(value)),
        }
    }

    /// An empty container.
    #[inline]
    pub fn empty() -> Self {
        Var::default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.payload.is_none()
    }

    /// `TypeId` of the held value, `TypeId::NONE` when empty.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Rust type name of the held value, `"nil"` when empty.
    pub fn type_name(&self) -> &'static str {
        if self.payload.is_some() {
            self.type_name
        } else {
            "nil"
        }
    }

    /// Returns `true` if the held value is exactly a `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.get::<T>().is_some()
    }

    /// Borrow the held value if it is exactly a `T`.
    #[inline]
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.payload.as_deref()?.as_any().downcast_ref::<T>()
    }

    /// Mutably borrow the held value if it is exactly a `T`.
    #[inline]
    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.payload.as_deref_mut()?.as_any_mut().downcast_mut::<T>()
    }

    /// Copy out the held value, or `default` if it is not a `T`.
    pub fn value_or<T: Any + Clone>(&self, default: T) -> T {
        self.get::<T>().cloned().unwrap_or(default)
    }

    /// Replace the held value.
    pub fn set<T: Any + Clone>(&mut self, value: T) {
        *self = Var::new(value);
    }

    /// Drop the held value, leaving the container empty.
    pub fn clear(&mut self) {
        *self = Var::default();
    }

    /// Move the held value out, leaving `self` empty.
    #[inline]
    #[must_use]
    pub fn take(&mut self) -> Var {
        std::mem::take(self)
    }

    /// Unwrap into the concrete value, or give the container back on a type
    /// mismatch.
    pub fn into_inner<T: Any>(self) -> Result<T, Var> {
        if !self.is::<T>() {
            return Err(self);
        }
        match self.payload.map(|payload| payload.into_any().downcast::<T>()) {
            Some(Ok(boxed)) => Ok(*boxed),
            _ => Err(Var::default()),
        }
    }

    /// Number of elements: table entries, array length, 1 for a scalar and 0
    /// when empty.
    pub fn count(&self) -> usize {
        if let Some(table) = self.get::<VarTable>() {
            table.len()
        } else if let Some(array) = self.get::<VarArray>() {
            array.len()
        } else {
            usize::from(!self.is_empty())
        }
    }
}

impl Clone for Var {
    fn clone(&self) -> Self {
        Var {
            type_id: self.type_id,
            type_name: self.type_name,
            payload: self
                .payload
                .as_ref()
                .map(|payload| Payload::clone_payload(&**payload)),
        }
    }
}

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("Var(nil)");
        }
        write!(f, "Var({}: {self})", self.type_name)
    }
}

/// Field table keyed by `HashValue`, used for records and dynamic messages.
#[derive(Clone, Debug, Default)]
pub struct VarTable {
    entries: FxHashMap<HashValue, Var>,
}

impl VarTable {
    pub fn new() -> Self {
        VarTable::default()
    }

    /// Look up `key`, returning `None` when absent.
    #[inline]
    pub fn try_find(&self, key: HashValue) -> Option<&Var> {
        self.entries.get(&key)
    }

    #[inline]
    pub fn try_find_mut(&mut self, key: HashValue) -> Option<&mut Var> {
        self.entries.get_mut(&key)
    }

    /// Insert or replace the value at `key`, returning the previous one.
    pub fn insert(&mut self, key: HashValue, value: Var) -> Option<Var> {
        self.entries.insert(key, value)
    }

    /// Store a concrete value at `key`.
    pub fn set<T: Any + Clone>(&mut self, key: HashValue, value: T) {
        self.entries.insert(key, Var::new(value));
    }

    pub fn remove(&mut self, key: HashValue) -> Option<Var> {
        self.entries.remove(&key)
    }

    #[inline]
    pub fn contains(&self, key: HashValue) -> bool {
        self.entries.contains_key(&key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (HashValue, &Var)> {
        self.entries.iter().map(|(key, value)| (*key, value))
    }

    /// Keys sorted by raw hash, for deterministic traversal.
    pub fn sorted_keys(&self) -> Vec<HashValue> {
        let mut keys: Vec<HashValue> = self.entries.keys().copied().collect();
        keys.sort_unstable();
        keys
    }
}

impl FromIterator<(HashValue, Var)> for VarTable {
    fn from_iter<I: IntoIterator<Item = (HashValue, Var)>>(iter: I) -> Self {
        VarTable {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests;
