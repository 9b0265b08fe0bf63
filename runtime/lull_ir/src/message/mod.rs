//! Typed event payloads.
//!
//! A `Message` has a `TypeId` plus a payload in one of two forms:
//!
//! - **Concrete**: a native record, stored type-erased.
//! - **Dynamic**: a `VarTable` of fields, as built by scripts.
//!
//! Readers may ask for either form. A concrete payload is flattened into a
//! table on demand through `Record::to_table`; a dynamic payload is rebuilt
//! into the record with `Record::from_table`. Fields can only be written on
//! dynamic messages.

use std::any::Any;
use std::borrow::Cow;

use crate::hash::HashValue;
use crate::type_id::TypeId;
use crate::var::{Var, VarTable};

/// A native struct that can be flattened into a `VarTable` and rebuilt from
/// one.
pub trait Record: Sized {
    fn to_table(&self) -> VarTable;
    fn from_table(table: &VarTable) -> Option<Self>;
}

/// Erased view of a concrete record payload.
trait RecordPayload: Any {
    fn clone_record(&self) -> Box<dyn RecordPayload>;
    fn to_table(&self) -> VarTable;
    fn as_any(&self) -> &dyn Any;
}

impl<T: Record + Clone + Any> RecordPayload for T {
    fn clone_record(&self) -> Box<dyn RecordPayload> {
        Box::new(self.clone())
    }

    fn to_table(&self) -> VarTable {
        Record::to_table(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

enum Payload {
    Concrete(Box<dyn RecordPayload>),
    Dynamic(VarTable),
}

impl Clone for Payload {
    fn clone(&self) -> Self {
        match self {
            Payload::Concrete(record) => Payload::Concrete(RecordPayload::clone_record(&**record)),
            Payload::Dynamic(table) => Payload::Dynamic(table.clone()),
        }
    }
}

/// A typed payload broadcast between modules or handed to scripts.
#[derive(Clone)]
pub struct Message {
    type_id: TypeId,
    payload: Payload,
}

impl Message {
    /// Wrap a native record. The message type is the record's `TypeId`.
    pub fn new<T: Record + Clone + Any>(record: T) -> Self {
        Message {
            type_id: TypeId::of::<T>(),
            payload: Payload::Concrete(Box::new(record)),
        }
    }

    /// A dynamic message of the given type with the given fields.
    pub fn dynamic(type_id: TypeId, values: VarTable) -> Self {
        Message {
            type_id,
            payload: Payload::Dynamic(values),
        }
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn is_dynamic(&self) -> bool {
        matches!(self.payload, Payload::Dynamic(_))
    }

    /// Borrow the concrete record, if this message holds one of type `T`.
    pub fn get<T: Any>(&self) -> Option<&T> {
        match &self.payload {
            Payload::Concrete(record) => RecordPayload::as_any(&**record).downcast_ref::<T>(),
            Payload::Dynamic(_) => None,
        }
    }

    /// Read the payload as a `T`, rebuilding it from fields if the message is
    /// dynamic. `None` if the message type is not `T`'s.
    pub fn to_record<T: Record + Clone + Any>(&self) -> Option<T> {
        if self.type_id != TypeId::of::<T>() {
            return None;
        }
        match &self.payload {
            Payload::Concrete(_) => self.get::<T>().cloned(),
            Payload::Dynamic(table) => T::from_table(table),
        }
    }

    /// The payload as a field table, flattening a concrete record.
    pub fn values(&self) -> Cow<'_, VarTable> {
        match &self.payload {
            Payload::Concrete(record) => Cow::Owned(record.to_table()),
            Payload::Dynamic(table) => Cow::Borrowed(table),
        }
    }

    /// Associate `value` with `key`. Returns `false`, leaving the message
    /// unchanged, if it wraps a concrete record; those are read-only.
    #[must_use = "setting a field on a concrete record is refused"]
    pub fn set_value<T: Any + Clone>(&mut self, key: HashValue, value: T) -> bool {
        match &mut self.payload {
            Payload::Dynamic(table) => {
                table.set(key, value);
                true
            }
            Payload::Concrete(_) => false,
        }
    }

    /// The field at `key`, if present.
    pub fn value(&self, key: HashValue) -> Option<Var> {
        match &self.payload {
            Payload::Dynamic(table) => table.try_find(key).cloned(),
            Payload::Concrete(record) => record.to_table().remove(key),
        }
    }

    /// The field at `key` as a `T`, or `default` if absent or of another type.
    pub fn value_or<T: Any + Clone>(&self, key: HashValue, default: T) -> T {
        self.value(key)
            .and_then(|var| var.get::<T>().cloned())
            .unwrap_or(default)
    }

    pub fn has_value(&self, key: HashValue) -> bool {
        self.value(key).is_some()
    }
}

impl std::fmt::Debug for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Message")
            .field("type_id", &self.type_id)
            .field("dynamic", &self.is_dynamic())
            .finish()
    }
}

#[cfg(test)]
mod tests;
