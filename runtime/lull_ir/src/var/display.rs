//! Human-readable rendering of `Var` contents.
//!
//! Used by the print form and error context. Types outside the built-in set
//! render as `<type name>`.

use std::fmt;

use super::{Var, VarArray, VarTable};
use crate::hash::HashValue;
use crate::message::Message;
use crate::type_id::TypeId;

macro_rules! try_display {
    ($var:expr, $f:expr, $($ty:ty),* $(,)?) => {
        $(
            if let Some(value) = $var.get::<$ty>() {
                return write!($f, "{value}");
            }
        )*
    };
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("nil");
        }
        try_display!(
            self, f, i32, f32, bool, String, i8, i16, i64, u8, u16, u32, u64, f64, HashValue,
            TypeId,
        );
        if let Some(array) = self.get::<VarArray>() {
            return write_array(f, array);
        }
        if let Some(table) = self.get::<VarTable>() {
            return write_table(f, table);
        }
        if let Some(message) = self.get::<Message>() {
            return write!(f, "msg({})", message.type_id());
        }
        write!(f, "<{}>", self.type_name)
    }
}

fn write_array(f: &mut fmt::Formatter<'_>, array: &VarArray) -> fmt::Result {
    f.write_str("[")?;
    for (i, item) in array.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str("]")
}

fn write_table(f: &mut fmt::Formatter<'_>, table: &VarTable) -> fmt::Result {
    f.write_str("{")?;
    for (i, key) in table.sorted_keys().into_iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        if let Some(value) = table.try_find(key) {
            write!(f, "{key}:{value}")?;
        }
    }
    f.write_str("}")
}
