//! Conversions between `Var` and native types.
//!
//! `FromVar` is the argument side of native binding, `IntoVar` the return
//! side. Conversion order for `FromVar`:
//!
//! 1. Exact type match.
//! 2. Integer to integer, only when the value fits the target.
//! 3. Integer to floating point, and `f32` to `f64`.
//!
//! Floating to integer is never implicit; the explicit cast functions
//! (`NumericCast`) handle that.
//!
//! Host types opt in with [`impl_var_value!`](crate::impl_var_value), which
//! gives exact-match conversion in both directions.

use rustc_hash::FxHashMap;

use crate::hash::HashValue;
use crate::message::Message;
use crate::number::Number;
use crate::type_id::TypeId;
use crate::var::{Var, VarArray, VarTable};

/// Extract a native value from a `Var`.
pub trait FromVar: Sized {
    /// `None` when the held value has no conversion to `Self`.
    fn from_var(var: &Var) -> Option<Self>;

    /// Name reported in type-mismatch diagnostics.
    fn expected_type() -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Wrap a native value in a `Var`.
pub trait IntoVar {
    fn into_var(self) -> Var;
}

/// Implement exact-match `FromVar` and `IntoVar` for host types.
///
/// ```
/// #[derive(Clone)]
/// struct Health(u32);
/// lull_ir::impl_var_value!(Health);
/// ```
#[macro_export]
macro_rules! impl_var_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::FromVar for $ty {
                fn from_var(var: &$crate::Var) -> ::std::option::Option<Self> {
                    var.get::<$ty>().cloned()
                }
            }

            impl $crate::IntoVar for $ty {
                fn into_var(self) -> $crate::Var {
                    $crate::Var::new(self)
                }
            }
        )*
    };
}

impl_var_value!(bool, String, HashValue, TypeId, VarTable, Message);

macro_rules! impl_integer {
    ($($ty:ty),*) => {
        $(
            impl FromVar for $ty {
                fn from_var(var: &Var) -> Option<Self> {
                    if let Some(value) = var.get::<$ty>() {
                        return Some(*value);
                    }
                    Number::from_var(var)?
                        .as_i128()
                        .and_then(|wide| <$ty>::try_from(wide).ok())
                }
            }

            impl IntoVar for $ty {
                fn into_var(self) -> Var {
                    Var::new(self)
                }
            }
        )*
    };
}

impl_integer!(i8, i16, i32, i64, u8, u16, u32, u64);

impl FromVar for f32 {
    #[expect(
        clippy::cast_precision_loss,
        reason = "integer to float widening is part of the conversion table"
    )]
    fn from_var(var: &Var) -> Option<Self> {
        match Number::from_var(var)? {
            Number::F32(value) => Some(value),
            Number::F64(_) => None,
            other => other.as_i128().map(|wide| wide as f32),
        }
    }
}

impl FromVar for f64 {
    #[expect(
        clippy::cast_precision_loss,
        reason = "integer to float widening is part of the conversion table"
    )]
    fn from_var(var: &Var) -> Option<Self> {
        match Number::from_var(var)? {
            Number::F32(value) => Some(f64::from(value)),
            Number::F64(value) => Some(value),
            other => other.as_i128().map(|wide| wide as f64),
        }
    }
}

impl IntoVar for f32 {
    fn into_var(self) -> Var {
        Var::new(self)
    }
}

impl IntoVar for f64 {
    fn into_var(self) -> Var {
        Var::new(self)
    }
}

impl IntoVar for &str {
    fn into_var(self) -> Var {
        Var::new(self.to_owned())
    }
}

impl IntoVar for () {
    fn into_var(self) -> Var {
        Var::empty()
    }
}

impl FromVar for Var {
    fn from_var(var: &Var) -> Option<Self> {
        Some(var.clone())
    }
}

impl IntoVar for Var {
    fn into_var(self) -> Var {
        self
    }
}

/// An empty `Var` converts to `None`; anything else must convert to `T`.
impl<T: FromVar> FromVar for Option<T> {
    fn from_var(var: &Var) -> Option<Self> {
        if var.is_empty() {
            return Some(None);
        }
        T::from_var(var).map(Some)
    }

    fn expected_type() -> &'static str {
        T::expected_type()
    }
}

impl<T: IntoVar> IntoVar for Option<T> {
    fn into_var(self) -> Var {
        self.map_or_else(Var::empty, IntoVar::into_var)
    }
}

/// Every element of a `VarArray` must convert.
impl<T: FromVar> FromVar for Vec<T> {
    fn from_var(var: &Var) -> Option<Self> {
        var.get::<VarArray>()?.iter().map(T::from_var).collect()
    }
}

impl<T: IntoVar> IntoVar for Vec<T> {
    fn into_var(self) -> Var {
        let array: VarArray = self.into_iter().map(IntoVar::into_var).collect();
        Var::new(array)
    }
}

impl<T: FromVar> FromVar for FxHashMap<HashValue, T> {
    fn from_var(var: &Var) -> Option<Self> {
        let table = var.get::<VarTable>()?;
        table
            .iter()
            .map(|(key, value)| T::from_var(value).map(|value| (key, value)))
            .collect()
    }
}

impl<T: IntoVar> IntoVar for FxHashMap<HashValue, T> {
    fn into_var(self) -> Var {
        let table: VarTable = self
            .into_iter()
            .map(|(key, value)| (key, value.into_var()))
            .collect();
        Var::new(table)
    }
}
