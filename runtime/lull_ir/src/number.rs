//! Numeric view over a `Var`.
//!
//! Scripts mix integer widths and float precisions freely. `Number` reads any
//! primitive numeric payload, and `promote` lifts two numbers to a common
//! representation before arithmetic or comparison:
//!
//! - same variant: unchanged
//! - any float: the wider float (`f64` beats `f32`)
//! - mixed integers: `i64` if either side is signed, otherwise `u64`

use crate::var::Var;

/// A primitive numeric value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Number {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
}

macro_rules! read_number {
    ($var:expr, $($variant:ident => $ty:ty),* $(,)?) => {
        $(
            if let Some(value) = $var.get::<$ty>() {
                return Some(Number::$variant(*value));
            }
        )*
    };
}

impl Number {
    /// Read a numeric payload; `None` for anything else.
    pub fn from_var(var: &Var) -> Option<Number> {
        read_number!(
            var,
            I32 => i32,
            F32 => f32,
            F64 => f64,
            I64 => i64,
            U32 => u32,
            U64 => u64,
            I8 => i8,
            I16 => i16,
            U8 => u8,
            U16 => u16,
        );
        None
    }

    /// Store back into a `Var` with the variant's native type.
    pub fn into_var(self) -> Var {
        match self {
            Number::I8(v) => Var::new(v),
            Number::I16(v) => Var::new(v),
            Number::I32(v) => Var::new(v),
            Number::I64(v) => Var::new(v),
            Number::U8(v) => Var::new(v),
            Number::U16(v) => Var::new(v),
            Number::U32(v) => Var::new(v),
            Number::U64(v) => Var::new(v),
            Number::F32(v) => Var::new(v),
            Number::F64(v) => Var::new(v),
        }
    }

    /// Integer value widened to `i128`; `None` for floats.
    pub fn as_i128(self) -> Option<i128> {
        match self {
            Number::I8(v) => Some(i128::from(v)),
            Number::I16(v) => Some(i128::from(v)),
            Number::I32(v) => Some(i128::from(v)),
            Number::I64(v) => Some(i128::from(v)),
            Number::U8(v) => Some(i128::from(v)),
            Number::U16(v) => Some(i128::from(v)),
            Number::U32(v) => Some(i128::from(v)),
            Number::U64(v) => Some(i128::from(v)),
            Number::F32(_) | Number::F64(_) => None,
        }
    }

    #[inline]
    pub fn is_float(self) -> bool {
        matches!(self, Number::F32(_) | Number::F64(_))
    }

    #[inline]
    pub fn is_signed(self) -> bool {
        matches!(
            self,
            Number::I8(_) | Number::I16(_) | Number::I32(_) | Number::I64(_)
        )
    }

    /// Lift both operands to a shared variant.
    pub fn promote(lhs: Number, rhs: Number) -> (Number, Number) {
        if std::mem::discriminant(&lhs) == std::mem::discriminant(&rhs) {
            return (lhs, rhs);
        }
        if lhs.is_float() || rhs.is_float() {
            if matches!(lhs, Number::F64(_)) || matches!(rhs, Number::F64(_)) {
                return (Number::F64(lhs.cast()), Number::F64(rhs.cast()));
            }
            return (Number::F32(lhs.cast()), Number::F32(rhs.cast()));
        }
        if lhs.is_signed() || rhs.is_signed() {
            return (Number::I64(lhs.cast()), Number::I64(rhs.cast()));
        }
        (Number::U64(lhs.cast()), Number::U64(rhs.cast()))
    }

    /// C-style conversion: truncates floats, wraps integers.
    #[inline]
    pub fn cast<T: NumericCast>(self) -> T {
        T::cast_from(self)
    }
}

/// Primitive types reachable through an explicit cast.
pub trait NumericCast: Sized {
    fn cast_from(number: Number) -> Self;
}

macro_rules! impl_numeric_cast {
    ($($ty:ty),*) => {
        $(
            impl NumericCast for $ty {
                #[allow(
                    clippy::unnecessary_cast,
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_possible_wrap,
                    clippy::cast_precision_loss,
                    clippy::cast_lossless,
                    reason = "explicit casts follow `as` semantics"
                )]
                fn cast_from(number: Number) -> Self {
                    match number {
                        Number::I8(v) => v as $ty,
                        Number::I16(v) => v as $ty,
                        Number::I32(v) => v as $ty,
                        Number::I64(v) => v as $ty,
                        Number::U8(v) => v as $ty,
                        Number::U16(v) => v as $ty,
                        Number::U32(v) => v as $ty,
                        Number::U64(v) => v as $ty,
                        Number::F32(v) => v as $ty,
                        Number::F64(v) => v as $ty,
                    }
                }
            }
        )*
    };
}

impl_numeric_cast!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);
