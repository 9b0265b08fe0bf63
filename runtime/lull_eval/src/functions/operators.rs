//! Comparison and arithmetic operators.
//!
//! Numeric operands are lifted to a common representation with
//! [`Number::promote`] before any operation, so `(+ 1 2.5)` is an `f64` and
//! `(< 1u -1)` compares as `i64`. Integer arithmetic wraps; integer division
//! and remainder by zero are script errors. Floats follow IEEE 754.

use std::cmp::Ordering;

use lull_ir::{HashValue, Number, ScriptValue, TypeId, Var};

use super::{define, eval_rest};
use crate::errors::{custom, division_by_zero, wrong_arg_count, wrong_arg_type, ScriptResult};
use crate::frame::ScriptFrame;
use crate::globals::SharedGlobals;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum CompareOp {
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
}

pub(super) fn install(globals: &SharedGlobals) {
    for (name, op) in [
        ("==", CompareOp::Eq),
        ("!=", CompareOp::NotEq),
        ("<", CompareOp::Less),
        ("<=", CompareOp::LessEq),
        (">", CompareOp::Greater),
        (">=", CompareOp::GreaterEq),
    ] {
        define(globals, name, move |frame| compare(frame, op));
    }
    for (name, op) in [
        ("+", ArithOp::Add),
        ("-", ArithOp::Sub),
        ("*", ArithOp::Mul),
        ("/", ArithOp::Div),
        ("%", ArithOp::Rem),
    ] {
        define(globals, name, move |frame| arithmetic(frame, op));
    }
}

fn compare(frame: &mut ScriptFrame<'_>, op: CompareOp) -> ScriptResult<()> {
    let lhs: Var = frame.arg(2)?;
    let rhs: Var = frame.arg(2)?;
    frame.finish(2)?;
    let result = match op {
        CompareOp::Eq => values_equal(&lhs, &rhs),
        CompareOp::NotEq => !values_equal(&lhs, &rhs),
        CompareOp::Less | CompareOp::LessEq | CompareOp::Greater | CompareOp::GreaterEq => {
            let Some(ordering) = order(&lhs, &rhs) else {
                return Err(wrong_arg_type(
                    frame.name(),
                    1,
                    lhs.type_name(),
                    rhs.type_name(),
                ));
            };
            match op {
                CompareOp::Less => ordering == Ordering::Less,
                CompareOp::LessEq => ordering != Ordering::Greater,
                CompareOp::Greater => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            }
        }
    };
    frame.return_value(ScriptValue::new(result));
    Ok(())
}

macro_rules! equal_as {
    ($lhs:expr, $rhs:expr, $($ty:ty),* $(,)?) => {
        $(
            if let (Some(a), Some(b)) = ($lhs.get::<$ty>(), $rhs.get::<$ty>()) {
                return a == b;
            }
        )*
    };
}

/// Numbers compare after promotion and type ids compare with hash literals
/// (`(== (typeof x) :i32)`). Other values compare equal only when they have
/// the same type and an equal payload.
fn values_equal(lhs: &Var, rhs: &Var) -> bool {
    if lhs.is_empty() || rhs.is_empty() {
        return lhs.is_empty() && rhs.is_empty();
    }
    if let (Some(a), Some(b)) = (Number::from_var(lhs), Number::from_var(rhs)) {
        return compare_numbers(a, b) == Some(Ordering::Equal);
    }
    if let (Some(a), Some(b)) = (as_hash(lhs), as_hash(rhs)) {
        return a == b;
    }
    equal_as!(lhs, rhs, bool, String);
    false
}

fn as_hash(var: &Var) -> Option<HashValue> {
    var.get::<HashValue>()
        .copied()
        .or_else(|| var.get::<TypeId>().map(|type_id| type_id.hash()))
}

fn order(lhs: &Var, rhs: &Var) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (Number::from_var(lhs), Number::from_var(rhs)) {
        return compare_numbers(a, b);
    }
    match (lhs.get::<String>(), rhs.get::<String>()) {
        (Some(a), Some(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn compare_numbers(lhs: Number, rhs: Number) -> Option<Ordering> {
    let (lhs, rhs) = Number::promote(lhs, rhs);
    match (lhs.as_i128(), rhs.as_i128()) {
        (Some(a), Some(b)) => Some(a.cmp(&b)),
        _ => lhs.cast::<f64>().partial_cmp(&rhs.cast::<f64>()),
    }
}

/// Left fold over two or more operands. `+` also joins strings.
fn arithmetic(frame: &mut ScriptFrame<'_>, op: ArithOp) -> ScriptResult<()> {
    let values = eval_rest(frame)?;
    if values.len() < 2 {
        return Err(wrong_arg_count(frame.name(), 2, values.len()));
    }
    if op == ArithOp::Add && values.iter().all(|value| value.is::<String>()) {
        let joined: String = values.iter().map(ToString::to_string).collect();
        frame.return_value(ScriptValue::new(joined));
        return Ok(());
    }
    let mut numbers = Vec::with_capacity(values.len());
    for (position, value) in values.iter().enumerate() {
        let var = value.to_var();
        let Some(number) = Number::from_var(&var) else {
            return Err(wrong_arg_type(frame.name(), position, "number", var.type_name()));
        };
        numbers.push(number);
    }
    let mut acc = numbers[0];
    for &rhs in &numbers[1..] {
        acc = apply(op, acc, rhs)?;
    }
    frame.return_var(acc.into_var());
    Ok(())
}

macro_rules! int_arith {
    ($op:expr, $a:expr, $b:expr) => {
        match $op {
            ArithOp::Add => $a.wrapping_add($b),
            ArithOp::Sub => $a.wrapping_sub($b),
            ArithOp::Mul => $a.wrapping_mul($b),
            ArithOp::Div if $b == 0 => return Err(division_by_zero()),
            ArithOp::Div => $a.wrapping_div($b),
            ArithOp::Rem if $b == 0 => return Err(division_by_zero()),
            ArithOp::Rem => $a.wrapping_rem($b),
        }
    };
}

macro_rules! float_arith {
    ($op:expr, $a:expr, $b:expr) => {
        match $op {
            ArithOp::Add => $a + $b,
            ArithOp::Sub => $a - $b,
            ArithOp::Mul => $a * $b,
            ArithOp::Div => $a / $b,
            ArithOp::Rem => $a % $b,
        }
    };
}

fn apply(op: ArithOp, lhs: Number, rhs: Number) -> ScriptResult<Number> {
    let result = match Number::promote(lhs, rhs) {
        (Number::I8(a), Number::I8(b)) => Number::I8(int_arith!(op, a, b)),
        (Number::I16(a), Number::I16(b)) => Number::I16(int_arith!(op, a, b)),
        (Number::I32(a), Number::I32(b)) => Number::I32(int_arith!(op, a, b)),
        (Number::I64(a), Number::I64(b)) => Number::I64(int_arith!(op, a, b)),
        (Number::U8(a), Number::U8(b)) => Number::U8(int_arith!(op, a, b)),
        (Number::U16(a), Number::U16(b)) => Number::U16(int_arith!(op, a, b)),
        (Number::U32(a), Number::U32(b)) => Number::U32(int_arith!(op, a, b)),
        (Number::U64(a), Number::U64(b)) => Number::U64(int_arith!(op, a, b)),
        (Number::F32(a), Number::F32(b)) => Number::F32(float_arith!(op, a, b)),
        (Number::F64(a), Number::F64(b)) => Number::F64(float_arith!(op, a, b)),
        (lhs, rhs) => return Err(custom(format!("cannot combine {lhs:?} and {rhs:?}"))),
    };
    Ok(result)
}
