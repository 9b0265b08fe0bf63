//! Explicit numeric casts and type queries.

use lull_ir::{hash, HashValue, Number, NumericCast, ScriptValue, TypeId, Var};

use super::define;
use crate::errors::{wrong_arg_type, ScriptResult};
use crate::frame::ScriptFrame;
use crate::globals::SharedGlobals;

pub(super) fn install(globals: &SharedGlobals) {
    define(globals, "int8", cast::<i8>);
    define(globals, "int16", cast::<i16>);
    define(globals, "int32", cast::<i32>);
    define(globals, "int64", cast::<i64>);
    define(globals, "uint8", cast::<u8>);
    define(globals, "uint16", cast::<u16>);
    define(globals, "uint32", cast::<u32>);
    define(globals, "uint64", cast::<u64>);
    define(globals, "float", cast::<f32>);
    define(globals, "double", cast::<f64>);
    define(globals, "is?", is_type);
    define(globals, "nil?", is_nil);
    define(globals, "typeof", type_of);
    define(globals, "hash", hash_of);
}

/// `(int8 x)` and friends: C-style conversion, truncating floats.
fn cast<T: NumericCast + Clone + 'static>(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let value: Var = frame.arg(1)?;
    frame.finish(1)?;
    let Some(number) = Number::from_var(&value) else {
        return Err(wrong_arg_type(frame.name(), 0, "number", value.type_name()));
    };
    frame.return_value(ScriptValue::new(number.cast::<T>()));
    Ok(())
}

/// `(is? value :type)`: compare the value's type against a type hash.
fn is_type(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let value: Var = frame.arg(2)?;
    let expected: Var = frame.arg(2)?;
    frame.finish(2)?;
    let expected = match (expected.get::<TypeId>(), expected.get::<HashValue>()) {
        (Some(type_id), _) => *type_id,
        (None, Some(id)) => TypeId::from_hash(*id),
        (None, None) => {
            return Err(wrong_arg_type(frame.name(), 1, "type hash", expected.type_name()));
        }
    };
    frame.return_value(ScriptValue::new(value.type_id() == expected));
    Ok(())
}

fn is_nil(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let value = frame.try_eval_next()?;
    frame.finish(1)?;
    frame.return_value(ScriptValue::new(value.is_nil()));
    Ok(())
}

fn type_of(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let value = frame.try_eval_next()?;
    frame.finish(1)?;
    frame.return_value(ScriptValue::new(value.type_id()));
    Ok(())
}

/// `(hash 'text')`; a hash passes through unchanged.
fn hash_of(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let value: Var = frame.arg(1)?;
    frame.finish(1)?;
    let id = if let Some(text) = value.get::<String>() {
        hash(text)
    } else if let Some(id) = value.get::<HashValue>() {
        *id
    } else {
        return Err(wrong_arg_type(frame.name(), 0, "string", value.type_name()));
    };
    frame.return_value(ScriptValue::new(id));
    Ok(())
}
