//! Array built-ins.
//!
//! Arrays are `VarArray` values. The mutating forms update the array in
//! place, so every binding that shares the value sees the change.

use lull_ir::{ScriptValue, Var, VarArray};

use super::{define, eval_rest};
use crate::errors::{custom, wrong_arg_type, ScriptError, ScriptResult};
use crate::frame::{describe, ScriptFrame};
use crate::globals::SharedGlobals;

pub(super) fn install(globals: &SharedGlobals) {
    define(globals, lull_parse::ARRAY_CONSTRUCTOR, make_array);
    define(globals, "array-size", array_size);
    define(globals, "array-empty", array_empty);
    define(globals, "array-push", array_push);
    define(globals, "array-pop", array_pop);
    define(globals, "array-insert", array_insert);
    define(globals, "array-erase", array_erase);
    define(globals, "array-set", array_set);
    define(globals, "array-at", array_at);
    define(globals, "array-foreach", array_foreach);
}

/// Run `f` on an evaluated array argument in place.
fn mutate<R>(
    frame: &ScriptFrame<'_>,
    target: &ScriptValue,
    f: impl FnOnce(&mut VarArray) -> R,
) -> ScriptResult<R> {
    let result = match target {
        ScriptValue::Value(cell) => cell.borrow_mut().get_mut::<VarArray>().map(f),
        _ => None,
    };
    result.ok_or_else(|| wrong_arg_type(frame.name(), 0, "array", &describe(target)))
}

/// Evaluate the next argument as an array and run `f` on it.
fn with_array<R>(
    frame: &mut ScriptFrame<'_>,
    f: impl FnOnce(&mut VarArray) -> R,
) -> ScriptResult<R> {
    let target = frame.try_eval_next()?;
    mutate(frame, &target, f)
}

/// Evaluate an index argument; negative indices are errors.
fn index(frame: &mut ScriptFrame<'_>, arity: usize) -> ScriptResult<usize> {
    let index: i64 = frame.arg(arity)?;
    usize::try_from(index).map_err(|_| frame.error(format!("negative index {index}")))
}

fn out_of_range(index: usize, len: usize) -> ScriptError {
    custom(format!("index {index} out of range for array of length {len}"))
}

fn make_array(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let array: VarArray = eval_rest(frame)?.iter().map(ScriptValue::to_var).collect();
    frame.return_value(ScriptValue::new(array));
    Ok(())
}

fn array_size(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let len = with_array(frame, |array| array.len())?;
    frame.finish(1)?;
    frame.return_value(ScriptValue::new(i32::try_from(len).unwrap_or(i32::MAX)));
    Ok(())
}

fn array_empty(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let empty = with_array(frame, |array| array.is_empty())?;
    frame.finish(1)?;
    frame.return_value(ScriptValue::new(empty));
    Ok(())
}

/// `(array-push array value)`, returns the array.
fn array_push(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let target = frame.try_eval_next()?;
    let value: Var = frame.arg(2)?;
    frame.finish(2)?;
    mutate(frame, &target, |array| array.push(value))?;
    frame.return_value(target);
    Ok(())
}

/// `(array-pop array)`, returns the removed element or nil.
fn array_pop(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let popped = with_array(frame, Vec::pop)?;
    frame.finish(1)?;
    frame.return_var(popped.unwrap_or_default());
    Ok(())
}

/// `(array-insert array index value)`; `index` may equal the length.
fn array_insert(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let target = frame.try_eval_next()?;
    let at = index(frame, 3)?;
    let value: Var = frame.arg(3)?;
    frame.finish(3)?;
    mutate(frame, &target, |array| {
        if at > array.len() {
            return Err(array.len());
        }
        array.insert(at, value);
        Ok(())
    })?
    .map_err(|len| out_of_range(at, len))?;
    frame.return_value(target);
    Ok(())
}

/// `(array-erase array index)`, returns the removed element.
fn array_erase(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let target = frame.try_eval_next()?;
    let at = index(frame, 2)?;
    frame.finish(2)?;
    let removed = mutate(frame, &target, |array| {
        if at >= array.len() {
            return Err(array.len());
        }
        Ok(array.remove(at))
    })?
    .map_err(|len| out_of_range(at, len))?;
    frame.return_var(removed);
    Ok(())
}

/// `(array-set array index value)`, returns the value.
fn array_set(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let target = frame.try_eval_next()?;
    let at = index(frame, 3)?;
    let value: Var = frame.arg(3)?;
    frame.finish(3)?;
    mutate(frame, &target, |array| {
        let len = array.len();
        match array.get_mut(at) {
            Some(slot) => {
                *slot = value.clone();
                Ok(())
            }
            None => Err(len),
        }
    })?
    .map_err(|len| out_of_range(at, len))?;
    frame.return_var(value);
    Ok(())
}

fn array_at(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let target = frame.try_eval_next()?;
    let at = index(frame, 2)?;
    frame.finish(2)?;
    let item = mutate(frame, &target, |array| array.get(at).cloned().ok_or(array.len()))?
        .map_err(|len| out_of_range(at, len))?;
    frame.return_var(item);
    Ok(())
}

/// `(array-foreach array fn)`: call `fn` with each element in order.
fn array_foreach(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let items = with_array(frame, |array| array.clone())?;
    let callback = frame.try_eval_next()?;
    frame.finish(2)?;
    let name = frame.name().to_owned();
    for item in items {
        let args = ScriptValue::list([ScriptValue::from_var(item)]);
        frame.env().call_value(&callback, args, &name)?;
    }
    Ok(())
}
