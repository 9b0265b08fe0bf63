//! Map built-ins.
//!
//! Maps are `VarTable` values keyed by `HashValue`. Keys may be written as
//! hash literals (`:name`) or strings, which are hashed on the way in.
//! Iteration visits keys in ascending hash order.

use lull_ir::{hash, HashValue, ScriptValue, Var, VarTable};

use super::{define, eval_rest};
use crate::errors::{wrong_arg_type, ScriptResult};
use crate::frame::{describe, ScriptFrame};
use crate::globals::SharedGlobals;

pub(super) fn install(globals: &SharedGlobals) {
    define(globals, lull_parse::MAP_CONSTRUCTOR, make_map);
    define(globals, "map-size", map_size);
    define(globals, "map-empty", map_empty);
    define(globals, "map-insert", map_insert);
    define(globals, "map-erase", map_erase);
    define(globals, "map-get", map_get);
    define(globals, "map-get-or", map_get_or);
    define(globals, "map-set", map_set);
    define(globals, "map-foreach", map_foreach);
}

/// Read a key: a hash literal or a string.
pub(super) fn key_of(name: &str, position: usize, key: &Var) -> ScriptResult<HashValue> {
    if let Some(id) = key.get::<HashValue>() {
        return Ok(*id);
    }
    if let Some(text) = key.get::<String>() {
        return Ok(hash(text));
    }
    Err(wrong_arg_type(name, position, "key", key.type_name()))
}

/// Build a table from alternating key/value expressions.
pub(super) fn read_pairs(frame: &mut ScriptFrame<'_>) -> ScriptResult<VarTable> {
    let values = eval_rest(frame)?;
    if values.len() % 2 != 0 {
        return Err(frame.error("expected key/value pairs"));
    }
    let mut table = VarTable::new();
    for (position, pair) in values.chunks_exact(2).enumerate() {
        let key = key_of(frame.name(), position * 2, &pair[0].to_var())?;
        table.insert(key, pair[1].to_var());
    }
    Ok(table)
}

fn mutate<R>(
    frame: &ScriptFrame<'_>,
    target: &ScriptValue,
    f: impl FnOnce(&mut VarTable) -> R,
) -> ScriptResult<R> {
    let result = match target {
        ScriptValue::Value(cell) => cell.borrow_mut().get_mut::<VarTable>().map(f),
        _ => None,
    };
    result.ok_or_else(|| wrong_arg_type(frame.name(), 0, "map", &describe(target)))
}

fn with_map<R>(frame: &mut ScriptFrame<'_>, f: impl FnOnce(&mut VarTable) -> R) -> ScriptResult<R> {
    let target = frame.try_eval_next()?;
    mutate(frame, &target, f)
}

fn next_key(frame: &mut ScriptFrame<'_>, arity: usize) -> ScriptResult<HashValue> {
    let position = frame.position();
    let key: Var = frame.arg(arity)?;
    key_of(frame.name(), position, &key)
}

fn make_map(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let table = read_pairs(frame)?;
    frame.return_value(ScriptValue::new(table));
    Ok(())
}

fn map_size(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let len = with_map(frame, |table| table.len())?;
    frame.finish(1)?;
    frame.return_value(ScriptValue::new(i32::try_from(len).unwrap_or(i32::MAX)));
    Ok(())
}

fn map_empty(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let empty = with_map(frame, |table| table.is_empty())?;
    frame.finish(1)?;
    frame.return_value(ScriptValue::new(empty));
    Ok(())
}

/// `(map-insert map key value)`: add only if absent. Returns whether it did.
fn map_insert(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let target = frame.try_eval_next()?;
    let key = next_key(frame, 3)?;
    let value: Var = frame.arg(3)?;
    frame.finish(3)?;
    let inserted = mutate(frame, &target, |table| {
        if table.contains(key) {
            return false;
        }
        table.insert(key, value);
        true
    })?;
    frame.return_value(ScriptValue::new(inserted));
    Ok(())
}

/// `(map-set map key value)`: add or overwrite. Returns the value.
fn map_set(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let target = frame.try_eval_next()?;
    let key = next_key(frame, 3)?;
    let value: Var = frame.arg(3)?;
    frame.finish(3)?;
    mutate(frame, &target, |table| table.insert(key, value.clone()))?;
    frame.return_var(value);
    Ok(())
}

/// `(map-erase map key)`: returns whether the key was present.
fn map_erase(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let target = frame.try_eval_next()?;
    let key = next_key(frame, 2)?;
    frame.finish(2)?;
    let removed = mutate(frame, &target, |table| table.remove(key).is_some())?;
    frame.return_value(ScriptValue::new(removed));
    Ok(())
}

/// `(map-get map key)`: the value, or nil when absent.
fn map_get(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let target = frame.try_eval_next()?;
    let key = next_key(frame, 2)?;
    frame.finish(2)?;
    let value = mutate(frame, &target, |table| table.try_find(key).cloned())?;
    frame.return_var(value.unwrap_or_default());
    Ok(())
}

/// `(map-get-or map key default)`
fn map_get_or(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let target = frame.try_eval_next()?;
    let key = next_key(frame, 3)?;
    let default: Var = frame.arg(3)?;
    frame.finish(3)?;
    let value = mutate(frame, &target, |table| table.try_find(key).cloned())?;
    frame.return_var(value.unwrap_or(default));
    Ok(())
}

/// `(map-foreach map fn)`: call `fn` with each key and value.
fn map_foreach(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let entries = with_map(frame, |table| {
        table
            .sorted_keys()
            .into_iter()
            .filter_map(|key| table.try_find(key).map(|value| (key, value.clone())))
            .collect::<Vec<_>>()
    })?;
    let callback = frame.try_eval_next()?;
    frame.finish(2)?;
    let name = frame.name().to_owned();
    for (key, value) in entries {
        let args = ScriptValue::list([ScriptValue::new(key), ScriptValue::from_var(value)]);
        frame.env().call_value(&callback, args, &name)?;
    }
    Ok(())
}
