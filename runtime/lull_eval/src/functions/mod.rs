//! The built-in function library.
//!
//! Every built-in is a [`NativeFunction`] driven through the frame protocol,
//! installed into each new globals table by [`install`].
//!
//! # Groups
//!
//! - `forms`: binding and sequencing forms (`=`, `var`, `def`, `do`, ...)
//! - `cond`: branching and boolean logic (`cond`, `if`, `and`, `or`, `not`)
//! - `operators`: comparison and arithmetic with numeric promotion
//! - `types`: explicit numeric casts and type queries
//! - `array`, `map`, `message`: container construction and access
//!
//! Special forms pop their arguments raw and evaluate only what they need.
//! Everything else evaluates each argument in order.

mod array;
mod cond;
mod forms;
mod map;
mod message;
mod operators;
mod types;

use lull_ir::ScriptValue;

use crate::callable::NativeFunction;
use crate::errors::ScriptResult;
use crate::frame::ScriptFrame;
use crate::globals::SharedGlobals;

/// Populate `globals` with the built-in library.
pub fn install(globals: &SharedGlobals) {
    forms::install(globals);
    cond::install(globals);
    operators::install(globals);
    types::install(globals);
    array::install(globals);
    map::install(globals);
    message::install(globals);
}

/// Only a boxed boolean `false` is falsy. Nil and zero are truthy.
pub fn is_truthy(value: &ScriptValue) -> bool {
    value.get::<bool>() != Some(false)
}

fn define(
    globals: &SharedGlobals,
    name: &str,
    func: impl Fn(&mut ScriptFrame<'_>) -> ScriptResult<()> + 'static,
) {
    globals.register_native(NativeFunction::new(name, func));
}

/// Evaluate every remaining argument.
fn eval_rest(frame: &mut ScriptFrame<'_>) -> ScriptResult<Vec<ScriptValue>> {
    let mut values = Vec::new();
    while frame.has_next() {
        values.push(frame.eval_next()?);
    }
    Ok(values)
}

#[cfg(test)]
mod tests;
