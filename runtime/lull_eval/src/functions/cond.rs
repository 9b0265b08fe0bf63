//! Branching and boolean logic.
//!
//! `cond`, `if`, `and` and `or` are lazy: they evaluate predicates in order
//! and only the branch that is taken. A `return` inside a branch is handed
//! back still wrapped so it exits the enclosing body.

use lull_ir::ScriptValue;

use super::{define, is_truthy};
use crate::errors::{wrong_arg_type, ScriptResult};
use crate::frame::{describe, ScriptFrame};
use crate::globals::SharedGlobals;

pub(super) fn install(globals: &SharedGlobals) {
    define(globals, "cond", cond);
    define(globals, "if", if_);
    define(globals, "and", and);
    define(globals, "or", or);
    define(globals, "not", not);
}

/// `(cond (predicate body...) ...)`
fn cond(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    while frame.has_next() {
        let position = frame.position();
        let clause = frame.next();
        let Some(clause) = clause.as_cons() else {
            return Err(wrong_arg_type(frame.name(), position, "clause list", &describe(&clause)));
        };
        let predicate = frame.env().eval(&clause.head)?;
        if is_truthy(&predicate) {
            let value = frame.env().eval_sequence(&clause.rest)?;
            frame.return_value(value);
            return Ok(());
        }
    }
    Ok(())
}

/// `(if predicate then [else])`
fn if_(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let predicate = frame.try_eval_next()?;
    if !frame.has_next() {
        return Err(frame.error("if requires a branch"));
    }
    let then = frame.next();
    let branch = if is_truthy(&predicate) {
        then
    } else if frame.has_next() {
        frame.next()
    } else {
        ScriptValue::Nil
    };
    frame.finish(3)?;
    let value = frame.env().eval(&branch)?;
    frame.return_value(value);
    Ok(())
}

/// `(and values...)`: the first falsy value, else the last; `true` when empty.
fn and(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let mut value = ScriptValue::new(true);
    while frame.has_next() {
        value = frame.eval_next()?;
        if !is_truthy(&value) {
            break;
        }
    }
    frame.return_value(value);
    Ok(())
}

/// `(or values...)`: the first truthy value, else the last; `false` when empty.
fn or(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let mut value = ScriptValue::new(false);
    while frame.has_next() {
        value = frame.eval_next()?;
        if is_truthy(&value) {
            break;
        }
    }
    frame.return_value(value);
    Ok(())
}

fn not(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let value = frame.try_eval_next()?;
    frame.finish(1)?;
    frame.return_value(ScriptValue::new(!is_truthy(&value)));
    Ok(())
}
