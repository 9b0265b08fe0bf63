//! Dynamic message built-ins.
//!
//! `(make-msg :type :field value ...)` builds a field-table message whose
//! type is the given hash. Accessors also read native record messages
//! handed in by the host.

use lull_ir::{HashValue, Message, ScriptValue, TypeId, Var};

use super::define;
use super::map::{key_of, read_pairs};
use crate::errors::{wrong_arg_type, ScriptResult};
use crate::frame::ScriptFrame;
use crate::globals::SharedGlobals;

pub(super) fn install(globals: &SharedGlobals) {
    define(globals, "make-msg", make_msg);
    define(globals, "msg-type", msg_type);
    define(globals, "msg-get", msg_get);
    define(globals, "msg-get-or", msg_get_or);
}

fn make_msg(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let type_var: Var = frame.arg(1)?;
    let type_id = TypeId::from_hash(key_of(frame.name(), 0, &type_var)?);
    let values = read_pairs(frame)?;
    frame.return_value(ScriptValue::new(Message::dynamic(type_id, values)));
    Ok(())
}

fn next_message(frame: &mut ScriptFrame<'_>, arity: usize) -> ScriptResult<Message> {
    let position = frame.position();
    let value: Var = frame.arg(arity)?;
    value
        .get::<Message>()
        .cloned()
        .ok_or_else(|| wrong_arg_type(frame.name(), position, "message", value.type_name()))
}

fn next_field(frame: &mut ScriptFrame<'_>, arity: usize) -> ScriptResult<HashValue> {
    let position = frame.position();
    let key: Var = frame.arg(arity)?;
    key_of(frame.name(), position, &key)
}

fn msg_type(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let message = next_message(frame, 1)?;
    frame.finish(1)?;
    frame.return_value(ScriptValue::new(message.type_id()));
    Ok(())
}

/// `(msg-get msg :field)`: the field, or nil when absent.
fn msg_get(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let message = next_message(frame, 2)?;
    let field = next_field(frame, 2)?;
    frame.finish(2)?;
    frame.return_var(message.value(field).unwrap_or_default());
    Ok(())
}

/// `(msg-get-or msg :field default)`
fn msg_get_or(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let message = next_message(frame, 3)?;
    let field = next_field(frame, 3)?;
    let default: Var = frame.arg(3)?;
    frame.finish(3)?;
    frame.return_var(message.value(field).unwrap_or(default));
    Ok(())
}
