//! Binding and sequencing forms.

use lull_ir::ScriptValue;

use super::{define, eval_rest};
use crate::callable::{DefReturn, Lambda, Macro};
use crate::errors::{wrong_arg_type, ScriptResult};
use crate::frame::{describe, ScriptFrame};
use crate::globals::SharedGlobals;

pub(super) fn install(globals: &SharedGlobals) {
    define(globals, "=", assign);
    define(globals, "var", declare);
    define(globals, "def", def);
    define(globals, "macro", def_macro);
    define(globals, "lambda", lambda);
    define(globals, "do", sequence);
    define(globals, "begin", begin);
    define(globals, "return", early_return);
    define(globals, "eval", eval);
    define(globals, "?", print);
}

/// `(= name value)`: assign the nearest binding, else define locally.
fn assign(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let symbol = frame.next_symbol()?;
    let value = frame.try_eval_next()?;
    frame.env().scopes_mut().set(symbol.id(), value.clone());
    frame.return_value(value);
    Ok(())
}

/// `(var name value)`: define in the innermost scope, shadowing.
fn declare(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let symbol = frame.next_symbol()?;
    let value = frame.try_eval_next()?;
    frame.env().scopes_mut().define(symbol.id(), value.clone());
    frame.return_value(value);
    Ok(())
}

/// `(def name (params...) body...)`
fn def(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let symbol = frame.next_symbol()?;
    let value = ScriptValue::new(read_lambda(frame)?);
    frame.env().scopes_mut().set(symbol.id(), value.clone());
    frame.return_value(value);
    Ok(())
}

/// `(macro name (params...) body...)`
fn def_macro(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let symbol = frame.next_symbol()?;
    let value = ScriptValue::new(Macro(read_lambda(frame)?));
    frame.env().scopes_mut().set(symbol.id(), value.clone());
    frame.return_value(value);
    Ok(())
}

/// `(lambda (params...) body...)`
fn lambda(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let value = ScriptValue::new(read_lambda(frame)?);
    frame.return_value(value);
    Ok(())
}

fn read_lambda(frame: &mut ScriptFrame<'_>) -> ScriptResult<Lambda> {
    if !frame.has_next() {
        return Err(frame.error("expected a parameter list"));
    }
    let position = frame.position();
    let params = frame.next();
    let valid = match &params {
        ScriptValue::Nil => true,
        ScriptValue::Cons(_) => params.iter().all(|param| param.as_symbol().is_some()),
        ScriptValue::Symbol(_) | ScriptValue::Value(_) => false,
    };
    if !valid {
        return Err(wrong_arg_type(
            frame.name(),
            position,
            "parameter list",
            &describe(&params),
        ));
    }
    Ok(Lambda {
        params,
        body: frame.rest(),
    })
}

/// `(do forms...)`: value of the last form, or of the first `return`.
fn sequence(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let body = frame.rest();
    let value = frame.env().run_body(&body)?;
    frame.return_value(value);
    Ok(())
}

/// `(begin forms...)`: `do` in a fresh scope.
fn begin(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let body = frame.rest();
    let value = frame.env().with_scope(|scoped| scoped.run_body(&body))?;
    frame.return_value(value);
    Ok(())
}

/// `(return [value])`
fn early_return(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let value = if frame.has_next() {
        frame.eval_next()?
    } else {
        ScriptValue::Nil
    };
    frame.finish(1)?;
    frame.return_value(ScriptValue::new(DefReturn(value)));
    Ok(())
}

/// `(eval form)`
fn eval(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let value = frame.try_eval_next()?;
    let value = frame.env().eval(&value)?;
    frame.return_value(value);
    Ok(())
}

/// `(? values...)`: print the values space-separated and return the line.
fn print(frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
    let line = eval_rest(frame)?
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    frame.env().print(&line);
    frame.return_value(ScriptValue::new(line));
    Ok(())
}
