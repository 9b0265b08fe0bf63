//! The per-call context handed to native functions.
//!
//! A frame holds the unevaluated argument list of one call. Functions pull
//! arguments one at a time, either raw with [`ScriptFrame::next`] or evaluated
//! with [`ScriptFrame::eval_next`]. Strict functions evaluate everything;
//! special forms evaluate only what they need.

use lull_ir::{FromVar, ScriptValue, Symbol, Var};

use crate::errors::{custom, missing_argument, wrong_arg_count, wrong_arg_type, ScriptError, ScriptResult};
use crate::script_env::ScriptEnv;

pub struct ScriptFrame<'a> {
    env: &'a mut ScriptEnv,
    name: &'a str,
    args: ScriptValue,
    /// Number of arguments popped so far.
    position: usize,
    ret: ScriptValue,
}

impl<'a> ScriptFrame<'a> {
    pub fn new(env: &'a mut ScriptEnv, name: &'a str, args: ScriptValue) -> Self {
        ScriptFrame {
            env,
            name,
            args,
            position: 0,
            ret: ScriptValue::Nil,
        }
    }

    /// Name the function was bound under.
    pub fn name(&self) -> &str {
        self.name
    }

    pub fn env(&mut self) -> &mut ScriptEnv {
        &mut *self.env
    }

    /// The arguments not yet popped.
    pub fn args(&self) -> &ScriptValue {
        &self.args
    }

    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn has_next(&self) -> bool {
        matches!(self.args, ScriptValue::Cons(_))
    }

    /// Pop the next argument without evaluating it.
    ///
    /// # Panics
    ///
    /// If there is no next argument. Check [`ScriptFrame::has_next`] first.
    pub fn next(&mut self) -> ScriptValue {
        let ScriptValue::Cons(cons) = &self.args else {
            panic!("ScriptFrame::next called on '{}' with no arguments left", self.name);
        };
        let head = cons.head.clone();
        let rest = cons.rest.clone();
        self.args = rest;
        self.position += 1;
        head
    }

    /// Pop the next argument and evaluate it.
    ///
    /// # Panics
    ///
    /// If there is no next argument.
    pub fn eval_next(&mut self) -> ScriptResult {
        let arg = self.next();
        self.env.eval(&arg)
    }

    /// As [`ScriptFrame::eval_next`], but a missing argument is a script error.
    pub fn try_eval_next(&mut self) -> ScriptResult {
        if !self.has_next() {
            return Err(missing_argument().with_context(|| self.context()));
        }
        self.eval_next()
    }

    /// Evaluate the next argument and convert it.
    pub fn eval_next_as<T: FromVar>(&mut self) -> ScriptResult<T> {
        let position = self.position;
        let value = self.try_eval_next()?.to_var();
        T::from_var(&value).ok_or_else(|| {
            wrong_arg_type(self.name, position, T::expected_type(), value.type_name())
        })
    }

    /// Pop a symbol without evaluating it (`=`, `var`, `def`).
    pub fn next_symbol(&mut self) -> ScriptResult<Symbol> {
        if !self.has_next() {
            return Err(missing_argument().with_context(|| self.context()));
        }
        let position = self.position;
        match self.next() {
            ScriptValue::Symbol(symbol) => Ok(symbol),
            other => Err(wrong_arg_type(self.name, position, "symbol", &describe(&other))),
        }
    }

    /// Take every remaining argument as one unevaluated list.
    pub fn rest(&mut self) -> ScriptValue {
        self.position += self.args.len();
        std::mem::take(&mut self.args)
    }

    /// Pull one argument of a fixed-arity binding.
    pub fn arg<T: FromVar>(&mut self, arity: usize) -> ScriptResult<T> {
        if !self.has_next() {
            return Err(wrong_arg_count(self.name, arity, self.position));
        }
        self.eval_next_as()
    }

    /// Fail if a fixed-arity binding was handed extra arguments.
    pub fn finish(&self, arity: usize) -> ScriptResult<()> {
        if self.has_next() {
            return Err(wrong_arg_count(self.name, arity, self.position + self.args.len()));
        }
        Ok(())
    }

    /// Set the call's result.
    pub fn return_value(&mut self, value: ScriptValue) {
        self.ret = value;
    }

    pub fn return_var(&mut self, value: Var) {
        self.ret = ScriptValue::from_var(value);
    }

    /// Move the result out. Later calls see `Nil`.
    pub fn release_return_value(&mut self) -> ScriptValue {
        std::mem::take(&mut self.ret)
    }

    /// A script error tied to the current argument position.
    pub fn error(&self, message: impl Into<String>) -> ScriptError {
        custom(message).with_context(|| self.context())
    }

    fn context(&self) -> String {
        format!("{} argument {}", self.name, self.position)
    }
}

/// Short type description for diagnostics.
pub fn describe(value: &ScriptValue) -> String {
    match value {
        ScriptValue::Nil => String::from("nil"),
        ScriptValue::Symbol(symbol) => format!("symbol {}", symbol.name()),
        ScriptValue::Cons(_) => String::from("list"),
        ScriptValue::Value(var) => var.borrow().type_name().to_owned(),
    }
}

#[cfg(test)]
mod tests;
