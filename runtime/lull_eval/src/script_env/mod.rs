//! The evaluator.
//!
//! `ScriptEnv` walks cons-list ASTs against its scope stack and the shared
//! globals table.
//!
//! # Evaluation
//!
//! - `Nil` and boxed values evaluate to themselves.
//! - A symbol evaluates to its binding. Bindings that are themselves
//!   expressions (macro parameters) are evaluated again on every reference.
//! - Lambdas run in a fresh scope. Macros run in the caller's scope. Both
//!   require exactly as many arguments as they have parameters.
//! - A list is a call. The head is resolved to a callable and the rest of the
//!   list is handed over unevaluated; see [`ScriptFrame`].
//!
//! An unbound head symbol goes to the host's function-call handler when one is
//! installed, and is an `UndefinedSymbol` error otherwise.

mod scope_guard;

use std::rc::Rc;

use lull_ir::{hash, Cons, ScriptValue, Symbol, Var, VarArray, VarTable};
use lull_stack::{CallDepth, DepthGuard};
use smallvec::SmallVec;

use crate::callable::{DefReturn, Lambda, Macro, NativeFunction};
use crate::config::{EngineConfig, MAX_LAMBDA_ARGS};
use crate::environment::Environment;
use crate::errors::{
    custom, not_callable, recursion_limit_exceeded, too_many_arguments, undefined_symbol,
    wrong_arg_count, ScriptResult,
};
use crate::frame::{describe, ScriptFrame};
use crate::globals::{FunctionCall, FunctionCallHandler, SharedGlobals};
use crate::print_handler::SharedPrintHandler;

pub use scope_guard::ScopedEnv;

/// Longest rendering of a form attached to an error.
const CONTEXT_LIMIT: usize = 64;

enum Callable {
    Native(NativeFunction),
    Lambda(Lambda),
    Macro(Lambda),
}

/// Evaluation context: a scope stack plus a handle on the shared globals.
pub struct ScriptEnv {
    scopes: Environment,
    globals: SharedGlobals,
    depth: Rc<CallDepth>,
    print_handler: SharedPrintHandler,
}

impl ScriptEnv {
    /// A standalone environment with its own globals and the default config.
    pub fn new() -> Self {
        ScriptEnv::with_globals(SharedGlobals::new(EngineConfig::default()))
    }

    /// An environment over an existing globals table (one per script).
    pub fn with_globals(globals: SharedGlobals) -> Self {
        let config = globals.config();
        ScriptEnv {
            scopes: Environment::new(),
            globals,
            depth: Rc::new(CallDepth::new(config.recursion_limit)),
            print_handler: config.print_handler,
        }
    }

    pub fn globals(&self) -> &SharedGlobals {
        &self.globals
    }

    pub fn scopes(&self) -> &Environment {
        &self.scopes
    }

    pub fn scopes_mut(&mut self) -> &mut Environment {
        &mut self.scopes
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    /// Parse `source` into its list of top-level forms.
    pub fn read(&self, source: &str) -> ScriptResult {
        Ok(lull_parse::parse(source)?)
    }

    /// Parse and run `source` as a body.
    pub fn exec(&mut self, source: &str) -> ScriptResult {
        let forms = self.read(source)?;
        self.run_body(&forms)
    }

    /// Assign the nearest binding of `name`, or define it in the innermost
    /// scope.
    pub fn set_value(&mut self, name: &str, value: ScriptValue) {
        self.scopes.set(hash(name), value);
    }

    /// Define `name` in the innermost scope.
    pub fn let_value(&mut self, name: &str, value: ScriptValue) {
        self.scopes.define(hash(name), value);
    }

    pub fn get_value(&self, name: &str) -> Option<ScriptValue> {
        self.lookup(&Symbol::new(name))
    }

    /// Scope chain first, then the globals table.
    pub fn lookup(&self, symbol: &Symbol) -> Option<ScriptValue> {
        self.scopes
            .lookup(symbol.id())
            .or_else(|| self.globals.lookup(symbol.id()))
    }

    pub fn register_function(&self, function: NativeFunction) {
        self.globals.register_native(function);
    }

    /// Route calls to unbound names to `handler` instead of failing.
    pub fn set_function_call_handler(
        &self,
        handler: impl Fn(&FunctionCall) -> ScriptResult<Var> + 'static,
    ) {
        let handler: FunctionCallHandler = Rc::new(handler);
        self.globals.set_call_handler(Some(handler));
    }

    pub fn print(&self, text: &str) {
        self.print_handler.line(text);
    }

    /// Evaluate one value.
    pub fn eval(&mut self, value: &ScriptValue) -> ScriptResult {
        match value {
            ScriptValue::Nil | ScriptValue::Value(_) => Ok(value.clone()),
            ScriptValue::Symbol(symbol) => self.eval_symbol(symbol),
            ScriptValue::Cons(cons) => {
                lull_stack::ensure_sufficient_stack(|| self.eval_call(cons))
            }
        }
    }

    /// Evaluate each form of `body` in order. Stops at the first `return`
    /// and yields its value; otherwise yields the last form's value.
    pub fn run_body(&mut self, body: &ScriptValue) -> ScriptResult {
        let mut result = ScriptValue::Nil;
        for form in body.iter() {
            result = self.eval(form)?;
            if let Some(DefReturn(value)) = result.get::<DefReturn>() {
                return Ok(value);
            }
        }
        Ok(result)
    }

    /// As [`ScriptEnv::run_body`], but a `return` is passed through still
    /// wrapped so it can reach the enclosing body.
    pub fn eval_sequence(&mut self, body: &ScriptValue) -> ScriptResult {
        let mut result = ScriptValue::Nil;
        for form in body.iter() {
            result = self.eval(form)?;
            if result.is::<DefReturn>() {
                break;
            }
        }
        Ok(result)
    }

    /// Invoke `callee` with an unevaluated argument list.
    pub fn call_value(&mut self, callee: &ScriptValue, args: ScriptValue, name: &str) -> ScriptResult {
        match callable(callee)? {
            Callable::Native(function) => {
                let mut frame = ScriptFrame::new(self, function.name(), args);
                function.invoke(&mut frame)?;
                Ok(frame.release_return_value())
            }
            Callable::Lambda(lambda) => {
                let values = self.collect_args(&args, true)?;
                self.call_lambda(name, &lambda, &values)
            }
            Callable::Macro(lambda) => {
                tracing::trace!(name, "expanding macro");
                let values = self.collect_args(&args, false)?;
                self.call_macro(name, &lambda, &values)
            }
        }
    }

    /// Call the script or native function bound to `name` with host values.
    #[tracing::instrument(level = "debug", skip(self, args))]
    pub fn call(&mut self, name: &str, args: Vec<Var>) -> ScriptResult<Var> {
        let callee = self.get_value(name).ok_or_else(|| undefined_symbol(name))?;
        let args = ScriptValue::list(args.into_iter().map(ScriptValue::from_var));
        Ok(self.call_value(&callee, args, name)?.to_var())
    }

    /// Call the script function bound to `name`, matching its parameters to
    /// `args` by name. Every parameter needs an entry.
    #[tracing::instrument(level = "debug", skip(self, args))]
    pub fn call_with_table(&mut self, name: &str, args: &VarTable) -> ScriptResult<Var> {
        let callee = self.get_value(name).ok_or_else(|| undefined_symbol(name))?;
        let (Callable::Lambda(lambda) | Callable::Macro(lambda)) = callable(&callee)? else {
            return Err(custom(format!("{name} is not a script function")));
        };
        let mut values = SmallVec::<[ScriptValue; MAX_LAMBDA_ARGS]>::new();
        for param in lambda.params.iter() {
            let value = param.as_symbol().and_then(|symbol| args.try_find(symbol.id()));
            let Some(value) = value else {
                return Err(custom(format!("no argument named {param} for {name}")));
            };
            values.push(ScriptValue::from_var(value.clone()));
        }
        Ok(self.call_lambda(name, &lambda, &values)?.to_var())
    }

    fn eval_symbol(&mut self, symbol: &Symbol) -> ScriptResult {
        let bound = self
            .lookup(symbol)
            .ok_or_else(|| undefined_symbol(symbol.name()))?;
        match bound {
            ScriptValue::Nil | ScriptValue::Value(_) => Ok(bound),
            ScriptValue::Symbol(_) | ScriptValue::Cons(_) => {
                let depth = Rc::clone(&self.depth);
                let _guard = enter(&depth)?;
                lull_stack::ensure_sufficient_stack(|| self.eval(&bound))
            }
        }
    }

    fn eval_call(&mut self, cons: &Cons) -> ScriptResult {
        let (callee, name) = match &cons.head {
            ScriptValue::Symbol(symbol) => match self.lookup(symbol) {
                Some(_) => (self.eval_symbol(symbol)?, symbol.name()),
                None => return self.call_unbound(symbol, &cons.rest),
            },
            head => (self.eval(head)?, "<anonymous>"),
        };
        self.call_value(&callee, cons.rest.clone(), name)
            .map_err(|err| err.with_context(|| render_form(cons)))
    }

    fn call_unbound(&mut self, symbol: &Symbol, args: &ScriptValue) -> ScriptResult {
        let Some(handler) = self.globals.call_handler() else {
            return Err(undefined_symbol(symbol.name()));
        };
        let mut values = VarArray::new();
        for arg in args.iter() {
            values.push(self.eval(arg)?.to_var());
        }
        tracing::trace!(name = symbol.name(), args = values.len(), "forwarding unbound call");
        let call = FunctionCall {
            id: symbol.id(),
            name: symbol.name().to_owned(),
            args: values,
        };
        Ok(ScriptValue::from_var(handler(&call)?))
    }

    /// Argument list of a script call, evaluated for lambdas and raw for
    /// macros.
    fn collect_args(
        &mut self,
        args: &ScriptValue,
        evaluate: bool,
    ) -> ScriptResult<SmallVec<[ScriptValue; MAX_LAMBDA_ARGS]>> {
        let mut values = SmallVec::new();
        for arg in args.iter() {
            if values.len() == MAX_LAMBDA_ARGS {
                return Err(too_many_arguments(MAX_LAMBDA_ARGS));
            }
            values.push(if evaluate { self.eval(arg)? } else { arg.clone() });
        }
        Ok(values)
    }

    /// Bind `values` to the parameters in a fresh scope and run the body.
    fn call_lambda(&mut self, name: &str, lambda: &Lambda, values: &[ScriptValue]) -> ScriptResult {
        check_arity(name, lambda, values)?;
        let depth = Rc::clone(&self.depth);
        let _guard = enter(&depth)?;
        let mut scoped = self.scoped();
        bind_params(&mut scoped.scopes, lambda, values);
        scoped.run_body(&lambda.body)
    }

    /// Bind the unevaluated `values` in the caller's scope and run the body
    /// there, so assignments made by the body stay visible to the caller.
    fn call_macro(&mut self, name: &str, lambda: &Lambda, values: &[ScriptValue]) -> ScriptResult {
        check_arity(name, lambda, values)?;
        let depth = Rc::clone(&self.depth);
        let _guard = enter(&depth)?;
        bind_params(&mut self.scopes, lambda, values);
        self.run_body(&lambda.body)
    }
}

impl Default for ScriptEnv {
    fn default() -> Self {
        Self::new()
    }
}

fn check_arity(name: &str, lambda: &Lambda, values: &[ScriptValue]) -> ScriptResult<()> {
    let expected = lambda.params.len();
    if values.len() != expected {
        return Err(wrong_arg_count(name, expected, values.len()));
    }
    Ok(())
}

fn bind_params(scopes: &mut Environment, lambda: &Lambda, values: &[ScriptValue]) {
    for (param, value) in lambda.params.iter().zip(values) {
        if let Some(symbol) = param.as_symbol() {
            scopes.define(symbol.id(), value.clone());
        }
    }
}

fn enter(depth: &CallDepth) -> ScriptResult<DepthGuard<'_>> {
    depth
        .enter()
        .ok_or_else(|| recursion_limit_exceeded(depth.limit().unwrap_or_default()))
}

fn callable(value: &ScriptValue) -> ScriptResult<Callable> {
    let Some(var) = value.var() else {
        return Err(not_callable(&describe(value)));
    };
    if let Some(function) = var.get::<NativeFunction>() {
        return Ok(Callable::Native(function.clone()));
    }
    if let Some(lambda) = var.get::<Lambda>() {
        return Ok(Callable::Lambda(lambda.clone()));
    }
    if let Some(Macro(lambda)) = var.get::<Macro>() {
        return Ok(Callable::Macro(lambda.clone()));
    }
    Err(not_callable(var.type_name()))
}

fn render_form(cons: &Cons) -> String {
    let mut text = ScriptValue::Cons(Rc::new(cons.clone())).to_string();
    if text.len() > CONTEXT_LIMIT {
        let mut cut = CONTEXT_LIMIT;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
        text.push_str("...");
    }
    text
}
