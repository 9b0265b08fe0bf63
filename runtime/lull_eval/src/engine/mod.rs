//! The host-facing engine.
//!
//! A [`ScriptEngine`] owns the global function table. Scripts compiled from
//! it share that table, so anything registered on the engine, before or
//! after a script is read, is callable from every script. Each [`Script`]
//! has its own top-level scope.
//!
//! ```text
//! let engine = ScriptEngine::default();
//! engine.register_function("add", |x: i32, y: i32| x + y);
//! assert_eq!(engine.run_now("(add 12 34)")?.get::<i32>(), Some(&46));
//!
//! let mut script = engine.read_script("(= y (* x 3))")?;
//! script.set_value("x", 10);
//! script.run()?;
//! assert_eq!(script.get_value::<i32>("y"), Some(30));
//! ```

use std::rc::Rc;

use lull_ir::{FromVar, IntoVar, Record, ScriptValue, Var, VarTable};

use crate::binder::{self, IntoNativeFunction, IntoNativeMethod, ScriptEnum};
use crate::config::EngineConfig;
use crate::errors::ScriptResult;
use crate::globals::{FunctionCall, SharedGlobals};
use crate::print_handler::SharedPrintHandler;
use crate::script_env::ScriptEnv;

pub struct ScriptEngine {
    globals: SharedGlobals,
}

impl ScriptEngine {
    pub fn new(config: EngineConfig) -> Self {
        tracing::debug!(?config, "creating script engine");
        ScriptEngine {
            globals: SharedGlobals::new(config),
        }
    }

    pub fn config(&self) -> EngineConfig {
        self.globals.config()
    }

    pub fn globals(&self) -> &SharedGlobals {
        &self.globals
    }

    pub fn print_handler(&self) -> SharedPrintHandler {
        self.config().print_handler
    }

    /// Parse and evaluate `source` in a throwaway scope.
    #[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
    pub fn run_now(&self, source: &str) -> ScriptResult<Var> {
        let mut env = ScriptEnv::with_globals(self.globals.clone());
        let result = env.exec(source);
        log_failure(&result);
        Ok(result?.to_var())
    }

    /// Parse `source` once for repeated runs.
    #[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
    pub fn read_script(&self, source: &str) -> ScriptResult<Script> {
        let env = ScriptEnv::with_globals(self.globals.clone());
        let code = env.read(source)?;
        Ok(Script { env, code })
    }

    /// Bind `func` under `name`, replacing any previous entry.
    pub fn register_function<Args>(&self, name: &str, func: impl IntoNativeFunction<Args>) {
        binder::register_function(&self.globals, name, func);
    }

    /// Bind `method` to `receiver`. The binding holds the receiver weakly.
    pub fn register_mem_fn<R: 'static, Args>(
        &self,
        name: &str,
        receiver: &Rc<R>,
        method: impl IntoNativeMethod<R, Args>,
    ) {
        binder::register_mem_fn(&self.globals, name, receiver, method);
    }

    /// Expose every member of `T` as `name.Member`.
    pub fn register_enum<T: ScriptEnum>(&self, name: &str) {
        binder::register_enum::<T>(&self.globals, name);
    }

    /// Returns `false` if nothing was bound under `name`.
    pub fn unregister_function(&self, name: &str) -> bool {
        self.globals.remove(lull_ir::hash(name))
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.globals.contains(lull_ir::hash(name))
    }

    /// Call a global function from native code.
    pub fn call(&self, name: &str, args: Vec<Var>) -> ScriptResult<Var> {
        binder::call_global(&self.globals, name, args)
    }

    /// Route calls to unbound names to `handler` instead of failing.
    pub fn set_function_call_handler(
        &self,
        handler: impl Fn(&FunctionCall) -> ScriptResult<Var> + 'static,
    ) {
        self.globals.set_call_handler(Some(Rc::new(handler)));
    }

    pub fn clear_function_call_handler(&self) {
        self.globals.set_call_handler(None);
    }
}

impl Default for ScriptEngine {
    fn default() -> Self {
        ScriptEngine::new(EngineConfig::default())
    }
}

fn log_failure<T>(result: &ScriptResult<T>) {
    if let Err(err) = result {
        tracing::debug!(%err, "script run failed");
    }
}

/// A parsed script with its own top-level scope.
///
/// Values set on the script persist across runs and reloads.
pub struct Script {
    env: ScriptEnv,
    code: ScriptValue,
}

impl Script {
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run(&mut self) -> ScriptResult<Var> {
        let result = self.env.run_body(&self.code);
        log_failure(&result);
        Ok(result?.to_var())
    }

    /// Replace the source, keeping the scope.
    pub fn reload(&mut self, source: &str) -> ScriptResult<()> {
        self.code = self.env.read(source)?;
        Ok(())
    }

    pub fn set_value(&mut self, name: &str, value: impl IntoVar) {
        self.env
            .set_value(name, ScriptValue::from_var(value.into_var()));
    }

    /// Hand a native record to the script as a map.
    pub fn set_record<T: Record>(&mut self, name: &str, record: &T) {
        let table: VarTable = record.to_table();
        self.env.set_value(name, ScriptValue::new(table));
    }

    /// Read a top-level value, converting it. `None` if unbound or not
    /// convertible.
    pub fn get_value<T: FromVar>(&self, name: &str) -> Option<T> {
        let value = self.env.get_value(name)?;
        T::from_var(&value.to_var())
    }

    pub fn call(&mut self, name: &str, args: Vec<Var>) -> ScriptResult<Var> {
        self.env.call(name, args)
    }

    pub fn env(&self) -> &ScriptEnv {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut ScriptEnv {
        &mut self.env
    }
}
