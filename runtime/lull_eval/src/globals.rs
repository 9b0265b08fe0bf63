//! The engine-wide table of callables and constants.
//!
//! One `Globals` is shared, through [`SharedGlobals`], by the engine, every
//! `Script` it creates and every `FunctionBinder` attached to it. Registering
//! a function through any of them makes it visible to all.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use lull_ir::{hash, HashValue, ScriptValue, VarArray, Var};
use rustc_hash::FxHashMap;

use crate::callable::NativeFunction;
use crate::config::EngineConfig;
use crate::errors::ScriptResult;
use crate::functions;

/// A call to a name with no binding, forwarded to the host.
#[derive(Clone, Debug)]
pub struct FunctionCall {
    pub id: HashValue,
    pub name: String,
    /// Evaluated arguments, in order.
    pub args: VarArray,
}

/// Host fallback for calls to unbound names.
pub type FunctionCallHandler = Rc<dyn Fn(&FunctionCall) -> ScriptResult<Var>>;

pub struct Globals {
    table: FxHashMap<HashValue, ScriptValue>,
    call_handler: Option<FunctionCallHandler>,
    config: EngineConfig,
}

impl Globals {
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Single-threaded shared handle to [`Globals`].
#[derive(Clone)]
pub struct SharedGlobals(Rc<RefCell<Globals>>);

impl SharedGlobals {
    /// Globals preloaded with the built-in library.
    pub fn new(config: EngineConfig) -> Self {
        let globals = SharedGlobals(Rc::new(RefCell::new(Globals {
            table: FxHashMap::default(),
            call_handler: None,
            config,
        })));
        functions::install(&globals);
        tracing::debug!(entries = globals.read().len(), "installed built-in functions");
        globals
    }

    pub fn read(&self) -> Ref<'_, Globals> {
        self.0.borrow()
    }

    pub fn write(&self) -> RefMut<'_, Globals> {
        self.0.borrow_mut()
    }

    pub fn config(&self) -> EngineConfig {
        self.read().config.clone()
    }

    pub fn lookup(&self, id: HashValue) -> Option<ScriptValue> {
        self.read().table.get(&id).cloned()
    }

    pub fn contains(&self, id: HashValue) -> bool {
        self.read().table.contains_key(&id)
    }

    /// Bind a constant or callable. Replaces any previous entry.
    pub fn define(&self, id: HashValue, value: ScriptValue) {
        self.write().table.insert(id, value);
    }

    pub fn register_native(&self, function: NativeFunction) {
        let id = hash(function.name());
        self.define(id, ScriptValue::new(function));
    }

    pub fn remove(&self, id: HashValue) -> bool {
        self.write().table.remove(&id).is_some()
    }

    pub fn call_handler(&self) -> Option<FunctionCallHandler> {
        self.read().call_handler.clone()
    }

    pub fn set_call_handler(&self, handler: Option<FunctionCallHandler>) {
        self.write().call_handler = handler;
    }

    /// Returns `true` if both handles share one table.
    pub fn ptr_eq(&self, other: &SharedGlobals) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for SharedGlobals {
    fn default() -> Self {
        SharedGlobals::new(EngineConfig::default())
    }
}

impl fmt::Debug for SharedGlobals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedGlobals({} entries)", self.read().len())
    }
}
