//! Variable scopes for the evaluator.
//!
//! A stack of scopes, each chained to the one below it. Calls and `begin`
//! push a scope; lookups walk from the innermost scope outward to the
//! environment's global scope. Scoping is dynamic: a function body sees the
//! bindings of whoever called it.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use lull_ir::{HashValue, ScriptValue};

/// Single-threaded shared cell for scopes.
///
/// All scope allocations go through [`LocalScope::new`]. Not thread-safe;
/// evaluation is single-threaded.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for LocalScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LocalScope").field(&self.0).finish()
    }
}

impl<T: Default> Default for LocalScope<T> {
    fn default() -> Self {
        LocalScope::new(T::default())
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// One scope's bindings.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    bindings: FxHashMap<HashValue, ScriptValue>,
    parent: Option<LocalScope<Scope>>,
}

impl Scope {
    pub fn new() -> Self {
        Scope::default()
    }

    pub fn with_parent(parent: LocalScope<Scope>) -> Self {
        Scope {
            bindings: FxHashMap::default(),
            parent: Some(parent),
        }
    }

    /// Bind in this scope, shadowing any outer binding.
    #[inline]
    pub fn define(&mut self, name: HashValue, value: ScriptValue) {
        self.bindings.insert(name, value);
    }

    #[inline]
    pub fn lookup(&self, name: HashValue) -> Option<ScriptValue> {
        if let Some(value) = self.bindings.get(&name) {
            return Some(value.clone());
        }
        self.parent.as_ref()?.borrow().lookup(name)
    }

    /// Overwrite the nearest existing binding. Hands `value` back when no
    /// scope in the chain binds `name`.
    pub fn assign(&mut self, name: HashValue, value: ScriptValue) -> Result<(), ScriptValue> {
        if let Some(slot) = self.bindings.get_mut(&name) {
            *slot = value;
            return Ok(());
        }
        match &self.parent {
            Some(parent) => parent.borrow_mut().assign(name, value),
            None => Err(value),
        }
    }
}

/// Scope stack with a permanent global scope at the bottom.
pub struct Environment {
    scopes: Vec<LocalScope<Scope>>,
    global: LocalScope<Scope>,
}

impl Environment {
    pub fn new() -> Self {
        let global = LocalScope::new(Scope::new());
        Environment {
            scopes: vec![global.clone()],
            global,
        }
    }

    /// Number of scopes, including the global one.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    #[inline]
    pub fn push_scope(&mut self) {
        let parent = self.current_scope().clone();
        self.scopes.push(LocalScope::new(Scope::with_parent(parent)));
    }

    /// Pop the innermost scope. The global scope is never popped.
    #[inline]
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    #[inline]
    fn current_scope(&self) -> &LocalScope<Scope> {
        self.scopes.last().unwrap_or(&self.global)
    }

    /// Bind in the innermost scope (`var`).
    #[inline]
    pub fn define(&mut self, name: HashValue, value: ScriptValue) {
        self.current_scope().borrow_mut().define(name, value);
    }

    /// Bind in the global scope regardless of nesting.
    pub fn define_global(&mut self, name: HashValue, value: ScriptValue) {
        self.global.borrow_mut().define(name, value);
    }

    #[inline]
    pub fn lookup(&self, name: HashValue) -> Option<ScriptValue> {
        self.current_scope().borrow().lookup(name)
    }

    #[inline]
    pub fn assign(&mut self, name: HashValue, value: ScriptValue) -> Result<(), ScriptValue> {
        self.current_scope().borrow_mut().assign(name, value)
    }

    /// Assign the nearest binding, or define in the innermost scope if there
    /// is none (`=`).
    pub fn set(&mut self, name: HashValue, value: ScriptValue) {
        if let Err(value) = self.assign(name, value) {
            self.define(name, value);
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
