//! RAII scope guard for [`ScriptEnv`].
//!
//! [`ScopedEnv`] pushes a scope when created and pops it when dropped, on
//! early `?` returns and during unwinding alike. It derefs to the
//! environment, so evaluation goes through the guard unchanged.
//!
//! ```text
//! let mut scoped = env.scoped();
//! scoped.let_value("x", value);
//! scoped.run_body(&body)?;
//! // scope popped here
//! ```

use std::ops::{Deref, DerefMut};

use lull_ir::{HashValue, ScriptValue};

use super::ScriptEnv;

pub struct ScopedEnv<'a> {
    env: &'a mut ScriptEnv,
}

impl Drop for ScopedEnv<'_> {
    fn drop(&mut self) {
        self.env.scopes.pop_scope();
    }
}

impl Deref for ScopedEnv<'_> {
    type Target = ScriptEnv;

    fn deref(&self) -> &Self::Target {
        self.env
    }
}

impl DerefMut for ScopedEnv<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.env
    }
}

impl ScriptEnv {
    /// Push a scope that is popped when the guard drops.
    pub fn scoped(&mut self) -> ScopedEnv<'_> {
        self.scopes.push_scope();
        ScopedEnv { env: self }
    }

    /// Run `f` inside a fresh scope (`begin`).
    pub fn with_scope<T, F>(&mut self, f: F) -> T
    where
        F: FnOnce(&mut ScopedEnv<'_>) -> T,
    {
        let mut scoped = self.scoped();
        f(&mut scoped)
    }

    /// Run `f` in a fresh scope holding `bindings`.
    pub fn with_bindings<T, F, I>(&mut self, bindings: I, f: F) -> T
    where
        F: FnOnce(&mut ScopedEnv<'_>) -> T,
        I: IntoIterator<Item = (HashValue, ScriptValue)>,
    {
        self.with_scope(|scoped| {
            for (name, value) in bindings {
                scoped.scopes.define(name, value);
            }
            f(scoped)
        })
    }
}
