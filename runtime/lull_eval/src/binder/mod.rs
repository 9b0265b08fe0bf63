//! Native function binding.
//!
//! Turns ordinary Rust functions into [`NativeFunction`] trampolines. The
//! parameter list is read from the function's type at bind time: each
//! parameter type supplies its own conversion through [`FromVar`], and the
//! return type goes back through [`IntoVar`].
//!
//! # Invocation
//!
//! A trampoline for an `N`-ary function evaluates exactly `N` arguments left
//! to right, converts each, calls the function and stores the converted
//! result as the call's return value. A missing or extra argument is an
//! `ArityMismatch`; an argument with no conversion is a `TypeMismatch`.
//!
//! # Lifetimes
//!
//! Method bindings hold their receiver weakly. Calling one after the
//! receiver is gone is a `ReceiverDropped` script error. [`FunctionBinder`]
//! additionally removes everything it registered when it is dropped, so the
//! binding goes away together with the component that owns the receiver.

use std::rc::{Rc, Weak};

use lull_ir::{hash, hash_with_prefix, FromVar, HashValue, IntoVar, ScriptValue, Var};
use lull_registry::Registry;

use crate::callable::NativeFunction;
use crate::engine::ScriptEngine;
use crate::errors::{receiver_dropped, ScriptResult};
use crate::globals::SharedGlobals;
use crate::script_env::ScriptEnv;

/// A Rust function that can be bound under a script name.
///
/// Implemented for every `Fn(A, B, ...) -> R` of up to six parameters where
/// each parameter is [`FromVar`] and `R` is [`IntoVar`]. `Args` only exists
/// to keep the per-arity impls apart.
pub trait IntoNativeFunction<Args>: 'static {
    fn into_native(self, name: &str) -> NativeFunction;
}

/// A method that can be bound together with a receiver of type `R`.
///
/// Implemented for every `Fn(&R, A, B, ...) -> Ret` of up to six further
/// parameters.
pub trait IntoNativeMethod<R, Args>: 'static {
    fn into_native_method(self, name: &str, receiver: Weak<R>) -> NativeFunction;
}

macro_rules! impl_into_native {
    ($arity:expr; $($ty:ident $arg:ident),*) => {
        impl<Func, Ret, $($ty,)*> IntoNativeFunction<($($ty,)*)> for Func
        where
            Func: Fn($($ty),*) -> Ret + 'static,
            Ret: IntoVar + 'static,
            $($ty: FromVar + 'static,)*
        {
            fn into_native(self, name: &str) -> NativeFunction {
                NativeFunction::new(name, move |frame| {
                    $(let $arg: $ty = frame.arg($arity)?;)*
                    frame.finish($arity)?;
                    frame.return_var(self($($arg),*).into_var());
                    Ok(())
                })
            }
        }

        impl<Func, Recv, Ret, $($ty,)*> IntoNativeMethod<Recv, ($($ty,)*)> for Func
        where
            Func: Fn(&Recv, $($ty),*) -> Ret + 'static,
            Recv: 'static,
            Ret: IntoVar + 'static,
            $($ty: FromVar + 'static,)*
        {
            fn into_native_method(self, name: &str, receiver: Weak<Recv>) -> NativeFunction {
                NativeFunction::new(name, move |frame| {
                    let Some(receiver) = receiver.upgrade() else {
                        return Err(receiver_dropped(frame.name()));
                    };
                    $(let $arg: $ty = frame.arg($arity)?;)*
                    frame.finish($arity)?;
                    frame.return_var(self(&receiver, $($arg),*).into_var());
                    Ok(())
                })
            }
        }
    };
}

impl_into_native!(0;);
impl_into_native!(1; A a);
impl_into_native!(2; A a, B b);
impl_into_native!(3; A a, B b, C c);
impl_into_native!(4; A a, B b, C c, D d);
impl_into_native!(5; A a, B b, C c, D d, E e);
impl_into_native!(6; A a, B b, C c, D d, E e, F f);

/// A fieldless enum whose members scripts can name as `Type.Member`.
///
/// ```text
/// #[derive(Clone, Copy, PartialEq, Debug)]
/// enum Shape { Circle, Square }
/// lull_ir::impl_var_value!(Shape);
///
/// impl ScriptEnum for Shape {
///     fn members() -> &'static [(&'static str, Self)] {
///         &[("Circle", Shape::Circle), ("Square", Shape::Square)]
///     }
/// }
/// ```
pub trait ScriptEnum: Clone + FromVar + IntoVar + 'static {
    fn members() -> &'static [(&'static str, Self)];
}

/// Symbol id of `name.member`.
pub fn member_id(name: &str, member: &str) -> HashValue {
    hash_with_prefix(hash_with_prefix(hash(name), "."), member)
}

pub(crate) fn register_function<Args>(
    globals: &SharedGlobals,
    name: &str,
    func: impl IntoNativeFunction<Args>,
) -> NativeFunction {
    let function = func.into_native(name);
    tracing::debug!(name, "registering native function");
    globals.register_native(function.clone());
    function
}

pub(crate) fn register_mem_fn<R: 'static, Args>(
    globals: &SharedGlobals,
    name: &str,
    receiver: &Rc<R>,
    method: impl IntoNativeMethod<R, Args>,
) -> NativeFunction {
    let function = method.into_native_method(name, Rc::downgrade(receiver));
    tracing::debug!(name, "registering native method");
    globals.register_native(function.clone());
    function
}

pub(crate) fn register_enum<T: ScriptEnum>(globals: &SharedGlobals, name: &str) {
    for (member, value) in T::members() {
        globals.define(member_id(name, member), ScriptValue::new(value.clone()));
    }
    tracing::debug!(name, members = T::members().len(), "registered enum");
}

/// Call a globally bound function from native code.
pub(crate) fn call_global(globals: &SharedGlobals, name: &str, args: Vec<Var>) -> ScriptResult<Var> {
    ScriptEnv::with_globals(globals.clone()).call(name, args)
}

/// Scoped registration facade.
///
/// Records every name registered through it and unregisters them all when
/// dropped. A name re-registered by someone else in the meantime is left
/// alone.
pub struct FunctionBinder {
    globals: SharedGlobals,
    bound: Vec<NativeFunction>,
}

impl FunctionBinder {
    pub fn new(engine: &ScriptEngine) -> Self {
        FunctionBinder {
            globals: engine.globals().clone(),
            bound: Vec::new(),
        }
    }

    /// A binder for the engine registered as a service. `None` if there is
    /// no engine in the registry.
    pub fn from_registry(registry: &Registry) -> Option<Self> {
        registry.get::<ScriptEngine>().map(FunctionBinder::new)
    }

    pub fn register_function<Args>(&mut self, name: &str, func: impl IntoNativeFunction<Args>) {
        let function = register_function(&self.globals, name, func);
        self.bound.push(function);
    }

    /// Bind `method` to `receiver`. The binding holds the receiver weakly.
    pub fn register_mem_fn<R: 'static, Args>(
        &mut self,
        name: &str,
        receiver: &Rc<R>,
        method: impl IntoNativeMethod<R, Args>,
    ) {
        let function = register_mem_fn(&self.globals, name, receiver, method);
        self.bound.push(function);
    }

    /// Remove `name` now. Returns `false` if this binder did not bind it.
    pub fn unregister_function(&mut self, name: &str) -> bool {
        let Some(index) = self.bound.iter().rposition(|function| function.name() == name) else {
            return false;
        };
        let function = self.bound.swap_remove(index);
        self.release(&function);
        true
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.globals.contains(hash(name))
    }

    /// Names currently held by this binder.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bound.iter().map(NativeFunction::name)
    }

    /// Invoke a bound function directly, with the same checks a script call
    /// gets.
    pub fn call(&self, name: &str, args: Vec<Var>) -> ScriptResult<Var> {
        call_global(&self.globals, name, args)
    }

    fn release(&self, function: &NativeFunction) {
        let id = hash(function.name());
        let current = self
            .globals
            .lookup(id)
            .and_then(|value| value.get::<NativeFunction>());
        if current.is_some_and(|current| current.ptr_eq(function)) {
            self.globals.remove(id);
            tracing::debug!(name = function.name(), "unregistered native function");
        }
    }
}

impl Drop for FunctionBinder {
    fn drop(&mut self) {
        for function in std::mem::take(&mut self.bound) {
            self.release(&function);
        }
    }
}
