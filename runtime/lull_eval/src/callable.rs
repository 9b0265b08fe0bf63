//! Values that can sit in the head position of a call.
//!
//! All three are stored inside ordinary script values, so functions can be
//! bound to variables, passed as arguments and kept in arrays.

use std::fmt;
use std::rc::Rc;

use lull_ir::ScriptValue;

use crate::errors::ScriptResult;
use crate::frame::ScriptFrame;

type NativeFn = dyn Fn(&mut ScriptFrame<'_>) -> ScriptResult<()>;

/// A host function driven through the frame protocol.
///
/// The function decides how many arguments to pop and whether to evaluate
/// them, which is what lets special forms like `cond` skip branches.
#[derive(Clone)]
pub struct NativeFunction {
    name: Rc<str>,
    func: Rc<NativeFn>,
}

impl NativeFunction {
    pub fn new(
        name: &str,
        func: impl Fn(&mut ScriptFrame<'_>) -> ScriptResult<()> + 'static,
    ) -> Self {
        NativeFunction {
            name: Rc::from(name),
            func: Rc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if both handles wrap the same registration.
    pub fn ptr_eq(&self, other: &NativeFunction) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }

    #[inline]
    pub fn invoke(&self, frame: &mut ScriptFrame<'_>) -> ScriptResult<()> {
        (self.func)(frame)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunction({})", self.name)
    }
}

/// A script function. Arguments are evaluated in the caller's scope, then
/// bound to `params` in a fresh scope.
#[derive(Clone, Debug)]
pub struct Lambda {
    /// List of parameter symbols.
    pub params: ScriptValue,
    /// List of body forms.
    pub body: ScriptValue,
}

/// A script macro. Parameters bind to the unevaluated argument expressions,
/// which are evaluated again each time the parameter is referenced.
#[derive(Clone, Debug)]
pub struct Macro(pub Lambda);

/// Early-exit marker produced by `return`. Bodies unwrap it; `cond` and `if`
/// pass it through untouched so it reaches the enclosing body.
#[derive(Clone, Debug)]
pub struct DefReturn(pub ScriptValue);
