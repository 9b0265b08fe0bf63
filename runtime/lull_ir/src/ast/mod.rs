//! Script AST and runtime values.
//!
//! Scripts are cons lists. A `ScriptValue` is one of:
//!
//! - `Nil`, the empty list and the "no value" result
//! - `Symbol`, a name resolved through the scope chain at evaluation time
//! - `Cons`, a `{head, rest}` pair; `rest` is itself a `ScriptValue`
//! - `Value`, a boxed native value
//!
//! Cons nodes are `Rc`-shared and never mutated after construction, so
//! sub-lists can be handed around freely. Boxed values are shared too; the
//! container built-ins (`array-push`, `map-set`, ...) update them in place,
//! which every holder of the same value observes.

use std::any::Any;
use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::hash::{hash, HashValue};
use crate::type_id::TypeId;
use crate::var::Var;

/// A named identifier with its precomputed hash.
#[derive(Clone)]
pub struct Symbol {
    id: HashValue,
    name: Rc<str>,
}

impl Symbol {
    pub fn new(name: &str) -> Self {
        Symbol {
            id: hash(name),
            name: Rc::from(name),
        }
    }

    #[inline]
    pub fn id(&self) -> HashValue {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.name)
    }
}

/// One link of a list.
#[derive(Clone, Debug)]
pub struct Cons {
    pub head: ScriptValue,
    pub rest: ScriptValue,
}

/// A node of the AST, or the result of evaluating one.
#[derive(Clone, Default)]
pub enum ScriptValue {
    #[default]
    Nil,
    Symbol(Symbol),
    Cons(Rc<Cons>),
    Value(Rc<RefCell<Var>>),
}

impl ScriptValue {
    /// Box a native value.
    pub fn new<T: Any + Clone>(value: T) -> Self {
        ScriptValue::Value(Rc::new(RefCell::new(Var::new(value))))
    }

    /// Box an erased value. An empty `Var` becomes `Nil`.
    pub fn from_var(var: Var) -> Self {
        if var.is_empty() {
            return ScriptValue::Nil;
        }
        ScriptValue::Value(Rc::new(RefCell::new(var)))
    }

    pub fn symbol(name: &str) -> Self {
        ScriptValue::Symbol(Symbol::new(name))
    }

    pub fn cons(head: ScriptValue, rest: ScriptValue) -> Self {
        ScriptValue::Cons(Rc::new(Cons { head, rest }))
    }

    /// Build a proper list from `items`, preserving order.
    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator<Item = ScriptValue>,
        I::IntoIter: DoubleEndedIterator,
    {
        items
            .into_iter()
            .rev()
            .fold(ScriptValue::Nil, |rest, head| ScriptValue::cons(head, rest))
    }

    /// `Nil`, or a boxed empty value.
    pub fn is_nil(&self) -> bool {
        match self {
            ScriptValue::Nil => true,
            ScriptValue::Value(var) => var.borrow().is_empty(),
            ScriptValue::Symbol(_) | ScriptValue::Cons(_) => false,
        }
    }

    pub fn as_cons(&self) -> Option<&Cons> {
        match self {
            ScriptValue::Cons(cons) => Some(cons),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            ScriptValue::Symbol(symbol) => Some(symbol),
            _ => None,
        }
    }

    /// Borrow the boxed value, if any.
    pub fn var(&self) -> Option<Ref<'_, Var>> {
        match self {
            ScriptValue::Value(var) => Some(var.borrow()),
            _ => None,
        }
    }

    /// Returns `true` if this boxes exactly a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.var().is_some_and(|var| var.is::<T>())
    }

    /// Copy out a boxed `T`.
    pub fn get<T: Any + Clone>(&self) -> Option<T> {
        self.var().and_then(|var| var.get::<T>().cloned())
    }

    /// Copy into a `Var`. Symbols and lists are boxed as AST values.
    pub fn to_var(&self) -> Var {
        match self {
            ScriptValue::Nil => Var::empty(),
            ScriptValue::Value(var) => var.borrow().clone(),
            ScriptValue::Symbol(_) | ScriptValue::Cons(_) => Var::new(self.clone()),
        }
    }

    /// `TypeId` of the boxed value; `TypeId::NONE` for nil.
    pub fn type_id(&self) -> TypeId {
        match self {
            ScriptValue::Nil => TypeId::NONE,
            ScriptValue::Value(var) => Var::type_id(&var.borrow()),
            ScriptValue::Symbol(_) => TypeId::of::<Symbol>(),
            ScriptValue::Cons(_) => TypeId::of::<Cons>(),
        }
    }

    /// Iterate the elements of a list. Stops at the first non-cons tail.
    pub fn iter(&self) -> ListIter<'_> {
        ListIter { cursor: self }
    }

    /// Number of elements in a list.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns `true` for the empty list.
    pub fn is_empty(&self) -> bool {
        matches!(self, ScriptValue::Nil)
    }
}

/// Iterator over list elements.
pub struct ListIter<'a> {
    cursor: &'a ScriptValue,
}

impl<'a> Iterator for ListIter<'a> {
    type Item = &'a ScriptValue;

    fn next(&mut self) -> Option<Self::Item> {
        let cons = self.cursor.as_cons()?;
        self.cursor = &cons.rest;
        Some(&cons.head)
    }
}

impl fmt::Display for ScriptValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptValue::Nil => f.write_str("nil"),
            ScriptValue::Symbol(symbol) => f.write_str(symbol.name()),
            ScriptValue::Value(var) => write!(f, "{}", var.borrow()),
            ScriptValue::Cons(_) => {
                f.write_str("(")?;
                let mut cursor = self;
                let mut first = true;
                while let ScriptValue::Cons(cons) = cursor {
                    if !first {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", cons.head)?;
                    first = false;
                    cursor = &cons.rest;
                }
                if !matches!(cursor, ScriptValue::Nil) {
                    write!(f, " . {cursor}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl fmt::Debug for ScriptValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptValue::Nil => f.write_str("Nil"),
            ScriptValue::Symbol(symbol) => write!(f, "{symbol:?}"),
            ScriptValue::Value(var) => write!(f, "{:?}", var.borrow()),
            ScriptValue::Cons(_) => write!(f, "List{self}"),
        }
    }
}

impl From<Var> for ScriptValue {
    fn from(var: Var) -> Self {
        ScriptValue::from_var(var)
    }
}
