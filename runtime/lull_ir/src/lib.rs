//! Lull IR - core value types shared by every runtime crate.
//!
//! This crate contains:
//! - `HashValue` symbol identity (FNV-1a over the symbol text)
//! - `TypeId` identity for native types stored in script values
//! - `Var`, the type-erased value container, plus `VarTable`/`VarArray`
//! - `Message`, a typed event payload that is either concrete or a field table
//! - `ScriptValue`, the cons-list AST consumed and produced by the evaluator
//!
//! # Design Philosophy
//!
//! - **Hash Everything**: names are compared as `HashValue(u32)`, never as text
//! - **Erase at the Boundary**: native values cross into scripts as `Var`
//! - **Share, Don't Copy**: AST nodes are `Rc`-shared and immutable once built

pub mod ast;
mod convert;
mod hash;
mod message;
mod number;
mod type_id;
mod var;

pub use ast::{Cons, ScriptValue, Symbol};
pub use convert::{FromVar, IntoVar};
pub use hash::{combine, const_hash, hash, hash_bytes, hash_with_prefix, HashValue};
pub use message::{Message, Record};
pub use number::{NumericCast, Number};
pub use type_id::TypeId;
pub use var::{Var, VarArray, VarTable};
