//! Lull Eval - evaluator, native binding and script engine.
//!
//! This crate provides the tree-walking evaluator for Lull scripts and the
//! surface a host application uses to drive it.
//!
//! # Architecture
//!
//! - `ScriptEnv`: scope stack plus a handle on the shared globals; `eval`
//!   walks the cons-list AST
//! - `ScriptFrame`: per-call argument cursor with lazy `next` and eager
//!   `eval_next`, the one calling convention for special forms and strict
//!   functions alike
//! - `functions`: the built-in library installed into every globals table
//! - `binder`: Rust functions, methods and enums exposed to scripts;
//!   `FunctionBinder` ties registrations to an owner's lifetime
//! - `ScriptEngine` / `Script`: `run_now`, `read_script`, `run`,
//!   `set_value`, `get_value`
//!
//! # Re-exports
//!
//! Value types come from `lull_ir`; the most used ones are re-exported:
//! - `ScriptValue`, `Var`, `VarArray`, `VarTable`, `Message`
//! - `FromVar`, `IntoVar`

pub mod binder;
mod callable;
mod config;
pub mod engine;
mod environment;
pub mod errors;
mod frame;
pub mod functions;
mod globals;
mod print_handler;
mod script_env;

pub use lull_ir::{FromVar, IntoVar, Message, ScriptValue, Var, VarArray, VarTable};

pub use binder::{FunctionBinder, IntoNativeFunction, IntoNativeMethod, ScriptEnum};
pub use callable::{DefReturn, Lambda, Macro, NativeFunction};
pub use config::{EngineConfig, DEFAULT_RECURSION_LIMIT, MAX_LAMBDA_ARGS};
pub use engine::{Script, ScriptEngine};
pub use environment::{Environment, LocalScope, Scope};
pub use errors::{ScriptError, ScriptErrorKind, ScriptResult};
pub use frame::{describe, ScriptFrame};
pub use globals::{FunctionCall, FunctionCallHandler, Globals, SharedGlobals};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, PrintHandler, SharedPrintHandler,
};
pub use script_env::{ScopedEnv, ScriptEnv};
