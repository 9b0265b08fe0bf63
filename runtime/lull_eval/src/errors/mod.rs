//! Script-level errors.
//!
//! A `ScriptError` aborts the current evaluation and unwinds to whoever
//! started it (`run_now`, `Script::run`, a host `call`). The engine, its
//! function table and any registered services stay valid.
//!
//! Factory functions are the public way to build errors; each one fills in
//! the structured `ScriptErrorKind` so callers can match on it.

use lull_parse::ParseError;
use thiserror::Error;

/// Result of evaluating script code.
pub type ScriptResult<T = lull_ir::ScriptValue> = Result<T, ScriptError>;

/// Typed category of a script failure.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ScriptErrorKind {
    #[error("undefined symbol '{name}'")]
    UndefinedSymbol { name: String },
    #[error("{name} expects {expected} argument(s), got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    #[error("{name} argument {position} expects {expected}, got {got}")]
    TypeMismatch {
        name: String,
        position: usize,
        expected: String,
        got: String,
    },
    #[error("value of type {found} is not callable")]
    NotCallable { found: String },
    #[error("missing argument")]
    MissingArgument,
    #[error("too many arguments (limit {limit})")]
    TooManyArguments { limit: usize },
    #[error("division by zero")]
    DivisionByZero,
    #[error("maximum recursion depth {depth} exceeded")]
    RecursionLimit { depth: usize },
    #[error("receiver of '{name}' was dropped")]
    ReceiverDropped { name: String },
    #[error("{0}")]
    Parse(ParseError),
    #[error("{message}")]
    Custom { message: String },
}

/// A recoverable script failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptError {
    pub kind: ScriptErrorKind,
    /// Where it happened, e.g. the offending form or argument position.
    pub context: Option<String>,
}

impl std::fmt::Display for ScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.context {
            Some(context) => write!(f, "{} (in {context})", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for ScriptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl ScriptError {
    pub fn new(kind: ScriptErrorKind) -> Self {
        ScriptError {
            kind,
            context: None,
        }
    }

    /// Attach context unless some is already present; the innermost context
    /// is the most precise.
    #[must_use]
    pub fn with_context(mut self, context: impl FnOnce() -> String) -> Self {
        if self.context.is_none() {
            self.context = Some(context());
        }
        self
    }
}

impl From<ParseError> for ScriptError {
    fn from(err: ParseError) -> Self {
        ScriptError::new(ScriptErrorKind::Parse(err))
    }
}

#[cold]
pub fn undefined_symbol(name: &str) -> ScriptError {
    ScriptError::new(ScriptErrorKind::UndefinedSymbol {
        name: name.to_owned(),
    })
}

#[cold]
pub fn wrong_arg_count(name: &str, expected: usize, got: usize) -> ScriptError {
    ScriptError::new(ScriptErrorKind::ArityMismatch {
        name: name.to_owned(),
        expected,
        got,
    })
}

#[cold]
pub fn wrong_arg_type(name: &str, position: usize, expected: &str, got: &str) -> ScriptError {
    ScriptError::new(ScriptErrorKind::TypeMismatch {
        name: name.to_owned(),
        position,
        expected: expected.to_owned(),
        got: got.to_owned(),
    })
}

#[cold]
pub fn not_callable(found: &str) -> ScriptError {
    ScriptError::new(ScriptErrorKind::NotCallable {
        found: found.to_owned(),
    })
}

#[cold]
pub fn missing_argument() -> ScriptError {
    ScriptError::new(ScriptErrorKind::MissingArgument)
}

#[cold]
pub fn too_many_arguments(limit: usize) -> ScriptError {
    ScriptError::new(ScriptErrorKind::TooManyArguments { limit })
}

#[cold]
pub fn division_by_zero() -> ScriptError {
    ScriptError::new(ScriptErrorKind::DivisionByZero)
}

#[cold]
pub fn recursion_limit_exceeded(depth: usize) -> ScriptError {
    ScriptError::new(ScriptErrorKind::RecursionLimit { depth })
}

#[cold]
pub fn receiver_dropped(name: &str) -> ScriptError {
    ScriptError::new(ScriptErrorKind::ReceiverDropped {
        name: name.to_owned(),
    })
}

#[cold]
pub fn custom(message: impl Into<String>) -> ScriptError {
    ScriptError::new(ScriptErrorKind::Custom {
        message: message.into(),
    })
}
