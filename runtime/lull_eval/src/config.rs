//! Engine configuration.

use std::fmt;

use crate::print_handler::{stdout_handler, SharedPrintHandler};

/// Default ceiling on nested script calls.
pub const DEFAULT_RECURSION_LIMIT: usize = 512;

/// Most arguments a lambda call may pass.
pub const MAX_LAMBDA_ARGS: usize = 16;

#[derive(Clone)]
pub struct EngineConfig {
    /// Nested lambda/macro calls allowed before `RecursionLimit`. `None`
    /// removes the limit.
    pub recursion_limit: Option<usize>,
    pub print_handler: SharedPrintHandler,
}

impl EngineConfig {
    #[must_use]
    pub fn with_recursion_limit(mut self, limit: Option<usize>) -> Self {
        self.recursion_limit = limit;
        self
    }

    #[must_use]
    pub fn with_print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = handler;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            recursion_limit: Some(DEFAULT_RECURSION_LIMIT),
            print_handler: stdout_handler(),
        }
    }
}

impl fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field("recursion_limit", &self.recursion_limit)
            .finish_non_exhaustive()
    }
}
