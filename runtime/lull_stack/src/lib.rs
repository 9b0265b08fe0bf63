//! Stack safety for the tree-walking evaluator and the reader.
//!
//! Two independent guards:
//!
//! - [`ensure_sufficient_stack`] grows the native stack (via `stacker`) when
//!   a recursive eval or a nested-list read gets close to the end of it.
//! - [`CallDepth`] counts nested script calls so that runaway script
//!   recursion becomes a script error instead of exhausting memory.

use std::cell::Cell;

/// Remaining stack below which we grow (100KB).
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
///
/// ```text
/// fn eval(&mut self, value: &ScriptValue) -> Result<ScriptValue, ScriptError> {
///     ensure_sufficient_stack(|| self.eval_inner(value))
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack; call straight through.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Nesting counter with an optional ceiling.
#[derive(Debug, Default)]
pub struct CallDepth {
    current: Cell<usize>,
    limit: Option<usize>,
}

impl CallDepth {
    /// A counter that refuses to go deeper than `limit`. `None` never refuses.
    pub fn new(limit: Option<usize>) -> Self {
        CallDepth {
            current: Cell::new(0),
            limit,
        }
    }

    #[inline]
    pub fn current(&self) -> usize {
        self.current.get()
    }

    #[inline]
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Enter one level. Returns `None` once the limit would be exceeded; the
    /// returned guard leaves the level when dropped.
    pub fn enter(&self) -> Option<DepthGuard<'_>> {
        let next = self.current.get() + 1;
        if self.limit.is_some_and(|limit| next > limit) {
            return None;
        }
        self.current.set(next);
        Some(DepthGuard { depth: self })
    }
}

/// One entered level of a [`CallDepth`].
#[must_use = "the level is left as soon as the guard is dropped"]
pub struct DepthGuard<'a> {
    depth: &'a CallDepth,
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.depth.current.set(self.depth.current.get().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deep_recursion_grows_stack() {
        fn count_down(n: u64) -> u64 {
            ensure_sufficient_stack(|| if n == 0 { 0 } else { count_down(n - 1) + 1 })
        }

        assert_eq!(count_down(100_000), 100_000);
    }

    #[test]
    fn test_passes_result_through() {
        let result: Result<i32, &str> = ensure_sufficient_stack(|| Ok(123));
        assert_eq!(result, Ok(123));
    }

    #[test]
    fn test_call_depth_limit() {
        let depth = CallDepth::new(Some(2));
        let first = depth.enter();
        assert!(first.is_some());
        let second = depth.enter();
        assert!(second.is_some());
        assert_eq!(depth.current(), 2);
        assert!(depth.enter().is_none());
        drop(second);
        assert_eq!(depth.current(), 1);
        assert!(depth.enter().is_some());
    }

    #[test]
    fn test_call_depth_unlimited() {
        let depth = CallDepth::new(None);
        let guards: Vec<_> = (0..1000).filter_map(|_| depth.enter()).collect();
        assert_eq!(guards.len(), 1000);
        drop(guards);
        assert_eq!(depth.current(), 0);
    }
}
