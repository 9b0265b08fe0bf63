//! Registry configuration errors.

use std::fmt;

use thiserror::Error;

/// A declared dependency whose target was never registered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissingDependency {
    pub dependent: &'static str,
    pub dependency: &'static str,
}

impl fmt::Display for MissingDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} depends on {}", self.dependent, self.dependency)
    }
}

/// Startup wiring failures reported by [`Registry::try_initialize`](crate::Registry::try_initialize).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("missing registry dependencies: {}", join(.0))]
    MissingDependencies(Vec<MissingDependency>),
    #[error("initializer dependency cycle among: {}", .0.join(", "))]
    DependencyCycle(Vec<&'static str>),
}

fn join(missing: &[MissingDependency]) -> String {
    missing
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
