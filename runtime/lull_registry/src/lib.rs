//! Lull Registry - owns long-lived services keyed by type.
//!
//! The host builds one `Registry` at startup, registers every service, declares
//! which services depend on which, and then calls [`Registry::initialize`].
//! The registry is an explicit context object; components that need to find
//! each other are handed a `&Registry` rather than reaching for a global.
//!
//! # Ordering
//!
//! - Initializers run leaves-first over the declared dependency edges, so a
//!   service's initializer sees its dependencies already initialized.
//! - Initializers for types with no declared edges run afterward, in the order
//!   they were registered.
//! - Services are dropped in exact reverse of registration order. Each entry
//!   is dropped before it leaves the lookup index.
//!
//! # Teardown
//!
//! A `Drop` impl has no handle on the registry, so a service that must talk
//! to its dependencies on the way out registers a finalizer with
//! [`Registry::register_finalizer`]. Finalizers run during teardown just
//! before their service is dropped, while that service and every service
//! registered before it are still reachable through [`Registry::get`].

mod error;

use std::any::{type_name, Any};
use std::collections::VecDeque;

use lull_ir::TypeId;
use rustc_hash::{FxHashMap, FxHashSet};

pub use error::{MissingDependency, RegistryError};

type Initializer = Box<dyn FnOnce(&mut dyn Any, &Registry)>;

struct Entry {
    type_id: TypeId,
    type_name: &'static str,
    object: Option<Box<dyn Any>>,
}

struct Dependency {
    dependent: TypeId,
    dependent_name: &'static str,
    target: TypeId,
    target_name: &'static str,
}

struct PendingInit {
    type_id: TypeId,
    type_name: &'static str,
    run: Initializer,
}

/// Service container with dependency-ordered initialization.
#[derive(Default)]
pub struct Registry {
    entries: Vec<Entry>,
    index: FxHashMap<TypeId, usize>,
    dependencies: Vec<Dependency>,
    pending: Vec<PendingInit>,
    finalizers: Vec<PendingInit>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    /// Take ownership of `instance` as the `T` service.
    ///
    /// # Panics
    ///
    /// If a `T` is already registered.
    pub fn register<T: Any>(&mut self, instance: T) {
        let type_id = TypeId::of::<T>();
        assert!(
            !self.index.contains_key(&type_id),
            "service {} registered twice",
            type_name::<T>()
        );
        tracing::debug!(service = type_name::<T>(), "registered service");
        self.index.insert(type_id, self.entries.len());
        self.entries.push(Entry {
            type_id,
            type_name: type_name::<T>(),
            object: Some(Box::new(instance)),
        });
    }

    /// The registered `T`, if any. Never constructs on demand.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.entry(TypeId::of::<T>())?
            .object
            .as_deref()?
            .downcast_ref()
    }

    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        let slot = *self.index.get(&TypeId::of::<T>())?;
        self.entries.get_mut(slot)?.object.as_deref_mut()?.downcast_mut()
    }

    pub fn contains<T: Any>(&self) -> bool {
        self.index.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record that `Dependent` must be initialized after `Target`, and that
    /// `Target` must be registered by the time [`Registry::initialize`] runs.
    pub fn declare_dependency<Dependent: Any, Target: Any>(&mut self) {
        self.dependencies.push(Dependency {
            dependent: TypeId::of::<Dependent>(),
            dependent_name: type_name::<Dependent>(),
            target: TypeId::of::<Target>(),
            target_name: type_name::<Target>(),
        });
    }

    /// Queue a one-shot callback that runs on the `T` service during
    /// initialization. The callback may look up other services through the
    /// registry; the `T` itself is lent out for the call.
    pub fn register_initializer<T: Any>(&mut self, init: impl FnOnce(&mut T, &Registry) + 'static) {
        self.pending.push(PendingInit {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            run: Box::new(move |object, registry| {
                if let Some(service) = object.downcast_mut::<T>() {
                    init(service, registry);
                }
            }),
        });
    }

    /// Queue a callback that runs on the `T` service during teardown, right
    /// before it is dropped. Services registered before `T` are still
    /// registered at that point; services registered after it are gone.
    pub fn register_finalizer<T: Any>(&mut self, finalize: impl FnOnce(&mut T, &Registry) + 'static) {
        self.finalizers.push(PendingInit {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            run: Box::new(move |object, registry| {
                if let Some(service) = object.downcast_mut::<T>() {
                    finalize(service, registry);
                }
            }),
        });
    }

    /// Run every pending initializer.
    ///
    /// # Panics
    ///
    /// On a missing declared dependency or a dependency cycle. Both are
    /// wiring defects in the host and are not recoverable.
    pub fn initialize(&mut self) {
        if let Err(err) = self.try_initialize() {
            panic!("registry initialization failed: {err}");
        }
    }

    /// As [`Registry::initialize`], but reports wiring defects instead of
    /// panicking. Nothing runs when an error is returned.
    #[tracing::instrument(level = "debug", skip_all, fields(services = self.entries.len()))]
    pub fn try_initialize(&mut self) -> Result<(), RegistryError> {
        self.check_dependencies()?;
        let order = self.initialization_order()?;

        let mut pending: Vec<Option<PendingInit>> =
            std::mem::take(&mut self.pending).into_iter().map(Some).collect();
        for type_id in order {
            for slot in &mut pending {
                if slot.as_ref().is_some_and(|init| init.type_id == type_id) {
                    if let Some(init) = slot.take() {
                        self.run_initializer(init);
                    }
                }
            }
        }
        for init in pending.into_iter().flatten() {
            self.run_initializer(init);
        }
        Ok(())
    }

    fn entry(&self, type_id: TypeId) -> Option<&Entry> {
        self.entries.get(*self.index.get(&type_id)?)
    }

    fn check_dependencies(&self) -> Result<(), RegistryError> {
        let missing: Vec<MissingDependency> = self
            .dependencies
            .iter()
            .filter(|dep| !self.index.contains_key(&dep.target))
            .map(|dep| MissingDependency {
                dependent: dep.dependent_name,
                dependency: dep.target_name,
            })
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        for dep in &missing {
            tracing::error!(
                dependent = dep.dependent,
                dependency = dep.dependency,
                "missing registry dependency"
            );
        }
        Err(RegistryError::MissingDependencies(missing))
    }

    /// Leaves-first order over every type that appears in a dependency edge.
    /// Ties break by first appearance in the declarations.
    fn initialization_order(&self) -> Result<Vec<TypeId>, RegistryError> {
        let mut nodes: Vec<(TypeId, &'static str)> = Vec::new();
        let mut seen = FxHashSet::default();
        for dep in &self.dependencies {
            for node in [(dep.target, dep.target_name), (dep.dependent, dep.dependent_name)] {
                if seen.insert(node.0) {
                    nodes.push(node);
                }
            }
        }

        let mut in_degree: FxHashMap<TypeId, usize> =
            nodes.iter().map(|&(id, _)| (id, 0)).collect();
        let mut dependents: FxHashMap<TypeId, Vec<TypeId>> = FxHashMap::default();
        let mut edges = FxHashSet::default();
        for dep in &self.dependencies {
            if !edges.insert((dep.dependent, dep.target)) {
                continue;
            }
            *in_degree.entry(dep.dependent).or_default() += 1;
            dependents.entry(dep.target).or_default().push(dep.dependent);
        }

        let mut queue: VecDeque<TypeId> = nodes
            .iter()
            .map(|&(id, _)| id)
            .filter(|id| in_degree.get(id) == Some(&0))
            .collect();
        let mut order = Vec::with_capacity(nodes.len());
        while let Some(id) = queue.pop_front() {
            order.push(id);
            for dependent in dependents.get(&id).into_iter().flatten() {
                if let Some(degree) = in_degree.get_mut(dependent) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(*dependent);
                    }
                }
            }
        }

        if order.len() == nodes.len() {
            return Ok(order);
        }
        let cycle = nodes
            .iter()
            .filter(|(id, _)| in_degree.get(id).is_some_and(|&degree| degree > 0))
            .map(|&(_, name)| name)
            .collect();
        Err(RegistryError::DependencyCycle(cycle))
    }

    fn run_initializer(&mut self, init: PendingInit) {
        let Some(&slot) = self.index.get(&init.type_id) else {
            tracing::warn!(service = init.type_name, "initializer for unregistered service skipped");
            return;
        };
        tracing::debug!(service = init.type_name, "running initializer");
        self.lend(slot, init.run);
    }

    /// Take the service at `slot` out for the duration of `run`, so `run`
    /// can hold it mutably alongside a shared borrow of the registry.
    fn lend(&mut self, slot: usize, run: Initializer) {
        let Some(mut object) = self.entries.get_mut(slot).and_then(|entry| entry.object.take()) else {
            return;
        };
        run(&mut *object, self);
        if let Some(entry) = self.entries.get_mut(slot) {
            entry.object = Some(object);
        }
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        let mut finalizers = std::mem::take(&mut self.finalizers);
        for slot in (0..self.entries.len()).rev() {
            let Some(entry) = self.entries.get(slot) else {
                continue;
            };
            let (type_id, type_name) = (entry.type_id, entry.type_name);

            let (due, rest): (Vec<_>, Vec<_>) = finalizers
                .into_iter()
                .partition(|finalizer| finalizer.type_id == type_id);
            finalizers = rest;
            for finalizer in due {
                tracing::trace!(service = type_name, "running finalizer");
                self.lend(slot, finalizer.run);
            }

            tracing::trace!(service = type_name, "dropping service");
            let object = self.entries.get_mut(slot).and_then(|entry| entry.object.take());
            drop(object);
            self.index.remove(&type_id);
            self.entries.truncate(slot);
        }
        for finalizer in finalizers {
            tracing::warn!(service = finalizer.type_name, "finalizer for unregistered service skipped");
        }
    }
}

#[cfg(test)]
mod tests;
