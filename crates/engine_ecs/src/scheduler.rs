//! Ordered, per-tick system execution.
//!
//! Systems run synchronously in registration order, each to completion before
//! the next starts. The first system to return an error aborts the rest of the
//! tick; the error is logged and handed back to the caller of
//! [`Registry::run_systems`](crate::Registry::run_systems).

use std::fmt;

use engine_component::ComponentSet;

use crate::registry::Registry;

/// Signature every system satisfies: registry, delta time in seconds, and an
/// optional per-tick context.
pub type SystemFn<C, Cx> =
    Box<dyn FnMut(&mut Registry<C, Cx>, f32, Option<&mut Cx>) -> anyhow::Result<()>>;

/// A named system.
pub struct RegisteredSystem<C: ComponentSet, Cx> {
    /// Name used in logs and errors (e.g. `"movement"`).
    pub name: String,
    pub(crate) run: SystemFn<C, Cx>,
}

impl<C: ComponentSet, Cx> fmt::Debug for RegisteredSystem<C, Cx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredSystem")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// The registry's ordered system list.
pub struct Scheduler<C: ComponentSet, Cx> {
    pub(crate) systems: Vec<RegisteredSystem<C, Cx>>,
    /// Set while `run_systems` is executing.
    pub(crate) running: bool,
    /// Completed `run_systems` calls, including aborted ones.
    pub(crate) runs: u64,
}

impl<C: ComponentSet, Cx> Scheduler<C, Cx> {
    /// Creates an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
            running: false,
            runs: 0,
        }
    }

    /// Appends a system. Duplicates are allowed and each copy runs.
    pub fn push(&mut self, system: RegisteredSystem<C, Cx>) {
        self.systems.push(system);
    }

    /// Number of registered systems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Returns `true` if no system is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// System names in execution order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.systems.iter().map(|s| s.name.as_str())
    }
}

impl<C: ComponentSet, Cx> Default for Scheduler<C, Cx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ComponentSet, Cx> fmt::Debug for Scheduler<C, Cx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("systems", &self.systems)
            .field("running", &self.running)
            .field("runs", &self.runs)
            .finish()
    }
}
