//! ECS error types.

use crate::entity::Entity;

/// Errors raised by component stores, the registry, and the scheduler.
#[derive(Debug, thiserror::Error)]
pub enum EcsError {
    /// The component type belongs to the registry's set but was never registered.
    #[error("component `{name}` is not registered")]
    UnregisteredComponent {
        /// Type name of the component.
        name: &'static str,
    },

    /// A store was indexed past its length. The allocator and the store are
    /// out of sync.
    #[error("slot {index} is out of range for a store of length {len}")]
    IndexOutOfRange {
        /// The offending slot index.
        index: usize,
        /// The store length at the time of access.
        len: usize,
    },

    /// The handle is dead or stale.
    #[error("{0} is not alive")]
    EntityNotFound(Entity),

    /// The store is already borrowed in a way that conflicts with this access.
    #[error("component store `{name}` is already borrowed")]
    StoreBorrowed {
        /// Type name of the component.
        name: &'static str,
    },

    /// A system tried to run the scheduler from inside a tick.
    #[error("run_systems called while systems are already running")]
    ReentrantRun,

    /// A system returned an error; the remaining systems of the tick were skipped.
    #[error("system `{name}` failed")]
    System {
        /// The failing system's name.
        name: String,
        /// The error the system returned.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
