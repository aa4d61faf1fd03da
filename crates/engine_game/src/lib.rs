//! # engine_game
//!
//! The game layer built on the ECS core. It is shared by the client and the
//! headless server binary.
//!
//! - [`components`]: game component types and the [`GameRegistry`] alias.
//! - [`GameState`]: maps player and projectile ids to entities.
//! - [`GameEvent`] / [`EventInbox`]: typed events queued by I/O tasks and
//!   drained on the tick thread.
//! - [`systems`]: movement and projectile lifetime.
//! - [`Simulation`]: ties the above together behind a single `tick(dt)`.

pub mod components;
pub mod error;
pub mod events;
pub mod inbox;
pub mod simulation;
pub mod state;
pub mod systems;

pub use components::{GameComponents, GameRegistry, PlayerId, ProjectileId};
pub use error::GameError;
pub use events::GameEvent;
pub use inbox::{EventInbox, EventSender};
pub use simulation::{Simulation, TickContext, TickReport};
pub use state::GameState;
