//! Game-layer error types.

use engine_component::EcsError;

use crate::components::{PlayerId, ProjectileId};

/// Errors raised while applying events or driving a tick.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// A player with this id is already in the game.
    #[error("player {0} already exists")]
    DuplicatePlayer(PlayerId),

    /// A projectile with this id is already in the game.
    #[error("projectile {0} already exists")]
    DuplicateProjectile(ProjectileId),

    /// No live player has this id.
    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),

    /// The simulation owning the inbox has been dropped.
    #[error("event inbox is closed")]
    InboxClosed,

    /// Registry or scheduler failure.
    #[error(transparent)]
    Ecs(#[from] EcsError),
}
