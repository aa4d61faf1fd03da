//! Typed domain events handed from the I/O layer to the tick thread.

use engine_math::{Position, Velocity};
use serde::{Deserialize, Serialize};

use crate::components::{Actions, PlayerId, ProjectileId};

/// A decoded, already-validated event for the simulation to apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The server told this process which player it controls.
    AssignPlayer { id: PlayerId },
    /// A player entered the game.
    PlayerJoin { id: PlayerId, position: Position },
    /// A player left the game.
    PlayerLeave { id: PlayerId },
    /// A player's held actions changed.
    PlayerInput { id: PlayerId, actions: Actions },
    /// Authoritative position for a player.
    PositionUpdate { id: PlayerId, position: Position },
    /// Authoritative state for a projectile, added if unseen.
    ProjectileUpdate {
        id: ProjectileId,
        position: Position,
        velocity: Velocity,
    },
    /// The connection dropped; every entity is discarded.
    Disconnect,
    /// Liveness probe, answered with [`GameEvent::Pong`].
    Ping { nonce: u64 },
    /// Answer to [`GameEvent::Ping`].
    Pong { nonce: u64 },
}

impl GameEvent {
    /// Short label for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AssignPlayer { .. } => "assign_player",
            Self::PlayerJoin { .. } => "player_join",
            Self::PlayerLeave { .. } => "player_leave",
            Self::PlayerInput { .. } => "player_input",
            Self::PositionUpdate { .. } => "position_update",
            Self::ProjectileUpdate { .. } => "projectile_update",
            Self::Disconnect => "disconnect",
            Self::Ping { .. } => "ping",
            Self::Pong { .. } => "pong",
        }
    }
}
