//! Id adapter between network identifiers and entity handles.
//!
//! [`GameState`] maps player ids and projectile ids to the entities that
//! represent them. It owns no component data: adding an id spawns an entity
//! in the registry and attaches its starting components, removing an id kills
//! the entity. Lookups of an id whose entity is no longer alive report
//! not-found.

use std::collections::HashMap;

use tracing::{debug, info};

use engine_component::{EcsError, Entity};
use engine_math::{Position, Velocity};

use crate::components::{
    Actions, GameRegistry, Health, PROJECTILE_TTL, PlayerId, PlayerTag, Projectile, ProjectileId,
    Speed,
};
use crate::error::GameError;

/// Player and projectile lookup tables for one simulation.
#[derive(Debug, Default)]
pub struct GameState {
    players: HashMap<PlayerId, Entity>,
    projectiles: HashMap<ProjectileId, Entity>,
    /// The player this process controls, once the server has assigned one.
    local_player: Option<PlayerId>,
}

impl GameState {
    /// Creates empty lookup tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- Players --

    /// Spawns the avatar for player `id` at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::DuplicatePlayer`] if `id` is already live; the
    /// registry is left untouched.
    pub fn add_player(
        &mut self,
        registry: &mut GameRegistry,
        id: PlayerId,
        position: Position,
    ) -> Result<Entity, GameError> {
        if self.player(registry, id).is_some() {
            return Err(GameError::DuplicatePlayer(id));
        }

        let entity = registry.spawn_entity();
        let attached = (|| -> Result<(), EcsError> {
            registry.add_component(entity, PlayerTag { id })?;
            registry.add_component(entity, position)?;
            registry.add_component(entity, Velocity::ZERO)?;
            registry.add_component(entity, Actions::NONE)?;
            registry.add_component(entity, Speed::default())?;
            registry.add_component(entity, Health::default())?;
            Ok(())
        })();
        if let Err(err) = attached {
            registry.kill_entity(entity);
            return Err(err.into());
        }

        self.players.insert(id, entity);
        info!(player = id, %entity, "player added");
        Ok(entity)
    }

    /// The live entity for player `id`.
    #[must_use]
    pub fn player(&self, registry: &GameRegistry, id: PlayerId) -> Option<Entity> {
        self.players
            .get(&id)
            .copied()
            .filter(|&entity| registry.is_alive(entity))
    }

    /// Removes player `id` and kills its entity. No-op if unknown.
    pub fn remove_player(&mut self, registry: &mut GameRegistry, id: PlayerId) -> bool {
        let Some(entity) = self.players.remove(&id) else {
            return false;
        };
        if self.local_player == Some(id) {
            self.local_player = None;
        }
        info!(player = id, %entity, "player removed");
        registry.kill_entity(entity)
    }

    /// Replaces the held actions of player `id`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PlayerNotFound`] if `id` is not live.
    pub fn set_actions(
        &self,
        registry: &mut GameRegistry,
        id: PlayerId,
        actions: Actions,
    ) -> Result<(), GameError> {
        let entity = self
            .player(registry, id)
            .ok_or(GameError::PlayerNotFound(id))?;
        registry.add_component(entity, actions)?;
        Ok(())
    }

    /// Moves player `id` to an authoritative position.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PlayerNotFound`] if `id` is not live.
    pub fn set_position(
        &self,
        registry: &mut GameRegistry,
        id: PlayerId,
        position: Position,
    ) -> Result<(), GameError> {
        let entity = self
            .player(registry, id)
            .ok_or(GameError::PlayerNotFound(id))?;
        registry.add_component(entity, position)?;
        Ok(())
    }

    /// Live players and their entities, in no particular order.
    pub fn players<'a>(
        &'a self,
        registry: &'a GameRegistry,
    ) -> impl Iterator<Item = (PlayerId, Entity)> + 'a {
        self.players
            .iter()
            .map(|(&id, &entity)| (id, entity))
            .filter(|&(_, entity)| registry.is_alive(entity))
    }

    /// Number of live players.
    #[must_use]
    pub fn player_count(&self, registry: &GameRegistry) -> usize {
        self.players(registry).count()
    }

    /// Records which player this process controls.
    pub fn assign_local_player(&mut self, id: PlayerId) {
        debug!(player = id, "local player assigned");
        self.local_player = Some(id);
    }

    /// The player this process controls, if assigned.
    #[must_use]
    pub fn local_player(&self) -> Option<PlayerId> {
        self.local_player
    }

    // -- Projectiles --

    /// Spawns projectile `id`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::DuplicateProjectile`] if `id` is already live.
    pub fn add_projectile(
        &mut self,
        registry: &mut GameRegistry,
        id: ProjectileId,
        position: Position,
        velocity: Velocity,
    ) -> Result<Entity, GameError> {
        if self.projectile(registry, id).is_some() {
            return Err(GameError::DuplicateProjectile(id));
        }

        let entity = registry.spawn_entity();
        let attached = (|| -> Result<(), EcsError> {
            registry.add_component(entity, Projectile { id, ttl: PROJECTILE_TTL })?;
            registry.add_component(entity, position)?;
            registry.add_component(entity, velocity)?;
            Ok(())
        })();
        if let Err(err) = attached {
            registry.kill_entity(entity);
            return Err(err.into());
        }

        self.projectiles.insert(id, entity);
        debug!(projectile = %id, %entity, "projectile added");
        Ok(entity)
    }

    /// Updates projectile `id` in place, or adds it if it is not live.
    ///
    /// An update restarts the projectile's lifetime.
    ///
    /// # Errors
    ///
    /// Propagates registry failures.
    pub fn upsert_projectile(
        &mut self,
        registry: &mut GameRegistry,
        id: ProjectileId,
        position: Position,
        velocity: Velocity,
    ) -> Result<Entity, GameError> {
        match self.projectile(registry, id) {
            Some(entity) => {
                registry.add_component(entity, Projectile { id, ttl: PROJECTILE_TTL })?;
                registry.add_component(entity, position)?;
                registry.add_component(entity, velocity)?;
                Ok(entity)
            }
            None => self.add_projectile(registry, id, position, velocity),
        }
    }

    /// The live entity for projectile `id`.
    #[must_use]
    pub fn projectile(&self, registry: &GameRegistry, id: ProjectileId) -> Option<Entity> {
        self.projectiles
            .get(&id)
            .copied()
            .filter(|&entity| registry.is_alive(entity))
    }

    /// Removes projectile `id` and kills its entity. No-op if unknown.
    pub fn remove_projectile(&mut self, registry: &mut GameRegistry, id: ProjectileId) -> bool {
        match self.projectiles.remove(&id) {
            Some(entity) => registry.kill_entity(entity),
            None => false,
        }
    }

    /// Number of tracked projectiles.
    #[must_use]
    pub fn projectile_count(&self) -> usize {
        self.projectiles.len()
    }

    /// Kills every tracked entity and forgets all ids.
    pub fn clear(&mut self, registry: &mut GameRegistry) {
        let players = self.players.len();
        let projectiles = self.projectiles.len();
        for (_, entity) in self.players.drain() {
            registry.kill_entity(entity);
        }
        for (_, entity) in self.projectiles.drain() {
            registry.kill_entity(entity);
        }
        self.local_player = None;
        info!(players, projectiles, "game state cleared");
    }
}
