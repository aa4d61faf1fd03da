//! The per-process simulation: registry, id adapter, inbox and tick counter.

use tracing::{debug, info, warn};

use crate::components::{GameRegistry, ProjectileId, register_components};
use crate::error::GameError;
use crate::events::GameEvent;
use crate::inbox::{EventInbox, EventSender};
use crate::state::GameState;
use crate::systems;

/// Context handed to every system for one tick.
#[derive(Debug, Default)]
pub struct TickContext {
    /// Tick being run.
    pub tick_id: u64,
    /// Projectiles that ran out of lifetime this tick.
    pub expired_projectiles: Vec<ProjectileId>,
}

/// What a call to [`Simulation::tick`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub tick_id: u64,
    pub events_applied: usize,
    pub events_rejected: usize,
    pub expired_projectiles: Vec<ProjectileId>,
}

/// Single-writer game simulation.
///
/// Every mutation happens inside [`Simulation::tick`] or [`Simulation::apply`]
/// on the owning thread. Other threads and tasks only reach it through an
/// [`EventSender`].
#[derive(Debug)]
pub struct Simulation {
    registry: GameRegistry,
    state: GameState,
    inbox: EventInbox,
    outbox: Vec<GameEvent>,
    tick_id: u64,
}

impl Simulation {
    /// Builds a simulation with every component registered and every system
    /// installed.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = GameRegistry::new();
        register_components(&mut registry);
        systems::install(&mut registry);
        Self {
            registry,
            state: GameState::new(),
            inbox: EventInbox::new(),
            outbox: Vec::new(),
            tick_id: 0,
        }
    }

    /// A producer handle for I/O tasks.
    #[must_use]
    pub fn sender(&self) -> EventSender {
        self.inbox.sender()
    }

    /// Advances the game by `dt` seconds.
    ///
    /// Queued events are applied first, in arrival order. An event that fails
    /// (unknown player, duplicate id) is logged and skipped. Systems then run
    /// once and expired projectiles are removed. The tick counter advances
    /// even when a system fails.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Ecs`] if a system failed.
    pub fn tick(&mut self, dt: f32) -> Result<TickReport, GameError> {
        let events = self.inbox.drain();
        let mut applied = 0;
        let mut rejected = 0;
        for event in events {
            let kind = event.kind();
            match self.apply(event) {
                Ok(()) => applied += 1,
                Err(err) => {
                    rejected += 1;
                    warn!(tick = self.tick_id, event = kind, error = %err, "event rejected");
                }
            }
        }

        let mut ctx = TickContext {
            tick_id: self.tick_id,
            expired_projectiles: Vec::new(),
        };
        let outcome = self.registry.run_systems(dt, Some(&mut ctx));

        for &id in &ctx.expired_projectiles {
            self.state.remove_projectile(&mut self.registry, id);
        }

        let report = TickReport {
            tick_id: self.tick_id,
            events_applied: applied,
            events_rejected: rejected,
            expired_projectiles: ctx.expired_projectiles,
        };
        self.tick_id += 1;
        outcome?;
        Ok(report)
    }

    /// Applies one event immediately.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error when the event does not fit the current
    /// state, e.g. input for an unknown player.
    pub fn apply(&mut self, event: GameEvent) -> Result<(), GameError> {
        match event {
            GameEvent::AssignPlayer { id } => {
                self.state.assign_local_player(id);
            }
            GameEvent::PlayerJoin { id, position } => {
                self.state.add_player(&mut self.registry, id, position)?;
            }
            GameEvent::PlayerLeave { id } => {
                self.state.remove_player(&mut self.registry, id);
            }
            GameEvent::PlayerInput { id, actions } => {
                self.state.set_actions(&mut self.registry, id, actions)?;
            }
            GameEvent::PositionUpdate { id, position } => {
                self.state.set_position(&mut self.registry, id, position)?;
            }
            GameEvent::ProjectileUpdate {
                id,
                position,
                velocity,
            } => {
                self.state
                    .upsert_projectile(&mut self.registry, id, position, velocity)?;
            }
            GameEvent::Disconnect => {
                info!("disconnected, clearing game state");
                self.state.clear(&mut self.registry);
            }
            GameEvent::Ping { nonce } => {
                self.outbox.push(GameEvent::Pong { nonce });
            }
            GameEvent::Pong { nonce } => {
                debug!(nonce, "pong received");
            }
        }
        Ok(())
    }

    /// Replies produced since the last call.
    pub fn take_outbox(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.outbox)
    }

    pub fn registry(&self) -> &GameRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut GameRegistry {
        &mut self.registry
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Id of the next tick to run.
    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.tick_id
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_installs_systems() {
        let sim = Simulation::new();
        assert_eq!(
            sim.registry().system_names(),
            vec!["movement", "projectile_lifetime"]
        );
        assert_eq!(sim.registry().registered_components().len(), 7);
    }

    #[test]
    fn test_ping_answers_pong() {
        let mut sim = Simulation::new();
        sim.sender().send(GameEvent::Ping { nonce: 42 }).unwrap();
        let report = sim.tick(0.016).unwrap();
        assert_eq!(report.events_applied, 1);
        assert_eq!(sim.take_outbox(), vec![GameEvent::Pong { nonce: 42 }]);
        assert!(sim.take_outbox().is_empty());
    }

    #[test]
    fn test_rejected_events_do_not_stop_the_tick() {
        let mut sim = Simulation::new();
        let tx = sim.sender();
        tx.send(GameEvent::PlayerInput {
            id: 9,
            actions: crate::components::Actions::MOVE_UP,
        })
        .unwrap();
        tx.send(GameEvent::Ping { nonce: 1 }).unwrap();

        let report = sim.tick(0.016).unwrap();
        assert_eq!(report.events_rejected, 1);
        assert_eq!(report.events_applied, 1);
        assert_eq!(sim.tick_id(), 1);
    }

    #[test]
    fn test_failing_system_still_advances_tick() {
        let mut sim = Simulation::new();
        sim.registry_mut()
            .add_system("broken", |_, _, _| anyhow::bail!("boom"));

        let err = sim.tick(0.016).unwrap_err();
        assert!(matches!(err, GameError::Ecs(_)));
        assert_eq!(sim.tick_id(), 1);
    }
}
