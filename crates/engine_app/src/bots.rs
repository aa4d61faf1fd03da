//! Scripted bot players.
//!
//! Bots run on their own tokio task and reach the simulation only through an
//! [`EventSender`], the same way a network reader would.

use std::time::Duration;

use engine_game::components::Actions;
use engine_game::{EventSender, GameError, GameEvent, PlayerId};
use engine_math::Position;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, info};

/// Rounds each bot holds one input before switching to the next.
const ROUNDS_PER_STEP: u64 = 30;

/// Rounds between liveness pings.
const PING_EVERY: u64 = 60;

/// Walks a square: right, down, left, up.
const PATTERN: [Actions; 4] = [
    Actions::MOVE_RIGHT,
    Actions::MOVE_DOWN,
    Actions::MOVE_LEFT,
    Actions::MOVE_UP,
];

/// The input bot `id` holds during `round`.
#[must_use]
pub fn actions_for(id: PlayerId, round: u64) -> Actions {
    let step = (round / ROUNDS_PER_STEP + u64::from(id)) % PATTERN.len() as u64;
    PATTERN[step as usize]
}

/// Where bot `id` joins.
#[must_use]
pub fn spawn_point(id: PlayerId) -> Position {
    Position::new(f32::from(id) * 32.0, 0.0)
}

/// Joins `count` bots (ids `1..=count`) and feeds them input every `period`
/// until the inbox closes.
pub fn spawn(sender: EventSender, count: u8, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(err) = drive(&sender, count, period).await {
            debug!(error = %err, "bots stopped");
        }
    })
}

async fn drive(sender: &EventSender, count: u8, period: Duration) -> Result<(), GameError> {
    for id in 1..=count {
        sender.send(GameEvent::PlayerJoin {
            id,
            position: spawn_point(id),
        })?;
    }
    info!(count, "bots joined");

    let mut interval = time::interval(period);
    let mut round = 0u64;
    loop {
        interval.tick().await;
        if round % ROUNDS_PER_STEP == 0 {
            for id in 1..=count {
                sender.send(GameEvent::PlayerInput {
                    id,
                    actions: actions_for(id, round),
                })?;
            }
        }
        if round % PING_EVERY == 0 {
            sender.send(GameEvent::Ping { nonce: round })?;
        }
        round += 1;
    }
}

#[cfg(test)]
mod tests {
    use engine_game::Simulation;

    use super::*;

    #[test]
    fn test_pattern_is_deterministic() {
        assert_eq!(actions_for(0, 0), Actions::MOVE_RIGHT);
        assert_eq!(actions_for(0, ROUNDS_PER_STEP), Actions::MOVE_DOWN);
        assert_eq!(actions_for(1, 0), Actions::MOVE_DOWN);
        assert_eq!(actions_for(3, ROUNDS_PER_STEP * 2), Actions::MOVE_DOWN);
    }

    #[tokio::test]
    async fn test_bots_join_and_stop_when_inbox_closes() {
        let mut sim = Simulation::new();
        let handle = spawn(sim.sender(), 3, Duration::from_millis(1));

        time::sleep(Duration::from_millis(20)).await;
        sim.tick(0.016).unwrap();
        assert_eq!(sim.state().player_count(sim.registry()), 3);
        for id in 1..=3 {
            assert!(sim.state().player(sim.registry(), id).is_some());
        }

        drop(sim);
        time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
