//! Fixed-timestep tick loop.
//!
//! Each tick drains the simulation's inbox and runs its systems once with
//! `dt = 1 / tick_rate`. Ticks are paced by a tokio interval; a tick that
//! overruns its budget is logged and the next one starts immediately.

use std::time::{Duration, Instant};

use engine_game::{Simulation, TickReport};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::config::TickConfig;

/// Drives a [`Simulation`] at a fixed rate.
#[derive(Debug)]
pub struct TickLoop {
    config: TickConfig,
    simulation: Simulation,
    ticks_run: u64,
}

impl TickLoop {
    #[must_use]
    pub fn new(config: TickConfig, simulation: Simulation) -> Self {
        Self {
            config,
            simulation,
            ticks_run: 0,
        }
    }

    /// Number of ticks run by this loop.
    #[must_use]
    pub fn ticks_run(&self) -> u64 {
        self.ticks_run
    }

    #[must_use]
    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Runs one tick. A failing system is logged and the loop carries on.
    pub fn tick(&mut self) -> Option<TickReport> {
        let dt = self.config.tick_duration().as_secs_f32();
        let outcome = self.simulation.tick(dt);
        self.ticks_run += 1;

        for reply in self.simulation.take_outbox() {
            debug!(event = reply.kind(), "reply ready");
        }

        match outcome {
            Ok(report) => {
                debug!(
                    tick_id = report.tick_id,
                    applied = report.events_applied,
                    rejected = report.events_rejected,
                    expired = report.expired_projectiles.len(),
                    "tick done"
                );
                Some(report)
            }
            Err(err) => {
                error!(tick_id = self.simulation.tick_id() - 1, error = %err, "tick failed");
                None
            }
        }
    }

    fn finished(&self) -> bool {
        self.config.max_ticks > 0 && self.ticks_run >= self.config.max_ticks
    }

    fn check_budget(&self, started: Instant, budget: Duration) {
        let elapsed = started.elapsed();
        if elapsed > budget {
            warn!(
                tick_id = self.simulation.tick_id(),
                elapsed_ms = elapsed.as_millis() as u64,
                budget_ms = budget.as_millis() as u64,
                "tick exceeded time budget"
            );
        }
    }

    /// Async loop paced by a tokio interval. Returns after `max_ticks` ticks
    /// or on Ctrl-C.
    pub async fn run_async(&mut self) -> anyhow::Result<()> {
        let budget = self.config.tick_duration();
        let mut interval = time::interval(budget);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            tick_rate = self.config.tick_rate,
            max_ticks = self.config.max_ticks,
            "starting tick loop"
        );

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        while !self.finished() {
            tokio::select! {
                _ = interval.tick() => {
                    let started = Instant::now();
                    self.tick();
                    self.check_budget(started, budget);
                }
                signal = &mut shutdown => {
                    signal?;
                    info!("interrupted");
                    break;
                }
            }
        }
        info!(ticks = self.ticks_run, "tick loop complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use engine_game::GameEvent;
    use engine_math::Position;

    use super::*;

    fn fast(max_ticks: u64) -> TickConfig {
        TickConfig {
            tick_rate: 1000.0,
            max_ticks,
        }
    }

    #[test]
    fn test_tick_advances_simulation() {
        let mut tick_loop = TickLoop::new(TickConfig::default(), Simulation::new());
        tick_loop.tick().unwrap();
        tick_loop.tick().unwrap();
        assert_eq!(tick_loop.ticks_run(), 2);
        assert_eq!(tick_loop.simulation().tick_id(), 2);
    }

    #[tokio::test]
    async fn test_run_async_limited_ticks() {
        let mut tick_loop = TickLoop::new(fast(5), Simulation::new());
        tick_loop.run_async().await.unwrap();
        assert_eq!(tick_loop.ticks_run(), 5);
    }

    #[tokio::test]
    async fn test_failing_tick_is_logged_not_fatal() {
        let mut sim = Simulation::new();
        sim.registry_mut()
            .add_system("broken", |_, _, _| anyhow::bail!("boom"));
        let mut tick_loop = TickLoop::new(fast(3), sim);
        tick_loop.run_async().await.unwrap();
        assert_eq!(tick_loop.ticks_run(), 3);
    }

    #[tokio::test]
    async fn test_run_async_applies_queued_events() {
        let sim = Simulation::new();
        let tx = sim.sender();
        tx.send(GameEvent::PlayerJoin {
            id: 1,
            position: Position::ORIGIN,
        })
        .unwrap();

        let mut tick_loop = TickLoop::new(fast(2), sim);
        tick_loop.run_async().await.unwrap();

        assert_eq!(tick_loop.ticks_run(), 2);
        let sim = tick_loop.simulation();
        assert!(sim.state().player(sim.registry(), 1).is_some());
    }
}
