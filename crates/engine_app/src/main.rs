//! # engine_app
//!
//! Headless driver for the game simulation: builds a [`Simulation`], spawns
//! optional bot players on a separate task, and runs the fixed-timestep tick
//! loop on the main task.
//!
//! ```text
//! engine_app --tick-rate 30 --max-ticks 300 --bots 4
//! ```

mod bots;
mod config;
mod tick;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{Args, TickConfig};
use engine_game::Simulation;
use tick::TickLoop;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("engine_app=info".parse()?)
                .add_directive("engine_game=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = TickConfig::from(&args);
    config.validate()?;

    info!(bots = args.bots, "engine starting");

    let simulation = Simulation::new();
    let bot_task = (args.bots > 0)
        .then(|| bots::spawn(simulation.sender(), args.bots, config.tick_duration()));

    let mut tick_loop = TickLoop::new(config, simulation);
    tick_loop.run_async().await?;

    // Dropping the loop closes the inbox, which stops the bots.
    drop(tick_loop);
    if let Some(task) = bot_task {
        task.await?;
    }

    info!("engine shut down");
    Ok(())
}
