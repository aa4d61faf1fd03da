//! Command-line arguments and tick configuration.

use std::time::Duration;

use anyhow::ensure;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "engine_app", about = "Headless game simulation driver")]
pub struct Args {
    /// Target ticks per second
    #[arg(short, long, default_value_t = 60.0)]
    pub tick_rate: f64,

    /// Stop after this many ticks (0 runs until interrupted)
    #[arg(short, long, default_value_t = 0)]
    pub max_ticks: u64,

    /// Number of scripted bot players feeding input through the inbox
    #[arg(short, long, default_value_t = 0)]
    pub bots: u8,
}

/// Configuration for the tick loop.
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Target ticks per second.
    pub tick_rate: f64,
    /// Maximum number of ticks to run (0 = unlimited).
    pub max_ticks: u64,
}

impl TickConfig {
    /// Fixed timestep.
    #[must_use]
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate)
    }

    /// Rejects rates the loop cannot run at.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.tick_rate.is_finite() && self.tick_rate > 0.0,
            "tick rate must be a positive number, got {}",
            self.tick_rate
        );
        Ok(())
    }
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_ticks: 0,
        }
    }
}

impl From<&Args> for TickConfig {
    fn from(args: &Args) -> Self {
        Self {
            tick_rate: args.tick_rate,
            max_ticks: args.max_ticks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["engine_app"]);
        let config = TickConfig::from(&args);
        assert_eq!(config.tick_rate, 60.0);
        assert_eq!(config.max_ticks, 0);
        assert_eq!(args.bots, 0);
    }

    #[test]
    fn test_args_override() {
        let args = Args::parse_from(["engine_app", "--tick-rate", "20", "--max-ticks", "5", "--bots", "3"]);
        let config = TickConfig::from(&args);
        assert_eq!(config.tick_duration(), Duration::from_millis(50));
        assert_eq!(config.max_ticks, 5);
        assert_eq!(args.bots, 3);
    }

    #[test]
    fn test_validate_rejects_zero_rate() {
        let config = TickConfig {
            tick_rate: 0.0,
            max_ticks: 0,
        };
        assert!(config.validate().is_err());
        assert!(TickConfig::default().validate().is_ok());
    }
}
