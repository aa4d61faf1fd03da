//! # engine_math
//!
//! Math types for the ECS core. Re-exports [`glam`] for linear algebra and
//! defines the 2-D spatial components that implement
//! [`Component`](engine_component::Component).

pub mod kinematics;

// Re-export glam types for convenience.
pub use glam::Vec2;

pub use kinematics::{Position, Velocity};
