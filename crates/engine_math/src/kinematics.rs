//! 2-D position and velocity components.
//!
//! The game world uses screen coordinates: `+x` is right, `+y` is down.

use std::ops::{Add, AddAssign};

use engine_component::Component;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// World-space position of an entity.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Position(pub Vec2);

impl Position {
    /// The world origin.
    pub const ORIGIN: Self = Self(Vec2::ZERO);

    /// Create a position from its coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    /// Horizontal coordinate.
    #[must_use]
    pub fn x(self) -> f32 {
        self.0.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub fn y(self) -> f32 {
        self.0.y
    }

    /// Position after moving with `velocity` for `dt` seconds.
    #[must_use]
    pub fn advanced(self, velocity: Velocity, dt: f32) -> Self {
        Self(self.0 + velocity.0 * dt)
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        self.0.distance(other.0)
    }
}

impl Add<Vec2> for Position {
    type Output = Self;

    fn add(self, offset: Vec2) -> Self {
        Self(self.0 + offset)
    }
}

impl AddAssign<Vec2> for Position {
    fn add_assign(&mut self, offset: Vec2) {
        self.0 += offset;
    }
}

impl AddAssign<Velocity> for Position {
    fn add_assign(&mut self, velocity: Velocity) {
        self.0 += velocity.0;
    }
}

impl Component for Position {
    fn type_name() -> &'static str {
        "Position"
    }
}

/// Linear velocity in world units per second.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Velocity(pub Vec2);

impl Velocity {
    /// At rest.
    pub const ZERO: Self = Self(Vec2::ZERO);

    /// Create a velocity from its components.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    /// Magnitude in world units per second.
    #[must_use]
    pub fn speed(self) -> f32 {
        self.0.length()
    }
}

impl Component for Velocity {
    fn type_name() -> &'static str {
        "Velocity"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_assign_velocity() {
        let mut p = Position::ORIGIN;
        p += Velocity::new(1.0, 1.5);
        assert_eq!(p, Position::new(1.0, 1.5));
    }

    #[test]
    fn test_advanced_scales_by_dt() {
        let p = Position::new(5.0, 5.0).advanced(Velocity::new(10.0, -20.0), 0.5);
        assert_eq!(p, Position::new(10.0, -5.0));
    }

    #[test]
    fn test_distance() {
        let d = Position::new(0.0, 0.0).distance(Position::new(3.0, 4.0));
        assert!((d - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_velocity_speed() {
        assert!((Velocity::new(3.0, 4.0).speed() - 5.0).abs() < f32::EPSILON);
        assert_eq!(Velocity::ZERO.speed(), 0.0);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let p = Position::new(1.0, -2.0);
        let bytes = rmp_serde::to_vec(&p).unwrap();
        let restored: Position = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(p, restored);
    }
}
