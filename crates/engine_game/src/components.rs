//! Game components and the component set the game registry is built over.

use std::fmt;
use std::ops::BitOr;

use engine_component::Component;
use engine_ecs::Registry;
use engine_math::{Position, Vec2, Velocity};
use serde::{Deserialize, Serialize};

use crate::simulation::TickContext;

/// Network-facing player identifier.
pub type PlayerId = u8;

/// Movement speed given to new players, in world units per second.
pub const DEFAULT_PLAYER_SPEED: f32 = 100.0;

/// Starting and maximum health of a new player.
pub const DEFAULT_PLAYER_HEALTH: i32 = 100;

/// Seconds a projectile lives after it was first seen.
pub const PROJECTILE_TTL: f32 = 2.0;

/// Every component type the game registers, in registry order.
pub type GameComponents = (
    PlayerTag,
    Position,
    Velocity,
    Actions,
    Speed,
    Health,
    Projectile,
);

/// The registry shared by client and server simulations.
pub type GameRegistry = Registry<GameComponents, TickContext>;

/// Registers every [`GameComponents`] type with `registry`.
pub fn register_components(registry: &mut GameRegistry) {
    registry.register_component::<PlayerTag, _>();
    registry.register_component::<Position, _>();
    registry.register_component::<Velocity, _>();
    registry.register_component::<Actions, _>();
    registry.register_component::<Speed, _>();
    registry.register_component::<Health, _>();
    registry.register_component::<Projectile, _>();
}

/// Bitmask of input actions held by a player this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actions(u8);

impl Actions {
    /// No input.
    pub const NONE: Self = Self(0);
    /// Move towards `-y`.
    pub const MOVE_UP: Self = Self(1);
    /// Move towards `+y`.
    pub const MOVE_DOWN: Self = Self(1 << 1);
    /// Move towards `-x`.
    pub const MOVE_LEFT: Self = Self(1 << 2);
    /// Move towards `+x`.
    pub const MOVE_RIGHT: Self = Self(1 << 3);

    const ALL: u8 = 0b1111;

    /// Builds a mask from raw bits, dropping unknown ones.
    #[must_use]
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & Self::ALL)
    }

    /// The raw bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns `true` if every bit of `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if no action is held.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Sets the bits of `other`.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Clears the bits of `other`.
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Per-axis direction of the held movement keys.
    ///
    /// Opposite keys cancel out. Diagonals are not normalised, so holding up
    /// and right moves a full step on both axes.
    #[must_use]
    pub fn direction(self) -> Vec2 {
        let axis = |neg: Self, pos: Self| -> f32 {
            f32::from(u8::from(self.contains(pos))) - f32::from(u8::from(self.contains(neg)))
        };
        Vec2::new(
            axis(Self::MOVE_LEFT, Self::MOVE_RIGHT),
            axis(Self::MOVE_UP, Self::MOVE_DOWN),
        )
    }
}

impl BitOr for Actions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl Component for Actions {
    fn type_name() -> &'static str {
        "Actions"
    }
}

/// Movement speed in world units per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Speed(pub f32);

impl Default for Speed {
    fn default() -> Self {
        Self(DEFAULT_PLAYER_SPEED)
    }
}

impl Component for Speed {
    fn type_name() -> &'static str {
        "Speed"
    }
}

/// Hit points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Remaining hit points.
    pub current: i32,
    /// Upper bound for `current`.
    pub max: i32,
}

impl Health {
    /// Full health.
    #[must_use]
    pub const fn full(max: i32) -> Self {
        Self { current: max, max }
    }

    /// Returns `true` once health has run out.
    #[must_use]
    pub const fn is_depleted(self) -> bool {
        self.current <= 0
    }

    /// Applies `amount` damage, clamping at zero.
    pub fn damage(&mut self, amount: i32) {
        self.current = (self.current - amount).max(0);
    }

    /// Restores `amount` health, clamping at `max`.
    pub fn heal(&mut self, amount: i32) {
        self.current = (self.current + amount).min(self.max);
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::full(DEFAULT_PLAYER_HEALTH)
    }
}

impl Component for Health {
    fn type_name() -> &'static str {
        "Health"
    }
}

/// Marks an entity as the avatar of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerTag {
    /// The owning player.
    pub id: PlayerId,
}

impl Component for PlayerTag {
    fn type_name() -> &'static str {
        "PlayerTag"
    }
}

/// Composite projectile identifier: the firing player plus a per-player sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId {
    /// Player that fired the projectile.
    pub owner: PlayerId,
    /// Sequence number, unique per owner.
    pub seq: u16,
}

impl ProjectileId {
    /// Create a projectile id.
    #[must_use]
    pub const fn new(owner: PlayerId, seq: u16) -> Self {
        Self { owner, seq }
    }
}

impl fmt::Display for ProjectileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.owner, self.seq)
    }
}

/// A live projectile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Identity used by the id adapter.
    pub id: ProjectileId,
    /// Seconds left before the projectile expires.
    pub ttl: f32,
}

impl Component for Projectile {
    fn type_name() -> &'static str {
        "Projectile"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_up_right() {
        let actions = Actions::MOVE_UP | Actions::MOVE_RIGHT;
        assert_eq!(actions.direction(), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let actions = Actions::MOVE_LEFT | Actions::MOVE_RIGHT | Actions::MOVE_DOWN;
        assert_eq!(actions.direction(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_insert_remove() {
        let mut actions = Actions::NONE;
        actions.insert(Actions::MOVE_UP);
        assert!(actions.contains(Actions::MOVE_UP));
        actions.remove(Actions::MOVE_UP);
        assert!(actions.is_empty());
    }

    #[test]
    fn test_from_bits_truncate_drops_unknown_bits() {
        assert_eq!(Actions::from_bits_truncate(0xff).bits(), 0b1111);
    }

    #[test]
    fn test_health_clamps() {
        let mut health = Health::full(10);
        health.damage(25);
        assert_eq!(health.current, 0);
        assert!(health.is_depleted());
        health.heal(50);
        assert_eq!(health.current, 10);
    }

    #[test]
    fn test_projectile_id_display() {
        assert_eq!(ProjectileId::new(3, 17).to_string(), "3:17");
    }

    #[test]
    fn test_register_components_registers_everything() {
        let mut registry = GameRegistry::new();
        register_components(&mut registry);
        assert_eq!(registry.registered_components().len(), 7);
        assert_eq!(registry.registered_components()[0], "PlayerTag");
    }
}
