//! Per-tick game systems, run in the order [`install`] adds them.

use engine_ecs::View;
use engine_math::{Position, Velocity};
use tracing::{trace, warn};

use crate::components::{Actions, GameRegistry, Projectile, Speed};
use crate::simulation::TickContext;

/// Adds every game system to `registry`.
pub fn install(registry: &mut GameRegistry) {
    registry.add_system("movement", movement);
    registry.add_system("projectile_lifetime", projectile_lifetime);
}

/// Moves players by their held actions, then integrates velocities.
///
/// Each pressed axis contributes `speed * dt`. Diagonals are not normalised.
pub fn movement(
    registry: &mut GameRegistry,
    dt: f32,
    _ctx: Option<&mut TickContext>,
) -> anyhow::Result<()> {
    let mut positions = registry.get_components_mut::<Position, _>()?;
    let held = registry.get_components::<Actions, _>()?;
    let speeds = registry.get_components::<Speed, _>()?;

    for row in View::new((&mut *positions, &*held, &*speeds)) {
        let (Some(position), Some(actions), Some(speed)) = row else {
            continue;
        };
        if actions.is_empty() {
            continue;
        }
        *position += actions.direction() * speed.0 * dt;
    }

    let velocities = registry.get_components::<Velocity, _>()?;
    for (position, velocity) in View::new((&mut *positions, &*velocities)).present() {
        *position = position.advanced(*velocity, dt);
    }
    Ok(())
}

/// Counts down projectile lifetimes and reports the ones that ran out.
///
/// Expired ids go to [`TickContext::expired_projectiles`]; the simulation
/// removes them after the systems finish.
pub fn projectile_lifetime(
    registry: &mut GameRegistry,
    dt: f32,
    mut ctx: Option<&mut TickContext>,
) -> anyhow::Result<()> {
    let mut projectiles = registry.get_components_mut::<Projectile, _>()?;
    for (index, projectile) in projectiles.iter_mut() {
        let was_live = projectile.ttl > 0.0;
        projectile.ttl -= dt;
        if !was_live || projectile.ttl > 0.0 {
            continue;
        }
        trace!(projectile = %projectile.id, index, "projectile expired");
        match ctx.as_deref_mut() {
            Some(ctx) => ctx.expired_projectiles.push(projectile.id),
            None => warn!(projectile = %projectile.id, "no tick context, expiry not reported"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{ProjectileId, register_components};

    fn registry() -> GameRegistry {
        let mut registry = GameRegistry::new();
        register_components(&mut registry);
        registry
    }

    fn approx(a: Position, b: Position) -> bool {
        a.distance(b) < 1e-4
    }

    #[test]
    fn test_install_order() {
        let mut reg = registry();
        install(&mut reg);
        assert_eq!(reg.system_names(), vec!["movement", "projectile_lifetime"]);
    }

    #[test]
    fn test_movement_ignores_entities_without_actions() {
        let mut reg = registry();
        let e = reg.spawn_entity();
        reg.add_component(e, Position::new(1.0, 1.0)).unwrap();
        reg.add_component(e, Speed(50.0)).unwrap();

        movement(&mut reg, 1.0, None).unwrap();
        assert_eq!(
            reg.get_component::<Position, _>(e).unwrap(),
            Some(Position::new(1.0, 1.0))
        );
    }

    #[test]
    fn test_movement_integrates_velocity() {
        let mut reg = registry();
        let e = reg.spawn_entity();
        reg.add_component(e, Position::ORIGIN).unwrap();
        reg.add_component(e, Velocity::new(4.0, -2.0)).unwrap();

        movement(&mut reg, 0.5, None).unwrap();
        let moved = reg.get_component::<Position, _>(e).unwrap().unwrap();
        assert!(approx(moved, Position::new(2.0, -1.0)));
    }

    #[test]
    fn test_movement_left_down() {
        let mut reg = registry();
        let e = reg.spawn_entity();
        reg.add_component(e, Position::ORIGIN).unwrap();
        reg.add_component(e, Actions::MOVE_LEFT | Actions::MOVE_DOWN).unwrap();
        reg.add_component(e, Speed(10.0)).unwrap();

        movement(&mut reg, 1.0, None).unwrap();
        let moved = reg.get_component::<Position, _>(e).unwrap().unwrap();
        assert!(approx(moved, Position::new(-10.0, 10.0)));
    }

    #[test]
    fn test_projectile_expires_once() {
        let mut reg = registry();
        let e = reg.spawn_entity();
        let id = ProjectileId::new(2, 5);
        reg.add_component(e, Projectile { id, ttl: 0.15 }).unwrap();

        let mut ctx = TickContext::default();
        projectile_lifetime(&mut reg, 0.1, Some(&mut ctx)).unwrap();
        assert!(ctx.expired_projectiles.is_empty());

        projectile_lifetime(&mut reg, 0.1, Some(&mut ctx)).unwrap();
        assert_eq!(ctx.expired_projectiles, vec![id]);

        projectile_lifetime(&mut reg, 0.1, Some(&mut ctx)).unwrap();
        assert_eq!(ctx.expired_projectiles.len(), 1);
    }
}
