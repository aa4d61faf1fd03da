//! # engine_ecs
//!
//! The runtime half of the ECS core, shared by client and server.
//!
//! - [`Registry`] — owns entities, one store per registered component type,
//!   and the ordered system list.
//! - [`View`] — lock-step, non-filtering iteration over several stores.
//! - [`Scheduler`] — the registry's system list, run once per tick.
//!
//! ## Usage
//!
//! ```rust
//! use engine_component::Component;
//! use engine_ecs::{Registry, View};
//!
//! #[derive(Debug, Clone, Copy, PartialEq)]
//! struct Position(f32);
//! impl Component for Position {}
//!
//! #[derive(Debug, Clone, Copy, PartialEq)]
//! struct Velocity(f32);
//! impl Component for Velocity {}
//!
//! let mut registry: Registry<(Position, Velocity)> = Registry::new();
//! registry.register_component::<Position, _>();
//! registry.register_component::<Velocity, _>();
//!
//! let e = registry.spawn_entity();
//! registry.add_component(e, Position(0.0)).unwrap();
//! registry.add_component(e, Velocity(2.0)).unwrap();
//!
//! registry.add_system("integrate", |reg, dt, _| {
//!     let mut positions = reg.get_components_mut::<Position, _>()?;
//!     let velocities = reg.get_components::<Velocity, _>()?;
//!     for (p, v) in View::new((&mut *positions, &*velocities)).present() {
//!         p.0 += v.0 * dt;
//!     }
//!     Ok(())
//! });
//!
//! registry.run_systems(0.5, None).unwrap();
//! assert_eq!(registry.get_component::<Position, _>(e).unwrap(), Some(Position(1.0)));
//! ```

pub mod registry;
pub mod scheduler;
pub mod view;

pub use registry::Registry;
pub use scheduler::{RegisteredSystem, Scheduler, SystemFn};
pub use view::{AllPresent, IntoView, Present, View, ViewSource};
