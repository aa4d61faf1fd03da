//! The component registry.
//!
//! A [`Registry`] owns the entity allocator, one store per component type of
//! its closed set `C`, and the ordered system list. It is the only owner of
//! component data; everything else reaches components through it.
//!
//! Stores sit in `RefCell`s so a system can hold several of them at once,
//! e.g. positions mutably and velocities shared, through a single
//! `&Registry`. Structural changes (spawn, kill, register, add, remove) take
//! `&mut self`. The `RefCell`s make the registry `!Sync`: one thread owns it
//! for the whole tick.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;

use tracing::{debug, error, info, trace};

use engine_component::{
    Component, ComponentSet, ComponentStore, Contains, EcsError, Entity, EntityAllocator,
};

use crate::scheduler::{RegisteredSystem, Scheduler};

/// Entity/component registry over the component set `C`, with systems that
/// receive an optional `Cx` context each tick.
pub struct Registry<C: ComponentSet, Cx = ()> {
    allocator: EntityAllocator,
    stores: C::Stores,
    /// Component type names in registration order.
    registered: Vec<&'static str>,
    scheduler: Scheduler<C, Cx>,
}

impl<C: ComponentSet, Cx: 'static> Registry<C, Cx> {
    /// Creates a registry with no entities, no registered components, and no systems.
    #[must_use]
    pub fn new() -> Self {
        Self {
            allocator: EntityAllocator::new(),
            stores: Default::default(),
            registered: Vec::new(),
            scheduler: Scheduler::new(),
        }
    }

    // -- Components --

    /// Registers component type `T`, creating its store.
    ///
    /// Idempotent: registering `T` again keeps the existing store and data.
    /// When entities already exist the new store is grown to cover them, all
    /// slots absent.
    pub fn register_component<T, I>(&mut self)
    where
        T: Component,
        C: Contains<T, I>,
    {
        let len = self.allocator.len();
        let slot = <C as Contains<T, I>>::slot_mut(&mut self.stores);
        if slot.is_some() {
            trace!(component = T::type_name(), "component already registered");
            return;
        }
        *slot = Some(RefCell::new(ComponentStore::with_len(len)));
        self.registered.push(T::type_name());
        info!(
            component = T::type_name(),
            index = <C as Contains<T, I>>::INDEX,
            entities = len,
            "registered component"
        );
    }

    /// Returns `true` if `T` has been registered.
    #[must_use]
    pub fn is_registered<T, I>(&self) -> bool
    where
        T: Component,
        C: Contains<T, I>,
    {
        <C as Contains<T, I>>::slot(&self.stores).is_some()
    }

    /// Component type names in registration order.
    #[must_use]
    pub fn registered_components(&self) -> &[&'static str] {
        &self.registered
    }

    /// Attaches `value` to `entity`, overwriting any previous `T`.
    ///
    /// # Errors
    ///
    /// - [`EcsError::UnregisteredComponent`] if `T` was never registered.
    /// - [`EcsError::EntityNotFound`] if `entity` is dead or stale.
    pub fn add_component<T, I>(&mut self, entity: Entity, value: T) -> Result<(), EcsError>
    where
        T: Component,
        C: Contains<T, I>,
    {
        let alive = self.allocator.is_alive(entity);
        let store = <C as Contains<T, I>>::slot_mut(&mut self.stores)
            .as_mut()
            .ok_or(EcsError::UnregisteredComponent {
                name: T::type_name(),
            })?;
        if !alive {
            return Err(EcsError::EntityNotFound(entity));
        }
        store.get_mut().set(entity, value)
    }

    /// Detaches `T` from `entity`, returning the old value.
    ///
    /// A no-op returning `None` when the value is absent, the entity is dead,
    /// or `T` is unregistered.
    pub fn remove_component<T, I>(&mut self, entity: Entity) -> Option<T>
    where
        T: Component,
        C: Contains<T, I>,
    {
        if !self.allocator.is_alive(entity) {
            return None;
        }
        <C as Contains<T, I>>::slot_mut(&mut self.stores)
            .as_mut()
            .and_then(|store| store.get_mut().clear(entity))
    }

    /// Shared borrow of the whole store for `T`, indexed by entity handle.
    ///
    /// # Errors
    ///
    /// - [`EcsError::UnregisteredComponent`] if `T` was never registered.
    /// - [`EcsError::StoreBorrowed`] if the store is currently borrowed mutably.
    pub fn get_components<T, I>(&self) -> Result<Ref<'_, ComponentStore<T>>, EcsError>
    where
        T: Component,
        C: Contains<T, I>,
    {
        self.cell::<T, I>()?
            .try_borrow()
            .map_err(|_| EcsError::StoreBorrowed {
                name: T::type_name(),
            })
    }

    /// Exclusive borrow of the whole store for `T`.
    ///
    /// # Errors
    ///
    /// - [`EcsError::UnregisteredComponent`] if `T` was never registered.
    /// - [`EcsError::StoreBorrowed`] if the store is currently borrowed.
    pub fn get_components_mut<T, I>(&self) -> Result<RefMut<'_, ComponentStore<T>>, EcsError>
    where
        T: Component,
        C: Contains<T, I>,
    {
        self.cell::<T, I>()?
            .try_borrow_mut()
            .map_err(|_| EcsError::StoreBorrowed {
                name: T::type_name(),
            })
    }

    /// Copy of `entity`'s `T`, or `None` if absent or the entity is dead.
    ///
    /// # Errors
    ///
    /// Same as [`Registry::get_components`].
    pub fn get_component<T, I>(&self, entity: Entity) -> Result<Option<T>, EcsError>
    where
        T: Component + Clone,
        C: Contains<T, I>,
    {
        let store = self.get_components::<T, I>()?;
        if !self.allocator.is_alive(entity) {
            return Ok(None);
        }
        Ok(store.get(entity)?.cloned())
    }

    /// Returns `true` if `entity` is alive and has a `T`.
    #[must_use]
    pub fn has_component<T, I>(&self, entity: Entity) -> bool
    where
        T: Component,
        C: Contains<T, I>,
    {
        self.allocator.is_alive(entity)
            && self
                .get_components::<T, I>()
                .is_ok_and(|store| matches!(store.get(entity), Ok(Some(_))))
    }

    fn cell<T, I>(&self) -> Result<&RefCell<ComponentStore<T>>, EcsError>
    where
        T: Component,
        C: Contains<T, I>,
    {
        <C as Contains<T, I>>::slot(&self.stores)
            .as_ref()
            .ok_or(EcsError::UnregisteredComponent {
                name: T::type_name(),
            })
    }

    // -- Entities --

    /// Allocates an entity and grows every registered store to cover it.
    pub fn spawn_entity(&mut self) -> Entity {
        let entity = self.allocator.spawn();
        C::grow_registered(&mut self.stores, self.allocator.len());
        trace!(%entity, "spawned entity");
        entity
    }

    /// Kills `entity`, clearing its slot in every registered store.
    ///
    /// Returns `false`, changing nothing, if the entity was already dead,
    /// stale, or never issued.
    pub fn kill_entity(&mut self, entity: Entity) -> bool {
        if !self.allocator.kill(entity) {
            trace!(%entity, "kill ignored for dead entity");
            return false;
        }
        C::clear_registered(&mut self.stores, entity.index());
        trace!(%entity, "killed entity");
        true
    }

    /// Returns `true` if `entity` is live and of the current generation.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.allocator.is_alive(entity)
    }

    /// Number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.allocator.alive_count()
    }

    /// Every live entity in index order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.allocator.iter_alive()
    }

    // -- Systems --

    /// Appends a system to the end of the execution order.
    pub fn add_system<F>(&mut self, name: impl Into<String>, system: F)
    where
        F: FnMut(&mut Registry<C, Cx>, f32, Option<&mut Cx>) -> anyhow::Result<()> + 'static,
    {
        let name = name.into();
        debug!(system = %name, position = self.scheduler.len(), "added system");
        self.scheduler.push(RegisteredSystem {
            name,
            run: Box::new(system),
        });
    }

    /// Runs every system once, in registration order, with the same `dt` and
    /// context.
    ///
    /// Systems added while running are kept and first run on the next call.
    ///
    /// # Errors
    ///
    /// - [`EcsError::ReentrantRun`] if called from inside a system.
    /// - [`EcsError::System`] with the first failing system; the systems after
    ///   it do not run this tick.
    pub fn run_systems(&mut self, dt: f32, mut ctx: Option<&mut Cx>) -> Result<(), EcsError> {
        if self.scheduler.running {
            return Err(EcsError::ReentrantRun);
        }
        self.scheduler.running = true;
        let mut systems = std::mem::take(&mut self.scheduler.systems);

        let mut outcome = Ok(());
        for system in &mut systems {
            if let Err(err) = (system.run)(self, dt, ctx.as_deref_mut()) {
                error!(
                    system = %system.name,
                    error = %err,
                    "system failed, skipping the rest of the tick"
                );
                outcome = Err(EcsError::System {
                    name: system.name.clone(),
                    source: err.into(),
                });
                break;
            }
        }

        let added = std::mem::replace(&mut self.scheduler.systems, systems);
        self.scheduler.systems.extend(added);
        self.scheduler.running = false;
        self.scheduler.runs += 1;
        outcome
    }

    /// Number of registered systems.
    #[must_use]
    pub fn system_count(&self) -> usize {
        self.scheduler.len()
    }

    /// System names in execution order.
    #[must_use]
    pub fn system_names(&self) -> Vec<&str> {
        self.scheduler.names().collect()
    }

    /// Number of `run_systems` calls so far, including aborted ones.
    #[must_use]
    pub fn run_count(&self) -> u64 {
        self.scheduler.runs
    }
}

impl<C: ComponentSet, Cx: 'static> Default for Registry<C, Cx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ComponentSet, Cx> fmt::Debug for Registry<C, Cx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("entities", &self.allocator.alive_count())
            .field("registered", &self.registered)
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}
