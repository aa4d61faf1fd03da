//! Entity handles and allocation.
//!
//! An [`Entity`] is a slot index paired with a generation. The index addresses
//! every component store; the generation tells a live handle apart from a
//! stale copy whose slot has since been recycled.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};
use tracing::trace;

/// A generational entity handle.
///
/// Entities carry no data of their own. Components are attached to the slot
/// at [`Entity::index`] in each store.
///
/// Handles order by `(index, generation)`, so fresh handles issued without
/// interleaved kills compare strictly increasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    /// Build a handle from its raw parts.
    #[must_use]
    pub const fn from_parts(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// The slot index shared by every component store.
    #[must_use]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// How many times the slot had been recycled when this handle was issued.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({}v{})", self.index, self.generation)
    }
}

/// Hands out entity handles and recycles killed slots.
///
/// The allocator knows nothing about component stores. The registry asks it
/// for [`EntityAllocator::len`] and grows every store to match.
#[derive(Debug, Default)]
pub struct EntityAllocator {
    /// Current generation per slot index.
    generations: Vec<u32>,
    /// Liveness per slot index.
    alive: Vec<bool>,
    /// Killed indices waiting to be reused, lowest first.
    free: BinaryHeap<Reverse<u32>>,
}

impl EntityAllocator {
    /// Creates an empty allocator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a handle, reusing the lowest killed slot when one is available.
    ///
    /// Between kills, successive spawns return increasing handles: recycled
    /// slots come back in index order, then fresh slots follow.
    pub fn spawn(&mut self) -> Entity {
        if let Some(Reverse(index)) = self.free.pop() {
            let slot = index as usize;
            self.alive[slot] = true;
            let entity = Entity::from_parts(index, self.generations[slot]);
            trace!(%entity, "recycled entity slot");
            return entity;
        }

        let index = u32::try_from(self.generations.len()).unwrap_or(u32::MAX);
        self.generations.push(0);
        self.alive.push(true);
        Entity::from_parts(index, 0)
    }

    /// Kills `entity` and frees its slot for reuse.
    ///
    /// Returns `false`, changing nothing, when the handle is already dead,
    /// stale, or was never issued.
    pub fn kill(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        let slot = entity.index();
        self.alive[slot] = false;
        self.generations[slot] = self.generations[slot].wrapping_add(1);
        self.free.push(Reverse(entity.index));
        true
    }

    /// Returns `true` if `entity` refers to a live slot of the same generation.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        let slot = entity.index();
        slot < self.alive.len() && self.alive[slot] && self.generations[slot] == entity.generation
    }

    /// Number of slot indices ever issued. Every store must be at least this long.
    #[must_use]
    pub fn len(&self) -> usize {
        self.generations.len()
    }

    /// Returns `true` if no slot has ever been issued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }

    /// Number of live entities.
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.generations.len() - self.free.len()
    }

    /// Iterates over every live handle in index order.
    pub fn iter_alive(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive
            .iter()
            .zip(self.generations.iter())
            .enumerate()
            .filter(|(_, (alive, _))| **alive)
            .map(|(index, (_, &generation))| Entity::from_parts(index as u32, generation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_handles_are_distinct_and_increasing() {
        let mut alloc = EntityAllocator::new();
        let handles: Vec<Entity> = (0..16).map(|_| alloc.spawn()).collect();
        for pair in handles.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert_eq!(alloc.len(), 16);
        assert_eq!(alloc.alive_count(), 16);
    }

    #[test]
    fn test_recycled_handles_come_back_in_index_order() {
        let mut alloc = EntityAllocator::new();
        let a = alloc.spawn();
        let _b = alloc.spawn();
        let c = alloc.spawn();
        alloc.kill(a);
        alloc.kill(c);

        let x = alloc.spawn();
        let y = alloc.spawn();
        let z = alloc.spawn();
        assert!(x < y && y < z, "{x} {y} {z}");
        assert_eq!(x.index(), 0);
        assert_eq!(y.index(), 2);
        assert_eq!(z.index(), 3);
    }

    #[test]
    fn test_kill_makes_handle_dead() {
        let mut alloc = EntityAllocator::new();
        let e = alloc.spawn();
        assert!(alloc.is_alive(e));
        assert!(alloc.kill(e));
        assert!(!alloc.is_alive(e));
        assert_eq!(alloc.alive_count(), 0);
    }

    #[test]
    fn test_kill_twice_is_noop() {
        let mut alloc = EntityAllocator::new();
        let e = alloc.spawn();
        assert!(alloc.kill(e));
        assert!(!alloc.kill(e));
        assert_eq!(alloc.len(), 1);
        assert_eq!(alloc.alive_count(), 0);
    }

    #[test]
    fn test_kill_never_issued_is_noop() {
        let mut alloc = EntityAllocator::new();
        assert!(!alloc.kill(Entity::from_parts(7, 0)));
        assert!(alloc.is_empty());
    }

    #[test]
    fn test_stale_handle_does_not_alias_respawn() {
        let mut alloc = EntityAllocator::new();
        let old = alloc.spawn();
        alloc.kill(old);
        let new = alloc.spawn();
        // Whichever slot came back, the stale handle must stay dead.
        assert!(!alloc.is_alive(old));
        assert!(alloc.is_alive(new));
        assert!(!alloc.kill(old));
        assert!(alloc.is_alive(new));
    }

    #[test]
    fn test_iter_alive_skips_killed() {
        let mut alloc = EntityAllocator::new();
        let a = alloc.spawn();
        let b = alloc.spawn();
        let c = alloc.spawn();
        alloc.kill(b);
        let alive: Vec<Entity> = alloc.iter_alive().collect();
        assert_eq!(alive, vec![a, c]);
    }

    #[test]
    fn test_entity_serialization_roundtrip() {
        let entity = Entity::from_parts(999, 3);
        let bytes = rmp_serde::to_vec(&entity).unwrap();
        let restored: Entity = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(entity, restored);
    }
}
