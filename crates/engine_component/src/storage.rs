//! Dense, index-addressed component storage.
//!
//! A [`ComponentStore`] holds one optional slot per entity index. Slot `i`
//! belongs to whichever entity currently owns index `i`; the store itself does
//! not track generations, the registry does.

use std::ops::{Index, IndexMut};

use crate::entity::Entity;
use crate::error::EcsError;

/// A column of present-or-absent component values, one slot per entity index.
///
/// The store only ever grows. Growing appends absent slots and never moves
/// existing ones.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentStore<T> {
    slots: Vec<Option<T>>,
}

impl<T> ComponentStore<T> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Creates a store of `len` absent slots.
    #[must_use]
    pub fn with_len(len: usize) -> Self {
        let mut store = Self::new();
        store.ensure_length(len);
        store
    }

    /// Grows the store to at least `len` slots. Never shrinks.
    pub fn ensure_length(&mut self, len: usize) {
        if self.slots.len() < len {
            self.slots.resize_with(len, || None);
        }
    }

    /// Number of slots, present or absent.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the store has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Overwrites the slot for `entity` with `value`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::IndexOutOfRange`] if the store has not been grown
    /// to cover `entity`.
    pub fn set(&mut self, entity: Entity, value: T) -> Result<(), EcsError> {
        let slot = self.slot_mut(entity.index())?;
        *slot = Some(value);
        Ok(())
    }

    /// Returns the value at `entity`'s slot, if present.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::IndexOutOfRange`] if the slot does not exist.
    pub fn get(&self, entity: Entity) -> Result<Option<&T>, EcsError> {
        self.try_get(entity.index())
    }

    /// Returns the value at `entity`'s slot mutably, if present.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::IndexOutOfRange`] if the slot does not exist.
    pub fn get_mut(&mut self, entity: Entity) -> Result<Option<&mut T>, EcsError> {
        self.try_get_mut(entity.index())
    }

    /// Index-based form of [`ComponentStore::get`].
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::IndexOutOfRange`] if `index >= len()`.
    pub fn try_get(&self, index: usize) -> Result<Option<&T>, EcsError> {
        self.slots
            .get(index)
            .map(Option::as_ref)
            .ok_or(EcsError::IndexOutOfRange {
                index,
                len: self.slots.len(),
            })
    }

    /// Index-based form of [`ComponentStore::get_mut`].
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::IndexOutOfRange`] if `index >= len()`.
    pub fn try_get_mut(&mut self, index: usize) -> Result<Option<&mut T>, EcsError> {
        Ok(self.slot_mut(index)?.as_mut())
    }

    /// Clears the slot for `entity`, returning the previous value.
    ///
    /// Clearing an out-of-range or absent slot is a no-op.
    pub fn clear(&mut self, entity: Entity) -> Option<T> {
        self.clear_index(entity.index())
    }

    /// Index-based form of [`ComponentStore::clear`].
    pub fn clear_index(&mut self, index: usize) -> Option<T> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// All slots in index order.
    #[must_use]
    pub fn slots(&self) -> &[Option<T>] {
        &self.slots
    }

    /// All slots in index order, mutably. The slice length is fixed.
    pub fn slots_mut(&mut self) -> &mut [Option<T>] {
        &mut self.slots
    }

    /// Iterates over present values with their slot index.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|v| (i, v)))
    }

    /// Iterates mutably over present values with their slot index.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_mut().map(|v| (i, v)))
    }

    /// Number of present values.
    #[must_use]
    pub fn present_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    fn slot_mut(&mut self, index: usize) -> Result<&mut Option<T>, EcsError> {
        let len = self.slots.len();
        self.slots
            .get_mut(index)
            .ok_or(EcsError::IndexOutOfRange { index, len })
    }
}

impl<T> Default for ComponentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Direct slot access. Panics when `entity` is out of range, like slice indexing.
impl<T> Index<Entity> for ComponentStore<T> {
    type Output = Option<T>;

    fn index(&self, entity: Entity) -> &Self::Output {
        &self.slots[entity.index()]
    }
}

impl<T> IndexMut<Entity> for ComponentStore<T> {
    fn index_mut(&mut self, entity: Entity) -> &mut Self::Output {
        &mut self.slots[entity.index()]
    }
}
