//! The [`Component`] trait and the closed component-set machinery.
//!
//! A registry is generic over a tuple of component types, e.g.
//! `(Position, Velocity, Health)`. Each tuple position is a compile-time
//! index. [`ComponentSet`] gives the registry one store slot per position plus
//! the operations that must touch every registered store at once (grow on
//! spawn, clear on kill). [`Contains`] resolves a component type to its slot
//! statically; the index parameter is inferred, so callers write
//! `registry.get_components::<Position, _>()`.
//!
//! Asking for a type outside the tuple does not compile. A type inside the
//! tuple whose slot is still `None` has simply not been registered yet.

use std::cell::RefCell;

use crate::storage::ComponentStore;

/// A plain value type that can be attached to entities.
///
/// # Examples
///
/// ```rust
/// use engine_component::Component;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// struct Health {
///     current: i32,
///     max: i32,
/// }
///
/// impl Component for Health {}
/// ```
pub trait Component: Send + 'static {
    /// A human-readable name for this component type, used in errors and logs.
    fn type_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Storage slot for one component type: `None` until the type is registered.
pub type Slot<T> = Option<RefCell<ComponentStore<T>>>;

/// Type-level position of a component inside a [`ComponentSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct At<const N: usize>;

/// A closed, ordered list of component types.
///
/// Implemented for tuples of 1 to 12 [`Component`]s.
pub trait ComponentSet: 'static {
    /// One [`Slot`] per component type, in tuple order.
    type Stores: Default;

    /// Number of component types in the set.
    const COUNT: usize;

    /// Grows every registered store to at least `len` slots.
    fn grow_registered(stores: &mut Self::Stores, len: usize);

    /// Clears slot `index` in every registered store.
    fn clear_registered(stores: &mut Self::Stores, index: usize);

    /// Number of registered stores.
    fn registered_count(stores: &Self::Stores) -> usize;
}

/// Static lookup of component type `T` at position `I` of a [`ComponentSet`].
pub trait Contains<T: Component, I>: ComponentSet {
    /// Position of `T` in the set.
    const INDEX: usize;

    /// The slot holding `T`'s store.
    fn slot(stores: &Self::Stores) -> &Slot<T>;

    /// The slot holding `T`'s store, mutably.
    fn slot_mut(stores: &mut Self::Stores) -> &mut Slot<T>;
}

macro_rules! component_set {
    (@contains $all:tt; $($name:ident => $idx:tt),+) => {
        $( component_set!(@one $all; $name => $idx); )+
    };
    (@one ($($all:ident),+); $name:ident => $idx:tt) => {
        impl<$($all: Component),+> Contains<$name, At<$idx>> for ($($all,)+) {
            const INDEX: usize = $idx;

            fn slot(stores: &Self::Stores) -> &Slot<$name> {
                &stores.$idx
            }

            fn slot_mut(stores: &mut Self::Stores) -> &mut Slot<$name> {
                &mut stores.$idx
            }
        }
    };
    ($($name:ident => $idx:tt),+) => {
        impl<$($name: Component),+> ComponentSet for ($($name,)+) {
            type Stores = ($(Slot<$name>,)+);

            const COUNT: usize = [$($idx),+].len();

            fn grow_registered(stores: &mut Self::Stores, len: usize) {
                $(
                    if let Some(store) = stores.$idx.as_mut() {
                        store.get_mut().ensure_length(len);
                    }
                )+
            }

            fn clear_registered(stores: &mut Self::Stores, index: usize) {
                $(
                    if let Some(store) = stores.$idx.as_mut() {
                        store.get_mut().clear_index(index);
                    }
                )+
            }

            fn registered_count(stores: &Self::Stores) -> usize {
                0 $( + usize::from(stores.$idx.is_some()) )+
            }
        }

        component_set!(@contains ($($name),+); $($name => $idx),+);
    };
}

component_set!(A => 0);
component_set!(A => 0, B => 1);
component_set!(A => 0, B => 1, C => 2);
component_set!(A => 0, B => 1, C => 2, D => 3);
component_set!(A => 0, B => 1, C => 2, D => 3, E => 4);
component_set!(A => 0, B => 1, C => 2, D => 3, E => 4, F => 5);
component_set!(A => 0, B => 1, C => 2, D => 3, E => 4, F => 5, G => 6);
component_set!(A => 0, B => 1, C => 2, D => 3, E => 4, F => 5, G => 6, H => 7);
component_set!(A => 0, B => 1, C => 2, D => 3, E => 4, F => 5, G => 6, H => 7, J => 8);
component_set!(A => 0, B => 1, C => 2, D => 3, E => 4, F => 5, G => 6, H => 7, J => 8, K => 9);
component_set!(
    A => 0, B => 1, C => 2, D => 3, E => 4, F => 5, G => 6, H => 7, J => 8, K => 9, L => 10
);
component_set!(
    A => 0, B => 1, C => 2, D => 3, E => 4, F => 5, G => 6, H => 7, J => 8, K => 9, L => 10,
    M => 11
);
