//! Lock-step iteration over several component stores.
//!
//! A [`View`] zips 1 to 8 stores by slot index and yields one tuple per index
//! up to the shortest store's length. Each element is whatever the store holds
//! at that index, `Some` or `None`; the view never filters. Systems that need
//! every component present call [`View::present`], which skips incomplete rows
//! and unwraps the rest.
//!
//! ```rust
//! use engine_component::{ComponentStore, Entity};
//! use engine_ecs::View;
//!
//! let e = Entity::from_parts(0, 0);
//! let mut positions = ComponentStore::with_len(2);
//! let mut velocities = ComponentStore::with_len(2);
//! positions.set(e, 1.0_f32).unwrap();
//! velocities.set(e, 0.5_f32).unwrap();
//!
//! for (pos, vel) in View::new((&mut positions, &velocities)).present() {
//!     *pos += *vel;
//! }
//! assert_eq!(positions[e], Some(1.5));
//! ```

use std::iter::Map;
use std::slice;

use engine_component::ComponentStore;

/// Something a [`View`] can zip: a shared or exclusive store reference.
pub trait ViewSource {
    /// Element yielded per slot.
    type Item;
    /// Per-slot iterator.
    type Iter: Iterator<Item = Self::Item>;

    /// Number of slots the source covers.
    fn view_len(&self) -> usize;

    /// Converts the source into its per-slot iterator.
    fn into_view_iter(self) -> Self::Iter;
}

impl<'a, T> ViewSource for &'a ComponentStore<T> {
    type Item = Option<&'a T>;
    type Iter = Map<slice::Iter<'a, Option<T>>, fn(&'a Option<T>) -> Option<&'a T>>;

    fn view_len(&self) -> usize {
        self.len()
    }

    fn into_view_iter(self) -> Self::Iter {
        self.slots()
            .iter()
            .map(Option::as_ref as fn(&'a Option<T>) -> Option<&'a T>)
    }
}

impl<'a, T> ViewSource for &'a mut ComponentStore<T> {
    type Item = Option<&'a mut T>;
    type Iter = Map<slice::IterMut<'a, Option<T>>, fn(&'a mut Option<T>) -> Option<&'a mut T>>;

    fn view_len(&self) -> usize {
        self.len()
    }

    fn into_view_iter(self) -> Self::Iter {
        self.slots_mut()
            .iter_mut()
            .map(Option::as_mut as fn(&'a mut Option<T>) -> Option<&'a mut T>)
    }
}

/// A tuple of [`ViewSource`]s that can be zipped into a [`View`].
pub trait IntoView {
    /// Tuple of per-source iterators.
    type Iters;

    /// Zips the sources.
    fn into_view(self) -> View<Self::Iters>;
}

/// Lazy, single-pass, non-filtering zipper over component stores.
#[derive(Debug)]
pub struct View<I> {
    iters: I,
    remaining: usize,
}

impl<I> View<I> {
    /// Zips a tuple of store references, e.g. `View::new((&mut positions, &velocities))`.
    pub fn new<S>(sources: S) -> Self
    where
        S: IntoView<Iters = I>,
    {
        sources.into_view()
    }

    /// Keeps only rows where every element is present, unwrapping them.
    pub fn present(self) -> Present<Self>
    where
        Self: Iterator,
        <Self as Iterator>::Item: AllPresent,
    {
        Present { inner: self }
    }
}

/// A tuple of `Option`s that can be collapsed into a tuple of values.
pub trait AllPresent {
    /// The unwrapped tuple.
    type Output;

    /// Returns the unwrapped tuple if every element is `Some`.
    fn all_present(self) -> Option<Self::Output>;
}

/// Iterator returned by [`View::present`].
#[derive(Debug)]
pub struct Present<V> {
    inner: V,
}

impl<V> Iterator for Present<V>
where
    V: Iterator,
    V::Item: AllPresent,
{
    type Item = <V::Item as AllPresent>::Output;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find_map(AllPresent::all_present)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}

macro_rules! view_tuple {
    ($($src:ident => $idx:tt),+) => {
        impl<$($src: ViewSource),+> IntoView for ($($src,)+) {
            type Iters = ($($src::Iter,)+);

            fn into_view(self) -> View<Self::Iters> {
                let remaining = [$(self.$idx.view_len()),+]
                    .into_iter()
                    .min()
                    .unwrap_or(0);
                View {
                    iters: ($(self.$idx.into_view_iter(),)+),
                    remaining,
                }
            }
        }

        impl<$($src: Iterator),+> Iterator for View<($($src,)+)> {
            type Item = ($($src::Item,)+);

            fn next(&mut self) -> Option<Self::Item> {
                if self.remaining == 0 {
                    return None;
                }
                self.remaining -= 1;
                Some(($(self.iters.$idx.next()?,)+))
            }

            fn size_hint(&self) -> (usize, Option<usize>) {
                (self.remaining, Some(self.remaining))
            }
        }

        impl<$($src: Iterator),+> ExactSizeIterator for View<($($src,)+)> {}

        impl<$($src),+> AllPresent for ($(Option<$src>,)+) {
            type Output = ($($src,)+);

            fn all_present(self) -> Option<Self::Output> {
                Some(($(self.$idx?,)+))
            }
        }
    };
}

view_tuple!(A => 0);
view_tuple!(A => 0, B => 1);
view_tuple!(A => 0, B => 1, C => 2);
view_tuple!(A => 0, B => 1, C => 2, D => 3);
view_tuple!(A => 0, B => 1, C => 2, D => 3, E => 4);
view_tuple!(A => 0, B => 1, C => 2, D => 3, E => 4, F => 5);
view_tuple!(A => 0, B => 1, C => 2, D => 3, E => 4, F => 5, G => 6);
view_tuple!(A => 0, B => 1, C => 2, D => 3, E => 4, F => 5, G => 6, H => 7);

#[cfg(test)]
mod tests {
    use engine_component::Entity;

    use super::*;

    fn e(index: u32) -> Entity {
        Entity::from_parts(index, 0)
    }

    #[test]
    fn test_yields_min_length_rows() {
        let a: ComponentStore<u8> = ComponentStore::with_len(5);
        let b: ComponentStore<u16> = ComponentStore::with_len(3);
        let c: ComponentStore<u32> = ComponentStore::with_len(4);
        let view = View::new((&a, &b, &c));
        assert_eq!(view.len(), 3);
        assert_eq!(view.count(), 3);
    }

    #[test]
    fn test_rows_match_direct_indexing() {
        let mut a = ComponentStore::with_len(4);
        let mut b = ComponentStore::with_len(4);
        a.set(e(0), 'a').unwrap();
        a.set(e(2), 'c').unwrap();
        b.set(e(2), 20).unwrap();
        b.set(e(3), 30).unwrap();

        for (i, (x, y)) in View::new((&a, &b)).enumerate() {
            assert_eq!(x, a.slots()[i].as_ref());
            assert_eq!(y, b.slots()[i].as_ref());
        }
    }

    #[test]
    fn test_does_not_filter_partial_rows() {
        let mut a = ComponentStore::with_len(2);
        let b: ComponentStore<i32> = ComponentStore::with_len(2);
        a.set(e(1), 1).unwrap();
        let rows: Vec<(Option<&i32>, Option<&i32>)> = View::new((&a, &b)).collect();
        assert_eq!(rows, vec![(None, None), (Some(&1), None)]);
    }

    #[test]
    fn test_mutation_through_view() {
        let mut pos = ComponentStore::with_len(2);
        let mut vel = ComponentStore::with_len(2);
        pos.set(e(0), 1.0_f32).unwrap();
        vel.set(e(0), 2.0_f32).unwrap();
        pos.set(e(1), 5.0_f32).unwrap();

        for (p, v) in View::new((&mut pos, &vel)) {
            if let (Some(p), Some(v)) = (p, v) {
                *p += *v;
            }
        }
        assert_eq!(pos[e(0)], Some(3.0));
        assert_eq!(pos[e(1)], Some(5.0));
    }

    #[test]
    fn test_present_skips_incomplete_rows() {
        let mut a = ComponentStore::with_len(3);
        let mut b = ComponentStore::with_len(3);
        a.set(e(0), 1).unwrap();
        a.set(e(2), 3).unwrap();
        b.set(e(1), 10).unwrap();
        b.set(e(2), 30).unwrap();

        let rows: Vec<(&i32, &i32)> = View::new((&a, &b)).present().collect();
        assert_eq!(rows, vec![(&3, &30)]);
    }

    #[test]
    fn test_empty_store_yields_nothing() {
        let a: ComponentStore<i32> = ComponentStore::with_len(10);
        let b: ComponentStore<i32> = ComponentStore::new();
        assert_eq!(View::new((&a, &b)).next(), None);
    }

    #[test]
    fn test_single_store_view() {
        let mut a = ComponentStore::with_len(2);
        a.set(e(1), "x").unwrap();
        let rows: Vec<(Option<&&str>,)> = View::new((&a,)).collect();
        assert_eq!(rows, vec![(None,), (Some(&"x"),)]);
    }
}
