//! # Typed Views
//!
//! A view walks the slot array and the requested columns in lockstep and
//! yields only live slots. Nothing is collected up front and nothing is
//! copied: each item hands out references into the store's columns.
//!
//! Views are restartable. Every call to `iter`/`iter_mut` begins a fresh
//! pass from slot zero.

use std::marker::PhantomData;

use super::component::Registry;
use super::entity::EntityId;
use super::query::Query;
use super::store::Store;

/// Exclusive view over live entities for the components in `Q`.
///
/// Holding a `View` keeps the store mutably borrowed, so entities cannot be
/// created or destroyed while it is alive. Component values may be changed
/// through [`View::iter_mut`].
pub struct View<'s, R: Registry, Q: Query<R>> {
    store: &'s mut Store<R>,
    _query: PhantomData<fn() -> Q>,
}

impl<'s, R: Registry, Q: Query<R>> View<'s, R, Q> {
    pub(crate) fn new(store: &'s mut Store<R>) -> Self {
        let () = <Q as Query<R>>::DISTINCT;
        Self {
            store,
            _query: PhantomData,
        }
    }

    /// Iterates `(id, cells)` for every live slot.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, Q::Cells<'_>)> + '_ {
        live(self.store.slots(), Q::iter(Q::columns(self.store.columns())))
    }

    /// Iterates `(id, cells)` for every live slot, with mutable cells.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, Q::CellsMut<'_>)> + '_ {
        let (slots, columns) = self.store.split_mut();
        live(slots, Q::iter_mut(Q::columns_mut(columns)))
    }

    /// Number of live slots the view visits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.size()
    }

    /// Returns `true` if no slot is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shared view over live entities for the components in `Q`.
pub struct ViewRef<'s, R: Registry, Q: Query<R>> {
    store: &'s Store<R>,
    _query: PhantomData<fn() -> Q>,
}

impl<'s, R: Registry, Q: Query<R>> ViewRef<'s, R, Q> {
    pub(crate) fn new(store: &'s Store<R>) -> Self {
        let () = <Q as Query<R>>::DISTINCT;
        Self {
            store,
            _query: PhantomData,
        }
    }

    /// Iterates `(id, cells)` for every live slot.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, Q::Cells<'s>)> + 's {
        live(self.store.slots(), Q::iter(Q::columns(self.store.columns())))
    }

    /// Number of live slots the view visits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.size()
    }

    /// Returns `true` if no slot is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<R: Registry, Q: Query<R>> Clone for ViewRef<'_, R, Q> {
    fn clone(&self) -> Self {
        Self::new(self.store)
    }
}

/// Zips slots with column cells and drops the non-live ones.
fn live<'a, T: 'a>(
    slots: &'a [Option<EntityId>],
    cells: impl Iterator<Item = T> + 'a,
) -> impl Iterator<Item = (EntityId, T)> + 'a {
    slots
        .iter()
        .zip(cells)
        .filter_map(|(slot, cells)| slot.map(|id| (id, cells)))
}
