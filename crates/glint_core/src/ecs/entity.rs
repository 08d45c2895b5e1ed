//! # Entity Handles
//!
//! Entities are lightweight identifiers consisting of:
//! - An index into the store's slot and component arrays
//! - A generation counter for safe slot reuse
//!
//! An [`Entity`] pairs one of those ids with the identity of the store that
//! issued it. The handle never caches liveness: every query goes back to
//! the store.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::component::{Member, Registry};
use super::query::Query;
use super::store::Store;

/// Unique identifier for an entity slot.
///
/// The ID is split into two parts:
/// - Lower 32 bits: Index into the store's arrays
/// - Upper 32 bits: Generation counter for detecting stale references
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new entity ID from index and generation.
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u64))
    }

    /// Returns the index portion of the entity ID.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Returns the generation portion of the entity ID.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Returns the index as a slot position.
    #[inline]
    #[must_use]
    pub const fn slot(self) -> usize {
        self.index() as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index(), self.generation())
    }
}

/// Process-unique identity of a [`Store`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StoreId(u64);

impl StoreId {
    pub(crate) fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A store-bound handle to one entity slot.
///
/// The handle is a capability, not an owner: the store decides whether it
/// is still valid. Handles are move-only. Use [`Entity::take`] to hand the
/// binding to a new handle while clearing the old one.
///
/// # Example
///
/// ```rust,ignore
/// let mut store = Store::<Sandbox>::new(128);
/// let player = store.create().expect("store has room");
/// player.set(&mut store, (Physics { velocity: [1.0, 0.0] },));
/// assert_eq!(player.has::<(Physics, Collision), _>(&store), Some((true, false)));
/// ```
#[derive(Debug)]
pub struct Entity {
    store: Option<StoreId>,
    id: Option<EntityId>,
}

impl Entity {
    /// Creates a handle bound to no slot. It is never valid.
    #[must_use]
    pub const fn null() -> Self {
        Self {
            store: None,
            id: None,
        }
    }

    pub(crate) const fn bound(store: StoreId, id: EntityId) -> Self {
        Self {
            store: Some(store),
            id: Some(id),
        }
    }

    /// Returns the bound id, if any.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> Option<EntityId> {
        self.id
    }

    /// Returns `true` if this handle carries no id.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.id.is_none()
    }

    /// Moves the binding into a new handle, leaving this one cleared.
    #[must_use]
    pub fn take(&mut self) -> Self {
        Self {
            store: self.store,
            id: self.id.take(),
        }
    }

    pub(crate) const fn store_id(&self) -> Option<StoreId> {
        self.store
    }

    pub(crate) fn clear(&mut self) {
        self.id = None;
    }

    /// Returns `true` while `store` still considers this handle live.
    #[must_use]
    pub fn is_valid<R: Registry>(&self, store: &Store<R>) -> bool {
        store.is_valid(self)
    }

    /// Writes every value of `values` into this entity's slot.
    ///
    /// Returns the freshly written values, or `None` (writing nothing)
    /// when the handle is invalid.
    pub fn set<'s, R, Q>(&self, store: &'s mut Store<R>, values: Q) -> Option<Q::Written<'s>>
    where
        R: Registry,
        Q: Query<R>,
    {
        store.set(self, values)
    }

    /// Reads the requested component cells of this entity.
    #[must_use]
    pub fn components<'s, Q, R>(&self, store: &'s Store<R>) -> Option<Q::Cells<'s>>
    where
        R: Registry,
        Q: Query<R>,
    {
        store.components::<Q>(self)
    }

    /// Mutable variant of [`Entity::components`].
    pub fn components_mut<'s, Q, R>(&self, store: &'s mut Store<R>) -> Option<Q::CellsMut<'s>>
    where
        R: Registry,
        Q: Query<R>,
    {
        store.components_mut::<Q>(self)
    }

    /// Reads every registered component cell of this entity.
    #[must_use]
    pub fn all_components<'s, R>(
        &self,
        store: &'s Store<R>,
    ) -> Option<<R::All as Query<R>>::Cells<'s>>
    where
        R: Registry,
    {
        store.components::<R::All>(self)
    }

    /// Reports, per requested type, whether this entity holds a value.
    ///
    /// Repeating a type in the request does not build:
    ///
    /// ```compile_fail
    /// use glint_core::{registry, Store};
    ///
    /// #[derive(Clone, Debug, Default)]
    /// struct Physics;
    ///
    /// registry! { struct Sandbox { Physics } }
    ///
    /// let mut store = Store::<Sandbox>::new(4);
    /// let entity = store.create().unwrap();
    /// let _ = entity.has::<(Physics, Physics), _>(&store);
    /// ```
    #[must_use]
    pub fn has<Q, R>(&self, store: &Store<R>) -> Option<Q::Presence>
    where
        R: Registry,
        Q: Query<R>,
    {
        store.has::<Q>(self)
    }

    /// Detaches one component, returning what was stored.
    pub fn remove<C, R>(&self, store: &mut Store<R>) -> Option<Option<C>>
    where
        R: Registry,
        C: Member<R>,
    {
        store.remove::<C>(self)
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::null()
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        match (self.store, self.id, other.store, other.id) {
            (Some(a_store), Some(a), Some(b_store), Some(b)) => a_store == b_store && a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_roundtrip() {
        let id = EntityId::new(12345, 67890);
        assert_eq!(id.index(), 12345);
        assert_eq!(id.generation(), 67890);
        assert_eq!(id.slot(), 12345);
    }

    #[test]
    fn test_entity_id_equality_includes_generation() {
        assert_eq!(EntityId::new(3, 1), EntityId::new(3, 1));
        assert_ne!(EntityId::new(3, 1), EntityId::new(3, 2));
        assert_eq!(EntityId::new(7, 2).to_string(), "7v2");
    }

    #[test]
    fn test_null_handles_never_compare_equal() {
        assert_ne!(Entity::null(), Entity::null());
        assert!(Entity::default().is_null());
    }

    #[test]
    fn test_take_clears_source() {
        let store = StoreId::next();
        let mut a = Entity::bound(store, EntityId::new(0, 1));
        let b = a.take();
        assert!(a.is_null());
        assert_eq!(b.id(), Some(EntityId::new(0, 1)));
        assert_ne!(a, b);
    }

    #[test]
    fn test_store_ids_are_unique() {
        assert_ne!(StoreId::next(), StoreId::next());
    }
}
